use thiserror::Error;

use crate::model::payroll::PayrollPeriod;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum PayrollError {
    // Rejected before any work begins.
    #[error("monthly payroll {0} not found")]
    PeriodNotFound(u64),

    #[error("no employees selected for processing")]
    EmptySelection,

    #[error("employee {0} is selected more than once")]
    DuplicateSelection(String),

    #[error("payroll for {0} is finalized and can no longer be processed")]
    PeriodFinalized(PayrollPeriod),

    // Per-employee failures.
    #[error("no staff record for employee {0}")]
    MissingDemographics(String),

    #[error("employee {0} has no birthdate on record")]
    MissingBirthdate(String),

    #[error("malformed {table} rate row {rate_id}: {reason}")]
    MalformedRateTable {
        table: &'static str,
        rate_id: u64,
        reason: String,
    },

    #[error("batch aborted while processing employee {employee_id}: {source}")]
    BatchAborted {
        employee_id: String,
        #[source]
        source: StoreError,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl PayrollError {
    /// Input problems the caller can fix; nothing was written.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            PayrollError::PeriodNotFound(_)
                | PayrollError::EmptySelection
                | PayrollError::DuplicateSelection(_)
        )
    }

    pub fn is_constraint_violation(&self) -> bool {
        match self {
            PayrollError::Store(err) | PayrollError::BatchAborted { source: err, .. } => {
                err.is_constraint_violation()
            }
            _ => false,
        }
    }
}
