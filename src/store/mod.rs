//! Read and write contracts the payroll engine runs against.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::employee::EmployeeDemographics;
use crate::model::pay_code::{JobPayCode, WorkLogActivity};
use crate::model::payroll::{
    EmployeePayroll, EmployeePayrollDetail, MonthlyPayroll, PayrollDeduction, PayrollHeader,
    PayrollItem, PayrollPeriod,
};
use crate::model::rates::{
    EmploymentInsuranceRate, IncomeTaxRate, RetirementFundRate, SocialSecurityRate,
};

#[cfg(test)]
pub mod memory;
pub mod mysql;

/// SQLSTATE class for integrity constraint violations.
const CONSTRAINT_SQLSTATE_CLASS: &str = "23";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("constraint violation ({code}): {message}")]
    Constraint { code: String, message: String },

    #[error("database error: {0}")]
    Database(sqlx::Error),

    #[error("cannot decode {column}: {message}")]
    Decode { column: String, message: String },

    #[error("transaction already closed")]
    TransactionClosed,
}

impl StoreError {
    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, StoreError::Constraint { .. })
    }

    pub fn decode(column: &str, message: impl ToString) -> Self {
        StoreError::Decode {
            column: column.to_string(),
            message: message.to_string(),
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if let Some(code) = db_err.code() {
                if code.starts_with(CONSTRAINT_SQLSTATE_CLASS) {
                    return StoreError::Constraint {
                        code: code.into_owned(),
                        message: db_err.message().to_string(),
                    };
                }
            }
        }
        StoreError::Database(err)
    }
}

/// Work-log activities for a period, keyed by employee id.
pub type WorkLogIndex = HashMap<String, Vec<WorkLogActivity>>;
/// Trip counts for a period, keyed by employee id.
pub type TripCounts = HashMap<String, u32>;
/// Demographic records keyed by employee id.
pub type DemographicsIndex = HashMap<String, EmployeeDemographics>;
/// Pay codes keyed by job id.
pub type PayCodeIndex = HashMap<String, Vec<JobPayCode>>;

#[async_trait]
pub trait PayrollSource: Send + Sync {
    async fn monthly_payroll(&self, id: u64) -> Result<Option<MonthlyPayroll>, StoreError>;

    async fn submitted_work_log_activities(
        &self,
        period: PayrollPeriod,
    ) -> Result<WorkLogIndex, StoreError>;

    async fn trip_counts(&self, period: PayrollPeriod) -> Result<TripCounts, StoreError>;

    async fn employee_demographics(&self) -> Result<DemographicsIndex, StoreError>;

    async fn job_pay_codes(&self, job_ids: &[String]) -> Result<PayCodeIndex, StoreError>;

    async fn retirement_fund_rates(&self) -> Result<Vec<RetirementFundRate>, StoreError>;

    /// Sorted ascending by `wage_from`.
    async fn social_security_rates(&self) -> Result<Vec<SocialSecurityRate>, StoreError>;

    /// Sorted ascending by `wage_from`.
    async fn employment_insurance_rates(&self)
    -> Result<Vec<EmploymentInsuranceRate>, StoreError>;

    /// Sorted ascending by `wage_from`.
    async fn income_tax_rates(&self) -> Result<Vec<IncomeTaxRate>, StoreError>;
}

/// Writes for one batch run. Nothing is visible to readers until `commit`.
#[async_trait]
pub trait SettlementTx: Send {
    /// Marks the start of one employee's writes.
    async fn savepoint(&mut self) -> Result<(), StoreError>;

    async fn release_savepoint(&mut self) -> Result<(), StoreError>;

    /// Discards writes made since the last `savepoint`.
    async fn rollback_to_savepoint(&mut self) -> Result<(), StoreError>;

    /// Updates the header for (period, employee) in place, or inserts it.
    async fn upsert_employee_payroll(
        &mut self,
        monthly_payroll_id: u64,
        employee_id: &str,
        header: &PayrollHeader,
    ) -> Result<u64, StoreError>;

    /// Deletes every non-manual item of the payroll, then inserts `items`.
    async fn replace_non_manual_items(
        &mut self,
        employee_payroll_id: u64,
        items: &[PayrollItem],
    ) -> Result<(), StoreError>;

    /// Deletes every deduction of the payroll, then inserts `deductions`.
    async fn replace_deductions(
        &mut self,
        employee_payroll_id: u64,
        deductions: &[PayrollDeduction],
    ) -> Result<(), StoreError>;

    async fn touch_batch_timestamp(
        &mut self,
        monthly_payroll_id: u64,
    ) -> Result<DateTime<Utc>, StoreError>;

    async fn commit(&mut self) -> Result<(), StoreError>;

    async fn rollback(&mut self) -> Result<(), StoreError>;
}

#[async_trait]
pub trait PayrollStore: PayrollSource {
    async fn begin(&self) -> Result<Box<dyn SettlementTx>, StoreError>;

    async fn get_or_create_monthly_payroll(
        &self,
        period: PayrollPeriod,
    ) -> Result<MonthlyPayroll, StoreError>;

    async fn finalize_monthly_payroll(&self, id: u64)
    -> Result<Option<MonthlyPayroll>, StoreError>;

    async fn employee_payrolls(
        &self,
        monthly_payroll_id: u64,
    ) -> Result<Vec<EmployeePayroll>, StoreError>;

    async fn employee_payroll_detail(
        &self,
        employee_payroll_id: u64,
    ) -> Result<Option<EmployeePayrollDetail>, StoreError>;
}
