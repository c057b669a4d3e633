use tracing::debug;

use crate::model::payroll::{PayrollHeader, PayrollItem};
use crate::payroll::deductions::Computation;
use crate::store::{SettlementTx, StoreError};

/// Persists one employee's computation, replacing whatever an earlier run
/// wrote for the same period. Manually entered items are left alone.
pub async fn settle(
    tx: &mut dyn SettlementTx,
    monthly_payroll_id: u64,
    employee_id: &str,
    job_type: &str,
    items: &[PayrollItem],
    computation: &Computation,
) -> Result<u64, StoreError> {
    let header = PayrollHeader {
        job_type: job_type.to_string(),
        gross_pay: computation.gross_pay,
        net_pay: computation.net_pay,
    };

    let employee_payroll_id = tx
        .upsert_employee_payroll(monthly_payroll_id, employee_id, &header)
        .await?;
    tx.replace_non_manual_items(employee_payroll_id, items).await?;
    tx.replace_deductions(employee_payroll_id, &computation.deductions)
        .await?;

    debug!(
        employee_id,
        employee_payroll_id,
        items = items.len(),
        deductions = computation.deductions.len(),
        "Employee payroll settled"
    );

    Ok(employee_payroll_id)
}
