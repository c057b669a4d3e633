//! Builds the earnable line items of one employee for one period.

use rust_decimal::Decimal;

use crate::model::pay_code::{JobPayCode, PayType, RateUnit, WorkLogActivity};
use crate::model::payroll::PayrollItem;
use crate::store::{PayCodeIndex, TripCounts, WorkLogIndex};
use crate::utils::money::round_money;

/// How a job earns its pay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobKind {
    /// Paid from submitted monthly work logs.
    WorkLogged,
    /// Paid per trip, plus an optional monthly base.
    TripBased,
}

/// Borrowed view of the batch inputs the aggregator reads.
#[derive(Debug, Clone, Copy)]
pub struct PaySources<'a> {
    pub work_logs: &'a WorkLogIndex,
    pub trips: &'a TripCounts,
    pub pay_codes: &'a PayCodeIndex,
}

pub fn aggregate_items(
    employee_id: &str,
    job_type: &str,
    kind: JobKind,
    sources: PaySources<'_>,
) -> Vec<PayrollItem> {
    match kind {
        JobKind::WorkLogged => sources
            .work_logs
            .get(employee_id)
            .map(|activities| work_log_items(employee_id, activities))
            .unwrap_or_default(),
        JobKind::TripBased => {
            let codes = sources
                .pay_codes
                .get(job_type)
                .map(Vec::as_slice)
                .unwrap_or_default();
            let trips = sources.trips.get(employee_id).copied().unwrap_or(0);
            trip_items(employee_id, job_type, codes, trips)
        }
    }
}

/// The work log already applied its own rounding to `calculated_amount`,
/// so the amount is taken as-is rather than rate times quantity. Each item
/// keeps the job the activity was logged under, which may differ from the
/// job the employee was selected with.
fn work_log_items(employee_id: &str, activities: &[WorkLogActivity]) -> Vec<PayrollItem> {
    activities
        .iter()
        .filter_map(|activity| {
            let pay_code_id = activity.pay_code_id.clone()?;
            let quantity = match activity.rate_unit {
                RateUnit::Hour => activity.hours_applied.unwrap_or(Decimal::ZERO),
                _ => Decimal::ONE,
            };
            Some(PayrollItem {
                pay_code_id,
                description: activity.description.clone(),
                pay_type: activity.pay_type,
                rate: activity.rate,
                rate_unit: activity.rate_unit.clone(),
                quantity,
                amount: round_money(activity.calculated_amount),
                is_manual: false,
                job_type: activity.job_id.clone(),
                source_employee_id: employee_id.to_string(),
                work_log_id: Some(activity.work_log_id),
            })
        })
        .collect()
}

fn trip_items(employee_id: &str, job_type: &str, codes: &[JobPayCode], trips: u32) -> Vec<PayrollItem> {
    let mut items = Vec::with_capacity(2);

    let trip_code = codes.iter().find(|c| c.rate_unit == RateUnit::Trip);
    if let Some(code) = trip_code.filter(|_| trips > 0) {
        let quantity = Decimal::from(trips);
        let rate = code.effective_rate();
        items.push(job_item(employee_id, job_type, code, quantity, round_money(quantity * rate)));
    }

    let monthly_base = codes
        .iter()
        .find(|c| c.pay_type == PayType::Base && c.rate_unit == RateUnit::Month);
    if let Some(code) = monthly_base.filter(|c| c.effective_rate() > Decimal::ZERO) {
        let amount = round_money(code.effective_rate());
        items.push(job_item(employee_id, job_type, code, Decimal::ONE, amount));
    }

    items
}

fn job_item(
    employee_id: &str,
    job_type: &str,
    code: &JobPayCode,
    quantity: Decimal,
    amount: Decimal,
) -> PayrollItem {
    PayrollItem {
        pay_code_id: code.pay_code_id.clone(),
        description: code.description.clone(),
        pay_type: code.pay_type,
        rate: code.effective_rate(),
        rate_unit: code.rate_unit.clone(),
        quantity,
        amount,
        is_manual: false,
        job_type: job_type.to_string(),
        source_employee_id: employee_id.to_string(),
        work_log_id: None,
    }
}
