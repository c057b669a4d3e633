use chrono::{DateTime, Datelike, NaiveDate, Utc};
use derive_more::Display;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, EnumString};
use utoipa::ToSchema;

use crate::model::pay_code::{PayType, RateUnit};

/// A payroll period, rendered as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize, ToSchema)]
#[display(fmt = "{}-{:02}", year, month)]
pub struct PayrollPeriod {
    #[schema(example = 2026)]
    pub year: i32,
    #[schema(example = 9)]
    pub month: u32,
}

impl PayrollPeriod {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|_| Self { year, month })
    }

    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    /// Last calendar day of the month. Ages are measured on this date.
    pub fn last_day(&self) -> Option<NaiveDate> {
        let first = self.first_day()?;
        let next = if first.month() == 12 {
            NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)?
        } else {
            NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)?
        };
        next.pred_opt()
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, AsRefStr, ToSchema,
)]
pub enum PayrollStatus {
    Processing,
    Finalized,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MonthlyPayroll {
    #[schema(example = 12)]
    pub id: u64,
    #[schema(example = 2026)]
    pub year: i32,
    #[schema(example = 9)]
    pub month: u32,
    pub status: PayrollStatus,
    #[schema(value_type = String, format = "date-time")]
    pub created_at: DateTime<Utc>,
    #[schema(value_type = String, format = "date-time")]
    pub updated_at: DateTime<Utc>,
}

impl MonthlyPayroll {
    pub fn period(&self) -> PayrollPeriod {
        PayrollPeriod {
            year: self.year,
            month: self.month,
        }
    }

    pub fn is_finalized(&self) -> bool {
        self.status == PayrollStatus::Finalized
    }
}

/// One employee's computed figures within a monthly payroll.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EmployeePayroll {
    #[schema(example = 301)]
    pub id: u64,
    #[schema(example = 12)]
    pub monthly_payroll_id: u64,
    #[schema(example = "EMP-045")]
    pub employee_id: String,
    #[schema(example = "MEE_PACKING")]
    pub job_type: String,
    #[schema(value_type = String, example = "1600.00")]
    pub gross_pay: Decimal,
    #[schema(value_type = String, example = "1402.05")]
    pub net_pay: Decimal,
}

/// Fields written to the employee payroll header on every run.
#[derive(Debug, Clone, PartialEq)]
pub struct PayrollHeader {
    pub job_type: String,
    pub gross_pay: Decimal,
    pub net_pay: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PayrollItem {
    #[schema(example = "WL_HOUR")]
    pub pay_code_id: String,
    #[schema(example = "Packing (hourly)")]
    pub description: String,
    pub pay_type: PayType,
    #[schema(value_type = String, example = "10.00")]
    pub rate: Decimal,
    #[schema(value_type = String, example = "Hour")]
    pub rate_unit: RateUnit,
    #[schema(value_type = String, example = "160")]
    pub quantity: Decimal,
    #[schema(value_type = String, example = "1600.00")]
    pub amount: Decimal,
    pub is_manual: bool,
    pub job_type: String,
    pub source_employee_id: String,
    /// Work log the line was derived from, when there is one.
    pub work_log_id: Option<u64>,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    AsRefStr,
    strum_macros::Display,
    ToSchema,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum DeductionKind {
    /// Retirement fund.
    Epf,
    /// Social security.
    Socso,
    /// Employment insurance.
    Sip,
    /// Monthly income tax.
    Pcb,
}

/// Audit record of the rate row and classification behind a deduction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RateInfo {
    pub rate_id: u64,
    #[schema(example = "11%")]
    pub employee_rate: String,
    #[schema(example = "13%")]
    pub employer_rate: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "local_under_60")]
    pub age_group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "married-K3-unemployed")]
    pub tax_category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>, example = "1600")]
    pub wage_ceiling: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "unemployed_spouse_k3")]
    pub rate_column: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PayrollDeduction {
    pub kind: DeductionKind,
    #[schema(value_type = String, example = "176")]
    pub employee_amount: Decimal,
    #[schema(value_type = String, example = "208")]
    pub employer_amount: Decimal,
    /// Wage the rate was applied to.
    #[schema(value_type = String, example = "1600.00")]
    pub wage_amount: Decimal,
    pub rate_info: RateInfo,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EmployeePayrollDetail {
    pub payroll: EmployeePayroll,
    pub items: Vec<PayrollItem>,
    pub deductions: Vec<PayrollDeduction>,
}
