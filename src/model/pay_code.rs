use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

/// Category of an earnable line. Only `Base` and `Tambahan` count toward
/// the retirement-fund wage base.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, AsRefStr, Display,
    ToSchema,
)]
#[strum(ascii_case_insensitive)]
pub enum PayType {
    Base,
    Tambahan,
    Overtime,
}

/// Unit a pay-code rate is quoted in. Work logs may carry units outside the
/// ones the engine branches on; those are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RateUnit {
    Hour,
    Trip,
    Month,
    Fixed,
    Other(String),
}

impl RateUnit {
    pub fn as_str(&self) -> &str {
        match self {
            RateUnit::Hour => "Hour",
            RateUnit::Trip => "Trip",
            RateUnit::Month => "Month",
            RateUnit::Fixed => "Fixed",
            RateUnit::Other(unit) => unit,
        }
    }
}

impl From<&str> for RateUnit {
    fn from(value: &str) -> Self {
        let value = value.trim();
        if value.eq_ignore_ascii_case("hour") {
            RateUnit::Hour
        } else if value.eq_ignore_ascii_case("trip") {
            RateUnit::Trip
        } else if value.eq_ignore_ascii_case("month") {
            RateUnit::Month
        } else if value.eq_ignore_ascii_case("fixed") {
            RateUnit::Fixed
        } else {
            RateUnit::Other(value.to_string())
        }
    }
}

impl From<String> for RateUnit {
    fn from(value: String) -> Self {
        RateUnit::from(value.as_str())
    }
}

impl From<RateUnit> for String {
    fn from(value: RateUnit) -> Self {
        value.as_str().to_string()
    }
}

/// Pay code attached to a job, with the job-level override when one is set.
#[derive(Debug, Clone, PartialEq)]
pub struct JobPayCode {
    pub job_id: String,
    pub pay_code_id: String,
    pub description: String,
    pub pay_type: PayType,
    pub rate_unit: RateUnit,
    pub default_rate: Decimal,
    pub override_rate: Option<Decimal>,
}

impl JobPayCode {
    pub fn effective_rate(&self) -> Decimal {
        self.override_rate.unwrap_or(self.default_rate)
    }
}

/// One activity line from a submitted monthly work log.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkLogActivity {
    pub work_log_id: u64,
    pub employee_id: String,
    pub job_id: String,
    pub pay_code_id: Option<String>,
    pub description: String,
    pub pay_type: PayType,
    pub rate_unit: RateUnit,
    pub rate: Decimal,
    pub hours_applied: Option<Decimal>,
    pub calculated_amount: Decimal,
}
