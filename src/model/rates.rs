use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, EnumString};

/// Highest dependent count the income-tax table has a column for.
pub const MAX_TAX_DEPENDENTS: usize = 10;

/// Retirement-fund employee classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, AsRefStr)]
pub enum EmployeeType {
    #[strum(serialize = "local_under_60")]
    #[serde(rename = "local_under_60")]
    LocalUnder60,
    #[strum(serialize = "local_over_60")]
    #[serde(rename = "local_over_60")]
    LocalOver60,
    #[strum(serialize = "foreign_under_60")]
    #[serde(rename = "foreign_under_60")]
    ForeignUnder60,
    #[strum(serialize = "foreign_over_60")]
    #[serde(rename = "foreign_over_60")]
    ForeignOver60,
}

impl EmployeeType {
    pub fn is_local(&self) -> bool {
        matches!(self, EmployeeType::LocalUnder60 | EmployeeType::LocalOver60)
    }

    pub fn is_over_60(&self) -> bool {
        matches!(self, EmployeeType::LocalOver60 | EmployeeType::ForeignOver60)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RetirementFundRate {
    pub id: u64,
    pub employee_type: EmployeeType,
    /// Row applies only while the wage base is at or below this amount.
    pub wage_threshold: Option<Decimal>,
    pub employee_rate_percentage: Decimal,
    pub employer_rate_percentage: Option<Decimal>,
    /// Flat employer contribution, used when no percentage is set.
    pub employer_amount: Option<Decimal>,
}

/// A rate row that applies to the closed range `[wage_from, wage_to]`.
pub trait WageBracket {
    fn wage_from(&self) -> Decimal;
    fn wage_to(&self) -> Decimal;

    fn contains(&self, wage: Decimal) -> bool {
        self.wage_from() <= wage && wage <= self.wage_to()
    }
}

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct SocialSecurityRate {
    pub id: u64,
    pub wage_from: Decimal,
    pub wage_to: Decimal,
    pub employee_rate: Decimal,
    pub employer_rate: Decimal,
    pub employer_rate_over_60: Decimal,
}

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct EmploymentInsuranceRate {
    pub id: u64,
    pub wage_from: Decimal,
    pub wage_to: Decimal,
    pub employee_rate: Decimal,
    pub employer_rate: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IncomeTaxRate {
    pub id: u64,
    pub wage_from: Decimal,
    pub wage_to: Decimal,
    pub base_rate: Decimal,
    /// `employed_spouse_k0` ..= `employed_spouse_k10`.
    pub employed_spouse: [Option<Decimal>; MAX_TAX_DEPENDENTS + 1],
    /// `unemployed_spouse_k0` ..= `unemployed_spouse_k10`.
    pub unemployed_spouse: [Option<Decimal>; MAX_TAX_DEPENDENTS + 1],
}

impl IncomeTaxRate {
    pub fn column_name(spouse_employed: bool, dependents: usize) -> String {
        let prefix = if spouse_employed { "employed" } else { "unemployed" };
        format!("{prefix}_spouse_k{dependents}")
    }
}

macro_rules! impl_wage_bracket {
    ($($row:ty),+) => {
        $(
            impl WageBracket for $row {
                fn wage_from(&self) -> Decimal {
                    self.wage_from
                }

                fn wage_to(&self) -> Decimal {
                    self.wage_to
                }
            }
        )+
    };
}

impl_wage_bracket!(SocialSecurityRate, EmploymentInsuranceRate, IncomeTaxRate);

/// The four statutory tables, loaded once per batch.
#[derive(Debug, Clone, Default)]
pub struct RateTables {
    pub retirement_fund: Vec<RetirementFundRate>,
    pub social_security: Vec<SocialSecurityRate>,
    pub employment_insurance: Vec<EmploymentInsuranceRate>,
    pub income_tax: Vec<IncomeTaxRate>,
}
