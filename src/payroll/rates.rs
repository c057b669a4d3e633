//! Statutory rate lookups. Everything here is pure.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::model::employee::{EmployeeDemographics, SpouseEmployment};
use crate::model::rates::{
    EmployeeType, IncomeTaxRate, MAX_TAX_DEPENDENTS, RetirementFundRate, WageBracket,
};
use crate::utils::money::percentage_of_ceil;

pub const SENIOR_AGE: u32 = 60;

pub fn classify_employee(nationality: Option<&str>, age: u32, home_citizenship: &str) -> EmployeeType {
    let local = is_home_citizen(nationality, home_citizenship);
    match (local, age >= SENIOR_AGE) {
        (true, false) => EmployeeType::LocalUnder60,
        (true, true) => EmployeeType::LocalOver60,
        (false, false) => EmployeeType::ForeignUnder60,
        (false, true) => EmployeeType::ForeignOver60,
    }
}

pub fn is_home_citizen(nationality: Option<&str>, home_citizenship: &str) -> bool {
    nationality.is_some_and(|n| n.trim().eq_ignore_ascii_case(home_citizenship.trim()))
}

/// Local rows may be split by a wage threshold; the threshold row wins while
/// the wage base is within it, otherwise the open-ended row applies. Foreign
/// rows are not split.
pub fn resolve_retirement_fund_rate(
    rows: &[RetirementFundRate],
    employee_type: EmployeeType,
    wage_base: Decimal,
) -> Option<&RetirementFundRate> {
    let mut matching = rows.iter().filter(|r| r.employee_type == employee_type);

    if !employee_type.is_local() {
        return matching.next();
    }

    let candidates: Vec<&RetirementFundRate> = matching.collect();
    candidates
        .iter()
        .find(|r| r.wage_threshold.is_some_and(|t| wage_base <= t))
        .or_else(|| candidates.iter().find(|r| r.wage_threshold.is_none()))
        .copied()
}

/// First row whose closed range contains `wage`. Rows are sorted and
/// non-overlapping.
pub fn resolve_bracket_rate<R: WageBracket>(rows: &[R], wage: Decimal) -> Option<&R> {
    rows.iter().find(|r| r.contains(wage))
}

/// Statutory step function applied to the wage base before percentages.
pub fn retirement_fund_wage_ceiling(wage: Decimal) -> Decimal {
    if wage <= dec!(10) {
        Decimal::ZERO
    } else if wage <= dec!(20) {
        dec!(20)
    } else if wage <= dec!(5000) {
        (wage / dec!(20)).ceil() * dec!(20)
    } else {
        dec!(5000) + ((wage - dec!(5000)) / dec!(100)).ceil() * dec!(100)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contribution {
    pub employee: Decimal,
    pub employer: Decimal,
}

/// `None` when the row gives the employer neither a percentage nor an amount.
pub fn retirement_fund_contribution(
    row: &RetirementFundRate,
    ceiling: Decimal,
) -> Option<Contribution> {
    let employer = match (row.employer_rate_percentage, row.employer_amount) {
        (Some(pct), _) => percentage_of_ceil(ceiling, pct),
        (None, Some(amount)) => amount,
        (None, None) => return None,
    };
    Some(Contribution {
        employee: percentage_of_ceil(ceiling, row.employee_rate_percentage),
        employer,
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct IncomeTaxSelection {
    pub rate: Decimal,
    /// Spouse column that overrode the base rate.
    pub column: Option<String>,
}

pub fn resolve_income_tax_rate(row: &IncomeTaxRate, person: &EmployeeDemographics) -> IncomeTaxSelection {
    let base = IncomeTaxSelection {
        rate: row.base_rate,
        column: None,
    };
    if !person.is_married() {
        return base;
    }
    let Some(spouse) = person.spouse_employment() else {
        return base;
    };

    let dependents = clamped_dependents(person.number_of_children);
    let (column, spouse_employed) = match spouse {
        SpouseEmployment::Employed => (&row.employed_spouse, true),
        SpouseEmployment::Unemployed => (&row.unemployed_spouse, false),
    };
    match column[dependents] {
        Some(rate) => IncomeTaxSelection {
            rate,
            column: Some(IncomeTaxRate::column_name(spouse_employed, dependents)),
        },
        None => base,
    }
}

/// `{marital}[-K{n}][-{spouse}]`, e.g. `married-K3-unemployed`.
pub fn tax_category(person: &EmployeeDemographics) -> String {
    let marital = person
        .marital_status
        .as_deref()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "single".to_string());

    let mut category = marital;
    if person.is_married() {
        category.push_str(&format!("-K{}", clamped_dependents(person.number_of_children)));
        if let Some(spouse) = person.spouse_employment() {
            category.push('-');
            category.push_str(spouse.label());
        }
    }
    category
}

fn clamped_dependents(children: u32) -> usize {
    (children as usize).min(MAX_TAX_DEPENDENTS)
}
