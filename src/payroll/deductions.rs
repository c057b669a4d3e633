//! Statutory deductions for one employee.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::model::employee::EmployeeDemographics;
use crate::model::pay_code::PayType;
use crate::model::payroll::{DeductionKind, PayrollDeduction, PayrollItem, RateInfo};
use crate::model::rates::{EmployeeType, RateTables};
use crate::payroll::error::PayrollError;
use crate::payroll::rates::{
    classify_employee, is_home_citizen, resolve_bracket_rate, resolve_income_tax_rate,
    resolve_retirement_fund_rate, retirement_fund_contribution, retirement_fund_wage_ceiling,
    tax_category,
};
use crate::utils::money::{format_amount, format_percentage, round_money};

/// Item totals split by pay type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WageBreakdown {
    pub base: Decimal,
    pub tambahan: Decimal,
    pub overtime: Decimal,
}

impl WageBreakdown {
    pub fn from_items(items: &[PayrollItem]) -> Self {
        items.iter().fold(Self::default(), |mut acc, item| {
            match item.pay_type {
                PayType::Base => acc.base += item.amount,
                PayType::Tambahan => acc.tambahan += item.amount,
                PayType::Overtime => acc.overtime += item.amount,
            }
            acc
        })
    }

    pub fn gross(&self) -> Decimal {
        self.base + self.tambahan + self.overtime
    }

    /// Overtime never counts toward the retirement fund.
    pub fn retirement_fund_base(&self) -> Decimal {
        self.base + self.tambahan
    }
}

/// Who the deductions are computed for.
#[derive(Debug, Clone)]
pub struct EmployeeProfile<'a> {
    pub demographics: &'a EmployeeDemographics,
    pub home_citizen: bool,
    pub employee_type: EmployeeType,
}

impl<'a> EmployeeProfile<'a> {
    pub fn resolve(
        demographics: &'a EmployeeDemographics,
        as_of: NaiveDate,
        home_citizenship: &str,
    ) -> Result<Self, PayrollError> {
        let age = demographics
            .age_on(as_of)
            .ok_or_else(|| PayrollError::MissingBirthdate(demographics.employee_id.clone()))?;
        let nationality = demographics.nationality.as_deref();
        Ok(Self {
            demographics,
            home_citizen: is_home_citizen(nationality, home_citizenship),
            employee_type: classify_employee(nationality, age, home_citizenship),
        })
    }

    pub fn is_over_60(&self) -> bool {
        self.employee_type.is_over_60()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Computation {
    pub gross_pay: Decimal,
    pub deductions: Vec<PayrollDeduction>,
    pub net_pay: Decimal,
}

pub fn calculate(
    items: &[PayrollItem],
    profile: &EmployeeProfile<'_>,
    rates: &RateTables,
) -> Result<Computation, PayrollError> {
    let wages = WageBreakdown::from_items(items);
    let gross_pay = round_money(wages.gross());

    let mut deductions = Vec::with_capacity(4);
    deductions.extend(retirement_fund(wages.retirement_fund_base(), profile, rates)?);
    deductions.extend(social_security(gross_pay, profile, rates));
    deductions.extend(employment_insurance(gross_pay, profile, rates));
    deductions.extend(income_tax(gross_pay, profile, rates));

    let withheld: Decimal = deductions.iter().map(|d| d.employee_amount).sum();
    Ok(Computation {
        gross_pay,
        net_pay: round_money(gross_pay - withheld),
        deductions,
    })
}

fn retirement_fund(
    wage_base: Decimal,
    profile: &EmployeeProfile<'_>,
    rates: &RateTables,
) -> Result<Option<PayrollDeduction>, PayrollError> {
    let Some(row) =
        resolve_retirement_fund_rate(&rates.retirement_fund, profile.employee_type, wage_base)
    else {
        return Ok(None);
    };

    let ceiling = retirement_fund_wage_ceiling(wage_base);
    let contribution =
        retirement_fund_contribution(row, ceiling).ok_or_else(|| PayrollError::MalformedRateTable {
            table: "EPF",
            rate_id: row.id,
            reason: "neither employer percentage nor employer amount is set".to_string(),
        })?;

    let employer_rate = match row.employer_rate_percentage {
        Some(pct) => format_percentage(pct),
        None => format_amount(contribution.employer),
    };

    Ok(Some(PayrollDeduction {
        kind: DeductionKind::Epf,
        employee_amount: contribution.employee,
        employer_amount: contribution.employer,
        wage_amount: wage_base,
        rate_info: RateInfo {
            rate_id: row.id,
            employee_rate: format_percentage(row.employee_rate_percentage),
            employer_rate,
            age_group: Some(profile.employee_type.as_ref().to_string()),
            wage_ceiling: Some(ceiling),
            ..RateInfo::default()
        },
    }))
}

fn social_security(
    gross_pay: Decimal,
    profile: &EmployeeProfile<'_>,
    rates: &RateTables,
) -> Option<PayrollDeduction> {
    let row = resolve_bracket_rate(&rates.social_security, gross_pay)?;
    let (employee, employer) = if profile.is_over_60() {
        (Decimal::ZERO, row.employer_rate_over_60)
    } else {
        (row.employee_rate, row.employer_rate)
    };

    Some(PayrollDeduction {
        kind: DeductionKind::Socso,
        employee_amount: employee,
        employer_amount: employer,
        wage_amount: gross_pay,
        rate_info: RateInfo {
            rate_id: row.id,
            employee_rate: format_amount(employee),
            employer_rate: format_amount(employer),
            age_group: Some(age_group(profile).to_string()),
            ..RateInfo::default()
        },
    })
}

/// Only home citizens under 60 contribute.
fn employment_insurance(
    gross_pay: Decimal,
    profile: &EmployeeProfile<'_>,
    rates: &RateTables,
) -> Option<PayrollDeduction> {
    if profile.is_over_60() || !profile.home_citizen {
        return None;
    }
    let row = resolve_bracket_rate(&rates.employment_insurance, gross_pay)?;

    Some(PayrollDeduction {
        kind: DeductionKind::Sip,
        employee_amount: row.employee_rate,
        employer_amount: row.employer_rate,
        wage_amount: gross_pay,
        rate_info: RateInfo {
            rate_id: row.id,
            employee_rate: format_amount(row.employee_rate),
            employer_rate: format_amount(row.employer_rate),
            age_group: Some(age_group(profile).to_string()),
            ..RateInfo::default()
        },
    })
}

fn income_tax(
    gross_pay: Decimal,
    profile: &EmployeeProfile<'_>,
    rates: &RateTables,
) -> Option<PayrollDeduction> {
    let row = resolve_bracket_rate(&rates.income_tax, gross_pay)?;
    let selection = resolve_income_tax_rate(row, profile.demographics);
    if selection.rate.is_zero() {
        return None;
    }

    Some(PayrollDeduction {
        kind: DeductionKind::Pcb,
        employee_amount: selection.rate,
        employer_amount: Decimal::ZERO,
        wage_amount: gross_pay,
        rate_info: RateInfo {
            rate_id: row.id,
            employee_rate: format_amount(selection.rate),
            employer_rate: format_amount(Decimal::ZERO),
            tax_category: Some(tax_category(profile.demographics)),
            rate_column: selection.column,
            ..RateInfo::default()
        },
    })
}

fn age_group(profile: &EmployeeProfile<'_>) -> &'static str {
    if profile.is_over_60() { "over_60" } else { "under_60" }
}
