use chrono::{Datelike, NaiveDate};

/// Attributes the statutory deductions depend on.
#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeDemographics {
    pub employee_id: String,
    pub birthdate: Option<NaiveDate>,
    pub nationality: Option<String>,
    pub marital_status: Option<String>,
    pub spouse_employment_status: Option<String>,
    pub number_of_children: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpouseEmployment {
    Employed,
    Unemployed,
}

impl SpouseEmployment {
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.eq_ignore_ascii_case("employed") {
            Some(SpouseEmployment::Employed)
        } else if value.eq_ignore_ascii_case("unemployed") {
            Some(SpouseEmployment::Unemployed)
        } else {
            None
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SpouseEmployment::Employed => "employed",
            SpouseEmployment::Unemployed => "unemployed",
        }
    }
}

impl EmployeeDemographics {
    pub fn is_married(&self) -> bool {
        self.marital_status
            .as_deref()
            .is_some_and(|s| s.trim().eq_ignore_ascii_case("married"))
    }

    pub fn spouse_employment(&self) -> Option<SpouseEmployment> {
        self.spouse_employment_status
            .as_deref()
            .and_then(SpouseEmployment::parse)
    }

    /// Completed years of age on `on`. `None` without a birthdate.
    pub fn age_on(&self, on: NaiveDate) -> Option<u32> {
        let birth = self.birthdate?;
        let mut years = on.year() - birth.year();
        if (on.month(), on.day()) < (birth.month(), birth.day()) {
            years -= 1;
        }
        Some(years.max(0) as u32)
    }
}
