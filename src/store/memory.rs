//! In-memory store used by the engine tests.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::model::payroll::{
    EmployeePayroll, EmployeePayrollDetail, MonthlyPayroll, PayrollDeduction, PayrollHeader,
    PayrollItem, PayrollPeriod, PayrollStatus,
};
use crate::model::rates::{
    EmploymentInsuranceRate, IncomeTaxRate, RateTables, RetirementFundRate, SocialSecurityRate,
};
use crate::store::{
    DemographicsIndex, PayCodeIndex, PayrollSource, PayrollStore, SettlementTx, StoreError,
    TripCounts, WorkLogIndex,
};

#[derive(Debug, Clone, Default)]
pub struct Tables {
    pub monthly: Vec<MonthlyPayroll>,
    pub employee_payrolls: Vec<EmployeePayroll>,
    pub items: Vec<(u64, PayrollItem)>,
    pub deductions: Vec<(u64, PayrollDeduction)>,
    next_id: u64,
}

impl Tables {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

/// Source data plus committed tables. Writes go through a `MemoryTx` and
/// only land in `committed` on commit.
#[derive(Default)]
pub struct MemoryStore {
    pub work_logs: WorkLogIndex,
    pub trips: TripCounts,
    pub demographics: DemographicsIndex,
    pub pay_codes: PayCodeIndex,
    pub rates: RateTables,
    /// Employees the payroll table may reference. Empty means unchecked.
    pub known_employees: HashSet<String>,
    /// Employees whose deduction write fails, after header and items landed.
    pub failing_deductions: HashSet<String>,
    committed: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn tables(&self) -> MutexGuard<'_, Tables> {
        lock(&self.committed)
    }

    pub fn add_monthly_payroll(&self, year: i32, month: u32, status: PayrollStatus) -> u64 {
        self.insert_monthly(year, month, status).id
    }

    fn insert_monthly(&self, year: i32, month: u32, status: PayrollStatus) -> MonthlyPayroll {
        let mut tables = self.tables();
        let now = Utc::now();
        let monthly = MonthlyPayroll {
            id: tables.next_id(),
            year,
            month,
            status,
            created_at: now,
            updated_at: now,
        };
        tables.monthly.push(monthly.clone());
        monthly
    }

    /// Seeds an existing employee payroll, as left behind by an earlier run.
    pub fn seed_employee_payroll(
        &self,
        monthly_payroll_id: u64,
        employee_id: &str,
        items: Vec<PayrollItem>,
    ) -> u64 {
        let mut tables = self.tables();
        let id = tables.next_id();
        let gross_pay = items.iter().map(|i| i.amount).sum();
        tables.employee_payrolls.push(EmployeePayroll {
            id,
            monthly_payroll_id,
            employee_id: employee_id.to_string(),
            job_type: "SEEDED".to_string(),
            gross_pay,
            net_pay: gross_pay,
        });
        tables.items.extend(items.into_iter().map(|i| (id, i)));
        id
    }

    pub fn items_of(&self, employee_id: &str) -> Vec<PayrollItem> {
        let tables = self.tables();
        let Some(payroll) = tables
            .employee_payrolls
            .iter()
            .find(|p| p.employee_id == employee_id)
        else {
            return Vec::new();
        };
        tables
            .items
            .iter()
            .filter(|(owner, _)| *owner == payroll.id)
            .map(|(_, item)| item.clone())
            .collect()
    }
}

fn lock(tables: &Mutex<Tables>) -> MutexGuard<'_, Tables> {
    tables.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl PayrollSource for MemoryStore {
    async fn monthly_payroll(&self, id: u64) -> Result<Option<MonthlyPayroll>, StoreError> {
        Ok(self.tables().monthly.iter().find(|m| m.id == id).cloned())
    }

    async fn submitted_work_log_activities(
        &self,
        _period: PayrollPeriod,
    ) -> Result<WorkLogIndex, StoreError> {
        Ok(self.work_logs.clone())
    }

    async fn trip_counts(&self, _period: PayrollPeriod) -> Result<TripCounts, StoreError> {
        Ok(self.trips.clone())
    }

    async fn employee_demographics(&self) -> Result<DemographicsIndex, StoreError> {
        Ok(self.demographics.clone())
    }

    async fn job_pay_codes(&self, job_ids: &[String]) -> Result<PayCodeIndex, StoreError> {
        Ok(self
            .pay_codes
            .iter()
            .filter(|(job, _)| job_ids.contains(*job))
            .map(|(job, codes)| (job.clone(), codes.clone()))
            .collect())
    }

    async fn retirement_fund_rates(&self) -> Result<Vec<RetirementFundRate>, StoreError> {
        Ok(self.rates.retirement_fund.clone())
    }

    async fn social_security_rates(&self) -> Result<Vec<SocialSecurityRate>, StoreError> {
        Ok(self.rates.social_security.clone())
    }

    async fn employment_insurance_rates(
        &self,
    ) -> Result<Vec<EmploymentInsuranceRate>, StoreError> {
        Ok(self.rates.employment_insurance.clone())
    }

    async fn income_tax_rates(&self) -> Result<Vec<IncomeTaxRate>, StoreError> {
        Ok(self.rates.income_tax.clone())
    }
}

#[async_trait]
impl PayrollStore for MemoryStore {
    async fn begin(&self) -> Result<Box<dyn SettlementTx>, StoreError> {
        let working = self.tables().clone();
        Ok(Box::new(MemoryTx {
            committed: Arc::clone(&self.committed),
            known_employees: self.known_employees.clone(),
            failing_deductions: self.failing_deductions.clone(),
            working: Some(working),
            savepoint: None,
        }))
    }

    async fn get_or_create_monthly_payroll(
        &self,
        period: PayrollPeriod,
    ) -> Result<MonthlyPayroll, StoreError> {
        let existing = self
            .tables()
            .monthly
            .iter()
            .find(|m| m.period() == period)
            .cloned();
        if let Some(monthly) = existing {
            return Ok(monthly);
        }
        Ok(self.insert_monthly(period.year, period.month, PayrollStatus::Processing))
    }

    async fn finalize_monthly_payroll(
        &self,
        id: u64,
    ) -> Result<Option<MonthlyPayroll>, StoreError> {
        let mut tables = self.tables();
        Ok(tables.monthly.iter_mut().find(|m| m.id == id).map(|m| {
            m.status = PayrollStatus::Finalized;
            m.updated_at = Utc::now();
            m.clone()
        }))
    }

    async fn employee_payrolls(
        &self,
        monthly_payroll_id: u64,
    ) -> Result<Vec<EmployeePayroll>, StoreError> {
        Ok(self
            .tables()
            .employee_payrolls
            .iter()
            .filter(|p| p.monthly_payroll_id == monthly_payroll_id)
            .cloned()
            .collect())
    }

    async fn employee_payroll_detail(
        &self,
        employee_payroll_id: u64,
    ) -> Result<Option<EmployeePayrollDetail>, StoreError> {
        let tables = self.tables();
        let Some(payroll) = tables
            .employee_payrolls
            .iter()
            .find(|p| p.id == employee_payroll_id)
            .cloned()
        else {
            return Ok(None);
        };
        let items = tables
            .items
            .iter()
            .filter(|(owner, _)| *owner == payroll.id)
            .map(|(_, i)| i.clone())
            .collect();
        let deductions = tables
            .deductions
            .iter()
            .filter(|(owner, _)| *owner == payroll.id)
            .map(|(_, d)| d.clone())
            .collect();
        Ok(Some(EmployeePayrollDetail {
            payroll,
            items,
            deductions,
        }))
    }
}

pub struct MemoryTx {
    committed: Arc<Mutex<Tables>>,
    known_employees: HashSet<String>,
    failing_deductions: HashSet<String>,
    working: Option<Tables>,
    savepoint: Option<Tables>,
}

impl MemoryTx {
    fn working(&mut self) -> Result<&mut Tables, StoreError> {
        self.working.as_mut().ok_or(StoreError::TransactionClosed)
    }
}

#[async_trait]
impl SettlementTx for MemoryTx {
    async fn savepoint(&mut self) -> Result<(), StoreError> {
        let snapshot = self.working()?.clone();
        self.savepoint = Some(snapshot);
        Ok(())
    }

    async fn release_savepoint(&mut self) -> Result<(), StoreError> {
        self.savepoint = None;
        Ok(())
    }

    async fn rollback_to_savepoint(&mut self) -> Result<(), StoreError> {
        if let Some(snapshot) = self.savepoint.take() {
            *self.working()? = snapshot;
        }
        Ok(())
    }

    async fn upsert_employee_payroll(
        &mut self,
        monthly_payroll_id: u64,
        employee_id: &str,
        header: &PayrollHeader,
    ) -> Result<u64, StoreError> {
        if !self.known_employees.is_empty() && !self.known_employees.contains(employee_id) {
            return Err(StoreError::Constraint {
                code: "23000".to_string(),
                message: format!("unknown employee {employee_id}"),
            });
        }
        let tables = self.working()?;
        if let Some(existing) = tables
            .employee_payrolls
            .iter_mut()
            .find(|p| p.monthly_payroll_id == monthly_payroll_id && p.employee_id == employee_id)
        {
            existing.job_type = header.job_type.clone();
            existing.gross_pay = header.gross_pay;
            existing.net_pay = header.net_pay;
            return Ok(existing.id);
        }
        let id = tables.next_id();
        tables.employee_payrolls.push(EmployeePayroll {
            id,
            monthly_payroll_id,
            employee_id: employee_id.to_string(),
            job_type: header.job_type.clone(),
            gross_pay: header.gross_pay,
            net_pay: header.net_pay,
        });
        Ok(id)
    }

    async fn replace_non_manual_items(
        &mut self,
        employee_payroll_id: u64,
        items: &[PayrollItem],
    ) -> Result<(), StoreError> {
        let tables = self.working()?;
        tables
            .items
            .retain(|(owner, item)| *owner != employee_payroll_id || item.is_manual);
        tables
            .items
            .extend(items.iter().map(|i| (employee_payroll_id, i.clone())));
        Ok(())
    }

    async fn replace_deductions(
        &mut self,
        employee_payroll_id: u64,
        deductions: &[PayrollDeduction],
    ) -> Result<(), StoreError> {
        let failing = &self.failing_deductions;
        let tables = self.working.as_mut().ok_or(StoreError::TransactionClosed)?;
        let header = tables
            .employee_payrolls
            .iter()
            .find(|p| p.id == employee_payroll_id);
        if let Some(payroll) = header.filter(|p| failing.contains(&p.employee_id)) {
            return Err(StoreError::Database(sqlx::Error::Protocol(format!(
                "deduction write failed for {}",
                payroll.employee_id
            ))));
        }
        tables
            .deductions
            .retain(|(owner, _)| *owner != employee_payroll_id);
        tables
            .deductions
            .extend(deductions.iter().map(|d| (employee_payroll_id, d.clone())));
        Ok(())
    }

    async fn touch_batch_timestamp(
        &mut self,
        monthly_payroll_id: u64,
    ) -> Result<DateTime<Utc>, StoreError> {
        let now = Utc::now();
        let tables = self.working()?;
        if let Some(monthly) = tables.monthly.iter_mut().find(|m| m.id == monthly_payroll_id) {
            monthly.updated_at = now;
        }
        Ok(now)
    }

    async fn commit(&mut self) -> Result<(), StoreError> {
        let working = self.working.take().ok_or(StoreError::TransactionClosed)?;
        *lock(&self.committed) = working;
        Ok(())
    }

    async fn rollback(&mut self) -> Result<(), StoreError> {
        self.working = None;
        self.savepoint = None;
        Ok(())
    }
}
