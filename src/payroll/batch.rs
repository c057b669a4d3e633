//! Batch entry point: one payroll period, a selection of employees, one
//! database transaction.

use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use tracing::{Instrument, error, info, info_span, warn};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::model::payroll::{MonthlyPayroll, PayrollPeriod};
use crate::model::rates::RateTables;
use crate::payroll::deductions::{EmployeeProfile, calculate};
use crate::payroll::error::PayrollError;
use crate::payroll::items::{JobKind, PaySources, aggregate_items};
use crate::payroll::settlement::settle;
use crate::store::{
    DemographicsIndex, PayCodeIndex, PayrollStore, SettlementTx, StoreError, TripCounts,
    WorkLogIndex,
};

/// What a constraint violation raised while writing one employee does to
/// the rest of the batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, EnumString, Display)]
#[strum(ascii_case_insensitive)]
pub enum ConstraintPolicy {
    /// Roll back every employee of the run and fail the batch.
    #[default]
    #[strum(serialize = "abort")]
    AbortBatch,
    /// Record the violation against the employee and carry on.
    #[strum(serialize = "isolate")]
    IsolateEmployee,
}

#[derive(Debug, Clone)]
pub struct EngineSettings {
    /// Citizenship that counts as local for statutory purposes.
    pub home_citizenship: String,
    /// Jobs paid per trip instead of from work logs, upper-cased.
    pub trip_based_jobs: HashSet<String>,
    pub constraint_policy: ConstraintPolicy,
}

impl EngineSettings {
    pub fn job_kind(&self, job_type: &str) -> JobKind {
        if self.trip_based_jobs.contains(&job_type.trim().to_uppercase()) {
            JobKind::TripBased
        } else {
            JobKind::WorkLogged
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct EmployeeSelection {
    #[schema(example = "EMP-045")]
    pub employee_id: String,
    #[schema(example = "MEE_PACKING")]
    pub job_type: String,
}

#[derive(Debug, Clone)]
pub struct ProcessRequest {
    pub monthly_payroll_id: u64,
    pub selections: Vec<EmployeeSelection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct EmployeeFailure {
    pub employee_id: String,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct BatchOutcome {
    pub processed_count: usize,
    pub errors: Vec<EmployeeFailure>,
    #[schema(value_type = String, format = "date-time")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
enum BatchPhase {
    LoadingInputs,
    Processing,
    Committing,
    Done,
    Failed,
}

/// Lookups shared by every employee of a run. Read-only once loaded.
#[derive(Debug, Default)]
pub struct BatchInputs {
    pub work_logs: WorkLogIndex,
    pub trips: TripCounts,
    pub demographics: DemographicsIndex,
    pub pay_codes: PayCodeIndex,
    pub rates: RateTables,
}

impl BatchInputs {
    pub fn pay_sources(&self) -> PaySources<'_> {
        PaySources {
            work_logs: &self.work_logs,
            trips: &self.trips,
            pay_codes: &self.pay_codes,
        }
    }
}

pub struct PayrollEngine {
    store: Arc<dyn PayrollStore>,
    settings: EngineSettings,
}

impl PayrollEngine {
    pub fn new(store: Arc<dyn PayrollStore>, settings: EngineSettings) -> Self {
        Self { store, settings }
    }

    pub fn store(&self) -> &dyn PayrollStore {
        self.store.as_ref()
    }

    pub async fn process(&self, request: &ProcessRequest) -> Result<BatchOutcome, PayrollError> {
        let run_id = Uuid::new_v4();
        let span = info_span!(
            "payroll_batch",
            %run_id,
            monthly_payroll_id = request.monthly_payroll_id,
            selected = request.selections.len()
        );
        self.run(request).instrument(span).await
    }

    async fn run(&self, request: &ProcessRequest) -> Result<BatchOutcome, PayrollError> {
        let (monthly, as_of) = self.validate(request).await?;
        let period = monthly.period();

        phase(BatchPhase::LoadingInputs);
        let job_ids: Vec<String> = request
            .selections
            .iter()
            .map(|s| s.job_type.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let inputs = load_inputs(self.store.as_ref(), period, &job_ids).await?;

        phase(BatchPhase::Processing);
        let mut tx = self.store.begin().await?;
        let outcome = match self
            .settle_all(tx.as_mut(), &monthly, as_of, request, &inputs)
            .await
        {
            Ok(outcome) => outcome,
            Err(err) => {
                if let Err(rollback_err) = tx.rollback().await {
                    error!(error = %rollback_err, "Rollback after aborted batch failed");
                }
                phase(BatchPhase::Failed);
                return Err(err);
            }
        };

        phase(BatchPhase::Committing);
        if let Err(err) = tx.commit().await {
            phase(BatchPhase::Failed);
            return Err(err.into());
        }

        phase(BatchPhase::Done);
        info!(
            %period,
            processed = outcome.processed_count,
            failed = outcome.errors.len(),
            "Payroll batch committed"
        );
        Ok(outcome)
    }

    async fn validate(
        &self,
        request: &ProcessRequest,
    ) -> Result<(MonthlyPayroll, NaiveDate), PayrollError> {
        if request.selections.is_empty() {
            return Err(PayrollError::EmptySelection);
        }
        let mut seen = HashSet::with_capacity(request.selections.len());
        if let Some(dup) = request
            .selections
            .iter()
            .find(|s| !seen.insert(s.employee_id.as_str()))
        {
            return Err(PayrollError::DuplicateSelection(dup.employee_id.clone()));
        }
        let monthly = self
            .store
            .monthly_payroll(request.monthly_payroll_id)
            .await?
            .ok_or(PayrollError::PeriodNotFound(request.monthly_payroll_id))?;
        if monthly.is_finalized() {
            return Err(PayrollError::PeriodFinalized(monthly.period()));
        }
        let as_of = monthly
            .period()
            .last_day()
            .ok_or(PayrollError::PeriodNotFound(monthly.id))?;
        Ok((monthly, as_of))
    }

    /// Employees are written one after another; each under its own
    /// savepoint so a failed employee leaves no partial rows behind.
    async fn settle_all(
        &self,
        tx: &mut dyn SettlementTx,
        monthly: &MonthlyPayroll,
        as_of: NaiveDate,
        request: &ProcessRequest,
        inputs: &BatchInputs,
    ) -> Result<BatchOutcome, PayrollError> {
        let mut processed_count = 0;
        let mut errors = Vec::new();

        for selection in &request.selections {
            tx.savepoint().await?;
            match self
                .process_employee(&mut *tx, monthly.id, as_of, selection, inputs)
                .await
            {
                Ok(_) => {
                    tx.release_savepoint().await?;
                    processed_count += 1;
                }
                Err(err) => {
                    tx.rollback_to_savepoint().await?;
                    if err.is_constraint_violation()
                        && self.settings.constraint_policy == ConstraintPolicy::AbortBatch
                    {
                        error!(
                            employee_id = %selection.employee_id,
                            error = %err,
                            "Constraint violation, aborting payroll batch"
                        );
                        return Err(abort(selection, err));
                    }
                    warn!(
                        employee_id = %selection.employee_id,
                        error = %err,
                        "Employee payroll skipped"
                    );
                    errors.push(EmployeeFailure {
                        employee_id: selection.employee_id.clone(),
                        error: err.to_string(),
                    });
                }
            }
        }

        let updated_at = tx.touch_batch_timestamp(monthly.id).await?;
        Ok(BatchOutcome {
            processed_count,
            errors,
            updated_at,
        })
    }

    async fn process_employee(
        &self,
        tx: &mut dyn SettlementTx,
        monthly_payroll_id: u64,
        as_of: NaiveDate,
        selection: &EmployeeSelection,
        inputs: &BatchInputs,
    ) -> Result<u64, PayrollError> {
        let employee_id = selection.employee_id.as_str();
        let kind = self.settings.job_kind(&selection.job_type);
        let items = aggregate_items(employee_id, &selection.job_type, kind, inputs.pay_sources());

        let demographics = inputs
            .demographics
            .get(employee_id)
            .ok_or_else(|| PayrollError::MissingDemographics(employee_id.to_string()))?;
        let profile = EmployeeProfile::resolve(demographics, as_of, &self.settings.home_citizenship)?;
        let computation = calculate(&items, &profile, &inputs.rates)?;

        let id = settle(
            tx,
            monthly_payroll_id,
            employee_id,
            &selection.job_type,
            &items,
            &computation,
        )
        .await?;
        Ok(id)
    }
}

/// Every shared read is independent, so they run concurrently.
pub async fn load_inputs(
    store: &dyn PayrollStore,
    period: PayrollPeriod,
    job_ids: &[String],
) -> Result<BatchInputs, StoreError> {
    let (
        work_logs,
        trips,
        demographics,
        pay_codes,
        retirement_fund,
        social_security,
        employment_insurance,
        income_tax,
    ) = futures::try_join!(
        store.submitted_work_log_activities(period),
        store.trip_counts(period),
        store.employee_demographics(),
        store.job_pay_codes(job_ids),
        store.retirement_fund_rates(),
        store.social_security_rates(),
        store.employment_insurance_rates(),
        store.income_tax_rates(),
    )?;

    Ok(BatchInputs {
        work_logs,
        trips,
        demographics,
        pay_codes,
        rates: RateTables {
            retirement_fund,
            social_security,
            employment_insurance,
            income_tax,
        },
    })
}

fn abort(selection: &EmployeeSelection, err: PayrollError) -> PayrollError {
    match err {
        PayrollError::Store(source) => PayrollError::BatchAborted {
            employee_id: selection.employee_id.clone(),
            source,
        },
        other => other,
    }
}

fn phase(phase: BatchPhase) {
    tracing::debug!(%phase, "Payroll batch phase");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::employee::EmployeeDemographics;
    use crate::model::pay_code::{JobPayCode, PayType, RateUnit, WorkLogActivity};
    use crate::model::payroll::{DeductionKind, PayrollItem, PayrollStatus};
    use crate::model::rates::{
        EmployeeType, EmploymentInsuranceRate, IncomeTaxRate, MAX_TAX_DEPENDENTS,
        RetirementFundRate, SocialSecurityRate,
    };
    use crate::store::memory::MemoryStore;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn settings(policy: ConstraintPolicy) -> EngineSettings {
        EngineSettings {
            home_citizenship: "Malaysian".to_string(),
            trip_based_jobs: HashSet::from(["DRIVER".to_string()]),
            constraint_policy: policy,
        }
    }

    fn staff(id: &str, nationality: &str, birth_year: i32) -> EmployeeDemographics {
        EmployeeDemographics {
            employee_id: id.to_string(),
            birthdate: NaiveDate::from_ymd_opt(birth_year, 3, 1),
            nationality: Some(nationality.to_string()),
            marital_status: Some("Single".to_string()),
            spouse_employment_status: None,
            number_of_children: 0,
        }
    }

    fn hourly_log(employee_id: &str, hours: Decimal, amount: Decimal) -> WorkLogActivity {
        WorkLogActivity {
            work_log_id: 501,
            employee_id: employee_id.to_string(),
            job_id: "PACKER".to_string(),
            pay_code_id: Some("PACK_HOUR".to_string()),
            description: "Packing".to_string(),
            pay_type: PayType::Base,
            rate_unit: RateUnit::Hour,
            rate: dec!(10.00),
            hours_applied: Some(hours),
            calculated_amount: amount,
        }
    }

    fn rate_tables() -> RateTables {
        RateTables {
            retirement_fund: vec![RetirementFundRate {
                id: 1,
                employee_type: EmployeeType::LocalUnder60,
                wage_threshold: None,
                employee_rate_percentage: dec!(11),
                employer_rate_percentage: Some(dec!(13)),
                employer_amount: None,
            }],
            social_security: vec![SocialSecurityRate {
                id: 2,
                wage_from: dec!(0),
                wage_to: dec!(6000),
                employee_rate: dec!(7.75),
                employer_rate: dec!(27.15),
                employer_rate_over_60: dec!(19.40),
            }],
            employment_insurance: vec![EmploymentInsuranceRate {
                id: 3,
                wage_from: dec!(0),
                wage_to: dec!(6000),
                employee_rate: dec!(3.10),
                employer_rate: dec!(3.10),
            }],
            income_tax: vec![IncomeTaxRate {
                id: 4,
                wage_from: dec!(1500),
                wage_to: dec!(1700),
                base_rate: dec!(12.00),
                employed_spouse: [None; MAX_TAX_DEPENDENTS + 1],
                unemployed_spouse: [None; MAX_TAX_DEPENDENTS + 1],
            }],
        }
    }

    /// Two packers on work logs and one driver on trips, for September 2026.
    fn store() -> (Arc<MemoryStore>, u64) {
        let mut store = MemoryStore::default();
        store.rates = rate_tables();
        store.work_logs.insert(
            "EMP-A".to_string(),
            vec![hourly_log("EMP-A", dec!(160), dec!(1600.00))],
        );
        store.work_logs.insert(
            "EMP-B".to_string(),
            vec![hourly_log("EMP-B", dec!(100), dec!(1000.00))],
        );
        store.trips.insert("EMP-D".to_string(), 12);
        store.pay_codes.insert(
            "DRIVER".to_string(),
            vec![JobPayCode {
                job_id: "DRIVER".to_string(),
                pay_code_id: "TRIP".to_string(),
                description: "Trip".to_string(),
                pay_type: PayType::Tambahan,
                rate_unit: RateUnit::Trip,
                default_rate: dec!(50.00),
                override_rate: None,
            }],
        );
        for person in [
            staff("EMP-A", "Malaysian", 1981),
            staff("EMP-B", "Malaysian", 1990),
            staff("EMP-D", "Malaysian", 1975),
        ] {
            store.demographics.insert(person.employee_id.clone(), person);
        }
        let id = store.add_monthly_payroll(2026, 9, PayrollStatus::Processing);
        (Arc::new(store), id)
    }

    fn engine(store: &Arc<MemoryStore>, policy: ConstraintPolicy) -> PayrollEngine {
        let shared: Arc<dyn PayrollStore> = store.clone();
        PayrollEngine::new(shared, settings(policy))
    }

    fn select(pairs: &[(&str, &str)]) -> Vec<EmployeeSelection> {
        pairs
            .iter()
            .map(|(employee_id, job_type)| EmployeeSelection {
                employee_id: employee_id.to_string(),
                job_type: job_type.to_string(),
            })
            .collect()
    }

    fn request(id: u64, pairs: &[(&str, &str)]) -> ProcessRequest {
        ProcessRequest {
            monthly_payroll_id: id,
            selections: select(pairs),
        }
    }

    #[actix_web::test]
    async fn processes_work_logged_employee_end_to_end() {
        let (store, id) = store();
        let engine = engine(&store, ConstraintPolicy::AbortBatch);

        let outcome = engine.process(&request(id, &[("EMP-A", "PACKER")])).await.unwrap();
        assert_eq!(outcome.processed_count, 1);
        assert!(outcome.errors.is_empty());

        let tables = store.tables();
        let payroll = &tables.employee_payrolls[0];
        assert_eq!(payroll.gross_pay, dec!(1600.00));
        // 1600 - (176 EPF + 7.75 SOCSO + 3.10 SIP + 12.00 PCB)
        assert_eq!(payroll.net_pay, dec!(1401.15));

        let kinds: Vec<DeductionKind> = tables.deductions.iter().map(|(_, d)| d.kind).collect();
        assert_eq!(
            kinds,
            vec![DeductionKind::Epf, DeductionKind::Socso, DeductionKind::Sip, DeductionKind::Pcb]
        );
        assert_eq!(tables.monthly[0].updated_at, outcome.updated_at);
    }

    #[actix_web::test]
    async fn trip_based_driver_gets_single_trip_item() {
        let (store, id) = store();
        let engine = engine(&store, ConstraintPolicy::AbortBatch);

        engine.process(&request(id, &[("EMP-D", "DRIVER")])).await.unwrap();

        let items = store.items_of("EMP-D");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, dec!(12));
        assert_eq!(items[0].amount, dec!(600.00));
    }

    #[actix_web::test]
    async fn reprocessing_replaces_rather_than_appends() {
        let (store, id) = store();
        let engine = engine(&store, ConstraintPolicy::AbortBatch);
        let req = request(id, &[("EMP-A", "PACKER"), ("EMP-B", "PACKER")]);

        engine.process(&req).await.unwrap();
        let first = store.tables().clone();
        engine.process(&req).await.unwrap();
        let second = store.tables().clone();

        assert_eq!(second.employee_payrolls.len(), 2);
        assert_eq!(first.items, second.items);
        assert_eq!(first.deductions, second.deductions);
        for (a, b) in first.employee_payrolls.iter().zip(&second.employee_payrolls) {
            assert_eq!((a.id, a.gross_pay, a.net_pay), (b.id, b.gross_pay, b.net_pay));
        }
    }

    #[actix_web::test]
    async fn manual_items_survive_reprocessing() {
        let (store, id) = store();
        let manual = PayrollItem {
            pay_code_id: "BONUS".to_string(),
            description: "Festive bonus".to_string(),
            pay_type: PayType::Tambahan,
            rate: dec!(300.00),
            rate_unit: RateUnit::Fixed,
            quantity: dec!(1),
            amount: dec!(300.00),
            is_manual: true,
            job_type: "PACKER".to_string(),
            source_employee_id: "EMP-A".to_string(),
            work_log_id: None,
        };
        let stale = PayrollItem {
            is_manual: false,
            pay_code_id: "OLD".to_string(),
            ..manual.clone()
        };
        store.seed_employee_payroll(id, "EMP-A", vec![manual.clone(), stale]);

        let engine = engine(&store, ConstraintPolicy::AbortBatch);
        engine.process(&request(id, &[("EMP-A", "PACKER")])).await.unwrap();

        let items = store.items_of("EMP-A");
        assert_eq!(items.len(), 2);
        assert!(items.contains(&manual));
        assert!(items.iter().any(|i| i.pay_code_id == "PACK_HOUR" && !i.is_manual));
        assert!(!items.iter().any(|i| i.pay_code_id == "OLD"));
        assert_eq!(store.tables().employee_payrolls.len(), 1);
    }

    #[actix_web::test]
    async fn missing_staff_record_is_recorded_and_batch_continues() {
        let (store, id) = store();
        let engine = engine(&store, ConstraintPolicy::AbortBatch);

        let outcome = engine
            .process(&request(id, &[("EMP-X", "PACKER"), ("EMP-A", "PACKER")]))
            .await
            .unwrap();

        assert_eq!(outcome.processed_count, 1);
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].employee_id, "EMP-X");
        assert!(outcome.errors[0].error.contains("EMP-X"));
        assert_eq!(store.tables().employee_payrolls.len(), 1);
    }

    #[actix_web::test]
    async fn constraint_violation_aborts_whole_batch_by_default() {
        let (store, id) = store();
        let mut raw = Arc::try_unwrap(store).ok().unwrap();
        raw.known_employees = HashSet::from(["EMP-A".to_string(), "EMP-B".to_string()]);
        raw.demographics.insert("EMP-Z".to_string(), staff("EMP-Z", "Malaysian", 1980));
        let store = Arc::new(raw);
        let engine = engine(&store, ConstraintPolicy::AbortBatch);

        let err = engine
            .process(&request(id, &[("EMP-A", "PACKER"), ("EMP-Z", "PACKER"), ("EMP-B", "PACKER")]))
            .await
            .unwrap_err();

        assert!(matches!(&err, PayrollError::BatchAborted { employee_id, .. } if employee_id == "EMP-Z"));
        assert!(err.is_constraint_violation());
        assert!(store.tables().employee_payrolls.is_empty());
    }

    #[actix_web::test]
    async fn isolate_policy_records_constraint_violation_per_employee() {
        let (store, id) = store();
        let mut raw = Arc::try_unwrap(store).ok().unwrap();
        raw.known_employees = HashSet::from(["EMP-A".to_string(), "EMP-B".to_string()]);
        raw.demographics.insert("EMP-Z".to_string(), staff("EMP-Z", "Malaysian", 1980));
        let store = Arc::new(raw);
        let engine = engine(&store, ConstraintPolicy::IsolateEmployee);

        let outcome = engine
            .process(&request(id, &[("EMP-A", "PACKER"), ("EMP-Z", "PACKER"), ("EMP-B", "PACKER")]))
            .await
            .unwrap();

        assert_eq!(outcome.processed_count, 2);
        assert_eq!(outcome.errors[0].employee_id, "EMP-Z");
        assert_eq!(store.tables().employee_payrolls.len(), 2);
    }

    #[actix_web::test]
    async fn failed_employee_keeps_prior_payroll_untouched() {
        let (store, id) = store();
        let mut raw = Arc::try_unwrap(store).ok().unwrap();
        raw.failing_deductions = HashSet::from(["EMP-A".to_string()]);
        let store = Arc::new(raw);
        let prior = PayrollItem {
            pay_code_id: "OLD".to_string(),
            description: "Previous run".to_string(),
            pay_type: PayType::Base,
            rate: dec!(900.00),
            rate_unit: RateUnit::Month,
            quantity: dec!(1),
            amount: dec!(900.00),
            is_manual: false,
            job_type: "PACKER".to_string(),
            source_employee_id: "EMP-A".to_string(),
            work_log_id: None,
        };
        let seeded = store.seed_employee_payroll(id, "EMP-A", vec![prior.clone()]);
        let engine = engine(&store, ConstraintPolicy::IsolateEmployee);

        let outcome = engine
            .process(&request(id, &[("EMP-A", "PACKER"), ("EMP-B", "PACKER")]))
            .await
            .unwrap();

        assert_eq!(outcome.processed_count, 1);
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].employee_id, "EMP-A");

        // Header update and item replacement for EMP-A were rolled back.
        assert_eq!(store.items_of("EMP-A"), vec![prior]);
        let tables = store.tables();
        let a = tables.employee_payrolls.iter().find(|p| p.id == seeded).unwrap();
        assert_eq!(a.job_type, "SEEDED");
        assert_eq!(a.gross_pay, dec!(900.00));
        assert!(!tables.deductions.iter().any(|(owner, _)| *owner == seeded));

        let b = tables
            .employee_payrolls
            .iter()
            .find(|p| p.employee_id == "EMP-B")
            .unwrap();
        assert_eq!(b.gross_pay, dec!(1000.00));
        assert!(tables.deductions.iter().any(|(owner, _)| *owner == b.id));
    }

    #[actix_web::test]
    async fn duplicate_selection_is_rejected() {
        let (store, id) = store();
        let engine = engine(&store, ConstraintPolicy::AbortBatch);

        let err = engine
            .process(&request(id, &[("EMP-A", "PACKER"), ("EMP-B", "PACKER"), ("EMP-A", "PACKER")]))
            .await
            .unwrap_err();

        assert!(matches!(&err, PayrollError::DuplicateSelection(employee_id) if employee_id == "EMP-A"));
        assert!(err.is_validation());
        assert!(store.tables().employee_payrolls.is_empty());
    }

    #[actix_web::test]
    async fn rejects_bad_input_before_writing() {
        let (store, id) = store();
        let engine = engine(&store, ConstraintPolicy::AbortBatch);

        let empty = engine.process(&request(id, &[])).await.unwrap_err();
        assert!(matches!(empty, PayrollError::EmptySelection));
        assert!(empty.is_validation());

        let missing = engine.process(&request(999, &[("EMP-A", "PACKER")])).await.unwrap_err();
        assert!(matches!(missing, PayrollError::PeriodNotFound(999)));

        store.finalize_monthly_payroll(id).await.unwrap();
        let finalized = engine.process(&request(id, &[("EMP-A", "PACKER")])).await.unwrap_err();
        assert!(matches!(finalized, PayrollError::PeriodFinalized(_)));

        assert!(store.tables().employee_payrolls.is_empty());
    }

    #[test]
    fn job_kind_and_policy_parsing() {
        let settings = settings(ConstraintPolicy::AbortBatch);
        assert_eq!(settings.job_kind(" Driver "), JobKind::TripBased);
        assert_eq!(settings.job_kind("PACKER"), JobKind::WorkLogged);

        assert_eq!("ISOLATE".parse::<ConstraintPolicy>().unwrap(), ConstraintPolicy::IsolateEmployee);
        assert_eq!("abort".parse::<ConstraintPolicy>().unwrap(), ConstraintPolicy::AbortBatch);
    }
}
