//! MySQL-backed store.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, SubsecRound, Utc};
use rust_decimal::Decimal;
use sqlx::mysql::MySqlRow;
use sqlx::types::Json;
use sqlx::{FromRow, MySql, MySqlConnection, MySqlPool, Row, Transaction};
use tracing::debug;

use crate::model::employee::EmployeeDemographics;
use crate::model::pay_code::{JobPayCode, PayType, RateUnit, WorkLogActivity};
use crate::model::payroll::{
    DeductionKind, EmployeePayroll, EmployeePayrollDetail, MonthlyPayroll, PayrollDeduction,
    PayrollHeader, PayrollItem, PayrollPeriod, PayrollStatus, RateInfo,
};
use crate::model::rates::{
    EmploymentInsuranceRate, IncomeTaxRate, MAX_TAX_DEPENDENTS, RetirementFundRate,
    SocialSecurityRate,
};
use crate::store::{
    DemographicsIndex, PayCodeIndex, PayrollSource, PayrollStore, SettlementTx, StoreError,
    TripCounts, WorkLogIndex,
};
use crate::utils::db_utils::{SqlValue, build_insert_sql, execute_insert};

const EMPLOYEE_SAVEPOINT: &str = "employee_step";

#[derive(Clone)]
pub struct MySqlPayrollStore {
    pool: MySqlPool,
}

impl MySqlPayrollStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct MonthlyPayrollRow {
    id: u64,
    year: i32,
    month: i32,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<MonthlyPayrollRow> for MonthlyPayroll {
    type Error = StoreError;

    fn try_from(row: MonthlyPayrollRow) -> Result<Self, Self::Error> {
        Ok(MonthlyPayroll {
            id: row.id,
            year: row.year,
            month: u32::try_from(row.month).map_err(|e| StoreError::decode("month", e))?,
            status: row
                .status
                .parse::<PayrollStatus>()
                .map_err(|e| StoreError::decode("status", e))?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(FromRow)]
struct ActivityRow {
    work_log_id: u64,
    employee_id: String,
    job_id: String,
    pay_code_id: Option<String>,
    description: Option<String>,
    pay_type: Option<String>,
    rate_unit: Option<String>,
    rate: Decimal,
    hours_applied: Option<Decimal>,
    calculated_amount: Decimal,
}

impl TryFrom<ActivityRow> for WorkLogActivity {
    type Error = StoreError;

    fn try_from(row: ActivityRow) -> Result<Self, Self::Error> {
        // An activity whose pay code no longer exists is unresolved.
        let pay_code_id = row.pay_code_id.filter(|_| row.pay_type.is_some());
        let pay_type = match row.pay_type.as_deref() {
            Some(raw) => parse_pay_type(raw)?,
            None => PayType::Base,
        };
        Ok(WorkLogActivity {
            work_log_id: row.work_log_id,
            employee_id: row.employee_id,
            job_id: row.job_id,
            pay_code_id,
            description: row.description.unwrap_or_default(),
            pay_type,
            rate_unit: RateUnit::from(row.rate_unit.unwrap_or_default()),
            rate: row.rate,
            hours_applied: row.hours_applied,
            calculated_amount: row.calculated_amount,
        })
    }
}

#[derive(FromRow)]
struct DemographicsRow {
    id: String,
    birthdate: Option<NaiveDate>,
    nationality: Option<String>,
    marital_status: Option<String>,
    spouse_employment_status: Option<String>,
    number_of_children: Option<i32>,
}

#[derive(FromRow)]
struct JobPayCodeRow {
    job_id: String,
    pay_code_id: String,
    description: String,
    pay_type: String,
    rate_unit: String,
    default_rate: Decimal,
    override_rate: Option<Decimal>,
}

#[derive(FromRow)]
struct EmployeePayrollRow {
    id: u64,
    monthly_payroll_id: u64,
    employee_id: String,
    job_type: String,
    gross_pay: Decimal,
    net_pay: Decimal,
}

impl From<EmployeePayrollRow> for EmployeePayroll {
    fn from(row: EmployeePayrollRow) -> Self {
        EmployeePayroll {
            id: row.id,
            monthly_payroll_id: row.monthly_payroll_id,
            employee_id: row.employee_id,
            job_type: row.job_type,
            gross_pay: row.gross_pay,
            net_pay: row.net_pay,
        }
    }
}

#[derive(FromRow)]
struct PayrollItemRow {
    pay_code_id: String,
    description: String,
    pay_type: String,
    rate: Decimal,
    rate_unit: String,
    quantity: Decimal,
    amount: Decimal,
    is_manual: bool,
    job_type: Option<String>,
    source_employee_id: Option<String>,
    work_log_id: Option<u64>,
}

#[derive(FromRow)]
struct DeductionRow {
    deduction_type: String,
    employee_amount: Decimal,
    employer_amount: Decimal,
    wage_amount: Decimal,
    rate_info: Json<RateInfo>,
}

impl<'r> FromRow<'r, MySqlRow> for RetirementFundRate {
    fn from_row(row: &'r MySqlRow) -> Result<Self, sqlx::Error> {
        let employee_type: String = row.try_get("employee_type")?;
        Ok(RetirementFundRate {
            id: row.try_get("id")?,
            employee_type: employee_type
                .parse()
                .map_err(|e| column_decode("employee_type", e))?,
            wage_threshold: row.try_get("wage_threshold")?,
            employee_rate_percentage: row.try_get("employee_rate_percentage")?,
            employer_rate_percentage: row.try_get("employer_rate_percentage")?,
            employer_amount: row.try_get("employer_amount")?,
        })
    }
}

/// Spouse columns are read by name: `employed_spouse_k0` ..= `_k10` and
/// the `unemployed_` counterparts.
impl<'r> FromRow<'r, MySqlRow> for IncomeTaxRate {
    fn from_row(row: &'r MySqlRow) -> Result<Self, sqlx::Error> {
        let mut employed_spouse = [None; MAX_TAX_DEPENDENTS + 1];
        let mut unemployed_spouse = [None; MAX_TAX_DEPENDENTS + 1];
        for k in 0..=MAX_TAX_DEPENDENTS {
            employed_spouse[k] = row.try_get(IncomeTaxRate::column_name(true, k).as_str())?;
            unemployed_spouse[k] = row.try_get(IncomeTaxRate::column_name(false, k).as_str())?;
        }
        Ok(IncomeTaxRate {
            id: row.try_get("id")?,
            wage_from: row.try_get("wage_from")?,
            wage_to: row.try_get("wage_to")?,
            base_rate: row.try_get("base_rate")?,
            employed_spouse,
            unemployed_spouse,
        })
    }
}

fn column_decode(column: &str, err: impl std::error::Error + Send + Sync + 'static) -> sqlx::Error {
    sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(err),
    }
}

fn parse_pay_type(raw: &str) -> Result<PayType, StoreError> {
    raw.parse::<PayType>()
        .map_err(|e| StoreError::decode("pay_type", format!("{raw}: {e}")))
}

fn item_from_row(row: PayrollItemRow, employee_id: &str) -> Result<PayrollItem, StoreError> {
    Ok(PayrollItem {
        pay_type: parse_pay_type(&row.pay_type)?,
        pay_code_id: row.pay_code_id,
        description: row.description,
        rate: row.rate,
        rate_unit: RateUnit::from(row.rate_unit),
        quantity: row.quantity,
        amount: row.amount,
        is_manual: row.is_manual,
        job_type: row.job_type.unwrap_or_default(),
        source_employee_id: row
            .source_employee_id
            .unwrap_or_else(|| employee_id.to_string()),
        work_log_id: row.work_log_id,
    })
}

fn deduction_from_row(row: DeductionRow) -> Result<PayrollDeduction, StoreError> {
    Ok(PayrollDeduction {
        kind: row
            .deduction_type
            .parse::<DeductionKind>()
            .map_err(|e| StoreError::decode("deduction_type", e))?,
        employee_amount: row.employee_amount,
        employer_amount: row.employer_amount,
        wage_amount: row.wage_amount,
        rate_info: row.rate_info.0,
    })
}

/// `DATETIME` columns keep whole seconds; returning the same value keeps the
/// reported batch timestamp equal to the stored one.
fn stored_timestamp(now: DateTime<Utc>) -> DateTime<Utc> {
    now.trunc_subsecs(0)
}

const MONTHLY_PAYROLL_COLUMNS: &str = "id, year, month, status, created_at, updated_at";

#[async_trait]
impl PayrollSource for MySqlPayrollStore {
    async fn monthly_payroll(&self, id: u64) -> Result<Option<MonthlyPayroll>, StoreError> {
        let row = sqlx::query_as::<_, MonthlyPayrollRow>(&format!(
            "SELECT {MONTHLY_PAYROLL_COLUMNS} FROM monthly_payrolls WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(MonthlyPayroll::try_from).transpose()
    }

    async fn submitted_work_log_activities(
        &self,
        period: PayrollPeriod,
    ) -> Result<WorkLogIndex, StoreError> {
        let rows = sqlx::query_as::<_, ActivityRow>(
            r#"
            SELECT mwl.id AS work_log_id,
                   mwle.employee_id,
                   mwle.job_id,
                   mwla.pay_code_id,
                   pc.description,
                   pc.pay_type,
                   pc.rate_unit,
                   COALESCE(mwla.rate_used, pc.rate_biasa, 0) AS rate,
                   mwla.hours_applied,
                   mwla.calculated_amount
            FROM monthly_work_logs mwl
            JOIN monthly_work_log_entries mwle ON mwle.monthly_log_id = mwl.id
            JOIN monthly_work_log_activities mwla ON mwla.monthly_entry_id = mwle.id
            LEFT JOIN pay_codes pc ON pc.id = mwla.pay_code_id
            WHERE mwl.log_year = ?
              AND mwl.log_month = ?
              AND mwl.status = 'Submitted'
              AND mwla.is_selected = 1
            ORDER BY mwle.employee_id, mwla.id
            "#,
        )
        .bind(period.year)
        .bind(period.month)
        .fetch_all(&self.pool)
        .await?;

        let mut index = WorkLogIndex::new();
        for row in rows {
            let activity = WorkLogActivity::try_from(row)?;
            index
                .entry(activity.employee_id.clone())
                .or_default()
                .push(activity);
        }
        debug!(%period, employees = index.len(), "Loaded submitted work logs");
        Ok(index)
    }

    async fn trip_counts(&self, period: PayrollPeriod) -> Result<TripCounts, StoreError> {
        let rows = sqlx::query_as::<_, (String, i64)>(
            r#"
            SELECT driver_id, CAST(COALESCE(SUM(trip_count), 0) AS SIGNED) AS trips
            FROM driver_trips
            WHERE year = ? AND month = ?
            GROUP BY driver_id
            "#,
        )
        .bind(period.year)
        .bind(period.month)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|(driver_id, trips)| {
                let trips = u32::try_from(trips).map_err(|e| StoreError::decode("trip_count", e))?;
                Ok((driver_id, trips))
            })
            .collect()
    }

    async fn employee_demographics(&self) -> Result<DemographicsIndex, StoreError> {
        let rows = sqlx::query_as::<_, DemographicsRow>(
            r#"
            SELECT id, birthdate, nationality, marital_status,
                   spouse_employment_status, number_of_children
            FROM staffs
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let demographics = EmployeeDemographics {
                    employee_id: row.id.clone(),
                    birthdate: row.birthdate,
                    nationality: row.nationality,
                    marital_status: row.marital_status,
                    spouse_employment_status: row.spouse_employment_status,
                    number_of_children: row.number_of_children.unwrap_or(0).max(0) as u32,
                };
                (row.id, demographics)
            })
            .collect())
    }

    async fn job_pay_codes(&self, job_ids: &[String]) -> Result<PayCodeIndex, StoreError> {
        if job_ids.is_empty() {
            return Ok(PayCodeIndex::new());
        }

        let placeholders = vec!["?"; job_ids.len()].join(", ");
        let sql = format!(
            r#"
            SELECT jpc.job_id, jpc.pay_code_id, pc.description, pc.pay_type, pc.rate_unit,
                   pc.rate_biasa AS default_rate, jpc.override_rate
            FROM job_pay_codes jpc
            JOIN pay_codes pc ON pc.id = jpc.pay_code_id
            WHERE jpc.job_id IN ({placeholders})
            ORDER BY jpc.job_id, jpc.pay_code_id
            "#
        );
        let mut query = sqlx::query_as::<_, JobPayCodeRow>(&sql);
        for job_id in job_ids {
            query = query.bind(job_id);
        }
        let rows = query.fetch_all(&self.pool).await?;

        let mut index: PayCodeIndex = HashMap::new();
        for row in rows {
            let code = JobPayCode {
                pay_type: parse_pay_type(&row.pay_type)?,
                job_id: row.job_id,
                pay_code_id: row.pay_code_id,
                description: row.description,
                rate_unit: RateUnit::from(row.rate_unit),
                default_rate: row.default_rate,
                override_rate: row.override_rate,
            };
            index.entry(code.job_id.clone()).or_default().push(code);
        }
        Ok(index)
    }

    async fn retirement_fund_rates(&self) -> Result<Vec<RetirementFundRate>, StoreError> {
        Ok(sqlx::query_as::<_, RetirementFundRate>(
            r#"
            SELECT id, employee_type, wage_threshold, employee_rate_percentage,
                   employer_rate_percentage, employer_amount
            FROM epf_rates
            WHERE is_active = 1
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?)
    }

    async fn social_security_rates(&self) -> Result<Vec<SocialSecurityRate>, StoreError> {
        Ok(sqlx::query_as::<_, SocialSecurityRate>(
            r#"
            SELECT id, wage_from, wage_to, employee_rate, employer_rate, employer_rate_over_60
            FROM socso_rates
            WHERE is_active = 1
            ORDER BY wage_from
            "#,
        )
        .fetch_all(&self.pool)
        .await?)
    }

    async fn employment_insurance_rates(
        &self,
    ) -> Result<Vec<EmploymentInsuranceRate>, StoreError> {
        Ok(sqlx::query_as::<_, EmploymentInsuranceRate>(
            r#"
            SELECT id, wage_from, wage_to, employee_rate, employer_rate
            FROM sip_rates
            WHERE is_active = 1
            ORDER BY wage_from
            "#,
        )
        .fetch_all(&self.pool)
        .await?)
    }

    async fn income_tax_rates(&self) -> Result<Vec<IncomeTaxRate>, StoreError> {
        Ok(sqlx::query_as::<_, IncomeTaxRate>(
            "SELECT * FROM income_tax_rates WHERE is_active = 1 ORDER BY wage_from",
        )
        .fetch_all(&self.pool)
        .await?)
    }
}

#[async_trait]
impl PayrollStore for MySqlPayrollStore {
    async fn begin(&self) -> Result<Box<dyn SettlementTx>, StoreError> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(MySqlSettlementTx { tx: Some(tx) }))
    }

    async fn get_or_create_monthly_payroll(
        &self,
        period: PayrollPeriod,
    ) -> Result<MonthlyPayroll, StoreError> {
        sqlx::query(
            r#"
            INSERT IGNORE INTO monthly_payrolls (year, month, status)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(period.year)
        .bind(period.month)
        .bind(PayrollStatus::Processing.as_ref())
        .execute(&self.pool)
        .await?;

        let row = sqlx::query_as::<_, MonthlyPayrollRow>(&format!(
            "SELECT {MONTHLY_PAYROLL_COLUMNS} FROM monthly_payrolls WHERE year = ? AND month = ?"
        ))
        .bind(period.year)
        .bind(period.month)
        .fetch_one(&self.pool)
        .await?;

        MonthlyPayroll::try_from(row)
    }

    async fn finalize_monthly_payroll(
        &self,
        id: u64,
    ) -> Result<Option<MonthlyPayroll>, StoreError> {
        sqlx::query("UPDATE monthly_payrolls SET status = ?, updated_at = ? WHERE id = ?")
            .bind(PayrollStatus::Finalized.as_ref())
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await?;

        self.monthly_payroll(id).await
    }

    async fn employee_payrolls(
        &self,
        monthly_payroll_id: u64,
    ) -> Result<Vec<EmployeePayroll>, StoreError> {
        let rows = sqlx::query_as::<_, EmployeePayrollRow>(
            r#"
            SELECT id, monthly_payroll_id, employee_id, job_type, gross_pay, net_pay
            FROM employee_payrolls
            WHERE monthly_payroll_id = ?
            ORDER BY employee_id
            "#,
        )
        .bind(monthly_payroll_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(EmployeePayroll::from).collect())
    }

    async fn employee_payroll_detail(
        &self,
        employee_payroll_id: u64,
    ) -> Result<Option<EmployeePayrollDetail>, StoreError> {
        let Some(header) = sqlx::query_as::<_, EmployeePayrollRow>(
            r#"
            SELECT id, monthly_payroll_id, employee_id, job_type, gross_pay, net_pay
            FROM employee_payrolls
            WHERE id = ?
            "#,
        )
        .bind(employee_payroll_id)
        .fetch_optional(&self.pool)
        .await?
        else {
            return Ok(None);
        };

        let (item_rows, deduction_rows) = futures::try_join!(
            sqlx::query_as::<_, PayrollItemRow>(
                r#"
                SELECT pay_code_id, description, pay_type, rate, rate_unit, quantity, amount,
                       is_manual, job_type, source_employee_id, work_log_id
                FROM payroll_items
                WHERE employee_payroll_id = ?
                ORDER BY id
                "#,
            )
            .bind(employee_payroll_id)
            .fetch_all(&self.pool),
            sqlx::query_as::<_, DeductionRow>(
                r#"
                SELECT deduction_type, employee_amount, employer_amount, wage_amount, rate_info
                FROM payroll_deductions
                WHERE employee_payroll_id = ?
                ORDER BY id
                "#,
            )
            .bind(employee_payroll_id)
            .fetch_all(&self.pool),
        )?;

        let payroll = EmployeePayroll::from(header);
        let items = item_rows
            .into_iter()
            .map(|row| item_from_row(row, &payroll.employee_id))
            .collect::<Result<Vec<_>, _>>()?;
        let deductions = deduction_rows
            .into_iter()
            .map(deduction_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(EmployeePayrollDetail {
            payroll,
            items,
            deductions,
        }))
    }
}

/// One batch transaction. Dropping it without `commit` rolls back.
pub struct MySqlSettlementTx {
    tx: Option<Transaction<'static, MySql>>,
}

impl MySqlSettlementTx {
    fn conn(&mut self) -> Result<&mut MySqlConnection, StoreError> {
        self.tx.as_deref_mut().ok_or(StoreError::TransactionClosed)
    }

    async fn execute(&mut self, sql: &str) -> Result<(), StoreError> {
        sqlx::query(sql).execute(self.conn()?).await?;
        Ok(())
    }
}

#[async_trait]
impl SettlementTx for MySqlSettlementTx {
    async fn savepoint(&mut self) -> Result<(), StoreError> {
        self.execute(&format!("SAVEPOINT {EMPLOYEE_SAVEPOINT}")).await
    }

    async fn release_savepoint(&mut self) -> Result<(), StoreError> {
        self.execute(&format!("RELEASE SAVEPOINT {EMPLOYEE_SAVEPOINT}"))
            .await
    }

    async fn rollback_to_savepoint(&mut self) -> Result<(), StoreError> {
        self.execute(&format!("ROLLBACK TO SAVEPOINT {EMPLOYEE_SAVEPOINT}"))
            .await
    }

    async fn upsert_employee_payroll(
        &mut self,
        monthly_payroll_id: u64,
        employee_id: &str,
        header: &PayrollHeader,
    ) -> Result<u64, StoreError> {
        let conn = self.conn()?;

        let existing = sqlx::query_scalar::<_, u64>(
            r#"
            SELECT id FROM employee_payrolls
            WHERE monthly_payroll_id = ? AND employee_id = ?
            FOR UPDATE
            "#,
        )
        .bind(monthly_payroll_id)
        .bind(employee_id)
        .fetch_optional(&mut *conn)
        .await?;

        if let Some(id) = existing {
            sqlx::query(
                r#"
                UPDATE employee_payrolls
                SET job_type = ?, gross_pay = ?, net_pay = ?, updated_at = ?
                WHERE id = ?
                "#,
            )
            .bind(&header.job_type)
            .bind(header.gross_pay)
            .bind(header.net_pay)
            .bind(Utc::now())
            .bind(id)
            .execute(&mut *conn)
            .await?;
            return Ok(id);
        }

        let result = sqlx::query(
            r#"
            INSERT INTO employee_payrolls
            (monthly_payroll_id, employee_id, job_type, gross_pay, net_pay)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(monthly_payroll_id)
        .bind(employee_id)
        .bind(&header.job_type)
        .bind(header.gross_pay)
        .bind(header.net_pay)
        .execute(&mut *conn)
        .await?;

        Ok(result.last_insert_id())
    }

    async fn replace_non_manual_items(
        &mut self,
        employee_payroll_id: u64,
        items: &[PayrollItem],
    ) -> Result<(), StoreError> {
        let conn = self.conn()?;

        sqlx::query("DELETE FROM payroll_items WHERE employee_payroll_id = ? AND is_manual = 0")
            .bind(employee_payroll_id)
            .execute(&mut *conn)
            .await?;

        let rows = items
            .iter()
            .map(|item| {
                [
                    SqlValue::U64(employee_payroll_id),
                    item.pay_code_id.as_str().into(),
                    item.description.as_str().into(),
                    item.pay_type.as_ref().into(),
                    SqlValue::Decimal(item.rate),
                    item.rate_unit.as_str().into(),
                    SqlValue::Decimal(item.quantity),
                    SqlValue::Decimal(item.amount),
                    SqlValue::Bool(item.is_manual),
                    item.job_type.as_str().into(),
                    item.source_employee_id.as_str().into(),
                    item.work_log_id.into(),
                ]
            })
            .collect();

        let insert = build_insert_sql(
            "payroll_items",
            [
                "employee_payroll_id",
                "pay_code_id",
                "description",
                "pay_type",
                "rate",
                "rate_unit",
                "quantity",
                "amount",
                "is_manual",
                "job_type",
                "source_employee_id",
                "work_log_id",
            ],
            rows,
        );
        if let Some(insert) = insert {
            execute_insert(conn, insert).await?;
        }
        Ok(())
    }

    async fn replace_deductions(
        &mut self,
        employee_payroll_id: u64,
        deductions: &[PayrollDeduction],
    ) -> Result<(), StoreError> {
        let conn = self.conn()?;

        sqlx::query("DELETE FROM payroll_deductions WHERE employee_payroll_id = ?")
            .bind(employee_payroll_id)
            .execute(&mut *conn)
            .await?;

        let rows = deductions
            .iter()
            .map(|d| {
                let rate_info = serde_json::to_value(&d.rate_info)
                    .map_err(|e| StoreError::decode("rate_info", e))?;
                Ok([
                    SqlValue::U64(employee_payroll_id),
                    d.kind.as_ref().into(),
                    SqlValue::Decimal(d.employee_amount),
                    SqlValue::Decimal(d.employer_amount),
                    SqlValue::Decimal(d.wage_amount),
                    SqlValue::Json(rate_info),
                ])
            })
            .collect::<Result<Vec<_>, StoreError>>()?;

        let insert = build_insert_sql(
            "payroll_deductions",
            [
                "employee_payroll_id",
                "deduction_type",
                "employee_amount",
                "employer_amount",
                "wage_amount",
                "rate_info",
            ],
            rows,
        );
        if let Some(insert) = insert {
            execute_insert(conn, insert).await?;
        }
        Ok(())
    }

    async fn touch_batch_timestamp(
        &mut self,
        monthly_payroll_id: u64,
    ) -> Result<DateTime<Utc>, StoreError> {
        let now = stored_timestamp(Utc::now());
        sqlx::query("UPDATE monthly_payrolls SET updated_at = ? WHERE id = ?")
            .bind(now)
            .bind(monthly_payroll_id)
            .execute(self.conn()?)
            .await?;
        Ok(now)
    }

    async fn commit(&mut self) -> Result<(), StoreError> {
        let tx = self.tx.take().ok_or(StoreError::TransactionClosed)?;
        tx.commit().await?;
        Ok(())
    }

    async fn rollback(&mut self) -> Result<(), StoreError> {
        if let Some(tx) = self.tx.take() {
            tx.rollback().await?;
        }
        Ok(())
    }
}
