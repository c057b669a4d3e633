use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info, instrument, warn};
use utoipa::ToSchema;

use crate::auth::auth::AuthUser;
use crate::model::payroll::{EmployeePayroll, MonthlyPayroll, PayrollPeriod};
use crate::payroll::batch::{EmployeeSelection, PayrollEngine, ProcessRequest};
use crate::payroll::error::PayrollError;
use crate::store::StoreError;

#[derive(Deserialize, ToSchema)]
pub struct CreateMonthlyPayroll {
    #[schema(example = 2026)]
    pub year: i32,

    #[schema(example = 9)]
    pub month: u32,
}

#[derive(Deserialize, ToSchema)]
pub struct ProcessPayrollRequest {
    pub selections: Vec<EmployeeSelection>,
}

#[derive(Serialize, ToSchema)]
pub struct MonthlyPayrollResponse {
    pub monthly_payroll: MonthlyPayroll,
    pub employee_payrolls: Vec<EmployeePayroll>,
}

fn store_error_response(err: &StoreError) -> HttpResponse {
    error!(error = %err, "Payroll store failure");
    HttpResponse::InternalServerError().json(json!({
        "error": "Database error"
    }))
}

fn payroll_error_response(err: &PayrollError) -> HttpResponse {
    match err {
        PayrollError::PeriodFinalized(_) => HttpResponse::Conflict().json(json!({
            "error": err.to_string()
        })),
        e if e.is_validation() => HttpResponse::BadRequest().json(json!({
            "error": e.to_string()
        })),
        e => HttpResponse::InternalServerError().json(json!({
            "error": "Payroll batch failed",
            "details": e.to_string()
        })),
    }
}

#[utoipa::path(
    post,
    path = "/api/payroll/monthly",
    request_body = CreateMonthlyPayroll,
    responses(
        (status = 200, description = "Monthly payroll for the period", body = MonthlyPayroll),
        (status = 400, description = "Invalid period"),
        (status = 401),
        (status = 403)
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn create_monthly_payroll(
    auth: AuthUser,
    engine: web::Data<PayrollEngine>,
    payload: web::Json<CreateMonthlyPayroll>,
) -> actix_web::Result<HttpResponse> {
    auth.require_hr_or_admin()?;

    let Some(period) = PayrollPeriod::new(payload.year, payload.month) else {
        return Ok(HttpResponse::BadRequest().json(json!({
            "error": "Month must be between 1 and 12"
        })));
    };

    match engine.store().get_or_create_monthly_payroll(period).await {
        Ok(monthly) => {
            info!(%period, monthly_payroll_id = monthly.id, "Monthly payroll ready");
            Ok(HttpResponse::Ok().json(monthly))
        }
        Err(e) => Ok(store_error_response(&e)),
    }
}

#[utoipa::path(
    get,
    path = "/api/payroll/monthly/{monthly_payroll_id}",
    params(
        ("monthly_payroll_id", description = "Monthly payroll ID")
    ),
    responses(
        (status = 200, description = "Period with its employee payrolls", body = MonthlyPayrollResponse),
        (status = 404, description = "Monthly payroll not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn get_monthly_payroll(
    auth: AuthUser,
    engine: web::Data<PayrollEngine>,
    path: web::Path<u64>,
) -> actix_web::Result<HttpResponse> {
    auth.require_hr_or_admin()?;

    let id = path.into_inner();
    let store = engine.store();

    let monthly_payroll = match store.monthly_payroll(id).await {
        Ok(Some(m)) => m,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(json!({
                "error": "Monthly payroll not found"
            })));
        }
        Err(e) => return Ok(store_error_response(&e)),
    };

    match store.employee_payrolls(id).await {
        Ok(employee_payrolls) => Ok(HttpResponse::Ok().json(MonthlyPayrollResponse {
            monthly_payroll,
            employee_payrolls,
        })),
        Err(e) => Ok(store_error_response(&e)),
    }
}

#[utoipa::path(
    post,
    path = "/api/payroll/monthly/{monthly_payroll_id}/process",
    request_body = ProcessPayrollRequest,
    params(
        ("monthly_payroll_id", description = "Monthly payroll ID")
    ),
    responses(
        (status = 200, description = "Batch committed", body = BatchOutcome),
        (status = 400, description = "Empty or duplicate selection, or unknown period"),
        (status = 409, description = "Period is finalized"),
        (status = 500, description = "Batch aborted and rolled back")
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
#[instrument(
    name = "process_monthly_payroll",
    skip(auth, engine, payload),
    fields(user_id = auth.user_id, username = %auth.username)
)]
pub async fn process_monthly_payroll(
    auth: AuthUser,
    engine: web::Data<PayrollEngine>,
    path: web::Path<u64>,
    payload: web::Json<ProcessPayrollRequest>,
) -> actix_web::Result<HttpResponse> {
    auth.require_hr_or_admin()?;

    let request = ProcessRequest {
        monthly_payroll_id: path.into_inner(),
        selections: payload.into_inner().selections,
    };

    match engine.process(&request).await {
        Ok(outcome) => Ok(HttpResponse::Ok().json(outcome)),
        Err(e) => {
            warn!(error = %e, "Payroll batch rejected");
            Ok(payroll_error_response(&e))
        }
    }
}

#[utoipa::path(
    put,
    path = "/api/payroll/monthly/{monthly_payroll_id}/finalize",
    params(
        ("monthly_payroll_id", description = "Monthly payroll ID")
    ),
    responses(
        (status = 200, description = "Monthly payroll finalized", body = MonthlyPayroll),
        (status = 404, description = "Monthly payroll not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn finalize_monthly_payroll(
    auth: AuthUser,
    engine: web::Data<PayrollEngine>,
    path: web::Path<u64>,
) -> actix_web::Result<HttpResponse> {
    auth.require_hr_or_admin()?;

    match engine.store().finalize_monthly_payroll(path.into_inner()).await {
        Ok(Some(monthly)) => {
            info!(period = %monthly.period(), "Monthly payroll finalized");
            Ok(HttpResponse::Ok().json(monthly))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(json!({
            "error": "Monthly payroll not found"
        }))),
        Err(e) => Ok(store_error_response(&e)),
    }
}

#[utoipa::path(
    get,
    path = "/api/payroll/employee/{employee_payroll_id}",
    params(
        ("employee_payroll_id", description = "Employee payroll ID")
    ),
    responses(
        (status = 200, description = "Employee payroll with items and deductions", body = EmployeePayrollDetail),
        (status = 404, description = "Employee payroll not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn get_employee_payroll(
    auth: AuthUser,
    engine: web::Data<PayrollEngine>,
    path: web::Path<u64>,
) -> actix_web::Result<HttpResponse> {
    auth.require_hr_or_admin()?;

    match engine.store().employee_payroll_detail(path.into_inner()).await {
        Ok(Some(detail)) => Ok(HttpResponse::Ok().json(detail)),
        Ok(None) => Ok(HttpResponse::NotFound().json(json!({
            "error": "Employee payroll not found"
        }))),
        Err(e) => Ok(store_error_response(&e)),
    }
}
