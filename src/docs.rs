use crate::api::payroll::{CreateMonthlyPayroll, MonthlyPayrollResponse, ProcessPayrollRequest};
use crate::model::pay_code::PayType;
use crate::model::payroll::{
    DeductionKind, EmployeePayroll, EmployeePayrollDetail, MonthlyPayroll, PayrollDeduction,
    PayrollItem, PayrollPeriod, PayrollStatus, RateInfo,
};
use crate::payroll::batch::{BatchOutcome, EmployeeFailure, EmployeeSelection};
use utoipa::Modify;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Payroll Engine API",
        version = "1.0.0",
        description = r#"
## Monthly Payroll Processing

Computes monthly pay for a selected set of employees and settles the
result in a single database transaction.

### 🔹 Key Features
- **Pay items** from submitted work logs or, for trip-paid jobs, trip counts
- **Statutory deductions**: EPF, SOCSO, SIP and PCB from the active rate tables
- **Settlement**: idempotent per period and employee, manual items preserved
- **Partial failure**: one bad employee is reported without sinking the batch

### 🔐 Security
All endpoints require a **JWT Bearer** access token with the **Admin** or **HR** role.

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::payroll::create_monthly_payroll,
        crate::api::payroll::get_monthly_payroll,
        crate::api::payroll::process_monthly_payroll,
        crate::api::payroll::finalize_monthly_payroll,
        crate::api::payroll::get_employee_payroll
    ),
    components(
        schemas(
            CreateMonthlyPayroll,
            ProcessPayrollRequest,
            MonthlyPayrollResponse,
            EmployeeSelection,
            BatchOutcome,
            EmployeeFailure,
            PayrollPeriod,
            PayrollStatus,
            MonthlyPayroll,
            EmployeePayroll,
            EmployeePayrollDetail,
            PayrollItem,
            PayType,
            PayrollDeduction,
            DeductionKind,
            RateInfo
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "Payroll", description = "Monthly payroll processing APIs"),
    )
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}
