pub mod employee;
pub mod pay_code;
pub mod payroll;
pub mod rates;
pub mod role;
