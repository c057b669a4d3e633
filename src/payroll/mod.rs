//! Payroll computation and settlement.
//!
//! A batch run flows through [`items`] (earnable lines), [`deductions`]
//! (statutory contributions, priced by [`rates`]) and [`settlement`]
//! (persistence), driven by [`batch::PayrollEngine`].

pub mod batch;
pub mod deductions;
pub mod error;
pub mod items;
pub mod rates;
pub mod settlement;
