//! Payroll calculations for Mozambican salaries.
//!
//! IRPS withholding and INSS contributions are combined by
//! [`SalaryCalculator`] into a gross-to-net composition, which it can also
//! invert numerically to find the gross salary behind a target net.

pub mod common;
pub mod extras;
pub mod inss;
pub mod irps;
pub mod salary;

pub use extras::{
    ExtrasError, OvertimeInput, OvertimeLine, OvertimePay, ThirteenthSalary, overtime_pay,
    thirteenth_salary,
};
pub use inss::{InssCalculator, InssContribution};
pub use irps::{IrpsAssessment, IrpsCalculator};
pub use salary::{SalaryCalculator, SolvedGross};
