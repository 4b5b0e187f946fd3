mod calculation;
mod irps_bracket;
mod payroll_config;

pub use calculation::{
    CalculationInput, CalculationResult, CalculationType, Deductions, InputError, MAX_AMOUNT,
    MONTHS_PER_YEAR, SalaryBreakdown, SalaryComputation, check_amount,
};
pub use irps_bracket::{DEPENDENT_SLOTS, IrpsBracket, MAX_DEPENDENTS};
pub use payroll_config::{PayrollConfig, SolverConfig};
