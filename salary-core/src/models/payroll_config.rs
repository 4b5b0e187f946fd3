use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::tables::{INSS_EMPLOYEE_RATE, INSS_EMPLOYER_RATE, IrpsSchedule};

/// Tuning of the gross-from-net fixed-point iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// First guess is `net * initial_factor`.
    pub initial_factor: Decimal,
    /// Each step moves the estimate by `(target - net) * step_factor`.
    pub step_factor: Decimal,
    /// Stop once the computed net is closer than this to the target.
    pub tolerance: Decimal,
    pub max_iterations: u32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            initial_factor: dec!(1.5),
            step_factor: dec!(1.3),
            tolerance: dec!(0.01),
            max_iterations: 100,
        }
    }
}

/// Everything a salary calculation depends on besides its input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollConfig {
    pub schedule: IrpsSchedule,
    pub inss_employee_rate: Decimal,
    pub inss_employer_rate: Decimal,
    pub solver: SolverConfig,
}

impl PayrollConfig {
    pub fn with_schedule(schedule: IrpsSchedule) -> Self {
        Self {
            schedule,
            ..Self::default()
        }
    }
}

impl Default for PayrollConfig {
    fn default() -> Self {
        Self {
            schedule: IrpsSchedule::default(),
            inss_employee_rate: INSS_EMPLOYEE_RATE,
            inss_employer_rate: INSS_EMPLOYER_RATE,
            solver: SolverConfig::default(),
        }
    }
}
