//! Gross/net salary composition and its inverse.
//!
//! Going from gross to net is a straight sum:
//!
//! ```text
//! total_discounts = irps + inss_employee + medical_aid + loans + other_discounts
//! net             = gross - total_discounts
//! ```
//!
//! Going from net to gross has no closed form because IRPS is read from a
//! table. [`SalaryCalculator::solve_gross`] runs a damped fixed-point
//! iteration instead:
//!
//! 1. start at `target * initial_factor`
//! 2. compute the net of the estimate; stop once it is within `tolerance`
//! 3. otherwise move the estimate by `(target - net) * step_factor`, falling
//!    back to `target` if the estimate turns negative
//!
//! After `max_iterations` the last estimate is used as is. The final gross is
//! rounded to centavos and composed forward again, so the reported net may
//! differ from the target by a few centavos.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use salary_core::{Deductions, PayrollConfig};
//! use salary_core::calculations::SalaryCalculator;
//!
//! let calculator = SalaryCalculator::new(&PayrollConfig::default());
//! let deductions = Deductions {
//!     medical_aid: dec!(1500),
//!     loans: dec!(5000),
//!     other_discounts: dec!(2000),
//! };
//!
//! let result = calculator.net_from_gross(dec!(50000), &deductions, 0);
//!
//! assert_eq!(result.irps_tax, dec!(1775));
//! assert_eq!(result.inss_employee, dec!(1500));
//! assert_eq!(result.total_discounts, dec!(11775));
//! assert_eq!(result.net_salary, dec!(38225));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::common::{round_half_up, round_to, within_tolerance};
use crate::calculations::{InssCalculator, IrpsCalculator};
use crate::models::{
    CalculationInput, CalculationType, Deductions, PayrollConfig, SalaryComputation,
    SolverConfig,
};

/// Decimal places kept on intermediate solver estimates.
const ESTIMATE_DP: u32 = 4;

/// Where the gross-from-net iteration ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolvedGross {
    /// Gross salary, rounded to centavos.
    pub gross: Decimal,
    /// Net-from-gross evaluations performed.
    pub iterations: u32,
    /// False when `max_iterations` ran out before reaching the tolerance.
    pub converged: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SalaryCalculator {
    irps: IrpsCalculator,
    inss: InssCalculator,
    solver: SolverConfig,
}

impl SalaryCalculator {
    pub fn new(config: &PayrollConfig) -> Self {
        Self {
            irps: IrpsCalculator::new(config.schedule),
            inss: InssCalculator::new(config.inss_employee_rate, config.inss_employer_rate),
            solver: config.solver,
        }
    }

    pub fn irps(&self) -> &IrpsCalculator {
        &self.irps
    }

    pub fn inss(&self) -> &InssCalculator {
        &self.inss
    }

    /// Runs the calculation in the direction the input asks for.
    pub fn calculate(
        &self,
        input: &CalculationInput,
    ) -> SalaryComputation {
        match input.calculation_type {
            CalculationType::GrossToNet => {
                self.net_from_gross(input.salary, &input.deductions, input.dependents)
            }
            CalculationType::NetToGross => {
                self.gross_from_net(input.salary, &input.deductions, input.dependents)
            }
        }
    }

    pub fn net_from_gross(
        &self,
        gross_salary: Decimal,
        deductions: &Deductions,
        dependents: u32,
    ) -> SalaryComputation {
        let irps = self.irps.calculate(gross_salary, dependents);
        let inss = self.inss.calculate(gross_salary);

        let total_discounts = irps.tax + inss.employee + deductions.total();

        SalaryComputation {
            gross_salary,
            net_salary: gross_salary - total_discounts,
            irps_tax: irps.tax,
            inss_employee: inss.employee,
            inss_employer: inss.employer,
            medical_aid: deductions.medical_aid,
            loans: deductions.loans,
            other_discounts: deductions.other_discounts,
            total_discounts,
            dependents,
            dependents_deduction: irps.dependents_deduction,
            bracket_matched: irps.bracket_matched,
        }
    }

    /// Finds the gross salary that nets `target_net` after tax and deductions.
    pub fn solve_gross(
        &self,
        target_net: Decimal,
        deductions: &Deductions,
        dependents: u32,
    ) -> SolvedGross {
        let mut estimate = target_net * self.solver.initial_factor;
        let mut iterations = 0;
        let mut converged = false;

        while iterations < self.solver.max_iterations {
            iterations += 1;

            let net = self.net_from_gross(estimate, deductions, dependents).net_salary;
            if within_tolerance(net, target_net, self.solver.tolerance) {
                converged = true;
                break;
            }

            estimate = round_to(
                estimate + (target_net - net) * self.solver.step_factor,
                ESTIMATE_DP,
            );
            if estimate < Decimal::ZERO {
                estimate = target_net;
            }
        }

        debug!(%target_net, %estimate, iterations, converged, "gross solver finished");

        SolvedGross {
            gross: round_half_up(estimate),
            iterations,
            converged,
        }
    }

    pub fn gross_from_net(
        &self,
        target_net: Decimal,
        deductions: &Deductions,
        dependents: u32,
    ) -> SalaryComputation {
        let solved = self.solve_gross(target_net, deductions, dependents);
        self.net_from_gross(solved.gross, deductions, dependents)
    }
}

impl Default for SalaryCalculator {
    fn default() -> Self {
        Self::new(&PayrollConfig::default())
    }
}
