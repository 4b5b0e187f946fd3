//! IRPS (personal income tax) withholding on a monthly salary.
//!
//! The calculator evaluates whichever [`IrpsSchedule`] it was built with:
//!
//! * **Matrix**: find the row with `lower <= salary <= upper` and read the
//!   amount from the dependents column.
//! * **Formula**: find the row with `lower <= salary < upper` and compute
//!   `base[dependents] + (salary - lower) * coefficient`.
//! * **Marginal**: subtract a flat allowance per dependent from the salary,
//!   then tax each slice at its bracket rate.
//!
//! Dependents are capped at [`MAX_DEPENDENTS`]. A salary below the first row
//! owes nothing. A salary that lands in a gap between rows also owes nothing,
//! but the assessment is flagged with `bracket_matched = false`.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use salary_core::IrpsSchedule;
//! use salary_core::calculations::IrpsCalculator;
//!
//! let calculator = IrpsCalculator::new(IrpsSchedule::Matrix);
//! let assessment = calculator.calculate(dec!(50000), 2);
//!
//! assert_eq!(assessment.tax, dec!(1700));
//! assert_eq!(assessment.dependents_deduction, dec!(75));
//! assert!(assessment.bracket_matched);
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::calculations::common::{max, round_half_up};
use crate::models::{IrpsBracket, MAX_DEPENDENTS};
use crate::tables::{IrpsSchedule, MARGINAL_DEPENDENT_ALLOWANCE};

/// Outcome of one IRPS evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IrpsAssessment {
    /// Tax to withhold this month.
    pub tax: Decimal,

    /// Informational relief from dependents: the tax saved versus zero
    /// dependents, or the flat allowance for the marginal schedule.
    pub dependents_deduction: Decimal,

    /// False when no row of the table contains the salary.
    pub bracket_matched: bool,
}

impl IrpsAssessment {
    fn exempt() -> Self {
        Self {
            tax: Decimal::ZERO,
            dependents_deduction: Decimal::ZERO,
            bracket_matched: true,
        }
    }

    fn unmatched() -> Self {
        Self {
            bracket_matched: false,
            ..Self::exempt()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IrpsCalculator {
    schedule: IrpsSchedule,
}

impl IrpsCalculator {
    pub fn new(schedule: IrpsSchedule) -> Self {
        Self { schedule }
    }

    pub fn schedule(&self) -> IrpsSchedule {
        self.schedule
    }

    /// Assesses IRPS for a monthly salary and number of dependents.
    pub fn calculate(
        &self,
        salary: Decimal,
        dependents: u32,
    ) -> IrpsAssessment {
        let slot = dependents.min(MAX_DEPENDENTS) as usize;
        let brackets = self.schedule.brackets();

        let assessment = match self.schedule {
            IrpsSchedule::Matrix => Self::from_matrix(brackets, salary, slot),
            IrpsSchedule::Formula => Self::from_formula(brackets, salary, slot),
            IrpsSchedule::Marginal => Self::from_marginal(brackets, salary, slot),
        };

        if !assessment.bracket_matched {
            warn!(
                schedule = %self.schedule,
                %salary,
                "salary falls between IRPS brackets; withholding nothing"
            );
        }
        trace!(
            schedule = %self.schedule,
            %salary,
            dependents,
            tax = %assessment.tax,
            "irps assessed"
        );

        assessment
    }

    fn below_table(
        brackets: &[IrpsBracket],
        salary: Decimal,
    ) -> bool {
        brackets.first().is_none_or(|first| salary < first.lower)
    }

    fn from_matrix(
        brackets: &[IrpsBracket],
        salary: Decimal,
        slot: usize,
    ) -> IrpsAssessment {
        if Self::below_table(brackets, salary) {
            return IrpsAssessment::exempt();
        }

        match brackets.iter().find(|b| b.contains_inclusive(salary)) {
            Some(bracket) => {
                let tax = bracket.amount_for(slot);
                IrpsAssessment {
                    tax,
                    dependents_deduction: bracket.amount_for(0) - tax,
                    bracket_matched: true,
                }
            }
            None => IrpsAssessment::unmatched(),
        }
    }

    fn from_formula(
        brackets: &[IrpsBracket],
        salary: Decimal,
        slot: usize,
    ) -> IrpsAssessment {
        if Self::below_table(brackets, salary) {
            return IrpsAssessment::exempt();
        }

        match brackets.iter().find(|b| b.contains_half_open(salary)) {
            Some(bracket) => {
                let marginal = (salary - bracket.lower) * bracket.rate;
                let tax = round_half_up(bracket.amount_for(slot) + marginal);
                let without_dependents = round_half_up(bracket.amount_for(0) + marginal);
                IrpsAssessment {
                    tax,
                    dependents_deduction: without_dependents - tax,
                    bracket_matched: true,
                }
            }
            None => IrpsAssessment::unmatched(),
        }
    }

    fn from_marginal(
        brackets: &[IrpsBracket],
        salary: Decimal,
        slot: usize,
    ) -> IrpsAssessment {
        let allowance = MARGINAL_DEPENDENT_ALLOWANCE * Decimal::from(slot as u32);
        let taxable = max(salary - allowance, Decimal::ZERO);

        let mut tax = Decimal::ZERO;
        for bracket in brackets {
            if taxable <= bracket.lower {
                break;
            }
            let top = bracket.upper.map_or(taxable, |upper| upper.min(taxable));
            tax += (top - bracket.lower) * bracket.rate;
        }

        IrpsAssessment {
            tax: round_half_up(tax),
            dependents_deduction: allowance,
            bracket_matched: true,
        }
    }
}

impl Default for IrpsCalculator {
    fn default() -> Self {
        Self::new(IrpsSchedule::default())
    }
}
