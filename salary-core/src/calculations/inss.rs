//! INSS social security contributions.
//!
//! Both shares are a flat percentage of the gross salary with no ceiling.
//! The employee share is withheld from pay, the employer share is reported
//! for information only.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::tables::{INSS_EMPLOYEE_RATE, INSS_EMPLOYER_RATE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InssContribution {
    pub employee: Decimal,
    pub employer: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InssCalculator {
    employee_rate: Decimal,
    employer_rate: Decimal,
}

impl InssCalculator {
    pub fn new(
        employee_rate: Decimal,
        employer_rate: Decimal,
    ) -> Self {
        Self {
            employee_rate,
            employer_rate,
        }
    }

    pub fn employee_rate(&self) -> Decimal {
        self.employee_rate
    }

    pub fn employer_rate(&self) -> Decimal {
        self.employer_rate
    }

    pub fn calculate(
        &self,
        gross_salary: Decimal,
    ) -> InssContribution {
        InssContribution {
            employee: gross_salary * self.employee_rate,
            employer: gross_salary * self.employer_rate,
        }
    }
}

impl Default for InssCalculator {
    fn default() -> Self {
        Self::new(INSS_EMPLOYEE_RATE, INSS_EMPLOYER_RATE)
    }
}
