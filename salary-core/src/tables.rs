//! Static IRPS withholding tables and INSS rates for 2025.
//!
//! Three encodings of the monthly withholding schedule are in circulation and
//! they do not agree with each other to the metical:
//!
//! | Schedule   | Row lookup          | Tax                                           |
//! |------------|---------------------|-----------------------------------------------|
//! | `matrix`   | `lower <= s <= upper` | amount read from the dependents column      |
//! | `formula`  | `lower <= s < upper`  | `base[d] + (s - lower) * coefficient`       |
//! | `marginal` | every row below `s` | sum of `rate * slice`, after a flat allowance |
//!
//! All three are kept as immutable data; [`IrpsSchedule`] selects one at
//! runtime and defaults to the official matrix.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{DEPENDENT_SLOTS, IrpsBracket};

pub const TAX_YEAR: i32 = 2025;

pub const INSS_EMPLOYEE_RATE: Decimal = dec!(0.03);
pub const INSS_EMPLOYER_RATE: Decimal = dec!(0.04);

/// Salary deducted per dependent (up to four) before the marginal schedule
/// is applied.
pub const MARGINAL_DEPENDENT_ALLOWANCE: Decimal = dec!(1000);

const fn row(
    lower: Decimal,
    upper: Option<Decimal>,
    rate: Decimal,
    amounts: [Decimal; DEPENDENT_SLOTS],
) -> IrpsBracket {
    IrpsBracket {
        lower,
        upper,
        rate,
        dependent_amounts: Some(amounts),
    }
}

const fn marginal_row(
    lower: Decimal,
    upper: Option<Decimal>,
    rate: Decimal,
) -> IrpsBracket {
    IrpsBracket {
        lower,
        upper,
        rate,
        dependent_amounts: None,
    }
}

const NONE_DUE: [Decimal; DEPENDENT_SLOTS] = [dec!(0), dec!(0), dec!(0), dec!(0), dec!(0)];

/// Official 2025 withholding matrix: amount to withhold per salary band and
/// number of dependents. `rate` is only shown to users.
pub static MATRIX_2025: [IrpsBracket; 10] = [
    row(dec!(0), Some(dec!(20249.99)), dec!(0), NONE_DUE),
    row(dec!(20250), Some(dec!(20749.99)), dec!(0), NONE_DUE),
    row(
        dec!(20750),
        Some(dec!(20999.99)),
        dec!(0.10),
        [dec!(50), dec!(0), dec!(0), dec!(0), dec!(0)],
    ),
    row(
        dec!(21000),
        Some(dec!(21249.99)),
        dec!(0.10),
        [dec!(75), dec!(25), dec!(0), dec!(0), dec!(0)],
    ),
    row(
        dec!(21250),
        Some(dec!(21749.99)),
        dec!(0.10),
        [dec!(100), dec!(50), dec!(25), dec!(0), dec!(0)],
    ),
    row(
        dec!(21750),
        Some(dec!(22249.99)),
        dec!(0.10),
        [dec!(150), dec!(100), dec!(75), dec!(50), dec!(0)],
    ),
    row(
        dec!(22250),
        Some(dec!(32749.99)),
        dec!(0.15),
        [dec!(200), dec!(150), dec!(125), dec!(100), dec!(50)],
    ),
    row(
        dec!(32750),
        Some(dec!(60749.99)),
        dec!(0.20),
        [dec!(1775), dec!(1725), dec!(1700), dec!(1675), dec!(1625)],
    ),
    row(
        dec!(60750),
        Some(dec!(144749.99)),
        dec!(0.25),
        [dec!(7375), dec!(7325), dec!(7300), dec!(7275), dec!(7225)],
    ),
    row(
        dec!(144750),
        None,
        dec!(0.32),
        [dec!(28375), dec!(28325), dec!(28300), dec!(28275), dec!(28225)],
    ),
];

/// Coefficient table: `dependent_amounts` are the base amounts at `lower`.
pub static FORMULA_2025: [IrpsBracket; 6] = [
    row(dec!(20250), Some(dec!(20750)), dec!(0.10), NONE_DUE),
    row(
        dec!(20750),
        Some(dec!(22250)),
        dec!(0.10),
        [dec!(50), dec!(0), dec!(0), dec!(0), dec!(0)],
    ),
    row(
        dec!(22250),
        Some(dec!(32750)),
        dec!(0.15),
        [dec!(200), dec!(150), dec!(100), dec!(50), dec!(0)],
    ),
    row(
        dec!(32750),
        Some(dec!(60750)),
        dec!(0.20),
        [dec!(1775), dec!(1725), dec!(1675), dec!(1625), dec!(1575)],
    ),
    row(
        dec!(60750),
        Some(dec!(144750)),
        dec!(0.25),
        [dec!(7375), dec!(7325), dec!(7275), dec!(7225), dec!(7175)],
    ),
    row(
        dec!(144750),
        None,
        dec!(0.32),
        [dec!(28375), dec!(28325), dec!(28275), dec!(28225), dec!(28175)],
    ),
];

pub static MARGINAL_2025: [IrpsBracket; 6] = [
    marginal_row(dec!(0), Some(dec!(20250)), dec!(0)),
    marginal_row(dec!(20250), Some(dec!(22250)), dec!(0.10)),
    marginal_row(dec!(22250), Some(dec!(32750)), dec!(0.15)),
    marginal_row(dec!(32750), Some(dec!(60750)), dec!(0.20)),
    marginal_row(dec!(60750), Some(dec!(144750)), dec!(0.25)),
    marginal_row(dec!(144750), None, dec!(0.32)),
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown IRPS schedule '{0}'; expected one of: matrix, formula, marginal")]
pub struct ScheduleParseError(pub String);

/// Which withholding table encoding drives the IRPS calculation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IrpsSchedule {
    #[default]
    Matrix,
    Formula,
    Marginal,
}

impl IrpsSchedule {
    pub const ALL: [Self; 3] = [Self::Matrix, Self::Formula, Self::Marginal];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Matrix => "matrix",
            Self::Formula => "formula",
            Self::Marginal => "marginal",
        }
    }

    pub fn brackets(&self) -> &'static [IrpsBracket] {
        match self {
            Self::Matrix => &MATRIX_2025,
            Self::Formula => &FORMULA_2025,
            Self::Marginal => &MARGINAL_2025,
        }
    }

    /// Human-readable origin of the table, shown by the tax-info endpoint.
    pub fn source(&self) -> &'static str {
        match self {
            Self::Matrix => "Matriz Oficial IRPS - Governo de Moçambique",
            Self::Formula => "Tabela de retenção IRPS com coeficientes",
            Self::Marginal => "Escalões marginais IRPS com dedução por dependente",
        }
    }
}

impl fmt::Display for IrpsSchedule {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IrpsSchedule {
    type Err = ScheduleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|schedule| schedule.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ScheduleParseError(s.to_string()))
    }
}
