use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Highest dependents count with its own column in the withholding tables.
pub const MAX_DEPENDENTS: u32 = 4;

/// Columns per bracket row: 0, 1, 2, 3 and 4-or-more dependents.
pub const DEPENDENT_SLOTS: usize = MAX_DEPENDENTS as usize + 1;

/// One row of an IRPS withholding table.
///
/// `rate` is the marginal rate for marginal schedules, the coefficient for
/// formula schedules and a display-only figure for the lookup matrix.
/// `dependent_amounts` holds the per-dependent values (withheld amount for the
/// matrix, base amount for the formula) and is `None` for marginal rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IrpsBracket {
    pub lower: Decimal,
    pub upper: Option<Decimal>,
    pub rate: Decimal,
    pub dependent_amounts: Option<[Decimal; DEPENDENT_SLOTS]>,
}

impl IrpsBracket {
    /// `lower <= salary <= upper`, the convention of the lookup matrix.
    pub fn contains_inclusive(
        &self,
        salary: Decimal,
    ) -> bool {
        salary >= self.lower && self.upper.is_none_or(|upper| salary <= upper)
    }

    /// `lower <= salary < upper`.
    pub fn contains_half_open(
        &self,
        salary: Decimal,
    ) -> bool {
        salary >= self.lower && self.upper.is_none_or(|upper| salary < upper)
    }

    /// Per-dependent amount for the given column, zero when the row has none.
    pub fn amount_for(
        &self,
        slot: usize,
    ) -> Decimal {
        self.dependent_amounts
            .map(|amounts| amounts[slot.min(DEPENDENT_SLOTS - 1)])
            .unwrap_or(Decimal::ZERO)
    }
}
