use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Factor applied to the monthly breakdown to produce the annual one.
pub const MONTHS_PER_YEAR: Decimal = Decimal::from_parts(12, 0, 0, false, 0);

/// Largest amount accepted for any money field of an input, in meticais.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("{field} must not be negative, got {value}")]
    Negative {
        field: &'static str,
        value: Decimal,
    },

    #[error("{field} must not exceed {max}, got {value}")]
    TooLarge {
        field: &'static str,
        value: Decimal,
        max: Decimal,
    },
}

/// Checks that `value` lies in `0..=max`.
pub fn check_amount(
    field: &'static str,
    value: Decimal,
    max: Decimal,
) -> Result<(), InputError> {
    if value < Decimal::ZERO {
        return Err(InputError::Negative { field, value });
    }
    if value > max {
        return Err(InputError::TooLarge { field, value, max });
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalculationType {
    GrossToNet,
    NetToGross,
}

impl CalculationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GrossToNet => "gross_to_net",
            Self::NetToGross => "net_to_gross",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "gross_to_net" => Some(Self::GrossToNet),
            "net_to_gross" => Some(Self::NetToGross),
            _ => None,
        }
    }
}

/// Flat monthly deductions taken from the salary after tax.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deductions {
    #[serde(default)]
    pub medical_aid: Decimal,
    #[serde(default)]
    pub loans: Decimal,
    #[serde(default)]
    pub other_discounts: Decimal,
}

impl Deductions {
    /// Saturates at `Decimal::MAX`; validated inputs never get near it.
    pub fn total(&self) -> Decimal {
        self.medical_aid
            .saturating_add(self.loans)
            .saturating_add(self.other_discounts)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationInput {
    pub salary: Decimal,
    pub calculation_type: CalculationType,
    #[serde(flatten)]
    pub deductions: Deductions,
    #[serde(default)]
    pub dependents: u32,
}

impl CalculationInput {
    /// Salary and every deduction must lie within `0..=MAX_AMOUNT`.
    pub fn validate(&self) -> Result<(), InputError> {
        for (field, value) in [
            ("salary", self.salary),
            ("medical_aid", self.deductions.medical_aid),
            ("loans", self.deductions.loans),
            ("other_discounts", self.deductions.other_discounts),
        ] {
            check_amount(field, value, MAX_AMOUNT)?;
        }
        Ok(())
    }
}

/// Every figure of one gross/net composition, before it is given an identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryComputation {
    pub gross_salary: Decimal,
    pub net_salary: Decimal,
    pub irps_tax: Decimal,
    pub inss_employee: Decimal,
    pub inss_employer: Decimal,
    pub medical_aid: Decimal,
    pub loans: Decimal,
    pub other_discounts: Decimal,
    pub total_discounts: Decimal,
    pub dependents: u32,
    pub dependents_deduction: Decimal,
    /// False when the salary fell between two rows of the withholding table.
    pub bracket_matched: bool,
}

/// Monthly or annual view of a computation, keyed the way the mobile client
/// displays it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryBreakdown {
    #[serde(rename = "salario_bruto")]
    pub gross_salary: Decimal,
    #[serde(rename = "salario_liquido")]
    pub net_salary: Decimal,
    #[serde(rename = "irps")]
    pub irps_tax: Decimal,
    #[serde(rename = "inss_empregado")]
    pub inss_employee: Decimal,
    #[serde(rename = "inss_empregador")]
    pub inss_employer: Decimal,
    #[serde(rename = "seguro_medico")]
    pub medical_aid: Decimal,
    #[serde(rename = "emprestimos")]
    pub loans: Decimal,
    #[serde(rename = "outros_descontos")]
    pub other_discounts: Decimal,
    #[serde(rename = "total_descontos")]
    pub total_discounts: Decimal,
}

impl SalaryBreakdown {
    pub fn monthly(computation: &SalaryComputation) -> Self {
        Self {
            gross_salary: computation.gross_salary,
            net_salary: computation.net_salary,
            irps_tax: computation.irps_tax,
            inss_employee: computation.inss_employee,
            inss_employer: computation.inss_employer,
            medical_aid: computation.medical_aid,
            loans: computation.loans,
            other_discounts: computation.other_discounts,
            total_discounts: computation.total_discounts,
        }
    }

    pub fn scaled(
        &self,
        factor: Decimal,
    ) -> Self {
        Self {
            gross_salary: self.gross_salary * factor,
            net_salary: self.net_salary * factor,
            irps_tax: self.irps_tax * factor,
            inss_employee: self.inss_employee * factor,
            inss_employer: self.inss_employer * factor,
            medical_aid: self.medical_aid * factor,
            loans: self.loans * factor,
            other_discounts: self.other_discounts * factor,
            total_discounts: self.total_discounts * factor,
        }
    }
}

/// A stored calculation. Created once, never updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub id: Uuid,
    pub gross_salary: Decimal,
    pub net_salary: Decimal,
    pub irps_tax: Decimal,
    pub inss_employee: Decimal,
    pub inss_employer: Decimal,
    pub medical_aid: Decimal,
    pub loans: Decimal,
    pub other_discounts: Decimal,
    pub total_discounts: Decimal,
    pub dependents: u32,
    pub dependents_deduction: Decimal,
    pub bracket_matched: bool,
    pub monthly_breakdown: SalaryBreakdown,
    pub annual_breakdown: SalaryBreakdown,
    pub calculation_type: CalculationType,
    pub timestamp: DateTime<Utc>,
}

impl CalculationResult {
    /// Gives a fresh computation its identifier and timestamp.
    pub fn new(
        computation: SalaryComputation,
        calculation_type: CalculationType,
    ) -> Self {
        Self::with_identity(Uuid::new_v4(), Utc::now(), computation, calculation_type)
    }

    /// Rebuilds a result whose identity is already known (e.g. read back from
    /// storage). Breakdowns are always derived from the computation.
    pub fn with_identity(
        id: Uuid,
        timestamp: DateTime<Utc>,
        computation: SalaryComputation,
        calculation_type: CalculationType,
    ) -> Self {
        let monthly_breakdown = SalaryBreakdown::monthly(&computation);
        let annual_breakdown = monthly_breakdown.scaled(MONTHS_PER_YEAR);

        Self {
            id,
            gross_salary: computation.gross_salary,
            net_salary: computation.net_salary,
            irps_tax: computation.irps_tax,
            inss_employee: computation.inss_employee,
            inss_employer: computation.inss_employer,
            medical_aid: computation.medical_aid,
            loans: computation.loans,
            other_discounts: computation.other_discounts,
            total_discounts: computation.total_discounts,
            dependents: computation.dependents,
            dependents_deduction: computation.dependents_deduction,
            bracket_matched: computation.bracket_matched,
            monthly_breakdown,
            annual_breakdown,
            calculation_type,
            timestamp,
        }
    }

    pub fn computation(&self) -> SalaryComputation {
        SalaryComputation {
            gross_salary: self.gross_salary,
            net_salary: self.net_salary,
            irps_tax: self.irps_tax,
            inss_employee: self.inss_employee,
            inss_employer: self.inss_employer,
            medical_aid: self.medical_aid,
            loans: self.loans,
            other_discounts: self.other_discounts,
            total_discounts: self.total_discounts,
            dependents: self.dependents,
            dependents_deduction: self.dependents_deduction,
            bracket_matched: self.bracket_matched,
        }
    }
}
