//! Pay items outside the monthly payroll run: the thirteenth salary and
//! overtime premiums.
//!
//! Neither is taxed here; both return gross amounts rounded to centavos.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::calculations::common::round_half_up;
use crate::models::{InputError, MAX_AMOUNT, MONTHS_PER_YEAR, check_amount};

/// Hours in the longest month; no hour count may exceed it.
pub const MAX_HOURS: Decimal = dec!(744);

/// Highest premium accepted, in percent.
pub const MAX_RATE_PERCENT: Decimal = dec!(1000);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtrasError {
    #[error("months worked must be between 1 and 12, got {0}")]
    InvalidMonths(u32),

    #[error("normal hours must be positive, got {0}")]
    NonPositiveHours(Decimal),

    #[error(transparent)]
    Input(#[from] InputError),

    #[error("overtime amounts exceed the representable range")]
    Overflow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThirteenthSalary {
    pub monthly_salary: Decimal,
    pub months_worked: u32,
    pub thirteenth_value: Decimal,
    pub is_proportional: bool,
}

/// Thirteenth-month pay, prorated by whole months worked in the year.
pub fn thirteenth_salary(
    monthly_salary: Decimal,
    months_worked: u32,
) -> Result<ThirteenthSalary, ExtrasError> {
    if !(1..=12).contains(&months_worked) {
        return Err(ExtrasError::InvalidMonths(months_worked));
    }
    check_amount("monthly_salary", monthly_salary, MAX_AMOUNT)?;

    Ok(ThirteenthSalary {
        monthly_salary,
        months_worked,
        thirteenth_value: round_half_up(
            monthly_salary * Decimal::from(months_worked) / MONTHS_PER_YEAR,
        ),
        is_proportional: months_worked < 12,
    })
}

fn default_normal_hours() -> Decimal {
    dec!(160)
}

fn default_overtime_rate() -> Decimal {
    dec!(50)
}

fn default_night_rate() -> Decimal {
    dec!(25)
}

fn default_holiday_rate() -> Decimal {
    dec!(100)
}

/// Hours worked beyond the normal month. Rates are premiums in percent over
/// the hourly wage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OvertimeInput {
    pub base_salary: Decimal,
    #[serde(default = "default_normal_hours")]
    pub normal_hours: Decimal,
    #[serde(default)]
    pub overtime_hours: Decimal,
    #[serde(default = "default_overtime_rate")]
    pub overtime_rate: Decimal,
    #[serde(default)]
    pub night_hours: Decimal,
    #[serde(default = "default_night_rate")]
    pub night_rate: Decimal,
    #[serde(default)]
    pub holiday_hours: Decimal,
    #[serde(default = "default_holiday_rate")]
    pub holiday_rate: Decimal,
}

impl OvertimeInput {
    pub fn new(base_salary: Decimal) -> Self {
        Self {
            base_salary,
            normal_hours: default_normal_hours(),
            overtime_hours: Decimal::ZERO,
            overtime_rate: default_overtime_rate(),
            night_hours: Decimal::ZERO,
            night_rate: default_night_rate(),
            holiday_hours: Decimal::ZERO,
            holiday_rate: default_holiday_rate(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OvertimeLine {
    pub hours: Decimal,
    pub rate: Decimal,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OvertimePay {
    pub hourly_rate: Decimal,
    pub overtime: OvertimeLine,
    pub night: OvertimeLine,
    pub holiday: OvertimeLine,
    pub total_extra: Decimal,
    pub total_salary: Decimal,
}

/// Prices each category at `hours * hourly * (1 + rate / 100)`.
pub fn overtime_pay(input: &OvertimeInput) -> Result<OvertimePay, ExtrasError> {
    if input.normal_hours <= Decimal::ZERO {
        return Err(ExtrasError::NonPositiveHours(input.normal_hours));
    }
    check_amount("base_salary", input.base_salary, MAX_AMOUNT)?;
    for (field, value, max) in [
        ("normal_hours", input.normal_hours, MAX_HOURS),
        ("overtime_hours", input.overtime_hours, MAX_HOURS),
        ("night_hours", input.night_hours, MAX_HOURS),
        ("holiday_hours", input.holiday_hours, MAX_HOURS),
        ("overtime_rate", input.overtime_rate, MAX_RATE_PERCENT),
        ("night_rate", input.night_rate, MAX_RATE_PERCENT),
        ("holiday_rate", input.holiday_rate, MAX_RATE_PERCENT),
    ] {
        check_amount(field, value, max)?;
    }

    let hourly = input
        .base_salary
        .checked_div(input.normal_hours)
        .ok_or(ExtrasError::Overflow)?;
    let line = |hours: Decimal, rate: Decimal| -> Result<OvertimeLine, ExtrasError> {
        let factor = Decimal::ONE + rate / dec!(100);
        let amount = hours
            .checked_mul(hourly)
            .and_then(|pay| pay.checked_mul(factor))
            .ok_or(ExtrasError::Overflow)?;
        Ok(OvertimeLine {
            hours,
            rate,
            amount: round_half_up(amount),
        })
    };

    let overtime = line(input.overtime_hours, input.overtime_rate)?;
    let night = line(input.night_hours, input.night_rate)?;
    let holiday = line(input.holiday_hours, input.holiday_rate)?;
    let total_extra = overtime
        .amount
        .checked_add(night.amount)
        .and_then(|sum| sum.checked_add(holiday.amount))
        .ok_or(ExtrasError::Overflow)?;
    let total_salary = input
        .base_salary
        .checked_add(total_extra)
        .ok_or(ExtrasError::Overflow)?;

    Ok(OvertimePay {
        hourly_rate: round_half_up(hourly),
        overtime,
        night,
        holiday,
        total_extra,
        total_salary,
    })
}
