use std::io::{Read, Write};

use rust_decimal::Decimal;
use salary_core::{
    CalculationInput, CalculationResult, CalculationType, Deductions, InputError, PayrollService,
    RepositoryError,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("CSV error: {0}")]
    Csv(String),

    #[error("Row {row}: invalid calculation_type '{value}' (expected gross_to_net or net_to_gross)")]
    InvalidCalculationType { row: usize, value: String },

    #[error("Row {row}: {source}")]
    InvalidAmount { row: usize, source: InputError },

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl From<csv::Error> for BatchError {
    fn from(err: csv::Error) -> Self {
        BatchError::Csv(err.to_string())
    }
}

fn deserialize_decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    s.trim().parse::<Decimal>().map_err(serde::de::Error::custom)
}

/// Empty cells read as zero.
fn deserialize_amount<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s.as_deref().map(str::trim) {
        None | Some("") => Ok(Decimal::ZERO),
        Some(s) => s.parse::<Decimal>().map_err(serde::de::Error::custom),
    }
}

/// One input row:
///
/// ```text
/// salary,calculation_type,medical_aid,loans,other_discounts,dependents
/// 50000,gross_to_net,1500,5000,2000,0
/// ```
///
/// Deductions and dependents may be left empty.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct BatchRecord {
    #[serde(deserialize_with = "deserialize_decimal")]
    pub salary: Decimal,
    pub calculation_type: String,
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub medical_aid: Decimal,
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub loans: Decimal,
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub other_discounts: Decimal,
    #[serde(default)]
    pub dependents: Option<u32>,
}

impl BatchRecord {
    /// `row` is 1-based and only used in error messages.
    pub fn to_input(
        &self,
        row: usize,
    ) -> Result<CalculationInput, BatchError> {
        let calculation_type = CalculationType::parse(self.calculation_type.trim()).ok_or_else(|| {
            BatchError::InvalidCalculationType {
                row,
                value: self.calculation_type.clone(),
            }
        })?;

        let input = CalculationInput {
            salary: self.salary,
            calculation_type,
            deductions: Deductions {
                medical_aid: self.medical_aid,
                loans: self.loans,
                other_discounts: self.other_discounts,
            },
            dependents: self.dependents.unwrap_or(0),
        };
        input
            .validate()
            .map_err(|source| BatchError::InvalidAmount { row, source })?;

        Ok(input)
    }
}

/// One output row. Amounts are written as plain decimal text.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ResultRow {
    pub id: String,
    pub timestamp: String,
    pub calculation_type: &'static str,
    pub gross_salary: String,
    pub net_salary: String,
    pub irps_tax: String,
    pub inss_employee: String,
    pub inss_employer: String,
    pub medical_aid: String,
    pub loans: String,
    pub other_discounts: String,
    pub total_discounts: String,
    pub dependents: u32,
    pub dependents_deduction: String,
    pub bracket_matched: bool,
}

fn amount(value: Decimal) -> String {
    value.normalize().to_string()
}

impl From<&CalculationResult> for ResultRow {
    fn from(result: &CalculationResult) -> Self {
        Self {
            id: result.id.to_string(),
            timestamp: result.timestamp.to_rfc3339(),
            calculation_type: result.calculation_type.as_str(),
            gross_salary: amount(result.gross_salary),
            net_salary: amount(result.net_salary),
            irps_tax: amount(result.irps_tax),
            inss_employee: amount(result.inss_employee),
            inss_employer: amount(result.inss_employer),
            medical_aid: amount(result.medical_aid),
            loans: amount(result.loans),
            other_discounts: amount(result.other_discounts),
            total_discounts: amount(result.total_discounts),
            dependents: result.dependents,
            dependents_deduction: amount(result.dependents_deduction),
            bracket_matched: result.bracket_matched,
        }
    }
}

/// Runs many salary calculations from a CSV file.
pub struct BatchCalculator;

impl BatchCalculator {
    /// Reads every record; stops at the first malformed row.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<BatchRecord>, BatchError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut records = Vec::new();
        for result in csv_reader.deserialize() {
            let record: BatchRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Validates all rows first, then calculates them in order. With
    /// `persist` each result is stored as it would be by the HTTP API.
    pub async fn run(
        service: &PayrollService,
        records: &[BatchRecord],
        persist: bool,
    ) -> Result<Vec<CalculationResult>, BatchError> {
        let inputs = records
            .iter()
            .enumerate()
            .map(|(i, record)| record.to_input(i + 1))
            .collect::<Result<Vec<_>, _>>()?;

        let mut results = Vec::with_capacity(inputs.len());
        for input in &inputs {
            let result = if persist {
                service.calculate(input).await?
            } else {
                service.evaluate(input)
            };
            debug!(id = %result.id, net = %result.net_salary, "batch row calculated");
            results.push(result);
        }

        info!(rows = results.len(), persist, "batch complete");
        Ok(results)
    }

    /// Writes a header plus one line per result and returns the line count.
    pub fn write_results<W: Write>(
        writer: W,
        results: &[CalculationResult],
    ) -> Result<usize, BatchError> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for result in results {
            csv_writer.serialize(ResultRow::from(result))?;
        }
        csv_writer
            .flush()
            .map_err(|e| BatchError::Csv(e.to_string()))?;
        Ok(results.len())
    }
}
