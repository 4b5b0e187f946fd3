//! Calculation plus persistence, shared by the HTTP API and the batch tools.

use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use crate::calculations::SalaryCalculator;
use crate::db::repository::{CalculationRepository, RepositoryError};
use crate::models::{CalculationInput, CalculationResult, PayrollConfig};

pub const DEFAULT_HISTORY_LIMIT: u32 = 10;
pub const MAX_HISTORY_LIMIT: u32 = 100;

#[derive(Clone)]
pub struct PayrollService {
    config: PayrollConfig,
    calculator: SalaryCalculator,
    repository: Arc<dyn CalculationRepository>,
}

impl PayrollService {
    pub fn new(
        config: PayrollConfig,
        repository: Arc<dyn CalculationRepository>,
    ) -> Self {
        Self {
            calculator: SalaryCalculator::new(&config),
            config,
            repository,
        }
    }

    pub fn config(&self) -> &PayrollConfig {
        &self.config
    }

    pub fn calculator(&self) -> &SalaryCalculator {
        &self.calculator
    }

    /// Computes a result without storing it.
    pub fn evaluate(
        &self,
        input: &CalculationInput,
    ) -> CalculationResult {
        let computation = self.calculator.calculate(input);
        CalculationResult::new(computation, input.calculation_type)
    }

    /// Computes a result and appends it to the store.
    pub async fn calculate(
        &self,
        input: &CalculationInput,
    ) -> Result<CalculationResult, RepositoryError> {
        let result = self.evaluate(input);
        self.repository.insert_calculation(&result).await?;

        info!(
            id = %result.id,
            calculation_type = result.calculation_type.as_str(),
            gross = %result.gross_salary,
            net = %result.net_salary,
            irps = %result.irps_tax,
            "salary calculated"
        );

        Ok(result)
    }

    /// Most recent results, newest first. `limit` is clamped to
    /// `1..=MAX_HISTORY_LIMIT`.
    pub async fn history(
        &self,
        limit: u32,
    ) -> Result<Vec<CalculationResult>, RepositoryError> {
        let limit = limit.clamp(1, MAX_HISTORY_LIMIT);
        let results = self.repository.recent_calculations(limit).await?;
        debug!(limit, returned = results.len(), "history loaded");
        Ok(results)
    }

    pub async fn find(
        &self,
        id: Uuid,
    ) -> Result<CalculationResult, RepositoryError> {
        self.repository.get_calculation(id).await
    }
}
