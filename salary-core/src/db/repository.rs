use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::CalculationResult;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("Record not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Append-only store of salary calculations.
#[async_trait]
pub trait CalculationRepository: Send + Sync {
    async fn insert_calculation(
        &self,
        result: &CalculationResult,
    ) -> Result<(), RepositoryError>;

    async fn get_calculation(
        &self,
        id: Uuid,
    ) -> Result<CalculationResult, RepositoryError>;

    /// Up to `limit` results, newest first.
    async fn recent_calculations(
        &self,
        limit: u32,
    ) -> Result<Vec<CalculationResult>, RepositoryError>;
}
