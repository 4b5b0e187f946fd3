use std::str::FromStr;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use salary_core::{
    CalculationRepository, CalculationResult, CalculationType, RepositoryError,
    SalaryComputation,
};
use sqlx::Row;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use tracing::debug;
use uuid::Uuid;

use crate::decimal::{decimal_to_text, get_decimal};

const SELECT_COLUMNS: &str = "SELECT id, calculation_type, gross_salary, net_salary, irps_tax,
        inss_employee, inss_employer, medical_aid, loans, other_discounts,
        total_discounts, dependents, dependents_deduction, bracket_matched, timestamp
     FROM salary_calculations";

pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    /// Opens `database_url`, creating the file if needed. Accepts a bare path,
    /// a `sqlite:` URL or `sqlite::memory:`.
    pub async fn new(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .with_context(|| format!("Invalid database location: {database_url}"))?
            .create_if_missing(true);

        // Every in-memory connection is its own database.
        let max_connections = if database_url.contains(":memory:") { 1 } else { 5 };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to connect to database: {database_url}"))?;
        Ok(Self { pool })
    }

    pub fn new_with_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run database migrations")?;
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn column_error(
    column: &str,
    e: impl std::fmt::Display,
) -> RepositoryError {
    RepositoryError::Database(format!("Failed to get {column}: {e}"))
}

fn row_to_calculation(row: &SqliteRow) -> Result<CalculationResult, RepositoryError> {
    let id: String = row.try_get("id").map_err(|e| column_error("id", e))?;
    let id = Uuid::parse_str(&id)
        .map_err(|e| RepositoryError::Database(format!("Stored id '{id}' is not a UUID: {e}")))?;

    let kind: String = row
        .try_get("calculation_type")
        .map_err(|e| column_error("calculation_type", e))?;
    let calculation_type = CalculationType::parse(&kind).ok_or_else(|| {
        RepositoryError::Database(format!("Unknown calculation_type '{kind}'"))
    })?;

    let dependents: i64 = row
        .try_get("dependents")
        .map_err(|e| column_error("dependents", e))?;
    let dependents = u32::try_from(dependents)
        .map_err(|_| RepositoryError::Database(format!("Invalid dependents {dependents}")))?;

    let computation = SalaryComputation {
        gross_salary: get_decimal(row, "gross_salary")?,
        net_salary: get_decimal(row, "net_salary")?,
        irps_tax: get_decimal(row, "irps_tax")?,
        inss_employee: get_decimal(row, "inss_employee")?,
        inss_employer: get_decimal(row, "inss_employer")?,
        medical_aid: get_decimal(row, "medical_aid")?,
        loans: get_decimal(row, "loans")?,
        other_discounts: get_decimal(row, "other_discounts")?,
        total_discounts: get_decimal(row, "total_discounts")?,
        dependents,
        dependents_deduction: get_decimal(row, "dependents_deduction")?,
        bracket_matched: row
            .try_get("bracket_matched")
            .map_err(|e| column_error("bracket_matched", e))?,
    };

    let timestamp = row
        .try_get::<DateTime<Utc>, _>("timestamp")
        .map_err(|e| column_error("timestamp", e))?;

    Ok(CalculationResult::with_identity(
        id,
        timestamp,
        computation,
        calculation_type,
    ))
}

#[async_trait]
impl CalculationRepository for SqliteRepository {
    async fn insert_calculation(
        &self,
        result: &CalculationResult,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO salary_calculations (
                id, calculation_type, gross_salary, net_salary, irps_tax,
                inss_employee, inss_employer, medical_aid, loans, other_discounts,
                total_discounts, dependents, dependents_deduction, bracket_matched, timestamp
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(result.id.to_string())
        .bind(result.calculation_type.as_str())
        .bind(decimal_to_text(result.gross_salary))
        .bind(decimal_to_text(result.net_salary))
        .bind(decimal_to_text(result.irps_tax))
        .bind(decimal_to_text(result.inss_employee))
        .bind(decimal_to_text(result.inss_employer))
        .bind(decimal_to_text(result.medical_aid))
        .bind(decimal_to_text(result.loans))
        .bind(decimal_to_text(result.other_discounts))
        .bind(decimal_to_text(result.total_discounts))
        .bind(i64::from(result.dependents))
        .bind(decimal_to_text(result.dependents_deduction))
        .bind(result.bracket_matched)
        .bind(result.timestamp)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        debug!(id = %result.id, "calculation stored");
        Ok(())
    }

    async fn get_calculation(
        &self,
        id: Uuid,
    ) -> Result<CalculationResult, RepositoryError> {
        let row = sqlx::query(&format!("{SELECT_COLUMNS} WHERE id = ?"))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?
            .ok_or(RepositoryError::NotFound)?;

        row_to_calculation(&row)
    }

    async fn recent_calculations(
        &self,
        limit: u32,
    ) -> Result<Vec<CalculationResult>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "{SELECT_COLUMNS} ORDER BY timestamp DESC, rowid DESC LIMIT ?"
        ))
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        rows.iter().map(row_to_calculation).collect()
    }
}
