use std::str::FromStr;

use rust_decimal::Decimal;
use salary_core::RepositoryError;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, TypeInfo, ValueRef};

/// Reads a money column. Amounts are written as TEXT, but INTEGER and REAL
/// cells (hand-edited rows, older dumps) are accepted too. NULL reads as zero.
pub fn get_decimal(
    row: &SqliteRow,
    column: &str,
) -> Result<Decimal, RepositoryError> {
    let value_ref = row
        .try_get_raw(column)
        .map_err(|e| RepositoryError::Database(format!("Column '{column}' not found: {e}")))?;

    if value_ref.is_null() {
        return Ok(Decimal::ZERO);
    }

    let type_name = value_ref.type_info().name().to_string();
    match type_name.as_str() {
        "TEXT" => {
            let text: String = row.try_get(column).map_err(|e| {
                RepositoryError::Database(format!("Failed to read TEXT from '{column}': {e}"))
            })?;
            Decimal::from_str(text.trim()).map_err(|e| {
                RepositoryError::Database(format!("'{column}' holds '{text}', not a decimal: {e}"))
            })
        }
        "INTEGER" => {
            let value: i64 = row.try_get(column).map_err(|e| {
                RepositoryError::Database(format!("Failed to read INTEGER from '{column}': {e}"))
            })?;
            Ok(Decimal::from(value))
        }
        "REAL" => {
            let value: f64 = row.try_get(column).map_err(|e| {
                RepositoryError::Database(format!("Failed to read REAL from '{column}': {e}"))
            })?;
            Decimal::try_from(value).map_err(|e| {
                RepositoryError::Database(format!("Failed to convert {value} to Decimal: {e}"))
            })
        }
        other => Err(RepositoryError::Database(format!(
            "Unexpected type '{other}' for column '{column}'"
        ))),
    }
}

/// Text form written to money columns.
pub fn decimal_to_text(value: Decimal) -> String {
    value.normalize().to_string()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

    use super::*;

    async fn setup_test_db() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("Failed to create in-memory database");

        sqlx::query("CREATE TABLE amounts (id INTEGER PRIMARY KEY, value)")
            .execute(&pool)
            .await
            .expect("Failed to create test table");
        pool
    }

    async fn read_back(
        pool: &SqlitePool,
        insert: &str,
    ) -> Result<Decimal, RepositoryError> {
        sqlx::query(insert)
            .execute(pool)
            .await
            .expect("Failed to insert test data");

        let row = sqlx::query("SELECT value FROM amounts WHERE id = 1")
            .fetch_one(pool)
            .await
            .expect("Failed to fetch row");

        get_decimal(&row, "value")
    }

    #[tokio::test]
    async fn reads_text_exactly() {
        let pool = setup_test_db().await;

        let value = read_back(&pool, "INSERT INTO amounts VALUES (1, '46675.2577')").await;

        assert_eq!(value, Ok(dec!(46675.2577)));
    }

    #[tokio::test]
    async fn reads_integer() {
        let pool = setup_test_db().await;

        let value = read_back(&pool, "INSERT INTO amounts VALUES (1, 50000)").await;

        assert_eq!(value, Ok(dec!(50000)));
    }

    #[tokio::test]
    async fn reads_real() {
        let pool = setup_test_db().await;

        let value = read_back(&pool, "INSERT INTO amounts VALUES (1, 1775.5)").await;

        assert_eq!(value, Ok(dec!(1775.5)));
    }

    #[tokio::test]
    async fn null_reads_as_zero() {
        let pool = setup_test_db().await;

        let value = read_back(&pool, "INSERT INTO amounts VALUES (1, NULL)").await;

        assert_eq!(value, Ok(Decimal::ZERO));
    }

    #[tokio::test]
    async fn garbage_text_is_a_database_error() {
        let pool = setup_test_db().await;

        let value = read_back(&pool, "INSERT INTO amounts VALUES (1, 'cinquenta')").await;

        assert!(matches!(value, Err(RepositoryError::Database(msg)) if msg.contains("cinquenta")));
    }

    #[tokio::test]
    async fn missing_column_is_a_database_error() {
        let pool = setup_test_db().await;
        sqlx::query("INSERT INTO amounts VALUES (1, 1)")
            .execute(&pool)
            .await
            .expect("Failed to insert test data");
        let row = sqlx::query("SELECT value FROM amounts")
            .fetch_one(&pool)
            .await
            .expect("Failed to fetch row");

        assert!(matches!(get_decimal(&row, "salary"), Err(RepositoryError::Database(_))));
    }

    #[test]
    fn text_form_drops_trailing_zeros() {
        assert_eq!(decimal_to_text(dec!(38225.00)), "38225");
        assert_eq!(decimal_to_text(dec!(0.0300)), "0.03");
    }
}
