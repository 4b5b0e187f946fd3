use async_trait::async_trait;
use salary_core::db::{CalculationRepository, DbConfig, RepositoryError, RepositoryFactory};
use tracing::info;

use crate::repository::SqliteRepository;

/// [`RepositoryFactory`] for the `"sqlite"` backend.
///
/// ```rust,no_run
/// use salary_core::RepositoryRegistry;
/// use salary_db_sqlite::SqliteRepositoryFactory;
///
/// let mut registry = RepositoryRegistry::new();
/// registry.register(Box::new(SqliteRepositoryFactory));
/// ```
pub struct SqliteRepositoryFactory;

#[async_trait]
impl RepositoryFactory for SqliteRepositoryFactory {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    /// `config.connection_string` is a file path (created when missing), a
    /// `sqlite:` URL, or `sqlite::memory:` for a throwaway database.
    async fn create(
        &self,
        config: &DbConfig,
    ) -> Result<Box<dyn CalculationRepository>, RepositoryError> {
        let repo = SqliteRepository::new(&config.connection_string)
            .await
            .map_err(|e| RepositoryError::Connection(format!("{e:#}")))?;
        repo.run_migrations()
            .await
            .map_err(|e| RepositoryError::Database(format!("{e:#}")))?;

        info!(database = %config.connection_string, "sqlite repository ready");
        Ok(Box::new(repo))
    }
}
