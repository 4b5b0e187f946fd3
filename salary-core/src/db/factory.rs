use std::collections::HashMap;

use async_trait::async_trait;

use super::repository::{CalculationRepository, RepositoryError};

/// Which storage backend to open and how to reach it.
///
/// `backend` selects a registered [`RepositoryFactory`] by name;
/// `connection_string` is handed to it untouched.
///
/// | backend  | connection_string examples          |
/// |----------|-------------------------------------|
/// | `sqlite` | `salary.db`, `sqlite::memory:`      |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub backend: String,
    pub connection_string: String,
}

impl DbConfig {
    pub fn new(
        backend: impl Into<String>,
        connection_string: impl Into<String>,
    ) -> Self {
        Self {
            backend: backend.into(),
            connection_string: connection_string.into(),
        }
    }
}

impl Default for DbConfig {
    fn default() -> Self {
        Self::new("sqlite", "salary.db")
    }
}

/// Opens a [`CalculationRepository`] for one backend. Backend crates export
/// a unit struct implementing this and the binaries register it at startup.
#[async_trait]
pub trait RepositoryFactory: Send + Sync {
    /// Lowercase name matched against [`DbConfig::backend`].
    fn backend_name(&self) -> &'static str;

    /// Connects, applies pending migrations and returns the repository.
    async fn create(
        &self,
        config: &DbConfig,
    ) -> Result<Box<dyn CalculationRepository>, RepositoryError>;
}

/// Backend name to factory lookup.
#[derive(Default)]
pub struct RepositoryRegistry {
    factories: HashMap<&'static str, Box<dyn RepositoryFactory>>,
}

impl RepositoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a factory, replacing any earlier one with the same name.
    pub fn register(
        &mut self,
        factory: Box<dyn RepositoryFactory>,
    ) {
        self.factories.insert(factory.backend_name(), factory);
    }

    /// Registered backend names in alphabetical order.
    pub fn available_backends(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.factories.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Opens a repository through the factory named by `config.backend`.
    ///
    /// # Errors
    /// [`RepositoryError::Configuration`] when no such backend is registered,
    /// otherwise whatever the factory reports.
    pub async fn create(
        &self,
        config: &DbConfig,
    ) -> Result<Box<dyn CalculationRepository>, RepositoryError> {
        let factory = self.factories.get(config.backend.as_str()).ok_or_else(|| {
            RepositoryError::Configuration(format!(
                "unknown backend '{}'; available: {:?}",
                config.backend,
                self.available_backends()
            ))
        })?;

        factory.create(config).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use uuid::Uuid;

    use super::*;
    use crate::models::CalculationResult;

    // Never queried; the registry tests only check routing.
    struct NullRepository;

    #[async_trait]
    impl CalculationRepository for NullRepository {
        async fn insert_calculation(
            &self,
            _result: &CalculationResult,
        ) -> Result<(), RepositoryError> {
            Ok(())
        }

        async fn get_calculation(
            &self,
            _id: Uuid,
        ) -> Result<CalculationResult, RepositoryError> {
            Err(RepositoryError::NotFound)
        }

        async fn recent_calculations(
            &self,
            _limit: u32,
        ) -> Result<Vec<CalculationResult>, RepositoryError> {
            Ok(Vec::new())
        }
    }

    struct RecordingFactory {
        name: &'static str,
        opened: Arc<AtomicBool>,
    }

    #[async_trait]
    impl RepositoryFactory for RecordingFactory {
        fn backend_name(&self) -> &'static str {
            self.name
        }

        async fn create(
            &self,
            _config: &DbConfig,
        ) -> Result<Box<dyn CalculationRepository>, RepositoryError> {
            self.opened.store(true, Ordering::SeqCst);
            Ok(Box::new(NullRepository))
        }
    }

    struct UnreachableFactory;

    #[async_trait]
    impl RepositoryFactory for UnreachableFactory {
        fn backend_name(&self) -> &'static str {
            "unreachable"
        }

        async fn create(
            &self,
            config: &DbConfig,
        ) -> Result<Box<dyn CalculationRepository>, RepositoryError> {
            Err(RepositoryError::Connection(format!(
                "cannot open {}",
                config.connection_string
            )))
        }
    }

    fn recording(name: &'static str) -> (Box<dyn RepositoryFactory>, Arc<AtomicBool>) {
        let opened = Arc::new(AtomicBool::new(false));
        let factory = RecordingFactory {
            name,
            opened: Arc::clone(&opened),
        };
        (Box::new(factory), opened)
    }

    #[test]
    fn default_config_opens_local_sqlite_file() {
        assert_eq!(DbConfig::default(), DbConfig::new("sqlite", "salary.db"));
    }

    #[test]
    fn backends_are_listed_alphabetically() {
        let mut registry = RepositoryRegistry::new();
        registry.register(recording("sqlite").0);
        registry.register(recording("postgres").0);
        registry.register(recording("sqlite").0);

        assert_eq!(registry.available_backends(), vec!["postgres", "sqlite"]);
    }

    #[tokio::test]
    async fn create_routes_to_named_backend() {
        let mut registry = RepositoryRegistry::new();
        let (sqlite, sqlite_opened) = recording("sqlite");
        let (postgres, postgres_opened) = recording("postgres");
        registry.register(sqlite);
        registry.register(postgres);

        let repo = registry
            .create(&DbConfig::new("sqlite", "sqlite::memory:"))
            .await
            .expect("sqlite backend is registered");

        assert!(sqlite_opened.load(Ordering::SeqCst));
        assert!(!postgres_opened.load(Ordering::SeqCst));
        assert_eq!(repo.recent_calculations(10).await, Ok(Vec::new()));
    }

    #[tokio::test]
    async fn unknown_backend_is_a_configuration_error() {
        let mut registry = RepositoryRegistry::new();
        registry.register(recording("sqlite").0);

        match registry.create(&DbConfig::new("mysql", "x")).await {
            Err(RepositoryError::Configuration(msg)) => {
                assert!(msg.contains("mysql"));
                assert!(msg.contains("sqlite"));
            }
            Err(other) => panic!("expected configuration error, got {other:?}"),
            Ok(_) => panic!("expected configuration error, got a repository"),
        }
    }

    #[tokio::test]
    async fn factory_errors_are_passed_through() {
        let mut registry = RepositoryRegistry::new();
        registry.register(Box::new(UnreachableFactory));

        let err = registry
            .create(&DbConfig::new("unreachable", "/no/such/dir/salary.db"))
            .await
            .err();

        assert_eq!(
            err,
            Some(RepositoryError::Connection(
                "cannot open /no/such/dir/salary.db".to_string()
            ))
        );
    }
}
