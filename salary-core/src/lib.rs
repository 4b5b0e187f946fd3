//! Mozambican payroll: IRPS withholding, INSS contributions and the
//! gross/net salary calculator, plus the storage abstraction its results
//! are kept behind.

pub mod calculations;
pub mod db;
pub mod models;
pub mod service;
pub mod tables;

pub use db::{CalculationRepository, DbConfig, RepositoryError, RepositoryFactory, RepositoryRegistry};
pub use models::*;
pub use service::{DEFAULT_HISTORY_LIMIT, MAX_HISTORY_LIMIT, PayrollService};
pub use tables::{IrpsSchedule, ScheduleParseError};
