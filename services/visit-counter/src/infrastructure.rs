// Infrastructure layer modules
pub mod config;
pub mod counter_repository;
pub mod logging;
pub mod table_provisioner;

// Re-exports
pub use config::{build_client, CounterConfig, CounterConfigError};
pub use counter_repository::{CounterRepository, CounterRepositoryError, DynamoCounterRepository};
pub use logging::init_logging;
pub use table_provisioner::{
    CreateTableOutcome, DynamoTableProvisioner, ProvisionError, SeedOutcome, TableProvisioner,
};
