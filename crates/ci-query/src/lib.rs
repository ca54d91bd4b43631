//! Persistence abstraction for the compliance intelligence service.
//!
//! [`ComplianceStore`] is the only way the rest of the service touches
//! storage. [`adapters::postgres::PostgresStore`] backs production
//! deployments; [`adapters::memory::InMemoryStore`] backs tests and local
//! development without a database.

mod error;
mod store;

pub mod adapters;

pub use error::{QueryError, QueryResult};
pub use store::ComplianceStore;

pub use adapters::memory::InMemoryStore;
pub use adapters::postgres::PostgresStore;
