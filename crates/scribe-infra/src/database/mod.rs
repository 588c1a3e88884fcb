//! Persistence - SeaORM repositories and in-memory fallbacks.

mod connections;
mod memory;

#[cfg(feature = "database")]
pub mod entity;
#[cfg(feature = "database")]
mod sql_base;
#[cfg(feature = "database")]
mod sql_repo;

pub use connections::DatabaseConfig;
pub use memory::{InMemoryPostRepository, InMemoryUserRepository};

#[cfg(feature = "database")]
pub use connections::connect;
#[cfg(feature = "database")]
pub use sql_base::SqlBaseRepository;
#[cfg(feature = "database")]
pub use sql_repo::{SqlPostRepository, SqlUserRepository};

#[cfg(feature = "database")]
#[cfg(test)]
mod tests;
