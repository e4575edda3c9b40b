//! Infrastructure Layer
//!
//! Database and in-memory implementations of the repository traits.

pub mod memory;
pub mod postgres;

pub use memory::MemoryRepository;
pub use postgres::PgGatewayRepository;
