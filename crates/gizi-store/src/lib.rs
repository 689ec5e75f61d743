//! gizi-store - AnalysisStore implementations
//!
//! - [`PgAnalysisStore`]: PostgreSQL via sqlx, used in production
//! - [`MemoryAnalysisStore`]: lock-guarded maps, used by tests and the
//!   daemon's `--memory` demo mode

pub mod memory;
pub mod postgres;

pub use memory::MemoryAnalysisStore;
pub use postgres::{connect, PgAnalysisStore};
