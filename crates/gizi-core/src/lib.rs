//! gizi-core - Core types and contracts for the gizi nutrition screening service
//!
//! This crate holds everything the HTTP layer and the store implementations
//! agree on: the nutrition status enumeration and its recommendation table,
//! bearer token resolution, the persisted models, and the `AnalysisStore`
//! trait that backends implement.

pub mod auth;
pub mod error;
pub mod models;
pub mod recommendation;
pub mod store;

pub use auth::{Caller, Claims, TokenResolver, DEFAULT_JWT_SECRET, GUEST_TOKEN};
pub use error::{AuthError, StoreError, StoreResult};
pub use models::{Analysis, NewAnalysis, User, UserAnalyses};
pub use recommendation::{recommendations, NutritionStatus};
pub use store::AnalysisStore;
