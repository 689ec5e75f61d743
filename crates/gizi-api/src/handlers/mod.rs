//! HTTP request handlers for the gizi API
//!
//! These handlers use the AnalysisStore trait and are store-agnostic.

pub mod analyst;
