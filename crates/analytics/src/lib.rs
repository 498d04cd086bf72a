//! # Z-test Analytics Engine
//!
//! This crate performs the one statistical calculation of the application: the one-sample
//! Z-test for a proportion.
//!
//! ## Architectural Principles
//!
//! - **Pure Logic:** This crate has no knowledge of the CLI, the web server or the chart
//!   renderer. It depends only on `core-types`.
//! - **Stateless Calculation:** The `ProportionZTest` engine takes a `ZTestInput` and produces
//!   a `ZTestResult` (or a full `ZTestReport`). The same input always gives the same output.
//!
//! ## Public API
//!
//! - `ProportionZTest`: The engine holding the calculation logic.
//! - `ZTestResult` / `ZTestReport`: The standardized outputs consumed by presentation layers.
//! - `CriticalRegion`: The rejection region used to annotate charts.
//! - `AnalyticsError` / `ValidationError`: The errors that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod distribution;
pub mod engine;
pub mod error;
pub mod report;

// Re-export the key components to create a clean, public-facing API.
pub use core_types::{TailMode, ZTestInput};
pub use engine::ProportionZTest;
pub use error::{AnalyticsError, ValidationError};
pub use report::{CriticalRegion, ZTestReport, ZTestResult};
