//! Shared types and forecasting logic for the AgriVision harvest planner
//!
//! This crate contains the models and the pure forecasting kernels shared
//! between the backend and the browser (via WASM).

pub mod error;
pub mod forecast;
pub mod models;
pub mod types;
pub mod validation;

pub use error::ForecastError;
pub use forecast::{run_forecast, ForecastInput};
pub use models::*;
pub use types::*;
pub use validation::*;
