//! HTTP request handlers

pub mod detection;
pub mod forecast;
pub mod health;
pub mod weather;

pub use detection::summarize_detection;
pub use forecast::{create_district_forecast, create_forecast, create_harvest_plan};
pub use health::{health_check, root};
pub use weather::get_daily_forecast;
