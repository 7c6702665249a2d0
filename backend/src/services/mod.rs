//! Business logic services for the harvest forecast server

pub mod forecast;
pub mod reporting;
pub mod weather;

pub use forecast::ForecastService;
pub use reporting::ReportingService;
pub use weather::WeatherService;
