//! Domain models for the harvest forecast

mod controls;
mod detection;
mod forecast;
mod pipeline;
mod stage;
mod weather;

pub use controls::*;
pub use detection::*;
pub use forecast::*;
pub use pipeline::*;
pub use stage::*;
pub use weather::*;
