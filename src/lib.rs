pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use crate::core::care_plan::{compute_nutrition_plan, compute_vaccination_schedule};
pub use crate::core::links::VetLinks;
pub use crate::core::resolver::{Attempt, LocationResolver};
pub use config::AppConfig;
pub use utils::error::{CareError, Result};
