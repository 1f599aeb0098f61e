pub mod care_plan;
pub mod links;
pub mod resolver;

pub use crate::domain::model::{
    CarePlan, LocationState, NutritionInput, NutritionPlan, Precision, ResolvedLocation,
    VaccinationInput, VaccinationSchedule,
};
pub use crate::domain::ports::{
    DeviceGeolocation, ExternalLauncher, GeocodingProvider, IpGeolocationProvider,
};
pub use crate::utils::error::Result;
