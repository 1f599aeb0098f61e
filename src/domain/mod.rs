// Domain layer: care-plan and location models plus the capability ports the core depends on.

pub mod model;
pub mod ports;
