// Adapters layer: concrete implementations of the domain ports (HTTP providers, device, link launching).

pub mod device;
pub mod http;
pub mod launcher;

pub use device::FixedDeviceGeolocation;
pub use http::{IpApiProvider, NominatimGeocoder};
pub use launcher::PrintLauncher;

#[cfg(feature = "cli")]
pub use launcher::SystemLauncher;
