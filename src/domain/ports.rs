use crate::domain::model::{DevicePosition, GeocodeMatch, GpsOptions, IpLocation, PositionError};
use crate::utils::error::Result;
use async_trait::async_trait;
use url::Url;

#[async_trait]
pub trait IpGeolocationProvider: Send + Sync {
    async fn lookup(&self) -> Result<IpLocation>;
}

#[async_trait]
pub trait DeviceGeolocation: Send + Sync {
    async fn current_position(
        &self,
        options: GpsOptions,
    ) -> std::result::Result<DevicePosition, PositionError>;
}

#[async_trait]
pub trait GeocodingProvider: Send + Sync {
    /// Matches best-first. An empty list means the address was not found.
    async fn geocode(&self, address: &str) -> Result<Vec<GeocodeMatch>>;
}

/// Hands a URL to the platform (browser, dialer). Fire-and-forget.
pub trait ExternalLauncher: Send + Sync {
    fn open_external(&self, url: &Url);
}
