use crate::domain::model::{DevicePosition, GpsOptions, PositionError};
use crate::domain::ports::DeviceGeolocation;
use async_trait::async_trait;

/// Device capability for hosts without a positioning sensor. Answers every
/// request with the same configured fix or error.
#[derive(Debug, Clone)]
pub struct FixedDeviceGeolocation {
    answer: Result<DevicePosition, PositionError>,
}

impl FixedDeviceGeolocation {
    pub fn at(latitude: f64, longitude: f64) -> Self {
        Self {
            answer: Ok(DevicePosition {
                latitude,
                longitude,
            }),
        }
    }

    pub fn failing(error: PositionError) -> Self {
        Self { answer: Err(error) }
    }

    /// No sensor attached.
    pub fn unavailable() -> Self {
        Self::failing(PositionError::PositionUnavailable)
    }
}

#[async_trait]
impl DeviceGeolocation for FixedDeviceGeolocation {
    async fn current_position(
        &self,
        options: GpsOptions,
    ) -> Result<DevicePosition, PositionError> {
        tracing::debug!(
            "Position requested (high_accuracy={}, timeout={:?}, maximum_age={:?})",
            options.high_accuracy,
            options.timeout,
            options.maximum_age
        );
        self.answer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fixed_position() {
        let device = FixedDeviceGeolocation::at(22.3, 70.8);
        let position = device.current_position(GpsOptions::PRECISE).await.unwrap();
        assert_eq!(position.latitude, 22.3);
        assert_eq!(position.longitude, 70.8);
    }

    #[tokio::test]
    async fn test_unavailable_device() {
        let device = FixedDeviceGeolocation::unavailable();
        assert_eq!(
            device.current_position(GpsOptions::PRECISE).await,
            Err(PositionError::PositionUnavailable)
        );
    }
}
