//! Location resolution fallback chain.
//!
//! Stages, in priority order:
//! 1. IP-approximate lookup, run automatically.
//! 2. GPS-precise fix, run on explicit user request.
//! 3. Manual address geocoding, run on explicit user request.
//! 4. A fixed default location, used only when stage 1 fails.
//!
//! Stage 1 failures are silent and fall straight through to stage 4. GPS and
//! geocoding failures are reported to the user. Only one attempt runs at a
//! time; a trigger that arrives while another attempt is in flight is
//! ignored.

use crate::core::links::VetLinks;
use crate::domain::model::{
    FailureReason, GeoCoordinate, GpsOptions, IpLocation, LocationState, PositionError, Precision,
    ResolvedLocation,
};
use crate::domain::ports::{DeviceGeolocation, ExternalLauncher, GeocodingProvider, IpGeolocationProvider};
use std::sync::{Mutex, MutexGuard, PoisonError};
use url::Url;

pub const GPS_LABEL: &str = "Your precise location";
pub const APPROXIMATE_LABEL: &str = "Approximate location";

/// What a trigger did to the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attempt {
    /// A new location was stored.
    Applied(Precision),
    /// An automatic stage succeeded but the current location outranks it.
    Kept,
    Failed(FailureReason),
    /// Another attempt was already in flight.
    Ignored,
}

#[derive(Debug)]
struct ResolverInner {
    state: LocationState,
    last_known: Option<ResolvedLocation>,
    message: Option<String>,
}

pub struct LocationResolver<I, G, D> {
    ip_provider: I,
    geocoder: G,
    device: D,
    default_location: ResolvedLocation,
    links: VetLinks,
    inner: Mutex<ResolverInner>,
}

impl<I, G, D> LocationResolver<I, G, D>
where
    I: IpGeolocationProvider,
    G: GeocodingProvider,
    D: DeviceGeolocation,
{
    pub fn new(ip_provider: I, geocoder: G, device: D) -> Self {
        Self {
            ip_provider,
            geocoder,
            device,
            default_location: default_location(),
            links: VetLinks::default(),
            inner: Mutex::new(ResolverInner {
                state: LocationState::Unresolved,
                last_known: None,
                message: None,
            }),
        }
    }

    pub fn with_default_location(mut self, location: ResolvedLocation) -> Self {
        self.default_location = ResolvedLocation {
            precision: Precision::DefaultFallback,
            ..location
        };
        self
    }

    pub fn with_links(mut self, links: VetLinks) -> Self {
        self.links = links;
        self
    }

    pub fn state(&self) -> LocationState {
        self.lock().state.clone()
    }

    /// The most recent successful resolution, kept across later failures.
    pub fn last_known(&self) -> Option<ResolvedLocation> {
        self.lock().last_known.clone()
    }

    /// User-facing message from the last failed user-triggered attempt.
    pub fn message(&self) -> Option<String> {
        self.lock().message.clone()
    }

    /// Stages 1 and 4: IP lookup, falling back to the default location.
    pub async fn resolve_approximate(&self) -> Attempt {
        let Some(attempt) = self.begin() else {
            tracing::debug!("Location attempt already in flight, ignoring IP lookup");
            return Attempt::Ignored;
        };

        let location = match self.ip_provider.lookup().await {
            Ok(answer) => match approximate_location(answer) {
                Some(location) => location,
                None => {
                    tracing::debug!("IP lookup returned no usable coordinate, using default");
                    self.default_location.clone()
                }
            },
            Err(e) => {
                tracing::debug!("IP lookup failed, using default location: {}", e);
                self.default_location.clone()
            }
        };

        attempt.finish(|inner, previous| {
            let outranked = inner
                .last_known
                .as_ref()
                .is_some_and(|current| current.precision.rank() > location.precision.rank());
            if outranked {
                inner.state = previous;
                return Attempt::Kept;
            }

            let precision = location.precision;
            tracing::info!("Location resolved ({}): {}", precision, location.label);
            inner.state = LocationState::Resolved(location.clone());
            inner.last_known = Some(location);
            Attempt::Applied(precision)
        })
    }

    /// Stage 2. Failures are reported and never fall back automatically.
    pub async fn request_gps_location(&self) -> Attempt {
        let Some(attempt) = self.begin() else {
            tracing::debug!("Location attempt already in flight, ignoring GPS request");
            return Attempt::Ignored;
        };

        let options = GpsOptions::PRECISE;
        let fix = match tokio::time::timeout(options.timeout, self.device.current_position(options))
            .await
        {
            Ok(Ok(position)) => GeoCoordinate::new(position.latitude, position.longitude)
                .map_err(|e| {
                    tracing::warn!("Device reported an invalid position: {}", e);
                    PositionError::PositionUnavailable
                }),
            Ok(Err(e)) => Err(e),
            Err(_) => Err(PositionError::Timeout),
        };

        attempt.finish(|inner, _previous| match fix {
            Ok(coordinate) => {
                let location = ResolvedLocation {
                    coordinate,
                    label: GPS_LABEL.to_string(),
                    precision: Precision::GpsPrecise,
                };
                tracing::info!("Location resolved (GPS): {}", coordinate);
                inner.state = LocationState::Resolved(location.clone());
                inner.last_known = Some(location);
                Attempt::Applied(Precision::GpsPrecise)
            }
            Err(e) => {
                let reason = FailureReason::from(e);
                tracing::info!("GPS request failed: {}", reason);
                let fallback = inner.last_known.as_ref().map(|l| l.label.as_str());
                inner.message = Some(reason.user_message(fallback));
                inner.state = LocationState::Failed { reason };
                Attempt::Failed(reason)
            }
        })
    }

    /// Stage 3. An address that cannot be found leaves an existing resolution
    /// in place and only sets the message.
    pub async fn submit_manual_location(&self, address: &str) -> Attempt {
        let Some(attempt) = self.begin() else {
            tracing::debug!("Location attempt already in flight, ignoring manual address");
            return Attempt::Ignored;
        };

        let address = address.trim();
        let found = if address.is_empty() {
            None
        } else {
            match self.geocoder.geocode(address).await {
                Ok(matches) => matches.into_iter().next().and_then(|m| {
                    match GeoCoordinate::new(m.latitude, m.longitude) {
                        Ok(coordinate) => Some(ResolvedLocation {
                            coordinate,
                            label: m.formatted_address,
                            precision: Precision::ManualGeocoded,
                        }),
                        Err(e) => {
                            tracing::warn!("Geocoder returned an invalid coordinate: {}", e);
                            None
                        }
                    }
                }),
                Err(e) => {
                    tracing::warn!("Geocoding '{}' failed: {}", address, e);
                    None
                }
            }
        };

        attempt.finish(|inner, previous| match found {
            Some(location) => {
                tracing::info!("Location resolved (address): {}", location.label);
                inner.state = LocationState::Resolved(location.clone());
                inner.last_known = Some(location);
                Attempt::Applied(Precision::ManualGeocoded)
            }
            None => {
                let reason = FailureReason::LocationNotFound;
                inner.message = Some(reason.user_message(None));
                inner.state = match previous {
                    resolved @ LocationState::Resolved(_) => resolved,
                    _ => LocationState::Failed { reason },
                };
                Attempt::Failed(reason)
            }
        })
    }

    /// Opens a map search for nearby vets. Does nothing unless resolved.
    pub fn search_nearby_vets<L>(&self, launcher: &L) -> Option<Url>
    where
        L: ExternalLauncher + ?Sized,
    {
        let url = {
            let inner = self.lock();
            let location = inner.state.resolved()?;
            self.links.nearby_search(&location.coordinate)
        };
        launcher.open_external(&url);
        Some(url)
    }

    /// Dials the emergency vet line. Does nothing unless resolved.
    pub fn call_emergency<L>(&self, launcher: &L) -> Option<Url>
    where
        L: ExternalLauncher + ?Sized,
    {
        if self.lock().state.resolved().is_none() {
            return None;
        }
        let url = match self.links.emergency_call() {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!("Cannot build emergency call link: {}", e);
                return None;
            }
        };
        launcher.open_external(&url);
        Some(url)
    }

    fn begin(&self) -> Option<InFlight<'_>> {
        let mut inner = self.lock();
        if inner.state.is_resolving() {
            return None;
        }
        let previous = std::mem::replace(&mut inner.state, LocationState::Resolving);
        inner.message = None;
        Some(InFlight {
            inner: &self.inner,
            previous: Some(previous),
        })
    }

    fn lock(&self) -> MutexGuard<'_, ResolverInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Marks an attempt in flight. Dropping it unfinished (the caller's future was
/// cancelled) puts the previous state back.
struct InFlight<'a> {
    inner: &'a Mutex<ResolverInner>,
    previous: Option<LocationState>,
}

impl InFlight<'_> {
    fn finish<F>(mut self, apply: F) -> Attempt
    where
        F: FnOnce(&mut ResolverInner, LocationState) -> Attempt,
    {
        let previous = self.previous.take().unwrap_or(LocationState::Unresolved);
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        apply(&mut inner, previous)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take() {
            let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            inner.state = previous;
        }
    }
}

pub fn default_location() -> ResolvedLocation {
    ResolvedLocation {
        coordinate: GeoCoordinate {
            latitude: 28.6139,
            longitude: 77.2090,
        },
        label: "New Delhi, India".to_string(),
        precision: Precision::DefaultFallback,
    }
}

fn approximate_location(answer: IpLocation) -> Option<ResolvedLocation> {
    let coordinate = GeoCoordinate::new(answer.latitude?, answer.longitude?).ok()?;
    let parts: Vec<&str> = [answer.city.as_deref(), answer.region.as_deref()]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect();
    let label = if parts.is_empty() {
        APPROXIMATE_LABEL.to_string()
    } else {
        parts.join(", ")
    };

    Some(ResolvedLocation {
        coordinate,
        label,
        precision: Precision::IpApproximate,
    })
}
