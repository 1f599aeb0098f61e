use crate::config::toml_config::AppConfig;
use crate::domain::model::{GeocodeMatch, IpLocation};
use crate::domain::ports::{GeocodingProvider, IpGeolocationProvider};
use crate::utils::error::{CareError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

const IP_PROVIDER: &str = "ip-lookup";
const GEOCODING_PROVIDER: &str = "geocoding";
const GEOCODE_RESULT_LIMIT: &str = "5";

pub fn build_client(user_agent: &str, timeout: Duration) -> Result<Client> {
    let client = Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .build()?;
    Ok(client)
}

/// IP geolocation over an ipapi.co-style JSON endpoint.
pub struct IpApiProvider {
    endpoint: String,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    latitude: Option<f64>,
    longitude: Option<f64>,
    city: Option<String>,
    region: Option<String>,
    #[serde(default)]
    error: bool,
    reason: Option<String>,
}

impl IpApiProvider {
    pub fn new(endpoint: impl Into<String>, client: Client) -> Self {
        Self {
            endpoint: endpoint.into(),
            client,
        }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let client = build_client(&config.providers.user_agent, config.request_timeout())?;
        Ok(Self::new(config.providers.ip_lookup_url.clone(), client))
    }
}

#[async_trait]
impl IpGeolocationProvider for IpApiProvider {
    async fn lookup(&self) -> Result<IpLocation> {
        tracing::debug!("Requesting IP location from: {}", self.endpoint);
        let response = self.client.get(&self.endpoint).send().await?;
        tracing::debug!("IP lookup response status: {}", response.status());

        if !response.status().is_success() {
            return Err(CareError::provider(
                IP_PROVIDER,
                format!("HTTP {}", response.status()),
            ));
        }

        let body: IpApiResponse = response.json().await?;
        if body.error {
            return Err(CareError::provider(
                IP_PROVIDER,
                body.reason.unwrap_or_else(|| "provider reported an error".to_string()),
            ));
        }

        Ok(IpLocation {
            latitude: body.latitude,
            longitude: body.longitude,
            city: body.city,
            region: body.region,
        })
    }
}

/// Forward geocoding over a Nominatim-style `/search` endpoint.
pub struct NominatimGeocoder {
    endpoint: String,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    display_name: String,
    lat: String,
    lon: String,
}

impl NominatimGeocoder {
    pub fn new(endpoint: impl Into<String>, client: Client) -> Self {
        Self {
            endpoint: endpoint.into(),
            client,
        }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let client = build_client(&config.providers.user_agent, config.request_timeout())?;
        Ok(Self::new(config.providers.geocoding_url.clone(), client))
    }
}

#[async_trait]
impl GeocodingProvider for NominatimGeocoder {
    async fn geocode(&self, address: &str) -> Result<Vec<GeocodeMatch>> {
        tracing::debug!("Geocoding '{}' via {}", address, self.endpoint);
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("format", "json"),
                ("limit", GEOCODE_RESULT_LIMIT),
                ("q", address),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(CareError::provider(
                GEOCODING_PROVIDER,
                format!("HTTP {}", response.status()),
            ));
        }

        let places: Vec<NominatimPlace> = response.json().await?;
        let matches: Vec<GeocodeMatch> = places
            .into_iter()
            .filter_map(|place| {
                let latitude = place.lat.trim().parse::<f64>().ok()?;
                let longitude = place.lon.trim().parse::<f64>().ok()?;
                Some(GeocodeMatch {
                    formatted_address: place.display_name,
                    latitude,
                    longitude,
                })
            })
            .collect();

        tracing::debug!("Geocoder returned {} match(es)", matches.len());
        Ok(matches)
    }
}
