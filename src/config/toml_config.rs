use crate::core::links::VetLinks;
use crate::domain::model::{GeoCoordinate, Precision, ResolvedLocation};
use crate::utils::error::{CareError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub location: LocationConfig,
    #[serde(default)]
    pub vets: VetsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvidersConfig {
    #[serde(default = "default_ip_lookup_url")]
    pub ip_lookup_url: String,
    #[serde(default = "default_geocoding_url")]
    pub geocoding_url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_request_timeout_seconds")]
    pub request_timeout_seconds: u64,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            ip_lookup_url: default_ip_lookup_url(),
            geocoding_url: default_geocoding_url(),
            user_agent: default_user_agent(),
            request_timeout_seconds: default_request_timeout_seconds(),
        }
    }
}

/// Where the resolver lands when IP lookup is unavailable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationConfig {
    #[serde(default = "default_latitude")]
    pub default_latitude: f64,
    #[serde(default = "default_longitude")]
    pub default_longitude: f64,
    #[serde(default = "default_label")]
    pub default_label: String,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            default_latitude: default_latitude(),
            default_longitude: default_longitude(),
            default_label: default_label(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VetsConfig {
    #[serde(default = "default_search_base_url")]
    pub search_base_url: String,
    #[serde(default = "default_search_query")]
    pub search_query: String,
    #[serde(default = "default_zoom")]
    pub zoom: u8,
    #[serde(default = "default_emergency_number")]
    pub emergency_number: String,
}

impl Default for VetsConfig {
    fn default() -> Self {
        Self {
            search_base_url: default_search_base_url(),
            search_query: default_search_query(),
            zoom: default_zoom(),
            emergency_number: default_emergency_number(),
        }
    }
}

fn default_ip_lookup_url() -> String {
    "https://ipapi.co/json/".to_string()
}

fn default_geocoding_url() -> String {
    "https://nominatim.openstreetmap.org/search".to_string()
}

fn default_user_agent() -> String {
    concat!("cattle-care/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_request_timeout_seconds() -> u64 {
    8
}

fn default_latitude() -> f64 {
    28.6139
}

fn default_longitude() -> f64 {
    77.2090
}

fn default_label() -> String {
    "New Delhi, India".to_string()
}

fn default_search_base_url() -> String {
    "https://www.google.com/maps/search/".to_string()
}

fn default_search_query() -> String {
    "veterinary clinic".to_string()
}

fn default_zoom() -> u8 {
    14
}

fn default_emergency_number() -> String {
    "1962".to_string()
}

impl AppConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content)?;

        toml::from_str(&processed).map_err(|e| CareError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value. Unset variables are left
    /// as written so validation can point at them.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| CareError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.into_owned())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_url("providers.ip_lookup_url", &self.providers.ip_lookup_url)?;
        validation::validate_url("providers.geocoding_url", &self.providers.geocoding_url)?;
        validation::validate_non_empty_string("providers.user_agent", &self.providers.user_agent)?;
        validation::validate_positive_number(
            "providers.request_timeout_seconds",
            self.providers.request_timeout_seconds,
            1,
        )?;

        validation::validate_range(
            "location.default_latitude",
            self.location.default_latitude,
            -90.0,
            90.0,
        )?;
        validation::validate_range(
            "location.default_longitude",
            self.location.default_longitude,
            -180.0,
            180.0,
        )?;
        validation::validate_non_empty_string("location.default_label", &self.location.default_label)?;

        validation::validate_url("vets.search_base_url", &self.vets.search_base_url)?;
        validation::validate_non_empty_string("vets.search_query", &self.vets.search_query)?;
        validation::validate_range("vets.zoom", self.vets.zoom, 1, 21)?;
        validation::validate_phone_number("vets.emergency_number", &self.vets.emergency_number)?;

        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.providers.request_timeout_seconds)
    }

    pub fn default_location(&self) -> Result<ResolvedLocation> {
        let coordinate =
            GeoCoordinate::new(self.location.default_latitude, self.location.default_longitude)?;
        Ok(ResolvedLocation {
            coordinate,
            label: self.location.default_label.clone(),
            precision: Precision::DefaultFallback,
        })
    }

    pub fn vet_links(&self) -> Result<VetLinks> {
        VetLinks::new(
            &self.vets.search_base_url,
            self.vets.search_query.clone(),
            self.vets.zoom,
            self.vets.emergency_number.clone(),
        )
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
