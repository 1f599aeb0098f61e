use crate::domain::model::GeoCoordinate;
use crate::utils::error::{CareError, Result};
use url::Url;

/// Builds the outbound links used by the "find a vet" actions.
#[derive(Debug, Clone, PartialEq)]
pub struct VetLinks {
    search_base: Url,
    search_query: String,
    zoom: u8,
    emergency_number: String,
}

impl VetLinks {
    pub fn new(
        search_base_url: &str,
        search_query: impl Into<String>,
        zoom: u8,
        emergency_number: impl Into<String>,
    ) -> Result<Self> {
        let search_base = Url::parse(search_base_url).map_err(|e| {
            CareError::InvalidConfigValueError {
                field: "vets.search_base_url".to_string(),
                value: search_base_url.to_string(),
                reason: e.to_string(),
            }
        })?;
        if search_base.cannot_be_a_base() {
            return Err(CareError::InvalidConfigValueError {
                field: "vets.search_base_url".to_string(),
                value: search_base_url.to_string(),
                reason: "URL cannot carry a path".to_string(),
            });
        }

        Ok(Self {
            search_base,
            search_query: search_query.into(),
            zoom,
            emergency_number: emergency_number.into(),
        })
    }

    /// `<base>/<query>/@<lat>,<lng>,<zoom>z`
    pub fn nearby_search(&self, at: &GeoCoordinate) -> Url {
        let mut url = self.search_base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(&self.search_query).push(&format!(
                "@{:.6},{:.6},{}z",
                at.latitude, at.longitude, self.zoom
            ));
        }
        url
    }

    pub fn emergency_call(&self) -> Result<Url> {
        let dial: String = self
            .emergency_number
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '+')
            .collect();
        Url::parse(&format!("tel:{}", dial)).map_err(|e| CareError::InvalidConfigValueError {
            field: "vets.emergency_number".to_string(),
            value: self.emergency_number.clone(),
            reason: e.to_string(),
        })
    }
}

impl Default for VetLinks {
    fn default() -> Self {
        Self {
            search_base: Url::parse("https://www.google.com/maps/search/")
                .expect("static URL is valid"),
            search_query: "veterinary clinic".to_string(),
            zoom: 14,
            emergency_number: "1962".to_string(),
        }
    }
}
