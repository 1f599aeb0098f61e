use cattle_care::adapters::{FixedDeviceGeolocation, IpApiProvider, NominatimGeocoder};
use cattle_care::core::{ExternalLauncher, LocationState, Precision};
use cattle_care::domain::model::{FailureReason, PositionError};
use cattle_care::{AppConfig, Attempt, LocationResolver};
use httpmock::prelude::*;
use std::sync::Mutex;
use url::Url;

#[derive(Default)]
struct RecordingLauncher {
    opened: Mutex<Vec<Url>>,
}

impl ExternalLauncher for RecordingLauncher {
    fn open_external(&self, url: &Url) {
        self.opened.lock().unwrap().push(url.clone());
    }
}

fn config_for(server: &MockServer) -> AppConfig {
    let toml_content = format!(
        r#"
[providers]
ip_lookup_url = "{}"
geocoding_url = "{}"
request_timeout_seconds = 2

[location]
default_latitude = 23.0225
default_longitude = 72.5714
default_label = "Ahmedabad, Gujarat"

[vets]
search_base_url = "https://maps.example.com/search/"
search_query = "vet"
zoom = 13
emergency_number = "1962"
"#,
        server.url("/json/"),
        server.url("/search")
    );
    AppConfig::from_toml_str(&toml_content).unwrap()
}

fn build_resolver(
    config: &AppConfig,
    device: FixedDeviceGeolocation,
) -> LocationResolver<IpApiProvider, NominatimGeocoder, FixedDeviceGeolocation> {
    LocationResolver::new(
        IpApiProvider::from_config(config).unwrap(),
        NominatimGeocoder::from_config(config).unwrap(),
        device,
    )
    .with_default_location(config.default_location().unwrap())
    .with_links(config.vet_links().unwrap())
}

#[tokio::test]
async fn test_ip_lookup_then_vet_search() {
    let server = MockServer::start();
    let ip_mock = server.mock(|when, then| {
        when.method(GET).path("/json/");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({
                "city": "Bengaluru",
                "region": "KA",
                "latitude": 12.9,
                "longitude": 77.6
            }));
    });

    let config = config_for(&server);
    let resolver = build_resolver(&config, FixedDeviceGeolocation::unavailable());
    let launcher = RecordingLauncher::default();

    assert!(resolver.search_nearby_vets(&launcher).is_none());
    assert_eq!(
        resolver.resolve_approximate().await,
        Attempt::Applied(Precision::IpApproximate)
    );
    ip_mock.assert();

    let location = resolver.state().resolved().cloned().unwrap();
    assert_eq!(location.label, "Bengaluru, KA");

    let url = resolver.search_nearby_vets(&launcher).unwrap();
    assert_eq!(
        url.as_str(),
        "https://maps.example.com/search/vet/@12.900000,77.600000,13z"
    );
    assert_eq!(launcher.opened.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_ip_outage_lands_on_configured_default() {
    let server = MockServer::start();
    let ip_mock = server.mock(|when, then| {
        when.method(GET).path("/json/");
        then.status(500);
    });

    let config = config_for(&server);
    let resolver = build_resolver(&config, FixedDeviceGeolocation::unavailable());

    let outcome = resolver.resolve_approximate().await;

    ip_mock.assert_hits(1);
    assert_eq!(outcome, Attempt::Applied(Precision::DefaultFallback));
    let location = resolver.state().resolved().cloned().unwrap();
    assert_eq!(location.label, "Ahmedabad, Gujarat");
    assert_eq!(location.coordinate.latitude, 23.0225);
    assert!(resolver.message().is_none());
}

#[tokio::test]
async fn test_ip_answer_missing_coordinates_lands_on_default() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/json/");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({"city": "Unknown", "region": null}));
    });

    let config = config_for(&server);
    let resolver = build_resolver(&config, FixedDeviceGeolocation::unavailable());

    resolver.resolve_approximate().await;

    assert_eq!(
        resolver.state().resolved().unwrap().precision,
        Precision::DefaultFallback
    );
}

#[tokio::test]
async fn test_denied_gps_then_manual_address() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/json/");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({
                "city": "Bengaluru",
                "region": "KA",
                "latitude": 12.9,
                "longitude": 77.6
            }));
    });
    let geocode_mock = server.mock(|when, then| {
        when.method(GET).path("/search").query_param("q", "Anand, Gujarat");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!([
                {"display_name": "Anand, Gujarat, India", "lat": "22.5645", "lon": "72.9289"}
            ]));
    });

    let config = config_for(&server);
    let resolver = build_resolver(
        &config,
        FixedDeviceGeolocation::failing(PositionError::PermissionDenied),
    );
    let launcher = RecordingLauncher::default();

    resolver.resolve_approximate().await;
    let outcome = resolver.request_gps_location().await;

    assert_eq!(outcome, Attempt::Failed(FailureReason::PermissionDenied));
    assert_eq!(
        resolver.state(),
        LocationState::Failed {
            reason: FailureReason::PermissionDenied
        }
    );
    assert_eq!(resolver.last_known().unwrap().label, "Bengaluru, KA");
    assert!(resolver.search_nearby_vets(&launcher).is_none());

    let outcome = resolver.submit_manual_location("Anand, Gujarat").await;

    geocode_mock.assert();
    assert_eq!(outcome, Attempt::Applied(Precision::ManualGeocoded));
    assert_eq!(
        resolver.state().resolved().unwrap().label,
        "Anand, Gujarat, India"
    );
    assert!(resolver.search_nearby_vets(&launcher).is_some());
}

#[tokio::test]
async fn test_unknown_address_keeps_previous_location() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/json/");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({
                "city": "Bengaluru",
                "region": "KA",
                "latitude": 12.9,
                "longitude": 77.6
            }));
    });
    server.mock(|when, then| {
        when.method(GET).path("/search");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!([]));
    });

    let config = config_for(&server);
    let resolver = build_resolver(&config, FixedDeviceGeolocation::unavailable());
    resolver.resolve_approximate().await;
    let before = resolver.state();

    let outcome = resolver.submit_manual_location("Atlantis").await;

    assert_eq!(outcome, Attempt::Failed(FailureReason::LocationNotFound));
    assert_eq!(resolver.state(), before);
    assert!(resolver.message().is_some());
}

#[tokio::test]
async fn test_geocoder_outage_is_reported_as_not_found() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/search");
        then.status(502);
    });

    let config = config_for(&server);
    let resolver = build_resolver(&config, FixedDeviceGeolocation::unavailable());

    let outcome = resolver.submit_manual_location("Anand").await;

    assert_eq!(outcome, Attempt::Failed(FailureReason::LocationNotFound));
    assert_eq!(
        resolver.state(),
        LocationState::Failed {
            reason: FailureReason::LocationNotFound
        }
    );
}

#[tokio::test]
async fn test_gps_fix_wins_over_later_ip_refresh() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/json/");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({
                "city": "Bengaluru",
                "region": "KA",
                "latitude": 12.9,
                "longitude": 77.6
            }));
    });

    let config = config_for(&server);
    let resolver = build_resolver(&config, FixedDeviceGeolocation::at(12.9716, 77.5946));

    assert_eq!(
        resolver.request_gps_location().await,
        Attempt::Applied(Precision::GpsPrecise)
    );
    assert_eq!(resolver.resolve_approximate().await, Attempt::Kept);
    assert_eq!(
        resolver.state().resolved().unwrap().precision,
        Precision::GpsPrecise
    );
}
