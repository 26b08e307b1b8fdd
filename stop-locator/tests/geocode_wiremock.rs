//! Integration tests for reverse geocoding (wiremock-based)

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use stop_locator::domain::Coordinate;
use stop_locator::geocode::{GeocodeConfig, NominatimClient, ReverseGeocodeCache};

fn cache_for(server: &MockServer) -> ReverseGeocodeCache<NominatimClient> {
    let config = GeocodeConfig::default().with_base_url(server.uri());
    ReverseGeocodeCache::new(NominatimClient::new(&config).unwrap(), &config)
}

#[tokio::test]
async fn resolves_and_caches_by_rounded_key() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reverse"))
        .and(query_param("format", "json"))
        .and(query_param("zoom", "18"))
        .and(query_param("addressdetails", "1"))
        .and(header("accept-language", "it"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "display_name": "Piazza Libertà, Udine, Friuli-Venezia Giulia, Italia",
            "address": {"road": "Piazza Libertà", "city": "Udine", "county": "Udine"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let cache = cache_for(&server);

    let first = cache.resolve(Coordinate::new(46.06251, 13.23541)).await;
    let second = cache.resolve(Coordinate::new(46.06249, 13.23538)).await;

    assert_eq!(first.as_deref(), Some("Udine"));
    assert_eq!(second.as_deref(), Some("Udine"));
}

#[tokio::test]
async fn service_errors_are_not_cached() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reverse"))
        .respond_with(ResponseTemplate::new(503))
        .expect(2)
        .mount(&server)
        .await;

    let cache = cache_for(&server);
    let c = Coordinate::new(45.9, 13.35);

    assert_eq!(cache.resolve(c).await, None);
    assert_eq!(cache.resolve(c).await, None);
}

#[tokio::test]
async fn unresolvable_point_is_none() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reverse"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"error": "Unable to geocode"})),
        )
        .mount(&server)
        .await;

    assert_eq!(cache_for(&server).resolve(Coordinate::new(45.5, 13.1)).await, None);
}

#[tokio::test]
async fn slow_service_is_none() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reverse"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"address": {"town": "Grado"}}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let config = GeocodeConfig::default()
        .with_base_url(server.uri())
        .with_timeout(Duration::from_millis(200));
    let cache = ReverseGeocodeCache::new(NominatimClient::new(&config).unwrap(), &config);

    assert_eq!(cache.resolve(Coordinate::new(45.7667, 13.4833)).await, None);
}
