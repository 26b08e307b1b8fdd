//! Integration tests for the road-distance client (wiremock-based)

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{method, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use stop_locator::domain::Coordinate;
use stop_locator::routing::{RoadDistances, RouteDistanceClient, RoutingConfig};

const USER: Coordinate = Coordinate::new(46.05, 13.24);
const UDINE: Coordinate = Coordinate::new(46.0625, 13.2354);
const GRADO: Coordinate = Coordinate::new(45.7667, 13.4833);

fn client_for(server: &MockServer) -> RouteDistanceClient<stop_locator::routing::OsrmTransport> {
    let config = RoutingConfig::default()
        .with_base_url(server.uri())
        .with_timeouts(Duration::from_secs(5), Duration::from_secs(5));
    RouteDistanceClient::new(&config).unwrap()
}

#[tokio::test]
async fn sends_one_batched_table_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path_regex(r"^/table/v1/driving/13\.24,46\.05;13\.2354,46\.0625;13\.4833,45\.7667$"))
        .and(query_param("sources", "0"))
        .and(query_param("destinations", "1;2"))
        .and(query_param("annotations", "distance"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"code": "Ok", "distances": [[1200.0, 33000.0]]})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let distances = client_for(&server)
        .fetch_distances(USER, &[UDINE, GRADO])
        .await;

    assert_eq!(distances, Some(vec![Some(1.2), Some(33.0)]));
}

#[tokio::test]
async fn bad_cells_are_dropped_individually() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path_regex(r"^/table/v1/driving/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"code": "Ok", "distances": [[1500, null, -3, 2500]]}"#,
        ))
        .mount(&server)
        .await;

    let distances = client_for(&server)
        .fetch_distances(USER, &[UDINE, GRADO, UDINE, GRADO])
        .await;

    assert_eq!(distances, Some(vec![Some(1.5), None, None, Some(2.5)]));
}

#[tokio::test]
async fn unparseable_cells_do_not_discard_the_batch() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path_regex(r"^/table/v1/driving/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"code": "Ok", "distances": [[1500.0, 1e999, "n/a", 2500.0]]}"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let distances = client_for(&server)
        .fetch_distances(USER, &[UDINE, GRADO, UDINE, GRADO])
        .await;

    assert_eq!(distances, Some(vec![Some(1.5), None, None, Some(2.5)]));
}

#[tokio::test]
async fn rate_limit_is_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"code": "Ok", "distances": [[900.0]]})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let distances = client_for(&server).fetch_distances(USER, &[UDINE]).await;

    assert_eq!(distances, Some(vec![Some(0.9)]));
}

#[tokio::test]
async fn server_error_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let distances = client_for(&server).fetch_distances(USER, &[UDINE]).await;

    assert_eq!(distances, None);
}

#[tokio::test]
async fn non_ok_code_is_a_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"code": "NoTable", "message": "no route"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let distances = client_for(&server).fetch_distances(USER, &[UDINE]).await;

    assert_eq!(distances, None);
}

#[tokio::test]
async fn slow_server_times_out_then_gives_up() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"code": "Ok", "distances": [[900.0]]}))
                .set_delay(Duration::from_secs(2)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let config = RoutingConfig::default()
        .with_base_url(server.uri())
        .with_max_retries(0)
        .with_timeouts(Duration::from_millis(200), Duration::from_millis(200));
    let client = RouteDistanceClient::new(&config).unwrap();

    assert_eq!(client.fetch_distances(USER, &[UDINE]).await, None);
}

#[tokio::test]
async fn empty_destinations_make_no_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let distances = client_for(&server).fetch_distances(USER, &[]).await;

    assert_eq!(distances, Some(Vec::new()));
}
