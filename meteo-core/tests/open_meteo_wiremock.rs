//! Repository and controller behavior against a mocked Open-Meteo server.

use std::sync::Arc;

use meteo_core::{
    NetworkResult, OpenMeteoRepository, Weather, WeatherController, WeatherRepository,
    WeatherUiState, network::safe_request,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

fn sample_forecast_response() -> serde_json::Value {
    serde_json::json!({
        "latitude": 35.7,
        "longitude": 139.6875,
        "generationtime_ms": 0.081,
        "utc_offset_seconds": 32400,
        "timezone": "Asia/Tokyo",
        "timezone_abbreviation": "GMT+9",
        "elevation": 40.0,
        "current_units": {
            "time": "iso8601",
            "interval": "seconds",
            "temperature_2m": "°C",
            "weather_code": "wmo code"
        },
        "current": {
            "time": "2025-06-01T12:00",
            "interval": 900,
            "temperature_2m": 24.3,
            "weather_code": 1
        },
        "hourly": {
            "time": [
                "2025-06-01T00:00",
                "2025-06-01T01:00",
                "2025-06-01T02:00",
                "2025-06-01T03:00"
            ],
            "temperature_2m": [19.1, 18.7, 18.2, 17.9],
            "weather_code": [0, 2, 51, 80],
            "precipitation_probability": [0, 5, 40, 70]
        },
        "daily": {
            "time": ["2025-06-01", "2025-06-02", "2025-06-03"],
            "weather_code": [3, 63, 71],
            "temperature_2m_max": [26.0, 23.4, 21.0],
            "temperature_2m_min": [17.9, 18.5, 16.2],
            "sunrise": ["2025-06-01T04:25", "2025-06-02T04:25", "2025-06-03T04:24"],
            "sunset": ["2025-06-01T18:52", "2025-06-02T18:53", "2025-06-03T18:53"]
        }
    })
}

fn forecast_ok() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(sample_forecast_response())
}

fn repository(server: &MockServer) -> OpenMeteoRepository {
    OpenMeteoRepository::new(format!("{}/v1", server.uri()))
}

async fn mount_forecast(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(response)
        .mount(server)
        .await;
}

// ============================================================================
// Repository
// ============================================================================

#[tokio::test]
async fn sends_fixed_query_parameters() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param("latitude", "35.6892"))
        .and(query_param("longitude", "139.6917"))
        .and(query_param("current", "temperature_2m,weather_code"))
        .and(query_param(
            "hourly",
            "temperature_2m,weather_code,precipitation_probability",
        ))
        .and(query_param(
            "daily",
            "weather_code,temperature_2m_max,temperature_2m_min,sunrise,sunset",
        ))
        .and(query_param("timezone", "auto"))
        .respond_with(forecast_ok())
        .expect(1)
        .mount(&server)
        .await;

    let result = repository(&server).get_weather_data(35.6892, 139.6917).await;
    assert!(result.is_success(), "Expected success, got: {result:?}");
}

#[tokio::test]
async fn maps_successful_response() {
    let server = MockServer::start().await;
    mount_forecast(&server, forecast_ok()).await;

    let NetworkResult::Success { data } = repository(&server).get_weather_data(35.0, 139.0).await
    else {
        panic!("expected success");
    };

    assert_eq!(data.current_weather.weather, Weather::PartlyCloudy);
    assert_eq!(data.hourly_forecast.len(), 4);
    assert_eq!(data.hourly_forecast[3].weather, Weather::Showers);
    assert_eq!(data.hourly_forecast[2].precipitation_probability, 40);
    assert_eq!(data.weekly_forecast.len(), 3);
    assert_eq!(data.weekly_forecast[2].weather, Weather::Snow);
}

#[tokio::test]
async fn http_error_carries_status_and_body() {
    let server = MockServer::start().await;
    let not_found = ResponseTemplate::new(404).set_body_string("not found");
    mount_forecast(&server, not_found).await;

    let result = repository(&server).get_weather_data(35.0, 139.0).await;
    assert_eq!(
        result,
        NetworkResult::Failure {
            status_code: Some(404),
            message: Some("not found".to_string()),
        }
    );
}

#[tokio::test]
async fn missing_daily_section_is_parse_failure() {
    let server = MockServer::start().await;
    let mut body = sample_forecast_response();
    body.as_object_mut().unwrap().remove("daily");
    mount_forecast(&server, ResponseTemplate::new(200).set_body_json(body)).await;

    let result = repository(&server).get_weather_data(35.0, 139.0).await;
    assert_eq!(
        result,
        NetworkResult::Failure {
            status_code: None,
            message: Some("Failed to parse weather data".to_string()),
        }
    );
}

#[tokio::test]
async fn bad_timestamp_is_parse_failure_with_detail() {
    let server = MockServer::start().await;
    let mut body = sample_forecast_response();
    body["hourly"]["time"][1] = serde_json::json!("not-a-time");
    mount_forecast(&server, ResponseTemplate::new(200).set_body_json(body)).await;

    let NetworkResult::Failure {
        status_code,
        message,
    } = repository(&server).get_weather_data(35.0, 139.0).await
    else {
        panic!("expected failure");
    };

    assert_eq!(status_code, None);
    let message = message.unwrap();
    assert!(message.starts_with("Failed to parse weather data: "), "{message}");
    assert!(message.contains("not-a-time"), "{message}");
}

#[tokio::test]
async fn malformed_success_body_is_failure() {
    let server = MockServer::start().await;
    let html = ResponseTemplate::new(200).set_body_string("<html>oops</html>");
    mount_forecast(&server, html).await;

    let NetworkResult::Failure {
        status_code,
        message,
    } = repository(&server).get_weather_data(35.0, 139.0).await
    else {
        panic!("expected failure");
    };

    assert_eq!(status_code, None);
    assert!(message.unwrap().starts_with("Failed to decode response body"));
}

#[tokio::test]
async fn connection_failure_has_no_status() {
    // Nothing listens on port 1.
    let repo = OpenMeteoRepository::new("http://127.0.0.1:1/v1");

    let NetworkResult::Failure {
        status_code,
        message,
    } = repo.get_weather_data(35.0, 139.0).await
    else {
        panic!("expected failure");
    };

    assert_eq!(status_code, None);
    assert!(!message.unwrap().is_empty());
}

#[tokio::test]
async fn identical_requests_yield_equal_forecasts() {
    let server = MockServer::start().await;
    mount_forecast(&server, forecast_ok()).await;
    let repo = repository(&server);

    let first = repo.get_weather_data(35.0, 139.0).await;
    let second = repo.get_weather_data(35.0, 139.0).await;

    assert!(first.is_success());
    assert_eq!(first, second);
}

// ============================================================================
// safe_request
// ============================================================================

#[tokio::test]
async fn safe_request_decodes_any_type() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/numbers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([1, 2, 3])))
        .mount(&server)
        .await;

    let client = reqwest::Client::new();
    let result: NetworkResult<Vec<u32>> =
        safe_request(client.get(format!("{}/numbers", server.uri()))).await;

    assert_eq!(result, NetworkResult::success(vec![1, 2, 3]));
}

#[tokio::test]
async fn safe_request_server_error_keeps_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let client = reqwest::Client::new();
    let result: NetworkResult<serde_json::Value> = safe_request(client.get(server.uri())).await;

    assert_eq!(result, NetworkResult::failure(Some(503), "maintenance"));
}

// ============================================================================
// Controller end to end
// ============================================================================

#[tokio::test]
async fn controller_keeps_forecast_when_backend_goes_away() {
    let server = MockServer::start().await;
    mount_forecast(&server, forecast_ok()).await;

    let controller = WeatherController::new(Arc::new(repository(&server)));
    let mut states = controller.subscribe();
    states.wait_for(WeatherUiState::is_settled).await.unwrap();
    let loaded = controller.state();

    assert!(!loaded.is_loading);
    assert!(loaded.error.is_none());
    let forecast = loaded.forecast.expect("forecast after initial fetch");
    assert_eq!(forecast.weekly_forecast.len(), 3);

    server.reset().await;
    let unavailable = ResponseTemplate::new(500).set_body_string("upstream unavailable");
    mount_forecast(&server, unavailable).await;

    controller.fetch_tokyo_weather().await.unwrap();
    let state = controller.state();

    assert!(!state.is_loading);
    assert_eq!(state.forecast, Some(forecast));
    assert_eq!(state.error.as_deref(), Some("upstream unavailable"));
}
