use std::time::Duration;

use calcbench_api::types::{DisclosurePage, FactRecord, Period};
use calcbench_api::{
    ApiQueryParams, Client, CompaniesParameters, Credentials, DisclosureParameters, Error,
    PeriodParameters, StandardizedParameters, Transport,
};
use serde_json::json;
use wiremock::matchers::{body_partial_json, body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn load_fixture(name: &str) -> String {
    std::fs::read_to_string(format!("tests/fixtures/{}", name)).unwrap()
}

fn revenue_payload() -> ApiQueryParams<StandardizedParameters> {
    ApiQueryParams {
        companies_parameters: CompaniesParameters::identifiers(vec!["msft".into()]),
        period_parameters: PeriodParameters {
            all_history: Some(true),
            ..Default::default()
        },
        page_parameters: StandardizedParameters {
            metrics: vec!["revenue".to_string()],
            ..Default::default()
        },
    }
}

fn revenue_body() -> serde_json::Value {
    serde_json::to_value(revenue_payload()).unwrap()
}

#[tokio::test]
async fn mapped_data_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/mappedData"))
        .and(body_partial_json(json!({
            "companiesParameters": {"companyIdentifiers": ["msft"], "entireUniverse": false},
            "pageParameters": {"metrics": ["revenue"]}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_string(load_fixture("mapped_data.json")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&format!("{}/api", mock_server.uri())).unwrap();
    let body = client.post_json("mappedData", &revenue_body()).await.unwrap();
    let facts: Vec<FactRecord> = serde_json::from_value(body).unwrap();
    assert_eq!(facts.len(), 4);
    assert_eq!(facts[0].calendar_period, Some(Period::Q1));
}

#[tokio::test]
async fn mapped_data_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/mappedData"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&format!("{}/api", mock_server.uri())).unwrap();
    let result = client.post_json("mappedData", &revenue_body()).await;
    match result {
        Err(Error::HttpStatus { status, body }) => {
            assert_eq!(status, 500);
            assert_eq!(body, "Internal Server Error");
        }
        other => panic!("expected HttpStatus, got {:?}", other),
    }
}

#[tokio::test]
async fn mapped_data_malformed_json() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/mappedData"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not valid json}"))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&format!("{}/api", mock_server.uri())).unwrap();
    let result = client.post_json("mappedData", &revenue_body()).await;
    match result {
        Err(Error::Parse(e)) => assert!(e.is_syntax()),
        other => panic!("expected Parse, got {:?}", other),
    }
}

#[tokio::test]
async fn footnote_search_null_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/footnoteSearch"))
        .respond_with(ResponseTemplate::new(200).set_body_string("null"))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&format!("{}/api", mock_server.uri())).unwrap();
    let payload = ApiQueryParams {
        companies_parameters: CompaniesParameters::entire_universe(),
        period_parameters: PeriodParameters::default(),
        page_parameters: DisclosureParameters::default(),
    };
    let body = client
        .post_json("footnoteSearch", &serde_json::to_value(&payload).unwrap())
        .await
        .unwrap();
    let page: Option<DisclosurePage> = serde_json::from_value(body).unwrap();
    assert!(page.is_none());
}

#[tokio::test]
async fn get_json_fetches_metric_catalog() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/availableMetrics"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Income Statement": [{"metric": "revenue", "description": "Total revenue"}]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&format!("{}/api", mock_server.uri())).unwrap();
    let body = client.get_json("availableMetrics").await.unwrap();
    assert_eq!(body["Income Statement"][0]["metric"], json!("revenue"));
}

#[tokio::test]
async fn get_json_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/availableMetrics"))
        .respond_with(ResponseTemplate::new(401).set_body_string("log on first"))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&format!("{}/api", mock_server.uri())).unwrap();
    assert!(matches!(
        client.get_json("availableMetrics").await,
        Err(Error::HttpStatus { status: 401, .. })
    ));
}

#[tokio::test]
async fn transport_posts_raw_json() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/textDiff"))
        .and(body_partial_json(json!({"html1": "<p>a</p>"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"diff": "<del>a</del>"})))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&format!("{}/api", mock_server.uri())).unwrap();
    let body = client
        .post_json("textDiff", &json!({"html1": "<p>a</p>", "html2": ""}))
        .await
        .unwrap();
    assert_eq!(body["diff"], json!("<del>a</del>"));
}

#[tokio::test]
async fn connect_with_valid_credentials() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/account/LogOnAjax"))
        .and(body_string_contains("email=analyst%40example.com"))
        .and(body_string_contains("rememberMe=true"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "session=abc; Path=/")
                .set_body_string("true"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let creds = Credentials::new("analyst@example.com", "secret");
    let client = Client::connect(
        &format!("{}/api", mock_server.uri()),
        &format!("{}/account/LogOnAjax", mock_server.uri()),
        Duration::from_secs(5),
        &creds,
    )
    .await
    .unwrap();
    client.close();
}

#[tokio::test]
async fn connect_with_bad_credentials() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/account/LogOnAjax"))
        .respond_with(ResponseTemplate::new(200).set_body_string("false"))
        .mount(&mock_server)
        .await;

    let creds = Credentials::new("analyst@example.com", "wrong");
    let result = Client::connect(
        &format!("{}/api", mock_server.uri()),
        &format!("{}/account/LogOnAjax", mock_server.uri()),
        Duration::from_secs(5),
        &creds,
    )
    .await;
    assert!(matches!(result, Err(Error::InvalidCredentials)));
}
