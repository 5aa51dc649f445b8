use std::time::Duration;

use directory_engine::{
    FailureKind, FetchedUser, ReqwestUserSource, SourceSettings, UserSource,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn source_for(server: &MockServer, settings: SourceSettings) -> ReqwestUserSource {
    ReqwestUserSource::new(SourceSettings {
        base_url: format!("{}/api", server.uri()),
        ..settings
    })
    .expect("client builds")
}

fn listing(page: u32, total_pages: u32) -> serde_json::Value {
    json!({
        "page": page,
        "per_page": 2,
        "total": 4,
        "total_pages": total_pages,
        "data": [
            {
                "id": 1,
                "email": "george.bluth@reqres.in",
                "first_name": "George",
                "last_name": "Bluth",
                "avatar": "https://reqres.in/img/faces/1-image.jpg"
            },
            {
                "id": 2,
                "email": "janet.weaver@gmail.com",
                "first_name": "Janet",
                "last_name": "Weaver",
                "avatar": "https://reqres.in/img/faces/2-image.jpg"
            }
        ]
    })
}

#[tokio::test]
async fn source_fetches_and_decodes_requested_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing(2, 2)))
        .expect(1)
        .mount(&server)
        .await;

    let source = source_for(&server, SourceSettings::default());
    let page = source.fetch_page(2).await.expect("fetch ok");

    assert_eq!(page.total_pages, 2);
    assert_eq!(
        page.records[1],
        FetchedUser {
            id: 2,
            first_name: "Janet".to_string(),
            last_name: "Weaver".to_string(),
            email: "janet.weaver@gmail.com".to_string(),
            avatar_url: "https://reqres.in/img/faces/2-image.jpg".to_string(),
        }
    );
}

#[tokio::test]
async fn source_fails_on_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let source = source_for(&server, SourceSettings::default());
    let err = source.fetch_page(1).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(503));
}

#[tokio::test]
async fn source_times_out_on_slow_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_json(listing(1, 1)),
        )
        .mount(&server)
        .await;

    let settings = SourceSettings {
        request_timeout: Duration::from_millis(50),
        ..SourceSettings::default()
    };
    let source = source_for(&server, settings);
    let err = source.fetch_page(1).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Timeout);
}

#[tokio::test]
async fn source_rejects_too_large_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing(1, 1)))
        .mount(&server)
        .await;

    let settings = SourceSettings {
        max_bytes: 16,
        ..SourceSettings::default()
    };
    let source = source_for(&server, settings);
    let err = source.fetch_page(1).await.unwrap_err();
    assert!(matches!(
        err.kind,
        FailureKind::TooLarge { max_bytes: 16, .. }
    ));
}

#[tokio::test]
async fn source_rejects_non_json_content_type() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("<html>nope</html>", "text/html"),
        )
        .mount(&server)
        .await;

    let source = source_for(&server, SourceSettings::default());
    let err = source.fetch_page(1).await.unwrap_err();
    assert_eq!(
        err.kind,
        FailureKind::UnsupportedContentType {
            content_type: "text/html".to_string()
        }
    );
}

#[tokio::test]
async fn source_reports_malformed_json_as_decode_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(r#"{"data": "oops"}"#, "application/json; charset=utf-8"),
        )
        .mount(&server)
        .await;

    let source = source_for(&server, SourceSettings::default());
    let err = source.fetch_page(1).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Decode);
    assert!(err.to_string().starts_with("malformed response"));
}

#[tokio::test]
async fn source_reports_unreachable_host_as_network_failure() {
    let source = ReqwestUserSource::new(SourceSettings {
        base_url: "http://127.0.0.1:9/api".to_string(),
        connect_timeout: Duration::from_millis(200),
        ..SourceSettings::default()
    })
    .expect("client builds");

    let err = source.fetch_page(1).await.unwrap_err();
    assert!(matches!(
        err.kind,
        FailureKind::Network | FailureKind::Timeout
    ));
}
