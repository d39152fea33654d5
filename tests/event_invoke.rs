//! Interceptors driven through platform-shaped JSON events.

use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use serde_json::{json, Value};

use blue_green_edge::event::{CloudFrontEvent, EventType, Request, Response};
use blue_green_edge::fallback::{HttpIndexFetcher, IndexFetcher};
use blue_green_edge::handlers::{self, Outcome};
use blue_green_edge::EdgeError;

const SHELL: &str = "<!doctype html><html><body><div id=\"root\"></div></body></html>";

/// Answers every fetch with the shell and records the URL it would have used.
#[derive(Default)]
struct RecordingFetcher {
    urls: Mutex<Vec<String>>,
}

#[async_trait]
impl IndexFetcher for RecordingFetcher {
    async fn fetch_index(&self, host: &str) -> Result<Bytes, EdgeError> {
        let url = HttpIndexFetcher::new().index_url(host);
        self.urls.lock().unwrap().push(url);
        Ok(Bytes::from_static(SHELL.as_bytes()))
    }
}

fn event(event_type: &str, request: Value, response: Option<Value>) -> CloudFrontEvent {
    let mut cf = json!({
        "config": {
            "distributionDomainName": "d111111abcdef8.cloudfront.net",
            "distributionId": "EDFDVBD6EXAMPLE",
            "eventType": event_type,
            "requestId": "MRVMF7KydIvxMWfJIglgwHQwZsbG2IhRJ07sn9AkKUFSHS9EXAMPLE=="
        },
        "request": request
    });
    if let Some(response) = response {
        cf["response"] = response;
    }
    serde_json::from_value(json!({ "Records": [{ "cf": cf }] })).unwrap()
}

fn into_request(outcome: Outcome) -> Request {
    match outcome {
        Outcome::Request(r) => r,
        Outcome::Response(_) => panic!("expected a request"),
    }
}

fn into_response(outcome: Outcome) -> Response {
    match outcome {
        Outcome::Response(r) => r,
        Outcome::Request(_) => panic!("expected a response"),
    }
}

#[tokio::test]
async fn test_viewer_request_event_output_shape() {
    let fetcher = RecordingFetcher::default();
    let ev = event(
        "viewer-request",
        json!({
            "clientIp": "203.0.113.178",
            "headers": {
                "host": [{"key": "Host", "value": "app-test.example.com"}],
                "user-agent": [{"key": "User-Agent", "value": "curl/8.4.0"}]
            },
            "method": "GET",
            "querystring": "",
            "uri": "/manatee"
        }),
        None,
    );

    let outcome = handlers::invoke(EventType::ViewerRequest, ev, &fetcher).await.unwrap();
    let out = serde_json::to_value(&outcome).unwrap();

    assert_eq!(
        out["headers"]["x-blue-green-context"],
        json!([{"key": "x-blue-green-context", "value": "green"}])
    );
    assert_eq!(
        out["headers"]["x-blue-green-host"],
        json!([{"key": "x-blue-green-host", "value": "app-test.example.com"}])
    );
    assert_eq!(out["headers"]["user-agent"][0]["value"], "curl/8.4.0");
    assert_eq!(out["clientIp"], "203.0.113.178");
    assert_eq!(out["uri"], "/manatee");
    assert!(out.get("origin").is_none());
}

#[tokio::test]
async fn test_origin_request_event_without_context_is_untouched() {
    let fetcher = RecordingFetcher::default();
    let request = json!({
        "headers": {
            "host": [{"key": "Host", "value": "bgdemo.s3.us-east-1.amazonaws.com"}]
        },
        "method": "GET",
        "querystring": "",
        "uri": "/whale",
        "origin": {
            "s3": {
                "authMethod": "none",
                "customHeaders": {},
                "domainName": "bgdemo.s3.us-east-1.amazonaws.com",
                "path": "",
                "region": "us-east-1"
            }
        }
    });
    let ev = event("origin-request", request.clone(), None);

    let outcome = handlers::invoke(EventType::OriginRequest, ev, &fetcher).await.unwrap();
    assert_eq!(serde_json::to_value(&outcome).unwrap(), request);
}

#[tokio::test]
async fn test_origin_response_event_passes_success_through() {
    let fetcher = RecordingFetcher::default();
    let response = json!({
        "headers": {
            "content-type": [{"key": "Content-Type", "value": "application/javascript"}]
        },
        "status": "200",
        "statusDescription": "OK"
    });
    let ev = event(
        "origin-response",
        json!({"headers": {"x-blue-green-host": [{"value": "app.example.com"}]}, "uri": "/static/app.js"}),
        Some(response.clone()),
    );

    let outcome = handlers::invoke(EventType::OriginResponse, ev, &fetcher).await.unwrap();
    assert_eq!(serde_json::to_value(&outcome).unwrap(), response);
    assert!(fetcher.urls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_origin_response_event_without_response_fails() {
    let fetcher = RecordingFetcher::default();
    let ev = event("origin-response", json!({"headers": {}}), None);

    let result = handlers::invoke(EventType::OriginResponse, ev, &fetcher).await;
    assert!(matches!(result, Err(EdgeError::MissingResponse)));
}

#[tokio::test]
async fn test_viewer_request_without_host_fails() {
    let fetcher = RecordingFetcher::default();
    let ev = event("viewer-request", json!({"headers": {}, "uri": "/"}), None);

    let result = handlers::invoke(EventType::ViewerRequest, ev, &fetcher).await;
    assert!(matches!(result, Err(EdgeError::MissingHeader("host"))));
}

#[tokio::test]
async fn test_viewer_request_with_capitalised_header_names() {
    let fetcher = RecordingFetcher::default();
    let ev = event(
        "viewer-request",
        json!({
            "headers": {"Host": [{"key": "Host", "value": "app-test.example.com"}]},
            "method": "GET",
            "uri": "/"
        }),
        None,
    );

    let request = into_request(
        handlers::invoke(EventType::ViewerRequest, ev, &fetcher).await.unwrap(),
    );
    assert_eq!(request.headers.first_value("x-blue-green-context"), Some("green"));
    assert_eq!(request.headers.first_value("x-blue-green-host"), Some("app-test.example.com"));
}

/// Candidate host through all three stages, origin answering 404.
#[tokio::test]
async fn test_candidate_host_lifecycle() {
    let fetcher = RecordingFetcher::default();

    // viewer-request
    let viewer = event(
        "viewer-request",
        json!({
            "headers": {"host": [{"key": "Host", "value": "app-test.example.com"}]},
            "method": "GET",
            "uri": "/narwhal"
        }),
        None,
    );
    let request = into_request(
        handlers::invoke(EventType::ViewerRequest, viewer, &fetcher).await.unwrap(),
    );
    assert_eq!(request.headers.first_value("x-blue-green-context"), Some("green"));

    // the CDN swaps Host for the bucket domain before the origin stage
    let mut origin_request = request.clone();
    origin_request.headers.set("Host", "bgdemo.s3.us-east-1.amazonaws.com");
    let origin_event = CloudFrontEvent::single(None, origin_request, None);
    let request = into_request(
        handlers::invoke(EventType::OriginRequest, origin_event, &fetcher).await.unwrap(),
    );
    let origin = serde_json::to_value(request.origin.as_ref().unwrap()).unwrap();
    assert_eq!(
        origin,
        json!({
            "s3": {
                "authMethod": "origin-access-identity",
                "customHeaders": {},
                "domainName": "bgdemo.s3.us-east-1.amazonaws.com",
                "path": "/green",
                "region": "us-east-1"
            }
        })
    );

    // origin-response
    let not_found = Response::new(404, "Not Found");
    let response_event = CloudFrontEvent::single(None, request, Some(not_found));
    let response = into_response(
        handlers::invoke(EventType::OriginResponse, response_event, &fetcher)
            .await
            .unwrap(),
    );

    assert_eq!(response.status, "200");
    assert_eq!(response.status_description.as_deref(), Some("OK"));
    assert_eq!(response.headers.first_value("content-type"), Some("text/html"));
    assert_eq!(response.body.as_deref(), Some(SHELL));
    assert_eq!(
        *fetcher.urls.lock().unwrap(),
        vec!["https://app-test.example.com/index.html".to_string()]
    );
}
