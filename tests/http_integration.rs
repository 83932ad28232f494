//! Integration tests for the API client using wiremock
//!
//! These tests drive `docean::api::Client` against mocked endpoints and
//! check request headers, error decoding, rate tracking and retries.

mod common;

use docean::api::{Client, Error, ListOptions, LIBRARY_VERSION};
use reqwest::StatusCode;
use serde_json::json;
use std::sync::{Arc, Mutex};
use wiremock::matchers::{bearer_token, body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Request construction and response decoding
mod http_client_tests {
    use super::*;

    /// A GET carries the token, JSON accept header and default user agent
    #[tokio::test]
    async fn test_get_sends_standard_headers() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v2/droplets/12345"))
            .and(bearer_token(common::TOKEN))
            .and(header("Accept", "application/json"))
            .and(header("User-Agent", format!("docean/{}", LIBRARY_VERSION).as_str()))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"droplet": {"id": 12345, "name": "example"}})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = common::client(&server);
        let (droplet, resp) = client.droplets().get(12345).await.unwrap();

        assert_eq!(droplet.id, 12345);
        assert_eq!(droplet.name, "example");
        assert_eq!(resp.status, StatusCode::OK);
        assert!(resp.links.is_none());
    }

    /// A POST sends its body as JSON
    #[tokio::test]
    async fn test_post_sends_json_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v2/domains"))
            .and(header("Content-Type", "application/json"))
            .and(body_json(json!({"name": "example.com", "ip_address": "127.0.0.1"})))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(json!({"domain": {"name": "example.com"}})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = common::client(&server);
        let req = docean::resource::domains::DomainCreateRequest {
            name: "example.com".to_string(),
            ip_address: "127.0.0.1".to_string(),
        };
        let (domain, resp) = client.domains().create(&req).await.unwrap();

        assert_eq!(domain.name, "example.com");
        assert_eq!(resp.status, StatusCode::CREATED);
    }

    /// Extra headers configured on the builder go out with every request
    #[tokio::test]
    async fn test_custom_headers_are_sent() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v2/account"))
            .and(header("X-Test-Header", "docean"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"account": {}})))
            .expect(1)
            .mount(&server)
            .await;

        let client = docean::Client::builder()
            .token(common::TOKEN)
            .base_url(&server.uri())
            .header("X-Test-Header", "docean")
            .build()
            .unwrap();

        client.account().get().await.unwrap();
    }

    /// A 204 answer to a delete is a success with no body
    #[tokio::test]
    async fn test_delete_no_content() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/v2/droplets/12345"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = common::client(&server);
        let resp = client.droplets().delete(12345).await.unwrap();

        assert_eq!(resp.status, StatusCode::NO_CONTENT);
    }

    /// Links and meta at the top level of a list envelope end up on the response
    #[tokio::test]
    async fn test_list_envelope_links_and_meta() {
        let server = MockServer::start().await;

        let next = common::page_url(&server, "/v2/regions", 3);
        let prev = common::page_url(&server, "/v2/regions", 1);

        Mock::given(method("GET"))
            .and(path("/v2/regions"))
            .and(query_param("page", "2"))
            .and(query_param("per_page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "regions": [{"slug": "nyc3", "name": "New York 3", "available": true}],
                "links": {"pages": {"prev": prev, "next": next}},
                "meta": {"total": 13}
            })))
            .mount(&server)
            .await;

        let client = common::client(&server);
        let (regions, resp) = client.regions().list(&ListOptions::new(2, 1)).await.unwrap();

        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].slug, "nyc3");
        assert_eq!(resp.total(), Some(13));
        assert!(!resp.is_last_page());
        assert_eq!(resp.links.unwrap().current_page().unwrap(), 2);
    }

    /// Rate limit headers are exposed on the response and remembered by the client
    #[tokio::test]
    async fn test_rate_headers_tracked() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v2/account"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("RateLimit-Limit", "5000")
                    .insert_header("RateLimit-Remaining", "4994")
                    .insert_header("RateLimit-Reset", "1444931833")
                    .set_body_json(json!({"account": {"email": "sammy@example.com"}})),
            )
            .mount(&server)
            .await;

        let client = common::client(&server);
        let (_, resp) = client.account().get().await.unwrap();

        assert_eq!(resp.rate.limit, 5000);
        assert_eq!(resp.rate.remaining, 4994);
        assert_eq!(resp.rate.reset.unwrap().timestamp(), 1444931833);
        assert_eq!(client.rate().await, resp.rate);
    }

    /// The completion callback sees every request with its final status
    #[tokio::test]
    async fn test_request_completed_callback() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v2/account"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"account": {}})))
            .mount(&server)
            .await;

        let seen: Arc<Mutex<Vec<(String, u16)>>> = Arc::default();
        let sink = Arc::clone(&seen);

        let client = docean::Client::builder()
            .token(common::TOKEN)
            .base_url(&server.uri())
            .on_request_completed(move |req| {
                sink.lock()
                    .unwrap()
                    .push((req.url.path().to_string(), req.status.as_u16()));
            })
            .build()
            .unwrap();

        client.account().get().await.unwrap();

        assert_eq!(*seen.lock().unwrap(), vec![("/v2/account".to_string(), 200)]);
    }
}

/// Error responses
mod error_tests {
    use super::*;

    /// The message and request id from the body are kept on the error
    #[tokio::test]
    async fn test_error_body_decoded() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v2/droplets/1"))
            .respond_with(ResponseTemplate::new(422).set_body_json(json!({
                "id": "unprocessable_entity",
                "message": "Droplet is locked",
                "request_id": "dead-beef"
            })))
            .mount(&server)
            .await;

        let client = common::client(&server);
        let err = client.droplets().get(1).await.unwrap_err();

        assert_eq!(err.status(), Some(StatusCode::UNPROCESSABLE_ENTITY));
        match &err {
            Error::Api(resp) => {
                assert_eq!(resp.message, "Droplet is locked");
                assert_eq!(resp.request_id, "dead-beef");
                assert_eq!(resp.attempts, 0);
            }
            other => panic!("unexpected error {:?}", other),
        }
        let shown = err.to_string();
        assert!(shown.starts_with("GET "));
        assert!(shown.ends_with(": 422 (request \"dead-beef\") Droplet is locked"));
    }

    /// Without a request id in the body the header is used
    #[tokio::test]
    async fn test_not_found_request_id_from_header() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v2/domains/missing.example"))
            .respond_with(
                ResponseTemplate::new(404)
                    .insert_header("x-request-id", "abc-123")
                    .set_body_json(json!({"id": "not_found", "message": "The resource you were accessing could not be found."})),
            )
            .mount(&server)
            .await;

        let client = common::client(&server);
        let err = client.domains().get("missing.example").await.unwrap_err();

        assert!(err.is_not_found());
        match err {
            Error::Api(resp) => assert_eq!(resp.request_id, "abc-123"),
            other => panic!("unexpected error {:?}", other),
        }
    }

    /// A body that is not JSON becomes the message verbatim
    #[tokio::test]
    async fn test_non_json_error_body() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v2/account"))
            .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
            .mount(&server)
            .await;

        let client = common::client(&server);
        match client.account().get().await.unwrap_err() {
            Error::Api(resp) => {
                assert_eq!(resp.status, StatusCode::BAD_GATEWAY);
                assert_eq!(resp.message, "Bad Gateway");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    /// An invalid id is rejected before any request is sent
    #[tokio::test]
    async fn test_invalid_argument_sends_nothing() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = common::client(&server);
        let err = client.droplets().get(0).await.unwrap_err();
        assert_eq!(err.to_string(), "dropletID is invalid because cannot be less than 1");

        let err = client.kubernetes().get("").await.unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }
}

/// Retry behaviour
mod retry_tests {
    use super::*;

    /// Transient server errors are retried until a success comes back
    #[tokio::test]
    async fn test_retries_until_success() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v2/account"))
            .respond_with(ResponseTemplate::new(500))
            .up_to_n_times(2)
            .expect(2)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/v2/account"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"account": {"status": "active"}})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = common::retrying_client(&server, 3);
        let (account, _) = client.account().get().await.unwrap();

        assert_eq!(account.status, "active");
    }

    /// After the last retry the error reports how many attempts were made
    #[tokio::test]
    async fn test_retries_exhausted() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v2/account"))
            .respond_with(
                ResponseTemplate::new(503).set_body_json(json!({"message": "try later"})),
            )
            .expect(3)
            .mount(&server)
            .await;

        let client = common::retrying_client(&server, 2);
        let err = client.account().get().await.unwrap_err();

        match &err {
            Error::Api(resp) => assert_eq!(resp.attempts, 3),
            other => panic!("unexpected error {:?}", other),
        }
        assert!(err.to_string().ends_with("try later; giving up after 3 attempt(s)"));
    }

    /// Rate limited requests are retried, honoring Retry-After within the cap
    #[tokio::test]
    async fn test_too_many_requests_retried() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v2/account"))
            .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "1"))
            .up_to_n_times(1)
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/v2/account"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"account": {}})))
            .expect(1)
            .mount(&server)
            .await;

        let client = common::retrying_client(&server, 1);
        assert!(client.account().get().await.is_ok());
    }

    /// Client errors are never retried
    #[tokio::test]
    async fn test_client_error_not_retried() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v2/account"))
            .respond_with(ResponseTemplate::new(403))
            .expect(1)
            .mount(&server)
            .await;

        let client = common::retrying_client(&server, 3);
        let err = client.account().get().await.unwrap_err();

        assert_eq!(err.status(), Some(StatusCode::FORBIDDEN));
    }
}

/// Client-side rate limiting
mod rate_limit_tests {
    use super::*;
    use std::time::{Duration, Instant};

    /// Requests from a limited client are spaced by the configured rate
    #[tokio::test]
    async fn test_static_rate_limit_spaces_requests() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v2/account"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "account": {"uuid": "b6fr89dbf6d9156cace5f3c78dc9851d957381ef"}
            })))
            .expect(3)
            .mount(&server)
            .await;

        let client = Client::builder()
            .token(common::TOKEN)
            .base_url(&server.uri())
            .static_rate_limit(20.0)
            .build()
            .unwrap();

        let start = Instant::now();
        for _ in 0..3 {
            let (account, _) = client.account().get().await.unwrap();
            assert_eq!(account.uuid, "b6fr89dbf6d9156cace5f3c78dc9851d957381ef");
        }
        assert!(start.elapsed() >= Duration::from_millis(100));
    }

    #[tokio::test]
    async fn test_unschedulable_rate_is_rejected() {
        for rps in [0.0, -2.0, f64::INFINITY, 1e-20] {
            let err = Client::builder().static_rate_limit(rps).build().unwrap_err();
            assert!(matches!(err, Error::InvalidArgument(_)), "{}", rps);
        }
    }
}
