//! Property-based tests using proptest
//!
//! These tests check query-string building, page-link parsing, rate header
//! parsing and webhook signatures against randomized inputs.

use chrono::{TimeZone, Utc};
use docean::api::links::page_for_url;
use docean::api::{add_options, Links, ListOptions, Pages, Rate};
use docean::webhook::{self, VerifyOptions};
use proptest::prelude::*;
use reqwest::header::{HeaderMap, HeaderValue};
use std::collections::HashMap;

/// Parse the query string of a path into a map.
fn query_of(path: &str) -> HashMap<String, String> {
    let query = path.split_once('?').map(|(_, q)| q).unwrap_or("");
    url::form_urlencoded::parse(query.as_bytes())
        .into_owned()
        .collect()
}

fn arb_path() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("/v2/droplets".to_string()),
        Just("/v2/images".to_string()),
        "/v2/[a-z_]{1,20}",
    ]
}

fn arb_page_url() -> impl Strategy<Value = (String, u32)> {
    (arb_path(), 1u32..100_000).prop_map(|(path, page)| {
        (
            format!("https://api.digitalocean.com{}?page={}&per_page=20", path, page),
            page,
        )
    })
}

proptest! {
    /// Zero paging values are left out, others appear exactly once
    #[test]
    fn test_add_options_paging(path in arb_path(), page in 0u32..1000, per_page in 0u32..500) {
        let out = add_options(&path, &ListOptions::new(page, per_page)).unwrap();
        let query = query_of(&out);

        prop_assert!(out.starts_with(&path));
        prop_assert_eq!(query.get("page").cloned(), (page > 0).then(|| page.to_string()));
        prop_assert_eq!(query.get("per_page").cloned(), (per_page > 0).then(|| per_page.to_string()));
        prop_assert!(!query.contains_key("with_projects"));
    }

    /// Parameters already on the path survive unless the options replace them
    #[test]
    fn test_add_options_keeps_existing(tag in "[a-z0-9-]{1,16}", page in 1u32..1000) {
        let path = format!("/v2/droplets?tag_name={}&page=999999", tag);
        let out = add_options(&path, &ListOptions::new(page, 0)).unwrap();
        let query = query_of(&out);

        prop_assert_eq!(query.get("tag_name"), Some(&tag));
        prop_assert_eq!(query.get("page"), Some(&page.to_string()));
    }

    /// The page number is read back from any page link
    #[test]
    fn test_page_for_url((url, page) in arb_page_url()) {
        prop_assert_eq!(page_for_url(&url).unwrap(), page);
    }

    /// The current page is one past the previous link's page
    #[test]
    fn test_current_page_from_prev((prev, page) in arb_page_url(), has_next in any::<bool>()) {
        let links = Links {
            pages: Some(Pages {
                prev,
                next: if has_next { "https://api.digitalocean.com/v2/droplets?page=0".to_string() } else { String::new() },
                ..Default::default()
            }),
            ..Default::default()
        };

        prop_assert_eq!(links.current_page().unwrap(), page + 1);
        prop_assert_eq!(links.is_last_page(), !has_next);
    }

    /// Rate headers round-trip through their string form
    #[test]
    fn test_rate_from_headers(limit in 0i64..100_000, remaining in 0i64..100_000, reset in 0i64..4_000_000_000) {
        let mut headers = HeaderMap::new();
        headers.insert("ratelimit-limit", HeaderValue::from(limit));
        headers.insert("ratelimit-remaining", HeaderValue::from(remaining));
        headers.insert("ratelimit-reset", HeaderValue::from(reset));

        let rate = Rate::from_headers(&headers);
        prop_assert_eq!(rate.limit, limit);
        prop_assert_eq!(rate.remaining, remaining);
        prop_assert_eq!(rate.reset.map(|r| r.timestamp()), Some(reset));
    }

    /// A signature made with a secret verifies with that secret only
    #[test]
    fn test_webhook_sign_verify(
        payload in prop::collection::vec(any::<u8>(), 0..512),
        secret in "[A-Za-z0-9_-]{1,32}",
        other in "[A-Za-z0-9_-]{1,32}",
        ts in 1_000_000_000i64..2_000_000_000,
    ) {
        let at = Utc.timestamp_opt(ts, 0).unwrap();
        let header = webhook::sign(&secret, &payload, at);
        let opts = VerifyOptions {
            now: Some(at),
            ..Default::default()
        };

        prop_assert!(webhook::verify(&secret, &payload, &header, &opts).is_ok());
        if other != secret {
            prop_assert!(webhook::verify(&other, &payload, &header, &opts).is_err());
        }
    }
}
