//! List options and query-string building

use super::error::{ArgError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Paging options accepted by most list endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListOptions {
    /// For paginated result sets, page of results to retrieve.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub page: u32,

    /// For paginated result sets, the number of results to include per page.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub per_page: u32,

    /// Whether or not to include the project each resource belongs to.
    #[serde(default, skip_serializing_if = "is_false")]
    pub with_projects: bool,
}

impl ListOptions {
    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            page,
            per_page,
            ..Self::default()
        }
    }
}

/// Options for endpoints that page with an opaque token instead of a page number.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenListOptions {
    #[serde(default, skip_serializing_if = "is_zero")]
    pub page: u32,

    #[serde(default, skip_serializing_if = "is_zero")]
    pub per_page: u32,

    /// Token of the page to fetch, taken from a previous response's links
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub page_token: String,
}

pub(crate) fn is_zero<T: Default + PartialEq>(v: &T) -> bool {
    *v == T::default()
}

pub(crate) fn is_false(v: &bool) -> bool {
    !*v
}

/// Add the fields of `opts` to the query string of `path`.
///
/// Fields already present on `path` are replaced, other existing parameters
/// are kept. Keys are emitted in sorted order, arrays repeat their key, and
/// null fields and empty arrays are dropped.
pub fn add_options<T: Serialize + ?Sized>(path: &str, opts: &T) -> Result<String> {
    let fields = match serde_json::to_value(opts)? {
        Value::Null => return Ok(path.to_string()),
        Value::Object(map) => map,
        _ => return Err(ArgError::new("options", "must serialize to an object").into()),
    };

    let (base, query) = match path.split_once('?') {
        Some((base, query)) => (base, query),
        None => (path, ""),
    };

    let mut params: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (k, v) in url::form_urlencoded::parse(query.as_bytes()) {
        params.entry(k.into_owned()).or_default().push(v.into_owned());
    }

    for (key, value) in fields {
        let values: Vec<String> = match value {
            Value::Null => continue,
            Value::Array(items) if items.is_empty() => continue,
            Value::Array(items) => items.iter().filter_map(render).collect(),
            other => render(&other).into_iter().collect(),
        };
        params.insert(key, values);
    }

    let mut encoded = url::form_urlencoded::Serializer::new(String::new());
    for (key, values) in &params {
        for value in values {
            encoded.append_pair(key, value);
        }
    }
    let encoded = encoded.finish();

    if encoded.is_empty() {
        Ok(base.to_string())
    } else {
        Ok(format!("{}?{}", base, encoded))
    }
}

fn render(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}
