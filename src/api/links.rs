//! Pagination links
//!
//! List endpoints answer with a `links` object next to the resource array:
//!
//! ```json
//! "links": {
//!   "pages": {"first": "...?page=1", "prev": "...?page=1", "next": "...?page=3"},
//!   "actions": [{"id": 1, "rel": "create", "href": "..."}]
//! }
//! ```

use super::error::{Error, Result};
use serde::{Deserialize, Serialize};
use url::Url;

/// Links returned alongside a list or an action-producing call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Links {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pages: Option<Pages>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<LinkAction>,
}

/// Page URLs. Missing entries are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pages {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub first: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub prev: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub last: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub next: String,
}

/// An action started by the request, e.g. the `create` action of a new droplet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinkAction {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub rel: String,
    #[serde(default)]
    pub href: String,
}

impl Links {
    /// Page number of the response these links came with.
    pub fn current_page(&self) -> Result<u32> {
        match &self.pages {
            None => Ok(1),
            Some(pages) => pages.current(),
        }
    }

    /// True when there is no page after this one.
    pub fn is_last_page(&self) -> bool {
        self.pages.as_ref().map_or(true, |p| p.next.is_empty())
    }

    /// `page_token` of the next page, for token-paginated endpoints.
    pub fn next_page_token(&self) -> Result<Option<String>> {
        match &self.pages {
            Some(p) if !p.next.is_empty() => page_token_for_url(&p.next),
            _ => Ok(None),
        }
    }

    /// `page_token` of the previous page, for token-paginated endpoints.
    pub fn prev_page_token(&self) -> Result<Option<String>> {
        match &self.pages {
            Some(p) if !p.prev.is_empty() => page_token_for_url(&p.prev),
            _ => Ok(None),
        }
    }

    /// Find the href of the action with the given `rel`.
    pub fn action_href(&self, rel: &str) -> Option<&str> {
        self.actions
            .iter()
            .find(|a| a.rel == rel)
            .map(|a| a.href.as_str())
    }
}

impl Pages {
    fn current(&self) -> Result<u32> {
        if self.prev.is_empty() && !self.next.is_empty() {
            return Ok(1);
        }
        if !self.prev.is_empty() {
            return Ok(page_for_url(&self.prev)? + 1);
        }
        Ok(0)
    }
}

/// Current page for an optional links object. `None` means a single page.
pub fn current_page(links: Option<&Links>) -> Result<u32> {
    links.map_or(Ok(1), Links::current_page)
}

/// Whether `links` describes the final page. Absent links mean there is only one page.
pub fn is_last_page(links: Option<&Links>) -> bool {
    links.map_or(true, Links::is_last_page)
}

/// Read the `page` query parameter of a page URL.
pub fn page_for_url(raw: &str) -> Result<u32> {
    let url = Url::parse(raw)?;
    let page = url
        .query_pairs()
        .find(|(k, _)| k == "page")
        .map(|(_, v)| v.into_owned())
        .ok_or_else(|| Error::InvalidResponse(format!("no page parameter in {}", raw)))?;

    page.parse::<u32>()
        .map_err(|_| Error::InvalidResponse(format!("page parameter is not a number: {}", page)))
}

fn page_token_for_url(raw: &str) -> Result<Option<String>> {
    let url = Url::parse(raw)?;
    Ok(url
        .query_pairs()
        .find(|(k, _)| k == "page_token")
        .map(|(_, v)| v.into_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn links(value: serde_json::Value) -> Links {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_first_page() {
        let l = links(json!({"pages": {
            "last": "https://api.digitalocean.com/v2/droplets/?page=3",
            "next": "https://api.digitalocean.com/v2/droplets/?page=2"
        }}));
        assert_eq!(l.current_page().unwrap(), 1);
        assert!(!l.is_last_page());
    }

    #[test]
    fn test_middle_page() {
        let l = links(json!({"pages": {
            "first": "https://api.digitalocean.com/v2/droplets/?page=1",
            "prev": "https://api.digitalocean.com/v2/droplets/?page=1",
            "last": "https://api.digitalocean.com/v2/droplets/?page=3",
            "next": "https://api.digitalocean.com/v2/droplets/?page=3"
        }}));
        assert_eq!(l.current_page().unwrap(), 2);
        assert!(!l.is_last_page());
    }

    #[test]
    fn test_last_page() {
        let l = links(json!({"pages": {
            "first": "https://api.digitalocean.com/v2/droplets/?page=1",
            "prev": "https://api.digitalocean.com/v2/droplets/?page=2"
        }}));
        assert_eq!(l.current_page().unwrap(), 3);
        assert!(l.is_last_page());
    }

    #[test]
    fn test_last_page_with_last_link() {
        let l = links(json!({"pages": {
            "first": "https://api.digitalocean.com/v2/projects?page=1",
            "prev": "https://api.digitalocean.com/v2/projects?page=2",
            "last": "https://api.digitalocean.com/v2/projects?page=3"
        }}));
        assert_eq!(l.current_page().unwrap(), 3);
        assert!(l.is_last_page());
    }

    #[test]
    fn test_missing_pages() {
        let l = links(json!({}));
        assert_eq!(l.current_page().unwrap(), 1);
        assert!(l.is_last_page());
        assert_eq!(current_page(None).unwrap(), 1);
        assert!(is_last_page(None));
    }

    #[test]
    fn test_page_for_url() {
        assert_eq!(page_for_url("https://api.digitalocean.com/v2/droplets/?page=5").unwrap(), 5);
        assert_eq!(
            page_for_url("https://api.digitalocean.com/v2/droplets/?page=2&page_token=aaa").unwrap(),
            2
        );
    }

    #[test]
    fn test_page_for_url_errors() {
        assert!(page_for_url("http://example.com").is_err());
        assert!(page_for_url("").is_err());
        assert!(page_for_url("no url").is_err());
    }

    #[test]
    fn test_page_tokens() {
        let l = links(json!({"pages": {
            "prev": "https://api.digitalocean.com/v2/droplets/?page_token=bbb",
            "next": "https://api.digitalocean.com/v2/droplets/?page_token=aaa"
        }}));
        assert_eq!(l.next_page_token().unwrap().as_deref(), Some("aaa"));
        assert_eq!(l.prev_page_token().unwrap().as_deref(), Some("bbb"));

        let l = links(json!({"pages": {"next": "https://api.digitalocean.com/v2/droplets/"}}));
        assert_eq!(l.next_page_token().unwrap(), None);

        let l = links(json!({"pages": {}}));
        assert_eq!(l.next_page_token().unwrap(), None);
        assert_eq!(l.prev_page_token().unwrap(), None);
    }

    #[test]
    fn test_action_href() {
        let l = links(json!({"actions": [
            {"id": 1, "rel": "create", "href": "https://api.digitalocean.com/v2/actions/1"}
        ]}));
        assert_eq!(l.action_href("create"), Some("https://api.digitalocean.com/v2/actions/1"));
        assert_eq!(l.action_href("delete"), None);
    }
}
