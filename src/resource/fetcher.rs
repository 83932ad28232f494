//! Resource Fetcher
//!
//! Walks page-numbered list endpoints. Any `list` method of the form
//! `fn(&ListOptions) -> Result<(Vec<T>, Response)>` can be driven by
//! [`pages`] or [`fetch_all`] through a small closure:
//!
//! ```ignore
//! let droplets = fetch_all(ListOptions::new(1, 200), |opts| async move {
//!     client.droplets().list(&opts).await
//! })
//! .await?;
//! ```

use crate::api::links::current_page;
use crate::api::{ListOptions, Response, Result};
use futures::stream::{self, Stream, TryStreamExt};
use std::future::Future;
use tracing::debug;

/// Stream every page of a list endpoint, starting at `opts.page`.
///
/// The stream ends after the response whose links mark it as the last page,
/// or after an empty page. The first error is yielded and ends the stream.
pub fn pages<T, F, Fut>(opts: ListOptions, list: F) -> impl Stream<Item = Result<Vec<T>>>
where
    F: FnMut(ListOptions) -> Fut,
    Fut: Future<Output = Result<(Vec<T>, Response)>>,
{
    stream::try_unfold((Some(opts), list), |(next, mut list)| async move {
        let Some(opts) = next else {
            return Ok(None);
        };

        debug!("Fetching page {}", opts.page.max(1));
        let (items, resp) = list(opts.clone()).await?;
        let next = next_page(&opts, &items, &resp)?;
        Ok(Some((items, (next, list))))
    })
}

/// Fetch all resources (auto-paginate)
pub async fn fetch_all<T, F, Fut>(opts: ListOptions, list: F) -> Result<Vec<T>>
where
    F: FnMut(ListOptions) -> Fut,
    Fut: Future<Output = Result<(Vec<T>, Response)>>,
{
    let mut all_items = Vec::new();
    let pages = pages(opts, list);
    futures::pin_mut!(pages);

    while let Some(items) = pages.try_next().await? {
        all_items.extend(items);
    }

    Ok(all_items)
}

/// Options for the page after `resp`, or `None` when it was the last one.
fn next_page<T>(opts: &ListOptions, items: &[T], resp: &Response) -> Result<Option<ListOptions>> {
    if items.is_empty() || resp.is_last_page() {
        return Ok(None);
    }

    let current = match current_page(resp.links.as_ref())? {
        0 => opts.page.max(1),
        page => page,
    };

    Ok(Some(ListOptions {
        page: current + 1,
        ..opts.clone()
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Links, Pages};
    use reqwest::header::HeaderMap;
    use reqwest::StatusCode;
    use std::sync::{Arc, Mutex};

    fn page_response(page: u32, last: u32) -> Response {
        let mut resp = Response::new(StatusCode::OK, HeaderMap::new());
        let url = |p: u32| format!("https://api.example.com/v2/droplets?page={}", p);
        let pages = Pages {
            prev: if page > 1 { url(page - 1) } else { String::new() },
            next: if page < last { url(page + 1) } else { String::new() },
            ..Default::default()
        };
        resp.links = Some(Links {
            pages: Some(pages),
            ..Default::default()
        });
        resp
    }

    #[tokio::test]
    async fn test_fetch_all_follows_pages() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = seen.clone();

        let items = fetch_all(ListOptions::new(1, 2), move |opts| {
            let log = log.clone();
            async move {
                log.lock().unwrap().push(opts.page);
                Ok((vec![opts.page * 10, opts.page * 10 + 1], page_response(opts.page, 3)))
            }
        })
        .await
        .unwrap();

        assert_eq!(items, vec![10, 11, 20, 21, 30, 31]);
        assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_single_page_without_links() {
        let items = fetch_all(ListOptions::default(), |_| async {
            Ok((vec!["only"], Response::new(StatusCode::OK, HeaderMap::new())))
        })
        .await
        .unwrap();

        assert_eq!(items, vec!["only"]);
    }

    #[tokio::test]
    async fn test_empty_page_stops() {
        let items: Vec<u32> = fetch_all(ListOptions::default(), |opts| async move {
            Ok((Vec::new(), page_response(opts.page.max(1), 5)))
        })
        .await
        .unwrap();

        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_pages_yields_error() {
        let stream = pages(ListOptions::default(), |_| async {
            Err::<(Vec<u32>, Response), _>(crate::api::Error::InvalidResponse("boom".to_string()))
        });
        futures::pin_mut!(stream);

        assert!(stream.try_next().await.is_err());
    }
}
