//! Core API plumbing shared by every service
//!
//! # Module Structure
//!
//! - [`client`] - The [`Client`], its builder and the request dispatcher
//! - [`http`] - Response checking, retry policy and client-side rate limiting
//! - [`error`] - [`Error`], [`ErrorResponse`] and [`ArgError`]
//! - [`links`] / [`response`] - Pagination links, list metadata and [`Response`]
//! - [`options`] - [`ListOptions`] and query-string encoding
//! - [`auth`] - Token discovery from the environment and doctl's config
//!
//! # Example
//!
//! ```ignore
//! use docean::api::{Client, ListOptions};
//!
//! async fn example() -> docean::api::Result<()> {
//!     let client = Client::from_env()?;
//!     let (droplets, resp) = client.droplets().list(&ListOptions::new(1, 50)).await?;
//!     println!("{} droplets, last page: {}", droplets.len(), resp.is_last_page());
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod error;
pub mod http;
pub mod links;
pub mod options;
pub mod response;

pub use client::{
    ApiRequest, Client, ClientBuilder, CompletedRequest, RequestCompletionCallback, DEFAULT_BASE_URL,
    LIBRARY_VERSION,
};
pub use error::{ArgError, Error, ErrorResponse, Result};
pub use http::RetryConfig;
pub use links::{LinkAction, Links, Pages};
pub use options::{add_options, ListOptions, TokenListOptions};
pub use response::{Meta, Rate, Response};

pub(crate) use error::{require_non_empty, require_positive};
