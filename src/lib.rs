//! DigitalOcean API client
//!
//! # Module Structure
//!
//! - [`api`] - Client, request dispatch, errors, pagination primitives
//! - [`resource`] - One service per API resource, reached through [`api::Client`]
//! - [`webhook`] - Webhook signature signing and verification
//! - [`util`] - Helpers that poll long-running actions
//! - [`config`] - Persistent settings for the `docean` command line tool
//!
//! # Example
//!
//! ```ignore
//! use docean::api::Client;
//!
//! #[tokio::main]
//! async fn main() -> docean::api::Result<()> {
//!     let client = Client::from_token("dop_v1_xxx")?;
//!     let (account, _) = client.account().get().await?;
//!     println!("{} ({})", account.email, account.status);
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod resource;
pub mod util;
pub mod webhook;

pub use api::{Client, Error, Response, Result};
