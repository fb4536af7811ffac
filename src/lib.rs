//! An async Rust client for the premiumize.me HTTP API.
//!
//! Every operation maps to exactly one HTTP request. The API key is sent as
//! the `apikey` query parameter on every call, and the response envelope is
//! unwrapped uniformly:
//! - `{"status":"error","message":...}` becomes [`Error::Api`]
//! - any other JSON body is returned unchanged
//! - an empty HTTP 200 response resolves to `None`
//! - an empty response with any other status becomes [`Error::Unspecified`]
//!
//! ## Quick start
//! - Configure authentication via environment variables (`PREMIUMIZE_API_KEY`,
//!   optionally `PREMIUMIZE_URL`) or a `.premiumizerc` file (current directory
//!   or home directory), or pass the key to [`Client::new`].
//! - Call the grouped operations: [`Client::folder`], [`Client::item`],
//!   [`Client::transfer`], [`Client::account`], [`Client::zip`],
//!   [`Client::cache`], [`Client::services`].
//!
//! ```no_run
//! use premiumize::{Client, FileSource};
//!
//! # async fn run() -> premiumize::Result<()> {
//! let client = Client::from_env()?;
//! let account = client.account().info().await?;
//! println!("{:?}", account);
//!
//! client
//!     .transfer()
//!     .create(None, Some(FileSource::path("ubuntu.torrent")), None)
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! No retries, rate limiting or caching happen here; wrap calls yourself if
//! you need them.

#![forbid(unsafe_code)]

mod api;
mod client;
mod config;
mod download;
mod error;
mod params;
mod upload;
mod util;

pub use api::{Account, Cache, Folder, Item, Services, Transfer, Zip};
pub use client::{ApiRequest, Client, ClientConfig, DEFAULT_BASE_URL};
pub use error::{ApiError, Error, Result};
pub use params::{ParamValue, Params};
pub use upload::FileSource;
