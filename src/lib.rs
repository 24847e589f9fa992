//! # Censys
//!
//! A client for the [Censys](https://censys.io) search API. Only the search
//! endpoint is implemented so far, over the certificates, IPv4 and websites
//! indices.
//!
//! Credentials are read from `CENSYS_API_ID` and `CENSYS_API_SECRET` by
//! [`ClientConfig::from_env`] and can be overridden on the client afterwards.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use censys::{indices::ipv4, ClientConfig, GetOptions};
//!
//! # async fn run() -> censys::Result<()> {
//! let mut api = ipv4::search_client(ClientConfig::from_env()?);
//!
//! // One page, explicit arguments
//! let page = api.call("nginx", 1, &["ip", "protocols"]).await?;
//! println!("{} results over {} pages", page.count(), page.total_pages());
//! for result in &page {
//!     println!("#{} {}", result.overall_number(), result);
//! }
//!
//! // Up to 250 results across as many pages as needed
//! let mut cursor = api.get(
//!     GetOptions::default()
//!         .query("nginx")
//!         .fields(["ip"])
//!         .max_results(250),
//! );
//! while let Some(result) = cursor.next().await? {
//!     println!("{}", result.field("ip")?);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`search`]: query escaping, [`SearchClient`], result pages and records
//! - [`client`]: HTTP session handling shared by API access objects
//! - [`indices`]: per-index field validation and constructors
//! - [`config`]: [`ClientConfig`] and its environment variables
//! - [`types`]: endpoint, index and HTTP method enumerations
//! - [`error`]: [`CensysError`] and the [`Result`] alias

pub mod client;
pub mod config;
pub mod error;
pub mod indices;
pub mod search;
pub mod types;

pub use client::{ApiClient, ApiResult, ErrorResult, RawResponse};
pub use config::ClientConfig;
pub use error::{CensysError, Result};
pub use search::{
    escape, GetOptions, SearchClient, SearchCursor, SearchResult, SearchResultSet,
};
pub use types::{Endpoint, HttpMethod, Index};
