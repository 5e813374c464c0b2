//! Rust SDK for the ScrapeGraph AI API.
//!
//! ScrapeGraph AI is a web scraping API: AI-guided extraction from pages,
//! web search, crawling, Markdown/HTML conversion, browser automation and
//! scheduled jobs. Every operation returns the API's JSON body unchanged.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use scrapegraph::{Client, OutputSchema, SmartScraperRequest, API_KEY_ENV_VAR};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), scrapegraph::Error> {
//!     let api_key = std::env::var(API_KEY_ENV_VAR).unwrap_or_default();
//!     let client = Client::builder(api_key).build()?;
//!
//!     let mut request = SmartScraperRequest::url(
//!         "https://example.com/product",
//!         "Extract the product name and price",
//!     );
//!     request.output_schema = Some(OutputSchema::from(json!({
//!         "type": "object",
//!         "properties": {
//!             "name": {"type": "string"},
//!             "price": {"type": "number"},
//!         },
//!     })));
//!
//!     let result = client.smartscraper(request).await?;
//!     println!("{}", result["result"]);
//!     Ok(())
//! }
//! ```
//!
//! # Mock mode
//!
//! Setting `SGAI_MOCK=1`, calling [`ClientBuilder::mock`] or
//! [`Client::enable_mock`] makes every call return a canned response without
//! touching the network. [`Client::with_mock`] and the `mock` field of each
//! request override the setting for a single call.
//!
//! ```rust
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), scrapegraph::Error> {
//! let client = scrapegraph::Client::builder("test-key").mock(true).build()?;
//! let credits = client.get_credits().await?;
//! assert!(credits["remaining_credits"].is_number());
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod error;
pub mod mock;
mod schema;
mod types;
mod validate;
mod version;

pub use client::{Client, ClientBuilder};
pub use config::{
    mock_enabled_from_env, BoxError, MockConfig, MockHandler, MockResponse, API_KEY_ENV_VAR,
    MOCK_ENV_VAR,
};
pub use error::{Error, Result, NETWORK_ERROR_MESSAGE};
pub use schema::OutputSchema;
pub use types::*;
pub use validate::MAX_CONTENT_BYTES;
pub use version::{build_user_agent, SDK_VERSION};

pub use reqwest::Method;
