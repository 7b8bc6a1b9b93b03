//! # yaru-client - Ya.ru resource API object mapper
//!
//! This crate maps the resources of the Ya.ru API (persons, clubs, entries
//! and their collections) onto lazily materialized Rust objects, built on
//! the schema-less document model of [`yaru_xml`].
//!
//! ## Features
//!
//! - **Lazy materialization**: an object created from an identifier fetches
//!   its document on the first attribute read, once
//! - **Type dispatch**: [`Client::get_object`] builds whatever object the
//!   server declares for an identifier
//! - **Collections**: members are extracted from the collection document,
//!   and [`Collection::more`] and [`Collection::iter_all`] follow `next`
//!   links page by page
//! - **Entries**: typed post type, access level and comments flag, composed
//!   back into a document for create and update
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use yaru_client::{Client, ClientConfig, Person, ResourceObject};
//!
//! fn main() -> yaru_client::Result<()> {
//!     let config = ClientConfig::from_env();
//!     yaru_client::init_logging(&config.log_level);
//!     let client = Client::new(&config)?;
//!
//!     let mut me = Person::new("/me/");
//!     println!("{:?}", me.fetch_attribute(&client, "name")?);
//!
//!     let mut friends = me.friends(&client)?;
//!     for friend in friends.iter_all(&client) {
//!         println!("{:?}", friend?.id());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Concurrency
//!
//! Operations that may fetch take `&mut self`, so an object is never
//! materialized by two callers at once. [`Client`] is `Send + Sync` and
//! may be shared between threads, each driving its own objects.

pub mod client;
pub mod club;
pub mod collection;
pub mod config;
pub mod dispatch;
pub mod entry;
pub mod error;
pub mod fetch;
pub mod http;
pub mod kind;
pub mod locator;
pub mod person;
pub mod resource;

pub use client::Client;
pub use club::Club;
pub use collection::{Collection, MemberIter};
pub use config::ClientConfig;
pub use dispatch::AnyResource;
pub use entry::{AccessLevel, Entry, EntryType};
pub use error::{Error, Result};
pub use fetch::{FetchRequest, FetchResponse, Fetcher, Method, TransportError};
pub use http::HttpFetcher;
pub use kind::ResourceKind;
pub use locator::ResourceLocator;
pub use person::{ClubRole, Person};
pub use resource::{Resource, ResourceObject};

pub use yaru_xml::{AttributeValue, Attributes, Links};

/// Initializes the tracing subscriber for logging.
///
/// `RUST_LOG` takes precedence over `level` when set.
///
/// # Arguments
///
/// * `level` - The log level (error, warn, info, debug, trace)
pub fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("yaru_client={},yaru_xml={}", level, level))
    });

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}
