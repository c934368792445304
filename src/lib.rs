//! # Asynchronous and type-safe client for the DNSimple API.
//!
//! Implements a client for the domain and record endpoints of the
//! [DNSimple API], authenticating every request with HTTP Basic-Auth.
//!
//! ## Examples
//!
//! ```no_run
//! use dnsimple_api::{Attributes, Client, Destroyable};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::builder()
//!     .username("alice")
//!     .password("secret")
//!     .build()?;
//!
//! let domains = client.domains().all().await?;
//! if let Some(domain) = domains.find("name", "example.com") {
//!     let mut records = client.domains().records(domain).await?;
//!     if let Some(www) = records.find_mut("name", "www") {
//!         www.destroy(&client).await?;
//!     }
//! }
//!
//! let domain = client
//!     .domains()
//!     .create(Attributes::new().add("name", "example.org"))
//!     .await?;
//! client
//!     .records()
//!     .create(
//!         &domain,
//!         Attributes::new()
//!             .add("name", "www")
//!             .add("record_type", "A")
//!             .add("content", "192.0.2.1"),
//!     )
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! [DNSimple API]: https://dnsimple.com/documentation/api

mod client;
pub mod codec;
mod collection;
pub mod domain;
mod errors;
mod payload;
pub mod record;
mod resource;
mod transport;

#[cfg(test)]
mod testing;

pub use client::*;
pub use collection::*;
pub use domain::{Domain, DomainRef, Domains};
pub use errors::*;
pub use payload::Attributes;
pub use record::{Record, Records};
pub use resource::*;
pub use transport::*;
