//! Back office API interaction module
//!
//! This module provides the core functionality for talking to the Auditbase
//! back office REST API: query string construction, the HTTP transport and
//! the resource client that normalizes response envelopes.
//!
//! # Module Structure
//!
//! - [`client`] - Resource client issuing GETs and unwrapping envelopes
//! - [`http`] - Transport trait and the reqwest-backed implementation
//! - [`query`] - Query string serialization with encoding disabled
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use auditbase_backoffice::backoffice::client::ResourceClient;
//! use auditbase_backoffice::backoffice::http::HttpTransport;
//!
//! async fn example() -> anyhow::Result<()> {
//!     let transport = HttpTransport::new("http://localhost:3000", &Default::default(), None)?;
//!     let client = ResourceClient::new(Arc::new(transport));
//!     let entity = client.get_one("/api/v1/entities/42", &Default::default()).await?;
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod http;
pub mod query;
