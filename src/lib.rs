//! Client proxies for the Auditbase back office REST API.
//!
//! The [`backoffice`] module holds the resource client and its transport;
//! [`resource`] layers one proxy per resource type on top of it.
//!
//! ```ignore
//! use std::sync::Arc;
//! use auditbase_backoffice::backoffice::{client::ResourceClient, http::HttpTransport};
//! use auditbase_backoffice::resource::BackOffice;
//!
//! async fn show(id: &str) -> anyhow::Result<()> {
//!     let transport = HttpTransport::new("http://localhost:3000", &Default::default(), None)?;
//!     let back_office = BackOffice::new(ResourceClient::new(Arc::new(transport)));
//!     let event = back_office.events().one(id).await?;
//!     println!("{:?}", event.attributes);
//!     Ok(())
//! }
//! ```

pub mod backoffice;
pub mod config;
pub mod resource;

pub use backoffice::client::{Resource, ResourceClient, ResourceCollection};
pub use backoffice::http::{ApiStatusError, HttpTransport, Transport};
pub use backoffice::query::Parameters;
pub use resource::{BackOffice, ListParams, ResourceKind, ResourceProxy};
