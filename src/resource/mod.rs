//! Resource proxies
//!
//! Every back office resource type is served by the same [`ResourceProxy`],
//! configured with the endpoint of its [`ResourceKind`]. [`BackOffice`]
//! builds one proxy per kind on top of a single shared client.
//!
//! # Example
//!
//! ```ignore
//! use auditbase_backoffice::resource::{BackOffice, ListParams};
//!
//! async fn recent_entities(back_office: &BackOffice) -> anyhow::Result<()> {
//!     let params = ListParams::new().filter("entityTypeId", "7").page(1).into_parameters();
//!     let page = back_office.entities().many(&params).await?;
//!     println!("{} entities", page.items().len());
//!     Ok(())
//! }
//! ```

mod params;
mod proxy;

pub use params::ListParams;
pub use proxy::{BackOffice, ResourceKind, ResourceProxy};
