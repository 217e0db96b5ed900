//! Resource proxy and composition root

use crate::backoffice::client::{Resource, ResourceClient, ResourceCollection};
use crate::backoffice::query::Parameters;
use anyhow::Result;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

const EVENTS_COUNT_ENDPOINT: &str = "/api/v1/events/count";

/// Resource types exposed by the back office
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Entities,
    Events,
    Microservices,
    Properties,
    Changes,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 5] = [
        ResourceKind::Entities,
        ResourceKind::Events,
        ResourceKind::Microservices,
        ResourceKind::Properties,
        ResourceKind::Changes,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ResourceKind::Entities => "entities",
            ResourceKind::Events => "events",
            ResourceKind::Microservices => "microservices",
            ResourceKind::Properties => "properties",
            ResourceKind::Changes => "changes",
        }
    }

    /// Collection endpoint path for this kind
    pub fn endpoint(self) -> &'static str {
        match self {
            ResourceKind::Entities => "/api/v1/entities",
            ResourceKind::Events => "/api/v1/events",
            ResourceKind::Microservices => "/api/v1/microservices",
            ResourceKind::Properties => "/api/v1/properties",
            ResourceKind::Changes => "/api/v1/changes",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ResourceKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        ResourceKind::ALL
            .into_iter()
            .find(|kind| kind.name() == wanted)
            .ok_or_else(|| anyhow::anyhow!("Unknown resource: {}", s))
    }
}

/// Proxy for one resource type
#[derive(Clone)]
pub struct ResourceProxy {
    client: ResourceClient,
    kind: ResourceKind,
}

impl ResourceProxy {
    pub fn new(client: ResourceClient, kind: ResourceKind) -> Self {
        Self { client, kind }
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// Fetch `{endpoint}/{id}`
    pub async fn one(&self, id: &str) -> Result<Resource> {
        let endpoint = format!("{}/{}", self.kind.endpoint(), id);
        self.client.get_one(&endpoint, &Parameters::new()).await
    }

    /// Fetch one page of `{endpoint}` filtered by `parameters`
    pub async fn many(&self, parameters: &Parameters) -> Result<ResourceCollection> {
        self.client.get_many(self.kind.endpoint(), parameters).await
    }
}

/// All resource proxies built over one client.
///
/// Constructed once at startup and passed to whatever needs it.
#[derive(Clone)]
pub struct BackOffice {
    client: ResourceClient,
}

impl BackOffice {
    pub fn new(client: ResourceClient) -> Self {
        Self { client }
    }

    pub fn proxy(&self, kind: ResourceKind) -> ResourceProxy {
        ResourceProxy::new(self.client.clone(), kind)
    }

    pub fn entities(&self) -> ResourceProxy {
        self.proxy(ResourceKind::Entities)
    }

    pub fn events(&self) -> ResourceProxy {
        self.proxy(ResourceKind::Events)
    }

    pub fn microservices(&self) -> ResourceProxy {
        self.proxy(ResourceKind::Microservices)
    }

    pub fn properties(&self) -> ResourceProxy {
        self.proxy(ResourceKind::Properties)
    }

    pub fn changes(&self) -> ResourceProxy {
        self.proxy(ResourceKind::Changes)
    }

    /// Total number of stored events, read from `meta.count`
    pub async fn count_events(&self) -> Result<Option<u64>> {
        let response = self
            .client
            .get_many(EVENTS_COUNT_ENDPOINT, &Parameters::new())
            .await?;

        Ok(response
            .meta
            .as_ref()
            .and_then(|meta| meta.get("count"))
            .and_then(Value::as_u64))
    }
}
