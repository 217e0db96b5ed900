//! Resource Client
//!
//! Issues read-only requests through a [`Transport`] and normalizes the two
//! envelope shapes the back office answers with: a single resource under
//! `data`, or a collection under `data` with optional `meta`.

use super::http::Transport;
use super::query::{self, Parameters};
use anyhow::Result;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

/// A single resource unwrapped from `data.id` and `data.attributes`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resource {
    pub id: Option<String>,
    pub attributes: Option<Value>,
}

impl Resource {
    /// Unwrap a single-resource envelope.
    ///
    /// Missing `id` or `attributes` are kept as `None`; only an envelope
    /// without a `data` object is rejected.
    pub fn from_envelope(mut envelope: Value, uri: &str) -> Result<Self> {
        let Some(Value::Object(mut data)) = envelope.get_mut("data").map(Value::take) else {
            return Err(malformed(uri, "`data` is not an object"));
        };

        let id = match data.remove("id") {
            Some(Value::String(id)) => Some(id),
            Some(Value::Number(id)) => Some(id.to_string()),
            _ => None,
        };
        let attributes = data.remove("attributes").filter(|v| !v.is_null());

        Ok(Self { id, attributes })
    }
}

/// A page of raw collection items plus whatever `meta` the server sent
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceCollection {
    /// `None` when the envelope carried no `data` at all
    pub collection: Option<Vec<Value>>,
    pub meta: Option<Value>,
}

impl ResourceCollection {
    /// Unwrap a collection envelope.
    ///
    /// Items are passed through verbatim. A missing or null `data` stays
    /// `None`; `data` of any other non-array shape is rejected.
    pub fn from_envelope(mut envelope: Value, uri: &str) -> Result<Self> {
        let collection = match envelope.get_mut("data").map(Value::take) {
            Some(Value::Array(items)) => Some(items),
            None | Some(Value::Null) => None,
            Some(_) => return Err(malformed(uri, "`data` is not an array")),
        };
        let meta = envelope
            .get_mut("meta")
            .map(Value::take)
            .filter(|v| !v.is_null());

        Ok(Self { collection, meta })
    }

    /// Items of the page, empty when the server sent no `data`
    pub fn items(&self) -> &[Value] {
        self.collection.as_deref().unwrap_or_default()
    }
}

fn malformed(uri: &str, reason: &str) -> anyhow::Error {
    anyhow::anyhow!("Malformed envelope from {}: {}", uri, reason)
}

/// Client shared by every resource proxy
#[derive(Clone)]
pub struct ResourceClient {
    transport: Arc<dyn Transport>,
}

impl ResourceClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Build a request URI from an endpoint and query parameters.
    ///
    /// The endpoint is used as given; a `?` is only added when the encoded
    /// query is non-empty.
    pub fn build_uri(endpoint: &str, parameters: &Parameters) -> String {
        let qs = query::stringify(parameters);

        if qs.is_empty() {
            return endpoint.to_string();
        }

        format!("{}?{}", endpoint, qs)
    }

    /// Fetch a single resource
    pub async fn get_one(&self, endpoint: &str, parameters: &Parameters) -> Result<Resource> {
        let uri = Self::build_uri(endpoint, parameters);
        let envelope = self.transport.get(&uri).await?;

        Resource::from_envelope(envelope, &uri)
    }

    /// Fetch one page of a collection
    pub async fn get_many(
        &self,
        endpoint: &str,
        parameters: &Parameters,
    ) -> Result<ResourceCollection> {
        let uri = Self::build_uri(endpoint, parameters);
        let envelope = self.transport.get(&uri).await?;

        ResourceCollection::from_envelope(envelope, &uri)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::fmt;
    use std::sync::Mutex;

    #[derive(Debug)]
    pub(crate) struct StubError(pub &'static str);

    impl fmt::Display for StubError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "stub failure: {}", self.0)
        }
    }

    impl std::error::Error for StubError {}

    /// Transport answering every request with the same reply and recording URIs
    pub(crate) struct StubTransport {
        reply: std::result::Result<Value, &'static str>,
        pub(crate) requests: Mutex<Vec<String>>,
    }

    impl StubTransport {
        pub(crate) fn ok(body: Value) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(body),
                requests: Mutex::new(Vec::new()),
            })
        }

        pub(crate) fn failing(reason: &'static str) -> Arc<Self> {
            Arc::new(Self {
                reply: Err(reason),
                requests: Mutex::new(Vec::new()),
            })
        }

        pub(crate) fn uris(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for StubTransport {
        async fn get(&self, uri: &str) -> Result<Value> {
            self.requests.lock().unwrap().push(uri.to_string());
            match &self.reply {
                Ok(body) => Ok(body.clone()),
                Err(reason) => Err(StubError(*reason).into()),
            }
        }
    }

    fn params(value: Value) -> Parameters {
        match value {
            Value::Object(map) => map,
            _ => panic!("test parameters must be an object"),
        }
    }

    #[test]
    fn build_uri_without_parameters_returns_endpoint() {
        assert_eq!(
            ResourceClient::build_uri("/api/v1/entities", &Parameters::new()),
            "/api/v1/entities"
        );
        assert_eq!(ResourceClient::build_uri("", &Parameters::new()), "");
    }

    #[test]
    fn build_uri_keeps_brackets_literal() {
        let uri = ResourceClient::build_uri(
            "/api/v1/entities",
            &params(json!({ "filter": { "name": "a b" } })),
        );

        assert_eq!(uri, "/api/v1/entities?filter[name]=a b");
        assert!(!uri.contains("%5B") && !uri.contains("%5D"));
    }

    #[test]
    fn build_uri_skips_question_mark_for_empty_containers() {
        let uri = ResourceClient::build_uri("/x", &params(json!({ "filter": {} })));
        assert_eq!(uri, "/x");
    }

    #[test]
    fn get_one_unwraps_id_and_attributes() {
        let transport = StubTransport::ok(json!({
            "data": { "type": "entities", "id": "5", "attributes": { "a": 1 } }
        }));
        let client = ResourceClient::new(transport.clone());

        let resource = tokio_test::block_on(client.get_one("/x", &Parameters::new())).unwrap();

        assert_eq!(
            resource,
            Resource {
                id: Some("5".to_string()),
                attributes: Some(json!({ "a": 1 })),
            }
        );
        assert_eq!(transport.uris(), vec!["/x".to_string()]);
    }

    #[test]
    fn get_one_tolerates_missing_fields() {
        let client = ResourceClient::new(StubTransport::ok(json!({ "data": { "id": 7 } })));

        let resource = tokio_test::block_on(client.get_one("/x", &Parameters::new())).unwrap();

        assert_eq!(resource.id.as_deref(), Some("7"));
        assert!(resource.attributes.is_none());
    }

    #[test]
    fn get_one_rejects_envelope_without_data() {
        let client = ResourceClient::new(StubTransport::ok(json!({ "meta": { "count": 3 } })));

        let err = tokio_test::block_on(client.get_one("/x", &Parameters::new())).unwrap_err();

        assert!(err.to_string().contains("Malformed envelope from /x"));
    }

    #[test]
    fn get_many_passes_items_and_meta_through() {
        let transport = StubTransport::ok(json!({
            "data": [ { "id": 1 }, { "id": 2 } ],
            "meta": { "total": 2 }
        }));
        let client = ResourceClient::new(transport.clone());

        let page = tokio_test::block_on(
            client.get_many("/x", &params(json!({ "page": 1 }))),
        )
        .unwrap();

        assert_eq!(
            page,
            ResourceCollection {
                collection: Some(vec![json!({ "id": 1 }), json!({ "id": 2 })]),
                meta: Some(json!({ "total": 2 })),
            }
        );
        assert_eq!(transport.uris(), vec!["/x?page=1".to_string()]);
    }

    #[test]
    fn get_many_without_meta_or_data() {
        let client = ResourceClient::new(StubTransport::ok(json!({})));

        let page = tokio_test::block_on(client.get_many("/x", &Parameters::new())).unwrap();

        assert!(page.collection.is_none());
        assert!(page.items().is_empty());
        assert!(page.meta.is_none());
    }

    #[test]
    fn get_many_keeps_empty_data_apart_from_missing_data() {
        let client = ResourceClient::new(StubTransport::ok(json!({ "data": [] })));

        let page = tokio_test::block_on(client.get_many("/x", &Parameters::new())).unwrap();
        assert_eq!(page.collection, Some(Vec::new()));

        let client = ResourceClient::new(StubTransport::ok(json!({ "data": null })));

        let page = tokio_test::block_on(client.get_many("/x", &Parameters::new())).unwrap();
        assert_eq!(page.collection, None);
    }

    #[test]
    fn get_many_rejects_non_array_data() {
        let client = ResourceClient::new(StubTransport::ok(json!({ "data": { "id": 1 } })));

        let err = tokio_test::block_on(client.get_many("/x", &Parameters::new())).unwrap_err();

        assert!(err.to_string().contains("`data` is not an array"));
    }

    #[test]
    fn transport_errors_are_not_wrapped() {
        let client = ResourceClient::new(StubTransport::failing("connection refused"));

        let one = tokio_test::block_on(client.get_one("/x", &Parameters::new())).unwrap_err();
        let many = tokio_test::block_on(client.get_many("/x", &Parameters::new())).unwrap_err();

        for err in [one, many] {
            assert_eq!(err.chain().count(), 1);
            let stub = err.downcast_ref::<StubError>().expect("original error");
            assert_eq!(stub.0, "connection refused");
        }
    }

    #[test]
    fn repeated_calls_issue_identical_uris() {
        let transport = StubTransport::ok(json!({ "data": [] }));
        let client = ResourceClient::new(transport.clone());
        let parameters = params(json!({ "filter": { "name": "foo" }, "page": 3 }));

        for _ in 0..3 {
            tokio_test::block_on(client.get_many("/x", &parameters)).unwrap();
        }

        let uris = transport.uris();
        assert_eq!(uris.len(), 3);
        assert!(uris.iter().all(|uri| uri == &uris[0]));
    }
}
