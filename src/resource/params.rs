//! List parameters
//!
//! Builder for the query conventions the back office list endpoints read:
//! `filter[<key>]=<value>`, `page` and `perPage`.

use crate::backoffice::query::Parameters;
use anyhow::Result;
use serde_json::{Map, Value};

/// Filters and pagination for a `many` call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListParams {
    filters: Map<String, Value>,
    page: Option<u32>,
    per_page: Option<u32>,
}

impl ListParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `filter[key]=value`; a repeated key keeps the last value
    pub fn filter(mut self, key: &str, value: &str) -> Self {
        self.filters
            .insert(key.to_string(), Value::String(value.to_string()));
        self
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn per_page(mut self, per_page: u32) -> Self {
        self.per_page = Some(per_page);
        self
    }

    /// Parse a `key=value` filter argument
    pub fn parse_filter(arg: &str) -> Result<(String, String)> {
        let Some((key, value)) = arg.split_once('=') else {
            anyhow::bail!("Invalid filter '{}', expected key=value", arg);
        };
        let key = key.trim();
        if key.is_empty() {
            anyhow::bail!("Invalid filter '{}', key is empty", arg);
        }

        Ok((key.to_string(), value.to_string()))
    }

    pub fn into_parameters(self) -> Parameters {
        let mut parameters = Parameters::new();

        if !self.filters.is_empty() {
            parameters.insert("filter".to_string(), Value::Object(self.filters));
        }
        if let Some(page) = self.page {
            parameters.insert("page".to_string(), Value::from(page));
        }
        if let Some(per_page) = self.per_page {
            parameters.insert("perPage".to_string(), Value::from(per_page));
        }

        parameters
    }
}
