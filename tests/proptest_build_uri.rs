//! Property-based tests using proptest
//!
//! These tests verify URI construction and query string encoding over
//! randomized endpoints and parameter mappings.

use auditbase_backoffice::backoffice::query::stringify;
use auditbase_backoffice::{Parameters, ResourceClient};
use proptest::prelude::*;
use serde_json::{json, Value};

/// Endpoint paths like `/api/v1/entities/abc`
fn arb_endpoint() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-z0-9-]{1,12}", 1..5).prop_map(|parts| format!("/{}", parts.join("/")))
}

/// Scalar parameter values, including reserved characters that must stay literal
fn arb_scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        "[a-zA-Z0-9 :/,.\\[\\]-]{0,16}".prop_map(Value::String),
        any::<i32>().prop_map(Value::from),
        any::<bool>().prop_map(Value::Bool),
    ]
}

/// Parameter values nested up to two levels
fn arb_value() -> impl Strategy<Value = Value> {
    arb_scalar().prop_recursive(2, 16, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 1..4).prop_map(Value::Array),
            prop::collection::btree_map("[a-zA-Z]{1,8}", inner, 1..4)
                .prop_map(|map| Value::Object(map.into_iter().collect())),
        ]
    })
}

fn arb_parameters() -> impl Strategy<Value = Parameters> {
    prop::collection::btree_map("[a-zA-Z]{1,8}", arb_value(), 1..5)
        .prop_map(|map| map.into_iter().collect())
}

proptest! {
    /// Empty parameters never add a `?`
    #[test]
    fn empty_parameters_return_endpoint(endpoint in arb_endpoint()) {
        prop_assert_eq!(ResourceClient::build_uri(&endpoint, &Parameters::new()), endpoint);
    }

    /// Non-empty parameters append exactly one `?` and the serialized query
    #[test]
    fn parameters_are_appended_after_question_mark(
        endpoint in arb_endpoint(),
        parameters in arb_parameters()
    ) {
        let uri = ResourceClient::build_uri(&endpoint, &parameters);
        prop_assert_eq!(uri, format!("{}?{}", endpoint, stringify(&parameters)));
    }

    /// No percent-escapes are ever introduced
    #[test]
    fn nothing_is_percent_encoded(
        endpoint in arb_endpoint(),
        parameters in arb_parameters()
    ) {
        let uri = ResourceClient::build_uri(&endpoint, &parameters);
        prop_assert!(!uri.contains('%'));
    }

    /// Nested filters keep literal brackets
    #[test]
    fn nested_filters_keep_brackets(
        key in "[a-zA-Z]{1,10}",
        value in "[a-z0-9 ]{1,10}"
    ) {
        let mut filter = serde_json::Map::new();
        filter.insert(key.clone(), json!(value.clone()));
        let mut parameters = Parameters::new();
        parameters.insert("filter".to_string(), Value::Object(filter));

        let uri = ResourceClient::build_uri("/api/v1/entities", &parameters);
        prop_assert_eq!(uri, format!("/api/v1/entities?filter[{}]={}", key, value));
    }

    /// Building the same request twice yields the same URI
    #[test]
    fn build_uri_is_deterministic(
        endpoint in arb_endpoint(),
        parameters in arb_parameters()
    ) {
        let first = ResourceClient::build_uri(&endpoint, &parameters);
        let second = ResourceClient::build_uri(&endpoint, &parameters.clone());
        prop_assert_eq!(first, second);
    }

    /// Every scalar leaf produces exactly one key=value pair
    #[test]
    fn one_pair_per_leaf(parameters in arb_parameters()) {
        fn leaves(value: &Value) -> usize {
            match value {
                Value::Array(items) => items.iter().map(leaves).sum(),
                Value::Object(map) => map.values().map(leaves).sum(),
                _ => 1,
            }
        }

        let expected: usize = parameters.values().map(leaves).sum();
        let query = stringify(&parameters);
        let pairs = query.split('&').filter(|pair| !pair.is_empty()).count();
        prop_assert_eq!(pairs, expected);
    }
}
