use gate_auth::{Error, decode_payload, validate};
use gate_test_utils::token::encode_token;
use proptest::prelude::*;
use serde_json::{Map, Value};

fn leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        "\\PC{0,16}".prop_map(Value::String),
    ]
}

fn json_value() -> impl Strategy<Value = Value> {
    leaf().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[a-z_]{1,8}", inner, 0..4)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

fn json_object() -> impl Strategy<Value = Map<String, Value>> {
    prop::collection::btree_map("[a-z_]{1,12}", json_value(), 0..6)
        .prop_map(|m| m.into_iter().collect())
}

proptest! {
    #[test]
    fn decode_is_left_inverse_of_encode(payload in json_object()) {
        let token = encode_token(&Value::Object(payload.clone()));
        let decoded = decode_payload(&token).unwrap();
        prop_assert_eq!(decoded, payload);
    }

    #[test]
    fn wrong_segment_count_is_format_error(parts in prop::collection::vec("[A-Za-z0-9_-]{0,6}", 0..8)) {
        let token = parts.join(".");
        let segments = token.split('.').count();
        prop_assume!(segments != 3);
        let is_format_error = matches!(decode_payload(&token), Err(Error::Format { .. }));
        prop_assert!(is_format_error);
    }

    #[test]
    fn validate_matches_string_equality(a in "\\PC{0,24}", b in "\\PC{0,24}") {
        prop_assert_eq!(validate(&a, &b), a == b);
        prop_assert!(validate(&a, &a));
    }
}
