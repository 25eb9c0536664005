//! Payload decoding for function-list cells.
//!
//! A cell is tried as strict JSON first and as permissive literal notation second.
//! The first encoding that parses wins; failures never escape `decode`.

pub mod literal;

use serde_json::{Map, Value};
use tracing::trace;

pub use literal::{parse_literal, LiteralError};

/// Outcome of decoding one cell.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedPayload {
    Mapping(Map<String, Value>),
    Sequence(Vec<Value>),
    /// Parsed, but to a string, number, bool or null.
    Scalar(Value),
    Unparseable,
}

impl DecodedPayload {
    pub fn is_unparseable(&self) -> bool {
        matches!(self, DecodedPayload::Unparseable)
    }
}

impl From<Value> for DecodedPayload {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => DecodedPayload::Mapping(map),
            Value::Array(items) => DecodedPayload::Sequence(items),
            scalar => DecodedPayload::Scalar(scalar),
        }
    }
}

pub fn decode(text: &str) -> DecodedPayload {
    match serde_json::from_str::<Value>(text) {
        Ok(value) => return value.into(),
        Err(err) => trace!("strict decode failed: {}", err),
    }

    match parse_literal(text) {
        Ok(value) => value.into(),
        Err(err) => {
            trace!("literal decode failed: {}", err);
            DecodedPayload::Unparseable
        }
    }
}
