//! Envelope decoding for entity responses.
//!
//! Single-entity responses wrap the record in `{"<Singular>": {..}}`, batch
//! and list responses in `{"<Plural>": [..]}`. Other top-level keys
//! (`Resources`, `Url`) are ignored.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::ClientError;
use crate::models::Entity;

/// Decode a single-entity response body.
///
/// # Errors
/// [`ClientError::SchemaMismatch`] if the body is not JSON, lacks the
/// envelope key, or the record does not match `E`.
pub fn decode_single<E: Entity>(body: &str) -> Result<E, ClientError> {
    decode_envelope::<E, E>(body, E::SINGULAR)
}

/// Decode a batch or list response body.
///
/// # Errors
/// [`ClientError::SchemaMismatch`] as for [`decode_single`]; one bad record
/// fails the whole batch.
pub fn decode_plural<E: Entity>(body: &str) -> Result<Vec<E>, ClientError> {
    decode_envelope::<E, Vec<E>>(body, E::PLURAL)
}

fn decode_envelope<E: Entity, T: DeserializeOwned>(
    body: &str,
    key: &str,
) -> Result<T, ClientError> {
    decode_keyed(body, E::NAME, key)
}

/// Decode the value under `key` of a JSON object body, reporting failures
/// against `name`.
pub fn decode_keyed<T: DeserializeOwned>(
    body: &str,
    name: &'static str,
    key: &str,
) -> Result<T, ClientError> {
    let mut envelope: Map<String, Value> = serde_json::from_str(body)
        .map_err(|e| ClientError::schema(name, format!("response is not a JSON object: {e}")))?;
    let payload = envelope
        .remove(key)
        .ok_or_else(|| ClientError::schema(name, format!("missing '{key}' envelope")))?;
    serde_json::from_value(payload).map_err(|e| ClientError::schema(name, e.to_string()))
}
