use serde::de::DeserializeOwned;
use serde_json::{Map as JsonMap, Value as JsonValue};

use crate::ClientError;

/// Attributes to send when creating a resource.
///
/// # Examples
///
/// ```
/// use dnsimple_api::Attributes;
/// use serde_json::json;
///
/// let attributes = Attributes::new()
///     .add("name", "www")
///     .add("record_type", "A")
///     .add("content", "192.0.2.1")
///     .add_if_some("ttl", None::<i64>);
///
/// assert_eq!(attributes.get("name"), Some(&json!("www")));
/// assert_eq!(attributes.get("ttl"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes {
    fields: JsonMap<String, JsonValue>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the given key-value pair.
    pub fn add<T: Into<JsonValue>>(mut self, key: &str, value: T) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }

    /// In the case that `value` is some, adds the key-value pair.
    pub fn add_if_some<T: Into<JsonValue>>(mut self, key: &str, value: Option<T>) -> Self {
        if let Some(value) = value {
            self.fields.insert(key.to_string(), value.into());
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.fields.get(key)
    }

    /// Wraps the attributes in an envelope object, `{"<key>": {...}}`.
    pub(crate) fn into_envelope(self, key: &str) -> JsonValue {
        let mut envelope = JsonMap::new();
        envelope.insert(key.to_string(), JsonValue::Object(self.fields));
        JsonValue::Object(envelope)
    }
}

impl<K: Into<String>, V: Into<JsonValue>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl From<Attributes> for JsonMap<String, JsonValue> {
    fn from(value: Attributes) -> Self {
        value.fields
    }
}

/// Takes the value out of an envelope object, `{"<key>": {...}}`.
pub(crate) fn unwrap_envelope<T: DeserializeOwned>(
    key: &'static str,
    value: JsonValue,
) -> Result<T, ClientError> {
    let inner = match value {
        JsonValue::Object(mut envelope) => envelope.remove(key),
        _ => None,
    }
    .ok_or(ClientError::MissingEnvelope(key))?;

    Ok(serde_json::from_value(inner)?)
}

/// Unwraps every element of an array of envelopes, keeping their order.
pub(crate) fn unwrap_envelopes<T: DeserializeOwned>(
    key: &'static str,
    value: JsonValue,
) -> Result<Vec<T>, ClientError> {
    match value {
        JsonValue::Array(envelopes) => envelopes
            .into_iter()
            .map(|envelope| unwrap_envelope(key, envelope))
            .collect(),
        _ => Err(ClientError::MissingEnvelope(key)),
    }
}
