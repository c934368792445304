//! DNS records of a domain, and the operations on them.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map as JsonMap, Value as JsonValue, json};
use strum_macros::{EnumString, IntoStaticStr};
use tracing::{info, warn};

use crate::domain::{Domain, DomainRef};
use crate::payload::{unwrap_envelope, unwrap_envelopes};
use crate::{
    Attributes, Client, ClientError, ClientStateError, Collection, Destroyable, Fields, Method,
    Savable,
};

const ENVELOPE: &str = "record";

/// Possible types a DNS record can have.
///
/// Types this crate doesn't know about map to `Unknown`; the value the server
/// sent is still available through [Record::raw_record_type].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, IntoStaticStr)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum Type {
    A,
    Aaaa,
    Alias,
    Caa,
    Cname,
    Hinfo,
    Mx,
    Naptr,
    Ns,
    Ptr,
    Soa,
    Spf,
    Srv,
    Sshfp,
    Txt,
    Url,
    Unknown,
}

impl Type {
    /// Gets the string representation of the type.
    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}

impl From<Type> for JsonValue {
    fn from(value: Type) -> Self {
        JsonValue::String(value.as_str().to_string())
    }
}

/// A DNS record, as returned by the server.
///
/// `name` and `content` may be changed locally and written back with
/// [Records::save]; nothing else is ever sent back to the server.
///
/// Records only come out of [Records] operations, which always tie them to
/// their domain, so they can't be deserialized directly:
///
/// ```compile_fail
/// let record: dnsimple_api::Record = serde_json::from_str(r#"{"id": 1}"#).unwrap();
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    id: i64,
    domain: DomainRef,
    pub name: String,
    pub content: String,
    record_type: Option<String>,
    pub ttl: Option<i64>,
    pub prio: Option<i64>,
    attributes: JsonMap<String, JsonValue>,
    deleted: bool,
}

/// A record as it appears on the wire, before it is tied to its domain.
#[derive(Deserialize)]
struct RecordData {
    #[serde(deserialize_with = "deserialize_to_i64")]
    id: i64,
    #[serde(default)]
    name: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    record_type: Option<String>,
    #[serde(default, deserialize_with = "deserialize_to_option_i64")]
    ttl: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_to_option_i64")]
    prio: Option<i64>,
    #[serde(flatten)]
    attributes: JsonMap<String, JsonValue>,
}

impl RecordData {
    fn owned_by(self, domain: &Domain) -> Record {
        Record {
            id: self.id,
            domain: domain.into(),
            name: self.name,
            content: self.content,
            record_type: self.record_type,
            ttl: self.ttl,
            prio: self.prio,
            attributes: self.attributes,
            deleted: false,
        }
    }
}

impl Record {
    pub fn id(&self) -> i64 {
        self.id
    }

    /// The domain this record belongs to.
    pub fn domain(&self) -> &DomainRef {
        &self.domain
    }

    /// The record type, or `Unknown` for a type this crate doesn't model.
    pub fn record_type(&self) -> Option<Type> {
        self.record_type
            .as_deref()
            .map(|raw| raw.parse().unwrap_or(Type::Unknown))
    }

    /// The record type exactly as the server sent it.
    pub fn raw_record_type(&self) -> Option<&str> {
        self.record_type.as_deref()
    }

    pub fn attributes(&self) -> &JsonMap<String, JsonValue> {
        &self.attributes
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    fn ensure_live(&self) -> Result<(), ClientStateError> {
        if self.deleted {
            return Err(ClientStateError {
                kind: ENVELOPE,
                id: self.id,
            });
        }
        Ok(())
    }
}

impl Fields for Record {
    fn field(&self, key: &str) -> Option<JsonValue> {
        match key {
            "id" => Some(json!(self.id)),
            "domain_id" => Some(json!(self.domain.id())),
            "name" => Some(json!(self.name)),
            "content" => Some(json!(self.content)),
            "record_type" => self.record_type.as_deref().map(JsonValue::from),
            "ttl" => self.ttl.map(JsonValue::from),
            "prio" => self.prio.map(JsonValue::from),
            "deleted" => Some(json!(self.deleted)),
            _ => self.attributes.get(key).cloned(),
        }
    }
}

/// Operations on the records of a domain, obtained through [Client::records].
#[derive(Debug, Clone, Copy)]
pub struct Records<'a> {
    client: &'a Client,
}

impl<'a> Records<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Retrieves every record of `domain`, in the order the server lists them.
    pub async fn all(&self, domain: &Domain) -> Result<Collection<Record>, ClientError> {
        let url = self
            .client
            .build_url(&["domains", &domain.id().to_string(), "records"])?;

        let resp = self.client.send_json(Method::Get, url, None).await?;
        let records: Vec<RecordData> = unwrap_envelopes(ENVELOPE, resp)?;
        let records: Vec<Record> = records.into_iter().map(|r| r.owned_by(domain)).collect();

        info!(
            domain = %domain.name(),
            count = records.len(),
            "loaded records from the server"
        );
        Ok(records.into())
    }

    /// Retrieves a single record of `domain` by its id.
    ///
    /// # Errors
    ///
    /// Will return a `NotFound` error if the domain has no such record.
    pub async fn find(&self, domain: &Domain, id: i64) -> Result<Record, ClientError> {
        let url = self.client.build_url(&[
            "domains",
            &domain.id().to_string(),
            "records",
            &id.to_string(),
        ])?;

        let resp = self.client.send_json(Method::Get, url, None).await?;
        let record = unwrap_envelope::<RecordData>(ENVELOPE, resp)?.owned_by(domain);

        info!(domain = %domain.name(), id, "loaded record from the server");
        Ok(record)
    }

    /// Adds a record with the given attributes to `domain`.
    ///
    /// The server expects at least `name`, `record_type` and `content`.
    pub async fn create(
        &self,
        domain: &Domain,
        attributes: Attributes,
    ) -> Result<Record, ClientError> {
        let url = self
            .client
            .build_url(&["domains", &domain.id().to_string(), "records"])?;

        let body = attributes.into_envelope(ENVELOPE);
        let resp = self.client.send_json(Method::Post, url, Some(body)).await?;
        let record = unwrap_envelope::<RecordData>(ENVELOPE, resp)?.owned_by(domain);

        info!(domain = %domain.name(), id = record.id, "created record on the server");
        Ok(record)
    }

    /// Writes the `name` and `content` of `record` back to the server.
    ///
    /// # Errors
    ///
    /// Will return a `ClientState` error, without contacting the server, if
    /// the record was destroyed.
    pub async fn save(&self, record: &Record) -> Result<(), ClientError> {
        if let Err(err) = record.ensure_live() {
            warn!(id = record.id, "cannot save, the record has been deleted");
            return Err(err.into());
        }

        let url = self.record_url(record)?;

        let body = Attributes::new()
            .add("name", record.name.as_str())
            .add("content", record.content.as_str())
            .into_envelope(ENVELOPE);
        self.client.send(Method::Put, url, Some(body)).await?;

        info!(domain = %record.domain.name(), id = record.id, "saved record to the server");
        Ok(())
    }

    /// Removes `record` from the server and marks it as deleted.
    ///
    /// # Errors
    ///
    /// Will return a `ClientState` error if the record was already destroyed.
    pub async fn destroy(&self, record: &mut Record) -> Result<(), ClientError> {
        if let Err(err) = record.ensure_live() {
            warn!(id = record.id, "refusing to destroy a deleted record");
            return Err(err.into());
        }

        let url = self.record_url(record)?;

        self.client.send(Method::Delete, url, None).await?;
        record.deleted = true;

        info!(domain = %record.domain.name(), id = record.id, "deleted record from the server");
        Ok(())
    }

    fn record_url(&self, record: &Record) -> Result<url::Url, url::ParseError> {
        self.client.build_url(&[
            "domains",
            &record.domain.id().to_string(),
            "records",
            &record.id.to_string(),
        ])
    }
}

#[async_trait]
impl Savable for Record {
    async fn save(&self, client: &Client) -> Result<(), ClientError> {
        client.records().save(self).await
    }
}

#[async_trait]
impl Destroyable for Record {
    async fn destroy(&mut self, client: &Client) -> Result<(), ClientError> {
        client.records().destroy(self).await
    }

    fn is_deleted(&self) -> bool {
        self.deleted
    }
}

/// Helper type for deserializing a string or an i64 to an i64.
#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrI64 {
    I64(i64),
    String(String),
}

pub(crate) fn deserialize_to_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;

    let string_or_i64 = StringOrI64::deserialize(deserializer)?;
    Ok(match string_or_i64 {
        StringOrI64::I64(i) => i,
        StringOrI64::String(s) => s.parse().map_err(D::Error::custom)?,
    })
}

pub(crate) fn deserialize_to_option_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;

    let string_or_i64 = Option::<StringOrI64>::deserialize(deserializer)?;
    Ok(match string_or_i64 {
        Some(StringOrI64::I64(i)) => Some(i),
        Some(StringOrI64::String(s)) => Some(s.parse().map_err(D::Error::custom)?),
        None => None,
    })
}
