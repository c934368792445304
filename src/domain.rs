//! Domains hosted on the account, and the operations on them.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map as JsonMap, Value as JsonValue, json};
use tracing::{info, warn};

use crate::payload::{unwrap_envelope, unwrap_envelopes};
use crate::record::{Record, deserialize_to_i64};
use crate::{
    Attributes, Client, ClientError, ClientStateError, Collection, Destroyable, Fields, Method,
};

const ENVELOPE: &str = "domain";

/// A domain, as returned by the server.
///
/// Only the server creates domains; the client marks one as deleted once it
/// has been destroyed, and never clears that mark.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Domain {
    #[serde(deserialize_with = "deserialize_to_i64")]
    id: i64,
    name: String,
    /// Every other field the server sent, untouched.
    #[serde(flatten)]
    attributes: JsonMap<String, JsonValue>,
    #[serde(skip)]
    deleted: bool,
}

impl Domain {
    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attributes(&self) -> &JsonMap<String, JsonValue> {
        &self.attributes
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted
    }
}

impl Fields for Domain {
    fn field(&self, key: &str) -> Option<JsonValue> {
        match key {
            "id" => Some(json!(self.id)),
            "name" => Some(json!(self.name)),
            "deleted" => Some(json!(self.deleted)),
            _ => self.attributes.get(key).cloned(),
        }
    }
}

/// The domain a [Record] belongs to.
///
/// Holds just enough to address the domain; it doesn't keep the [Domain]
/// itself alive or track its state.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DomainRef {
    id: i64,
    name: String,
}

impl DomainRef {
    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl From<&Domain> for DomainRef {
    fn from(value: &Domain) -> Self {
        Self {
            id: value.id,
            name: value.name.clone(),
        }
    }
}

impl PartialEq<Domain> for DomainRef {
    fn eq(&self, other: &Domain) -> bool {
        self.id == other.id
    }
}

/// Operations on the domains of the account, obtained through [Client::domains].
#[derive(Debug, Clone, Copy)]
pub struct Domains<'a> {
    client: &'a Client,
}

impl<'a> Domains<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Retrieves every domain on the account, in the order the server lists them.
    pub async fn all(&self) -> Result<Collection<Domain>, ClientError> {
        let url = self.client.build_url(&["domains"])?;

        let resp = self.client.send_json(Method::Get, url, None).await?;
        let domains: Vec<Domain> = unwrap_envelopes(ENVELOPE, resp)?;

        info!(count = domains.len(), "loaded domains from the server");
        Ok(domains.into())
    }

    /// Retrieves a single domain by its id or its name.
    ///
    /// # Errors
    ///
    /// Will return a `NotFound` error if the server doesn't know the domain.
    pub async fn find(&self, id_or_name: &str) -> Result<Domain, ClientError> {
        let url = self.client.build_url(&["domains", id_or_name])?;

        let resp = self.client.send_json(Method::Get, url, None).await?;
        let domain: Domain = unwrap_envelope(ENVELOPE, resp)?;

        info!(id = domain.id, name = %domain.name, "loaded domain from the server");
        Ok(domain)
    }

    /// Registers a new domain with the given attributes, usually just `name`.
    pub async fn create(&self, attributes: Attributes) -> Result<Domain, ClientError> {
        let url = self.client.build_url(&["domains"])?;

        let body = attributes.into_envelope(ENVELOPE);
        let resp = self.client.send_json(Method::Post, url, Some(body)).await?;
        let domain: Domain = unwrap_envelope(ENVELOPE, resp)?;

        info!(id = domain.id, name = %domain.name, "created domain on the server");
        Ok(domain)
    }

    /// Retrieves the records of `domain`.
    pub async fn records(&self, domain: &Domain) -> Result<Collection<Record>, ClientError> {
        self.client.records().all(domain).await
    }

    /// Removes `domain` from the server and marks it as deleted.
    ///
    /// # Errors
    ///
    /// Will return a `ClientState` error if the domain was already destroyed.
    pub async fn destroy(&self, domain: &mut Domain) -> Result<(), ClientError> {
        if domain.deleted {
            warn!(id = domain.id, "refusing to destroy a deleted domain");
            return Err(ClientStateError {
                kind: ENVELOPE,
                id: domain.id,
            }
            .into());
        }

        let url = self.client.build_url(&["domains", &domain.id.to_string()])?;

        self.client.send(Method::Delete, url, None).await?;
        domain.deleted = true;

        info!(id = domain.id, name = %domain.name, "deleted domain from the server");
        Ok(())
    }
}

#[async_trait]
impl Destroyable for Domain {
    async fn destroy(&mut self, client: &Client) -> Result<(), ClientError> {
        client.domains().destroy(self).await
    }

    fn is_deleted(&self) -> bool {
        self.deleted
    }
}
