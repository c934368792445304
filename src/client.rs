use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use serde_json::Value as JsonValue;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use url::Url;

use crate::domain::Domains;
use crate::record::Records;
use crate::{
    ClientBuilderError, ClientError, HttpRequest, HttpResponse, Method, ReqwestTransport,
    Transport, codec,
};

const DEFAULT_ENDPOINT: &str = "https://dnsimple.com/";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Username and password used to authenticate against the API.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Value of the `Authorization` header for these credentials.
    pub fn authorization(&self) -> String {
        codec::basic_auth(&self.username, &self.password)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Builder for a [Client] that handles default values.
#[derive(Default)]
pub struct ClientBuilder {
    endpoint: Option<Url>,
    username: Option<String>,
    password: Option<String>,
    timeout: Option<Duration>,
    transport: Option<Arc<dyn Transport>>,
}

impl fmt::Debug for ClientBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientBuilder")
            .field("endpoint", &self.endpoint.as_ref().map(Url::as_str))
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .field("transport", &self.transport.as_ref().map(|_| "<custom>"))
            .finish()
    }
}

impl ClientBuilder {
    fn new() -> Self {
        Self::default()
    }

    /// Returns a builder preloaded from the `DNSIMPLE_*` environment variables.
    ///
    /// See [ClientBuilder::apply_env] for the variables that are read.
    pub fn from_env() -> Result<Self, ClientBuilderError> {
        Self::new().apply_env(|key| std::env::var(key).ok())
    }

    /// Applies the configuration found through `lookup`, leaving unset
    /// variables alone.
    ///
    /// - `DNSIMPLE_URL`: the API endpoint
    /// - `DNSIMPLE_USERNAME` and `DNSIMPLE_PASSWORD`: the credentials
    /// - `DNSIMPLE_TIMEOUT_SECS`: the request timeout, in whole seconds
    ///
    /// # Errors
    /// - `UrlParse` if `DNSIMPLE_URL` isn't a valid URL.
    /// - `InvalidTimeout` if `DNSIMPLE_TIMEOUT_SECS` isn't a whole number.
    pub fn apply_env<F>(mut self, lookup: F) -> Result<Self, ClientBuilderError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(endpoint) = lookup("DNSIMPLE_URL") {
            self.endpoint = Some(endpoint.parse()?);
        }
        if let Some(username) = lookup("DNSIMPLE_USERNAME") {
            self.username = Some(username);
        }
        if let Some(password) = lookup("DNSIMPLE_PASSWORD") {
            self.password = Some(password);
        }
        if let Some(timeout) = lookup("DNSIMPLE_TIMEOUT_SECS") {
            let secs = timeout
                .trim()
                .parse()
                .map_err(|_| ClientBuilderError::InvalidTimeout(timeout.clone()))?;
            self.timeout = Some(Duration::from_secs(secs));
        }
        Ok(self)
    }

    /// Sets the API endpoint to the one given.
    pub fn endpoint(mut self, endpoint: &Url) -> Self {
        self.endpoint = Some(endpoint.clone());
        self
    }

    /// In the case that `endpoint` is the Some variant, sets the API endpoint to it.
    pub fn endpoint_if_some(mut self, endpoint: Option<&Url>) -> Self {
        if let Some(endpoint) = endpoint {
            self.endpoint = Some(endpoint.clone());
        }
        self
    }

    /// Sets the username to the one given.
    pub fn username(mut self, username: &str) -> Self {
        self.username = Some(username.to_string());
        self
    }

    /// Sets the password to the one given.
    pub fn password(mut self, password: &str) -> Self {
        self.password = Some(password.to_string());
        self
    }

    /// Sets both halves of the credentials.
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.username = Some(credentials.username);
        self.password = Some(credentials.password);
        self
    }

    /// Sets how long a single request may take before failing with `Timeout`.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sends requests through `transport` instead of the default [ReqwestTransport].
    pub fn transport<T: Transport + 'static>(mut self, transport: T) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Builds a [Client] from the builder.
    ///
    /// In the case that no API endpoint is set, the default endpoint of
    /// `https://dnsimple.com/` is used, and requests time out after 30 seconds
    /// unless told otherwise.
    ///
    /// # Errors
    /// - `MissingField` if a required field isn't added to the builder.
    /// - `InvalidTimeout` if the timeout is zero.
    /// - `UrlParse` if the endpoint can't serve as a base for API paths.
    /// - `Transport` if the default HTTP client can't be created.
    pub fn build(self) -> Result<Client, ClientBuilderError> {
        let mut endpoint = match self.endpoint {
            Some(endpoint) => endpoint,
            None => DEFAULT_ENDPOINT.parse()?,
        };
        if endpoint.cannot_be_a_base() {
            return Err(ClientBuilderError::UrlParse(
                url::ParseError::RelativeUrlWithCannotBeABaseBase,
            ));
        }
        if !endpoint.path().ends_with('/') {
            let path = format!("{}/", endpoint.path());
            endpoint.set_path(&path);
        }

        let username = self
            .username
            .ok_or_else(|| ClientBuilderError::MissingField("username".to_string()))?;
        let password = self
            .password
            .ok_or_else(|| ClientBuilderError::MissingField("password".to_string()))?;

        let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT);
        if timeout.is_zero() {
            return Err(ClientBuilderError::InvalidTimeout(format!("{timeout:?}")));
        }

        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new()?),
        };

        Ok(Client::with_transport(
            &endpoint,
            Credentials::new(&username, &password),
            timeout,
            transport,
        ))
    }
}

struct Inner {
    endpoint: Url,
    credentials: RwLock<Credentials>,
    timeout: Duration,
    transport: Arc<dyn Transport>,
}

/// API client.
///
/// Cloning is cheap, and clones share credentials, transport and
/// cancellation token. Concurrent requests are not ordered against each
/// other, even when they touch the same resource.
#[derive(Clone)]
pub struct Client {
    inner: Arc<Inner>,
    cancel: CancellationToken,
}

impl Client {
    /// Creates a new Client that talks to `endpoint` over HTTPS.
    ///
    /// The endpoint should have a trailing slash, as per [Url]'s semantics.
    pub fn new(endpoint: &Url, credentials: Credentials) -> Self {
        Self::with_transport(
            endpoint,
            credentials,
            DEFAULT_TIMEOUT,
            Arc::new(ReqwestTransport::default()),
        )
    }

    fn with_transport(
        endpoint: &Url,
        credentials: Credentials,
        timeout: Duration,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                endpoint: endpoint.clone(),
                credentials: RwLock::new(credentials),
                timeout,
                transport,
            }),
            cancel: CancellationToken::new(),
        }
    }

    /// Returns a builder for a Client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Operations on domains.
    pub fn domains(&self) -> Domains<'_> {
        Domains::new(self)
    }

    /// Operations on DNS records.
    pub fn records(&self) -> Records<'_> {
        Records::new(self)
    }

    pub fn endpoint(&self) -> &Url {
        &self.inner.endpoint
    }

    pub fn timeout(&self) -> Duration {
        self.inner.timeout
    }

    pub fn credentials(&self) -> Credentials {
        self.inner
            .credentials
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replaces the credentials for every request issued from now on.
    ///
    /// Requests already in flight keep the credentials they started with.
    /// When several callers race, the last write wins.
    pub fn set_credentials(&self, credentials: Credentials) {
        *self
            .inner
            .credentials
            .write()
            .unwrap_or_else(PoisonError::into_inner) = credentials;
    }

    /// Returns a handle sharing this client's state whose requests fail with
    /// `Cancelled` once `token` is cancelled.
    pub fn with_cancellation(&self, token: CancellationToken) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            cancel: token,
        }
    }

    /// The token that cancels requests issued through this handle.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Creates a [Url] from the endpoint and the path sections, adding the
    /// `.json` extension to the last one.
    ///
    /// Each section is escaped as a single path segment, so `/`, `?`, `#` and
    /// `..` in an id or name can't reach another resource.
    pub(crate) fn build_url(&self, path: &[&str]) -> Result<Url, url::ParseError> {
        let mut url = self.inner.endpoint.clone();
        let Some((last, parents)) = path.split_last() else {
            return Ok(url);
        };

        url.path_segments_mut()
            .map_err(|()| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .extend(parents)
            .push(&format!("{last}.json"));
        Ok(url)
    }

    /// Sends a request and fails on any non-success status.
    pub(crate) async fn send(
        &self,
        method: Method,
        url: Url,
        body: Option<JsonValue>,
    ) -> Result<HttpResponse, ClientError> {
        debug!(%method, %url, "sending request");

        let request = HttpRequest {
            method,
            url,
            authorization: self.credentials().authorization(),
            body,
        };

        let timeout = self.inner.timeout;
        let resp = tokio::select! {
            biased;
            () = self.cancel.cancelled() => return Err(ClientError::Cancelled),
            resp = tokio::time::timeout(timeout, self.inner.transport.send(request)) => {
                resp.map_err(|_| ClientError::Timeout(timeout))??
            }
        };

        if !resp.status.is_success() {
            let err = ClientError::from_response(&resp);
            warn!(%method, status = %resp.status, "request failed: {err}");
            return Err(err);
        }

        Ok(resp)
    }

    /// Sends a request and parses the response body as JSON.
    pub(crate) async fn send_json(
        &self,
        method: Method,
        url: Url,
        body: Option<JsonValue>,
    ) -> Result<JsonValue, ClientError> {
        let resp = self.send(method, url, body).await?;
        Ok(serde_json::from_str(&resp.body)?)
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("endpoint", &self.inner.endpoint.as_str())
            .field("timeout", &self.inner.timeout)
            .field("cancelled", &self.cancel.is_cancelled())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests;
