use std::sync::Arc;
use std::time::Duration;

use finquote_core::{CredentialStore, Endpoints, FinquoteError, HttpTransport};

use crate::http::{DEFAULT_USER_AGENT, ReqwestTransport};
use crate::ticker::Ticker;

/// Entry point: owns the transport, the endpoints, and one credential store
/// shared by every [`Ticker`] it hands out.
#[derive(Clone)]
pub struct Finquote {
    transport: Arc<dyn HttpTransport>,
    endpoints: Endpoints,
    credentials: Arc<CredentialStore>,
}

impl core::fmt::Debug for Finquote {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Finquote")
            .field("endpoints", &self.endpoints)
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}

impl Finquote {
    /// A client for the standard provider hosts over reqwest.
    ///
    /// # Errors
    /// Returns `Transport` if the HTTP client cannot be constructed.
    pub fn new() -> Result<Self, FinquoteError> {
        Self::builder().build()
    }

    /// Start building a client.
    #[must_use]
    pub fn builder() -> FinquoteBuilder {
        FinquoteBuilder::new()
    }

    /// Requests for `symbol`.
    #[must_use]
    pub fn ticker(&self, symbol: impl Into<String>) -> Ticker {
        Ticker::new(
            symbol.into(),
            Arc::clone(&self.transport),
            self.endpoints.clone(),
            Arc::clone(&self.credentials),
        )
    }

    /// The credential store shared by this client's tickers.
    ///
    /// Call [`CredentialStore::refresh`] on it after a data call fails with an
    /// error for which [`FinquoteError::is_auth_rejection`] holds.
    #[must_use]
    pub const fn credentials(&self) -> &Arc<CredentialStore> {
        &self.credentials
    }

    /// The endpoints used for data calls.
    #[must_use]
    pub const fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }
}

/// Builder for [`Finquote`].
///
/// Defaults: standard provider endpoints, a reqwest transport with a browser
/// user agent and no request timeout, and a fresh credential store.
#[derive(Default)]
pub struct FinquoteBuilder {
    endpoints: Endpoints,
    transport: Option<Arc<dyn HttpTransport>>,
    credentials: Option<Arc<CredentialStore>>,
    user_agent: Option<String>,
    timeout: Option<Duration>,
}

impl FinquoteBuilder {
    /// A builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `endpoints` for the handshake and data calls.
    #[must_use]
    pub fn endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Send every request through `transport` instead of reqwest.
    ///
    /// User agent and timeout settings are ignored when a transport is given.
    #[must_use]
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Share an existing credential store, e.g. between two clients.
    ///
    /// The store keeps its own transport and endpoints for the handshake.
    #[must_use]
    pub fn credentials(mut self, credentials: Arc<CredentialStore>) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// User agent of the default reqwest transport.
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Per-request timeout of the default reqwest transport.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the client.
    ///
    /// # Errors
    /// `InvalidArg` if the cookie or crumb URL does not parse, `Transport` if
    /// the default HTTP client cannot be constructed.
    pub fn build(self) -> Result<Finquote, FinquoteError> {
        for (name, raw) in [
            ("cookie", &self.endpoints.cookie_url),
            ("crumb", &self.endpoints.crumb_url),
        ] {
            url::Url::parse(raw)
                .map_err(|e| FinquoteError::InvalidArg(format!("invalid {name} url {raw}: {e}")))?;
        }

        let transport: Arc<dyn HttpTransport> = match self.transport {
            Some(t) => t,
            None => Arc::new(ReqwestTransport::new(
                self.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT),
                self.timeout,
            )?),
        };
        let credentials = self.credentials.unwrap_or_else(|| {
            Arc::new(CredentialStore::new(
                Arc::clone(&transport),
                self.endpoints.clone(),
            ))
        });

        Ok(Finquote {
            transport,
            endpoints: self.endpoints,
            credentials,
        })
    }
}
