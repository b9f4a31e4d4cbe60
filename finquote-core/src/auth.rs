//! Session credential handshake: a cookie, then a crumb derived from it.

use std::sync::{Arc, PoisonError, RwLock};

use tokio::sync::Mutex;

use crate::transport::{HttpRequest, HttpTransport};
use crate::{AuthStage, Endpoints, FinquoteError};

/// A cookie and the crumb derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    /// Value for the `Cookie` request header (`name=value`).
    pub cookie: String,
    /// Value for the `crumb` query parameter.
    pub crumb: String,
}

/// How far the handshake has progressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialState {
    /// Nothing stored yet.
    Empty,
    /// A cookie is stored but no crumb.
    CookieOnly,
    /// Both values are stored.
    Ready,
}

#[derive(Debug, Default)]
struct Slots {
    cookie: Option<String>,
    crumb: Option<String>,
}

/// Caches the cookie/crumb pair and serializes its refresh.
///
/// Reads never wait on the network. A refresh holds an async mutex across both
/// of its requests, so concurrent refreshes run one after another and their
/// requests never interleave. A refresh replaces the cookie and crumb together
/// or not at all, so a failed refresh leaves the previous pair in place. Only
/// the very first cookie is stored on its own, before its crumb is known.
///
/// There is no background refresh. A crumb the provider starts rejecting stays
/// cached until the caller invokes [`CredentialStore::refresh`].
pub struct CredentialStore {
    transport: Arc<dyn HttpTransport>,
    endpoints: Endpoints,
    cell: RwLock<Slots>,
    refresh_lock: Mutex<()>,
}

impl core::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CredentialStore")
            .field("endpoints", &self.endpoints)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl CredentialStore {
    /// Create an empty store that talks to `endpoints` through `transport`.
    pub fn new(transport: Arc<dyn HttpTransport>, endpoints: Endpoints) -> Self {
        Self {
            transport,
            endpoints,
            cell: RwLock::new(Slots::default()),
            refresh_lock: Mutex::new(()),
        }
    }

    /// The endpoints this store authenticates against.
    #[must_use]
    pub const fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Current handshake state.
    #[must_use]
    pub fn state(&self) -> CredentialState {
        let slots = self.cell.read().unwrap_or_else(PoisonError::into_inner);
        match (&slots.cookie, &slots.crumb) {
            (Some(_), Some(_)) => CredentialState::Ready,
            (Some(_), None) => CredentialState::CookieOnly,
            _ => CredentialState::Empty,
        }
    }

    /// The stored pair, if both values are present. Never touches the network.
    #[must_use]
    pub fn snapshot(&self) -> Option<Credential> {
        let slots = self.cell.read().unwrap_or_else(PoisonError::into_inner);
        Some(Credential {
            cookie: slots.cookie.clone()?,
            crumb: slots.crumb.clone()?,
        })
    }

    fn stored_cookie(&self) -> Option<String> {
        self.cell
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .cookie
            .clone()
    }

    fn stored_crumb(&self) -> Option<String> {
        self.cell
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .crumb
            .clone()
    }

    /// The cached cookie, refreshing first when none is stored.
    ///
    /// # Errors
    /// Returns the refresh error when the cookie is still absent afterwards.
    pub async fn cookie(&self) -> Result<String, FinquoteError> {
        self.ensure(Self::stored_cookie, AuthStage::Cookie).await
    }

    /// The cached crumb, refreshing first when none is stored.
    ///
    /// # Errors
    /// Returns the refresh error when the crumb is still absent afterwards.
    pub async fn crumb(&self) -> Result<String, FinquoteError> {
        self.ensure(Self::stored_crumb, AuthStage::Crumb).await
    }

    /// Both values, refreshing first when either is missing.
    ///
    /// # Errors
    /// Returns the refresh error when the pair is still incomplete afterwards.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "finquote::auth::credential", skip(self))
    )]
    pub async fn credential(&self) -> Result<Credential, FinquoteError> {
        self.ensure(Self::snapshot, AuthStage::Crumb).await
    }

    async fn ensure<T>(
        &self,
        read: impl Fn(&Self) -> Option<T>,
        stage: AuthStage,
    ) -> Result<T, FinquoteError> {
        if let Some(v) = read(self) {
            return Ok(v);
        }
        let _guard = self.refresh_lock.lock().await;
        // A refresh that finished while we waited may already have filled it.
        if let Some(v) = read(self) {
            return Ok(v);
        }
        let outcome = self.run_refresh().await;
        match (read(self), outcome) {
            (Some(v), _) => Ok(v),
            (None, Err(e)) => Err(e),
            (None, Ok(())) => Err(FinquoteError::auth(stage, "value absent after refresh")),
        }
    }

    /// Re-acquire both values unconditionally.
    ///
    /// Concurrent callers queue on the store; each runs its own full
    /// cookie-then-crumb sequence.
    ///
    /// # Errors
    /// `Auth` when a step yields no value, `Transport` when a request fails.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "finquote::auth::refresh", skip(self))
    )]
    pub async fn refresh(&self) -> Result<(), FinquoteError> {
        let _guard = self.refresh_lock.lock().await;
        self.run_refresh().await
    }

    /// Re-acquire only the crumb, reusing the stored cookie.
    ///
    /// # Errors
    /// `Auth` with [`AuthStage::MissingCookie`] when no cookie was ever stored;
    /// otherwise as for [`CredentialStore::refresh`].
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "finquote::auth::refresh_crumb", skip(self))
    )]
    pub async fn refresh_crumb(&self) -> Result<(), FinquoteError> {
        let _guard = self.refresh_lock.lock().await;
        self.crumb_step().await
    }

    async fn run_refresh(&self) -> Result<(), FinquoteError> {
        #[cfg(feature = "tracing")]
        tracing::debug!(cookie_url = %self.endpoints.cookie_url, "refreshing credential");

        let result = self.run_steps().await;

        #[cfg(feature = "tracing")]
        match &result {
            Ok(()) => tracing::debug!("credential refreshed"),
            Err(e) => tracing::warn!(error = %e, "credential refresh failed"),
        }

        result
    }

    async fn run_steps(&self) -> Result<(), FinquoteError> {
        let cookie = self.fetch_cookie().await?;
        if self.stored_cookie().is_none() {
            self.cell
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .cookie = Some(cookie);
            return self.crumb_step().await;
        }
        // A stored cookie is only replaced together with its crumb.
        let crumb = self.fetch_crumb(&cookie).await?;
        let mut slots = self.cell.write().unwrap_or_else(PoisonError::into_inner);
        slots.cookie = Some(cookie);
        slots.crumb = Some(crumb);
        Ok(())
    }

    async fn crumb_step(&self) -> Result<(), FinquoteError> {
        let Some(cookie) = self.stored_cookie() else {
            return Err(FinquoteError::auth(
                AuthStage::MissingCookie,
                "no cookie stored before crumb request",
            ));
        };
        let crumb = self.fetch_crumb(&cookie).await?;
        self.cell
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .crumb = Some(crumb);
        Ok(())
    }

    async fn fetch_cookie(&self) -> Result<String, FinquoteError> {
        // The cookie endpoint answers 404 while still setting the cookie, so
        // the status is not consulted.
        let resp = self
            .transport
            .get(HttpRequest::get(&self.endpoints.cookie_url))
            .await?;
        let Some(header) = resp.header("set-cookie") else {
            return Err(FinquoteError::auth(
                AuthStage::Cookie,
                format!("no Set-Cookie header (status {})", resp.status),
            ));
        };
        session_pair(header)
            .map(str::to_string)
            .ok_or_else(|| FinquoteError::auth(AuthStage::Cookie, "empty Set-Cookie header"))
    }

    async fn fetch_crumb(&self, cookie: &str) -> Result<String, FinquoteError> {
        let resp = self
            .transport
            .get(HttpRequest::get(&self.endpoints.crumb_url).header("Cookie", cookie))
            .await?;
        if !resp.is_success() {
            return Err(FinquoteError::auth(
                AuthStage::Crumb,
                format!("crumb endpoint answered {}", resp.status),
            ));
        }
        let crumb = resp.body.trim();
        if crumb.is_empty() {
            return Err(FinquoteError::auth(AuthStage::Crumb, "empty crumb body"));
        }
        Ok(crumb.to_string())
    }
}

/// The leading `name=value` of a `Set-Cookie` value, without attributes.
fn session_pair(set_cookie: &str) -> Option<&str> {
    let pair = set_cookie.split(';').next().unwrap_or_default().trim();
    (!pair.is_empty()).then_some(pair)
}
