//! Authorization gate: decides whether a request may reach its handler.
//!
//! The gate sees only the raw `Authorization` header value and the
//! endpoint's requirement. Every token failure collapses into
//! [`Denial::Unauthenticated`]; only a verified non-admin asking for an
//! admin capability gets [`Denial::Forbidden`].

use std::sync::Arc;

use tracing::debug;

use super::account::Role;
use super::session_token::{Principal, SessionTokenService};
use super::Error;

const BEARER_SCHEME: &str = "bearer";

/// Capability an endpoint demands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// Public endpoint.
    None,
    /// Any verified account.
    Authenticated,
    /// A verified account holding [`Role::Admin`].
    Admin,
}

/// Reason for refusing a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    /// Missing, malformed, tampered or expired token.
    Unauthenticated,
    /// Valid token, insufficient role.
    Forbidden,
}

/// Outcome of evaluating a request against a [`Requirement`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Proceed. Identity is attached whenever one was required.
    Allow(Option<Principal>),
    /// Stop before any handler logic runs.
    Deny(Denial),
}

impl From<Denial> for Error {
    fn from(value: Denial) -> Self {
        match value {
            Denial::Unauthenticated => Self::unauthorized("authentication required"),
            Denial::Forbidden => Self::forbidden("administrator role required"),
        }
    }
}

/// Per-request decision function over a shared token service.
#[derive(Debug, Clone)]
pub struct AuthorizationGate {
    tokens: Arc<SessionTokenService>,
}

impl AuthorizationGate {
    /// Build a gate that verifies tokens with `tokens`.
    #[must_use]
    pub fn new(tokens: Arc<SessionTokenService>) -> Self {
        Self { tokens }
    }

    /// Decide whether a request carrying `authorization` satisfies
    /// `requirement`.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use backend::domain::{
    ///     AuthorizationGate, Decision, Denial, Requirement, SessionTokenService,
    ///     SigningSecret, DEFAULT_TOKEN_LIFETIME,
    /// };
    /// use mockable::DefaultClock;
    ///
    /// let tokens = SessionTokenService::new(
    ///     &SigningSecret::generate(),
    ///     DEFAULT_TOKEN_LIFETIME,
    ///     Arc::new(DefaultClock),
    /// );
    /// let gate = AuthorizationGate::new(Arc::new(tokens));
    ///
    /// assert_eq!(gate.evaluate(None, Requirement::None), Decision::Allow(None));
    /// assert_eq!(
    ///     gate.evaluate(None, Requirement::Admin),
    ///     Decision::Deny(Denial::Unauthenticated)
    /// );
    /// ```
    #[must_use]
    pub fn evaluate(&self, authorization: Option<&str>, requirement: Requirement) -> Decision {
        if requirement == Requirement::None {
            return Decision::Allow(None);
        }

        let Some(token) = authorization.and_then(bearer_token) else {
            return Decision::Deny(Denial::Unauthenticated);
        };

        let principal = match self.tokens.verify(token) {
            Ok(principal) => principal,
            Err(reason) => {
                debug!(%reason, "bearer token rejected");
                return Decision::Deny(Denial::Unauthenticated);
            }
        };

        match (requirement, principal.role) {
            (Requirement::Admin, Role::User) => Decision::Deny(Denial::Forbidden),
            (Requirement::Admin, Role::Admin) | (Requirement::Authenticated | Requirement::None, _) => {
                Decision::Allow(Some(principal))
            }
        }
    }
}

/// Extract the token from `Bearer <token>`. The scheme is case-insensitive;
/// exactly one space separates it from a non-empty token.
fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case(BEARER_SCHEME) || token.is_empty() || token.contains(' ') {
        return None;
    }
    Some(token)
}
