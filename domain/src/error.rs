//! Error types for the `domain` layer.
use entity_api::error::{EntityApiErrorKind, Error as EntityApiError};
use identity_auth::error::{
    ConfigErrorKind as IdentityConfigErrorKind, Error as IdentityAuthError,
    ErrorKind as IdentityAuthErrorKind,
};
use std::error::Error as StdError;
use std::fmt;

/// Top-level domain error type.
/// Errors in the Domain layer are modeled as a tree structure
/// with `domain::error::Error` as the root type holding a tree of `error_kind`
/// enums that represent the kinds of errors that can occur in the domain layer or
/// in lower layers. The `source` field is used to hold the original error that caused
/// the domain error. The intent is to translate errors between layers while maintaining
/// layer boundaries. Ex. `domain` is dependent on `entity_api` and `identity-auth`, and
/// callers of `domain` should not depend, directly, on either. Each layer is free to define
/// its own error kinds to whatever richness is needed at that layer. Callers use
/// [`Error::category`] to decide how to answer the end user.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: DomainErrorKind,
}

/// Enum representing the major categories of errors that can occur in the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum DomainErrorKind {
    Internal(InternalErrorKind),
    External(ExternalErrorKind),
}

/// Enum representing the various kinds of internal errors that can occur in the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum InternalErrorKind {
    Entity(EntityErrorKind),
    /// Input rejected before any side effect took place.
    Validation { parameter: String, message: String },
    Config,
}

/// Enum representing the various kinds of entity errors that can bubble up from the "Entity" layer (`entity_api` and `entity`).
/// These errors are translated from the `entity_api` layer to the `domain` layer and reduced to a subset of error kinds
/// that are relevant to the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum EntityErrorKind {
    NotFound,
    Invalid,
    Conflict,
    DbTransaction,
}

/// Enum representing the various kinds of external errors that can occur in the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum ExternalErrorKind {
    /// The identity provider could not be reached.
    Network,
    /// The identity provider answered, but refused or returned something unusable.
    Upstream,
}

/// Coarse classification of a domain error, for deciding how to respond to the end user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Bad referrer or malformed state.
    Validation,
    /// The state has no live record: never issued, already consumed, or lost a race.
    NotFound,
    /// The identity provider failed or refused.
    Upstream,
    /// The state store failed for reasons unrelated to the request's validity.
    Persistence,
    /// The deployment is misconfigured.
    Configuration,
}

impl Error {
    pub fn validation(parameter: &str, message: &str) -> Self {
        Error {
            source: None,
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Validation {
                parameter: parameter.to_string(),
                message: message.to_string(),
            }),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match &self.error_kind {
            DomainErrorKind::Internal(InternalErrorKind::Validation { .. })
            | DomainErrorKind::Internal(InternalErrorKind::Entity(EntityErrorKind::Invalid)) => {
                ErrorCategory::Validation
            }
            DomainErrorKind::Internal(InternalErrorKind::Entity(EntityErrorKind::NotFound)) => {
                ErrorCategory::NotFound
            }
            DomainErrorKind::Internal(InternalErrorKind::Entity(_)) => ErrorCategory::Persistence,
            DomainErrorKind::Internal(InternalErrorKind::Config) => ErrorCategory::Configuration,
            DomainErrorKind::External(_) => ErrorCategory::Upstream,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.error_kind {
            DomainErrorKind::Internal(InternalErrorKind::Validation { parameter, message }) => {
                write!(f, "Domain Error: {parameter}: {message}")
            }
            _ => write!(f, "Domain Error: {self:?}"),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

// This is where we translate errors from the `entity_api` layer to the `domain` layer.
impl From<EntityApiError> for Error {
    fn from(err: EntityApiError) -> Self {
        let entity_error_kind = match err.error_kind {
            EntityApiErrorKind::RecordNotFound => EntityErrorKind::NotFound,
            EntityApiErrorKind::InvalidQueryTerm => EntityErrorKind::Invalid,
            EntityApiErrorKind::RecordAlreadyExists => EntityErrorKind::Conflict,
            EntityApiErrorKind::SystemError => EntityErrorKind::DbTransaction,
        };

        Error {
            source: Some(Box::new(err)),
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Entity(entity_error_kind)),
        }
    }
}

impl From<IdentityAuthError> for Error {
    fn from(err: IdentityAuthError) -> Self {
        let error_kind = match &err.error_kind {
            IdentityAuthErrorKind::Http(_) => DomainErrorKind::External(ExternalErrorKind::Network),
            IdentityAuthErrorKind::OAuth(_) => {
                DomainErrorKind::External(ExternalErrorKind::Upstream)
            }
            IdentityAuthErrorKind::Config(
                IdentityConfigErrorKind::InvalidUrl | IdentityConfigErrorKind::UnknownProvider,
            ) => DomainErrorKind::Internal(InternalErrorKind::Config),
        };
        Error {
            source: Some(Box::new(err)),
            error_kind,
        }
    }
}

// A whitelist pattern that does not compile is a deployment problem, not a bad request.
impl From<regex::Error> for Error {
    fn from(err: regex::Error) -> Self {
        Error {
            source: Some(Box::new(err)),
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Config),
        }
    }
}
