use std::fmt;
use std::sync::Arc;

use kinfra_client::StoreClientError;
use kinfra_types::ObjectKey;

/// store call that produced an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOp {
    Get,
    Create,
    Update,
    Delete,
}

impl fmt::Display for StoreOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match self {
            Self::Get => "get",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        };
        write!(f, "{op}")
    }
}

/// Errors raised by resource builders and fragment builders.
///
/// Once a builder records one of these it keeps returning it, so the type is
/// cheap to clone and store errors are shared behind an `Arc`.
#[derive(Debug, Clone, thiserror::Error)]
pub enum BuilderError {
    #[error("{kind} 'name' cannot be empty")]
    EmptyName { kind: &'static str },
    #[error("{kind} 'namespace' cannot be empty")]
    EmptyNamespace { kind: &'static str },
    #[error("{kind} builder cannot have a missing store client")]
    MissingClient { kind: &'static str },
    #[error("cannot define an undefined {kind}")]
    Undefined { kind: &'static str },
    #[error("{kind} {key} does not exist")]
    NotFound { kind: &'static str, key: ObjectKey },
    #[error("{kind} {key} cannot be deleted because it does not exist")]
    DeleteAbsent { kind: &'static str, key: ObjectKey },
    #[error("failed to {op} {kind}: {source}")]
    Store {
        op: StoreOp,
        kind: &'static str,
        #[source]
        source: Arc<dyn std::error::Error + Send + Sync>,
        not_found: bool,
    },
    #[error("port number cannot be 0")]
    InvalidPort,
    #[error("invalid CIDR address: {0}")]
    InvalidCidr(String),
    #[error("invalid {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },
    #[error("option failed: {0}")]
    Option(String),
}

impl BuilderError {
    pub(crate) fn store<E>(op: StoreOp, kind: &'static str, err: E) -> Self
    where
        E: StoreClientError,
    {
        let not_found = err.not_found();
        Self::Store {
            op,
            kind,
            source: Arc::new(err),
            not_found,
        }
    }

    pub(crate) fn invalid_field(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            reason: reason.into(),
        }
    }

    /// resource is absent from the store
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound { .. } | Self::DeleteAbsent { .. } => true,
            Self::Store { not_found, .. } => *not_found,
            _ => false,
        }
    }

    /// raised while checking the builder itself, before any store call
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            Self::EmptyName { .. }
                | Self::EmptyNamespace { .. }
                | Self::MissingClient { .. }
                | Self::Undefined { .. }
        )
    }
}

#[cfg(test)]
mod test {
    use kinfra_client::MemoryClientError;

    use super::*;

    #[test]
    fn test_store_error_keeps_not_found() {
        let key = ObjectKey::new("peer-one", "metallb-system");
        let err = BuilderError::store(
            StoreOp::Get,
            "BGPPeer",
            MemoryClientError::NotFound("BGPPeer", key),
        );

        assert!(err.is_not_found());
        assert!(!err.is_config());
        assert_eq!(
            err.to_string(),
            "failed to get BGPPeer: BGPPeer metallb-system/peer-one not found"
        );
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_delete_absent_message() {
        let err = BuilderError::DeleteAbsent {
            kind: "BGPPeer",
            key: ObjectKey::new("peer-one", "metallb-system"),
        };
        assert!(err.to_string().contains("does not exist"));
        assert!(err.is_not_found());
    }
}
