#![forbid(unsafe_code)]

//! Top-level error type.
//!
//! Every fallible toolshelf operation returns one of the per-module errors;
//! [`Error`] wraps them so applications can use `?` across modules and
//! still match on the source.
//!
//! Drag rejections, duplicate names and clicks on unknown actions are not
//! errors: they resolve to typed outcomes and keep the prior state.

use std::fmt;

use toolshelf_widgets::{ArrangementError, ConfigError, RegistryError, StorageError};

/// Top-level error type for toolshelf hosts.
#[derive(Debug)]
pub enum Error {
    /// Registering an action failed.
    Registry(RegistryError),
    /// A stored arrangement was rejected or could not be written.
    Arrangement(ArrangementError),
    /// Loading or validating toolbar options failed.
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Registry(err) => write!(f, "{err}"),
            Self::Arrangement(err) => write!(f, "{err}"),
            Self::Config(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Registry(err) => Some(err),
            Self::Arrangement(err) => Some(err),
            Self::Config(err) => Some(err),
        }
    }
}

impl From<RegistryError> for Error {
    fn from(err: RegistryError) -> Self {
        Self::Registry(err)
    }
}

impl From<ArrangementError> for Error {
    fn from(err: ArrangementError) -> Self {
        Self::Arrangement(err)
    }
}

impl From<StorageError> for Error {
    fn from(err: StorageError) -> Self {
        Self::Arrangement(ArrangementError::Storage(err))
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

/// Standard result type for toolshelf APIs.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn wraps_and_chains_sources() {
        let err: Error = RegistryError::DuplicateAction {
            name: "save".into(),
        }
        .into();
        assert_eq!(err.to_string(), "action `save` is already registered");
        assert!(err.source().is_some());

        let err: Error = StorageError::MissingDirectory("/nowhere".into()).into();
        assert!(matches!(
            err,
            Error::Arrangement(ArrangementError::Storage(_))
        ));
        let storage = err.source().and_then(|e| e.source());
        assert!(storage.is_some());
    }

    #[test]
    fn config_validation_surfaces_messages() {
        let err: Error = ConfigError::Validation(vec!["max_columns must be <= 256".into()]).into();
        assert_eq!(
            err.to_string(),
            "validation errors: max_columns must be <= 256"
        );
    }
}
