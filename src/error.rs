//! Error types for the service registry

use thiserror::Error;

/// Errors that can occur while registering or resolving services
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DiError {
    /// Capability type has never been registered, so it has no default name
    #[error("Interface {type_name} not registered, cannot resolve")]
    NoAlias { type_name: &'static str },

    /// No factory is installed under the requested registration name
    #[error("No registration named '{name}', cannot resolve")]
    MissingProvider { name: String },

    /// Explicit constructor signature does not exist on the concrete type
    #[error("Attempt to initialize {type_name}:{name} with non-existent constructor ({signature})")]
    NoMatchingConstructor {
        type_name: &'static str,
        name: String,
        signature: String,
    },

    /// Concrete type declares no constructors at all
    #[error("Cannot construct {type_name}: no constructors declared")]
    NoConstructors { type_name: &'static str },

    /// A value was not of the requested type
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// Build closure asked for a parameter its constructor does not declare
    #[error("Constructor of {type_name} has no parameter named '{parameter}'")]
    MissingArgument {
        type_name: &'static str,
        parameter: String,
    },

    /// Fixed argument list does not fit the constructor signature
    #[error("Constructor of {type_name} takes {expected} arguments, {found} supplied")]
    ArgumentCount {
        type_name: &'static str,
        expected: usize,
        found: usize,
    },

    /// Constructor reported a failure of its own
    #[error("Failed to create service {type_name}: {reason}")]
    CreationFailed {
        type_name: &'static str,
        reason: String,
    },
}

impl DiError {
    /// Create a NoAlias error for a capability type
    #[inline]
    pub fn no_alias<T: ?Sized + 'static>() -> Self {
        Self::NoAlias {
            type_name: std::any::type_name::<T>(),
        }
    }

    /// Create a MissingProvider error for a registration name
    #[inline]
    pub fn missing_provider(name: impl Into<String>) -> Self {
        Self::MissingProvider { name: name.into() }
    }

    /// Create a CreationFailed error
    #[inline]
    pub fn creation_failed<T: ?Sized + 'static>(reason: impl Into<String>) -> Self {
        Self::CreationFailed {
            type_name: std::any::type_name::<T>(),
            reason: reason.into(),
        }
    }

    /// True for every flavour of "registration missing": no alias for the
    /// type, no provider for the name, or no constructor for a signature.
    #[inline]
    pub fn is_registration_missing(&self) -> bool {
        matches!(
            self,
            Self::NoAlias { .. } | Self::MissingProvider { .. } | Self::NoMatchingConstructor { .. }
        )
    }
}

/// Result type alias for registry operations
pub type Result<T> = std::result::Result<T, DiError>;

#[cfg(test)]
mod tests {
    use super::*;

    trait Storage {}

    #[test]
    fn test_registration_missing_family() {
        assert!(DiError::no_alias::<dyn Storage>().is_registration_missing());
        assert!(DiError::missing_provider("five").is_registration_missing());
        assert!(
            DiError::NoMatchingConstructor {
                type_name: "Widget",
                name: "widget".into(),
                signature: "i32".into(),
            }
            .is_registration_missing()
        );
        assert!(!DiError::creation_failed::<u8>("boom").is_registration_missing());
    }

    #[test]
    fn test_messages_carry_type_or_name() {
        let err = DiError::no_alias::<dyn Storage>();
        assert!(err.to_string().contains("Storage"));

        let err = DiError::missing_provider("six");
        assert_eq!(err.to_string(), "No registration named 'six', cannot resolve");
    }
}
