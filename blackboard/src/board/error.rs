use thiserror::Error;

/// Errors reported by [`Blackboard`](crate::Blackboard) operations.
///
/// A failed call never mutates the board.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// No value of this type has been written or subscribed to on the board yet.
    #[error("type '{type_name}' is not registered on the blackboard")]
    TypeNotRegistered { type_name: &'static str },

    /// The type is known to the board but the key holds no value of that type.
    #[error("key '{key}' has no value of type '{type_name}'")]
    KeyNotFound {
        key: String,
        type_name: &'static str,
    },
}

impl Error {
    pub(crate) fn type_not_registered<T: 'static>() -> Self {
        Error::TypeNotRegistered {
            type_name: std::any::type_name::<T>(),
        }
    }

    pub(crate) fn key_not_found<T: 'static>(key: &str) -> Self {
        Error::KeyNotFound {
            key: key.to_owned(),
            type_name: std::any::type_name::<T>(),
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
