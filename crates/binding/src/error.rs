use thiserror::Error;

/// The errors that can be returned by the binding layer
#[derive(Error, Clone, Debug, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum BindingError {
    #[error("Unknown class '{0}'")]
    UnknownClass(String),
    #[error("The class '{0}' is already registered")]
    DuplicateClass(String),
    #[error("The base class '{base}' of '{class}' isn't registered")]
    UnknownBase { class: String, base: String },
    #[error("'{class}' has no attribute '{name}'")]
    UnknownAttribute { class: String, name: String },
    #[error("The attribute '{name}' of '{class}' is read-only")]
    ReadOnlyAttribute { class: String, name: String },
    #[error("'{class}' has no method '{name}'")]
    UnknownMethod { class: String, name: String },
    #[error("'{class}' has no static function '{name}'")]
    UnknownStaticFunction { class: String, name: String },
    #[error("'{0}' can't be constructed")]
    NoConstructor(String),
    #[error("Expected {expected}, but found {found}")]
    UnexpectedType { expected: String, found: String },
    #[error("Expected {expected} argument(s), but found {found}")]
    WrongArgumentCount { expected: usize, found: usize },
    #[error("Expected a holder of type '{expected}'")]
    HolderMismatch { expected: &'static str },
    #[error("The object's holder is empty")]
    NullHolder,
}

/// The Result type used by the binding layer
pub type Result<T> = std::result::Result<T, BindingError>;
