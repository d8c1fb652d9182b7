//! Error types for kernel-core

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Resource error: {0}")]
    Resource(#[from] kernel_resource::Error),

    #[error("Syntax error in {key}={value:?}: {message}")]
    Syntax {
        key: String,
        value: String,
        message: String,
    },

    #[error("Circular reference: {}", chain.join(" -> "))]
    CircularReference { chain: Vec<String> },

    #[error("Resource not found: {name}")]
    MissingResource { name: String },

    #[error("No implementation of {capability} matches {token:?}")]
    NoSuchImplementation { capability: String, token: String },

    #[error("Ambiguous implementation of {capability} for {token:?}: {}", candidates.join(", "))]
    AmbiguousImplementation {
        capability: String,
        token: String,
        candidates: Vec<String>,
    },

    #[error("{implementation} declares both an order and a priority")]
    ConflictingOrder { implementation: String },

    #[error("{implementation} cannot be linked to a successor")]
    NotLinkable { implementation: String },

    #[error("No assembly stage handles {kind} from {values:?}")]
    Unhandled { kind: String, values: Vec<String> },

    #[error("Invalid {kind} literal {value:?}: {message}")]
    InvalidLiteral {
        kind: String,
        value: String,
        message: String,
    },

    #[error("{kind} takes a single value, got {values:?}")]
    TooManyValues { kind: String, values: Vec<String> },

    #[error("Wildcard must be the only value for {kind}, got {values:?}")]
    WildcardNotSingle { kind: String, values: Vec<String> },

    #[error("Unknown assembly stage: {name}")]
    UnknownStage { name: String },

    #[error("Failed to construct {capability} {token:?}: {source}")]
    Construction {
        capability: String,
        token: String,
        #[source]
        source: Box<Error>,
    },

    #[error("Failed to inject {implementation}.{property}: {source}")]
    Injection {
        implementation: String,
        property: String,
        #[source]
        source: Box<Error>,
    },

    #[error("Teardown failed for {} instance(s): {}", failures.len(), failures.join("; "))]
    Teardown { failures: Vec<String> },

    #[error("{message}")]
    Plugin { message: String },
}

impl Error {
    /// Failure raised by plugin code.
    pub fn plugin(message: impl Into<String>) -> Self {
        Self::Plugin {
            message: message.into(),
        }
    }

    pub(crate) fn syntax(key: &str, value: &str, message: impl Into<String>) -> Self {
        Self::Syntax {
            key: key.to_string(),
            value: value.to_string(),
            message: message.into(),
        }
    }
}
