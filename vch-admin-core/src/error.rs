use thiserror::Error;

#[derive(Error, Debug)]
pub enum VchAdminError {
    #[error("Validation error for {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Malformed managed object reference: {reference}")]
    MalformedReference { reference: String },

    #[error("Resource fetch '{operation}' failed")]
    ResourceFetch {
        operation: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Not initialized: {component}")]
    NotInitialized { component: String },

    #[error("Serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Internal error: {message}")]
    Internal { message: String },
}

pub type VchResult<T> = std::result::Result<T, VchAdminError>;

impl VchAdminError {
    /// Wrap a collaborator failure as a retryable fetch error.
    pub fn fetch(operation: &str, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        VchAdminError::ResourceFetch {
            operation: operation.to_string(),
            source: Box::new(source),
        }
    }
}
