use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported OpenAPI version: {0}")]
    UnsupportedVersion(String),
}

/// Fatal generation failures. None of these are downgraded to warnings.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("unsupported schema construct `{construct}` in {context}")]
    UnsupportedSchemaConstruct { context: String, construct: String },

    #[error("operation {method} {path} needs an operationId to name its inline {what}")]
    MissingOperationId {
        method: String,
        path: String,
        what: String,
    },

    #[error("unresolved reference: {0}")]
    UnresolvedReference(String),

    #[error("operation {operation} declares several content types for status {status}")]
    MultipleResponseFormatsUnsupported { operation: String, status: String },

    #[error("two different models are both named `{0}`")]
    RegistryNameCollision(String),
}

impl GenerateError {
    pub fn unsupported(context: impl Into<String>, construct: impl Into<String>) -> Self {
        Self::UnsupportedSchemaConstruct {
            context: context.into(),
            construct: construct.into(),
        }
    }
}
