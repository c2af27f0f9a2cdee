use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValibotError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Protobuf decode error: {0}")]
    Decode(#[from] prost::DecodeError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Descriptor error: {0}")]
    Descriptor(#[from] prost_reflect::DescriptorError),

    #[error("File {0} is not part of the descriptor set")]
    UnknownFile(String),

    #[error("Unsupported map key type {kind} for field {field}")]
    UnsupportedMapKey {
        field: String,
        kind:  String,
    },

    #[error("Unresolved reference {symbol} in {file}: no generated file exports it")]
    UnresolvedReference {
        symbol: String,
        file:   String,
    },

    #[error("{symbol} in {file} is both declared locally and imported from {owner}")]
    ShadowedReference {
        symbol: String,
        file:   String,
        owner:  String,
    },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}
