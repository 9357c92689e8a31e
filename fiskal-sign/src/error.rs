use thiserror::Error;

#[derive(Error, Debug)]
pub enum SignError {
    #[error("Signing configuration missing: {0}")]
    ConfigMissing(String),
    #[error("Signing provider '{0}' is declared but not implemented")]
    NotImplemented(String),
    #[error("Signing provider returned {status}: {body}")]
    ProviderUnavailable { status: u16, body: String },
    #[error("Signing provider unreachable: {0}")]
    Network(String),
    #[error("Invalid key material: {0}")]
    InvalidKey(String),
    #[error("Invalid certificate: {0}")]
    InvalidCertificate(String),
    #[error("Signature operation failed: {0}")]
    Crypto(String),
}

pub type Result<T> = std::result::Result<T, SignError>;
