pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid DRS URI: {0}")]
    InvalidUri(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("not a bundle: {0}")]
    NotABundle(String),

    #[error("is a bundle: {0}")]
    IsABundle(String),

    #[error("no access method available for {0}")]
    NoAccessMethod(String),

    #[error("unsupported access URL scheme {scheme:?}: {url}")]
    UnsupportedAccessMethod { scheme: String, url: String },

    #[error("HTTP {status} from {url}: {body}")]
    Http {
        status: u16,
        url: String,
        body: String,
    },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
