use thiserror::Error;

pub type Result<T> = std::result::Result<T, RetitleError>;

#[derive(Debug, Error)]
pub enum RetitleError {
    #[error("catalog client is not configured: {0}")]
    NotConfigured(&'static str),

    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("catalog returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("could not decode catalog response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("listing failed at offset {offset}: {source}")]
    Enumeration {
        offset: usize,
        #[source]
        source: Box<RetitleError>,
    },

    #[error("library section not found: {0}")]
    SectionNotFound(String),

    #[error("show not found in section {section}: {title}")]
    ShowNotFound { section: String, title: String },

    #[error("no season folders found under {0}")]
    NoSeasonFolders(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl RetitleError {
    /// Whether a request that failed with this error is worth sending again.
    ///
    /// Connection failures, timeouts, bodies cut short, throttling and server-side
    /// errors are transient; client errors and malformed JSON are not.
    pub fn is_transient(&self) -> bool {
        match self {
            RetitleError::Http(e) => {
                // reqwest only reports decode errors while reading the body here;
                // JSON parsing goes through `Decode` instead.
                e.is_timeout()
                    || e.is_connect()
                    || e.is_request()
                    || e.is_body()
                    || e.is_decode()
                    || e.status().is_some_and(|s| s.is_server_error() || s.as_u16() == 429)
            }
            RetitleError::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn throttling_and_server_errors_are_transient() {
        let api = |status| RetitleError::Api {
            status,
            message: String::new(),
        };
        assert!(api(429).is_transient());
        assert!(api(500).is_transient());
        assert!(api(503).is_transient());
        assert!(!api(400).is_transient());
        assert!(!api(401).is_transient());
        assert!(!api(404).is_transient());
    }

    #[test]
    fn malformed_json_is_not_transient() {
        let err: RetitleError = serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();
        assert!(!err.is_transient());
        assert!(!RetitleError::SectionNotFound("Dance".to_string()).is_transient());
    }
}
