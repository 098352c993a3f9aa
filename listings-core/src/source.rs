//! Listing sources and fetch errors.
//!
//! The `ListingSource` trait abstracts over where the symbol directory comes
//! from (the NASDAQ Trader web mirror, a local copy) so the pipeline can be
//! pointed at a fixture in tests. Sources return the raw text; parsing happens
//! in [`crate::table`].

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Errors raised while retrieving the listing text.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("unsupported source scheme in '{0}' (expected http, https, file or a path)")]
    UnsupportedScheme(String),

    #[error("failed to build HTTP client: {0}")]
    Client(String),

    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("request failed: {0}")]
    Request(String),

    #[error("HTTP {status} fetching {url}")]
    HttpStatus { status: u16, url: String },

    #[error("failed to read response body: {0}")]
    Body(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Something that can produce the full listing text in one blocking call.
pub trait ListingSource {
    /// Human-readable description, used in logs.
    fn name(&self) -> &str;

    /// Fetch the complete listing document.
    fn fetch(&self) -> Result<String, FetchError>;
}

/// Whole-request timeout for [`HttpSource::new`].
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetches the listing over HTTP(S).
pub struct HttpSource {
    client: reqwest::blocking::Client,
    url: String,
}

impl HttpSource {
    pub fn new(url: impl Into<String>) -> Result<Self, FetchError> {
        Self::with_timeout(url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("listings/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

impl ListingSource for HttpSource {
    fn name(&self) -> &str {
        &self.url
    }

    fn fetch(&self) -> Result<String, FetchError> {
        let resp = self
            .client
            .get(&self.url)
            .send()
            .map_err(request_error)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                url: self.url.clone(),
            });
        }

        resp.text().map_err(|e| FetchError::Body(e.to_string()))
    }
}

/// Classify a failed `send()`: no connection, timed out, or anything else
/// (malformed URL, redirect loop, TLS).
fn request_error(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout(e.to_string())
    } else if e.is_connect() {
        FetchError::NetworkUnreachable(e.to_string())
    } else {
        FetchError::Request(e.to_string())
    }
}

/// Reads the listing from a local file (a saved copy of the directory).
pub struct FileSource {
    path: PathBuf,
    label: String,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let label = path.display().to_string();
        Self { path, label }
    }
}

impl ListingSource for FileSource {
    fn name(&self) -> &str {
        &self.label
    }

    fn fetch(&self) -> Result<String, FetchError> {
        std::fs::read_to_string(&self.path).map_err(|source| FetchError::Io {
            path: self.label.clone(),
            source,
        })
    }
}

/// Pick a source for a location string by its scheme.
///
/// `http://` and `https://` go over the network, `file://` and bare paths are
/// read from disk. Anything else (notably `ftp://`) is rejected.
pub fn source_for(location: &str) -> Result<Box<dyn ListingSource>, FetchError> {
    if location.starts_with("http://") || location.starts_with("https://") {
        return Ok(Box::new(HttpSource::new(location)?));
    }
    if let Some(path) = location.strip_prefix("file://") {
        return Ok(Box::new(FileSource::new(path)));
    }
    if location.contains("://") {
        return Err(FetchError::UnsupportedScheme(location.to_string()));
    }
    Ok(Box::new(FileSource::new(location)))
}
