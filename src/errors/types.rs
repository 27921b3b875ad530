//! Error type definitions for the Pluto TV proxy

use thiserror::Error;

/// Top-level application error type
///
/// Represents all errors that cross module boundaries. Uses `thiserror` for
/// automatic trait implementations and proper error chaining.
#[derive(Error, Debug)]
pub enum AppError {
    /// Upstream provider errors (bootstrap, channel, timeline endpoints)
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Request for a region that is not configured
    #[error("Unknown region: {region}")]
    UnknownRegion { region: String },

    /// A requested artifact has not been built yet
    #[error("Not found: {resource}")]
    NotFound { resource: String },

    /// Generic internal errors
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl AppError {
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        AppError::Configuration {
            message: message.into(),
        }
    }

    pub fn unknown_region<S: Into<String>>(region: S) -> Self {
        AppError::UnknownRegion {
            region: region.into(),
        }
    }

    pub fn not_found<S: Into<String>>(resource: S) -> Self {
        AppError::NotFound {
            resource: resource.into(),
        }
    }

    pub fn internal<S: Into<String>>(message: S) -> Self {
        AppError::Internal {
            message: message.into(),
        }
    }
}

/// Upstream provider specific errors
///
/// Three failure kinds exist: transport failures (the request never produced
/// a response), upstream HTTP failures (non-2xx status), and a missing
/// session (the bootstrap response carried no usable token).
#[derive(Error, Debug)]
pub enum SourceError {
    /// Network/connection failures
    #[error("Transport failure for {url}: {message}")]
    Transport { url: String, message: String },

    /// Non-2xx responses from the provider
    #[error("HTTP failure {status} from {url}: {body}")]
    UpstreamStatus {
        url: String,
        status: u16,
        body: String,
    },

    /// No session token could be obtained for a region
    #[error("No session token for region {region}")]
    MissingSession { region: String },

    /// Response payload could not be decoded
    #[error("Decode failure for {url}: {message}")]
    Decode { url: String, message: String },
}

impl SourceError {
    pub fn transport(url: &str, err: &reqwest::Error) -> Self {
        SourceError::Transport {
            url: url.to_string(),
            message: err.to_string(),
        }
    }

    pub fn upstream_status(url: &str, status: u16, body: String) -> Self {
        SourceError::UpstreamStatus {
            url: url.to_string(),
            status,
            body,
        }
    }

    pub fn missing_session<S: Into<String>>(region: S) -> Self {
        SourceError::MissingSession {
            region: region.into(),
        }
    }

    pub fn decode(url: &str, err: &reqwest::Error) -> Self {
        SourceError::Decode {
            url: url.to_string(),
            message: err.to_string(),
        }
    }
}
