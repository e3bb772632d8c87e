use std::path::PathBuf;
use thiserror::Error;

use crate::error_codes::{
    ERR_CONFIG_LOAD_FAILED, ERR_LISTING_FAILED, ERR_LOCATION_WITHOUT_PATH, ERR_NOT_A_DIRECTORY,
    ERR_STORE_LOAD_FAILED, ERR_STORE_SAVE_FAILED,
};

/// Failure of the external directory-listing capability.
///
/// The tree loader never propagates this; it is logged and the node keeps
/// whatever children it had before.
#[derive(Debug, Error)]
pub enum ListingError {
    #[error("failed to list {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("not a directory: {path:?}")]
    NotADirectory { path: PathBuf },

    #[error("location {location} has no path to list")]
    MissingPath { location: String },
}

impl ListingError {
    pub fn code(&self) -> &'static str {
        match self {
            ListingError::Io { .. } => ERR_LISTING_FAILED,
            ListingError::NotADirectory { .. } => ERR_NOT_A_DIRECTORY,
            ListingError::MissingPath { .. } => ERR_LOCATION_WITHOUT_PATH,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

impl ConfigError {
    pub fn code(&self) -> &'static str {
        ERR_CONFIG_LOAD_FAILED
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read location store {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("corrupt location store {path:?}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("failed to encode locations: {0}")]
    Encode(#[source] serde_yaml::Error),

    #[error("failed to write location store {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::Read { .. } | StoreError::Decode { .. } => ERR_STORE_LOAD_FAILED,
            StoreError::Encode(_) | StoreError::Write { .. } => ERR_STORE_SAVE_FAILED,
        }
    }
}
