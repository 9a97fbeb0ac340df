// This is free and unencumbered software released into the public domain.

use std::error::Error as StdError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CameraError {
    #[error("no suitable camera backend available")]
    NoDriver,

    #[error("no camera device available")]
    NoCamera,

    #[error("no supported preview size to choose from")]
    NoCandidate,

    #[error("camera {id} is unavailable")]
    CameraUnavailable {
        id: String,
        #[source]
        source: Option<Box<dyn StdError + Send + Sync>>,
    },

    #[error("unsupported: {0}")]
    Unsupported(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("driver error while {context}")]
    DriverError {
        context: &'static str,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    #[error("{0}")]
    Other(String),
}

impl CameraError {
    #[inline]
    pub fn driver(context: &'static str, source: impl StdError + Send + Sync + 'static) -> Self {
        Self::DriverError {
            context,
            source: Box::new(source),
        }
    }

    #[inline]
    pub fn unavailable(id: impl Into<String>) -> Self {
        Self::CameraUnavailable {
            id: id.into(),
            source: None,
        }
    }

    #[inline]
    pub fn unavailable_with(
        id: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self::CameraUnavailable {
            id: id.into(),
            source: Some(Box::new(source)),
        }
    }

    #[inline]
    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported(msg.into())
    }

    #[inline]
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    #[inline]
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}
