//! Error types for computer actions

use thiserror::Error;

/// Errors raised by a [`Computer`](crate::computer::Computer) action
#[derive(Error, Debug)]
pub enum ComputerError {
    /// An argument outside the action vocabulary (e.g. an unknown scroll direction)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The input injector, screen capturer or browser launcher failed
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, ComputerError>;
