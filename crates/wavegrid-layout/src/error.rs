#![forbid(unsafe_code)]

use thiserror::Error;

pub type Result<T> = std::result::Result<T, LayoutError>;

#[derive(Debug, Error)]
pub enum LayoutError {
    /// The engine holds no durable state; it can only be built fresh.
    #[error("spring layout cannot be restored from archived state; construct it with SpringFlowLayout::new")]
    RestoreUnsupported,

    #[error("invalid configuration: {}", .0.join("; "))]
    InvalidConfig(Vec<String>),
}
