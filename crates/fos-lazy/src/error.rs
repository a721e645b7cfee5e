//! Error type for the lazy loader

use fos_dom::DomError;

/// Lazy loading errors
///
/// None of these reach the page: activation and the delivery handlers log
/// them and carry on.
#[derive(Debug, thiserror::Error)]
pub enum LazyError {
    #[error("Invalid lazy loading options: {0}")]
    InvalidOptions(#[from] serde_json::Error),

    #[error("DOM operation failed: {0}")]
    Dom(#[from] DomError),

    #[error("Intersection and mutation observers are required")]
    Unsupported,
}
