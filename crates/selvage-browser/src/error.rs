//! Error types for the browser binding.

use thiserror::Error;

use selvage_core::{ConfigError, DomError};

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum BrowserError {
    #[error("no window available")]
    NoWindow,

    #[error("window has no document")]
    NoDocument,

    #[error("editor root is not an HTML element")]
    NotHtmlElement,

    #[error(transparent)]
    Dom(#[from] DomError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
