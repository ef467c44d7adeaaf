pub mod outline;
pub mod layout;
pub mod pdf;
pub mod compositor;

pub use layout::*;
pub use compositor::*;

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Cannot write report to {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("PDF encoding failed: {0}")]
    Pdf(String),
}
