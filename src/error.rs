//! Error types for mdocx library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for mdocx operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while converting a document.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input Markdown file does not exist.
    #[error("Input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    /// The input is not valid UTF-8 text.
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// An image could not be decoded.
    #[error("Image error: {0}")]
    Image(String),

    /// A referenced image is missing and the parser runs in strict mode.
    #[error("Image not found: {}", .0.display())]
    MissingImage(PathBuf),

    /// Error writing the DOCX container.
    #[error("Archive error: {0}")]
    Archive(String),

    /// Error during rendering (DOCX, text, JSON).
    #[error("Rendering error: {0}")]
    Render(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(e) => Error::Io(e),
            _ => Error::Archive(err.to_string()),
        }
    }
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        match err {
            image::ImageError::IoError(e) => Error::Io(e),
            _ => Error::Image(err.to_string()),
        }
    }
}
