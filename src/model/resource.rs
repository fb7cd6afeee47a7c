//! Embedded image resources.

use std::io::Cursor;

use crate::error::{Error, Result};
use image::{ImageFormat, ImageReader};
use serde::{Deserialize, Serialize};

/// An image embedded in the output document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    /// Raw binary data
    #[serde(skip_serializing, default)]
    pub data: Vec<u8>,

    /// MIME type (e.g., "image/png")
    pub mime_type: String,

    /// Original filename if known
    pub filename: Option<String>,

    /// Width in pixels
    pub width: u32,

    /// Height in pixels
    pub height: u32,
}

impl Resource {
    /// Create a new image resource with known dimensions.
    pub fn image(data: Vec<u8>, mime_type: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            data,
            mime_type: mime_type.into(),
            filename: None,
            width,
            height,
        }
    }

    /// Read the image header to learn format and dimensions.
    ///
    /// Pixel data is not decoded.
    pub fn probe(data: Vec<u8>) -> Result<Self> {
        let format = image::guess_format(&data)?;
        let mime_type = Self::mime_for(format).ok_or_else(|| {
            Error::Image(format!("unsupported image format: {:?}", format))
        })?;
        let (width, height) = ImageReader::with_format(Cursor::new(&data), format).into_dimensions()?;
        if width == 0 || height == 0 {
            return Err(Error::Image("image has zero size".into()));
        }
        Ok(Self::image(data, mime_type, width, height))
    }

    /// Set filename.
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Get the size of the resource data in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Height scaled to the given width, preserving the aspect ratio.
    ///
    /// Saturates instead of overflowing for extreme widths.
    pub fn scaled_height(&self, width: u64) -> u64 {
        width.saturating_mul(self.height as u64) / self.width.max(1) as u64
    }

    /// Get a suggested filename based on MIME type and ID.
    pub fn suggested_filename(&self, id: &str) -> String {
        format!("{}.{}", id, self.extension())
    }

    /// Get the file extension based on MIME type.
    pub fn extension(&self) -> &str {
        match self.mime_type.as_str() {
            "image/jpeg" => "jpeg",
            "image/png" => "png",
            "image/gif" => "gif",
            "image/bmp" => "bmp",
            _ => "bin",
        }
    }

    fn mime_for(format: ImageFormat) -> Option<&'static str> {
        match format {
            ImageFormat::Png => Some("image/png"),
            ImageFormat::Jpeg => Some("image/jpeg"),
            ImageFormat::Gif => Some("image/gif"),
            ImageFormat::Bmp => Some("image/bmp"),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_png() -> Vec<u8> {
        let img = image::RgbImage::new(4, 2);
        let mut buf = std::io::Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    #[test]
    fn test_probe_png() {
        let res = Resource::probe(tiny_png()).unwrap();
        assert_eq!(res.mime_type, "image/png");
        assert_eq!((res.width, res.height), (4, 2));
        assert_eq!(res.extension(), "png");
        assert_eq!(res.suggested_filename("image1"), "image1.png");
    }

    #[test]
    fn test_probe_garbage() {
        let result = Resource::probe(b"not an image at all".to_vec());
        assert!(result.is_err());
    }

    #[test]
    fn test_scaled_height() {
        let res = Resource::image(vec![], "image/png", 800, 400);
        assert_eq!(res.scaled_height(1000), 500);
    }

    #[test]
    fn test_scaled_height_saturates() {
        let res = Resource::image(vec![], "image/png", 1, u32::MAX);
        assert_eq!(res.scaled_height(u64::MAX), u64::MAX);
    }
}
