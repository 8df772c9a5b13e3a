//! Image loading front end: decode, sample, quantize.
//!
//! Sources are local files, in-memory encoded bytes and, with the `http`
//! feature, http(s) URLs. Read failures surface as [`ExtractError::Io`],
//! failed downloads as [`ExtractError::Fetch`] and undecodable data as
//! [`ExtractError::Decode`]; quantization itself never fails here and
//! falls back to white.

use std::path::Path;

use rgb::{RGB8, RGBA8};

use crate::error::ExtractError;
use crate::extract::{get_palette, PaletteOptions, FALLBACK_COLOR};
use crate::sample::rgba_pixels;

/// A decoded image as row-major RGBA pixels.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<RGBA8>,
}

/// Decode an encoded image (PNG, JPEG, GIF, WebP, BMP) into RGBA pixels.
pub fn decode_rgba(bytes: &[u8]) -> Result<LoadedImage, ExtractError> {
    let rgba = image::load_from_memory(bytes)?.to_rgba8();
    let (width, height) = rgba.dimensions();
    let pixels = rgba_pixels(rgba.as_raw())?;
    tracing::debug!(width, height, "decoded image");
    Ok(LoadedImage {
        width,
        height,
        pixels,
    })
}

/// Read and decode an image file.
pub fn load_rgba(path: impl AsRef<Path>) -> Result<LoadedImage, ExtractError> {
    let bytes = std::fs::read(path.as_ref())?;
    decode_rgba(&bytes)
}

pub fn palette_from_bytes(
    bytes: &[u8],
    options: PaletteOptions,
) -> Result<Vec<RGB8>, ExtractError> {
    let image = decode_rgba(bytes)?;
    Ok(get_palette(&image.pixels, options))
}

pub fn color_from_bytes(bytes: &[u8], quality: usize) -> Result<RGB8, ExtractError> {
    let palette = palette_from_bytes(bytes, PaletteOptions::new().quality(quality))?;
    Ok(first_or_white(&palette))
}

pub fn palette_from_path(
    path: impl AsRef<Path>,
    options: PaletteOptions,
) -> Result<Vec<RGB8>, ExtractError> {
    let image = load_rgba(path)?;
    Ok(get_palette(&image.pixels, options))
}

pub fn color_from_path(path: impl AsRef<Path>, quality: usize) -> Result<RGB8, ExtractError> {
    let palette = palette_from_path(path, PaletteOptions::new().quality(quality))?;
    Ok(first_or_white(&palette))
}

/// Read the file asynchronously, then decode and quantize on the blocking pool.
///
/// Dropping the future abandons the work.
#[cfg(feature = "tokio")]
pub async fn palette_from_path_async(
    path: impl AsRef<Path>,
    options: PaletteOptions,
) -> Result<Vec<RGB8>, ExtractError> {
    let bytes = tokio::fs::read(path.as_ref()).await?;
    let palette =
        tokio::task::spawn_blocking(move || palette_from_bytes(&bytes, options)).await??;
    Ok(palette)
}

#[cfg(feature = "tokio")]
pub async fn color_from_path_async(
    path: impl AsRef<Path>,
    quality: usize,
) -> Result<RGB8, ExtractError> {
    let palette = palette_from_path_async(path, PaletteOptions::new().quality(quality)).await?;
    Ok(first_or_white(&palette))
}

/// Download an image over http(s), then decode and quantize it on the
/// blocking pool.
///
/// Non-success status codes are fetch errors.
#[cfg(feature = "http")]
pub async fn palette_from_url_async(
    url: &str,
    options: PaletteOptions,
) -> Result<Vec<RGB8>, ExtractError> {
    palette_from_url_with_client(&reqwest::Client::new(), url, options).await
}

#[cfg(feature = "http")]
pub async fn color_from_url_async(url: &str, quality: usize) -> Result<RGB8, ExtractError> {
    let palette = palette_from_url_async(url, PaletteOptions::new().quality(quality)).await?;
    Ok(first_or_white(&palette))
}

/// [`palette_from_url_async`] through a caller-configured client.
#[cfg(feature = "http")]
pub async fn palette_from_url_with_client(
    client: &reqwest::Client,
    url: &str,
    options: PaletteOptions,
) -> Result<Vec<RGB8>, ExtractError> {
    let response = client.get(url).send().await?.error_for_status()?;
    let bytes = response.bytes().await?;
    tracing::debug!(url, len = bytes.len(), "fetched image");
    let palette =
        tokio::task::spawn_blocking(move || palette_from_bytes(&bytes, options)).await??;
    Ok(palette)
}

fn first_or_white(palette: &[RGB8]) -> RGB8 {
    palette.first().copied().unwrap_or(FALLBACK_COLOR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn encode_png(width: u32, height: u32, f: impl Fn(u32, u32) -> [u8; 4]) -> Vec<u8> {
        let img = image::RgbaImage::from_fn(width, height, |x, y| image::Rgba(f(x, y)));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn decodes_dimensions_and_pixels() {
        let png = encode_png(3, 2, |x, y| [x as u8, y as u8, 7, 255]);
        let image = decode_rgba(&png).unwrap();
        assert_eq!((image.width, image.height), (3, 2));
        assert_eq!(image.pixels.len(), 6);
        assert_eq!(image.pixels[4], RGBA8::new(1, 1, 7, 255));
    }

    #[test]
    fn garbage_is_a_decode_error() {
        assert!(matches!(
            decode_rgba(b"definitely not an image"),
            Err(ExtractError::Decode(_))
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        assert!(matches!(
            load_rgba("/nonexistent/colorthief/missing.png"),
            Err(ExtractError::Io(_))
        ));
    }

    #[test]
    fn color_from_solid_png() {
        let png = encode_png(16, 16, |_, _| [30, 160, 90, 255]);
        let color = color_from_bytes(&png, 1).unwrap();
        assert!(color.r.abs_diff(30) <= 8);
        assert!(color.g.abs_diff(160) <= 8);
        assert!(color.b.abs_diff(90) <= 8);
    }
}
