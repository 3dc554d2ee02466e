//! Upload rules for category images.

use image::ImageFormat;

/// Default maximum upload size (5 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Default lifetime of a staged upload that was never attached (24 hours).
pub const DEFAULT_TEMP_FILE_MAX_AGE_SECS: u64 = 24 * 60 * 60;

/// Accepted image file extensions (lowercase).
pub const ALLOWED_IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp"];

/// Lowercase extension of `filename`, if any.
pub fn file_extension(filename: &str) -> Option<String> {
    let (stem, ext) = filename.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Check size, extension and content of an uploaded image.
///
/// Returns the normalized extension to store the file under.
pub fn validate_image_upload(
    filename: &str,
    bytes: &[u8],
    max_bytes: usize,
) -> Result<String, String> {
    if bytes.is_empty() {
        return Err("Uploaded file is empty".to_string());
    }
    if bytes.len() > max_bytes {
        return Err(format!(
            "Uploaded file is {} bytes; the limit is {max_bytes} bytes",
            bytes.len()
        ));
    }

    let ext = file_extension(filename)
        .ok_or_else(|| format!("File '{filename}' has no extension"))?;
    if !ALLOWED_IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        return Err(format!(
            "Unsupported image format '.{ext}'. Supported: {}",
            ALLOWED_IMAGE_EXTENSIONS.join(", ")
        ));
    }

    match image::guess_format(bytes) {
        Ok(ImageFormat::Png | ImageFormat::Jpeg | ImageFormat::WebP) => Ok(ext),
        Ok(other) => Err(format!("Unsupported image content ({other:?})")),
        Err(_) => Err("Uploaded file is not a recognized image".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_HEADER: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];

    #[test]
    fn extension_parsing() {
        assert_eq!(file_extension("cover.PNG").as_deref(), Some("png"));
        assert_eq!(file_extension("archive.tar.gz").as_deref(), Some("gz"));
        assert_eq!(file_extension("noext"), None);
        assert_eq!(file_extension(".hidden"), None);
        assert_eq!(file_extension("trailing."), None);
    }

    #[test]
    fn accepts_png() {
        assert_eq!(
            validate_image_upload("cover.png", PNG_HEADER, DEFAULT_MAX_UPLOAD_BYTES).unwrap(),
            "png"
        );
    }

    #[test]
    fn rejects_empty_and_oversized() {
        assert!(validate_image_upload("cover.png", &[], 100).is_err());
        assert!(validate_image_upload("cover.png", PNG_HEADER, 4).is_err());
    }

    #[test]
    fn rejects_wrong_extension() {
        let msg = validate_image_upload("cover.gif", PNG_HEADER, 100).unwrap_err();
        assert!(msg.contains(".gif"));
    }

    #[test]
    fn rejects_non_image_content() {
        assert!(validate_image_upload("cover.png", b"plain text body", 100).is_err());
    }
}
