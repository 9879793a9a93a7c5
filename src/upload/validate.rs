//! Upload content validation.
//!
//! # Responsibilities
//! - Reject empty and oversized content
//! - Enforce the extension allow-list
//! - Require agreement between declared extension and sniffed content type
//!
//! # Design Decisions
//! - Checks short-circuit in a fixed order; the first failure wins
//! - Extension allow-listing and magic-byte sniffing are both required:
//!   either one alone is spoofable

use std::path::Path;

use thiserror::Error;

use crate::upload::sniff::detect_type;

/// Extensions accepted for upload, lower-cased, with the leading dot.
pub const ALLOWED_EXTENSIONS: &[&str] = &[".txt", ".pdf", ".png", ".jpg", ".jpeg"];

/// Why an upload was rejected. Each message is client-visible.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadRejection {
    #[error("File is empty")]
    Empty,
    #[error("File size exceeds limit of {limit} bytes")]
    TooLarge { limit: usize },
    #[error("File extension {extension} is not allowed")]
    ExtensionNotAllowed { extension: String },
    #[error("File type could not be determined from magic bytes")]
    TypeUndetermined,
    #[error("File content type ({detected}) does not match extension ({declared})")]
    TypeMismatch {
        detected: &'static str,
        declared: String,
    },
}

/// Lower-cased suffix of a declared filename, including the dot.
/// Empty when the name has no extension.
fn declared_extension(filename: &str) -> String {
    Path::new(filename)
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
        .unwrap_or_default()
}

/// Validate upload content against its declared filename.
///
/// Runs the empty, size, extension, magic-byte and agreement checks in that
/// order. On success returns the validated extension to persist under.
pub fn validate(
    content: &[u8],
    filename: &str,
    max_bytes: usize,
) -> Result<String, UploadRejection> {
    if content.is_empty() {
        return Err(UploadRejection::Empty);
    }
    if content.len() > max_bytes {
        return Err(UploadRejection::TooLarge { limit: max_bytes });
    }

    let extension = declared_extension(filename);
    if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(UploadRejection::ExtensionNotAllowed { extension });
    }

    let detected = detect_type(content).ok_or(UploadRejection::TypeUndetermined)?;
    if detected != extension {
        return Err(UploadRejection::TypeMismatch {
            detected,
            declared: extension,
        });
    }

    Ok(extension)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_HEADER: &[u8] = b"\x89PNG\r\n\x1a\nrest of image";

    #[test]
    fn rejects_empty_content() {
        assert_eq!(validate(b"", "a.txt", 1024), Err(UploadRejection::Empty));
    }

    #[test]
    fn rejects_oversized_content() {
        let content = vec![b'x'; 11];
        assert_eq!(
            validate(&content, "a.txt", 10),
            Err(UploadRejection::TooLarge { limit: 10 })
        );
    }

    #[test]
    fn rejects_disallowed_extension() {
        assert_eq!(
            validate(b"MZ\x90\x00", "malware.exe", 1024),
            Err(UploadRejection::ExtensionNotAllowed {
                extension: ".exe".to_string()
            })
        );
        assert_eq!(
            validate(b"no extension here", "README", 1024),
            Err(UploadRejection::ExtensionNotAllowed {
                extension: String::new()
            })
        );
    }

    #[test]
    fn rejects_extension_content_mismatch() {
        // PNG bytes under a .txt name, and text bytes under a .png name.
        assert_eq!(
            validate(PNG_HEADER, "image.txt", 1024),
            Err(UploadRejection::TypeMismatch {
                detected: ".png",
                declared: ".txt".to_string()
            })
        );
        assert_eq!(
            validate(b"FAKE_PNG_CONTENT", "fake.png", 1024),
            Err(UploadRejection::TypeMismatch {
                detected: ".txt",
                declared: ".png".to_string()
            })
        );
    }

    #[test]
    fn rejects_undetermined_type() {
        assert_eq!(
            validate(&[0xDE, 0xAD, 0xBE, 0xEF], "blob.png", 1024),
            Err(UploadRejection::TypeUndetermined)
        );
    }

    #[test]
    fn accepts_agreeing_content() {
        assert_eq!(validate(PNG_HEADER, "photo.PNG", 1024).as_deref(), Ok(".png"));
        assert_eq!(
            validate(b"plain text body", "notes.txt", 1024).as_deref(),
            Ok(".txt")
        );
    }

    #[test]
    fn extension_is_taken_from_final_suffix() {
        assert_eq!(
            validate(b"plain text body", "../../../etc/passwd.txt", 1024).as_deref(),
            Ok(".txt")
        );
    }
}
