//! File type detection from leading magic bytes.

/// Signature table: leading bytes and the extension they identify.
///
/// ZIP is detected (docx and friends open with it) but is not on the upload
/// allow-list, so ZIP content can never agree with an allowed extension.
const MAGIC_SIGNATURES: &[(&[u8], &str)] = &[
    (b"\x89PNG\r\n\x1a\n", ".png"),
    (&[0xFF, 0xD8, 0xFF], ".jpg"),
    (b"%PDF", ".pdf"),
    (&[0x50, 0x4B, 0x03, 0x04], ".zip"),
];

/// How many leading bytes are checked for UTF-8 when no signature matches.
const TEXT_SNIFF_LEN: usize = 100;

/// Detect a file type from its leading bytes.
///
/// Inputs shorter than four bytes are undetermined. When no binary signature
/// matches, the first 100 bytes are tried as UTF-8; success classifies the
/// content as plain text. Returns `None` when the type cannot be determined.
pub fn detect_type(content: &[u8]) -> Option<&'static str> {
    if content.len() < 4 {
        return None;
    }
    for (magic, ext) in MAGIC_SIGNATURES {
        if content.starts_with(magic) {
            return Some(ext);
        }
    }
    let head = &content[..content.len().min(TEXT_SNIFF_LEN)];
    if std::str::from_utf8(head).is_ok() {
        return Some(".txt");
    }
    None
}
