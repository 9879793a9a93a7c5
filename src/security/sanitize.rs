//! PII masking and log sanitization.
//!
//! # Responsibilities
//! - Mask card numbers, email addresses and phone numbers in free text
//! - Strip ASCII control characters before text reaches logs or clients
//! - Provide the one logging helper error paths are allowed to use
//!
//! # Design Decisions
//! - Masking is best-effort: common formats are caught, exotic ones pass
//! - Card masking runs first so the phone pattern never eats card digits
//! - Masking is idempotent: masked output contains nothing left to match

use std::sync::OnceLock;

use regex::Regex;

/// Maximum length of an error detail attached to a log record.
pub const MAX_LOG_DETAIL: usize = 200;

fn card_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\b(\d{4}[\s-]?)(\d{4}[\s-]?)(\d{4}[\s-]?)(\d{4})\b")
            .expect("card pattern must compile")
    })
}

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\b([A-Za-z0-9._%+-])([A-Za-z0-9._%+-]*?)@([A-Za-z0-9.-]+\.[A-Za-z]{2,})\b")
            .expect("email pattern must compile")
    })
}

fn phone_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\b(\+?\d{1,3}[\s-]?)(\d{1,3}[\s-]?)(\d{1,3}[\s-]?)(\d{1,2}[\s-]?)(\d{2})\b")
            .expect("phone pattern must compile")
    })
}

fn control_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"[\x00-\x08\x0B\x0C\x0E-\x1F]").expect("control pattern must compile")
    })
}

/// Mask PII (card numbers, emails, phone numbers) in a string.
///
/// `1234 5678 9012 3456` becomes `**** **** **** 3456`,
/// `user@example.com` becomes `u***@example.com`,
/// `+7 999 123-45-67` becomes `+7 *** ***-**-67`.
pub fn mask_pii(text: &str) -> String {
    // Cards first: the phone pattern would otherwise match inside card digits.
    let masked = card_regex().replace_all(text, "**** **** **** ${4}");
    let masked = email_regex().replace_all(&masked, "${1}***@${3}");
    let masked = phone_regex().replace_all(&masked, "${1}*** ***-**-${5}");
    masked.into_owned()
}

/// Sanitize an error detail for exposure: mask PII, then strip control
/// characters (0x00-0x08, 0x0B-0x0C, 0x0E-0x1F).
pub fn sanitize_detail(detail: &str) -> String {
    let masked = mask_pii(detail);
    control_regex().replace_all(&masked, "").into_owned()
}

/// Truncate a string to at most `max` characters, respecting char boundaries.
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

/// Emit an error-level log record with a sanitized, length-capped detail.
///
/// Every error path logs through here; nothing else may log raw user input
/// or raw fault text.
pub fn safe_log_error(message: &str, correlation_id: &str, detail: &str) {
    let masked = if detail.is_empty() {
        String::new()
    } else {
        truncate_chars(&sanitize_detail(detail), MAX_LOG_DETAIL)
    };
    tracing::error!(
        correlation_id = %correlation_id,
        error_detail = %masked,
        "{}",
        message
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_email_keeping_first_char_and_domain() {
        assert_eq!(mask_pii("user@example.com"), "u***@example.com");
        assert!(mask_pii("contact admin@corp.io now").contains("a***@corp.io"));
    }

    #[test]
    fn masks_card_keeping_last_four() {
        assert_eq!(
            mask_pii("Card: 1234 5678 9012 3456"),
            "Card: **** **** **** 3456"
        );
        assert_eq!(
            mask_pii("1234-5678-9012-3456"),
            "**** **** **** 3456"
        );
    }

    #[test]
    fn masks_phone_keeping_prefix_and_last_two() {
        let masked = mask_pii("Contact: +7 999 123-45-67");
        assert!(masked.contains("***"), "got {masked}");
        assert!(masked.ends_with("67"));
        assert!(!masked.contains("123"));
    }

    #[test]
    fn masking_is_idempotent() {
        for input in [
            "user@example.com",
            "1234 5678 9012 3456",
            "+7 999 123-45-67",
            "plain text, no pii",
        ] {
            let once = mask_pii(input);
            assert_eq!(mask_pii(&once), once, "not idempotent for {input:?}");
        }
    }

    #[test]
    fn strips_control_characters() {
        assert_eq!(sanitize_detail("a\x00b\x08c\x0bd\x1fe"), "abcde");
        // Newline and tab survive: only the listed ranges are stripped.
        assert_eq!(sanitize_detail("a\nb\tc"), "a\nb\tc");
    }

    #[test]
    fn truncates_on_char_boundary() {
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("hello", 3), "hel");
        assert_eq!(truncate_chars("привет", 3), "при");
    }
}
