use super::descriptor::FileDescriptor;

const ALLOWED_TYPES: [&str; 8] = [
    "image/jpeg",
    "image/png",
    "image/gif",
    "image/webp",
    "video/mp4",
    "video/quicktime",
    "video/x-msvideo",
    "video/x-matroska",
];

const MIB: u64 = 1024 * 1024;
const MAX_IMAGE_BYTES: u64 = 10 * MIB;
const MAX_VIDEO_BYTES: u64 = 200 * MIB;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub valid: bool,
    pub reason: Option<&'static str>,
}

impl ValidationResult {
    fn ok() -> Self {
        Self {
            valid: true,
            reason: None,
        }
    }

    fn rejected(reason: &'static str) -> Self {
        Self {
            valid: false,
            reason: Some(reason),
        }
    }
}

/// Classifies a file against the type and size rules. First match wins,
/// no state, no I/O.
pub fn validate(descriptor: &FileDescriptor) -> ValidationResult {
    if !ALLOWED_TYPES.contains(&descriptor.mime.as_str()) {
        return ValidationResult::rejected("Not an image/video");
    }
    if descriptor.is_image() && descriptor.size > MAX_IMAGE_BYTES {
        return ValidationResult::rejected("Image too large (max 10MB)");
    }
    if descriptor.is_video() && descriptor.size > MAX_VIDEO_BYTES {
        return ValidationResult::rejected("Video too large (max 200MB)");
    }
    ValidationResult::ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::files::descriptor::test_descriptor;

    #[test]
    fn rejects_unknown_types() {
        for mime in ["application/pdf", "text/plain", "audio/mpeg"] {
            let result = validate(&test_descriptor("f", 100, mime));
            assert!(!result.valid);
            assert_eq!(result.reason, Some("Not an image/video"));
        }
    }

    #[test]
    fn accepts_every_allowed_type() {
        for mime in ALLOWED_TYPES {
            let result = validate(&test_descriptor("f", 100, mime));
            assert!(result.valid, "{mime} should be accepted");
            assert_eq!(result.reason, None);
        }
    }

    #[test]
    fn image_limit_is_exclusive_at_10_mib() {
        let at_limit = validate(&test_descriptor("a.png", 10 * MIB, "image/png"));
        assert!(at_limit.valid);

        let over = validate(&test_descriptor("a.png", 10 * MIB + 1, "image/png"));
        assert!(!over.valid);
        assert_eq!(over.reason, Some("Image too large (max 10MB)"));
    }

    #[test]
    fn video_limit_is_exclusive_at_200_mib() {
        let at_limit = validate(&test_descriptor("a.mp4", 200 * MIB, "video/mp4"));
        assert!(at_limit.valid);

        let over = validate(&test_descriptor("a.mp4", 250 * MIB, "video/mp4"));
        assert!(!over.valid);
        assert_eq!(over.reason, Some("Video too large (max 200MB)"));
    }

    #[test]
    fn type_rule_wins_over_size_rule() {
        let result = validate(&test_descriptor("huge.pdf", 500 * MIB, "application/pdf"));
        assert_eq!(result.reason, Some("Not an image/video"));
    }
}
