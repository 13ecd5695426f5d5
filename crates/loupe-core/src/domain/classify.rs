//! Human-scale labels for sizes and MIME types.

use std::fmt;

use serde::{Deserialize, Serialize};

const KIB: f64 = 1024.0;
const MIB: f64 = 1024.0 * 1024.0;

/// `500` -> `"500 bytes"`, `2048` -> `"2.0 KB"`, `5 MiB` -> `"5.0 MB"`.
///
/// The bucket follows the rounded figure, so `1048575` is `"1.0 MB"`, never
/// `"1024.0 KB"`.
pub fn classify_size(size_bytes: usize) -> String {
    let kib = size_bytes as f64 / KIB;
    if size_bytes < 1024 {
        format!("{size_bytes} bytes")
    } else if (kib * 10.0).round() < KIB * 10.0 {
        format!("{kib:.1} KB")
    } else {
        format!("{:.1} MB", size_bytes as f64 / MIB)
    }
}

/// Coarse media category derived from a MIME type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaCategory {
    Image,
    Audio,
    Video,
    PdfDocument,
    TextDocument,
    Document,
    Unknown,
}

impl MediaCategory {
    /// Checks run in a fixed order; the first hit wins.
    pub fn from_mime(mime_type: &str) -> Self {
        if mime_type.starts_with("image/") {
            MediaCategory::Image
        } else if mime_type.starts_with("audio/") {
            MediaCategory::Audio
        } else if mime_type.starts_with("video/") {
            MediaCategory::Video
        } else if mime_type.starts_with("application/pdf") {
            MediaCategory::PdfDocument
        } else if mime_type.starts_with("text/") {
            MediaCategory::TextDocument
        } else if mime_type.contains("document") {
            MediaCategory::Document
        } else {
            MediaCategory::Unknown
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MediaCategory::Image => "image",
            MediaCategory::Audio => "audio",
            MediaCategory::Video => "video",
            MediaCategory::PdfDocument => "PDF document",
            MediaCategory::TextDocument => "text document",
            MediaCategory::Document => "document",
            MediaCategory::Unknown => "unknown",
        }
    }
}

impl fmt::Display for MediaCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub fn classify_mime(mime_type: &str) -> String {
    MediaCategory::from_mime(mime_type).label().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::zero(0, "0 bytes")]
    #[case::small(500, "500 bytes")]
    #[case::just_below_kb(1023, "1023 bytes")]
    #[case::one_kb(1024, "1.0 KB")]
    #[case::two_kb(2048, "2.0 KB")]
    #[case::fractional_kb(1536, "1.5 KB")]
    #[case::five_mb(5 * 1024 * 1024, "5.0 MB")]
    #[case::largest_kb(1_048_524, "1023.9 KB")]
    #[case::rounds_up_into_mb(1_048_575, "1.0 MB")]
    #[case::one_mb(1024 * 1024, "1.0 MB")]
    fn sizes(#[case] size: usize, #[case] expected: &str) {
        assert_eq!(classify_size(size), expected);
    }

    #[rstest]
    #[case::png("image/png", "image")]
    #[case::mp3("audio/mpeg", "audio")]
    #[case::mp4("video/mp4", "video")]
    #[case::pdf("application/pdf", "PDF document")]
    #[case::plain("text/plain", "text document")]
    #[case::docx(
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "document"
    )]
    #[case::weird("application/weird", "unknown")]
    #[case::empty("", "unknown")]
    fn mime_categories(#[case] mime: &str, #[case] expected: &str) {
        assert_eq!(classify_mime(mime), expected);
    }

    #[test]
    fn text_prefix_wins_over_document_substring() {
        assert_eq!(
            MediaCategory::from_mime("text/x-document"),
            MediaCategory::TextDocument
        );
    }
}
