//! crates/formscan_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any transport or serialization format.

/// The caller identity produced by a successful credential verification.
///
/// The `uid` is an opaque subject identifier; nothing beyond uniqueness per
/// user may be assumed about its contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub uid: String,
    pub email: Option<String>,
}

/// The media type of an uploaded document payload, derived from the
/// uploaded filename's extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    Pdf,
    Png,
    Jpeg,
}

impl MediaType {
    /// Determines the media type from a filename, case-insensitively.
    /// Returns `None` for anything other than `.pdf`, `.png`, `.jpg`, `.jpeg`.
    pub fn from_filename(filename: &str) -> Option<Self> {
        let lower = filename.to_ascii_lowercase();
        if lower.ends_with(".pdf") {
            Some(Self::Pdf)
        } else if lower.ends_with(".png") {
            Some(Self::Png)
        } else if lower.ends_with(".jpg") || lower.ends_with(".jpeg") {
            Some(Self::Jpeg)
        } else {
            None
        }
    }

    /// The MIME type string sent to the upstream model.
    pub fn mime(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_type_from_known_extensions() {
        assert_eq!(MediaType::from_filename("invoice.pdf"), Some(MediaType::Pdf));
        assert_eq!(MediaType::from_filename("scan.png"), Some(MediaType::Png));
        assert_eq!(MediaType::from_filename("page.jpg"), Some(MediaType::Jpeg));
        assert_eq!(MediaType::from_filename("page.jpeg"), Some(MediaType::Jpeg));
    }

    #[test]
    fn media_type_is_case_insensitive() {
        assert_eq!(MediaType::from_filename("INVOICE.PDF"), Some(MediaType::Pdf));
        assert_eq!(MediaType::from_filename("Scan.PnG"), Some(MediaType::Png));
        assert_eq!(MediaType::from_filename("Page.JPeG"), Some(MediaType::Jpeg));
    }

    #[test]
    fn media_type_rejects_other_extensions() {
        assert_eq!(MediaType::from_filename("animation.gif"), None);
        assert_eq!(MediaType::from_filename("notes.txt"), None);
        assert_eq!(MediaType::from_filename("pdf"), None);
    }

    #[test]
    fn jpg_and_jpeg_share_a_mime_type() {
        assert_eq!(MediaType::Jpeg.mime(), "image/jpeg");
        assert_eq!(MediaType::Pdf.mime(), "application/pdf");
        assert_eq!(MediaType::Png.mime(), "image/png");
    }
}
