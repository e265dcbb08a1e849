//! Printable layout of a letter
//!
//! `PreviewDocument` is a pure function of a `LetterRecord`. Both the on-screen
//! page and the exported HTML are drawn from it.

use crate::image_ref::ImageRef;
use crate::letter::{LetterRecord, StampSlot};
use chrono::NaiveDate;

/// What to draw for a stamp-like field.
#[derive(Debug, Clone, PartialEq)]
pub enum StampMark {
    /// An uploaded image; always wins over the label.
    Image(ImageRef),
    /// Round badge containing the label.
    Badge(String),
    Empty,
}

impl StampMark {
    pub fn resolve(label: &str, image: Option<&ImageRef>) -> Self {
        match image {
            Some(image) => StampMark::Image(image.clone()),
            None if !label.trim().is_empty() => StampMark::Badge(label.trim().to_string()),
            None => StampMark::Empty,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, StampMark::Empty)
    }
}

/// Long US-style date ("March 5, 2024"); empty when unset.
pub fn format_long_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%B %-d, %Y").to_string())
        .unwrap_or_default()
}

/// Split a multi-line field into the lines that get stacked on the page.
/// Every newline starts a line, so a trailing newline leaves an empty last line.
pub fn split_lines(text: &str) -> Vec<String> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct PreviewDocument {
    pub logo: Option<ImageRef>,
    pub letterhead: Vec<String>,
    pub subhead: Vec<String>,
    pub contact_lines: Vec<String>,
    pub attention_to: String,
    pub date: String,
    pub subject: String,
    pub body: Vec<String>,
    pub signature: Option<ImageRef>,
    pub name: String,
    pub position: String,
    /// Top right, beside the date.
    pub top_stamp: StampMark,
    /// Bottom area, next to the signature block.
    pub seal: StampMark,
    pub bottom_stamp: StampMark,
}

impl PreviewDocument {
    pub fn from_record(record: &LetterRecord) -> Self {
        let mark = |slot| {
            let (label, image) = record.stamp(slot);
            StampMark::resolve(label, image)
        };
        Self {
            logo: record.logo.clone(),
            letterhead: split_lines(&record.letterhead),
            subhead: split_lines(&record.subhead),
            contact_lines: record.contact_info.iter().map(|c| c.to_line()).collect(),
            attention_to: record.attention_to.clone(),
            date: format_long_date(record.date),
            subject: record.subject.trim().to_string(),
            body: split_lines(&record.letter_body),
            signature: record.signature_image.clone(),
            name: record.name.clone(),
            position: record.position.clone(),
            top_stamp: mark(StampSlot::TopApproval),
            seal: mark(StampSlot::CompanySeal),
            bottom_stamp: mark(StampSlot::BottomApproval),
        }
    }

    /// Every image the page needs, with a stable key for texture caching.
    pub fn images(&self) -> Vec<(&'static str, &ImageRef)> {
        let mut out = Vec::new();
        if let Some(logo) = &self.logo {
            out.push(("logo", logo));
        }
        if let Some(sig) = &self.signature {
            out.push(("signature", sig));
        }
        for (key, mark) in [
            ("top_stamp", &self.top_stamp),
            ("seal", &self.seal),
            ("bottom_stamp", &self.bottom_stamp),
        ] {
            if let StampMark::Image(img) = mark {
                out.push((key, img));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::letter::{ContactEntry, ContactKind};

    fn png() -> ImageRef {
        let img = image::RgbaImage::from_pixel(2, 2, image::Rgba([200, 0, 0, 255]));
        ImageRef::png_from_rgba(&img).unwrap()
    }

    #[test]
    fn test_format_long_date() {
        assert_eq!(format_long_date(None), "");
        assert_eq!(
            format_long_date(NaiveDate::from_ymd_opt(2024, 3, 5)),
            "March 5, 2024"
        );
        assert_eq!(
            format_long_date(NaiveDate::from_ymd_opt(2026, 12, 31)),
            "December 31, 2026"
        );
    }

    #[test]
    fn test_stamp_image_wins_over_label() {
        let img = png();
        assert_eq!(
            StampMark::resolve("APPROVED", Some(&img)),
            StampMark::Image(img.clone())
        );
        assert_eq!(StampMark::resolve("", Some(&img)), StampMark::Image(img));
    }

    #[test]
    fn test_stamp_label_fallback() {
        assert_eq!(
            StampMark::resolve(" SEAL ", None),
            StampMark::Badge("SEAL".into())
        );
        assert!(StampMark::resolve("   ", None).is_empty());
    }

    #[test]
    fn test_each_slot_uses_its_own_fields() {
        let mut record = LetterRecord::sample();
        record.bottom_approval_stamp_file = Some(png());
        record.approval_stamp = String::new();
        let doc = PreviewDocument::from_record(&record);
        assert_eq!(doc.top_stamp, StampMark::Empty);
        assert_eq!(doc.seal, StampMark::Badge("SEAL".into()));
        assert!(matches!(doc.bottom_stamp, StampMark::Image(_)));
        let keys: Vec<_> = doc.images().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["bottom_stamp"]);
    }

    #[test]
    fn test_lines_and_contacts() {
        let mut record = LetterRecord::default();
        record.letterhead = "ACME\nTRADING".into();
        record.letter_body = "Dear Sir,\n\nThanks.".into();
        record.contact_info = vec![ContactEntry::new(ContactKind::Email, "hi@acme.test")];
        let doc = PreviewDocument::from_record(&record);
        assert_eq!(doc.letterhead, vec!["ACME", "TRADING"]);
        assert_eq!(doc.body, vec!["Dear Sir,", "", "Thanks."]);
        assert_eq!(doc.contact_lines, vec!["Email: hi@acme.test"]);
        assert_eq!(doc.date, "");
    }

    #[test]
    fn test_split_lines_keeps_trailing_empty_line() {
        assert_eq!(split_lines("Regards,\n"), vec!["Regards,", ""]);
        assert_eq!(split_lines("a\r\n\r\nb"), vec!["a", "", "b"]);
        assert_eq!(split_lines(""), vec![""]);
    }
}
