//! Printable HTML export
//!
//! The letter is written as one self-contained HTML file with every image
//! inlined as a data URI. Printing hands that file to the system's default
//! handler, which owns the print dialog and "save as PDF".

use crate::constants::{APP_NAME, PRINT_COPIES_KEPT, VALEDICTION};
use crate::preview::{PreviewDocument, StampMark};
use crate::utils::escape_html;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to open {path} with the system handler: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

const STYLE: &str = r#"
@page { size: A4; margin: 0; }
* { box-sizing: border-box; }
body { margin: 0; background: #f4f4f5; font-family: "Times New Roman", Georgia, serif; color: #111; }
.page { position: relative; width: 21cm; min-height: 29.7cm; margin: 1cm auto; padding: 2cm; background: #fff; box-shadow: 0 2px 12px rgba(0,0,0,.15); }
.header { display: flex; justify-content: space-between; align-items: flex-start; border-bottom: 2px solid #d4d4d8; padding-bottom: 12px; margin-bottom: 20px; }
.brand { display: flex; gap: 12px; align-items: flex-start; }
.logo { max-width: 80px; max-height: 80px; object-fit: contain; }
.letterhead { font-size: 22px; font-weight: bold; color: #2563eb; line-height: 1.2; }
.subhead { font-size: 13px; color: #52525b; margin-top: 4px; }
.contact { text-align: right; font-size: 12px; color: #52525b; max-width: 45%; }
.meta { display: flex; justify-content: space-between; margin-bottom: 20px; }
.label { font-weight: 600; }
.top-stamp { position: absolute; top: 5cm; right: 2cm; }
.subject { text-align: center; font-size: 17px; font-weight: bold; text-decoration: underline; margin: 0 0 20px; }
.body { text-align: justify; line-height: 1.6; margin-bottom: 32px; }
.closing { display: flex; justify-content: space-between; align-items: flex-end; margin-top: 40px; }
.valediction { font-weight: 600; margin-bottom: 16px; }
.signature { max-width: 200px; max-height: 75px; display: block; }
.rule { border-bottom: 1px solid #000; width: 12rem; margin: 4px 0; }
.name { font-weight: 600; }
.position { font-size: 13px; }
.stamps { display: flex; flex-direction: column; align-items: center; gap: 16px; }
.stamp-img { width: 96px; height: 96px; object-fit: contain; }
.badge { width: 96px; height: 96px; border-radius: 50%; border: 4px solid #ef4444; background: #fef2f2; display: flex; align-items: center; justify-content: center; }
.badge span { color: #ef4444; font: bold 12px sans-serif; text-align: center; transform: rotate(-12deg); }
@media print { body { background: #fff; } .page { margin: 0; box-shadow: none; } }
"#;

fn push_lines(out: &mut String, lines: &[String]) {
    let joined = lines
        .iter()
        .map(|l| escape_html(l))
        .collect::<Vec<_>>()
        .join("<br>\n");
    out.push_str(&joined);
}

fn push_stamp(out: &mut String, mark: &StampMark, alt: &str) {
    match mark {
        StampMark::Image(img) => {
            let _ = write!(
                out,
                r#"<img class="stamp-img" src="{}" alt="{}">"#,
                img.to_data_uri(),
                alt
            );
        }
        StampMark::Badge(label) => {
            let _ = write!(out, r#"<div class="badge"><span>{}</span></div>"#, escape_html(label));
        }
        StampMark::Empty => {}
    }
}

/// Render the letter as a standalone HTML document. With `auto_print` the
/// page opens the print dialog as soon as it has loaded.
pub fn render_html(doc: &PreviewDocument, auto_print: bool) -> String {
    let mut out = String::with_capacity(16 * 1024);
    let title = doc.letterhead.first().map(String::as_str).unwrap_or(APP_NAME);
    let _ = write!(
        out,
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n<style>{}</style>\n</head>\n<body>\n<div class=\"page\">\n",
        escape_html(title),
        STYLE
    );

    // Letterhead and contact block
    out.push_str("<div class=\"header\">\n<div class=\"brand\">");
    if let Some(logo) = &doc.logo {
        let _ = write!(out, r#"<img class="logo" src="{}" alt="Logo">"#, logo.to_data_uri());
    }
    out.push_str("<div><div class=\"letterhead\">");
    push_lines(&mut out, &doc.letterhead);
    out.push_str("</div>");
    if doc.subhead.iter().any(|line| !line.is_empty()) {
        out.push_str("<div class=\"subhead\">");
        push_lines(&mut out, &doc.subhead);
        out.push_str("</div>");
    }
    out.push_str("</div></div>\n<div class=\"contact\">");
    push_lines(&mut out, &doc.contact_lines);
    out.push_str("</div>\n</div>\n");

    let _ = write!(
        out,
        "<div class=\"meta\"><div><span class=\"label\">ATTENTION TO:</span> {}</div><div><span class=\"label\">Date:</span> {}</div></div>\n",
        escape_html(&doc.attention_to),
        escape_html(&doc.date)
    );

    if !doc.top_stamp.is_empty() {
        out.push_str("<div class=\"top-stamp\">");
        push_stamp(&mut out, &doc.top_stamp, "Approval stamp");
        out.push_str("</div>\n");
    }

    if !doc.subject.is_empty() {
        let _ = writeln!(out, "<h2 class=\"subject\">{}</h2>", escape_html(&doc.subject));
    }

    out.push_str("<div class=\"body\">");
    push_lines(&mut out, &doc.body);
    out.push_str("</div>\n");

    // Signature block with seal and bottom stamp
    let _ = write!(
        out,
        "<div class=\"closing\">\n<div><p class=\"valediction\">{}</p>",
        VALEDICTION
    );
    if let Some(sig) = &doc.signature {
        let _ = write!(out, r#"<img class="signature" src="{}" alt="Signature">"#, sig.to_data_uri());
    }
    let _ = write!(
        out,
        "<div class=\"rule\"></div><div class=\"name\">{}</div><div class=\"position\">{}</div></div>\n<div class=\"stamps\">",
        escape_html(&doc.name),
        escape_html(&doc.position)
    );
    push_stamp(&mut out, &doc.seal, "Company seal");
    push_stamp(&mut out, &doc.bottom_stamp, "Approval stamp");
    out.push_str("</div>\n</div>\n</div>\n");

    if auto_print {
        out.push_str("<script>window.addEventListener('load', function () { window.print(); });</script>\n");
    }
    out.push_str("</body>\n</html>\n");
    out
}

/// Write the document to `path`.
pub fn write_html(doc: &PreviewDocument, path: &Path, auto_print: bool) -> Result<(), ExportError> {
    let html = render_html(doc, auto_print);
    std::fs::write(path, html.as_bytes()).map_err(|source| ExportError::Write {
        path: path.display().to_string(),
        source,
    })?;
    debug!(path = %path.display(), bytes = html.len(), "Letter written");
    Ok(())
}

/// Write a timestamped print copy into `dir`. Returns the file path.
pub fn write_print_copy(
    doc: &PreviewDocument,
    dir: &Path,
    auto_print: bool,
) -> Result<PathBuf, ExportError> {
    std::fs::create_dir_all(dir).map_err(|source| ExportError::Write {
        path: dir.display().to_string(),
        source,
    })?;
    let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
    let path = dir.join(format!("letter-{}.html", stamp));
    write_html(doc, &path, auto_print)?;
    prune_print_copies(dir, PRINT_COPIES_KEPT);
    Ok(path)
}

/// Delete all but the newest `keep` print copies in `dir`. Other files are left alone.
fn prune_print_copies(dir: &Path, keep: usize) {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(dir = %dir.display(), error = %e, "Failed to list print copies");
            return;
        }
    };
    let mut copies: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with("letter-") && n.ends_with(".html"))
        })
        .collect();
    if copies.len() <= keep {
        return;
    }
    // Timestamped names sort oldest first
    copies.sort();
    let stale = copies.len() - keep;
    for path in copies.into_iter().take(stale) {
        match std::fs::remove_file(&path) {
            Ok(()) => debug!(path = %path.display(), "Old print copy removed"),
            Err(e) => warn!(path = %path.display(), error = %e, "Failed to remove old print copy"),
        }
    }
}

/// Hand a written document to the system's default handler.
pub fn open_with_system(path: &Path) -> Result<(), ExportError> {
    open::that(path).map_err(|source| ExportError::Open {
        path: path.display().to_string(),
        source,
    })?;
    info!(path = %path.display(), "Letter handed to system viewer");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_ref::ImageRef;
    use crate::letter::LetterRecord;
    use chrono::NaiveDate;

    fn sample_doc() -> PreviewDocument {
        let mut record = LetterRecord::sample();
        record.date = NaiveDate::from_ymd_opt(2024, 3, 5);
        record.attention_to = "Procurement <Dept>".into();
        PreviewDocument::from_record(&record)
    }

    #[test]
    fn test_html_contains_letter_content() {
        let html = render_html(&sample_doc(), false);
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>ZENXO TOTALITY</title>"));
        assert!(html.contains("ZENXO TOTALITY<br>\nTRADING &amp; CONTRACTING CO. L.L.C."));
        assert!(html.contains("Phone: +971 52 344 5460"));
        assert!(html.contains("March 5, 2024"));
        assert!(html.contains("Procurement &lt;Dept&gt;"));
        assert!(html.contains("RE: SUPPLY CONTRACT INVOICE APPROVAL LETTER"));
        assert!(html.contains(VALEDICTION));
        assert!(!html.contains("window.print()"));
    }

    #[test]
    fn test_html_badges_and_images() {
        let mut doc = sample_doc();
        let img = ImageRef::png_from_rgba(&image::RgbaImage::new(1, 1)).unwrap();
        doc.seal = StampMark::Image(img);
        let html = render_html(&doc, true);
        assert!(html.contains(r#"<div class="badge"><span>APPROVED</span></div>"#));
        assert!(html.contains(r#"<div class="badge"><span>VERIFIED</span></div>"#));
        assert!(!html.contains("<span>SEAL</span>"));
        assert!(html.contains(r#"alt="Company seal""#));
        assert!(html.contains("data:image/png;base64,"));
        assert!(html.contains("window.print()"));
    }

    #[test]
    fn test_empty_stamps_and_subject_render_nothing() {
        let mut doc = sample_doc();
        doc.top_stamp = StampMark::Empty;
        doc.subject.clear();
        let html = render_html(&doc, false);
        assert!(!html.contains("class=\"top-stamp\""));
        assert!(!html.contains("class=\"subject\""));
    }

    #[test]
    fn test_write_print_copy() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested");
        let path = write_print_copy(&sample_doc(), &target, false).unwrap();
        assert!(path.starts_with(&target));
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("html"));
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("MR. AHMAD O. AL-KHOWAITER"));
    }

    #[test]
    fn test_print_copies_are_pruned() {
        let dir = tempfile::tempdir().unwrap();
        let old: Vec<_> = (1..=PRINT_COPIES_KEPT + 2)
            .map(|day| dir.path().join(format!("letter-200001{:02}-120000.html", day)))
            .collect();
        for path in &old {
            std::fs::write(path, "old").unwrap();
        }
        let notes = dir.path().join("notes.txt");
        std::fs::write(&notes, "keep me").unwrap();

        let path = write_print_copy(&sample_doc(), dir.path(), false).unwrap();
        assert!(path.exists());
        assert!(notes.exists());
        let letters = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().starts_with("letter-"))
            .count();
        assert_eq!(letters, PRINT_COPIES_KEPT);
        // 7 old + 1 new, so the three oldest are removed
        assert!(old[..3].iter().all(|p| !p.exists()));
        assert!(old[3..].iter().all(|p| p.exists()));
    }

    #[test]
    fn test_write_html_reports_bad_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("letter.html");
        let err = write_html(&sample_doc(), &path, false).unwrap_err();
        assert!(matches!(err, ExportError::Write { .. }));
    }
}
