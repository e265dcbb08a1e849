//! Print and export actions (preview mode only)

use super::App;
use crate::export::{self, ExportError};
use crate::preview::PreviewDocument;
use crate::utils::get_print_dir;
use std::path::PathBuf;
use tracing::{error, info};

impl App {
    /// Write a printable copy and hand it to the system viewer.
    pub fn print_letter(&mut self) {
        let doc = PreviewDocument::from_record(&self.record);
        let auto_print = self.settings.auto_print;
        let result = export::write_print_copy(&doc, &get_print_dir(), auto_print)
            .and_then(|path| export::open_with_system(&path).map(|_| path));

        match result {
            Ok(path) => {
                info!(path = %path.display(), auto_print, "Letter sent to print");
                self.show_toast(if auto_print {
                    "Opened print dialog"
                } else {
                    "Opened printable copy"
                });
            }
            Err(e) => {
                error!(error = %e, "Print failed");
                self.show_toast(format!("Print failed: {}", e));
            }
        }
    }

    /// Ask for a destination and save the letter there.
    pub fn export_letter(&mut self) {
        let doc = PreviewDocument::from_record(&self.record);
        let file_name = match self.record.date {
            Some(date) => format!("letter-{}.html", date.format("%Y-%m-%d")),
            None => "letter.html".to_string(),
        };

        let Some(path) = rfd::FileDialog::new()
            .set_title("Export Letter")
            .set_directory(self.settings.export_dir_or_default())
            .set_file_name(&file_name)
            .add_filter("HTML document", &["html", "htm"])
            .save_file()
        else {
            return;
        };

        match self.write_export(&doc, path) {
            Ok(path) => {
                info!(path = %path.display(), "Letter exported");
                self.show_toast(format!(
                    "Saved {}",
                    path.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default()
                ));
            }
            Err(e) => {
                error!(error = %e, "Export failed");
                self.show_toast(format!("Export failed: {}", e));
            }
        }
    }

    fn write_export(&mut self, doc: &PreviewDocument, path: PathBuf) -> Result<PathBuf, ExportError> {
        export::write_html(doc, &path, false)?;
        if let Some(parent) = path.parent() {
            self.settings.export_dir = Some(parent.to_string_lossy().to_string());
        }
        Ok(path)
    }
}
