//! Reporter module for output formatting

pub mod console;
pub mod html;
pub mod json;

pub use console::ConsoleReporter;
pub use html::HtmlReporter;
pub use json::JsonReporter;

use crate::error::{ReportError, Result};
use crate::Document;
use std::fs;
use std::path::{Path, PathBuf};

/// Render the HTML report and write it to `<output_dir>/<dir>_artifact_report.html`.
///
/// The file is written to a temporary sibling and renamed into place, so a
/// failed run never leaves a partial report behind.
pub fn write_report(doc: &Document, output_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(output_dir).map_err(write_err(output_dir))?;

    let target = output_dir.join(doc.report_file_name());
    let tmp = output_dir.join(format!(".{}.tmp", doc.report_file_name()));
    let html = HtmlReporter::new().report(doc);

    fs::write(&tmp, html).map_err(write_err(&tmp))?;
    if let Err(e) = fs::rename(&tmp, &target) {
        let _ = fs::remove_file(&tmp);
        return Err(write_err(&target)(e));
    }
    Ok(target)
}

fn write_err(path: &Path) -> impl FnOnce(std::io::Error) -> ReportError {
    let path = path.to_path_buf();
    move |source| ReportError::Write { path, source }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::ReportAssembler;
    use crate::catalog::ArtifactCatalog;
    use tempfile::TempDir;

    #[test]
    fn test_write_report_creates_output_dir() {
        let catalog = ArtifactCatalog::builtin().unwrap();
        let root = TempDir::new().unwrap();
        let artifacts = root.path().join("pipeline-12");
        fs::create_dir(&artifacts).unwrap();
        fs::write(artifacts.join("hadolint.txt"), "DL3008 warning").unwrap();

        let doc = ReportAssembler::new(&catalog).assemble(&artifacts).unwrap();
        let out = root.path().join("reports/nested");
        let path = write_report(&doc, &out).unwrap();

        assert_eq!(path, out.join("pipeline-12_artifact_report.html"));
        let html = fs::read_to_string(&path).unwrap();
        assert!(html.contains("DL3008 warning"));
        let leftovers: Vec<_> = fs::read_dir(&out).unwrap().collect();
        assert_eq!(leftovers.len(), 1, "temporary file should be renamed away");
    }

    #[test]
    fn test_write_report_output_dir_is_a_file() {
        let catalog = ArtifactCatalog::builtin().unwrap();
        let root = TempDir::new().unwrap();
        let doc = ReportAssembler::new(&catalog).assemble(root.path()).unwrap();
        let blocker = root.path().join("blocker");
        fs::write(&blocker, "").unwrap();

        let err = write_report(&doc, &blocker).unwrap_err();
        assert!(matches!(err, ReportError::Write { .. }));
    }
}
