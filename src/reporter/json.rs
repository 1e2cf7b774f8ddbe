//! JSON reporter for machine-readable output

use crate::Document;
use serde::Serialize;

/// Reporter for JSON output
pub struct JsonReporter {
    /// Whether to pretty-print JSON
    pretty: bool,
    /// Leave rendered markup out of the payload
    omit_content: bool,
}

/// Summary block emitted alongside the document
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonSummary {
    groups: usize,
    artifacts: usize,
    present: usize,
    missing: usize,
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    document: &'a Document,
    summary: JsonSummary,
}

impl JsonReporter {
    /// Create a new JSON reporter
    pub fn new() -> Self {
        Self {
            pretty: false,
            omit_content: false,
        }
    }

    /// Enable pretty-printing
    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }

    /// Drop `renderedContent` from every record
    pub fn without_content(mut self) -> Self {
        self.omit_content = true;
        self
    }

    /// Report the document with a summary block
    pub fn report(&self, doc: &Document) -> String {
        let stripped;
        let document = if self.omit_content {
            let mut copy = doc.clone();
            for section in &mut copy.groups {
                for record in &mut section.records {
                    record.rendered_content = None;
                }
            }
            stripped = copy;
            &stripped
        } else {
            doc
        };

        let output = JsonOutput {
            document,
            summary: JsonSummary {
                groups: doc.groups.len(),
                artifacts: doc.artifact_count(),
                present: doc.present_count(),
                missing: doc.artifact_count() - doc.present_count(),
            },
        };

        if self.pretty {
            serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string())
        } else {
            serde_json::to_string(&output).unwrap_or_else(|_| "{}".to_string())
        }
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}
