//! Uppercase-run diagnostics.

use regex::Regex;
use tower_lsp::lsp_types::{
    Diagnostic, DiagnosticRelatedInformation, DiagnosticSeverity, Location, Range,
};

use crate::error::ClasspadResult;
use crate::lsp::document::ClasspadDocument;
use crate::types::Settings;

/// Source tag on every published diagnostic.
pub const DIAGNOSTIC_SOURCE: &str = "classpad";

/// ASCII word boundaries, so a run next to a Greek letter still counts.
const UPPERCASE_RUN: &str = r"(?-u:\b)[A-Z]{2,}(?-u:\b)";

const RELATED_HINTS: [&str; 2] = ["Spelling matters", "Particularly for names"];

#[derive(Debug, Clone)]
pub struct Validator {
    pattern: Regex,
}

impl Validator {
    pub fn new() -> ClasspadResult<Self> {
        Ok(Self {
            pattern: Regex::new(UPPERCASE_RUN)?,
        })
    }

    /// Report runs of two or more uppercase letters, left to right.
    ///
    /// At most `settings.max_number_of_problems` findings are produced; the scan
    /// stops as soon as the limit is reached.
    pub fn validate(
        &self,
        document: &ClasspadDocument,
        settings: &Settings,
        related_information: bool,
    ) -> Vec<Diagnostic> {
        let text = document.text();
        self.pattern
            .find_iter(&text)
            .take(settings.max_number_of_problems as usize)
            .map(|found| {
                let range = Range::new(
                    document.position_at(found.start()),
                    document.position_at(found.end()),
                );
                Diagnostic {
                    range,
                    severity: Some(DiagnosticSeverity::WARNING),
                    source: Some(DIAGNOSTIC_SOURCE.to_string()),
                    message: format!("{} is all uppercase.", found.as_str()),
                    related_information: related_information
                        .then(|| related_hints(document, range)),
                    ..Default::default()
                }
            })
            .collect()
    }
}

fn related_hints(document: &ClasspadDocument, range: Range) -> Vec<DiagnosticRelatedInformation> {
    RELATED_HINTS
        .iter()
        .map(|hint| DiagnosticRelatedInformation {
            location: Location::new(document.uri.clone(), range),
            message: hint.to_string(),
        })
        .collect()
}
