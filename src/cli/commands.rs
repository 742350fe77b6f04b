use colored::Colorize;
use std::path::{Path, PathBuf};
use tower_lsp::lsp_types::{Diagnostic, Url};

use crate::error::{ClasspadError, ClasspadResult};
use crate::lsp::completion::{Catalog, EntryKind};
use crate::lsp::document::ClasspadDocument;
use crate::lsp::validator::Validator;
use crate::types::Settings;

/// Execute the check command: validate programs without an editor
pub fn check(files: Vec<PathBuf>, max_problems: u32, verbose: bool) -> ClasspadResult<()> {
    if max_problems == 0 {
        return Err(ClasspadError::Validation(
            "--max-problems must be greater than zero".to_string(),
        ));
    }
    let settings = Settings {
        max_number_of_problems: max_problems,
    };
    let validator = Validator::new()?;

    let mut total = 0;
    let mut failing_files = 0;
    for file in &files {
        let document = load_document(file)?;
        let findings = validator.validate(&document, &settings, verbose);
        if findings.is_empty() {
            if verbose {
                println!("{} {}", "ok".green(), file.display());
            }
            continue;
        }
        failing_files += 1;
        total += findings.len();
        for finding in &findings {
            print_finding(file, finding, verbose);
        }
    }

    println!();
    if total == 0 {
        println!(
            "{}",
            format!("No problems found in {} file(s)", files.len())
                .bold()
                .green()
        );
        Ok(())
    } else {
        let summary = format!("{total} problem(s) found in {failing_files} file(s)");
        println!("{}", summary.bold().yellow());
        Err(ClasspadError::Validation(summary))
    }
}

fn load_document(file: &Path) -> ClasspadResult<ClasspadDocument> {
    let text = std::fs::read_to_string(file)?;
    let absolute = std::fs::canonicalize(file)?;
    let uri = Url::from_file_path(&absolute).map_err(|_| {
        ClasspadError::Validation(format!("cannot build a URI for {}", absolute.display()))
    })?;
    Ok(ClasspadDocument::new(uri, &text, 0))
}

fn print_finding(file: &Path, finding: &Diagnostic, verbose: bool) {
    let start = finding.range.start;
    println!(
        "{}:{}:{}: {}: {}",
        file.display(),
        start.line + 1,
        start.character + 1,
        "warning".yellow().bold(),
        finding.message
    );
    if verbose {
        for related in finding.related_information.iter().flatten() {
            println!("    {} {}", "note:".cyan(), related.message);
        }
    }
}

/// Execute the catalog command: print completion entries
pub fn catalog(kind: Option<String>, catalog_path: Option<PathBuf>) -> ClasspadResult<()> {
    let catalog = match catalog_path {
        Some(path) => Catalog::load(&path)?,
        None => Catalog::builtin()?,
    };
    let kind = kind.map(|k| k.parse::<EntryKind>()).transpose()?;

    let entries: Vec<_> = catalog
        .entries()
        .iter()
        .filter(|entry| kind.map_or(true, |k| entry.kind == k))
        .collect();

    println!("{}", format!("{} completion entries", entries.len()).bold());
    for entry in entries {
        let detail = entry.detail.as_deref().unwrap_or("");
        let outdent = if entry.command.is_some() {
            " (outdent)".dimmed().to_string()
        } else {
            String::new()
        };
        println!(
            "  {:<18} {:<9} {}{}",
            entry.label.cyan(),
            entry.kind.as_str(),
            detail,
            outdent
        );
    }
    Ok(())
}
