//! Completion catalog
//!
//! The catalog is a static, ordered list loaded once at startup, by default
//! from the `data/completions.yaml` file embedded in the binary. Every
//! completion request gets the same list regardless of cursor position.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tower_lsp::lsp_types::{
    Command, CompletionItem, CompletionItemKind, Documentation, InsertTextFormat,
};

use crate::error::{ClasspadError, ClasspadResult};

const BUILTIN_CATALOG: &str = include_str!("../../data/completions.yaml");

/// Editor command sent with closing keywords.
pub const OUTDENT_COMMAND: &str = "editor.action.outdentLines";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Function,
    Keyword,
    Variable,
    Operator,
    Snippet,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Function => "function",
            EntryKind::Keyword => "keyword",
            EntryKind::Variable => "variable",
            EntryKind::Operator => "operator",
            EntryKind::Snippet => "snippet",
        }
    }

    fn lsp_kind(&self) -> CompletionItemKind {
        match self {
            EntryKind::Function => CompletionItemKind::FUNCTION,
            EntryKind::Keyword => CompletionItemKind::KEYWORD,
            EntryKind::Variable => CompletionItemKind::VARIABLE,
            EntryKind::Operator => CompletionItemKind::OPERATOR,
            EntryKind::Snippet => CompletionItemKind::SNIPPET,
        }
    }

    /// Function and snippet entries carry tab stops.
    fn insert_format(&self) -> InsertTextFormat {
        match self {
            EntryKind::Function | EntryKind::Snippet => InsertTextFormat::SNIPPET,
            _ => InsertTextFormat::PLAIN_TEXT,
        }
    }
}

impl std::str::FromStr for EntryKind {
    type Err = ClasspadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "function" => Ok(EntryKind::Function),
            "keyword" => Ok(EntryKind::Keyword),
            "variable" => Ok(EntryKind::Variable),
            "operator" => Ok(EntryKind::Operator),
            "snippet" => Ok(EntryKind::Snippet),
            other => Err(ClasspadError::Catalog(format!(
                "unknown entry kind '{other}'"
            ))),
        }
    }
}

/// Follow-up editor action run after an entry is inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryCommand {
    Outdent,
}

impl EntryCommand {
    fn to_lsp(self) -> Command {
        match self {
            EntryCommand::Outdent => Command::new("Outdent".to_string(), OUTDENT_COMMAND.to_string(), None),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionEntry {
    pub label: String,
    pub kind: EntryKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
    pub insert_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<EntryCommand>,
}

impl CompletionEntry {
    pub fn to_completion_item(&self) -> CompletionItem {
        CompletionItem {
            label: self.label.clone(),
            kind: Some(self.kind.lsp_kind()),
            detail: self.detail.clone(),
            documentation: self.documentation.clone().map(Documentation::String),
            insert_text: Some(self.insert_text.clone()),
            insert_text_format: Some(self.kind.insert_format()),
            command: self.command.map(EntryCommand::to_lsp),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Vec<CompletionEntry>,
    items: Vec<CompletionItem>,
}

impl Catalog {
    /// The catalog shipped with the server.
    pub fn builtin() -> ClasspadResult<Self> {
        Self::from_yaml(BUILTIN_CATALOG)
    }

    /// Load a replacement catalog from a YAML file.
    pub fn load(path: &Path) -> ClasspadResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> ClasspadResult<Self> {
        let entries: Vec<CompletionEntry> = serde_yaml::from_str(content)?;
        Self::from_entries(entries)
    }

    pub fn from_entries(entries: Vec<CompletionEntry>) -> ClasspadResult<Self> {
        if entries.is_empty() {
            return Err(ClasspadError::Catalog(
                "catalog contains no entries".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        for entry in &entries {
            if entry.label.trim().is_empty() {
                return Err(ClasspadError::Catalog("entry with empty label".to_string()));
            }
            if !seen.insert(entry.label.as_str()) {
                return Err(ClasspadError::Catalog(format!(
                    "duplicate label '{}'",
                    entry.label
                )));
            }
        }
        let items = entries.iter().map(CompletionEntry::to_completion_item).collect();
        Ok(Self { entries, items })
    }

    pub fn entries(&self) -> &[CompletionEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Items for `textDocument/completion`, in catalog order.
    pub fn completion_items(&self) -> Vec<CompletionItem> {
        self.items.clone()
    }

    /// `completionItem/resolve`: entries are complete already.
    pub fn resolve(&self, item: CompletionItem) -> CompletionItem {
        item
    }
}
