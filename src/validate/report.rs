use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => f.write_str("warning"),
            Severity::Error => f.write_str("error"),
        }
    }
}

/// A single structural problem found in a configuration document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Issue {
    #[error("document is not valid YAML: {message}")]
    Syntax { message: String },

    #[error("expected a mapping")]
    NotAMapping,

    #[error("missing required key `{field}`")]
    MissingField { field: String },

    #[error("`{field}` must not be empty")]
    EmptyField { field: String },

    #[error("`{field}` must be {expected}")]
    WrongType { field: String, expected: String },

    #[error("no repositories configured")]
    NoRepos,

    #[error("`hooks` must list at least one hook")]
    EmptyHooks,

    #[error("hook `{id}` from `{repo}` is already declared at {first}")]
    DuplicateHook {
        repo: String,
        id: String,
        first: String,
    },

    #[error("`{field}` is not a valid regular expression: {message}")]
    InvalidRegex { field: String, message: String },

    #[error("unknown stage `{stage}`")]
    UnknownStage { stage: String },

    #[error("unknown language `{language}`")]
    UnknownLanguage { language: String },

    #[error("`{id}` is not a meta hook")]
    UnknownMetaHook { id: String },

    #[error("meta hooks cannot override `{field}`")]
    MetaOverride { field: String },

    #[error("`entry` cannot be split into arguments: {entry}")]
    UnsplittableEntry { entry: String },

    #[error("unexpected key `{key}`")]
    UnknownKey { key: String },

    #[error("`rev` is ignored for `{repo}` repositories")]
    RevIgnored { repo: String },

    #[error("`rev: {rev}` looks like a branch; pin a tag or commit")]
    MutableRev { rev: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Path into the document, e.g. `repos[2].hooks[0]`
    pub location: String,
    pub message: String,
    pub issue: Issue,
}

impl Diagnostic {
    pub fn new(severity: Severity, location: impl Into<String>, issue: Issue) -> Self {
        Self {
            severity,
            location: location.into(),
            message: issue.to_string(),
            issue,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.severity, self.location, self.message)
    }
}

/// Outcome of validating one configuration document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub repos: usize,
    pub hooks: usize,
    pub diagnostics: Vec<Diagnostic>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.error_count() == 0
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
    }

    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings().count()
    }

    pub(crate) fn push(&mut self, severity: Severity, location: impl Into<String>, issue: Issue) {
        self.diagnostics.push(Diagnostic::new(severity, location, issue));
    }

    pub(crate) fn promote_warnings(&mut self) {
        for diagnostic in &mut self.diagnostics {
            diagnostic.severity = Severity::Error;
        }
    }
}
