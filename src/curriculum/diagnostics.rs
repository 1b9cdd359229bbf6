//! Curriculum file errors with source-located diagnostics

use miette::{Diagnostic, NamedSource, SourceSpan};
use std::path::PathBuf;
use thiserror::Error;

/// YAML or schema error inside a curriculum file
#[derive(Debug, Error, Diagnostic)]
#[error("invalid curriculum file: {message}")]
#[diagnostic(code(drillsmith::curriculum::syntax))]
pub struct CurriculumSyntaxError {
    #[source_code]
    src: NamedSource<String>,

    #[label("error here")]
    span: SourceSpan,

    #[help]
    help: Option<String>,

    message: String,
}

impl CurriculumSyntaxError {
    /// Build from a serde_yml error, pointing at its reported location
    pub fn from_serde_error(err: &serde_yml::Error, source: &str, filename: &str) -> Self {
        let (line, column) = err
            .location()
            .map(|loc| (loc.line(), loc.column()))
            .unwrap_or((1, 1));

        let offset = line_col_to_offset(source, line, column);
        let message = err.to_string();
        let help = generate_help(&message);

        Self {
            src: NamedSource::new(filename, source.to_string()),
            span: SourceSpan::from(offset..offset.saturating_add(1)),
            help,
            message,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Errors raised while resolving or loading a curriculum
#[derive(Debug, Error, Diagnostic)]
pub enum CurriculumError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Syntax(#[from] CurriculumSyntaxError),

    #[error("unknown curriculum '{name}' (built-in: {available})")]
    #[diagnostic(
        code(drillsmith::curriculum::not_found),
        help("Pass a built-in name, a file under curricula/, or a path to a .yaml file")
    )]
    NotFound { name: String, available: String },

    #[error("failed to read curriculum {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convert 1-based line/column to a byte offset
fn line_col_to_offset(source: &str, line: usize, column: usize) -> usize {
    let mut line_start = 0;
    for (index, text) in source.split_inclusive('\n').enumerate() {
        if index + 1 == line {
            let within = text
                .char_indices()
                .nth(column.saturating_sub(1))
                .map(|(i, _)| i)
                .unwrap_or(text.len());
            return line_start + within;
        }
        line_start += text.len();
    }
    source.len().saturating_sub(1)
}

/// Suggest a fix based on the serde_yml message
fn generate_help(message: &str) -> Option<String> {
    let msg = message.to_lowercase();

    if msg.contains("unknown variant") && msg.contains("expected one of") {
        if msg.contains("count") || msg.contains("addition") {
            return Some(
                "Generator `kind` must be one of the archetypes: count, sequence, addition, \
                 missing_addend, subtraction, multiplication, division, fraction, integers, \
                 linear_equation, quadratic_roots, function_evaluation, exponent, logarithm, \
                 limit, derivative, definite_integral, vector_dot, matrix_determinant, \
                 probability, mean, word_problem"
                    .to_string(),
            );
        }
        return Some("Check the spelling of this value against the allowed list".to_string());
    }

    if msg.contains("missing field") {
        if msg.contains("`min`") || msg.contains("`max`") {
            return Some("Integer ranges are written as { min: 1, max: 10 }".to_string());
        }
        return Some(
            "Each range needs start, end, type, description, skills (and optionally generator)"
                .to_string(),
        );
    }

    if msg.contains("tab") {
        return Some(
            "YAML requires spaces for indentation, not tabs. Replace tabs with spaces.".to_string(),
        );
    }

    if msg.contains("duplicate") {
        return Some("Each key can only appear once. Remove or rename the duplicate key.".to_string());
    }

    if msg.contains("invalid type") {
        return Some("Worksheet numbers are positive integers; levels are names like \"C\" or \"3A\"".to_string());
    }

    None
}
