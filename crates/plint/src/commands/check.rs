use std::fs;
use std::io::IsTerminal;

use anyhow::anyhow;
use anyhow::Context;
use anyhow::Result;
use camino::Utf8Path;
use camino::Utf8PathBuf;
use clap::Parser;
use clap::ValueEnum;
use ignore::WalkBuilder;
use plint_analysis::Analyzer;
use plint_analysis::AnalyzerOptions;
use plint_analysis::Diagnostic;
use plint_analysis::DiagnosticKind;
use plint_analysis::HostScope;
use plint_analysis::RuleToggles;
use plint_analysis::TemplateLiteral;
use plint_conf::Settings;
use plint_source::DiagnosticRenderer;
use plint_source::LineCol;
use plint_source::LineIndex;
use plint_source::Severity;
use plint_source::SourceDiagnostic;
use serde::Serialize;
use tracing::debug;

use crate::args::Args;
use crate::commands::Command;
use crate::exit::Exit;

#[derive(Debug, Parser)]
pub struct Check {
    /// Files or directories to check. Defaults to the current directory.
    pub paths: Vec<Utf8PathBuf>,

    /// Output format for diagnostics.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

impl Command for Check {
    fn execute(&self, _args: &Args) -> Result<Exit> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;
        let settings = Settings::new(&cwd).context("Failed to load settings")?;
        let analyzer = Analyzer::new(analyzer_options(&settings));
        let host = HostScope::default();

        let files = if self.paths.is_empty() {
            let root = Utf8PathBuf::from_path_buf(cwd)
                .map_err(|path| anyhow!("current directory is not UTF-8: {}", path.display()))?;
            discover(std::slice::from_ref(&root))
        } else {
            discover(&self.paths)
        };
        debug!(files = files.len(), "checking pug files");

        let renderer = pick_renderer();
        let mut total_errors = 0usize;
        let mut files_with_errors = 0usize;

        for path in &files {
            let source =
                fs::read_to_string(path).with_context(|| format!("Failed to read {path}"))?;
            let literal = file_literal(&source, settings.indent_step);
            let diagnostics: Vec<Diagnostic> = analyzer
                .analyze(&literal, &host)
                .into_iter()
                .filter(|diagnostic| !is_literal_boundary(diagnostic.kind))
                .collect();
            if diagnostics.is_empty() {
                continue;
            }
            files_with_errors += 1;
            total_errors += diagnostics.len();
            match self.format {
                OutputFormat::Text => print_text(&renderer, path, &source, &diagnostics),
                OutputFormat::Json => print_json(path, &diagnostics)?,
            }
        }

        if total_errors == 0 {
            return Ok(Exit::success());
        }
        let errors = if total_errors == 1 { "error" } else { "errors" };
        let files_label = if files_with_errors == 1 {
            "file"
        } else {
            "files"
        };
        Ok(Exit::error().with_message(format!(
            "Found {total_errors} {errors} in {files_with_errors} {files_label}."
        )))
    }
}

fn analyzer_options(settings: &Settings) -> AnalyzerOptions {
    AnalyzerOptions {
        indent_step: settings.indent_step,
        scope_budget: settings.max_scope_depth,
        globals: settings.globals.clone(),
        rules: RuleToggles {
            broken_template: settings.rules.broken_template,
            empty_lines: settings.rules.empty_lines,
            indent: settings.rules.indent,
            no_undef: settings.rules.no_undef,
            no_interpolation: settings.rules.no_interpolation,
            quotes: settings.rules.quotes,
        },
    }
}

/// Collect `.pug` files under the given paths, honoring ignore files.
fn discover(paths: &[Utf8PathBuf]) -> Vec<Utf8PathBuf> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_file() {
            if path.extension() == Some("pug") {
                files.push(path.clone());
            }
            continue;
        }
        for entry in WalkBuilder::new(path).build().flatten() {
            if !entry.file_type().is_some_and(|kind| kind.is_file()) {
                continue;
            }
            let Ok(file) = Utf8PathBuf::from_path_buf(entry.into_path()) else {
                continue;
            };
            if file.extension() == Some("pug") {
                files.push(file);
            }
        }
    }
    files.sort();
    files
}

/// Treat a whole file as one template literal.
///
/// The virtual opening line 0 keeps host line numbers equal to file line
/// numbers, and the negative base indent makes top-level content at column
/// zero conformant.
fn file_literal(source: &str, indent_step: u32) -> TemplateLiteral {
    let text = format!("\n{source}");
    let newlines = u32::try_from(text.matches('\n').count()).unwrap_or(u32::MAX);
    let last_len =
        u32::try_from(text.rsplit('\n').next().unwrap_or("").len()).unwrap_or(u32::MAX);
    TemplateLiteral {
        text,
        start: LineCol::new(0, 0),
        end: LineCol::new(newlines, last_len),
        content_column: 0,
        base_indent: -i32::try_from(indent_step).unwrap_or(2),
        interpolations: Vec::new(),
    }
}

/// Blank-line policies for the literal's opening and closing lines only
/// make sense when content shares those lines with a delimiter. Whole
/// files keep their own first and last lines.
fn is_literal_boundary(kind: DiagnosticKind) -> bool {
    matches!(
        kind,
        DiagnosticKind::MissingLeadingBlank | DiagnosticKind::MissingTrailingBlank
    )
}

fn pick_renderer() -> DiagnosticRenderer {
    if std::io::stdout().is_terminal() {
        DiagnosticRenderer::styled()
    } else {
        DiagnosticRenderer::plain()
    }
}

fn print_text(
    renderer: &DiagnosticRenderer,
    path: &Utf8Path,
    source: &str,
    diagnostics: &[Diagnostic],
) {
    let index = LineIndex::new(source);
    for diagnostic in diagnostics {
        let start = index.offset(diagnostic.location.start) as usize;
        let end = index.offset(diagnostic.location.end) as usize;
        let rendered = renderer.render(&SourceDiagnostic {
            source,
            path: path.as_str(),
            code: diagnostic.code,
            message: &diagnostic.message,
            severity: Severity::Error,
            start,
            end,
        });
        println!("{rendered}\n");
    }
}

#[derive(Serialize)]
struct JsonDiagnostic<'a> {
    path: &'a str,
    #[serde(flatten)]
    diagnostic: &'a Diagnostic,
}

fn print_json(path: &Utf8Path, diagnostics: &[Diagnostic]) -> Result<()> {
    for diagnostic in diagnostics {
        let line = serde_json::to_string(&JsonDiagnostic {
            path: path.as_str(),
            diagnostic,
        })?;
        println!("{line}");
    }
    Ok(())
}
