use colored::Colorize;
use kast::common::{Diagnostic, DiagnosticCategory};
use kast::common::diagnostics::DiagnosticRelatedInformation;

/// Formats validator diagnostics for the terminal.
pub struct Reporter {
    color: bool,
}

impl Reporter {
    pub fn new(color: bool) -> Self {
        Reporter { color }
    }

    pub fn render(&self, diagnostics: &[Diagnostic]) -> String {
        let mut out = String::new();
        for (index, diagnostic) in diagnostics.iter().enumerate() {
            if index > 0 {
                out.push('\n');
            }
            out.push_str(&self.format_diagnostic(diagnostic));
        }
        out
    }

    pub fn format_diagnostic(&self, diagnostic: &Diagnostic) -> String {
        let mut output = format!(
            "{} - {} {}: {}",
            self.format_location(&diagnostic.file, diagnostic.node),
            self.format_category(diagnostic.category),
            self.format_code(diagnostic.code),
            diagnostic.message_text
        );
        for related in &diagnostic.related_information {
            output.push('\n');
            output.push_str(&self.format_related(related));
        }
        output
    }

    pub fn summary(&self, errors: usize, warnings: usize, files: usize) -> String {
        let text = format!(
            "Found {errors} {} and {warnings} {} in {files} {}.",
            plural(errors, "error"),
            plural(warnings, "warning"),
            plural(files, "file")
        );
        if !self.color {
            return text;
        }
        if errors > 0 {
            text.red().bold().to_string()
        } else if warnings > 0 {
            text.yellow().to_string()
        } else {
            text.green().to_string()
        }
    }

    fn format_related(&self, related: &DiagnosticRelatedInformation) -> String {
        let prefix = if self.color {
            "  Related".dimmed().to_string()
        } else {
            "  Related".to_string()
        };
        format!(
            "{}: {} - {}",
            prefix,
            self.format_location(&related.file, related.node),
            related.message_text
        )
    }

    fn format_location(&self, file: &str, node: u32) -> String {
        let file = if file.is_empty() { "<unknown>" } else { file };
        if self.color {
            format!("{}{}", file.cyan(), format!("#{node}").yellow())
        } else {
            format!("{file}#{node}")
        }
    }

    fn format_category(&self, category: DiagnosticCategory) -> String {
        let label = category.to_string();
        if !self.color {
            return label;
        }
        match category {
            DiagnosticCategory::Error => label.red().bold().to_string(),
            DiagnosticCategory::Warning => label.yellow().bold().to_string(),
            DiagnosticCategory::Suggestion | DiagnosticCategory::Message => {
                label.blue().to_string()
            }
        }
    }

    fn format_code(&self, code: u32) -> String {
        let code = format!("K{code}");
        if self.color {
            code.dimmed().to_string()
        } else {
            code
        }
    }
}

fn plural(count: usize, word: &str) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{word}s")
    }
}
