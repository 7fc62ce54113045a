use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticCategory {
    Warning,
    Error,
    Suggestion,
    Message,
}

impl fmt::Display for DiagnosticCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            DiagnosticCategory::Warning => "warning",
            DiagnosticCategory::Error => "error",
            DiagnosticCategory::Suggestion => "suggestion",
            DiagnosticCategory::Message => "message",
        };
        f.write_str(text)
    }
}

/// Stable codes for problems found while checking a tree's structure.
pub mod diagnostic_codes {
    /// A node reachable through owned slots of two different parents.
    pub const NODE_OWNED_TWICE: u32 = 1001;
    /// A slot holds a node whose kind is not in the slot's category.
    pub const SLOT_CATEGORY_MISMATCH: u32 = 1002;
    /// A slot or back-reference names a node that is not in the arena.
    pub const DANGLING_NODE: u32 = 1003;
    /// A back-reference points at a node of the wrong category.
    pub const BACK_REFERENCE_CATEGORY_MISMATCH: u32 = 1004;
    /// Nesting exceeds `limits::MAX_TREE_DEPTH`.
    pub const TREE_TOO_DEEP: u32 = 1005;
    /// A node is its own ancestor through owned slots.
    pub const OWNERSHIP_CYCLE: u32 = 1006;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticRelatedInformation {
    pub category: DiagnosticCategory,
    pub code: u32,
    pub file: String,
    pub node: u32,
    pub message_text: String,
}

/// A problem attached to one node of a tree stored in `file`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub category: DiagnosticCategory,
    pub code: u32,
    pub file: String,
    pub node: u32,
    pub message_text: String,
    pub related_information: Vec<DiagnosticRelatedInformation>,
}

impl Diagnostic {
    pub fn error(file: impl Into<String>, node: u32, message: impl Into<String>, code: u32) -> Self {
        Self {
            category: DiagnosticCategory::Error,
            message_text: message.into(),
            code,
            file: file.into(),
            node,
            related_information: Vec::new(),
        }
    }

    pub fn warning(
        file: impl Into<String>,
        node: u32,
        message: impl Into<String>,
        code: u32,
    ) -> Self {
        Self {
            category: DiagnosticCategory::Warning,
            ..Self::error(file, node, message, code)
        }
    }

    pub fn with_related(mut self, node: u32, message: impl Into<String>) -> Self {
        self.related_information.push(DiagnosticRelatedInformation {
            category: DiagnosticCategory::Message,
            code: 0,
            file: self.file.clone(),
            node,
            message_text: message.into(),
        });
        self
    }

    pub fn is_error(&self) -> bool {
        self.category == DiagnosticCategory::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}#{}: {} K{}: {}",
            self.file, self.node, self.category, self.code, self.message_text
        )?;
        for related in &self.related_information {
            write!(f, "\n  #{}: {}", related.node, related.message_text)?;
        }
        Ok(())
    }
}

pub fn format_message(message: &str, args: &[&str]) -> String {
    let mut result = message.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{i}}}"), arg);
    }
    result
}
