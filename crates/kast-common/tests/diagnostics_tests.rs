use super::*;
use crate::diagnostics::{diagnostic_codes, format_message};

#[test]
fn test_error_diagnostic_display() {
    let diag = Diagnostic::error(
        "tree.json",
        12,
        "slot 'condition' expects Expression",
        diagnostic_codes::SLOT_CATEGORY_MISMATCH,
    );
    assert!(diag.is_error());
    assert_eq!(
        diag.to_string(),
        "tree.json#12: error K1002: slot 'condition' expects Expression"
    );
}

#[test]
fn test_warning_keeps_fields() {
    let diag = Diagnostic::warning("a.json", 3, "deep", diagnostic_codes::TREE_TOO_DEEP)
        .with_related(1, "root");
    assert_eq!(diag.category, DiagnosticCategory::Warning);
    assert!(!diag.is_error());
    assert_eq!(diag.related_information.len(), 1);
    assert_eq!(diag.related_information[0].file, "a.json");
    assert!(diag.to_string().ends_with("\n  #1: root"));
}

#[test]
fn test_format_message_substitutes_positional_args() {
    assert_eq!(
        format_message("slot '{0}' expects {1}", &["ty", "Type"]),
        "slot 'ty' expects Type"
    );
}
