use crate::reporter::Reporter;
use kast::common::Diagnostic;
use kast::common::diagnostics::diagnostic_codes;

#[test]
fn test_plain_diagnostic_format() {
    let reporter = Reporter::new(false);
    let diagnostic = Diagnostic::error(
        "tree.json",
        12,
        "slot 'ty' of Block expects Type, found UnitLiteral",
        diagnostic_codes::SLOT_CATEGORY_MISMATCH,
    )
    .with_related(13, "offending node");

    assert_eq!(
        reporter.format_diagnostic(&diagnostic),
        "tree.json#12 - error K1002: slot 'ty' of Block expects Type, found UnitLiteral\n  Related: tree.json#13 - offending node"
    );
}

#[test]
fn test_render_separates_diagnostics() {
    let reporter = Reporter::new(false);
    let diagnostics = vec![
        Diagnostic::error("a.json", 1, "first", 1001),
        Diagnostic::warning("", 2, "second", 1005),
    ];

    assert_eq!(
        reporter.render(&diagnostics),
        "a.json#1 - error K1001: first\n<unknown>#2 - warning K1005: second"
    );
}

#[test]
fn test_summary_pluralizes() {
    let reporter = Reporter::new(false);
    assert_eq!(
        reporter.summary(1, 0, 1),
        "Found 1 error and 0 warnings in 1 file."
    );
    assert_eq!(
        reporter.summary(2, 1, 3),
        "Found 2 errors and 1 warning in 3 files."
    );
}
