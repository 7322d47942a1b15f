use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_builder_collects_labels_and_notes() {
    let diag = Diagnostic::error(ErrorCode::E2002)
        .with_message("no `talk` for `Fish`")
        .with_label(Span::new(4, 8), "called here")
        .with_note("declare `talk(self: Fish)`");

    assert_eq!(diag.labels, vec![Label::new(Span::new(4, 8), "called here")]);
    assert_eq!(diag.notes, vec!["declare `talk(self: Fish)`".to_string()]);
}

#[test]
fn test_display() {
    let diag = Diagnostic::error(ErrorCode::E3001)
        .with_message("string literal where `int32` is required")
        .with_label(Span::new(6, 10), "not a number");

    assert_eq!(
        diag.to_string(),
        "error [E3001]: string literal where `int32` is required\n  --> 6..10: not a number"
    );
}

#[test]
fn test_display_with_note() {
    let diag = Diagnostic::error(ErrorCode::E9001)
        .with_message("internal")
        .with_note("this is a bug in the lowering engine");
    assert_eq!(
        diag.to_string(),
        "error [E9001]: internal\n  = note: this is a bug in the lowering engine"
    );
}
