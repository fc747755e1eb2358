use plint_analysis::Analyzer;
use plint_analysis::Diagnostic;
use plint_analysis::DiagnosticKind;
use plint_analysis::HostScope;
use plint_analysis::TemplateLiteral;
use plint_source::LineCol;

/// A literal as it would appear in a host file: `pug` tag at line 1,
/// column 0, content starting right after the backtick at column 4.
fn literal(text: &str) -> TemplateLiteral {
    let newlines = u32::try_from(text.matches('\n').count()).unwrap_or(0);
    let last_len = u32::try_from(text.split('\n').next_back().unwrap_or("").len()).unwrap_or(0);
    let end_column = if newlines == 0 { 4 + last_len + 1 } else { last_len + 1 };
    TemplateLiteral {
        text: text.to_string(),
        start: LineCol::new(1, 0),
        end: LineCol::new(1 + newlines, end_column),
        content_column: 4,
        base_indent: 0,
        interpolations: Vec::new(),
    }
}

fn analyze(text: &str) -> Vec<Diagnostic> {
    Analyzer::default().analyze(&literal(text), &HostScope::default())
}

fn of_kind(diagnostics: &[Diagnostic], kind: DiagnosticKind) -> Vec<&Diagnostic> {
    diagnostics.iter().filter(|d| d.kind == kind).collect()
}

#[test]
fn unseparated_top_level_siblings_fire_once() {
    let diagnostics = analyze("\ndiv\n  div\ndiv\n");
    let scoped = of_kind(&diagnostics, DiagnosticKind::MissingBlankBeforeOutdent);
    assert_eq!(scoped.len(), 1);
    // Template line 4 is host line 4; the finding spans the line start.
    assert_eq!(scoped[0].location.start.line, 4);
    assert_eq!(scoped[0].location.start.column, 0);
    assert_eq!(
        scoped[0].message,
        "Need empty line when you are off from the scope"
    );
}

#[test]
fn two_consecutive_blank_lines_fire_once_spanning_the_pair() {
    let diagnostics = analyze("\ndiv\n\n\ndiv\n");
    let doubles = of_kind(&diagnostics, DiagnosticKind::ExtraBlankLines);
    assert_eq!(doubles.len(), 1);
    assert_eq!(doubles[0].location.start.line, 3);
    assert_eq!(doubles[0].location.end.line, 4);
    assert_eq!(doubles[0].message, "Use 1 empty line");
}

#[test]
fn attribute_only_template_is_exempt_however_many_lines() {
    let diagnostics = analyze("input(\n  type=\"text\"\n  name=\"q\"\n)");
    assert!(diagnostics.is_empty());
}

#[test]
fn broken_template_reports_once_and_suppresses_everything_else() {
    let diagnostics = analyze("each x in ]");
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].kind, DiagnosticKind::BrokenTemplate);
    assert_eq!(diagnostics[0].message, "Pug can't parse this template");
    assert_eq!(diagnostics[0].location.start.line, 1);
}

#[test]
fn loop_member_access_does_not_flag_the_binding() {
    let text = "\nul\n  each item in list\n    li= item.name\n";
    let diagnostics = Analyzer::default().analyze(
        &literal(text),
        &HostScope::new(["list".to_string()]),
    );
    assert!(of_kind(&diagnostics, DiagnosticKind::UndefinedVariable).is_empty());
}

#[test]
fn undefined_variable_cites_name_and_host_position() {
    let text = "\ndiv(title=label)\n";
    let diagnostics = analyze(text);
    let undef = of_kind(&diagnostics, DiagnosticKind::UndefinedVariable);
    assert_eq!(undef.len(), 1);
    assert_eq!(undef[0].message, "'label' is not defined.");
    // Template line 2 is host line 2; columns are 0-indexed host columns.
    assert_eq!(undef[0].location.start.line, 2);
    assert_eq!(undef[0].location.start.column, 10);
}

#[test]
fn conforming_template_is_clean() {
    let text = "\n  div\n    span hello\n";
    let mut lit = literal(text);
    // Opening line `pug` starts at host column 0.
    lit.base_indent = 0;
    let diagnostics = Analyzer::default().analyze(&lit, &HostScope::default());
    assert!(diagnostics.is_empty());
}

#[test]
fn indentation_off_by_one_cites_expected_and_actual() {
    let text = "\n  div\n     span\n";
    let diagnostics = analyze(text);
    let indent = of_kind(&diagnostics, DiagnosticKind::BadIndentation);
    assert_eq!(indent.len(), 1);
    assert_eq!(
        indent[0].message,
        "Expected indentation of 4 spaces but found 5"
    );
    assert_eq!(indent[0].location.start.line, 3);
    assert_eq!(indent[0].location.end.column, 5);
}

#[test]
fn analysis_is_idempotent() {
    let text = "\ndiv\n  div\ndiv\n\n\nspan\n";
    assert_eq!(analyze(text), analyze(text));
}

#[test]
fn single_line_literal_skips_structural_rules() {
    let text = "div";
    let lit = TemplateLiteral {
        text: text.to_string(),
        start: LineCol::new(5, 8),
        end: LineCol::new(5, 16),
        content_column: 12,
        base_indent: 8,
        interpolations: Vec::new(),
    };
    let diagnostics = Analyzer::default().analyze(&lit, &HostScope::default());
    assert!(diagnostics.is_empty());
}

#[test]
fn interpolation_sites_each_get_one_diagnostic() {
    let mut lit = literal("\ndiv INTERP\n");
    lit.interpolations = vec![plint_source::Location::at(2, 4, 2, 11)];
    let diagnostics = Analyzer::default().analyze(&lit, &HostScope::default());
    let interp = of_kind(&diagnostics, DiagnosticKind::Interpolation);
    assert_eq!(interp.len(), 1);
    assert_eq!(interp[0].message, "Don't use JavaScript interpolation");
    assert_eq!(interp[0].location.start.line, 2);
}

#[test]
fn rule_toggles_silence_their_family() {
    let options = plint_analysis::AnalyzerOptions {
        rules: plint_analysis::RuleToggles {
            indent: false,
            ..plint_analysis::RuleToggles::default()
        },
        ..plint_analysis::AnalyzerOptions::default()
    };
    let text = "\n  div\n     span\n";
    let diagnostics = Analyzer::new(options).analyze(&literal(text), &HostScope::default());
    assert!(of_kind(&diagnostics, DiagnosticKind::BadIndentation).is_empty());
}

#[test]
fn multibyte_inline_text_is_analyzed_normally() {
    let diagnostics = analyze("\n  div\n    p café ok\n");
    assert!(of_kind(&diagnostics, DiagnosticKind::BrokenTemplate).is_empty());
    assert!(of_kind(&diagnostics, DiagnosticKind::BadIndentation).is_empty());
}

#[test]
fn multibyte_attribute_values_round_trip() {
    let diagnostics = analyze("\n  div(title=\"café\")\n");
    assert!(diagnostics.is_empty());
}

#[test]
fn quote_style_follows_the_fragment_context() {
    let diagnostics = analyze("\n  div(title='x')\n");
    let quotes = of_kind(&diagnostics, DiagnosticKind::WrongQuotes);
    assert_eq!(quotes.len(), 1);
    assert_eq!(quotes[0].message, "Strings must use double quotes");

    let diagnostics = analyze("\n  p= \"x\"\n");
    let quotes = of_kind(&diagnostics, DiagnosticKind::WrongQuotes);
    assert_eq!(quotes.len(), 1);
    assert_eq!(quotes[0].message, "Code must use single quotes");
}

#[test]
fn quotes_toggle_silences_the_rule() {
    let options = plint_analysis::AnalyzerOptions {
        rules: plint_analysis::RuleToggles {
            quotes: false,
            ..plint_analysis::RuleToggles::default()
        },
        ..plint_analysis::AnalyzerOptions::default()
    };
    let text = "\n  div(title='x')\n";
    let diagnostics = Analyzer::new(options).analyze(&literal(text), &HostScope::default());
    assert!(of_kind(&diagnostics, DiagnosticKind::WrongQuotes).is_empty());
}

#[test]
fn boundary_lines_must_be_blank() {
    let diagnostics = analyze("div\n  span\ndiv");
    let leading = of_kind(&diagnostics, DiagnosticKind::MissingLeadingBlank);
    let trailing = of_kind(&diagnostics, DiagnosticKind::MissingTrailingBlank);
    assert_eq!(leading.len(), 1);
    assert_eq!(leading[0].message, "Expected new line in the beginning");
    assert_eq!(leading[0].location.start.line, 1);
    assert_eq!(leading[0].location.start.column, 3);
    assert_eq!(trailing.len(), 1);
    assert_eq!(trailing[0].message, "Expected new line in the end");
}
