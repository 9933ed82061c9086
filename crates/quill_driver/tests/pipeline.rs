use quill_diagnostics::{DiagnosticLevel, Emitter};
use quill_driver::{analyze_expression, analyze_source, load_prelude, CompileError};
use quill_sema::{AnalyzerOptions, ResultType, Type, TypedExprKind};

const PRELUDE: &str = r#"
# shapes used by the samples
module geometry
struct Point(x: i32, y: i32)
fn distance(a: Point, b: Point) -> f64
fn scale(p: Point, factor: f64 = 1.0) -> Point
fn log(message: str)
let origin: Point
"#;

#[test]
fn test_analyze_every_line() {
    let symbols = load_prelude(PRELUDE).unwrap();
    let source = "distance(origin, Point(3, 4))\nscale(origin)\n\n[1, 2, 3]\n";

    let analysis = analyze_source(&symbols, "sample.ql", source, AnalyzerOptions::default()).unwrap();
    assert!(!analysis.has_errors());
    assert_eq!(analysis.lines.len(), 3);
    assert_eq!(
        analysis.lines.iter().map(|l| l.line).collect::<Vec<_>>(),
        vec![1, 2, 4]
    );

    let types: Vec<_> = analysis.exprs().map(|e| e.result_type()).collect();
    assert_eq!(
        types,
        vec![
            ResultType::Known(Type::Float(quill_sema::types::FloatTy::F64)),
            ResultType::Known(Type::Named("geometry.Point".to_string())),
            ResultType::Known(Type::List),
        ]
    );
}

#[test]
fn test_errors_stay_on_their_line() {
    let symbols = load_prelude(PRELUDE).unwrap();
    let source = "distance(origin)\nmissing\nlog('ok')\nPoint(1, 2)";

    let analysis = analyze_source(&symbols, "sample.ql", source, AnalyzerOptions::default()).unwrap();
    assert!(analysis.has_errors());
    assert!(analysis.lines[0].expr.is_none());
    assert!(analysis.lines[1].expr.is_none());
    assert!(analysis.lines[2].expr.is_some());
    assert!(analysis.lines[3].expr.is_some());

    let located: Vec<_> = analysis
        .sink
        .diagnostics()
        .iter()
        .map(|d| (d.level, d.location().unwrap_or_default(), d.message.clone()))
        .collect();
    assert_eq!(
        located,
        vec![
            (
                DiagnosticLevel::Error,
                "sample.ql:1".to_string(),
                "TypeError: distance() missing 1 required positional argument: `b`".to_string()
            ),
            (
                DiagnosticLevel::Error,
                "sample.ql:2".to_string(),
                "NameError: name `missing` is not defined".to_string()
            ),
            (
                DiagnosticLevel::Warning,
                "sample.ql:3".to_string(),
                "return type cannot be determined".to_string()
            ),
        ]
    );
}

#[test]
fn test_analyze_expression_with_expected_type() {
    let symbols = load_prelude(PRELUDE).unwrap();
    let options = AnalyzerOptions {
        track_effects: true,
    };

    let analysis = analyze_expression(&symbols, "scale(origin, 2.0)", None, options).unwrap();
    let expr = analysis.exprs().next().unwrap();
    assert!(matches!(expr.kind, TypedExprKind::Call { .. }));
    assert_eq!(expr.has_effect, Some(true));

    let analysis =
        analyze_expression(&symbols, "scale(origin, 2.0)", Some(&Type::Str), options).unwrap();
    assert!(analysis.has_errors());
    assert_eq!(analysis.exprs().count(), 0);
}

#[test]
fn test_prelude_errors() {
    let err = load_prelude("fn f(a: Missing)").unwrap_err();
    assert!(matches!(err, CompileError::SemanticErrors(ref errors) if errors.len() == 1));

    let err = load_prelude("fn (a: i32)").unwrap_err();
    assert!(matches!(err, CompileError::ParseErrors(_)));
}

#[test]
fn test_lex_error() {
    let symbols = load_prelude(PRELUDE).unwrap();
    let err = analyze_source(&symbols, "bad.ql", "add(1, 2", AnalyzerOptions::default()).unwrap_err();
    assert!(matches!(err, CompileError::LexError(_)));
}

#[test]
fn test_render_with_source() {
    let symbols = load_prelude(PRELUDE).unwrap();
    let source = "Point(1, 'y')";
    let analysis = analyze_source(&symbols, "sample.ql", source, AnalyzerOptions::default()).unwrap();

    let emitter = Emitter::without_colors().with_source("sample.ql", source);
    let rendered = emitter.render(&analysis.sink.diagnostics()[0]);
    assert!(rendered.contains("TypeError: expected type `i32`, got `str`"));
    assert!(rendered.contains("sample.ql"));
}
