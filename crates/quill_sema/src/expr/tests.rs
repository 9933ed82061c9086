use super::*;
use crate::resolve_declarations;
use crate::scope::ScopeStack;
use crate::symbol::{Symbol, SymbolLookup};
use crate::types::{FloatTy, IntTy, ResultType, Type};
use quill_diagnostics::{DiagnosticLevel, DiagnosticSink};
use quill_syntax::{parse_declarations, split_lines, tokenize, Token};

const PRELUDE: &str = r#"
module geometry
struct Point(x: i32, y: i32)
struct Label(text: str, mark = c'x')
fn add(a: i32, b: i32 = 1) -> i32
fn clamp(value: f64, low: f64, high: f64) -> f64
fn log(message: str)
fn now() -> i64
let origin: Point
let anything
let flag: bool
"#;

fn symbols() -> ScopeStack {
    let decls = parse_declarations(PRELUDE).unwrap();
    resolve_declarations(&decls).unwrap()
}

fn run(source: &str) -> Vec<Token> {
    split_lines(tokenize(source).unwrap()).remove(0)
}

struct Outcome {
    result: AnalysisResult<TypedExpr>,
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl Outcome {
    fn node(&self) -> &TypedExpr {
        match &self.result {
            Ok(node) => node,
            Err(_) => panic!("analysis failed: {:?}", self.errors),
        }
    }
}

fn analyze_with(source: &str, expected: Option<&Type>, options: AnalyzerOptions) -> Outcome {
    let symbols = symbols();
    let mut sink = DiagnosticSink::new();
    let tokens = run(source);
    let result = ExprAnalyzer::new(&symbols, &mut sink, "test.ql")
        .with_options(options)
        .generate_expression(&tokens, expected);

    let messages = |level: DiagnosticLevel| {
        sink.diagnostics()
            .iter()
            .filter(|d| d.level == level)
            .map(|d| d.message.clone())
            .collect::<Vec<_>>()
    };
    Outcome {
        result,
        errors: messages(DiagnosticLevel::Error),
        warnings: messages(DiagnosticLevel::Warning),
    }
}

fn analyze(source: &str) -> Outcome {
    analyze_with(source, None, AnalyzerOptions::default())
}

fn classify(source: &str) -> (bool, Vec<String>) {
    let symbols = symbols();
    let mut sink = DiagnosticSink::new();
    let tokens = run(source);
    let is_value = ExprAnalyzer::new(&symbols, &mut sink, "test.ql").is_value_expression(&tokens);
    let errors = sink.errors().map(|d| d.message.clone()).collect();
    (is_value, errors)
}

fn literal_of(node: &TypedExpr) -> (&str, &Type) {
    match &node.kind {
        TypedExprKind::Literal { value, ty } => (value.as_str(), ty),
        other => panic!("Expected literal, got {:?}", other),
    }
}

#[test]
fn test_literal_types() {
    let cases = [
        ("10", "10", Type::Int(IntTy::I32)),
        ("2.5", "2.5", Type::Float(FloatTy::F64)),
        ("7u8", "7u8", Type::Int(IntTy::U8)),
        ("'H'", "H", Type::Str),
        ("\"Hello\"", "Hello", Type::Str),
        ("c'H'", "H", Type::Char),
        ("True", "True", Type::Bool),
    ];

    for (source, value, ty) in cases {
        assert!(classify(source).0, "{}", source);

        let outcome = analyze(source);
        let node = outcome.node();
        assert_eq!(literal_of(node), (value, &ty), "{}", source);
        assert_eq!(node.result_type(), ResultType::Known(ty.clone()));
        assert!(node.is_constant);
        assert_eq!(node.has_effect, None);
        assert!(outcome.errors.is_empty() && outcome.warnings.is_empty());
    }
}

#[test]
fn test_undefined_name() {
    let outcome = analyze("missing");
    assert_eq!(outcome.result, Err(Aborted));
    assert_eq!(
        outcome.errors,
        vec!["NameError: name `missing` is not defined".to_string()]
    );

    let (is_value, errors) = classify("missing");
    assert!(!is_value);
    assert_eq!(errors.len(), 1);
}

#[test]
fn test_name_types() {
    let point = Type::Named("geometry.Point".to_string());

    let outcome = analyze("origin");
    let node = outcome.node();
    assert_eq!(node.kind, TypedExprKind::Name("origin".to_string()));
    assert_eq!(node.result_type(), ResultType::Known(point.clone()));
    assert!(!node.is_constant);

    // 函数名取返回类型
    let outcome = analyze("now");
    assert_eq!(
        outcome.node().result_type(),
        ResultType::Known(Type::Int(IntTy::I64))
    );

    let outcome = analyze("geometry.Point");
    assert_eq!(outcome.node().result_type(), ResultType::Known(point));
}

#[test]
fn test_undetermined_type_warns() {
    for source in ["anything", "log('hi')"] {
        let outcome = analyze(source);
        assert_eq!(outcome.node().result_type(), ResultType::Undefined);
        assert!(outcome.errors.is_empty(), "{}", source);
        assert_eq!(outcome.warnings, vec![UNDETERMINED_RETURN.to_string()]);
    }
}

#[test]
fn test_call_arity() {
    let cases = [
        (
            "add()",
            "TypeError: add() missing 1 required positional argument: `a`",
        ),
        (
            "add(1, 2, 3)",
            "TypeError: add() takes 2 positional arguments but 3 were given",
        ),
        (
            "clamp(1.0)",
            "TypeError: clamp() missing 2 required positional arguments: `low` and `high`",
        ),
        (
            "clamp()",
            "TypeError: clamp() missing 3 required positional arguments: `value`, `low` and `high`",
        ),
        (
            "now(1)",
            "TypeError: now() takes 0 positional arguments but 1 were given",
        ),
    ];

    for (source, message) in cases {
        let outcome = analyze(source);
        assert_eq!(outcome.result, Err(Aborted), "{}", source);
        assert_eq!(outcome.errors, vec![message.to_string()]);
    }

    for source in ["add(1)", "add(1, 2)", "add(1, 2,)", "clamp(1.0, 0.0, 2.0)", "now()"] {
        let outcome = analyze(source);
        assert!(outcome.result.is_ok(), "{}: {:?}", source, outcome.errors);
        assert!(outcome.errors.is_empty());
    }
}

#[test]
fn test_call_node() {
    let outcome = analyze("add(add(1), 2)");
    let node = outcome.node();
    let TypedExprKind::Call { callee, args } = &node.kind else {
        panic!("Expected call, got {:?}", node.kind);
    };
    assert_eq!(callee, "add");
    assert_eq!(args.len(), 2);
    assert!(matches!(&args[0].kind, TypedExprKind::Call { callee, .. } if callee == "add"));
    assert_eq!(node.result_type(), ResultType::Known(Type::Int(IntTy::I32)));
    assert!(!node.is_constant);
}

#[test]
fn test_argument_type_mismatch_reports_every_argument() {
    let outcome = analyze("add('x', 2.5)");
    assert_eq!(outcome.result, Err(Aborted));
    assert_eq!(
        outcome.errors,
        vec![
            "TypeError: expected type `i32`, got `str`".to_string(),
            "TypeError: expected type `i32`, got `f64`".to_string(),
        ]
    );
}

#[test]
fn test_argument_failure_propagates() {
    let outcome = analyze("add(1 + 'x')");
    assert_eq!(outcome.result, Err(Aborted));
    assert_eq!(
        outcome.errors,
        vec!["TypeError: unsupported operand type(s) for +: `i32` and `str`".to_string()]
    );
}

#[test]
fn test_empty_argument_is_syntax_error() {
    let outcome = analyze("add(1,,2)");
    assert_eq!(outcome.result, Err(Aborted));
    assert_eq!(outcome.errors, vec!["SyntaxError: invalid syntax".to_string()]);
}

#[test]
fn test_not_callable() {
    for (source, name) in [("origin(1)", "origin"), ("nothing(1)", "nothing")] {
        let outcome = analyze(source);
        assert_eq!(outcome.result, Err(Aborted));
        assert_eq!(
            outcome.errors,
            vec![format!("NameError: name `{}` is not a function or structure", name)]
        );
    }
}

#[test]
fn test_struct_init_binds_fields_in_order() {
    for source in ["Point(1, 2)", "geometry.Point(1, 2)"] {
        let outcome = analyze(source);
        let node = outcome.node();
        assert!(outcome.errors.is_empty() && outcome.warnings.is_empty());

        let TypedExprKind::StructInit {
            qualified_name,
            fields,
            ..
        } = &node.kind
        else {
            panic!("Expected struct init, got {:?}", node.kind);
        };
        assert_eq!(qualified_name, "geometry.Point");
        let names: Vec<_> = fields.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["x", "y"]);
        assert_eq!(literal_of(&fields["x"].value).0, "1");
        assert_eq!(literal_of(&fields["y"].value).0, "2");
        assert_eq!(
            fields["y"].expected,
            ResultType::Known(Type::Int(IntTy::I32))
        );

        assert_eq!(
            node.result_type(),
            ResultType::Known(Type::Named("geometry.Point".to_string()))
        );
        assert!(!node.is_constant);
    }
}

#[test]
fn test_struct_field_type_from_default() {
    let outcome = analyze("Label('hi', c'y')");
    let TypedExprKind::StructInit { fields, .. } = &outcome.node().kind else {
        panic!("Expected struct init");
    };
    assert_eq!(fields["mark"].expected, ResultType::Known(Type::Char));

    // 带默认值的字段仍然是必需的
    let outcome = analyze("Label('hi')");
    assert_eq!(
        outcome.errors,
        vec!["TypeError: Label() missing 1 required positional argument: `mark`".to_string()]
    );
}

#[test]
fn test_struct_mismatch_leaves_descriptor_untouched() {
    let symbols = symbols();
    let before = symbols.lookup("Point").cloned();

    let mut sink = DiagnosticSink::new();
    let tokens = run("Point(1, 'y')");
    let result = ExprAnalyzer::new(&symbols, &mut sink, "test.ql").generate_expression(&tokens, None);

    assert_eq!(result, Err(Aborted));
    let errors: Vec<_> = sink.errors().map(|d| d.message.as_str()).collect();
    assert_eq!(errors, vec!["TypeError: expected type `i32`, got `str`"]);

    let after = symbols.lookup("Point").cloned();
    assert_eq!(before, after);
    let Some(Symbol::Struct(point)) = after else {
        panic!("Point should be a struct");
    };
    assert!(point.fields.values().all(|field| field.default.is_none()));
}

#[test]
fn test_collections() {
    let cases = [
        ("[1, 2]", Type::List, 2),
        ("[1, 2,]", Type::List, 2),
        ("[1]", Type::List, 1),
        ("[]", Type::List, 0),
        ("{1, 2}", Type::Set, 2),
        ("{'a'}", Type::Set, 1),
        ("(1, 2)", Type::Tuple, 2),
        ("()", Type::Tuple, 0),
        ("[(1, 2)]", Type::List, 1),
    ];

    for (source, ty, len) in cases {
        let outcome = analyze(source);
        let node = outcome.node();
        assert_eq!(node.result_type(), ResultType::Known(ty), "{}", source);
        let items = match &node.kind {
            TypedExprKind::Tuple(items) | TypedExprKind::List(items) | TypedExprKind::Set(items) => {
                items
            }
            other => panic!("Expected collection, got {:?}", other),
        };
        assert_eq!(items.len(), len, "{}", source);
        assert!(node.is_constant);
    }

    let outcome = analyze("{}");
    assert_eq!(outcome.node().kind, TypedExprKind::Dict);

    // 圆括号透传
    let outcome = analyze("(1)");
    assert_eq!(literal_of(outcome.node()).0, "1");

    let outcome = analyze("[origin, 1]");
    assert!(!outcome.node().is_constant);
}

#[test]
fn test_operator_expressions() {
    let outcome = analyze("1 + 2 * 3");
    let node = outcome.node();
    assert!(matches!(node.kind, TypedExprKind::Binary { .. }));
    assert_eq!(node.result_type(), ResultType::Known(Type::Int(IntTy::I32)));
    assert!(node.is_constant);

    let outcome = analyze("add(1) + 2");
    assert_eq!(
        outcome.node().result_type(),
        ResultType::Known(Type::Int(IntTy::I32))
    );
    assert!(!outcome.node().is_constant);

    let outcome = analyze("- 2.5");
    assert_eq!(
        outcome.node().result_type(),
        ResultType::Known(Type::Float(FloatTy::F64))
    );

    let outcome = analyze("not flag and True");
    assert_eq!(outcome.node().result_type(), ResultType::Known(Type::Bool));

    let outcome = analyze("1 + 'x'");
    assert_eq!(outcome.result, Err(Aborted));
    assert_eq!(
        outcome.errors,
        vec!["TypeError: unsupported operand type(s) for +: `i32` and `str`".to_string()]
    );
}

#[test]
fn test_undefined_operand_warns_once() {
    let outcome = analyze("anything + 1");
    assert_eq!(outcome.node().result_type(), ResultType::Undefined);
    assert!(outcome.errors.is_empty());
    assert_eq!(outcome.warnings.len(), 1);
}

#[test]
fn test_effect_tracking() {
    let tracked = AnalyzerOptions {
        track_effects: true,
    };
    let cases = [
        ("add(1)", true),
        ("Point(1, 2)", true),
        ("[add(1), 2]", true),
        ("add(1) * 2", true),
        ("[1, 2]", false),
        ("origin", false),
        ("1 + 2", false),
    ];

    for (source, effect) in cases {
        let outcome = analyze_with(source, None, tracked);
        assert_eq!(outcome.node().has_effect, Some(effect), "{}", source);

        let outcome = analyze(source);
        assert_eq!(outcome.node().has_effect, None, "{}", source);
    }
}

#[test]
fn test_expected_type() {
    let i32_ty = Type::Int(IntTy::I32);

    let outcome = analyze_with("add(1)", Some(&i32_ty), AnalyzerOptions::default());
    assert!(outcome.result.is_ok());

    let outcome = analyze_with("add(1)", Some(&Type::Str), AnalyzerOptions::default());
    assert_eq!(outcome.result, Err(Aborted));
    assert_eq!(
        outcome.errors,
        vec!["TypeError: expected type `str`, got `i32`".to_string()]
    );

    // 类型无法推导时只警告
    let outcome = analyze_with("anything", Some(&i32_ty), AnalyzerOptions::default());
    assert!(outcome.result.is_ok());
    assert_eq!(outcome.warnings.len(), 1);
}

#[test]
fn test_reserved_words_alone_are_invalid() {
    for source in ["and", "not", "or"] {
        let outcome = analyze(source);
        assert_eq!(outcome.result, Err(Aborted), "{}", source);
        assert_eq!(outcome.errors, vec!["SyntaxError: invalid syntax".to_string()]);
        assert!(!classify(source).0);
    }
}

#[test]
fn test_value_expression_classification() {
    let values = [
        "1",
        "'a'",
        "True",
        "origin",
        "geometry.origin",
        "- 1",
        "not flag",
        "1 + 2",
        "1 + - 2",
        "add(1) * 2",
        "add(1, 2)",
        "add(1, 2,)",
        "[1, (2, 3)]",
        "{}",
        "()",
        "Point(1, 2) == origin",
    ];
    for source in values {
        assert!(classify(source).0, "{}", source);
    }

    let others = ["+", "1 +", "1 2", "add(1) 2", "add(1,,2)", "add(1 2)", "(1, 2 3)"];
    for source in others {
        let (is_value, errors) = classify(source);
        assert!(!is_value, "{}", source);
        assert!(errors.is_empty(), "{}", source);
    }
}

#[test]
fn test_value_expressions_never_fail_syntax() {
    let sources = [
        "1",
        "- 1",
        "1 + 2 * 3",
        "add(1) + 1",
        "[add(1), (2, 3)]",
        "{1, 'a'}",
        "not flag or flag",
        "geometry.Point(1, 2)",
        "~ 1 + 2",
        "add(1,,2)",
        "1 2",
        "add(1) 2",
        "1 + 'x'",
    ];

    for source in sources {
        let (is_value, _) = classify(source);
        if !is_value {
            continue;
        }
        let outcome = analyze(source);
        assert!(
            outcome.errors.iter().all(|e| !e.starts_with("SyntaxError")),
            "{}: {:?}",
            source,
            outcome.errors
        );
    }
}

#[test]
fn test_type_expression() {
    let symbols = symbols();
    let mut sink = DiagnosticSink::new();
    let mut analyzer = ExprAnalyzer::new(&symbols, &mut sink, "test.ql");

    assert!(analyzer.is_type_expression(&run("Point")));
    assert!(analyzer.is_type_expression(&run("geometry.Point")));
    assert!(!analyzer.is_type_expression(&run("add")));
    assert!(!analyzer.is_type_expression(&run("Missing")));
    assert!(!analyzer.is_type_expression(&run("1")));

    let errors: Vec<_> = sink.errors().map(|d| d.message.as_str()).collect();
    assert_eq!(
        errors,
        vec![
            "TypeError: name `add` is not a type",
            "NameError: name `Missing` is not defined",
            "SyntaxError: invalid syntax",
        ]
    );
}

#[test]
fn test_name_call_expression() {
    let symbols = symbols();
    let mut sink = DiagnosticSink::new();
    let analyzer = ExprAnalyzer::new(&symbols, &mut sink, "test.ql");

    assert!(analyzer.is_name_call_expression(&run("add(1)"), true));
    assert!(analyzer.is_name_call_expression(&run("geometry.Point(1, 2)"), true));
    assert!(!analyzer.is_name_call_expression(&run("add(1) + 2"), true));
    assert!(analyzer.is_name_call_expression(&run("add(1) + 2"), false));
    assert!(!analyzer.is_name_call_expression(&run("(1)"), false));
    assert!(!analyzer.is_name_call_expression(&run("1 (2)"), false));
    assert!(!analyzer.is_name_call_expression(&run("add"), false));
}

#[test]
fn test_idempotent() {
    let symbols = symbols();
    let mut sink = DiagnosticSink::new();
    let mut analyzer = ExprAnalyzer::new(&symbols, &mut sink, "test.ql");
    let tokens = run("[Point(add(1), 2), {1, 2.5}, - 3 ** 2]");

    let first = analyzer.generate_expression(&tokens, None);
    let second = analyzer.generate_expression(&tokens, None);
    assert!(first.is_ok());
    assert_eq!(first, second);
}

#[test]
fn test_earlier_error_does_not_poison_later_expression() {
    let symbols = symbols();
    let mut sink = DiagnosticSink::new();
    let mut analyzer = ExprAnalyzer::new(&symbols, &mut sink, "test.ql");

    assert_eq!(analyzer.generate_expression(&run("missing"), None), Err(Aborted));
    assert!(analyzer.generate_expression(&run("1 + 2"), None).is_ok());
    assert_eq!(sink.error_count(), 1);
}

#[test]
fn test_diagnostic_location() {
    let symbols = symbols();
    let mut sink = DiagnosticSink::new();
    let tokens = run("add(1, 'x')");
    let result = ExprAnalyzer::new(&symbols, &mut sink, "test.ql").generate_expression(&tokens, None);
    assert_eq!(result, Err(Aborted));

    let diagnostic = &sink.diagnostics()[0];
    assert_eq!(diagnostic.file.as_deref(), Some("test.ql"));
    assert_eq!(diagnostic.span, Some(7..10));
    assert_eq!(diagnostic.line, Some(1));
}
