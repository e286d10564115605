/*
MIT License

Copyright (c) 2026 Raja Lehtihet and Wael El Oraiby

Permission is hereby granted, free of charge, to any person obtaining a copy
of this software and associated documentation files (the "Software"), to deal
in the Software without restriction, including without limitation the rights
to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
copies of the Software, and to permit persons to whom the Software is
furnished to do so, subject to the following conditions:

The above copyright notice and this permission notice shall be included in all
copies or substantial portions of the Software.

THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
SOFTWARE.
*/

//! Crate unit tests.

use super::*;
use std::collections::BTreeMap;

fn run(source: &str) -> Value {
    Interpreter::new()
        .parse(source)
        .unwrap_or_else(|err| panic!("script failed: {err}\n{source}"))
}

fn number(source: &str) -> f64 {
    match run(source) {
        Value::Number(n) => n,
        other => panic!("expected a number from '{source}', got {other}"),
    }
}

fn compiled(source: &str) -> Value {
    let mut interp = Interpreter::new();
    let closure = interp
        .compile_to_function(source, &[])
        .unwrap_or_else(|err| panic!("compile failed: {err}\n{source}"));
    closure
        .invoke(&mut interp, &[])
        .unwrap_or_else(|err| panic!("compiled run failed: {err}\n{source}"))
}

fn expr(source: &str) -> Expr {
    parse_expression(source).unwrap_or_else(|err| panic!("parse failed: {err}"))
}

fn board_interpreter() -> (Board, Interpreter) {
    let board = Board::new();
    let interp = Interpreter::with_host(Box::new(board.clone()), Options::default());
    (board, interp)
}

#[test]
fn relexing_token_text_yields_the_same_token() {
    let source = "f = map (x) -> x^2 <= 3.5 ~= 'a\\'b'; /* c */ if (a != b) { return <<k: [1, 2]>>; } // t";
    let tokens = tokenize(source).expect("tokenize");
    assert!(tokens.last().is_some_and(Token::is_eof));
    for token in tokens.iter().filter(|token| !token.is_eof()) {
        let again = tokenize(&token.text).expect("relex");
        assert_eq!(again.len(), 2, "'{}' should lex as one token", token.text);
        assert_eq!(again[0].kind, token.kind);
        assert_eq!(again[0].text, token.text);
    }
}

#[test]
fn two_character_operators_win_over_prefixes() {
    let kinds: Vec<TokenKind> = tokenize("a<=b")
        .expect("tokenize")
        .into_iter()
        .map(|token| token.kind)
        .collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Ident("a".into()),
            TokenKind::Punct(Punct::Le),
            TokenKind::Ident("b".into()),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn unterminated_string_is_a_lexical_error() {
    let err = tokenize("x = 'abc").expect_err("lexing should fail");
    assert!(matches!(err, ScriptError::Lexical { .. }), "{err}");
    assert_eq!(err.line(), 1);
}

#[test]
fn parsing_is_deterministic() {
    let source = "a = 1 + 2 * 3 ^ 2; b = a > 3 ? -a : a; function f(x) { return x * b; } f(2);";
    let first = parse_program(source).expect("parse");
    let second = parse_program(source).expect("parse");
    assert_eq!(first, second);
    assert_eq!(first.statements.len(), 4);
}

#[test]
fn operator_precedence_and_associativity() {
    assert_eq!(number("1 + 2 * 3;"), 7.0);
    assert_eq!(number("2 ^ 3 ^ 2;"), 512.0);
    assert_eq!(number("10 - 4 - 3;"), 3.0);
    assert_eq!(number("-2 ^ 2;"), -4.0);
    assert_eq!(number("7 % 4;"), 3.0);
}

#[test]
fn syntax_error_reports_line_and_expected_tokens() {
    let err = Interpreter::new()
        .parse("if (x\n{ }")
        .expect_err("parse should fail");
    assert!(matches!(err, ScriptError::Syntax { .. }), "{err}");
    assert_eq!(err.line(), 2);
    assert!(err.column() > 0);
    assert!(err.expected_tokens().iter().any(|token| token == ")"));
    let location = err.location();
    assert_eq!(location.snippet, "{ }");
    assert!(location.pointer.contains('^'));
}

#[test]
fn missing_semicolon_between_statements_is_rejected() {
    let err = parse_program("a = 1 b = 2").expect_err("parse should fail");
    assert!(err.expected_tokens().iter().any(|token| token == ";"));
}

#[test]
fn semicolon_is_optional_before_brace_and_at_end() {
    assert_eq!(number("function f() { return 4 } f()"), 4.0);
}

#[test]
fn unknown_callee_is_a_name_error() {
    let err = Interpreter::new()
        .parse("y = unknownFn(1);")
        .expect_err("call should fail");
    match &err {
        ScriptError::Name { name, .. } => assert_eq!(name, "unknownFn"),
        other => panic!("expected a name error, got {other}"),
    }
    assert_eq!(err.line(), 1);
}

#[test]
fn unresolved_identifier_reads_as_undefined() {
    assert_eq!(run("nothingHere;"), Value::Undefined);
}

#[test]
fn map_call_in_both_backends() {
    let source = "s = map (x) -> x*x; s(3);";
    assert_eq!(run(source), Value::Number(9.0));
    assert_eq!(compiled(source), Value::Number(9.0));
}

#[test]
fn evaluator_and_compiler_agree() {
    let fixtures = [
        "1 + 2 * 3;",
        "a = 2; b = a ^ 3 - 1; b / 7;",
        "x = [1, 2, 3]; x[1] + x.length;",
        "v = [1, 2] + [3, 4]; v[0] * v[1];",
        "i = interval(1, 2) + 1; i.hi - i.lo;",
        "sqrt(abs(-16)) + max(1, 5, 3);",
        "sq = map (x) -> x * x; sq(sq(2));",
        "o = <<a: 1, b: 'two'>>; o.b + o.a;",
        "n = 5; n > 3 ? 'big' : 'small';",
        "if (2 > 1) { r = 'yes'; } else { r = 'no'; } r;",
        "s = 0; for (i = 0; i < 5; i = i + 1) { s = s + i; } s;",
        "k = 0; while (k < 10) { k = k + 3; } k;",
        "d = 0; do { d = d + 1; } while (d < 4); d;",
        "'geo' + 'script';",
        "function fact(n) { if (n <= 1) { return 1; } return n * fact(n - 1); } fact(5);",
        "function pair(a, b) { return [b, a]; } pair(1, 2)[0];",
        "t = true && 0; t || 'fallback';",
        "!(1 == 1) || 3 ~= 3.0000001;",
        "a = []; a[2] = 7; a.length;",
        "PI > 3;",
    ];
    for source in fixtures {
        let interpreted = run(source);
        assert_eq!(interpreted, compiled(source), "backends disagree on '{source}'");
    }
}

#[test]
fn logical_operators_return_the_deciding_operand() {
    assert_eq!(run("0 || 'b';"), Value::from("b"));
    assert_eq!(run("'a' && 2;"), Value::Number(2.0));
    assert_eq!(run("null && unknownAtAll();"), Value::Null);
}

#[test]
fn derivative_of_sine_at_zero_is_one() {
    let source = "f = map (x) -> sin(x); df = D(f); df(0);";
    assert_eq!(run(source), Value::Number(1.0));
    assert_eq!(compiled(source), Value::Number(1.0));
}

#[test]
fn derivative_of_cube_at_two_is_twelve() {
    assert_eq!(number("f = map (x) -> x^3; df = D(f); df(2);"), 12.0);
    assert_eq!(number("function f(x) { return x^3; } D(f)(2);"), 12.0);
}

#[test]
fn derivative_with_respect_to_named_variable() {
    let slope = number("g = map (x, y) -> x * y^2; dg = D(g, 'y'); dg(3, 2);");
    assert_eq!(slope, 12.0);
}

#[test]
fn runtime_derivative_of_a_parameter() {
    let source = "function slope(h) { return D(h)(3); } slope(map (x) -> x * x);";
    assert_eq!(number(source), 6.0);
}

#[test]
fn derivative_of_unknown_function_fails() {
    let err = derivative(&expr("foo(x)"), "x").expect_err("no rule for foo");
    match err {
        ScriptError::Derivative { name, .. } => assert_eq!(name, "foo"),
        other => panic!("expected a derivative error, got {other}"),
    }
}

#[test]
fn derivative_of_a_closure_keeps_its_captured_scope() {
    let mut interp = Interpreter::new();
    interp
        .parse("function mk(a) { return map (x) -> a * x; } f = mk(3);")
        .expect("script");
    assert_eq!(interp.parse("D(f)(1);"), Ok(Value::Number(3.0)));
    assert_eq!(interp.parse("g = f; D(g, 'x')(1);"), Ok(Value::Number(3.0)));
}

#[test]
fn rebound_catalog_names_are_not_differentiated_by_rule() {
    let mut interp = Interpreter::new();
    let err = interp
        .parse("sin = map (t) -> t * t; g = map (x) -> sin(x); D(g)(3);")
        .expect_err("sin no longer means the sine");
    match err {
        ScriptError::Derivative { name, .. } => assert_eq!(name, "sin"),
        other => panic!("expected a derivative error, got {other}"),
    }

    let mut interp = Interpreter::new();
    interp.parse("cos = 3;").expect("rebind");
    let err = interp
        .parse("D(map (x) -> cos(x))(1);")
        .expect_err("cos is a number here");
    assert!(matches!(err, ScriptError::Derivative { .. }), "{err}");

    assert_eq!(number("D(map (x) -> sin(x))(0);"), 1.0);
}

#[test]
fn derivative_rules_produce_simplified_trees() {
    let cases = [
        ("x^3", "3 * x^2"),
        ("5 * x", "5"),
        ("y * 2", "0"),
        ("sin(x)", "cos(x)"),
        ("x + 1", "1"),
    ];
    for (input, expected) in cases {
        let derived = derivative(&expr(input), "x").expect("derivative");
        assert!(
            same_structure(&derived, &expr(expected)),
            "d/dx {input} = {derived}, expected {expected}"
        );
    }
}

#[test]
fn simplification_removes_identities() {
    let cases = [
        ("x + 0", "x"),
        ("0 + x", "x"),
        ("x * 1", "x"),
        ("1 * x", "x"),
        ("x * 0", "0"),
        ("x ^ 1", "x"),
        ("x ^ 0", "1"),
        ("x - x", "0"),
        ("x * x", "x ^ 2"),
        ("x + x", "2 * x"),
        ("2 + 3 * 4", "14"),
        ("-(-x)", "x"),
        ("0 - x", "-x"),
    ];
    for (input, expected) in cases {
        let simplified = simplify(&expr(input));
        assert!(
            same_structure(&simplified, &expr(expected)),
            "{input} simplified to {simplified}, expected {expected}"
        );
    }
}

#[test]
fn simplification_keeps_division_by_literal_zero() {
    let input = expr("0 / 0");
    assert!(same_structure(&simplify(&input), &input));
}

#[test]
fn simplification_leaves_strings_alone() {
    let input = expr("'a' + 'a'");
    assert!(same_structure(&simplify(&input), &input));
}

#[test]
fn structural_hash_ignores_spans() {
    let a = expr("x * (y + 1)");
    let b = expr("x  *  ( y+1 )");
    assert_eq!(structural_hash(&a), structural_hash(&b));
    assert!(same_structure(&a, &b));
    assert!(!same_structure(&a, &expr("x * (y + 2)")));
}

#[test]
fn call_scopes_do_not_leak_parameters() {
    assert_eq!(
        number("function f(a) { return a + g(); } function g() { return 1; } f(5);"),
        6.0
    );
    assert_eq!(
        run("function h(a) { return k(); } function k() { return a; } h(5);"),
        Value::Undefined
    );
}

#[test]
fn closures_capture_their_defining_scope() {
    let source = "function adder(n) { return map (x) -> x + n; } add2 = adder(2); add3 = adder(3); add2(1) * add3(1);";
    assert_eq!(number(source), 12.0);
}

#[test]
fn uncaptured_call_scopes_are_released() {
    let mut interp = Interpreter::new();
    interp
        .parse("function f(a) { return a * 2; } f(1); f(2); f(3);")
        .expect("script");
    assert_eq!(interp.scopes().live(), 1);
}

#[test]
fn call_scopes_holding_dead_closures_are_reclaimed() {
    let mut interp = Interpreter::new();
    interp
        .parse(
            "function f(a) { m = map (x) -> x; return a; }
             for (i = 0; i < 1000; i = i + 1) { f(i); }",
        )
        .expect("script");
    assert_eq!(interp.scopes().live(), 1);
}

#[test]
fn returned_closures_keep_their_scope_until_dropped() {
    let mut interp = Interpreter::new();
    interp
        .parse("function mk(a) { return map (x) -> a * x; } g = mk(2); mk(7); mk(8);")
        .expect("script");
    assert_eq!(interp.parse("g(5);"), Ok(Value::Number(10.0)));

    interp.parse("g = 0;").expect("rebind");
    interp.scopes_mut().collect();
    assert_eq!(interp.scopes().live(), 1);
}

#[test]
fn scope_stack_push_and_pop() {
    let mut scopes = ScopeArena::new();
    let outer = scopes.push_scope(vec!["x".to_string()]);
    scopes.let_local("x", Value::Number(1.0));
    let inner = scopes.push_scope(vec!["y".to_string()]);
    assert_eq!(scopes.current(), inner);
    assert_eq!(scopes.is_parameter("x"), Some(outer));
    assert_eq!(scopes.is_parameter("y"), Some(inner));
    assert_eq!(scopes.is_parameter("z"), None);
    assert_eq!(scopes.lookup("x"), Some(Value::Number(1.0)));
    assert_eq!(scopes.live(), 3);

    assert_eq!(scopes.pop_scope(), outer);
    assert_eq!(scopes.is_parameter("y"), None);
    assert_eq!(scopes.pop_scope(), ScopeId::ROOT);
    assert_eq!(scopes.live(), 1);
    assert_eq!(scopes.lookup("x"), None);
}

#[test]
fn self_referencing_arrays_compare_and_print() {
    assert_eq!(
        run("a = [0]; a[0] = a; b = [0]; b[0] = b; a == b;"),
        Value::Bool(false)
    );
    assert_eq!(run("a = [0]; a[0] = a; a == a;"), Value::Bool(true));
    assert_eq!(run("a = [1, 2]; a[1] = a; a;").to_string(), "[1, [...]]");
}

#[test]
fn factorial_of_small_integers() {
    assert_eq!(number("factorial(5);"), 120.0);
    assert_eq!(number("factorial(0);"), 1.0);
    assert!(number("factorial(2.5);").is_nan());
}

#[test]
fn approx_equality_uses_the_tolerance() {
    assert_eq!(run("a = 2; a ~= 2.0000001;"), Value::Bool(true));
    assert_eq!(run("a = 2; a ~= 2.00001;"), Value::Bool(false));

    let options = Options::default().with_approx_tolerance(1e-3);
    let mut interp = Interpreter::with_options(options);
    assert_eq!(interp.parse("2 ~= 2.0001;"), Ok(Value::Bool(true)));
}

#[test]
fn interval_arithmetic_rounds_outward() {
    let mut interp = Interpreter::new();
    let value = interp.parse("interval(1, 2) + 1;").expect("script");
    let iv = value.as_interval().expect("interval");
    assert!(iv.lo < 2.0 && iv.lo > 1.999);
    assert!(iv.hi > 3.0 && iv.hi < 3.001);

    let options = Options::default().with_outward_rounding(false);
    let mut exact = Interpreter::with_options(options);
    let value = exact.parse("interval(1, 2) * interval(-1, 3);").expect("script");
    assert_eq!(value, Value::Interval(Interval::new(-2.0, 6.0)));
}

#[test]
fn interval_comparison_needs_every_member() {
    assert_eq!(run("interval(1, 2) < interval(3, 4);"), Value::Bool(true));
    assert_eq!(run("interval(1, 3) < interval(2, 4);"), Value::Bool(false));
}

#[test]
fn interval_division_by_zero_span_is_unbounded() {
    let iv = Interval::new(1.0, 2.0).div(Interval::new(-1.0, 1.0), true);
    assert_eq!(iv, Interval::entire());
}

#[test]
fn type_errors_carry_positions() {
    let err = Interpreter::new()
        .parse("a = 1;\nb = a + true;")
        .expect_err("bool arithmetic");
    assert!(matches!(err, ScriptError::Type { .. }), "{err}");
    assert_eq!(err.line(), 2);
}

#[test]
fn return_outside_function_is_a_runtime_error() {
    let err = Interpreter::new()
        .parse("return 1;")
        .expect_err("top-level return");
    assert!(matches!(err, ScriptError::Runtime { .. }), "{err}");
}

#[test]
fn builtin_arity_is_checked() {
    let err = Interpreter::new()
        .parse("sin(1, 2);")
        .expect_err("arity");
    assert!(matches!(err, ScriptError::Type { .. }), "{err}");
    assert!(err.to_string().contains("sin"));
}

#[test]
fn shadowing_a_builtin_warns() {
    let mut interp = Interpreter::new();
    assert_eq!(interp.parse("sin = 3; sin + 1;"), Ok(Value::Number(4.0)));
    assert_eq!(interp.warnings().len(), 1);
    assert_eq!(interp.warnings()[0].kind, WarningKind::Shadowing);

    interp.parse("sin = 4;").expect("rebinding");
    assert_eq!(interp.warnings().len(), 1);
}

#[test]
fn deprecated_keywords_warn() {
    let mut interp = Interpreter::new();
    interp.parse("use oldBoard;").expect("use is a no-op");
    assert_eq!(interp.warnings()[0].kind, WarningKind::Deprecation);

    let quiet = Options::default().with_deprecation_warnings(false);
    let mut interp = Interpreter::with_options(quiet);
    interp.parse("use oldBoard;").expect("use is a no-op");
    assert!(interp.warnings().is_empty());
}

#[test]
fn creating_points_with_attributes() {
    let (board, mut interp) = board_interpreter();
    let value = interp
        .parse("A = point(1, 2) <<name: 'A', id: 'pA'>>;")
        .expect("script");
    let handle = value.as_element().expect("element");
    assert_eq!(board.len(), 1);
    assert_eq!(board.id_of(handle).as_deref(), Some("pA"));
    assert_eq!(board.name_of(handle).as_deref(), Some("A"));
    assert_eq!(interp.provenance(handle).map(<[SourceSpan]>::len), Some(2));

    assert_eq!(interp.parse("pA.x + A.y;"), Ok(Value::Number(3.0)));
    assert_eq!(interp.parse("A.X() * 10;"), Ok(Value::Number(10.0)));
}

#[test]
fn attribute_objects_need_a_creator() {
    let err = Interpreter::new()
        .parse("sin(1) <<name: 'x'>>;")
        .expect_err("attrs on a builtin");
    assert!(matches!(err, ScriptError::Type { .. }), "{err}");
}

#[test]
fn invalid_parents_are_runtime_errors() {
    let err = Interpreter::new()
        .parse("circle(1);")
        .expect_err("circle needs two parents");
    assert!(matches!(err, ScriptError::Runtime { .. }), "{err}");
}

#[test]
fn member_aliases_map_to_host_attributes() {
    let (board, mut interp) = board_interpreter();
    let value = interp.parse("P = point(0, 0); P.color = 'red'; P;").expect("script");
    let handle = value.as_element().expect("element");
    assert_eq!(
        board.get_attribute(handle, "strokecolor"),
        Some(Value::from("red"))
    );
    assert_eq!(interp.parse("P.color;"), Ok(Value::from("red")));

    let err = interp.parse("P.X = 3;").expect_err("methods are read-only");
    assert!(matches!(err, ScriptError::Type { .. }), "{err}");
}

#[test]
fn attribute_updates_reach_dependents() {
    let (board, mut interp) = board_interpreter();
    interp
        .parse("A = point(0, 0); B = point(3, 4); s = segment(A, B); dist(A, B);")
        .expect("script");
    board.take_updates();

    interp.parse("A.x = 1;").expect("update");
    let a = board.select_by_id_or_name("el1").expect("A");
    let s = board.select_by_id_or_name("el3").expect("s");
    assert_eq!(board.take_updates(), vec![a, s]);
    let length = interp.parse("s.L();").expect("length");
    let length = length.as_number().expect("number");
    assert!((length - 20f64.sqrt()).abs() < 1e-12);
}

#[test]
fn function_coordinates_act_as_providers() {
    let (_board, mut interp) = board_interpreter();
    interp
        .parse("t = 2; P = point(map () -> t, 0);")
        .expect("script");
    assert_eq!(interp.parse("X(P);"), Ok(Value::Number(2.0)));
    assert_eq!(interp.parse("t = 5; X(P);"), Ok(Value::Number(5.0)));

    let err = interp.parse("P.x;").expect_err("provider property");
    assert!(matches!(err, ScriptError::Type { .. }), "{err}");
}

#[test]
fn delete_removes_the_element() {
    let (board, mut interp) = board_interpreter();
    interp.parse("P = point(1, 1);").expect("script");
    assert_eq!(board.len(), 1);
    interp.parse("delete P;").expect("delete");
    assert!(board.is_empty());
    assert!(
        interp
            .warnings()
            .iter()
            .any(|warning| warning.kind == WarningKind::Deprecation)
    );
}

#[test]
fn board_and_host_lookup() {
    let (_board, mut interp) = board_interpreter();
    interp.parse("point(1, 2) <<name: 'Q'>>;").expect("script");
    assert_eq!(interp.parse("Q.x;"), Ok(Value::Number(1.0)));
    assert_eq!(interp.parse("$board.type;"), Ok(Value::from("board")));

    let offline = Options::default().with_host_resolution(false);
    let mut interp = Interpreter::with_options(offline);
    interp.parse("point(1, 2) <<name: 'Q'>>;").expect("script");
    assert_eq!(interp.parse("Q;"), Ok(Value::Undefined));
}

#[test]
fn method_calls_bind_this() {
    let source = "o = <<base: 10>>; o.plus = function(n) { return $this.base + n; }; o.plus(5);";
    assert_eq!(number(source), 15.0);
}

#[test]
fn snippets_evaluate_against_globals() {
    let mut interp = Interpreter::new();
    interp.parse("w = 4;").expect("script");
    assert_eq!(interp.evaluate_snippet("w * 2 + 1"), Ok(Value::Number(9.0)));
    assert_eq!(interp.global("w"), Some(Value::Number(4.0)));
}

#[test]
fn compiled_closure_takes_parameters() {
    let mut interp = Interpreter::new();
    let closure = interp
        .compile_to_function("y = x * 2; y + 1;", &["x"])
        .expect("compile");
    assert!(!closure.source().is_empty());
    assert_eq!(
        closure.invoke(&mut interp, &[Value::Number(4.0)]),
        Ok(Value::Number(9.0))
    );
    assert!(closure.to_value().as_function().is_some_and(|f| f.is_compiled()));
}

#[test]
fn compiled_listing_names_builtins() {
    let registry = std::rc::Rc::new(Registry::standard());
    let lit = match expr("map (x) -> sin(x) + 1").kind {
        ExprKind::Map(lit) => lit,
        other => panic!("expected a map, got {other:?}"),
    };
    let body = Compiler::new(registry).compile_body(&Body::Map(lit));
    assert_eq!(body.mode(), BodyMode::Expression);
    assert_eq!(body.params(), ["x".to_string()]);
    assert!(body.source().contains("math::sin"), "{}", body.source());
}

#[test]
fn registry_lists_every_builtin() {
    let registry = Registry::standard();
    let all = registry.list_all();
    assert!(all.windows(2).all(|pair| pair[0].name <= pair[1].name));
    assert!(all.iter().any(|info| info.name == "sin" && info.origin == Origin::Math));
    assert!(all.iter().any(|info| info.name == "D" && info.origin == Origin::Core));
    assert!(registry.has("dist"));

    let json = serde_json::to_value(&all).expect("serialize");
    let names: Vec<&str> = json
        .as_array()
        .expect("array")
        .iter()
        .filter_map(|item| item["name"].as_str())
        .collect();
    assert_eq!(names.len(), all.len());
}

#[test]
fn options_accept_partial_configuration() {
    let options: Options = serde_json::from_str(r#"{ "simplify": false }"#).expect("parse");
    assert!(!options.simplify);
    assert_eq!(options.approx_tolerance, DEFAULT_APPROX_TOLERANCE);

    let json = serde_json::to_string(&options).expect("serialize");
    let back: Options = serde_json::from_str(&json).expect("parse");
    assert_eq!(back, options);
}

#[test]
fn derivative_expansion_can_be_disabled() {
    let options = Options::default().with_derivative_expansion(false);
    let mut interp = Interpreter::with_options(options);
    let value = interp
        .parse("f = map (x) -> x^2; D(f)(3);")
        .expect("runtime derivative");
    assert_eq!(value, Value::Number(6.0));
}

#[test]
fn element_kinds_round_trip_creator_names() {
    for kind in ElementKind::CREATORS {
        assert_eq!(ElementKind::creator(kind.name()), Some(kind));
    }
    assert_eq!(ElementKind::creator("board"), None);
}

#[test]
fn host_errors_surface_through_remove() {
    let mut board = Board::new();
    let attrs = BTreeMap::new();
    let handle = board
        .create_object(ElementKind::Point, vec![1.0.into(), 2.0.into()], attrs)
        .expect("create");
    assert_eq!(board.remove_object(handle), Ok(()));
    assert_eq!(
        board.remove_object(handle),
        Err(HostError::UnknownElement(handle))
    );
}
