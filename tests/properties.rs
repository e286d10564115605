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

// Property-based checks for the symbolic layer and the lexer.

use geoscript::{Interpreter, Value, parse_expression, same_structure, simplify, tokenize};
use proptest::prelude::*;

/// Source text of small arithmetic expressions over `x` and `y`.
fn arithmetic() -> impl Strategy<Value = String> {
    let leaf = prop_oneof![
        (0u8..5).prop_map(|n| n.to_string()),
        Just("x".to_string()),
        Just("y".to_string()),
    ];
    leaf.prop_recursive(4, 32, 2, |inner| {
        prop_oneof![
            (inner.clone(), prop::sample::select(vec!["+", "-", "*", "/", "^"]), inner.clone())
                .prop_map(|(left, op, right)| format!("({left} {op} {right})")),
            inner.prop_map(|operand| format!("-({operand})")),
        ]
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn simplification_reaches_a_fixed_point(source in arithmetic()) {
        let expr = parse_expression(&source).expect("generated source parses");
        let once = simplify(&expr);
        let twice = simplify(&once);
        prop_assert!(
            same_structure(&once, &twice),
            "{} -> {} -> {}", source, once, twice
        );
    }

    #[test]
    fn relexed_tokens_keep_their_kind(
        words in prop::collection::vec(
            prop_oneof![
                "[a-z_][a-z0-9_]{0,6}",
                "[0-9]{1,4}(\\.[0-9]{1,3})?",
                prop::sample::select(vec![
                    "<=", ">=", "==", "!=", "~=", "&&", "||", "->", "<<", ">>",
                    "+", "-", "*", "/", "^", "(", ")", "[", "]", ",", ";",
                ]).prop_map(str::to_string),
            ],
            1..12,
        )
    ) {
        let source = words.join(" ");
        let tokens = tokenize(&source).expect("generated source lexes");
        prop_assert_eq!(tokens.len(), words.len() + 1);
        for (token, word) in tokens.iter().zip(&words) {
            prop_assert_eq!(&token.text, word);
            let again = tokenize(&token.text).expect("token text lexes");
            prop_assert_eq!(&again[0].kind, &token.kind);
        }
    }

    #[test]
    fn monomial_derivative_matches_power_rule(c in 1u32..6, n in 1i32..6, at in 1u32..5) {
        let mut interp = Interpreter::new();
        let source = format!("f = map (x) -> {c} * x^{n}; df = D(f); df({at});");
        let value = interp.parse(&source).expect("script runs");
        let expected = f64::from(c) * f64::from(n) * f64::from(at).powi(n - 1);
        match value {
            Value::Number(slope) => prop_assert!((slope - expected).abs() < 1e-9, "{} != {}", slope, expected),
            other => prop_assert!(false, "expected a number, got {}", other),
        }
    }
}
