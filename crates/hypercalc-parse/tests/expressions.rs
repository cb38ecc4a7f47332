use hypercalc_core::{CalcError, Dim, Scalar, Ultra};
use hypercalc_parse::{eval, eval_direct, evaluate, parse_ultra, ParserOptions, UltraDomain};
use proptest::prelude::*;

fn assert_real(text: &str, expected: f64) {
    let value = eval(text).unwrap();
    assert!(value.is_real(), "{text} = {value}");
    assert!(
        (value.real_part() - expected).abs() < 1e-9,
        "{text} = {value}, expected {expected}"
    );
}

#[test]
fn test_precedence() {
    assert_real("2 + 2 * 2 ^ 2", 10.0);
    assert_real("(2 + 2) * 2 ^ 2", 16.0);
    assert_real("10 ^ (-1)", 0.1);
    assert_real("-2 ^ 2", -4.0);
    assert_real("2 ^ 3 ^ 2", 512.0);
    assert_real("12 / 3 / 2", 2.0);
}

#[test]
fn test_functions_and_constants() {
    assert_real("sin(pi / 2)", 1.0);
    assert_real("2_log(8)", 3.0);
    assert_real("ln(e ^ 2)", 2.0);
    assert_real("cosh 0 + sqrt(9)", 4.0);
    assert_real("1e-3 * 1E3", 1.0);
    assert_real("RE(3 + 4ⅈ)", 3.0);
}

#[test]
fn test_units() {
    assert_real("ⅈ²", -1.0);
    assert_real("ⅉ²", 1.0);
    assert_real("ε²", 0.0);
    assert_eq!(eval("2ⅈⅉ").unwrap(), Ultra::component(Dim::IJ, 2.0));
    let euler = eval("exp(ⅈ * pi)").unwrap();
    assert!(euler.approx_eq(&Ultra::real(-1.0), 1e-12), "{euler}");
    let root = eval("sqrt(-4)").unwrap();
    assert!((root * root).approx_eq(&Ultra::real(-4.0), 1e-9), "{root}");
}

#[test]
fn test_conjugate_and_inverse() {
    let x = eval("inverse(1 + ⅈ)").unwrap();
    assert!(x.approx_eq(&eval("0.5 - 0.5ⅈ").unwrap(), 1e-12), "{x}");
    let product = eval("(2 + ε) * conjugate(2 + ε)").unwrap();
    assert!(product.is_real(), "{product}");
}

#[test]
fn test_direct_evaluation() {
    assert_eq!(
        eval_direct("(1 + 2ⅈ) * (3 - ⅈ)").unwrap(),
        Scalar::complex(5.0, 5.0)
    );
    assert_eq!(eval_direct("(2 + 3ε)^2").unwrap(), Scalar::dual(4.0, 12.0));
    assert_eq!(eval_direct("length(3 + 4ⅈ)").unwrap(), Scalar::real(5.0));
    assert_eq!(eval_direct("IM(ⅉ * 2)").unwrap(), Scalar::real(2.0));
    assert_eq!(eval_direct("(1 + ⅈ) dot (2 - ⅈ)").unwrap(), Scalar::real(1.0));
    assert_eq!(eval_direct("floor(2.5 + 1.5ⅉ)").unwrap(), Scalar::binary(2.0, 1.0));
}

#[test]
fn test_no_result() {
    assert!(matches!(eval("1 / 0"), Err(CalcError::NoResult { .. })));
    assert!(matches!(eval_direct("ⅈ + ⅉ"), Err(CalcError::NoResult { .. })));
    assert!(matches!(eval_direct("ln(ⅉ)"), Err(CalcError::NoResult { .. })));
    assert!(matches!(eval_direct("(-1 + ε) ^ 0.5"), Err(CalcError::NoResult { .. })));
    match eval("ln 0") {
        Err(CalcError::NoResult { expression }) => assert_eq!(expression, "ln 0"),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_syntax_errors() {
    assert!(matches!(eval(""), Err(CalcError::Syntax { .. })));
    assert!(matches!(eval("(1 + 2"), Err(CalcError::Unbalanced(_))));
    assert!(matches!(eval("1 + 2)"), Err(CalcError::Unbalanced(_))));
    assert!(matches!(eval("foo"), Err(CalcError::Literal { .. })));
    assert!(matches!(eval("3 dot 4"), Err(CalcError::Literal { .. })));
    assert!(matches!(eval("(1)(2)"), Err(CalcError::Syntax { .. })));
}

#[test]
fn test_depth_limit_from_options() {
    let text = "-".repeat(20) + "1";
    let shallow = ParserOptions { max_depth: 5 };
    assert!(matches!(
        evaluate(&text, &UltraDomain, shallow),
        Err(CalcError::TooDeep { limit: 5 })
    ));
    assert_real(&text, 1.0);
}

#[test]
fn test_print_reproduces_tree() {
    for text in [
        "2 + 2 * 2 ^ 2",
        "((1 + 2)) * -3",
        "sin 2² + cos(ⅈ)",
        "2_log(8) _log 9",
        "1 - -ⅈε",
        "conjugate(1 + ⅉ)³",
    ] {
        let tree = parse_ultra(text).unwrap();
        let printed = tree.to_string();
        assert_eq!(parse_ultra(&printed).unwrap(), tree, "{text} printed as {printed}");
    }
}

fn expression() -> impl Strategy<Value = String> {
    let leaf = prop_oneof![
        (0u32..100).prop_map(|n| n.to_string()),
        Just("pi".to_string()),
        Just("2.5".to_string()),
        Just("1e-3".to_string()),
        Just("ⅈ".to_string()),
        Just("ε".to_string()),
    ];
    leaf.prop_recursive(4, 32, 2, |inner| {
        prop_oneof![
            (
                inner.clone(),
                prop::sample::select(vec!["+", "-", "*", "/", "^", "_log"]),
                inner.clone()
            )
                .prop_map(|(a, op, b)| format!("{a} {op} {b}")),
            inner.clone().prop_map(|a| format!("({a})")),
            inner.clone().prop_map(|a| format!("-{a}")),
            (
                prop::sample::select(vec!["sin", "exp", "sqrt", "conjugate", "atanh"]),
                inner.clone()
            )
                .prop_map(|(f, a)| format!("{f}({a})")),
            (inner, prop::sample::select(vec!["²", "³", "ⅈ", "ⅉ"]))
                .prop_map(|(a, s)| format!("({a}){s}")),
        ]
    })
}

proptest! {
    #[test]
    fn test_parse_print_round_trip(text in expression()) {
        let tree = parse_ultra(&text).unwrap();
        let printed = tree.to_string();
        let again = parse_ultra(&printed).unwrap();
        prop_assert_eq!(again, tree, "{} printed as {}", text, printed);
    }
}
