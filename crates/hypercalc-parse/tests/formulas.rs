use hypercalc_core::{CalcError, Dim, Ultra};
use hypercalc_parse::{Binding, Formula, FormulaOptions, FormulaSystem};

#[test]
fn test_formula_reevaluates_after_rebinding() {
    let mut f = Formula::new("principal * (1 + rate) ^ ?").unwrap();
    assert_eq!(f.template(), "? * (1 + ?) ^ ?");
    f.bind_named("principal", Ultra::real(100.0)).unwrap();
    f.bind_named("rate", Ultra::real(0.5)).unwrap();
    f.bind(2, Ultra::real(2.0)).unwrap();
    assert_eq!(f.result().unwrap(), Ultra::real(225.0));
    f.bind(2, Ultra::real(1.0)).unwrap();
    assert_eq!(f.result().unwrap(), Ultra::real(150.0));
    assert_eq!(f.to_string(), "100 * (1 + 0.5) ^ 1");
}

#[test]
fn test_nested_formula_bindings() {
    let mut inner = Formula::new("x²").unwrap();
    inner.bind_named("x", Ultra::unit(Dim::I)).unwrap();
    let mut outer = Formula::new("1 + y").unwrap();
    outer.bind_named("y", inner).unwrap();
    assert_eq!(outer.render(), "1 + ((ⅈ)²)");
    assert_eq!(outer.result().unwrap(), Ultra::ZERO);
}

#[test]
fn test_system_session() {
    let mut system = FormulaSystem::new("area", "w * h").unwrap();
    system.apply("w = 3, h := base + 1").unwrap();
    assert_eq!(system.identifiers().collect::<Vec<_>>(), vec!["base", "h", "w"]);
    assert!(system.owner("base").is_some());
    system.set("base", "1.5").unwrap();
    assert_eq!(system.result().unwrap(), Ultra::real(7.5));

    system.set("h", "2ε").unwrap();
    assert!(!system.contains("base"));
    assert!(matches!(system.binding("h"), Some(Binding::Literal(_))));
    assert_eq!(system.result().unwrap(), Ultra::component(Dim::E, 6.0));
    assert_eq!(system.to_string(), "area = 3 * (2ε)");
}

#[test]
fn test_system_errors() {
    let mut system = FormulaSystem::new("f", "a + b").unwrap();
    assert!(matches!(system.set("c", "1"), Err(CalcError::UnknownIdentifier(_))));
    assert!(matches!(system.apply("a"), Err(CalcError::Binding(_))));
    assert!(matches!(system.set("a", "2y"), Err(CalcError::Literal { .. })));
    assert!(matches!(system.set("a", "(1"), Err(CalcError::Unbalanced(_))));
    assert!(matches!(
        FormulaSystem::new("g", "a + #"),
        Err(CalcError::Literal { .. })
    ));
}

#[test]
fn test_strict_system() {
    let options = FormulaOptions {
        strict_identifiers: true,
        ..FormulaOptions::default()
    };
    let mut system = FormulaSystem::with_options("f", "a * b", options).unwrap();
    system.set("a", "2").unwrap();
    assert!(matches!(system.result(), Err(CalcError::UnknownIdentifier(name)) if name == "b"));
    system.set("b", "c - 1").unwrap();
    assert!(matches!(system.result(), Err(CalcError::UnknownIdentifier(name)) if name == "c"));
    system.set("c", "4").unwrap();
    assert_eq!(system.result().unwrap(), Ultra::real(6.0));
}
