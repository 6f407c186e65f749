use proptest::prelude::*;
use tactlog::oracle::{FormulaOracle, TruthTable};
use tactlog::parser::parse_expr;
use tactlog::syntax::Model;
use tactlog::{Error, Expr, Formula, Ternary};

// ============================================================================
// Strategies
// ============================================================================

fn any_ternary() -> impl Strategy<Value = Ternary> {
    prop_oneof![Just(Ternary::True), Just(Ternary::False), Just(Ternary::Unknown)]
}

fn any_expr() -> impl Strategy<Value = Expr> {
    let leaf = prop_oneof![
        4 => prop::sample::select(vec!["a", "b", "c"]).prop_map(Expr::var),
        1 => any::<bool>().prop_map(Expr::constant),
    ];

    leaf.prop_recursive(
        4,  // deep
        24, // max size
        2,  // items per collection
        |inner| {
            prop_oneof![
                inner.clone().prop_map(Expr::negation),
                (inner.clone(), inner.clone()).prop_map(|(l, r)| Expr::and(l, r)),
                (inner.clone(), inner.clone()).prop_map(|(l, r)| Expr::or(l, r)),
                (inner.clone(), inner.clone()).prop_map(|(l, r)| Expr::implies(l, r)),
                (inner.clone(), inner).prop_map(|(l, r)| Expr::iff(l, r)),
            ]
        },
    )
}

/// Every assignment to `vars`.
fn all_assignments(vars: &[String]) -> Vec<Model> {
    (0..(1u32 << vars.len()))
        .map(|mask| {
            vars.iter()
                .enumerate()
                .map(|(i, name)| (name.clone(), mask & (1 << i) != 0))
                .collect()
        })
        .collect()
}

// ============================================================================
// Kleene logic
// ============================================================================

proptest! {
    #[test]
    fn double_negation(a in any_ternary()) {
        prop_assert_eq!(!!a, a);
    }

    #[test]
    fn and_true_is_identity(a in any_ternary()) {
        prop_assert_eq!(a & Ternary::True, a);
    }

    #[test]
    fn or_false_is_identity(a in any_ternary()) {
        prop_assert_eq!(a | Ternary::False, a);
    }

    #[test]
    fn and_unknown_is_false_only_for_false(a in any_ternary()) {
        let expected = if a == Ternary::False { Ternary::False } else { Ternary::Unknown };
        prop_assert_eq!(a & Ternary::Unknown, expected);
    }

    #[test]
    fn de_morgan(a in any_ternary(), b in any_ternary()) {
        prop_assert_eq!(!(a & b), !a | !b);
        prop_assert_eq!(!(a | b), !a & !b);
    }

    #[test]
    fn commutative(a in any_ternary(), b in any_ternary()) {
        prop_assert_eq!(a & b, b & a);
        prop_assert_eq!(a | b, b | a);
        prop_assert_eq!(a.equals(b), b.equals(a));
    }

    #[test]
    fn definite_values_behave_like_bool(a in any::<bool>(), b in any::<bool>()) {
        prop_assert_eq!(Ternary::from(a) & Ternary::from(b), Ternary::from(a && b));
        prop_assert_eq!(Ternary::from(a) | Ternary::from(b), Ternary::from(a || b));
        prop_assert_eq!(Ternary::from(a).equals(Ternary::from(b)), Ternary::from(a == b));
    }
}

// ============================================================================
// Formulas and the oracle
// ============================================================================

proptest! {
    #[test]
    fn models_are_exactly_the_satisfying_assignments(expr in any_expr()) {
        let vars: Vec<String> = expr.variables().into_iter().collect();
        let satisfying: Vec<Model> = all_assignments(&vars)
            .into_iter()
            .filter(|m| expr.evaluate(m) == Some(true))
            .collect();

        match Formula::new(expr.clone()) {
            Ok(formula) => {
                prop_assert!(!formula.models().is_empty());
                prop_assert_eq!(formula.variables(), vars.as_slice());
                for model in formula.models() {
                    prop_assert_eq!(expr.evaluate(model), Some(true));
                    prop_assert_eq!(model.len(), vars.len());
                }
                prop_assert_eq!(formula.models().len(), satisfying.len());
                for model in &satisfying {
                    prop_assert!(formula.models().contains(model));
                }
            }
            Err(err) => {
                let is_unsat = matches!(err, Error::UnsatisfiableFormula { .. });
                prop_assert!(is_unsat);
                prop_assert!(satisfying.is_empty());
            }
        }
    }

    #[test]
    fn oracle_agrees_with_formula_construction(expr in any_expr()) {
        let sat = TruthTable::default().is_satisfiable(&expr).unwrap();
        prop_assert_eq!(sat, Formula::new(expr).is_ok());
    }

    #[test]
    fn display_reparses_to_same_expr(expr in any_expr()) {
        let text = expr.to_string();
        let reparsed = parse_expr(&text);
        prop_assert_eq!(reparsed, Ok(expr), "text: {}", text);
    }
}
