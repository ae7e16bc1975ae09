use super::{printed, run, run_in_env};
use crate::builtins::default_env;
use crate::expression::Expression;

#[test]
fn self_evaluating_values() {
    assert_eq!(printed("1"), "1");
    assert_eq!(printed("1089710983751098757"), "1089710983751098757");
    assert_eq!(printed("()"), "()");
    assert_eq!(printed("t"), "t");
}

#[test]
fn quote_returns_the_form_unevaluated() {
    assert_eq!(printed("(quote 3)"), "3");
    assert_eq!(printed("(quote foo)"), "foo");
    assert_eq!(printed("(quote (1 2 3))"), "(1 2 3)");
    assert_eq!(printed("(quote ())"), "()");
    assert_eq!(printed("(quote (((1 2 3))))"), "(((1 2 3)))");
    assert_eq!(printed("'(1 2 3)"), "(1 2 3)");
}

#[test]
fn arithmetic() {
    assert_eq!(printed("(+)"), "0");
    assert_eq!(printed("(+ 1 1)"), "2");
    assert_eq!(printed("(+ 1 1 2 3)"), "7");
    assert_eq!(printed("(+ -1)"), "-1");
    assert_eq!(printed("(+ 1 2 3 4 5 6 7 8 9 10)"), "55");
    assert_eq!(printed("(+ (+ 1 2 3) 4 5 6)"), "21");
    assert_eq!(printed("(- 1)"), "-1");
    assert_eq!(printed("(- 1 1)"), "0");
    assert_eq!(printed("(- (+ 1 2 3) 4 5 6)"), "-9");
    assert_eq!(printed("(*)"), "1");
    assert_eq!(printed("(* 1 2 3 4 5)"), "120");
    assert_eq!(printed("(/ 4 2)"), "2");
    assert_eq!(printed("(/ 1 2)"), "0");
    assert_eq!(printed("(/ 12 2 3)"), "2");
}

#[test]
fn arithmetic_is_arbitrary_precision() {
    assert_eq!(printed("(+ 999999999999999 1)"), "1000000000000000");
    assert_eq!(
        printed("(- 12349807213490872130987 12349807213490872130987)"),
        "0"
    );
    assert_eq!(
        printed("(* 1 2 3 4 5 6 7 8 9 10 11 12 13 14 15 16 17 18 19 20)"),
        "2432902008176640000"
    );
    assert_eq!(
        printed("(= (isqrt (* 12345678901234567890 12345678901234567890)) 12345678901234567890)"),
        "t"
    );
}

#[test]
fn division_truncates_toward_zero() {
    assert_eq!(printed("(/ 7 2)"), "3");
    assert_eq!(printed("(/ -7 2)"), "-3");
    assert_eq!(printed("(rem 7 -2)"), "1");
    assert_eq!(printed("(rem -7 2)"), "-1");
}

#[test]
fn quotient_remainder_identity() {
    for (a, b) in &[(17, 5), (-17, 5), (17, -5), (-17, -5), (0, 3)] {
        let src = format!("(= {a} (+ (* (/ {a} {b}) {b}) (rem {a} {b})))", a = a, b = b);
        assert_eq!(printed(&src), "t", "failed for a={} b={}", a, b);
    }
}

#[test]
fn comparison_chains() {
    assert_eq!(printed("(= 1 1)"), "t");
    assert_eq!(printed("(= 1 2)"), "()");
    assert_eq!(printed("(= 'a 'a 'a)"), "t");
    assert_eq!(printed("(= '(1 2) '(1 2))"), "t");
    assert_eq!(printed("(< 1 2 3)"), "t");
    assert_eq!(printed("(< 1 1)"), "()");
    assert_eq!(printed("(< 1)"), "t");
    assert_eq!(printed("(<= 1 1 2)"), "t");
    assert_eq!(printed("(> 3 2 1)"), "t");
    assert_eq!(printed("(>= 3 3 1)"), "t");
}

#[test]
fn equality_is_symmetric_and_reflexive() {
    for x in &["1", "'a", "'(1 (2 3))", "()", "t"] {
        assert_eq!(printed(&format!("(= {} {})", x, x)), "t");
    }
    assert_eq!(printed("(= 'a 1)"), printed("(= 1 'a)"));
}

#[test]
fn environment_lookup() {
    assert_eq!(printed("(def a 1) a"), "1");
    assert_eq!(printed("(def a 1) (def b a) b"), "1");
}

#[test]
fn lambdas_are_first_class() {
    assert_eq!(printed("((lambda () t))"), "t");
    assert_eq!(printed("((lambda (x) (+ 5 x)) 5)"), "10");
    assert_eq!(printed("(def f (lambda (x) x)) (= f f)"), "t");
    assert_eq!(printed("(= (lambda (x) x) (lambda (x) x))"), "()");
}

#[test]
fn closures_capture_their_environment() {
    assert_eq!(
        printed("(def make-adder (lambda (n) (lambda (x) (+ x n)))) ((make-adder 3) 4)"),
        "7"
    );
    // Closures see later updates to the captured environment.
    assert_eq!(
        printed("(def n 1) (def f (lambda () n)) (set! n 2) (f)"),
        "2"
    );
}

#[test]
fn variadic_parameters_bundle_the_rest() {
    assert_eq!(printed("((lambda (x . xs) (list x xs)) 1 2 3 4)"), "(1 (2 3 4))");
    assert_eq!(printed("((lambda (x . xs) xs) 1)"), "()");
    assert_eq!(printed("((lambda (() . xs) xs) 1 2)"), "(1 2)");
}

#[test]
fn self_named_lambdas_recur() {
    assert_eq!(
        printed(
            "((lambda len- (x) (if (not x) 0 (+ 1 (len- (cdr x))))) '(a b c))"
        ),
        "3"
    );
}

#[test]
fn deep_tail_recursion_does_not_grow_the_stack() {
    assert_eq!(
        printed("((lambda recur (n) (if (zero? n) 'done (recur (- n 1)))) 100000)"),
        "done"
    );
}

#[test]
fn factorial_of_fifty() {
    let result = run(
        "(defn fact (n) (cond ((= 0 n) 1) (t (* n (fact (- n 1)))))) (fact 50)",
    )
    .unwrap();
    assert_eq!(
        result,
        Expression::Number(
            "30414093201713378043612608166064768844377641568960512000000000000"
                .parse()
                .unwrap()
        )
    );
}

#[test]
fn definitions_persist_across_loads() {
    let env = default_env();
    run_in_env("(def a 41)", &env).unwrap();
    assert_eq!(run_in_env("(inc a)", &env).unwrap().to_string(), "42");
    // A fresh environment is an independent interpreter.
    assert!(run_in_env("a", &default_env()).is_err());
}

#[test]
fn evaluating_a_builtin_returns_it() {
    assert_eq!(printed("+"), "<builtin: +>");
    assert_eq!(printed("(= + +)"), "t");
    assert_eq!(printed("(= + -)"), "()");
}
