use super::{error_text, printed, run};

#[test]
fn unbound_atoms_report_their_name() {
    let text = error_text("zorp");
    assert!(text.contains("unbound atom 'zorp'"), "got: {}", text);
}

#[test]
fn application_errors_carry_the_call_site() {
    let text = error_text("(+ 1 'a)");
    assert!(text.contains("expected number"), "got: {}", text);
    assert!(text.contains("(+ 1 (quote a))"), "got: {}", text);
}

#[test]
fn nested_applications_build_a_context_chain() {
    let text = error_text("(+ (+ 1 'a) 2)");
    let inner = text.find("ERROR in '(+ 1 (quote a))'").expect(&text);
    let outer = text.find("ERROR in '(+ (+ 1 (quote a)) 2)'").expect(&text);
    assert!(outer < inner, "outer context should come first: {}", text);
}

#[test]
fn applying_a_non_function_says_so() {
    let text = error_text("(1)");
    assert!(text.contains("is not a function"), "got: {}", text);
    let text = error_text("((quote foo) 1)");
    assert!(text.contains("is not a function"), "got: {}", text);
}

#[test]
fn lambda_arity_mismatches() {
    assert!(run("((lambda (x) x))").is_err());
    assert!(run("((lambda (x) x) 1 2)").is_err());
    assert!(run("((lambda (x . xs) x))").is_err());
    assert_eq!(printed("((lambda (x . xs) x) 1)"), "1");
    let text = error_text("((lambda (x y) x) 1)");
    assert!(text.contains("expects 2 argument(s), got 1"), "got: {}", text);
}

#[test]
fn domain_errors() {
    let text = error_text("(/ 1 0)");
    assert!(text.contains("division by zero"), "got: {}", text);
    assert!(run("(rem 1 0)").is_err());
    assert!(run("(isqrt -4)").is_err());
}

#[test]
fn user_errors_keep_their_payload() {
    let text = error_text("(error '(something went boom))");
    assert!(text.contains("(something went boom)"), "got: {}", text);
}

#[test]
fn caught_errors_become_lists() {
    assert_eq!(printed("(try (error '(boom)) (catch e e))"), "((boom))");
    assert_eq!(
        printed("(try (/ 1 0) (catch e (car e)))"),
        "(/ 1 0)"
    );
    assert_eq!(
        printed("(try (/ 1 0) (catch e (last e)))"),
        "(division by zero)"
    );
}

#[test]
fn parse_errors_surface_from_load() {
    assert!(run("(unclosed (list").is_err());
    assert!(run(")").is_err());
    assert!(run("\"strings are not a thing\"").is_err());
}

#[test]
fn duplicate_parameters_are_rejected() {
    assert!(run("(lambda (x x) x)").is_err());
    assert!(run("(lambda (x . x) x)").is_err());
    assert_eq!(printed("((lambda (x y) (+ x y)) 1 2)"), "3");
}

#[test]
fn errors_report_as_catch_mismatch_text() {
    let text = error_text("(errors '(no match here) (/ 1 0))");
    assert!(text.contains("expected"), "got: {}", text);
    let text = error_text("(errors '(is not a function) (+ 1 1))");
    assert!(text.contains("error not found"), "got: {}", text);
    assert!(text.contains("(errors (quote (is not a function)) (+ 1 1))"), "got: {}", text);
}
