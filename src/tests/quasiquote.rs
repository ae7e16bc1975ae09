use super::{printed, run};

#[test]
fn plain_syntax_quote_is_quote() {
    assert_eq!(printed("`foo"), "foo");
    assert_eq!(printed("`(1 2 3 4)"), "(1 2 3 4)");
    assert_eq!(printed("(syntax-quote (1 2 3))"), "(1 2 3)");
}

#[test]
fn unquote_evaluates_in_place() {
    assert_eq!(printed("`(1 ~(+ 1 1) 3)"), "(1 2 3)");
    assert_eq!(printed("(def x 42) `(the answer is ~x)"), "(the answer is 42)");
    assert_eq!(printed("`~(+ 1 1)"), "2");
}

#[test]
fn splicing_unquote_splices_into_the_list() {
    assert_eq!(printed("`(1 ~(+ 1 1) ~@(list 3 4))"), "(1 2 3 4)");
    assert_eq!(printed("`(~@(list 1 2) ~@(list 3 4))"), "(1 2 3 4)");
    assert_eq!(printed("`(a ~@())"), "(a)");
    assert_eq!(printed("(syntax-quote (1 (unquote (+ 1 1)) (splicing-unquote (list 3 4))))"),
               "(1 2 3 4)");
}

#[test]
fn splicing_a_non_list_is_an_error() {
    assert!(run("`(a ~@5)").is_err());
}

#[test]
fn nesting_tracks_quote_depth() {
    // One level down, the unquote survives literally.
    assert_eq!(printed("``~x"), "(syntax-quote (unquote x))");
    // Two quotes, two unquotes: the inner payload evaluates.
    assert_eq!(printed("(def x 7) (eval ``~~x)"), "7");
    assert_eq!(printed("`(a `(b ~(c)))"), "(a (syntax-quote (b (unquote (c)))))");
}

#[test]
fn quasiquote_inside_macros_builds_code() {
    let src = "(defmacro swap-args (form)
                 `(~(car form) ~(third form) ~(second form)))
               (swap-args (- 2 10))";
    assert_eq!(printed(src), "8");
}

#[test]
fn quote_shorthand_inside_templates() {
    assert_eq!(printed("`(a 'b)"), "(a (quote b))");
}
