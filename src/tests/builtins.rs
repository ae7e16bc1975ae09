use super::{printed, run};

#[test]
fn car_cdr_cons() {
    assert_eq!(printed("(car '(one two))"), "one");
    assert_eq!(printed("(cdr '(one two))"), "(two)");
    assert_eq!(printed("(car ())"), "()");
    assert_eq!(printed("(cdr ())"), "()");
    assert_eq!(printed("(cons 1 '(2 3))"), "(1 2 3)");
    assert_eq!(printed("(cons 1 ())"), "(1)");
    assert_eq!(printed("(cons 1 2)"), "(1 . 2)");
    assert_eq!(printed("(car (cons 'a 'b))"), "a");
    assert_eq!(printed("(cdr (cons 'a 'b))"), "b");
    assert!(run("(car 5)").is_err());
}

#[test]
fn list_construction_and_predicates() {
    assert_eq!(printed("(list 1 2 3)"), "(1 2 3)");
    assert_eq!(printed("(list)"), "()");
    assert_eq!(printed("(list? '(1 2))"), "t");
    assert_eq!(printed("(list? ())"), "t");
    assert_eq!(printed("(list? 1)"), "()");
    assert_eq!(printed("(atom? 'one)"), "t");
    assert_eq!(printed("(atom? 1)"), "()");
    assert_eq!(printed("(atom? ())"), "()");
    assert_eq!(printed("(number? 1)"), "t");
    assert_eq!(printed("(number? 'one)"), "()");
}

#[test]
fn len_requires_a_proper_list() {
    assert_eq!(printed("(len '(a b c))"), "3");
    assert_eq!(printed("(len ())"), "0");
    assert!(run("(len 5)").is_err());
    assert!(run("(len (cons 1 2))").is_err());
}

#[test]
fn not_follows_truthiness() {
    assert_eq!(printed("(not ())"), "t");
    assert_eq!(printed("(not t)"), "()");
    assert_eq!(printed("(not '(1 2 3))"), "()");
    assert_eq!(printed("(not 0)"), "()");
    for v in &["()", "0", "t", "'(1)"] {
        let src = format!("(not (not {}))", v);
        let expect = if *v == "()" { "()" } else { "t" };
        assert_eq!(printed(&src), expect);
    }
}

#[test]
fn sorting() {
    assert_eq!(printed("(sort '(3 2 1))"), "(1 2 3)");
    assert_eq!(printed("(sort '(c b a))"), "(a b c)");
    assert_eq!(printed("(sort ())"), "()");
    assert!(run("(sort '(1 a))").is_err());
    assert!(run("(sort '((1) (2)))").is_err());
    assert_eq!(
        printed("(sort-by second '((quux 333) (zip 222) (afar 111)))"),
        "((afar 111) (zip 222) (quux 333))"
    );
    assert_eq!(printed("(sort-by car '((3) (2) (1)))"), "((1) (2) (3))");
    assert_eq!(printed("(sort-by car ())"), "()");
}

#[test]
fn shuffle_preserves_the_elements() {
    assert_eq!(printed("(len (shuffle (range 10)))"), "10");
    assert_eq!(printed("(sort (shuffle (range 10)))"), printed("(range 10)"));
}

#[test]
fn apply_spreads_the_final_list() {
    assert_eq!(printed("(apply + '(1 2 3))"), "6");
    assert_eq!(printed("(apply + 1 2 '(3 4))"), "10");
    assert_eq!(printed("(apply * (cdr (range 5)))"), "24");
    assert_eq!(printed("(apply = '(t t t))"), "t");
    assert!(run("(apply + 5)").is_err());
}

#[test]
fn fuse_and_split() {
    assert_eq!(printed("(split 123)"), "(1 2 3)");
    assert_eq!(printed("(split -123)"), "(-1 2 3)");
    assert_eq!(printed("(split 'abc)"), "(a b c)");
    assert_eq!(printed("(fuse '(a b c))"), "abc");
    assert_eq!(printed("(fuse '(1 2 3))"), "123");
    assert_eq!(printed("(fuse ())"), "()");
    assert_eq!(printed("(fuse (split 1295807125987))"), "1295807125987");
    assert_eq!(printed("(number? (fuse (split 1295807125987)))"), "t");
}

#[test]
fn case_conversion() {
    assert_eq!(printed("(upcase 'abc)"), "ABC");
    assert_eq!(printed("(downcase 'ABC)"), "abc");
    assert_eq!(printed("(downcase 'Hello)"), "hello");
    assert!(run("(upcase 5)").is_err());
}

#[test]
fn gensym_returns_fresh_atoms() {
    assert_eq!(printed("(atom? (gensym))"), "t");
    assert_eq!(printed("(= (gensym) (gensym))"), "()");
    assert_eq!(printed("(atom? (gensym 'prefix))"), "t");
}

#[test]
fn introspection() {
    assert_eq!(printed("(body (lambda (x) (+ x 1)))"), "((+ x 1))");
    assert_eq!(printed("(source (lambda (x) x))"), "(lambda (x) x)");
    assert_eq!(printed("(source (lambda (x . xs) x))"), "(lambda (x . xs) x)");
    assert_eq!(printed("(car (doc +))"), "Add");
    assert_eq!(
        printed("(car (doc map))"),
        "(apply a function to each element of a list)"
    );
    assert!(run("(source +)").is_err());
    assert!(run("(doc 5)").is_err());
}

#[test]
fn forms_lists_installed_operators() {
    assert_eq!(printed("(list? (forms))"), "t");
    assert_eq!(printed("(not (len (forms)))"), "()");
}

#[test]
fn version_is_three_numbers() {
    assert_eq!(printed("(len (version))"), "3");
    assert_eq!(printed("(number? (car (version)))"), "t");
}

#[test]
fn eval_builtin_sees_the_current_environment() {
    assert_eq!(printed("(eval '(+ 1 2))"), "3");
    assert_eq!(printed("(def a 41) (eval '(+ a 1))"), "42");
    assert_eq!(printed("(eval ''foo)"), "foo");
}

#[test]
fn randint_stays_in_range() {
    assert_eq!(printed("(< (randint 10) 10)"), "t");
    assert_eq!(printed("(>= (randint 10) 0)"), "t");
    assert_eq!(printed("(randint 1)"), "0");
    assert!(run("(randint 0)").is_err());
    assert!(run("(randint -3)").is_err());
}

#[test]
fn builtin_arity_is_checked() {
    assert!(run("(car)").is_err());
    assert!(run("(car '(1) '(2))").is_err());
    assert!(run("(cons 1)").is_err());
    assert!(run("(/ 1)").is_err());
    assert!(run("(rem 1)").is_err());
    assert!(run("(=)").is_err());
}
