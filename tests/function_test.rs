mod common;
use common::*;

#[test]
fn test_function_call() {
    let mut r = runtime();
    assert_eq!(exec(&mut r, "func sq() return $1*$1\nprint sq(7)"), "49 ");
    assert_eq!(
        exec(&mut r, "func sub() return $1 - $2\nprint sub(10, 3), sq(sub(5, 2))"),
        "7 9 "
    );
}

#[test]
fn test_recursion() {
    let mut r = runtime();
    assert_eq!(
        exec(
            &mut r,
            "func fib() {\n  if ($1 < 2) return $1\n  return fib($1-1) + fib($1-2)\n}\nprint fib(10)"
        ),
        "55 "
    );
    assert_eq!(r.stack_depth(), 0);
}

#[test]
fn test_procedure() {
    let mut r = runtime();
    assert_eq!(
        exec(&mut r, r#"proc greet() { print "hi ", $1 }
greet(3)"#),
        "hi 3 "
    );
    assert_eq!(
        exec(
            &mut r,
            "proc p() { if ($1 > 0) { print 1; return }; print 0 }\np(1)\np(0)"
        ),
        "1 0 "
    );
}

#[test]
fn test_return_from_loop() {
    let mut r = runtime();
    assert_eq!(
        exec(
            &mut r,
            "func first() { for (i = 1; i < 100; i++) if (i * i > $1) return i; return 0 }\nprint first(50), first(20000)"
        ),
        "8 0 "
    );
}

#[test]
fn test_arg_assignment() {
    let mut r = runtime();
    assert_eq!(
        exec(&mut r, "func f() { $1 = $1 * 2; return $1 }\nprint f(4)"),
        "8 "
    );
}

#[test]
fn test_function_as_statement() {
    let mut r = runtime();
    assert_eq!(exec(&mut r, "func f() return 1\nf(); print 2"), "2 ");
    assert_eq!(r.stack_depth(), 0);
}

#[test]
fn test_definitions_persist() {
    let mut r = runtime();
    assert_eq!(exec(&mut r, "func dbl() return 2*$1"), "");
    assert_eq!(exec(&mut r, "print dbl(21)"), "42 ");
    assert_eq!(exec(&mut r, "print dbl(dbl(1))"), "4 ");
    assert_eq!(exec(&mut r, "func dbl() return 3*$1\nprint dbl(1)"), "3 ");
}

#[test]
fn test_wrong_kind_returns() {
    let mut r = runtime();
    assert_eq!(
        exec(&mut r, "proc p() return 1\np()"),
        "?procedure returns value; p\n"
    );
    assert_eq!(
        exec(&mut r, "func f() x = 1\nprint f()"),
        "?function returns no value; f\n"
    );
}

#[test]
fn test_not_enough_arguments() {
    let mut r = runtime();
    assert_eq!(
        exec(&mut r, "func f() return $2\nprint f(1)"),
        "?not enough arguments; f\n"
    );
}

#[test]
fn test_call_errors() {
    let mut r = runtime();
    assert_eq!(
        exec(&mut r, "print g(1)"),
        "?syntax error in line 1; undefined function g\n"
    );
    assert_eq!(
        exec(&mut r, "proc p() print 1\nprint p()"),
        "?syntax error in line 2; procedure p used in expression\n"
    );
    assert_eq!(
        exec(&mut r, "func f() return f($1)\nprint f(1)"),
        "?call nested too deeply; f\n"
    );
}

#[test]
fn test_definition_only() {
    let mut r = runtime();
    assert_eq!(
        exec(&mut r, "print $1"),
        "?used outside definition in line 1; $1\n"
    );
    assert_eq!(
        exec(&mut r, "x = 1\nreturn"),
        "?used outside definition in line 2; return\n"
    );
}
