use super::*;

#[test]
fn test_expression_postorder() {
    let mut r = runtime();
    assert_eq!(r.compile("x = 2 + y").unwrap(), 0);
    assert_eq!(
        r.listing(),
        "0\tCONSTPUSH\n1\t2\n2\tVARPUSH\n3\ty\n4\tEVAL\n5\tADD\n\
         6\tVARPUSH\n7\tx\n8\tASSIGN\n9\tPOP\n10\tSTOP\n"
    );
}

#[test]
fn test_while_backpatch() {
    let mut r = runtime();
    r.compile("while (x) x--").unwrap();
    assert_eq!(op(&r, 0), Opcode::While);
    assert_eq!(cell(&r, 1), Cell::Address(7));
    assert_eq!(cell(&r, 2), Cell::Address(11));
    assert_eq!(cell(&r, 6), Cell::Stop);
    assert_eq!(op(&r, 7), Opcode::PostDec);
    assert_eq!(cell(&r, 10), Cell::Stop);
    assert_eq!(cell(&r, 11), Cell::Stop);
    assert_eq!(r.program().len(), 12);
}

#[test]
fn test_if_without_else() {
    let mut r = runtime();
    r.compile("if (1) print 2").unwrap();
    assert_eq!(op(&r, 0), Opcode::If);
    assert_eq!(cell(&r, 1), Cell::Address(7));
    assert_eq!(cell(&r, 2), Cell::Stop);
    assert_eq!(cell(&r, 3), Cell::Address(11));
    assert_eq!(op(&r, 9), Opcode::PrExpr);
}

#[test]
fn test_if_with_else() {
    let mut r = runtime();
    r.compile("if (1) print 2 else print 3").unwrap();
    assert_eq!(cell(&r, 1), Cell::Address(7));
    assert_eq!(cell(&r, 2), Cell::Address(11));
    assert_eq!(cell(&r, 3), Cell::Address(15));
    assert_eq!(cell(&r, 12), Cell::Number(3.0));
    assert_eq!(cell(&r, 14), Cell::Stop);
}

#[test]
fn test_for_backpatch() {
    let mut r = runtime();
    r.compile("for (i = 0; i < 2; i++) x = i").unwrap();
    assert_eq!(op(&r, 0), Opcode::For);
    assert_eq!(cell(&r, 1), Cell::Address(11));
    assert_eq!(cell(&r, 2), Cell::Address(18));
    assert_eq!(cell(&r, 3), Cell::Address(21));
    assert_eq!(cell(&r, 4), Cell::Address(29));
    assert_eq!(op(&r, 9), Opcode::Assign);
    assert_eq!(cell(&r, 10), Cell::Stop);
    assert_eq!(op(&r, 18), Opcode::PostInc);
    assert_eq!(op(&r, 27), Opcode::Pop);
}

#[test]
fn test_definition_entry() {
    let mut r = runtime();
    let e = r.compile("p()\nproc p() print 1").unwrap_err();
    assert_eq!(e.code(), crate::lang::ErrorCode::SyntaxError);

    let entry = r.compile("proc p() print 1\np()").unwrap();
    assert_eq!(entry, 5);
    assert_eq!(r.program().base(), 5);
    let p = r.symbols().lookup("p").unwrap();
    assert_eq!(r.symbols().get(p).defn(), Some(0));
    assert_eq!(op(&r, 3), Opcode::ProcRet);
    assert_eq!(cell(&r, 4), Cell::Stop);
    assert_eq!(op(&r, 5), Opcode::Call);
    assert_eq!(cell(&r, 6), Cell::Symbol(p));
    assert_eq!(cell(&r, 7), Cell::Count(0));
    assert_eq!(cell(&r, 8), Cell::Stop);
}

#[test]
fn test_definitions_precede_top_level() {
    let mut r = runtime();
    let entry = r.compile("x = 1\nfunc f() return 2").unwrap();
    assert_eq!(entry, 5);
    assert_eq!(op(&r, 0), Opcode::ConstPush);
    assert_eq!(op(&r, 2), Opcode::FuncRet);
    assert_eq!(op(&r, 5), Opcode::ConstPush);
}

#[test]
fn test_echo_mode() {
    let mut r = runtime();
    r.set_echo(true);
    r.compile("1").unwrap();
    assert_eq!(op(&r, 2), Opcode::PrintTop);
}

#[test]
fn test_enter_rewinds_top_level() {
    let mut r = runtime();
    r.compile("func f() return 1").unwrap();
    assert_eq!(r.program().len(), 6);
    r.enter("print f(), f()").unwrap();
    assert_eq!(r.program().len(), 5);
    assert_eq!(r.console().output(), "1 1 ");
}

#[test]
fn test_calls_and_args() {
    let mut r = runtime();
    r.compile("func f() { $2 = $1; return $2 }\nprint f(3, 4)").unwrap();
    assert_eq!(op(&r, 0), Opcode::Arg);
    assert_eq!(cell(&r, 1), Cell::Count(1));
    assert_eq!(op(&r, 2), Opcode::ArgAssign);
    assert_eq!(cell(&r, 3), Cell::Count(2));
    assert_eq!(op(&r, 4), Opcode::Pop);
    assert_eq!(op(&r, 7), Opcode::FuncRet);
}

#[test]
fn test_execute_resets_after_error() {
    let mut r = runtime();
    let entry = r.compile("print 1/0").unwrap();
    assert!(r.execute(entry).is_err());
    let entry = r.compile("print 2").unwrap();
    r.execute(entry).unwrap();
    assert_eq!(r.console().output(), "2 ");
    assert_eq!(r.stack_depth(), 0);
}
