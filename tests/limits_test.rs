mod common;
use common::*;
use minic::mach::Limits;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[test]
fn test_default_limits() {
    let limits = Limits::default();
    assert_eq!(limits.stack_len(), 256);
    assert_eq!(limits.frames_len(), 100);
    assert_eq!(limits.program_len(), 2000);
    assert_eq!(limits.depth_len(), 200);
}

#[test]
fn test_stack_boundary() {
    let mut r = runtime_with(Limits::new().stack(5));
    assert_eq!(exec(&mut r, "print 1+(2+(3+(4+5)))"), "15 ");
    let mut r = runtime_with(Limits::new().stack(4));
    assert_eq!(exec(&mut r, "print 1+(2+(3+(4+5)))"), "?stack overflow\n");
}

#[test]
fn test_frame_boundary() {
    let source = "func f() { if ($1 > 0) return f($1-1); return 0 }\n";
    let mut r = runtime_with(Limits::new().frames(3));
    assert_eq!(exec(&mut r, &format!("{}print f(2)", source)), "0 ");
    assert_eq!(
        exec(&mut r, "print f(3)"),
        "?call nested too deeply; f\n"
    );
}

#[test]
fn test_program_boundary() {
    let mut r = runtime_with(Limits::new().program(4));
    assert_eq!(exec(&mut r, "print 1"), "1 ");
    let mut r = runtime_with(Limits::new().program(3));
    assert_eq!(exec(&mut r, "print 1"), "?program too big\n");
    assert_eq!(r.program().len(), 0);
}

#[test]
fn test_nesting_depth() {
    let source = "func f() { if ($1 > 0) return f($1-1); return 0 }\n";
    let mut r = runtime_with(Limits::new().depth(8));
    assert_eq!(exec(&mut r, &format!("{}print f(1)", source)), "0 ");
    assert_eq!(exec(&mut r, "print f(10)"), "?nested too deeply\n");
}

#[test]
fn test_deeply_nested_source() {
    let mut r = runtime();
    let source = format!("{}x = 1", "if (1) ".repeat(10_000));
    assert_eq!(exec(&mut r, &source), "?nested too deeply in line 1\n");
    let source = format!("print {}1{}", "(".repeat(50_000), ")".repeat(50_000));
    assert_eq!(exec(&mut r, &source), "?nested too deeply in line 1\n");
    let source = format!("print 2{}", "^2".repeat(50_000));
    assert_eq!(exec(&mut r, &source), "?nested too deeply in line 1\n");
    assert_eq!(exec(&mut r, "print 1"), "1 ");
}

#[test]
fn test_default_depth_on_small_thread() {
    let t = std::thread::Builder::new()
        .stack_size(2 * 1024 * 1024)
        .spawn(|| {
            let mut r = runtime_with(Limits::new().frames(10_000));
            exec(
                &mut r,
                "func f() { if ($1 > 0) return f($1-1); return 0 }\nprint f(100000)",
            )
        })
        .unwrap();
    assert_eq!(t.join().unwrap(), "?nested too deeply\n");
}

#[test]
fn test_interrupt() {
    let mut r = runtime();
    let flag = r.interrupt_handle();
    let done = Arc::new(AtomicBool::new(false));
    let finished = done.clone();
    let t = std::thread::spawn(move || {
        while !finished.load(Ordering::SeqCst) {
            std::thread::sleep(Duration::from_millis(5));
            flag.store(true, Ordering::SeqCst);
        }
    });
    assert_eq!(exec(&mut r, "x = 0; while (1) x++"), "?break\n");
    done.store(true, Ordering::SeqCst);
    t.join().unwrap();
}
