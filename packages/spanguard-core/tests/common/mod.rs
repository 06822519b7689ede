//! Fixture builders shared by the integration suites
//!
//! Graph shapes mirror the tracing-span code the checker targets:
//! `ctx, span := otel.Tracer("x").Start(...)`, `defer span.End()`,
//! branches returning errors.
#![allow(dead_code)] // each suite pulls a different subset

use spanguard_core::shared::models::{
    BindTarget, Block, CallExpr, CallSig, Condition, DeferBody, FuncGraph, ReturnError,
    SourceSpan, Stmt, StmtKind,
};

pub fn otel_start(line: u32) -> Stmt {
    Stmt::call(
        CallExpr::new(CallSig::new("go.opentelemetry.io/otel", "Tracer", "Start")),
        vec![
            BindTarget::Var("ctx".to_string()),
            BindTarget::Var("span".to_string()),
        ],
        SourceSpan::line(line),
    )
}

/// Creation whose binding is declared inside a nested block; `scope` is
/// the extent of that block
pub fn otel_start_in_scope(line: u32, scope: SourceSpan) -> Stmt {
    otel_start(line).with_binding_scope(scope)
}

pub fn otel_start_discarded(line: u32) -> Stmt {
    Stmt::call(
        CallExpr::new(CallSig::new("go.opentelemetry.io/otel", "Tracer", "Start")),
        vec![BindTarget::Ignored, BindTarget::Ignored],
        SourceSpan::line(line),
    )
}

pub fn opencensus_start(line: u32) -> Stmt {
    Stmt::call(
        CallExpr::new(CallSig::new("go.opencensus.io/trace", "", "StartSpan")),
        vec![
            BindTarget::Var("ctx".to_string()),
            BindTarget::Var("span".to_string()),
        ],
        SourceSpan::line(line),
    )
}

pub fn method_call(receiver: &str, method: &str, line: u32) -> Stmt {
    Stmt::call(
        CallExpr::new(CallSig::new("", "", method)).with_receiver(receiver),
        vec![],
        SourceSpan::line(line),
    )
}

pub fn defer_end(line: u32) -> Stmt {
    Stmt::defer(
        DeferBody::Call(CallExpr::new(CallSig::new("", "", "End")).with_receiver("span")),
        SourceSpan::line(line),
    )
}

pub fn ret(error: ReturnError, line: u32) -> Stmt {
    Stmt::ret(error, SourceSpan::line(line))
}

pub fn branch(condition: Condition) -> Stmt {
    Stmt::new(StmtKind::Branch { condition }, SourceSpan::zero())
}

/// Closure body: `if err != nil { span.RecordError(err); span.SetStatus(...) }
/// ; span.End()` — the canonical correct cleanup closure
pub fn err_guarded_defer(line: u32) -> Stmt {
    let mut guard = Block::new("c0").with_stmt(branch(Condition::NamedErrorNotNil));
    guard.successors = vec!["c1".to_string(), "c2".to_string()];
    let mut then = Block::new("c1")
        .with_stmt(method_call("span", "RecordError", line))
        .with_stmt(method_call("span", "SetStatus", line));
    then.successors = vec!["c2".to_string()];
    let tail = Block::new("c2").with_stmt(method_call("span", "End", line));

    Stmt::defer(
        DeferBody::Closure {
            blocks: vec![guard, then, tail],
            captures: vec!["span".to_string(), "err".to_string()],
        },
        SourceSpan::line(line),
    )
}

/// Closure body: `if true { span.End() }; span.RecordError(err)` — End is
/// not guaranteed
pub fn true_guarded_end_defer(line: u32) -> Stmt {
    let mut guard = Block::new("c0").with_stmt(branch(Condition::Other));
    guard.successors = vec!["c1".to_string(), "c2".to_string()];
    let mut then = Block::new("c1").with_stmt(method_call("span", "End", line));
    then.successors = vec!["c2".to_string()];
    let tail = Block::new("c2").with_stmt(method_call("span", "RecordError", line));

    Stmt::defer(
        DeferBody::Closure {
            blocks: vec![guard, then, tail],
            captures: vec!["span".to_string(), "err".to_string()],
        },
        SourceSpan::line(line),
    )
}

/// Single-block function
pub fn linear_func(name: &str, stmts: Vec<Stmt>) -> FuncGraph {
    let mut block = Block::new("entry");
    for stmt in stmts {
        block = block.with_stmt(stmt);
    }
    FuncGraph::new(name).with_block(block)
}
