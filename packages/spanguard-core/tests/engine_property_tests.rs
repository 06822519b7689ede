//! Property tests for the traversal engine
//!
//! Generates small chain and diamond graphs and checks the guarantees
//! the engine must hold regardless of shape: deterministic output,
//! soundness of the all-paths rule, and absence of panics on arbitrary
//! (well-formed) graphs.

mod common;

use common::*;
use proptest::prelude::*;
use spanguard_core::features::lifecycle::default_config;
use spanguard_core::shared::models::{Block, FuncGraph, ReturnError, SourceSpan};
use spanguard_core::{LifecycleAnalyzer, Requirement};

fn analyzer() -> LifecycleAnalyzer {
    LifecycleAnalyzer::new(default_config().unwrap()).unwrap()
}

/// A straight chain of `len` blocks; the span is created in the first,
/// `End` is called in block `end_at` (if any), and the last returns.
fn chain_func(len: usize, end_at: Option<usize>, error: ReturnError) -> FuncGraph {
    let mut func = FuncGraph::new("chain");
    for i in 0..len {
        let mut block = Block::new(format!("b{i}"));
        if i == 0 {
            block = block.with_stmt(otel_start(1));
        }
        if end_at == Some(i) {
            block = block.with_stmt(method_call("span", "End", (i + 2) as u32));
        }
        if i == len - 1 {
            block = block.with_stmt(ret(error, (len + 2) as u32));
        }
        func = func.with_block(block);
    }
    for i in 1..len {
        func.add_edge(&format!("b{}", i - 1), &format!("b{i}"));
    }
    func
}

/// Diamond: entry -> {left, right} -> exit. `End` is placed on a subset
/// of the two arms.
fn diamond_func(end_left: bool, end_right: bool) -> FuncGraph {
    let mut func = FuncGraph::new("diamond")
        .with_block(Block::new("entry").with_stmt(otel_start(1)))
        .with_block(Block::new("left"))
        .with_block(Block::new("right"))
        .with_block(Block::new("exit").with_stmt(ret(ReturnError::NoErrorSlot, 9)));
    if end_left {
        let block = func
            .blocks
            .iter_mut()
            .find(|b| b.id == "left")
            .unwrap();
        block.statements.push(method_call("span", "End", 3));
    }
    if end_right {
        let block = func
            .blocks
            .iter_mut()
            .find(|b| b.id == "right")
            .unwrap();
        block.statements.push(method_call("span", "End", 6));
    }
    func.add_edge("entry", "left");
    func.add_edge("entry", "right");
    func.add_edge("left", "exit");
    func.add_edge("right", "exit");
    func
}

proptest! {
    /// Analyzing the same function twice yields identical findings.
    #[test]
    fn prop_analysis_is_deterministic(
        len in 1usize..8,
        end_offset in proptest::option::of(0usize..8),
        is_error in any::<bool>(),
    ) {
        let end_at = end_offset.map(|o| o.min(len - 1));
        let error = if is_error {
            ReturnError::NonNil
        } else {
            ReturnError::NilLiteral
        };
        let func = chain_func(len, end_at, error);

        let analyzer = analyzer();
        let first = analyzer.analyze_function(&func);
        let second = analyzer.analyze_function(&func);
        prop_assert_eq!(first, second);
    }

    /// On a chain, `End` anywhere before the return covers the finalizer;
    /// without it every run reports the leak.
    #[test]
    fn prop_chain_finalizer_soundness(
        len in 1usize..8,
        end_offset in proptest::option::of(0usize..8),
    ) {
        let end_at = end_offset.map(|o| o.min(len - 1));
        let func = chain_func(len, end_at, ReturnError::NilLiteral);

        let findings = analyzer().analyze_function(&func);
        let leaked = findings
            .iter()
            .any(|f| f.requirement == Requirement::Finalizer);
        prop_assert_eq!(leaked, end_at.is_none());
    }

    /// On a diamond, the finalizer is covered only when BOTH arms call
    /// `End`; one arm is never enough.
    #[test]
    fn prop_diamond_requires_both_arms(end_left in any::<bool>(), end_right in any::<bool>()) {
        let func = diamond_func(end_left, end_right);

        let findings = analyzer().analyze_function(&func);
        let leaked = findings
            .iter()
            .any(|f| f.requirement == Requirement::Finalizer);
        prop_assert_eq!(leaked, !(end_left && end_right));
    }

    /// Error returns on a chain trigger the conditional requirements
    /// exactly when no status calls exist, independent of chain length.
    #[test]
    fn prop_error_exit_conditional_requirements(len in 1usize..8) {
        let func = chain_func(len, Some(0), ReturnError::NonNil);

        let findings = analyzer().analyze_function(&func);
        let reqs: Vec<_> = findings.iter().map(|f| f.requirement).collect();
        prop_assert!(!reqs.contains(&Requirement::Finalizer));
        prop_assert!(reqs.contains(&Requirement::StatusSetter));
        prop_assert!(reqs.contains(&Requirement::ErrorRecorder));
    }

    /// The engine never panics on graphs with arbitrary extra edges,
    /// including cycles.
    #[test]
    fn prop_no_panic_with_extra_edges(
        len in 2usize..6,
        edges in proptest::collection::vec((0usize..6, 0usize..6), 0..6),
    ) {
        let mut func = chain_func(len, None, ReturnError::NilLiteral);
        for (from, to) in edges {
            let from = format!("b{}", from % len);
            let to = format!("b{}", to % len);
            func.add_edge(&from, &to);
        }
        let _ = analyzer().analyze_function(&func);
    }
}

// Regression shapes pinned from property-test failures would go here;
// the deterministic cases below exercise the same generators at fixed
// points.

#[test]
fn chain_of_one_block_with_end_is_clean() {
    let func = chain_func(1, Some(0), ReturnError::NilLiteral);
    assert_eq!(analyzer().analyze_function(&func), vec![]);
}

#[test]
fn self_loop_terminates() {
    let mut func = chain_func(2, None, ReturnError::NilLiteral);
    func.add_edge("b0", "b0");
    let findings = analyzer().analyze_function(&func);
    assert!(findings
        .iter()
        .any(|f| f.requirement == Requirement::Finalizer));
    assert_eq!(findings[0].location, SourceSpan::line(1));
}
