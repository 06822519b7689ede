//! Shared domain models
//!
//! Types used across features; kept here to avoid circular dependencies.

mod cfg;
mod location;

pub use cfg::{
    BindTarget, Block, CallExpr, CallSig, Condition, DeferBody, FuncGraph, ReturnError, Stmt,
    StmtKind,
};
pub use location::{Location, SourceSpan};
