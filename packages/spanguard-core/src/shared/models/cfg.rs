//! Control flow graph contract
//!
//! These types are the data contract with the external CFG/AST supplier:
//! the engine consumes per-function block lists with resolved call
//! signatures and never builds or mutates the graph itself. They live in
//! shared/models because every lifecycle component consumes them.
//!
//! Conventions the supplier must honor:
//! - `blocks[0]` is the function entry block.
//! - A `Branch` statement is a block terminator; `successors[0]` is the
//!   true edge and `successors[1]` the false edge.
//! - A `Return` statement ends its block; a block with no successors and
//!   no terminal return is an implicit fall-through exit.
//! - Call targets are already resolved to (package, type, method) — raw
//!   syntax never reaches the engine.

use crate::shared::models::SourceSpan;
use serde::{Deserialize, Serialize};

/// Resolved call signature: (package, type, method)
///
/// Matched against configured signature tables via the fully-qualified
/// form, e.g. `go.opentelemetry.io/otel.Tracer.Start`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallSig {
    pub package: String,
    pub type_name: String,
    pub method: String,
}

impl CallSig {
    pub fn new(
        package: impl Into<String>,
        type_name: impl Into<String>,
        method: impl Into<String>,
    ) -> Self {
        Self {
            package: package.into(),
            type_name: type_name.into(),
            method: method.into(),
        }
    }

    /// Fully-qualified signature string, empty segments skipped
    pub fn fq(&self) -> String {
        let mut parts = Vec::with_capacity(3);
        if !self.package.is_empty() {
            parts.push(self.package.as_str());
        }
        if !self.type_name.is_empty() {
            parts.push(self.type_name.as_str());
        }
        parts.push(self.method.as_str());
        parts.join(".")
    }
}

impl std::fmt::Display for CallSig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.fq())
    }
}

/// Call expression descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallExpr {
    /// Resolved callee signature
    pub sig: CallSig,
    /// Variable the method is invoked on, if it is a method call
    pub receiver: Option<String>,
    /// Argument variable names (non-variable arguments are omitted)
    pub args: Vec<String>,
}

impl CallExpr {
    pub fn new(sig: CallSig) -> Self {
        Self {
            sig,
            receiver: None,
            args: Vec::new(),
        }
    }

    pub fn with_receiver(mut self, receiver: impl Into<String>) -> Self {
        self.receiver = Some(receiver.into());
        self
    }

    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }
}

/// Assignment target of a call result slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BindTarget {
    /// Named variable binding
    Var(String),
    /// Explicitly discarded (`_`)
    Ignored,
}

/// Syntactic shape of a return statement's error slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReturnError {
    /// Function has no error-typed result
    NoErrorSlot,
    /// Error slot is a literal nil/zero value
    NilLiteral,
    /// Error slot is a non-nil expression
    NonNil,
    /// Error slot is the function's named error-return variable
    NamedVar,
}

impl ReturnError {
    /// True when this return syntactically carries an error
    pub fn is_error(&self) -> bool {
        matches!(self, ReturnError::NonNil | ReturnError::NamedVar)
    }
}

/// Branch condition shape, as classified by the supplier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Condition {
    /// Condition tests the function's named error return against nil
    /// (`if err != nil`); true edge = error present
    NamedErrorNotNil,
    /// Anything else — opaque to the engine
    Other,
}

/// Body of a deferred-execution statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeferBody {
    /// `defer x.End()` — a single direct call
    Call(CallExpr),
    /// `defer func() { ... }()` — a closure with its own internal blocks,
    /// capturing outer variables by reference
    Closure {
        blocks: Vec<Block>,
        captures: Vec<String>,
    },
}

/// Statement kind (closed set; the traversal switches on it directly)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StmtKind {
    /// Call expression, optionally binding result slots
    Call {
        call: CallExpr,
        targets: Vec<BindTarget>,
    },
    /// Plain variable-to-variable assignment (`a = b`)
    Assign { lhs: String, rhs: String },
    /// Return statement
    Return { error: ReturnError },
    /// Deferred execution registration
    Defer { body: DeferBody },
    /// Conditional terminator (successors\[0\] = true, \[1\] = false)
    Branch { condition: Condition },
    /// Anything the engine does not interpret
    Other,
}

/// A single statement with its source position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: SourceSpan,
    /// Extent of the innermost scope enclosing any binding this statement
    /// introduces. `None` when the supplier did not resolve it; treated as
    /// function-wide.
    #[serde(default)]
    pub binding_scope: Option<SourceSpan>,
}

impl Stmt {
    pub fn new(kind: StmtKind, span: SourceSpan) -> Self {
        Self {
            kind,
            span,
            binding_scope: None,
        }
    }

    pub fn with_binding_scope(mut self, scope: SourceSpan) -> Self {
        self.binding_scope = Some(scope);
        self
    }

    pub fn call(call: CallExpr, targets: Vec<BindTarget>, span: SourceSpan) -> Self {
        Self::new(StmtKind::Call { call, targets }, span)
    }

    pub fn ret(error: ReturnError, span: SourceSpan) -> Self {
        Self::new(StmtKind::Return { error }, span)
    }

    pub fn defer(body: DeferBody, span: SourceSpan) -> Self {
        Self::new(StmtKind::Defer { body }, span)
    }
}

/// CFG basic block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Unique block ID within the function (or closure)
    pub id: String,
    /// Statements in execution order
    pub statements: Vec<Stmt>,
    /// Successor block IDs
    pub successors: Vec<String>,
    /// Predecessor block IDs
    pub predecessors: Vec<String>,
}

impl Block {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            statements: Vec::new(),
            successors: Vec::new(),
            predecessors: Vec::new(),
        }
    }

    pub fn with_stmt(mut self, stmt: Stmt) -> Self {
        self.statements.push(stmt);
        self
    }

    /// True when no successor leaves this block (implicit exit)
    pub fn is_terminal(&self) -> bool {
        self.successors.is_empty()
    }
}

/// One function body, as delivered by the supplier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuncGraph {
    /// Function name (diagnostic anchor)
    pub name: String,
    /// Ordered blocks; `blocks[0]` is the entry
    pub blocks: Vec<Block>,
    /// The function's own resolved signature, when it is a named method or
    /// function the supplier could resolve (used for the creator/forwarder
    /// exemption)
    pub signature: Option<CallSig>,
    /// Named error-return variable (`func f() (err error)`), when present
    pub named_error_return: Option<String>,
}

impl FuncGraph {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            blocks: Vec::new(),
            signature: None,
            named_error_return: None,
        }
    }

    pub fn with_block(mut self, block: Block) -> Self {
        self.blocks.push(block);
        self
    }

    pub fn with_signature(mut self, sig: CallSig) -> Self {
        self.signature = Some(sig);
        self
    }

    pub fn with_named_error_return(mut self, name: impl Into<String>) -> Self {
        self.named_error_return = Some(name.into());
        self
    }

    /// Connect two blocks, maintaining both edge lists
    pub fn add_edge(&mut self, from: &str, to: &str) {
        if let Some(block) = self.blocks.iter_mut().find(|b| b.id == from) {
            block.successors.push(to.to_string());
        }
        if let Some(block) = self.blocks.iter_mut().find(|b| b.id == to) {
            block.predecessors.push(from.to_string());
        }
    }

    /// Builder form of [`add_edge`](Self::add_edge)
    pub fn with_edge(mut self, from: &str, to: &str) -> Self {
        self.add_edge(from, to);
        self
    }

    pub fn block(&self, id: &str) -> Option<&Block> {
        self.blocks.iter().find(|b| b.id == id)
    }

    pub fn entry(&self) -> Option<&Block> {
        self.blocks.first()
    }
}
