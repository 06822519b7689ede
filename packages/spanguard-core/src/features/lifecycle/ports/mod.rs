/*
 * Lifecycle Ports
 *
 * Interfaces for external integration.
 */

use crate::config::StarterSignature;
use crate::errors::Result;
use crate::shared::models::FuncGraph;

/// CFG supplier contract
///
/// Implemented by whatever front end parses source and builds per-function
/// graphs; the engine only consumes the result.
pub trait FlowSupplier {
    fn functions(&self) -> Result<Vec<FuncGraph>>;
}

/// Starter-family definition trait
///
/// Implement this to contribute a starter-table entry (pattern, tracked
/// result slot, requirement profile, method vocabulary).
pub trait StarterFamily {
    fn define() -> Result<StarterSignature>;
}

/// Trivial supplier over an already-built function list
pub struct InMemorySupplier {
    functions: Vec<FuncGraph>,
}

impl InMemorySupplier {
    pub fn new(functions: Vec<FuncGraph>) -> Self {
        Self { functions }
    }
}

impl FlowSupplier for InMemorySupplier {
    fn functions(&self) -> Result<Vec<FuncGraph>> {
        Ok(self.functions.clone())
    }
}
