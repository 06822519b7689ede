/*
 * Binding Tracker
 *
 * Path-local alias bookkeeping for one tracked value:
 * - `a = b` with b aliased: a joins the alias set
 * - a call result rebinding an aliased variable drops that alias (the
 *   variable now holds a fresh value; satisfaction for the old value can
 *   only come from before this point)
 * - passing an alias to an ownership-transfer call exempts the value from
 *   all further checking on this path
 *
 * The alias set only grows by observed assignments and only shrinks via
 * rebinding or transfer; the traversal clones this state at branch points.
 */

use crate::config::CheckConfig;
use crate::features::lifecycle::domain::TrackedValue;
use crate::shared::models::{BindTarget, StmtKind};
use rustc_hash::FxHashSet;

/// Alias state of one tracked value along one path
#[derive(Debug, Clone)]
pub struct BindingState {
    pub aliases: FxHashSet<String>,
    /// Ownership was transferred out; stop checking on this path
    pub exempt: bool,
}

/// What a statement did to the binding state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BindingDelta {
    /// Aliases dropped by rebinding (their pending deferred effects no
    /// longer cover the old value)
    pub dropped: Vec<String>,
    pub transferred: bool,
}

impl BindingState {
    pub fn from_value(value: &TrackedValue) -> Self {
        Self {
            aliases: value.aliases.clone(),
            exempt: false,
        }
    }

    pub fn is_aliased(&self, variable: &str) -> bool {
        self.aliases.contains(variable)
    }

    /// True when the value can no longer be reached through any variable
    pub fn is_orphaned(&self) -> bool {
        self.aliases.is_empty()
    }

    /// Apply one statement's binding effects
    pub fn apply(&mut self, kind: &StmtKind, config: &CheckConfig) -> BindingDelta {
        let mut delta = BindingDelta::default();
        if self.exempt {
            return delta;
        }

        match kind {
            StmtKind::Assign { lhs, rhs } => {
                if self.aliases.contains(rhs) {
                    self.aliases.insert(lhs.clone());
                } else if self.aliases.remove(lhs) {
                    // lhs now holds an unrelated value
                    delta.dropped.push(lhs.clone());
                }
            }
            StmtKind::Call { call, targets } => {
                if call.args.iter().any(|a| self.aliases.contains(a))
                    && config.is_transfer(&call.sig)
                {
                    self.exempt = true;
                    delta.transferred = true;
                    return delta;
                }
                for target in targets {
                    if let BindTarget::Var(name) = target {
                        if self.aliases.remove(name) {
                            delta.dropped.push(name.clone());
                        }
                    }
                }
            }
            _ => {}
        }

        delta
    }
}
