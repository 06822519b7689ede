/*
 * Deferred-Effect Normalizer
 *
 * Rewrites deferred execution into exit-time effects. Every defer
 * registration is classified once per function, independently of any
 * tracked value:
 *
 * - Always:      the qualifying call runs on every internal path of the
 *                deferred closure (a direct `defer x.End()` trivially so)
 * - OnErrorOnly: the call is missing only on paths where an
 *                `if err != nil` test of the named error return was false;
 *                by construction those closure paths execute exactly when
 *                the function exits without an error, so the call covers
 *                all error-returning exits (syntactic approximation,
 *                configurable via ErrCorrelation; requires the function to
 *                declare a named error return at all)
 * - Partial:     gated by any other condition; covers nothing
 *
 * The output table stands in for synthetic deferred-exit edges: the
 * traversal arms a registration's effects when the path passes it and
 * resolves them at each exit point. The CFG itself is never mutated.
 */

use crate::config::{CheckConfig, ErrCorrelation};
use crate::shared::models::{Block, Condition, DeferBody, FuncGraph, StmtKind};
use rustc_hash::{FxHashMap, FxHashSet};

/// Coverage of one deferred call over the closure's internal paths
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferCoverage {
    /// Runs on every internal path
    Always,
    /// Runs exactly when the named error return is non-nil
    OnErrorOnly,
    /// Runs only under an uncorrelated condition
    Partial,
}

/// One exit-time effect produced by a defer registration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeferredEffect {
    /// Receiver variable of the deferred call (an outer capture)
    pub variable: String,
    /// Method name; mapped to a requirement per tracked value's vocabulary
    pub method: String,
    pub coverage: DeferCoverage,
}

/// Effects per defer-registration statement, keyed by (block id, index)
#[derive(Debug, Default)]
pub struct DeferEffects {
    map: FxHashMap<(String, usize), Vec<DeferredEffect>>,
}

impl DeferEffects {
    /// Classify every defer registration in `func`
    pub fn build(func: &FuncGraph, config: &CheckConfig) -> Self {
        let mut effects = Self::default();

        // An error-not-nil test can only be correlated with the exits when
        // the function actually declares a named error return.
        let correlation = if func.named_error_return.is_some() {
            config.err_correlation
        } else {
            ErrCorrelation::Disabled
        };

        for block in &func.blocks {
            for (stmt_index, stmt) in block.statements.iter().enumerate() {
                let StmtKind::Defer { body } = &stmt.kind else {
                    continue;
                };
                let classified = classify_defer(body, correlation);
                if !classified.is_empty() {
                    effects
                        .map
                        .insert((block.id.clone(), stmt_index), classified);
                }
            }
        }

        effects
    }

    /// Effects registered at one statement
    pub fn at(&self, block_id: &str, stmt_index: usize) -> &[DeferredEffect] {
        self.map
            .get(&(block_id.to_string(), stmt_index))
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

fn classify_defer(body: &DeferBody, correlation: ErrCorrelation) -> Vec<DeferredEffect> {
    match body {
        DeferBody::Call(call) => match &call.receiver {
            Some(receiver) => vec![DeferredEffect {
                variable: receiver.clone(),
                method: call.sig.method.clone(),
                coverage: DeferCoverage::Always,
            }],
            None => Vec::new(),
        },
        DeferBody::Closure { blocks, captures } => classify_closure(blocks, captures, correlation),
    }
}

/// One enumerated path through a closure body
#[derive(Debug, Clone)]
struct ClosurePath {
    /// (receiver, method) calls seen
    calls: FxHashSet<(String, String)>,
    /// Passed through the false edge of a correlated error test
    err_guard_false: bool,
}

fn classify_closure(
    blocks: &[Block],
    captures: &[String],
    correlation: ErrCorrelation,
) -> Vec<DeferredEffect> {
    let Some(entry) = blocks.first() else {
        return Vec::new();
    };
    let by_id: FxHashMap<&str, &Block> = blocks.iter().map(|b| (b.id.as_str(), b)).collect();

    let mut paths = Vec::new();
    let seed = ClosurePath {
        calls: FxHashSet::default(),
        err_guard_false: false,
    };
    walk_closure(entry, &by_id, seed, &mut FxHashMap::default(), correlation, &mut paths);

    // Union of calls over all paths; coverage decided per call
    let mut seen: Vec<(String, String)> = Vec::new();
    for path in &paths {
        for call in &path.calls {
            if !seen.contains(call) {
                seen.push(call.clone());
            }
        }
    }
    seen.sort();

    let mut effects = Vec::new();
    for (receiver, method) in seen {
        // Only outer captures can affect a tracked value; suppliers that
        // do not fill the capture list get lenient matching.
        if !captures.is_empty() && !captures.iter().any(|c| c == &receiver) {
            continue;
        }
        let key = (receiver.clone(), method.clone());
        let missing: Vec<&ClosurePath> =
            paths.iter().filter(|p| !p.calls.contains(&key)).collect();

        let coverage = if missing.is_empty() {
            DeferCoverage::Always
        } else if missing.iter().all(|p| p.err_guard_false) {
            DeferCoverage::OnErrorOnly
        } else {
            DeferCoverage::Partial
        };

        effects.push(DeferredEffect {
            variable: receiver,
            method,
            coverage,
        });
    }
    effects
}

/// Depth-first enumeration of closure-internal paths, each block revisited
/// at most twice per path so cyclic closure bodies terminate
fn walk_closure(
    block: &Block,
    by_id: &FxHashMap<&str, &Block>,
    mut path: ClosurePath,
    visits: &mut FxHashMap<String, u8>,
    correlation: ErrCorrelation,
    out: &mut Vec<ClosurePath>,
) {
    let count = visits.entry(block.id.clone()).or_insert(0);
    if *count >= 2 {
        return;
    }
    *count += 1;

    let mut branch: Option<Condition> = None;
    let mut returned = false;
    for stmt in &block.statements {
        match &stmt.kind {
            StmtKind::Call { call, .. } => {
                if let Some(receiver) = &call.receiver {
                    path.calls
                        .insert((receiver.clone(), call.sig.method.clone()));
                }
            }
            StmtKind::Branch { condition } => {
                branch = Some(*condition);
            }
            StmtKind::Return { .. } => {
                returned = true;
                break;
            }
            _ => {}
        }
    }

    if returned || block.successors.is_empty() {
        out.push(path);
    } else {
        let correlated = matches!(branch, Some(Condition::NamedErrorNotNil))
            && correlation == ErrCorrelation::NamedErrorReturn;
        for (edge_index, succ_id) in block.successors.iter().enumerate() {
            let Some(succ) = by_id.get(succ_id.as_str()) else {
                continue;
            };
            let mut next = path.clone();
            // successors[1] is the false edge of a branch terminator
            if correlated && edge_index == 1 {
                next.err_guard_false = true;
            }
            walk_closure(succ, by_id, next, visits, correlation, out);
        }
    }

    if let Some(count) = visits.get_mut(&block.id) {
        *count -= 1;
    }
}
