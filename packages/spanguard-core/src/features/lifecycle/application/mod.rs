/*
 * Lifecycle Application Layer
 *
 * The checking pipeline: detection, binding tracking, requirement
 * resolution, deferred-effect normalization, path traversal, reporting.
 */

mod analyzer;
mod bindings;
mod deferred;
mod detector;
mod reporter;
mod resolver;
mod traversal;

pub use analyzer::{AnalysisStats, LifecycleAnalyzer};
pub use bindings::{BindingDelta, BindingState};
pub use deferred::{DeferCoverage, DeferEffects, DeferredEffect};
pub use detector::detect_creation_sites;
pub use reporter::report;
pub use resolver::{applicable_at_exit, function_is_forwarder};
pub use traversal::{traverse, ExitViolation, TraversalOutcome};
