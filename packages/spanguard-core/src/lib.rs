//! spanguard-core — flow-sensitive paired-lifecycle checker
//!
//! Given per-function control flow graphs (supplied by an external front
//! end), verifies that values created by configured starter calls have
//! their finalizer calls reachable on every exit path, and their
//! status-setting / error-recording calls reachable on every
//! error-returning path. Deferred calls, including calls nested in
//! deferred closures, count as executing at function exit.
//!
//! ```
//! use spanguard_core::config::{CheckConfig, SigPattern, StarterSignature};
//! use spanguard_core::LifecycleAnalyzer;
//!
//! let config = CheckConfig::new().with_starter(
//!     StarterSignature::new("otel", SigPattern::compile(r"\.Tracer\.Start$").unwrap())
//!         .with_tracked_slot(1),
//! );
//! let analyzer = LifecycleAnalyzer::new(config).unwrap();
//! let findings = analyzer.analyze_all(&[]);
//! assert!(findings.is_empty());
//! ```

pub mod config;
pub mod errors;
pub mod features;
pub mod shared;

pub use config::CheckConfig;
pub use errors::{Result, SpanguardError};
pub use features::lifecycle::{
    default_config, AnalysisStats, ConfigParser, Finding, FindingRole, FlowSupplier,
    LifecycleAnalyzer, Requirement, Severity, TrackedValue,
};

/// Run the checker over everything a supplier provides
///
/// Validates the configuration (fatal on caller mistakes), pulls the
/// function graphs, and returns the sorted findings stream.
pub fn run_check(supplier: &dyn FlowSupplier, config: CheckConfig) -> Result<Vec<Finding>> {
    let analyzer = LifecycleAnalyzer::new(config)?;
    let functions = supplier.functions()?;
    Ok(analyzer.analyze_all(&functions))
}
