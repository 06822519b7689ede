/*
 * Paired-Lifecycle Checking
 *
 * Verifies that a value created by a starter call has its finalizer and
 * conditional observer calls reachable on every path leaving the creating
 * function. The concrete instance is tracing spans (End / SetStatus /
 * RecordError); the tables generalize to any create-then-must-call
 * discipline.
 *
 * Architecture:
 * - Domain: Requirement, TrackedValue, Finding models
 * - Application: detector, binding tracker, requirement resolver,
 *   deferred-effect normalizer, path traversal, reporter, analyzer facade
 * - Infrastructure: built-in starter tables, config file parser
 * - Ports: FlowSupplier / StarterFamily traits
 *
 * Algorithm:
 * - all-paths DFS from each creation site to every reachable exit
 * - deferred calls normalized into exit-time effects
 * - bounded back-edge revisit for termination on cyclic flow
 */

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod ports;

// Re-export main types
pub use domain::{
    Finding, FindingRole, MethodVocabulary, Requirement, RequirementPolicy, RequirementProfile,
    RequirementSet, Severity, TrackedValue,
};

pub use application::{AnalysisStats, LifecycleAnalyzer};

pub use infrastructure::{default_config, ConfigParser};

pub use ports::{FlowSupplier, InMemorySupplier, StarterFamily};
