/*
 * Lifecycle Analyzer
 *
 * Facade wiring the pipeline for one function:
 *   detector → deferred-effect normalizer → per-value traversal → reporter
 *
 * Functions are independent analysis units; analyze_all fans out across
 * worker threads with a locked append-only collector, then sorts for
 * deterministic output (same input, same findings, in the same order).
 */

use super::deferred::DeferEffects;
use super::detector::detect_creation_sites;
use super::reporter::report;
use super::resolver::function_is_forwarder;
use super::traversal::traverse;
use crate::config::CheckConfig;
use crate::errors::Result;
use crate::features::lifecycle::domain::Finding;
use crate::shared::models::FuncGraph;
use parking_lot::Mutex;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Aggregate statistics for one analysis run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisStats {
    pub functions: usize,
    pub tracked_values: usize,
    pub findings: usize,
}

/// The paired-lifecycle checker
pub struct LifecycleAnalyzer {
    config: CheckConfig,
}

impl LifecycleAnalyzer {
    /// Create an analyzer; configuration mistakes abort here, before any
    /// function is analyzed
    pub fn new(config: CheckConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &CheckConfig {
        &self.config
    }

    /// Analyze one function body
    pub fn analyze_function(&self, func: &FuncGraph) -> Vec<Finding> {
        if function_is_forwarder(func, &self.config) {
            // The function is itself a recognized creator/forwarder; the
            // value escapes to the caller by design.
            debug!(function = %func.name, "skipping starter-signature function");
            return Vec::new();
        }

        let tracked = detect_creation_sites(func, &self.config);
        if tracked.is_empty() {
            return Vec::new();
        }

        let effects = DeferEffects::build(func, &self.config);
        let mut findings = Vec::new();
        for value in &tracked {
            let outcome = traverse(func, value, &effects, &self.config);
            debug!(
                function = %func.name,
                value = %value.display_name(),
                paths = outcome.paths_explored,
                violations = outcome.violations.len(),
                "traversal complete"
            );
            findings.extend(report(&func.name, value, &outcome));
        }
        findings
    }

    /// Analyze a batch of functions in parallel
    pub fn analyze_all(&self, funcs: &[FuncGraph]) -> Vec<Finding> {
        let collector: Mutex<Vec<Finding>> = Mutex::new(Vec::new());

        funcs.par_iter().for_each(|func| {
            let findings = self.analyze_function(func);
            if !findings.is_empty() {
                collector.lock().extend(findings);
            }
        });

        let mut findings = collector.into_inner();
        findings.sort_by_key(|f| f.sort_key());

        debug!(
            functions = funcs.len(),
            findings = findings.len(),
            "analysis run complete"
        );
        findings
    }

    /// Run statistics alongside a batch analysis
    pub fn analyze_all_with_stats(&self, funcs: &[FuncGraph]) -> (Vec<Finding>, AnalysisStats) {
        let tracked_values: usize = funcs
            .iter()
            .map(|f| detect_creation_sites(f, &self.config).len())
            .sum();
        let findings = self.analyze_all(funcs);
        let stats = AnalysisStats {
            functions: funcs.len(),
            tracked_values,
            findings: findings.len(),
        };
        (findings, stats)
    }
}
