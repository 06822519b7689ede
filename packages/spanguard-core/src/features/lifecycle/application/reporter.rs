/*
 * Diagnostic Reporter
 *
 * Collapses one traversal outcome into findings:
 * - per (value, requirement) with at least one violating exit, one summary
 *   anchored at the creation statement
 * - one detail per violating exit statement
 * - an unassigned creation always yields its summary, even when no exit
 *   was recorded (nothing can ever finalize it)
 */

use super::traversal::TraversalOutcome;
use crate::features::lifecycle::domain::{Finding, Requirement, TrackedValue};

/// Turn a traversal outcome into the findings stream for one value
pub fn report(function: &str, value: &TrackedValue, outcome: &TraversalOutcome) -> Vec<Finding> {
    let mut findings = Vec::new();
    let name = value.display_name();

    if value.unassigned {
        findings.push(Finding::unassigned(
            function,
            value.origin,
            &value.vocabulary,
        ));
        for violation in &outcome.violations {
            findings.push(Finding::detail(
                function,
                violation.location,
                name,
                violation.requirement,
                &value.vocabulary,
            ));
        }
        return findings;
    }

    for requirement in Requirement::ALL {
        let exits: Vec<_> = outcome
            .violations
            .iter()
            .filter(|v| v.requirement == requirement)
            .collect();
        if exits.is_empty() {
            continue;
        }
        findings.push(Finding::summary(
            function,
            value.origin,
            name,
            requirement,
            &value.vocabulary,
        ));
        for violation in exits {
            findings.push(Finding::detail(
                function,
                violation.location,
                name,
                requirement,
                &value.vocabulary,
            ));
        }
    }

    findings
}
