/*
 * Built-in Starter Tables
 *
 * Starter-table entries for the tracing libraries supported out of the
 * box, used without configuration:
 * - OtelStarter: go.opentelemetry.io/otel Tracer.Start
 * - OpencensusStarter: go.opencensus.io/trace StartSpan
 *
 * Both return (ctx, span); the span is result slot 1.
 */

use crate::config::{CheckConfig, SigPattern, StarterSignature};
use crate::errors::Result;
use crate::features::lifecycle::domain::{
    MethodVocabulary, RequirementPolicy, RequirementProfile,
};
use crate::features::lifecycle::ports::StarterFamily;

/// OpenTelemetry starter family
///
/// `ctx, span := otel.Tracer("x").Start(ctx, "y")`
/// Requirements: End on all paths; SetStatus and RecordError on error
/// paths.
pub struct OtelStarter;

impl StarterFamily for OtelStarter {
    fn define() -> Result<StarterSignature> {
        Ok(StarterSignature::new(
            "otel",
            SigPattern::compile(r"^go\.opentelemetry\.io/otel(/.+)?\.Tracer\.Start$")?,
        )
        .with_tracked_slot(1)
        .with_profile(RequirementProfile::default())
        .with_vocabulary(MethodVocabulary::default()))
    }
}

/// OpenCensus starter family
///
/// `ctx, span := trace.StartSpan(ctx, "y")`
/// Requirements: End on all paths; SetStatus on error paths. OpenCensus
/// spans have no error-recording call, so that requirement is disabled.
pub struct OpencensusStarter;

impl StarterFamily for OpencensusStarter {
    fn define() -> Result<StarterSignature> {
        Ok(StarterSignature::new(
            "opencensus",
            SigPattern::compile(r"^go\.opencensus\.io/trace\.StartSpan$")?,
        )
        .with_tracked_slot(1)
        .with_profile(RequirementProfile {
            error_recorder: RequirementPolicy::Disabled,
            ..Default::default()
        })
        .with_vocabulary(MethodVocabulary::default()))
    }
}

/// Configuration with both built-in starter families registered
pub fn default_config() -> Result<CheckConfig> {
    let config = CheckConfig::new()
        .with_starter(OtelStarter::define()?)
        .with_starter(OpencensusStarter::define()?);
    config.validate()?;
    Ok(config)
}
