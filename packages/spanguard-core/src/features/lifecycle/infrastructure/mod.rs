/*
 * Lifecycle Infrastructure
 *
 * Built-in starter tables and configuration parsing.
 */

mod built_in;
mod config_parser;

pub use built_in::{default_config, OpencensusStarter, OtelStarter};
pub use config_parser::{ConfigFile, ConfigParser, CorrelationConfig, PolicyConfig};
