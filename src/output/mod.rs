pub mod config;
pub mod presenter;
pub mod types;

use anyhow::Result;

use self::config::OutputConfig;
use self::presenter::Emitter;
use self::types::Envelope;

/// Write a plan/result envelope to stdout with the presenter picked from the environment.
/// Only JSON mode (`--json`) produces envelopes; text mode relies on the log lines.
pub fn emit(env: &Envelope) -> Result<()> {
    if !crate::telemetry::config::json_mode() {
        return Ok(());
    }
    let emitter = Emitter::from_config(OutputConfig::from_env());
    emitter.emit(env)?;
    Ok(())
}
