//! Invocation of the external proving backend.
//!
//! The circuit and witness files written by the builder and evaluator are
//! handed to a separate prover binary, which takes the circuit path and the
//! witness path as positional arguments. The backend's stdout is returned
//! for the caller to inspect or log.

use std::path::Path;
use std::process::Command;
use thiserror::Error;

use crate::config::Config;

/// Errors from launching or running the proving backend.
#[derive(Debug, Error)]
pub enum ProverError {
    /// The backend binary could not be started.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The backend ran but exited with a failure status.
    #[error("prover exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },
}

/// Runs the configured proving backend on a circuit/witness file pair and
/// returns its stdout.
pub fn run_prover(
    config: &Config,
    circuit_path: &Path,
    witness_path: &Path,
) -> Result<String, ProverError> {
    log::debug!(
        "running prover {} on {} / {}",
        config.prover_path.display(),
        circuit_path.display(),
        witness_path.display()
    );
    let output = Command::new(&config.prover_path)
        .arg(circuit_path)
        .arg(witness_path)
        .output()?;
    if !output.status.success() {
        return Err(ProverError::Failed {
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_backend_reports_io_error() {
        let config = Config {
            prover_path: "/nonexistent/prover-backend".into(),
            ..Config::default()
        };
        let result = run_prover(&config, Path::new("c.arith"), Path::new("c.in"));
        assert!(matches!(result, Err(ProverError::Io(_))));
    }

    #[test]
    fn failing_backend_reports_status_and_stderr() {
        let config = Config {
            prover_path: "/bin/false".into(),
            ..Config::default()
        };
        let result = run_prover(&config, Path::new("c.arith"), Path::new("c.in"));
        assert!(matches!(result, Err(ProverError::Failed { .. })));
    }
}
