//! Subcommand implementations and their shared plumbing

pub mod diff;
pub mod snapshots;
pub mod tree;

use snapdiff_core::errors::{ExError, ExErrorKind};
use snapdiff_core::CancelToken;
use snapdiff_http::{ConnectionConfig, HttpSession};
use std::io::Write;
use std::path::Path;

pub type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// A cancellation token tripped by SIGINT or SIGTERM
#[cfg(unix)]
pub fn cancel_on_signals() -> Result<CancelToken, ExError> {
    use signal_hook::consts::{SIGINT, SIGTERM};

    let cancel = CancelToken::new();
    for signal in [SIGINT, SIGTERM] {
        signal_hook::flag::register(signal, cancel.flag()).map_err(|e| {
            ExError::new(ExErrorKind::Internal)
                .with_op("register_signal")
                .with_message(e.to_string())
        })?;
    }
    Ok(cancel)
}

#[cfg(not(unix))]
pub fn cancel_on_signals() -> Result<CancelToken, ExError> {
    Ok(CancelToken::new())
}

/// Log in and bind the session to `cancel`
pub fn connect(config: &ConnectionConfig, cancel: &CancelToken) -> Result<HttpSession, ExError> {
    Ok(HttpSession::connect(config)?.with_cancel(cancel.clone()))
}

/// Write a finished result to `path` (created or truncated) or stdout
pub fn write_output(path: Option<&Path>, bytes: &[u8]) -> Result<(), ExError> {
    match path {
        Some(path) => std::fs::write(path, bytes).map_err(|e| {
            ExError::from(e)
                .with_op("write_output")
                .with_path(path.display().to_string())
        }),
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(bytes)?;
            stdout.flush()?;
            Ok(())
        }
    }
}
