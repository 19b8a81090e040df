//! Diagnostics on stderr via `tracing`

use anyhow::Result;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing_subscriber::fmt::writer::{MakeWriter, OptionalWriter};
use tracing_subscriber::EnvFilter;

/// Environment variable checked before `RUST_LOG`
pub const LOG_ENV: &str = "PAIRDIFF_LOG";

static MUTED: AtomicBool = AtomicBool::new(false);

/// Stderr writer that goes quiet while the viewer owns the terminal
struct GatedStderr;

impl<'a> MakeWriter<'a> for GatedStderr {
    type Writer = OptionalWriter<io::Stderr>;

    fn make_writer(&'a self) -> Self::Writer {
        if MUTED.load(Ordering::Relaxed) {
            OptionalWriter::none()
        } else {
            OptionalWriter::some(io::stderr())
        }
    }
}

/// Filter directives for a `-v` count
fn verbosity_directives(verbose: u8) -> String {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    format!("warn,pairdiff={level},pairdiff_core={level}")
}

fn build_filter(verbose: u8) -> EnvFilter {
    if verbose > 0 {
        return EnvFilter::new(verbosity_directives(verbose));
    }
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(verbosity_directives(0)))
}

/// Install the global subscriber. `-v` flags take precedence over the environment.
pub fn init(verbose: u8) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(build_filter(verbose))
        .with_writer(GatedStderr)
        .with_target(false)
        .try_init()
        .map_err(|err| anyhow::anyhow!(err))
}

/// Silences stderr logging until dropped
pub struct MuteGuard {
    previous: bool,
}

impl MuteGuard {
    pub fn new() -> Self {
        Self {
            previous: MUTED.swap(true, Ordering::Relaxed),
        }
    }
}

impl Drop for MuteGuard {
    fn drop(&mut self) {
        MUTED.store(self.previous, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(verbosity_directives(0), "warn,pairdiff=warn,pairdiff_core=warn");
        assert_eq!(verbosity_directives(1), "warn,pairdiff=info,pairdiff_core=info");
        assert_eq!(verbosity_directives(2), "warn,pairdiff=debug,pairdiff_core=debug");
        assert_eq!(verbosity_directives(9), "warn,pairdiff=trace,pairdiff_core=trace");
    }

    #[test]
    fn test_mute_guard_restores() {
        assert!(!MUTED.load(Ordering::Relaxed));
        {
            let _outer = MuteGuard::new();
            {
                let _inner = MuteGuard::new();
            }
            assert!(MUTED.load(Ordering::Relaxed));
        }
        assert!(!MUTED.load(Ordering::Relaxed));
    }
}
