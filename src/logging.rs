//! File-backed tracing setup.
//!
//! The terminal belongs to the UI, so log output goes to
//! `<data_local_dir>/codeassist/codeassist.log`. `RUST_LOG` overrides the
//! default filter.

use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "codeassist=info,codeassist_core=info";

fn log_path() -> Option<PathBuf> {
    let dir = dirs::data_local_dir()?.join("codeassist");
    fs::create_dir_all(&dir).ok()?;
    Some(dir.join("codeassist.log"))
}

/// Install the global subscriber. Returns the log file path, or `None` when
/// logging could not be set up; the app runs either way.
pub fn init() -> Option<PathBuf> {
    let path = log_path()?;
    let file = OpenOptions::new().create(true).append(true).open(&path).ok()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into()))
        .with(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
        .try_init()
        .ok()?;

    Some(path)
}
