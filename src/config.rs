use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

/// Application-level constants
pub const APP_NAME: &str = "Aftercare";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DEFAULT_LISTEN: &str = "127.0.0.1:5050";

const DATABASE_FILE: &str = "aftercare.db";

/// Platform data dir (e.g. ~/.local/share/Aftercare), or the working
/// directory when none is known.
pub fn app_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Get the default SQLite database path
pub fn database_path() -> PathBuf {
    app_data_dir().join(DATABASE_FILE)
}

/// Log filter used when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "info,aftercare_lib=debug"
}

/// Aftercare - local recovery tracker API
#[derive(Parser, Debug, Clone)]
#[command(name = "aftercare", version)]
#[command(about = "Aftercare checklist, symptom log and recovery progress API")]
pub struct Args {
    /// Address to listen on
    #[arg(long, env = "AFTERCARE_LISTEN", default_value = DEFAULT_LISTEN)]
    pub listen: SocketAddr,

    /// SQLite database file (created on first run)
    #[arg(long, env = "AFTERCARE_DB", default_value_os_t = database_path())]
    pub database: PathBuf,

    /// Browser origin allowed by CORS. Any origin when unset.
    #[arg(long, env = "AFTERCARE_ALLOWED_ORIGIN")]
    pub allowed_origin: Option<String>,
}
