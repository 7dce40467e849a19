pub mod build_info;
pub mod persistence;

use std::{env, fs, io, path::Path, path::PathBuf, sync::Once};

use dirs::home_dir;

static TRACING_INIT: Once = Once::new();

const DEFAULT_DIR_NAME: &str = ".contract_forms";
const HOME_ENV: &str = "CONTRACT_FORMS_HOME";

/// Installs the global tracing subscriber. `RUST_LOG` directives are honoured and
/// the crate logs at `info` unless told otherwise.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("contract_forms=info"));

        // A subscriber installed by the host application wins.
        let _ = fmt().with_env_filter(filter).with_writer(io::stderr).try_init();
    });
}

/// Application data directory, `$CONTRACT_FORMS_HOME` or `~/.contract_forms`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os(HOME_ENV) {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

pub fn ensure_dir(path: &Path) -> io::Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Writes `data` to a sibling temp file and renames it over `path`.
pub fn write_atomic(path: &Path, data: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, data)?;
    fs::rename(&tmp, path)
}
