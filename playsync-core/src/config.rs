//! Config file persistence and environment overrides.
//!
//! # Storage layout
//!
//! ```text
//! ~/.playsync/
//!   config.yaml   (mode 0600, directory mode 0700)
//! ```
//!
//! # API pattern
//!
//! Every function touching the home directory has two forms:
//! - `fn_at(home: &Path, …)`: explicit home, used in tests with `TempDir`
//! - `fn(…)`: derives home from `dirs::home_dir()`, delegates to `_at`
//!
//! Environment lookups go through a `Fn(&str) -> Option<String>` so tests never
//! touch the process environment.

use std::path::{Path, PathBuf};

use crate::error::{io_err, ConfigError};
use crate::types::{SyncConfig, DEFAULT_INTERVAL_SECS};

pub const CONFIG_DIR: &str = ".playsync";
pub const CONFIG_FILE: &str = "config.yaml";

pub const ENV_CONFIG: &str = "PLAYSYNC_CONFIG";
pub const ENV_SOURCE_DIR: &str = "PLAYSYNC_SOURCE_DIR";
pub const ENV_REPO_DIR: &str = "PLAYSYNC_REPO_DIR";
pub const ENV_FILES: &str = "PLAYSYNC_FILES";
pub const ENV_INTERVAL_SECS: &str = "PLAYSYNC_INTERVAL_SECS";
pub const ENV_REMOTE: &str = "PLAYSYNC_REMOTE";
pub const ENV_BRANCH: &str = "PLAYSYNC_BRANCH";

// ---------------------------------------------------------------------------
// 1. Path helpers
// ---------------------------------------------------------------------------

/// `<home>/.playsync/config.yaml`. Pure, no I/O.
pub fn config_path_at(home: &Path) -> PathBuf {
    home.join(CONFIG_DIR).join(CONFIG_FILE)
}

/// `config_path_at` convenience wrapper.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    Ok(config_path_at(&home()?))
}

// ---------------------------------------------------------------------------
// 2. Load
// ---------------------------------------------------------------------------

/// Read and validate a config file. No environment overrides are applied.
pub fn load_from(path: &Path) -> Result<SyncConfig, ConfigError> {
    let config = read_file(path)?;
    config.validate()?;
    Ok(config)
}

/// Resolve the effective config.
///
/// File selection: `explicit`, else `$PLAYSYNC_CONFIG`, else `<home>/.playsync/config.yaml`.
/// A missing default file falls back to a config built purely from `PLAYSYNC_*`
/// variables; a missing explicitly-named file is an error. Overrides from the
/// environment are applied last, then the result is validated.
pub fn resolve<F>(
    explicit: Option<&Path>,
    home: Option<&Path>,
    env: F,
) -> Result<SyncConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let named = explicit
        .map(Path::to_path_buf)
        .or_else(|| env(ENV_CONFIG).filter(|v| !v.is_empty()).map(PathBuf::from));

    let path = match (&named, home) {
        (Some(path), _) => path.clone(),
        (None, Some(home)) => config_path_at(home),
        (None, None) => match from_env(&env)? {
            Some(config) => return finish(config, &env),
            None => return Err(ConfigError::HomeNotFound),
        },
    };

    let config = if path.exists() {
        read_file(&path)?
    } else if named.is_some() {
        return Err(ConfigError::ConfigNotFound { path });
    } else {
        match from_env(&env)? {
            Some(config) => config,
            None => return Err(ConfigError::ConfigNotFound { path }),
        }
    };

    finish(config, &env)
}

/// `resolve` against the process environment and an explicit home.
pub fn load_at(home: &Path, explicit: Option<&Path>) -> Result<SyncConfig, ConfigError> {
    resolve(explicit, Some(home), process_env)
}

/// `resolve` against the process environment and `dirs::home_dir()`.
pub fn load(explicit: Option<&Path>) -> Result<SyncConfig, ConfigError> {
    let home = dirs::home_dir();
    resolve(explicit, home.as_deref(), process_env)
}

fn read_file(path: &Path) -> Result<SyncConfig, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
    serde_yaml::from_str(&contents).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        source: e,
    })
}

fn finish<F>(mut config: SyncConfig, env: &F) -> Result<SyncConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    apply_env_overrides(&mut config, env)?;
    config.validate()?;
    Ok(config)
}

// ---------------------------------------------------------------------------
// 3. Environment
// ---------------------------------------------------------------------------

/// Overlay any `PLAYSYNC_*` variables onto `config`. Empty values are ignored.
pub fn apply_env_overrides<F>(config: &mut SyncConfig, env: &F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| env(key).filter(|v| !v.trim().is_empty());

    if let Some(dir) = get(ENV_SOURCE_DIR) {
        config.source_dir = PathBuf::from(dir);
    }
    if let Some(dir) = get(ENV_REPO_DIR) {
        config.repo_dir = PathBuf::from(dir);
    }
    if let Some(files) = get(ENV_FILES) {
        config.files = split_files(&files);
    }
    if let Some(raw) = get(ENV_INTERVAL_SECS) {
        config.interval_secs = parse_interval(&raw)?;
    }
    if let Some(remote) = get(ENV_REMOTE) {
        config.remote = Some(remote);
    }
    if let Some(branch) = get(ENV_BRANCH) {
        config.branch = Some(branch);
    }
    Ok(())
}

/// Build a config from the environment alone, if it names source, repo and files.
fn from_env<F>(env: &F) -> Result<Option<SyncConfig>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| env(key).filter(|v| !v.trim().is_empty());
    let (Some(source), Some(repo), Some(files)) =
        (get(ENV_SOURCE_DIR), get(ENV_REPO_DIR), get(ENV_FILES))
    else {
        return Ok(None);
    };
    let interval = match get(ENV_INTERVAL_SECS) {
        Some(raw) => parse_interval(&raw)?,
        None => DEFAULT_INTERVAL_SECS,
    };
    Ok(Some(SyncConfig::new(
        source,
        repo,
        split_files(&files),
        interval,
    )))
}

fn split_files(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_interval(raw: &str) -> Result<u64, ConfigError> {
    raw.trim().parse::<u64>().map_err(|e| ConfigError::Env {
        var: ENV_INTERVAL_SECS,
        value: raw.to_string(),
        reason: e.to_string(),
    })
}

fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

// ---------------------------------------------------------------------------
// 4. Save (atomic)
// ---------------------------------------------------------------------------

/// Atomically write `config` to `path`.
///
/// Write flow: validate → serialize → `config.yaml.tmp` sibling → `chmod 0600` → `rename`.
/// Refuses to replace an existing file unless `overwrite` is set.
pub fn save_to(path: &Path, config: &SyncConfig, overwrite: bool) -> Result<(), ConfigError> {
    config.validate()?;
    if path.exists() && !overwrite {
        return Err(ConfigError::AlreadyExists {
            path: path.to_path_buf(),
        });
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !parent.exists() {
            std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
            set_dir_permissions(parent)?;
        }
    }

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| CONFIG_FILE.to_string());
    let tmp_path = path.with_file_name(format!("{file_name}.tmp"));

    let yaml = serde_yaml::to_string(config)?;
    std::fs::write(&tmp_path, yaml).map_err(|e| io_err(&tmp_path, e))?;
    set_file_permissions(&tmp_path)?;
    if let Err(e) = std::fs::rename(&tmp_path, path) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(io_err(path, e));
    }
    Ok(())
}

/// Save to `<home>/.playsync/config.yaml`; returns the path written.
pub fn save_at(home: &Path, config: &SyncConfig, overwrite: bool) -> Result<PathBuf, ConfigError> {
    let path = config_path_at(home);
    save_to(&path, config, overwrite)?;
    Ok(path)
}

/// `save_at` convenience wrapper.
pub fn save(config: &SyncConfig, overwrite: bool) -> Result<PathBuf, ConfigError> {
    save_at(&home()?, config, overwrite)
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

fn home() -> Result<PathBuf, ConfigError> {
    dirs::home_dir().ok_or(ConfigError::HomeNotFound)
}

#[cfg(unix)]
fn set_dir_permissions(path: &Path) -> Result<(), ConfigError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o700))
        .map_err(|e| io_err(path, e))
}
#[cfg(not(unix))]
fn set_dir_permissions(_path: &Path) -> Result<(), ConfigError> {
    Ok(())
}

#[cfg(unix)]
fn set_file_permissions(path: &Path) -> Result<(), ConfigError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
        .map_err(|e| io_err(path, e))
}
#[cfg(not(unix))]
fn set_file_permissions(_path: &Path) -> Result<(), ConfigError> {
    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
