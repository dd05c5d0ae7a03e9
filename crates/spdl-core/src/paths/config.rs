//! Configuration file locations.
//!
//! The settings file and the `.env` file with API credentials both live in
//! the data root.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use super::error::PathError;
use super::platform::data_root;

/// File name of the persisted user settings.
pub const SETTINGS_FILE_NAME: &str = "user_config.json";

/// Location of the user settings file.
pub fn settings_path() -> Result<PathBuf, PathError> {
    Ok(data_root()?.join(SETTINGS_FILE_NAME))
}

/// Location of the `.env` file that stores credentials and overrides.
pub fn env_file_path() -> Result<PathBuf, PathError> {
    Ok(data_root()?.join(".env"))
}

/// Persist a key=value pair into the `.env` file.
///
/// If the key already exists, its value is updated.
/// If the key doesn't exist, it is appended to the file.
pub fn persist_env_value(key: &str, value: &str) -> Result<(), PathError> {
    let env_path = env_file_path()?;

    let lines: Vec<String> = if env_path.exists() {
        fs::read_to_string(&env_path)
            .map_err(|e| PathError::EnvFile {
                path: env_path.clone(),
                reason: e.to_string(),
            })?
            .lines()
            .map(std::string::ToString::to_string)
            .collect()
    } else {
        Vec::new()
    };

    let mut updated = false;
    let mut output: Vec<String> = Vec::with_capacity(lines.len() + 1);

    for line in lines {
        match line.split_once('=') {
            Some((lhs, _)) if lhs.trim() == key => {
                if !updated {
                    output.push(format!("{key}={value}"));
                    updated = true;
                }
            }
            _ => output.push(line),
        }
    }

    if !updated {
        output.push(format!("{key}={value}"));
    }
    output.push(String::new());

    let mut file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&env_path)
        .map_err(|e| PathError::EnvFile {
            path: env_path.clone(),
            reason: e.to_string(),
        })?;

    file.write_all(output.join("\n").as_bytes())
        .map_err(|e| PathError::EnvFile {
            path: env_path,
            reason: e.to_string(),
        })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paths::platform::DATA_DIR_ENV;
    use crate::paths::test_utils::{ENV_LOCK, EnvVarGuard};
    use tempfile::tempdir;

    #[test]
    fn test_settings_and_env_paths_under_data_root() {
        let _guard = ENV_LOCK.lock().unwrap();
        let temp = tempdir().unwrap();
        let _env = EnvVarGuard::set(DATA_DIR_ENV, temp.path().to_string_lossy().as_ref());

        assert_eq!(settings_path().unwrap(), temp.path().join("user_config.json"));
        assert_eq!(env_file_path().unwrap(), temp.path().join(".env"));
    }

    #[test]
    fn test_persist_env_value_appends_and_updates() {
        let _guard = ENV_LOCK.lock().unwrap();
        let temp = tempdir().unwrap();
        let _env = EnvVarGuard::set(DATA_DIR_ENV, temp.path().to_string_lossy().as_ref());

        persist_env_value("SPOTIFY_CLIENT_ID", "abc").unwrap();
        persist_env_value("SPOTIFY_CLIENT_SECRET", "def").unwrap();
        persist_env_value("SPOTIFY_CLIENT_ID", "xyz").unwrap();

        let contents = fs::read_to_string(temp.path().join(".env")).unwrap();
        assert_eq!(contents, "SPOTIFY_CLIENT_ID=xyz\nSPOTIFY_CLIENT_SECRET=def\n");
    }
}
