//! Configuration file discovery and output directory resolution

use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// Directory name used under the platform config dir
const APP_DIR: &str = "voxq";

/// Output directory used when nothing else is configured
pub const DEFAULT_OUTPUT_DIR: &str = "audio_outputs";

/// Locate the default TOML configuration file for the platform
///
/// Linux checks `~/.config/voxq/config.toml` then `/etc/voxq/config.toml`;
/// other platforms only look in the user config directory.
pub fn find_config_file() -> Result<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"));

    if let Some(path) = user_config {
        if path.exists() {
            return Ok(path);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc").join(APP_DIR).join("config.toml");
        if system_config.exists() {
            return Ok(system_config);
        }
    }

    Err(Error::NotFound("No config file found".to_string()))
}

/// Resolve the directory generated audio files are written to
///
/// Priority order:
/// 1. Command-line argument (highest priority)
/// 2. Environment variable
/// 3. Value from the TOML config file
/// 4. `audio_outputs` relative to the working directory
pub fn resolve_output_dir(
    cli_arg: Option<&Path>,
    env_var_name: &str,
    toml_value: Option<&Path>,
) -> PathBuf {
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    if let Ok(path) = std::env::var(env_var_name) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    if let Some(path) = toml_value {
        return path.to_path_buf();
    }

    PathBuf::from(DEFAULT_OUTPUT_DIR)
}

/// Create the output directory if needed and verify it is a directory
pub fn ensure_output_dir(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path)?;
    if !path.is_dir() {
        return Err(Error::Config(format!(
            "Output path is not a directory: {}",
            path.display()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const TEST_ENV: &str = "VOXQ_TEST_OUTPUT_DIR";

    #[test]
    #[serial]
    fn test_cli_wins() {
        std::env::set_var(TEST_ENV, "/tmp/from-env");
        let resolved = resolve_output_dir(
            Some(Path::new("/tmp/from-cli")),
            TEST_ENV,
            Some(Path::new("/tmp/from-toml")),
        );
        assert_eq!(resolved, PathBuf::from("/tmp/from-cli"));
        std::env::remove_var(TEST_ENV);
    }

    #[test]
    #[serial]
    fn test_env_beats_toml() {
        std::env::set_var(TEST_ENV, "/tmp/from-env");
        let resolved = resolve_output_dir(None, TEST_ENV, Some(Path::new("/tmp/from-toml")));
        assert_eq!(resolved, PathBuf::from("/tmp/from-env"));
        std::env::remove_var(TEST_ENV);
    }

    #[test]
    #[serial]
    fn test_falls_back_to_default() {
        std::env::remove_var(TEST_ENV);
        assert_eq!(
            resolve_output_dir(None, TEST_ENV, None),
            PathBuf::from(DEFAULT_OUTPUT_DIR)
        );
        assert_eq!(
            resolve_output_dir(None, TEST_ENV, Some(Path::new("speech"))),
            PathBuf::from("speech")
        );
    }

    #[test]
    fn test_ensure_output_dir_creates_nested() {
        let tmp = tempfile::tempdir().unwrap();
        let nested = tmp.path().join("a").join("b");
        ensure_output_dir(&nested).unwrap();
        assert!(nested.is_dir());

        // Idempotent
        ensure_output_dir(&nested).unwrap();
    }

    #[test]
    fn test_ensure_output_dir_rejects_file() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("not-a-dir");
        std::fs::write(&file, b"x").unwrap();
        assert!(ensure_output_dir(&file).is_err());
    }
}
