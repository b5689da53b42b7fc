use std::fs;
use std::path::PathBuf;

use bloggen::{GenerationParams, ModelVariant};

use super::error::ConfigError;
use super::paths::ConfigPaths;
use super::types::AppConfig;

#[derive(Debug)]
pub struct LoadedConfig {
    pub config: AppConfig,
    pub paths: ConfigPaths,
    pub config_exists: bool,
}

pub fn load_config(path_override: Option<PathBuf>) -> Result<LoadedConfig, ConfigError> {
    let paths = ConfigPaths::resolve(path_override)?;
    ensure_dirs(&paths)?;
    let read = read_config(&paths.config_file)?;
    validate(&read.config)?;
    secure_file_permissions(&paths.config_file)?;
    Ok(LoadedConfig {
        config: read.config,
        paths,
        config_exists: read.exists,
    })
}

fn read_config(path: &PathBuf) -> Result<ConfigRead, ConfigError> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(ConfigRead {
            config: toml::from_str(&contents)?,
            exists: true,
        }),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(ConfigRead {
            config: AppConfig::default(),
            exists: false,
        }),
        Err(err) => Err(ConfigError::Io(err)),
    }
}

struct ConfigRead {
    config: AppConfig,
    exists: bool,
}

// TOML values bypass the library setters, so the ranges are checked here
// before anything downstream trusts them.
fn validate(config: &AppConfig) -> Result<(), ConfigError> {
    GenerationParams::new(
        config.generation.temperature,
        config.generation.top_p,
        config.generation.max_length,
    )?;
    if let Some(name) = &config.default_model {
        name.parse::<ModelVariant>()?;
    }
    Ok(())
}

pub(super) fn ensure_dirs(paths: &ConfigPaths) -> Result<(), ConfigError> {
    fs::create_dir_all(&paths.config_dir)?;
    fs::create_dir_all(&paths.data_dir)?;
    fs::create_dir_all(&paths.logs_dir)?;
    Ok(())
}

pub(super) fn secure_file_permissions(path: &PathBuf) -> Result<(), ConfigError> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if let Ok(metadata) = fs::metadata(path) {
            let mut perms = metadata.permissions();
            let mode = perms.mode() & 0o777;
            if mode & 0o077 != 0 {
                perms.set_mode(0o600);
                fs::set_permissions(path, perms)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    fn write_config(contents: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        (dir, path)
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let loaded = load_config(Some(dir.path().join("config.toml"))).unwrap();
        assert!(!loaded.config_exists);
        assert_eq!(loaded.config.default_model, None);
        assert_eq!(loaded.config.generation.temperature, 0.7);
        assert_eq!(loaded.config.generation.top_p, 0.9);
        assert_eq!(loaded.config.generation.max_length, 300);
    }

    #[test]
    fn values_are_read_from_the_file() {
        let (_dir, path) = write_config(
            r#"
default_model = "Llama2-13B"

[generation]
temperature = 0.2
max_length = 500

[api]
timeout_seconds = 120
"#,
        );
        let loaded = load_config(Some(path)).unwrap();
        assert!(loaded.config_exists);
        assert_eq!(loaded.config.default_model.as_deref(), Some("Llama2-13B"));
        assert_eq!(loaded.config.generation.temperature, 0.2);
        assert_eq!(loaded.config.generation.top_p, 0.9);
        assert_eq!(loaded.config.generation.max_length, 500);
        assert_eq!(loaded.config.api.timeout_seconds, Some(120));
    }

    #[test]
    fn out_of_range_generation_values_are_rejected() {
        let (_dir, path) = write_config("[generation]\ntemperature = 3.5\n");
        let err = load_config(Some(path)).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn unknown_default_models_are_rejected() {
        let (_dir, path) = write_config("default_model = \"Llama9-1T\"\n");
        let err = load_config(Some(path)).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let (_dir, path) = write_config("default_model = [broken\n");
        let err = load_config(Some(path)).unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[cfg(unix)]
    #[test]
    fn group_readable_configs_are_tightened_to_owner_only() {
        use std::os::unix::fs::PermissionsExt;
        let (_dir, path) = write_config("[generation]\ntemperature = 0.5\n");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();
        load_config(Some(path.clone())).unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600);
    }
}
