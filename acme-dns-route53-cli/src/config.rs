//! Config file loading

use std::fs;
use std::path::{Path, PathBuf};

use acme_dns_route53_core::ChallengeOptions;
use anyhow::{Context, Result, bail};

pub const APP_DIR: &str = "acme-dns-route53";
pub const DEFAULT_CONFIG_FILENAME: &str = "config.toml";

/// `<config dir>/acme-dns-route53/config.toml`, or `./acme-dns-route53.toml`
/// when the platform has no config directory.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir().map_or_else(
        || PathBuf::from("./acme-dns-route53.toml"),
        |dir| dir.join(APP_DIR).join(DEFAULT_CONFIG_FILENAME),
    )
}

/// Load options from `path`, or from the default location.
///
/// A missing default file yields empty options; a missing explicit path is an
/// error.
pub fn load_config(path: Option<&Path>) -> Result<ChallengeOptions> {
    match path {
        Some(path) => load_from(path, true),
        None => load_from(&default_config_path(), false),
    }
}

fn load_from(path: &Path, required: bool) -> Result<ChallengeOptions> {
    if !path.exists() {
        if required {
            bail!("Configuration file not found: {}", path.display());
        }
        tracing::debug!("No config file at {}", path.display());
        return Ok(ChallengeOptions::default());
    }

    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let options =
        parse_config(&raw).with_context(|| format!("Invalid config {}", path.display()))?;
    tracing::debug!("Loaded config from {}", path.display());
    Ok(options)
}

pub fn parse_config(raw: &str) -> Result<ChallengeOptions> {
    Ok(toml::from_str(raw)?)
}

/// Flags win over the file; the environment is consulted later, during
/// resolution.
pub fn merge_options(flags: ChallengeOptions, file: ChallengeOptions) -> ChallengeOptions {
    flags.merge(file)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn temp_config(contents: &str) -> PathBuf {
        let path = std::env::temp_dir()
            .join(format!("acme-dns-route53-{}.toml", uuid::Uuid::new_v4()));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_parse_snake_case_keys() {
        let options = parse_config(
            r#"
            region = "eu-central-1"
            access_key_id = "AKID"
            secret_access_key = "SECRET"
            ttl = 300
            max_wait_secs = 600
            "#,
        )
        .unwrap();
        assert_eq!(options.region.as_deref(), Some("eu-central-1"));
        assert_eq!(options.access_key_id.as_deref(), Some("AKID"));
        assert_eq!(options.secret_access_key.as_deref(), Some("SECRET"));
        assert_eq!(options.ttl, Some(300));
        assert_eq!(options.max_wait_secs, Some(600));
    }

    #[test]
    fn test_parse_plugin_style_keys() {
        let options = parse_config(
            r#"
            accessKeyId = "AKID"
            secretAccessKey = "SECRET"
            pollErrorRetries = 2
            "#,
        )
        .unwrap();
        assert_eq!(options.access_key_id.as_deref(), Some("AKID"));
        assert_eq!(options.poll_error_retries, Some(2));
    }

    #[test]
    fn test_parse_rejects_wrong_types() {
        assert!(parse_config("ttl = \"sixty\"").is_err());
    }

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(parse_config("").unwrap(), ChallengeOptions::default());
    }

    #[test]
    fn test_missing_explicit_path_is_error() {
        let path = std::env::temp_dir().join("acme-dns-route53-does-not-exist.toml");
        let err = load_config(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_missing_optional_path_is_default() {
        let path = std::env::temp_dir().join("acme-dns-route53-does-not-exist.toml");
        assert_eq!(
            load_from(&path, false).unwrap(),
            ChallengeOptions::default()
        );
    }

    #[test]
    fn test_load_explicit_file() {
        let path = temp_config("region = \"us-west-2\"\nttl = 90\n");
        let options = load_config(Some(&path)).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(options.region.as_deref(), Some("us-west-2"));
        assert_eq!(options.ttl, Some(90));
    }

    #[test]
    fn test_invalid_file_reports_path() {
        let path = temp_config("region = [");
        let err = load_config(Some(&path)).unwrap_err();
        fs::remove_file(&path).unwrap();
        assert!(err.to_string().contains("Invalid config"));
    }

    #[test]
    fn test_flags_override_file_override_env() {
        let flags = ChallengeOptions {
            ttl: Some(30),
            ..ChallengeOptions::default()
        };
        let file = parse_config(
            r#"
            ttl = 300
            region = "eu-west-1"
            access_key_id = "FILE_KEY"
            secret_access_key = "FILE_SECRET"
            "#,
        )
        .unwrap();
        let env = HashMap::from([
            ("AWS_REGION".to_string(), "ap-south-1".to_string()),
            ("AWS_ACCESS_KEY_ID".to_string(), "ENV_KEY".to_string()),
            ("AWS_SECRET_ACCESS_KEY".to_string(), "ENV_SECRET".to_string()),
        ]);

        let resolved = merge_options(flags, file).resolve(&env).unwrap();
        assert_eq!(resolved.default_ttl, 30);
        assert_eq!(resolved.region, "eu-west-1");
        assert_eq!(resolved.access_key_id, "FILE_KEY");
        assert_eq!(resolved.secret_access_key, "FILE_SECRET");
    }

    #[test]
    fn test_default_path_ends_with_app_file() {
        let path = default_config_path();
        assert!(
            path.ends_with(DEFAULT_CONFIG_FILENAME) || path.ends_with("acme-dns-route53.toml")
        );
    }
}
