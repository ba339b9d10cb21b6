// Configuration: API base URL and imgflip credentials.
//
// Values come from `.env` files and the process environment. Files are
// parsed with `dotenv` but never exported into the process environment,
// so the resulting `Config` is the only place the credentials live.

use crate::error::ConfigError;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const USERNAME_VAR: &str = "IMGFLIP_USERNAME";
pub const PASSWORD_VAR: &str = "IMGFLIP_PASSWORD";
pub const API_URL_VAR: &str = "IMGFLIP_API_URL";

pub const DEFAULT_API_URL: &str = "https://api.imgflip.com";
pub const ENV_FILE_NAME: &str = ".env";

/// imgflip account credentials. Only the caption endpoint needs them.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Report which credential variables are missing or empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut missing = Vec::new();
        if self.username.is_empty() {
            missing.push(USERNAME_VAR);
        }
        if self.password.is_empty() {
            missing.push(PASSWORD_VAR);
        }
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::MissingVariables(missing))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub base_url: String,
    pub credentials: Credentials,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            credentials: Credentials::default(),
        }
    }
}

impl Config {
    /// Build a config pointing at `base_url` with the given credentials.
    pub fn new(base_url: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            base_url: normalize_base_url(&base_url.into()),
            credentials,
        }
    }

    /// Load configuration the way the CLI does at startup.
    ///
    /// Later sources win: `<config_dir>/imgflip-cli/.env`, then `./.env`,
    /// then the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::merge(&env_file_candidates(), |key| std::env::var(key).ok())
    }

    /// Merge `.env` files (in increasing precedence) with variables looked
    /// up through `env`, which wins over every file. Missing files are
    /// skipped.
    pub fn merge<F>(files: &[PathBuf], env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut values = HashMap::new();
        for path in files {
            if path.is_file() {
                debug!(path = %path.display(), "reading env file");
                values.extend(read_env_file(path)?);
            }
        }
        for key in [USERNAME_VAR, PASSWORD_VAR, API_URL_VAR] {
            if let Some(value) = env(key) {
                values.insert(key.to_string(), value);
            }
        }
        Ok(Self::from_pairs(values))
    }

    /// Build a config from key/value pairs. Unknown keys are ignored and
    /// absent credentials become empty strings.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut config = Config::default();
        for (key, value) in pairs {
            match key.as_str() {
                USERNAME_VAR => config.credentials.username = value,
                PASSWORD_VAR => config.credentials.password = value,
                API_URL_VAR if !value.trim().is_empty() => {
                    config.base_url = normalize_base_url(&value)
                }
                _ => {}
            }
        }
        config
    }
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

/// `.env` locations in increasing order of precedence.
fn env_file_candidates() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("imgflip-cli").join(ENV_FILE_NAME));
    }
    paths.push(PathBuf::from(ENV_FILE_NAME));
    paths
}

/// Read the pairs of one `.env` file. Lines `dotenv` cannot parse are
/// skipped with a warning; only a file that cannot be opened is an error.
fn read_env_file(path: &Path) -> Result<Vec<(String, String)>, ConfigError> {
    let iter = dotenv::from_path_iter(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mut pairs = Vec::new();
    for item in iter {
        match item {
            Ok(pair) => pairs.push(pair),
            Err(dotenv::Error::Io(e)) => {
                warn!(path = %path.display(), error = %e, "stopped reading env file");
                break;
            }
            Err(e) => warn!(path = %path.display(), error = %e, "skipping env file line"),
        }
    }
    Ok(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn pair(k: &str, v: &str) -> (String, String) {
        (k.to_string(), v.to_string())
    }

    #[test]
    fn from_pairs_reads_credentials_and_url() {
        let config = Config::from_pairs(vec![
            pair(USERNAME_VAR, "alice"),
            pair(PASSWORD_VAR, "hunter2"),
            pair(API_URL_VAR, "http://localhost:9000/"),
            pair("UNRELATED", "x"),
        ]);
        assert_eq!(config.credentials, Credentials::new("alice", "hunter2"));
        assert_eq!(config.base_url, "http://localhost:9000");
        assert!(config.credentials.validate().is_ok());
    }

    #[test]
    fn missing_values_fall_back_to_defaults() {
        let config = Config::from_pairs(Vec::new());
        assert_eq!(config.base_url, DEFAULT_API_URL);
        assert_eq!(config.credentials, Credentials::default());
    }

    #[test]
    fn empty_api_url_keeps_default() {
        let config = Config::from_pairs(vec![pair(API_URL_VAR, "  ")]);
        assert_eq!(config.base_url, DEFAULT_API_URL);
    }

    #[test]
    fn validate_names_every_missing_variable() {
        match Credentials::default().validate() {
            Err(ConfigError::MissingVariables(vars)) => {
                assert_eq!(vars, vec![USERNAME_VAR, PASSWORD_VAR])
            }
            other => panic!("unexpected result: {:?}", other),
        }
        match Credentials::new("alice", "").validate() {
            Err(ConfigError::MissingVariables(vars)) => assert_eq!(vars, vec![PASSWORD_VAR]),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    fn env_file(dir: &Path, name: &str, lines: &[&str]) -> PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        path
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn merge_parses_env_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = env_file(
            dir.path(),
            ".env",
            &[
                "# imgflip account",
                "IMGFLIP_USERNAME=bob",
                "IMGFLIP_PASSWORD=\"s3cret pass\"",
            ],
        );

        let config = Config::merge(&[path], no_env).unwrap();
        assert_eq!(config.credentials.username, "bob");
        assert_eq!(config.credentials.password, "s3cret pass");
        assert_eq!(config.base_url, DEFAULT_API_URL);
    }

    #[test]
    fn merge_skips_lines_it_cannot_parse() {
        let dir = tempfile::tempdir().unwrap();
        let path = env_file(
            dir.path(),
            ".env",
            &["IMGFLIP_USERNAME=bob", "IMGFLIP_PASSWORD=pw", "this is a note"],
        );

        let config = Config::merge(&[path], no_env).unwrap();
        assert_eq!(config.credentials, Credentials::new("bob", "pw"));
    }

    #[test]
    fn merge_skips_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.env");
        let config = Config::merge(&[missing], no_env).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn later_file_overrides_earlier_file() {
        let dir = tempfile::tempdir().unwrap();
        let user_file = env_file(
            dir.path(),
            "user.env",
            &[
                "IMGFLIP_USERNAME=from-user-dir",
                "IMGFLIP_PASSWORD=user-pw",
                "IMGFLIP_API_URL=http://user.example",
            ],
        );
        let local_file = env_file(dir.path(), "local.env", &["IMGFLIP_USERNAME=from-cwd"]);

        let config = Config::merge(&[user_file, local_file], no_env).unwrap();
        assert_eq!(config.credentials, Credentials::new("from-cwd", "user-pw"));
        assert_eq!(config.base_url, "http://user.example");
    }

    #[test]
    fn environment_overrides_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = env_file(
            dir.path(),
            ".env",
            &["IMGFLIP_USERNAME=from-file", "IMGFLIP_PASSWORD=file-pw"],
        );
        let env = |key: &str| match key {
            USERNAME_VAR => Some("from-env".to_string()),
            API_URL_VAR => Some("http://localhost:9000/".to_string()),
            _ => None,
        };

        let config = Config::merge(&[path], env).unwrap();
        assert_eq!(config.credentials, Credentials::new("from-env", "file-pw"));
        assert_eq!(config.base_url, "http://localhost:9000");
    }

    #[test]
    fn debug_output_hides_password() {
        let creds = Credentials::new("alice", "hunter2");
        let printed = format!("{:?}", creds);
        assert!(printed.contains("alice"));
        assert!(!printed.contains("hunter2"));
    }
}
