use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{DeployError, DeployResult};

/// Everything the sequencer needs to know about the layout of
/// the working directory and the two stacks.
///
/// All paths are relative to the sequencer root. Every field has
/// a default, so a YAML file only needs to list what it changes:
///
/// ```
/// use stackup::Config;
///
/// let config = Config::from_yaml("project: demo\nstartup_delay_secs: 30\n").unwrap();
///
/// assert_eq!(config.project, "demo");
/// assert_eq!(config.startup_delay_secs, 30);
/// assert_eq!(config.env_file, ".env");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Compose project name shared by both stacks.
    pub project: String,
    /// Root environment file holding the shared secrets.
    pub env_file: String,
    pub vendor: VendorConfig,
    /// Database data directory moved aside by `--reset-db`.
    pub db_data_dir: String,
    pub compose: ComposeConfig,
    pub searxng: SearxngConfig,
    /// Blind wait between starting stack A and stack B.
    pub startup_delay_secs: u64,
    /// Printed once both stacks have been started.
    pub endpoints: Vec<Endpoint>,
}

/// Sparse checkout of the upstream repository carrying stack A's
/// deployment manifests.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VendorConfig {
    pub dir: String,
    pub repo_url: String,
    pub sparse_path: String,
    pub branch: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ComposeConfig {
    /// Stack B manifest; also used for teardown and the
    /// capability toggle.
    pub manifest: String,
    pub stack_a_manifest: String,
    pub stack_a_public_overlay: String,
    pub private_overlay: String,
    pub public_overlay: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearxngConfig {
    pub settings: String,
    pub settings_base: String,
    /// Literal token in the base settings replaced by a random key.
    pub placeholder: String,
    /// Passed to `docker ps --filter name=...`.
    pub container_filter: String,
    /// File that only exists inside an initialized container.
    pub marker_file: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Endpoint {
    pub name: String,
    pub url: String,
}

impl Endpoint {
    #[must_use]
    pub fn new(name: &str, url: &str) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            project: "localai".to_string(),
            env_file: ".env".to_string(),
            vendor: VendorConfig::default(),
            db_data_dir: "supabase/docker/volumes/db/data".to_string(),
            compose: ComposeConfig::default(),
            searxng: SearxngConfig::default(),
            startup_delay_secs: 15,
            endpoints: vec![
                Endpoint::new("Supabase Studio", "http://localhost:8000"),
                Endpoint::new("n8n", "http://localhost:5678"),
                Endpoint::new("Open WebUI", "http://localhost:3000"),
            ],
        }
    }
}

impl Default for VendorConfig {
    fn default() -> Self {
        Self {
            dir: "supabase".to_string(),
            repo_url: "https://github.com/supabase/supabase.git".to_string(),
            sparse_path: "docker".to_string(),
            branch: "master".to_string(),
        }
    }
}

impl Default for ComposeConfig {
    fn default() -> Self {
        Self {
            manifest: "docker-compose.yml".to_string(),
            stack_a_manifest: "supabase/docker/docker-compose.yml".to_string(),
            stack_a_public_overlay: "docker-compose.override.public.supabase.yml".to_string(),
            private_overlay: "docker-compose.override.private.yml".to_string(),
            public_overlay: "docker-compose.override.public.yml".to_string(),
        }
    }
}

impl Default for SearxngConfig {
    fn default() -> Self {
        Self {
            settings: "searxng/settings.yml".to_string(),
            settings_base: "searxng/settings-base.yml".to_string(),
            placeholder: "ultrasecretkey".to_string(),
            container_filter: "searxng".to_string(),
            marker_file: "/etc/searxng/uwsgi.ini".to_string(),
        }
    }
}

impl Config {
    /// Load a config file, or the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> DeployResult<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        if !path.exists() {
            return Err(DeployError::FileNotFound(path.display().to_string()));
        }

        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> DeployResult<Self> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// The vendored directory that receives the shared `.env`.
    #[must_use]
    pub fn vendored_env_dir(&self) -> String {
        format!("{}/{}", self.vendor.dir, self.vendor.sparse_path)
    }

    #[must_use]
    pub const fn startup_delay(&self) -> Duration {
        Duration::from_secs(self.startup_delay_secs)
    }

    fn validate(&self) -> DeployResult<()> {
        let required = [
            ("project", &self.project),
            ("env_file", &self.env_file),
            ("vendor.dir", &self.vendor.dir),
            ("vendor.repo_url", &self.vendor.repo_url),
            ("vendor.sparse_path", &self.vendor.sparse_path),
            ("vendor.branch", &self.vendor.branch),
            ("compose.manifest", &self.compose.manifest),
            ("compose.stack_a_manifest", &self.compose.stack_a_manifest),
            ("searxng.placeholder", &self.searxng.placeholder),
        ];

        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(DeployError::Config(format!("{field} must not be empty")));
            }
        }

        // The placeholder ends up inside a sed `s|...|...|g`
        // expression.
        if self.searxng.placeholder.contains('|') {
            return Err(DeployError::Config(
                "searxng.placeholder must not contain '|'".into(),
            ));
        }

        Ok(())
    }
}
