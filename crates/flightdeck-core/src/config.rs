use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::io::IsTerminal;
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub board: BoardConfig,
    /// Team name → member logins.
    #[serde(default)]
    pub teams: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub analytics: AnalyticsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Assignee logins that mean "nobody is on it".
    #[serde(default = "default_unassigned_logins")]
    pub unassigned_logins: Vec<String>,
    /// Target-branch values that count as trunk (case-insensitive).
    #[serde(default = "default_trunk_names")]
    pub trunk_names: Vec<String>,
    /// Target-branch prefixes that count as a release/feature branch.
    #[serde(default = "default_branch_prefixes")]
    pub branch_prefixes: Vec<String>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            unassigned_logins: default_unassigned_logins(),
            trunk_names: default_trunk_names(),
            branch_prefixes: default_branch_prefixes(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    #[serde(default = "default_x_axis")]
    pub x_axis: String,
    #[serde(default = "default_y_axis")]
    pub y_axis: String,
    #[serde(default = "default_radius")]
    pub radius: String,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default = "default_padding")]
    pub padding: f64,
    #[serde(default)]
    pub include_dependencies: bool,
    #[serde(default = "default_width")]
    pub width: f64,
    #[serde(default = "default_height")]
    pub height: f64,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            x_axis: default_x_axis(),
            y_axis: default_y_axis(),
            radius: default_radius(),
            color: default_color(),
            padding: default_padding(),
            include_dependencies: false,
            width: default_width(),
            height: default_height(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UserConfig {
    #[serde(default)]
    pub output: Option<String>,
    /// Default login used as the "my tickets" grouping key.
    #[serde(default)]
    pub login: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectiveConfig {
    pub project: ProjectConfig,
    pub user: UserConfig,
    pub resolved_output: String,
}

/// Load `<root>/.flightdeck/config.toml`, or defaults when it does not exist.
///
/// # Errors
///
/// Fails when the file exists but cannot be read or parsed.
pub fn load_project_config(project_root: &Path) -> Result<ProjectConfig> {
    let path = project_root.join(".flightdeck/config.toml");
    if !path.exists() {
        return Ok(ProjectConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<ProjectConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Load the per-user config from the platform config directory.
///
/// # Errors
///
/// Fails when the file exists but cannot be read or parsed.
pub fn load_user_config() -> Result<UserConfig> {
    let Some(config_dir) = dirs::config_dir() else {
        return Ok(UserConfig::default());
    };

    let path = config_dir.join("flightdeck/config.toml");
    if !path.exists() {
        return Ok(UserConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<UserConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Merge project config, user config and environment into one view.
///
/// # Errors
///
/// Propagates config load failures.
pub fn resolve_config(project_root: &Path, cli_json: bool) -> Result<EffectiveConfig> {
    let project = load_project_config(project_root)?;
    let user = load_user_config()?;

    let env_format = env::var("FORMAT").ok();
    let resolved_output = resolve_output(cli_json, user.output.clone(), env_format);

    Ok(EffectiveConfig {
        project,
        user,
        resolved_output,
    })
}

/// Resolve the login used for "my tickets": flag, `FLIGHTDECK_USER`, user config.
#[must_use]
pub fn resolve_login(cli_user: Option<&str>, user: &UserConfig) -> Option<String> {
    resolve_login_inner(
        cli_user,
        env::var("FLIGHTDECK_USER").ok().as_deref(),
        user.login.as_deref(),
    )
}

fn resolve_login_inner(
    cli_user: Option<&str>,
    env_user: Option<&str>,
    config_user: Option<&str>,
) -> Option<String> {
    [cli_user, env_user, config_user]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|login| !login.is_empty())
        .map(ToString::to_string)
}

fn resolve_output(
    cli_json: bool,
    user_output: Option<String>,
    env_format: Option<String>,
) -> String {
    fn normalize_output_mode(raw: &str) -> Option<&'static str> {
        match raw.trim().to_ascii_lowercase().as_str() {
            // canonical values
            "pretty" => Some("pretty"),
            "text" => Some("text"),
            "json" => Some("json"),
            // legacy compatibility
            "human" => Some("pretty"),
            "table" => Some("text"),
            _ => None,
        }
    }

    if cli_json {
        return "json".to_string();
    }

    if let Some(mode) = env_format.as_deref().and_then(normalize_output_mode) {
        return mode.to_string();
    }

    if let Some(mode) = user_output.as_deref().and_then(normalize_output_mode) {
        return mode.to_string();
    }

    if std::io::stdout().is_terminal() {
        "pretty".to_string()
    } else {
        "text".to_string()
    }
}

fn default_unassigned_logins() -> Vec<String> {
    vec!["nobody".to_string(), String::new()]
}

fn default_trunk_names() -> Vec<String> {
    ["trunk", "master", "main"].map(String::from).to_vec()
}

fn default_branch_prefixes() -> Vec<String> {
    ["branch", "release", "hotfix"].map(String::from).to_vec()
}

fn default_x_axis() -> String {
    "revenue".to_string()
}

fn default_y_axis() -> String {
    "complexity".to_string()
}

fn default_radius() -> String {
    "dependency".to_string()
}

fn default_color() -> String {
    "risk".to_string()
}

const fn default_padding() -> f64 {
    1.0
}

const fn default_width() -> f64 {
    1280.0
}

const fn default_height() -> f64 {
    640.0
}
