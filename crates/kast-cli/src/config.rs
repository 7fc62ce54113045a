use anyhow::{Context, Result, bail};
use kast::ast::render::RenderOptions;
use serde::{Deserialize, Deserializer};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::args::DumpArgs;

/// File name looked up in the working directory when `--config` is absent.
pub const CONFIG_FILE_NAME: &str = "kast.json";

/// Custom deserializer for boolean options that accepts both bool and string values.
/// This handles cases where kast.json contains `"showTypes": "false"` instead of `"showTypes": false`.
fn deserialize_bool_or_string<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolOrString {
        Bool(bool),
        String(String),
    }

    match Option::<BoolOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(BoolOrString::Bool(b)) => Ok(Some(b)),
        Some(BoolOrString::String(s)) => match s.trim().to_lowercase().as_str() {
            "true" => Ok(Some(true)),
            "false" => Ok(Some(false)),
            _ => Err(Error::custom(format!(
                "invalid boolean value: '{s}'. Expected true, false, 'true', or 'false'"
            ))),
        },
    }
}

/// Contents of kast.json.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct KastConfig {
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub check: CheckConfig,
}

/// Defaults for `kast dump`. Unset fields fall back to `RenderOptions::default()`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RenderConfig {
    #[serde(default)]
    pub indent: Option<usize>,
    #[serde(default, deserialize_with = "deserialize_bool_or_string")]
    pub show_attributes: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_bool_or_string")]
    pub show_types: Option<bool>,
    #[serde(default)]
    pub max_depth: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CheckConfig {
    #[serde(default, deserialize_with = "deserialize_bool_or_string")]
    pub warnings_as_errors: Option<bool>,
}

impl KastConfig {
    /// Render options from the config file, overridden by command-line flags.
    pub fn render_options(&self, args: &DumpArgs) -> RenderOptions {
        let defaults = RenderOptions::default();
        let render = &self.render;
        RenderOptions {
            indent: args.indent.or(render.indent).unwrap_or(defaults.indent),
            show_attributes: !args.no_attributes
                && render.show_attributes.unwrap_or(defaults.show_attributes),
            show_types: !args.no_types && render.show_types.unwrap_or(defaults.show_types),
            max_depth: args.depth.or(render.max_depth).unwrap_or(defaults.max_depth),
        }
    }

    pub fn warnings_as_errors(&self, flag: bool) -> bool {
        flag || self.check.warnings_as_errors.unwrap_or(false)
    }
}

pub fn parse_config(source: &str) -> Result<KastConfig> {
    let config = serde_json::from_str(source).context("failed to parse kast.json")?;
    Ok(config)
}

pub fn load_config(path: &Path) -> Result<KastConfig> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    parse_config(&source).with_context(|| format!("invalid config: {}", path.display()))
}

/// Find the config to use: `explicit` when given (it must exist), otherwise
/// kast.json in `cwd` when present, otherwise defaults.
pub fn discover_config(cwd: &Path, explicit: Option<&Path>) -> Result<KastConfig> {
    let path: PathBuf = match explicit {
        Some(path) => {
            let path = cwd.join(path);
            if !path.is_file() {
                bail!("config file not found: {}", path.display());
            }
            path
        }
        None => {
            let path = cwd.join(CONFIG_FILE_NAME);
            if !path.is_file() {
                debug!(cwd = %cwd.display(), "no kast.json; using defaults");
                return Ok(KastConfig::default());
            }
            path
        }
    };
    debug!(path = %path.display(), "loading config");
    load_config(&path)
}
