//! Configuration management utilities.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dirs_next::config_dir;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

static DEFAULT_CONFIG: Lazy<&'static str> =
    Lazy::new(|| include_str!("../../assets/default-config.toml"));
static DEFAULT_WORKSPACE_CONFIG_PATH: &str = ".quizpack/config.toml";

/// Layered configuration loaded from defaults, user, workspace, and env.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub defaults: Defaults,
    #[serde(default)]
    pub template: Template,
    #[serde(default)]
    pub output: Output,
}

/// Default quiz parameters applied when the shell omits a flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Defaults {
    #[serde(default = "Defaults::default_title")]
    pub title: String,
    #[serde(default = "Defaults::default_media_kind")]
    pub media_kind: String,
    #[serde(default = "Defaults::default_randomize")]
    pub randomize: bool,
    #[serde(default = "Defaults::default_pool_size")]
    pub pool_size: u32,
    #[serde(default = "Defaults::default_pass_percentage")]
    pub pass_percentage: u32,
}

impl Defaults {
    fn default_title() -> String {
        "Video Quiz".to_owned()
    }

    fn default_media_kind() -> String {
        "video".into()
    }

    fn default_randomize() -> bool {
        true
    }

    fn default_pool_size() -> u32 {
        7
    }

    fn default_pass_percentage() -> u32 {
        75
    }
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            title: Self::default_title(),
            media_kind: Self::default_media_kind(),
            randomize: Self::default_randomize(),
            pool_size: Self::default_pool_size(),
            pass_percentage: Self::default_pass_percentage(),
        }
    }
}

/// Location of the template archive every package is derived from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Template {
    #[serde(default)]
    path: Option<PathBuf>,
}

impl Template {
    fn default_path() -> &'static str {
        "templates/col_vid_mc_tf.zip"
    }

    pub fn path(&self) -> PathBuf {
        self.path
            .clone()
            .unwrap_or_else(|| PathBuf::from(Self::default_path()))
    }
}

/// Where the shell writes the finished package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Output {
    #[serde(default)]
    file_name: Option<String>,
}

impl Output {
    fn default_file_name() -> &'static str {
        "video_quiz.h5p"
    }

    pub fn file_name(&self) -> String {
        self.file_name
            .clone()
            .unwrap_or_else(|| Self::default_file_name().to_owned())
    }
}

/// Environment overrides for critical settings.
#[derive(Debug, Default, Clone)]
pub struct EnvOverrides {
    template: Option<String>,
    output: Option<String>,
}

impl EnvOverrides {
    fn from_env() -> Self {
        Self {
            template: env::var("QUIZPACK_TEMPLATE").ok(),
            output: env::var("QUIZPACK_OUTPUT").ok(),
        }
    }

    #[cfg(test)]
    fn for_tests(template: &str, output: &str) -> Self {
        Self {
            template: Some(template.to_owned()),
            output: Some(output.to_owned()),
        }
    }
}

impl Config {
    /// Load configuration from defaults, user/global config, workspace config, and env overrides.
    pub fn load() -> Result<Self> {
        let env = EnvOverrides::from_env();
        let global = global_config_path();
        let workspace = workspace_config_path()?;
        Self::load_with_layers(global, workspace, env)
    }

    fn load_with_layers(
        global: Option<PathBuf>,
        workspace: Option<PathBuf>,
        env_overrides: EnvOverrides,
    ) -> Result<Self> {
        let mut layers: Vec<Config> = Vec::new();

        layers.push(Self::from_str(&DEFAULT_CONFIG)?);

        if let Some(global_path) = global.filter(|path| path.exists()) {
            layers.push(Self::from_file(&global_path)?);
        }

        if let Some(workspace_path) = workspace.filter(|path| path.exists()) {
            layers.push(Self::from_file(&workspace_path)?);
        }

        let merged = layers.into_iter().reduce(Config::merge).unwrap_or_default();
        Ok(apply_env_overrides(merged, env_overrides))
    }

    fn from_file(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        Self::from_str(&data)
    }

    fn from_str(contents: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(contents).with_context(|| "failed to parse TOML config".to_string())?;
        Ok(config)
    }

    fn merge(self, other: Self) -> Self {
        Self {
            defaults: merge_defaults(self.defaults, other.defaults),
            template: merge_template(self.template, other.template),
            output: merge_output(self.output, other.output),
        }
    }
}

fn merge_defaults(base: Defaults, overlay: Defaults) -> Defaults {
    Defaults {
        title: if overlay.title != Defaults::default_title() {
            overlay.title
        } else {
            base.title
        },
        media_kind: if overlay.media_kind != Defaults::default_media_kind() {
            overlay.media_kind
        } else {
            base.media_kind
        },
        randomize: if overlay.randomize != Defaults::default_randomize() {
            overlay.randomize
        } else {
            base.randomize
        },
        pool_size: if overlay.pool_size != Defaults::default_pool_size() {
            overlay.pool_size
        } else {
            base.pool_size
        },
        pass_percentage: if overlay.pass_percentage != Defaults::default_pass_percentage() {
            overlay.pass_percentage
        } else {
            base.pass_percentage
        },
    }
}

fn merge_template(mut base: Template, overlay: Template) -> Template {
    if let Some(path) = overlay.path {
        base.path = Some(path);
    }
    base
}

fn merge_output(mut base: Output, overlay: Output) -> Output {
    if let Some(file_name) = overlay.file_name {
        base.file_name = Some(file_name);
    }
    base
}

fn global_config_path() -> Option<PathBuf> {
    config_dir().map(|base| base.join("quizpack/config.toml"))
}

fn workspace_config_path() -> Result<Option<PathBuf>> {
    let cwd = env::current_dir()?;
    let root = find_repo_root(&cwd).unwrap_or(cwd);
    Ok(Some(root.join(DEFAULT_WORKSPACE_CONFIG_PATH)))
}

fn find_repo_root(start: &Path) -> Option<PathBuf> {
    let mut current = start;
    loop {
        if current.join(".git").exists() {
            return Some(current.to_path_buf());
        }
        match current.parent() {
            Some(parent) => current = parent,
            None => return None,
        }
    }
}

fn apply_env_overrides(mut config: Config, env: EnvOverrides) -> Config {
    if let Some(template) = env.template {
        config.template.path = Some(PathBuf::from(template));
    }
    if let Some(output) = env.output {
        config.output.file_name = Some(output);
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_uses_defaults_when_no_files() {
        let config = Config::load_with_layers(None, None, EnvOverrides::default())
            .expect("load default config");
        assert_eq!(config.defaults.title, "Video Quiz");
        assert_eq!(config.defaults.pool_size, 7);
        assert_eq!(config.defaults.pass_percentage, 75);
        assert!(config.defaults.randomize);
        assert_eq!(config.template.path(), PathBuf::from("templates/col_vid_mc_tf.zip"));
        assert_eq!(config.output.file_name(), "video_quiz.h5p");
    }

    #[test]
    fn merge_global_and_workspace() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let global = temp.path().join("config.toml");
        fs::write(
            &global,
            r#"
[defaults]
title = "Hörverstehen"
media_kind = "audio"
[template]
path = "/srv/templates/audio_quiz.zip"
"#,
        )?;

        let workspace_dir = temp.path().join("repo");
        fs::create_dir_all(workspace_dir.join(".quizpack"))?;
        fs::create_dir_all(workspace_dir.join(".git"))?;
        fs::write(
            workspace_dir.join(".quizpack/config.toml"),
            r#"
[defaults]
pool_size = 10
[output]
file_name = "audio_quiz.h5p"
"#,
        )?;

        let global_path = Some(global);
        let workspace_path = Some(workspace_dir.join(".quizpack/config.toml"));

        let config =
            Config::load_with_layers(global_path, workspace_path, EnvOverrides::default())?;

        assert_eq!(config.defaults.title, "Hörverstehen");
        assert_eq!(config.defaults.media_kind, "audio");
        assert_eq!(config.defaults.pool_size, 10);
        assert_eq!(config.template.path(), PathBuf::from("/srv/templates/audio_quiz.zip"));
        assert_eq!(config.output.file_name(), "audio_quiz.h5p");

        Ok(())
    }

    #[test]
    fn env_overrides_take_precedence() -> Result<()> {
        let overrides = EnvOverrides::for_tests("/env/template.zip", "env_output.h5p");
        let config = Config::load_with_layers(None, None, overrides)?;
        assert_eq!(config.template.path(), PathBuf::from("/env/template.zip"));
        assert_eq!(config.output.file_name(), "env_output.h5p");
        Ok(())
    }

    #[test]
    fn invalid_config_returns_error() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let file = temp.path().join("broken.toml");
        fs::write(&file, "this is not toml")?;
        let result = Config::from_file(&file);
        assert!(result.is_err());
        Ok(())
    }
}
