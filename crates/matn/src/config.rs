use anyhow::Result;
use directories::ProjectDirs;
use imlo::Direction;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::fs::try_exists;

use crate::language::ContentLanguage;

const DEFAULT_HISTORY_LIMIT: usize = 100;
const MAX_HISTORY_LIMIT: usize = 10_000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub transliteration: TransliterationConfig,
    pub editor: EditorConfig,
}

/// Which way the transliteration action converts text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectionSetting {
    /// Pick the direction from the dominant script of the text.
    Auto,
    LatinToCyrillic,
    CyrillicToLatin,
}

impl DirectionSetting {
    pub fn fixed(self) -> Option<Direction> {
        match self {
            DirectionSetting::Auto => None,
            DirectionSetting::LatinToCyrillic => Some(Direction::LatinToCyrillic),
            DirectionSetting::CyrillicToLatin => Some(Direction::CyrillicToLatin),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransliterationConfig {
    pub direction: DirectionSetting,
    /// Leave tags and entities untouched in `matn` command-line input.
    /// Editor surfaces always keep their markup.
    #[serde(default = "default_true")]
    pub preserve_markup: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorConfig {
    pub history_limit: usize,
    pub sanitize_output: bool,
    #[serde(default = "default_dual_script_languages")]
    pub dual_script_languages: Vec<ContentLanguage>,
}

fn default_true() -> bool {
    true
}

fn default_dual_script_languages() -> Vec<ContentLanguage> {
    ContentLanguage::ALL
        .into_iter()
        .filter(|lang| lang.requires_dual_script())
        .collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            transliteration: TransliterationConfig {
                direction: DirectionSetting::LatinToCyrillic,
                preserve_markup: true,
            },
            editor: EditorConfig {
                history_limit: DEFAULT_HISTORY_LIMIT,
                sanitize_output: true,
                dual_script_languages: default_dual_script_languages(),
            },
        }
    }
}

impl Config {
    pub async fn load() -> Result<Self> {
        if let Some(config_path) = Self::config_path() {
            if try_exists(&config_path).await? {
                match tokio::fs::read_to_string(&config_path).await {
                    Ok(content) => {
                        if content.trim().is_empty() {
                            log::warn!("Config file is empty, creating new one");
                            return Ok(Self::save_defaults().await);
                        }

                        match serde_json::from_str::<Self>(&content) {
                            Ok(mut config) => {
                                config.validate()?;
                                log::info!(
                                    "Successfully loaded config from: {}",
                                    config_path.display()
                                );
                                return Ok(config);
                            }
                            Err(json_err) => {
                                log::error!("Failed to parse config file: {}", json_err);

                                let backup_path = config_path.with_extension("bak");
                                if let Err(e) = tokio::fs::copy(&config_path, &backup_path).await {
                                    log::warn!("Failed to backup broken config: {}", e);
                                } else {
                                    log::info!(
                                        "Backed up broken config to: {}",
                                        backup_path.display()
                                    );
                                }

                                return Ok(Self::save_defaults().await);
                            }
                        }
                    }
                    Err(io_err) => {
                        log::error!("Failed to read config file: {}", io_err);
                    }
                }
            } else {
                log::info!("Config file does not exist, creating default");
            }
        }

        Ok(Self::save_defaults().await)
    }

    /// Defaults, written back to disk on a best-effort basis.
    async fn save_defaults() -> Self {
        let default_config = Self::default();
        if let Err(e) = default_config.save().await {
            log::warn!("Failed to write default config: {}", e);
        }
        default_config
    }

    pub async fn save(&self) -> Result<()> {
        if let Some(config_path) = Self::config_path() {
            let mut config_to_save = self.clone();
            config_to_save.validate()?;

            if let Some(parent) = config_path.parent() {
                tokio::fs::create_dir_all(parent).await.map_err(|e| {
                    anyhow::anyhow!(
                        "Failed to create config directory: {} - {}",
                        parent.display(),
                        e
                    )
                })?;
            }

            let content = serde_json::to_string_pretty(&config_to_save)
                .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;
            tokio::fs::write(&config_path, content).await.map_err(|e| {
                anyhow::anyhow!(
                    "Failed to write config file: {} - {}",
                    config_path.display(),
                    e
                )
            })?;
            log::info!("Successfully saved config to: {}", config_path.display());
        }
        Ok(())
    }

    /// Validate configuration values and fix invalid ones
    pub fn validate(&mut self) -> Result<()> {
        let mut has_issues = false;

        if self.editor.history_limit == 0 || self.editor.history_limit > MAX_HISTORY_LIMIT {
            log::warn!(
                "Invalid history limit: {}, using default",
                self.editor.history_limit
            );
            self.editor.history_limit = DEFAULT_HISTORY_LIMIT;
            has_issues = true;
        }

        let before = self.editor.dual_script_languages.len();
        self.editor.dual_script_languages.sort();
        self.editor.dual_script_languages.dedup();
        if self.editor.dual_script_languages.len() != before {
            log::warn!("Duplicate dual-script languages removed");
            has_issues = true;
        }

        if has_issues {
            log::info!("Configuration validation completed with corrections");
        }

        Ok(())
    }

    /// Whether editing content in `language` shows the transliteration surface.
    pub fn show_transliteration_for(&self, language: ContentLanguage) -> bool {
        self.editor.dual_script_languages.contains(&language)
    }

    fn config_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("MATN_CONFIG_PATH") {
            return Some(PathBuf::from(path));
        }

        if let Ok(dir) = std::env::var("MATN_CONFIG_DIR") {
            return Some(PathBuf::from(dir).join("config.json"));
        }

        ProjectDirs::from("uz", "matn", "matn").map(|dirs| dirs.config_dir().join("config.json"))
    }
}
