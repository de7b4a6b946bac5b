use crate::error::{Result, TableScanError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// APIキーを読む環境変数（先頭が優先）
const API_KEY_ENV_VARS: &[&str] = &["GEMINI_API_KEY", "API_KEY"];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_key: Option<String>,
    pub model: String,
    pub timeout_seconds: u64,
    /// 進捗推定の時定数（ミリ秒）
    pub progress_time_constant_ms: u64,
    /// 進捗更新の間隔（ミリ秒）
    pub progress_tick_ms: u64,
    /// 100%表示を残す時間（ミリ秒）
    pub settle_delay_ms: u64,
    /// 履歴の保存先（省略時はデータディレクトリ）
    pub history_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gemini-2.5-flash".into(),
            timeout_seconds: 120,
            progress_time_constant_ms: 5_000,
            progress_tick_ms: 100,
            settle_delay_ms: 500,
            history_dir: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| TableScanError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("table-scan").join("config.json"))
    }

    /// 履歴ファイルを置くディレクトリ
    pub fn history_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.history_dir {
            return Ok(dir.clone());
        }
        let data = dirs::data_dir()
            .ok_or_else(|| TableScanError::Config("データディレクトリが見つかりません".into()))?;
        Ok(data.join("table-scan"))
    }

    /// APIキーを取得（環境変数を優先）
    ///
    /// 空文字は未設定として扱う。
    pub fn require_api_key(&self) -> Result<String> {
        Self::resolve_api_key(
            API_KEY_ENV_VARS.iter().map(|name| std::env::var(name).ok()),
            self.api_key.as_deref(),
        )
        .ok_or(TableScanError::MissingApiKey)
    }

    fn resolve_api_key<I>(env_values: I, stored: Option<&str>) -> Option<String>
    where
        I: IntoIterator<Item = Option<String>>,
    {
        env_values
            .into_iter()
            .flatten()
            .chain(stored.map(str::to_string))
            .map(|key| key.trim().to_string())
            .find(|key| !key.is_empty())
    }

    pub fn set_api_key(&mut self, key: String) -> Result<()> {
        self.api_key = Some(key);
        self.save()
    }

    /// 表示用にマスクしたAPIキー
    pub fn masked_api_key(&self) -> Option<String> {
        self.api_key.as_deref().map(|key| {
            let visible: String = key.chars().rev().take(4).collect::<Vec<_>>().into_iter().rev().collect();
            format!("****{}", visible)
        })
    }

    pub fn progress_time_constant(&self) -> Duration {
        Duration::from_millis(self.progress_time_constant_ms.max(1))
    }

    pub fn progress_tick(&self) -> Duration {
        Duration::from_millis(self.progress_tick_ms.max(1))
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.model, "gemini-2.5-flash");
        assert_eq!(config.progress_time_constant(), Duration::from_secs(5));
        assert_eq!(config.progress_tick(), Duration::from_millis(100));
    }

    #[test]
    fn test_partial_config_file_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{"api_key": "abc"}"#).unwrap();
        assert_eq!(config.api_key.as_deref(), Some("abc"));
        assert_eq!(config.settle_delay_ms, 500);
    }

    #[test]
    fn test_resolve_api_key_prefers_env() {
        let key = Config::resolve_api_key(vec![Some("env-key".into()), None], Some("stored"));
        assert_eq!(key.as_deref(), Some("env-key"));
    }

    #[test]
    fn test_resolve_api_key_skips_blank() {
        let key = Config::resolve_api_key(vec![Some("  ".into()), None], Some("stored"));
        assert_eq!(key.as_deref(), Some("stored"));
        assert!(Config::resolve_api_key(vec![None, None], Some("")).is_none());
    }

    #[test]
    fn test_masked_api_key() {
        let config = Config {
            api_key: Some("AIzaSyExample1234".into()),
            ..Default::default()
        };
        assert_eq!(config.masked_api_key().as_deref(), Some("****1234"));
    }
}
