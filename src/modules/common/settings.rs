//! 持久化设置
//!
//! `settings.json` 位于数据目录，命令行参数可以逐项覆盖

use super::error::DebloatError;
use super::paths;
use crate::modules::writer::modes::SteamMode;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

pub const SETTINGS_FILE: &str = "settings.json";

/// 等待 Steam 退出的默认超时（10 分钟）
pub const DEFAULT_POLL_TIMEOUT_SECS: u64 = 600;
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;
/// 超时上限（24 小时）
pub const MAX_POLL_TIMEOUT_SECS: u64 = 24 * 60 * 60;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// 手动指定的 Steam 目录，优先于自动探测
    pub steam_dir: Option<PathBuf>,
    /// 启动脚本输出目录，默认桌面
    pub launcher_dir: Option<PathBuf>,
    pub poll_timeout_secs: u64,
    pub poll_interval_ms: u64,
    /// 按模式 ID 覆盖的更新包地址
    pub package_urls: BTreeMap<String, String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            steam_dir: None,
            launcher_dir: None,
            poll_timeout_secs: DEFAULT_POLL_TIMEOUT_SECS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            package_urls: BTreeMap::new(),
        }
    }
}

impl Settings {
    /// 设置文件路径
    pub fn path() -> Result<PathBuf, DebloatError> {
        Ok(paths::data_dir()?.join(SETTINGS_FILE))
    }

    /// 读取设置，文件不存在时返回默认值
    pub fn load() -> Result<Self, DebloatError> {
        let path = Self::path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)?;
        let settings: Settings = serde_json::from_str(&content).map_err(|e| {
            DebloatError::Config(format!("无法解析 {}: {}", path.display(), e))
        })?;
        settings.validate()?;

        tracing::debug!("已加载设置: {}", path.display());
        Ok(settings)
    }

    pub fn save(&self) -> Result<PathBuf, DebloatError> {
        self.validate()?;
        let path = Self::path()?;
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, content)?;
        tracing::info!("已保存设置: {}", path.display());
        Ok(path)
    }

    /// 仅在设置文件不存在时写入默认值，返回是否新建
    pub fn init() -> Result<bool, DebloatError> {
        let path = Self::path()?;
        if path.exists() {
            return Ok(false);
        }
        Self::default().save()?;
        Ok(true)
    }

    pub fn validate(&self) -> Result<(), DebloatError> {
        if self.poll_timeout_secs == 0 || self.poll_timeout_secs > MAX_POLL_TIMEOUT_SECS {
            return Err(DebloatError::Config(format!(
                "poll_timeout_secs 必须在 1..={} 之间",
                MAX_POLL_TIMEOUT_SECS
            )));
        }
        if self.poll_interval_ms == 0 {
            return Err(DebloatError::Config(
                "poll_interval_ms 必须大于 0".to_string(),
            ));
        }
        for (mode, url) in &self.package_urls {
            if !SteamMode::ALL.iter().any(|m| m.id() == mode.as_str()) {
                return Err(DebloatError::Config(format!(
                    "package_urls 中的未知模式: {}",
                    mode
                )));
            }
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(DebloatError::Config(format!(
                    "模式 {} 的更新地址不是 http(s) URL: {}",
                    mode, url
                )));
            }
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.poll_interval_ms)
    }
}
