//! Windows 启动项编辑
//!
//! 读取、校验、清除 `HKCU\...\Run` 下的 `Steam` 值，清除前可以把原值备份到另一个值名

pub mod models;
#[cfg(windows)]
pub mod registry;

use crate::modules::common::error::DebloatError;
use models::{ClearOutcome, RestoreOutcome, StartupEntry};
use regex::Regex;
use std::sync::OnceLock;

pub const RUN_KEY: &str = r"Software\Microsoft\Windows\CurrentVersion\Run";
pub const STEAM_VALUE: &str = "Steam";
pub const BACKUP_VALUE: &str = "Steam_DebloatBackup";

/// Run 键的读写接口
pub trait RunKeyStore {
    fn get(&self, name: &str) -> Result<Option<String>, DebloatError>;
    fn set(&mut self, name: &str, value: &str) -> Result<(), DebloatError>;
    fn delete(&mut self, name: &str) -> Result<(), DebloatError>;
}

/// 当前平台的 Run 键
#[cfg(windows)]
pub fn open_run_key() -> Result<Box<dyn RunKeyStore>, DebloatError> {
    Ok(Box::new(registry::WinRunKey::current_user()))
}

#[cfg(not(windows))]
pub fn open_run_key() -> Result<Box<dyn RunKeyStore>, DebloatError> {
    Err(DebloatError::UnsupportedPlatform(
        "启动项编辑仅支持 Windows".to_string(),
    ))
}

fn steam_command_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?i)^\s*(?:"([^"]*steam\.exe)"|(\S[^"]*?steam\.exe))(?:\s|$)"#)
            .expect("steam command regex")
    })
}

/// 从启动命令中解析 steam.exe 路径，不是 Steam 的命令返回 None
pub fn validate(command: &str) -> Option<String> {
    let caps = steam_command_regex().captures(command)?;
    caps.get(1)
        .or_else(|| caps.get(2))
        .map(|m| m.as_str().trim().to_string())
}

/// 读取启动项及其备份
pub fn read(store: &dyn RunKeyStore) -> Result<StartupEntry, DebloatError> {
    let command = store.get(STEAM_VALUE)?;
    let backup = store.get(BACKUP_VALUE)?;
    let executable = command.as_deref().and_then(validate);

    Ok(StartupEntry {
        value_name: STEAM_VALUE.to_string(),
        valid: executable.is_some(),
        command,
        backup,
        executable,
    })
}

/// 清除启动项
///
/// 先写备份再删除；删除失败时撤销刚写入的备份
pub fn clear(store: &mut dyn RunKeyStore, backup: bool) -> Result<ClearOutcome, DebloatError> {
    let Some(command) = store.get(STEAM_VALUE)? else {
        tracing::info!("未发现 Steam 启动项");
        return Ok(ClearOutcome::NotPresent);
    };

    if validate(&command).is_none() {
        tracing::warn!("Steam 启动项不指向 steam.exe: {}", command);
    }

    let previous_backup = store.get(BACKUP_VALUE)?;
    if backup {
        store.set(BACKUP_VALUE, &command)?;
        tracing::info!("已备份启动项到 {}", BACKUP_VALUE);
    }

    if let Err(e) = store.delete(STEAM_VALUE) {
        if backup {
            let undo = match &previous_backup {
                Some(old) => store.set(BACKUP_VALUE, old),
                None => store.delete(BACKUP_VALUE),
            };
            if let Err(undo_err) = undo {
                tracing::error!("撤销启动项备份失败: {}", undo_err);
            }
        }
        return Err(e);
    }

    tracing::info!("已删除 Steam 启动项");
    Ok(ClearOutcome::Cleared { backed_up: backup })
}

/// 从备份恢复启动项
pub fn restore(store: &mut dyn RunKeyStore) -> Result<RestoreOutcome, DebloatError> {
    let Some(backup) = store.get(BACKUP_VALUE)? else {
        return Ok(RestoreOutcome::NoBackup);
    };

    store.set(STEAM_VALUE, &backup)?;
    store.delete(BACKUP_VALUE)?;

    tracing::info!("已从 {} 恢复 Steam 启动项", BACKUP_VALUE);
    Ok(RestoreOutcome::Restored)
}
