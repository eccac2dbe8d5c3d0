pub mod launcher;
pub mod models;
pub mod modes;
pub mod shortcut;
pub mod steam_cfg;

use crate::modules::common::platform::Platform;
use models::{RemoveResult, WriteJournal};
use std::path::{Path, PathBuf};

/// 按日志逆序恢复文件，返回失败信息
pub fn rollback(journal: &WriteJournal) -> Vec<String> {
    let mut warnings = Vec::new();

    for entry in journal.entries().iter().rev() {
        let result = match &entry.previous {
            Some(bytes) => std::fs::write(&entry.path, bytes),
            None => match std::fs::remove_file(&entry.path) {
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                other => other,
            },
        };

        match result {
            Ok(_) => tracing::info!("已回滚: {}", entry.path.display()),
            Err(e) => {
                tracing::error!("回滚失败 {}: {}", entry.path.display(), e);
                warnings.push(format!("回滚失败 {}: {}", entry.path.display(), e));
            }
        }
    }

    warnings
}

/// 本工具可能生成过的文件
pub fn artifact_paths(
    platform: Platform,
    steam_dir: &Path,
    launcher_dir: &Path,
    shortcut: Option<&Path>,
) -> Vec<PathBuf> {
    let mut paths = vec![
        steam_cfg::steam_cfg_path(steam_dir),
        launcher::launcher_path(platform, launcher_dir),
    ];
    if let Some(shortcut) = shortcut {
        paths.push(shortcut.to_path_buf());
    }
    paths
}

/// 删除给定文件，文件不存在视为成功
pub fn remove_artifacts(paths: &[PathBuf]) -> Vec<RemoveResult> {
    paths.iter().map(|path| remove_file(path)).collect()
}

fn remove_file(path: &Path) -> RemoveResult {
    let shown = path.to_string_lossy().to_string();

    if !path.exists() {
        return RemoveResult {
            path: shown,
            existed: false,
            success: true,
            error: None,
        };
    }

    match std::fs::remove_file(path) {
        Ok(_) => {
            tracing::info!("已删除: {}", shown);
            RemoveResult {
                path: shown,
                existed: true,
                success: true,
                error: None,
            }
        }
        Err(e) => {
            tracing::error!("删除失败 {}: {}", shown, e);
            RemoveResult {
                path: shown,
                existed: true,
                success: false,
                error: Some(e.to_string()),
            }
        }
    }
}
