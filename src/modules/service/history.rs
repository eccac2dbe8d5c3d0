//! 操作历史持久化
//!
//! 保存最近的优化/卸载结果，供 status 命令查看

use super::models::OperationRecord;
use crate::modules::common::error::DebloatError;
use crate::modules::common::paths;
use std::path::PathBuf;

pub const HISTORY_FILE: &str = "history.json";
pub const MAX_HISTORY: usize = 50;

fn get_history_file() -> Result<PathBuf, DebloatError> {
    Ok(paths::data_dir()?.join(HISTORY_FILE))
}

/// 读取全部记录（旧到新），文件损坏时返回空列表
pub fn load() -> Result<Vec<OperationRecord>, DebloatError> {
    let path = get_history_file()?;

    if !path.exists() {
        return Ok(Vec::new());
    }

    let content = std::fs::read_to_string(&path)?;
    match serde_json::from_str(&content) {
        Ok(records) => Ok(records),
        Err(e) => {
            tracing::warn!("历史记录无法解析，已忽略 {}: {}", path.display(), e);
            Ok(Vec::new())
        }
    }
}

/// 追加记录，只保留最近 MAX_HISTORY 条
pub fn append(record: OperationRecord) -> Result<(), DebloatError> {
    let path = get_history_file()?;
    let mut records = load()?;

    records.retain(|r| r.id() != record.id());
    records.push(record);
    if records.len() > MAX_HISTORY {
        let overflow = records.len() - MAX_HISTORY;
        records.drain(..overflow);
    }

    let content = serde_json::to_string_pretty(&records)?;
    std::fs::write(&path, content)?;

    tracing::debug!("已写入历史记录: {}", path.display());
    Ok(())
}

/// 最近 n 条记录（新到旧）
pub fn recent(limit: usize) -> Result<Vec<OperationRecord>, DebloatError> {
    let mut records = load()?;
    records.reverse();
    records.truncate(limit);
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::common::paths::{test_support, TEST_DATA_DIR_LOCK};
    use crate::modules::service::models::{OptimizationResult, UninstallStatus};
    use crate::modules::writer::modes::SteamMode;

    #[test]
    fn append_keeps_newest_records_only() {
        let _guard = TEST_DATA_DIR_LOCK
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let root = test_support::with_data_root("history-cap");

        let mut last_id = String::new();
        for _ in 0..(MAX_HISTORY + 5) {
            let result = OptimizationResult::new(SteamMode::Lite2022Dec);
            last_id = result.id.clone();
            append(OperationRecord::Optimize(result)).unwrap();
        }
        append(OperationRecord::Uninstall(UninstallStatus::new())).unwrap();

        let all = load().unwrap();
        assert_eq!(all.len(), MAX_HISTORY);

        let newest = recent(2).unwrap();
        assert!(matches!(newest[0], OperationRecord::Uninstall(_)));
        assert_eq!(newest[1].id(), last_id);

        test_support::cleanup_data_root(&root);
    }

    #[test]
    fn corrupt_history_is_ignored() {
        let _guard = TEST_DATA_DIR_LOCK
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let root = test_support::with_data_root("history-corrupt");

        std::fs::write(root.join(HISTORY_FILE), "{ broken").unwrap();
        assert!(load().unwrap().is_empty());

        test_support::cleanup_data_root(&root);
    }
}
