use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 被覆盖前的文件状态，用于回滚
#[derive(Debug, Clone)]
pub struct JournalEntry {
    pub path: PathBuf,
    /// None 表示写入前文件不存在
    pub previous: Option<Vec<u8>>,
}

/// 本次操作写过的所有文件
#[derive(Debug, Clone, Default)]
pub struct WriteJournal {
    entries: Vec<JournalEntry>,
}

impl WriteJournal {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录文件当前内容，同一路径只记录第一次
    pub fn record(&mut self, path: &Path) -> std::io::Result<()> {
        if self.entries.iter().any(|e| e.path == path) {
            return Ok(());
        }

        let previous = match std::fs::read(path) {
            Ok(bytes) => Some(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => return Err(e),
        };

        self.entries.push(JournalEntry {
            path: path.to_path_buf(),
            previous,
        });
        Ok(())
    }

    pub fn entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    pub fn paths(&self) -> Vec<PathBuf> {
        self.entries.iter().map(|e| e.path.clone()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// 删除操作结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoveResult {
    pub path: String,
    pub existed: bool,
    pub success: bool,
    pub error: Option<String>,
}
