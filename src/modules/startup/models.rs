use serde::{Deserialize, Serialize};

/// Run 键中的 Steam 启动项
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartupEntry {
    pub value_name: String,
    pub command: Option<String>,
    pub backup: Option<String>,
    /// 从命令中解析出的 steam.exe 路径
    pub executable: Option<String>,
    pub valid: bool,
}

impl StartupEntry {
    pub fn is_present(&self) -> bool {
        self.command.is_some()
    }
}

/// 清除启动项的结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClearOutcome {
    /// 已删除，bool 表示是否写入了备份
    Cleared { backed_up: bool },
    /// 原本就没有启动项
    NotPresent,
}

/// 恢复启动项的结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RestoreOutcome {
    Restored,
    NoBackup,
}
