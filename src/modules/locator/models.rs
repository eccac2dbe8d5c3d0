use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// 安装目录的来源
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LocateSource {
    /// 设置文件或命令行指定
    Override,
    /// 注册表值（完整路径）
    Registry(String),
    /// 固定的常见安装路径
    KnownPath,
}

impl fmt::Display for LocateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocateSource::Override => write!(f, "手动指定"),
            LocateSource::Registry(path) => write!(f, "注册表 {}", path),
            LocateSource::KnownPath => write!(f, "常见路径"),
        }
    }
}

/// 待检查的候选目录
#[derive(Debug, Clone)]
pub struct Candidate {
    pub dir: PathBuf,
    pub source: LocateSource,
}

impl Candidate {
    pub fn new(dir: PathBuf, source: LocateSource) -> Self {
        Self { dir, source }
    }
}

/// 找到的 Steam 安装
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SteamInstallation {
    pub dir: PathBuf,
    pub executable: PathBuf,
    pub source: LocateSource,
}
