use super::error::DebloatError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 支持的目标平台
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Platform {
    Windows,
    Linux,
}

impl Platform {
    /// 当前编译目标对应的平台
    pub fn current() -> Result<Self, DebloatError> {
        if cfg!(windows) {
            Ok(Platform::Windows)
        } else if cfg!(target_os = "linux") {
            Ok(Platform::Linux)
        } else {
            Err(DebloatError::UnsupportedPlatform(
                std::env::consts::OS.to_string(),
            ))
        }
    }

    /// Steam 主程序文件名
    pub fn steam_executable(&self) -> &'static str {
        match self {
            Platform::Windows => "steam.exe",
            Platform::Linux => "steam.sh",
        }
    }

    /// 启动脚本文件名
    pub fn launcher_file_name(&self) -> &'static str {
        match self {
            Platform::Windows => "Steam.bat",
            Platform::Linux => "steam-debloat.sh",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Windows => write!(f, "Windows"),
            Platform::Linux => write!(f, "Linux"),
        }
    }
}
