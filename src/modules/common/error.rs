use thiserror::Error;

#[derive(Error, Debug)]
pub enum DebloatError {
    #[error("注册表错误: {0}")]
    Registry(String),

    #[error("文件系统错误: {0}")]
    FileSystem(#[from] std::io::Error),

    #[error("权限不足: {0}")]
    PermissionDenied(String),

    #[error("未找到: {0}")]
    NotFound(String),

    #[error("进程错误: {0}")]
    Process(String),

    #[error("超时: {0}")]
    Timeout(String),

    #[error("操作已取消")]
    Cancelled,

    #[error("配置错误: {0}")]
    Config(String),

    #[error("序列化错误: {0}")]
    Serde(String),

    #[error("当前平台不支持: {0}")]
    UnsupportedPlatform(String),

    #[error("其他错误: {0}")]
    Other(String),
}

impl From<serde_json::Error> for DebloatError {
    fn from(e: serde_json::Error) -> Self {
        DebloatError::Serde(e.to_string())
    }
}

impl serde::Serialize for DebloatError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_converts_into_filesystem_variant() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "steam.cfg");
        let err: DebloatError = io.into();
        assert!(matches!(err, DebloatError::FileSystem(_)));
        assert!(err.to_string().contains("steam.cfg"));
    }

    #[test]
    fn serializes_as_display_string() {
        let err = DebloatError::Timeout("等待 Steam 退出".to_string());
        let json = serde_json::to_string(&err).unwrap();
        assert_eq!(json, "\"超时: 等待 Steam 退出\"");
    }
}
