use std::path::PathBuf;
use std::time::Duration;

/// 规范化注册表或配置中读到的路径（去引号、统一斜杠）
pub fn normalize_path(raw: &str) -> PathBuf {
    let trimmed = raw.trim().trim_matches('"').trim();

    if cfg!(windows) {
        let mut path = trimmed.replace('/', "\\");
        while path.contains("\\\\") {
            path = path.replace("\\\\", "\\");
        }
        PathBuf::from(path)
    } else {
        PathBuf::from(trimmed)
    }
}

/// 格式化时长
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs >= 60 {
        format!("{}m {:02}s", secs / 60, secs % 60)
    } else {
        format!("{}s", secs)
    }
}

/// 为 sh 脚本转义参数（单引号包裹）
pub fn shell_quote(value: &str) -> String {
    if !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:=".contains(c))
    {
        return value.to_string();
    }
    format!("'{}'", value.replace('\'', r"'\''"))
}

/// 生成唯一 ID
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_path_strips_quotes_and_whitespace() {
        let path = normalize_path("  \"/home/user/.steam/steam\" ");
        if cfg!(windows) {
            assert_eq!(path, PathBuf::from(r"\home\user\.steam\steam"));
        } else {
            assert_eq!(path, PathBuf::from("/home/user/.steam/steam"));
        }
    }

    #[cfg(windows)]
    #[test]
    fn normalize_path_converts_registry_style_slashes() {
        assert_eq!(
            normalize_path("c:/program files (x86)//steam"),
            PathBuf::from(r"c:\program files (x86)\steam")
        );
    }

    #[test]
    fn format_duration_uses_minutes_past_sixty_seconds() {
        assert_eq!(format_duration(Duration::from_secs(42)), "42s");
        assert_eq!(format_duration(Duration::from_secs(605)), "10m 05s");
    }

    #[test]
    fn shell_quote_leaves_plain_words_alone() {
        assert_eq!(shell_quote("-nofriendsui"), "-nofriendsui");
        assert_eq!(shell_quote("steam://open/library"), "steam://open/library");
        assert_eq!(shell_quote("/home/a b/steam.sh"), "'/home/a b/steam.sh'");
        assert_eq!(shell_quote("it's"), r"'it'\''s'");
    }
}
