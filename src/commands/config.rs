use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::modules::common::logging;
use crate::modules::common::settings::Settings;

#[derive(Parser, Debug)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// 显示当前生效的设置
    Show,

    /// 写入默认设置文件（已存在时不覆盖）
    Init,

    /// 显示设置文件与日志目录位置
    Path,
}

pub async fn execute(cmd: ConfigCommand) -> Result<()> {
    match cmd.action {
        ConfigAction::Show => {
            let settings = Settings::load()?;
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
        ConfigAction::Init => {
            let path = Settings::path()?;
            if Settings::init()? {
                println!("已创建设置文件: {}", path.display());
            } else {
                println!("设置文件已存在: {}", path.display());
            }
        }
        ConfigAction::Path => {
            println!("设置文件: {}", Settings::path()?.display());
            println!("日志目录: {}", logging::get_log_dir().display());
        }
    }

    Ok(())
}
