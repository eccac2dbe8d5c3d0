use anyhow::Result;
use clap::Parser;

use crate::modules::common::platform::Platform;
use crate::modules::common::settings::Settings;
use crate::modules::writer::modes::SteamMode;

#[derive(Parser, Debug)]
pub struct ModesCommand {
    /// 显示完整启动参数
    #[arg(long)]
    pub args: bool,
}

pub async fn execute(cmd: ModesCommand) -> Result<()> {
    let settings = Settings::load()?;
    let platform = Platform::current()?;

    println!("=== 可用模式 ===\n");
    for mode in SteamMode::ALL {
        let url = mode.package_url(&settings);
        let overridden = url != mode.default_package_url();

        println!("  {:16} {}", mode.id(), mode.description());
        println!(
            "  {:16} 更新包: {}{}",
            "",
            url,
            if overridden { " (设置覆盖)" } else { "" }
        );
        if cmd.args {
            println!("  {:16} 参数: {}", "", mode.launch_args(platform).join(" "));
        }
        println!();
    }

    Ok(())
}
