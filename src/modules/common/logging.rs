use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use super::paths;

pub fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    let log_dir = get_log_dir();
    let _ = std::fs::create_dir_all(&log_dir);

    // 文件输出，按天滚动
    let file_appender = tracing_appender::rolling::daily(&log_dir, "steam-debloat.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // 进程结束前 guard 必须存活
    std::mem::forget(guard);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!(
            "steam_debloat={level},steam_debloat_lib={level},warn"
        ))
    });

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(non_blocking),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    let _ = subscriber.try_init();
}

pub fn get_log_dir() -> std::path::PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join(paths::APP_DIR_NAME)
        .join("logs")
}
