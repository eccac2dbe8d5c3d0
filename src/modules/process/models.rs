use serde::{Deserialize, Serialize};
use tokio::sync::watch;

/// 正在运行的 Steam 相关进程
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SteamProcess {
    pub pid: u32,
    pub name: String,
}

/// 等待进程退出的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WaitOutcome {
    Exited,
    TimedOut,
    Cancelled,
}

/// 结束进程的统计
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StopReport {
    pub killed: Vec<SteamProcess>,
    pub failed: Vec<SteamProcess>,
}

impl StopReport {
    pub fn is_empty(&self) -> bool {
        self.killed.is_empty() && self.failed.is_empty()
    }
}

/// 取消信号（Ctrl-C 时由命令层触发）
#[derive(Debug, Clone)]
pub struct CancelSignal {
    rx: watch::Receiver<bool>,
}

impl CancelSignal {
    pub fn new() -> (watch::Sender<bool>, Self) {
        let (tx, rx) = watch::channel(false);
        (tx, Self { rx })
    }

    /// 永远不会被触发的信号
    pub fn never() -> Self {
        let (tx, signal) = Self::new();
        // 发送端释放后 changed() 返回错误，cancelled() 会一直挂起
        drop(tx);
        signal
    }

    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// 等待取消；发送端已释放且未取消时永远挂起
    pub async fn cancelled(&mut self) {
        while !*self.rx.borrow_and_update() {
            if self.rx.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}
