//! 進捗の推定と定期更新
//!
//! ゲートウェイは進捗を返さないので、経過時間から 99% に漸近する値を作る。
//! 実際の結果が届くまで 100% には届かない。

use std::time::Duration;
use tokio::task::JoinHandle;

/// 完了前の上限
pub const PROGRESS_CAP: u8 = 99;

/// 経過時間 → 進捗（指数的に上限へ近づく）
#[derive(Debug, Clone, Copy)]
pub struct ProgressCurve {
    time_constant: Duration,
}

impl ProgressCurve {
    pub fn new(time_constant: Duration) -> Self {
        Self { time_constant }
    }

    /// `floor(99 * (1 - e^(-t/τ)))`
    pub fn estimate(&self, elapsed: Duration) -> u8 {
        let tau = self.time_constant.as_secs_f64().max(f64::EPSILON);
        let ratio = elapsed.as_secs_f64() / tau;
        let value = f64::from(PROGRESS_CAP) * (1.0 - (-ratio).exp());
        value.clamp(0.0, f64::from(PROGRESS_CAP)).floor() as u8
    }
}

/// 一定間隔でコールバックを呼ぶタスク
///
/// コールバックが `false` を返すか、`cancel` されるか、ドロップされると止まる。
#[derive(Debug)]
pub struct ProgressTicker {
    handle: JoinHandle<()>,
}

impl ProgressTicker {
    pub fn spawn<F>(period: Duration, mut on_tick: F) -> Self
    where
        F: FnMut() -> bool + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            // 初回の tick は即時に返るので読み捨てる
            interval.tick().await;
            loop {
                interval.tick().await;
                if !on_tick() {
                    break;
                }
            }
        });
        Self { handle }
    }

    pub fn cancel(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for ProgressTicker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
