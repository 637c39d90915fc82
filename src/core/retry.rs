use crate::utils::error::Result;
use std::future::Future;
use std::time::Duration;

/// 有界重試，線性退避：第 N 次失敗後等 base_delay × N。
///
/// 產品詳情管道的預設是 max_attempts = 1，也就是只嘗試一次、
/// 不做實際重試；維持原工具的字面行為。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
        }
    }

    /// Delay slept after failed attempt `attempt` (1-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay * attempt
    }

    /// `sleep` 由呼叫端注入，測試不必真正等待。
    pub async fn run<T, Op, OpFut, Sleep, SleepFut>(&self, mut op: Op, mut sleep: Sleep) -> Result<T>
    where
        Op: FnMut(u32) -> OpFut,
        OpFut: Future<Output = Result<T>>,
        Sleep: FnMut(Duration) -> SleepFut,
        SleepFut: Future<Output = ()>,
    {
        let mut attempt = 1;
        loop {
            match op(attempt).await {
                Ok(value) => return Ok(value),
                Err(e) if attempt >= self.max_attempts => return Err(e),
                Err(e) => {
                    tracing::warn!("Attempt {}/{} failed: {}", attempt, self.max_attempts, e);
                }
            }
            sleep(self.delay_for(attempt)).await;
            attempt += 1;
        }
    }
}
