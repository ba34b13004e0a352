//! 有界轮询：发出进程外动作后，按固定间隔检查可观察状态，直到满足或超时。
//!
//! 作者：Umi 平台集成组
//! 创建时间：2026-10-18
//! 修改时间：2026-10-18

use std::time::{Duration, Instant};

/// 时钟抽象（测试中可替换为不真正睡眠的假时钟）。
pub trait Clock {
    fn now(&self) -> Instant;
    fn sleep(&self, dur: Duration);
}

/// 系统时钟。
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, dur: Duration) {
        std::thread::sleep(dur);
    }
}

/// 轮询参数。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub timeout: Duration,
}

impl Default for PollPolicy {
    /// 100ms 间隔，3 秒上限。
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(100),
            timeout: Duration::from_secs(3),
        }
    }
}

/// 轮询 `probe` 直到其返回 `true` 或超时。
///
/// 返回值：
/// - `true`：在超时前观察到目标状态
/// - `false`：超时
///
/// 说明：
/// - 首次检查在截止时间之前立即进行；超时为 0 时不做任何检查
pub fn wait_until<C, F>(clock: &C, policy: PollPolicy, mut probe: F) -> bool
where
    C: Clock + ?Sized,
    F: FnMut() -> bool,
{
    let deadline = clock.now() + policy.timeout;
    while clock.now() < deadline {
        if probe() {
            return true;
        }
        clock.sleep(policy.interval);
    }
    false
}
