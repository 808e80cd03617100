use std::time::Duration;

use stack_deploy_core::ports::Sleeper;

use super::block_on;

/// Sleeps on the tokio clock so the runtime keeps driving I/O between polls.
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    fn sleep(&self, duration: Duration) {
        block_on(tokio::time::sleep(duration));
    }
}
