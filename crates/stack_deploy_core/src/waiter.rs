//! Polling waiter for stack operations.
//!
//! Polls the stack's status, sleeps between polls through an injectable
//! [`Sleeper`], and stops at the first terminal status or when the attempt
//! budget runs out. Success and failure status sets follow the provider's
//! stock `stack_create_complete` / `stack_update_complete` waiters.

use crate::contract::{StackStatus, WaitPolicy};
use crate::error::{DeployError, DeployResult};
use crate::ports::{Sleeper, StackBackend};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitTarget {
    CreateComplete,
    UpdateComplete,
}

impl WaitTarget {
    pub fn success_status(self) -> &'static str {
        match self {
            Self::CreateComplete => "CREATE_COMPLETE",
            Self::UpdateComplete => "UPDATE_COMPLETE",
        }
    }

    pub fn failure_statuses(self) -> &'static [&'static str] {
        match self {
            Self::CreateComplete => &[
                "CREATE_FAILED",
                "DELETE_COMPLETE",
                "DELETE_FAILED",
                "ROLLBACK_FAILED",
                "ROLLBACK_COMPLETE",
            ],
            Self::UpdateComplete => &[
                "UPDATE_FAILED",
                "UPDATE_ROLLBACK_FAILED",
                "UPDATE_ROLLBACK_COMPLETE",
            ],
        }
    }
}

pub struct StackWaiter<'a, S: Sleeper + ?Sized> {
    sleeper: &'a S,
    policy: WaitPolicy,
}

impl<'a, S: Sleeper + ?Sized> StackWaiter<'a, S> {
    pub fn new(sleeper: &'a S, policy: WaitPolicy) -> Self {
        Self { sleeper, policy }
    }

    /// Blocks until `stack_name` reaches `target`'s success status.
    ///
    /// Polls immediately and sleeps only between non-terminal polls, like the
    /// provider waiters. A describe error while polling ends the wait.
    pub fn wait(
        &self,
        backend: &(impl StackBackend + ?Sized),
        stack_name: &str,
        target: WaitTarget,
    ) -> DeployResult<StackStatus> {
        let attempts = self.policy.max_attempts.max(1);
        for attempt in 1..=attempts {
            if attempt > 1 {
                self.sleeper.sleep(self.policy.delay);
            }
            let description = backend.describe_stack(stack_name)?;
            let status = description.status;

            if status.as_str() == target.success_status() {
                return Ok(status);
            }
            if target.failure_statuses().contains(&status.as_str()) {
                return Err(DeployError::StackFailed {
                    stack_name: stack_name.to_string(),
                    status: status.status,
                    reason: status.reason,
                });
            }
            tracing::debug!(
                stack_name,
                attempt,
                status = status.as_str(),
                "waiting for {}",
                target.success_status()
            );
        }

        Err(DeployError::WaiterTimedOut {
            stack_name: stack_name.to_string(),
            target: target.success_status(),
            attempts,
        })
    }
}
