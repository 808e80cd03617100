//! Create-or-update reconciliation of the single named stack.

use crate::contract::{ProbeMode, ReconcileAction, ReconcileOutcome, StackRequest};
use crate::error::DeployResult;
use crate::ports::{Sleeper, StackBackend};
use crate::waiter::{StackWaiter, WaitTarget};

/// Brings the stack named in `request` in line with its template and
/// parameters.
///
/// An existing stack is updated and a missing one created, each followed by
/// a blocking wait. An update the backend rejects because nothing changed
/// counts as success.
pub fn reconcile_stack<S: Sleeper + ?Sized>(
    backend: &impl StackBackend,
    waiter: &StackWaiter<'_, S>,
    request: &StackRequest,
    probe_mode: ProbeMode,
) -> DeployResult<ReconcileOutcome> {
    let stack_name = request.stack_name.as_str();

    if stack_exists(backend, stack_name, probe_mode)? {
        tracing::info!(stack_name, "Updating stack ...");
        let stack_id = match backend.update_stack(request) {
            Ok(stack_id) => stack_id,
            Err(error) if error.is_no_updates() => {
                tracing::info!(stack_name, "Stack is already up-to-date.");
                return Ok(ReconcileOutcome {
                    action: ReconcileAction::UpToDate,
                    stack_id: None,
                    final_status: None,
                });
            }
            Err(error) => return Err(error.into()),
        };
        tracing::info!(
            stack_name,
            "Stack update initiated: {}",
            stack_id.as_deref().unwrap_or("<unknown>")
        );

        let status = waiter.wait(backend, stack_name, WaitTarget::UpdateComplete)?;
        tracing::info!(stack_name, "Stack update completed successfully!");
        Ok(ReconcileOutcome {
            action: ReconcileAction::Updated,
            stack_id,
            final_status: Some(status),
        })
    } else {
        tracing::info!(stack_name, "Creating new stack ...");
        let stack_id = backend.create_stack(request)?;
        tracing::info!(
            stack_name,
            "Stack creation initiated: {}",
            stack_id.as_deref().unwrap_or("<unknown>")
        );

        let status = waiter.wait(backend, stack_name, WaitTarget::CreateComplete)?;
        tracing::info!(stack_name, "Stack creation completed successfully!");
        Ok(ReconcileOutcome {
            action: ReconcileAction::Created,
            stack_id,
            final_status: Some(status),
        })
    }
}

fn stack_exists(
    backend: &impl StackBackend,
    stack_name: &str,
    probe_mode: ProbeMode,
) -> DeployResult<bool> {
    match backend.describe_stack(stack_name) {
        Ok(description) => {
            tracing::debug!(
                stack_name,
                status = description.status.as_str(),
                "stack exists"
            );
            Ok(true)
        }
        Err(error) if probe_mode.treats_as_absent(&error) => {
            tracing::debug!(stack_name, probe_error = %error, "stack treated as absent");
            Ok(false)
        }
        Err(error) => Err(error.into()),
    }
}
