//! Running an operation on a worker thread
//!
//! The worker never touches UI state: progress and the final result are
//! sent through a channel that the UI drains on its own loop, and the UI
//! asks for cancellation through a shared flag polled once per output line.

use super::operations::{Catalog, Operation};
use super::runner::CommandExecutor;
use super::types::CommandResult;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

/// What a running task reports back to its owner.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskEvent {
    Progress { fraction: f64, message: String },
    Finished(CommandResult),
}

/// Owner's side of a running operation.
#[derive(Debug, Clone)]
pub struct TaskHandle {
    operation: Operation,
    cancel: Arc<AtomicBool>,
}

impl TaskHandle {
    fn new(operation: Operation) -> Self {
        Self {
            operation,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    /// Request cancellation; takes effect at the next output line.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::SeqCst);
    }

    pub fn is_cancel_requested(&self) -> bool {
        self.cancel.load(Ordering::SeqCst)
    }
}

/// Start `operation` on a dedicated thread.
///
/// Events arrive on `tx` in the order the child produced its lines, and
/// exactly one [`TaskEvent::Finished`] closes the stream.
pub fn spawn_operation<E, T>(
    catalog: Arc<Catalog<E>>,
    operation: Operation,
    tx: mpsc::Sender<T>,
) -> TaskHandle
where
    E: CommandExecutor + Send + Sync + 'static,
    T: From<TaskEvent> + Send + 'static,
{
    let handle = TaskHandle::new(operation);
    let worker_handle = handle.clone();
    std::thread::spawn(move || run_task(&catalog, &worker_handle, &tx));
    handle
}

fn run_task<E, T>(catalog: &Catalog<E>, handle: &TaskHandle, tx: &mpsc::Sender<T>)
where
    E: CommandExecutor,
    T: From<TaskEvent>,
{
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        catalog.execute(handle.operation, &mut |fraction, message| {
            let delivered = tx
                .blocking_send(
                    TaskEvent::Progress {
                        fraction,
                        message: message.to_string(),
                    }
                    .into(),
                )
                .is_ok();
            // a dropped receiver means nobody is left to watch: stop as well
            delivered && !handle.is_cancel_requested()
        })
    }));

    let result = outcome.unwrap_or_else(|payload| {
        let reason = panic_message(payload.as_ref());
        log::error!("{} worker panicked: {}", handle.operation.id(), reason);
        CommandResult::failure(format!("Error: {}", reason))
    });

    if tx.blocking_send(TaskEvent::Finished(result).into()).is_err() {
        log::debug!("{} finished after its receiver was dropped", handle.operation.id());
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "worker thread panicked".to_string()
    }
}
