//! Tokio driver for [`AutoSaveMachine`].

use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, error, warn};

use super::{AutoSaveMachine, AutoSaveOptions, AutoSaveStatus, SaveHandler};

#[derive(Debug, Clone, Copy)]
enum Command {
    SaveNow,
    Shutdown,
}

/// Handle to a running coordinator.
///
/// Dropping the handle tears the coordinator down like [`AutoSave::shutdown`]
/// without waiting for it.
#[derive(Debug)]
pub struct AutoSave {
    commands: mpsc::UnboundedSender<Command>,
    status: watch::Receiver<AutoSaveStatus>,
    driver: JoinHandle<()>,
}

impl AutoSave {
    /// Start a coordinator; the value currently in `source` counts as saved
    pub fn spawn<T, H>(mut source: watch::Receiver<T>, handler: H, options: AutoSaveOptions) -> Self
    where
        T: Clone + PartialEq + Send + Sync + 'static,
        H: SaveHandler<T> + 'static,
    {
        // Read before the driver first runs so later writes count as changes
        let initial = source.borrow_and_update().clone();
        let machine = AutoSaveMachine::new(initial, &options);

        let (commands, command_rx) = mpsc::unbounded_channel();
        let (status_tx, status) = watch::channel(AutoSaveStatus::default());
        let driver = tokio::spawn(drive(
            source,
            machine,
            Arc::new(handler),
            command_rx,
            status_tx,
        ));

        Self {
            commands,
            status,
            driver,
        }
    }

    /// Cancel the pending timer and save now if there is anything to save
    pub fn save_now(&self) {
        let _ = self.commands.send(Command::SaveNow);
    }

    pub fn status(&self) -> AutoSaveStatus {
        *self.status.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<AutoSaveStatus> {
        self.status.clone()
    }

    /// Tear down and wait until the coordinator has stopped.
    ///
    /// Waits for an in-flight save; the final flush, if any, is issued but
    /// not awaited.
    pub async fn shutdown(self) {
        let _ = self.commands.send(Command::Shutdown);
        if let Err(join_error) = self.driver.await {
            error!(error = %join_error, "Auto-save coordinator terminated abnormally");
        }
    }
}

async fn drive<T, H>(
    mut source: watch::Receiver<T>,
    mut machine: AutoSaveMachine<T>,
    handler: Arc<H>,
    mut commands: mpsc::UnboundedReceiver<Command>,
    status: watch::Sender<AutoSaveStatus>,
) where
    T: Clone + PartialEq + Send + Sync + 'static,
    H: SaveHandler<T> + 'static,
{
    let (done_tx, mut done_rx) = mpsc::unbounded_channel::<bool>();

    loop {
        status.send_replace(machine.status());
        let deadline = machine.deadline();

        let to_save = tokio::select! {
            changed = source.changed() => match changed {
                Ok(()) => {
                    let value = source.borrow_and_update().clone();
                    machine.value_changed(value, Instant::now());
                    None
                }
                Err(_) => break,
            },
            command = commands.recv() => match command {
                Some(Command::SaveNow) => machine.save_now(),
                Some(Command::Shutdown) | None => break,
            },
            _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                machine.timer_fired()
            }
            Some(succeeded) = done_rx.recv() => {
                if succeeded {
                    machine.save_succeeded(Instant::now())
                } else {
                    machine.save_failed(Instant::now());
                    None
                }
            }
        };

        if let Some(value) = to_save {
            debug!("Issuing auto-save");
            let handler = Arc::clone(&handler);
            let done = done_tx.clone();
            tokio::spawn(async move {
                let _ = done.send(run_save(handler, value).await);
            });
        }
    }

    machine.close();
    // A change may still be unobserved if teardown won the select
    let latest = source.borrow().clone();
    machine.value_changed(latest, Instant::now());
    drop(done_tx);
    if machine.is_saving() {
        match done_rx.recv().await {
            Some(true) => {
                machine.save_succeeded(Instant::now());
            }
            Some(false) | None => machine.save_failed(Instant::now()),
        }
    }

    if let Some(value) = machine.teardown_flush() {
        debug!("Flushing unsaved changes on teardown");
        tokio::spawn(run_save(handler, value));
    }
    status.send_replace(machine.status());
}

/// Run one save on its own task so a panicking handler counts as a failure
async fn run_save<T, H>(handler: Arc<H>, value: T) -> bool
where
    T: Send + 'static,
    H: SaveHandler<T> + 'static,
{
    match tokio::spawn(async move { handler.save(value).await }).await {
        Ok(Ok(())) => true,
        Ok(Err(save_error)) => {
            warn!(error = %save_error, "Auto-save failed");
            false
        }
        Err(join_error) => {
            error!(error = %join_error, "Auto-save handler panicked");
            false
        }
    }
}
