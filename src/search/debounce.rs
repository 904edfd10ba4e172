use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Turns a stream of rapidly replaced values into one committed value per
/// quiet period. Every pushed value restarts the timer; only the value present
/// when the timer fires is emitted.
pub struct Debouncer<T> {
    input: mpsc::UnboundedSender<T>,
    cancel: CancellationToken,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Starts the timer task and returns the handle together with the
    /// receiver of committed values.
    pub fn spawn(quiet: Duration) -> (Self, mpsc::UnboundedReceiver<T>) {
        let (input, input_rx) = mpsc::unbounded_channel();
        let (output, output_rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();

        tokio::spawn(debounce_loop(quiet, input_rx, output, cancel.clone()));

        (Self { input, cancel }, output_rx)
    }

    pub fn push(&self, value: T) {
        if self.input.send(value).is_err() {
            debug!("Debouncer already stopped, dropping input");
        }
    }

    /// Stops the timer. A pending value is discarded, not emitted.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn debounce_loop<T>(
    quiet: Duration,
    mut input: mpsc::UnboundedReceiver<T>,
    output: mpsc::UnboundedSender<T>,
    cancel: CancellationToken,
) {
    loop {
        let mut value = tokio::select! {
            biased;
            _ = cancel.cancelled() => return,
            next = input.recv() => match next {
                Some(v) => v,
                None => return,
            },
        };

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return,
                next = input.recv() => match next {
                    Some(v) => value = v,
                    None => return,
                },
                _ = tokio::time::sleep(quiet) => {
                    if output.send(value).is_err() {
                        return;
                    }
                    break;
                }
            }
        }
    }
}
