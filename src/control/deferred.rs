use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crossbeam_channel::{RecvTimeoutError, Sender};

enum Request {
    Schedule(Instant),
    Cancel,
}

/// Cancellable, reschedulable delayed task
///
/// Runs `action` on a worker thread once the most recent deadline passes.
/// Scheduling again before it fires replaces the pending deadline, so a
/// burst of `schedule` calls runs the action once, `delay` after the last
/// call. Dropping the handle cancels anything pending and joins the worker.
pub struct DeferredAction {
    tx: Option<Sender<Request>>,
    worker: Option<JoinHandle<()>>,
}

impl DeferredAction {
    pub fn new<F>(name: &str, mut action: F) -> std::io::Result<Self>
    where
        F: FnMut() + Send + 'static,
    {
        let (tx, rx) = crossbeam_channel::unbounded::<Request>();

        let worker = std::thread::Builder::new()
            .name(name.to_string())
            .spawn(move || {
                let mut deadline: Option<Instant> = None;
                loop {
                    let request = match deadline {
                        Some(at) => rx.recv_deadline(at),
                        None => rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
                    };
                    match request {
                        Ok(Request::Schedule(at)) => deadline = Some(at),
                        Ok(Request::Cancel) => deadline = None,
                        Err(RecvTimeoutError::Timeout) => {
                            deadline = None;
                            action();
                        }
                        Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
            })?;

        Ok(Self {
            tx: Some(tx),
            worker: Some(worker),
        })
    }

    /// Run the action `delay` from now, replacing any pending run
    pub fn schedule(&self, delay: Duration) {
        self.send(Request::Schedule(Instant::now() + delay));
    }

    /// Drop the pending run, if any
    pub fn cancel(&self) {
        self.send(Request::Cancel);
    }

    fn send(&self, request: Request) {
        if let Some(tx) = &self.tx
            && tx.send(request).is_err()
        {
            log::warn!("Deferred action worker has exited");
        }
    }
}

impl Drop for DeferredAction {
    fn drop(&mut self) {
        // Disconnecting the channel stops the worker
        self.tx.take();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread::sleep;

    fn counting_action() -> (DeferredAction, Arc<AtomicUsize>) {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = count.clone();
        let action = DeferredAction::new("test-deferred", move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();
        (action, count)
    }

    #[test]
    fn test_fires_once_after_delay() {
        let (action, count) = counting_action();
        action.schedule(Duration::from_millis(20));

        assert_eq!(count.load(Ordering::SeqCst), 0);
        sleep(Duration::from_millis(200));
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_reschedule_coalesces() {
        let (action, count) = counting_action();
        for _ in 0..5 {
            action.schedule(Duration::from_millis(100));
            sleep(Duration::from_millis(10));
        }
        sleep(Duration::from_millis(400));
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_cancel_prevents_run() {
        let (action, count) = counting_action();
        action.schedule(Duration::from_millis(100));
        action.cancel();

        sleep(Duration::from_millis(300));
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_drop_joins_worker() {
        let (action, count) = counting_action();
        action.schedule(Duration::from_secs(60));
        drop(action);
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }
}
