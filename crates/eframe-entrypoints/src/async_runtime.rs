//! Background work for the UI thread
//!
//! The UI thread must never block, so expensive work (parsing data files,
//! for instance) runs on the tokio blocking pool. The UI keeps a
//! [`Background`] handle and polls it once per frame.

use tokio::sync::oneshot;

/// State of a background job seen from the UI thread
#[derive(Debug, PartialEq)]
pub enum Progress<T> {
    /// Still running
    Pending,
    /// Finished with this result
    Ready(T),
    /// The job panicked or its result was already taken
    Lost,
}

/// Handle to one background job
#[derive(Debug)]
pub struct Background<T> {
    receiver: Option<oneshot::Receiver<T>>,
}

impl<T> Background<T> {
    /// Check for the result without blocking
    pub fn poll(&mut self) -> Progress<T> {
        let Some(receiver) = self.receiver.as_mut() else {
            return Progress::Lost;
        };
        match receiver.try_recv() {
            Ok(value) => {
                self.receiver = None;
                Progress::Ready(value)
            }
            Err(oneshot::error::TryRecvError::Empty) => Progress::Pending,
            Err(oneshot::error::TryRecvError::Closed) => {
                self.receiver = None;
                Progress::Lost
            }
        }
    }
}

/// Run `work` on the blocking thread pool.
///
/// Must be called from within the tokio runtime (the UI thread is, when the
/// app was started through `eframe_app!`).
pub fn spawn_blocking<F, T>(name: &'static str, work: F) -> Background<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    let (sender, receiver) = oneshot::channel();
    tokio::task::spawn_blocking(move || {
        profiling::scope!("async_runtime::spawn_blocking", name);
        let started = std::time::Instant::now();
        let result = work();
        tracing::debug!("Background job '{}' finished in {:?}", name, started.elapsed());
        // The UI may have dropped the handle in the meantime
        let _ = sender.send(result);
    });
    Background {
        receiver: Some(receiver),
    }
}

/// Check if we're running inside a tokio runtime context
pub fn in_runtime_context() -> bool {
    tokio::runtime::Handle::try_current().is_ok()
}
