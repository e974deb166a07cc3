//! Burnout Actor: dedicated thread that expires timed marks.
//!
//! The actor wakes on a fixed tick, collects expired objects from the
//! [`BurnoutQueue`] (touching only the queue's own lock), and hands each
//! non-empty batch to a reversion callback. The callback is where the
//! shared surface lock is taken.

use super::queue::{BurnoutObject, BurnoutQueue};
use crate::error::{CanvasError, Result};
use crossbeam_channel::{bounded, select, tick, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Background scheduler for burnout reversion.
pub struct BurnoutActor {
    /// Handle to the scheduler thread.
    handle: Option<JoinHandle<()>>,
    /// Stop signal; also disconnects when the actor is dropped.
    stop_tx: Sender<()>,
}

impl BurnoutActor {
    /// Spawn the scheduler thread.
    ///
    /// # Arguments
    ///
    /// * `queue` - Pending burnouts shared with the foreground.
    /// * `interval` - Time between expiry scans.
    /// * `on_expired` - Reverts one batch of expired objects. Errors are
    ///   logged and the loop keeps running.
    pub fn spawn<F>(queue: Arc<BurnoutQueue>, interval: Duration, on_expired: F) -> Result<Self>
    where
        F: FnMut(Vec<BurnoutObject>) -> Result<()> + Send + 'static,
    {
        let (stop_tx, stop_rx) = bounded(1);

        let handle = thread::Builder::new()
            .name("burnout-scheduler".to_string())
            .spawn(move || {
                Self::run_loop(&queue, interval, &stop_rx, on_expired);
            })
            .map_err(CanvasError::SchedulerSpawn)?;

        log::debug!("burnout scheduler started ({interval:?} interval)");
        Ok(Self {
            handle: Some(handle),
            stop_tx,
        })
    }

    /// Signal the scheduler to stop after its current cycle.
    pub fn shutdown(&self) {
        let _ = self.stop_tx.try_send(());
    }

    /// Stop the scheduler and wait for the thread to finish.
    ///
    /// Once this returns no reversion is in flight.
    pub fn join(mut self) {
        self.stop_and_wait();
    }

    fn stop_and_wait(&mut self) {
        self.shutdown();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("burnout scheduler thread panicked");
            } else {
                log::debug!("burnout scheduler stopped");
            }
        }
    }

    /// Main scheduler loop.
    fn run_loop<F>(queue: &BurnoutQueue, interval: Duration, stop_rx: &Receiver<()>, mut on_expired: F)
    where
        F: FnMut(Vec<BurnoutObject>) -> Result<()>,
    {
        let ticker = tick(interval);
        loop {
            select! {
                recv(stop_rx) -> _ => break,
                recv(ticker) -> _ => {
                    let expired = queue.process_burnouts();
                    if expired.is_empty() {
                        continue;
                    }
                    let count = expired.len();
                    match on_expired(expired) {
                        Ok(()) => log::trace!("reverted {count} burnout(s)"),
                        Err(e) => log::error!("burnout reversion failed for {count} object(s): {e}"),
                    }
                }
            }
        }
    }
}

impl Drop for BurnoutActor {
    fn drop(&mut self) {
        self.stop_and_wait();
    }
}

impl std::fmt::Debug for BurnoutActor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BurnoutActor")
            .field("running", &self.handle.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Shape;
    use crate::layout::Point;
    use std::sync::Mutex;

    #[test]
    fn test_actor_delivers_expired_batches() {
        let queue = Arc::new(BurnoutQueue::new());
        let (tx, rx) = crossbeam_channel::unbounded();
        let actor = BurnoutActor::spawn(queue.clone(), Duration::from_millis(5), move |batch| {
            let _ = tx.send(batch.len());
            Ok(())
        })
        .unwrap();

        queue.add_object(Shape::Point(Point::new(1, 1)), vec![Point::new(1, 1)], Some(Duration::from_millis(20)));
        let delivered = rx.recv_timeout(Duration::from_secs(2));
        assert_eq!(delivered.ok(), Some(1));
        assert!(queue.is_empty());

        actor.join();
    }

    #[test]
    fn test_actor_survives_callback_errors() {
        let queue = Arc::new(BurnoutQueue::new());
        let calls = Arc::new(Mutex::new(0));
        let seen = calls.clone();
        let actor = BurnoutActor::spawn(queue.clone(), Duration::from_millis(5), move |_| {
            *seen.lock().unwrap() += 1;
            Err(CanvasError::LockPoisoned)
        })
        .unwrap();

        for _ in 0..2 {
            queue.add_object(Shape::Point(Point::ORIGIN), vec![Point::ORIGIN], Some(Duration::ZERO));
            thread::sleep(Duration::from_millis(60));
        }
        actor.join();
        assert_eq!(*calls.lock().unwrap(), 2);
    }

    #[test]
    fn test_actor_join_stops_promptly() {
        let queue = Arc::new(BurnoutQueue::new());
        let actor = BurnoutActor::spawn(queue.clone(), Duration::from_secs(3600), |_| Ok(())).unwrap();
        let start = std::time::Instant::now();
        actor.join();
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_actor_no_callback_after_join() {
        let queue = Arc::new(BurnoutQueue::new());
        let calls = Arc::new(Mutex::new(0));
        let seen = calls.clone();
        let actor = BurnoutActor::spawn(queue.clone(), Duration::from_millis(1), move |_| {
            *seen.lock().unwrap() += 1;
            Ok(())
        })
        .unwrap();
        actor.join();

        queue.add_object(Shape::Point(Point::ORIGIN), vec![Point::ORIGIN], Some(Duration::ZERO));
        thread::sleep(Duration::from_millis(30));
        assert_eq!(*calls.lock().unwrap(), 0);
        assert_eq!(queue.len(), 1);
    }
}
