/// Single-slot hand-off of matrices from an input surface to the tick
use std::sync::Arc;

use nalgebra::Matrix3;
use parking_lot::Mutex;
use tracing::trace;

/// Holds at most one pending matrix. A publish replaces whatever is waiting.
///
/// The slot is only locked for a swap, so a publish is never observed half
/// written.
#[derive(Debug, Default)]
pub struct MatrixMailbox {
    slot: Mutex<Option<Matrix3<f64>>>,
}

impl MatrixMailbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `matrix`, dropping any value nobody has taken yet
    pub fn publish(&self, matrix: Matrix3<f64>) {
        if self.slot.lock().replace(matrix).is_some() {
            trace!("mailbox value overwritten before it was taken");
        }
    }

    /// Take the pending matrix, if any.
    ///
    /// A publish that completed before this call is always seen. The lock is
    /// only held for a swap, so the wait is bounded by one `replace`.
    pub fn try_take(&self) -> Option<Matrix3<f64>> {
        let taken = self.slot.lock().take();
        if taken.is_some() {
            trace!("mailbox value taken");
        }
        taken
    }

    pub fn is_pending(&self) -> bool {
        self.slot.lock().is_some()
    }
}

/// Write-only handle to a mailbox, given to input surfaces
#[derive(Debug, Clone)]
pub struct MatrixPublisher {
    mailbox: Arc<MatrixMailbox>,
}

impl MatrixPublisher {
    pub fn new(mailbox: Arc<MatrixMailbox>) -> Self {
        Self { mailbox }
    }

    pub fn publish(&self, matrix: Matrix3<f64>) {
        self.mailbox.publish(matrix);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::thread;

    #[test]
    fn test_empty_mailbox() {
        let mailbox = MatrixMailbox::new();
        assert!(mailbox.try_take().is_none());
        assert!(!mailbox.is_pending());
    }

    #[test]
    fn test_last_write_wins() {
        let mailbox = MatrixMailbox::new();
        let m1 = Matrix3::from_diagonal_element(2.0);
        let m2 = Matrix3::from_diagonal_element(3.0);

        mailbox.publish(m1);
        mailbox.publish(m2);

        assert_eq!(mailbox.try_take(), Some(m2));
        assert_eq!(mailbox.try_take(), None);
    }

    #[test]
    fn test_publisher_handle() {
        let mailbox = Arc::new(MatrixMailbox::new());
        let publisher = MatrixPublisher::new(Arc::clone(&mailbox));

        let m = Matrix3::new(1.0, 0.5, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0);
        publisher.clone().publish(m);
        assert!(mailbox.is_pending());
        assert_eq!(mailbox.try_take(), Some(m));
    }

    #[test]
    fn test_take_sees_completed_publish_under_contention() {
        let mailbox = Arc::new(MatrixMailbox::new());
        let stop = Arc::new(AtomicBool::new(false));

        let poller = {
            let mailbox = Arc::clone(&mailbox);
            let stop = Arc::clone(&stop);
            thread::spawn(move || {
                while !stop.load(Ordering::Relaxed) {
                    mailbox.is_pending();
                }
            })
        };

        for i in 1..=2000 {
            let m = Matrix3::from_element(i as f64);
            mailbox.publish(m);
            assert_eq!(mailbox.try_take(), Some(m), "publish {i}");
        }

        stop.store(true, Ordering::Relaxed);
        poller.join().unwrap();
    }

    #[test]
    fn test_no_torn_values_across_threads() {
        let mailbox = Arc::new(MatrixMailbox::new());
        let publisher = MatrixPublisher::new(Arc::clone(&mailbox));

        let writer = thread::spawn(move || {
            for i in 1..=2000 {
                publisher.publish(Matrix3::from_element(i as f64));
            }
        });

        let mut last_seen = 0.0;
        let mut reader_done = false;
        while !reader_done {
            reader_done = writer.is_finished();
            if let Some(m) = mailbox.try_take() {
                let first = m[(0, 0)];
                // all nine entries come from the same publish
                assert!(m.iter().all(|v| *v == first));
                assert!(first > last_seen);
                last_seen = first;
            }
        }
        writer.join().unwrap();

        if let Some(m) = mailbox.try_take() {
            last_seen = m[(0, 0)];
        }
        assert_eq!(last_seen, 2000.0);
    }
}
