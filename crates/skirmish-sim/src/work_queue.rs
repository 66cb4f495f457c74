//! Main-thread work queue.
//!
//! Worker threads never touch the world directly. They submit closures
//! through a [`WorkSender`]; the engine drains them once per tick on the
//! simulation thread. A job that panics is logged and dropped.

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::mpsc::{self, Receiver, Sender};

use hecs::World;

pub type WorldJob = Box<dyn FnOnce(&mut World) + Send + 'static>;

/// Cloneable submission handle.
#[derive(Clone)]
pub struct WorkSender {
    tx: Sender<WorldJob>,
}

impl WorkSender {
    /// Queue a job. Returns false when the engine is gone.
    pub fn submit(&self, job: impl FnOnce(&mut World) + Send + 'static) -> bool {
        self.tx.send(Box::new(job)).is_ok()
    }
}

pub struct WorkQueue {
    tx: Sender<WorldJob>,
    rx: Receiver<WorldJob>,
}

impl Default for WorkQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkQueue {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self { tx, rx }
    }

    pub fn sender(&self) -> WorkSender {
        WorkSender {
            tx: self.tx.clone(),
        }
    }

    /// Run every queued job. Returns how many completed.
    pub fn drain(&self, world: &mut World) -> usize {
        let mut completed = 0;
        while let Ok(job) = self.rx.try_recv() {
            match catch_unwind(AssertUnwindSafe(|| job(world))) {
                Ok(()) => completed += 1,
                Err(payload) => {
                    tracing::error!(reason = panic_message(payload.as_ref()), "world job panicked");
                }
            }
        }
        completed
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "unknown"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Marker(u32);

    #[test]
    fn test_jobs_from_other_threads_run_on_drain() {
        let queue = WorkQueue::new();
        let sender = queue.sender();
        let handle = std::thread::spawn(move || {
            for i in 0..3 {
                assert!(sender.submit(move |world| {
                    world.spawn((Marker(i),));
                }));
            }
        });
        handle.join().unwrap();

        let mut world = World::new();
        assert_eq!(world.len(), 0);
        assert_eq!(queue.drain(&mut world), 3);
        assert_eq!(world.len(), 3);
        assert_eq!(queue.drain(&mut world), 0);
    }

    #[test]
    fn test_panicking_job_is_contained() {
        let queue = WorkQueue::new();
        let sender = queue.sender();
        sender.submit(|_| panic!("boom"));
        sender.submit(|world| {
            world.spawn((Marker(7),));
        });

        let mut world = World::new();
        assert_eq!(queue.drain(&mut world), 1);
        assert_eq!(world.len(), 1);
    }
}
