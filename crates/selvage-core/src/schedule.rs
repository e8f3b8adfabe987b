//! Deferred work: the seam between the reconciler and the host event loop.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// A deferred task callback.
pub type Task = Box<dyn FnOnce()>;

/// A handle to a scheduled task.
pub trait TaskHandle {
    /// Prevent the task from running.
    fn cancel(self);

    /// Let the task run without keeping the handle around.
    fn detach(self);
}

/// Host task scheduling.
pub trait Scheduler {
    type Handle: TaskHandle;

    /// Run `task` on a later turn of the task queue.
    fn defer(&self, task: Task) -> Self::Handle;

    /// Run `task` before the next frame is painted. Defaults to
    /// [`defer`](Self::defer).
    fn next_frame(&self, task: Task) -> Self::Handle {
        self.defer(task)
    }
}

type Queue = Rc<RefCell<VecDeque<(u64, Task)>>>;

/// Scheduler whose tasks run only when [`run_pending`](Self::run_pending) is
/// called. Used to step the sync loop deterministically.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    queue: Queue,
    next_id: Rc<RefCell<u64>>,
}

/// Handle into a [`ManualScheduler`] queue.
pub struct ManualHandle {
    id: u64,
    queue: Queue,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending_count(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Run every queued task, including tasks queued while running. Returns
    /// how many ran.
    pub fn run_pending(&self) -> usize {
        let mut ran = 0;
        loop {
            // the borrow must end before the task runs: tasks may schedule
            let next = self.queue.borrow_mut().pop_front();
            let Some((_, task)) = next else {
                return ran;
            };
            task();
            ran += 1;
        }
    }
}

impl Scheduler for ManualScheduler {
    type Handle = ManualHandle;

    fn defer(&self, task: Task) -> ManualHandle {
        let id = {
            let mut next_id = self.next_id.borrow_mut();
            *next_id += 1;
            *next_id
        };
        self.queue.borrow_mut().push_back((id, task));
        ManualHandle {
            id,
            queue: self.queue.clone(),
        }
    }
}

impl TaskHandle for ManualHandle {
    fn cancel(self) {
        self.queue.borrow_mut().retain(|(id, _)| *id != self.id);
    }

    fn detach(self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_cancel_removes_task() {
        let scheduler = ManualScheduler::new();
        let hits = Rc::new(Cell::new(0));

        let h = hits.clone();
        let first = scheduler.defer(Box::new(move || h.set(h.get() + 1)));
        let h = hits.clone();
        scheduler.defer(Box::new(move || h.set(h.get() + 10))).detach();

        first.cancel();
        assert_eq!(scheduler.pending_count(), 1);
        assert_eq!(scheduler.run_pending(), 1);
        assert_eq!(hits.get(), 10);
    }

    #[test]
    fn test_tasks_scheduled_while_running_also_run() {
        let scheduler = ManualScheduler::new();
        let hits = Rc::new(Cell::new(0));

        let inner = scheduler.clone();
        let h = hits.clone();
        scheduler
            .defer(Box::new(move || {
                let h2 = h.clone();
                inner.defer(Box::new(move || h2.set(h2.get() + 1))).detach();
                h.set(h.get() + 1);
            }))
            .detach();

        assert_eq!(scheduler.run_pending(), 2);
        assert_eq!(hits.get(), 2);
    }
}
