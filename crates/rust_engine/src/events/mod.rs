//! Deferred task queue driven by the simulation clock
//!
//! Key principles:
//! - Tasks are plain data, interpreted by whoever drains the queue
//! - Delivery happens on the thread that owns the queue, never in parallel
//! - Due tasks are delivered in due-time order, FIFO among equal times
//! - Cancellation is O(1) by handle; stale tasks never fire
//!
//! Owners that want "cancel everything I scheduled" semantics should stamp
//! their tasks with a generation counter and drop mismatches on delivery,
//! or sweep the queue with [`TaskScheduler::retain`].

/// Handle to a scheduled task, used for cancellation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskHandle(u64);

impl TaskHandle {
    /// Raw sequence number of the task
    pub fn id(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone)]
struct ScheduledTask<T> {
    due: f64,
    handle: TaskHandle,
    task: T,
}

/// One-shot deferred task scheduler
#[derive(Debug, Clone)]
pub struct TaskScheduler<T> {
    deferred_queue: Vec<ScheduledTask<T>>,
    next_id: u64,
}

impl<T> TaskScheduler<T> {
    /// Create a new empty scheduler
    pub fn new() -> Self {
        Self {
            deferred_queue: Vec::new(),
            next_id: 0,
        }
    }

    /// Schedule `task` to become due `delay` seconds after `now`
    pub fn schedule_once(&mut self, now: f64, delay: f32, task: T) -> TaskHandle {
        self.schedule_at(now + f64::from(delay.max(0.0)), task)
    }

    /// Schedule `task` to become due at absolute time `due`
    pub fn schedule_at(&mut self, due: f64, task: T) -> TaskHandle {
        let handle = TaskHandle(self.next_id);
        self.next_id += 1;
        self.deferred_queue.push(ScheduledTask { due, handle, task });
        handle
    }

    /// Cancel a pending task; returns false if it already fired or was cancelled
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        let before = self.deferred_queue.len();
        self.deferred_queue.retain(|t| t.handle != handle);
        before != self.deferred_queue.len()
    }

    /// Whether a task is still waiting to fire
    pub fn is_pending(&self, handle: TaskHandle) -> bool {
        self.deferred_queue.iter().any(|t| t.handle == handle)
    }

    /// Remove and return every task due at or before `now`
    ///
    /// Tasks scheduled while the caller processes the returned batch are not
    /// part of it, even if they are already due; they go out on the next drain.
    pub fn drain_due(&mut self, now: f64) -> Vec<(TaskHandle, T)> {
        let (mut due, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut self.deferred_queue)
            .into_iter()
            .partition(|t| t.due <= now);
        self.deferred_queue = pending;

        due.sort_by(|a, b| a.due.total_cmp(&b.due).then(a.handle.cmp(&b.handle)));
        due.into_iter().map(|t| (t.handle, t.task)).collect()
    }

    /// Keep only the tasks for which `keep` returns true
    pub fn retain(&mut self, mut keep: impl FnMut(&T) -> bool) {
        self.deferred_queue.retain(|t| keep(&t.task));
    }

    /// Iterate over pending tasks in no particular order
    pub fn pending(&self) -> impl Iterator<Item = &T> {
        self.deferred_queue.iter().map(|t| &t.task)
    }

    /// Earliest due time among pending tasks
    pub fn next_due(&self) -> Option<f64> {
        self.deferred_queue
            .iter()
            .map(|t| t.due)
            .min_by(f64::total_cmp)
    }

    /// Number of pending tasks
    pub fn len(&self) -> usize {
        self.deferred_queue.len()
    }

    /// Whether nothing is pending
    pub fn is_empty(&self) -> bool {
        self.deferred_queue.is_empty()
    }

    /// Clear all queued tasks (useful for state transitions)
    pub fn clear(&mut self) {
        self.deferred_queue.clear();
    }
}

impl<T> Default for TaskScheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}
