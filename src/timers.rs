use crate::dom::{NodeId, ScrollBlock};
use std::collections::BTreeMap;
use std::time::Duration;

/// Deferred work. Tasks are data so the queue can be inspected and driven
/// without a real clock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Task {
    RemoveNotification(NodeId),
    ScrollIntoView { target: NodeId, block: ScrollBlock },
    AnimationFrame,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TimerId {
    due: Duration,
    seq: u64,
}

/// Virtual-time timer queue. Due tasks fire in time order, FIFO among equal
/// deadlines.
#[derive(Debug, Default)]
pub struct Timers {
    now: Duration,
    next_seq: u64,
    queue: BTreeMap<TimerId, Task>,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn schedule(&mut self, delay: Duration, task: Task) -> TimerId {
        let id = TimerId {
            due: self.now + delay,
            seq: self.next_seq,
        };
        self.next_seq += 1;
        self.queue.insert(id, task);
        id
    }

    pub fn cancel(&mut self, id: TimerId) -> bool {
        self.queue.remove(&id).is_some()
    }

    pub fn is_scheduled(&self, task: &Task) -> bool {
        self.queue.values().any(|queued| queued == task)
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn pop_due(&mut self, until: Duration) -> Option<Task> {
        let (&id, _) = self.queue.first_key_value()?;
        if id.due > until {
            return None;
        }
        self.now = self.now.max(id.due);
        self.queue.remove(&id)
    }

    pub fn settle(&mut self, until: Duration) {
        self.now = self.now.max(until);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn due_tasks_fire_in_deadline_order() {
        let mut timers = Timers::new();
        timers.schedule(Duration::from_millis(300), Task::AnimationFrame);
        timers.schedule(Duration::from_millis(50), Task::AnimationFrame);
        let late = timers.schedule(Duration::from_secs(5), Task::AnimationFrame);

        let until = Duration::from_millis(400);
        assert_eq!(timers.pop_due(until), Some(Task::AnimationFrame));
        assert_eq!(timers.now(), Duration::from_millis(50));
        assert_eq!(timers.pop_due(until), Some(Task::AnimationFrame));
        assert_eq!(timers.now(), Duration::from_millis(300));
        assert_eq!(timers.pop_due(until), None);
        timers.settle(until);
        assert_eq!(timers.now(), until);
        assert!(timers.cancel(late));
        assert_eq!(timers.pending(), 0);
    }

    #[test]
    fn equal_deadlines_keep_insertion_order() {
        let mut timers = Timers::new();
        let delay = Duration::from_millis(10);
        let first = Task::ScrollIntoView {
            target: crate::dom::Document::new().body(),
            block: ScrollBlock::Start,
        };
        timers.schedule(delay, first.clone());
        timers.schedule(delay, Task::AnimationFrame);
        assert_eq!(timers.pop_due(delay), Some(first));
        assert_eq!(timers.pop_due(delay), Some(Task::AnimationFrame));
    }
}
