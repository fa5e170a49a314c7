//! Fixed-capacity, newest-first event buffer.

use std::collections::VecDeque;

use hookview_core::config::client::DEFAULT_BUFFER_CAPACITY;
use hookview_core::events::CapturedEvent;

/// Newest-first collection of captured events.
///
/// Never holds more than `capacity` events; pushing onto a full buffer
/// evicts the oldest one.
#[derive(Debug, Clone)]
pub struct EventBuffer {
    events: VecDeque<CapturedEvent>,
    capacity: usize,
}

impl Default for EventBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_BUFFER_CAPACITY)
    }
}

impl EventBuffer {
    /// Creates an empty buffer. A zero capacity is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            events: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Inserts an event at the head, returning the evicted tail if any.
    pub fn push(&mut self, event: CapturedEvent) -> Option<CapturedEvent> {
        self.events.push_front(event);
        if self.events.len() > self.capacity {
            self.events.pop_back()
        } else {
            None
        }
    }

    /// Removes every event.
    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Events, newest first.
    pub fn iter(&self) -> impl Iterator<Item = &CapturedEvent> {
        self.events.iter()
    }

    /// Most recent event.
    pub fn latest(&self) -> Option<&CapturedEvent> {
        self.events.front()
    }

    /// Owned copy of the events, newest first.
    pub fn snapshot(&self) -> Vec<CapturedEvent> {
        self.events.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    fn event(n: usize) -> CapturedEvent {
        CapturedEvent::new(format!("e{n}"), Utc::now(), json!({ "n": n }))
    }

    #[test]
    fn test_newest_first() {
        let mut buffer = EventBuffer::default();
        buffer.push(event(1));
        buffer.push(event(2));

        let ids: Vec<_> = buffer.iter().map(|e| e.id().to_string()).collect();
        assert_eq!(ids, vec!["e2", "e1"]);
        assert_eq!(buffer.latest().map(|e| e.id()), Some("e2"));
    }

    #[test]
    fn test_overflow_keeps_last_fifty_in_reverse_order() {
        let mut buffer = EventBuffer::default();
        for n in 0..137 {
            buffer.push(event(n));
        }

        assert_eq!(buffer.len(), 50);
        let expected: Vec<String> = (87..137).rev().map(|n| format!("e{n}")).collect();
        let actual: Vec<String> = buffer.iter().map(|e| e.id().to_string()).collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_push_reports_eviction() {
        let mut buffer = EventBuffer::new(2);
        assert!(buffer.push(event(1)).is_none());
        assert!(buffer.push(event(2)).is_none());
        assert_eq!(buffer.push(event(3)).map(|e| e.id().to_string()), Some("e1".into()));
    }

    #[test]
    fn test_clear() {
        let mut buffer = EventBuffer::default();
        buffer.push(event(1));
        buffer.clear();
        assert!(buffer.is_empty());
        assert_eq!(buffer.capacity(), 50);
    }

    #[test]
    fn test_zero_capacity_is_raised() {
        let mut buffer = EventBuffer::new(0);
        buffer.push(event(1));
        buffer.push(event(2));
        assert_eq!(buffer.len(), 1);
        assert_eq!(buffer.snapshot()[0].id(), "e2");
    }
}
