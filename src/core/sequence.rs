//! Sequence numbers for discarding superseded query results
//!
//! Resolutions run independently and may finish out of order. A caller that
//! re-queries while an earlier query is in flight issues a ticket per query and
//! only renders a result whose ticket is still the current one.

use std::sync::atomic::{AtomicU64, Ordering};

/// Identifies one issued query
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QueryTicket(u64);

impl QueryTicket {
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Monotonic ticket issuer shared by the callers of one result view
#[derive(Debug, Default)]
pub struct QuerySequence {
    latest: AtomicU64,
}

impl QuerySequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a ticket that supersedes every earlier one
    pub fn issue(&self) -> QueryTicket {
        QueryTicket(self.latest.fetch_add(1, Ordering::AcqRel) + 1)
    }

    /// Whether no newer ticket has been issued since `ticket`
    pub fn is_current(&self, ticket: QueryTicket) -> bool {
        self.latest.load(Ordering::Acquire) == ticket.0
    }

    /// Hand back `value` only if `ticket` is still current
    pub fn accept<T>(&self, ticket: QueryTicket, value: T) -> Option<T> {
        if self.is_current(ticket) {
            Some(value)
        } else {
            tracing::debug!(ticket = ticket.0, "discarding superseded query result");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_newer_ticket_supersedes_older() {
        let sequence = QuerySequence::new();
        let first = sequence.issue();
        assert!(sequence.is_current(first));

        let second = sequence.issue();
        assert!(second > first);
        assert!(!sequence.is_current(first));
        assert!(sequence.is_current(second));

        assert_eq!(sequence.accept(first, "stale"), None);
        assert_eq!(sequence.accept(second, "fresh"), Some("fresh"));
    }

    #[tokio::test]
    async fn test_out_of_order_completion_keeps_latest() {
        let sequence = Arc::new(QuerySequence::new());
        let slow = sequence.issue();
        let fast = sequence.issue();

        let slow_task = {
            let sequence = Arc::clone(&sequence);
            tokio::spawn(async move {
                tokio::time::sleep(std::time::Duration::from_millis(20)).await;
                sequence.accept(slow, 1)
            })
        };
        let fast_task = {
            let sequence = Arc::clone(&sequence);
            tokio::spawn(async move { sequence.accept(fast, 2) })
        };

        assert_eq!(fast_task.await.unwrap(), Some(2));
        assert_eq!(slow_task.await.unwrap(), None);
    }
}
