//! Request sequencing for remote calls
//!
//! Each remote call takes a ticket before it is issued. When the response
//! arrives it is applied only if no newer ticket was issued on the same
//! channel in the meantime.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Ticket(u64);

impl Ticket {
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Monotonic ticket issuer for one request channel
#[derive(Debug, Default)]
pub struct RequestSequencer {
    latest: AtomicU64,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next ticket; it supersedes every earlier one
    pub fn begin(&self) -> Ticket {
        Ticket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether `ticket` is still the newest issued
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }

    /// Keep `value` only if `ticket` is current
    pub fn accept<T>(&self, ticket: Ticket, value: T) -> Option<T> {
        self.is_current(ticket).then_some(value)
    }

    pub fn latest(&self) -> u64 {
        self.latest.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_tickets_increase() {
        let seq = RequestSequencer::new();
        let a = seq.begin();
        let b = seq.begin();
        assert!(b > a);
        assert_eq!(seq.latest(), b.value());
    }

    #[test]
    fn test_stale_ticket_rejected() {
        let seq = RequestSequencer::new();
        let first = seq.begin();
        assert!(seq.is_current(first));

        let second = seq.begin();
        assert!(!seq.is_current(first));
        assert_eq!(seq.accept(first, "old"), None);
        assert_eq!(seq.accept(second, "new"), Some("new"));
    }

    #[tokio::test]
    async fn test_out_of_order_responses() {
        let seq = Arc::new(RequestSequencer::new());

        let slow_ticket = seq.begin();
        let fast_ticket = seq.begin();

        // newer request finishes first, older one lands afterwards
        let fast = {
            let seq = seq.clone();
            tokio::spawn(async move { seq.accept(fast_ticket, 2) })
        };
        let slow = {
            let seq = seq.clone();
            tokio::spawn(async move {
                tokio::time::sleep(std::time::Duration::from_millis(10)).await;
                seq.accept(slow_ticket, 1)
            })
        };

        assert_eq!(fast.await.unwrap(), Some(2));
        assert_eq!(slow.await.unwrap(), None);
    }
}
