//! Cancellable deferred clears
//!
//! A message shown with an auto-clear schedules one pending clear. Showing
//! a newer message replaces that pending clear, so a stale timer can never
//! erase newer feedback. Time only moves through [`DeferredClear::poll`].

/// Handle of one scheduled clear
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Debug, Clone, Copy)]
struct Pending {
    ticket: Ticket,
    due: f32,
}

/// Single-slot scheduler: at most one clear pending, last one wins
#[derive(Debug, Clone)]
pub struct DeferredClear {
    hold: f32,
    next: u64,
    pending: Option<Pending>,
}

impl DeferredClear {
    /// `hold` is how long a message stays up, in seconds
    pub fn new(hold: f32) -> Self {
        DeferredClear {
            hold: hold.max(0.0),
            next: 0,
            pending: None,
        }
    }

    /// Schedule a clear at `now + hold`, superseding any pending one
    pub fn schedule(&mut self, now: f32) -> Ticket {
        let ticket = Ticket(self.next);
        self.next += 1;
        self.pending = Some(Pending {
            ticket,
            due: now + self.hold,
        });
        ticket
    }

    /// Drop the pending clear, if any
    pub fn cancel(&mut self) -> Option<Ticket> {
        self.pending.take().map(|p| p.ticket)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Fire the pending clear once it is due
    pub fn poll(&mut self, now: f32) -> Option<Ticket> {
        match self.pending {
            Some(p) if now >= p.due => {
                self.pending = None;
                Some(p.ticket)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_after_hold() {
        let mut clear = DeferredClear::new(2.0);
        let ticket = clear.schedule(0.0);

        assert_eq!(clear.poll(1.99), None);
        assert_eq!(clear.poll(2.0), Some(ticket));
        assert_eq!(clear.poll(5.0), None);
    }

    #[test]
    fn test_newer_message_supersedes_pending_clear() {
        let mut clear = DeferredClear::new(2.0);
        clear.schedule(0.0);
        let newer = clear.schedule(1.5);

        // The first clear would have been due at 2.0
        assert_eq!(clear.poll(2.0), None);
        assert!(clear.is_pending());
        assert_eq!(clear.poll(3.5), Some(newer));
    }

    #[test]
    fn test_cancel() {
        let mut clear = DeferredClear::new(2.0);
        let ticket = clear.schedule(0.0);
        assert_eq!(clear.cancel(), Some(ticket));
        assert_eq!(clear.poll(10.0), None);
    }
}
