use super::ProgressEvent;
use tokio::sync::broadcast;

/// Fan-out of progress events to all currently connected observers.
///
/// No delivery guarantee: without subscribers an event is dropped, a new
/// subscriber sees only future events, and a lagging one loses the oldest.
#[derive(Debug)]
pub struct ProgressHub {
    sender: broadcast::Sender<ProgressEvent>,
}

impl ProgressHub {
    pub fn new() -> Self {
        // Capacity of 100 events should be sufficient for now
        let (sender, _) = broadcast::channel(100);
        Self { sender }
    }

    /// Publish to whoever is listening right now. Returns the receiver
    /// count; an event with no audience is silently dropped.
    pub fn publish(&self, event: ProgressEvent) -> usize {
        self.sender.send(event).unwrap_or(0)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ProgressEvent> {
        self.sender.subscribe()
    }
}

impl Default for ProgressHub {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(progress: u8) -> ProgressEvent {
        ProgressEvent {
            progress,
            total_completed_files: progress as usize,
            total_files: 100,
        }
    }

    #[tokio::test]
    async fn subscriber_receives_published_events() {
        let hub = ProgressHub::new();
        let mut rx = hub.subscribe();

        assert_eq!(hub.publish(event(50)), 1);
        assert_eq!(rx.recv().await.unwrap(), event(50));
    }

    #[tokio::test]
    async fn late_subscriber_misses_earlier_events() {
        let hub = ProgressHub::new();

        // Nobody listening: dropped, not an error.
        assert_eq!(hub.publish(event(10)), 0);

        let mut rx = hub.subscribe();
        hub.publish(event(20));

        assert_eq!(rx.recv().await.unwrap(), event(20));
        assert!(rx.try_recv().is_err());
    }
}
