use std::sync::Arc;

use fieldgw_frame::{decode, map_to_feeds, DecodeError, DecodedMessage, FeedEntry};
use fieldgw_link::LinkEvent;
use fieldgw_telemetry::{PublishError, PublishTarget, TelemetryClient};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::diagnostics;

/// What happened to one received frame.
#[derive(Debug)]
pub enum FrameOutcome {
    /// Logged as an echo; nothing published.
    Echoed,
    /// Decoded and handed to a background publish task.
    Publishing(JoinHandle<Result<(), PublishError>>),
    /// Dropped because it could not be decoded.
    Rejected(DecodeError),
}

/// Counters reported when the dispatch loop ends.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DispatchStats {
    pub frames: u64,
    pub echoed: u64,
    pub rejected: u64,
    /// Publish tasks started; their results are not tracked.
    pub publishes: u64,
    pub transmit_succeeded: u64,
    pub transmit_failed: u64,
}

impl DispatchStats {
    fn record_outcome(&mut self, outcome: &FrameOutcome) {
        self.frames += 1;
        match outcome {
            FrameOutcome::Echoed => self.echoed += 1,
            FrameOutcome::Publishing(_) => self.publishes += 1,
            FrameOutcome::Rejected(_) => self.rejected += 1,
        }
    }
}

/// Routes frames from the radio link to the telemetry client.
///
/// Decoding runs inline on the caller; publishing runs on a spawned task
/// that is never awaited by the dispatcher, so a slow or failing publish
/// cannot hold up the next frame. Must be used inside a tokio runtime.
pub struct Dispatcher {
    client: Arc<dyn TelemetryClient>,
    target: PublishTarget,
}

impl Dispatcher {
    pub fn new(client: Arc<dyn TelemetryClient>, target: PublishTarget) -> Self {
        Self { client, target }
    }

    pub fn target(&self) -> &PublishTarget {
        &self.target
    }

    /// Decode one frame and route it by kind.
    pub fn handle_frame(&self, raw: &[u8]) -> FrameOutcome {
        match decode(raw) {
            Ok(DecodedMessage::Echo(frame)) => {
                diagnostics::log_echo(&frame);
                FrameOutcome::Echoed
            }
            Ok(DecodedMessage::DeviceReadings(readings)) => {
                let entries = map_to_feeds(&readings.device_id, &readings.readings);
                diagnostics::log_readings(&readings, &entries);
                FrameOutcome::Publishing(self.spawn_publish(readings.device_id, entries))
            }
            Err(err) => {
                warn!(
                    error_kind = err.kind(),
                    error = %err,
                    size = raw.len(),
                    "dropping undecodable frame"
                );
                FrameOutcome::Rejected(err)
            }
        }
    }

    /// Handle one link event. Transmit notifications are only logged.
    pub fn handle_event(&self, event: LinkEvent) -> Option<FrameOutcome> {
        match event {
            LinkEvent::FrameReceived(frame) => Some(self.handle_frame(&frame)),
            LinkEvent::TransmitSucceeded => {
                debug!("transmit succeeded");
                None
            }
            LinkEvent::TransmitFailed => {
                warn!("transmit failed");
                None
            }
        }
    }

    /// Consume link events until cancelled or every sender is gone.
    pub async fn run(
        &self,
        mut events: mpsc::Receiver<LinkEvent>,
        cancel: CancellationToken,
    ) -> DispatchStats {
        let mut stats = DispatchStats::default();

        loop {
            let event = tokio::select! {
                _ = cancel.cancelled() => break,
                event = events.recv() => match event {
                    Some(event) => event,
                    None => break,
                },
            };

            match &event {
                LinkEvent::TransmitSucceeded => stats.transmit_succeeded += 1,
                LinkEvent::TransmitFailed => stats.transmit_failed += 1,
                LinkEvent::FrameReceived(_) => {}
            }

            // Publish handles are dropped here, detaching the tasks.
            if let Some(outcome) = self.handle_event(event) {
                stats.record_outcome(&outcome);
            }
        }

        info!(
            frames = stats.frames,
            echoed = stats.echoed,
            rejected = stats.rejected,
            publishes = stats.publishes,
            "dispatcher stopped"
        );
        stats
    }

    fn spawn_publish(
        &self,
        device_id: String,
        entries: Vec<FeedEntry>,
    ) -> JoinHandle<Result<(), PublishError>> {
        let client = Arc::clone(&self.client);
        let target = self.target.clone();

        tokio::spawn(async move {
            let result = client.publish_group(&target, &entries).await;
            match &result {
                Ok(()) => debug!(
                    client = client.name(),
                    device_id = %device_id,
                    entries = entries.len(),
                    "group publish succeeded"
                ),
                Err(err) => error!(
                    client = client.name(),
                    device_id = %device_id,
                    error = %err,
                    "group publish failed"
                ),
            }
            result
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use bytes::Bytes;
    use fieldgw_link::event_channel;

    use super::*;

    type Published = Vec<(PublishTarget, Vec<FeedEntry>)>;

    /// Records every publish; fails the calls whose index is listed.
    #[derive(Default)]
    struct RecordingClient {
        published: Mutex<Published>,
        calls: AtomicUsize,
        fail_calls: Vec<usize>,
    }

    impl RecordingClient {
        fn failing_on(calls: &[usize]) -> Self {
            Self {
                fail_calls: calls.to_vec(),
                ..Self::default()
            }
        }

        fn published(&self) -> Published {
            self.published.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl TelemetryClient for RecordingClient {
        fn name(&self) -> &str {
            "recording"
        }

        async fn publish_group(
            &self,
            target: &PublishTarget,
            entries: &[FeedEntry],
        ) -> fieldgw_telemetry::Result<()> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_calls.contains(&call) {
                return Err(PublishError::Status {
                    status: 503,
                    body: "unavailable".to_string(),
                });
            }
            self.published
                .lock()
                .unwrap()
                .push((target.clone(), entries.to_vec()));
            Ok(())
        }
    }

    /// Forwards each publish over a channel so tests can await it.
    struct NotifyingClient {
        tx: mpsc::UnboundedSender<Vec<FeedEntry>>,
    }

    #[async_trait]
    impl TelemetryClient for NotifyingClient {
        fn name(&self) -> &str {
            "notifying"
        }

        async fn publish_group(
            &self,
            _target: &PublishTarget,
            entries: &[FeedEntry],
        ) -> fieldgw_telemetry::Result<()> {
            let _ = self.tx.send(entries.to_vec());
            Ok(())
        }
    }

    /// Reports each publish as started, then never completes it.
    struct StalledClient {
        started: mpsc::UnboundedSender<Vec<FeedEntry>>,
    }

    #[async_trait]
    impl TelemetryClient for StalledClient {
        fn name(&self) -> &str {
            "stalled"
        }

        async fn publish_group(
            &self,
            _target: &PublishTarget,
            entries: &[FeedEntry],
        ) -> fieldgw_telemetry::Result<()> {
            let _ = self.started.send(entries.to_vec());
            std::future::pending().await
        }
    }

    fn readings_frame(device: u8, payload: &str) -> Vec<u8> {
        let mut raw = vec![0x11, device];
        raw.extend_from_slice(payload.as_bytes());
        raw
    }

    fn dispatcher(client: Arc<dyn TelemetryClient>) -> Dispatcher {
        Dispatcher::new(client, PublishTarget::new("devmobile", "FieldGateway"))
    }

    async fn join(outcome: FrameOutcome) -> Result<(), PublishError> {
        match outcome {
            FrameOutcome::Publishing(handle) => handle.await.expect("publish task should not panic"),
            other => panic!("expected publishing outcome, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn device_readings_are_published_as_one_group() {
        let client = Arc::new(RecordingClient::default());
        let dispatcher = dispatcher(client.clone());

        let outcome = dispatcher.handle_frame(&readings_frame(0xAB, "t 21.5,h 60"));
        join(outcome).await.unwrap();

        let published = client.published();
        assert_eq!(published.len(), 1);
        let (target, entries) = &published[0];
        assert_eq!(target.account(), "devmobile");
        assert_eq!(target.group(), "fieldgateway");
        assert_eq!(
            entries,
            &vec![FeedEntry::new("abt", "21.5"), FeedEntry::new("abh", "60")]
        );
    }

    #[tokio::test]
    async fn echo_frames_never_publish() {
        let client = Arc::new(RecordingClient::default());
        let dispatcher = dispatcher(client.clone());

        assert!(matches!(
            dispatcher.handle_frame(b"\x00hello"),
            FrameOutcome::Echoed
        ));
        // Unknown kind nibble behaves exactly like echo.
        assert!(matches!(
            dispatcher.handle_frame(&[0x21, 0xAB, b't', b' ', b'1']),
            FrameOutcome::Echoed
        ));
        assert!(client.published().is_empty());
    }

    #[tokio::test]
    async fn decode_errors_are_contained() {
        let client = Arc::new(RecordingClient::default());
        let dispatcher = dispatcher(client.clone());

        let cases: [(&[u8], &str); 4] = [
            (&[], "too_short_for_header"),
            (&[0x13, 0xAB], "too_short_for_device_id"),
            (&[0x11, 0xAB], "no_payload"),
            (b"\x11\xABt1", "malformed_reading"),
        ];
        for (raw, kind) in cases {
            match dispatcher.handle_frame(raw) {
                FrameOutcome::Rejected(err) => assert_eq!(err.kind(), kind),
                other => panic!("expected rejection for {raw:?}, got {other:?}"),
            }
        }

        // Still able to process a good frame afterwards.
        join(dispatcher.handle_frame(&readings_frame(0x01, "t 1")))
            .await
            .unwrap();
        assert_eq!(client.published().len(), 1);
    }

    #[tokio::test]
    async fn publish_failure_does_not_block_next_frame() {
        let client = Arc::new(RecordingClient::failing_on(&[0]));
        let dispatcher = dispatcher(client.clone());

        let first = join(dispatcher.handle_frame(&readings_frame(0x01, "t 1"))).await;
        assert!(matches!(first, Err(PublishError::Status { status: 503, .. })));

        join(dispatcher.handle_frame(&readings_frame(0x02, "t 2")))
            .await
            .unwrap();

        let published = client.published();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].1, vec![FeedEntry::new("02t", "2")]);
    }

    #[tokio::test]
    async fn transmit_notifications_are_log_only() {
        let client = Arc::new(RecordingClient::default());
        let dispatcher = dispatcher(client.clone());

        assert!(dispatcher.handle_event(LinkEvent::TransmitSucceeded).is_none());
        assert!(dispatcher.handle_event(LinkEvent::TransmitFailed).is_none());
        assert!(client.published().is_empty());
    }

    #[tokio::test]
    async fn run_consumes_events_until_senders_drop() {
        let (tx, mut published) = mpsc::unbounded_channel();
        let dispatcher = dispatcher(Arc::new(NotifyingClient { tx }));
        let (sender, rx) = event_channel(16);

        sender.frame_received(readings_frame(0xAB, "t 21.5")).await.unwrap();
        sender.frame_received(Bytes::from_static(b"\x00ping")).await.unwrap();
        sender.frame_received(Bytes::new()).await.unwrap();
        sender.transmit_succeeded().await.unwrap();
        sender.transmit_failed().await.unwrap();
        sender.frame_received(readings_frame(0xCD, "h 60")).await.unwrap();
        drop(sender);

        let stats = dispatcher.run(rx, CancellationToken::new()).await;
        assert_eq!(
            stats,
            DispatchStats {
                frames: 4,
                echoed: 1,
                rejected: 1,
                publishes: 2,
                transmit_succeeded: 1,
                transmit_failed: 1,
            }
        );

        let mut keys = Vec::new();
        for _ in 0..2 {
            let entries = tokio::time::timeout(Duration::from_secs(5), published.recv())
                .await
                .expect("publish should complete")
                .expect("channel should be open");
            keys.extend(entries.into_iter().map(|entry| entry.key));
        }
        keys.sort();
        assert_eq!(keys, vec!["abt", "cdh"]);
    }

    #[tokio::test]
    async fn run_stops_when_cancelled() {
        let dispatcher = dispatcher(Arc::new(RecordingClient::default()));
        let (_sender, rx) = event_channel(1);
        let cancel = CancellationToken::new();
        cancel.cancel();

        let stats = tokio::time::timeout(Duration::from_secs(5), dispatcher.run(rx, cancel))
            .await
            .expect("run should return once cancelled");
        assert_eq!(stats, DispatchStats::default());
    }

    #[tokio::test]
    async fn stalled_publishes_stay_in_flight_together() {
        let (started_tx, mut started) = mpsc::unbounded_channel();
        let dispatcher = dispatcher(Arc::new(StalledClient { started: started_tx }));

        let first = dispatcher.handle_frame(&readings_frame(0xAB, "t 1"));
        let second = dispatcher.handle_frame(&readings_frame(0xCD, "t 2"));
        let (FrameOutcome::Publishing(first), FrameOutcome::Publishing(second)) = (first, second)
        else {
            panic!("both frames should be publishing");
        };

        let mut keys = Vec::new();
        for _ in 0..2 {
            let entries = tokio::time::timeout(Duration::from_secs(5), started.recv())
                .await
                .expect("both publishes should start")
                .expect("channel should be open");
            keys.extend(entries.into_iter().map(|entry| entry.key));
        }
        keys.sort();
        assert_eq!(keys, vec!["abt", "cdt"]);
        assert!(!first.is_finished());
        assert!(!second.is_finished());

        first.abort();
        second.abort();
    }

    #[tokio::test]
    async fn run_is_not_held_up_by_stalled_publish() {
        let (started_tx, mut started) = mpsc::unbounded_channel();
        let dispatcher = dispatcher(Arc::new(StalledClient { started: started_tx }));
        let (sender, rx) = event_channel(4);
        sender.frame_received(readings_frame(0xAB, "t 1")).await.unwrap();
        sender.frame_received(readings_frame(0xCD, "t 2")).await.unwrap();

        let cancel = CancellationToken::new();
        let watcher = async {
            for _ in 0..2 {
                tokio::time::timeout(Duration::from_secs(5), started.recv())
                    .await
                    .expect("both publishes should start")
                    .expect("channel should be open");
            }
            cancel.cancel();
        };

        let (stats, ()) = tokio::join!(dispatcher.run(rx, cancel.clone()), watcher);
        assert_eq!(stats.frames, 2);
        assert_eq!(stats.publishes, 2);
    }
}
