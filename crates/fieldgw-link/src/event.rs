use bytes::Bytes;
use tokio::sync::mpsc;

use crate::config::MAX_QUEUE_DEPTH;
use crate::error::{LinkError, Result};

/// Something the radio link reports to the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkEvent {
    /// A complete frame arrived from a sensor node.
    FrameReceived(Bytes),
    /// An outbound frame was acknowledged. Radio links report this on
    /// hardware acknowledgement; [`UdpLink::transmit`](crate::UdpLink::transmit)
    /// reports it once the datagram is sent.
    TransmitSucceeded,
    /// An outbound frame was not acknowledged, or could not be sent.
    TransmitFailed,
}

/// Producer half of the link event channel.
///
/// Cheap to clone; every radio link implementation holds one.
#[derive(Debug, Clone)]
pub struct LinkSender {
    tx: mpsc::Sender<LinkEvent>,
}

impl LinkSender {
    /// Deliver an event, waiting for queue space.
    pub async fn send(&self, event: LinkEvent) -> Result<()> {
        self.tx.send(event).await.map_err(|_| LinkError::Closed)
    }

    /// Deliver a received frame.
    pub async fn frame_received(&self, frame: impl Into<Bytes>) -> Result<()> {
        self.send(LinkEvent::FrameReceived(frame.into())).await
    }

    pub async fn transmit_succeeded(&self) -> Result<()> {
        self.send(LinkEvent::TransmitSucceeded).await
    }

    pub async fn transmit_failed(&self) -> Result<()> {
        self.send(LinkEvent::TransmitFailed).await
    }

    /// Returns true once the consumer has dropped its receiver.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Create the channel that carries link events to the dispatcher.
///
/// The depth is clamped to `1..=MAX_QUEUE_DEPTH`.
pub fn event_channel(depth: usize) -> (LinkSender, mpsc::Receiver<LinkEvent>) {
    let (tx, rx) = mpsc::channel(depth.clamp(1, MAX_QUEUE_DEPTH));
    (LinkSender { tx }, rx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn events_arrive_in_order() {
        let (sender, mut rx) = event_channel(4);
        sender.frame_received(vec![0x00, 0x01]).await.unwrap();
        sender.transmit_succeeded().await.unwrap();
        sender.transmit_failed().await.unwrap();

        assert_eq!(
            rx.recv().await,
            Some(LinkEvent::FrameReceived(Bytes::from_static(&[0x00, 0x01])))
        );
        assert_eq!(rx.recv().await, Some(LinkEvent::TransmitSucceeded));
        assert_eq!(rx.recv().await, Some(LinkEvent::TransmitFailed));
    }

    #[tokio::test]
    async fn send_after_receiver_dropped_is_closed() {
        let (sender, rx) = event_channel(1);
        drop(rx);
        assert!(sender.is_closed());
        let err = sender.transmit_succeeded().await.unwrap_err();
        assert!(matches!(err, LinkError::Closed));
    }

    #[tokio::test]
    async fn out_of_range_depths_are_clamped() {
        let (sender, mut rx) = event_channel(0);
        sender.frame_received(Bytes::from_static(b"x")).await.unwrap();
        assert!(rx.recv().await.is_some());

        // Far above the channel limit; clamped instead of panicking.
        let (sender, mut rx) = event_channel(usize::MAX);
        sender.transmit_failed().await.unwrap();
        assert_eq!(rx.recv().await, Some(LinkEvent::TransmitFailed));
    }
}
