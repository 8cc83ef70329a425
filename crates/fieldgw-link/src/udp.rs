use std::io::ErrorKind;
use std::net::SocketAddr;

use bytes::Bytes;
use tokio::net::UdpSocket;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::{LinkConfig, MAX_FRAME_SIZE_LIMIT};
use crate::error::{LinkError, Result};
use crate::event::LinkSender;

/// UDP radio bridge.
///
/// A radio front end (or a bench tool) forwards every frame it hears as one
/// datagram. The datagram boundary is the frame boundary, so frames are
/// always delivered whole.
#[derive(Debug)]
pub struct UdpLink {
    socket: UdpSocket,
    local_addr: SocketAddr,
    config: LinkConfig,
}

impl UdpLink {
    /// Bind the bridge socket to `config.bind`.
    pub async fn bind(config: LinkConfig) -> Result<Self> {
        Self::bind_addr(config.bind, config).await
    }

    /// Bind the bridge socket to an explicit address.
    pub async fn bind_addr(addr: SocketAddr, config: LinkConfig) -> Result<Self> {
        let socket = UdpSocket::bind(addr)
            .await
            .map_err(|source| LinkError::Bind { addr, source })?;
        let local_addr = socket.local_addr()?;

        info!(
            %local_addr,
            max_frame_size = config.max_frame_size,
            "radio bridge listening"
        );

        Ok(Self {
            socket,
            local_addr,
            config,
        })
    }

    /// Address the socket is actually bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn config(&self) -> &LinkConfig {
        &self.config
    }

    /// Receive the next frame that fits the link-layer maximum.
    ///
    /// Oversized datagrams are dropped with a warning. Connection
    /// reset/refused notifications, which some platforms raise on UDP
    /// sockets after an unreachable send, are skipped.
    pub async fn recv_frame(&self) -> Result<(Bytes, SocketAddr)> {
        // One spare byte detects datagrams longer than the maximum.
        let mut buf = vec![0u8; self.config.max_frame_size.min(MAX_FRAME_SIZE_LIMIT) + 1];
        loop {
            let (len, from) = match self.socket.recv_from(&mut buf).await {
                Ok(received) => received,
                Err(err)
                    if matches!(
                        err.kind(),
                        ErrorKind::ConnectionReset | ErrorKind::ConnectionRefused
                    ) =>
                {
                    debug!(error = %err, "ignoring transient bridge socket error");
                    continue;
                }
                Err(err) => return Err(LinkError::Io(err)),
            };

            if len > self.config.max_frame_size {
                warn!(
                    %from,
                    max = self.config.max_frame_size,
                    "dropping oversized datagram"
                );
                continue;
            }

            return Ok((Bytes::copy_from_slice(&buf[..len]), from));
        }
    }

    /// Forward received frames to `events` until cancelled.
    ///
    /// Also returns cleanly once the event receiver has been dropped.
    pub async fn run(&self, events: LinkSender, cancel: CancellationToken) -> Result<()> {
        loop {
            let (frame, from) = tokio::select! {
                _ = cancel.cancelled() => {
                    debug!("radio bridge stopping");
                    return Ok(());
                }
                received = self.recv_frame() => received?,
            };

            debug!(%from, size = frame.len(), "frame received");

            if events.frame_received(frame).await.is_err() {
                debug!("link event receiver dropped; radio bridge stopping");
                return Ok(());
            }
        }
    }

    /// Transmit one frame to a bridge peer.
    pub async fn send_frame(&self, peer: SocketAddr, frame: &[u8]) -> Result<()> {
        if frame.len() > self.config.max_frame_size {
            return Err(LinkError::FrameTooLarge {
                size: frame.len(),
                max: self.config.max_frame_size,
            });
        }

        let sent = self.socket.send_to(frame, peer).await?;
        debug!(%peer, size = sent, "frame transmitted");
        Ok(())
    }

    /// Transmit one frame and report the outcome on `events`.
    ///
    /// UDP carries no acknowledgement, so success means the datagram was
    /// handed to the socket. The send error, if any, is still returned.
    pub async fn transmit(
        &self,
        peer: SocketAddr,
        frame: &[u8],
        events: &LinkSender,
    ) -> Result<()> {
        let result = self.send_frame(peer, frame).await;
        let reported = match &result {
            Ok(()) => events.transmit_succeeded().await,
            Err(err) => {
                warn!(%peer, error = %err, "frame transmit failed");
                events.transmit_failed().await
            }
        };
        if reported.is_err() {
            debug!("link event receiver dropped; transmit outcome not reported");
        }
        result
    }
}
