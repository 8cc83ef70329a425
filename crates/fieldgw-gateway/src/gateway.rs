use fieldgw_link::{event_channel, UdpLink};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::dispatcher::{DispatchStats, Dispatcher};
use crate::error::Result;

/// A radio link wired to a dispatcher.
pub struct Gateway {
    link: UdpLink,
    dispatcher: Dispatcher,
}

impl Gateway {
    pub fn new(link: UdpLink, dispatcher: Dispatcher) -> Self {
        Self { link, dispatcher }
    }

    /// Receive and dispatch frames until `cancel` fires.
    ///
    /// The link runs on its own task. If it fails, the dispatcher drains
    /// what was already queued and the link error is returned.
    pub async fn run(self, cancel: CancellationToken) -> Result<DispatchStats> {
        let (sender, receiver) = event_channel(self.link.config().queue_depth);
        let link_cancel = cancel.child_token();
        let local_addr = self.link.local_addr();

        let link = self.link;
        let link_task = tokio::spawn({
            let link_cancel = link_cancel.clone();
            async move { link.run(sender, link_cancel).await }
        });

        info!(
            %local_addr,
            account = self.dispatcher.target().account(),
            group = self.dispatcher.target().group(),
            "gateway started"
        );

        let stats = self.dispatcher.run(receiver, cancel).await;

        link_cancel.cancel();
        link_task.await??;
        Ok(stats)
    }
}
