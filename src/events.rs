//! Typed event surface (§6, §9). Each variant fires once per completed
//! operation, after the corresponding state transition has committed.

use tracing::trace;
use tokio::sync::mpsc;

#[derive(Debug, Clone, PartialEq)]
pub enum GraphEvent {
    Built { node_count: usize },
    PageRankComputed { iterations: usize },
    CommunitiesDetected { community_count: usize },
}

/// Sends events best-effort. An unattached or closed channel is not an
/// error condition: the core has no fatal errors internal to it (§7).
pub(crate) fn emit(sender: Option<&mpsc::Sender<GraphEvent>>, event: GraphEvent) {
    let Some(sender) = sender else {
        return;
    };
    if sender.try_send(event).is_err() {
        trace!("event channel unavailable, dropping event");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn emit_delivers_to_receiver() {
        let (tx, mut rx) = mpsc::channel(8);
        emit(Some(&tx), GraphEvent::Built { node_count: 3 });
        let got = rx.recv().await.expect("event");
        assert_eq!(got, GraphEvent::Built { node_count: 3 });
    }

    #[test]
    fn emit_without_sender_is_noop() {
        emit(None, GraphEvent::PageRankComputed { iterations: 0 });
    }
}
