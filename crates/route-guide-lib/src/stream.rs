//! Streaming halves of a call and their suspension points
//!
//! Inbound messages arrive on a bounded tokio channel. The sender closing the
//! channel is the end-of-input signal, and an `Err` item is a transport
//! failure reported by whoever decodes the wire. Outbound messages go through
//! a bounded sender, so a slow reader applies backpressure to the handler.
//!
//! Both operations race the channel against [`CallContext::done`], so a call
//! blocked on the network still stops promptly when cancelled.

use crate::{CallContext, GuideError, Result};
use tokio::sync::mpsc;

/// Messages received from the caller
pub type Inbound<T> = mpsc::Receiver<Result<T>>;

/// Messages sent back to the caller
pub type Outbound<T> = mpsc::Sender<T>;

/// Create a bounded inbound channel, returning the transport's sending half
pub fn inbound<T>(capacity: usize) -> (mpsc::Sender<Result<T>>, Inbound<T>) {
    mpsc::channel(capacity.max(1))
}

/// Create a bounded outbound channel, returning the transport's receiving half
pub fn outbound<T>(capacity: usize) -> (Outbound<T>, mpsc::Receiver<T>) {
    mpsc::channel(capacity.max(1))
}

/// Wait for the next inbound message
///
/// Returns `Ok(None)` on end-of-input. Fails with the context's reason if the
/// call is cancelled while waiting, or with the transport's error item.
pub async fn recv<T>(ctx: &CallContext, rx: &mut Inbound<T>) -> Result<Option<T>> {
    ctx.check()?;
    tokio::select! {
        biased;
        reason = ctx.done() => Err(reason),
        item = rx.recv() => item.transpose(),
    }
}

/// Send one outbound message, waiting for channel capacity if needed
///
/// Fails with the context's reason if the call is cancelled while blocked,
/// or with [`GuideError::Transport`] if the caller stopped listening.
pub async fn send<T>(ctx: &CallContext, tx: &Outbound<T>, item: T) -> Result<()> {
    ctx.check()?;
    tokio::select! {
        biased;
        reason = ctx.done() => Err(reason),
        sent = tx.send(item) => sent.map_err(|_| {
            GuideError::Transport("outbound stream closed by receiver".to_string())
        }),
    }
}
