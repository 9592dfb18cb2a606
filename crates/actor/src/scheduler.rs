use std::sync::Weak;

use tokio::select;
use tokio::sync::{mpsc, watch};

use crate::mailbox::Mailbox;
use crate::{Actor, Message};

/// Drives one actor: pulls messages off the mailbox and hands them to the
/// state, one at a time, until the actor is killed or unreachable.
#[inline]
pub async fn run_actor<S: Send + Sync + 'static>(
    mailbox: Weak<Mailbox<S>>,
    mut state: S,
    mut msg_rx: mpsc::UnboundedReceiver<Box<dyn Message<S>>>,
    mut kill_rx: watch::Receiver<bool>,
) {
    debug!("started");
    let mut handled: u64 = 0;
    loop {
        let msg = select! {
            biased;

            _ = kill_rx.changed() => {
                debug!("killed");
                break;
            }
            msg = msg_rx.recv() => {
                let Some(msg) = msg else {
                    break;
                };
                msg
            }
        };
        trace!("received message: {msg:?}");

        let Some(mailbox) = mailbox.upgrade() else {
            warn!("last mailbox has been dropped, discard the message");
            break;
        };

        let proc_span = trace_span!("proc msg", seq = handled);
        proc_span.in_scope(|| {
            msg.handle(&mut state, &Actor::from_mailbox(mailbox));
            trace!("finished");
        });
        handled += 1;
    }
    // Messages still queued are dropped together with the receiver.
    msg_rx.close();
    debug!(handled, "will terminate");
}
