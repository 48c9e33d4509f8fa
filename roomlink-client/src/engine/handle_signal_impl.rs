use crate::engine::MeshEngine;
use crate::link::{LinkCommand, Role};
use roomlink_core::{ConnectionId, SignalEnvelope, SignalPayload};
use tracing::{debug, info, warn};

impl MeshEngine {
    pub(super) fn handle_signal(&mut self, envelope: SignalEnvelope) {
        if let Err(e) = envelope.validate() {
            warn!("Discarding invalid signal: {}", e);
            return;
        }
        let Some(from) = envelope.from else {
            warn!("Signal without a sender, discarding");
            return;
        };
        if self.self_id.is_some_and(|me| me != envelope.to) {
            warn!("Signal for {} delivered to us, discarding", envelope.to);
            return;
        }

        let kind = envelope.payload.kind();
        match envelope.payload {
            SignalPayload::Offer { signal, user_name } => {
                if !self.links.contains_key(&from) {
                    if self.awaiting_snapshot() || self.strangers.contains(&from) {
                        debug!("Offer from {} outside the current room, dropping", from);
                        return;
                    }
                    info!("Offer from unannounced peer {} ({}), answering", from, user_name);
                    self.open_link(from, user_name, Role::Responder);
                }
                self.forward(from, kind, LinkCommand::RemoteOffer(signal));
            }
            SignalPayload::Answer { signal } => {
                self.forward(from, kind, LinkCommand::RemoteAnswer(signal));
            }
            SignalPayload::IceCandidate { signal } => {
                self.forward(from, kind, LinkCommand::RemoteCandidate(signal));
            }
        }
    }

    fn forward(&self, from: ConnectionId, kind: &str, command: LinkCommand) {
        match self.links.get(&from) {
            Some(entry) => {
                entry.handle.send(command);
            }
            None => debug!("{} from {} has no link, dropping", kind, from),
        }
    }
}
