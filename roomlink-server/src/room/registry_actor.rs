use crate::room::{LeaveOutcome, Notification, RoomCommand, RoomRegistry};
use crate::signaling::SignalingOutput;
use chrono::Local;
use roomlink_core::{ConnectionId, SignalMessage};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Owns the [`RoomRegistry`] and applies commands one at a time.
///
/// A command's mutation, snapshot and notification fan-out all happen inside
/// one `handle_command` call, so no other membership change can interleave.
pub(crate) struct RegistryActor {
    registry: RoomRegistry,
    command_rx: mpsc::Receiver<RoomCommand>,
    output: Arc<dyn SignalingOutput>,
}

impl RegistryActor {
    pub(crate) fn new(command_rx: mpsc::Receiver<RoomCommand>, output: Arc<dyn SignalingOutput>) -> Self {
        Self {
            registry: RoomRegistry::new(),
            command_rx,
            output,
        }
    }

    pub(crate) async fn run(mut self) {
        info!("Room registry loop started");

        while let Some(cmd) = self.command_rx.recv().await {
            self.handle_command(cmd).await;
        }

        info!("Command channel closed. Room registry finished.");
    }

    async fn handle_command(&mut self, cmd: RoomCommand) {
        match cmd {
            RoomCommand::Connect { connection_id } => {
                if !self.registry.connect(connection_id) {
                    warn!("Connection {} registered twice", connection_id);
                }
            }

            RoomCommand::Join {
                connection_id,
                room_id,
                user_id,
                user_name,
                reply,
            } => {
                let result = self
                    .registry
                    .join(connection_id, room_id, user_id, user_name);

                let result = match result {
                    Ok(outcome) => {
                        if let Some(previous) = outcome.previous {
                            self.notify_left(previous).await;
                        }
                        self.notify(outcome.user_joined).await;
                        let delivered = self
                            .output
                            .deliver(
                                connection_id,
                                SignalMessage::ExistingUsers {
                                    users: outcome.snapshot.clone(),
                                },
                            )
                            .await;
                        if !delivered {
                            self.sweep_unreachable(vec![connection_id]).await;
                        }
                        Ok(outcome.snapshot)
                    }
                    Err(e) => {
                        warn!("Join rejected for {}: {}", connection_id, e);
                        Err(e)
                    }
                };

                let _ = reply.send(result);
            }

            RoomCommand::Leave { connection_id } => match self.registry.leave(connection_id) {
                Some(left) => self.notify_left(left).await,
                None => debug!("Leave from {} while not in a room", connection_id),
            },

            RoomCommand::Disconnect {
                connection_id,
                reply,
            } => {
                let torn_down = match self.registry.disconnect(connection_id) {
                    Some(left) => {
                        info!("Session {} destroyed", connection_id);
                        if let Some(left) = left {
                            self.notify_left(left).await;
                        }
                        true
                    }
                    None => {
                        debug!("Redundant disconnect for {}", connection_id);
                        false
                    }
                };

                if let Some(reply) = reply {
                    let _ = reply.send(torn_down);
                }
            }

            RoomCommand::Chat {
                connection_id,
                message,
                user_name,
            } => {
                let Some(recipients) = self.registry.chat_recipients(&connection_id) else {
                    debug!("Chat from {} outside any room dropped", connection_id);
                    return;
                };

                let time = Local::now().format("%H:%M").to_string();
                self.notify(Notification {
                    recipients,
                    message: SignalMessage::ReceiveMessage {
                        message,
                        user_name,
                        time,
                    },
                })
                .await;
            }

            RoomCommand::Members { room_id, reply } => {
                let _ = reply.send(self.registry.members(&room_id));
            }
        }
    }

    async fn notify_left(&mut self, left: LeaveOutcome) {
        self.notify(left.user_left).await;
    }

    async fn notify(&mut self, notification: Notification) {
        let failed = self.deliver_all(notification).await;
        self.sweep_unreachable(failed).await;
    }

    /// Returns the recipients that could not be reached.
    async fn deliver_all(&self, notification: Notification) -> Vec<ConnectionId> {
        let mut failed = Vec::new();
        for recipient in notification.recipients {
            if !self
                .output
                .deliver(recipient, notification.message.clone())
                .await
            {
                debug!(
                    "{} for {} dropped, recipient already gone",
                    notification.message.op(),
                    recipient
                );
                failed.push(recipient);
            }
        }
        failed
    }

    /// Takes sessions that stopped accepting messages out of their rooms.
    /// Their departure can strand further recipients, so keep going until
    /// nobody new fails.
    async fn sweep_unreachable(&mut self, mut pending: Vec<ConnectionId>) {
        while let Some(connection_id) = pending.pop() {
            if let Some(Some(left)) = self.registry.mark_unreachable(connection_id) {
                pending.extend(self.deliver_all(left.user_left).await);
            }
        }
    }
}
