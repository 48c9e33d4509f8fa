use crate::room::{ParticipantSession, Room};
use roomlink_core::{ConnectionId, MemberInfo, RoomId, SignalMessage};
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("connection {0} is not registered")]
    UnknownConnection(ConnectionId),

    #[error("connection {0} can no longer be reached")]
    Unreachable(ConnectionId),

    #[error("room registry is no longer running")]
    Unavailable,
}

/// A message and everyone it has to reach.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub recipients: Vec<ConnectionId>,
    pub message: SignalMessage,
}

#[derive(Debug, Clone)]
pub struct JoinOutcome {
    /// Members present before the joiner, in join order.
    pub snapshot: Vec<MemberInfo>,
    /// Set when the joiner was moved out of another room first.
    pub previous: Option<LeaveOutcome>,
    pub user_joined: Notification,
}

#[derive(Debug, Clone)]
pub struct LeaveOutcome {
    pub room_id: RoomId,
    pub user_left: Notification,
    pub room_closed: bool,
}

/// Authoritative room → participant mapping.
///
/// Plain state: callers provide the serialization boundary. Every mutation
/// returns the notifications it implies so they can be enqueued inside that
/// same boundary.
#[derive(Debug, Default)]
pub struct RoomRegistry {
    sessions: HashMap<ConnectionId, ParticipantSession>,
    rooms: HashMap<RoomId, Room>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a fresh connection. Returns `false` if it was already known.
    pub fn connect(&mut self, connection_id: ConnectionId) -> bool {
        if self.sessions.contains_key(&connection_id) {
            return false;
        }
        self.sessions
            .insert(connection_id, ParticipantSession::new(connection_id));
        true
    }

    pub fn join(
        &mut self,
        connection_id: ConnectionId,
        room_id: RoomId,
        user_id: String,
        user_name: String,
    ) -> Result<JoinOutcome, RegistryError> {
        match self.sessions.get(&connection_id) {
            None => return Err(RegistryError::UnknownConnection(connection_id)),
            Some(s) if !s.alive => return Err(RegistryError::Unreachable(connection_id)),
            Some(_) => {}
        }

        let previous = self.leave(connection_id);

        let room = self
            .rooms
            .entry(room_id.clone())
            .or_insert_with(|| {
                info!("Creating room '{}'", room_id);
                Room::new(room_id.clone())
            });

        let others = room.others(&connection_id);
        room.insert(connection_id);

        let snapshot = others
            .iter()
            .filter_map(|id| self.sessions.get(id))
            .map(|s| MemberInfo {
                socket_id: s.connection_id,
                user_name: s.display_name.clone(),
            })
            .collect();

        let user_joined = Notification {
            recipients: others,
            message: SignalMessage::UserJoined {
                user_id: user_id.clone(),
                user_name: user_name.clone(),
                socket_id: connection_id,
            },
        };

        if let Some(session) = self.sessions.get_mut(&connection_id) {
            session.display_name = user_name;
            session.user_id = user_id;
            session.room = Some(room_id.clone());
        }

        info!("Connection {} joined room '{}'", connection_id, room_id);

        Ok(JoinOutcome {
            snapshot,
            previous,
            user_joined,
        })
    }

    /// Removes the connection from its room. `None` when it was not in one.
    pub fn leave(&mut self, connection_id: ConnectionId) -> Option<LeaveOutcome> {
        let room_id = self.sessions.get_mut(&connection_id)?.room.take()?;

        let Some(room) = self.rooms.get_mut(&room_id) else {
            debug!("Session {} pointed at vanished room '{}'", connection_id, room_id);
            return None;
        };
        room.remove(&connection_id);

        let recipients = room.members().to_vec();
        let room_closed = room.is_empty();
        if room_closed {
            self.rooms.remove(&room_id);
            info!("Room '{}' is empty, dropping it", room_id);
        }

        info!("Connection {} left room '{}'", connection_id, room_id);

        Some(LeaveOutcome {
            room_id,
            user_left: Notification {
                recipients,
                message: SignalMessage::UserLeft {
                    user_id: connection_id,
                    socket_id: connection_id,
                },
            },
            room_closed,
        })
    }

    /// Marks a session whose outbound queue is gone and pulls it out of its
    /// room at once. The session stays registered until its disconnect, but
    /// may not join again. `None` if unknown or already marked.
    pub fn mark_unreachable(&mut self, connection_id: ConnectionId) -> Option<Option<LeaveOutcome>> {
        let session = self.sessions.get_mut(&connection_id)?;
        if !session.alive {
            return None;
        }
        session.alive = false;
        info!("Connection {} unreachable", connection_id);
        Some(self.leave(connection_id))
    }

    /// Leave followed by session destruction. `None` on a repeated call.
    pub fn disconnect(&mut self, connection_id: ConnectionId) -> Option<Option<LeaveOutcome>> {
        self.sessions.get(&connection_id)?;
        let left = self.leave(connection_id);
        self.sessions.remove(&connection_id);
        Some(left)
    }

    /// Recipients for a chat line: the sender's room minus the sender.
    pub fn chat_recipients(&self, connection_id: &ConnectionId) -> Option<Vec<ConnectionId>> {
        let room_id = self.sessions.get(connection_id)?.room.as_ref()?;
        self.rooms.get(room_id).map(|r| r.others(connection_id))
    }

    pub fn session(&self, connection_id: &ConnectionId) -> Option<&ParticipantSession> {
        self.sessions.get(connection_id)
    }

    pub fn room(&self, room_id: &RoomId) -> Option<&Room> {
        self.rooms.get(room_id)
    }

    pub fn members(&self, room_id: &RoomId) -> Vec<MemberInfo> {
        let Some(room) = self.rooms.get(room_id) else {
            return Vec::new();
        };
        room.members()
            .iter()
            .filter_map(|id| self.sessions.get(id))
            .map(|s| MemberInfo {
                socket_id: s.connection_id,
                user_name: s.display_name.clone(),
            })
            .collect()
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Every session's room must list that session, and vice versa.
    pub fn is_consistent(&self) -> bool {
        let sessions_ok = self.sessions.values().all(|s| match &s.room {
            Some(room_id) => self
                .rooms
                .get(room_id)
                .is_some_and(|r| r.contains(&s.connection_id)),
            None => true,
        });
        let rooms_ok = self.rooms.values().all(|r| {
            !r.is_empty()
                && r.members().iter().all(|m| {
                    self.sessions
                        .get(m)
                        .is_some_and(|s| s.room.as_ref() == Some(r.id()))
                })
        });
        sessions_ok && rooms_ok
    }
}
