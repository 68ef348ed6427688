use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::domain::player_view::PlayerView;
use crate::domain::snapshot::{PhaseUpdate, RoomId};
use crate::domain::state::Seat;
use crate::errors::domain::{DomainError, RoomErrorKind};
use crate::protocol::{ActionResult, GameAction};

/// Lifecycle of a room's processing loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomStatus {
    Running,
    /// GAME_OVER reached; the loop still answers queries.
    Finished,
    /// An invariant broke; the loop has halted.
    Failed(String),
    Closed,
}

impl RoomStatus {
    pub fn accepts_actions(&self) -> bool {
        matches!(self, RoomStatus::Running | RoomStatus::Finished)
    }

    pub(crate) fn rejection(&self, room_id: RoomId) -> DomainError {
        match self {
            RoomStatus::Failed(reason) => DomainError::room(
                RoomErrorKind::Failed,
                format!("room {room_id} failed: {reason}"),
            ),
            _ => DomainError::room(RoomErrorKind::Closed, format!("room {room_id} is closed")),
        }
    }
}

pub(crate) enum RoomCommand {
    Submit {
        action: GameAction,
        reply: oneshot::Sender<ActionResult>,
    },
    /// Submitted by the bot task driving `seat`.
    Bot {
        seat: Seat,
        action: GameAction,
        reply: oneshot::Sender<ActionResult>,
    },
    Snapshot {
        reply: oneshot::Sender<PhaseUpdate>,
    },
    View {
        player_name: String,
        reply: oneshot::Sender<Result<PlayerView, DomainError>>,
    },
}

/// Cheap, cloneable access to one running room.
#[derive(Clone)]
pub struct RoomHandle {
    room_id: RoomId,
    commands: mpsc::Sender<RoomCommand>,
    status: Arc<RwLock<RoomStatus>>,
    cancel: CancellationToken,
    done: CancellationToken,
}

impl RoomHandle {
    pub(crate) fn new(
        room_id: RoomId,
        commands: mpsc::Sender<RoomCommand>,
        status: Arc<RwLock<RoomStatus>>,
        cancel: CancellationToken,
        done: CancellationToken,
    ) -> Self {
        Self {
            room_id,
            commands,
            status,
            cancel,
            done,
        }
    }

    pub fn room_id(&self) -> RoomId {
        self.room_id
    }

    pub fn status(&self) -> RoomStatus {
        self.status.read().clone()
    }

    /// Queue `action` behind everything already submitted and wait for its
    /// result. Errors come back as data.
    pub async fn submit(&self, action: GameAction) -> ActionResult {
        let status = self.status();
        if !status.accepts_actions() {
            return ActionResult::rejected(&status.rejection(self.room_id), None);
        }

        let (reply, rx) = oneshot::channel();
        let command = RoomCommand::Submit { action, reply };
        if let Err(err) = self.commands.try_send(command) {
            let error = match err {
                mpsc::error::TrySendError::Full(_) => DomainError::room(
                    RoomErrorKind::QueueFull,
                    format!("room {} action queue is full", self.room_id),
                ),
                mpsc::error::TrySendError::Closed(_) => self.status().rejection(self.room_id),
            };
            debug!(room_id = %self.room_id, error = %error, "Action not queued");
            return ActionResult::rejected(&error, None);
        }

        match rx.await {
            Ok(result) => result,
            Err(_) => ActionResult::rejected(&self.status().rejection(self.room_id), None),
        }
    }

    /// Latest phase update as the room loop sees it.
    pub async fn snapshot(&self) -> Result<PhaseUpdate, DomainError> {
        let (reply, rx) = oneshot::channel();
        self.request(RoomCommand::Snapshot { reply }, rx).await
    }

    pub async fn view(&self, player_name: impl Into<String>) -> Result<PlayerView, DomainError> {
        let (reply, rx) = oneshot::channel();
        let command = RoomCommand::View {
            player_name: player_name.into(),
            reply,
        };
        self.request(command, rx).await?
    }

    /// Resolves once the game is over or the loop has stopped.
    pub async fn finished(&self) {
        self.done.cancelled().await
    }

    pub(crate) fn cancel(&self) {
        self.cancel.cancel();
    }

    async fn request<T>(
        &self,
        command: RoomCommand,
        rx: oneshot::Receiver<T>,
    ) -> Result<T, DomainError> {
        if self.commands.send(command).await.is_err() {
            return Err(self.status().rejection(self.room_id));
        }
        rx.await.map_err(|_| self.status().rejection(self.room_id))
    }
}
