//! Bot seats: a cancellable thinking delay, then the bot's decision goes
//! through the room queue like any human action.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::handle::RoomCommand;
use crate::ai::{get_bot_decision, BotPolicy, MAX_BOT_ATTEMPTS};
use crate::domain::player_view::PlayerView;
use crate::domain::snapshot::RoomId;
use crate::domain::state::Seat;

/// Policies driving one bot seat.
pub(crate) struct BotSeat {
    pub policy: Arc<dyn BotPolicy>,
    /// Used once `policy` has been rejected `MAX_BOT_ATTEMPTS` times.
    pub fallback: Arc<dyn BotPolicy>,
}

/// A scheduled bot decision.
pub(crate) struct BotTicket {
    token: CancellationToken,
    task: JoinHandle<()>,
}

impl BotTicket {
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    pub fn cancel(self) {
        self.token.cancel();
    }
}

/// Uniform thinking delay in `[min, max]`.
pub(crate) fn thinking_delay(rng: &mut ChaCha8Rng, min: Duration, max: Duration) -> Duration {
    if max <= min {
        return min;
    }
    let span = (max - min).as_millis() as u64;
    min + Duration::from_millis(rng.random_range(0..=span))
}

pub(crate) struct BotRequest {
    pub room_id: RoomId,
    pub seat: Seat,
    pub view: PlayerView,
    pub delay: Duration,
}

pub(crate) fn spawn_bot(
    request: BotRequest,
    bot: &BotSeat,
    commands: mpsc::Sender<RoomCommand>,
    token: CancellationToken,
) -> BotTicket {
    let policy = bot.policy.clone();
    let fallback = bot.fallback.clone();
    let task_token = token.clone();
    let task = tokio::spawn(async move {
        run_bot(request, policy, fallback, commands, task_token).await;
    });
    BotTicket { token, task }
}

async fn run_bot(
    request: BotRequest,
    policy: Arc<dyn BotPolicy>,
    fallback: Arc<dyn BotPolicy>,
    commands: mpsc::Sender<RoomCommand>,
    token: CancellationToken,
) {
    let BotRequest {
        room_id,
        seat,
        view,
        delay,
    } = request;

    tokio::select! {
        _ = token.cancelled() => {
            debug!(room_id = %room_id, seat, "Bot delay cancelled");
            return;
        }
        _ = tokio::time::sleep(delay) => {}
    }

    for attempt in 1..=MAX_BOT_ATTEMPTS + 1 {
        let chooser = if attempt <= MAX_BOT_ATTEMPTS {
            policy.as_ref()
        } else {
            fallback.as_ref()
        };
        let action = match get_bot_decision(chooser, &view) {
            Ok(action) => action,
            Err(err) => {
                warn!(room_id = %room_id, seat, attempt, error = %err, "Bot could not decide");
                continue;
            }
        };

        let (reply, rx) = oneshot::channel();
        let command = RoomCommand::Bot {
            seat,
            action,
            reply,
        };
        if commands.send(command).await.is_err() {
            return;
        }
        let result = tokio::select! {
            _ = token.cancelled() => return,
            result = rx => result,
        };
        match result {
            Ok(result) if result.success => return,
            Ok(result) => debug!(
                room_id = %room_id,
                seat,
                attempt,
                code = ?result.error_code(),
                "Bot action rejected"
            ),
            Err(_) => return,
        }
    }
    warn!(room_id = %room_id, seat, "Bot gave up after fallback");
}
