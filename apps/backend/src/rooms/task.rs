//! The per-room processing loop. It exclusively owns the room's `GameFlow`
//! and applies queued commands one at a time, in arrival order.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use rand_chacha::ChaCha8Rng;
use tokio::sync::mpsc;
use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::bots::{spawn_bot, thinking_delay, BotRequest, BotSeat, BotTicket};
use super::broadcast::Broadcaster;
use super::events::EventPublisher;
use super::handle::{RoomCommand, RoomStatus};
use crate::domain::state::Seat;
use crate::errors::domain::DomainError;
use crate::protocol::{ActionResult, GameAction};
use crate::services::game_flow::{FlowOutput, GameFlow, PhaseTimer};

pub(crate) struct RoomTask {
    pub flow: GameFlow,
    pub commands_rx: mpsc::Receiver<RoomCommand>,
    /// Handed to bot tasks so their actions join the same queue.
    pub commands_tx: mpsc::Sender<RoomCommand>,
    pub status: Arc<RwLock<RoomStatus>>,
    pub cancel: CancellationToken,
    pub done: CancellationToken,
    pub broadcaster: Arc<dyn Broadcaster>,
    pub publisher: Arc<dyn EventPublisher>,
    pub bots: HashMap<Seat, BotSeat>,
    pub bot_rng: ChaCha8Rng,
    pub tickets: HashMap<Seat, BotTicket>,
    pub timer: Option<(PhaseTimer, Instant)>,
}

impl RoomTask {
    pub async fn run(mut self) {
        let room_id = self.flow.room_id();
        info!(room_id = %room_id, phase = %self.flow.phase(), "Room loop started");

        match self.flow.start() {
            Ok(out) => self.commit(out).await,
            Err(err) if err.is_fatal() => self.note_failure(&err),
            Err(err) => warn!(room_id = %room_id, error = %err, "Room could not start"),
        }

        while !self.flow.is_failed() {
            let deadline = self.timer.map(|(_, at)| at);
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => break,
                command = self.commands_rx.recv() => match command {
                    Some(command) => self.handle_command(command).await,
                    None => break,
                },
                _ = sleep_until(deadline) => self.fire_timer().await,
            }
        }

        self.teardown();
    }

    async fn handle_command(&mut self, command: RoomCommand) {
        match command {
            RoomCommand::Submit { action, reply } => {
                let result = self.apply(&action, None).await;
                let _ = reply.send(result);
            }
            RoomCommand::Bot {
                seat,
                action,
                reply,
            } => {
                let result = self.apply(&action, Some(seat)).await;
                let _ = reply.send(result);
            }
            RoomCommand::Snapshot { reply } => {
                let _ = reply.send(self.flow.snapshot());
            }
            RoomCommand::View { player_name, reply } => {
                let _ = reply.send(self.flow.view_for_name(&player_name));
            }
        }
    }

    async fn apply(&mut self, action: &GameAction, bot_seat: Option<Seat>) -> ActionResult {
        match self.flow.handle_action(action) {
            Ok(out) => {
                if let Some(seat) = bot_seat {
                    // Its task is only waiting for this reply.
                    self.tickets.remove(&seat);
                }
                let snapshot = self.flow.snapshot();
                self.commit(out).await;
                ActionResult::ok(snapshot)
            }
            Err(err) => {
                if err.is_fatal() {
                    self.note_failure(&err);
                } else {
                    debug!(
                        room_id = %self.flow.room_id(),
                        player = %action.player_name,
                        action = %action.action_type(),
                        code = %err.code(),
                        error = %err,
                        "Action rejected"
                    );
                }
                ActionResult::rejected(&err, Some(self.flow.snapshot()))
            }
        }
    }

    async fn fire_timer(&mut self) {
        let Some((timer, _)) = self.timer.take() else {
            return;
        };
        match self.flow.fire_timer(timer) {
            Ok(out) => self.commit(out).await,
            Err(err) if err.is_fatal() => self.note_failure(&err),
            Err(err) => warn!(
                room_id = %self.flow.room_id(),
                kind = ?timer.kind,
                error = %err,
                "Timer could not be applied"
            ),
        }
    }

    /// Publish what a committed mutation produced, then re-arm timers and
    /// bots for the phase the room is now in.
    async fn commit(&mut self, out: FlowOutput) {
        let room_id = self.flow.room_id();
        let ack_timeout = self.flow.config().broadcast_ack_timeout;
        for update in &out.updates {
            match time::timeout(ack_timeout, self.broadcaster.publish(update)).await {
                Ok(Ok(())) => {}
                Ok(Err(err)) => debug!(
                    room_id = %room_id,
                    sequence = update.sequence,
                    error = %err,
                    "Phase update not delivered"
                ),
                Err(_) => warn!(
                    room_id = %room_id,
                    sequence = update.sequence,
                    timeout_ms = ack_timeout.as_millis() as u64,
                    "Broadcast acknowledgment timed out"
                ),
            }
        }
        for event in &out.events {
            self.publisher.publish(room_id, event);
        }

        self.arm_timer();
        if self.flow.is_over() {
            *self.status.write() = RoomStatus::Finished;
            self.done.cancel();
        }
        self.schedule_bots();
    }

    fn arm_timer(&mut self) {
        let pending = self.flow.pending_timer();
        let unchanged = matches!(
            (self.timer, pending),
            (Some((current, _)), Some(next)) if current == next
        );
        if !unchanged {
            self.timer = pending.map(|t| (t, Instant::now() + t.delay));
        }
    }

    fn schedule_bots(&mut self) {
        let to_act = self.flow.bots_to_act();
        let idle: Vec<Seat> = self
            .tickets
            .keys()
            .copied()
            .filter(|seat| !to_act.contains(seat))
            .collect();
        for seat in idle {
            if let Some(ticket) = self.tickets.remove(&seat) {
                ticket.cancel();
            }
        }

        let config = self.flow.config().clone();
        for seat in to_act {
            if self.tickets.get(&seat).is_some_and(|t| !t.is_finished()) {
                continue;
            }
            let Some(bot) = self.bots.get(&seat) else {
                continue;
            };
            let request = BotRequest {
                room_id: self.flow.room_id(),
                seat,
                view: self.flow.view_for(seat),
                delay: thinking_delay(&mut self.bot_rng, config.bot_delay_min, config.bot_delay_max),
            };
            let ticket = spawn_bot(
                request,
                bot,
                self.commands_tx.clone(),
                self.cancel.child_token(),
            );
            self.tickets.insert(seat, ticket);
        }
    }

    fn note_failure(&mut self, err: &DomainError) {
        let reason = self
            .flow
            .failure()
            .map(str::to_owned)
            .unwrap_or_else(|| err.detail().to_owned());
        *self.status.write() = RoomStatus::Failed(reason);
    }

    /// Cancel bot work and reject whatever is still queued.
    fn teardown(&mut self) {
        let room_id = self.flow.room_id();
        self.cancel.cancel();
        for (_, ticket) in self.tickets.drain() {
            ticket.cancel();
        }

        {
            let mut status = self.status.write();
            if !matches!(*status, RoomStatus::Failed(_)) {
                *status = RoomStatus::Closed;
            }
        }
        let rejection = self.status.read().rejection(room_id);

        self.commands_rx.close();
        let mut rejected = 0usize;
        while let Ok(command) = self.commands_rx.try_recv() {
            match command {
                RoomCommand::Submit { reply, .. } | RoomCommand::Bot { reply, .. } => {
                    let _ = reply.send(ActionResult::rejected(&rejection, None));
                    rejected += 1;
                }
                RoomCommand::Snapshot { .. } | RoomCommand::View { .. } => {}
            }
        }
        self.done.cancel();
        let status = self.status.read().clone();
        info!(
            room_id = %room_id,
            status = ?status,
            rejected,
            version = self.flow.version(),
            "Room loop stopped"
        );
    }
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(at) => time::sleep_until(at).await,
        None => std::future::pending().await,
    }
}
