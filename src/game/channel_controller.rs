//! Mailbox-driven participants
//!
//! A `ChannelController` sits in the engine's seat and forwards everything
//! to a participant running on its own thread. Requests carry a one-shot
//! reply slot; the engine blocks on it, so there is never more than one
//! outstanding decision. Notifications are fire-and-forget.

use crate::core::PlayerId;
use crate::game::controller::{Command, DecisionRequest, GameStateView, PlayerController};
use crate::game::{GameEvent, GameReport};
use crate::{KingdomError, Result};
use std::thread::JoinHandle;
use tokio::sync::{mpsc, oneshot};

/// What the engine sends to a participant's mailbox
#[derive(Debug)]
pub enum Mail {
    Decide {
        view: GameStateView,
        request: DecisionRequest,
        reply: oneshot::Sender<Result<Command>>,
    },
    Event(GameEvent),
    Rejected { command: Command, reason: String },
    GameOver(GameReport),
}

/// Engine-side proxy for a participant behind a mailbox
pub struct ChannelController {
    player_id: PlayerId,
    mailbox: mpsc::UnboundedSender<Mail>,
}

impl ChannelController {
    pub fn new(player_id: PlayerId, mailbox: mpsc::UnboundedSender<Mail>) -> Self {
        ChannelController { player_id, mailbox }
    }

    fn post(&self, mail: Mail) {
        // A participant that already left only misses notifications
        let _ = self.mailbox.send(mail);
    }
}

impl PlayerController for ChannelController {
    fn player_id(&self) -> PlayerId {
        self.player_id
    }

    fn next_command(&mut self, view: &GameStateView, request: &DecisionRequest) -> Result<Command> {
        let (reply, answer) = oneshot::channel();
        self.mailbox
            .send(Mail::Decide {
                view: view.clone(),
                request: request.clone(),
                reply,
            })
            .map_err(|_| {
                KingdomError::ProtocolViolation(format!("player {} mailbox closed", self.player_id))
            })?;
        answer.blocking_recv().map_err(|_| {
            KingdomError::ProtocolViolation(format!("player {} left without answering", self.player_id))
        })?
    }

    fn on_event(&mut self, event: &GameEvent) {
        self.post(Mail::Event(event.clone()));
    }

    fn on_rejected(&mut self, command: &Command, reason: &str) {
        self.post(Mail::Rejected {
            command: *command,
            reason: reason.to_string(),
        });
    }

    fn on_game_end(&mut self, report: &GameReport) {
        self.post(Mail::GameOver(report.clone()));
    }
}

/// Serve `participant`'s mailbox until the game is over or the engine
/// hangs up. Returns the participant for inspection.
pub fn run_participant<C: PlayerController>(
    mut participant: C,
    mut mailbox: mpsc::UnboundedReceiver<Mail>,
) -> C {
    while let Some(mail) = mailbox.blocking_recv() {
        match mail {
            Mail::Decide {
                view,
                request,
                reply,
            } => {
                let _ = reply.send(participant.next_command(&view, &request));
            }
            Mail::Event(event) => participant.on_event(&event),
            Mail::Rejected { command, reason } => participant.on_rejected(&command, &reason),
            Mail::GameOver(report) => {
                participant.on_game_end(&report);
                break;
            }
        }
    }
    participant
}

/// Move `participant` onto its own thread and return the proxy for its seat
pub fn spawn_participant<C>(participant: C) -> (ChannelController, JoinHandle<C>)
where
    C: PlayerController + Send + 'static,
{
    let (tx, rx) = mpsc::unbounded_channel();
    let player_id = participant.player_id();
    let handle = std::thread::spawn(move || run_participant(participant, rx));
    (ChannelController::new(player_id, tx), handle)
}
