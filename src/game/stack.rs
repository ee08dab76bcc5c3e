//! Effect stack
//!
//! One frame per card being resolved. A frame may carry a prompt: the
//! decision currently being asked on that card's behalf and the
//! interpreter that validates answers to it. Only the top frame's prompt is
//! consulted; an inner play suspends the outer frame until it is popped.

use crate::core::CardId;
use crate::game::{Command, DecisionKind, GameState};
use crate::{KingdomError, Result};

/// Validates a participant's answer. `Err` carries the rejection reason
/// that is sent back before asking again.
pub type Interpreter = Box<dyn Fn(&GameState, &Command) -> std::result::Result<Command, String>>;

/// A pending sub-decision installed on a frame
pub struct Prompt {
    pub kind: DecisionKind,
    pub text: String,
    pub interpreter: Interpreter,
}

impl Prompt {
    pub fn new(
        kind: DecisionKind,
        text: impl Into<String>,
        interpreter: impl Fn(&GameState, &Command) -> std::result::Result<Command, String> + 'static,
    ) -> Self {
        Prompt {
            kind,
            text: text.into(),
            interpreter: Box::new(interpreter),
        }
    }
}

pub struct Frame {
    pub card: CardId,
    pub prompt: Option<Prompt>,
    /// The resolving copy has already moved itself to the trash
    pub trashed_self: bool,
}

impl std::fmt::Debug for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Frame")
            .field("card", &self.card)
            .field("prompt", &self.prompt.as_ref().map(|p| &p.text))
            .field("trashed_self", &self.trashed_self)
            .finish()
    }
}

#[derive(Debug, Default)]
pub struct EffectStack {
    frames: Vec<Frame>,
}

impl EffectStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, card: CardId) {
        self.frames.push(Frame {
            card,
            prompt: None,
            trashed_self: false,
        });
    }

    pub fn pop(&mut self) -> Option<Frame> {
        self.frames.pop()
    }

    pub fn top(&self) -> Option<&Frame> {
        self.frames.last()
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Install a prompt on the top frame, replacing any previous one
    pub fn set_prompt(&mut self, prompt: Prompt) -> Result<()> {
        match self.frames.last_mut() {
            Some(frame) => {
                frame.prompt = Some(prompt);
                Ok(())
            }
            None => Err(KingdomError::InvalidAction(format!(
                "no card is resolving to ask: {}",
                prompt.text
            ))),
        }
    }

    pub fn clear_prompt(&mut self) {
        if let Some(frame) = self.frames.last_mut() {
            frame.prompt = None;
        }
    }

    /// The top frame's prompt, if one is installed
    pub fn active_prompt(&self) -> Option<&Prompt> {
        self.top().and_then(|frame| frame.prompt.as_ref())
    }

    /// Mark the top frame's card as trashed. Returns the card the first
    /// time only; later calls for the same frame return `None`.
    pub fn take_self_trash(&mut self) -> Option<CardId> {
        let frame = self.frames.last_mut()?;
        if frame.trashed_self {
            return None;
        }
        frame.trashed_self = true;
        Some(frame.card)
    }

    /// Cards currently resolving, outermost first
    pub fn cards(&self) -> Vec<CardId> {
        self.frames.iter().map(|f| f.card).collect()
    }
}
