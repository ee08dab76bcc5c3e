//! Choice protocol
//!
//! Effects ask participants for decisions through these primitives. Each
//! one installs a prompt on the top frame and goes through the same
//! `request_command` rendezvous as top-level commands; they differ only in
//! how answers are validated and accumulated.

use crate::core::{Card, CardId, PlayerId};
use crate::game::controller::{Command, DecisionKind};
use crate::game::stack::Prompt;
use crate::game::{GainDestination, GameLoop, GameState};
use crate::zones::Pile;
use crate::Result;
use std::rc::Rc;

type CardFilter = Rc<dyn Fn(&Card) -> std::result::Result<(), String>>;

/// Options for picking cards out of a list
#[derive(Clone)]
pub struct PickOptions {
    pub count: usize,
    /// Exactly `count` (after clamping) must be picked
    pub exact: bool,
    filter: Option<CardFilter>,
    prompt: String,
}

impl PickOptions {
    pub fn exactly(count: usize) -> Self {
        PickOptions {
            count,
            exact: true,
            filter: None,
            prompt: format!("pick {count}"),
        }
    }

    pub fn up_to(count: usize) -> Self {
        PickOptions {
            count,
            exact: false,
            filter: None,
            prompt: format!("pick up to {count}"),
        }
    }

    /// Restrict eligible cards; `reason` is the rejection message
    pub fn only(mut self, pred: impl Fn(&Card) -> bool + 'static, reason: &'static str) -> Self {
        self.filter = Some(Rc::new(move |card: &Card| {
            if pred(card) {
                Ok(())
            } else {
                Err(reason.to_string())
            }
        }));
        self
    }

    pub fn prompt(mut self, text: impl Into<String>) -> Self {
        self.prompt = text.into();
        self
    }

    fn accepts(&self, card: &Card) -> std::result::Result<(), String> {
        match &self.filter {
            Some(filter) => filter(card),
            None => Ok(()),
        }
    }
}

/// Options for picking a card from the supply
#[derive(Clone, Default)]
pub struct SupplyOptions {
    /// Highest effective cost allowed
    pub max_cost: Option<u32>,
    /// Cost must equal `max_cost` exactly
    pub exact_cost: bool,
    filter: Option<CardFilter>,
    /// Empty piles may be named too
    pub allow_any: bool,
    /// The participant may decline
    pub allow_none: bool,
    prompt: String,
}

impl SupplyOptions {
    pub fn costing_up_to(max_cost: u32) -> Self {
        SupplyOptions {
            max_cost: Some(max_cost),
            prompt: format!("gain a card costing up to ${max_cost}"),
            ..Default::default()
        }
    }

    pub fn costing_exactly(cost: u32) -> Self {
        SupplyOptions {
            max_cost: Some(cost),
            exact_cost: true,
            prompt: format!("gain a card costing exactly ${cost}"),
            ..Default::default()
        }
    }

    pub fn any() -> Self {
        SupplyOptions {
            allow_any: true,
            prompt: "name a card".to_string(),
            ..Default::default()
        }
    }

    pub fn only(mut self, pred: impl Fn(&Card) -> bool + 'static, reason: &'static str) -> Self {
        self.filter = Some(Rc::new(move |card: &Card| {
            if pred(card) {
                Ok(())
            } else {
                Err(reason.to_string())
            }
        }));
        self
    }

    pub fn optional(mut self) -> Self {
        self.allow_none = true;
        self
    }

    pub fn prompt(mut self, text: impl Into<String>) -> Self {
        self.prompt = text.into();
        self
    }
}

/// Why `card` is not an acceptable supply pick, if anything
fn check_supply_pick(
    game: &GameState,
    opts: &SupplyOptions,
    card: CardId,
) -> std::result::Result<(), String> {
    let Some(pile) = game.supply.pile(card) else {
        return Err("not in supply".to_string());
    };
    let cost = game.cost(card);
    if let Some(max) = opts.max_cost {
        if opts.exact_cost && cost != max {
            return Err(format!("must cost exactly ${max}"));
        }
        if cost > max {
            return Err("too expensive".to_string());
        }
    }
    if !opts.allow_any && pile.remaining == 0 {
        return Err("supply exhausted".to_string());
    }
    match &opts.filter {
        Some(filter) => filter(game.card(card)),
        None => Ok(()),
    }
}

impl<'a> GameLoop<'a> {
    /// Install `prompt` on the top frame and ask `player` once
    pub fn ask(&mut self, player: PlayerId, prompt: Prompt) -> Result<Command> {
        self.stack.set_prompt(prompt)?;
        let answer = self.request_command(player);
        self.stack.clear_prompt();
        answer
    }

    /// Partition `list` into (picked, rest), asking `player` to pick
    ///
    /// The requested count is clamped to the number of eligible members.
    /// An exact request is settled without asking when there is nothing to
    /// decide: every eligible member is the same card, or exactly as many
    /// are eligible as still need picking.
    pub fn split(
        &mut self,
        list: Vec<CardId>,
        player: PlayerId,
        opts: PickOptions,
    ) -> Result<(Vec<CardId>, Vec<CardId>)> {
        let mut rest = list;
        let mut picked = Vec::new();
        let eligible_count = rest
            .iter()
            .filter(|&&c| opts.accepts(self.game.card(c)).is_ok())
            .count();
        let mut remaining = opts.count.min(eligible_count);

        while remaining > 0 {
            let eligible: Vec<CardId> = rest
                .iter()
                .copied()
                .filter(|&c| opts.accepts(self.game.card(c)).is_ok())
                .collect();

            let forced = eligible.len() == remaining || eligible.iter().all(|&c| c == eligible[0]);
            if opts.exact && forced {
                for &card in &eligible[..remaining] {
                    if let Some(pos) = rest.iter().position(|&c| c == card) {
                        rest.remove(pos);
                    }
                    picked.push(card);
                }
                self.game.logger.verbose(&format!(
                    "{} must pick {remaining}: forced",
                    self.game.player_name(player)
                ));
                break;
            }

            let candidates = rest.clone();
            let filter = opts.clone();
            let exact = opts.exact;
            let prompt = Prompt::new(
                DecisionKind::PickCards {
                    candidates: rest.clone(),
                    eligible,
                    remaining,
                    exact,
                },
                opts.prompt.clone(),
                move |game, command| match command {
                    Command::Pick(card) => {
                        if !candidates.contains(card) {
                            return Err("invalid choice".to_string());
                        }
                        filter.accepts(game.card(*card))?;
                        Ok(*command)
                    }
                    Command::Done if exact => Err("must pick a card".to_string()),
                    Command::Done => Ok(Command::Done),
                    _ => Err("pick a card, or done".to_string()),
                },
            );

            match self.ask(player, prompt)? {
                Command::Pick(card) => {
                    if let Some(pos) = rest.iter().position(|&c| c == card) {
                        rest.remove(pos);
                    }
                    picked.push(card);
                    remaining -= 1;
                }
                _ => break,
            }
        }

        Ok((picked, rest))
    }

    /// Pick cards out of `player`'s hand; the picks leave the hand
    pub fn pick_hand(&mut self, player: PlayerId, opts: PickOptions) -> Result<Vec<CardId>> {
        let hand = self.game.player(player).hand.to_vec();
        let (picked, rest) = self.split(hand, player, opts)?;
        self.game.player_mut(player).hand = Pile::from(rest);
        Ok(picked)
    }

    /// Ask `player` to name a supply card
    ///
    /// Returns None if nothing qualifies or the player declines. A single
    /// qualifying card is chosen without asking unless declining is allowed.
    pub fn pick_supply(&mut self, player: PlayerId, opts: SupplyOptions) -> Result<Option<CardId>> {
        let game: &GameState = self.game;
        let options: Vec<CardId> = game
            .supply
            .cards()
            .filter(|&c| check_supply_pick(game, &opts, c).is_ok())
            .collect();

        if options.is_empty() {
            return Ok(None);
        }
        if options.len() == 1 && !opts.allow_none {
            return Ok(Some(options[0]));
        }

        let allow_none = opts.allow_none;
        let text = opts.prompt.clone();
        let prompt = Prompt::new(
            DecisionKind::PickSupply {
                options,
                allow_none,
            },
            text,
            move |game, command| match command {
                Command::Pick(card) => {
                    check_supply_pick(game, &opts, *card)?;
                    Ok(*command)
                }
                Command::Done if allow_none => Ok(Command::Done),
                Command::Done => Err("must pick a card".to_string()),
                _ => Err("expected card".to_string()),
            },
        );

        match self.ask(player, prompt)? {
            Command::Pick(card) => Ok(Some(card)),
            _ => Ok(None),
        }
    }

    /// Pick a card costing up to `max_cost` and gain it to `dest`
    pub fn gain_from_supply(
        &mut self,
        player: PlayerId,
        opts: SupplyOptions,
        dest: GainDestination,
    ) -> Result<Option<CardId>> {
        let Some(card) = self.pick_supply(player, opts)? else {
            return Ok(None);
        };
        self.gain_to(player, card, dest)?;
        Ok(Some(card))
    }

    /// "Gain a card costing up to $N" for the active player
    pub fn pick_gain(&mut self, max_cost: u32) -> Result<Option<CardId>> {
        let player = self.active();
        self.gain_from_supply(
            player,
            SupplyOptions::costing_up_to(max_cost),
            GainDestination::Discard,
        )
    }

    /// `Yes` is true, `Done` is false
    pub fn ask_yes_no(&mut self, player: PlayerId, text: impl Into<String>) -> Result<bool> {
        let prompt = Prompt::new(DecisionKind::YesNo, text, |_, command| match command {
            Command::Yes | Command::Done => Ok(*command),
            _ => Err("yes or no".to_string()),
        });
        Ok(self.ask(player, prompt)? == Command::Yes)
    }

    /// Choose `count` distinct entries of a numbered menu
    ///
    /// Returns the chosen indices in listed order, so effects run in the
    /// order the card lists them.
    pub fn choose_menu(
        &mut self,
        player: PlayerId,
        options: &[&str],
        count: usize,
    ) -> Result<Vec<usize>> {
        let want = count.min(options.len());
        let labels: Vec<String> = options.iter().map(|s| s.to_string()).collect();
        let mut chosen: Vec<usize> = Vec::new();

        while chosen.len() < want {
            let taken = chosen.clone();
            let len = labels.len();
            let prompt = Prompt::new(
                DecisionKind::Menu {
                    options: labels.clone(),
                    remaining: want - chosen.len(),
                    chosen: chosen.clone(),
                },
                format!("choose {}", want - chosen.len()),
                move |_, command| match command {
                    Command::Option(i) if *i >= len => Err("enter a number within range".to_string()),
                    Command::Option(i) if taken.contains(i) => Err(format!("already chosen {}", i + 1)),
                    Command::Option(_) => Ok(*command),
                    _ => Err("enter a number".to_string()),
                },
            );
            if let Command::Option(i) = self.ask(player, prompt)? {
                chosen.push(i);
            }
        }

        chosen.sort_unstable();
        Ok(chosen)
    }
}
