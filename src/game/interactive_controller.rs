//! Interactive console controller for human players
//!
//! Input is a program of single-key tokens, read a line at a time. A line
//! may hold several tokens (`*e.` plays every treasure, buys a Province and
//! ends the turn); tokens left over after one command answer the next
//! request. When a command is rejected the rest of the line is dropped and
//! the offending token is marked with a caret.
//!
//! Keys:
//! - a supply key names a card: play it, buy it in buy mode, or pick it
//! - `+` or `;` toggles buy mode; `*` plays every treasure in hand
//! - `.` advances the phase, or ends/declines a choice
//! - `\` or `y` answers yes; digits pick menu entries
//! - `?` shows the supply and your hand; end of input quits

use crate::core::{CardId, PlayerId};
use crate::game::controller::{Command, DecisionKind, DecisionRequest, GameStateView, PlayerController};
use crate::game::{GameEvent, GameReport, Phase};
use crate::loader::CardCatalog;
use crate::Result;
use std::io::{self, BufRead, BufReader, Stdin, Stdout, Write};
use std::sync::Arc;

/// A controller that reads key programs from `input` and writes to `output`
pub struct InteractiveController<R, W> {
    player_id: PlayerId,
    catalog: Arc<CardCatalog>,
    input: R,
    output: W,
    /// Current line of tokens
    prog: Vec<char>,
    /// Next token to read
    pos: usize,
    /// Token that produced the last command
    token: usize,
    buy_mode: bool,
    /// Play treasures until none are left
    wild_card: bool,
    names: Vec<String>,
}

impl InteractiveController<BufReader<Stdin>, Stdout> {
    /// Console controller on stdin/stdout
    pub fn stdio(player_id: PlayerId, catalog: Arc<CardCatalog>) -> Self {
        Self::new(player_id, catalog, BufReader::new(io::stdin()), io::stdout())
    }
}

impl<R: BufRead, W: Write> InteractiveController<R, W> {
    pub fn new(player_id: PlayerId, catalog: Arc<CardCatalog>, input: R, output: W) -> Self {
        InteractiveController {
            player_id,
            catalog,
            input,
            output,
            prog: Vec::new(),
            pos: 0,
            token: 0,
            buy_mode: false,
            wild_card: false,
            names: Vec::new(),
        }
    }

    /// Consume the controller, returning the output sink
    pub fn into_output(self) -> W {
        self.output
    }

    fn name_of(&self, player: PlayerId) -> String {
        self.names
            .get(player.index())
            .cloned()
            .unwrap_or_else(|| format!("Player {player}"))
    }

    fn has_treasure(&self, view: &GameStateView) -> bool {
        view.hand.iter().any(|&c| self.catalog.card(c).is_treasure())
    }

    fn label(&self, view: &GameStateView, card: CardId) -> String {
        match view.key_of(card) {
            Some(key) => format!("[{key}] {}", self.catalog.name(card)),
            None => self.catalog.name(card).to_string(),
        }
    }

    fn dump(&mut self, view: &GameStateView) -> io::Result<()> {
        for (i, entry) in view.supply.iter().enumerate() {
            write!(
                self.output,
                "  [{}] {}({}) ${}",
                entry.key,
                self.catalog.name(entry.card),
                entry.remaining,
                entry.cost
            )?;
            if i % 3 == 2 {
                writeln!(self.output)?;
            }
        }
        writeln!(self.output)?;
        writeln!(self.output, "Player/Deck/Hand/Discard")?;
        for p in &view.players {
            write!(self.output, "{}/{}/{}/{}", p.name, p.deck, p.hand, p.discard)?;
            if let Some(top) = p.discard_top {
                write!(self.output, ":{}", self.catalog.name(top))?;
            }
            writeln!(self.output)?;
        }
        self.dump_hand(view)
    }

    fn dump_hand(&mut self, view: &GameStateView) -> io::Result<()> {
        let hand: Vec<String> = view.hand.iter().map(|&c| self.label(view, c)).collect();
        writeln!(self.output, "Hand:")?;
        for row in hand.chunks(5) {
            writeln!(self.output, " {}", row.join(" "))?;
        }
        if !view.played.is_empty() {
            let played: Vec<&str> = view.played.iter().map(|&c| self.catalog.name(c)).collect();
            writeln!(self.output, "Played: {}", played.join(" "))?;
        }
        Ok(())
    }

    fn show_request(&mut self, view: &GameStateView, request: &DecisionRequest) -> io::Result<()> {
        match &request.kind {
            DecisionKind::Turn { .. } => Ok(()),
            DecisionKind::Menu { options, chosen, .. } => {
                writeln!(self.output, "{}", request.prompt)?;
                for (i, option) in options.iter().enumerate() {
                    if !chosen.contains(&i) {
                        writeln!(self.output, "[{}] {option}", i + 1)?;
                    }
                }
                Ok(())
            }
            DecisionKind::PickCards { candidates, .. } => {
                let labels: Vec<String> = candidates.iter().map(|&c| self.label(view, c)).collect();
                writeln!(self.output, "{}: {}", request.prompt, labels.join(" "))
            }
            _ => writeln!(self.output, "{}", request.prompt),
        }
    }

    /// Next token, reading a fresh line when the current one is used up.
    /// None at end of input.
    fn next_token(&mut self, view: &GameStateView, request: &DecisionRequest) -> Result<Option<char>> {
        while self.pos >= self.prog.len() {
            self.show_request(view, request)?;
            let me = self.name_of(self.player_id);
            write!(
                self.output,
                "a:{} b:{} c:{} {me}",
                view.actions, view.buys, view.coins
            )?;
            if let Some(card) = request.card {
                write!(self.output, " {}", self.catalog.name(card))?;
            }
            write!(self.output, "> ")?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            self.prog = line.trim_end_matches(['\n', '\r']).chars().collect();
            self.pos = 0;
        }
        self.token = self.pos;
        self.pos += 1;
        Ok(self.prog.get(self.token).copied())
    }

    /// Translate a token while no card is resolving. `Ok(None)` means the
    /// token only changed a mode.
    fn parse_turn(&mut self, token: char, view: &GameStateView) -> std::result::Result<Option<Command>, String> {
        match token {
            '+' | ';' => {
                if view.phase != Phase::Buy {
                    return Err("wrong phase".to_string());
                }
                if self.has_treasure(view) {
                    self.buy_mode = !self.buy_mode;
                }
                Ok(None)
            }
            '.' => Ok(Some(Command::Advance)),
            '*' => {
                if view.phase != Phase::Buy {
                    return Err("wrong phase".to_string());
                }
                self.wild_card = true;
                Ok(None)
            }
            key => {
                let card = view
                    .card_by_key(key)
                    .ok_or_else(|| "unrecognized command".to_string())?;
                if self.buy_mode {
                    Ok(Some(Command::Buy(card)))
                } else {
                    Ok(Some(Command::Play(card)))
                }
            }
        }
    }

    /// Translate a token for a sub-decision
    fn parse_choice(
        &self,
        token: char,
        view: &GameStateView,
        request: &DecisionRequest,
    ) -> std::result::Result<Command, String> {
        match &request.kind {
            DecisionKind::YesNo => match token {
                '\\' | 'y' => Ok(Command::Yes),
                '.' => Ok(Command::Done),
                _ => Err("\\ for yes, . for no".to_string()),
            },
            DecisionKind::Menu { options, .. } => match token.to_digit(10) {
                Some(d) if d >= 1 && (d as usize) <= options.len() => {
                    Ok(Command::Option(d as usize - 1))
                }
                _ => Err("enter digit within range".to_string()),
            },
            _ => match token {
                '.' => Ok(Command::Done),
                key => view
                    .card_by_key(key)
                    .map(Command::Pick)
                    .ok_or_else(|| "unrecognized card".to_string()),
            },
        }
    }

    /// Report a bad token, drop the rest of the line
    fn complain(&mut self, reason: &str) -> io::Result<()> {
        let line: String = self.prog.iter().collect();
        writeln!(self.output, "Error: {reason}")?;
        writeln!(self.output, "  {line}")?;
        writeln!(self.output, "  {}^", " ".repeat(self.token))?;
        self.prog.clear();
        self.pos = 0;
        Ok(())
    }
}

impl<R: BufRead, W: Write> PlayerController for InteractiveController<R, W> {
    fn player_id(&self) -> PlayerId {
        self.player_id
    }

    fn next_command(&mut self, view: &GameStateView, request: &DecisionRequest) -> Result<Command> {
        self.names = view.players.iter().map(|p| p.name.clone()).collect();

        if request.is_turn() {
            let has_action = view.hand.iter().any(|&c| self.catalog.card(c).is_action());
            if view.phase == Phase::Action && !has_action {
                return Ok(Command::Advance);
            }
            if view.phase != Phase::Buy {
                self.buy_mode = false;
            } else if !self.has_treasure(view) {
                self.buy_mode = true;
            }
        }

        loop {
            if self.wild_card {
                if request.is_turn() && view.phase == Phase::Buy {
                    let treasure = view
                        .hand
                        .iter()
                        .rev()
                        .find(|&&c| self.catalog.card(c).is_treasure());
                    if let Some(&card) = treasure {
                        return Ok(Command::Play(card));
                    }
                }
                self.wild_card = false;
            }

            let Some(token) = self.next_token(view, request)? else {
                writeln!(self.output, "\nQuitting game...")?;
                return Ok(Command::Quit);
            };
            match token {
                ' ' | '\t' => continue,
                '?' => {
                    self.dump(view)?;
                    continue;
                }
                _ => {}
            }

            let parsed = if request.is_turn() {
                self.parse_turn(token, view)
            } else {
                self.parse_choice(token, view, request).map(Some)
            };
            match parsed {
                Ok(Some(command)) => return Ok(command),
                Ok(None) => {}
                Err(reason) => self.complain(&reason)?,
            }
        }
    }

    fn on_event(&mut self, event: &GameEvent) {
        let name = self.name_of(event.player());
        let line = match event {
            GameEvent::Draw { count, .. } => format!("{name} draws {count} cards"),
            GameEvent::Gain { card, .. } => format!("{name} gains {}", self.catalog.name(*card)),
            GameEvent::Trash { card, .. } => format!("{name} trashes {}", self.catalog.name(*card)),
            GameEvent::Discard { count, .. } => format!("{name} discards {count} cards"),
            GameEvent::DiscardDeck { count, .. } => {
                format!("{name} discards deck; {count} cards")
            }
            GameEvent::Reveal { card, .. } => format!("{name} reveals {}", self.catalog.name(*card)),
            GameEvent::Play { card, .. } => format!("{name} plays {}", self.catalog.name(*card)),
            GameEvent::Buy { card, .. } => format!("{name} buys {}", self.catalog.name(*card)),
            GameEvent::Phase { player, phase } if *player == self.player_id => {
                format!("--- {phase} phase ---")
            }
            GameEvent::Phase { .. } => return,
        };
        let _ = writeln!(self.output, "{line}");
    }

    fn on_rejected(&mut self, _command: &Command, reason: &str) {
        let _ = self.complain(reason);
    }

    fn on_game_end(&mut self, report: &GameReport) {
        for score in &report.scores {
            let _ = writeln!(self.output, "{}: {}", score.name, score.total);
        }
        let _ = match report.winner {
            Some(p) => {
                let name = self.name_of(p);
                writeln!(self.output, "{name} wins")
            }
            None => writeln!(self.output, "Tie"),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::standard_catalog;
    use crate::game::GameState;
    use std::io::Cursor;

    fn setup() -> (GameState, Arc<CardCatalog>) {
        let catalog = Arc::new(standard_catalog().unwrap());
        let names = vec!["Alice".to_string(), "Bob".to_string()];
        let mut game = GameState::new(Arc::clone(&catalog), &names, 0);
        for (name, key) in [("Copper", '1'), ("Silver", '2'), ("Estate", 'q'), ("Village", 'a')] {
            let id = game.card_id(name).unwrap();
            game.supply.add(id, key, 10);
        }
        (game, catalog)
    }

    fn turn(phase: Phase) -> DecisionRequest {
        DecisionRequest {
            player: PlayerId::new(0),
            kind: DecisionKind::Turn { phase },
            card: None,
            prompt: String::new(),
        }
    }

    #[test]
    fn test_token_program_spans_requests() {
        let (mut game, catalog) = setup();
        let copper = game.card_id("Copper").unwrap();
        let silver = game.card_id("Silver").unwrap();
        game.players[0].hand.extend([copper, copper]);
        game.turn.phase = Phase::Buy;

        let input = Cursor::new("*2.\n");
        let mut tui = InteractiveController::new(PlayerId::new(0), catalog, input, Vec::new());

        let view = GameStateView::new(&game, PlayerId::new(0));
        assert_eq!(tui.next_command(&view, &turn(Phase::Buy)).unwrap(), Command::Play(copper));
        game.players[0].hand.remove(copper);
        let view = GameStateView::new(&game, PlayerId::new(0));
        assert_eq!(tui.next_command(&view, &turn(Phase::Buy)).unwrap(), Command::Play(copper));
        game.players[0].hand.clear();
        let view = GameStateView::new(&game, PlayerId::new(0));
        // No treasure left: buy mode is automatic
        assert_eq!(tui.next_command(&view, &turn(Phase::Buy)).unwrap(), Command::Buy(silver));
        assert_eq!(tui.next_command(&view, &turn(Phase::Buy)).unwrap(), Command::Advance);
        // End of input
        assert_eq!(tui.next_command(&view, &turn(Phase::Buy)).unwrap(), Command::Quit);
    }

    #[test]
    fn test_bad_token_is_marked() {
        let (mut game, catalog) = setup();
        let village = game.card_id("Village").unwrap();
        game.players[0].hand.add(village);

        let input = Cursor::new("a%a\na\n");
        let mut tui = InteractiveController::new(PlayerId::new(0), catalog, input, Vec::new());
        let view = GameStateView::new(&game, PlayerId::new(0));

        assert_eq!(tui.next_command(&view, &turn(Phase::Action)).unwrap(), Command::Play(village));
        // '%' is no key; the rest of the line is dropped
        assert_eq!(tui.next_command(&view, &turn(Phase::Action)).unwrap(), Command::Play(village));
        assert_eq!(tui.next_command(&view, &turn(Phase::Action)).unwrap(), Command::Quit);

        let out = String::from_utf8(tui.into_output()).unwrap();
        assert!(out.contains("Error: unrecognized command\n  a%a\n   ^\n"));
    }

    #[test]
    fn test_choice_tokens() {
        let (game, catalog) = setup();
        let estate = game.card_id("Estate").unwrap();
        let input = Cursor::new("q.\n3\\\n");
        let mut tui = InteractiveController::new(PlayerId::new(0), catalog, input, Vec::new());
        let view = GameStateView::new(&game, PlayerId::new(0));

        let pick = DecisionRequest {
            player: PlayerId::new(0),
            kind: DecisionKind::PickCards {
                candidates: vec![estate],
                eligible: vec![estate],
                remaining: 1,
                exact: false,
            },
            card: None,
            prompt: "trash up to 1".to_string(),
        };
        assert_eq!(tui.next_command(&view, &pick).unwrap(), Command::Pick(estate));
        assert_eq!(tui.next_command(&view, &pick).unwrap(), Command::Done);

        let menu = DecisionRequest {
            kind: DecisionKind::Menu {
                options: vec!["a".into(), "b".into(), "c".into()],
                remaining: 1,
                chosen: vec![],
            },
            ..pick.clone()
        };
        assert_eq!(tui.next_command(&view, &menu).unwrap(), Command::Option(2));
        let yes_no = DecisionRequest {
            kind: DecisionKind::YesNo,
            ..pick
        };
        assert_eq!(tui.next_command(&view, &yes_no).unwrap(), Command::Yes);
    }
}
