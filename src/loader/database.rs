//! Card catalog: the immutable registry of card definitions
//!
//! Built once at startup from one or more card sets and shared by `Arc`
//! between the game state, controllers and remote seats.

use crate::core::{Card, CardId, EffectFn, PlayerId, ReactionFn, ReactionOutcome, VpFn};
use crate::game::{GameLoop, GameState};
use crate::loader::card::{Bonus, CardLoader, CardSpec};
use crate::{KingdomError, Result};
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// A declarative table plus the behavior registered for its cards
///
/// Behavior maps are keyed by card name and may name cards from an earlier
/// set (an expansion can add an effect unit to a base card).
#[derive(Default)]
pub struct CardSet {
    pub name: &'static str,
    pub table: &'static str,
    pub effects: Vec<(&'static str, EffectFn)>,
    pub victory: Vec<(&'static str, VpFn)>,
    pub reactions: Vec<(&'static str, ReactionFn)>,
}

impl CardSet {
    pub fn new(name: &'static str, table: &'static str) -> Self {
        CardSet {
            name,
            table,
            ..Default::default()
        }
    }

    pub fn effect<F>(mut self, card: &'static str, f: F) -> Self
    where
        F: Fn(&mut GameLoop<'_>) -> Result<()> + Send + Sync + 'static,
    {
        self.effects.push((card, Arc::new(f)));
        self
    }

    pub fn victory<F>(mut self, card: &'static str, f: F) -> Self
    where
        F: Fn(&GameState, PlayerId) -> i32 + Send + Sync + 'static,
    {
        self.victory.push((card, Arc::new(f)));
        self
    }

    pub fn reaction<F>(mut self, card: &'static str, f: F) -> Self
    where
        F: Fn(&mut GameLoop<'_>, PlayerId) -> Result<ReactionOutcome> + Send + Sync + 'static,
    {
        self.reactions.push((card, Arc::new(f)));
        self
    }
}

/// Immutable name-keyed registry of card definitions
pub struct CardCatalog {
    cards: Vec<Card>,
    by_name: FxHashMap<String, CardId>,
}

impl CardCatalog {
    /// Look up a card by id. Ids are only ever handed out by this catalog.
    pub fn card(&self, id: CardId) -> &Card {
        &self.cards[id.index()]
    }

    pub fn get(&self, id: CardId) -> Option<&Card> {
        self.cards.get(id.index())
    }

    pub fn by_name(&self, name: &str) -> Option<CardId> {
        self.by_name.get(name).copied()
    }

    /// Like `by_name`, but an unknown name is an error
    pub fn lookup(&self, name: &str) -> Result<CardId> {
        self.by_name(name)
            .ok_or_else(|| KingdomError::UnknownCard(name.to_string()))
    }

    pub fn name(&self, id: CardId) -> &str {
        &self.card(id).name
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    /// Card names in id order. Two catalogs with equal name lists assign
    /// equal ids.
    pub fn names(&self) -> Vec<String> {
        self.cards.iter().map(|c| c.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

impl std::fmt::Debug for CardCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CardCatalog")
            .field("cards", &self.cards.len())
            .finish()
    }
}

/// Collects card sets and builds the catalog
#[derive(Default)]
pub struct CatalogBuilder {
    sets: Vec<CardSet>,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_set(mut self, set: CardSet) -> Self {
        self.sets.push(set);
        self
    }

    /// Parse every table and attach behavior
    ///
    /// Literal bonuses become effect units in row order; registered effects
    /// are appended after them in set order. A registered VP function
    /// overrides a literal `#n`.
    pub fn build(self) -> Result<CardCatalog> {
        let mut cards: Vec<Card> = Vec::new();
        let mut by_name = FxHashMap::default();

        for set in &self.sets {
            for spec in CardLoader::parse_table(set.table)? {
                if by_name.contains_key(&spec.name) {
                    return Err(KingdomError::DuplicateCard(spec.name));
                }
                let id = CardId::new(cards.len() as u32);
                by_name.insert(spec.name.clone(), id);
                cards.push(card_from_spec(id, spec));
            }
        }

        for set in self.sets {
            for (name, effect) in set.effects {
                let id = by_name
                    .get(name)
                    .ok_or_else(|| KingdomError::UnknownCard(format!("{name} (effect in {})", set.name)))?;
                let card = &mut cards[id.index()];
                card.effects.push(effect);
                card.custom_effect = true;
            }
            for (name, vp) in set.victory {
                let id = by_name
                    .get(name)
                    .ok_or_else(|| KingdomError::UnknownCard(format!("{name} (VP in {})", set.name)))?;
                let card = &mut cards[id.index()];
                card.vp = Some(vp);
                card.custom_vp = true;
            }
            for (name, reaction) in set.reactions {
                let id = by_name.get(name).ok_or_else(|| {
                    KingdomError::UnknownCard(format!("{name} (reaction in {})", set.name))
                })?;
                cards[id.index()].reaction = Some(reaction);
            }
        }

        Ok(CardCatalog { cards, by_name })
    }
}

fn card_from_spec(id: CardId, spec: CardSpec) -> Card {
    let mut card = Card::new(id, spec.name, spec.cost);
    card.kinds = spec.kinds;
    for bonus in spec.bonuses {
        card.effects.push(bonus_effect(bonus));
    }
    if let Some(points) = spec.vp {
        card.vp = Some(Arc::new(move |_: &GameState, _: PlayerId| points));
    }
    card
}

fn bonus_effect(bonus: Bonus) -> EffectFn {
    match bonus {
        Bonus::Coins(n) => Arc::new(move |gl: &mut GameLoop<'_>| {
            gl.add_coins(n);
            Ok(())
        }),
        Bonus::Actions(n) => Arc::new(move |gl: &mut GameLoop<'_>| {
            gl.add_actions(n);
            Ok(())
        }),
        Bonus::Buys(n) => Arc::new(move |gl: &mut GameLoop<'_>| {
            gl.add_buys(n);
            Ok(())
        }),
        Bonus::Cards(n) => Arc::new(move |gl: &mut GameLoop<'_>| {
            gl.add_cards(n as usize);
            Ok(())
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CardKind;

    const TABLE: &str = "
Copper,0,Treasure,$1
Estate,2,Victory,#1
Village,3,Action,+C1,+A2
Gardens,4,Victory
";

    #[test]
    fn test_build_catalog() {
        let catalog = CatalogBuilder::new()
            .add_set(CardSet::new("test", TABLE))
            .build()
            .unwrap();

        assert_eq!(catalog.len(), 4);
        let village = catalog.card(catalog.lookup("Village").unwrap());
        assert_eq!(village.cost, 3);
        assert!(village.has_kind(CardKind::Action));
        assert_eq!(village.effects.len(), 2);
        assert!(!village.has_custom_effect());

        let gardens = catalog.card(catalog.lookup("Gardens").unwrap());
        assert!(gardens.vp.is_none());
        assert!(catalog.by_name("Province").is_none());
        assert!(catalog.lookup("Province").is_err());
    }

    #[test]
    fn test_custom_behavior_is_attached() {
        let set = CardSet::new("test", TABLE)
            .effect("Village", |_| Ok(()))
            .victory("Estate", |_, _| 7);
        let catalog = CatalogBuilder::new().add_set(set).build().unwrap();

        let village = catalog.card(catalog.lookup("Village").unwrap());
        assert_eq!(village.effects.len(), 3);
        assert!(village.has_custom_effect());

        let estate = catalog.card(catalog.lookup("Estate").unwrap());
        assert!(estate.has_custom_vp());
    }

    #[test]
    fn test_duplicate_and_unknown_names() {
        let dup = CatalogBuilder::new()
            .add_set(CardSet::new("a", TABLE))
            .add_set(CardSet::new("b", "Copper,0,Treasure,$1"))
            .build();
        assert!(matches!(dup, Err(KingdomError::DuplicateCard(name)) if name == "Copper"));

        let unknown = CatalogBuilder::new()
            .add_set(CardSet::new("a", TABLE).effect("Smithy", |_| Ok(())))
            .build();
        assert!(matches!(unknown, Err(KingdomError::UnknownCard(_))));
    }

    #[test]
    fn test_ids_follow_load_order() {
        let catalog = CatalogBuilder::new()
            .add_set(CardSet::new("test", TABLE))
            .build()
            .unwrap();
        assert_eq!(catalog.lookup("Copper").unwrap(), CardId::new(0));
        assert_eq!(catalog.names(), vec!["Copper", "Estate", "Village", "Gardens"]);
    }
}
