//! Card table row parser
//!
//! One card per line: `Name,cost,Kind[-Kind...][,bonus...]`, where a bonus
//! is `$n` (coins), `+An` (actions), `+Bn` (buys), `+Cn` (cards) or `#n`
//! (fixed victory points).

use crate::core::CardKind;
use crate::{KingdomError, Result};
use smallvec::SmallVec;

/// A literal numeric bonus from the card table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bonus {
    Coins(u32),
    Actions(u32),
    Buys(u32),
    Cards(u32),
}

/// One parsed table row, before any behavior is attached
#[derive(Debug, Clone, PartialEq)]
pub struct CardSpec {
    pub name: String,
    pub cost: u32,
    pub kinds: SmallVec<[CardKind; 2]>,
    /// Literal bonuses in row order
    pub bonuses: Vec<Bonus>,
    /// Fixed victory points (`#n`), may be negative
    pub vp: Option<i32>,
}

/// Card table parser
pub struct CardLoader;

impl CardLoader {
    /// Parse a whole table, skipping blank lines
    pub fn parse_table(table: &str) -> Result<Vec<CardSpec>> {
        table
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(Self::parse_line)
            .collect()
    }

    /// Parse a single row
    pub fn parse_line(line: &str) -> Result<CardSpec> {
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        if fields.len() < 3 {
            return Err(KingdomError::InvalidCardFormat(format!(
                "expected name, cost and kinds: {line}"
            )));
        }

        let name = fields[0];
        if name.is_empty() {
            return Err(KingdomError::InvalidCardFormat(format!("missing name: {line}")));
        }

        let cost = fields[1].parse::<u32>().map_err(|_| {
            KingdomError::InvalidCardFormat(format!("bad cost {:?}: {line}", fields[1]))
        })?;

        let mut kinds = SmallVec::new();
        for kind in fields[2].split('-') {
            kinds.push(kind.parse::<CardKind>()?);
        }

        let mut bonuses = Vec::new();
        let mut vp = None;
        for field in &fields[3..] {
            let bad = || KingdomError::InvalidCardFormat(format!("bad bonus {field:?}: {line}"));
            if let Some(n) = field.strip_prefix('$') {
                bonuses.push(Bonus::Coins(n.parse().map_err(|_| bad())?));
            } else if let Some(n) = field.strip_prefix('#') {
                vp = Some(n.parse::<i32>().map_err(|_| bad())?);
            } else if let Some(rest) = field.strip_prefix('+') {
                let mut chars = rest.chars();
                let which = chars.next().ok_or_else(bad)?;
                let n: u32 = chars.as_str().parse().map_err(|_| bad())?;
                bonuses.push(match which {
                    'A' => Bonus::Actions(n),
                    'B' => Bonus::Buys(n),
                    'C' => Bonus::Cards(n),
                    _ => return Err(bad()),
                });
            } else {
                return Err(bad());
            }
        }

        Ok(CardSpec {
            name: name.to_string(),
            cost,
            kinds,
            bonuses,
            vp,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_market() {
        let spec = CardLoader::parse_line("Market,5,Action,+C1,+A1,+B1,$1").unwrap();
        assert_eq!(spec.name, "Market");
        assert_eq!(spec.cost, 5);
        assert_eq!(spec.kinds.as_slice(), &[CardKind::Action]);
        assert_eq!(
            spec.bonuses,
            vec![Bonus::Cards(1), Bonus::Actions(1), Bonus::Buys(1), Bonus::Coins(1)]
        );
        assert_eq!(spec.vp, None);
    }

    #[test]
    fn test_parse_multi_kind_with_vp() {
        let spec = CardLoader::parse_line("Great Hall,3,Action-Victory,+C1,+A1,#1").unwrap();
        assert_eq!(spec.kinds.as_slice(), &[CardKind::Action, CardKind::Victory]);
        assert_eq!(spec.vp, Some(1));

        let curse = CardLoader::parse_line("Curse,0,Curse,#-1").unwrap();
        assert_eq!(curse.vp, Some(-1));
    }

    #[test]
    fn test_parse_errors() {
        assert!(CardLoader::parse_line("Village,3").is_err());
        assert!(CardLoader::parse_line("Village,x,Action").is_err());
        assert!(CardLoader::parse_line("Haven,2,Action-Duration").is_err());
        assert!(CardLoader::parse_line("Village,3,Action,+Z1").is_err());
        assert!(CardLoader::parse_line("Village,3,Action,%2").is_err());
    }

    #[test]
    fn test_parse_table_skips_blank_lines() {
        let specs = CardLoader::parse_table("\nCopper,0,Treasure,$1\n\nEstate,2,Victory,#1\n").unwrap();
        assert_eq!(specs.len(), 2);
        assert_eq!(specs[1].name, "Estate");
    }
}
