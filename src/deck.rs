//! Card pools and per-room decks.
//!
//! The prompt and answer pools are read from JSON once at process start
//! and deep-copied into every new room, so rooms never share mutable deck
//! state and the files are never re-read per room.

use crate::error::DeckError;
use crate::types::Card;
use rand::Rng;
use std::path::Path;

/// Process-wide snapshot of the card definitions.
#[derive(Debug, Clone)]
pub struct CardPools {
    pub prompts: Vec<Card>,
    pub answers: Vec<Card>,
}

impl CardPools {
    /// Load both pools from `<dir>/prompts.json` and `<dir>/answers.json`.
    pub fn load(dir: &Path) -> Result<Self, DeckError> {
        Ok(Self {
            prompts: load_pool(&dir.join("prompts.json"))?,
            answers: load_pool(&dir.join("answers.json"))?,
        })
    }
}

fn load_pool(path: &Path) -> Result<Vec<Card>, DeckError> {
    let raw = std::fs::read_to_string(path).map_err(|source| DeckError::Io {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| DeckError::Parse {
        path: path.display().to_string(),
        source,
    })
}

/// A shrinking draw pile with its discard pile.
#[derive(Debug, Clone, Default)]
pub struct Deck {
    pub cards: Vec<Card>,
    pub discard: Vec<Card>,
}

impl Deck {
    pub fn new(cards: Vec<Card>) -> Self {
        Self {
            cards,
            discard: Vec::new(),
        }
    }

    /// Remove and return one card chosen uniformly at random, or `None` if
    /// the pile is empty. Exactly one element leaves the pile.
    pub fn draw<R: Rng>(&mut self, rng: &mut R) -> Option<Card> {
        if self.cards.is_empty() {
            return None;
        }
        let idx = rng.random_range(0..self.cards.len());
        Some(self.cards.swap_remove(idx))
    }

    /// Move the entire discard pile back into the draw pile.
    pub fn refill_from_discard(&mut self) {
        self.cards.append(&mut self.discard);
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::io::Write;

    fn cards(n: usize) -> Vec<Card> {
        (0..n)
            .map(|i| Card {
                id: format!("c{i}"),
                text: format!("card {i}"),
            })
            .collect()
    }

    #[test]
    fn draw_removes_exactly_one_card() {
        let mut deck = Deck::new(cards(5));
        let mut rng = StdRng::seed_from_u64(42);

        let drawn = deck.draw(&mut rng).unwrap();
        assert_eq!(deck.cards.len(), 4);
        assert!(!deck.cards.iter().any(|c| c.id == drawn.id));
    }

    #[test]
    fn draw_from_empty_deck_is_none() {
        let mut deck = Deck::new(Vec::new());
        let mut rng = StdRng::seed_from_u64(0);
        assert!(deck.draw(&mut rng).is_none());
    }

    #[test]
    fn drawing_everything_loses_nothing() {
        let mut deck = Deck::new(cards(10));
        let mut rng = StdRng::seed_from_u64(7);

        let mut seen = std::collections::HashSet::new();
        while let Some(card) = deck.draw(&mut rng) {
            assert!(seen.insert(card.id), "duplicate card drawn");
        }
        assert_eq!(seen.len(), 10);
    }

    #[test]
    fn refill_moves_discard_back() {
        let mut deck = Deck::new(cards(2));
        let mut rng = StdRng::seed_from_u64(1);
        let a = deck.draw(&mut rng).unwrap();
        let b = deck.draw(&mut rng).unwrap();
        deck.discard.push(a);
        deck.discard.push(b);
        assert!(deck.is_empty());

        deck.refill_from_discard();
        assert_eq!(deck.cards.len(), 2);
        assert!(deck.discard.is_empty());
    }

    #[test]
    fn seeded_rng_draws_deterministically() {
        let mut a = Deck::new(cards(8));
        let mut b = Deck::new(cards(8));
        let mut rng_a = StdRng::seed_from_u64(99);
        let mut rng_b = StdRng::seed_from_u64(99);
        for _ in 0..8 {
            assert_eq!(a.draw(&mut rng_a), b.draw(&mut rng_b));
        }
    }

    #[test]
    fn load_pools_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        let prompts = r#"[{"id":"p1","text":"Warum ____?"}]"#;
        let answers = r#"[{"id":"a1","text":"Kaffee"},{"id":"a2","text":"Montage"}]"#;
        std::fs::File::create(dir.path().join("prompts.json"))
            .unwrap()
            .write_all(prompts.as_bytes())
            .unwrap();
        std::fs::File::create(dir.path().join("answers.json"))
            .unwrap()
            .write_all(answers.as_bytes())
            .unwrap();

        let pools = CardPools::load(dir.path()).unwrap();
        assert_eq!(pools.prompts.len(), 1);
        assert_eq!(pools.answers.len(), 2);
        assert_eq!(pools.prompts[0].id, "p1");
    }

    #[test]
    fn missing_pool_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = CardPools::load(dir.path()).unwrap_err();
        assert!(matches!(err, DeckError::Io { .. }));
    }

    #[test]
    fn malformed_pool_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("prompts.json"), "not json").unwrap();
        std::fs::write(dir.path().join("answers.json"), "[]").unwrap();
        let err = CardPools::load(dir.path()).unwrap_err();
        assert!(matches!(err, DeckError::Parse { .. }));
    }
}
