// SPDX-License-Identifier: MIT OR Apache-2.0
//! Mini-game registry consumed by the random selection at drag start.

use crate::error::{Result, SequencerError};
use indexmap::IndexMap;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Mini-game identifier (also the route segment)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GameId(pub String);

impl GameId {
    /// Create a game id
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw id
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A registry entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    /// Unique id
    pub id: GameId,
    /// Name shown to the player
    pub display_name: String,
}

impl Game {
    /// Create a registry entry
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: GameId::new(id),
            display_name: display_name.into(),
        }
    }

    /// Navigation route for this game
    pub fn route(&self) -> String {
        format!("/game/{}", self.id)
    }
}

/// Ordered, non-empty set of mini-games
#[derive(Debug, Clone)]
pub struct GameRegistry {
    games: IndexMap<GameId, Game>,
}

impl GameRegistry {
    /// Build a registry, rejecting empty lists and duplicate ids
    pub fn new(games: impl IntoIterator<Item = Game>) -> Result<Self> {
        let mut map = IndexMap::new();
        for game in games {
            if map.contains_key(&game.id) {
                return Err(SequencerError::DuplicateGame(game.id.0));
            }
            map.insert(game.id.clone(), game);
        }

        if map.is_empty() {
            return Err(SequencerError::EmptyRegistry);
        }

        Ok(Self { games: map })
    }

    /// Look up a game by id
    pub fn get(&self, id: &GameId) -> Option<&Game> {
        self.games.get(id)
    }

    /// All games in registration order
    pub fn games(&self) -> impl Iterator<Item = &Game> {
        self.games.values()
    }

    /// Number of games
    pub fn len(&self) -> usize {
        self.games.len()
    }

    /// Always false; kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    /// Pick a game uniformly at random
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> &Game {
        let index = rng.random_range(0..self.games.len());
        &self.games[index]
    }
}

impl Default for GameRegistry {
    fn default() -> Self {
        Self {
            games: [
                Game::new("slice", "Haunted Slice"),
                Game::new("runner", "Graveyard Run"),
            ]
            .into_iter()
            .map(|game| (game.id.clone(), game))
            .collect(),
        }
    }
}
