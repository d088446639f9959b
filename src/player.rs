use std::fmt::{Display, Formatter};

use rand::rngs::StdRng;
use rand::seq::IteratorRandom;
use rand::SeedableRng;

use crate::board::Board;
use crate::r#move::Move;
use crate::search::{Engine, SearchOptions};

/// Someone sitting at the board.
/// Humans type their moves in, so they never produce one on their own.
pub enum Player {
    Human,
    Random(StdRng),
    Engine(Engine),
}

impl Player {
    pub fn random() -> Player {
        Player::Random(StdRng::from_entropy())
    }
    pub fn seeded_random(seed: u64) -> Player {
        Player::Random(StdRng::seed_from_u64(seed))
    }
    pub fn engine(options: SearchOptions) -> Player {
        Player::Engine(Engine::new(options))
    }

    pub fn is_human(&self) -> bool {
        matches!(self, Player::Human)
    }

    /// The move this player wants to play, if it picks its own.
    /// `None` for humans and for finished games.
    pub fn try_get_move(&mut self, board: &mut Board) -> Option<Move> {
        match self {
            Player::Human => None,
            Player::Random(rng) => board.legal_moves().iter().copied().choose(rng),
            Player::Engine(engine) => engine.best_move(board).best_move,
        }
    }
}

impl Display for Player {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Player::Human => "human",
            Player::Random(_) => "random",
            Player::Engine(_) => "engine",
        };
        write!(f, "{}", name)
    }
}
