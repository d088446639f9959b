use crate::board::Position;
use crate::r#move::Move;
use crate::zob_hash::Hash;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub position: Position,
    pub move_played: Move,
}

/// Stack of the positions a board went through, most recent last, each with
/// the move that was played from it. Undoing a move is popping a snapshot back.
#[derive(Debug, Clone, Default)]
pub struct History {
    entries: Vec<HistoryEntry>,
}

impl History {
    pub fn with_capacity(capacity: usize) -> History {
        History {
            entries: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, position: Position, move_played: Move) {
        self.entries.push(HistoryEntry { position, move_played })
    }
    pub fn pop(&mut self) -> Option<HistoryEntry> {
        self.entries.pop()
    }
    pub fn last(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }
    pub fn len(&self) -> usize {
        self.entries.len()
    }
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of earlier positions with the given hash, looking back no further
    /// than `reversible_plies` snapshots. A capture or pawn move in between
    /// makes any older position unreachable.
    pub fn occurrences(&self, hash: Hash, reversible_plies: u32) -> usize {
        self.entries
            .iter()
            .rev()
            .take(reversible_plies as usize)
            .filter(|e| e.position.hash() == hash)
            .count()
    }
}
