use crate::{evaluation::Score, r#move::Move, zob_hash::Hash};

#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum NodeType {
    /// Every move was searched and the score is exact
    Exact,
    /// A move failed high: the true score is at least `score`
    LowerBound,
    /// No move raised alpha: the true score is at most `score`
    UpperBound,
    /// Result of a captures-only search, only meaningful to another one
    Quiescence,
}

#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub struct TranspositionEntry {
    pub hash: Hash,
    pub score: Score,
    pub depth: u8,
    pub node_type: NodeType,
    /// Move that produced the score, absent when none raised alpha
    pub best_move: Option<Move>,
}

/// Direct-mapped cache of search results. A slot holds one entry and any
/// insert overwrites it, so a lookup is only trusted when the stored hash
/// matches the full 64-bit hash asked for.
pub struct TranspositionTable {
    entries: Vec<Option<TranspositionEntry>>,
}

impl TranspositionTable {
    pub const CAPACITY: usize = 1 << 20;

    pub fn new() -> Self {
        Self::with_capacity(Self::CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        TranspositionTable {
            entries: vec![None; capacity.max(1)],
        }
    }

    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    fn slot(&self, hash: Hash) -> usize {
        (hash % self.entries.len() as u64) as usize
    }

    pub fn insert(&mut self, hash: Hash, score: Score, depth: u8, node_type: NodeType, best_move: Option<Move>) {
        let slot = self.slot(hash);
        self.entries[slot] = Some(TranspositionEntry {
            hash,
            score,
            depth,
            node_type,
            best_move,
        });
    }

    pub fn get(&self, hash: Hash) -> Option<&TranspositionEntry> {
        self.entries[self.slot(hash)].as_ref().filter(|e| e.hash == hash)
    }

    pub fn contains(&self, hash: Hash) -> bool {
        self.get(hash).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.iter_mut().for_each(|e| *e = None);
    }

    /// Number of occupied slots
    pub fn len(&self) -> usize {
        self.entries.iter().filter(|e| e.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for TranspositionTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_write_wins() {
        let mut table = TranspositionTable::with_capacity(16);
        table.insert(3, 10, 2, NodeType::Exact, Some(Move::new(12, 28)));
        assert_eq!(table.get(3).map(|e| e.score), Some(10));
        assert_eq!(table.get(3).and_then(|e| e.best_move), Some(Move::new(12, 28)));

        // Same slot, different position
        table.insert(19, -5, 1, NodeType::LowerBound, None);
        assert!(!table.contains(3));
        assert_eq!(table.get(19).map(|e| e.node_type), Some(NodeType::LowerBound));

        table.insert(19, 7, 4, NodeType::UpperBound, None);
        assert_eq!(
            table.get(19),
            Some(&TranspositionEntry {
                hash: 19,
                score: 7,
                depth: 4,
                node_type: NodeType::UpperBound,
                best_move: None,
            })
        );
    }

    #[test]
    fn clear_empties_every_slot() {
        let mut table = TranspositionTable::with_capacity(8);
        for h in 0..8 {
            table.insert(h, 0, 0, NodeType::Quiescence, None);
        }
        assert_eq!(table.len(), 8);
        table.clear();
        assert!(table.is_empty());
        assert_eq!(table.capacity(), 8);
    }

    #[test]
    fn full_size_table() {
        let table = TranspositionTable::new();
        assert_eq!(table.capacity(), 1 << 20);
    }
}
