use crate::evaluation::Score;
use crate::r#move::Move;
use arrayvec::ArrayVec;

pub const MAX_MOVELIST_CAPACITY: usize = 256;

#[derive(Clone, Default)]
pub struct MoveList(ArrayVec<Move, MAX_MOVELIST_CAPACITY>);

impl MoveList {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn push(&mut self, m: Move) {
        self.0.push(m)
    }

    /// Iterates through the list highest score first. Equal scores keep no
    /// particular order.
    pub fn best_first_iter<F: Fn(&Move) -> Score>(&self, scoring_function: F) -> ScoredMoveListIter {
        ScoredMoveListIter::new(self, scoring_function)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.0.iter()
    }
}

impl FromIterator<Move> for MoveList {
    fn from_iter<I: IntoIterator<Item = Move>>(iter: I) -> Self {
        let mut mv_list = MoveList::default();
        for m in iter {
            mv_list.push(m)
        }
        mv_list
    }
}

impl std::fmt::Display for MoveList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        let moves: Vec<String> = self.0.iter().map(|m| m.to_string()).collect();
        write!(f, "{}", moves.join(" "))
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// Selection-sorts lazily: each step picks the best remaining move, so a
// cutoff early in the list never pays for sorting the rest.
pub struct ScoredMoveListIter {
    moves: ArrayVec<Move, MAX_MOVELIST_CAPACITY>,
    scores: ArrayVec<Score, MAX_MOVELIST_CAPACITY>,
}

impl ScoredMoveListIter {
    pub fn new<F: Fn(&Move) -> Score>(move_list: &MoveList, scoring_function: F) -> Self {
        let mut moves = ArrayVec::new();
        let mut scores = ArrayVec::new();
        for mv in move_list {
            scores.push(scoring_function(mv));
            moves.push(*mv);
        }
        ScoredMoveListIter { moves, scores }
    }
}

impl Iterator for ScoredMoveListIter {
    type Item = Move;

    fn next(&mut self) -> Option<Self::Item> {
        if self.moves.is_empty() {
            return None;
        }
        let (mut best_index, mut best_score) = (0, self.scores[0]);
        for (i, s) in self.scores.iter().enumerate() {
            if *s > best_score {
                best_score = *s;
                best_index = i;
            }
        }

        self.scores.swap_pop(best_index);
        self.moves.swap_pop(best_index)
    }
}
