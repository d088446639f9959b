use std::fmt::Display;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::board::{Board, BoardResult};
use crate::evaluation::{Evaluation, Score};
use crate::movelist::MoveList;
use crate::piece::Color;
use crate::r#move::Move;
use crate::transposition_table::{NodeType, TranspositionTable};

// Outside every reachable score, mates included
const INFINITY: Score = Evaluation::MATE_SCORE + 1;
// Mates score MATE_SCORE minus the plies needed to deliver them
const MATE_THRESHOLD: Score = Evaluation::MATE_SCORE - 1000;

/// Groups the knobs of a search.
/// Avoids passing them around one by one
#[derive(Clone, Debug)]
pub struct SearchOptions {
    /// Wall clock budget, `None` to search until `max_depth` or a mate
    pub move_time: Option<Duration>,
    pub max_depth: u8,
}
impl Default for SearchOptions {
    fn default() -> Self {
        SearchOptions {
            move_time: Some(Duration::from_secs(2)),
            max_depth: 50,
        }
    }
}
impl SearchOptions {
    pub fn set_time(&mut self, value: Option<Duration>) -> &mut Self {
        self.move_time = value;
        self
    }
    pub fn set_depth(&mut self, value: u8) -> &mut Self {
        self.max_depth = value;
        self
    }
}

/// Cloneable token used to abort a running search from another thread.
#[derive(Clone, Debug, Default)]
pub struct StopHandle(Arc<AtomicBool>);
impl StopHandle {
    pub fn interrupt(&self) {
        self.0.store(true, Ordering::SeqCst)
    }
    pub fn is_interrupted(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
    fn reset(&self) {
        self.0.store(false, Ordering::SeqCst)
    }
}

/// Outcome of a call to [`Engine::best_move`]. `score` is from the point of
/// view of the side that was to move.
#[derive(Clone, Debug)]
pub struct SearchReport {
    pub best_move: Option<Move>,
    pub score: Score,
    /// Last depth whose root moves were all searched
    pub depth_reached: u8,
    pub nodes: u64,
    pub tt_hits: u64,
    pub principal_variation: Vec<Move>,
    pub elapsed: Duration,
    /// The deadline or the stop handle cut the search short
    pub interrupted: bool,
}
impl SearchReport {
    /// Full moves until mate, negative when the side to move is the one
    /// getting mated
    pub fn mate_in(&self) -> Option<i32> {
        let moves = (mate_distance(self.score)? as i32 + 1) / 2;
        Some(if self.score > 0 { moves } else { -moves })
    }

    /// `+M2`, `-M1` or the centipawn score
    pub fn evaluation(&self) -> String {
        match self.mate_in() {
            Some(n) if n > 0 => format!("+M{}", n),
            Some(n) => format!("-M{}", -n),
            None => self.score.to_string(),
        }
    }
}
impl Display for SearchReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let seconds = self.elapsed.as_secs_f64().max(1e-6);
        write!(
            f,
            "depth {} time {} nodes {} nps {} pv {} score {} {}",
            self.depth_reached,
            self.elapsed.as_millis(),
            self.nodes,
            (self.nodes as f64 / seconds) as u64,
            self.principal_variation
                .iter()
                .fold(String::new(), |acc, m| format!("{} {}", acc, m))
                .trim(),
            if self.mate_in().is_some() { "mate" } else { "cp" },
            self.mate_in().unwrap_or(self.score)
        )
    }
}

#[derive(Clone, Debug)]
struct RootMove {
    mv: Move,
    score: Score,
    pv: Vec<Move>,
}

/// What searching the moves of one node gave
struct NodeOutcome {
    score: Score,
    node_type: NodeType,
    best_move: Option<Move>,
    line: Vec<Move>,
}

/// Single threaded iterative deepening alpha-beta searcher.
/// The transposition table lives as long as the engine but is wiped at the
/// start of every search.
pub struct Engine {
    options: SearchOptions,
    transposition_table: TranspositionTable,
    stop: StopHandle,
    deadline: Option<Instant>,
    stopped: bool,
    root_ply: usize,
    nodes: u64,
    tt_hits: u64,
}

impl Default for Engine {
    fn default() -> Self {
        Engine::new(SearchOptions::default())
    }
}

impl Engine {
    pub fn new(options: SearchOptions) -> Engine {
        Engine {
            options,
            transposition_table: TranspositionTable::new(),
            stop: StopHandle::default(),
            deadline: None,
            stopped: false,
            root_ply: 0,
            nodes: 0,
            tt_hits: 0,
        }
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }
    pub fn transposition_table(&self) -> &TranspositionTable {
        &self.transposition_table
    }

    /// Searches the board for the best move of the side to move.
    /// The board is handed back in the state it was given.
    pub fn best_move(&mut self, board: &mut Board) -> SearchReport {
        let start = Instant::now();
        self.transposition_table.clear();
        self.stop.reset();
        self.deadline = self.options.move_time.map(|t| start + t);
        self.stopped = false;
        self.root_ply = board.ply();
        self.nodes = 0;
        self.tt_hits = 0;

        let mut root_moves: Vec<Move> = board.legal_moves().iter().copied().collect();
        let mut best: Option<RootMove> = None;
        let mut depth_reached = 0;

        'iterative_deepening: for depth in 1..=self.options.max_depth {
            let mut evaluated = self.first_search(board, &root_moves, depth);
            evaluated.sort_by(|a, b| b.score.cmp(&a.score));

            if self.stopped {
                // A partial iteration only ever beats having nothing
                if best.is_none() {
                    best = evaluated.into_iter().next();
                }
                break 'iterative_deepening;
            }

            root_moves = evaluated.iter().map(|r| r.mv).collect();
            let Some(iteration_best) = evaluated.into_iter().next() else {
                break 'iterative_deepening;
            };
            depth_reached = depth;
            debug!(
                depth,
                best = %iteration_best.mv,
                score = iteration_best.score,
                nodes = self.nodes,
                "iteration complete"
            );

            let mate_found = mate_distance(iteration_best.score).is_some();
            best = Some(iteration_best);
            if mate_found {
                break 'iterative_deepening;
            }
        }

        let report = match best {
            Some(root) => SearchReport {
                best_move: Some(root.mv),
                score: root.score,
                depth_reached,
                nodes: self.nodes,
                tt_hits: self.tt_hits,
                principal_variation: root.pv,
                elapsed: start.elapsed(),
                interrupted: self.stopped,
            },
            None => SearchReport {
                best_move: root_moves.first().copied(),
                score: 0,
                depth_reached,
                nodes: self.nodes,
                tt_hits: self.tt_hits,
                principal_variation: root_moves.first().copied().into_iter().collect(),
                elapsed: start.elapsed(),
                interrupted: self.stopped,
            },
        };

        let perspective = match board.side_to_move() {
            Color::White => "white",
            Color::Black => "black",
        };
        info!(
            depth = report.depth_reached,
            eval = %report.evaluation(),
            side = perspective,
            nodes = report.nodes,
            tt_hits = report.tt_hits,
            interrupted = report.interrupted,
            "search finished"
        );
        report
    }

    // Every root move gets the full window so each one carries its own score
    // for the next iteration's ordering.
    fn first_search(&mut self, board: &mut Board, root_moves: &[Move], depth: u8) -> Vec<RootMove> {
        self.nodes += 1;
        let mut evaluated = Vec::with_capacity(root_moves.len());
        for &mv in root_moves {
            if self.should_stop() {
                break;
            }
            let mut pv = vec![mv];
            board.make(mv);
            let score = -self.search(board, depth - 1, -INFINITY, INFINITY, &mut pv);
            board.unmake();
            if self.stopped {
                break;
            }
            evaluated.push(RootMove { mv, score, pv });
        }
        evaluated
    }

    /// Negamax alpha-beta, fail-hard: the score returned never leaves
    /// `[alpha, beta]`. Moves found along the best line are appended to `pv`.
    fn search(&mut self, board: &mut Board, depth: u8, alpha: Score, beta: Score, pv: &mut Vec<Move>) -> Score {
        if self.should_stop() {
            return 0;
        }
        self.nodes += 1;
        let ply = self.ply(board);

        match board.result() {
            BoardResult::Checkmate => return -(Evaluation::MATE_SCORE - ply),
            BoardResult::StaleMate | BoardResult::ThreefoldRepetition => return Evaluation::DRAW_SCORE,
            BoardResult::Playing => (),
        }

        let hash = board.zobrist_hash();
        let (mut low, mut high) = (alpha, beta);
        if let Some(entry) = self.transposition_table.get(hash).copied() {
            if entry.node_type != NodeType::Quiescence && entry.depth >= depth {
                self.tt_hits += 1;
                let score = from_table(entry.score, ply);
                match entry.node_type {
                    NodeType::Exact => {
                        if score <= alpha {
                            return alpha;
                        }
                        if score >= beta {
                            return beta;
                        }
                        if let Some(mut line) = self.stored_line(board, entry.score, depth) {
                            pv.append(&mut line);
                            return score;
                        }
                    }
                    NodeType::LowerBound => low = low.max(score),
                    NodeType::UpperBound => high = high.min(score),
                    NodeType::Quiescence => (),
                }
                if low >= high {
                    return if low >= beta { beta } else { alpha };
                }
            }
        }

        if depth == 0 {
            return self.quiescence(board, alpha, beta, pv);
        }

        let mut outcome = self.search_moves(board, depth, low, high);
        if self.stopped {
            return 0;
        }
        // A bound read from the table can settle a mate score with no line
        // behind it, the mate has to be searched out again
        if outcome.node_type != NodeType::Exact
            && outcome.score > alpha
            && outcome.score < beta
            && mate_distance(outcome.score).is_some()
        {
            outcome = self.search_moves(board, depth, alpha, beta);
            if self.stopped {
                return 0;
            }
        }

        self.transposition_table.insert(
            hash,
            to_table(outcome.score, ply),
            depth,
            outcome.node_type,
            outcome.best_move,
        );
        pv.append(&mut outcome.line);
        outcome.score
    }

    fn search_moves(&mut self, board: &mut Board, depth: u8, mut alpha: Score, beta: Score) -> NodeOutcome {
        let moves: MoveList = board.legal_moves().iter().copied().collect();
        let mut outcome = NodeOutcome {
            score: alpha,
            node_type: NodeType::UpperBound,
            best_move: None,
            line: Vec::new(),
        };
        for mv in moves.best_first_iter(score_moves(board)) {
            let mut line = vec![mv];
            board.make(mv);
            let score = -self.search(board, depth - 1, -beta, -alpha, &mut line);
            board.unmake();
            if self.stopped {
                return outcome;
            }

            if score >= beta {
                return NodeOutcome {
                    score: beta,
                    node_type: NodeType::LowerBound,
                    best_move: Some(mv),
                    line: Vec::new(),
                };
            }
            if score > alpha {
                alpha = score;
                outcome = NodeOutcome {
                    score,
                    node_type: NodeType::Exact,
                    best_move: Some(mv),
                    line,
                };
            }
        }
        outcome
    }

    /// Follows the best moves stored from this node on, at most `depth` plies.
    /// A mate score is only backed by a line that ends in that very mate.
    fn stored_line(&self, board: &mut Board, score: Score, depth: u8) -> Option<Vec<Move>> {
        let mate = mate_distance(score);
        let plies = mate.unwrap_or(depth as usize);
        let mut line = Vec::with_capacity(plies);
        while line.len() < plies && board.result() == BoardResult::Playing {
            let remaining = plies - line.len();
            let next = self.transposition_table.get(board.zobrist_hash()).and_then(|entry| match entry.best_move {
                Some(mv)
                    if entry.node_type == NodeType::Exact
                        && entry.depth as usize >= remaining
                        && board.legal_moves().contains(&mv) =>
                {
                    Some(mv)
                }
                _ => None,
            });
            let Some(mv) = next else {
                break;
            };
            board.make(mv);
            line.push(mv);
        }

        let backed = match mate {
            Some(plies) => line.len() == plies && board.result() == BoardResult::Checkmate,
            None => true,
        };
        for _ in &line {
            board.unmake();
        }
        backed.then_some(line)
    }

    /// Captures only search run at the horizon
    fn quiescence(&mut self, board: &mut Board, mut alpha: Score, beta: Score, pv: &mut Vec<Move>) -> Score {
        if self.should_stop() {
            return 0;
        }
        self.nodes += 1;
        let ply = self.ply(board);

        match board.result() {
            BoardResult::Checkmate => return -(Evaluation::MATE_SCORE - ply),
            BoardResult::StaleMate | BoardResult::ThreefoldRepetition => return Evaluation::DRAW_SCORE,
            BoardResult::Playing => (),
        }

        let stand_pat = Evaluation::evaluate(board).score;
        if stand_pat >= beta {
            return beta;
        }
        alpha = alpha.max(stand_pat);

        let captures: MoveList = board.current_takes().collect();
        if captures.is_empty() {
            return alpha;
        }

        let hash = board.zobrist_hash();
        if let Some(entry) = self.transposition_table.get(hash) {
            let score = from_table(entry.score, ply);
            // Stored mates carry no line, those get searched again
            if entry.node_type == NodeType::Quiescence && mate_distance(score).is_none() {
                self.tt_hits += 1;
                return score.clamp(alpha, beta);
            }
        }

        let mut best_line = Vec::new();
        for mv in captures.best_first_iter(score_moves(board)) {
            let mut line = vec![mv];
            board.make(mv);
            let score = -self.quiescence(board, -beta, -alpha, &mut line);
            board.unmake();
            if self.stopped {
                return 0;
            }

            if score >= beta {
                self.transposition_table
                    .insert(hash, to_table(beta, ply), 0, NodeType::Quiescence, Some(mv));
                return beta;
            }
            if score > alpha {
                alpha = score;
                best_line = line;
            }
        }

        self.transposition_table.insert(
            hash,
            to_table(alpha, ply),
            0,
            NodeType::Quiescence,
            best_line.first().copied(),
        );
        pv.append(&mut best_line);
        alpha
    }

    /// Plies played since the root of the current search
    fn ply(&self, board: &Board) -> Score {
        board.ply().saturating_sub(self.root_ply) as Score
    }

    // Latches once tripped so every frame unwinds the same way
    fn should_stop(&mut self) -> bool {
        if !self.stopped {
            self.stopped =
                self.stop.is_interrupted() || self.deadline.is_some_and(|d| Instant::now() >= d);
        }
        self.stopped
    }
}

/// Plies until mate when `score` is a mate score
fn mate_distance(score: Score) -> Option<usize> {
    (score.abs() > MATE_THRESHOLD).then(|| (Evaluation::MATE_SCORE - score.abs()) as usize)
}

// The table counts mate distances from the stored node, the search from the root
fn to_table(score: Score, ply: Score) -> Score {
    if score > MATE_THRESHOLD {
        score + ply
    } else if score < -MATE_THRESHOLD {
        score - ply
    } else {
        score
    }
}

fn from_table(score: Score, ply: Score) -> Score {
    if score > MATE_THRESHOLD {
        score - ply
    } else if score < -MATE_THRESHOLD {
        score + ply
    } else {
        score
    }
}

/// Promotions first, then captures and quiet moves, moves onto attacked
/// squares last
fn score_moves(board: &Board) -> impl Fn(&Move) -> Score + '_ {
    move |mv| {
        if board.is_promotion(mv) {
            3
        } else if board.is_capture(mv) {
            2
        } else if board.is_targeted(mv) {
            0
        } else {
            1
        }
    }
}
