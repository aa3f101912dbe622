//! Breadth-first and A* search for the shortest sequence of slides.
//!
//! Both searches own every node they create and index states by board
//! content, so a configuration reached twice is recognised in constant time.
//! Running out of states is reported as [`Outcome::NoSolution`].

use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;
use std::time::{Duration, Instant};

use log::{debug, trace};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize, Serializer};

use crate::error::AlgorithmError;
use crate::heuristic::Heuristic;
use crate::moves::{successors, Action};
use crate::node::{NodeId, SearchTree};
use crate::puzzle::Board;

/// Search strategy, named `bfs`, `astar_h1`, `astar_h2` or `astar_h3`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Algorithm {
    #[default]
    Bfs,
    AStar(Heuristic),
}

impl Algorithm {
    pub const ALL: [Algorithm; 4] = [
        Algorithm::Bfs,
        Algorithm::AStar(Heuristic::Distance),
        Algorithm::AStar(Heuristic::BlockerCount),
        Algorithm::AStar(Heuristic::BlockerClearance),
    ];

    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Bfs => "bfs",
            Algorithm::AStar(Heuristic::Distance) => "astar_h1",
            Algorithm::AStar(Heuristic::BlockerCount) => "astar_h2",
            Algorithm::AStar(Heuristic::BlockerClearance) => "astar_h3",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = AlgorithmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Algorithm::ALL
            .into_iter()
            .find(|algorithm| algorithm.name() == s)
            .ok_or_else(|| AlgorithmError::Unknown(s.to_string()))
    }
}

impl TryFrom<String> for Algorithm {
    type Error = AlgorithmError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Algorithm> for String {
    fn from(algorithm: Algorithm) -> String {
        algorithm.name().to_string()
    }
}

/// Configuration for a solve request. The search itself has no time or node
/// budget.
#[derive(Debug, Clone, Default)]
pub struct SolverConfig {
    pub algorithm: Algorithm,
}

/// Diagnostic counters, never used to steer the search
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchStats {
    /// Distinct states discovered, the start included
    pub generated: usize,
    /// States whose successors were produced
    pub expanded: usize,
    /// Closed states put back on the open list after a cheaper path showed up
    pub reopened: usize,
    #[serde(rename = "timeElapsedMs", serialize_with = "as_millis")]
    pub elapsed: Duration,
}

fn as_millis<S: Serializer>(elapsed: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(elapsed.as_secs_f64() * 1000.0)
}

/// Slides from the start to the goal and the boards in between
#[derive(Debug, Clone)]
pub struct Solution {
    pub actions: Vec<Action>,
    /// Start board first, solved board last
    pub boards: Vec<Board>,
}

impl Solution {
    pub fn moves(&self) -> usize {
        self.actions.len()
    }
}

#[derive(Debug, Clone)]
pub enum Outcome {
    Solved(Solution),
    /// Every reachable state was explored without reaching the exit
    NoSolution,
}

/// Result of the solver search
#[derive(Debug, Clone)]
pub struct SolverResult {
    pub outcome: Outcome,
    pub stats: SearchStats,
}

impl SolverResult {
    pub fn solution(&self) -> Option<&Solution> {
        match &self.outcome {
            Outcome::Solved(solution) => Some(solution),
            Outcome::NoSolution => None,
        }
    }

    pub fn is_solved(&self) -> bool {
        self.solution().is_some()
    }
}

/// Solve `board` with the configured algorithm.
pub fn solve(board: &Board, config: &SolverConfig) -> SolverResult {
    debug!(
        "{}: {}x{} board, {} vehicles, {} walls",
        config.algorithm,
        board.width(),
        board.height(),
        board.vehicles().len(),
        board.walls().len()
    );

    match config.algorithm {
        Algorithm::Bfs => breadth_first(board),
        Algorithm::AStar(heuristic) => a_star(board, |b: &Board| heuristic.estimate(b)),
    }
}

/// Breadth-first search.
///
/// Children are goal-tested as soon as they are generated. With every slide
/// costing one move, the first goal seen is a shortest solution.
pub fn breadth_first(start: &Board) -> SolverResult {
    let started = Instant::now();
    let mut stats = SearchStats::default();
    let mut tree = SearchTree::new();

    let root_board = Rc::new(start.clone());
    let root = tree.push_root(Rc::clone(&root_board), 0.0);
    stats.generated = 1;

    if start.is_goal() {
        return finish(&tree, Some(root), stats, started);
    }

    // States already expanded or waiting in the queue.
    let mut seen: FxHashSet<Rc<Board>> = FxHashSet::default();
    seen.insert(root_board);
    let mut open = VecDeque::from([root]);

    while let Some(current) = open.pop_front() {
        stats.expanded += 1;
        let board = Rc::clone(&tree[current].board);

        for (action, next) in successors(&board) {
            if next.is_goal() {
                let goal = tree.push_child(current, action, Rc::new(next), 0.0);
                stats.generated += 1;
                return finish(&tree, Some(goal), stats, started);
            }
            if seen.contains(&next) {
                continue;
            }

            let next = Rc::new(next);
            seen.insert(Rc::clone(&next));
            let child = tree.push_child(current, action, next, 0.0);
            stats.generated += 1;
            open.push_back(child);
        }
    }

    finish(&tree, None, stats, started)
}

/// A* search ordered by `f = g + h`.
///
/// The goal test happens when a node is taken off the open list. A state
/// reached again with a strictly lower `f` replaces its open entry, or is
/// moved back from closed to open, so heuristics that are not consistent
/// still end on the cheapest path they can prove.
pub fn a_star<H>(start: &Board, heuristic: H) -> SolverResult
where
    H: Fn(&Board) -> f64,
{
    let started = Instant::now();
    let mut stats = SearchStats::default();
    let mut tree = SearchTree::new();
    let mut frontier = Frontier::default();

    let root_board = Rc::new(start.clone());
    let root = tree.push_root(Rc::clone(&root_board), heuristic(start));
    frontier.push(root_board, root, tree[root].f);
    stats.generated = 1;

    while let Some(current) = frontier.pop() {
        let board = Rc::clone(&tree[current].board);
        if board.is_goal() {
            return finish(&tree, Some(current), stats, started);
        }
        stats.expanded += 1;

        for (action, next) in successors(&board) {
            let h = heuristic(&next);
            let f = f64::from(tree[current].g + 1) + h;

            match frontier.classify(&next, f) {
                Offer::Rejected => continue,
                Offer::New => stats.generated += 1,
                Offer::Improved => {}
                Offer::Reopened => {
                    trace!("reopening {} after cheaper path (f = {:.3})", action, f);
                    stats.reopened += 1;
                }
            }

            let next = Rc::new(next);
            let child = tree.push_child(current, action, Rc::clone(&next), h);
            frontier.push(next, child, f);
        }
    }

    finish(&tree, None, stats, started)
}

fn finish(
    tree: &SearchTree,
    goal: Option<NodeId>,
    mut stats: SearchStats,
    started: Instant,
) -> SolverResult {
    stats.elapsed = started.elapsed();

    let outcome = match goal {
        Some(id) => {
            let solution = Solution {
                actions: tree.solution(id),
                boards: tree.path(id).iter().map(|b| Board::clone(b)).collect(),
            };
            debug!(
                "solved in {} moves: {} generated, {} expanded, {} reopened, {} nodes",
                solution.moves(),
                stats.generated,
                stats.expanded,
                stats.reopened,
                tree.len()
            );
            Outcome::Solved(solution)
        }
        None => {
            debug!(
                "no solution: {} states generated, {} expanded, {} nodes",
                stats.generated,
                stats.expanded,
                tree.len()
            );
            Outcome::NoSolution
        }
    };

    SolverResult { outcome, stats }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Open,
    Closed,
}

/// The live node for a state and the `f` it was recorded with
#[derive(Debug)]
struct Entry {
    node: NodeId,
    f: f64,
    status: Status,
}

/// What recording a newly generated state would do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Offer {
    /// Never seen before
    New,
    /// Waiting on the open list with a higher `f`
    Improved,
    /// Already expanded with a higher `f`
    Reopened,
    /// Known with an `f` at least as good
    Rejected,
}

/// Heap item, ordered so the heap pops the lowest `f` first and the oldest
/// push among equal `f`.
#[derive(Debug)]
struct Candidate {
    f: f64,
    seq: usize,
    node: NodeId,
    board: Rc<Board>,
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

/// Open and closed lists of an A* run.
///
/// Each state has one entry pointing at its current node. Replacing that
/// node leaves the old heap item behind; it is skipped when popped.
#[derive(Debug, Default)]
struct Frontier {
    heap: BinaryHeap<Candidate>,
    entries: FxHashMap<Rc<Board>, Entry>,
    seq: usize,
}

impl Frontier {
    fn classify(&self, board: &Board, f: f64) -> Offer {
        match self.entries.get(board) {
            None => Offer::New,
            Some(entry) if f >= entry.f => Offer::Rejected,
            Some(entry) if entry.status == Status::Closed => Offer::Reopened,
            Some(_) => Offer::Improved,
        }
    }

    /// Put `node` on the open list as the live node for `board`.
    fn push(&mut self, board: Rc<Board>, node: NodeId, f: f64) {
        self.entries.insert(
            Rc::clone(&board),
            Entry {
                node,
                f,
                status: Status::Open,
            },
        );
        self.seq += 1;
        self.heap.push(Candidate {
            f,
            seq: self.seq,
            node,
            board,
        });
    }

    /// Take the best open node and close its state.
    fn pop(&mut self) -> Option<NodeId> {
        while let Some(candidate) = self.heap.pop() {
            match self.entries.get_mut(&*candidate.board) {
                Some(entry) if entry.node == candidate.node && entry.status == Status::Open => {
                    entry.status = Status::Closed;
                    return Some(candidate.node);
                }
                _ => continue,
            }
        }
        None
    }
}
