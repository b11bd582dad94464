use std::fmt;

use log::debug;

use crate::{Color, Tile, TileCollection};

/// Which shape of meld a candidate group was generated as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeldKind {
    /// Same number across tiles. Intended to have distinct colors, but
    /// the default enumeration does not enforce that; see
    /// [`find_playable_groups_strict`].
    Set,
    /// Same color, strictly consecutive ascending numbers.
    Run,
}

/// A candidate meld: three or more tiles drawn from one collection.
///
/// A meld is a selection of tile values, not a live view into the source
/// collection; during search it is matched back against the working
/// residual by (color, number).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Meld {
    kind: MeldKind,
    tiles: Vec<Tile>,
}

impl Meld {
    fn new(kind: MeldKind, tiles: Vec<Tile>) -> Self {
        Meld { kind, tiles }
    }

    pub fn kind(&self) -> MeldKind {
        self.kind
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Sum of the numbers on the meld's tiles.
    pub fn point_sum(&self) -> u32 {
        self.tiles.iter().map(|t| t.number() as u32).sum()
    }
}

impl fmt::Display for Meld {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, tile) in self.tiles.iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            write!(f, "{}", tile)?;
        }
        Ok(())
    }
}

/// One decomposition of a hand: the melds to lay down and whatever is
/// left over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decomposition {
    pub melds: Vec<Meld>,
    pub residual: TileCollection,
}

/// The best decompositions found for the two objectives tracked by the
/// search. The two sides may differ when shedding many cheap tiles
/// competes with shedding a few expensive ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BestMove {
    /// Fewest residual tiles; ties broken by smaller residual point sum.
    pub by_count: Decomposition,
    /// Smallest residual point sum; ties broken by fewer residual tiles.
    pub by_sum: Decomposition,
}

/// Enumerate every candidate meld in `tiles`.
///
/// Number sets come first (numbers ascending, combinations in
/// lexicographic index order), then color runs (colors in notation
/// order). Runs of length n contribute every sub-run of length >= 3 from
/// every start index. This order decides which of several equally good
/// decompositions the search reports, so it must stay stable.
///
/// Set candidates are not checked for color distinctness: a hand holding
/// both physical copies of a tile can produce a set that repeats a
/// color. Use [`find_playable_groups_strict`] to filter those out.
pub fn find_playable_groups(tiles: &TileCollection) -> Vec<Meld> {
    find_groups(tiles, false)
}

/// Like [`find_playable_groups`], but drops set candidates that repeat
/// a color.
pub fn find_playable_groups_strict(tiles: &TileCollection) -> Vec<Meld> {
    find_groups(tiles, true)
}

fn find_groups(tiles: &TileCollection, strict_sets: bool) -> Vec<Meld> {
    let mut groups = Vec::new();

    for number in 1..=13 {
        let candidates = tiles.filter_by_number(number);
        push_set_combinations(&candidates, strict_sets, &mut groups);
    }

    for color in Color::ALL {
        let candidates = tiles.filter_by_color(color);
        push_run_windows(&candidates, &mut groups);
    }

    debug!(
        "enumerated {} candidate groups from {} tiles",
        groups.len(),
        tiles.len()
    );
    groups
}

/// Emit every combination of 3 or more tiles from a single-number pool
/// as a set candidate.
fn push_set_combinations(candidates: &TileCollection, strict: bool, out: &mut Vec<Meld>) {
    let pool = candidates.tiles();
    for size in 3..=pool.len() {
        let mut indices: Vec<usize> = (0..size).collect();
        loop {
            let picked: Vec<Tile> = indices.iter().map(|&i| pool[i]).collect();
            if !strict || has_distinct_colors(&picked) {
                out.push(Meld::new(MeldKind::Set, picked));
            }
            if !next_combination(&mut indices, pool.len()) {
                break;
            }
        }
    }
}

fn has_distinct_colors(tiles: &[Tile]) -> bool {
    let mut seen = [false; 4];
    for tile in tiles {
        let slot = &mut seen[tile.color().index() as usize];
        if *slot {
            return false;
        }
        *slot = true;
    }
    true
}

/// Generate the next index combination in lexicographic order.
fn next_combination(combo: &mut [usize], n: usize) -> bool {
    let k = combo.len();
    if k == 0 {
        return false;
    }

    // Find the rightmost element that can be incremented
    let mut i = k;
    while i > 0 {
        i -= 1;
        if combo[i] < n - k + i {
            combo[i] += 1;
            // Reset all elements to the right
            for j in (i + 1)..k {
                combo[j] = combo[j - 1] + 1;
            }
            return true;
        }
    }

    false
}

/// Emit every run of 3 or more consecutive numbers from a single-color
/// pool. Every start index is tried, and each extension past length 3 is
/// emitted separately, so a run of 5 yields 6 overlapping candidates.
fn push_run_windows(candidates: &TileCollection, out: &mut Vec<Meld>) {
    let mut pool: Vec<Tile> = candidates.tiles().to_vec();
    pool.sort_by_key(|t| t.number());

    for start in 0..pool.len() {
        let mut run = vec![pool[start]];
        let mut last = pool[start].number();
        for &next in &pool[start + 1..] {
            // A duplicate number breaks the run; runs never repeat a number.
            if next.number() != last + 1 {
                break;
            }
            run.push(next);
            last = next.number();
            if run.len() >= 3 {
                out.push(Meld::new(MeldKind::Run, run.clone()));
            }
        }
    }
}

/// Incumbent trackers for the two objectives, threaded mutably through
/// the recursion.
struct SearchState {
    by_count: Decomposition,
    by_sum: Decomposition,
}

impl SearchState {
    /// Seed both incumbents with the play-nothing baseline.
    fn seeded(hand: &TileCollection) -> Self {
        let baseline = Decomposition {
            melds: Vec::new(),
            residual: hand.clone(),
        };
        SearchState {
            by_count: baseline.clone(),
            by_sum: baseline,
        }
    }

    /// Offer a candidate outcome to both incumbents. Only strict
    /// improvement replaces an incumbent, so the first-found outcome
    /// wins ties.
    fn consider(&mut self, residual: &TileCollection, chosen: &[Meld]) {
        let len = residual.len();
        let sum = residual.point_sum();

        let best = &self.by_count.residual;
        if len < best.len() || (len == best.len() && sum < best.point_sum()) {
            self.by_count = Decomposition {
                melds: chosen.to_vec(),
                residual: residual.clone(),
            };
        }

        let best = &self.by_sum.residual;
        if sum < best.point_sum() || (sum == best.point_sum() && len < best.len()) {
            self.by_sum = Decomposition {
                melds: chosen.to_vec(),
                residual: residual.clone(),
            };
        }
    }
}

/// Find the best decomposition of `hand` into disjoint melds, tracked
/// under both objectives at once.
///
/// The search is exhaustive depth-first backtracking over the candidate
/// groups from [`find_playable_groups`], with availability filtering as
/// the only pruning; worst case is exponential in the number of
/// candidate groups. Hands stay small in practice, so this is a known
/// ceiling rather than a problem to engineer around.
///
/// If no meld is playable at all, both decompositions are the seeded
/// baseline: empty meld lists, residual equal to the input. The caller's
/// collection is never mutated, and the result is deterministic for a
/// given input.
pub fn find_best_move(hand: &TileCollection) -> BestMove {
    search_with_groups(hand, find_playable_groups(hand))
}

/// [`find_best_move`] over the strict enumeration, for callers that
/// must not receive sets with repeated colors.
pub fn find_best_move_strict(hand: &TileCollection) -> BestMove {
    search_with_groups(hand, find_playable_groups_strict(hand))
}

fn search_with_groups(hand: &TileCollection, groups: Vec<Meld>) -> BestMove {
    let mut state = SearchState::seeded(hand);
    let mut chosen = Vec::new();
    explore(hand, &groups, &mut chosen, &mut state);
    BestMove {
        by_count: state.by_count,
        by_sum: state.by_sum,
    }
}

/// One level of the backtracking search. Each candidate group either
/// recurses (all of its tiles are still available) or terminates the
/// branch with an evaluation of the current outcome. An exhausted
/// candidate list also evaluates, so a fully played-out hand is scored.
fn explore(
    residual: &TileCollection,
    groups: &[Meld],
    chosen: &mut Vec<Meld>,
    state: &mut SearchState,
) {
    if groups.is_empty() {
        state.consider(residual, chosen);
        return;
    }

    for (at, group) in groups.iter().enumerate() {
        match residual.without_all(group.tiles()) {
            Some(next_residual) => {
                let mut remaining = groups.to_vec();
                remaining.remove(at);
                chosen.push(group.clone());
                explore(&next_residual, &remaining, chosen, state);
                chosen.pop();
            }
            None => state.consider(residual, chosen),
        }
    }
}
