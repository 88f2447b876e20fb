//! Generation engine - advances a grid one generation at a time.
//!
//! Every addressable cell is evaluated into the grid's scratch buffer. If no
//! cell would change the scratch buffer is dropped and the step reports a
//! stall; otherwise the buffers are swapped and the counters advance.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::{AutomatonConfig, RuleSet};

use super::{Grid, GridError, Lattice};

/// Result of one generation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum StepOutcome {
    /// The next generation was committed.
    Stepped { generation: u64, population: usize },
    /// Every cell would keep its state; nothing was committed. Any run loop
    /// should stop.
    Stalled { generation: u64, population: usize },
}

impl StepOutcome {
    #[inline]
    pub fn is_stalled(&self) -> bool {
        matches!(self, StepOutcome::Stalled { .. })
    }

    pub fn generation(&self) -> u64 {
        match *self {
            StepOutcome::Stepped { generation, .. } | StepOutcome::Stalled { generation, .. } => {
                generation
            }
        }
    }

    pub fn population(&self) -> usize {
        match *self {
            StepOutcome::Stepped { population, .. } | StepOutcome::Stalled { population, .. } => {
                population
            }
        }
    }
}

/// Summary of a bounded run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    /// Committed steps.
    pub steps: u64,
    /// Whether the run ended on a fixed point.
    pub stalled: bool,
    pub generation: u64,
    pub population: usize,
}

/// Birth/survival lookup indexed by `[alive][count]`.
#[derive(Debug, Clone, Copy)]
struct TransitionTable([[bool; 9]; 2]);

impl TransitionTable {
    fn new(rules: &RuleSet) -> Self {
        let mut table = [[false; 9]; 2];
        for count in 0..=8u8 {
            table[0][count as usize] = rules.births(count);
            table[1][count as usize] = rules.survives(count);
        }
        Self(table)
    }

    #[inline]
    fn next(&self, alive: bool, count: u8) -> bool {
        self.0[alive as usize][count as usize]
    }
}

/// Evaluate row `row` of `lattice` into the matching scratch row.
///
/// Returns the number of cells whose state is unchanged.
#[inline]
fn evaluate_row(
    lattice: Lattice<'_>,
    rules: &RuleSet,
    table: &TransitionTable,
    row: usize,
    next_row: &mut [bool],
) -> usize {
    let mut unchanged = 0;
    for col in 1..=lattice.width {
        let alive = lattice.alive(row, col);
        let count = lattice.count(row, col, rules.neighborhood, rules.topology);
        let next = table.next(alive, count);
        next_row[col] = next;
        unchanged += (next == alive) as usize;
    }
    unchanged
}

/// Grid, rule set and generation counter.
#[derive(Debug, Clone)]
pub struct GenerationEngine {
    grid: Grid,
    rules: RuleSet,
    generation: u64,
}

impl GenerationEngine {
    /// Create an engine over an all-dead grid.
    pub fn new(height: usize, width: usize, rules: RuleSet) -> Result<Self, GridError> {
        Ok(Self::with_grid(Grid::new(height, width)?, rules))
    }

    /// Create an engine over an existing grid.
    pub fn with_grid(grid: Grid, rules: RuleSet) -> Self {
        Self {
            grid,
            rules,
            generation: 0,
        }
    }

    /// Create an engine sized and ruled by a configuration.
    pub fn from_config(config: &AutomatonConfig) -> Result<Self, GridError> {
        Self::new(config.height, config.width, config.rules.clone())
    }

    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Mutable grid access for drawing. Counters stay consistent because the
    /// grid tracks its own population.
    #[inline]
    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    #[inline]
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn set_rules(&mut self, rules: RuleSet) {
        log::debug!("Rules set to {} ({:?}, {:?})", rules, rules.neighborhood, rules.topology);
        self.rules = rules;
    }

    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[inline]
    pub fn population(&self) -> usize {
        self.grid.population()
    }

    pub fn get(&self, row: usize, col: usize) -> Result<bool, GridError> {
        self.grid.get(row, col)
    }

    pub fn set(&mut self, row: usize, col: usize, alive: bool) -> Result<(), GridError> {
        self.grid.set(row, col, alive)
    }

    /// Reallocate the grid. All cells die and the generation restarts at 0.
    pub fn resize(&mut self, height: usize, width: usize) -> Result<(), GridError> {
        self.grid.resize(height, width)?;
        self.generation = 0;
        Ok(())
    }

    /// Kill every cell and restart the generation count.
    pub fn clear(&mut self) {
        self.grid.clear();
        self.generation = 0;
    }

    pub fn invert(&mut self) {
        self.grid.invert();
    }

    /// Advance one generation.
    pub fn step(&mut self) -> StepOutcome {
        let table = TransitionTable::new(&self.rules);
        let (height, width) = (self.grid.height(), self.grid.width());
        let stride = self.grid.stride();

        let (cells, scratch) = self.grid.buffers_mut();
        let lattice = Lattice {
            cells,
            height,
            width,
        };
        let unchanged: usize = (1..=height)
            .map(|row| {
                let next_row = &mut scratch[row * stride..(row + 1) * stride];
                evaluate_row(lattice, &self.rules, &table, row, next_row)
            })
            .sum();

        self.finish(unchanged)
    }

    /// Advance one generation, evaluating rows in parallel.
    ///
    /// Produces exactly the same outcome and grid as [`Self::step`].
    pub fn step_parallel(&mut self) -> StepOutcome {
        let table = TransitionTable::new(&self.rules);
        let (height, width) = (self.grid.height(), self.grid.width());
        let stride = self.grid.stride();
        let rules = &self.rules;

        let (cells, scratch) = self.grid.buffers_mut();
        let lattice = Lattice {
            cells,
            height,
            width,
        };
        let unchanged: usize = scratch
            .par_chunks_mut(stride)
            .enumerate()
            .filter(|(row, _)| (1..=height).contains(row))
            .map(|(row, next_row)| evaluate_row(lattice, rules, &table, row, next_row))
            .sum();

        self.finish(unchanged)
    }

    fn finish(&mut self, unchanged: usize) -> StepOutcome {
        if unchanged == self.grid.area() {
            log::info!(
                "Stalled at generation {}: all the next generations will be the same",
                self.generation
            );
            return StepOutcome::Stalled {
                generation: self.generation,
                population: self.grid.population(),
            };
        }

        let population = self.grid.commit();
        self.generation += 1;
        log::debug!(
            "Generation {}: population {}",
            self.generation,
            population
        );
        StepOutcome::Stepped {
            generation: self.generation,
            population,
        }
    }

    /// Step up to `max_steps` times, stopping early on a stall.
    pub fn run(&mut self, max_steps: u64) -> RunReport {
        let mut steps = 0;
        let mut stalled = false;
        while steps < max_steps {
            if self.step().is_stalled() {
                stalled = true;
                break;
            }
            steps += 1;
        }
        RunReport {
            steps,
            stalled,
            generation: self.generation,
            population: self.grid.population(),
        }
    }

    pub fn stats(&self) -> GenerationStats {
        GenerationStats::from_engine(self)
    }
}

/// Counter snapshot for monitoring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationStats {
    pub generation: u64,
    pub population: usize,
    pub height: usize,
    pub width: usize,
    /// Live fraction of the addressable cells.
    pub density: f64,
}

impl GenerationStats {
    pub fn from_engine(engine: &GenerationEngine) -> Self {
        let grid = engine.grid();
        Self {
            generation: engine.generation(),
            population: grid.population(),
            height: grid.height(),
            width: grid.width(),
            density: grid.population() as f64 / grid.area() as f64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Neighborhood, Topology};
    use proptest::prelude::*;

    fn engine_with(
        height: usize,
        width: usize,
        rules: RuleSet,
        live: &[(usize, usize)],
    ) -> GenerationEngine {
        let mut engine = GenerationEngine::new(height, width, rules).unwrap();
        for &(r, c) in live {
            engine.set(r, c, true).unwrap();
        }
        engine
    }

    fn live(engine: &GenerationEngine) -> Vec<(usize, usize)> {
        engine.grid().live_cells().collect()
    }

    #[test]
    fn test_blinker_period_two() {
        let vertical = [(1, 2), (2, 2), (3, 2)];
        let mut engine = engine_with(3, 3, RuleSet::conway(), &vertical);

        let outcome = engine.step();
        assert_eq!(
            outcome,
            StepOutcome::Stepped {
                generation: 1,
                population: 3
            }
        );
        assert_eq!(live(&engine), vec![(2, 1), (2, 2), (2, 3)]);

        engine.step();
        assert_eq!(live(&engine), vertical.to_vec());
        assert_eq!(engine.generation(), 2);
    }

    #[test]
    fn test_toroidal_birth_on_one() {
        let rules = RuleSet::new([1], []).with_topology(Topology::Toroidal);
        let mut engine = engine_with(5, 5, rules, &[(1, 1)]);

        let outcome = engine.step();
        assert_eq!(outcome.population(), 8);

        let mut expected = Vec::new();
        for r in [5, 1, 2] {
            for c in [5, 1, 2] {
                if (r, c) != (1, 1) {
                    expected.push((r, c));
                }
            }
        }
        expected.sort();
        assert_eq!(live(&engine), expected);
        assert!(!engine.get(1, 1).unwrap());
    }

    #[test]
    fn test_empty_grid_stalls() {
        let mut engine = GenerationEngine::new(6, 6, RuleSet::conway()).unwrap();
        let outcome = engine.step();
        assert_eq!(
            outcome,
            StepOutcome::Stalled {
                generation: 0,
                population: 0
            }
        );
        assert_eq!(engine.generation(), 0);
        // Still callable after a stall.
        assert!(engine.step().is_stalled());
    }

    #[test]
    fn test_birth_at_zero_does_not_stall_on_empty_grid() {
        let mut engine = GenerationEngine::new(3, 3, RuleSet::new([0], [])).unwrap();
        let outcome = engine.step();
        assert!(!outcome.is_stalled());
        assert_eq!(engine.population(), 9);
    }

    #[test]
    fn test_still_life_stalls_without_commit() {
        let block = [(2, 2), (2, 3), (3, 2), (3, 3)];
        let mut engine = engine_with(4, 4, RuleSet::conway(), &block);
        let outcome = engine.step();
        assert_eq!(
            outcome,
            StepOutcome::Stalled {
                generation: 0,
                population: 4
            }
        );
        assert_eq!(live(&engine), block.to_vec());
    }

    #[test]
    fn test_bounded_edge_kills_where_torus_survives() {
        // A horizontal line across the full width of a torus is a row of
        // cells with two neighbors each.
        let line = [(2, 1), (2, 2), (2, 3), (2, 4)];
        let rules = RuleSet::new([], [2]);

        let mut bounded = engine_with(4, 4, rules.clone(), &line);
        bounded.step();
        assert_eq!(live(&bounded), vec![(2, 2), (2, 3)]);

        let mut torus = engine_with(4, 4, rules.with_topology(Topology::Toroidal), &line);
        assert!(torus.step().is_stalled());
    }

    #[test]
    fn test_von_neumann_step() {
        // A plus shape under B1/S with Von Neumann neighbors.
        let rules = RuleSet::new([1], []).with_neighborhood(Neighborhood::VonNeumann);
        let mut engine = engine_with(5, 5, rules, &[(3, 3)]);
        engine.step();
        assert_eq!(live(&engine), vec![(2, 3), (3, 2), (3, 4), (4, 3)]);
    }

    #[test]
    fn test_clear_and_resize_reset_generation() {
        let mut engine = engine_with(3, 3, RuleSet::conway(), &[(1, 2), (2, 2), (3, 2)]);
        engine.step();
        engine.clear();
        assert_eq!(engine.generation(), 0);
        assert_eq!(engine.population(), 0);

        engine.step();
        engine.resize(8, 9).unwrap();
        assert_eq!(engine.generation(), 0);
        assert_eq!(engine.grid().area(), 72);
        assert!(engine.resize(0, 9).is_err());
    }

    #[test]
    fn test_torus_one_row_cell_is_not_its_own_neighbor() {
        let rules = RuleSet::conway().with_topology(Topology::Toroidal);
        let mut engine = engine_with(1, 3, rules, &[(1, 2)]);
        assert_eq!(
            engine.step(),
            StepOutcome::Stepped {
                generation: 1,
                population: 2
            }
        );
        assert_eq!(live(&engine), vec![(1, 1), (1, 3)]);
    }

    #[test]
    fn test_torus_single_cell_dies() {
        let rules = RuleSet::conway().with_topology(Topology::Toroidal);
        let mut engine = engine_with(1, 1, rules, &[(1, 1)]);
        assert_eq!(
            engine.step(),
            StepOutcome::Stepped {
                generation: 1,
                population: 0
            }
        );
    }

    #[test]
    fn test_run_stops_on_stall() {
        // A lone cell dies, then the empty grid stalls.
        let mut engine = engine_with(5, 5, RuleSet::conway(), &[(3, 3)]);
        let report = engine.run(100);
        assert_eq!(
            report,
            RunReport {
                steps: 1,
                stalled: true,
                generation: 1,
                population: 0
            }
        );
    }

    #[test]
    fn test_run_bounded_by_max_steps() {
        let mut engine = engine_with(3, 3, RuleSet::conway(), &[(1, 2), (2, 2), (3, 2)]);
        let report = engine.run(7);
        assert_eq!(report.steps, 7);
        assert!(!report.stalled);
        assert_eq!(live(&engine), vec![(2, 1), (2, 2), (2, 3)]);
    }

    #[test]
    fn test_stats() {
        let engine = engine_with(2, 5, RuleSet::conway(), &[(1, 1), (2, 5)]);
        let stats = engine.stats();
        assert_eq!(stats.population, 2);
        assert_eq!((stats.height, stats.width), (2, 5));
        assert!((stats.density - 0.2).abs() < 1e-12);
    }

    fn arb_engine() -> impl Strategy<Value = GenerationEngine> {
        let rules = (
            prop::collection::btree_set(0u8..=8, 0..5),
            prop::collection::btree_set(0u8..=8, 0..5),
            any::<bool>(),
            any::<bool>(),
        )
            .prop_map(|(birth, survival, moore, torus)| RuleSet {
                birth,
                survival,
                neighborhood: if moore {
                    Neighborhood::Moore
                } else {
                    Neighborhood::VonNeumann
                },
                topology: if torus {
                    Topology::Toroidal
                } else {
                    Topology::Bounded
                },
            });
        (1usize..10, 1usize..10, rules).prop_flat_map(|(h, w, rules)| {
            prop::collection::vec(any::<bool>(), h * w).prop_map(move |cells| {
                let mut grid = Grid::new(h, w).unwrap();
                grid.fill_from(&cells);
                GenerationEngine::with_grid(grid, rules.clone())
            })
        })
    }

    proptest! {
        #[test]
        fn test_parallel_matches_sequential(engine in arb_engine()) {
            let mut seq = engine.clone();
            let mut par = engine;
            for _ in 0..3 {
                prop_assert_eq!(seq.step(), par.step_parallel());
                prop_assert_eq!(
                    seq.grid().live_cells().collect::<Vec<_>>(),
                    par.grid().live_cells().collect::<Vec<_>>()
                );
            }
        }

        #[test]
        fn test_step_is_deterministic(engine in arb_engine()) {
            let mut a = engine.clone();
            let mut b = engine;
            prop_assert_eq!(a.step(), b.step());
            prop_assert_eq!(
                a.grid().live_cells().collect::<Vec<_>>(),
                b.grid().live_cells().collect::<Vec<_>>()
            );
        }

        #[test]
        fn test_transition_law(engine in arb_engine()) {
            let before = engine.clone();
            let mut after = engine;
            let outcome = after.step();
            let grid = before.grid();
            for row in 1..=grid.height() {
                for col in 1..=grid.width() {
                    let alive = grid.get(row, col).unwrap();
                    let n = crate::compute::live_neighbors(grid, before.rules(), row, col).unwrap();
                    let expected = if alive {
                        before.rules().survival.contains(&n)
                    } else {
                        before.rules().birth.contains(&n)
                    };
                    if !outcome.is_stalled() {
                        prop_assert_eq!(after.get(row, col).unwrap(), expected);
                    } else {
                        prop_assert_eq!(alive, expected);
                    }
                }
            }
        }
    }
}
