use std::collections::{HashMap, HashSet, VecDeque};

use calcgrid_common::Position;

/// Reverse reference index between cells
///
/// Maps a position to the set of positions whose formulas reference it.
/// Edges exist exactly for the formulas currently installed in the sheet;
/// the sheet keeps the graph acyclic by checking before every commit.
#[derive(Debug, Default)]
pub struct DependencyGraph {
    dependents: HashMap<Position, HashSet<Position>>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that the formula at `dependent` references `referenced`
    pub fn add_edge(&mut self, referenced: Position, dependent: Position) {
        self.dependents
            .entry(referenced)
            .or_default()
            .insert(dependent);
    }

    /// Remove the edge added by `add_edge`; absent edges are ignored
    pub fn remove_edge(&mut self, referenced: Position, dependent: Position) {
        if let Some(dependents) = self.dependents.get_mut(&referenced) {
            dependents.remove(&dependent);
            if dependents.is_empty() {
                self.dependents.remove(&referenced);
            }
        }
    }

    /// Positions whose formulas directly reference `pos`
    pub fn direct_dependents(&self, pos: Position) -> impl Iterator<Item = Position> + '_ {
        self.dependents.get(&pos).into_iter().flatten().copied()
    }

    /// All positions transitively dependent on `pos` (excluding `pos`)
    ///
    /// BFS over reverse edges; the visited set guards against revisits on
    /// diamond-shaped graphs.
    pub fn transitive_dependents(&self, pos: Position) -> HashSet<Position> {
        let mut visited = HashSet::new();
        let mut queue: VecDeque<Position> = self.direct_dependents(pos).collect();

        while let Some(current) = queue.pop_front() {
            if !visited.insert(current) {
                continue;
            }
            queue.extend(self.direct_dependents(current));
        }

        visited
    }

    pub fn is_empty(&self) -> bool {
        self.dependents.is_empty()
    }
}
