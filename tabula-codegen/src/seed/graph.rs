//! Table dependency graph and its topological order

use std::collections::BTreeSet;

/// Directed graph over table positions; an edge `a -> b` means `a` must be emitted before `b`
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    dependents: Vec<BTreeSet<usize>>,
    indegree: Vec<usize>,
}

impl DependencyGraph {
    pub fn new(nodes: usize) -> Self {
        Self {
            dependents: vec![BTreeSet::new(); nodes],
            indegree: vec![0; nodes],
        }
    }

    /// Record that `from` must precede `to`. Self-edges and repeats are ignored.
    pub fn add_edge(&mut self, from: usize, to: usize) {
        if from == to {
            return;
        }
        if self.dependents[from].insert(to) {
            self.indegree[to] += 1;
        }
    }

    pub fn has_edge(&self, from: usize, to: usize) -> bool {
        self.dependents
            .get(from)
            .map(|d| d.contains(&to))
            .unwrap_or(false)
    }

    /// Kahn's algorithm; among ready nodes the lowest position goes first.
    ///
    /// On a cycle, returns the positions that could not be ordered.
    pub fn order(&self) -> Result<Vec<usize>, Vec<usize>> {
        let mut indegree = self.indegree.clone();
        let mut ready: BTreeSet<usize> = indegree
            .iter()
            .enumerate()
            .filter(|(_, degree)| **degree == 0)
            .map(|(node, _)| node)
            .collect();

        let mut ordered = Vec::with_capacity(indegree.len());
        while let Some(node) = ready.pop_first() {
            ordered.push(node);
            for &child in &self.dependents[node] {
                indegree[child] -= 1;
                if indegree[child] == 0 {
                    ready.insert(child);
                }
            }
        }

        if ordered.len() == indegree.len() {
            Ok(ordered)
        } else {
            Err(indegree
                .iter()
                .enumerate()
                .filter(|(_, degree)| **degree > 0)
                .map(|(node, _)| node)
                .collect())
        }
    }
}
