use std::collections::{HashMap, HashSet, VecDeque};
use std::{error::Error, fmt};

/// Undirected simple graph over contiguous node ids `0..node_count`.
///
/// The engine never builds topology itself; callers construct a graph and hand
/// it over at [`crate::world::World::new`]. Self-loops and out-of-range ids are
/// rejected at edge insertion, so a `Graph` value always satisfies the
/// engine's contract. Neighbor lists are kept sorted ascending so iteration
/// order is deterministic.
#[derive(Clone, Debug)]
pub struct Graph {
    adjacency: Vec<Vec<usize>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    SelfLoop { node: usize },
    NodeOutOfRange { node: usize, node_count: usize },
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphError::SelfLoop { node } => {
                write!(f, "self-loop on node {node} is not allowed")
            }
            GraphError::NodeOutOfRange { node, node_count } => {
                write!(f, "node {node} is outside 0..{node_count}")
            }
        }
    }
}

impl Error for GraphError {}

impl Graph {
    pub fn new(node_count: usize) -> Self {
        Self {
            adjacency: vec![Vec::new(); node_count],
        }
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Insert an undirected edge. Duplicate insertions are ignored.
    pub fn add_edge(&mut self, u: usize, v: usize) -> Result<(), GraphError> {
        let node_count = self.adjacency.len();
        for node in [u, v] {
            if node >= node_count {
                return Err(GraphError::NodeOutOfRange { node, node_count });
            }
        }
        if u == v {
            return Err(GraphError::SelfLoop { node: u });
        }
        Self::insert_sorted(&mut self.adjacency[u], v);
        Self::insert_sorted(&mut self.adjacency[v], u);
        Ok(())
    }

    fn insert_sorted(list: &mut Vec<usize>, value: usize) {
        if let Err(pos) = list.binary_search(&value) {
            list.insert(pos, value);
        }
    }

    /// Neighbor ids of `node`, ascending.
    pub fn neighbors(&self, node: usize) -> &[usize] {
        &self.adjacency[node]
    }

    pub fn degree(&self, node: usize) -> usize {
        self.adjacency[node].len()
    }

    /// Breadth-first shortest-path lengths from `from` to the given targets
    /// only. Unreachable targets are absent from the result. The search stops
    /// as soon as every target has been resolved.
    pub fn shortest_path_lengths(&self, from: usize, targets: &[usize]) -> HashMap<usize, usize> {
        let mut remaining: HashSet<usize> = targets.iter().copied().collect();
        let mut found = HashMap::with_capacity(remaining.len());
        let mut visited = vec![false; self.adjacency.len()];
        let mut queue = VecDeque::new();
        visited[from] = true;
        queue.push_back((from, 0usize));
        if remaining.remove(&from) {
            found.insert(from, 0);
        }
        while let Some((node, dist)) = queue.pop_front() {
            if remaining.is_empty() {
                break;
            }
            for &next in &self.adjacency[node] {
                if visited[next] {
                    continue;
                }
                visited[next] = true;
                if remaining.remove(&next) {
                    found.insert(next, dist + 1);
                }
                queue.push_back((next, dist + 1));
            }
        }
        found
    }
}
