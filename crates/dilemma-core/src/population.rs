use crate::payoff::Strategy;

/// Flat per-node state arrays, indexed by node id.
///
/// Pure data: the world phases own all behavior. Observation collaborators
/// read the slice accessors between steps and never mutate. The arrays are
/// sized once at construction; "death" and "birth" only flip occupancy flags
/// and overwrite fields.
#[derive(Clone, Debug, PartialEq)]
pub struct Population {
    pub(crate) occupied: Vec<bool>,
    pub(crate) strategy: Vec<Strategy>,
    pub(crate) friendliness: Vec<f64>,
    pub(crate) payoff: Vec<f64>,
}

impl Population {
    pub(crate) fn new(node_count: usize, initial_friendliness: f64) -> Self {
        Self {
            occupied: vec![false; node_count],
            strategy: vec![Strategy::Defect; node_count],
            friendliness: vec![initial_friendliness; node_count],
            payoff: vec![0.0; node_count],
        }
    }

    pub fn node_count(&self) -> usize {
        self.occupied.len()
    }

    pub fn occupied(&self) -> &[bool] {
        &self.occupied
    }

    pub fn strategies(&self) -> &[Strategy] {
        &self.strategy
    }

    pub fn friendliness(&self) -> &[f64] {
        &self.friendliness
    }

    pub fn payoffs(&self) -> &[f64] {
        &self.payoff
    }

    pub fn occupied_count(&self) -> usize {
        self.occupied.iter().filter(|&&occupied| occupied).count()
    }

    /// Occupied node ids, ascending.
    pub(crate) fn occupied_ids(&self) -> Vec<usize> {
        self.occupied
            .iter()
            .enumerate()
            .filter_map(|(id, &occupied)| occupied.then_some(id))
            .collect()
    }

    /// Unoccupied node ids, ascending.
    pub(crate) fn empty_ids(&self) -> Vec<usize> {
        self.occupied
            .iter()
            .enumerate()
            .filter_map(|(id, &occupied)| (!occupied).then_some(id))
            .collect()
    }
}
