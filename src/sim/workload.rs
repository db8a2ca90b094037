//! Insert/delete decision traces that settle around a target load.

use rand::Rng;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    Insert,
    Delete,
}

/// A pre-generated decision trace. Keys are implied: the n-th insert adds
/// key `n`, and each delete removes the oldest resident key.
#[derive(Clone, Debug)]
pub struct Workload {
    decisions: Vec<Decision>,
    inserts: usize,
}

impl Workload {
    /// Draw decisions until `max_deletions` deletes were emitted.
    ///
    /// At fill `n` the delete probability is `l / (l + weight * (1 - l))` with
    /// `l = n / capacity`, so the trace hovers around load
    /// `weight / (1 + weight)` and never exceeds the capacity.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero. `SimConfig::validate` rejects that case
    /// before a `Simulation` generates its trace.
    pub fn generate<R>(capacity: usize, weight: u32, max_deletions: usize, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        assert!(capacity > 0, "capacity must be positive");
        let w = f64::from(weight);
        let mut decisions = Vec::new();
        let (mut fill, mut inserts, mut deletes) = (0usize, 0usize, 0usize);

        while deletes < max_deletions {
            let load = fill as f64 / capacity as f64;
            let delete_p = load / (load + w * (1.0 - load));
            let r: f64 = rng.random();
            if fill == 0 || (fill < capacity && r > delete_p) {
                decisions.push(Decision::Insert);
                fill += 1;
                inserts += 1;
            } else {
                decisions.push(Decision::Delete);
                fill -= 1;
                deletes += 1;
            }
        }
        Self { decisions, inserts }
    }

    pub fn decisions(&self) -> &[Decision] {
        &self.decisions
    }

    /// Total number of keys the trace inserts.
    pub fn inserts(&self) -> usize {
        self.inserts
    }

    pub fn deletions(&self) -> usize {
        self.decisions.len() - self.inserts
    }

    pub fn len(&self) -> usize {
        self.decisions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decisions.is_empty()
    }
}
