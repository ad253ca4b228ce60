use crate::core::models::solution::Solution;
use crate::engine::error::EngineError;
use std::sync::Mutex;

/// Append-only collection of accepted solutions, shared by all workers of one run.
///
/// Appends are the only mutation. Contents are taken out by value once every worker
/// has joined, so readers never race with writers. Storage order follows thread
/// interleaving and carries no meaning.
#[derive(Debug, Default)]
pub struct ResultStore {
    solutions: Mutex<Vec<Solution>>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends every solution of one combination inside a single critical section.
    pub fn append(&self, batch: Vec<Solution>) -> Result<(), EngineError> {
        if batch.is_empty() {
            return Ok(());
        }
        let mut guard = self
            .solutions
            .lock()
            .map_err(|_| EngineError::Internal("Result store lock was poisoned.".to_string()))?;
        guard.extend(batch);
        Ok(())
    }

    pub fn into_solutions(self) -> Result<Vec<Solution>, EngineError> {
        self.solutions
            .into_inner()
            .map_err(|_| EngineError::Internal("Result store lock was poisoned.".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::combination::Combination;
    use crate::core::models::gain::{GainRange, Stage};
    use crate::core::models::solution::{Assignment, Interval, Zone};
    use std::thread;

    fn solution(stage1_max: f64) -> Solution {
        let combination = Combination::new(
            GainRange::new(Stage::First, 1.0, stage1_max).unwrap(),
            GainRange::new(Stage::Second, 1.0, 2.0).unwrap(),
        );
        let zones = std::array::from_fn(|i| {
            Zone::new(1.0, Interval::new(i as f64, i as f64 + 1.0))
        });
        Solution::new(combination, Assignment::IDENTITY, zones)
    }

    #[test]
    fn new_store_is_empty() {
        assert!(ResultStore::new().into_solutions().unwrap().is_empty());
    }

    #[test]
    fn append_keeps_every_solution() {
        let store = ResultStore::new();
        store.append(vec![solution(2.0), solution(3.0)]).unwrap();
        store.append(Vec::new()).unwrap();
        store.append(vec![solution(4.0)]).unwrap();
        assert_eq!(store.into_solutions().unwrap().len(), 3);
    }

    #[test]
    fn concurrent_appends_lose_nothing() {
        let store = ResultStore::new();
        thread::scope(|scope| {
            for t in 0..8 {
                let store = &store;
                scope.spawn(move || {
                    for k in 0..50 {
                        store
                            .append(vec![solution(2.0 + (t * 50 + k) as f64)])
                            .unwrap();
                    }
                });
            }
        });

        let mut maxima: Vec<f64> = store
            .into_solutions()
            .unwrap()
            .iter()
            .map(|s| s.stage1().max())
            .collect();
        maxima.sort_by(f64::total_cmp);
        maxima.dedup();
        assert_eq!(maxima.len(), 400);
    }
}
