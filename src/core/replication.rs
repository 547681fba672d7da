use super::environment::Environment;
use rayon::prelude::*;
use serde::Serialize;
use uuid::Uuid;

/// Outcome of one independent replication.
///
/// `output` is whatever the model's run function extracted from its
/// environment (typically a struct of monitor means); it derives `Serialize`
/// when the output does, for handing batches to external analysis scripts.
#[derive(Debug, Clone, Serialize)]
pub struct ReplicationResult<T> {
    /// Random identifier for this run, independent of the seed
    pub run_id: String,
    /// Seed the replication's environment was constructed with
    pub seed: u64,
    /// Model-defined summary extracted at run end
    pub output: T,
}

/// Run one isolated replication per seed, in parallel.
///
/// Each replication builds its model and runs it against a fresh
/// `Environment`; nothing is shared between replications, so no
/// synchronization is involved beyond the fork/join itself. Results come
/// back in seed order regardless of completion order.
pub fn run_replications<T, F>(seeds: &[u64], run: F) -> Vec<ReplicationResult<T>>
where
    T: Send,
    F: Fn(&mut Environment) -> T + Send + Sync,
{
    seeds
        .par_iter()
        .map(|&seed| {
            let mut env = Environment::new(seed);
            let output = run(&mut env);
            ReplicationResult {
                run_id: Uuid::new_v4().to_string(),
                seed,
                output,
            }
        })
        .collect()
}
