use std::{hash::BuildHasher, panic, thread};

use tracing::{debug, warn};

use crate::{
    chunk::{aggregate_chunk, Chunk},
    config::EngineConfig,
    error::Result,
    table::PartialTable,
};

/// Aggregates every chunk on its own scoped thread and returns once all of them are
/// done. Workers only share the read-only `input`, each one owns its table.
///
/// A chunk whose thread can't be spawned is aggregated on the calling thread instead.
/// If any worker fails, the first error is returned and no table is handed back; a
/// worker panic is resumed on the calling thread.
pub fn run_workers<S>(
    input: &[u8],
    chunks: &[Chunk],
    config: &EngineConfig,
) -> Result<Vec<PartialTable<S>>>
where
    S: BuildHasher + Default + Send,
{
    thread::scope(|s| {
        let mut handles = Vec::with_capacity(chunks.len());
        let mut unspawned = Vec::new();
        for (i, &chunk) in chunks.iter().enumerate() {
            let spawned = thread::Builder::new()
                .name(format!("brc-worker-{i}"))
                .spawn_scoped(s, move || aggregate_chunk::<S>(input, chunk, config));
            match spawned {
                Ok(handle) => handles.push(handle),
                Err(e) => {
                    warn!(worker = i, error = %e, "couldn't spawn worker, running its chunk inline");
                    unspawned.push(chunk);
                }
            }
        }
        debug!(spawned = handles.len(), inline = unspawned.len(), "workers started");

        let inline_results = run_inline::<S>(input, &unspawned, config);
        // blocks until every worker has finished
        let joined = handles.into_iter().map(|handle| match handle.join() {
            Ok(result) => result,
            Err(payload) => panic::resume_unwind(payload),
        });
        first_error_or_all(inline_results.into_iter().chain(joined))
    })
}

/// Aggregates `chunks` one after the other on the calling thread.
fn run_inline<S>(
    input: &[u8],
    chunks: &[Chunk],
    config: &EngineConfig,
) -> Vec<Result<PartialTable<S>>>
where
    S: BuildHasher + Default,
{
    chunks
        .iter()
        .map(|&chunk| aggregate_chunk::<S>(input, chunk, config))
        .collect()
}

/// Every table, or the first error if any result failed. All results are consumed
/// either way, so every worker is joined.
fn first_error_or_all<S>(
    results: impl Iterator<Item = Result<PartialTable<S>>>,
) -> Result<Vec<PartialTable<S>>> {
    let mut tables = Vec::new();
    let mut first_error = None;
    for result in results {
        match result {
            Ok(table) => tables.push(table),
            Err(e) => {
                first_error.get_or_insert(e);
            }
        }
    }
    match first_error {
        Some(e) => Err(e),
        None => Ok(tables),
    }
}
