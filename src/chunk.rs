use std::{hash::BuildHasher, ops::Range};

use tracing::debug;

use crate::{
    config::EngineConfig,
    error::{Error, MalformedRow, Result},
    parse::{parse_value, split_record, try_parse_value},
    scan::{find_newline, Lines},
    table::PartialTable,
};

/// A line-aligned byte range `[start, end)` of the input.
/// `start` is 0 or one past a `\n`; `end` is the input length or one past a `\n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk {
    pub start: usize,
    pub end: usize,
}

impl Chunk {
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Splits `input` into at most `workers` chunks. Each naive cut `i * len / workers` is
/// moved forward to just past the next `\n`, so no record straddles two chunks.
/// Small inputs give fewer chunks; an empty input gives none.
pub fn partition(input: &[u8], workers: usize) -> Vec<Chunk> {
    let workers = workers.max(1);
    let mut chunks = Vec::with_capacity(workers);
    let mut start = 0;

    for i in 1..=workers {
        if start >= input.len() {
            break;
        }
        let end = if i == workers {
            input.len()
        } else {
            let cut = (input.len() / workers * i).max(start);
            (find_newline(input, cut) + 1).min(input.len())
        };
        debug_assert!(
            end == input.len() || input[end - 1] == b'\n',
            "chunk end should be the very end or one past a newline"
        );
        chunks.push(Chunk { start, end });
        start = end;
    }

    chunks
}

/// Folds every record of `chunk` into a fresh table.
///
/// In strict mode the first malformed row fails the chunk with its absolute offset.
/// Otherwise rows are assumed well-formed: a row without a delimiter trips a debug
/// assertion and is skipped in release builds. Empty lines are always skipped.
pub fn aggregate_chunk<S>(
    input: &[u8],
    chunk: Chunk,
    config: &EngineConfig,
) -> Result<PartialTable<S>>
where
    S: BuildHasher + Default,
{
    let mut table = PartialTable::<S>::with_capacity(config.capacity);
    let mut lines = Lines::new(&input[chunk.range()]);

    if config.strict {
        loop {
            let offset = chunk.start + lines.offset();
            let Some(line) = lines.next() else { break };
            if line.is_empty() {
                continue;
            }
            let malformed = |kind| Error::Malformed { offset, kind };
            let (key, value) =
                split_record(line).ok_or_else(|| malformed(MalformedRow::MissingDelimiter))?;
            let value = try_parse_value(value).map_err(malformed)?;
            table.record(key, value);
        }
    } else {
        for line in lines {
            if line.is_empty() {
                continue;
            }
            let split = split_record(line);
            debug_assert!(
                split.is_some(),
                "row without delimiter: {:?}",
                String::from_utf8_lossy(line)
            );
            let Some((key, value)) = split else { continue };
            table.record(key, parse_value(value));
        }
    }

    debug!(
        start = chunk.start,
        bytes = chunk.len(),
        keys = table.len(),
        "chunk aggregated"
    );
    Ok(table)
}
