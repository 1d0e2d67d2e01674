use std::collections::TryReserveError;
use thiserror::Error;

/// The only *error* kind the core produces (§7 of the spec this crate
/// implements). Locator misses and traverser no-hits are normal outcomes
/// and are modeled as `LocateResult`/`TraceResult` variants instead — see
/// `grid::LocateResult` and `grid::TraceResult`.
#[derive(Debug, Error)]
pub enum GridError {
    #[error("out of memory while allocating grid voxels")]
    OutOfMemory(#[from] TryReserveError),
}

pub type Result<T> = ::std::result::Result<T, GridError>;
