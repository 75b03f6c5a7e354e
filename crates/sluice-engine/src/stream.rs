//! The three streaming stages of one executor chunk.
//!
//! ```text
//!   tile ──► [stream-in] ──in_tx/in_rx──► [compute] ──out_tx/out_rx──► [stream-out] ──► spare tile
//!            padded + halo   bounded(N)     kernel      bounded(N)       W x H cells
//! ```
//!
//! Each stage runs on its own scoped thread and blocks on its channels.
//! A stage that panics drops its channel ends, which unblocks and fails its
//! peers; [`run_chunk`] then reports the root cause rather than the
//! disconnects it caused.

use std::any::Any;
use std::ops::Range;
use std::thread::{self, Scope, ScopedJoinHandle};

use crossbeam_channel::{Receiver, Sender};
use sluice_core::{Cell, Grid, Position, TransitionFunction};
use sluice_kernel::{KernelStats, PaddedLayout, PipelineKernel};
use tracing::trace;

use crate::clock::Clock;
use crate::error::{ExecutorError, StageKind};
use crate::runtime::PassTiming;

/// Everything one chunk needs besides the tile itself.
pub(crate) struct Chunk<'a, F: TransitionFunction + ?Sized> {
    pub transition: &'a F,
    pub layout: PaddedLayout,
    pub pipeline_length: usize,
    pub generations: Range<u64>,
    pub halo: F::Cell,
    pub channel_capacity: usize,
    pub clock: &'a dyn Clock,
}

/// Result of a successful chunk.
pub(crate) struct ChunkOutput<C> {
    pub grid: Grid<C>,
    pub stats: KernelStats,
    pub timing: PassTiming,
}

/// Why a stage stopped, ordered from most to least likely root cause.
#[derive(Debug)]
enum Fault {
    Panicked(String),
    Failed(String),
    PeerLost(String),
}

impl Fault {
    fn rank(&self) -> u8 {
        match self {
            Self::Panicked(_) => 0,
            Self::Failed(_) => 1,
            Self::PeerLost(_) => 2,
        }
    }
}

#[derive(Debug)]
struct StageError {
    stage: StageKind,
    fault: Fault,
}

impl From<StageError> for ExecutorError {
    fn from(e: StageError) -> Self {
        let reason = match e.fault {
            Fault::Panicked(msg) => format!("panicked: {msg}"),
            Fault::Failed(msg) | Fault::PeerLost(msg) => msg,
        };
        ExecutorError::StageFailed {
            stage: e.stage,
            reason,
        }
    }
}

/// Run stream-in, compute and stream-out over `tile` and return the next
/// tile. `spare` is reused as the output allocation.
pub(crate) fn run_chunk<F>(
    chunk: &Chunk<'_, F>,
    tile: &Grid<F::Cell>,
    spare: Vec<F::Cell>,
) -> Result<ChunkOutput<F::Cell>, ExecutorError>
where
    F: TransitionFunction + ?Sized,
{
    let (in_tx, in_rx) = crossbeam_channel::bounded(chunk.channel_capacity);
    let (out_tx, out_rx) = crossbeam_channel::bounded(chunk.channel_capacity);
    let extent = tile.extent();

    thread::scope(|s| {
        let feeder = spawn(s, StageKind::StreamIn, move || {
            stream_in(tile, &chunk.layout, chunk.halo, in_tx)
        });
        let computer = spawn(s, StageKind::Compute, move || compute(chunk, in_rx, out_tx));
        let collector = spawn(s, StageKind::StreamOut, move || {
            stream_out(out_rx, extent, spare)
        });

        let fed = join(StageKind::StreamIn, feeder);
        let computed = join(StageKind::Compute, computer);
        let collected = join(StageKind::StreamOut, collector);

        match (fed, computed, collected) {
            (Ok(_), Ok((stats, timing)), Ok(grid)) => Ok(ChunkOutput {
                grid,
                stats,
                timing,
            }),
            (fed, computed, collected) => {
                Err(root_cause([fed.err(), computed.err(), collected.err()]))
            }
        }
    })
}

fn spawn<'scope, 'env, T, S>(
    scope: &'scope Scope<'scope, 'env>,
    stage: StageKind,
    body: S,
) -> Result<ScopedJoinHandle<'scope, Result<T, Fault>>, StageError>
where
    T: Send + 'scope,
    S: FnOnce() -> Result<T, Fault> + Send + 'scope,
{
    thread::Builder::new()
        .name(stage.thread_name().to_string())
        .spawn_scoped(scope, body)
        .map_err(|e| StageError {
            stage,
            fault: Fault::Failed(format!("could not spawn thread: {e}")),
        })
}

fn join<T>(
    stage: StageKind,
    handle: Result<ScopedJoinHandle<'_, Result<T, Fault>>, StageError>,
) -> Result<T, StageError> {
    match handle?.join() {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(fault)) => Err(StageError { stage, fault }),
        Err(payload) => Err(StageError {
            stage,
            fault: Fault::Panicked(panic_message(payload.as_ref())),
        }),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

fn root_cause(errors: [Option<StageError>; 3]) -> ExecutorError {
    errors
        .into_iter()
        .flatten()
        .min_by_key(|e| e.fault.rank())
        .map(ExecutorError::from)
        .unwrap_or_else(|| ExecutorError::StageFailed {
            stage: StageKind::Compute,
            reason: "chunk failed without a stage error".to_string(),
        })
}

/// Emit the tile as a halo-padded, column-major stream over the full tile
/// capacity.
fn stream_in<C: Cell>(
    tile: &Grid<C>,
    layout: &PaddedLayout,
    halo: C,
    tx: Sender<C>,
) -> Result<usize, Fault> {
    let len = layout.stream_len();
    for i in 0..len {
        let cell = match layout.grid_position(i) {
            Some(pos) => tile[pos],
            None => halo,
        };
        tx.send(cell).map_err(|_| {
            Fault::PeerLost(format!("compute stage hung up after {i} of {len} cells"))
        })?;
    }
    trace!(cells = len, "stream-in complete");
    Ok(len)
}

fn compute<F>(
    chunk: &Chunk<'_, F>,
    rx: Receiver<F::Cell>,
    tx: Sender<F::Cell>,
) -> Result<(KernelStats, PassTiming), Fault>
where
    F: TransitionFunction + ?Sized,
{
    let kernel = PipelineKernel::new(
        chunk.transition,
        chunk.layout,
        chunk.pipeline_length,
        chunk.generations.clone(),
        chunk.halo,
    );
    let start = chunk.clock.now();
    let stats = kernel.execute(rx.iter(), |cell| {
        tx.send(cell)
            .map_err(|_| Fault::PeerLost("stream-out stage hung up".to_string()))
    })?;
    let end = chunk.clock.now();
    let expected = chunk.layout.stream_len();
    if stats.consumed != expected {
        return Err(Fault::PeerLost(format!(
            "stream-in delivered {} of {expected} cells",
            stats.consumed
        )));
    }
    Ok((stats, PassTiming { start, end }))
}

/// Collect exactly `extent.area()` cells into `buffer`.
fn stream_out<C: Cell>(
    rx: Receiver<C>,
    extent: Position,
    mut buffer: Vec<C>,
) -> Result<Grid<C>, Fault> {
    let expected = extent.area();
    buffer.clear();
    buffer.reserve(expected);
    for cell in rx.iter() {
        if buffer.len() == expected {
            return Err(Fault::Failed(format!(
                "compute stage emitted more than {expected} cells"
            )));
        }
        buffer.push(cell);
    }
    if buffer.len() != expected {
        return Err(Fault::PeerLost(format!(
            "compute stage ended after {} of {expected} cells",
            buffer.len()
        )));
    }
    trace!(cells = expected, "stream-out complete");
    Grid::from_column_major(extent.c, extent.r, buffer)
        .map_err(|e| Fault::Failed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use sluice_core::transition::FnTransition;
    use sluice_core::Window;
    use sluice_test_utils::{random_grid, reference_run, MixTransition};
    use std::time::Duration;

    fn chunk<'a, F: TransitionFunction>(
        transition: &'a F,
        radius: usize,
        tile: Position,
        grid: Position,
        generations: Range<u64>,
        clock: &'a dyn Clock,
    ) -> Chunk<'a, F> {
        Chunk {
            transition,
            layout: PaddedLayout::new(radius, tile, grid),
            pipeline_length: 4,
            generations,
            halo: transition.halo(),
            channel_capacity: 1,
            clock,
        }
    }

    #[test]
    fn chunk_matches_reference() {
        let clock = ManualClock::stepping(Duration::from_millis(10));
        let grid = random_grid(5, 3, 1000, 11);
        let c = chunk(&MixTransition, 2, Position::new(7, 4), grid.extent(), 3..7, &clock);
        let out = run_chunk(&c, &grid, Vec::new()).unwrap();
        let expected = reference_run(&grid, 2, MixTransition::HALO, &MixTransition, 3, 4, 4);
        assert_eq!(out.grid, expected);
        assert_eq!(out.stats.emitted, 15);
        assert_eq!(out.timing.duration(), Duration::from_millis(10));
    }

    #[test]
    fn panicking_transition_is_reported_as_compute_failure() {
        let clock = ManualClock::new();
        let boom = FnTransition::new(0u32, |w: &mut Window<u32>| {
            if w.center == Position::new(1, 1) {
                panic!("bad cell");
            }
            w.center_cell()
        });
        let grid = Grid::filled(3, 3, 1u32);
        let c = chunk(&boom, 1, grid.extent(), grid.extent(), 0..1, &clock);
        match run_chunk(&c, &grid, Vec::new()) {
            Err(ExecutorError::StageFailed {
                stage: StageKind::Compute,
                reason,
            }) => assert!(reason.contains("bad cell"), "{reason}"),
            other => panic!("expected compute failure, got {:?}", other.err()),
        }
    }

    #[test]
    fn stream_in_pads_with_halo() {
        let layout = PaddedLayout::new(1, Position::new(2, 2), Position::new(1, 1));
        let grid = Grid::filled(1, 1, 5u8);
        let (tx, rx) = crossbeam_channel::unbounded();
        assert_eq!(stream_in(&grid, &layout, 0, tx).unwrap(), 16);
        let cells: Vec<u8> = rx.iter().collect();
        assert_eq!(cells.len(), 16);
        assert_eq!(cells[4 + 1], 5);
        assert_eq!(cells.iter().filter(|&&c| c == 5).count(), 1);
    }

    #[test]
    fn stream_out_rejects_surplus_cells() {
        let (tx, rx) = crossbeam_channel::unbounded();
        for v in 0..5u8 {
            tx.send(v).unwrap();
        }
        drop(tx);
        match stream_out(rx, Position::new(2, 2), Vec::new()) {
            Err(Fault::Failed(msg)) => assert!(msg.contains("more than 4")),
            other => panic!("expected surplus failure, got {other:?}"),
        }
    }

    #[test]
    fn stream_out_reports_short_stream_as_peer_loss() {
        let (tx, rx) = crossbeam_channel::unbounded();
        tx.send(1u8).unwrap();
        drop(tx);
        assert!(matches!(
            stream_out(rx, Position::new(2, 2), Vec::new()),
            Err(Fault::PeerLost(_))
        ));
    }

    #[test]
    fn root_cause_prefers_panics_over_disconnects() {
        let err = root_cause([
            Some(StageError {
                stage: StageKind::StreamIn,
                fault: Fault::PeerLost("hung up".into()),
            }),
            Some(StageError {
                stage: StageKind::Compute,
                fault: Fault::Panicked("boom".into()),
            }),
            None,
        ]);
        assert_eq!(
            err,
            ExecutorError::StageFailed {
                stage: StageKind::Compute,
                reason: "panicked: boom".into()
            }
        );
    }
}
