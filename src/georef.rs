//! Georeferencing run orchestration: partitioning, dispatch and merge.
//!
//! A run loads the trajectory and every scanner table, then either walks the
//! tables in a single sequential pass sharing one cursor, or splits them into
//! one work unit per file and dispatches the units to a small thread pool.
//! Unit outputs are always merged in ascending unit index, never completion
//! order, so both modes produce rows in file-list order.

use std::path::Path;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use crate::config::Calibration;
use crate::error::{GeorefError, Result, UnitFailure};
use crate::profiles::{self, ProfileTable};
use crate::sync::{self, SyncState, SyncStats, WorldPoint};
use crate::trajectory::Trajectory;
use crate::writer;

/// Options for a georeferencing run.
#[derive(Debug, Clone)]
pub struct GeorefOptions {
    /// Path to the GPS/INS trajectory export.
    pub trajectory_path: String,
    /// Scanner profile files, processed in this order.
    pub scanner_paths: Vec<String>,
    /// Output CSV path.
    pub output_path: String,
    /// Calibration constants shared read-only by every work unit.
    pub calibration: Calibration,
    /// Run one work unit per scanner file instead of a single pass.
    pub partitioned: bool,
    /// Worker threads for partitioned mode; 0 means one per work unit.
    pub workers: usize,
    /// Derive starting offsets by pre-scanning each file instead of trusting
    /// the fixed per-file profile count.
    pub derived_offsets: bool,
    /// Show the plan but do not write any output.
    pub dry_run: bool,
    /// Show a progress bar.
    pub show_progress: bool,
}

/// Counters reported after a successful run.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeorefSummary {
    pub units: usize,
    pub emitted: usize,
    pub skipped_boundaries: usize,
}

struct WorkUnit {
    index: usize,
    start: usize,
}

/// Run the full pipeline: load, synchronize, merge, write.
pub fn run_georef(options: &GeorefOptions) -> Result<GeorefSummary> {
    let trajectory = Trajectory::from_file(Path::new(&options.trajectory_path))?;
    let tables = profiles::load_tables(&options.scanner_paths)?;
    info!(
        poses = trajectory.len(),
        files = tables.len(),
        points = tables.iter().map(|t| t.len()).sum::<usize>(),
        "inputs loaded"
    );

    let spans: Vec<usize> = tables.iter().map(sync::trajectory_rows_consumed).collect();
    let starts: Vec<usize> = if options.derived_offsets {
        spans
            .iter()
            .scan(0usize, |acc, &span| {
                let start = *acc;
                *acc += span;
                Some(start)
            })
            .collect()
    } else {
        (0..tables.len())
            .map(|k| k * options.calibration.profiles_per_file)
            .collect()
    };

    if options.partitioned && !options.derived_offsets {
        for (table, &span) in tables.iter().zip(&spans) {
            if span != options.calibration.profiles_per_file {
                warn!(
                    file = %table.path().display(),
                    consumed = span,
                    assumed = options.calibration.profiles_per_file,
                    "per-file profile count does not match the configured constant; \
                     partitioned output will diverge from a sequential pass"
                );
            }
        }
    }

    println!(
        "Plan: {} scanner files, {} trajectory rows, {} mode → output: {}",
        tables.len(),
        trajectory.len(),
        if options.partitioned { "partitioned" } else { "sequential" },
        options.output_path
    );
    if options.dry_run {
        for (table, &start) in tables.iter().zip(&starts) {
            println!("  {} → start row {}", table.path().display(), start);
        }
        return Ok(GeorefSummary {
            units: tables.len(),
            ..Default::default()
        });
    }

    let pb = if options.show_progress {
        let pb = ProgressBar::new(tables.len() as u64);
        pb.set_style(ProgressStyle::with_template("{bar:30} {pos}/{len} files").unwrap());
        Some(pb)
    } else {
        None
    };

    let mut summary = GeorefSummary {
        units: tables.len(),
        ..Default::default()
    };
    let mut output: Vec<WorldPoint> = Vec::new();

    if options.partitioned {
        let workers = if options.workers == 0 {
            tables.len()
        } else {
            options.workers.min(tables.len())
        }
        .max(1);
        let results = run_partitioned(
            &tables,
            &trajectory,
            &options.calibration,
            &starts,
            workers,
            pb.as_ref(),
        )?;
        // merge strictly in unit-index order
        for (points, stats) in results {
            summary.emitted += stats.emitted;
            summary.skipped_boundaries += stats.skipped;
            output.extend(points);
        }
    } else {
        // one continuous cursor across every table, first failure aborts
        let mut state = SyncState::starting_at(0);
        for table in &tables {
            let stats = sync::synchronize(
                table,
                &trajectory,
                &options.calibration,
                &mut state,
                &mut output,
            )?;
            summary.emitted += stats.emitted;
            summary.skipped_boundaries += stats.skipped;
            if let Some(pb) = &pb {
                pb.inc(1);
            }
        }
    }

    if let Some(pb) = &pb {
        pb.finish_and_clear();
    }

    writer::write_world_points(Path::new(&options.output_path), &output)?;
    info!(
        points = summary.emitted,
        skipped = summary.skipped_boundaries,
        units = summary.units,
        "georeferencing completed"
    );
    Ok(summary)
}

/// Dispatch one work unit per table to `workers` threads and collect the
/// per-unit outputs, indexed by unit.
///
/// Units that are already queued keep running after another unit fails; the
/// merge simply never happens on failure.
fn run_partitioned(
    tables: &[ProfileTable],
    trajectory: &Trajectory,
    calibration: &Calibration,
    starts: &[usize],
    workers: usize,
    pb: Option<&ProgressBar>,
) -> Result<Vec<(Vec<WorldPoint>, SyncStats)>> {
    let (job_tx, job_rx) = flume::unbounded::<WorkUnit>();
    let (result_tx, result_rx) =
        flume::unbounded::<(usize, Result<(Vec<WorldPoint>, SyncStats)>)>();

    for (index, &start) in starts.iter().enumerate() {
        // receiver is still in scope, the queue cannot be closed yet
        job_tx
            .send(WorkUnit { index, start })
            .expect("job queue open");
    }
    drop(job_tx);

    let mut results: Vec<Option<(Vec<WorldPoint>, SyncStats)>> =
        (0..tables.len()).map(|_| None).collect();
    let mut failures: Vec<UnitFailure> = Vec::new();

    std::thread::scope(|scope| {
        for _ in 0..workers {
            let job_rx = job_rx.clone();
            let result_tx = result_tx.clone();
            scope.spawn(move || {
                while let Ok(unit) = job_rx.recv() {
                    let mut points = Vec::new();
                    let mut state = SyncState::starting_at(unit.start);
                    let res = sync::synchronize(
                        &tables[unit.index],
                        trajectory,
                        calibration,
                        &mut state,
                        &mut points,
                    )
                    .map(|stats| (points, stats));
                    let _ = result_tx.send((unit.index, res));
                }
            });
        }
        drop(result_tx);

        while let Ok((index, res)) = result_rx.recv() {
            match res {
                Ok(unit_output) => results[index] = Some(unit_output),
                Err(error) => failures.push(UnitFailure { unit: index, error }),
            }
            if let Some(pb) = pb {
                pb.inc(1);
            }
        }
    });

    if !failures.is_empty() {
        failures.sort_by_key(|f| f.unit);
        return Err(GeorefError::PartialFailure { failures });
    }

    Ok(results
        .into_iter()
        .map(|slot| slot.expect("every work unit reports exactly one result"))
        .collect())
}
