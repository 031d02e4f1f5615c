//! Inspect command - summarize a trajectory and a set of scanner files.

use std::path::Path;

use anyhow::Result;

use crate::profiles::ProfileTable;
use crate::sync;
use crate::trajectory::Trajectory;

/// Print point counts, distinct profiles and trajectory consumption per
/// scanner file, plus a total line.
pub fn inspect_inputs(trajectory_path: &str, scanner_paths: &[String]) -> Result<()> {
    let trajectory = Trajectory::from_file(Path::new(trajectory_path))?;
    println!("Trajectory: {} ({} poses)\n", trajectory_path, trajectory.len());

    println!(
        "{:<40} {:>10} {:>10} {:>12}",
        "File", "Points", "Profiles", "Rows used"
    );
    println!("{}", "-".repeat(76));

    let mut total_points = 0;
    let mut total_rows = 0;
    for path in scanner_paths {
        let table = ProfileTable::from_file(Path::new(path))?;
        let rows = sync::trajectory_rows_consumed(&table);
        println!(
            "{:<40} {:>10} {:>10} {:>12}",
            path,
            table.len(),
            table.distinct_profiles(),
            rows
        );
        total_points += table.len();
        total_rows += rows;
    }

    println!(
        "\nTotal: {} points in {} files; a sequential pass consumes {} of {} trajectory rows",
        total_points,
        scanner_paths.len(),
        total_rows,
        trajectory.len()
    );
    if total_rows >= trajectory.len() {
        println!("warning: trajectory may be exhausted before the last file finishes");
    }

    Ok(())
}
