//! World-point CSV output.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{GeorefError, Result};
use crate::sync::WorldPoint;

/// Write the merged output table: an `X,Y,Z` header, then one row per point
/// in production order. No index column.
pub fn write_world_points(path: &Path, points: &[WorldPoint]) -> Result<()> {
    let io_err = |e: std::io::Error| GeorefError::Io {
        path: path.to_path_buf(),
        source: e,
    };

    let file = File::create(path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);
    writeln!(writer, "X,Y,Z").map_err(io_err)?;
    for p in points {
        writeln!(writer, "{},{},{}", p.x, p.y, p.z).map_err(io_err)?;
    }
    writer.flush().map_err(io_err)
}
