//! Whitespace-separated `x y t` trajectory tables

use crate::StorageError;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use trajectory_model::TrajectoryPoint;

/// Write one `x y t` row per point
pub fn write_table(path: &Path, points: &[TrajectoryPoint]) -> Result<(), StorageError> {
    let file = File::create(path).map_err(|e| StorageError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    for p in points {
        writeln!(writer, "{} {} {}", p.x, p.y, p.t).map_err(|e| StorageError::io(path, e))?;
    }
    writer.flush().map_err(|e| StorageError::io(path, e))
}

/// Read a table written by [`write_table`]. Blank lines and `#` comments are
/// skipped; every other line must hold exactly three finite numbers.
pub fn read_table(path: &Path) -> Result<Vec<TrajectoryPoint>, StorageError> {
    let file = File::open(path).map_err(|e| StorageError::io(path, e))?;
    let mut points = Vec::new();

    for (idx, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|e| StorageError::io(path, e))?;
        let row = line.split('#').next().unwrap_or("").trim();
        if row.is_empty() {
            continue;
        }

        let parse_error = |reason: String| StorageError::Parse {
            path: path.to_path_buf(),
            line: idx + 1,
            reason,
        };

        let fields = row
            .split_whitespace()
            .map(|f| f.parse::<f64>().map_err(|e| parse_error(format!("'{}': {}", f, e))))
            .collect::<Result<Vec<_>, _>>()?;

        if let Some(bad) = fields.iter().find(|v| !v.is_finite()) {
            return Err(parse_error(format!("non-finite value {}", bad)));
        }
        match fields.as_slice() {
            [x, y, t] => points.push(TrajectoryPoint::new(*x, *y, *t)),
            _ => return Err(parse_error(format!("expected 3 columns, got {}", fields.len()))),
        }
    }

    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_keeps_full_precision() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("traj.txt");
        let points = vec![
            TrajectoryPoint::new(39.984702, 116.318417, 0.0),
            TrajectoryPoint::new(39.984683, 116.31845, 1.0 / 3.0),
        ];

        write_table(&path, &points).unwrap();
        assert_eq!(read_table(&path).unwrap(), points);
    }

    #[test]
    fn test_reads_numpy_style_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("np.txt");
        std::fs::write(
            &path,
            "# x y t\n3.998470200000000000e+01 1.163184170000000000e+02 0.000000000000000000e+00\n\n",
        )
        .unwrap();

        let points = read_table(&path).unwrap();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].x, 39.984702);
    }

    #[test]
    fn test_bad_row_reports_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.txt");
        std::fs::write(&path, "1 2 3\n1 2\n").unwrap();

        match read_table(&path) {
            Err(StorageError::Parse { line, .. }) => assert_eq!(line, 2),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_non_finite_row_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nan.txt");
        std::fs::write(&path, "1 2 3\n1 2 NaN\ninf 0 5\n").unwrap();

        match read_table(&path) {
            Err(StorageError::Parse { line, reason, .. }) => {
                assert_eq!(line, 2);
                assert!(reason.contains("NaN"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
