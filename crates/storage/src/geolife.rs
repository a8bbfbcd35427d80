//! GeoLife log parsing
//!
//! A dataset root holds one directory per subject:
//!
//! ```text
//! <root>/<subject>/labels.txt
//! <root>/<subject>/Trajectory/<start time>.plt
//! ```
//!
//! `.plt` files start with six header lines followed by
//! `lat,lon,0,altitude,days,YYYY-MM-DD,HH:MM:SS` rows. `labels.txt` has a
//! header line followed by `start<TAB>end<TAB>mode` rows with
//! `YYYY/MM/DD HH:MM:SS` times. All times are UTC.

use crate::StorageError;
use chrono::{DateTime, NaiveDateTime, Utc};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use trajectory_model::{LabelInterval, RawPoint, SubjectLog};

const PLT_HEADER_LINES: usize = 6;
const PLT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const LABEL_TIME_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

fn parse_time(text: &str, format: &str) -> Result<DateTime<Utc>, String> {
    NaiveDateTime::parse_from_str(text, format)
        .map(|naive| naive.and_utc())
        .map_err(|e| format!("bad time '{}': {}", text, e))
}

fn field<'r>(record: &'r StringRecord, index: usize, expected: usize) -> Result<&'r str, String> {
    record
        .get(index)
        .ok_or_else(|| format!("expected {} fields, got {}", expected, record.len()))
}

fn parse_coordinate(text: &str) -> Result<f64, String> {
    let value = text
        .parse::<f64>()
        .map_err(|e| format!("bad coordinate '{}': {}", text, e))?;
    if !value.is_finite() {
        return Err(format!("non-finite coordinate '{}'", text));
    }
    Ok(value)
}

/// `lat,lon,0,altitude,days,date,time`
fn parse_plt_record(record: &StringRecord) -> Result<RawPoint, String> {
    let latitude = parse_coordinate(field(record, 0, 7)?)?;
    let longitude = parse_coordinate(field(record, 1, 7)?)?;
    let stamp = format!("{} {}", field(record, 5, 7)?, field(record, 6, 7)?);
    let timestamp = parse_time(&stamp, PLT_TIME_FORMAT)?;
    Ok(RawPoint::new(latitude, longitude, timestamp))
}

/// `start<TAB>end<TAB>mode`
fn parse_label_record(record: &StringRecord) -> Result<LabelInterval, String> {
    let start = parse_time(field(record, 0, 3)?, LABEL_TIME_FORMAT)?;
    let end = parse_time(field(record, 1, 3)?, LABEL_TIME_FORMAT)?;
    Ok(LabelInterval::new(start, end, field(record, 2, 3)?))
}

fn csv_error(path: &Path, line_offset: usize, err: csv::Error) -> StorageError {
    let line = err.position().map_or(0, |p| p.line() as usize) + line_offset;
    let reason = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(source) => StorageError::io(path, source),
        _ => StorageError::Parse {
            path: path.to_path_buf(),
            line,
            reason,
        },
    }
}

/// Parse every non-blank record. `line_offset` is the number of lines
/// consumed before the csv reader took over.
fn read_records<R: Read, T>(
    path: &Path,
    mut reader: csv::Reader<R>,
    line_offset: usize,
    parse: impl Fn(&StringRecord) -> Result<T, String>,
) -> Result<Vec<T>, StorageError> {
    let mut rows = Vec::new();
    let mut record = StringRecord::new();
    while reader
        .read_record(&mut record)
        .map_err(|e| csv_error(path, line_offset, e))?
    {
        if record.iter().all(str::is_empty) {
            continue;
        }
        let row = parse(&record).map_err(|reason| StorageError::Parse {
            path: path.to_path_buf(),
            line: record.position().map_or(0, |p| p.line() as usize) + line_offset,
            reason,
        })?;
        rows.push(row);
    }
    Ok(rows)
}

/// Parse one `.plt` point log
pub fn read_plt(path: &Path) -> Result<Vec<RawPoint>, StorageError> {
    let file = File::open(path).map_err(|e| StorageError::io(path, e))?;
    let mut input = BufReader::new(file);
    let mut header = String::new();
    for _ in 0..PLT_HEADER_LINES {
        header.clear();
        input
            .read_line(&mut header)
            .map_err(|e| StorageError::io(path, e))?;
    }

    let reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(input);
    read_records(path, reader, PLT_HEADER_LINES, parse_plt_record)
}

/// Parse a `labels.txt` file
pub fn read_labels(path: &Path) -> Result<Vec<LabelInterval>, StorageError> {
    let file = File::open(path).map_err(|e| StorageError::io(path, e))?;
    let reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(file);
    read_records(path, reader, 0, parse_label_record)
}

fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>, StorageError> {
    let mut paths = std::fs::read_dir(dir)
        .map_err(|e| StorageError::io(dir, e))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| StorageError::io(dir, e))?;
    paths.sort();
    Ok(paths)
}

/// Load one subject directory. Returns `None` when the subject has no
/// `labels.txt`, since unlabeled points can never form a trajectory.
///
/// Points from all `.plt` files are merged and ordered by timestamp, and
/// labels are ordered by start.
pub fn load_subject(dir: &Path) -> Result<Option<SubjectLog>, StorageError> {
    let subject_id = dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let labels_path = dir.join("labels.txt");
    if !labels_path.is_file() {
        debug!("Subject {} has no labels, skipping", subject_id);
        return Ok(None);
    }
    let mut labels = read_labels(&labels_path)?;
    labels.sort_by_key(|l| l.start);

    let mut points = Vec::new();
    let trajectory_dir = dir.join("Trajectory");
    if trajectory_dir.is_dir() {
        for path in sorted_entries(&trajectory_dir)? {
            if path.extension().map_or(false, |ext| ext == "plt") {
                points.extend(read_plt(&path)?);
            }
        }
    } else {
        warn!("Subject {} has labels but no Trajectory directory", subject_id);
    }
    points.sort_by_key(|p| p.timestamp);

    debug!(
        "Subject {}: {} points, {} labels",
        subject_id,
        points.len(),
        labels.len()
    );
    Ok(Some(SubjectLog::new(subject_id, points, labels)))
}

/// Load every labeled subject under a dataset root, in directory order
pub fn load_dataset(root: &Path) -> Result<Vec<SubjectLog>, StorageError> {
    let mut subjects = Vec::new();
    for path in sorted_entries(root)? {
        if !path.is_dir() {
            continue;
        }
        if let Some(subject) = load_subject(&path)? {
            subjects.push(subject);
        }
    }
    info!("Loaded {} labeled subjects from {}", subjects.len(), root.display());
    Ok(subjects)
}
