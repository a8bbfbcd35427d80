//! Subcommand implementations

use crate::{FeaturesArgs, PipelineConfig, SegmentArgs};
use anyhow::{Context, Result};
use dataset_filter::DatasetFilter;
use feature_engine::{feature_names, FeatureAssembler};
use segmenter::segment_subjects;
use storage::{geolife, load_entry, Catalog, TrajectoryRepository};
use tracing::{info, warn};

/// Outcome of the segment command
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SegmentSummary {
    pub subjects: usize,
    pub failed_subjects: usize,
    pub trajectories: usize,
}

/// Outcome of the features command
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeatureSummary {
    pub selected: usize,
    pub written: usize,
    pub skipped: usize,
}

/// Parse every labeled subject, segment them in parallel and store the
/// trajectories with their catalog
pub fn segment(args: &SegmentArgs) -> Result<SegmentSummary> {
    let subjects = geolife::load_dataset(&args.data)
        .with_context(|| format!("loading dataset {}", args.data.display()))?;

    let mut summary = SegmentSummary {
        subjects: subjects.len(),
        ..Default::default()
    };

    let mut trajectories = Vec::new();
    for result in segment_subjects(&subjects) {
        match result {
            Ok(segmentation) => trajectories.extend(segmentation.into_trajectories()),
            Err(_) => summary.failed_subjects += 1,
        }
    }
    summary.trajectories = trajectories.len();

    let repo = TrajectoryRepository::open(&args.out)?;
    repo.persist_all(&trajectories)
        .with_context(|| format!("writing trajectories to {}", args.out.display()))?;

    info!(
        "Stored {} trajectories from {} subjects ({} failed)",
        summary.trajectories, summary.subjects, summary.failed_subjects
    );
    Ok(summary)
}

/// Select catalog entries, featurize them in parallel and write a CSV of
/// `id, class, class_index`, the feature columns, then one `is_<class>`
/// indicator column per configured class
pub fn features(args: &FeaturesArgs, config: &PipelineConfig) -> Result<FeatureSummary> {
    let filter = DatasetFilter::new(config.filter.clone()).context("invalid filter configuration")?;

    let mut assembler_config = config.assembler.clone();
    if let Some(threshold) = args.threshold {
        assembler_config.velocity_threshold = threshold;
    }
    let assembler = FeatureAssembler::new(assembler_config, config.filter.classes.clone());

    let catalog = Catalog::load(&args.catalog)?;
    let (entries, _) = filter.select(catalog.entries);

    let mut summary = FeatureSummary {
        selected: entries.len(),
        ..Default::default()
    };

    let mut trajectories = Vec::with_capacity(entries.len());
    for entry in &entries {
        match load_entry(entry) {
            Ok(traj) => trajectories.push(traj),
            Err(e) => {
                warn!("Skipping {}: {}", entry.id, e);
                summary.skipped += 1;
            }
        }
    }

    let mut writer = csv::Writer::from_path(&args.out)
        .with_context(|| format!("creating {}", args.out.display()))?;
    let mut header = vec!["id".to_string(), "class".to_string(), "class_index".to_string()];
    header.extend(feature_names());
    header.extend(
        config
            .filter
            .classes
            .names()
            .iter()
            .map(|name| format!("is_{}", name)),
    );
    writer.write_record(&header)?;

    for result in assembler.assemble_batch(&trajectories) {
        match result {
            Ok(vector) => {
                let mut record = vec![
                    vector.trajectory_id.clone(),
                    vector.label.clone(),
                    vector.class_index.to_string(),
                ];
                record.extend(vector.values.iter().map(|v| v.to_string()));
                record.extend(vector.one_hot.iter().map(|v| v.to_string()));
                writer.write_record(&record)?;
                summary.written += 1;
            }
            Err(e) => {
                warn!("Skipping {} ({:?}): {}", e.trajectory_id, e.kind(), e.source);
                summary.skipped += 1;
            }
        }
    }
    writer.flush()?;

    info!(
        "Wrote {} feature vectors to {} ({} skipped)",
        summary.written,
        args.out.display(),
        summary.skipped
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use feature_engine::FEATURE_DIMENSION;
    use std::fmt::Write as _;
    use std::fs;
    use std::path::Path;

    const PLT_HEADER: &str = "Geolife trajectory\nWGS 84\nAltitude is in Feet\nReserved 3\n0,2,255,My Track,0,0,2,8421376\n0\n";

    /// Write a subject with a winding track sampled every 1-2 seconds
    /// starting at 03:00:00, and the given label rows
    fn write_subject(root: &Path, id: &str, points: usize, labels: &str) {
        let dir = root.join(id);
        fs::create_dir_all(dir.join("Trajectory")).unwrap();

        let mut rows = String::from(PLT_HEADER);
        let mut secs = 0u32;
        for i in 0..points {
            let f = i as f64;
            let lat = 39.9 + 1e-4 * (f + 0.3 * f.sin());
            let lon = 116.3 + 1e-4 * (2.0 * (0.5 * f).sin() + 0.01 * f * f);
            writeln!(
                rows,
                "{},{},0,150,39744.0,2008-10-23,{:02}:{:02}:{:02}",
                lat,
                lon,
                3 + secs / 3600,
                (secs / 60) % 60,
                secs % 60
            )
            .unwrap();
            secs += if i % 3 == 2 { 2 } else { 1 };
        }
        fs::write(dir.join("Trajectory").join("20081023030000.plt"), rows).unwrap();
        fs::write(
            dir.join("labels.txt"),
            format!("Start Time\tEnd Time\tTransportation Mode\n{}", labels),
        )
        .unwrap();
    }

    #[test]
    fn test_segment_then_features() {
        let work = tempfile::tempdir().unwrap();
        let data = work.path().join("Data");
        write_subject(
            &data,
            "000",
            300,
            "2008/10/23 03:00:00\t2008/10/23 03:02:30\ttaxi\n2008/10/23 03:03:00\t2008/10/23 03:10:00\trun\n",
        );
        write_subject(&data, "001", 50, "2008/10/23 03:00:00\t2008/10/23 03:10:00\twalk\n");

        let out = work.path().join("trajectories");
        let summary = segment(&SegmentArgs {
            data: data.clone(),
            out: out.clone(),
        })
        .unwrap();
        assert_eq!(summary.subjects, 2);
        assert_eq!(summary.failed_subjects, 0);
        assert_eq!(summary.trajectories, 3);

        let csv_path = work.path().join("features.csv");
        let summary = features(
            &FeaturesArgs {
                catalog: out.join("metadata.json"),
                out: csv_path.clone(),
                threshold: None,
            },
            &PipelineConfig::default(),
        )
        .unwrap();
        // "run" is not a class and subject 001 is too short
        assert_eq!(summary.selected, 1);
        assert_eq!(summary.written, 1);
        assert_eq!(summary.skipped, 0);

        let mut reader = csv::Reader::from_path(&csv_path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.len(), 3 + FEATURE_DIMENSION + 5);
        assert_eq!(&headers[3 + FEATURE_DIMENSION], "is_walk");
        assert_eq!(&headers[3 + FEATURE_DIMENSION + 1], "is_car");
        let rows: Vec<_> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][0], "000_0");
        assert_eq!(&rows[0][1], "car");
        assert_eq!(&rows[0][2], "1");
        let one_hot: Vec<_> = rows[0].iter().skip(3 + FEATURE_DIMENSION).collect();
        assert_eq!(one_hot, vec!["0", "1", "0", "0", "0"]);
    }

    #[test]
    fn test_missing_catalog_fails() {
        let work = tempfile::tempdir().unwrap();
        let args = FeaturesArgs {
            catalog: work.path().join("nope.json"),
            out: work.path().join("features.csv"),
            threshold: Some(0.5),
        };
        assert!(features(&args, &PipelineConfig::default()).is_err());
    }
}
