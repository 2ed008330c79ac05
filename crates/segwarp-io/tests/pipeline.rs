//! End-to-end integration tests: CSV -> centroids -> JSON -> pretrained classification.

use std::fs;
use std::path::Path;

use segwarp_evo::GaConfig;
use segwarp_io::{CENTROIDS_FILE, DatasetReader, IoError, ResultWriter, read_centroids};
use segwarp_nc::{NearestCentroid, predict_with};
use tempfile::TempDir;

/// Path to the test fixture directory.
fn fixture_path(name: &str) -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn config() -> GaConfig {
    GaConfig::new(10, 8)
        .unwrap()
        .with_cxpb(0.3)
        .with_mutpb(0.3)
        .with_seed(42)
        .with_trace_convergence(true)
}

#[test]
fn centroid_round_trip() {
    // 1. Read CSV with variable-length rows
    let dataset = DatasetReader::new(&fixture_path("two_classes.csv"))
        .read()
        .expect("fixture should parse");
    assert_eq!(dataset.len(), 10);
    let classes: Vec<&str> = dataset.classes().into_iter().map(|c| c.as_str()).collect();
    assert_eq!(classes, vec!["bump", "step"]);
    assert_eq!(dataset.series[0].len(), 12);
    assert_eq!(dataset.series[9].len(), 16);

    // 2. Fit one centroid per class
    let mut nc = NearestCentroid::new(config());
    nc.fit(&dataset.series, &dataset.labels).unwrap();

    // 3. Write JSON artifact
    let dir = TempDir::new().unwrap();
    let writer = ResultWriter::new(dir.path()).unwrap();
    let path = writer.write_centroids(nc.classes()).unwrap();
    assert_eq!(path, dir.path().join(CENTROIDS_FILE));

    // 4. Inspect the raw JSON
    let content: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(content["n_classes"], 2);
    let entries = content["classes"].as_array().unwrap();
    assert_eq!(entries[0]["label"], "bump");
    assert_eq!(entries[1]["label"], "step");
    for entry in entries {
        let log = entry["log"].as_array().unwrap();
        assert_eq!(log.len(), 9, "generation 0 plus 8 generations");
        assert_eq!(log[0]["generation"], 0);
        let trace = entry["trace"].as_array().unwrap();
        assert!(!trace.is_empty());
        assert!(entry["fitness"].as_f64().unwrap() >= 0.0);
        assert_eq!(
            entry["length"].as_u64().unwrap() as usize,
            entry["centroid"].as_array().unwrap().len()
        );
    }
    let inertia = content["inertia"].as_f64().unwrap();
    assert!((inertia - nc.inertia()).abs() < 1e-9);

    // 5. Load the centroids back and classify without refitting
    let stored = read_centroids(&path).unwrap();
    assert_eq!(stored.len(), 2);
    for (s, c) in stored.iter().zip(nc.classes()) {
        assert_eq!(s.label, c.label);
        assert_eq!(s.centroid, c.result.centroid);
    }
    let centroids: Vec<&[f64]> = stored.iter().map(|s| s.centroid.as_slice()).collect();
    let pretrained = predict_with(&centroids, &dataset.series).unwrap();
    let fitted = nc.predict(&dataset.series).unwrap();
    let pretrained_labels: Vec<&str> = pretrained
        .iter()
        .map(|&i| stored[i].label.as_str())
        .collect();
    assert_eq!(pretrained_labels, fitted);

    let accuracy = nc.score(&dataset.series, &dataset.labels).unwrap();
    assert!(accuracy >= 0.9, "accuracy = {accuracy}");
}

#[test]
fn predictions_round_trip() {
    let dataset = DatasetReader::new(&fixture_path("two_classes.csv")).read().unwrap();
    let mut nc = NearestCentroid::new(config().with_trace_convergence(false));
    nc.fit(&dataset.series, &dataset.labels).unwrap();

    let predicted = nc.predict(&dataset.series).unwrap();
    let memberships = nc.fuzzy_predict(&dataset.series).unwrap();

    let dir = TempDir::new().unwrap();
    let writer = ResultWriter::new(dir.path()).unwrap();
    let path = writer.write_predictions(&nc.labels(), &predicted, Some(&memberships)).unwrap();

    let content: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
    assert_eq!(content["n_series"], 10);
    for entry in content["predictions"].as_array().unwrap() {
        let row: Vec<f64> = entry["memberships"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_f64().unwrap())
            .collect();
        assert!((row.iter().sum::<f64>() - 1.0).abs() < 1e-9);
    }
}

#[test]
fn reader_fixture_files_match_expected_errors() {
    // empty.csv -> EmptyDataset
    let result = DatasetReader::new(&fixture_path("empty.csv")).read();
    assert!(
        matches!(result, Err(IoError::EmptyDataset { .. })),
        "empty.csv should give EmptyDataset, got: {:?}",
        result
    );

    // nan.csv -> NonFiniteValue
    let result = DatasetReader::new(&fixture_path("nan.csv")).read();
    assert!(
        matches!(result, Err(IoError::NonFiniteValue { col_index: 1, .. })),
        "nan.csv should give NonFiniteValue, got: {:?}",
        result
    );

    // gap.csv -> NonFiniteValue (interior empty cell)
    let result = DatasetReader::new(&fixture_path("gap.csv")).read();
    assert!(
        matches!(result, Err(IoError::NonFiniteValue { col_index: 1, .. })),
        "gap.csv should give NonFiniteValue, got: {:?}",
        result
    );

    // no_label.csv -> MissingLabel
    let result = DatasetReader::new(&fixture_path("no_label.csv")).read();
    assert!(
        matches!(result, Err(IoError::MissingLabel { row_index: 0, .. })),
        "no_label.csv should give MissingLabel, got: {:?}",
        result
    );
}
