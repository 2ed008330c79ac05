//! Regression tests for segwarp-nc: fitting, crisp and fuzzy prediction, and
//! accuracy on two well-separated classes.

use segwarp_evo::GaConfig;
use segwarp_nc::{NcError, NearestCentroid, fuzzy_predict_with, predict_with};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Rising ramps labelled "up" and falling ramps labelled "down", lengths 10..16.
fn two_classes() -> (Vec<Vec<f64>>, Vec<String>) {
    let mut series = Vec::new();
    let mut labels = Vec::new();
    for k in 0..6 {
        let len = 10 + k;
        let up: Vec<f64> = (0..len).map(|i| i as f64 / len as f64 + 0.02 * k as f64).collect();
        let down: Vec<f64> = up.iter().rev().copied().collect();
        series.push(up);
        labels.push("up".to_owned());
        series.push(down);
        labels.push("down".to_owned());
    }
    (series, labels)
}

fn config() -> GaConfig {
    GaConfig::new(8, 5).unwrap().with_cxpb(0.3).with_mutpb(0.3).with_seed(3)
}

// ---------------------------------------------------------------------------
// a) fit_orders_classes_and_sums_inertia
// ---------------------------------------------------------------------------

#[test]
fn fit_orders_classes_and_sums_inertia() {
    let (series, labels) = two_classes();
    let mut nc = NearestCentroid::new(config());
    assert!(!nc.is_fitted());
    nc.fit(&series, &labels).unwrap();

    assert_eq!(nc.labels(), vec!["down", "up"]);
    let total: f64 = nc.classes().iter().map(|c| c.result.fitness).sum();
    assert_eq!(nc.inertia(), total);
    assert!(nc.classes().iter().all(|c| !c.result.centroid.is_empty()));
}

// ---------------------------------------------------------------------------
// b) separated_classes_are_classified_perfectly
// ---------------------------------------------------------------------------

#[test]
fn separated_classes_are_classified_perfectly() {
    let (series, labels) = two_classes();
    let mut nc = NearestCentroid::new(config());
    nc.fit(&series, &labels).unwrap();

    let predicted = nc.predict(&series).unwrap();
    let expected: Vec<&str> = labels.iter().map(String::as_str).collect();
    assert_eq!(predicted, expected);
    assert_eq!(nc.score(&series, &labels).unwrap(), 1.0);

    let fuzzy = nc.fuzzy_predict(&series).unwrap();
    for (row, label) in fuzzy.iter().zip(&labels) {
        assert!((row.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        let winner = if row[0] > row[1] { "down" } else { "up" };
        assert_eq!(winner, label);
    }
}

// ---------------------------------------------------------------------------
// c) errors
// ---------------------------------------------------------------------------

#[test]
fn unfitted_classifier_rejects_prediction() {
    let nc = NearestCentroid::new(config());
    assert!(matches!(nc.predict(&[vec![1.0, 2.0]]), Err(NcError::NotFitted)));
    assert!(matches!(nc.fuzzy_predict(&[vec![1.0, 2.0]]), Err(NcError::NotFitted)));
}

#[test]
fn fit_rejects_bad_inputs() {
    let mut nc = NearestCentroid::new(config());
    let empty: Vec<Vec<f64>> = Vec::new();
    let no_labels: Vec<String> = Vec::new();
    assert!(matches!(nc.fit(&empty, &no_labels), Err(NcError::EmptyTrainingSet)));

    let series = vec![vec![1.0, 2.0], vec![2.0, 1.0]];
    assert!(matches!(
        nc.fit(&series, &["a"]),
        Err(NcError::LabelCountMismatch {
            n_series: 2,
            n_labels: 1,
        })
    ));

    let constant = vec![vec![1.0, 1.0], vec![1.0, 1.0]];
    assert!(matches!(nc.fit(&constant, &["a", "a"]), Err(NcError::Evo(_))));
}

#[test]
fn score_rejects_mismatched_or_empty_sets() {
    let (series, labels) = two_classes();
    let mut nc = NearestCentroid::new(config());
    nc.fit(&series, &labels).unwrap();

    assert!(matches!(
        nc.score(&series, &labels[..3]),
        Err(NcError::LabelCountMismatch { .. })
    ));
    let empty: Vec<Vec<f64>> = Vec::new();
    let no_labels: Vec<&str> = Vec::new();
    assert!(matches!(nc.score(&empty, &no_labels), Err(NcError::EmptyTestSet)));
}

// ---------------------------------------------------------------------------
// d) pretrained_variants
// ---------------------------------------------------------------------------

#[test]
fn pretrained_prediction_uses_supplied_centroids() {
    let centroids = vec![vec![0.0, 0.0, 0.0], vec![10.0, 10.0, 10.0]];
    let series = vec![vec![9.0, 11.0], vec![0.5, -0.5, 0.0, 1.0], vec![6.0, 6.0, 6.0]];

    assert_eq!(predict_with(&centroids, &series).unwrap(), vec![1, 0, 1]);

    let fuzzy = fuzzy_predict_with(&centroids, &series).unwrap();
    assert_eq!(fuzzy.len(), 3);
    assert!(fuzzy[0][1] > fuzzy[0][0]);
    assert!(fuzzy[1][0] > fuzzy[1][1]);
}

#[test]
fn single_pretrained_centroid_gives_full_membership() {
    let centroids = vec![vec![1.0, 2.0, 3.0]];
    let fuzzy = fuzzy_predict_with(&centroids, &[vec![1.0, 2.0, 3.0], vec![5.0]]).unwrap();
    assert_eq!(fuzzy, vec![vec![1.0], vec![1.0]]);
}
