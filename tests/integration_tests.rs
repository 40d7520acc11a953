//! Integration tests for the paddock rating engine
//!
//! These tests validate the entire system working together, including:
//! - Batch fitting over a full race card
//! - Win-probability estimation from fitted beliefs
//! - Snapshot persistence and restore
//! - Per-race audit and progress reporting
//! - Error handling for short and malformed races

// Modules for organizing tests
mod fixtures;

use paddock::fit::BatchFitter;
use paddock::model::{HorseModel, ModelSnapshot};
use paddock::prob::MonteCarloEstimator;
use paddock::rating::TrueSkillParams;
use paddock::types::Race;
use paddock::utils::implied_probabilities;
use std::sync::Arc;

use fixtures::{duplicate_entry_race, sample_race_card, walkover_race, RecordingFitObserver};

/// Initialize structured logging for test runs, honoring RUST_LOG
fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_target(false)
        .try_init();
}

fn create_test_model() -> HorseModel {
    init_logging();
    HorseModel::new(TrueSkillParams::default()).unwrap()
}

#[test]
fn test_complete_fit_and_estimate_workflow() {
    let mut model = create_test_model();

    // Step 1: Fit the whole card in event order
    let stats = model.fit(sample_race_card()).unwrap();
    assert_eq!(stats.races_processed, 6);
    assert_eq!(stats.races_skipped, 0);
    assert_eq!(stats.races_invalid, 0);
    assert_eq!(stats.distinct_runners, 8);

    // Step 2: Price a hypothetical field from the fitted beliefs
    let field: Vec<String> = ["frankel", "arkle", "red_rum", "eclipse"]
        .iter()
        .map(|s| s.to_string())
        .collect();

    let trapz = model.pwin_trapz(&field).unwrap();
    let mc = model
        .win_probabilities(&field, &MonteCarloEstimator::new(20_000).with_seed(7))
        .unwrap();

    // The dominant winner heads the market under both estimators
    for i in 1..field.len() {
        assert!(trapz[0] > trapz[i]);
        assert!(mc[0] > mc[i]);
    }

    // Both estimators agree and the outright market sums to about one
    for (p_mc, p_trapz) in mc.iter().zip(trapz.iter()) {
        assert!((p_mc - p_trapz).abs() < 0.03);
    }
    let total: f64 = trapz.iter().sum();
    assert!((total - 1.0).abs() < 0.01);

    // Step 3: Place market (top two) covers exactly two finishers per race
    let place = model
        .win_probabilities(
            &field,
            &MonteCarloEstimator::new(20_000).with_top_n(2).with_seed(7),
        )
        .unwrap();
    let place_total: f64 = place.iter().sum();
    assert!((place_total - 2.0).abs() < 1e-9);

    println!("✅ Complete fit and estimate workflow test passed");
}

#[test]
fn test_ratings_reflect_race_results() {
    let mut model = create_test_model();
    model.fit(sample_race_card()).unwrap();

    let frankel = model.store().get("frankel").unwrap();
    assert_eq!(frankel.races_run, 5);
    assert_eq!(frankel.races_won, 4);

    let eclipse = model.store().get("eclipse").unwrap();
    assert_eq!(eclipse.races_run, 2);
    assert_eq!(eclipse.races_won, 0);

    // Form shows up in the beliefs: the serial winner rates higher, and
    // racing has tightened both runners' uncertainty from the prior
    assert!(frankel.belief.mu > eclipse.belief.mu);
    assert!(frankel.belief.sigma < model.params().prior().sigma);
    assert!(eclipse.belief.sigma < model.params().prior().sigma);

    println!("✅ Ratings reflect race results test passed");
}

#[test]
fn test_snapshot_survives_json_round_trip() {
    let mut original = create_test_model();
    original.fit(sample_race_card()).unwrap();

    let snapshot = original.snapshot();
    let raw = snapshot.to_json().unwrap();
    let parsed = ModelSnapshot::from_json(&raw).unwrap();
    assert_eq!(parsed, snapshot);

    // The restored model stays in lockstep with the original on new races
    let mut restored = HorseModel::from_snapshot(parsed).unwrap();
    assert_eq!(restored.snapshot(), snapshot);

    let next = Race::from_finish_order(["zenyatta", "frankel", "kelso"]);
    original.fit_race(&next).unwrap();
    restored.fit_race(&next).unwrap();
    assert_eq!(original.snapshot(), restored.snapshot());

    println!("✅ Snapshot JSON round trip test passed");
}

#[test]
fn test_observer_receives_audits_and_progress() {
    let mut model = create_test_model();
    let observer = Arc::new(RecordingFitObserver::new());

    let fitter = BatchFitter::new()
        .with_observer(observer.clone())
        .with_progress_every(2);
    let stats = fitter.fit(&mut model, sample_race_card()).unwrap();
    assert_eq!(stats.races_processed, 6);

    // One audit per processed race, each covering that race's full field
    let audits = observer.fitted_races();
    assert_eq!(audits.len(), 6);
    for (selection, update) in &audits {
        assert_eq!(update.len(), selection.len());
        assert!(selection.iter().all(|runner| update.contains_key(runner)));
    }

    assert_eq!(observer.progress_marks(), vec![2, 4, 6]);

    println!("✅ Observer audit and progress test passed");
}

#[test]
fn test_error_handling_for_bad_races() {
    let mut model = create_test_model();

    let mut card = sample_race_card();
    card.insert(1, walkover_race());
    card.insert(3, duplicate_entry_race());

    // Default mode counts the bad entries and keeps going
    let stats = model.fit(card.clone()).unwrap();
    assert_eq!(stats.races_processed, 6);
    assert_eq!(stats.races_skipped, 1);
    assert_eq!(stats.races_invalid, 1);
    assert_eq!(stats.distinct_runners, 8);

    // Rejected entries never reached the store
    assert!(model.store().get("lonesome").is_none());
    assert!(model.store().get("doppel").is_none());

    // Strict mode refuses the same card outright
    let mut strict_model = create_test_model();
    let fitter = BatchFitter::new().strict(true);
    assert!(fitter.fit(&mut strict_model, card).is_err());

    println!("✅ Error handling for bad races test passed");
}

#[test]
fn test_fresh_field_matches_even_market() {
    let mut model = create_test_model();
    let field: Vec<String> = vec![
        "debutant_1".to_string(),
        "debutant_2".to_string(),
        "debutant_3".to_string(),
    ];

    // Unraced runners all sit at the prior, so the model's market should
    // match a fair book at level odds
    let market = implied_probabilities(&[3.0, 3.0, 3.0]).unwrap();
    let estimated = model.pwin_trapz(&field).unwrap();

    for (book, ours) in market.iter().zip(estimated.iter()) {
        assert!((book - ours).abs() < 5e-3);
    }

    println!("✅ Fresh field matches even market test passed");
}
