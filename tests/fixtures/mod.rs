//! Test fixtures and recording observers for integration testing

use paddock::fit::{FitObserver, RaceUpdate};
use paddock::types::{Race, RunnerId};
use std::sync::{Arc, Mutex};

/// Observer that captures every audit and progress callback for assertions
#[derive(Debug, Default)]
pub struct RecordingFitObserver {
    fitted: Arc<Mutex<Vec<(Vec<RunnerId>, RaceUpdate)>>>,
    progress: Arc<Mutex<Vec<usize>>>,
}

impl RecordingFitObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selection and record update for every fitted race, in order
    pub fn fitted_races(&self) -> Vec<(Vec<RunnerId>, RaceUpdate)> {
        self.fitted.lock().map(|f| f.clone()).unwrap_or_default()
    }

    /// Progress marks in the order they fired
    pub fn progress_marks(&self) -> Vec<usize> {
        self.progress.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

impl FitObserver for RecordingFitObserver {
    fn race_fitted(&self, race: &Race, update: &RaceUpdate) {
        if let Ok(mut fitted) = self.fitted.lock() {
            fitted.push((race.selection.clone(), update.clone()));
        }
    }

    fn progress(&self, races_processed: usize) {
        if let Ok(mut progress) = self.progress.lock() {
            progress.push(races_processed);
        }
    }
}

/// A small race card with a clear form hierarchy
///
/// "frankel" wins four of five starts, one of them a dead heat shared
/// with "arkle"; the rest of the field trades minor placings.
pub fn sample_race_card() -> Vec<Race> {
    let finish_orders = vec![
        vec!["frankel", "arkle", "secretariat", "seabiscuit"],
        vec!["frankel", "red_rum", "kelso"],
        vec!["arkle", "frankel", "eclipse", "zenyatta"],
        vec!["frankel", "secretariat", "red_rum"],
    ];

    let mut card: Vec<Race> = finish_orders
        .into_iter()
        .map(Race::from_finish_order)
        .collect();

    // Dead heat for first between frankel and arkle
    card.push(Race::new(
        vec![
            "frankel".to_string(),
            "arkle".to_string(),
            "kelso".to_string(),
        ],
        vec![
            vec!["frankel".to_string(), "arkle".to_string()],
            vec!["kelso".to_string()],
        ],
        ["frankel".to_string(), "arkle".to_string()]
            .into_iter()
            .collect(),
    ));

    card.push(Race::from_finish_order(["zenyatta", "seabiscuit", "eclipse"]));

    card
}

/// Card entry with a single declared runner (a walkover)
pub fn walkover_race() -> Race {
    Race::from_finish_order(["lonesome"])
}

/// Malformed race listing the same runner twice
pub fn duplicate_entry_race() -> Race {
    Race::from_finish_order(["doppel", "doppel"])
}
