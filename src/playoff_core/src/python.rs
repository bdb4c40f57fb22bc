//! Python bindings.

use pyo3::exceptions::{PyIOError, PyValueError};
use pyo3::prelude::*;
use std::collections::HashMap;

use crate::config::SimulationConfig;
use crate::constants::{CONFERENCE_PLAYOFF_TEAMS, INITIAL_ELO, REGULAR_SEASON_GAMES, WILDCARD_SPOTS};
use crate::error::{OverridesError, ScheduleError};
use crate::league::League;
use crate::overrides::OverridesMap;
use crate::probability::calculate_playoff_probability;
use crate::schedule::Schedule;
use crate::seeding::ConferenceSeeding;
use crate::win_prob::{calculate_probability, EloRatings};

fn schedule_error(err: ScheduleError) -> PyErr {
    PyValueError::new_err(err.to_string())
}

fn overrides_error(err: OverridesError) -> PyErr {
    match err {
        OverridesError::Io(_) => PyIOError::new_err(err.to_string()),
        OverridesError::InvalidProbability { .. } => PyValueError::new_err(err.to_string()),
    }
}

fn conference_dict(seeding: &ConferenceSeeding) -> HashMap<&'static str, Vec<String>> {
    HashMap::from([
        ("seeding", seeding.playoff_teams().map(String::from).collect()),
        ("remaining", seeding.remaining.clone()),
        ("clinched", seeding.clinched.iter().cloned().collect()),
        ("eliminated", seeding.eliminated.iter().cloned().collect()),
    ])
}

/// Current seeding from a schedule feed.
///
/// Returns `{"afc": {...}, "nfc": {...}}` where each conference has
/// `seeding`, `remaining`, `clinched` and `eliminated` lists.
#[pyfunction]
#[pyo3(signature = (schedule_json, include_eliminations = false))]
fn get_seeding(
    schedule_json: &str,
    include_eliminations: bool,
) -> PyResult<HashMap<&'static str, HashMap<&'static str, Vec<String>>>> {
    let league = League::nfl();
    let schedule = Schedule::from_raw_json(schedule_json, &league).map_err(schedule_error)?;
    let seeding = crate::seeding::get_seeding(&schedule, &league, include_eliminations)
        .map_err(|e| PyValueError::new_err(e.to_string()))?;

    Ok(HashMap::from([
        ("afc", conference_dict(&seeding.afc)),
        ("nfc", conference_dict(&seeding.nfc)),
    ]))
}

/// Playoff probability (0-100) of every team.
///
/// Runs without holding the GIL.
#[pyfunction]
#[pyo3(name = "calculate_playoff_probability")]
#[pyo3(signature = (schedule_json, ratings = None, overrides_path = None, seed = None))]
fn py_calculate_playoff_probability(
    py: Python<'_>,
    schedule_json: &str,
    ratings: Option<HashMap<String, f64>>,
    overrides_path: Option<&str>,
    seed: Option<u64>,
) -> PyResult<HashMap<String, f64>> {
    let league = League::nfl();
    let schedule = Schedule::from_raw_json(schedule_json, &league).map_err(schedule_error)?;
    let ratings: Option<EloRatings> = ratings.map(|r| r.into_iter().collect());
    let overrides = overrides_path
        .map(OverridesMap::from_file)
        .transpose()
        .map_err(overrides_error)?;
    let config = SimulationConfig {
        seed,
        ..SimulationConfig::default()
    };

    let result = py.allow_threads(|| {
        calculate_playoff_probability(
            &schedule,
            &league,
            ratings.as_ref(),
            overrides.as_ref(),
            &config,
        )
    });

    Ok(result.probabilities.into_iter().collect())
}

/// Elo probability of a team rated `rating_a` beating one rated `rating_b`.
#[pyfunction]
fn win_probability(rating_a: f64, rating_b: f64) -> f64 {
    calculate_probability(rating_a, rating_b)
}

/// Python module definition
#[pymodule]
fn playoff_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(get_seeding, m)?)?;
    m.add_function(wrap_pyfunction!(py_calculate_playoff_probability, m)?)?;
    m.add_function(wrap_pyfunction!(win_probability, m)?)?;

    // Constants
    m.add("REGULAR_SEASON_GAMES", REGULAR_SEASON_GAMES)?;
    m.add("WILDCARD_SPOTS", WILDCARD_SPOTS)?;
    m.add("CONFERENCE_PLAYOFF_TEAMS", CONFERENCE_PLAYOFF_TEAMS)?;
    m.add("INITIAL_ELO", INITIAL_ELO)?;

    Ok(())
}
