use anyhow::Result;
use chrono::{DateTime, Utc};
use polarroute_core::Catalog;

pub mod invariants;

/// Inputs shared by every scenario iteration.
#[derive(Debug, Clone, Copy)]
pub struct ScenarioCtx<'a> {
    pub catalog: &'a Catalog,
    pub seed: u64,
    pub now: DateTime<Utc>,
    pub verbose: bool,
}

pub type ScenarioCheck = fn(&ScenarioCtx<'_>) -> Result<()>;

// Logic test scenario
#[derive(Debug, Clone)]
pub struct TestScenario {
    pub key: &'static str,
    pub name: &'static str,
    pub check: ScenarioCheck,
}

impl TestScenario {
    const fn new(key: &'static str, name: &'static str, check: ScenarioCheck) -> Self {
        Self { key, name, check }
    }

    /// Run the check once.
    ///
    /// # Errors
    ///
    /// Returns the first violated expectation.
    pub fn run(&self, ctx: &ScenarioCtx<'_>) -> Result<()> {
        (self.check)(ctx)
    }
}

const SCENARIOS: [TestScenario; 7] = [
    TestScenario::new("smoke", "Smoke Test", invariants::smoke),
    TestScenario::new(
        "curated-paths",
        "Curated Paths Are Literal",
        invariants::curated_paths,
    ),
    TestScenario::new(
        "water-invariant",
        "Hazard Points Stay In Corridors",
        invariants::water_invariant,
    ),
    TestScenario::new(
        "distance-symmetry",
        "Great-Circle Distance Symmetry",
        invariants::distance_symmetry,
    ),
    TestScenario::new(
        "alert-thresholds",
        "Alert Thresholds Are Strict",
        invariants::alert_thresholds,
    ),
    TestScenario::new(
        "deterministic-replay",
        "Seeded Route Replay",
        invariants::deterministic_replay,
    ),
    TestScenario::new(
        "unknown-ports",
        "Unknown Ports Yield No Route",
        invariants::unknown_ports,
    ),
];

pub fn get_scenario(name: &str) -> Option<TestScenario> {
    let key = match name.to_lowercase().as_str() {
        "curated" => "curated-paths",
        "water" => "water-invariant",
        "distance" | "symmetry" => "distance-symmetry",
        "alerts" => "alert-thresholds",
        "deterministic" | "replay" => "deterministic-replay",
        "unknown" => "unknown-ports",
        other => return SCENARIOS.iter().find(|s| s.key == other).cloned(),
    };
    SCENARIOS.iter().find(|s| s.key == key).cloned()
}

pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    SCENARIOS.iter().map(|s| (s.key, s.name)).collect()
}

pub fn scenario_keys() -> impl Iterator<Item = &'static str> {
    SCENARIOS.iter().map(|s| s.key)
}
