use crate::core::aggregate::{aggregate_by_region, RegionSummary};
use crate::core::coalition::{form_government, Government};
use crate::core::universe::UniverseBuilder;
use crate::core::voting::VotingEngine;
use crate::domain::model::{SimulationInputs, Universe};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeMap;

/// Outcome of one election over the universe.
#[derive(Debug, Clone)]
pub struct RunResult {
    /// 1-based run number.
    pub run: usize,
    pub ballots: u64,
    /// Seats per party, indexed by `PartyId`.
    pub seats: Vec<u32>,
    pub government: Option<Government>,
    pub regions: BTreeMap<String, RegionSummary>,
}

/// A seeded universe plus the random stream every later run draws from.
/// Two simulations built from the same inputs and seed produce identical runs.
pub struct Simulation {
    universe: Universe,
    voting: VotingEngine,
    rng: ChaCha8Rng,
    seed: u64,
    runs_completed: usize,
}

impl Simulation {
    pub fn new(inputs: SimulationInputs, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let universe = UniverseBuilder::new(inputs.roster)
            .with_officeholders(inputs.officeholders)
            .with_regions(inputs.regions)
            .build(&mut rng);

        tracing::info!(
            "Simulation seeded with {}: {} parties, {} districts",
            seed,
            universe.parties().len(),
            universe.districts().len()
        );

        Self {
            universe,
            voting: VotingEngine::new(inputs.demographics),
            rng,
            seed,
            runs_completed: 0,
        }
    }

    pub fn run_once(&mut self) -> RunResult {
        let tally = self.voting.run_election(&mut self.universe, &mut self.rng);
        let government = form_government(&mut self.universe);
        let regions = aggregate_by_region(&self.universe);
        self.runs_completed += 1;

        tracing::debug!(
            "Run {}: {} ballots, {} of {} districts decided",
            self.runs_completed,
            tally.ballots,
            tally.decided,
            self.universe.districts().len()
        );

        RunResult {
            run: self.runs_completed,
            ballots: tally.ballots,
            seats: self.universe.parties().iter().map(|p| p.seats).collect(),
            government,
            regions,
        }
    }

    pub fn universe(&self) -> &Universe {
        &self.universe
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn runs_completed(&self) -> usize {
        self.runs_completed
    }
}
