//! Per-district weighted lottery.
//!
//! Every candidate gets a selection weight from its party's popularity,
//! adjusted by the district's prefecture profile and the party's ideology,
//! then jittered. Ballots are drawn one at a time against those weights, so a
//! district's vote total always equals its sampled turnout.

use crate::domain::ideology::IdeologyAxis;
use crate::domain::model::{CandidateId, DistrictId, Party, Universe};
use crate::domain::region::{DemographicTable, PrefectureProfile};
use rand::Rng;

pub const MIN_TURNOUT: u32 = 3000;
pub const MAX_TURNOUT: u32 = 5999;
pub const MIN_JITTER: f64 = 0.85;
pub const MAX_JITTER: f64 = 1.15;
/// Marker in a party name that earns the industrial-region bonus.
pub const LABOR_MARKER: &str = "労働";

const PRIMARY_THRESHOLD: f64 = 8.0;
const SECONDARY_THRESHOLD: f64 = 30.0;
const TERTIARY_THRESHOLD: f64 = 75.0;
const INCOME_THRESHOLD: u32 = 350;
const ELDERLY_THRESHOLD: f64 = 32.0;
const LABOR_BONUS: f64 = 10.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ElectionTally {
    pub ballots: u64,
    /// Districts that produced a winner.
    pub decided: usize,
}

pub struct VotingEngine {
    demographics: DemographicTable,
}

impl VotingEngine {
    pub fn new(demographics: DemographicTable) -> Self {
        Self { demographics }
    }

    /// Full recompute: every counter is reset before any district is drawn.
    pub fn run_election<R: Rng>(&self, universe: &mut Universe, rng: &mut R) -> ElectionTally {
        universe.reset_counters();

        let mut tally = ElectionTally::default();
        for index in 0..universe.districts().len() {
            let district = DistrictId(index);
            let candidates: Vec<CandidateId> = universe.district(district).candidates.clone();
            if candidates.is_empty() {
                continue;
            }

            let profile = self.demographics.lookup(&universe.district(district).name);
            let turnout = rng.gen_range(MIN_TURNOUT..=MAX_TURNOUT);

            let weights: Vec<u64> = candidates
                .iter()
                .map(|&candidate| {
                    let score = demographic_score(universe.party_of(candidate), profile);
                    let jitter = rng.gen_range(MIN_JITTER..=MAX_JITTER);
                    selection_weight(score, jitter)
                })
                .collect();

            let votes = draw_ballots(&weights, turnout, rng);
            for (&candidate, count) in candidates.iter().zip(votes) {
                universe.candidate_mut(candidate).votes = count;
            }
            universe.district_mut(district).turnout = turnout;
            tally.ballots += u64::from(turnout);

            if let Some(winner) = universe.winner(district) {
                let party = universe.candidate(winner).party;
                universe.party_mut(party).seats += 1;
                tally.decided += 1;
                tracing::trace!(
                    "{}: {} ({}) wins, weights {:?}",
                    universe.district(district).name,
                    universe.candidate(winner).name,
                    universe.party(party).name,
                    weights
                );
            }
        }

        tally
    }
}

/// Popularity plus the demographic adjustments, before jitter.
pub fn demographic_score(party: &Party, profile: &PrefectureProfile) -> f64 {
    let axis = |a: IdeologyAxis| party.ideology.map(|v| v.weight(a)).unwrap_or(0.0);
    let mut score = f64::from(party.popularity);

    if profile.primary > PRIMARY_THRESHOLD {
        score += axis(IdeologyAxis::Conservative) * 0.5 + axis(IdeologyAxis::Environmentalist) * 0.3;
    }

    if profile.secondary > SECONDARY_THRESHOLD {
        score += axis(IdeologyAxis::FiscalExpansion) * 0.4;
        if party.name.contains(LABOR_MARKER) {
            score += LABOR_BONUS;
        }
    }

    if profile.tertiary > TERTIARY_THRESHOLD {
        score += axis(IdeologyAxis::Liberal) * 0.5 + axis(IdeologyAxis::Populist) * 0.3;
    }

    if profile.income > INCOME_THRESHOLD {
        score += axis(IdeologyAxis::Libertarian) * 0.4 + axis(IdeologyAxis::Conservative) * 0.3;
    } else {
        score += axis(IdeologyAxis::Liberal) * 0.4 + axis(IdeologyAxis::FiscalExpansion) * 0.4;
    }

    if profile.elderly > ELDERLY_THRESHOLD {
        score += axis(IdeologyAxis::Conservative) * 0.6 + axis(IdeologyAxis::Nationalist) * 0.3;
    } else {
        score += axis(IdeologyAxis::Liberal) * 0.5 + axis(IdeologyAxis::Environmentalist) * 0.3;
    }

    score
}

/// Integer lottery weight; never below 1 so every candidate can still win votes.
pub fn selection_weight(score: f64, jitter: f64) -> u64 {
    let weight = (score * jitter * 10.0) as i64;
    if weight <= 0 {
        1
    } else {
        weight as u64
    }
}

/// One categorical draw per ballot. Returns votes per weight slot.
pub fn draw_ballots<R: Rng>(weights: &[u64], turnout: u32, rng: &mut R) -> Vec<u32> {
    let mut votes = vec![0u32; weights.len()];
    let total: u64 = weights.iter().sum();
    if total == 0 {
        return votes;
    }

    for _ in 0..turnout {
        let mut remaining = rng.gen_range(0..total);
        for (slot, &weight) in weights.iter().enumerate() {
            if remaining < weight {
                votes[slot] += 1;
                break;
            }
            remaining -= weight;
        }
    }
    votes
}
