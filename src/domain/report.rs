use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Everything a presentation layer needs from one simulation: final-run
/// breakdowns plus the seat history of every run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElectionReport {
    pub generated_at: DateTime<Utc>,
    pub seed: u64,
    pub runs: usize,
    pub totals: ReportTotals,
    pub standings: Vec<PartyStanding>,
    pub government: Option<GovernmentSummary>,
    pub districts: Vec<DistrictResult>,
    pub regions: Vec<RegionResult>,
    pub seat_history: Vec<RunSeats>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportTotals {
    pub parties: usize,
    pub districts: usize,
    pub seats: u32,
    pub ballots: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartyStanding {
    pub rank: usize,
    pub name: String,
    pub ideology: String,
    pub popularity: u32,
    pub seats: u32,
    pub share_pct: f64,
    pub government: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GovernmentSummary {
    pub name: String,
    pub members: Vec<String>,
    pub seats: u32,
    pub total_seats: u32,
    pub majority: u32,
    pub share_pct: f64,
    pub has_majority: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistrictResult {
    pub name: String,
    pub region: String,
    pub turnout: u32,
    pub winner: Option<String>,
    pub winning_party: Option<String>,
    pub candidates: Vec<CandidateResult>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateResult {
    pub name: String,
    pub party: String,
    pub votes: u32,
    pub share_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionResult {
    pub region: String,
    pub dominant_party: String,
    pub seats_won: u32,
    pub districts: u32,
    pub tally: Vec<PartySeats>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartySeats {
    pub party: String,
    pub seats: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSeats {
    pub run: usize,
    pub ballots: u64,
    pub government: Option<String>,
    pub seats: Vec<PartySeats>,
}
