//! Turns a finished simulation into an `ElectionReport` and renders it.

use crate::core::aggregate::region_of;
use crate::core::simulation::{RunResult, Simulation};
use crate::domain::model::Universe;
use crate::domain::report::{
    CandidateResult, DistrictResult, ElectionReport, GovernmentSummary, PartySeats, PartyStanding,
    RegionResult, ReportTotals, RunSeats,
};
use crate::utils::error::{Result, SimError};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Csv,
    Tsv,
}

impl OutputFormat {
    pub const NAMES: [&'static str; 3] = ["json", "csv", "tsv"];

    pub fn from_name(name: &str) -> Result<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            "tsv" => Ok(OutputFormat::Tsv),
            other => Err(SimError::InvalidConfigValueError {
                field: "output.formats".to_string(),
                value: other.to_string(),
                reason: format!("expected one of {}", Self::NAMES.join(", ")),
            }),
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Tsv => "tsv",
        }
    }

    fn delimiter(&self) -> u8 {
        match self {
            OutputFormat::Tsv => b'\t',
            _ => b',',
        }
    }
}

fn percent(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    (part as f64 / whole as f64 * 10_000.0).round() / 100.0
}

fn party_seats(universe: &Universe, seats: &[u32]) -> Vec<PartySeats> {
    universe
        .parties()
        .iter()
        .zip(seats)
        .map(|(party, &seats)| PartySeats {
            party: party.name.clone(),
            seats,
        })
        .collect()
}

fn standings(universe: &Universe) -> Vec<PartyStanding> {
    let total = u64::from(universe.total_seats());
    let mut parties: Vec<_> = universe.parties().iter().collect();
    parties.sort_by(|a, b| b.seats.cmp(&a.seats));

    parties
        .into_iter()
        .enumerate()
        .map(|(index, party)| PartyStanding {
            rank: index + 1,
            name: party.name.clone(),
            ideology: party.ideology_label.clone(),
            popularity: party.popularity,
            seats: party.seats,
            share_pct: percent(u64::from(party.seats), total),
            government: party.government,
        })
        .collect()
}

fn districts(universe: &Universe) -> Vec<DistrictResult> {
    universe
        .districts()
        .iter()
        .map(|district| {
            let cast = universe.district_votes(district.id);
            let winner = universe.winner(district.id).filter(|_| cast > 0);

            DistrictResult {
                name: district.name.clone(),
                region: region_of(universe, &district.name),
                turnout: district.turnout,
                winner: winner.map(|c| universe.candidate(c).name.clone()),
                winning_party: winner.map(|c| universe.party_of(c).name.clone()),
                candidates: district
                    .candidates
                    .iter()
                    .map(|&c| {
                        let candidate = universe.candidate(c);
                        CandidateResult {
                            name: candidate.name.clone(),
                            party: universe.party(candidate.party).name.clone(),
                            votes: candidate.votes,
                            share_pct: percent(u64::from(candidate.votes), cast),
                        }
                    })
                    .collect(),
            }
        })
        .collect()
}

/// Breakdowns reflect the latest run; `seat_history` covers all of `runs`.
pub fn build_report(simulation: &Simulation, runs: &[RunResult]) -> ElectionReport {
    let universe = simulation.universe();
    let latest = runs.last();

    let government = latest
        .and_then(|r| r.government.as_ref())
        .map(|g| GovernmentSummary {
            name: g.name.clone(),
            members: g
                .members
                .iter()
                .map(|&id| universe.party(id).name.clone())
                .collect(),
            seats: g.seats,
            total_seats: g.total_seats,
            majority: g.majority,
            share_pct: percent(u64::from(g.seats), u64::from(g.total_seats)),
            has_majority: g.has_majority(),
        });

    let regions = latest
        .map(|r| {
            r.regions
                .values()
                .map(|summary| RegionResult {
                    region: summary.region.clone(),
                    dominant_party: universe.party(summary.dominant_party).name.clone(),
                    seats_won: summary.seats_won,
                    districts: summary.districts,
                    tally: summary
                        .tally
                        .iter()
                        .map(|&(party, seats)| PartySeats {
                            party: universe.party(party).name.clone(),
                            seats,
                        })
                        .collect(),
                })
                .collect()
        })
        .unwrap_or_default();

    let seat_history = runs
        .iter()
        .map(|r| RunSeats {
            run: r.run,
            ballots: r.ballots,
            government: r.government.as_ref().map(|g| g.name.clone()),
            seats: party_seats(universe, &r.seats),
        })
        .collect();

    ElectionReport {
        generated_at: chrono::Utc::now(),
        seed: simulation.seed(),
        runs: runs.len(),
        totals: ReportTotals {
            parties: universe.parties().len(),
            districts: universe.districts().len(),
            seats: universe.total_seats(),
            ballots: latest.map(|r| r.ballots).unwrap_or(0),
        },
        standings: standings(universe),
        government,
        districts: districts(universe),
        regions,
        seat_history,
    }
}

pub fn render_json(report: &ElectionReport) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec_pretty(report)?)
}

#[derive(Serialize)]
struct DistrictRow<'a> {
    district: &'a str,
    region: &'a str,
    turnout: u32,
    candidate: &'a str,
    party: &'a str,
    votes: u32,
    share_pct: f64,
    elected: bool,
}

fn write_rows<T: Serialize>(rows: impl IntoIterator<Item = T>, format: OutputFormat) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(format.delimiter())
        .from_writer(Vec::new());
    for row in rows {
        writer.serialize(row)?;
    }
    writer
        .into_inner()
        .map_err(|e| SimError::IoError(e.into_error()))
}

/// Party standings as CSV or TSV, one row per party.
pub fn render_standings(report: &ElectionReport, format: OutputFormat) -> Result<Vec<u8>> {
    write_rows(&report.standings, format)
}

/// One row per candidate, grouped by district.
pub fn render_districts(report: &ElectionReport, format: OutputFormat) -> Result<Vec<u8>> {
    let rows = report.districts.iter().flat_map(|district| {
        district.candidates.iter().map(move |candidate| DistrictRow {
            district: &district.name,
            region: &district.region,
            turnout: district.turnout,
            candidate: &candidate.name,
            party: &candidate.party,
            votes: candidate.votes,
            share_pct: candidate.share_pct,
            elected: district.winner.as_deref() == Some(candidate.name.as_str())
                && district.winning_party.as_deref() == Some(candidate.party.as_str()),
        })
    });
    write_rows(rows, format)
}
