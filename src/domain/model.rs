use crate::domain::ideology::IdeologyVector;
use crate::domain::region::{DemographicTable, RegionSeats};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Party name reserved for candidates without affiliation. Never joins a coalition.
pub const INDEPENDENT_PARTY: &str = "無所属";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PartyId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CandidateId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DistrictId(pub usize);

/// One entry of the party roster as it appears in the roster source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartyRecord {
    pub name: String,
    #[serde(default)]
    pub ideology: String,
    pub popularity: i64,
    #[serde(default)]
    pub description: String,
    #[serde(default, alias = "ideology_vector")]
    pub ideologies: Option<IdeologyVector>,
}

impl PartyRecord {
    pub fn new(name: &str, ideology: &str, popularity: i64, description: &str) -> Self {
        Self {
            name: name.to_string(),
            ideology: ideology.to_string(),
            popularity,
            description: description.to_string(),
            ideologies: None,
        }
    }

    pub fn with_ideologies(mut self, ideologies: IdeologyVector) -> Self {
        self.ideologies = Some(ideologies);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Party {
    pub id: PartyId,
    pub name: String,
    pub ideology_label: String,
    pub popularity: u32,
    pub description: String,
    pub ideology: Option<IdeologyVector>,
    pub seats: u32,
    pub government: bool,
}

impl Party {
    pub fn from_record(id: PartyId, record: PartyRecord) -> Self {
        Self {
            id,
            name: record.name,
            ideology_label: record.ideology,
            popularity: record.popularity.clamp(0, 100) as u32,
            description: record.description,
            ideology: record.ideologies,
            seats: 0,
            government: false,
        }
    }

    pub fn is_independent(&self) -> bool {
        self.name == INDEPENDENT_PARTY
    }

    pub fn reset(&mut self) {
        self.seats = 0;
        self.government = false;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub id: CandidateId,
    pub name: String,
    pub party: PartyId,
    pub votes: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct District {
    pub id: DistrictId,
    pub name: String,
    pub candidates: Vec<CandidateId>,
    /// Ballots cast in the latest run; 0 before the first run.
    pub turnout: u32,
}

/// Everything the external sources provide, after fallbacks have been applied.
#[derive(Debug, Clone)]
pub struct SimulationInputs {
    pub roster: Vec<PartyRecord>,
    pub officeholders: HashSet<String>,
    pub demographics: DemographicTable,
    pub regions: Vec<RegionSeats>,
}

/// Arena owning every party, candidate and district of one simulated country.
/// Entities refer to each other only through the integer handles above.
#[derive(Debug, Clone, Default)]
pub struct Universe {
    parties: Vec<Party>,
    candidates: Vec<Candidate>,
    districts: Vec<District>,
    regions: Vec<RegionSeats>,
}

impl Universe {
    pub fn new(regions: Vec<RegionSeats>) -> Self {
        Self {
            regions,
            ..Self::default()
        }
    }

    pub fn add_party(&mut self, record: PartyRecord) -> PartyId {
        let id = PartyId(self.parties.len());
        self.parties.push(Party::from_record(id, record));
        id
    }

    pub fn add_candidate(&mut self, name: String, party: PartyId) -> CandidateId {
        let id = CandidateId(self.candidates.len());
        self.candidates.push(Candidate {
            id,
            name,
            party,
            votes: 0,
        });
        id
    }

    pub fn add_district(&mut self, name: String, candidates: Vec<CandidateId>) -> DistrictId {
        let id = DistrictId(self.districts.len());
        self.districts.push(District {
            id,
            name,
            candidates,
            turnout: 0,
        });
        id
    }

    pub fn parties(&self) -> &[Party] {
        &self.parties
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn districts(&self) -> &[District] {
        &self.districts
    }

    pub fn regions(&self) -> &[RegionSeats] {
        &self.regions
    }

    pub fn party(&self, id: PartyId) -> &Party {
        &self.parties[id.0]
    }

    pub fn party_mut(&mut self, id: PartyId) -> &mut Party {
        &mut self.parties[id.0]
    }

    pub fn candidate(&self, id: CandidateId) -> &Candidate {
        &self.candidates[id.0]
    }

    pub fn candidate_mut(&mut self, id: CandidateId) -> &mut Candidate {
        &mut self.candidates[id.0]
    }

    pub fn district(&self, id: DistrictId) -> &District {
        &self.districts[id.0]
    }

    pub fn district_mut(&mut self, id: DistrictId) -> &mut District {
        &mut self.districts[id.0]
    }

    /// Party owning a candidate.
    pub fn party_of(&self, candidate: CandidateId) -> &Party {
        self.party(self.candidate(candidate).party)
    }

    /// Candidate with strictly the most votes; the earliest listed wins a tie.
    pub fn winner(&self, district: DistrictId) -> Option<CandidateId> {
        let mut best: Option<(CandidateId, u32)> = None;
        for &candidate in &self.district(district).candidates {
            let votes = self.candidate(candidate).votes;
            match best {
                Some((_, top)) if votes <= top => {}
                _ => best = Some((candidate, votes)),
            }
        }
        best.map(|(candidate, _)| candidate)
    }

    pub fn district_votes(&self, district: DistrictId) -> u64 {
        self.district(district)
            .candidates
            .iter()
            .map(|&c| u64::from(self.candidate(c).votes))
            .sum()
    }

    pub fn total_seats(&self) -> u32 {
        self.parties.iter().map(|p| p.seats).sum()
    }

    /// Zero every seat, vote and turnout counter and clear government flags.
    pub fn reset_counters(&mut self) {
        self.parties.iter_mut().for_each(Party::reset);
        self.candidates.iter_mut().for_each(|c| c.votes = 0);
        self.districts.iter_mut().for_each(|d| d.turnout = 0);
    }

    pub fn clear_government(&mut self) {
        self.parties.iter_mut().for_each(|p| p.government = false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn universe_with_votes(votes: &[u32]) -> (Universe, DistrictId) {
        let mut universe = Universe::new(Vec::new());
        let candidates: Vec<CandidateId> = votes
            .iter()
            .enumerate()
            .map(|(i, &v)| {
                let party = universe.add_party(PartyRecord::new(&format!("党{}", i), "", 10, ""));
                let id = universe.add_candidate(format!("候補{}", i), party);
                universe.candidate_mut(id).votes = v;
                id
            })
            .collect();
        let district = universe.add_district("東京都第1区".to_string(), candidates);
        (universe, district)
    }

    #[test]
    fn test_winner_has_most_votes() {
        let (universe, district) = universe_with_votes(&[120, 450, 300]);
        assert_eq!(universe.winner(district), Some(CandidateId(1)));
    }

    #[test]
    fn test_winner_tie_goes_to_earliest_candidate() {
        let (universe, district) = universe_with_votes(&[100, 300, 300]);
        assert_eq!(universe.winner(district), Some(CandidateId(1)));

        let (universe, district) = universe_with_votes(&[0, 0]);
        assert_eq!(universe.winner(district), Some(CandidateId(0)));
    }

    #[test]
    fn test_district_without_candidates_has_no_winner() {
        let mut universe = Universe::new(Vec::new());
        let district = universe.add_district("沖縄県第1区".to_string(), Vec::new());
        assert_eq!(universe.winner(district), None);
    }

    #[test]
    fn test_popularity_is_clamped_into_range() {
        let party = Party::from_record(PartyId(0), PartyRecord::new("過激党", "", 250, ""));
        assert_eq!(party.popularity, 100);
        let party = Party::from_record(PartyId(0), PartyRecord::new("泡沫党", "", -5, ""));
        assert_eq!(party.popularity, 0);
    }

    #[test]
    fn test_reset_counters_clears_everything() {
        let (mut universe, district) = universe_with_votes(&[10, 20]);
        universe.district_mut(district).turnout = 30;
        universe.party_mut(PartyId(0)).seats = 3;
        universe.party_mut(PartyId(0)).government = true;

        universe.reset_counters();

        assert_eq!(universe.total_seats(), 0);
        assert_eq!(universe.district_votes(district), 0);
        assert_eq!(universe.district(district).turnout, 0);
        assert!(!universe.party(PartyId(0)).government);
    }
}
