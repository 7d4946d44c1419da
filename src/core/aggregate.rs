use crate::domain::model::{PartyId, Universe};
use crate::domain::region::{match_region, region_prefix};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionSummary {
    pub region: String,
    pub dominant_party: PartyId,
    /// Districts the dominant party won in this region.
    pub seats_won: u32,
    pub districts: u32,
    /// Wins per party, most first; equal counts in roster order.
    pub tally: Vec<(PartyId, u32)>,
}

/// Region a district belongs to: the known region matching its name prefix,
/// or the bare prefix when no region in the universe's table matches.
pub fn region_of(universe: &Universe, district_name: &str) -> String {
    let prefix = region_prefix(district_name);
    match_region(prefix, universe.regions().iter().map(|r| r.name.as_str()))
        .unwrap_or(prefix)
        .to_string()
}

/// Dominant party per region. Ties on win count go to the party listed first in the roster.
pub fn aggregate_by_region(universe: &Universe) -> BTreeMap<String, RegionSummary> {
    let mut wins: BTreeMap<String, (u32, BTreeMap<PartyId, u32>)> = BTreeMap::new();

    for district in universe.districts() {
        let Some(winner) = universe.winner(district.id) else {
            continue;
        };
        // Not voted on yet.
        if universe.district_votes(district.id) == 0 {
            continue;
        }
        let party = universe.candidate(winner).party;
        let entry = wins.entry(region_of(universe, &district.name)).or_default();
        entry.0 += 1;
        *entry.1.entry(party).or_insert(0) += 1;
    }

    wins.into_iter()
        .filter_map(|(region, (districts, counts))| {
            let mut tally: Vec<(PartyId, u32)> = counts.into_iter().collect();
            // BTreeMap yields roster order; the stable sort keeps it among equal counts.
            tally.sort_by(|a, b| b.1.cmp(&a.1));
            let &(dominant_party, seats_won) = tally.first()?;
            Some((
                region.clone(),
                RegionSummary {
                    region,
                    dominant_party,
                    seats_won,
                    districts,
                    tally,
                },
            ))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{CandidateId, PartyRecord};
    use crate::domain::region::RegionSeats;

    /// Universe whose districts are won by the given party indices.
    fn decided(regions: Vec<RegionSeats>, results: &[(&str, usize)]) -> Universe {
        let mut universe = Universe::new(regions);
        let parties: Vec<PartyId> = ["自由党", "民進党", "未来党"]
            .iter()
            .map(|name| universe.add_party(PartyRecord::new(name, "", 10, "")))
            .collect();

        for (district, winner) in results {
            let candidates: Vec<CandidateId> = parties
                .iter()
                .enumerate()
                .map(|(i, &party)| {
                    let id = universe.add_candidate(format!("候補{}", i), party);
                    universe.candidate_mut(id).votes = if i == *winner { 100 } else { 10 };
                    id
                })
                .collect();
            universe.add_district(district.to_string(), candidates);
        }
        universe
    }

    #[test]
    fn test_dominant_party_per_region() {
        let universe = decided(
            vec![RegionSeats::new("東京都", 3), RegionSeats::new("北海道", 2)],
            &[
                ("東京都第1区", 1),
                ("東京都第2区", 1),
                ("東京都第3区", 0),
                ("北海道第1区", 2),
                ("北海道第2区", 2),
            ],
        );

        let regions = aggregate_by_region(&universe);
        assert_eq!(regions.len(), 2);

        let tokyo = &regions["東京都"];
        assert_eq!(tokyo.dominant_party, PartyId(1));
        assert_eq!(tokyo.seats_won, 2);
        assert_eq!(tokyo.districts, 3);
        assert_eq!(tokyo.tally, vec![(PartyId(1), 2), (PartyId(0), 1)]);

        let hokkaido = &regions["北海道"];
        assert_eq!(hokkaido.dominant_party, PartyId(2));
        assert_eq!(hokkaido.seats_won, 2);
    }

    #[test]
    fn test_tie_goes_to_roster_order() {
        let universe = decided(
            vec![RegionSeats::new("大阪府", 2)],
            &[("大阪府第1区", 2), ("大阪府第2区", 0)],
        );
        let regions = aggregate_by_region(&universe);
        assert_eq!(regions["大阪府"].dominant_party, PartyId(0));
        assert_eq!(regions["大阪府"].seats_won, 1);
    }

    #[test]
    fn test_region_key_resolves_truncated_prefixes() {
        let universe = decided(
            vec![RegionSeats::new("神奈川県", 1), RegionSeats::new("北海道", 1)],
            &[("神奈川県第1区", 0), ("北海道第1区", 1)],
        );
        assert_eq!(region_of(&universe, "神奈川県第1区"), "神奈川県");
        let regions = aggregate_by_region(&universe);
        assert!(regions.contains_key("神奈川県"));
        assert!(regions.contains_key("北海道"));
    }

    #[test]
    fn test_unknown_region_keeps_prefix() {
        let universe = decided(Vec::new(), &[("架空県第1区", 0)]);
        let regions = aggregate_by_region(&universe);
        assert!(regions.contains_key("架空県"));
    }

    #[test]
    fn test_undecided_universe_has_no_regions() {
        let mut universe = decided(vec![RegionSeats::new("東京都", 1)], &[("東京都第1区", 0)]);
        universe.reset_counters();
        assert!(aggregate_by_region(&universe).is_empty());
    }
}
