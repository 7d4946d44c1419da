use crate::domain::model::{CandidateId, PartyId, PartyRecord, Universe};
use crate::domain::region::RegionSeats;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;

pub const SURNAMES: [&str; 10] = [
    "佐藤", "鈴木", "高橋", "田中", "伊藤", "渡辺", "山本", "中村", "小林", "加藤",
];
pub const GIVEN_NAMES: [&str; 10] = [
    "一郎", "次郎", "花子", "美咲", "大輔", "誠", "陽子", "健太", "直人", "由美",
];
pub const PLACEHOLDER_NAME: &str = "匿名 候補";
pub const MAX_NAME_ATTEMPTS: usize = 1000;

const MIN_CANDIDATES: usize = 2;
const MAX_CANDIDATES: usize = 4;

/// Seats per prefecture, in the order districts are generated.
pub const DEFAULT_REGION_SEATS: [(&str, u32); 47] = [
    ("北海道", 12),
    ("青森県", 3),
    ("岩手県", 3),
    ("宮城県", 5),
    ("秋田県", 3),
    ("山形県", 3),
    ("福島県", 4),
    ("茨城県", 7),
    ("栃木県", 5),
    ("群馬県", 5),
    ("埼玉県", 16),
    ("千葉県", 14),
    ("東京都", 30),
    ("神奈川県", 20),
    ("新潟県", 5),
    ("富山県", 3),
    ("石川県", 3),
    ("福井県", 2),
    ("山梨県", 2),
    ("長野県", 5),
    ("岐阜県", 5),
    ("静岡県", 8),
    ("愛知県", 16),
    ("三重県", 4),
    ("滋賀県", 3),
    ("京都府", 6),
    ("大阪府", 19),
    ("兵庫県", 12),
    ("奈良県", 3),
    ("和歌山県", 2),
    ("鳥取県", 2),
    ("島根県", 2),
    ("岡山県", 4),
    ("広島県", 6),
    ("山口県", 3),
    ("徳島県", 2),
    ("香川県", 3),
    ("愛媛県", 3),
    ("高知県", 2),
    ("福岡県", 11),
    ("佐賀県", 2),
    ("長崎県", 3),
    ("熊本県", 4),
    ("大分県", 3),
    ("宮崎県", 3),
    ("鹿児島県", 4),
    ("沖縄県", 4),
];

pub fn default_region_table() -> Vec<RegionSeats> {
    DEFAULT_REGION_SEATS
        .iter()
        .map(|&(name, seats)| RegionSeats::new(name, seats))
        .collect()
}

/// Two-party roster used when no roster source is available.
pub fn fallback_roster() -> Vec<PartyRecord> {
    vec![
        PartyRecord::new("自由党", "保守", 40, "説明なし"),
        PartyRecord::new("民進党", "リベラル", 30, "説明なし"),
    ]
}

pub fn district_name(region: &str, index: u32) -> String {
    format!("{}第{}区", region, index)
}

pub struct UniverseBuilder {
    roster: Vec<PartyRecord>,
    officeholders: HashSet<String>,
    regions: Vec<RegionSeats>,
}

impl UniverseBuilder {
    pub fn new(roster: Vec<PartyRecord>) -> Self {
        Self {
            roster,
            officeholders: HashSet::new(),
            regions: default_region_table(),
        }
    }

    pub fn with_officeholders(mut self, officeholders: HashSet<String>) -> Self {
        self.officeholders = officeholders;
        self
    }

    pub fn with_regions(mut self, regions: Vec<RegionSeats>) -> Self {
        self.regions = regions;
        self
    }

    pub fn build<R: Rng>(self, rng: &mut R) -> Universe {
        let UniverseBuilder {
            roster,
            officeholders,
            regions,
        } = self;

        let mut universe = Universe::new(regions.clone());
        let mut seen = HashSet::new();
        for record in roster {
            if !seen.insert(record.name.clone()) {
                tracing::warn!("Duplicate party '{}' in roster, keeping the first entry", record.name);
                continue;
            }
            universe.add_party(record);
        }

        let party_ids: Vec<PartyId> = universe.parties().iter().map(|p| p.id).collect();
        if party_ids.len() < MIN_CANDIDATES {
            tracing::warn!(
                "Only {} part{} in roster, districts will have fewer than {} candidates",
                party_ids.len(),
                if party_ids.len() == 1 { "y" } else { "ies" },
                MIN_CANDIDATES
            );
        }

        for region in &regions {
            for index in 1..=region.seats {
                let planned = rng.gen_range(MIN_CANDIDATES..=MAX_CANDIDATES);
                let mut shuffled = party_ids.clone();
                shuffled.shuffle(rng);

                let candidates: Vec<CandidateId> = shuffled
                    .into_iter()
                    .take(planned)
                    .map(|party| {
                        let name = generate_name(&officeholders, &mut *rng);
                        universe.add_candidate(name, party)
                    })
                    .collect();

                let name = district_name(&region.name, index);
                tracing::trace!("{}: {} candidates", name, candidates.len());
                universe.add_district(name, candidates);
            }
        }

        tracing::debug!(
            "Built universe with {} parties, {} districts, {} candidates",
            universe.parties().len(),
            universe.districts().len(),
            universe.candidates().len()
        );
        universe
    }
}

/// Random `<surname> <given name>` that is not a current officeholder.
pub fn generate_name<R: Rng>(officeholders: &HashSet<String>, rng: &mut R) -> String {
    for _ in 0..MAX_NAME_ATTEMPTS {
        let surname = SURNAMES[rng.gen_range(0..SURNAMES.len())];
        let given = GIVEN_NAMES[rng.gen_range(0..GIVEN_NAMES.len())];
        let name = format!("{} {}", surname, given);
        if !officeholders.contains(&name) {
            return name;
        }
    }
    PLACEHOLDER_NAME.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn roster(n: usize) -> Vec<PartyRecord> {
        (0..n)
            .map(|i| PartyRecord::new(&format!("党{}", i), "中道", 20, ""))
            .collect()
    }

    #[test]
    fn test_default_table_has_all_prefectures() {
        let table = default_region_table();
        assert_eq!(table.len(), 47);
        assert_eq!(table.iter().map(|r| r.seats).sum::<u32>(), 289);
    }

    #[test]
    fn test_districts_follow_region_table() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let universe = UniverseBuilder::new(roster(6))
            .with_regions(vec![RegionSeats::new("東京都", 3), RegionSeats::new("北海道", 2)])
            .build(&mut rng);

        let names: Vec<&str> = universe.districts().iter().map(|d| d.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["東京都第1区", "東京都第2区", "東京都第3区", "北海道第1区", "北海道第2区"]
        );
    }

    #[test]
    fn test_candidates_come_from_distinct_parties() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let universe = UniverseBuilder::new(roster(6)).build(&mut rng);

        assert_eq!(universe.districts().len(), 289);
        for district in universe.districts() {
            let count = district.candidates.len();
            assert!((2..=4).contains(&count), "{} has {} candidates", district.name, count);
            let parties: HashSet<PartyId> = district
                .candidates
                .iter()
                .map(|&c| universe.candidate(c).party)
                .collect();
            assert_eq!(parties.len(), count);
        }
    }

    #[test]
    fn test_small_roster_caps_candidate_count() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let universe = UniverseBuilder::new(fallback_roster()).build(&mut rng);
        assert!(universe.districts().iter().all(|d| d.candidates.len() == 2));

        let universe = UniverseBuilder::new(roster(1)).build(&mut rng);
        assert!(universe.districts().iter().all(|d| d.candidates.len() == 1));
    }

    #[test]
    fn test_duplicate_party_names_keep_first() {
        let mut records = roster(2);
        records.push(PartyRecord::new("党0", "別物", 90, ""));
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let universe = UniverseBuilder::new(records).build(&mut rng);
        assert_eq!(universe.parties().len(), 2);
        assert_eq!(universe.party(PartyId(0)).popularity, 20);
    }

    #[test]
    fn test_names_avoid_officeholders() {
        let mut officeholders: HashSet<String> = HashSet::new();
        for surname in SURNAMES {
            for given in GIVEN_NAMES.iter().skip(1) {
                officeholders.insert(format!("{} {}", surname, given));
            }
        }
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        for _ in 0..50 {
            let name = generate_name(&officeholders, &mut rng);
            assert!(!officeholders.contains(&name));
            assert!(name.ends_with("一郎"));
        }
    }

    #[test]
    fn test_exhausted_name_pool_uses_placeholder() {
        let officeholders: HashSet<String> = SURNAMES
            .iter()
            .flat_map(|s| GIVEN_NAMES.iter().map(move |g| format!("{} {}", s, g)))
            .collect();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(generate_name(&officeholders, &mut rng), PLACEHOLDER_NAME);
    }

    #[test]
    fn test_same_seed_builds_same_universe() {
        let build = |seed| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            UniverseBuilder::new(roster(5)).build(&mut rng)
        };
        let a = build(42);
        let b = build(42);
        assert_eq!(a.districts(), b.districts());
        assert_eq!(a.candidates(), b.candidates());
    }
}
