//! Prefecture profiles and the district-name → region matching rule.

use serde::{Deserialize, Serialize};

/// Characters that close a prefecture name (県, 都, 府).
const ADMIN_SUFFIXES: [char; 3] = ['県', '都', '府'];

/// Region entry of the seat table: how many single-member districts it holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionSeats {
    pub name: String,
    pub seats: u32,
}

impl RegionSeats {
    pub fn new(name: impl Into<String>, seats: u32) -> Self {
        Self {
            name: name.into(),
            seats,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrefectureProfile {
    pub name: String,
    /// Per-capita income in 万円.
    pub income: u32,
    pub primary: f64,
    pub secondary: f64,
    pub tertiary: f64,
    pub elderly: f64,
}

impl PrefectureProfile {
    /// National averages applied to districts with no matching profile.
    pub fn national_average() -> Self {
        Self {
            name: "全国平均".to_string(),
            income: 300,
            primary: 4.0,
            secondary: 25.0,
            tertiary: 71.0,
            elderly: 29.0,
        }
    }
}

/// Leading part of a district name that identifies its prefecture: three
/// characters when the third closes a prefecture name, two otherwise.
pub fn region_prefix(district_name: &str) -> &str {
    let mut boundaries = district_name.char_indices().map(|(i, _)| i).skip(2);
    let two = boundaries.next();
    let three = boundaries.next();

    if let Some(end_of_two) = two {
        let third = district_name[end_of_two..].chars().next();
        if third.is_some_and(|c| ADMIN_SUFFIXES.contains(&c)) {
            return &district_name[..three.unwrap_or(district_name.len())];
        }
        return &district_name[..end_of_two];
    }
    district_name
}

/// First known name, in the order given, that equals the prefix, extends it
/// or is itself a prefix of it.
pub fn match_region<'a, I>(prefix: &str, known: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let known: Vec<&'a str> = known.into_iter().collect();
    known
        .iter()
        .copied()
        .find(|name| *name == prefix)
        .or_else(|| {
            known
                .iter()
                .copied()
                .find(|name| name.starts_with(prefix) || prefix.starts_with(name))
        })
}

/// Demographic lookup table keyed by prefecture name, in load order.
#[derive(Debug, Clone)]
pub struct DemographicTable {
    profiles: Vec<PrefectureProfile>,
    fallback: PrefectureProfile,
}

impl DemographicTable {
    pub fn new(profiles: Vec<PrefectureProfile>) -> Self {
        Self {
            profiles,
            fallback: PrefectureProfile::national_average(),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn profiles(&self) -> &[PrefectureProfile] {
        &self.profiles
    }

    /// Profile for the prefecture a district belongs to, if one is known.
    pub fn find(&self, district_name: &str) -> Option<&PrefectureProfile> {
        let prefix = region_prefix(district_name);
        let name = match_region(prefix, self.profiles.iter().map(|p| p.name.as_str()))?;
        self.profiles.iter().find(|p| p.name == name)
    }

    pub fn lookup(&self, district_name: &str) -> &PrefectureProfile {
        self.find(district_name).unwrap_or(&self.fallback)
    }
}

impl Default for DemographicTable {
    fn default() -> Self {
        Self::empty()
    }
}
