use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Highest score a party may hold on a single axis.
pub const MAX_AXIS_SCORE: u8 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IdeologyAxis {
    Conservative,
    Liberal,
    Populist,
    Libertarian,
    Environmentalist,
    FiscalExpansion,
    FiscalAusterity,
    Nationalist,
}

impl IdeologyAxis {
    pub const ALL: [IdeologyAxis; 8] = [
        IdeologyAxis::Conservative,
        IdeologyAxis::Liberal,
        IdeologyAxis::Populist,
        IdeologyAxis::Libertarian,
        IdeologyAxis::Environmentalist,
        IdeologyAxis::FiscalExpansion,
        IdeologyAxis::FiscalAusterity,
        IdeologyAxis::Nationalist,
    ];

    /// Label used by roster files and reports.
    pub fn label(self) -> &'static str {
        match self {
            IdeologyAxis::Conservative => "保守",
            IdeologyAxis::Liberal => "リベラル",
            IdeologyAxis::Populist => "ポピュリズム",
            IdeologyAxis::Libertarian => "リバタリアニズム",
            IdeologyAxis::Environmentalist => "環境主義",
            IdeologyAxis::FiscalExpansion => "積極財政",
            IdeologyAxis::FiscalAusterity => "緊縮財政",
            IdeologyAxis::Nationalist => "ナショナリズム",
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            IdeologyAxis::Conservative => "conservative",
            IdeologyAxis::Liberal => "liberal",
            IdeologyAxis::Populist => "populist",
            IdeologyAxis::Libertarian => "libertarian",
            IdeologyAxis::Environmentalist => "environmentalist",
            IdeologyAxis::FiscalExpansion => "fiscal_expansion",
            IdeologyAxis::FiscalAusterity => "fiscal_austerity",
            IdeologyAxis::Nationalist => "nationalist",
        }
    }

    /// Accepts either the Japanese label or the snake_case key.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|axis| axis.label() == name || axis.key() == name)
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for IdeologyAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-axis scores of one party. Axes not given in the source read as 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "HashMap<String, i64>", into = "BTreeMap<String, i64>")]
pub struct IdeologyVector {
    scores: [u8; 8],
}

impl IdeologyVector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, axis: IdeologyAxis, score: u8) -> Self {
        self.scores[axis.index()] = score.min(MAX_AXIS_SCORE);
        self
    }

    pub fn get(&self, axis: IdeologyAxis) -> u8 {
        self.scores[axis.index()]
    }

    /// Axis score as a float, for the weighting and distance formulas.
    pub fn weight(&self, axis: IdeologyAxis) -> f64 {
        f64::from(self.get(axis))
    }

    pub fn distance(&self, other: &IdeologyVector) -> f64 {
        IdeologyAxis::ALL
            .iter()
            .map(|&axis| {
                let diff = self.weight(axis) - other.weight(axis);
                diff * diff
            })
            .sum::<f64>()
            .sqrt()
    }
}

impl TryFrom<HashMap<String, i64>> for IdeologyVector {
    type Error = String;

    fn try_from(raw: HashMap<String, i64>) -> Result<Self, Self::Error> {
        let mut vector = IdeologyVector::new();
        let mut seen = [false; 8];
        for (name, value) in raw {
            let axis = IdeologyAxis::from_name(&name)
                .ok_or_else(|| format!("unknown ideology axis '{}'", name))?;
            if std::mem::replace(&mut seen[axis.index()], true) {
                return Err(format!("ideology axis '{}' is given more than once", axis.key()));
            }
            if !(0..=i64::from(MAX_AXIS_SCORE)).contains(&value) {
                return Err(format!(
                    "score {} for axis '{}' is outside 0..={}",
                    value, name, MAX_AXIS_SCORE
                ));
            }
            vector.scores[axis.index()] = value as u8;
        }
        Ok(vector)
    }
}

impl From<IdeologyVector> for BTreeMap<String, i64> {
    fn from(vector: IdeologyVector) -> Self {
        IdeologyAxis::ALL
            .iter()
            .map(|&axis| (axis.label().to_string(), i64::from(vector.get(axis))))
            .collect()
    }
}
