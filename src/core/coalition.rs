use crate::domain::model::{Party, PartyId, Universe};

/// Largest Euclidean distance between two 8-axis vectors scored 0..=20 (√(8·20²)).
pub const MAX_IDEOLOGY_DISTANCE: f64 = 56.57;
/// Partners scoring below this with the leader are refused outright.
pub const MIN_COOPERATION: f64 = 30.0;
/// Leader plus two partners.
pub const MAX_COALITION_SIZE: usize = 3;

const COALITION_SEPARATOR: &str = "・";
const COALITION_SUFFIX: &str = "連立政権";

/// Ideological affinity in [0, 100]; 0 when either party has no ideology vector.
pub fn cooperation(a: &Party, b: &Party) -> f64 {
    match (&a.ideology, &b.ideology) {
        (Some(left), Some(right)) => {
            let distance = left.distance(right);
            (100.0 * (1.0 - distance / MAX_IDEOLOGY_DISTANCE)).max(0.0)
        }
        _ => 0.0,
    }
}

pub fn majority_threshold(total_seats: u32) -> u32 {
    total_seats / 2 + 1
}

/// Greedy coalition around the top-seat party.
///
/// `parties` is taken in roster order; that order breaks ties both for the
/// leader and for partners with equal cooperation scores.
pub fn form_coalition(parties: &[Party], total_seats: u32) -> Vec<PartyId> {
    let Some(leader) = parties
        .iter()
        .enumerate()
        .max_by(|(ia, a), (ib, b)| a.seats.cmp(&b.seats).then(ib.cmp(ia)))
        .map(|(_, party)| party)
    else {
        return Vec::new();
    };

    let mut coalition = vec![leader.id];
    if leader.is_independent() {
        return coalition;
    }

    let majority = majority_threshold(total_seats);
    let mut seats = leader.seats;
    if seats >= majority {
        return coalition;
    }

    let mut partners: Vec<(f64, &Party)> = parties
        .iter()
        .filter(|p| p.id != leader.id && !p.is_independent())
        .map(|p| (cooperation(leader, p), p))
        .collect();
    // Stable sort keeps roster order among equal scores.
    partners.sort_by(|a, b| b.0.total_cmp(&a.0));

    for (score, partner) in partners {
        if score < MIN_COOPERATION {
            continue;
        }
        coalition.push(partner.id);
        seats += partner.seats;

        if seats >= majority || coalition.len() >= MAX_COALITION_SIZE {
            break;
        }
    }

    coalition
}

#[derive(Debug, Clone, PartialEq)]
pub struct Government {
    pub members: Vec<PartyId>,
    pub name: String,
    pub seats: u32,
    pub total_seats: u32,
    pub majority: u32,
}

impl Government {
    pub fn has_majority(&self) -> bool {
        self.seats >= self.majority
    }

    pub fn share_pct(&self) -> f64 {
        if self.total_seats == 0 {
            0.0
        } else {
            f64::from(self.seats) / f64::from(self.total_seats) * 100.0
        }
    }

    pub fn leader(&self) -> Option<PartyId> {
        self.members.first().copied()
    }
}

pub fn coalition_name<'a, I>(names: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let joined: Vec<&str> = names.into_iter().collect();
    format!("{}{}", joined.join(COALITION_SEPARATOR), COALITION_SUFFIX)
}

/// Clears government flags, then forms and flags the new government.
/// `None` until an election has awarded seats.
pub fn form_government(universe: &mut Universe) -> Option<Government> {
    universe.clear_government();

    let total_seats = universe.total_seats();
    if total_seats == 0 {
        return None;
    }

    let members = form_coalition(universe.parties(), total_seats);
    if members.is_empty() {
        return None;
    }

    let seats = members.iter().map(|&id| universe.party(id).seats).sum();
    let name = coalition_name(members.iter().map(|&id| universe.party(id).name.as_str()));
    for &id in &members {
        universe.party_mut(id).government = true;
    }

    let government = Government {
        members,
        name,
        seats,
        total_seats,
        majority: majority_threshold(total_seats),
    };
    tracing::info!(
        "Government: {} ({} / {} seats, {:.1}%{})",
        government.name,
        government.seats,
        government.total_seats,
        government.share_pct(),
        if government.has_majority() { "" } else { ", minority" }
    );
    Some(government)
}
