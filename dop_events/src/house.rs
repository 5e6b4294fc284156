//! Event timeline of a single-seat (House) preferential count.

use log::{debug, info};

use crate::config::*;
use crate::events::*;
use crate::grouping::group_runs;

/// The four quantities published for one candidate at one count.
#[derive(PartialEq, Debug, Clone)]
pub struct CandidateCount {
    pub candidate: CandidateInfo,
    pub preference_count: f64,
    pub preference_percent: f64,
    pub transfer_count: f64,
    pub transfer_percent: f64,
}

impl CandidateCount {
    /// Assembles the rows of one candidate at one count. Each calc type must
    /// appear exactly once; the order of the rows does not matter.
    pub fn from_rows(rows: &[HouseTally]) -> DopResult<CandidateCount> {
        let first = rows.first().ok_or_else(|| DopError::StructuralViolation {
            message: "empty candidate group".to_string(),
        })?;
        if rows.len() != 4 {
            return Err(DopError::StructuralViolation {
                message: format!(
                    "division {} count {}: candidate {} has {} rows instead of 4",
                    first.division_name,
                    first.count,
                    first.candidate,
                    rows.len()
                ),
            });
        }

        let mut slots: [Option<f64>; 4] = [None; 4];
        for row in rows {
            let idx = match row.calc_type {
                CalcType::PreferenceCount => 0,
                CalcType::PreferencePercent => 1,
                CalcType::TransferCount => 2,
                CalcType::TransferPercent => 3,
            };
            if slots[idx].replace(row.calc_value).is_some() {
                return Err(DopError::StructuralViolation {
                    message: format!(
                        "division {} count {}: candidate {} has {:?} twice",
                        first.division_name, first.count, first.candidate, row.calc_type
                    ),
                });
            }
        }
        // Four rows and no duplicate: every slot is filled.
        match slots {
            [Some(preference_count), Some(preference_percent), Some(transfer_count), Some(transfer_percent)] => {
                Ok(CandidateCount {
                    candidate: candidate_info(first),
                    preference_count,
                    preference_percent,
                    transfer_count,
                    transfer_percent,
                })
            }
            _ => Err(DopError::StructuralViolation {
                message: format!(
                    "division {} count {}: candidate {} is missing a calc type",
                    first.division_name, first.count, first.candidate
                ),
            }),
        }
    }

    pub fn preferences(&self) -> CandidatePreferences {
        CandidatePreferences {
            candidate: self.candidate.clone(),
            preferences_total: self.preference_count as i64,
            preferences_percentage: self.preference_percent,
        }
    }

    pub fn transfer(&self) -> CandidateTransfer {
        CandidateTransfer {
            candidate: self.candidate.clone(),
            transferred_total: self.transfer_count as i64,
            transferred_percentage: self.transfer_percent,
        }
    }

    /// The whole vote of this candidate leaves at this count.
    // The published files write this marker as exactly -100.00.
    pub fn is_excluded(&self) -> bool {
        self.transfer_percent == -100.0
    }
}

fn candidate_info(row: &HouseTally) -> CandidateInfo {
    CandidateInfo {
        id: row.candidate,
        name: row.name.clone(),
        display_name: row.display_name.clone(),
        party: row.party.clone(),
        position: row.position,
    }
}

/// The position of the leading candidates after a count.
#[derive(PartialEq, Debug, Clone)]
pub enum Standing {
    /// The leader holds more than half of the formal vote.
    Majority(CandidatePreferences),
    /// Even all the other votes together could not overtake the second candidate,
    /// so the seat is decided between the top two.
    TwoCandidate(Vec<CandidatePreferences>),
    Open,
}

/// Sorts candidates by decreasing number of preferences, keeping the input order on ties.
pub fn rank_by_preferences(mut candidates: Vec<CandidatePreferences>) -> Vec<CandidatePreferences> {
    candidates.sort_by(|a, b| b.preferences_total.cmp(&a.preferences_total));
    candidates
}

/// Classifies a ranking, as returned by [`rank_by_preferences`].
pub fn standing(ranked: &[CandidatePreferences]) -> Standing {
    match ranked {
        [first, ..] if first.preferences_percentage > 50.0 => Standing::Majority(first.clone()),
        [first, second, ..]
            if 100.0 - first.preferences_percentage - second.preferences_percentage
                < second.preferences_percentage =>
        {
            Standing::TwoCandidate(vec![first.clone(), second.clone()])
        }
        _ => Standing::Open,
    }
}

pub fn method_from_first_preferences(first_count: &[CandidateCount]) -> Method {
    let ranked = rank_by_preferences(first_count.iter().map(|c| c.preferences()).collect());
    match standing(&ranked) {
        Standing::Majority(elected) => Method::FirstPreferences { elected },
        Standing::TwoCandidate(candidates) => Method::TwoCandidatePreferred { candidates },
        Standing::Open => Method::FullCount,
    }
}

/// Groups the rows of one division into counts, each with the candidates in
/// file order.
pub fn division_counts(rows: &[HouseTally]) -> DopResult<Vec<(u32, Vec<CandidateCount>)>> {
    let mut res: Vec<(u32, Vec<CandidateCount>)> = Vec::new();
    for (count, count_rows) in group_runs(rows, |r| r.count) {
        let mut candidates: Vec<CandidateCount> = Vec::new();
        for (_, calcs) in group_runs(count_rows, |r| r.candidate) {
            candidates.push(CandidateCount::from_rows(calcs)?);
        }
        res.push((count, candidates));
    }
    Ok(res)
}

fn transfer_event(
    division: &str,
    count: u32,
    candidates: &[CandidateCount],
) -> DopResult<HouseEvent> {
    let excluded = candidates
        .iter()
        .find(|c| c.is_excluded())
        .ok_or_else(|| DopError::MissingExclusion {
            division: division.to_string(),
            count,
        })?;
    debug!(
        "division {}: count {}: transferring from {}",
        division, count, excluded.candidate.display_name
    );
    Ok(HouseEvent::Transfer {
        from: excluded.candidate.clone(),
        candidates: candidates.iter().map(|c| c.transfer()).collect(),
    })
}

/// Builds the timeline of one division from its rows.
pub fn convert_division(division: &str, rows: &[HouseTally]) -> DopResult<HouseDivision> {
    let counts = division_counts(rows)?;
    let (first_count, last_count) = match (counts.first(), counts.last()) {
        (Some((_, first)), Some((_, last))) if !first.is_empty() && !last.is_empty() => {
            (first, last)
        }
        _ => {
            return Err(DopError::StructuralViolation {
                message: format!("division {} has no candidates", division),
            })
        }
    };

    let candidates: Vec<CandidateInfo> = first_count.iter().map(|c| c.candidate.clone()).collect();
    let method = method_from_first_preferences(first_count);
    let elected = rank_by_preferences(last_count.iter().map(|c| c.preferences()).collect())
        .swap_remove(0);

    let mut events: Vec<HouseEvent> = Vec::new();
    for (idx, (count, count_candidates)) in counts.iter().enumerate() {
        if idx > 0 {
            events.push(transfer_event(division, *count, count_candidates)?);
        }

        let prefs: Vec<CandidatePreferences> =
            count_candidates.iter().map(|c| c.preferences()).collect();
        let ranked = rank_by_preferences(prefs.clone());
        events.push(HouseEvent::Count {
            count: *count,
            candidates: prefs,
        });

        match standing(&ranked) {
            Standing::Majority(winner) => {
                debug!(
                    "division {}: count {}: {} has a majority",
                    division, count, winner.candidate.display_name
                );
                events.push(HouseEvent::Elected { elected: winner });
            }
            Standing::TwoCandidate(candidates) => {
                events.push(HouseEvent::TwoCandidatePreferred { candidates });
            }
            Standing::Open => {}
        }
    }

    Ok(HouseDivision {
        division: division.to_string(),
        candidates,
        elected,
        method,
        events,
    })
}

/// Builds the timelines of all the divisions, in file order.
pub fn convert_house(rows: &[HouseTally]) -> DopResult<Vec<HouseDivision>> {
    let mut res: Vec<HouseDivision> = Vec::new();
    for (division, division_rows) in group_runs(rows, |r| r.division_name.clone()) {
        let d = convert_division(&division, division_rows)?;
        debug!("division {}: {} events", division, d.events.len());
        res.push(d);
    }
    info!("Converted {} divisions", res.len());
    Ok(res)
}
