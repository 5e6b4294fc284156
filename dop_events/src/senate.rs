//! Event timeline of a multi-seat (Senate) single transferable vote count.

use std::collections::HashMap;

use log::{debug, info};

use crate::config::*;
use crate::events::*;
use crate::grouping::group_runs;

/// Running number of papers held by each candidate position.
///
/// One accumulator lives for the conversion of exactly one state.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct PaperAccumulator {
    totals: HashMap<u32, i64>,
}

impl PaperAccumulator {
    pub fn new() -> PaperAccumulator {
        PaperAccumulator::default()
    }

    /// Adds `delta` papers to `position` and returns the new total.
    /// Each call commits its delta exactly once.
    pub fn add_and_get(&mut self, position: u32, delta: i64) -> i64 {
        let total = self.totals.entry(position).or_insert(0);
        *total += delta;
        *total
    }

    pub fn get(&self, position: u32) -> i64 {
        self.totals.get(&position).cloned().unwrap_or(0)
    }
}

fn senate_candidate(row: &SenateTally) -> SenateCandidate {
    SenateCandidate {
        name: row.name.clone(),
        display_name: row.display_name.clone(),
        ticket: row.ticket_name.clone(),
        position: row.position,
    }
}

/// The ticket roster of the first count. The ungrouped candidates are left out.
pub fn ticket_roster(first_count: &[SenateTally]) -> Vec<TicketRoster> {
    group_runs(first_count, |r| r.ticket.clone())
        .into_iter()
        .filter(|(ticket, _)| !ticket.is_empty())
        .map(|(ticket, rows)| TicketRoster {
            id: ticket,
            ticket: rows[0].ticket_name.clone(),
            candidates: rows.iter().map(senate_candidate).collect(),
        })
        .collect()
}

fn transfer_event(
    count: u32,
    rows: &[SenateTally],
    papers: &PaperAccumulator,
) -> Option<SenateTransfer> {
    let source = rows.iter().find(|r| r.papers < 0)?;
    debug!(
        "state {}: count {}: papers leave {}",
        source.state, count, source.display_name
    );
    Some(SenateTransfer {
        after: count.saturating_sub(1),
        from: TransferSource {
            candidate: senate_candidate(source),
            papers: papers.get(source.position),
        },
        transfer_value: source.transfer_value,
        votes: group_runs(rows, |r| r.ticket.clone())
            .into_iter()
            .map(|(ticket, ticket_rows)| TransferTicket {
                id: ticket,
                ticket: ticket_rows[0].ticket_name.clone(),
                candidates: ticket_rows
                    .iter()
                    .map(|r| TransferCandidate {
                        candidate: senate_candidate(r),
                        papers: r.papers,
                        votes: r.transferred,
                        transfer_value: r.transfer_value,
                    })
                    .collect(),
            })
            .collect(),
    })
}

fn count_event(count: u32, rows: &[SenateTally], papers: &mut PaperAccumulator) -> SenateCount {
    let mut votes: Vec<CountTicket> = Vec::new();
    for (ticket, ticket_rows) in group_runs(rows, |r| r.ticket.clone()) {
        let candidates = ticket_rows
            .iter()
            .map(|r| CountCandidate {
                candidate: senate_candidate(r),
                papers: papers.add_and_get(r.position, r.papers),
                votes: r.total_votes,
            })
            .collect();
        votes.push(CountTicket { ticket, candidates });
    }
    SenateCount { count, votes }
}

fn elected_event(row: &SenateTally, quota: i64, papers: &PaperAccumulator) -> DopResult<SenateElected> {
    let held = papers.get(row.position);
    if held == 0 {
        return Err(DopError::ElectedWithoutPapers {
            state: row.state.clone(),
            count: row.count,
            candidate: row.display_name.clone(),
        });
    }
    let surplus = row.total_votes - quota;
    Ok(SenateElected {
        candidate: senate_candidate(row),
        order: row.order,
        papers: held,
        votes: row.total_votes,
        quota,
        surplus,
        transfer_value: surplus as f64 / held as f64,
    })
}

/// Builds the timeline of one state. All the rows must belong to that state.
pub fn convert_state(rows: &[SenateTally]) -> DopResult<SenateState> {
    let first = rows.first().ok_or_else(|| DopError::StructuralViolation {
        message: "no rows for the state".to_string(),
    })?;
    let state = first.state.clone();
    let quota = first.quota;

    let counts = group_runs(rows, |r| r.count);
    let tickets = ticket_roster(counts[0].1);
    info!(
        "state {}: {} counts, {} tickets, {} vacancies",
        state,
        counts.len(),
        tickets.len(),
        first.vacancies
    );

    let mut papers = PaperAccumulator::new();
    let mut events: Vec<SenateEvent> = Vec::new();
    for (idx, (count, count_rows)) in counts.iter().enumerate() {
        if idx > 0 {
            if let Some(transfer) = transfer_event(*count, count_rows, &papers) {
                events.push(SenateEvent::Transfer(transfer));
            }
        }

        events.push(SenateEvent::Count(count_event(*count, count_rows, &mut papers)));

        let mut elected: Vec<&SenateTally> = count_rows
            .iter()
            .filter(|r| r.changed && r.status == CandidateStatus::Elected)
            .collect();
        elected.sort_by_key(|r| r.order);
        for r in elected {
            debug!("state {}: count {}: {} elected", state, count, r.display_name);
            events.push(SenateEvent::Elected(elected_event(r, quota, &papers)?));
        }

        for r in count_rows
            .iter()
            .filter(|r| r.changed && r.status == CandidateStatus::Excluded)
        {
            debug!("state {}: count {}: {} excluded", state, count, r.display_name);
            events.push(SenateEvent::Excluded(SenateExcluded {
                candidate: senate_candidate(r),
                papers: papers.get(r.position),
                votes: r.total_votes,
            }));
        }
    }

    Ok(SenateState {
        state,
        vacancies: first.vacancies,
        papers: first.total_papers,
        quota,
        tickets,
        events,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init_logs() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    struct Row {
        count: u32,
        position: u32,
        ticket: &'static str,
        papers: i64,
        total_votes: i64,
        status: CandidateStatus,
        changed: bool,
        order: u32,
    }

    fn row(count: u32, position: u32, ticket: &'static str, papers: i64, total_votes: i64) -> Row {
        Row {
            count,
            position,
            ticket,
            papers,
            total_votes,
            status: CandidateStatus::Continuing(String::new()),
            changed: false,
            order: 0,
        }
    }

    impl Row {
        fn elected(mut self, order: u32) -> Row {
            self.status = CandidateStatus::Elected;
            self.changed = true;
            self.order = order;
            self
        }

        fn excluded(mut self) -> Row {
            self.status = CandidateStatus::Excluded;
            self.changed = true;
            self
        }

        fn tally(&self) -> SenateTally {
            let surname = format!("CAND{}", self.position);
            let ticket_name = if self.ticket.is_empty() {
                String::new()
            } else {
                format!("Party {}", self.ticket)
            };
            SenateTally {
                state: "TAS".to_string(),
                vacancies: 2,
                total_papers: 300,
                quota: 101,
                count: self.count,
                position: self.position,
                ticket: self.ticket.to_string(),
                ticket_name: ticket_name.clone(),
                surname: surname.clone(),
                given_name: String::new(),
                name: surname.clone(),
                display_name: crate::normalize::display_name("", &surname, &ticket_name),
                papers: self.papers,
                transferred: self.papers,
                total_votes: self.total_votes,
                transfer_value: if self.papers < 0 { 0.25 } else { 1.0 },
                status: self.status.clone(),
                changed: self.changed,
                order: self.order,
                comment: String::new(),
            }
        }
    }

    fn tallies(rows: Vec<Row>) -> Vec<SenateTally> {
        rows.iter().map(|r| r.tally()).collect()
    }

    fn event_types(s: &SenateState) -> Vec<&'static str> {
        s.events
            .iter()
            .map(|e| match e {
                SenateEvent::Transfer(_) => "transfer",
                SenateEvent::Count(_) => "count",
                SenateEvent::Elected(_) => "elected",
                SenateEvent::Excluded(_) => "excluded",
            })
            .collect()
    }

    #[test]
    fn accumulator() {
        let mut acc = PaperAccumulator::new();
        assert_eq!(acc.get(3), 0);
        assert_eq!(acc.add_and_get(3, 10), 10);
        assert_eq!(acc.add_and_get(3, 5), 15);
        assert_eq!(acc.add_and_get(3, 0), 15);
        assert_eq!(acc.get(3), 15);
        assert_eq!(acc.add_and_get(4, -2), -2);
    }

    #[test]
    fn roster_skips_ungrouped() {
        let s = convert_state(&tallies(vec![
            row(1, 1, "A", 10, 10),
            row(1, 2, "A", 10, 10),
            row(1, 3, "B", 10, 10),
            row(1, 4, "B", 10, 10),
            row(1, 5, "B", 10, 10),
            row(1, 6, "", 10, 10),
        ]))
        .unwrap();
        assert_eq!(s.tickets.len(), 2);
        assert_eq!(s.tickets[0].id, "A");
        assert_eq!(s.tickets[0].ticket, "Party A");
        assert_eq!(s.tickets[0].candidates.len(), 2);
        assert_eq!(s.tickets[1].candidates.len(), 3);
        assert_eq!(s.tickets[1].candidates[0].display_name, "CAND3 (Party B)");
        // The ungrouped ticket still shows up in the counts.
        match &s.events[0] {
            SenateEvent::Count(c) => assert_eq!(c.votes.len(), 3),
            e => panic!("unexpected event {:?}", e),
        }
    }

    fn three_counts() -> Vec<SenateTally> {
        tallies(vec![
            row(1, 1, "A", 120, 120).elected(1),
            row(1, 2, "A", 60, 60),
            row(1, 3, "B", 70, 70),
            row(1, 4, "", 50, 50),
            // Surplus of 1: 19 transfers at 0.25.
            row(2, 1, "A", -120, 101),
            row(2, 2, "A", 40, 70),
            row(2, 3, "B", 40, 80),
            row(2, 4, "", 40, 55).excluded(),
            row(3, 1, "A", 0, 101),
            row(3, 2, "A", 30, 105).elected(2),
            row(3, 3, "B", 50, 110).elected(1),
            row(3, 4, "", -80, 0),
        ])
    }

    #[test]
    fn event_sequence() {
        init_logs();
        let s = convert_state(&three_counts()).unwrap();
        assert_eq!(
            event_types(&s),
            vec![
                "count", "elected", "transfer", "count", "excluded", "transfer", "count",
                "elected", "elected"
            ]
        );
        assert_eq!(s.state, "TAS");
        assert_eq!(s.vacancies, 2);
        assert_eq!(s.papers, 300);
        assert_eq!(s.quota, 101);
    }

    #[test]
    fn elected_surplus_and_transfer_value() {
        let s = convert_state(&three_counts()).unwrap();
        match &s.events[1] {
            SenateEvent::Elected(e) => {
                assert_eq!(e.candidate.position, 1);
                assert_eq!(e.papers, 120);
                assert_eq!(e.surplus, 19);
                assert_eq!(e.transfer_value, 19.0 / 120.0);
            }
            e => panic!("unexpected event {:?}", e),
        }
        match &s.events[8] {
            SenateEvent::Elected(e) => {
                assert_eq!(e.candidate.position, 2);
                // 60 + 40 + 30
                assert_eq!(e.papers, 130);
                assert_eq!(e.surplus, 4);
                assert_eq!(e.transfer_value, 4.0 / 130.0);
            }
            e => panic!("unexpected event {:?}", e),
        }
    }

    #[test]
    fn simultaneous_elections_follow_order() {
        let s = convert_state(&three_counts()).unwrap();
        let positions: Vec<u32> = s
            .events
            .iter()
            .skip(7)
            .map(|e| match e {
                SenateEvent::Elected(e) => e.candidate.position,
                e => panic!("unexpected event {:?}", e),
            })
            .collect();
        // Position 3 has order 1 even though it comes after position 2 in the file.
        assert_eq!(positions, vec![3, 2]);
    }

    #[test]
    fn transfers_and_running_papers() {
        init_logs();
        let s = convert_state(&three_counts()).unwrap();
        match &s.events[2] {
            SenateEvent::Transfer(t) => {
                assert_eq!(t.after, 1);
                assert_eq!(t.from.candidate.position, 1);
                // Papers held before leaving.
                assert_eq!(t.from.papers, 120);
                assert_eq!(t.transfer_value, 0.25);
                let ids: Vec<&str> = t.votes.iter().map(|v| v.id.as_str()).collect();
                assert_eq!(ids, vec!["A", "B", ""]);
                assert_eq!(t.votes[0].candidates[0].papers, -120);
            }
            e => panic!("unexpected event {:?}", e),
        }
        match &s.events[3] {
            SenateEvent::Count(c) => {
                let papers: Vec<i64> = c
                    .votes
                    .iter()
                    .flat_map(|t| t.candidates.iter().map(|c| c.papers))
                    .collect();
                assert_eq!(papers, vec![0, 100, 110, 90]);
                assert_eq!(c.votes[0].ticket, "A");
            }
            e => panic!("unexpected event {:?}", e),
        }
        match &s.events[4] {
            SenateEvent::Excluded(e) => {
                assert_eq!(e.candidate.position, 4);
                assert_eq!(e.papers, 90);
                assert_eq!(e.votes, 55);
            }
            e => panic!("unexpected event {:?}", e),
        }
        match &s.events[5] {
            SenateEvent::Transfer(t) => {
                assert_eq!(t.after, 2);
                assert_eq!(t.from.papers, 90);
            }
            e => panic!("unexpected event {:?}", e),
        }
    }

    #[test]
    fn no_transfer_without_negative_papers() {
        let s = convert_state(&tallies(vec![
            row(1, 1, "A", 10, 10),
            row(2, 1, "A", 5, 15),
        ]))
        .unwrap();
        assert_eq!(event_types(&s), vec!["count", "count"]);
    }

    #[test]
    fn elected_without_papers() {
        init_logs();
        let res = convert_state(&tallies(vec![row(1, 1, "A", 0, 0).elected(1)]));
        assert_eq!(
            res,
            Err(DopError::ElectedWithoutPapers {
                state: "TAS".to_string(),
                count: 1,
                candidate: "CAND1 (Party A)".to_string(),
            })
        );
    }

    #[test]
    fn empty_state() {
        assert!(matches!(
            convert_state(&[]),
            Err(DopError::StructuralViolation { .. })
        ));
    }

    #[test]
    fn json_shape() {
        let s = convert_state(&three_counts()).unwrap();
        let js = serde_json::to_value(&s).unwrap();
        assert_eq!(js["events"][0]["type"], "count");
        assert_eq!(js["events"][0]["votes"][0]["ticket"], "A");
        assert_eq!(js["events"][1]["type"], "elected");
        assert_eq!(js["events"][1]["displayName"], "CAND1 (Party A)");
        assert_eq!(js["events"][1]["quota"], 101);
        assert_eq!(js["events"][2]["from"]["papers"], 120);
        assert_eq!(js["events"][2]["votes"][0]["id"], "A");
        assert_eq!(js["events"][2]["votes"][0]["candidates"][0]["transferValue"], 0.25);
        assert_eq!(js["tickets"][0]["id"], "A");
    }
}
