//! Decoding of the raw CSV fields into typed tally rows.

use std::collections::HashMap;
use std::str::FromStr;

use crate::config::*;

pub const HOUSE_FIELDS: usize = 14;
pub const SENATE_FIELDS: usize = 17;

/// A source of human-readable ticket names, keyed by state and ticket code.
pub trait TicketNames {
    fn lookup(&self, state: &str, ticket: &str) -> Option<&str>;
}

impl TicketNames for HashMap<String, HashMap<String, String>> {
    fn lookup(&self, state: &str, ticket: &str) -> Option<&str> {
        self.get(state)
            .and_then(|tickets| tickets.get(ticket))
            .map(|s| s.as_str())
    }
}

/// Resolves a ticket code. The empty code is the ungrouped ticket and has an
/// empty name.
pub fn ticket_name<T: TicketNames + ?Sized>(
    registry: &T,
    state: &str,
    ticket: &str,
) -> DopResult<String> {
    if ticket.is_empty() {
        return Ok(String::new());
    }
    registry
        .lookup(state, ticket)
        .map(|s| s.to_string())
        .ok_or_else(|| DopError::UnknownTicket {
            state: state.to_string(),
            ticket: ticket.to_string(),
        })
}

pub fn full_name(given_name: &str, surname: &str) -> String {
    format!("{} {}", given_name, surname).trim().to_string()
}

/// "surname, given", followed by the party or ticket name in parentheses
/// when there is one.
pub fn display_name(given_name: &str, surname: &str, affiliation: &str) -> String {
    let name = if given_name.is_empty() {
        surname.to_string()
    } else if surname.is_empty() {
        given_name.to_string()
    } else {
        format!("{}, {}", surname, given_name)
    };
    if affiliation.is_empty() {
        name
    } else {
        format!("{} ({})", name, affiliation)
    }
}

fn parse_field<T: FromStr>(field: &'static str, value: &str) -> DopResult<T> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| DopError::MalformedInput {
            field,
            value: value.to_string(),
        })
}

/// Like [`parse_field`], but `NaN` and the infinities are refused.
fn parse_finite(field: &'static str, value: &str) -> DopResult<f64> {
    let x: f64 = parse_field(field, value)?;
    if !x.is_finite() {
        return Err(DopError::MalformedInput {
            field,
            value: value.to_string(),
        });
    }
    Ok(x)
}

fn check_len(fields: &[&str], expected: usize) -> DopResult<()> {
    if fields.len() != expected {
        return Err(DopError::FieldCount {
            expected,
            found: fields.len(),
        });
    }
    Ok(())
}

/// Decodes one row of the House file.
pub fn parse_house_row(fields: &[&str]) -> DopResult<HouseTally> {
    check_len(fields, HOUSE_FIELDS)?;
    let surname = fields[6];
    let given_name = fields[7];
    let party = fields[9];
    let calc_type = CalcType::parse(fields[12]).ok_or_else(|| DopError::MalformedInput {
        field: "calc_type",
        value: fields[12].to_string(),
    })?;
    Ok(HouseTally {
        state: fields[0].to_string(),
        division_id: parse_field("division_id", fields[1])?,
        division_name: fields[2].to_string(),
        count: parse_field("count", fields[3])?,
        position: parse_field("position", fields[4])?,
        candidate: parse_field("candidate", fields[5])?,
        surname: surname.to_string(),
        given_name: given_name.to_string(),
        name: full_name(given_name, surname),
        display_name: display_name(given_name, surname, party),
        party_abr: fields[8].to_string(),
        party: party.to_string(),
        elected: fields[10] == "Y",
        historic_elected: fields[11] == "Y",
        calc_type,
        calc_value: parse_finite("calc_value", fields[13])?,
    })
}

/// Decodes one row of a Senate state file, resolving its ticket name.
pub fn parse_senate_row<T: TicketNames + ?Sized>(
    fields: &[&str],
    registry: &T,
) -> DopResult<SenateTally> {
    check_len(fields, SENATE_FIELDS)?;
    let state = fields[0];
    let ticket = fields[6].trim();
    let ticket_name = ticket_name(registry, state, ticket)?;
    let surname = fields[7];
    let given_name = fields[8];
    Ok(SenateTally {
        state: state.to_string(),
        vacancies: parse_field("vacancies", fields[1])?,
        total_papers: parse_field("total_papers", fields[2])?,
        quota: parse_field("quota", fields[3])?,
        count: parse_field("count", fields[4])?,
        position: parse_field("position", fields[5])?,
        ticket: ticket.to_string(),
        surname: surname.to_string(),
        given_name: given_name.to_string(),
        name: full_name(given_name, surname),
        display_name: display_name(given_name, surname, &ticket_name),
        ticket_name,
        papers: parse_field("papers", fields[9])?,
        transferred: parse_field("transferred", fields[10])?,
        total_votes: parse_field("total_votes", fields[11])?,
        transfer_value: parse_finite("transfer_value", fields[12])?,
        status: CandidateStatus::parse(fields[13]),
        changed: fields[14] == "True",
        order: parse_field("order", fields[15])?,
        comment: fields[16].to_string(),
    })
}
