// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

/// The quantity carried by one row of the House distribution of preferences.
///
/// Every candidate at every count is described by four rows, one for each
/// variant.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum CalcType {
    PreferenceCount,
    PreferencePercent,
    TransferCount,
    TransferPercent,
}

impl CalcType {
    pub fn parse(s: &str) -> Option<CalcType> {
        match s.trim() {
            "Preference Count" => Some(CalcType::PreferenceCount),
            "Preference Percent" => Some(CalcType::PreferencePercent),
            "Transfer Count" => Some(CalcType::TransferCount),
            "Transfer Percent" => Some(CalcType::TransferPercent),
            _ => None,
        }
    }
}

/// One row of the House distribution of preferences.
#[derive(PartialEq, Debug, Clone)]
pub struct HouseTally {
    pub state: String,
    pub division_id: u32,
    pub division_name: String,
    pub count: u32,
    pub position: u32,
    pub candidate: u32,
    pub surname: String,
    pub given_name: String,
    /// "given surname"
    pub name: String,
    /// "surname, given (party)"
    pub display_name: String,
    pub party_abr: String,
    pub party: String,
    pub elected: bool,
    pub historic_elected: bool,
    pub calc_type: CalcType,
    pub calc_value: f64,
}

/// Status of a Senate candidate at a given count.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum CandidateStatus {
    Elected,
    Excluded,
    /// Still in the count. Carries the raw text, which is often empty.
    Continuing(String),
}

impl CandidateStatus {
    pub fn parse(s: &str) -> CandidateStatus {
        match s.trim() {
            "Elected" => CandidateStatus::Elected,
            "Excluded" => CandidateStatus::Excluded,
            other => CandidateStatus::Continuing(other.to_string()),
        }
    }
}

/// One row of a Senate state distribution of preferences.
#[derive(PartialEq, Debug, Clone)]
pub struct SenateTally {
    pub state: String,
    pub vacancies: u32,
    pub total_papers: i64,
    pub quota: i64,
    pub count: u32,
    pub position: u32,
    /// Ticket code, empty for ungrouped candidates and the exhausted/gain-loss rows.
    pub ticket: String,
    pub ticket_name: String,
    pub surname: String,
    pub given_name: String,
    pub name: String,
    pub display_name: String,
    /// Papers received at this count. Negative when the papers leave the candidate.
    pub papers: i64,
    pub transferred: i64,
    pub total_votes: i64,
    pub transfer_value: f64,
    pub status: CandidateStatus,
    /// Set on the count at which `status` changed.
    pub changed: bool,
    pub order: u32,
    pub comment: String,
}

/// Errors that prevent a conversion from completing.
///
/// None of them is recoverable: they all point at an input file that does not
/// have the expected shape.
#[derive(PartialEq, Debug, Clone)]
pub enum DopError {
    /// A field could not be coerced to the expected type.
    MalformedInput {
        field: &'static str,
        value: String,
    },
    /// A row does not have the number of fields of its schema.
    FieldCount { expected: usize, found: usize },
    /// No candidate carries the -100% transfer marker on a count after the first.
    MissingExclusion { division: String, count: u32 },
    /// The ticket registry has no name for this ticket code.
    UnknownTicket { state: String, ticket: String },
    /// A candidate is declared elected while holding no paper, so no
    /// transfer value can be derived.
    ElectedWithoutPapers {
        state: String,
        count: u32,
        candidate: String,
    },
    /// The rows do not group the way the published files do.
    StructuralViolation { message: String },
}

pub type DopResult<T> = Result<T, DopError>;

impl Error for DopError {}

impl Display for DopError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DopError::MalformedInput { field, value } => {
                write!(f, "could not read field {}: {:?}", field, value)
            }
            DopError::FieldCount { expected, found } => {
                write!(f, "expected {} fields, found {}", expected, found)
            }
            DopError::MissingExclusion { division, count } => write!(
                f,
                "division {}: no excluded candidate found at count {}",
                division, count
            ),
            DopError::UnknownTicket { state, ticket } => {
                write!(f, "state {}: unknown ticket {:?}", state, ticket)
            }
            DopError::ElectedWithoutPapers {
                state,
                count,
                candidate,
            } => write!(
                f,
                "state {}: {} elected at count {} without holding any paper",
                state, candidate, count
            ),
            DopError::StructuralViolation { message } => write!(f, "{}", message),
        }
    }
}
