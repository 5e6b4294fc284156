// ******** Output data structures *********

use serde::Serialize;

// ---- House ----

/// Snapshot of a House candidate, as repeated in every event.
#[derive(PartialEq, Debug, Clone, Serialize)]
pub struct CandidateInfo {
    pub id: u32,
    pub name: String,
    #[serde(rename = "displayName")]
    pub display_name: String,
    pub party: String,
    pub position: u32,
}

#[derive(PartialEq, Debug, Clone, Serialize)]
pub struct CandidatePreferences {
    #[serde(flatten)]
    pub candidate: CandidateInfo,
    #[serde(rename = "preferencesTotal")]
    pub preferences_total: i64,
    #[serde(rename = "preferencesPercentage")]
    pub preferences_percentage: f64,
}

#[derive(PartialEq, Debug, Clone, Serialize)]
pub struct CandidateTransfer {
    #[serde(flatten)]
    pub candidate: CandidateInfo,
    #[serde(rename = "transferredTotal")]
    pub transferred_total: i64,
    #[serde(rename = "transferredPercentage")]
    pub transferred_percentage: f64,
}

/// How the seat was decided, as far as the first preferences tell.
#[derive(PartialEq, Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum Method {
    #[serde(rename = "firstPreferences")]
    FirstPreferences { elected: CandidatePreferences },
    #[serde(rename = "twoCandidatePreferred")]
    TwoCandidatePreferred {
        candidates: Vec<CandidatePreferences>,
    },
    #[serde(rename = "fullCount")]
    FullCount,
}

#[derive(PartialEq, Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum HouseEvent {
    /// The papers of `from` are distributed to the remaining candidates.
    #[serde(rename = "transfer")]
    Transfer {
        from: CandidateInfo,
        candidates: Vec<CandidateTransfer>,
    },
    #[serde(rename = "count")]
    Count {
        count: u32,
        candidates: Vec<CandidatePreferences>,
    },
    #[serde(rename = "elected")]
    Elected { elected: CandidatePreferences },
    #[serde(rename = "twoCandidatePreferred")]
    TwoCandidatePreferred {
        candidates: Vec<CandidatePreferences>,
    },
}

/// The complete timeline of one House division.
#[derive(PartialEq, Debug, Clone, Serialize)]
pub struct HouseDivision {
    pub division: String,
    pub candidates: Vec<CandidateInfo>,
    pub elected: CandidatePreferences,
    pub method: Method,
    pub events: Vec<HouseEvent>,
}

// ---- Senate ----

/// Snapshot of a Senate candidate. `ticket` is the ticket name.
#[derive(PartialEq, Debug, Clone, Serialize)]
pub struct SenateCandidate {
    pub name: String,
    #[serde(rename = "displayName")]
    pub display_name: String,
    pub ticket: String,
    pub position: u32,
}

#[derive(PartialEq, Debug, Clone, Serialize)]
pub struct TicketRoster {
    pub id: String,
    pub ticket: String,
    pub candidates: Vec<SenateCandidate>,
}

#[derive(PartialEq, Debug, Clone, Serialize)]
pub struct TransferSource {
    #[serde(flatten)]
    pub candidate: SenateCandidate,
    /// Papers held by the candidate before the transfer.
    pub papers: i64,
}

#[derive(PartialEq, Debug, Clone, Serialize)]
pub struct TransferCandidate {
    #[serde(flatten)]
    pub candidate: SenateCandidate,
    pub papers: i64,
    pub votes: i64,
    #[serde(rename = "transferValue")]
    pub transfer_value: f64,
}

#[derive(PartialEq, Debug, Clone, Serialize)]
pub struct TransferTicket {
    pub id: String,
    pub ticket: String,
    pub candidates: Vec<TransferCandidate>,
}

#[derive(PartialEq, Debug, Clone, Serialize)]
pub struct CountCandidate {
    #[serde(flatten)]
    pub candidate: SenateCandidate,
    /// Running total of the papers held.
    pub papers: i64,
    pub votes: i64,
}

/// `ticket` is the ticket code here, not the name.
#[derive(PartialEq, Debug, Clone, Serialize)]
pub struct CountTicket {
    pub ticket: String,
    pub candidates: Vec<CountCandidate>,
}

#[derive(PartialEq, Debug, Clone, Serialize)]
pub struct SenateTransfer {
    /// The count after which the papers moved.
    pub after: u32,
    pub from: TransferSource,
    #[serde(rename = "transferValue")]
    pub transfer_value: f64,
    pub votes: Vec<TransferTicket>,
}

#[derive(PartialEq, Debug, Clone, Serialize)]
pub struct SenateCount {
    pub count: u32,
    pub votes: Vec<CountTicket>,
}

#[derive(PartialEq, Debug, Clone, Serialize)]
pub struct SenateElected {
    #[serde(flatten)]
    pub candidate: SenateCandidate,
    pub order: u32,
    pub papers: i64,
    pub votes: i64,
    pub quota: i64,
    /// Negative when elected below the quota to fill a remaining vacancy.
    pub surplus: i64,
    #[serde(rename = "transferValue")]
    pub transfer_value: f64,
}

#[derive(PartialEq, Debug, Clone, Serialize)]
pub struct SenateExcluded {
    #[serde(flatten)]
    pub candidate: SenateCandidate,
    pub papers: i64,
    pub votes: i64,
}

#[derive(PartialEq, Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum SenateEvent {
    #[serde(rename = "transfer")]
    Transfer(SenateTransfer),
    #[serde(rename = "count")]
    Count(SenateCount),
    #[serde(rename = "elected")]
    Elected(SenateElected),
    #[serde(rename = "excluded")]
    Excluded(SenateExcluded),
}

/// The complete timeline of one Senate state.
#[derive(PartialEq, Debug, Clone, Serialize)]
pub struct SenateState {
    pub state: String,
    pub vacancies: u32,
    pub papers: i64,
    pub quota: i64,
    pub tickets: Vec<TicketRoster>,
    pub events: Vec<SenateEvent>,
}
