use std::collections::HashMap;
use std::io::Read;

use crate::dop::io_common::{open_file, read_rows};
use crate::dop::*;

/// Ticket names, keyed by state then by ticket code.
pub type TicketRegistry = HashMap<String, HashMap<String, String>>;

pub fn read_tickets(path: &str) -> ConvertResult<TicketRegistry> {
    info!("Attempting to read ticket registry {:?}", path);
    let contents = fs::read_to_string(path).context(OpeningFileSnafu { path })?;
    let registry: TicketRegistry =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })?;
    debug!("ticket registry: {} states", registry.len());
    Ok(registry)
}

pub fn read_senate_csv<R: Read, T: TicketNames + ?Sized>(
    reader: R,
    path: &str,
    registry: &T,
) -> ConvertResult<Vec<SenateTally>> {
    read_rows(reader, path, |fields| parse_senate_row(fields, registry))
}

pub fn read_senate_file<T: TicketNames + ?Sized>(
    path: &str,
    registry: &T,
) -> ConvertResult<Vec<SenateTally>> {
    info!("Attempting to read Senate file {:?}", path);
    read_senate_csv(open_file(path)?, path, registry)
}
