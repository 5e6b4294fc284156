use log::{debug, info, warn};

use dop_events::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::Path;

use serde::Serialize;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::*;
use crate::dop::config_reader::*;

pub mod config_reader;
mod io_common;
mod io_house;
mod io_senate;

use io_house::read_house_file;
use io_senate::{read_senate_file, read_tickets};

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ConvertError {
    #[snafu(display("Error opening file {path}"))]
    OpeningFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error reading CSV file {path}"))]
    CsvLineParse { source: csv::Error, path: String },
    #[snafu(display("{path}, line {lineno}: {source}"))]
    CsvRow {
        source: DopError,
        path: String,
        lineno: u64,
    },
    #[snafu(display("Error converting {path}: {source}"))]
    Conversion { source: DopError, path: String },
    #[snafu(display("Error parsing JSON file {path}"))]
    ParsingJson {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Error serializing the output"))]
    SerializingJson { source: serde_json::Error },
    #[snafu(display("Error writing file {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("The job file {path} has no parent directory"))]
    MissingParentDir { path: String },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type ConvertResult<T> = Result<T, ConvertError>;

const STDOUT: &str = "stdout";

/// A fully resolved House conversion.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct HouseJob {
    pub input: String,
    pub output: String,
    pub reference: Option<String>,
    pub pretty: bool,
}

/// A fully resolved Senate conversion.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct SenateJob {
    pub inputs: Vec<String>,
    pub tickets: String,
    pub output: String,
    pub reference: Option<String>,
    pub pretty: bool,
}

/// Merges the command line with the job file. The command line wins.
pub fn house_job(args: &HouseArgs, config: Option<&ConvertConfig>) -> ConvertResult<HouseJob> {
    let settings = config.and_then(|c| c.house.as_ref());
    let input = match (&args.input, settings) {
        (Some(input), _) => input.clone(),
        (None, Some(s)) => s.input.clone(),
        (None, None) => whatever!("No House input file: use --input or a job file"),
    };
    Ok(HouseJob {
        input,
        output: args
            .out
            .clone()
            .or_else(|| settings.and_then(|s| s.output.clone()))
            .unwrap_or_else(|| "house.json".to_string()),
        reference: args
            .reference
            .clone()
            .or_else(|| settings.and_then(|s| s.reference.clone())),
        pretty: args.pretty || config.and_then(|c| c.pretty_print).unwrap_or(false),
    })
}

/// Merges the command line with the job file. The command line wins.
pub fn senate_job(args: &SenateArgs, config: Option<&ConvertConfig>) -> ConvertResult<SenateJob> {
    let settings = config.and_then(|c| c.senate.as_ref());
    let inputs = match (args.input.is_empty(), settings) {
        (false, _) => args.input.clone(),
        (true, Some(s)) if !s.inputs.is_empty() => s.inputs.clone(),
        _ => whatever!("No Senate input file: use --input or a job file"),
    };
    let tickets = match (&args.tickets, settings) {
        (Some(t), _) => t.clone(),
        (None, Some(s)) => s.tickets.clone(),
        (None, None) => whatever!("No ticket registry: use --tickets or a job file"),
    };
    Ok(SenateJob {
        inputs,
        tickets,
        output: args
            .out
            .clone()
            .or_else(|| settings.and_then(|s| s.output.clone()))
            .unwrap_or_else(|| "senate.json".to_string()),
        reference: args
            .reference
            .clone()
            .or_else(|| settings.and_then(|s| s.reference.clone())),
        pretty: args.pretty || config.and_then(|c| c.pretty_print).unwrap_or(false),
    })
}

pub fn convert_house_file(path: &str) -> ConvertResult<Vec<HouseDivision>> {
    let rows = read_house_file(path)?;
    house::convert_house(&rows).context(ConversionSnafu { path })
}

/// Converts one Senate file. A file normally holds a single state.
pub fn convert_senate_file<T: TicketNames + ?Sized>(
    path: &str,
    registry: &T,
) -> ConvertResult<Vec<SenateState>> {
    let rows = read_senate_file(path, registry)?;
    let mut res: Vec<SenateState> = Vec::new();
    for (state, state_rows) in grouping::group_runs(&rows, |r| r.state.clone()) {
        debug!("{}: converting state {}", path, state);
        res.push(senate::convert_state(state_rows).context(ConversionSnafu { path })?);
    }
    if res.is_empty() {
        whatever!("{} has no data rows", path)
    }
    Ok(res)
}

fn to_json<T: Serialize>(data: &T, pretty: bool) -> ConvertResult<String> {
    if pretty {
        serde_json::to_string_pretty(data).context(SerializingJsonSnafu {})
    } else {
        serde_json::to_string(data).context(SerializingJsonSnafu {})
    }
}

/// Writes the document next to its destination first, then moves it in place,
/// so that a failed run never leaves a truncated file behind.
fn write_output(contents: &str, path: &str) -> ConvertResult<()> {
    if path == STDOUT {
        println!("{}", contents);
        return Ok(());
    }
    let tmp_path = format!("{}.tmp", path);
    fs::write(&tmp_path, contents).context(WritingOutputSnafu {
        path: tmp_path.clone(),
    })?;
    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e).context(WritingOutputSnafu { path });
    }
    info!("Wrote {}", path);
    Ok(())
}

/// Compares the output with a reference document, printing the differences.
fn check_reference<T: Serialize>(data: &T, reference_path: &str) -> ConvertResult<()> {
    let reference = read_reference(reference_path)?;
    let pretty_reference = serde_json::to_string_pretty(&reference).context(SerializingJsonSnafu {})?;
    let computed: JSValue = serde_json::to_value(data).context(SerializingJsonSnafu {})?;
    let pretty_computed = serde_json::to_string_pretty(&computed).context(SerializingJsonSnafu {})?;
    if pretty_reference != pretty_computed {
        warn!("Found differences with the reference {}", reference_path);
        print_diff(pretty_reference.as_str(), pretty_computed.as_str(), "\n");
        whatever!("Difference detected between the converted output and the reference {}", reference_path)
    }
    info!("Output matches the reference {}", reference_path);
    Ok(())
}

fn finish<T: Serialize>(
    data: &T,
    output: &str,
    reference: &Option<String>,
    pretty: bool,
) -> ConvertResult<()> {
    if let Some(reference_path) = reference {
        check_reference(data, reference_path)?;
    }
    let contents = to_json(data, pretty)?;
    write_output(&contents, output)
}

pub fn run_house(job: &HouseJob) -> ConvertResult<()> {
    info!("Converting House file {}", job.input);
    let divisions = convert_house_file(&job.input)?;
    finish(&divisions, &job.output, &job.reference, job.pretty)
}

pub fn run_senate(job: &SenateJob) -> ConvertResult<()> {
    let registry = read_tickets(&job.tickets)?;
    let mut states: Vec<SenateState> = Vec::new();
    for input in job.inputs.iter() {
        info!("Converting Senate file {}", input);
        states.extend(convert_senate_file(input, &registry)?);
    }
    info!("Converted {} states", states.len());
    finish(&states, &job.output, &job.reference, job.pretty)
}

pub fn run(args: &Args) -> ConvertResult<()> {
    let config = match &args.config {
        Some(path) => Some(read_config(Path::new(path))?),
        None => None,
    };
    debug!("config: {:?}", config);

    match (&args.command, &config) {
        (Some(Command::House(house_args)), _) => run_house(&house_job(house_args, config.as_ref())?),
        (Some(Command::Senate(senate_args)), _) => {
            run_senate(&senate_job(senate_args, config.as_ref())?)
        }
        (None, Some(c)) => {
            if c.house.is_none() && c.senate.is_none() {
                whatever!("The job file describes no conversion")
            }
            if c.house.is_some() {
                run_house(&house_job(&HouseArgs::default(), Some(c))?)?;
            }
            if c.senate.is_some() {
                run_senate(&senate_job(&SenateArgs::default(), Some(c))?)?;
            }
            Ok(())
        }
        (None, None) => whatever!("Nothing to do: pass a subcommand or a job file with --config"),
    }
}
