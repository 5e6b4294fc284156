use clap::{Parser, Subcommand};

/// This is a converter of distribution of preferences tallies into event timelines.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) A JSON job file describing the conversions to run.
    /// Paths in this file are relative to the file itself. Options given on the
    /// command line override the ones in the job file.
    #[clap(short, long, value_parser, global = true)]
    pub config: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false, global = true)]
    pub verbose: bool,

    #[clap(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Converts the House distribution of preferences (one file for all the divisions).
    House(HouseArgs),
    /// Converts the Senate distributions of preferences (one file per state).
    Senate(SenateArgs),
}

#[derive(clap::Args, Debug, Clone, Default)]
pub struct HouseArgs {
    /// (file path) The CSV file with the distribution of preferences of all the divisions.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (file path or 'stdout', default house.json) Where the JSON timeline is written.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) A reference JSON output. If provided, the converted output must match it.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// Indents the JSON output.
    #[clap(long, takes_value = false)]
    pub pretty: bool,
}

#[derive(clap::Args, Debug, Clone, Default)]
pub struct SenateArgs {
    /// (file path, repeated) The CSV files, one per state, in the order they should appear.
    #[clap(short, long, value_parser)]
    pub input: Vec<String>,

    /// (file path) The JSON registry of ticket names, keyed by state then by ticket code.
    #[clap(short, long, value_parser)]
    pub tickets: Option<String>,

    /// (file path or 'stdout', default senate.json) Where the JSON timeline is written.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) A reference JSON output. If provided, the converted output must match it.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// Indents the JSON output.
    #[clap(long, takes_value = false)]
    pub pretty: bool,
}
