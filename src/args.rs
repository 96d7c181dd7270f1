use clap::Parser;

/// This is a ranked-choice poll tabulation program.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path) The poll snapshot to tabulate, in JSON format: the poll
    /// definition and the ballots cast for it. For more information about
    /// the file format, read the documentation of the poll_tabulation crate.
    #[clap(short, long, value_parser)]
    pub input: String,

    /// (file path) A reference summary in JSON format. If provided, rankedpoll
    /// will check that the tabulated output matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the summary of the poll
    /// will be written in JSON format to the given location instead of the
    /// standard output.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard
    /// output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
