use log::{debug, info, warn};

use poll_tabulation::*;
use snafu::{prelude::*, Snafu};

use std::fs;

use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;

#[derive(Debug, Snafu)]
pub enum CliError {
    #[snafu(display("Error opening snapshot file {path}"))]
    OpeningSnapshot {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing snapshot file"))]
    ParsingSnapshot { source: serde_json::Error },
    #[snafu(display("Invalid poll definition: {source}"))]
    InvalidPoll { source: PollError },
    #[snafu(display("Error serializing the summary"))]
    SerializingSummary { source: serde_json::Error },
    #[snafu(display("Error writing summary to {path}"))]
    WritingSummary {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error opening reference file {path}"))]
    OpeningReference {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing reference file"))]
    ParsingReference { source: serde_json::Error },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

type CliResult<T> = Result<T, CliError>;

/// An on-disk poll snapshot: the poll definition and the ballots cast for
/// it, as provided by whatever layer stores the polls.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub poll: PollDefinition,
    #[serde(default)]
    pub ballots: Vec<Ballot>,
}

fn read_snapshot(path: &str) -> CliResult<Snapshot> {
    let contents = fs::read_to_string(path).context(OpeningSnapshotSnafu { path })?;
    let snapshot: Snapshot = serde_json::from_str(&contents).context(ParsingSnapshotSnafu {})?;
    Ok(snapshot)
}

fn read_reference(path: &str) -> CliResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningReferenceSnafu { path })?;
    let js: JSValue = serde_json::from_str(&contents).context(ParsingReferenceSnafu {})?;
    Ok(js)
}

/// Validates the snapshot and runs the tabulation on the ballots that
/// belong to the poll.
///
/// Ballots carrying another poll's id are a provisioning bug upstream of
/// this program; they are dropped with a warning rather than failing the
/// whole run.
fn tabulate_snapshot(snapshot: &Snapshot) -> CliResult<TabulationResult> {
    validate_poll(&snapshot.poll).context(InvalidPollSnafu {})?;

    let (own, foreign): (Vec<&Ballot>, Vec<&Ballot>) = snapshot
        .ballots
        .iter()
        .partition(|ballot| ballot.poll_id == snapshot.poll.id);
    if !foreign.is_empty() {
        warn!(
            "Dropping {} ballots that do not belong to poll {:?}",
            foreign.len(),
            snapshot.poll.id
        );
    }
    let ballots: Vec<Ballot> = own.into_iter().cloned().collect();

    Ok(tabulate(&snapshot.poll, &ballots))
}

fn write_summary(out: &Option<String>, pretty_js: &str) -> CliResult<()> {
    match out.as_deref() {
        None | Some("stdout") | Some("") => {
            println!("{}", pretty_js);
        }
        Some(path) => {
            info!("Writing summary to {}", path);
            fs::write(path, pretty_js).context(WritingSummarySnafu { path })?;
        }
    }
    Ok(())
}

pub fn run_tabulation(args: &Args) -> CliResult<()> {
    let snapshot = read_snapshot(&args.input)?;
    info!(
        "snapshot: poll {:?} ({:?}) with {} ballots",
        snapshot.poll.id,
        snapshot.poll.title,
        snapshot.ballots.len()
    );

    let result = tabulate_snapshot(&snapshot)?;
    debug!("result: {:?}", result);

    let pretty_js_stats =
        serde_json::to_string_pretty(&result).context(SerializingSummarySnafu {})?;
    write_summary(&args.out, &pretty_js_stats)?;

    // The reference summary, if provided for comparison
    if let Some(summary_p) = &args.reference {
        let summary_ref = read_reference(summary_p)?;
        let pretty_js_summary_ref =
            serde_json::to_string_pretty(&summary_ref).context(SerializingSummarySnafu {})?;
        if pretty_js_summary_ref != pretty_js_stats {
            warn!("Found differences with the reference summary");
            print_diff(
                pretty_js_summary_ref.as_str(),
                pretty_js_stats.as_ref(),
                "\n",
            );
            whatever!("Difference detected between calculated summary and reference summary")
        }
    }

    Ok(())
}
