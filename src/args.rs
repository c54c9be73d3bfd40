use clap::{Parser, Subcommand};

/// Reports on the results and the feedback collected by the PakRaaz voting system.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) A JSON configuration file. Options passed on the command line
    /// take precedence over the values of this file.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Ranks the candidates of every city and summarizes the results.
    Results {
        /// (file path) The response of the results endpoint, in JSON format.
        #[clap(short, long, value_parser)]
        input: String,

        /// (text, optional) Only report on the cities whose name contains this text.
        #[clap(long, value_parser)]
        search: Option<String>,

        /// (inputOrder or alphabetical) How to order candidates with the same number of votes.
        #[clap(long, value_parser)]
        tiebreak: Option<String>,

        #[clap(flatten)]
        output: OutputArgs,
    },
    /// Filters the feedback and counts it.
    Feedback {
        /// (file path) The response of the feedback listing endpoint, in JSON format.
        #[clap(short, long, value_parser)]
        input: String,

        /// (all, withID, anonymous or recent) The feedback to list. Unknown values list everything.
        #[clap(long, value_parser)]
        filter: Option<String>,

        #[clap(flatten)]
        output: OutputArgs,
    },
    /// Lists the candidates a voter can vote for.
    Ballot {
        /// (file path) The voter profile, in JSON format.
        #[clap(long, value_parser)]
        profile: String,

        /// (file path) The response of the candidates endpoint, in JSON format.
        #[clap(long, value_parser)]
        candidates: String,

        #[clap(flatten)]
        output: OutputArgs,
    },
    /// Checks a feedback message and prints the body to submit.
    Submit {
        /// (text) The feedback message. Blank messages are rejected.
        #[clap(short, long, value_parser)]
        message: String,

        /// (file path, optional) The voter profile, in JSON format. Without it, the feedback is anonymous.
        #[clap(long, value_parser)]
        profile: Option<String>,

        #[clap(flatten)]
        output: OutputArgs,
    },
}

#[derive(clap::Args, Debug, Clone)]
pub struct OutputArgs {
    /// (file path, 'stdout' or empty) If specified, the report will be written in JSON format to the given
    /// location. Setting this option overrides the path that may be specified in the configuration.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) A reference file containing an expected report in JSON format. If provided, pakraaz will
    /// check that the computed report matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,
}
