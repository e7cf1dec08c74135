use clap::{Parser, ValueEnum};

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
#[clap(rename_all = "snake_case")]
pub enum Action {
    /// Export the responses of every form, one row per judge and candidate.
    ExportAllCandidates,
    /// Create one scoring form per award category.
    CreateAll,
    /// Export the ranking of the candidates of every form.
    ExportRanking,
    /// Print the responses of every form to the standard output.
    Temp,
}

/// Creates award nomination scoring forms, exports the judges' responses and ranks the candidates.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// The action to run.
    #[clap(short, long, value_enum)]
    pub action: Action,

    /// (file path, optional) A JSON file with the award catalogue, the applicants spreadsheet
    /// and the output settings. Environment variables (or a .env file) override its values.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (directory, optional) Where the CSV exports are written. Overrides the configuration.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (optional, repeatable) Only process the given forms instead of all the visible ones.
    #[clap(long, value_parser)]
    pub form_id: Vec<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
