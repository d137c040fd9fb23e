use clap::Parser;

/// A judging booth for contests where each category gets a 1st, 2nd and 3rd place.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path) The JSON file describing the contest: the judges, where to read the entries
    /// and where to store the votes. Relative paths in this file are resolved against its directory.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// The ID of the judge.
    #[clap(short, long, value_parser)]
    pub judge: Option<String>,

    /// The access code of the judge.
    #[clap(short, long, value_parser)]
    pub access_code: Option<String>,

    /// (category name or ID, optional) The category to open. Without it, the categories are listed
    /// with their status.
    #[clap(long, value_parser)]
    pub category: Option<String>,

    /// (ENTRY=PLACE, repeatable) Gives PLACE (1, 2 or 3) to the entry ENTRY of the open category.
    /// Giving an entry the place it already holds takes the place back.
    #[clap(long = "vote", value_parser)]
    pub votes: Vec<String>,

    /// If passed, submits the ballot of the open category once the three places are given.
    #[clap(long, takes_value = false)]
    pub submit: bool,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
