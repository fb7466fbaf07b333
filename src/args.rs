use clap::Parser;

/// Tabulates an election with the majority or the Schulze method.
#[derive(Parser, Debug, Clone, Default)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) The JSON file describing the election: sources of ballots, candidates and
    /// method. Paths inside are relative to the directory of this file.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path) A reference summary in JSON format. If provided, voteit checks that the tabulated
    /// summary matches it and prints the differences otherwise.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (file path, 'stdout' or empty) Where to write the summary of the election in JSON format.
    /// Overrides the output directory of the configuration.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path or empty) The file with the ballots. Overrides the sources of the configuration.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (default csv) The type of the input: csv or msforms.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// (default schulze) The voting method: majority or schulze.
    #[clap(short, long, value_parser)]
    pub method: Option<String>,

    /// (repeatable) The candidates, in presentation order. When neither this option nor the
    /// configuration lists them, the names found in the ballots are used.
    #[clap(long, value_parser)]
    pub candidates: Option<Vec<String>>,

    /// When using an Excel file, the name of the worksheet to use. Defaults to the first one.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
