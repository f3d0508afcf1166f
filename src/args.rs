use clap::Parser;

/// This is a preference ranking program, based on a Markov chain of the pairwise preferences.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) The file containing the survey configuration, in JSON.
    /// For more information about the file format, read the manual of the markov_ranking crate.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,
    /// (file path) A reference file containing the outcome of a ranking in JSON format. If provided,
    /// markovrank will check that the computed output matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the summary of the ranking will be written in JSON
    /// format to the given location. Setting this option overrides the output directory that may be
    /// specified with the --config option.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path or empty) The file containing the rankings of the respondents. Setting this option
    /// overrides the file sources that may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (default csv) The type of the input: csv or xlsx.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// (list of values or not specified) If specified, the headers of the rank columns, in rank order.
    /// By default, the rank columns are the ones with a (#N) marker in their header.
    #[clap(long, value_parser)]
    pub choices: Option<Vec<String>>,

    /// (default: first worksheet) When using an Excel file, indicates the name of the worksheet to use.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    /// (default powerIteration) The solver for the stationary distribution: powerIteration or directSolve.
    #[clap(long, value_parser)]
    pub method: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
