use clap::Parser;

/// This is a program to find the smallest popular-vote shifts that change the outcome of
/// historical Electoral College results.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) A JSON configuration file. All the options below can also be set in this file.
    /// For more information about the file format, read the documentation of the `manual` module.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path) The table of results per unit and per year (CSV or Excel).
    /// Setting this option overrides the input that may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (csv or xlsx) The type of the input. By default, it is inferred from the file extension.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// When using an Excel file with several worksheets, indicates the name of the worksheet to use.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    /// (file path or 'stdout', default flip_results.csv) Where to write the summary table, one row per year.
    #[clap(long, value_parser)]
    pub out_summary: Option<String>,

    /// (file path or 'stdout', default flip_details.csv) Where to write the flipped units, one row per year,
    /// scenario and unit.
    #[clap(long, value_parser)]
    pub out_details: Option<String>,

    /// (file path or 'stdout', optional) If specified, a full report will be written in JSON format to the given location.
    #[clap(long, value_parser)]
    pub out_json: Option<String>,

    /// (file path) A reference summary table in CSV format. If provided, the computed summary must be identical
    /// to the reference, otherwise the differences are printed and the program fails.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (year, optional) The first year to analyze.
    #[clap(long, value_parser)]
    pub start_year: Option<u32>,

    /// (year, optional) The last year to analyze.
    #[clap(long, value_parser)]
    pub end_year: Option<u32>,

    /// (number, optional) A fixed number of electoral votes for a majority, instead of half of the total plus one.
    #[clap(long, value_parser)]
    pub majority: Option<u32>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
