use log::{debug, info, warn};

use electoral_flip::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::io::Write;
use std::path::Path;

use serde::Serialize;
use serde_json::json;
use serde_json::Map as JSMap;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::flip::config_reader::*;

pub mod config_reader;
pub mod io_common;
pub mod io_csv;
pub mod io_xlsx;

#[derive(Debug, Snafu)]
pub enum FlipError {
    #[snafu(display("Error opening CSV file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error parsing CSV line {lineno}"))]
    CsvLineParse { source: csv::Error, lineno: usize },
    #[snafu(display("Error writing CSV record"))]
    CsvWrite { source: csv::Error },
    #[snafu(display("Error opening Excel file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("No worksheet with data in {path}"))]
    EmptyExcel { path: String },
    #[snafu(display("Several worksheets in {path}, the name of the worksheet must be provided"))]
    AmbiguousWorksheet { path: String },
    #[snafu(display("Missing column {column} in {path}"))]
    MissingColumn { column: String, path: String },
    #[snafu(display("Cannot read the year on line {lineno}: {content:?}"))]
    InvalidYear { lineno: usize, content: String },
    #[snafu(display("Error opening JSON file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Error writing {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error reading reference {path}"))]
    ReadingReference {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Invalid input data"))]
    Analysis { source: FlipErrors },
    #[snafu(display("Difference detected between the calculated summary and the reference {path}"))]
    ReferenceMismatch { path: String },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type FlipResult<T> = Result<T, FlipError>;

pub const SUMMARY_HEADER: [&str; 13] = [
    "year",
    "winner_party",
    "winner_ev",
    "runner_party",
    "runner_ev",
    "need",
    "classic_min_votes",
    "classic_ev",
    "classic_states",
    "no_majority_min_votes",
    "no_majority_ev",
    "no_majority_states",
    "total_ev",
];

pub const DETAILS_HEADER: [&str; 6] = [
    "year",
    "mode",
    "abbr",
    "ev",
    "votes_to_flip",
    "pct_of_state_votes",
];

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum InputType {
    Csv,
    Xlsx,
}

/// All the settings of a run, after merging the command line and the configuration file.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RunSettings {
    pub input: String,
    pub input_type: InputType,
    pub excel_worksheet_name: Option<String>,
    pub summary_output: String,
    pub details_output: String,
    pub json_output: Option<String>,
    pub reference: Option<String>,
    pub start_year: Option<u32>,
    pub end_year: Option<u32>,
    pub rules: FlipRules,
}

// The serialized rows. Field order is the column order.
#[derive(Debug, Serialize)]
struct SummaryRecord {
    year: u32,
    winner_party: &'static str,
    winner_ev: u32,
    runner_party: &'static str,
    runner_ev: u32,
    need: u32,
    classic_min_votes: i64,
    classic_ev: u32,
    classic_states: usize,
    no_majority_min_votes: i64,
    no_majority_ev: u32,
    no_majority_states: usize,
    total_ev: u32,
}

#[derive(Debug, Serialize)]
struct DetailRecord {
    year: u32,
    mode: &'static str,
    abbr: String,
    ev: u32,
    votes_to_flip: u64,
    pct_of_state_votes: f64,
}

fn parse_input_type(input_type: Option<&str>, path: &str) -> FlipResult<InputType> {
    match input_type {
        Some("csv") => Ok(InputType::Csv),
        Some("xlsx") | Some("excel") => Ok(InputType::Xlsx),
        Some(x) => whatever!("Input type {:?} is not supported (csv or xlsx)", x),
        None => {
            let ext = Path::new(path)
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| e.to_lowercase());
            match ext.as_deref() {
                Some("xlsx") | Some("xlsm") => Ok(InputType::Xlsx),
                _ => Ok(InputType::Csv),
            }
        }
    }
}

/// Merges the command line arguments with the configuration file, if any.
/// The command line takes precedence.
pub fn resolve_settings(args: &Args) -> FlipResult<RunSettings> {
    let (config, root) = match &args.config {
        Some(config_path) => {
            let config = read_config(config_path)?;
            info!("config: {:?}", config);
            let root = Path::new(config_path)
                .parent()
                .map(|p| p.display().to_string())
                .unwrap_or_default();
            (config, root)
        }
        None => (FlipConfig::default(), String::new()),
    };

    let input = match (&args.input, &config.input_file) {
        (Some(x), _) => x.clone(),
        (None, Some(x)) => resolve_path(&root, x),
        (None, None) => whatever!("No input file: use --input or inputFile in the configuration"),
    };
    let input_type = parse_input_type(
        args.input_type
            .as_deref()
            .or(config.input_type.as_deref()),
        &input,
    )?;
    let output = |arg: &Option<String>, conf: &Option<String>| -> Option<String> {
        arg.clone().or_else(|| conf.as_ref().map(|x| resolve_path(&root, x)))
    };

    let majority_rule = match args.majority.or(config.majority_threshold) {
        Some(x) if x > 0 => MajorityRule::Fixed(x),
        Some(x) => whatever!("The majority threshold must be positive, got {}", x),
        None => MajorityRule::HalfPlusOne,
    };

    let start_year = args.start_year.or(config.start_year);
    let end_year = args.end_year.or(config.end_year);
    if let (Some(s), Some(e)) = (start_year, end_year) {
        if s > e {
            whatever!("The start year {} is after the end year {}", s, e);
        }
    }

    Ok(RunSettings {
        input,
        input_type,
        excel_worksheet_name: args
            .excel_worksheet_name
            .clone()
            .or(config.excel_worksheet_name),
        summary_output: output(&args.out_summary, &config.summary_output)
            .unwrap_or_else(|| DEFAULT_SUMMARY_OUTPUT.to_string()),
        details_output: output(&args.out_details, &config.details_output)
            .unwrap_or_else(|| DEFAULT_DETAILS_OUTPUT.to_string()),
        json_output: output(&args.out_json, &config.json_output),
        reference: args.reference.clone(),
        start_year,
        end_year,
        rules: FlipRules {
            majority_rule,
            ..FlipRules::DEFAULT_RULES
        },
    })
}

fn read_units(settings: &RunSettings) -> FlipResult<Vec<UnitResult>> {
    info!("Attempting to read {:?}", settings.input);
    let units = match settings.input_type {
        InputType::Csv => io_csv::read_csv_margins(&settings.input)?,
        InputType::Xlsx => {
            io_xlsx::read_excel_margins(&settings.input, settings.excel_worksheet_name.as_deref())?
        }
    };
    info!("Read {} units from {:?}", units.len(), settings.input);
    Ok(units)
}

fn filter_years(units: Vec<UnitResult>, start: Option<u32>, end: Option<u32>) -> Vec<UnitResult> {
    units
        .into_iter()
        .filter(|u| start.map_or(true, |s| u.year >= s) && end.map_or(true, |e| u.year <= e))
        .collect()
}

fn csv_text<T: Serialize>(header: &[&str], records: &[T]) -> FlipResult<String> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(vec![]);
    wtr.write_record(header).context(CsvWriteSnafu {})?;
    for r in records.iter() {
        wtr.serialize(r).context(CsvWriteSnafu {})?;
    }
    let data = wtr
        .into_inner()
        .map_err(|e| e.into_error())
        .context(WritingOutputSnafu { path: "memory" })?;
    match String::from_utf8(data) {
        Ok(s) => Ok(s),
        Err(e) => whatever!("Output is not valid UTF-8: {}", e),
    }
}

pub fn summary_csv(report: &FlipReport) -> FlipResult<String> {
    let records: Vec<SummaryRecord> = report
        .summary_rows()
        .iter()
        .map(|r| SummaryRecord {
            year: r.year,
            winner_party: r.winner_party.code(),
            winner_ev: r.winner_ev,
            runner_party: r.runner_party.code(),
            runner_ev: r.runner_ev,
            need: r.need,
            classic_min_votes: r.classic_min_votes,
            classic_ev: r.classic_ev,
            classic_states: r.classic_states,
            no_majority_min_votes: r.no_majority_min_votes,
            no_majority_ev: r.no_majority_ev,
            no_majority_states: r.no_majority_states,
            total_ev: r.total_ev,
        })
        .collect();
    csv_text(&SUMMARY_HEADER, &records)
}

pub fn details_csv(report: &FlipReport) -> FlipResult<String> {
    let records: Vec<DetailRecord> = report
        .detail_rows()
        .into_iter()
        .map(|r| DetailRecord {
            year: r.year,
            mode: r.mode.label(),
            abbr: r.abbr,
            ev: r.ev,
            votes_to_flip: r.votes_to_flip,
            pct_of_state_votes: r.pct_of_state_votes,
        })
        .collect();
    csv_text(&DETAILS_HEADER, &records)
}

fn scenario_to_json(ya: &YearAnalysis, mode: FlipMode, decimals: u32) -> JSValue {
    let sol = ya.solution(mode);
    let (winner_after, runner_after) = tally_after_flips(&ya.summary, sol);
    let units: Vec<JSValue> = sol
        .chosen_units
        .iter()
        .map(|c| {
            json!({
                "abbr": c.abbr,
                "ev": c.electoral_votes,
                "votesToFlip": c.votes_to_flip,
                "fromParty": c.current_winner.code(),
                "pctOfStateVotes": c.pct_of_unit_votes(decimals),
            })
        })
        .collect();
    json!({
        "mode": mode.label(),
        "targetEv": sol.target_ev,
        "reachable": sol.is_reachable(),
        "minVotes": sol.min_votes(),
        "achievedEv": sol.achieved_ev,
        "pctOfNationalVotes": pct_of_national_votes(ya, mode, decimals),
        "winnerEvAfter": winner_after,
        "runnerEvAfter": runner_after,
        "units": units,
    })
}

fn build_report_js(report: &FlipReport, summary_digest: &str, details_digest: &str) -> JSValue {
    let decimals = report.rules.pct_decimals;
    let years: Vec<JSValue> = report
        .years
        .iter()
        .map(|ya| {
            let s = &ya.summary;
            let mut ev_by_party: JSMap<String, JSValue> = JSMap::new();
            for p in Party::ALL {
                ev_by_party.insert(p.code().to_string(), json!(s.ev_of(p)));
            }
            let scenarios: Vec<JSValue> = FlipMode::ALL
                .iter()
                .map(|mode| scenario_to_json(ya, *mode, decimals))
                .collect();
            json!({
                "year": s.year,
                "totalEv": s.total_ev,
                "totalPopularVotes": ya.total_popular_votes,
                "evByParty": ev_by_party,
                "winnerParty": s.winner_party.code(),
                "winnerEv": s.winner_ev,
                "runnerParty": s.runner_party.code(),
                "runnerEv": s.runner_ev,
                "need": s.majority_threshold,
                "scenarios": scenarios,
            })
        })
        .collect();
    let majority = match report.rules.majority_rule {
        MajorityRule::HalfPlusOne => json!("halfPlusOne"),
        MajorityRule::Fixed(x) => json!(x),
    };
    json!({
        "rules": { "majority": majority, "pctDecimals": decimals },
        "summaryDigest": summary_digest,
        "detailsDigest": details_digest,
        "years": years,
    })
}

fn write_output(path: &str, content: &str) -> FlipResult<()> {
    if path == "stdout" {
        let mut out = std::io::stdout();
        out.write_all(content.as_bytes())
            .context(WritingOutputSnafu { path })?;
        return Ok(());
    }
    fs::write(path, content).context(WritingOutputSnafu { path })?;
    info!("Wrote {:?}", path);
    Ok(())
}

fn normalize_lines(s: &str) -> String {
    let lines: Vec<&str> = s.lines().map(|l| l.trim_end()).collect();
    lines.join("\n").trim_end().to_string()
}

/// Compares the summary with a reference file. Line endings and trailing blanks are not significant.
pub fn check_reference(summary: &str, reference_path: &str) -> FlipResult<()> {
    let reference = fs::read_to_string(reference_path).context(ReadingReferenceSnafu {
        path: reference_path,
    })?;
    let expected = normalize_lines(&reference);
    let actual = normalize_lines(summary);
    if expected != actual {
        warn!("Found differences with the reference {:?}", reference_path);
        print_diff(expected.as_str(), actual.as_str(), "\n");
        return ReferenceMismatchSnafu {
            path: reference_path,
        }
        .fail();
    }
    info!("Summary matches the reference {:?}", reference_path);
    Ok(())
}

pub fn run_flip(args: &Args) -> FlipResult<()> {
    let settings = resolve_settings(args)?;
    debug!("run_flip: settings: {:?}", settings);

    let units = filter_years(
        read_units(&settings)?,
        settings.start_year,
        settings.end_year,
    );
    if units.is_empty() {
        warn!("No unit to analyze in {:?}", settings.input);
    }

    let report = run_flip_analysis(&units, &settings.rules).context(AnalysisSnafu {})?;

    let summary = summary_csv(&report)?;
    let details = details_csv(&report)?;
    let summary_digest = sha256::digest(summary.as_str());
    let details_digest = sha256::digest(details.as_str());
    info!(
        "{} years, {} detail rows, summary digest {}, details digest {}",
        report.years.len(),
        report.detail_rows().len(),
        summary_digest,
        details_digest
    );

    write_output(&settings.summary_output, &summary)?;
    write_output(&settings.details_output, &details)?;

    if let Some(json_path) = &settings.json_output {
        let js = build_report_js(&report, &summary_digest, &details_digest);
        let pretty_js = serde_json::to_string_pretty(&js).context(ParsingJsonSnafu {})?;
        write_output(json_path, &pretty_js)?;
    }

    if let Some(reference_path) = &settings.reference {
        check_reference(&summary, reference_path)?;
    }
    Ok(())
}
