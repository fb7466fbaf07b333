use log::{debug, info, warn};

use snafu::prelude::*;

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::json;
use serde_json::Map as JSMap;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use voteit_methods::{MethodKind, RankedBallot, TallyStats, VotingResult};

use crate::args::Args;
use crate::tally::config_reader::*;

pub mod config_reader;
mod io_common;
mod io_csv;
mod io_msforms;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum VoteItError {
    #[snafu(display("Error opening file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("The workbook has no data"))]
    EmptyExcel {},
    #[snafu(display("The workbook has no worksheet {name}"))]
    MissingWorksheet { name: String },
    #[snafu(display("Line {lineno}: could not read the cell {content}"))]
    ExcelWrongCellType { lineno: usize, content: String },
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Expected a positive number or a column letter"))]
    ParsingJsonNumber {},
    #[snafu(display("The configuration file has no parent directory"))]
    MissingParentDir {},
    #[snafu(display("Error opening file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error reading a CSV line"))]
    CsvLineParse { source: csv::Error },
    #[snafu(display("Line {lineno} is too short"))]
    CsvLineTooShort { lineno: usize },
    #[snafu(display("Line {lineno}: {content:?} is not a ballot count"))]
    CsvWrongCount { lineno: usize, content: String },
    #[snafu(display("Unknown input type {provider}"))]
    UnknownProvider { provider: String },
    #[snafu(display("Unknown voting method {method}"))]
    UnknownMethod { method: String },
    #[snafu(display("No input: pass --config or --input"))]
    MissingInput {},
    #[snafu(display("Error writing the summary to {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Tabulation failed: {source}"))]
    Tabulation {
        source: voteit_methods::ElectionError,
    },
    #[snafu(display("Difference detected between calculated summary and reference summary"))]
    ReferenceMismatch {},

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type VoteItResult<T> = Result<T, VoteItError>;
pub type BVoteItResult<T> = Result<T, Box<VoteItError>>;

/// A ballot as found in a source, before any validation.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ParsedBallot {
    pub id: Option<String>,
    pub count: Option<u64>,
    pub choices: Vec<String>,
}

#[derive(Eq, PartialEq, Debug, Clone)]
struct Vote {
    id: Option<String>,
    ranking: Vec<String>,
    count: u64,
}

fn read_ranking_data(root_path: &Path, cfs: &FileSource) -> BVoteItResult<Vec<ParsedBallot>> {
    let p: PathBuf = root_path.join(&cfs.file_path);
    let p2 = p.display().to_string();
    info!("Attempting to read rank file {:?}", p2);
    match cfs.provider.as_str() {
        "csv" => io_csv::read_csv_ranking(p2, cfs),
        "msforms" => io_msforms::read_msforms_ranking(p2, cfs),
        x => Err(Box::new(VoteItError::UnknownProvider {
            provider: x.to_string(),
        })),
    }
}

// Blank choices and excluded candidates are skipped. Ballots with nothing
// left or with a zero count are dropped.
fn validate_ballots(parsed_ballots: &[ParsedBallot], excluded: &HashSet<String>) -> Vec<Vote> {
    let mut res: Vec<Vote> = Vec::new();
    for pb in parsed_ballots.iter() {
        let ranking: Vec<String> = pb
            .choices
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty() && !excluded.contains(*s))
            .map(|s| s.to_string())
            .collect();

        let count = pb.count.unwrap_or(1);
        if count == 0 || ranking.is_empty() {
            debug!("validate_ballots: dropping ballot {:?}", pb);
            continue;
        }
        res.push(Vote {
            id: pb.id.clone(),
            ranking,
            count,
        });
    }
    res
}

/// The names found in the ballots, in order of first appearance.
fn infer_candidates(votes: &[Vote]) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut res: Vec<String> = Vec::new();
    for name in votes.iter().flat_map(|v| v.ranking.iter()) {
        if seen.insert(name.as_str()) {
            res.push(name.clone());
        }
    }
    res
}

fn matrix_to_json(candidates: &[String], rows: &[Vec<u64>]) -> JSValue {
    let mut m: JSMap<String, JSValue> = JSMap::new();
    for (name, row) in candidates.iter().zip(rows.iter()) {
        let mut r: JSMap<String, JSValue> = JSMap::new();
        for (other, count) in candidates.iter().zip(row.iter()) {
            if other != name {
                r.insert(other.clone(), json!(count.to_string()));
            }
        }
        m.insert(name.clone(), JSValue::Object(r));
    }
    JSValue::Object(m)
}

fn result_stats_to_json(rv: &VotingResult<String>) -> JSValue {
    let mut res: JSMap<String, JSValue> = JSMap::new();
    res.insert("outcome".to_string(), json!(rv.outcome.name()));
    res.insert("winners".to_string(), json!(rv.winners));
    match &rv.stats {
        TallyStats::Majority { tally } => {
            let mut t: JSMap<String, JSValue> = JSMap::new();
            for (name, count) in tally.iter() {
                t.insert(name.clone(), json!(count.to_string()));
            }
            res.insert("tally".to_string(), JSValue::Object(t));
        }
        TallyStats::Schulze {
            candidates,
            preferences,
            strongest_paths,
        } => {
            res.insert(
                "pairwise".to_string(),
                matrix_to_json(candidates, preferences),
            );
            res.insert(
                "strongestPaths".to_string(),
                matrix_to_json(candidates, strongest_paths),
            );
        }
    }
    JSValue::Object(res)
}

fn build_summary_js(config: &ElectionConfig, kind: MethodKind, rv: &VotingResult<String>) -> JSValue {
    let c = OutputConfig {
        contest: config.output_settings.contest_name.clone(),
        date: config.output_settings.contest_date.clone(),
        jurisdiction: config.output_settings.contest_jurisdiction.clone(),
        office: config.output_settings.contest_office.clone(),
        method: kind.name().to_string(),
    };
    json!({
        "config": c,
        "results": result_stats_to_json(rv) })
}

/// Reads all the sources of an election and tabulates them. Source paths are
/// resolved against `root_path`.
pub fn tabulate(config: &ElectionConfig, root_path: &Path) -> VoteItResult<JSValue> {
    let kind = config.rules.method_kind()?;
    if config.cvr_file_sources.is_empty() {
        whatever!("No ballot source in the configuration");
    }

    let mut parsed: Vec<ParsedBallot> = Vec::new();
    for cfs in config.cvr_file_sources.iter() {
        let mut file_data = read_ranking_data(root_path, cfs).map_err(|e| *e)?;
        parsed.append(&mut file_data);
    }

    let excluded: HashSet<String> = config.excluded_candidates().into_iter().collect();
    let votes = validate_ballots(&parsed, &excluded);
    info!(
        "tabulate: {} ballots read, {} kept",
        parsed.len(),
        votes.len()
    );

    let candidates = match config.running_candidates() {
        c if c.is_empty() => {
            let c = infer_candidates(&votes);
            info!("tabulate: no candidates configured, found {:?}", c);
            c
        }
        c => c,
    };

    let known: HashSet<&String> = candidates.iter().collect();
    for v in votes.iter() {
        for name in v.ranking.iter().filter(|n| !known.contains(n)) {
            warn!("tabulate: ballot {:?}: unknown candidate {:?}", v.id, name);
        }
    }

    let ballots: Vec<RankedBallot<String>> = votes
        .into_iter()
        .map(|v| RankedBallot::with_count(v.ranking, v.count))
        .collect();
    let result =
        voteit_methods::run_election(kind, &candidates, &ballots).context(TabulationSnafu)?;
    debug!("tabulate: result: {:?}", result);

    Ok(build_summary_js(config, kind, &result))
}

fn default_config(input: &str) -> ElectionConfig {
    ElectionConfig {
        output_settings: OutputSettings {
            contest_name: io_common::simplify_file_name(input),
            output_directory: None,
            contest_date: None,
            contest_jurisdiction: None,
            contest_office: None,
        },
        cvr_file_sources: vec![],
        candidates: vec![],
        rules: ConfigRules {
            method: MethodKind::Schulze.name().to_string(),
            rules_description: None,
        },
    }
}

// Command line arguments take precedence over the configuration file.
fn apply_overrides(config: &mut ElectionConfig, args: &Args) {
    if let Some(input) = &args.input {
        let mut cfs = FileSource::new(args.input_type.as_deref().unwrap_or("csv"), input);
        cfs.excel_worksheet_name = args.excel_worksheet_name.clone();
        config.cvr_file_sources = vec![cfs];
    }
    if let Some(method) = &args.method {
        config.rules.method = method.clone();
    }
    if let Some(names) = &args.candidates {
        config.candidates = names
            .iter()
            .map(|name| ConfigCandidate {
                name: name.clone(),
                code: None,
                excluded: None,
            })
            .collect();
    }
}

fn check_reference(pretty_js_stats: &str, summary_path: &str) -> VoteItResult<()> {
    let summary_ref = read_summary(summary_path)?;
    debug!("check_reference: {:?}", summary_ref);
    let pretty_js_summary_ref =
        serde_json::to_string_pretty(&summary_ref).context(ParsingJsonSnafu {})?;
    if pretty_js_summary_ref != pretty_js_stats {
        warn!("Found differences with the reference string");
        print_diff(pretty_js_summary_ref.as_str(), pretty_js_stats, "\n");
        return ReferenceMismatchSnafu.fail();
    }
    Ok(())
}

pub fn run_election(args: &Args) -> VoteItResult<JSValue> {
    let (mut config, config_dir) = match &args.config {
        Some(path) => {
            let config = read_config(path)?;
            let dir = Path::new(path)
                .parent()
                .context(MissingParentDirSnafu {})?
                .to_path_buf();
            (config, dir)
        }
        None => {
            let input = args.input.as_ref().context(MissingInputSnafu {})?;
            (default_config(input), PathBuf::new())
        }
    };
    // An input given on the command line is relative to the working directory.
    let source_root = if args.input.is_some() {
        PathBuf::new()
    } else {
        config_dir.clone()
    };
    apply_overrides(&mut config, args);
    info!("config: {:?}", config);

    let result_js = tabulate(&config, &source_root)?;
    let pretty_js_stats = serde_json::to_string_pretty(&result_js).context(ParsingJsonSnafu {})?;

    let out = args.out.clone().or_else(|| {
        config
            .output_settings
            .output_directory
            .as_ref()
            .map(|d| config_dir.join(d).join("summary.json").display().to_string())
    });
    match out.as_deref() {
        None | Some("stdout") => println!("{}", pretty_js_stats),
        Some(path) => {
            info!("Writing summary to {}", path);
            if let Some(dir) = Path::new(path).parent() {
                fs::create_dir_all(dir).context(WritingOutputSnafu { path })?;
            }
            fs::write(path, &pretty_js_stats).context(WritingOutputSnafu { path })?;
        }
    }

    if let Some(summary_path) = &args.reference {
        check_reference(&pretty_js_stats, summary_path)?;
    }
    Ok(result_js)
}
