use log::{debug, info, warn};

use markov_ranking::builder::Builder;
use markov_ranking::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::json;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::survey::config_reader::*;

mod config_reader;
mod io_common;
mod io_csv;
mod io_excel;

#[derive(Debug, Snafu)]
pub enum RankError {
    #[snafu(display("Error opening file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("Worksheet {name} not found in {path}"))]
    MissingWorksheet { name: String, path: String },
    #[snafu(display("No worksheet or no header row in {path}"))]
    EmptyExcel { path: String },
    #[snafu(display("Cell type not understood at line {lineno}: {content}"))]
    ExcelWrongCellType { lineno: usize, content: String },
    #[snafu(display("Error opening file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error parsing CSV line {lineno}"))]
    CsvLineParse { source: csv::Error, lineno: usize },
    #[snafu(display("No rank column found: expected headers marked with (#1), (#2), ..."))]
    NoRankColumns {},
    #[snafu(display("Rank {rank} is marked on several columns"))]
    DuplicateRankColumn { rank: u32 },
    #[snafu(display("Choice column {name:?} not found in the header"))]
    MissingChoiceColumn { name: String },
    #[snafu(display("Ranking {id} is incomplete: every option must be ranked"))]
    PartialRanking { id: String },
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Error writing file {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("No input: provide a configuration file with --config or an input file with --input"))]
    MissingInput {},
    #[snafu(display("Invalid ranking {id}: {source}"))]
    InvalidRanking { source: RankingErrors, id: String },
    #[snafu(display("Ranking failed: {source}"))]
    Ranking { source: RankingErrors },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type RankResult<T> = Result<T, RankError>;
pub type BRankResult<T> = Result<T, Box<RankError>>;

/// A ranking, as parsed by the readers.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ParsedRanking {
    pub id: String,
    pub choices: Vec<String>,
}

fn read_ranking_data(root_path: &Path, cfs: &FileSource) -> BRankResult<Vec<ParsedRanking>> {
    let p: PathBuf = root_path.join(&cfs.file_path);
    let p2 = p.as_path().display().to_string();
    info!("Attempting to read rank file {:?}", p2);
    match cfs.provider.as_str() {
        "csv" => io_csv::read_csv_ranking(p2, cfs),
        "xlsx" => io_excel::read_excel_ranking(p2, cfs),
        x => Err(Box::new(RankError::Whatever {
            message: format!("Provider not implemented {:?}", x),
            source: None,
        })),
    }
}

fn build_table(parsed: &[ParsedRanking], rules: &RankingRules) -> BRankResult<Builder> {
    let mut builder = Builder::new(rules).context(RankingSnafu {})?;
    for pr in parsed.iter() {
        builder
            .add_ranking(&pr.choices)
            .context(InvalidRankingSnafu { id: pr.id.clone() })?;
    }
    Ok(builder)
}

/// The scores sorted by decreasing value, then by name.
fn sorted_scores(res: &RankingResult) -> Vec<(String, f64)> {
    let mut scores = res.scores.clone();
    scores.sort_by(|(n1, s1), (n2, s2)| s2.total_cmp(s1).then_with(|| n1.cmp(n2)));
    scores
}

fn format_percentage(score: f64) -> String {
    format!("{:.2}", score * 100.0)
}

// Keeps the summaries stable across solvers and platforms.
fn round_score(score: f64) -> f64 {
    (score * 1e6).round() / 1e6
}

fn result_scores_to_json(res: &RankingResult) -> Vec<JSValue> {
    sorted_scores(res)
        .iter()
        .enumerate()
        .map(|(idx, (name, score))| {
            json!({
                "rank": idx + 1,
                "name": name,
                "score": round_score(*score),
                "percentage": format_percentage(*score),
            })
        })
        .collect()
}

fn build_summary_js(config: &RankConfig, rules: &RankingRules, res: &RankingResult) -> JSValue {
    let c = OutputConfig {
        contest: config.output_settings.contest_name.clone(),
        date: config.output_settings.contest_date.clone(),
        office: config.output_settings.contest_office.clone(),
        respondents: res.num_respondents,
        method: match rules.stationary_method {
            StationaryMethod::PowerIteration => "powerIteration".to_string(),
            StationaryMethod::DirectSolve => "directSolve".to_string(),
        },
    };
    json!({
        "config": c,
        "results": result_scores_to_json(res) })
}

/// Reads the configuration file if any, and applies the overrides of the command line.
///
/// Returns the configuration and the directory the file paths are relative to.
fn resolve_config(args: &Args) -> BRankResult<(RankConfig, PathBuf)> {
    let (mut config, root) = match &args.config {
        Some(config_path) => {
            let config = read_config(config_path)?;
            let root = Path::new(config_path)
                .parent()
                .map(|p| p.to_path_buf())
                .unwrap_or_default();
            (config, root)
        }
        None => {
            ensure!(args.input.is_some(), MissingInputSnafu {});
            let config = RankConfig {
                output_settings: OutputSettings::default(),
                file_sources: vec![],
                rules: RankRules::default(),
            };
            (config, PathBuf::new())
        }
    };

    if let Some(input) = &args.input {
        let file_path = if args.config.is_some() {
            // Command line paths are relative to the working directory.
            fs::canonicalize(input)
                .map(|p| p.display().to_string())
                .unwrap_or_else(|_| input.clone())
        } else {
            input.clone()
        };
        config.file_sources = vec![FileSource {
            provider: args.input_type.clone().unwrap_or_else(|| "csv".to_string()),
            file_path,
            excel_worksheet_name: args.excel_worksheet_name.clone(),
            choices: args.choices.clone(),
        }];
    }
    if args.method.is_some() {
        config.rules.stationary_method = args.method.clone();
    }
    if config.output_settings.contest_name.is_empty() {
        if let Some(source) = config.file_sources.first() {
            config.output_settings.contest_name =
                io_common::simplify_file_name(&source.file_path);
        }
    }
    Ok((config, root))
}

fn write_output(out: &str, content: &str) -> BRankResult<()> {
    if out == "stdout" {
        println!("{}", content);
    } else {
        info!("Writing summary to {:?}", out);
        fs::write(out, content).context(WritingOutputSnafu { path: out })?;
    }
    Ok(())
}

fn check_reference(summary_p: String, pretty_js_stats: &str) -> BRankResult<()> {
    let summary_ref = read_summary(summary_p)?;
    debug!("summary: {:?}", summary_ref);
    let pretty_js_summary_ref =
        serde_json::to_string_pretty(&summary_ref).context(ParsingJsonSnafu {})?;
    if pretty_js_summary_ref != pretty_js_stats {
        warn!("Found differences with the reference string");
        print_diff(pretty_js_summary_ref.as_str(), pretty_js_stats, "\n");
        return Err(Box::new(RankError::Whatever {
            message: "Difference detected between calculated summary and reference summary"
                .to_string(),
            source: None,
        }));
    }
    Ok(())
}

pub fn run_survey(args: &Args) -> BRankResult<()> {
    let (config, root_p) = resolve_config(args)?;
    info!("config: {:?}", config);

    let rules = config.rules.validate()?;

    ensure!(!config.file_sources.is_empty(), MissingInputSnafu {});

    let mut data: Vec<ParsedRanking> = Vec::new();
    for cfs in config.file_sources.iter() {
        let mut file_data = read_ranking_data(&root_p, cfs)?;
        data.append(&mut file_data);
    }
    info!("Read {} rankings", data.len());

    let builder = build_table(&data, &rules)?;
    let result = builder.run().context(RankingSnafu {})?;

    for (name, score) in sorted_scores(&result) {
        println!("{}: {}%", name, format_percentage(score));
    }

    let result_js = build_summary_js(&config, &rules, &result);
    let pretty_js_stats = serde_json::to_string_pretty(&result_js).context(ParsingJsonSnafu {})?;

    let out = args.out.clone().or_else(|| {
        config.output_settings.output_directory.as_ref().map(|d| {
            root_p
                .join(d)
                .join(format!("{}_summary.json", config.output_settings.contest_name))
                .display()
                .to_string()
        })
    });
    if let Some(out_path) = out {
        write_output(&out_path, &pretty_js_stats)?;
    }

    // The reference summary, if provided for comparison
    if let Some(summary_p) = args.reference.clone() {
        check_reference(summary_p, &pretty_js_stats)?;
    }

    Ok(())
}
