//! # textables
//!
//! A CLI for turning tables of statistics into LaTeX `tabular` markup.
//!
//! ## Overview
//!
//! textables is built on top of textableslib. Every subcommand reads one or
//! more JSON tables in the split layout
//! (`{"index": [...], "columns": [...], "data": [[...]]}`), builds a
//! formatted table, and prints it as LaTeX (default), JSON, or plain text.
//!
//! ## Usage
//!
//! ```bash
//! # Format a table with two decimals
//! textables render coef.json --fmt "{:.2f}"
//!
//! # Coefficients with standard errors underneath, plus fit statistics
//! textables model-fit --coef coef.json --inference se.json --gof gof.json \
//!     --fmt-coef "{:.3f}" --fmt-inference "({:.3f})"
//!
//! # Stack two tables, decimal-aligned, stretched to 80% of the text width
//! textables concat a.json b.json --dcolumn --tabularx --textwidth 0.8
//!
//! # Diagonal of univariate estimates with the joint model as a column
//! textables diagonal single.json --joint joint.json --orient-joint columns
//!
//! # Write to a file
//! textables render coef.json -o table.tex
//! ```
//!
//! Set `TEXTABLES_LOG` (e.g. `TEXTABLES_LOG=debug`) to see what happens at
//! each step; `-v` does the same for the default level.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::str::FromStr;

use anyhow::{anyhow, Context};
use clap::{Arg, ArgAction, ArgMatches, Command};
use console::Style;
use serde::de::DeserializeOwned;
use textableslib::{
    concat, Axis, Cell, DcolumnOptions, LabeledSeries, LabeledTable, ModelFitOptions,
    Orientation, TabularOptions, TabularxOptions, TexTable,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Build the clap Command structure
fn build_command() -> Command {
    Command::new("textables")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Render tables of statistics as LaTeX tabular markup")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .args(output_args())
        .subcommand(
            Command::new("render")
                .about("Format a single table")
                .arg(
                    Arg::new("table")
                        .required(true)
                        .help("Table in JSON split layout"),
                )
                .arg(fmt_arg()),
        )
        .subcommand(
            Command::new("model-fit")
                .about("Coefficients interleaved with inference statistics")
                .arg(
                    Arg::new("coef")
                        .long("coef")
                        .required(true)
                        .help("Coefficient table"),
                )
                .arg(
                    Arg::new("inference")
                        .long("inference")
                        .required(true)
                        .help("Inference table (standard errors, t-values), same rows as --coef"),
                )
                .arg(
                    Arg::new("gof")
                        .long("gof")
                        .help("Goodness-of-fit table attached after the estimates"),
                )
                .arg(
                    Arg::new("fmt-coef")
                        .long("fmt-coef")
                        .default_value("{}")
                        .help("Template for coefficients and goodness of fit"),
                )
                .arg(
                    Arg::new("fmt-inference")
                        .long("fmt-inference")
                        .default_value("({})")
                        .help("Template for inference statistics"),
                )
                .arg(
                    Arg::new("orient")
                        .long("orient")
                        .value_parser(["columns", "rows"])
                        .default_value("columns")
                        .help("Models laid out in columns or rows"),
                ),
        )
        .subcommand(
            Command::new("concat")
                .about("Concatenate tables, aligned by label")
                .arg(
                    Arg::new("tables")
                        .required(true)
                        .num_args(1..)
                        .help("Tables in JSON split layout"),
                )
                .arg(fmt_arg())
                .arg(
                    Arg::new("axis")
                        .long("axis")
                        .value_parser(["rows", "columns", "0", "1"])
                        .default_value("rows")
                        .help("Stack vertically (rows) or side by side (columns)"),
                ),
        )
        .subcommand(
            Command::new("diagonal")
                .about("Place a vector of estimates on the diagonal")
                .arg(
                    Arg::new("vector")
                        .required(true)
                        .help("Vector as {\"name\", \"index\", \"values\"}"),
                )
                .arg(
                    Arg::new("joint")
                        .long("joint")
                        .help("Joint-model vector attached next to the diagonal"),
                )
                .arg(
                    Arg::new("orient-joint")
                        .long("orient-joint")
                        .value_parser(["columns", "rows"])
                        .default_value("columns")
                        .help("Attach the joint vector as a column or a row"),
                )
                .arg(fmt_arg()),
        )
}

fn fmt_arg() -> Arg {
    Arg::new("fmt")
        .long("fmt")
        .default_value("{}")
        .help("Format template applied to every cell, e.g. \"{:3.2f}\"")
}

/// Output flags shared by all subcommands
fn output_args() -> Vec<Arg> {
    vec![
        Arg::new("dcolumn")
            .long("dcolumn")
            .global(true)
            .action(ArgAction::SetTrue)
            .help("Wrap cells without the delimiter in \\multicolumn{1}{c}{...}"),
        Arg::new("delimiter")
            .long("delimiter")
            .global(true)
            .value_parser(parse_delimiter)
            .default_value(".")
            .help("Decimal delimiter used by --dcolumn"),
        Arg::new("delimit-index")
            .long("delimit-index")
            .global(true)
            .action(ArgAction::SetTrue)
            .help("Apply --dcolumn to row labels too"),
        Arg::new("tabularx")
            .long("tabularx")
            .global(true)
            .action(ArgAction::SetTrue)
            .help("Emit a tabularx environment"),
        Arg::new("textwidth")
            .long("textwidth")
            .global(true)
            .value_parser(clap::value_parser!(f64))
            .default_value("1.0")
            .help("Fraction of \\textwidth for --tabularx"),
        Arg::new("x-column")
            .long("x-column")
            .global(true)
            .value_parser(clap::value_parser!(usize))
            .default_value("0")
            .help("Position in the column format that becomes the X column"),
        Arg::new("column-format")
            .long("column-format")
            .global(true)
            .help("Column format, e.g. lrr (default: one l per column)"),
        Arg::new("no-booktabs")
            .long("no-booktabs")
            .global(true)
            .action(ArgAction::SetTrue)
            .help("Use \\hline instead of booktabs rules"),
        Arg::new("no-index")
            .long("no-index")
            .global(true)
            .action(ArgAction::SetTrue)
            .help("Do not print row labels"),
        Arg::new("no-header")
            .long("no-header")
            .global(true)
            .action(ArgAction::SetTrue)
            .help("Do not print column labels"),
        Arg::new("out")
            .short('o')
            .long("out")
            .global(true)
            .value_parser(clap::value_parser!(PathBuf))
            .help("Write output to a file instead of stdout"),
        Arg::new("output")
            .long("output")
            .global(true)
            .value_parser(["latex", "json", "text"])
            .default_value("latex")
            .help("Output format"),
        Arg::new("verbose")
            .short('v')
            .long("verbose")
            .global(true)
            .action(ArgAction::SetTrue)
            .help("Log each transformation to stderr"),
    ]
}

fn parse_delimiter(s: &str) -> Result<char, String> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(format!("delimiter must be a single character, got '{}'", s)),
    }
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_env("TEXTABLES_LOG").unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn read_json<T: DeserializeOwned>(path: &str) -> anyhow::Result<T> {
    let text = fs::read_to_string(path).with_context(|| format!("cannot read {}", path))?;
    serde_json::from_str(&text).with_context(|| format!("cannot parse {}", path))
}

fn get_str<'a>(matches: &'a ArgMatches, id: &str) -> &'a str {
    matches
        .get_one::<String>(id)
        .map(|s| s.as_str())
        .unwrap_or_default()
}

fn render_handler(matches: &ArgMatches) -> anyhow::Result<TexTable> {
    let table: LabeledTable<Cell> = read_json(get_str(matches, "table"))?;
    Ok(TexTable::new(&table, get_str(matches, "fmt"))?)
}

fn model_fit_handler(matches: &ArgMatches) -> anyhow::Result<TexTable> {
    let coef: LabeledTable<Cell> = read_json(get_str(matches, "coef"))?;
    let inference: LabeledTable<Cell> = read_json(get_str(matches, "inference"))?;
    let gof: Option<LabeledTable<Cell>> = matches
        .get_one::<String>("gof")
        .map(|path| read_json(path))
        .transpose()?;

    let orient = Orientation::from_str(get_str(matches, "orient")).map_err(|e| anyhow!(e))?;
    let options = ModelFitOptions::new()
        .fmt_coef(get_str(matches, "fmt-coef"))
        .fmt_inference(get_str(matches, "fmt-inference"))
        .orient(orient);

    Ok(TexTable::from_model_fit(
        &coef,
        &inference,
        gof.as_ref(),
        &options,
    )?)
}

fn concat_handler(matches: &ArgMatches) -> anyhow::Result<TexTable> {
    let fmt = get_str(matches, "fmt");
    let tables = matches
        .get_many::<String>("tables")
        .unwrap_or_default()
        .map(|path| -> anyhow::Result<TexTable> {
            let table: LabeledTable<Cell> = read_json(path)?;
            Ok(TexTable::new(&table, fmt)?)
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let axis = Axis::from_str(get_str(matches, "axis")).map_err(|e| anyhow!(e))?;
    Ok(concat(&tables, axis, true)?)
}

fn diagonal_handler(matches: &ArgMatches) -> anyhow::Result<TexTable> {
    let single: LabeledSeries<Cell> = read_json(get_str(matches, "vector"))?;
    let fmt = get_str(matches, "fmt");

    match matches.get_one::<String>("joint") {
        Some(path) => {
            let joint: LabeledSeries<Cell> = read_json(path)?;
            let orient =
                Axis::from_str(get_str(matches, "orient-joint")).map_err(|e| anyhow!(e))?;
            Ok(TexTable::diagonal_single_and_joint(
                &single, &joint, orient, fmt,
            )?)
        }
        None => Ok(TexTable::from_diagonal(&single, fmt)?),
    }
}

fn tabular_options(matches: &ArgMatches) -> TabularOptions {
    let mut options = TabularOptions::new()
        .index(!matches.get_flag("no-index"))
        .header(!matches.get_flag("no-header"))
        .booktabs(!matches.get_flag("no-booktabs"));
    if let Some(format) = matches.get_one::<String>("column-format") {
        options = options.column_format(format);
    }
    if let Some(path) = matches.get_one::<PathBuf>("out") {
        options = options.buf(path);
    }
    options
}

/// Print or write the final table in the requested format
fn emit(table: TexTable, matches: &ArgMatches) -> anyhow::Result<()> {
    let table = if matches.get_flag("dcolumn") {
        let delimiter = matches.get_one::<char>("delimiter").copied().unwrap_or('.');
        table.with_dcolumn(
            &DcolumnOptions::new()
                .delimiter(delimiter)
                .delimit_index(matches.get_flag("delimit-index")),
        )?
    } else {
        table
    };

    let out = matches.get_one::<PathBuf>("out");
    let rendered = match get_str(matches, "output") {
        "json" => Some(serde_json::to_string_pretty(&table)? + "\n"),
        "text" => Some(format!("{}\n", table)),
        _ => {
            let tabular = tabular_options(matches);
            if matches.get_flag("tabularx") {
                let options = TabularxOptions::new()
                    .textwidth(matches.get_one::<f64>("textwidth").copied().unwrap_or(1.0))
                    .x_column_loc(matches.get_one::<usize>("x-column").copied().unwrap_or(0))
                    .tabular(tabular);
                table.to_tabularx(&options)?
            } else {
                table.to_tabular(&tabular)?
            }
        }
    };

    match (rendered, out) {
        (Some(text), Some(path)) => write_file(path, &text),
        (Some(text), None) => {
            print!("{}", text);
            Ok(())
        }
        (None, _) => Ok(()),
    }
}

fn write_file(path: &Path, text: &str) -> anyhow::Result<()> {
    fs::write(path, text).with_context(|| format!("cannot write {}", path.display()))
}

fn run(matches: &ArgMatches) -> anyhow::Result<()> {
    let (name, sub) = matches
        .subcommand()
        .ok_or_else(|| anyhow!("no subcommand given"))?;
    debug!(command = name, "running");

    let table = match name {
        "render" => render_handler(sub)?,
        "model-fit" => model_fit_handler(sub)?,
        "concat" => concat_handler(sub)?,
        "diagonal" => diagonal_handler(sub)?,
        other => return Err(anyhow!("unknown command: {}", other)),
    };
    emit(table, sub)
}

fn main() -> ExitCode {
    let matches = build_command().get_matches();
    let verbose = matches
        .subcommand()
        .map_or(matches.get_flag("verbose"), |(_, sub)| sub.get_flag("verbose"));
    init_tracing(verbose);

    match run(&matches) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let red = Style::new().red().bold().for_stderr();
            eprintln!("{} {:#}", red.apply_to("error:"), e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_is_valid() {
        build_command().debug_assert();
    }

    #[test]
    fn test_parse_delimiter() {
        assert_eq!(parse_delimiter(","), Ok(','));
        assert!(parse_delimiter("").is_err());
        assert!(parse_delimiter("..").is_err());
    }

    #[test]
    fn test_global_flags_reach_subcommands() {
        let matches = build_command()
            .try_get_matches_from([
                "textables",
                "render",
                "t.json",
                "--no-booktabs",
                "--column-format",
                "lrr",
            ])
            .unwrap();
        let (_, sub) = matches.subcommand().unwrap();
        let options = tabular_options(sub);
        assert!(!options.booktabs);
        assert!(options.index);
        assert_eq!(options.column_format.as_deref(), Some("lrr"));
    }

    #[test]
    fn test_model_fit_defaults() {
        let matches = build_command()
            .try_get_matches_from(["textables", "model-fit", "--coef", "c", "--inference", "i"])
            .unwrap();
        let (_, sub) = matches.subcommand().unwrap();
        assert_eq!(get_str(sub, "fmt-coef"), "{}");
        assert_eq!(get_str(sub, "fmt-inference"), "({})");
        assert_eq!(get_str(sub, "orient"), "columns");
    }
}
