use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use pghydro_rs::api::{BASE_URL_ENV, TOKEN_ENV};
use pghydro_rs::{Client, PiperOptions, Selection, StyleRules, piper, storage};
use polars::prelude::DataFrame;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "pghydro",
    version,
    about = "Fetch groundwater & water-quality measurements and format them for Piper plots"
)]
struct Cli {
    /// Base URL of the service (e.g., https://example.org/api)
    #[arg(long, env = BASE_URL_ENV, global = true)]
    base_url: Option<String>,
    /// API token sent as `Authorization: Token <token>`
    #[arg(long, env = TOKEN_ENV, global = true, hide_env_values = true)]
    token: Option<String>,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch groundwater levels.
    Groundwater(OutputArgs),
    /// Fetch physicochemical parameters (pH, temperature, conductivity, ...).
    Parameters(ParametersArgs),
    /// Fetch chemical analyses (optionally formatted for a Piper plot).
    Analyses(AnalysesArgs),
    /// Format a saved CSV table for a Piper plot (no network access).
    Piper(PiperFileArgs),
}

#[derive(ValueEnum, Clone, Debug)]
enum OutFormat {
    Csv,
    Json,
}

#[derive(Args, Debug)]
struct OutputArgs {
    /// Save results to file (format inferred by --format or extension).
    #[arg(long)]
    out: Option<PathBuf>,
    /// Output format (csv or json). If omitted, inferred from --out extension.
    #[arg(long, value_enum)]
    format: Option<OutFormat>,
}

#[derive(Args, Debug)]
struct FilterArgs {
    /// Station name(s), repeated or comma separated (e.g., "Piezometer 1,Piezometer 2")
    #[arg(short, long, value_delimiter = ',')]
    station: Vec<String>,
    /// First day to include (YYYY-MM-DD). Defaults to 1900-01-01.
    #[arg(long, value_parser = parse_date)]
    start: Option<NaiveDate>,
    /// Last day bound (YYYY-MM-DD). Defaults to 2100-01-01.
    #[arg(long, value_parser = parse_date)]
    end: Option<NaiveDate>,
}

#[derive(Args, Debug)]
struct ParametersArgs {
    #[command(flatten)]
    filter: FilterArgs,
    /// Parameter name(s), repeated or comma separated (e.g., pH,Temperature)
    #[arg(short, long, value_delimiter = ',')]
    parameter: Vec<String>,
    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Args, Debug)]
struct AnalysesArgs {
    #[command(flatten)]
    filter: FilterArgs,
    /// Analyte name(s), repeated or comma separated (e.g., Ca,Mg,Cl)
    #[arg(short, long, value_delimiter = ',')]
    analyte: Vec<String>,
    /// Add Piper plot columns to the result.
    #[arg(long, default_value_t = false)]
    piper: bool,
    #[command(flatten)]
    style: PiperArgs,
    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Args, Debug)]
struct PiperFileArgs {
    /// CSV table to format (with header).
    #[arg(short, long)]
    input: PathBuf,
    #[command(flatten)]
    style: PiperArgs,
    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Args, Debug)]
struct PiperArgs {
    /// Column used as point label.
    #[arg(long, default_value = "station")]
    label: String,
    /// Color for all points when no --color-rules are given.
    #[arg(long, default_value = "black")]
    color: String,
    /// Marker for all points when no --marker-rules are given.
    #[arg(long, default_value = "o")]
    marker: String,
    /// Marker size.
    #[arg(long, default_value_t = 30)]
    size: i32,
    /// Marker transparency (0..1).
    #[arg(long, default_value_t = 0.7)]
    alpha: f64,
    /// Convert Alkalinity (meq/L) to HCO3 (mg/L) before renaming.
    #[arg(long, default_value_t = false)]
    convert_alkalinity: bool,
    /// CSV file with `pattern,value` rows assigning colors by label.
    #[arg(long)]
    color_rules: Option<PathBuf>,
    /// CSV file with `pattern,value` rows assigning markers by label.
    #[arg(long)]
    marker_rules: Option<PathBuf>,
}

impl PiperArgs {
    fn to_options(&self) -> Result<PiperOptions> {
        let load = |p: &Option<PathBuf>| -> Result<Option<StyleRules>> {
            p.as_ref()
                .map(|path| {
                    StyleRules::from_csv(path)
                        .with_context(|| format!("load style rules from {}", path.display()))
                })
                .transpose()
        };
        Ok(PiperOptions {
            label_col: self.label.clone(),
            color: self.color.clone(),
            marker: self.marker.clone(),
            size: self.size,
            alpha: self.alpha,
            convert_alkalinity: self.convert_alkalinity,
            color_rules: load(&self.color_rules)?,
            marker_rules: load(&self.marker_rules)?,
        })
    }
}

fn parse_date(s: &str) -> std::result::Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| format!("invalid date '{}', expected YYYY-MM-DD: {}", s, e))
}

fn fmt_date(d: Option<NaiveDate>) -> Option<String> {
    d.map(|d| d.format("%Y-%m-%d").to_string())
}

fn selection(mut items: Vec<String>) -> Option<Selection> {
    items.retain(|x| !x.trim().is_empty());
    match items.len() {
        0 => None,
        1 => items.pop().map(Selection::One),
        _ => Some(Selection::Many(items)),
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match &cli.cmd {
        Command::Groundwater(out) => {
            let df = client(&cli)?.get_groundwater_level()?;
            emit(&df, out)
        }
        Command::Parameters(args) => cmd_parameters(&cli, args),
        Command::Analyses(args) => cmd_analyses(&cli, args),
        Command::Piper(args) => cmd_piper(args),
    }
}

fn client(cli: &Cli) -> Result<Client> {
    let Some(base_url) = cli.base_url.as_deref() else {
        bail!("missing --base-url (or {})", BASE_URL_ENV);
    };
    let Some(token) = cli.token.as_deref() else {
        bail!("missing --token (or {})", TOKEN_ENV);
    };
    Ok(Client::new(base_url, token)?)
}

fn cmd_parameters(cli: &Cli, args: &ParametersArgs) -> Result<()> {
    let start = fmt_date(args.filter.start);
    let end = fmt_date(args.filter.end);
    let df = client(cli)?
        .get_physicochemical_parameters(
            selection(args.filter.station.clone()),
            selection(args.parameter.clone()),
            start.as_deref(),
            end.as_deref(),
        )
        .context("fetch physicochemical parameters")?;
    emit(&df, &args.output)
}

fn cmd_analyses(cli: &Cli, args: &AnalysesArgs) -> Result<()> {
    let start = fmt_date(args.filter.start);
    let end = fmt_date(args.filter.end);
    let mut df = client(cli)?
        .get_analyses(
            selection(args.filter.station.clone()),
            selection(args.analyte.clone()),
            start.as_deref(),
            end.as_deref(),
        )
        .context("fetch analyses")?;
    if args.piper {
        df = piper::format_piper(&df, &args.style.to_options()?)?;
    }
    emit(&df, &args.output)
}

fn cmd_piper(args: &PiperFileArgs) -> Result<()> {
    let df = storage::load_csv(&args.input)
        .with_context(|| format!("read {}", args.input.display()))?;
    let df = piper::format_piper(&df, &args.style.to_options()?)?;
    emit(&df, &args.output)
}

fn emit(df: &DataFrame, output: &OutputArgs) -> Result<()> {
    let Some(path) = output.out.as_ref() else {
        println!("{}", df);
        return Ok(());
    };
    let fmt = match output.format {
        Some(OutFormat::Csv) => "csv",
        Some(OutFormat::Json) => "json",
        None => path.extension().and_then(|e| e.to_str()).unwrap_or("csv"),
    }
    .to_ascii_lowercase();
    match fmt.as_str() {
        "csv" => storage::save_csv(df, path)?,
        "json" => storage::save_json(df, path)?,
        other => bail!("unsupported format: {}", other),
    }
    eprintln!("Saved {} rows to {}", df.height(), path.display());
    Ok(())
}
