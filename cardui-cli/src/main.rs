use std::fs::{self, File};
use std::path::{Path, PathBuf};

use clap::Parser;
use color_eyre::eyre::{Report, Result, WrapErr};
use log::LevelFilter;

use cardui::prelude::*;

#[derive(Debug, Parser)]
#[command(
    name = "cardui",
    version,
    about = "Capture credit-card details in an interactive terminal form"
)]
struct Cli {
    /// Title shown on the card row
    #[arg(long = "title", value_name = "TEXT")]
    title: Option<String>,

    /// Ask for the card holder name
    #[arg(long = "holder")]
    holder: bool,

    /// Ask for the postal code
    #[arg(long = "postal")]
    postal: bool,

    /// JSON brand table replacing the built-in one
    #[arg(long = "brands", value_name = "FILE")]
    brands: Option<PathBuf>,

    /// Run the Luhn check on UnionPay numbers as well
    #[arg(long = "union-pay-luhn")]
    union_pay_luhn: bool,

    /// Years into the future an expiry date may lie
    #[arg(long = "max-elapsed-years", value_name = "YEARS")]
    max_elapsed_years: Option<usize>,

    /// Write debug logs to this file
    #[arg(long = "log-file", value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Emit compact JSON rather than pretty formatting
    #[arg(long = "no-pretty")]
    no_pretty: bool,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    if let Some(path) = cli.log_file.as_deref() {
        init_logging(path)?;
    }

    let mut options = UiOptions::default()
        .with_card_holder(cli.holder)
        .with_postal_code(cli.postal)
        .with_union_pay_luhn(cli.union_pay_luhn);
    if let Some(years) = cli.max_elapsed_years {
        options = options.with_max_elapsed_years(years);
    }
    if let Some(path) = cli.brands.as_deref() {
        options = options.with_catalog(load_catalog(path)?);
    }

    let mut ui = CardUI::new(options);
    if let Some(title) = cli.title.as_ref() {
        ui = ui.with_title(title.clone());
    }

    let card = ui.run().map_err(Report::msg)?;
    let rendered = if cli.no_pretty {
        serde_json::to_string(&card)?
    } else {
        serde_json::to_string_pretty(&card)?
    };
    println!("{rendered}");

    Ok(())
}

fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .wrap_err_with(|| format!("failed to create log file {}", path.display()))?;
    env_logger::Builder::new()
        .filter_level(LevelFilter::Debug)
        .parse_default_env()
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn load_catalog(path: &Path) -> Result<BrandCatalog> {
    let source = fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read brand table {}", path.display()))?;
    BrandCatalog::from_json(&source)
        .wrap_err_with(|| format!("invalid brand table {}", path.display()))
}
