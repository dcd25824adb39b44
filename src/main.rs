//! Mortality Tables CLI
//!
//! Builds table catalogs, selects the best table for a person and prints
//! mortality estimates. Paths default to the environment settings (see
//! `Settings`); flags override them.

use std::io;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::Datelike;
use clap::{Parser, Subcommand, ValueEnum};
use log::info;

use mortality_tables::catalog::store::{load_catalog, save_catalog};
use mortality_tables::catalog::HEALTHY_LIVES_MORTALITY;
use mortality_tables::mortality::survival_schedule;
use mortality_tables::prompt::{prompt_age, prompt_sex};
use mortality_tables::{
    Catalog, DirectorySource, Estimate, MortalityTable, Settings, Sex, TableFacts, TableSource,
};

#[derive(Parser)]
#[command(name = "mortality_tables", version, about = "Mortality estimates from actuarial tables")]
struct Cli {
    /// Directory of `<id>.json` table files
    #[arg(long, global = true)]
    tables: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Ask for age and sex, then print mortality estimates
    Estimate {
        #[arg(long)]
        mortality_catalog: Option<PathBuf>,
        #[arg(long)]
        life_catalog: Option<PathBuf>,
    },
    /// Scan the table source and write a catalog for one content type
    BuildCatalog {
        /// e.g. "healthy lives mortality" or "life table"
        #[arg(long, default_value = HEALTHY_LIVES_MORTALITY)]
        content_type: String,
        #[arg(long)]
        output: PathBuf,
        #[arg(long)]
        max_misses: Option<u32>,
        #[arg(long)]
        min_id: Option<u32>,
    },
    /// Print the id of the best table in a catalog
    Select {
        #[arg(long)]
        catalog: PathBuf,
        #[arg(long, value_enum)]
        sex: SexArg,
        /// Defaults to the current year
        #[arg(long)]
        year: Option<i32>,
    },
    /// Write a year-by-year survival schedule as CSV
    Schedule {
        #[arg(long)]
        table: u32,
        #[arg(long)]
        age: u32,
        #[arg(long)]
        output: PathBuf,
    },
    /// Print the facts inferred for one table
    Inspect {
        #[arg(long)]
        table: u32,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum SexArg {
    #[value(name = "m")]
    Male,
    #[value(name = "f")]
    Female,
    All,
}

impl From<SexArg> for Sex {
    fn from(arg: SexArg) -> Self {
        match arg {
            SexArg::Male => Sex::Male,
            SexArg::Female => Sex::Female,
            SexArg::All => Sex::All,
        }
    }
}

fn current_year() -> i32 {
    chrono::Local::now().year()
}

fn fetch_table(source: &DirectorySource, id: u32) -> Result<MortalityTable> {
    source
        .fetch(id)
        .with_context(|| format!("Failed to fetch table {}", id))?
        .found()
        .with_context(|| format!("Table {} not found in {}", id, source.root().display()))
}

/// Pick and fetch the best table from a catalog; `None` maps to an error
fn select_table(
    source: &DirectorySource,
    catalog: &Catalog,
    sex: Sex,
    year: i32,
    kind: &str,
) -> Result<MortalityTable> {
    let Some(id) = catalog.select(sex, year) else {
        bail!("No suitable {} table for sex {} in {}", kind, sex, year);
    };
    info!("Selected {} table {} for {} in {}", kind, id, sex, year);
    fetch_table(source, id)
}

fn run_estimate(settings: &Settings, source: &DirectorySource) -> Result<()> {
    let mortality_catalog = load_catalog(&settings.mortality_catalog)
        .with_context(|| format!("Failed to load {}", settings.mortality_catalog.display()))?;
    let life_catalog = match load_catalog(&settings.life_catalog) {
        Ok(catalog) => Some(catalog),
        Err(error) => {
            log::warn!("Life table catalog unavailable: {}", error);
            None
        }
    };

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();
    let age = prompt_age(&mut input, &mut output)?;
    let sex = prompt_sex(&mut input, &mut output)?;
    let year = current_year();

    let mortality = select_table(source, &mortality_catalog, sex, year, "mortality")?;
    let life = match &life_catalog {
        Some(catalog) => Some(select_table(source, catalog, sex, year, "life")?),
        None => None,
    };

    println!();
    println!(
        "Mortality table: {} ({})",
        mortality.id(),
        mortality.content_classification.table_name
    );
    if let Some(life) = &life {
        println!(
            "Life table:      {} ({})",
            life.id(),
            life.content_classification.table_name
        );
    }
    println!();
    println!("{}", Estimate::compute(age, &mortality, life.as_ref()));
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let mut settings = Settings::from_env();
    if let Some(tables) = cli.tables {
        settings.table_dir = tables;
    }
    let source = DirectorySource::new(&settings.table_dir);

    match cli.command {
        Command::Estimate {
            mortality_catalog,
            life_catalog,
        } => {
            if let Some(path) = mortality_catalog {
                settings.mortality_catalog = path;
            }
            if let Some(path) = life_catalog {
                settings.life_catalog = path;
            }
            run_estimate(&settings, &source)?;
        }

        Command::BuildCatalog {
            content_type,
            output,
            max_misses,
            min_id,
        } => {
            let mut policy = settings.scan_policy;
            if let Some(max_misses) = max_misses {
                policy.max_consecutive_misses = max_misses;
            }
            if let Some(min_id) = min_id {
                policy.min_id_before_miss_check = min_id;
            }

            let catalog = Catalog::scan(&source, &content_type, &policy).with_context(|| {
                format!("Catalog scan of {} failed", settings.table_dir.display())
            })?;
            save_catalog(&catalog, &output)?;
            println!(
                "Catalogued {} '{}' tables to {}",
                catalog.len(),
                content_type,
                output.display()
            );
        }

        Command::Select { catalog, sex, year } => {
            let loaded = load_catalog(&catalog)?;
            let sex = Sex::from(sex);
            let year = year.unwrap_or_else(current_year);
            match loaded.select(sex, year) {
                Some(id) => println!("{}", id),
                None => bail!("No suitable table for sex {} in {}", sex, year),
            }
        }

        Command::Schedule { table, age, output } => {
            let table = fetch_table(&source, table)?;
            let rows = survival_schedule(age, &table)?;

            let mut writer = csv::Writer::from_path(&output)
                .with_context(|| format!("Unable to create {}", output.display()))?;
            for row in &rows {
                writer.serialize(row)?;
            }
            writer.flush()?;
            println!("Wrote {} ages to {}", rows.len(), output.display());
        }

        Command::Inspect { table } => {
            let table = fetch_table(&source, table)?;
            let facts = TableFacts::infer(&table);
            let content = &table.content_classification;

            println!("Table {}: {}", table.id(), content.table_name);
            println!("  Content type: {}", content.content_type);
            println!("  Ages:         {} to {}", facts.min_age, facts.max_age);
            let year = if facts.year == 0 {
                "unknown".to_string()
            } else {
                facts.year.to_string()
            };
            println!("  Year:         {}", year);
            println!("  Sex:          {}", facts.sex);
            if !content.key_words.is_empty() {
                println!("  Keywords:     {}", content.key_words.join(", "));
            }
        }
    }

    Ok(())
}
