use std::env;
use std::fs::File;

use anyhow::{bail, Context};
use dealflow::config::Config;
use dealflow::matching::build_embedder;
use dealflow::{db, seed};
use tracing::info;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: seed [--companies N] [--import path.csv] [--with-theses]";

#[derive(Debug, Default, PartialEq)]
struct Args {
    companies: Option<usize>,
    import: Option<String>,
    with_theses: bool,
}

#[derive(Debug, PartialEq)]
enum Command {
    Help,
    Run(Args),
}

fn parse_args(mut args: impl Iterator<Item = String>) -> anyhow::Result<Command> {
    let mut parsed = Args::default();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--companies" => {
                let value = args.next().context("--companies needs a number")?;
                parsed.companies = Some(value.parse().with_context(|| format!("bad count '{value}'"))?);
            }
            "--import" => {
                parsed.import = Some(args.next().context("--import needs a path")?);
            }
            "--with-theses" => parsed.with_theses = true,
            "-h" | "--help" => return Ok(Command::Help),
            other => bail!("unknown argument '{other}'\n{USAGE}"),
        }
    }
    Ok(Command::Run(parsed))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = match parse_args(env::args().skip(1))? {
        Command::Help => {
            println!("{USAGE}");
            return Ok(());
        }
        Command::Run(args) => args,
    };
    let config = Config::from_env().context("invalid configuration")?;
    let conn = db::connect(&config.database_url)
        .await
        .context("failed to open database")?;
    let embedder = build_embedder(config.embedder, config.model_cache_dir.as_deref())
        .context("failed to load text embedder")?;

    let companies = match &args.import {
        Some(path) => {
            let file = File::open(path).with_context(|| format!("cannot open {path}"))?;
            let companies = seed::read_csv(file)?;
            info!(path = %path, rows = companies.len(), "read catalog CSV");
            companies
        }
        None => seed::generate_catalog(args.companies.unwrap_or(config.seed_companies)),
    };

    let inserted = seed::insert_companies(&conn, embedder.as_ref(), companies).await?;
    info!(inserted, "companies added");

    if args.with_theses {
        let created = seed::insert_sample_theses(&conn).await?;
        info!(created, "sample theses added");
    }

    Ok(())
}
