use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use kqlspl::config::Config;
use kqlspl::{QueryLanguage, QueryTranslator, TableMapping};

/// kqlspl - Translate and explain SPL and KQL queries
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Translate a query between languages (reads stdin when QUERY is omitted)
    Translate {
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
        query: Option<String>,
    },
    /// Translate SPL to KQL
    Spl2kql { query: Option<String> },
    /// Translate KQL to SPL using the table mapping
    Kql2spl { query: Option<String> },
    /// Explain a query step by step
    Explain {
        #[arg(short, long)]
        language: String,
        query: Option<String>,
    },
    /// Show the table mapping, optionally merged with a JSON override file
    Mappings {
        #[arg(long)]
        merge: Option<PathBuf>,
    },
    /// Print Splunk discovery queries for a KQL table
    Discover { table: Option<String> },
    /// Show reference data status
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to stderr so stdout carries only results
    let log_level = if args.debug {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set global default subscriber")?;

    let config = if let Some(config_path) = args.config {
        Config::load_from_file(&config_path)?
    } else {
        Config::load_default()?
    };

    let mut translator = config.build_translator()?;

    match args.command {
        Command::Translate { from, to, query } => {
            let result = translator
                .translate_named(&read_query(query)?, &from, &to)
                .await?;
            print_json(&result)?;
        }
        Command::Spl2kql { query } => {
            let result = translator.translate_spl_to_kql(&read_query(query)?).await?;
            print_json(&result)?;
        }
        Command::Kql2spl { query } => {
            let result = translator.translate_kql_to_spl(&read_query(query)?).await?;
            print_json(&result)?;
        }
        Command::Explain { language, query } => {
            let language: QueryLanguage = language.parse()?;
            let explanation = translator
                .explain_query(&read_query(query)?, language)
                .await?;
            print!("{explanation}");
        }
        Command::Mappings { merge } => {
            if let Some(path) = merge {
                translator.set_table_mapping(TableMapping::load_overrides(&path)?);
            }
            print_json(translator.table_mapping().entries())?;
        }
        Command::Discover { table } => {
            print_json(&translator.generate_discovery_queries(table.as_deref()))?;
        }
        Command::Status => print_status(&translator).await?,
    }

    Ok(())
}

fn read_query(query: Option<String>) -> Result<String> {
    match query {
        Some(query) => Ok(query),
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read query from stdin")?;
            Ok(buffer)
        }
    }
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{json}");
    Ok(())
}

async fn print_status(translator: &QueryTranslator) -> Result<()> {
    let vocabulary = translator.vocabulary().await?;
    print_json(&serde_json::json!({
        "splCommands": vocabulary.spl_len(),
        "kqlOperators": vocabulary.kql_len(),
        "loadedAt": vocabulary.loaded_at(),
        "needsUpdate": translator.needs_update(),
        "mappingEntries": translator.table_mapping().len(),
        "mappingVersion": translator.table_mapping().version(),
    }))
}
