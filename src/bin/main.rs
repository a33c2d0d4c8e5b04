//! prodscope CLI - explore unmapped product tables
//!
//! Usage:
//!   prodscope tables
//!   prodscope columns <table>
//!   prodscope search <term> [--grouped] [--json]
//!   prodscope map <table> [--auto | --clear | --set field=column]
//!   prodscope enable <table>
//!   prodscope disable <table>
//!   prodscope diagnose <table>
//!   prodscope config
//!
//! Examples:
//!   prodscope search 5410000000017
//!   prodscope search "visseuse" --grouped
//!   prodscope map raw_supplier_a --set brand=manu_name

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use prodscope::config::Settings;
use prodscope::logging::{init_logging, LogConfig};
use prodscope::model::{CanonicalField, FieldValue, NormalizedProductRow};
use prodscope::reconcile::{FieldResolution, ProductGroup};
use prodscope::service::{ProductExplorer, QueryOutcome, TableMappingView};

#[derive(Parser)]
#[command(name = "prodscope")]
#[command(about = "Discover, map and search heterogeneous product tables")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Settings file (defaults to PRODSCOPE_CONFIG, ./prodscope.toml, then the user config dir)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List candidate tables and whether they are enabled
    Tables,

    /// List a table's columns in ordinal order
    Columns {
        table: String,
    },

    /// Search every candidate table for a term
    Search {
        term: String,

        /// Group rows that describe the same product
        #[arg(short, long)]
        grouped: bool,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Show or edit a table's column mapping
    Map {
        table: String,

        #[command(flatten)]
        action: MapAction,
    },

    /// Include a table in federated search
    Enable {
        table: String,
    },

    /// Exclude a table from federated search
    Disable {
        table: String,
    },

    /// Show fields with more than one candidate column
    Diagnose {
        table: String,
    },

    /// Print the effective settings
    Config,
}

#[derive(Args)]
#[group(multiple = false)]
struct MapAction {
    /// Merge automatic matches into the stored mapping
    #[arg(long)]
    auto: bool,

    /// Remove every explicit mapping
    #[arg(long)]
    clear: bool,

    /// Map a field to a column; an empty column removes the mapping
    #[arg(long, value_name = "FIELD=COLUMN")]
    set: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(&LogConfig::from_verbosity(cli.verbose)) {
        eprintln!("Warning: logging unavailable: {}", e);
    }

    let settings = match &cli.config {
        Some(path) => Settings::from_file(path),
        None => Settings::load(),
    };
    let settings = match settings {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Commands::Config = cli.command {
        return cmd_config(&settings);
    }

    let explorer = match ProductExplorer::from_settings(&settings) {
        Ok(explorer) => explorer,
        Err(e) => {
            eprintln!("Startup error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        Commands::Tables => cmd_tables(&explorer).await,
        Commands::Columns { table } => cmd_columns(&explorer, &table).await,
        Commands::Search {
            term,
            grouped,
            json,
        } => cmd_search(&explorer, &term, grouped, json).await,
        Commands::Map { table, action } => cmd_map(&explorer, &table, action).await,
        Commands::Enable { table } => cmd_set_enabled(&explorer, &table, true).await,
        Commands::Disable { table } => cmd_set_enabled(&explorer, &table, false).await,
        Commands::Diagnose { table } => cmd_diagnose(&explorer, &table).await,
        Commands::Config => cmd_config(&settings),
    }
}

fn take_outcome<T>(outcome: QueryOutcome<T>) -> Result<T, ExitCode> {
    match (outcome.data, outcome.error) {
        (Some(data), None) => Ok(data),
        (_, Some(error)) => {
            eprintln!("Error: {}", error);
            Err(ExitCode::FAILURE)
        }
        (None, None) => {
            eprintln!("Error: empty response");
            Err(ExitCode::FAILURE)
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error encoding JSON: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn cmd_tables(explorer: &ProductExplorer) -> ExitCode {
    let tables = match take_outcome(explorer.list_tables().await) {
        Ok(tables) => tables,
        Err(code) => return code,
    };

    if tables.is_empty() {
        println!("No candidate tables found.");
        return ExitCode::SUCCESS;
    }

    let enabled = explorer.store().enabled_tables();
    for table in &tables {
        let marker = if enabled.contains(table) { "*" } else { " " };
        println!("{} {}", marker, table);
    }
    if enabled.is_empty() {
        println!();
        println!("No tables enabled: search covers every candidate.");
    }
    ExitCode::SUCCESS
}

async fn cmd_columns(explorer: &ProductExplorer, table: &str) -> ExitCode {
    match take_outcome(explorer.list_columns(table).await) {
        Ok(columns) => {
            for column in columns {
                println!("{}", column);
            }
            ExitCode::SUCCESS
        }
        Err(code) => code,
    }
}

async fn cmd_search(explorer: &ProductExplorer, term: &str, grouped: bool, json: bool) -> ExitCode {
    if grouped {
        let grouped = match take_outcome(explorer.search_grouped(term).await) {
            Ok(grouped) => grouped,
            Err(code) => return code,
        };
        if json {
            return print_json(&grouped);
        }
        print_search_notes(&grouped.result);
        for group in &grouped.groups {
            print_group(group);
        }
        println!("{} group(s)", grouped.groups.len());
        return ExitCode::SUCCESS;
    }

    let result = match take_outcome(explorer.search(term).await) {
        Ok(result) => result,
        Err(code) => return code,
    };
    if json {
        return print_json(&result);
    }
    print_search_notes(&result);
    for row in &result.rows {
        println!("{}", summarize_row(row));
    }
    println!("{} row(s)", result.rows.len());
    ExitCode::SUCCESS
}

fn print_search_notes(result: &prodscope::search::SearchResult) {
    if let Some(mode) = result.mode {
        println!(
            "Searched {} table(s) ({} match)",
            result.tables_searched.len(),
            mode
        );
    }
    if !result.truncated_tables.is_empty() {
        println!("Skipped (table cap): {}", result.truncated_tables.join(", "));
    }
    if !result.failed_tables.is_empty() {
        println!("Skipped (introspection failed): {}", result.failed_tables.join(", "));
    }
}

fn summarize_row(row: &NormalizedProductRow) -> String {
    let parts: Vec<String> = CanonicalField::ALL
        .iter()
        .filter_map(|field| {
            row.get(*field)
                .and_then(FieldValue::display_value)
                .map(|value| format!("{}={}", field, value))
        })
        .collect();
    format!("[{}] {}", row.source_table, parts.join(" "))
}

fn print_group(group: &ProductGroup) {
    let product = group.consolidate();
    println!(
        "{} {} ({} row(s) from {})",
        product.kind,
        product.group_key,
        product.member_count,
        product.source_tables.join(", ")
    );
    for (field, resolution) in &product.fields {
        match resolution {
            FieldResolution::Missing => {}
            FieldResolution::Single(value) => println!("    {:<14} {}", field.as_str(), value),
            FieldResolution::Conflicting(values) => {
                println!("    {:<14} CONFLICT: {}", field.as_str(), values.join(" | "))
            }
        }
    }
}

async fn cmd_map(explorer: &ProductExplorer, table: &str, action: MapAction) -> ExitCode {
    let result = if action.auto {
        explorer.auto_map_table(table).await.map(|added| {
            let names: Vec<&str> = added.iter().map(|f| f.as_str()).collect();
            if names.is_empty() {
                println!("No new fields mapped.");
            } else {
                println!("Mapped: {}", names.join(", "));
            }
        })
    } else if action.clear {
        explorer.clear_mapping(table).await
    } else if let Some(assignment) = action.set {
        let Some((field, column)) = assignment.split_once('=') else {
            eprintln!("Error: expected FIELD=COLUMN, got '{}'", assignment);
            return ExitCode::FAILURE;
        };
        let field = match field.parse::<CanonicalField>() {
            Ok(field) => field,
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::FAILURE;
            }
        };
        let column = column.trim();
        let column = (!column.is_empty()).then(|| column.to_string());
        explorer.set_field_mapping(table, field, column).await
    } else {
        Ok(())
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    match explorer.mapping(table).await {
        Ok(view) => {
            print_mapping(&view);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn print_mapping(view: &TableMappingView) {
    println!("Table: {}", view.table);
    for field in CanonicalField::ALL {
        let column = view.effective.get(&field).map(String::as_str).unwrap_or("-");
        let source = if view.overrides.contains_key(&field) {
            "explicit"
        } else if view.effective.contains_key(&field) {
            "auto"
        } else {
            ""
        };
        println!("  {:<14} {:<24} {}", field.as_str(), column, source);
    }
    if !view.diagnostics.is_empty() {
        println!();
        println!("Ambiguous fields (first candidate wins):");
        for diag in &view.diagnostics {
            println!("  {:<14} {}", diag.field.as_str(), diag.candidates.join(", "));
        }
    }
}

async fn cmd_set_enabled(explorer: &ProductExplorer, table: &str, enabled: bool) -> ExitCode {
    match explorer.set_enabled(table, enabled).await {
        Ok(()) => {
            println!("{} {}", if enabled { "Enabled" } else { "Disabled" }, table);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn cmd_diagnose(explorer: &ProductExplorer, table: &str) -> ExitCode {
    match explorer.diagnose(table).await {
        Ok(diagnostics) if diagnostics.is_empty() => {
            println!("No ambiguous fields in {}", table);
            ExitCode::SUCCESS
        }
        Ok(diagnostics) => {
            for diag in diagnostics {
                println!(
                    "{:<14} chosen: {:<20} candidates: {}",
                    diag.field.as_str(),
                    diag.chosen,
                    diag.candidates.join(", ")
                );
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn cmd_config(settings: &Settings) -> ExitCode {
    let mut shown = settings.clone();
    if !shown.database.password.is_empty() {
        shown.database.password = "********".to_string();
    }
    match toml::to_string_pretty(&shown) {
        Ok(text) => {
            print!("{}", text);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error encoding settings: {}", e);
            ExitCode::FAILURE
        }
    }
}
