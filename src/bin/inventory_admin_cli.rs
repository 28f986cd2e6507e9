use std::{str::FromStr, sync::Arc};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{ArgAction, Args, Parser, Subcommand};
use inventory_admin::{
    catalog::{EntityInfo, EntityType},
    config::{self, AppConfig},
    db::{self, DbPool},
    services::{
        catalog::{FieldChoices, ListQuery, Record, RecordPage},
        reports::{SummaryFilter, SummaryReport},
        CatalogService, ReportService,
    },
};
use serde::Serialize;
use serde_json::Value as JsonValue;
use strum::IntoEnumIterator;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // catalog metadata is static; only record commands open the store
    match cli.command {
        Commands::Entities => handle_entities(cli.json)?,
        Commands::Describe(args) => handle_describe(args, cli.json)?,
        Commands::List(args) => {
            let context = CliContext::initialize().await?;
            handle_list(&context, args, cli.json).await?
        }
        Commands::Show(args) => {
            let context = CliContext::initialize().await?;
            handle_show(&context, args, cli.json).await?
        }
        Commands::Filters(args) => {
            let context = CliContext::initialize().await?;
            handle_filters(&context, args, cli.json).await?
        }
        Commands::Summary(args) => {
            let context = CliContext::initialize().await?;
            handle_summary(&context, args, cli.json).await?
        }
    }

    Ok(())
}

#[derive(Parser)]
#[command(
    name = "inventory-admin-cli",
    about = "Browse the inventory catalog from the terminal",
    version
)]
struct Cli {
    #[arg(
        long,
        global = true,
        action = ArgAction::SetTrue,
        help = "Render command output as pretty JSON"
    )]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every catalog entity
    Entities,
    /// Show fields and list/search/filter configuration of an entity
    Describe(EntityArgs),
    /// List records of an entity
    List(ListArgs),
    /// Show one record with references resolved
    Show(ShowArgs),
    /// Show the distinct values of each filterable field
    Filters(EntityArgs),
    /// Stock and transaction summary
    Summary(SummaryArgs),
}

#[derive(Args)]
struct EntityArgs {
    #[arg(value_parser = parse_entity, help = "Entity slug, e.g. product")]
    entity: EntityType,
}

#[derive(Args)]
struct ListArgs {
    #[arg(value_parser = parse_entity, help = "Entity slug, e.g. product")]
    entity: EntityType,
    #[arg(long, help = "Case-insensitive search over searchable fields")]
    q: Option<String>,
    #[arg(
        long = "filter",
        value_parser = parse_filter,
        help = "Exact-match filter as field=value; repeatable"
    )]
    filters: Vec<(String, String)>,
    #[arg(long, help = "List field to order by, '-' prefix for descending")]
    sort: Option<String>,
    #[arg(long)]
    page: Option<u64>,
    #[arg(long)]
    per_page: Option<u64>,
}

#[derive(Args)]
struct ShowArgs {
    #[arg(value_parser = parse_entity, help = "Entity slug, e.g. product")]
    entity: EntityType,
    #[arg(help = "Primary key of the record")]
    id: String,
}

#[derive(Args)]
struct SummaryArgs {
    #[arg(long, help = "Warehouse key")]
    warehouse: Option<String>,
    #[arg(long, help = "Audit session key")]
    audit_session: Option<String>,
    #[arg(long, help = "Inclusive lower bound, RFC 3339")]
    start: Option<DateTime<Utc>>,
    #[arg(long, help = "Inclusive upper bound, RFC 3339")]
    end: Option<DateTime<Utc>>,
}

fn parse_entity(raw: &str) -> Result<EntityType, String> {
    EntityType::from_str(raw).map_err(|_| {
        let known: Vec<String> = EntityType::iter().map(|e| e.to_string()).collect();
        format!("unknown entity '{raw}' (expected one of: {})", known.join(", "))
    })
}

fn parse_filter(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((field, value)) if !field.trim().is_empty() => {
            Ok((field.trim().to_owned(), value.trim().to_owned()))
        }
        _ => Err(format!("expected field=value, got '{raw}'")),
    }
}

struct CliContext {
    catalog: Arc<CatalogService>,
    reports: ReportService,
}

impl CliContext {
    async fn initialize() -> Result<Self> {
        let config: AppConfig =
            config::load_config().context("failed to load application config")?;
        config::init_tracing(config.log_level(), config.log_json);

        let db_pool = db::establish_connection_from_app_config(&config)
            .await
            .context("failed to connect to database")?;
        let db: Arc<DbPool> = Arc::new(db_pool);

        let catalog = Arc::new(CatalogService::new(db.clone(), &config));
        let reports = ReportService::new(db, catalog.clone());

        Ok(Self { catalog, reports })
    }
}

fn handle_entities(json: bool) -> Result<()> {
    let entities: Vec<EntityInfo> = EntityType::iter()
        .map(|entity| EntityInfo::from(entity.descriptor()))
        .collect();

    if json {
        return print_json(&entities);
    }
    for info in &entities {
        println!(
            "- {} ({}) • table {} • {} fields",
            info.entity,
            info.verbose_name_plural,
            info.table,
            info.fields.len()
        );
    }
    Ok(())
}

fn handle_describe(args: EntityArgs, json: bool) -> Result<()> {
    let info = EntityInfo::from(args.entity.descriptor());
    if json {
        return print_json(&info);
    }

    println!("{} ({} / {})", info.entity, info.verbose_name, info.verbose_name_plural);
    println!("table: {}  display: {}", info.table, info.display_field);
    for field in &info.fields {
        let target = field
            .references
            .map(|e| format!(" -> {e}"))
            .unwrap_or_default();
        let nullable = if field.nullable { " (nullable)" } else { "" };
        println!("  {:<16} {:?}{}{}", field.name, field.kind, target, nullable);
    }
    println!("list:       {}", info.list_fields.join(", "));
    println!("searchable: {}", info.searchable_fields.join(", "));
    println!("filterable: {}", info.filterable_fields.join(", "));
    Ok(())
}

async fn handle_list(context: &CliContext, args: ListArgs, json: bool) -> Result<()> {
    let query = ListQuery {
        page: args.page,
        per_page: args.per_page,
        q: args.q,
        sort: args.sort,
        filters: args.filters,
    };
    let page = context
        .catalog
        .list(args.entity, &query)
        .await
        .with_context(|| format!("failed to list {}", args.entity))?;

    if json {
        return print_json(&page);
    }
    render_page(&page);
    Ok(())
}

async fn handle_show(context: &CliContext, args: ShowArgs, json: bool) -> Result<()> {
    let record = context
        .catalog
        .fetch(args.entity, &args.id)
        .await
        .with_context(|| format!("failed to fetch {} '{}'", args.entity, args.id))?;

    if json {
        return print_json(&record);
    }
    render_record(&record);
    Ok(())
}

async fn handle_filters(context: &CliContext, args: EntityArgs, json: bool) -> Result<()> {
    let choices = context
        .catalog
        .filter_choices(args.entity)
        .await
        .with_context(|| format!("failed to load filters of {}", args.entity))?;

    if json {
        return print_json(&choices);
    }
    if choices.is_empty() {
        println!("{} has no filterable fields", args.entity);
    }
    for FieldChoices { field, choices, .. } in &choices {
        println!("{field}:");
        for choice in choices {
            if choice.label == choice.value {
                println!("  - {}", choice.value);
            } else {
                println!("  - {} ({})", choice.label, choice.value);
            }
        }
    }
    Ok(())
}

async fn handle_summary(context: &CliContext, args: SummaryArgs, json: bool) -> Result<()> {
    let filter = SummaryFilter {
        warehouse: args.warehouse,
        audit_session: args.audit_session,
        start: args.start,
        end: args.end,
    };
    let report = context
        .reports
        .summary(&filter)
        .await
        .context("failed to build summary")?;

    if json {
        return print_json(&report);
    }
    render_summary(&report);
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn cell(value: &JsonValue) -> String {
    match value {
        JsonValue::Null => "-".to_owned(),
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn render_page(page: &RecordPage) {
    println!(
        "{} • page {}/{} • {} total",
        page.entity,
        page.page,
        page.total_pages.max(1),
        page.total
    );
    println!("{}", page.columns.join(" | "));
    for record in &page.records {
        let row: Vec<String> = record.fields.iter().map(|f| cell(&f.value)).collect();
        println!("{}", row.join(" | "));
    }
}

fn render_record(record: &Record) {
    println!("{} {} • {}", record.entity, record.id, record.title);
    for field in &record.fields {
        let dangling = match &field.reference {
            Some(reference) if !reference.found => " (missing)",
            _ => "",
        };
        println!("  {:<16} {}{}", field.name, cell(&field.value), dangling);
    }
}

fn render_summary(report: &SummaryReport) {
    println!(
        "products: {} ({} counted, {} uncounted) • stock {}",
        report.total_products,
        report.counted_products,
        report.uncounted_products,
        report.total_stock
    );
    println!(
        "transactions: {} counts • {} in • {} out • {} other",
        report.total_counts, report.total_ins, report.total_outs, report.total_other
    );
    for record in &report.recent_transactions {
        render_record(record);
    }
}
