use std::io::{self, Write};
use std::path::{Path, PathBuf};

use ahash::AHashSet;
use clap::Parser;
use covid_status_rs::case_data::normaliser::{resolve_flag_key, GLOBE_FLAG};
use covid_status_rs::case_data::timestamp::format_last_updated;
use covid_status_rs::config::Settings;
use covid_status_rs::telemetry;
use covid_status_rs::{CaseView, FeedSource, FetchOrchestrator, HttpTransport, SortKey};

#[derive(Parser, Debug)]
#[command(name = "covid-status", version, about = "COVID-19 case counts from SCMP or Bing")]
struct Args {
    /// Settings file (defaults to ./covid-status.toml if present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Feed to start with: scmp or bing
    #[arg(long)]
    source: Option<FeedSource>,

    /// Initial ordering: country, cases, deaths or recovered
    #[arg(long)]
    sort: Option<SortKey>,

    /// Fetch once, print and exit
    #[arg(long)]
    once: bool,

    /// Rows printed by `top` and `--once`
    #[arg(long, default_value_t = 25)]
    limit: usize,
}

// Flag images are looked up by file stem
fn load_flag_names(dir: Option<&Path>) -> AHashSet<String> {
    let Some(dir) = dir else { return AHashSet::new() };
    match std::fs::read_dir(dir) {
        Ok(entries) => entries
            .filter_map(|e| e.ok())
            .filter_map(|e| e.path().file_stem().map(|s| s.to_string_lossy().into_owned()))
            .collect(),
        Err(e) => {
            tracing::warn!(dir = %dir.display(), error = %e, "cannot read flag directory");
            AHashSet::new()
        }
    }
}

fn print_totals(view: &CaseView, flags: &AHashSet<String>) {
    let stamp = view
        .last_updated
        .as_deref()
        .map(|raw| format_last_updated(raw).unwrap_or_else(|| raw.to_string()))
        .unwrap_or_else(|| "never".to_string());

    println!("\n=== Global Cases ===");
    if !flags.is_empty() {
        println!("[{}]", if flags.contains(GLOBE_FLAG) { GLOBE_FLAG } else { "-" });
    }
    println!("Last updated: {} UTC", stamp);
    println!(
        "Cases: {:.0}  Deaths: {:.0}  Recovered: {:.0}",
        view.totals.cases, view.totals.deaths, view.totals.recovered
    );
    if let Some(err) = &view.last_error {
        println!("Last fetch failed: {} (showing previous data)", err);
    }
    println!("====================\n");
}

fn print_records(view: &CaseView, limit: usize, flags: &AHashSet<String>) {
    println!("Status of Individual Countries ({}) sorted by {}", view.records.len(), view.sort_key);
    for record in view.records.iter().take(limit) {
        let flag = if flags.is_empty() { String::new() } else { format!(" [{}]", resolve_flag_key(&record.country, flags)) };
        println!(
            "  {:<32}{} cases {:>10.0}  deaths {:>8.0}  recovered {:>10.0}",
            record.country, flag, record.cases, record.deaths, record.recovered
        );
    }
    if view.records.len() > limit {
        println!("  ... {} more", view.records.len() - limit);
    }
}

fn print_footer(view: &CaseView) {
    let data = view.data_source.map(|s| s.label()).unwrap_or("none");
    println!("Data Source: {} | next refresh: {}", data, view.active_source.label());
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok(); // load .env

    let args = Args::parse();
    let settings = Settings::load(args.config.as_deref())?;
    telemetry::init_tracing(&settings.telemetry.log_filter)?;
    telemetry::init_metrics(settings.telemetry.metrics_port)?;

    let transport = HttpTransport::with_options(settings.timeout(), &settings.feeds.user_agent)?;
    let orchestrator = FetchOrchestrator::with_session(
        transport,
        settings.endpoints(),
        args.source.unwrap_or(settings.session.source),
        args.sort.unwrap_or(settings.session.sort),
    );
    let flags = load_flag_names(settings.display.flag_dir.as_deref());

    if let Err(e) = orchestrator.refresh().await {
        eprintln!("Fetch failed: {}", e);
    }
    let view = orchestrator.view();
    print_totals(&view, &flags);
    print_records(&view, args.limit, &flags);
    print_footer(&view);

    if args.once {
        return Ok(());
    }

    // CLI loop
    loop {
        print!("\ncovid-status> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break; // EOF
        }
        let parts: Vec<&str> = input.split_whitespace().collect();
        let command = parts.first().map(|c| c.to_lowercase()).unwrap_or_default();

        match command.as_str() {
            "help" | "h" => {
                println!("Available commands:");
                println!("  refresh, r             - Fetch the active source again");
                println!("  switch, s              - Toggle between SCMP and Bing, then fetch");
                println!("  source <scmp|bing>     - Select the source for the next refresh");
                println!("  sort <key>             - Order by country, cases, deaths or recovered");
                println!("  top [n]                - Show the first n countries");
                println!("  totals                 - Show global totals");
                println!("  status                 - Show source and loading state");
                println!("  quit, q                - Exit");
            }
            "refresh" | "r" => match orchestrator.refresh().await {
                Ok(outcome) => {
                    println!("✅ {:?}", outcome);
                    print_totals(&orchestrator.view(), &flags);
                }
                Err(e) => println!("❌ Fetch failed: {}", e),
            },
            "switch" | "s" => {
                let source = orchestrator.toggle_source();
                println!("Switched to {}", source.label());
                match orchestrator.refresh().await {
                    Ok(_) => print_totals(&orchestrator.view(), &flags),
                    Err(e) => println!("❌ Fetch failed: {}", e),
                }
            }
            "source" => match parts.get(1).map(|s| s.parse::<FeedSource>()) {
                Some(Ok(source)) => {
                    orchestrator.select_source(source);
                    println!("Next refresh uses {}", source.label());
                }
                Some(Err(e)) => println!("{}", e),
                None => println!("Usage: source <scmp|bing>"),
            },
            "sort" => match parts.get(1).map(|s| s.parse::<SortKey>()) {
                Some(Ok(key)) => {
                    orchestrator.set_sort_key(key);
                    print_records(&orchestrator.view(), args.limit, &flags);
                }
                Some(Err(e)) => println!("{}", e),
                None => println!("Usage: sort <country|cases|deaths|recovered>"),
            },
            "top" => {
                let n = parts.get(1).and_then(|s| s.parse::<usize>().ok()).unwrap_or(args.limit);
                print_records(&orchestrator.view(), n, &flags);
            }
            "totals" => print_totals(&orchestrator.view(), &flags),
            "status" => {
                let view = orchestrator.view();
                print_footer(&view);
                println!("Loading: {} | records: {} | sort: {}", view.loading, view.records.len(), view.sort_key);
                if view.refresh_pending {
                    println!("A queued refresh was interrupted; run `refresh` to fetch again");
                }
            }
            "quit" | "q" | "exit" => {
                println!("Goodbye!");
                break;
            }
            "" => continue,
            _ => {
                println!("Unknown command. Type 'help' for available commands.");
            }
        }
    }

    Ok(())
}
