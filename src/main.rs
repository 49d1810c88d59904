mod client;
mod duration;
mod error;
mod events;
mod model;
mod parser;
mod schedule;
mod text;

use anyhow::Context;
use chrono::{Local, Utc};
use clap::{Parser, Subcommand};

use events::{Event, EventRegistry};
use model::Run;
use schedule::{EntityKind, Schedule};

const USER_AGENT: &str = concat!("gdq_cli/", env!("CARGO_PKG_VERSION"));

#[derive(Parser)]
#[command(name = "gdq_cli", about = "GDQ schedule viewer for the tracker API")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch an event's schedule, optionally filtered
    Runs {
        /// Event short code (e.g. "agdq2021") or numeric id; the latest
        /// known event when omitted
        #[arg(short, long)]
        event: Option<String>,
        /// Keep runs whose runner names contain this text
        #[arg(long)]
        runner: Option<String>,
        /// Keep runs whose host names contain this text
        #[arg(long)]
        host: Option<String>,
        /// Keep runs whose title contains this text
        #[arg(long)]
        title: Option<String>,
        /// Show the category column
        #[arg(long)]
        show_category: bool,
        /// Show the platform column
        #[arg(long)]
        show_platform: bool,
        /// Output format: table or json
        #[arg(long, default_value = "table")]
        format: String,
        /// Scrape the legacy schedule page instead of the API
        #[arg(long)]
        legacy: bool,
    },
    /// Show the next upcoming run of an event
    Next {
        /// Event short code or numeric id; latest known when omitted
        #[arg(short, long)]
        event: Option<String>,
        /// Scrape the legacy schedule page instead of the API
        #[arg(long)]
        legacy: bool,
    },
    /// List known events
    Events,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    let registry = EventRegistry::builtin();

    match cli.command {
        Commands::Runs {
            event,
            runner,
            host,
            title,
            show_category,
            show_platform,
            format,
            legacy,
        } => {
            let ev = resolve_event(&registry, event.as_deref())?;
            let mut schedule = fetch(&ev, legacy).await?;
            if schedule.runs.is_empty() {
                println!("No runs for {} (id {})", ev, ev.id);
                return Ok(());
            }

            // Filters are additive: each narrows what the previous left.
            let filters = [
                (EntityKind::Runner, runner),
                (EntityKind::Host, host),
                (EntityKind::Title, title),
            ];
            for (kind, query) in filters {
                let Some(query) = query else { continue };
                match schedule.for_entity(kind, &query) {
                    Some(filtered) => schedule = filtered,
                    None => {
                        println!("No runs matched the given filters.");
                        return Ok(());
                    }
                }
            }

            match format.as_str() {
                "table" => print_table(&schedule, show_category, show_platform),
                "json" => {
                    let flat: Vec<&Run> = schedule.runs.iter().map(AsRef::as_ref).collect();
                    println!("{}", serde_json::to_string_pretty(&flat)?);
                }
                other => anyhow::bail!("unrecognised value for format: {other}"),
            }
            Ok(())
        }
        Commands::Next { event, legacy } => {
            let ev = resolve_event(&registry, event.as_deref())?;
            let schedule = fetch(&ev, legacy).await?;
            match schedule.next_run(Utc::now()) {
                Some(run) => print_run(run),
                None => println!("No upcoming runs for {} (id {})", ev, ev.id),
            }
            Ok(())
        }
        Commands::Events => {
            for ev in registry.iter() {
                println!("{:>3}  {:<18} {}", ev.id, ev.short, ev);
            }
            Ok(())
        }
    }
}

fn resolve_event(registry: &EventRegistry, arg: Option<&str>) -> anyhow::Result<Event> {
    match arg {
        None => registry
            .latest()
            .cloned()
            .context("the event registry is empty"),
        Some(a) => registry
            .resolve(a)
            .with_context(|| format!("could not find an event matching: {a}")),
    }
}

async fn fetch(ev: &Event, legacy: bool) -> Result<Schedule, error::Error> {
    let http = reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(std::time::Duration::from_secs(30))
        .build()?;
    let client = client::Client::new(http);

    if legacy {
        client.legacy_schedule(ev.id).await
    } else {
        client.schedule(ev.id).await
    }
}

fn print_table(schedule: &Schedule, show_category: bool, show_platform: bool) {
    let mut header = format!(
        "{:<13} | {:<40} | {:<22} | {:<24} | {:<20}",
        "Start", "Title", "Estimate", "Runners", "Hosts"
    );
    if show_category {
        header.push_str(&format!(" | {:<16}", "Category"));
    }
    if show_platform {
        header.push_str(&format!(" | {:<10}", "Platform"));
    }
    println!("{header}");
    println!("{}", "-".repeat(header.len()));

    for run in &schedule.runs {
        let mut line = format!(
            "{:<13} | {:<40} | {:<22} | {:<24} | {:<20}",
            run.start.with_timezone(&Local).format("%b %d %H:%M").to_string(),
            truncate(&run.title, 40),
            run.estimate.to_string(),
            truncate(&run.runner_names(), 24),
            truncate(&run.hosts.join(", "), 20),
        );
        if show_category {
            line.push_str(&format!(" | {:<16}", truncate(&run.category, 16)));
        }
        if show_platform {
            line.push_str(&format!(" | {:<10}", truncate(&run.platform, 10)));
        }
        println!("{line}");
    }

    println!("\n{} runs", schedule.runs.len());
}

fn print_run(run: &Run) {
    println!(
        "{}  {}  (estimate {})",
        run.start.with_timezone(&Local).format("%b %d %H:%M"),
        run.title,
        run.estimate
    );
    if !run.runners.is_empty() {
        println!("  runners: {}", run.runner_names());
    }
    if !run.hosts.is_empty() {
        println!("  hosts:   {}", run.hosts.join(", "));
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}
