use std::fs;
use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use tracing_subscriber::EnvFilter;

use sofa_rows::bag::RecordBag;
use sofa_rows::lists::{self, ListConversion};
use sofa_rows::schema::{EventsPayload, MatchPayload, SeasonsPayload, TournamentPayload};
use sofa_rows::sink::{self, JsonLinesSink};
use sofa_rows::{ConvertConfig, MatchConverter, PhaseStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputKind {
    Match,
    Events,
    Seasons,
    Tournament,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let input = parse_input_arg().context("missing --input=<payload.json>")?;
    let kind = parse_kind_arg()?;
    let emit_rows = has_flag("--emit");
    let config = ConvertConfig::from_env();

    let raw = fs::read_to_string(&input)
        .with_context(|| format!("read {}", input.display()))?;

    let bag = match kind {
        InputKind::Match => {
            let payload: MatchPayload =
                serde_json::from_str(&raw).context("invalid match payload json")?;
            let conversion = MatchConverter::new(config).convert(&payload)?;
            println!("Match {}", conversion.match_id);
            for (phase, status) in &conversion.phases {
                match status {
                    PhaseStatus::Failed(reason) => println!("  {}: failed ({reason})", phase.name()),
                    other => println!("  {}: {:?}", phase.name(), other),
                }
            }
            if !conversion.skipped.is_empty() {
                println!("Skipped records: {}", conversion.skipped.len());
                for record in conversion.skipped.iter().take(6) {
                    println!("   - {} {}: {}", record.phase.name(), record.entity, record.detail);
                }
            }
            conversion.bag
        }
        InputKind::Events => {
            let payload: EventsPayload =
                serde_json::from_str(&raw).context("invalid events payload json")?;
            report_list(lists::convert_events(&payload, &config)?)
        }
        InputKind::Seasons => {
            let payload: SeasonsPayload =
                serde_json::from_str(&raw).context("invalid seasons payload json")?;
            report_list(lists::convert_seasons(&payload, &config))
        }
        InputKind::Tournament => {
            let payload: TournamentPayload =
                serde_json::from_str(&raw).context("invalid tournament payload json")?;
            report_list(lists::convert_tournament(&payload, &config)?)
        }
    };

    print_counts(&bag);

    let dangling = bag.dangling();
    if !dangling.is_empty() {
        return Err(anyhow!(
            "{} dangling references, first: {}",
            dangling.len(),
            dangling[0]
        ));
    }

    if emit_rows {
        let stdout = io::stdout();
        let mut out = JsonLinesSink::new(stdout.lock());
        let n = sink::emit(&bag, &mut out)?;
        eprintln!("emitted {n} rows");
    }

    Ok(())
}

fn report_list(list: ListConversion) -> RecordBag {
    println!("Converted: {}  skipped: {}", list.converted, list.skipped);
    list.bag
}

fn print_counts(bag: &RecordBag) {
    let stats = bag.dedup_stats();
    println!(
        "Rows: {}  (duplicates collapsed: {}, conflicts: {})",
        bag.row_count(),
        stats.duplicates,
        stats.conflicts
    );
    for (table, n) in bag.counts() {
        if n > 0 {
            println!("  {table:<24} {n}");
        }
    }
}

fn parse_input_arg() -> Option<PathBuf> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    for (idx, arg) in args.iter().enumerate() {
        if let Some(path) = arg.strip_prefix("--input=") {
            let trimmed = path.trim();
            if !trimmed.is_empty() {
                return Some(PathBuf::from(trimmed));
            }
        }
        if arg == "--input"
            && let Some(next) = args.get(idx + 1)
            && !next.trim().is_empty()
        {
            return Some(PathBuf::from(next));
        }
    }
    None
}

fn parse_kind_arg() -> Result<InputKind> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let Some(raw) = args.iter().find_map(|arg| arg.strip_prefix("--kind=")) else {
        return Ok(InputKind::Match);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "match" => Ok(InputKind::Match),
        "events" => Ok(InputKind::Events),
        "seasons" => Ok(InputKind::Seasons),
        "tournament" => Ok(InputKind::Tournament),
        other => Err(anyhow!(
            "unknown --kind={other} (expected match, events, seasons or tournament)"
        )),
    }
}

fn has_flag(flag: &str) -> bool {
    std::env::args().skip(1).any(|arg| arg == flag)
}
