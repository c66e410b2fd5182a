use std::path::PathBuf;

use chrono::NaiveDate;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use stay_finder::fare::FareResolver;
use stay_finder::lodging::{LodgingConfig, RakutenClient};
use stay_finder::network::Network;
use stay_finder::odpt::{OdptClient, OdptConfig};
use stay_finder::planner::{Planner, PlannerConfig, RankMode, RunRegistry, SearchRequest};
use stay_finder::schedule::{ScheduleCacheConfig, TimetableSchedule};
use stay_finder::snapshot::NetworkSnapshot;
use stay_finder::topology::Topology;
use stay_finder::walking::{OsrmClient, OsrmConfig};

const USAGE: &str =
    "usage: stay-finder <destination> <check-in YYYY-MM-DD> <check-out YYYY-MM-DD> [guests] [price|rating|cospa]";

/// Results logged after the search.
const SHOWN_RESULTS: usize = 10;

type BoxError = Box<dyn std::error::Error>;

fn parse_args() -> Result<(SearchRequest, RankMode), BoxError> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() < 3 {
        return Err(USAGE.into());
    }
    let check_in = NaiveDate::parse_from_str(&args[1], "%Y-%m-%d")?;
    let check_out = NaiveDate::parse_from_str(&args[2], "%Y-%m-%d")?;
    let guests = match args.get(3) {
        Some(g) => g.parse()?,
        None => 1,
    };
    let mode = match args.get(4) {
        Some(m) => m.parse::<RankMode>()?,
        None => RankMode::default(),
    };
    Ok((
        SearchRequest::new(args[0].clone(), check_in, check_out, guests, 1),
        mode,
    ))
}

fn env_or_warn(name: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| {
        warn!("{name} not set");
        String::new()
    })
}

/// Load the network snapshot, or capture one from the live API.
async fn network_snapshot(
    odpt: Option<&OdptClient>,
    path: Option<&PathBuf>,
    config: &PlannerConfig,
) -> Result<NetworkSnapshot, BoxError> {
    if let Some(path) = path
        && path.exists()
    {
        return Ok(NetworkSnapshot::load(path)?);
    }

    let Some(odpt) = odpt else {
        return Err("no network snapshot and no ODPT_API_KEY to fetch one".into());
    };
    let snapshot = NetworkSnapshot::capture(odpt, config.line_delay()).await;
    if let Some(path) = path
        && let Err(e) = snapshot.save(path)
    {
        warn!(error = %e, "failed to save network snapshot");
    }
    Ok(snapshot)
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let (request, mode) = parse_args()?;
    let config = PlannerConfig::default();

    let odpt = match OdptClient::new(OdptConfig::new(env_or_warn("ODPT_API_KEY"))) {
        Ok(client) => Some(client),
        Err(e) => {
            warn!(error = %e, "transit data unavailable, using fallback fares and no schedules");
            None
        }
    };
    let lodging = RakutenClient::new(LodgingConfig::new(env_or_warn("RAKUTEN_APP_ID")))?;
    let walking = OsrmClient::new(OsrmConfig::default())?;

    let snapshot_path = std::env::var_os("STAY_FINDER_SNAPSHOT").map(PathBuf::from);
    let snapshot = network_snapshot(odpt.as_ref(), snapshot_path.as_ref(), &config).await?;

    let network = Network::new(Topology::load(&snapshot, std::time::Duration::ZERO).await);
    network.build(&snapshot, &config.without_line_delay()).await;

    let fares = FareResolver::new(odpt.clone(), config.fallback_fare);
    let schedule = TimetableSchedule::new(odpt, &ScheduleCacheConfig::default());
    let planner = Planner::new(&network, &fares, &lodging, &walking, &schedule, &config);

    let runs = RunRegistry::new();
    let token = runs.start();
    let result = planner
        .search(&request, mode, &token, |s| {
            info!(
                processed = s.processed,
                total = s.total,
                results = s.results.len(),
                "progress"
            );
        })
        .await?;

    for (rank, scored) in result.results.iter().take(SHOWN_RESULTS).enumerate() {
        let c = &scored.candidate;
        info!(
            rank = rank + 1,
            hotel = %c.lodging.name,
            station = %c.group,
            price = c.lodging.price,
            total_cost = c.total_cost,
            minutes = c.travel_minutes(),
            transfers = c.transfers,
            cospa = scored.cospa_index,
            baseline = scored.is_baseline,
            "result"
        );
    }
    if result.results.is_empty() {
        info!(destination = %request.destination, "no lodging found");
    }

    Ok(())
}
