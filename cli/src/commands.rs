use conflux_core::context::config_path;
use conflux_core::{
    CacheStats, Dashboard, DashboardConfig, EventFilter, EventIdx, EventSet, ViewMode,
};
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

use crate::CliContext;
use crate::context::DashboardHandle;

/// Filter flags shared by the query commands. Set flags override the
/// current view state; `--region` replaces the active region set.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Keep events up to and including this year
    #[arg(long)]
    pub year: Option<i32>,
    #[arg(long = "region")]
    pub regions: Vec<String>,
    #[arg(long)]
    pub country: Option<String>,
    #[arg(long)]
    pub faction: Option<String>,
    /// "State-based conflict", "Non-state conflict", "One-sided violence" or "Unknown"
    #[arg(long)]
    pub violence_type: Option<String>,
}

impl FilterArgs {
    pub fn apply(&self, mut filter: EventFilter) -> EventFilter {
        if let Some(year) = self.year {
            filter.year = Some(year);
        }
        if !self.regions.is_empty() {
            filter.regions = self.regions.iter().cloned().collect();
        }
        if let Some(country) = &self.country {
            filter.country = Some(country.clone());
        }
        if let Some(faction) = &self.faction {
            filter.faction = Some(faction.clone());
        }
        if let Some(violence_type) = &self.violence_type {
            filter.violence_type = Some(violence_type.clone());
        }
        filter
    }
}

/// Resolve the view state plus flags into one query.
async fn query(
    ctx: &CliContext,
    args: &FilterArgs,
) -> Result<(DashboardHandle, EventSet), String> {
    let dashboard = ctx.require_dashboard().await?;
    let filter = args.apply(ctx.view.read().await.filter());
    tracing::debug!(key = %filter.canonical_key(), "Running query");
    let events = dashboard.filter(&filter);
    Ok((dashboard, events))
}

pub async fn load(path: &str, ctx: &CliContext) -> Result<(), String> {
    let config = ctx.config.read().await.clone();
    let path = PathBuf::from(path);
    let timer = Instant::now();

    let task_path = path.clone();
    let dashboard = tokio::task::spawn_blocking(move || Dashboard::open(&task_path, config))
        .await
        .map_err(|e| format!("Load task failed: {e}\n"))?
        .map_err(|e| format!("{e}\n"))?;

    let summary = dashboard.summary();
    let dropped = dashboard.store().dropped_rows();
    ctx.set_dashboard(dashboard).await;

    println!(
        "Loaded {} events from {} in {}ms ({} rows dropped)",
        summary.events,
        path.display(),
        timer.elapsed().as_millis(),
        dropped
    );
    println!(
        "{} years, {} regions, {} countries, {} factions",
        summary.years, summary.regions, summary.countries, summary.factions
    );
    Ok(())
}

pub async fn filter(args: &FilterArgs, limit: usize, ctx: &CliContext) -> Result<(), String> {
    let (dashboard, events) = query(ctx, args).await?;
    let casualties: u64 = dashboard
        .store()
        .select(&events)
        .map(|(_, e)| e.casualties())
        .sum();
    println!("{} events, {} casualties", events.len(), casualties);

    let shown: EventSet = events.iter().take(limit).collect();
    print_events(&dashboard, &shown);
    if events.len() > limit {
        println!("... {} more", events.len() - limit);
    }
    Ok(())
}

fn print_events(dashboard: &Dashboard, events: &EventSet) {
    if events.is_empty() {
        return;
    }
    println!(
        "{:<7} {:<10} {:<6} {:<20} {:<24} {:>8}",
        "Index", "Id", "Year", "Country", "Type", "Best"
    );
    println!("{}", "-".repeat(80));
    for record in dashboard.records(events) {
        println!(
            "{:<7} {:<10} {:<6} {:<20} {:<24} {:>8}",
            record.index,
            record.id,
            record.year,
            record.country,
            record.violence_type_name,
            record.best
        );
    }
}

pub async fn countries(args: &FilterArgs, limit: usize, ctx: &CliContext) -> Result<(), String> {
    let (dashboard, events) = query(ctx, args).await?;
    let countries = dashboard.top_countries(&events, limit);
    if countries.is_empty() {
        println!("No matching events");
        return Ok(());
    }

    println!(
        "{:<24} {:<14} {:>8} {:>10} {:>18} {:>9}",
        "Country", "Region", "Events", "Casualties", "Centroid", "Deadliest"
    );
    println!("{}", "-".repeat(88));
    for country in countries {
        let centroid = country
            .coordinates
            .map(|c| format!("{:.2},{:.2}", c.latitude, c.longitude))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<24} {:<14} {:>8} {:>10} {:>18} {:>9}",
            country.name,
            country.region,
            country.total_events,
            country.total_casualties,
            centroid,
            country.deadliest_event.0
        );
    }
    Ok(())
}

pub async fn years(args: &FilterArgs, ctx: &CliContext) -> Result<(), String> {
    let (dashboard, events) = query(ctx, args).await?;
    println!("{:<6} {:>8} {:>10}", "Year", "Events", "Casualties");
    for row in dashboard.aggregate_by_year(&events).iter() {
        println!("{:<6} {:>8} {:>10}", row.year, row.events, row.casualties);
    }
    Ok(())
}

pub async fn months(args: &FilterArgs, ctx: &CliContext) -> Result<(), String> {
    let (dashboard, events) = query(ctx, args).await?;
    let grid = dashboard.aggregate_by_month(&events);

    print!("{:<6}", "Year");
    for month in 1..=12 {
        print!(" {:>7}", month);
    }
    println!();
    for year in grid.chunks(12) {
        if let Some(first) = year.first() {
            print!("{:<6}", first.year);
        }
        for cell in year {
            print!(" {:>7}", cell.casualties);
        }
        println!();
    }
    Ok(())
}

pub async fn seasons(args: &FilterArgs, ctx: &CliContext) -> Result<(), String> {
    let (dashboard, events) = query(ctx, args).await?;
    println!("{:<6} {:>8} {:>10}", "Month", "Events", "Casualties");
    for row in dashboard.aggregate_by_season(&events).iter() {
        println!("{:<6} {:>8} {:>10}", row.month, row.events, row.casualties);
    }
    Ok(())
}

pub async fn violence_types(args: &FilterArgs, ctx: &CliContext) -> Result<(), String> {
    let (dashboard, events) = query(ctx, args).await?;
    println!("{:<24} {:>8} {:>10}", "Type", "Events", "Casualties");
    for row in dashboard.aggregate_by_violence_type(&events).iter() {
        println!(
            "{:<24} {:>8} {:>10}",
            row.violence_type.name(),
            row.events,
            row.casualties
        );
    }
    Ok(())
}

pub async fn regions(args: &FilterArgs, ctx: &CliContext) -> Result<(), String> {
    let (dashboard, events) = query(ctx, args).await?;
    println!(
        "{:<16} {:>8} {:>10} {:>10}",
        "Region", "Events", "Casualties", "Countries"
    );
    for row in dashboard.aggregate_by_region(&events).iter() {
        println!(
            "{:<16} {:>8} {:>10} {:>10}",
            row.region, row.events, row.casualties, row.countries
        );
    }
    Ok(())
}

pub async fn factions(args: &FilterArgs, limit: usize, ctx: &CliContext) -> Result<(), String> {
    let (dashboard, events) = query(ctx, args).await?;
    println!(
        "{:<40} {:>9} {:>10} {:>6} {:>6}",
        "Faction", "Conflicts", "Casualties", "A", "B"
    );
    println!("{}", "-".repeat(75));
    for faction in dashboard.faction_rollup(&events).iter().take(limit) {
        println!(
            "{:<40} {:>9} {:>10} {:>6} {:>6}",
            faction.name,
            faction.conflict_count,
            faction.casualties,
            faction.as_side_a,
            faction.as_side_b
        );
    }
    Ok(())
}

pub async fn graph(
    args: &FilterArgs,
    min_events: usize,
    json: bool,
    ctx: &CliContext,
) -> Result<(), String> {
    let (dashboard, events) = query(ctx, args).await?;
    let graph = dashboard.faction_graph(&events, min_events);
    if json {
        let text = serde_json::to_string_pretty(&graph).map_err(|e| e.to_string())?;
        println!("{text}");
        return Ok(());
    }

    println!("{} nodes, {} links", graph.nodes.len(), graph.links.len());
    for link in &graph.links {
        println!(
            "{} -- {} ({} events, {} casualties)",
            link.source, link.target, link.events, link.casualties
        );
    }
    Ok(())
}

pub async fn top(args: &FilterArgs, n: Option<usize>, ctx: &CliContext) -> Result<(), String> {
    let n = match n {
        Some(n) => n,
        None => ctx.config.read().await.top_n,
    };
    let (dashboard, events) = query(ctx, args).await?;
    let top: EventSet = dashboard.top_events(&events, n).into_iter().collect();
    print_events(&dashboard, &top);
    Ok(())
}

pub async fn overview(args: &FilterArgs, ctx: &CliContext) -> Result<(), String> {
    let (dashboard, events) = query(ctx, args).await?;
    let overview = dashboard.overview(&events);

    println!("Events:      {}", overview.total_events);
    println!(
        "Casualties:  {} (low {}, high {})",
        overview.total_casualties, overview.low_total, overview.high_total
    );
    println!(
        "Breakdown:   side A {}, side B {}, civilians {}, unknown {}",
        overview.breakdown.side_a,
        overview.breakdown.side_b,
        overview.breakdown.civilians,
        overview.breakdown.unknown
    );
    if let (Some(first), Some(last)) = (overview.first_year, overview.last_year) {
        println!("Years:       {first}-{last}");
    }
    println!(
        "Countries:   {}, factions: {}",
        overview.countries, overview.factions
    );
    println!("Mean/event:  {:.1}", overview.mean_casualties);
    if let Some(record) = overview.deadliest_event.and_then(|idx| dashboard.record(idx)) {
        println!(
            "Deadliest:   #{} {} {} ({})",
            record.index, record.country, record.year, record.best
        );
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// View state
// ─────────────────────────────────────────────────────────────────────────────

pub async fn select_country(name: &str, ctx: &CliContext) -> Result<(), String> {
    ctx.view.write().await.select_country(name);
    show_view(ctx).await
}

pub async fn select_faction(name: &str, ctx: &CliContext) -> Result<(), String> {
    ctx.view.write().await.select_faction(name);
    show_view(ctx).await
}

pub async fn select_event(index: u32, ctx: &CliContext) -> Result<(), String> {
    let dashboard = ctx.require_dashboard().await?;
    let record = dashboard
        .record(EventIdx(index))
        .ok_or_else(|| format!("No event at index {index}\n"))?;
    ctx.view.write().await.select_event(index);

    let text = serde_json::to_string_pretty(&record).map_err(|e| e.to_string())?;
    println!("{text}");
    Ok(())
}

pub async fn back(ctx: &CliContext) -> Result<(), String> {
    if !ctx.view.write().await.back() {
        println!("Already at the world view");
    }
    show_view(ctx).await
}

pub async fn set_year(year: Option<i32>, ctx: &CliContext) -> Result<(), String> {
    if let Some(year) = year
        && let Some(dashboard) = ctx.dashboard().await
    {
        let years = dashboard.available_years();
        if let (Some(first), Some(last)) = (years.first(), years.last())
            && (year < *first || year > *last)
        {
            println!("Note: data covers {first}-{last}");
        }
    }
    ctx.view.write().await.year = year;
    show_view(ctx).await
}

pub async fn toggle_region(region: &str, ctx: &CliContext) -> Result<(), String> {
    let active = ctx.view.write().await.toggle_region(region);
    println!("{} {}", if active { "Added" } else { "Removed" }, region);
    show_view(ctx).await
}

pub async fn set_violence_type(name: Option<String>, ctx: &CliContext) -> Result<(), String> {
    ctx.view.write().await.violence_type = name;
    show_view(ctx).await
}

pub async fn show_view(ctx: &CliContext) -> Result<(), String> {
    let view = ctx.view.read().await;
    let mode = match view.mode() {
        ViewMode::World => "world".to_string(),
        ViewMode::Country => format!("country {}", view.selected_country().unwrap_or("-")),
        ViewMode::Faction => format!("faction {}", view.selected_faction().unwrap_or("-")),
        ViewMode::Event => format!(
            "event #{}",
            view.selected_event().map(|i| i.to_string()).unwrap_or_default()
        ),
    };
    println!(
        "View: {} (history {}) filter: {}",
        mode,
        view.history_len(),
        view.filter().canonical_key()
    );
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Cache / config
// ─────────────────────────────────────────────────────────────────────────────

fn print_cache_line(name: &str, stats: &CacheStats) {
    println!(
        "{:<10} {:>4}/{:<4} hits {:<8} misses {:<8} evictions {}",
        name, stats.entries, stats.capacity, stats.hits, stats.misses, stats.evictions
    );
}

pub async fn cache_stats(ctx: &CliContext) -> Result<(), String> {
    let dashboard = ctx.require_dashboard().await?;
    let stats = dashboard.cache_stats();
    print_cache_line("query", &stats.query);
    print_cache_line("aggregate", &stats.aggregate);
    Ok(())
}

pub async fn clear_cache(ctx: &CliContext) -> Result<(), String> {
    let dashboard = ctx.require_dashboard().await?;
    dashboard.clear_cache();
    println!("Caches cleared");
    Ok(())
}

pub async fn show_config(ctx: &CliContext) -> Result<(), String> {
    let config: DashboardConfig = ctx.config.read().await.clone();
    match config_path() {
        Some(path) => println!("Config file: {}", path.display()),
        None => println!("Config file: unavailable"),
    }
    println!(
        "data_path: {}",
        config.data_path.as_deref().unwrap_or("(none)")
    );
    println!("query_cache_capacity: {}", config.query_cache_capacity);
    println!("aggregate_cache_capacity: {}", config.aggregate_cache_capacity);
    println!("cache_policy: {:?}", config.cache_policy);
    println!("top_n: {}", config.top_n);
    Ok(())
}

pub fn exit() -> Result<(), String> {
    write!(std::io::stdout(), "quitting...").map_err(|e| e.to_string())?;
    std::io::stdout().flush().map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_view_filter() {
        let base = EventFilter::new()
            .with_year(2000)
            .with_region("Asia")
            .with_country("Nepal");
        let args = FilterArgs {
            year: Some(2010),
            regions: vec!["Africa".to_string(), "Europe".to_string()],
            ..FilterArgs::default()
        };

        let merged = args.apply(base);
        assert_eq!(merged.year, Some(2010));
        assert_eq!(merged.regions.len(), 2);
        assert!(!merged.regions.contains("Asia"));
        assert_eq!(merged.country.as_deref(), Some("Nepal"));
    }

    #[test]
    fn test_no_flags_keep_view_filter() {
        let base = EventFilter::new().with_faction("FARC");
        assert_eq!(FilterArgs::default().apply(base.clone()), base);
    }
}
