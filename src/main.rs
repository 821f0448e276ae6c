use anyhow::{Context, Result};
use ecommerce_dashboard::{
    aggregate::{Dashboard, SellerRfm, DISPLAY_TOP_N},
    cli::{Cli, Commands, RangeArgs},
    filter::resolve_tables,
    parser::load_transactions,
    range::DateRange,
    schema::ALL_TABLES,
    writer::export_to_sqlite,
};
use std::path::Path;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse_args();
    init_logging(&cli);

    match cli.command {
        Commands::Summary { input, range, json } => {
            let dashboard = build_dashboard(&input, &range)?;

            if json {
                let text = serde_json::to_string_pretty(&dashboard)
                    .context("Failed to serialize dashboard")?;
                println!("{}", text);
            } else {
                print_summary(&dashboard);
            }
        }

        Commands::Export {
            input,
            output_db,
            range,
            include,
            exclude,
        } => {
            let start = Instant::now();

            let tables = resolve_tables(include, exclude)?;
            let dashboard = build_dashboard(&input, &range)?;

            let record_count = export_to_sqlite(&dashboard, &output_db, &tables)
                .with_context(|| format!("Failed to export to {:?}", output_db))?;

            let elapsed = start.elapsed();
            println!(
                "Created {:?} ({} records, {}) in {:.1}s",
                output_db,
                record_count,
                dashboard.range,
                elapsed.as_secs_f64()
            );
        }

        Commands::ListTables => {
            println!("Available tables:\n");
            for table in ALL_TABLES {
                println!("  {:<16} {}", table.name, table.description);
            }
        }
    }

    Ok(())
}

fn init_logging(cli: &Cli) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(cli.verbose >= 2)
        .with_writer(std::io::stderr)
        .init();
}

fn build_dashboard(input: &Path, range: &RangeArgs) -> Result<Dashboard> {
    let rows = load_transactions(input)
        .with_context(|| format!("Failed to load transactions from {:?}", input))?;
    let range = DateRange::resolve(range.start, range.end, &rows)?;
    Ok(Dashboard::build(&rows, range))
}

fn print_summary(dashboard: &Dashboard) {
    println!("Dashboard for {}", dashboard.range);

    println!("\nMonthly orders and revenue");
    println!(
        "  Total orders: {}   Total revenue: {:.2}",
        dashboard.monthly.total_orders(),
        dashboard.monthly.total_revenue()
    );
    for row in &dashboard.monthly.rows {
        println!("  {}  {:>8}  {:>14.2}", row.month, row.total_order, row.revenue);
    }

    println!("\nBest performing categories");
    for row in dashboard.categories.best(DISPLAY_TOP_N) {
        println!("  {:<40} {:>8}", row.category, row.total_order);
    }
    println!("\nWorst performing categories");
    for row in dashboard.categories.worst(DISPLAY_TOP_N) {
        println!("  {:<40} {:>8}", row.category, row.total_order);
    }

    println!("\nSellers by RFM");
    if let Some(avg) = dashboard.rfm.averages() {
        println!(
            "  Average recency: {}   frequency: {}   monetary: {}",
            avg.recency, avg.frequency, avg.monetary
        );
    }
    print_sellers("By recency (days)", &dashboard.rfm.top_by_recency(DISPLAY_TOP_N), |r| {
        r.recency.to_string()
    });
    print_sellers("By frequency", &dashboard.rfm.top_by_frequency(DISPLAY_TOP_N), |r| {
        r.frequency.to_string()
    });
    print_sellers("By monetary", &dashboard.rfm.top_by_monetary(DISPLAY_TOP_N), |r| {
        format!("{:.2}", r.monetary)
    });

    println!("\nSales by state");
    if let Some((lat, lng)) = dashboard.states.map_center() {
        println!("  Map center: {:.4}, {:.4}", lat, lng);
    }
    for (rank, row) in dashboard.states.rows.iter().enumerate() {
        println!(
            "  {:>2}. {:<4} {:>8}  {}",
            rank + 1,
            row.state,
            row.total_order,
            format_coords(row.lat, row.lng)
        );
    }

    println!("\nCity heat map ({} cities)", dashboard.cities.len());
    let mut hottest: Vec<_> = dashboard.cities.rows.iter().collect();
    hottest.sort_by(|a, b| b.normalized_order.total_cmp(&a.normalized_order));
    for row in hottest.into_iter().take(DISPLAY_TOP_N) {
        println!(
            "  {:<30} {:<4} {:>8}  {:.3}",
            row.city, row.state, row.total_order, row.normalized_order
        );
    }
}

fn print_sellers(title: &str, rows: &[&SellerRfm], metric: impl Fn(&SellerRfm) -> String) {
    println!("  {}", title);
    for row in rows {
        println!("    {:>4}  {:>12}  {}", row.identifier, metric(*row), row.seller_id);
    }
}

fn format_coords(lat: Option<f64>, lng: Option<f64>) -> String {
    match (lat, lng) {
        (Some(lat), Some(lng)) => format!("{:.4}, {:.4}", lat, lng),
        _ => "-".to_string(),
    }
}
