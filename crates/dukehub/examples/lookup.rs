//! Wires the full service stack against the live Duke APIs and runs one
//! lookup per component.
//!
//! Usage: `cargo run --example lookup -- "Jane Smith"`

use chrono::{Days, Utc};

use dukehub::{Config, Services};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let query = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "Smith".to_string());

    let config = Config::from_env();
    let services = Services::from_config(&config);

    let today = Utc::now().date_naive();
    let week_out = today
        .checked_add_days(Days::new(7))
        .expect("date within chrono range");
    let events = services.events.simplified_events(today, week_out).await?;
    println!("{} events in the next week", events.len());
    for event in events.iter().take(5) {
        println!(
            "  [{}] {}",
            event.local_id,
            event.title.as_deref().unwrap_or("(untitled)")
        );
    }

    let search = services.directory.search(&query).await;
    println!(
        "directory search for {:?}: {} match(es)",
        search.query, search.count
    );

    if let Some(person) = search.results.first() {
        let publications = services.scholars.publications(&person.duid, 5).await;
        println!(
            "publications for {} ({}): {}",
            person.display_name, publications.duid, publications.count
        );
        for publication in &publications.publications {
            println!("  {} ({})", publication.title, publication.year);
        }
    }

    Ok(())
}
