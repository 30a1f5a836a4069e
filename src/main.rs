// src/main.rs
// =============================================================================
// This is the entry point of the sitemap-scout CLI.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (stderr, so JSON on stdout stays clean)
// 3. Call the matching library operation
// 4. Print the result as a table or as { requestedUrl, totalCount, items }
// 5. Exit with a code (0 = found something, 1 = found nothing, 2 = error)
// =============================================================================

mod cli;

use anyhow::Result;
use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use sitemap_scout::{LinkEntry, ResultSet, SitemapReference, SitemapScout};

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();
    init_logging(cli.options.verbose);

    let scout = SitemapScout::new(cli.options.to_config())?;

    match cli.command {
        Commands::Sitemaps { website_url, json } => {
            if !json {
                println!("🔍 Looking for sitemaps on: {}", website_url);
            }
            let sitemaps = scout.find_all_sitemaps(&website_url).await?;
            let result = ResultSet::new(website_url, sitemaps);
            print_result(&result, json, print_sitemap_table)?;
            Ok(exit_code_for(result.total_count))
        }
        Commands::Links { sitemap_url, json } => {
            if !json {
                println!("🗺️  Reading sitemap: {}", sitemap_url);
            }
            let report = scout.sitemap_report(&sitemap_url).await?;
            if !json && !report.truncations.is_empty() {
                println!(
                    "⚠️  {} nested sitemap(s) not followed:",
                    report.truncations.len()
                );
                for cut in &report.truncations {
                    println!("   {} ({})", cut.url, cut.reason);
                }
            }
            let result = ResultSet::new(sitemap_url, report.links);
            print_result(&result, json, print_link_table)?;
            Ok(exit_code_for(result.total_count))
        }
        Commands::All { website_url, json } => {
            if !json {
                println!("🔍 Collecting every URL of: {}", website_url);
            }
            let links = scout.extract_all_links_from_website(&website_url).await?;
            let result = ResultSet::new(website_url, links);
            print_result(&result, json, print_link_table)?;
            Ok(exit_code_for(result.total_count))
        }
    }
}

// Logs go to stderr. RUST_LOG wins; otherwise warnings only, or debug with -v
fn init_logging(verbose: bool) {
    let default_level = if verbose { "sitemap_scout=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();
}

fn exit_code_for(count: usize) -> i32 {
    if count > 0 {
        0
    } else {
        1
    }
}

// Prints the results either as a table or JSON
fn print_result<T: Serialize>(
    result: &ResultSet<T>,
    json: bool,
    print_table: fn(&[T]),
) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
    } else {
        print_table(&result.items);
        println!();
        println!("📋 Total: {}", result.total_count);
    }
    Ok(())
}

fn print_sitemap_table(sitemaps: &[SitemapReference]) {
    println!("{:<80}", "SITEMAP");
    println!("{}", "=".repeat(80));
    for sitemap in sitemaps {
        println!("{:<80}", sitemap.url);
    }
}

fn print_link_table(links: &[LinkEntry]) {
    println!("{:<60} {:<12} {:<40}", "URL", "LASTMOD", "SOURCE / TEXT");
    println!("{}", "=".repeat(112));

    for link in links {
        let detail = link
            .text
            .as_deref()
            .or(link.source.as_deref())
            .unwrap_or("");
        println!(
            "{:<60} {:<12} {:<40}",
            truncate(&link.url, 57),
            link.lastmod.as_deref().unwrap_or("-"),
            truncate(detail, 37)
        );
    }
}

// Shortens long values for display, on a char boundary
fn truncate(value: &str, max: usize) -> String {
    if value.chars().count() > max {
        let short: String = value.chars().take(max).collect();
        format!("{}...", short)
    } else {
        value.to_string()
    }
}
