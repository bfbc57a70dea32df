//! Amplify CLI - list tenant data through the gateway as plain-text tables.
//!
//! This is the entry point for the `amplify` binary.

mod client;
mod tables;
mod types;

use clap::{Parser, Subcommand};
use serde::Serialize;

use amplify_table::DataTable;
use client::GatewayClient;

/// Amplify CLI - browse organizations, influencers, campaigns and content.
#[derive(Parser, Debug)]
#[command(name = "amplify")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JWT token for authentication.
    #[arg(long, env = "AMPLIFY_TOKEN")]
    token: String,

    /// Gateway URL.
    #[arg(long, env = "AMPLIFY_GATEWAY", default_value = "http://localhost:8080")]
    gateway: String,

    /// Only show rows where some field contains this text (case-insensitive).
    #[arg(long, short, global = true, default_value = "")]
    search: String,

    /// Enable debug logging.
    #[arg(long, default_value = "false")]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the caller's profile.
    Me,
    /// Make an organization the current one.
    Switch {
        /// Organization ID.
        organization_id: String,
    },
    /// List your organizations.
    Orgs,
    /// List influencers of the current organization.
    Influencers,
    /// List campaigns of the current organization.
    Campaigns,
    /// List the influencers linked to a campaign.
    Links {
        /// Campaign ID.
        campaign_id: String,
    },
    /// Show the content calendar.
    Content {
        /// Only content of this campaign-influencer link.
        #[arg(long)]
        link: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.debug {
        tracing_subscriber::fmt()
            .with_env_filter("amplify_cli=debug,warn")
            .with_writer(std::io::stderr)
            .init();
    }

    let client = GatewayClient::new(&args.gateway, &args.token);
    let search = args.search.as_str();

    match args.command {
        Command::Me => show(tables::profile(vec![client.me().await?]), search),
        Command::Switch { organization_id } => {
            let profile = client.switch_organization(&organization_id).await?;
            show(tables::profile(vec![profile]), search);
        }
        Command::Orgs => show(tables::organizations(client.list_organizations().await?), search),
        Command::Influencers => show(tables::influencers(client.list_influencers().await?), search),
        Command::Campaigns => show(tables::campaigns(client.list_campaigns().await?), search),
        Command::Links { campaign_id } => {
            show(tables::links(client.list_links(&campaign_id).await?), search);
        }
        Command::Content { link } => {
            show(tables::content(client.list_content(link.as_deref()).await?), search);
        }
    }

    Ok(())
}

/// Apply the search term and print the table with a row count.
fn show<T: Serialize>(mut table: DataTable<T>, search: &str) {
    table.set_search(search);
    let rendered = table.render();

    print!("{rendered}");
    if search.is_empty() {
        println!("\n{} rows", rendered.len());
    } else {
        println!("\n{} of {} rows match {search:?}", rendered.len(), table.rows().len());
    }
}
