//! Resources subcommand: inspect the tracked resource table.

use clap::Subcommand;
use seedwave_core::error::Result;
use seedwave_core::Config;

#[derive(Subcommand)]
pub enum ResourcesAction {
    /// List tracked resource keys and the URLs they are fetched from
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: ResourcesAction) -> Result<()> {
    match action {
        ResourcesAction::List { json } => {
            let config = Config::load()?;
            let transport = config.http_transport()?;

            let rows: Vec<(String, String)> = config
                .resources
                .iter()
                .map(|endpoint| {
                    let url = transport
                        .url_for(&endpoint.key)
                        .map(|u| u.to_string())
                        .unwrap_or_default();
                    (endpoint.key.clone(), url)
                })
                .collect();

            if json {
                let out: Vec<serde_json::Value> = rows
                    .iter()
                    .map(|(key, url)| serde_json::json!({ "key": key, "url": url }))
                    .collect();
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                for (key, url) in rows {
                    println!("{key:<24} {url}");
                }
            }
        }
    }
    Ok(())
}
