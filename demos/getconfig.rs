//! Run a show command against one or many devices through Netpalm
//!
//! This example walks through:
//! - Submitting a single netmiko job and polling it to completion
//! - Running one command across several hosts as a batch
//! - What failures look like for hosts that cannot be reached
//!
//! # Environment (.env is loaded if present)
//!
//! - `NETPALM_URL` - Base URL of the service
//! - `NETPALM_API_KEY` - API key
//! - `NETPALM_CLI_USER` / `NETPALM_CLI_PASS` - Device login
//! - `NETPALM_HOSTS` - Comma-separated device addresses (default: 192.168.0.1)
//!
//! ```bash
//! RUST_LOG=netpalm_client=info cargo run --example getconfig
//! ```

use netpalm_client::extract::{Extracted, extract_response};
use netpalm_client::{
    ClientConfig, EnvCredentials, Error, HostBatch, NetmikoGetConfig, NetpalmClient,
};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const COMMAND: &str = "show run | i bgp router-id";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let url = std::env::var("NETPALM_URL")?;
    let hosts: Vec<String> = std::env::var("NETPALM_HOSTS")
        .unwrap_or_else(|_| "192.168.0.1".to_string())
        .split(',')
        .map(|h| h.trim().to_string())
        .filter(|h| !h.is_empty())
        .collect();

    let mut config = ClientConfig::new(url);
    config.poll.task_timeout = Some(Duration::from_secs(120));
    let client = NetpalmClient::new(config, EnvCredentials::new())?;

    let template = NetmikoGetConfig::new(COMMAND, "", "cisco_ios").poison(true);

    // 1. One host, one task
    if let Some(first) = hosts.first() {
        println!("== single host: {first}");
        let task_id = client.netmiko_getconfig(&template.for_host(first.as_str())).await?;
        match client.poll_task(&task_id).await {
            Ok(response) => print_result(first, &extract_response(&response, COMMAND)),
            Err(Error::Timeout { timeout, .. }) => {
                println!("{first}: still running after {timeout:?}");
            }
            Err(e) => return Err(e.into()),
        }
    }

    // 2. Every host, submitted together
    println!("== {} hosts", hosts.len());
    let batch = HostBatch::submit(&client, &template, hosts.iter().cloned()).await?;
    for (host, result) in batch.collect(&client, "bgp router-id").await? {
        print_result(&host, &result.result);
    }

    // 3. Hosts that cannot work
    println!("== failing hosts");
    let batch = HostBatch::submit(
        &client,
        &template,
        ["dnsresolutionfailure.please", "127.0.10.10"],
    )
    .await?;
    for (host, result) in batch.collect(&client, "errors").await? {
        println!("{host} [{}]", result.status);
        print_result(&host, &result.result);
    }

    Ok(())
}

fn print_result(host: &str, result: &Extracted) {
    match result {
        Extracted::Output(output) => println!("{host}: {output}"),
        Extracted::Errors(errors) => println!("{host}: error {errors}"),
    }
}
