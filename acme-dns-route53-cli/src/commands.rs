//! Subcommand handlers

use acme_dns_route53_core::{Cancellation, Route53Challenge};
use anyhow::{Context, Result, bail};

use crate::cli::{Command, RecordArgs, SelfTestArgs};

pub async fn run(
    challenge: &Route53Challenge,
    command: Command,
    cancellation: &Cancellation,
) -> Result<()> {
    match command {
        Command::Zones => zones(challenge).await,
        Command::Set(record) => set(challenge, &record, cancellation).await,
        Command::Remove(record) => remove(challenge, &record, cancellation).await,
        Command::Get(record) => get(challenge, &record).await,
        Command::SelfTest(args) => self_test(challenge, &args, cancellation).await,
    }
}

async fn zones(challenge: &Route53Challenge) -> Result<()> {
    let zones = challenge.zones().await.context("Failed to list hosted zones")?;
    for zone in zones {
        println!("{zone}");
    }
    Ok(())
}

async fn set(
    challenge: &Route53Challenge,
    record: &RecordArgs,
    cancellation: &Cancellation,
) -> Result<()> {
    let info = challenge
        .set_with_cancellation(&record.set_args(), cancellation)
        .await
        .with_context(|| format!("Failed to set challenge for {}", record.domain))?;
    println!("{} {}", info.id, info.status.as_str());
    Ok(())
}

async fn remove(
    challenge: &Route53Challenge,
    record: &RecordArgs,
    cancellation: &Cancellation,
) -> Result<()> {
    let info = challenge
        .remove_with_cancellation(&record.set_args(), cancellation)
        .await
        .with_context(|| format!("Failed to remove challenge for {}", record.domain))?;
    println!("{} {}", info.id, info.status.as_str());
    Ok(())
}

async fn get(challenge: &Route53Challenge, record: &RecordArgs) -> Result<()> {
    let found = challenge
        .get(&record.get_args())
        .await
        .with_context(|| format!("Failed to read challenge for {}", record.domain))?;
    match found {
        Some(auth) => {
            println!("{}", auth.dns_authorization);
            Ok(())
        }
        None => bail!("No challenge record for {} with that value", record.dns_host()),
    }
}

/// The full ACME client cycle: the domain's zone must be listed, then for a
/// plain and a wildcard name the record is set, read back, removed and checked
/// gone.
async fn self_test(
    challenge: &Route53Challenge,
    args: &SelfTestArgs,
    cancellation: &Cancellation,
) -> Result<()> {
    let domain = args.domain.trim_end_matches('.');
    challenge.init().await?;

    let zones = challenge.zones().await.context("Failed to list hosted zones")?;
    if !zones
        .iter()
        .any(|zone| zone.trim_end_matches('.').eq_ignore_ascii_case(domain))
    {
        bail!("Hosted zone for {domain} not found in: {}", zones.join(", "));
    }
    tracing::info!("Zone {domain} is listed");

    for name in [domain.to_string(), format!("*.{domain}")] {
        let record = RecordArgs {
            domain: name,
            dns_host: None,
            value: uuid::Uuid::new_v4().simple().to_string(),
            wildcard: false,
        };
        check_cycle(challenge, &record, cancellation)
            .await
            .with_context(|| format!("Self-test failed for {}", record.domain))?;
    }

    println!("PASS");
    Ok(())
}

async fn check_cycle(
    challenge: &Route53Challenge,
    record: &RecordArgs,
    cancellation: &Cancellation,
) -> Result<()> {
    tracing::info!("Setting {} = {}", record.dns_host(), record.value);
    challenge
        .set_with_cancellation(&record.set_args(), cancellation)
        .await?;

    let found = challenge.get(&record.get_args()).await?;
    if found.map(|auth| auth.dns_authorization).as_deref() != Some(record.value.as_str()) {
        // leave nothing behind even when verification fails
        if let Err(e) = challenge
            .remove_with_cancellation(&record.set_args(), cancellation)
            .await
        {
            tracing::warn!("Cleanup of {} failed: {e}", record.dns_host());
        }
        bail!("Record {} was set but could not be read back", record.dns_host());
    }
    tracing::info!("Read back {}", record.dns_host());

    challenge
        .remove_with_cancellation(&record.set_args(), cancellation)
        .await?;
    if challenge.get(&record.get_args()).await?.is_some() {
        bail!("Record {} is still present after removal", record.dns_host());
    }
    tracing::info!("Removed {}", record.dns_host());
    Ok(())
}
