// Weekly snapshot builder - Turns raw per-player stat exports into one weekly file
use crate::domain::observation::RawWeeklyRecord;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Used when a profile cannot be resolved.
pub const FALLBACK_USERNAME: &str = "Herobrine";

const TICKS_PER_HOUR: f64 = 20.0 * 60.0 * 60.0;
const CUSTOM_STATS: &str = "minecraft:custom";

#[async_trait]
pub trait ProfileLookup: Send + Sync {
    /// Resolve a player uuid to a username. `Ok(None)` when the service does
    /// not know the uuid.
    async fn username_for(&self, uuid: &str) -> Result<Option<String>>;
}

#[derive(Debug, Clone)]
pub struct HttpProfileLookup {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct ProfileResponse {
    name: String,
}

impl HttpProfileLookup {
    pub fn new(client: reqwest::Client, base_url: String) -> Self {
        Self { client, base_url }
    }
}

#[async_trait]
impl ProfileLookup for HttpProfileLookup {
    async fn username_for(&self, uuid: &str) -> Result<Option<String>> {
        let url = format!("{}{}", self.base_url, uuid);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("Failed to send profile lookup request")?;

        if !response.status().is_success() {
            tracing::warn!("Profile lookup for {} returned {}", uuid, response.status());
            return Ok(None);
        }

        let profile = response
            .json::<ProfileResponse>()
            .await
            .context("Failed to parse profile lookup response")?;
        Ok(Some(profile.name))
    }
}

#[derive(Debug, Default, Deserialize)]
struct StatsFile {
    #[serde(default)]
    stats: HashMap<String, HashMap<String, f64>>,
}

impl StatsFile {
    fn custom(&self, key: &str) -> f64 {
        self.stats
            .get(CUSTOM_STATS)
            .and_then(|custom| custom.get(key))
            .copied()
            .unwrap_or_default()
    }
}

/// Build one record from a raw stat export.
pub fn record_from_stats(username: String, raw_json: &str) -> Result<RawWeeklyRecord> {
    let stats: StatsFile = serde_json::from_str(raw_json).context("Invalid stats file")?;
    let hours = stats.custom("minecraft:play_time") / TICKS_PER_HOUR;

    Ok(RawWeeklyRecord {
        username,
        total_deaths: stats.custom("minecraft:deaths"),
        total_playtime: (hours * 100.0).round() / 100.0,
        damage_dealt: stats.custom("minecraft:damage_dealt"),
        damage_taken: stats.custom("minecraft:damage_taken"),
    })
}

/// Read every `<uuid>.json` in `raw_dir` and produce the week's records,
/// sorted by username.
pub async fn build_snapshot(raw_dir: &Path, lookup: &dyn ProfileLookup) -> Result<Vec<RawWeeklyRecord>> {
    let mut entries = tokio::fs::read_dir(raw_dir)
        .await
        .with_context(|| format!("Failed to read {}", raw_dir.display()))?;

    let mut records = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if !entry.file_type().await?.is_file() {
            continue;
        }
        let Some(uuid) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };

        let username = match lookup.username_for(uuid).await {
            Ok(Some(name)) => name,
            Ok(None) => FALLBACK_USERNAME.to_string(),
            Err(e) => {
                tracing::warn!("Profile lookup for {} failed: {:#}", uuid, e);
                FALLBACK_USERNAME.to_string()
            }
        };

        let raw = tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let record = record_from_stats(username, &raw)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        tracing::debug!("{} -> {}", uuid, record.username);
        records.push(record);
    }

    records.sort_by(|a, b| a.username.cmp(&b.username));
    Ok(records)
}

pub async fn write_snapshot(path: &Path, records: &[RawWeeklyRecord]) -> Result<()> {
    let json = serde_json::to_string_pretty(records)?;
    tokio::fs::write(path, json)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
