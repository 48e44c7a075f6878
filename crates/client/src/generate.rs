//! Synthetic season data.
//!
//! Every season pairs each team with every later team in the list, so `n`
//! teams yield `n * (n - 1) / 2` fixtures. Scores and rare special events
//! are random; the document shape is fixed.
//!
//! Replacing a collection always ends with a full cache invalidation, even
//! when a write fails part-way, so no query is served from a cache that
//! predates the mutation.

use chrono::Utc;
use rand::Rng;
use readthru_core::{Document, DocumentStore, Error, Invalidator};
use serde_json::{Value, json};

pub const PITCH_INVASION: &str = "Pitch Invasion";
pub const EXTRA_TIME: &str = "Extra Time";

/// Scores are drawn from `0..MAX_SCORE`.
const MAX_SCORE: u32 = 3;

/// Builds season documents for a fixed list of teams.
#[derive(Debug, Clone)]
pub struct SeasonGenerator {
    teams: Vec<String>,
}

impl SeasonGenerator {
    pub fn new<I, S>(teams: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { teams: teams.into_iter().map(Into::into).collect() }
    }

    pub fn teams(&self) -> &[String] {
        &self.teams
    }

    pub fn fixtures_per_season(&self) -> usize {
        let n = self.teams.len();
        n * n.saturating_sub(1) / 2
    }

    /// One season document: `{ "Season": n, "Fixtures": [...] }`.
    pub fn season<R: Rng>(&self, season: u32, rng: &mut R) -> Document {
        let mut fixtures = Vec::with_capacity(self.fixtures_per_season());

        for (i, home) in self.teams.iter().enumerate() {
            for away in &self.teams[i + 1..] {
                fixtures.push(fixture(home, away, rng));
            }
        }

        let mut document = Document::new();
        document.insert("Season".into(), Value::from(season));
        document.insert("Fixtures".into(), Value::Array(fixtures));
        document
    }

    /// Seasons `0..seasons`.
    pub fn generate<R: Rng>(&self, seasons: u32, rng: &mut R) -> Vec<Document> {
        (0..seasons).map(|season| self.season(season, rng)).collect()
    }
}

/// A single result, stamped with the time it was generated.
fn fixture<R: Rng>(home: &str, away: &str, rng: &mut R) -> Value {
    let mut fixture = json!({
        "Home Team": home,
        "Away Team": away,
        "Home Score": rng.random_range(0..MAX_SCORE),
        "Away Score": rng.random_range(0..MAX_SCORE),
        "Input Date": Utc::now().to_rfc3339(),
    });
    if let Some(special) = roll_special(rng) {
        fixture["Special"] = Value::from(special);
    }
    fixture
}

/// One roll in 21: 20 is a pitch invasion, 18 or 19 is extra time.
fn roll_special<R: Rng>(rng: &mut R) -> Option<&'static str> {
    match rng.random_range(0..=20) {
        20 => Some(PITCH_INVASION),
        18 | 19 => Some(EXTRA_TIME),
        _ => None,
    }
}

/// Counts from a collection replacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Regeneration {
    pub deleted: u64,
    pub inserted: usize,
    pub invalidated: u64,
}

/// Replace the contents of `collection` with `documents`, then invalidate
/// the cache.
pub async fn replace_collection(
    store: &dyn DocumentStore, invalidator: &Invalidator, collection: &str, documents: Vec<Document>,
) -> Result<Regeneration, Error> {
    let written = write_collection(store, collection, documents).await;
    let invalidated = invalidator.invalidate_cache().await;

    let (deleted, inserted) = match written {
        Ok(counts) => counts,
        Err(e) => {
            if let Err(flush_err) = &invalidated {
                tracing::warn!("cache invalidation after failed regeneration also failed: {}", flush_err);
            }
            return Err(e);
        }
    };
    let invalidated = invalidated?;

    tracing::info!(collection, deleted, inserted, invalidated, "collection regenerated");
    Ok(Regeneration { deleted, inserted, invalidated })
}

async fn write_collection(
    store: &dyn DocumentStore, collection: &str, documents: Vec<Document>,
) -> Result<(u64, usize), Error> {
    let deleted = store.delete_all(collection).await?;
    let mut inserted = 0;
    for document in documents {
        store.insert_one(collection, document).await?;
        inserted += 1;
    }
    Ok((deleted, inserted))
}
