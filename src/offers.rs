use anyhow::{Context, Result};
use rand::Rng;
use rand::seq::SliceRandom;

use crate::models::JobOffer;

/// Offers shown in the board's Offers column before the feed starts.
pub const INITIAL_VISIBLE: usize = 2;

const DATASET: &str = include_str!("../data/job_offers.json");

/// Load the bundled offer dataset. Every offer gets a fresh unique id at
/// deserialization time; dataset records carry none.
pub fn load_offers() -> Result<Vec<JobOffer>> {
    serde_json::from_str(DATASET).context("Failed to parse bundled offer dataset")
}

/// Shuffle the dataset and split it into the initially displayed offers and
/// the pool the feed simulator drains.
pub fn shuffle_split(mut offers: Vec<JobOffer>, rng: &mut impl Rng) -> (Vec<JobOffer>, Vec<JobOffer>) {
    offers.shuffle(rng);
    let pool = offers.split_off(offers.len().min(INITIAL_VISIBLE));
    (offers, pool)
}
