use rand::Rng;
use rand::rngs::StdRng;
use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};
use uuid::Uuid;

use crate::models::JobOffer;

/// How long a freshly added offer keeps its highlight.
pub const HIGHLIGHT_WINDOW: Duration = Duration::from_secs(5);
/// How long addition timestamps are kept for the "added Ns ago" tag.
pub const ADDITION_RETENTION: Duration = Duration::from_secs(60);
/// Delay used while exactly two offers are displayed, so the feed never
/// looks stalled right after startup.
pub const ACCELERATED_DELAY: Duration = Duration::from_secs(2);
const MIN_DELAY_MS: u64 = 5_000;
const MAX_DELAY_MS: u64 = 15_000;

/// Drip-feeds pooled offers into the Offers column on randomized delays.
///
/// The scheduler owns its pool, its next-fire deadline, and its RNG; the UI
/// constructs one and drives it from the tick loop with explicit `now`
/// instants, which also keeps the timing logic testable without sleeping.
/// State machine: idle -> scheduled -> fire -> reschedule while the pool is
/// non-empty, idle once it drains.
pub struct FeedScheduler {
    pool: VecDeque<JobOffer>,
    next_fire: Option<Instant>,
    additions: HashMap<Uuid, Instant>,
    rng: StdRng,
}

impl FeedScheduler {
    pub fn new(pool: Vec<JobOffer>, rng: StdRng) -> Self {
        Self {
            pool: pool.into(),
            next_fire: None,
            additions: HashMap::new(),
            rng,
        }
    }

    pub fn pool_len(&self) -> usize {
        self.pool.len()
    }

    pub fn is_idle(&self) -> bool {
        self.next_fire.is_none()
    }

    /// Arm the next fire. `displayed` is the number of offers currently in
    /// the Offers column; exactly two triggers the accelerated delay.
    pub fn schedule(&mut self, now: Instant, displayed: usize) {
        if self.pool.is_empty() {
            self.next_fire = None;
            return;
        }
        let delay = if displayed == 2 {
            ACCELERATED_DELAY
        } else {
            Duration::from_millis(self.rng.gen_range(MIN_DELAY_MS..=MAX_DELAY_MS))
        };
        self.next_fire = Some(now + delay);
    }

    /// Fire if the deadline has passed: pop the next pooled offer, record
    /// its addition instant, and rearm while the pool is non-empty.
    pub fn poll(&mut self, now: Instant, displayed: usize) -> Option<JobOffer> {
        let deadline = self.next_fire?;
        if now < deadline {
            return None;
        }
        let Some(offer) = self.pool.pop_front() else {
            self.next_fire = None;
            return None;
        };
        self.additions.insert(offer.id, now);
        self.schedule(now, displayed + 1);
        Some(offer)
    }

    pub fn is_highlighted(&self, id: Uuid, now: Instant) -> bool {
        self.additions
            .get(&id)
            .is_some_and(|added| now.saturating_duration_since(*added) < HIGHLIGHT_WINDOW)
    }

    pub fn seconds_since_added(&self, id: Uuid, now: Instant) -> Option<u64> {
        self.additions
            .get(&id)
            .map(|added| now.saturating_duration_since(*added).as_secs())
    }

    /// One-second housekeeping tick: drop addition bookkeeping once an
    /// offer has been on the board longer than the retention window.
    pub fn tick(&mut self, now: Instant) {
        self.additions
            .retain(|_, added| now.saturating_duration_since(*added) <= ADDITION_RETENTION);
    }

    /// Disarm the scheduler (teardown path).
    pub fn cancel(&mut self) {
        self.next_fire = None;
    }
}
