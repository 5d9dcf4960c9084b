//! Bounded, always-sorted collection of the best candidates.
//!
//! Ties keep the first-seen entry: a new entry lands after every entry with an
//! equal score and never evicts one. Offering a stream in order therefore keeps
//! the top `capacity` entries under (score descending, arrival ascending).

use super::ScoreRecord;

/// Anything the tracker can rank.
pub trait Scored {
    fn score(&self) -> f64;
}

impl Scored for f64 {
    fn score(&self) -> f64 {
        *self
    }
}

impl Scored for ScoreRecord {
    fn score(&self) -> f64 {
        self.score
    }
}

#[derive(Clone, Debug)]
pub struct TopK<T> {
    capacity: usize,
    /// Best first.
    entries: Vec<T>,
}

impl<T: Scored> TopK<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Vec::with_capacity(capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Lowest retained score once full; the bar a newcomer must beat.
    pub fn threshold(&self) -> Option<f64> {
        if self.entries.len() < self.capacity {
            None
        } else {
            self.entries.last().map(Scored::score)
        }
    }

    /// Whether an entry with this score would be retained right now.
    #[inline]
    pub fn would_accept(&self, score: f64) -> bool {
        if score.is_nan() || self.capacity == 0 {
            return false;
        }
        match self.threshold() {
            None => true,
            Some(min) => score > min,
        }
    }

    /// Insert in sorted position; returns whether the entry was retained.
    pub fn offer(&mut self, entry: T) -> bool {
        let score = entry.score();
        if !self.would_accept(score) {
            return false;
        }
        if self.entries.len() == self.capacity {
            self.entries.pop();
        }
        let at = self.entries.partition_point(|e| e.score() >= score);
        self.entries.insert(at, entry);
        true
    }

    /// Offer every entry of `later`, best first. `later` must hold entries
    /// that arrived after this tracker's.
    pub fn merge(mut self, later: TopK<T>) -> Self {
        for entry in later.entries {
            if !self.offer(entry) {
                // Sorted input: nothing after a rejected entry can enter.
                break;
            }
        }
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter()
    }

    pub fn into_vec(self) -> Vec<T> {
        self.entries
    }
}

impl<T: Scored + Clone> TopK<T> {
    /// Best-to-worst copy.
    pub fn snapshot(&self) -> Vec<T> {
        self.entries.clone()
    }
}
