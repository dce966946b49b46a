//! Fixed capacity window over the most recent scores
use std::collections::VecDeque;
use std::f32;

#[derive(Debug, Clone)]
/// Keeps the last `capacity` scores, evicting the oldest on overflow
pub struct RollingWindow {
    capacity: usize,
    scores: VecDeque<f32>,
}

impl RollingWindow {
    /// Creates an empty window.  Panics on a zero capacity.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0);
        RollingWindow {
            capacity: capacity,
            scores: VecDeque::with_capacity(capacity),
        }
    }

    /// Adds a score, dropping the oldest one if the window is full
    pub fn push(&mut self, score: f32) -> () {
        if self.scores.len() == self.capacity {
            self.scores.pop_front();
        }
        self.scores.push_back(score);
    }

    /// Mean of the scores in the window.  An empty window averages to -inf.
    pub fn mean(&self) -> f32 {
        if self.scores.is_empty() {
            f32::NEG_INFINITY
        } else {
            self.scores.iter().sum::<f32>() / self.scores.len() as f32
        }
    }

    #[inline]
    /// Number of scores currently held
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    #[inline]
    /// Whether no scores have been pushed yet
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    #[inline]
    /// Maximum number of scores held
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterates from oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &f32> {
        self.scores.iter()
    }
}
