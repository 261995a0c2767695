//! Fixed-capacity position history.

use crate::model::geometry::Point;
use std::collections::VecDeque;

/// Number of positions a particle remembers.
pub const TRAIL_LENGTH: usize = 15;

/// FIFO of recent positions; the oldest entry is evicted first.
#[derive(Debug, Clone, Default)]
pub struct Trail {
    points: VecDeque<Point>,
}

impl Trail {
    pub fn new() -> Self {
        Self {
            points: VecDeque::with_capacity(TRAIL_LENGTH + 1),
        }
    }

    pub fn push(&mut self, point: Point) {
        self.points.push_back(point);
        while self.points.len() > TRAIL_LENGTH {
            self.points.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &Point> {
        self.points.iter()
    }
}
