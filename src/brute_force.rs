//! Linear-scan range search.
//!
//! No index at all: every query walks the whole point list. Serves as the
//! correctness oracle and the performance baseline for [`RangeTree`].
//!
//! [`RangeTree`]: crate::RangeTree

use crate::error::{Error, Result};
use crate::{validate_rect, Point, RangeSearch};

/// Range search by direct scan. O(n) per query.
#[derive(Debug, Clone, Default)]
pub struct BruteForce {
    points: Vec<Point>,
    built: bool,
}

impl BruteForce {
    /// Wrap `points`.
    pub fn new(points: Vec<Point>) -> Self {
        Self {
            points,
            built: false,
        }
    }
}

impl RangeSearch for BruteForce {
    fn build(&mut self) {
        self.built = true;
    }

    fn query(&self, bottom_left: Point, top_right: Point) -> Result<Vec<usize>> {
        if !self.built {
            return Err(Error::NotBuilt);
        }
        validate_rect(bottom_left, top_right)?;
        Ok(self
            .points
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_within(bottom_left, top_right))
            .map(|(i, _)| i)
            .collect())
    }

    fn len(&self) -> usize {
        self.points.len()
    }
}
