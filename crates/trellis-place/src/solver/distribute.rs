//! Distribution of a length among adjustable regions.

/// Bounds of one adjustable region, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    pub const UNBOUNDED: Self = Self {
        min: 0.0,
        max: f64::INFINITY,
    };

    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn clamp(&self, size: f64) -> f64 {
        let mut result = size.max(self.min);
        if result > self.max {
            result = self.max.max(self.min);
        }
        result
    }
}

/// Share `remaining` among regions bounded by `bounds`.
///
/// Every region starts with an equal share. Regions whose minimum exceeds
/// the share are pegged to it and removed, then regions whose maximum is
/// below the share; the rest re-share what is left. Minimums are always
/// honored before maximums, so a short row overflows instead of violating a
/// minimum.
pub fn distribute(remaining: f64, bounds: &[Bounds]) -> Vec<f64> {
    let mut sizes = vec![0.0; bounds.len()];
    let mut active: Vec<usize> = (0..bounds.len()).collect();
    let mut remaining = remaining;

    while !active.is_empty() {
        let share = remaining / active.len() as f64;

        let (pegged, rest): (Vec<usize>, Vec<usize>) =
            active.iter().partition(|&&i| bounds[i].min > share);
        if !pegged.is_empty() {
            for i in pegged {
                sizes[i] = bounds[i].min;
                remaining -= bounds[i].min;
            }
            active = rest;
            continue;
        }

        let (pegged, rest): (Vec<usize>, Vec<usize>) =
            active.iter().partition(|&&i| bounds[i].max < share);
        if !pegged.is_empty() {
            for i in pegged {
                sizes[i] = bounds[i].max;
                remaining -= bounds[i].max;
            }
            active = rest;
            continue;
        }

        for i in active.drain(..) {
            sizes[i] = share;
        }
    }

    sizes
}

/// Lay `sizes` end to end from `start`, separated by `gaps[i]` after entry
/// `i`. Sub-pixel remainders carry forward so the rounded spans tile
/// without drift. Returns `(start, length)` per entry.
pub fn assign_spans(start: i32, sizes: &[f64], gaps: &[f64]) -> Vec<(i32, i32)> {
    let mut cursor = start as f64;
    let mut spans = Vec::with_capacity(sizes.len());
    for (i, size) in sizes.iter().enumerate() {
        let begin = cursor.round() as i32;
        let end = (cursor + size.max(0.0)).round() as i32;
        spans.push((begin, (end - begin).max(0)));
        cursor += size.max(0.0);
        cursor += gaps.get(i).copied().unwrap_or(0.0);
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_share() {
        assert_eq!(
            distribute(90.0, &[Bounds::UNBOUNDED; 3]),
            vec![30.0, 30.0, 30.0]
        );
    }

    #[test]
    fn test_min_takes_priority() {
        let sizes = distribute(100.0, &[Bounds::new(80.0, f64::INFINITY), Bounds::UNBOUNDED]);
        assert_eq!(sizes, vec![80.0, 20.0]);
    }

    #[test]
    fn test_max_pegs_and_redistributes() {
        let sizes = distribute(
            300.0,
            &[Bounds::new(0.0, 50.0), Bounds::UNBOUNDED, Bounds::UNBOUNDED],
        );
        assert_eq!(sizes, vec![50.0, 125.0, 125.0]);
    }

    #[test]
    fn test_min_before_max() {
        // Not enough room: the minimum wins and the row overflows.
        let sizes = distribute(
            100.0,
            &[Bounds::new(70.0, 80.0), Bounds::new(60.0, f64::INFINITY)],
        );
        assert_eq!(sizes, vec![70.0, 60.0]);
    }

    #[test]
    fn test_negative_remaining_pegs_to_min() {
        let sizes = distribute(-20.0, &[Bounds::UNBOUNDED, Bounds::new(10.0, 20.0)]);
        assert_eq!(sizes, vec![0.0, 10.0]);
    }

    #[test]
    fn test_spans_carry_remainder() {
        let spans = assign_spans(0, &[100.0 / 3.0; 3], &[]);
        assert_eq!(spans, vec![(0, 33), (33, 34), (67, 33)]);
        let total: i32 = spans.iter().map(|(_, len)| len).sum();
        assert_eq!(total, 100);
    }

    #[test]
    fn test_spans_with_gaps() {
        let spans = assign_spans(10, &[20.0, 20.0], &[5.0]);
        assert_eq!(spans, vec![(10, 20), (35, 20)]);
    }

    #[test]
    fn test_bounds_clamp() {
        let bounds = Bounds::new(10.0, 20.0);
        assert_eq!(bounds.clamp(5.0), 10.0);
        assert_eq!(bounds.clamp(25.0), 20.0);
        assert_eq!(Bounds::new(30.0, 20.0).clamp(25.0), 30.0);
    }
}
