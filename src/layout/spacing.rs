//! Gap measurement and grid detection.

use std::collections::BTreeMap;

use crate::config::AlignmentConfig;
use crate::types::{ConsistentSpacing, DesignNode, GridPattern, SpacingDirection};

/// Non-negative gaps between consecutive siblings along one axis.
///
/// Siblings are ordered by their leading edge; overlapping pairs produce a
/// negative gap and are skipped.
pub fn measure_gaps(siblings: &[DesignNode], direction: SpacingDirection) -> Vec<f64> {
    let mut boxes: Vec<_> = siblings.iter().map(|n| n.bounding_box).collect();
    match direction {
        SpacingDirection::Horizontal => boxes.sort_by(|a, b| a.x.total_cmp(&b.x)),
        SpacingDirection::Vertical => boxes.sort_by(|a, b| a.y.total_cmp(&b.y)),
    }
    boxes
        .windows(2)
        .map(|pair| match direction {
            SpacingDirection::Horizontal => pair[1].x - pair[0].right(),
            SpacingDirection::Vertical => pair[1].y - pair[0].bottom(),
        })
        .filter(|gap| *gap >= 0.0)
        .collect()
}

fn dominant_bucket(
    gaps: &[f64],
    direction: SpacingDirection,
    config: &AlignmentConfig,
) -> Option<(ConsistentSpacing, usize)> {
    if gaps.is_empty() {
        return None;
    }
    let mut buckets: BTreeMap<i64, usize> = BTreeMap::new();
    for gap in gaps {
        *buckets.entry(gap.round() as i64).or_default() += 1;
    }
    // First maximum wins, so ties go to the smaller gap.
    let (value, count) = buckets
        .into_iter()
        .fold(None, |best: Option<(i64, usize)>, (value, count)| match best {
            Some((_, c)) if c >= count => best,
            _ => Some((value, count)),
        })?;

    let support = count as f64 / gaps.len() as f64;
    (support >= config.spacing_support).then(|| {
        (
            ConsistentSpacing {
                direction,
                value,
                support,
                measured_gaps: gaps.len(),
            },
            count,
        )
    })
}

/// The consistent spacing with more supporting gaps; horizontal wins ties.
pub fn consistent_spacing(
    siblings: &[DesignNode],
    config: &AlignmentConfig,
) -> Option<ConsistentSpacing> {
    let horizontal = dominant_bucket(
        &measure_gaps(siblings, SpacingDirection::Horizontal),
        SpacingDirection::Horizontal,
        config,
    );
    let vertical = dominant_bucket(
        &measure_gaps(siblings, SpacingDirection::Vertical),
        SpacingDirection::Vertical,
        config,
    );
    match (horizontal, vertical) {
        (Some((h, hc)), Some((v, vc))) => Some(if vc > hc { v } else { h }),
        (Some((h, _)), None) => Some(h),
        (None, Some((v, _))) => Some(v),
        (None, None) => None,
    }
}

/// Rows are split wherever consecutive sorted top coordinates jump by more
/// than `row_break`; a grid needs two or more rows of equal length above one.
pub fn detect_grid(siblings: &[DesignNode], config: &AlignmentConfig) -> Option<GridPattern> {
    if siblings.len() < config.grid_min_children {
        return None;
    }
    let mut tops: Vec<f64> = siblings.iter().map(|n| n.bounding_box.y).collect();
    tops.sort_by(f64::total_cmp);

    let mut rows: Vec<usize> = vec![1];
    for pair in tops.windows(2) {
        if pair[1] - pair[0] > config.row_break {
            rows.push(1);
        } else if let Some(last) = rows.last_mut() {
            *last += 1;
        }
    }

    let columns = rows[0];
    let uniform = rows.iter().all(|&count| count == columns);
    (rows.len() >= 2 && columns > 1 && uniform).then_some(GridPattern {
        rows: rows.len(),
        columns,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::rect;

    #[test]
    fn overlapping_pairs_are_not_measured() {
        let siblings = vec![
            rect("a", 0.0, 0.0, 50.0, 10.0),
            rect("b", 40.0, 0.0, 50.0, 10.0),
            rect("c", 100.0, 0.0, 50.0, 10.0),
        ];
        assert_eq!(measure_gaps(&siblings, SpacingDirection::Horizontal), vec![10.0]);
    }

    #[test]
    fn gaps_are_bucketed_to_nearest_pixel() {
        let siblings = vec![
            rect("a", 0.0, 0.0, 10.0, 10.0),
            rect("b", 0.0, 22.4, 10.0, 10.0),
            rect("c", 0.0, 44.6, 10.0, 10.0),
        ];
        let spacing = consistent_spacing(&siblings, &AlignmentConfig::default()).expect("spacing");
        assert_eq!(spacing.direction, SpacingDirection::Vertical);
        assert_eq!(spacing.value, 12);
        assert_eq!(spacing.measured_gaps, 2);
    }

    #[test]
    fn inconsistent_gaps_are_not_reported() {
        let siblings = vec![
            rect("a", 0.0, 0.0, 10.0, 10.0),
            rect("b", 20.0, 0.0, 10.0, 10.0),
            rect("c", 60.0, 0.0, 10.0, 10.0),
            rect("d", 75.0, 0.0, 10.0, 10.0),
        ];
        assert!(consistent_spacing(&siblings, &AlignmentConfig::default()).is_none());
    }

    #[test]
    fn uneven_rows_are_not_a_grid() {
        let siblings = vec![
            rect("a", 0.0, 0.0, 10.0, 10.0),
            rect("b", 20.0, 0.0, 10.0, 10.0),
            rect("c", 40.0, 0.0, 10.0, 10.0),
            rect("d", 0.0, 40.0, 10.0, 10.0),
        ];
        assert!(detect_grid(&siblings, &AlignmentConfig::default()).is_none());
    }

    #[test]
    fn single_row_is_not_a_grid() {
        let siblings: Vec<_> = (0..4)
            .map(|i| rect(&format!("n{i}"), f64::from(i) * 20.0, 0.0, 10.0, 10.0))
            .collect();
        assert!(detect_grid(&siblings, &AlignmentConfig::default()).is_none());
    }
}
