use super::Vec2;

/// Index of the candidate nearest to `from` by straight-line distance.
///
/// Ties keep the earliest candidate in iteration order, so the result is
/// deterministic for a deterministic ordering. Empty input yields `None`.
pub fn nearest_index<I>(from: Vec2, candidates: I) -> Option<usize>
where
    I: IntoIterator<Item = Vec2>,
{
    let mut best: Option<(usize, f32)> = None;
    for (index, candidate) in candidates.into_iter().enumerate() {
        let distance = from.distance(candidate);
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ if distance.is_nan() => {}
            _ => best = Some((index, distance)),
        }
    }
    best.map(|(index, _)| index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_candidate_set_selects_nothing() {
        assert_eq!(nearest_index(Vec2::ZERO, Vec::new()), None);
    }

    #[test]
    fn picks_closest_candidate() {
        let candidates = [
            Vec2::new(10.0, 0.0),
            Vec2::new(3.0, 4.0),
            Vec2::new(-8.0, 0.0),
        ];
        assert_eq!(nearest_index(Vec2::ZERO, candidates), Some(1));
    }

    #[test]
    fn equidistant_candidates_resolve_to_first() {
        let candidates = [
            Vec2::new(20.0, 0.0),
            Vec2::new(5.0, 0.0),
            Vec2::new(-5.0, 0.0),
        ];
        assert_eq!(nearest_index(Vec2::ZERO, candidates), Some(1));
    }
}
