use crate::models::scorecard::{Category, Scorecard};

/// Sum of one competitor's scores over every metric. Missing or null slots
/// are skipped; a competitor with nothing countable totals 0.
pub fn total_score(scorecard: &Scorecard, competitor_idx: usize) -> i64 {
    scorecard
        .metrics()
        .filter_map(|metric| metric.scores.get(competitor_idx).copied().flatten())
        .map(i64::from)
        .sum()
}

/// Overwrites every competitor's `score` with its derived total.
pub fn recompute_scores(scorecard: &mut Scorecard) {
    let totals: Vec<i64> = (0..scorecard.competitors.len())
        .map(|idx| total_score(scorecard, idx))
        .collect();

    for (competitor, total) in scorecard.competitors.iter_mut().zip(totals) {
        competitor.score = total;
    }
}

/// Mean of one competitor's scores inside a category, rounded to one decimal.
///
/// Null slots are left out of both sum and count; a category with nothing
/// countable averages 0.
pub fn category_average_of(category: &Category, competitor_idx: usize) -> f64 {
    let (sum, count) = category
        .metrics
        .iter()
        .filter_map(|metric| metric.scores.get(competitor_idx).copied().flatten())
        .fold((0u32, 0u32), |(sum, count), v| (sum + v as u32, count + 1));

    if count == 0 {
        return 0.0;
    }
    round_one_decimal(sum as f64 / count as f64)
}

/// Looks the category up by name. `None` when no category carries that name.
pub fn category_average(
    scorecard: &Scorecard,
    category_name: &str,
    competitor_idx: usize,
) -> Option<f64> {
    scorecard
        .categories
        .iter()
        .find(|category| category.name == category_name)
        .map(|category| category_average_of(category, competitor_idx))
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::scorecard::tests::two_by_one;
    use crate::models::scorecard::{Metric, MAX_COMPETITORS};

    #[test]
    fn totals_follow_the_worked_example() {
        let mut card = two_by_one();
        recompute_scores(&mut card);
        assert_eq!(card.competitors[0].score, 3);
        assert_eq!(card.competitors[1].score, 5);

        card.set_score(0, 0, 0, Some(4)).unwrap();
        recompute_scores(&mut card);
        assert_eq!(card.competitors[0].score, 4);

        card.add_competitor("X", 0, MAX_COMPETITORS).unwrap();
        recompute_scores(&mut card);
        assert_eq!(card.categories[0].metrics[0].scores, vec![Some(4), Some(5), Some(0)]);
        assert_eq!(card.competitors[0].score, 4);
        assert_eq!(card.competitors[2].score, 0);
    }

    #[test]
    fn recompute_is_idempotent_and_overwrites_stale_totals() {
        let mut card = two_by_one();
        card.competitors[0].score = 999;
        recompute_scores(&mut card);
        let first = card.clone();
        recompute_scores(&mut card);
        assert_eq!(card, first);
        assert_eq!(card.competitors[0].score, 3);
    }

    #[test]
    fn nulls_and_short_rows_are_excluded() {
        let mut card = two_by_one();
        card.categories[0].metrics.push(Metric {
            name: "Short".to_string(),
            description: String::new(),
            scores: vec![Some(2)],
        });
        card.categories[0].metrics[0].scores[1] = None;
        assert_eq!(total_score(&card, 0), 5);
        assert_eq!(total_score(&card, 1), 0);
    }

    #[test]
    fn category_average_rounds_to_one_decimal() {
        let mut card = two_by_one();
        card.categories[0].metrics = vec![
            Metric {
                name: "A".to_string(),
                description: String::new(),
                scores: vec![Some(3), Some(4)],
            },
            Metric {
                name: "B".to_string(),
                description: String::new(),
                scores: vec![Some(5), Some(2)],
            },
        ];
        assert_eq!(category_average(&card, "Content", 0), Some(4.0));
        assert_eq!(category_average(&card, "Content", 1), Some(3.0));

        card.categories[0].metrics[0].scores[0] = Some(2);
        card.categories[0].metrics.push(Metric {
            name: "C".to_string(),
            description: String::new(),
            scores: vec![Some(3), None],
        });
        // (2 + 5 + 3) / 3 = 3.333..
        assert_eq!(category_average(&card, "Content", 0), Some(3.3));
        assert_eq!(category_average(&card, "Missing", 0), None);
    }

    #[test]
    fn empty_category_averages_zero() {
        let mut card = two_by_one();
        card.categories[0].metrics.clear();
        assert_eq!(category_average(&card, "Content", 1), Some(0.0));
    }
}
