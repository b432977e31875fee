use std::cmp::Ordering;

use crate::collate;
use crate::models::{
    Item, Limit, RankedEntry, Ranking, RatingsDataset, Score, Selection, AGENDA_CATEGORY,
};

/// The score shown for `item` under `category_id`.
///
/// The agenda category is informational and never carries a rank score.
pub fn display_score(item: &Item, category_id: &str) -> Score {
    if category_id == AGENDA_CATEGORY {
        return None;
    }
    item.score(category_id)
}

/// Keep items whose name contains `query`, ignoring case. A blank query keeps all.
pub fn filter<'a>(items: &'a [Item], query: &str) -> Vec<&'a Item> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return items.iter().collect();
    }
    items
        .iter()
        .filter(|item| item.name.to_lowercase().contains(&query))
        .collect()
}

/// Higher scores first; no data after every number.
fn compare_scores(a: Score, b: Score) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Order `items` for `category_id` and cut the result down to `limit`.
///
/// Equal scores fall back to Russian alphabetical order of the name, so the
/// output does not depend on input order. `total` counts every item passed in.
pub fn rank<'a>(items: &[&'a Item], category_id: &str, limit: Limit) -> Ranking<'a> {
    let mut scored: Vec<(&'a Item, Score)> = items
        .iter()
        .map(|&item| (item, display_score(item, category_id)))
        .collect();

    scored.sort_by(|(a, sa), (b, sb)| {
        compare_scores(*sa, *sb).then_with(|| collate::compare(&a.name, &b.name))
    });

    let total = scored.len();
    let entries = limit
        .apply(scored)
        .into_iter()
        .enumerate()
        .map(|(i, (item, score))| RankedEntry {
            position: i + 1,
            item,
            score,
        })
        .collect();

    Ranking { total, entries }
}

/// Index of the month whose calendar number is `requested`.
///
/// Months in a dataset need not be contiguous, so the number is matched
/// against [`MonthRecord::number`](crate::models::MonthRecord) rather than
/// used as a position. No request, or no such month, gives `fallback`.
pub fn month_for(dataset: &RatingsDataset, requested: Option<u32>, fallback: usize) -> usize {
    let Some(number) = requested else {
        return fallback;
    };
    match dataset.months.iter().position(|m| m.number == number) {
        Some(index) => index,
        None => {
            tracing::warn!(month = number, "no such month in the data; showing the default month");
            fallback
        }
    }
}

/// Index of the month `selection` points at, or `fallback` when it is out of range.
pub fn resolve_month(dataset: &RatingsDataset, selection: &Selection, fallback: usize) -> usize {
    if selection.month < dataset.months.len() {
        selection.month
    } else {
        fallback
    }
}

/// Filter and rank the selected month. Empty when the dataset has no such month.
pub fn view<'a>(
    dataset: &'a RatingsDataset,
    selection: &Selection,
    fallback_month: usize,
) -> Ranking<'a> {
    let items = dataset
        .months
        .get(resolve_month(dataset, selection, fallback_month))
        .map(|m| m.items.as_slice())
        .unwrap_or_default();
    let matched = filter(items, &selection.query);
    rank(&matched, &selection.category, selection.limit)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::models::MonthRecord;

    fn item(name: &str, score: Score) -> Item {
        Item {
            name: name.to_string(),
            scores: BTreeMap::from([
                ("consolidated".to_string(), score),
                ("agenda".to_string(), score),
            ]),
        }
    }

    fn names(ranking: &Ranking<'_>) -> Vec<String> {
        ranking.entries.iter().map(|e| e.item.name.clone()).collect()
    }

    fn top(n: usize) -> Limit {
        Limit::Top(n.try_into().unwrap())
    }

    #[test]
    fn test_descending_with_missing_last() {
        let items = vec![
            item("Альфа", Some(1.0)),
            item("Бета", None),
            item("Вега", Some(3.5)),
            item("Гамма", Some(-2.0)),
        ];
        let refs: Vec<&Item> = items.iter().collect();
        let ranking = rank(&refs, "consolidated", Limit::All);
        assert_eq!(names(&ranking), vec!["Вега", "Альфа", "Гамма", "Бета"]);
        assert_eq!(ranking.entries[0].position, 1);
        assert_eq!(ranking.entries[3].score, None);
    }

    #[test]
    fn test_ties_break_by_name_regardless_of_input_order() {
        let forward = vec![
            item("Альфа", Some(10.0)),
            item("Бета", Some(10.0)),
            item("Вега", None),
        ];
        let mut backward = forward.clone();
        backward.reverse();

        for items in [&forward, &backward] {
            let refs: Vec<&Item> = items.iter().collect();
            let ranking = rank(&refs, "consolidated", Limit::All);
            assert_eq!(names(&ranking), vec!["Альфа", "Бета", "Вега"]);
        }
    }

    #[test]
    fn test_agenda_ranks_alphabetically() {
        let items = vec![item("Бета", Some(9.0)), item("Альфа", Some(1.0))];
        let refs: Vec<&Item> = items.iter().collect();
        let ranking = rank(&refs, "agenda", Limit::All);
        assert_eq!(names(&ranking), vec!["Альфа", "Бета"]);
        assert!(ranking.entries.iter().all(|e| e.score.is_none()));
    }

    #[test]
    fn test_unknown_category_is_all_missing() {
        let items = vec![item("Бета", Some(9.0)), item("Альфа", Some(1.0))];
        let refs: Vec<&Item> = items.iter().collect();
        let ranking = rank(&refs, "no-such-category", Limit::All);
        assert_eq!(names(&ranking), vec!["Альфа", "Бета"]);
    }

    #[test]
    fn test_total_counts_before_limit() {
        let items: Vec<Item> = (0..7)
            .map(|i| item(&format!("Вуз {i}"), Some(i as f64)))
            .collect();
        let refs: Vec<&Item> = items.iter().collect();

        let ranking = rank(&refs, "consolidated", top(3));
        assert_eq!(ranking.total, 7);
        assert_eq!(ranking.entries.len(), 3);
        assert_eq!(names(&ranking), vec!["Вуз 6", "Вуз 5", "Вуз 4"]);

        let ranking = rank(&refs, "consolidated", Limit::All);
        assert_eq!(ranking.entries.len(), 7);
    }

    #[test]
    fn test_filter_case_insensitive() {
        let items = vec![
            item("Московский университет", None),
            item("МГТУ им. Баумана", None),
            item("ИТМО", None),
        ];
        let found: Vec<&str> = filter(&items, "мгту").iter().map(|i| i.name.as_str()).collect();
        assert_eq!(found, vec!["МГТУ им. Баумана"]);
        assert_eq!(filter(&items, "МОСК").len(), 1);
        assert_eq!(filter(&items, "").len(), 3);
        assert_eq!(filter(&items, "   ").len(), 3);
        assert!(filter(&items, "СПбГУ").is_empty());
    }

    #[test]
    fn test_view_applies_search_before_total() {
        let dataset = RatingsDataset {
            year: 2026,
            months: vec![MonthRecord {
                name: "Январь".to_string(),
                number: 1,
                items: vec![
                    item("МГУ", Some(5.0)),
                    item("МГТУ", Some(4.0)),
                    item("ИТМО", Some(9.0)),
                ],
            }],
        };
        let selection = Selection {
            category: "consolidated".to_string(),
            limit: top(1),
            query: "мг".to_string(),
            month: 0,
        };
        let ranking = view(&dataset, &selection, 0);
        assert_eq!(ranking.total, 2);
        assert_eq!(names(&ranking), vec!["МГУ"]);
    }

    #[test]
    fn test_view_out_of_range_month_falls_back() {
        let month = |name: &str, who: &str| MonthRecord {
            name: name.to_string(),
            number: 1,
            items: vec![item(who, Some(1.0))],
        };
        let dataset = RatingsDataset {
            year: 2026,
            months: vec![month("Январь", "МГУ"), month("Февраль", "ИТМО")],
        };
        let selection = Selection {
            category: "consolidated".to_string(),
            limit: Limit::All,
            query: String::new(),
            month: 40,
        };
        assert_eq!(names(&view(&dataset, &selection, 1)), vec!["ИТМО"]);
        assert_eq!(view(&RatingsDataset { year: 2026, months: vec![] }, &selection, 0).total, 0);
    }

    #[test]
    fn test_month_matched_by_number_not_position() {
        let month = |name: &str, number: u32, who: &str| MonthRecord {
            name: name.to_string(),
            number,
            items: vec![item(who, Some(1.0))],
        };
        let dataset = RatingsDataset {
            year: 2026,
            months: vec![month("Ноябрь", 11, "МГУ"), month("Декабрь", 12, "ИТМО")],
        };

        assert_eq!(month_for(&dataset, Some(12), 0), 1);
        assert_eq!(month_for(&dataset, Some(11), 1), 0);
        assert_eq!(month_for(&dataset, Some(2), 0), 0);
        assert_eq!(month_for(&dataset, Some(0), 1), 1);
        assert_eq!(month_for(&dataset, None, 1), 1);

        let selection = Selection {
            category: "consolidated".to_string(),
            limit: Limit::All,
            query: String::new(),
            month: month_for(&dataset, Some(12), 0),
        };
        assert_eq!(names(&view(&dataset, &selection, 0)), vec!["ИТМО"]);
    }
}
