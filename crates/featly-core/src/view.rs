// ── Derived view ──
//
// Client-side filter + sort of a fetched page. Pure functions; the
// controller recomputes on demand from its latest state.

use std::cmp::Ordering;

use crate::filters::{FilterDescriptor, SortDirection, SortKey};
use crate::model::Item;

/// Case-insensitive substring match over title and description.
/// An empty needle matches everything.
pub fn matches_search(item: &Item, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    let needle = needle.to_lowercase();
    item.title.to_lowercase().contains(&needle)
        || item.description.to_lowercase().contains(&needle)
}

/// Ascending comparison of two items by `key`.
pub fn compare_by(key: SortKey, a: &Item, b: &Item) -> Ordering {
    match key {
        SortKey::CreatedAt => a.created_at.cmp(&b.created_at),
        SortKey::Title => a.title.cmp(&b.title),
        SortKey::UpdatedAt => a.updated_at.cmp(&b.updated_at),
    }
}

/// Filter `items` by the descriptor's search text, then sort by its key
/// and direction. The sort is stable: equal keys keep their fetched order
/// in both directions.
pub fn filter_and_sort(items: &[Item], filters: &FilterDescriptor) -> Vec<Item> {
    let mut result: Vec<Item> = items
        .iter()
        .filter(|item| matches_search(item, &filters.search))
        .cloned()
        .collect();

    result.sort_by(|a, b| {
        let ord = compare_by(filters.sort_by, a, b);
        match filters.sort_direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    });

    result
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::ItemId;

    fn item(id: &str, title: &str, description: &str, created: (i32, u32, u32)) -> Item {
        let created_at = Utc
            .with_ymd_and_hms(created.0, created.1, created.2, 0, 0, 0)
            .unwrap();
        Item {
            id: ItemId::from(id),
            title: title.into(),
            description: description.into(),
            created_at,
            updated_at: created_at,
            status: None,
        }
    }

    fn alpha_beta() -> Vec<Item> {
        vec![
            item("1", "Alpha", "first feature", (2023, 1, 1)),
            item("2", "Beta", "second feature", (2023, 2, 1)),
        ]
    }

    fn titles(items: &[Item]) -> Vec<&str> {
        items.iter().map(|i| i.title.as_str()).collect()
    }

    #[test]
    fn default_descriptor_sorts_newest_first() {
        let view = filter_and_sort(&alpha_beta(), &FilterDescriptor::default());
        assert_eq!(titles(&view), vec!["Beta", "Alpha"]);
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let filters = FilterDescriptor {
            search: "alp".into(),
            ..FilterDescriptor::default()
        };
        let view = filter_and_sort(&alpha_beta(), &filters);
        assert_eq!(titles(&view), vec!["Alpha"]);

        let filters = FilterDescriptor {
            search: "SECOND".into(),
            ..FilterDescriptor::default()
        };
        let view = filter_and_sort(&alpha_beta(), &filters);
        assert_eq!(titles(&view), vec!["Beta"]);
    }

    #[test]
    fn empty_input_gives_empty_view_for_any_descriptor() {
        for key in [SortKey::CreatedAt, SortKey::Title, SortKey::UpdatedAt] {
            for direction in [SortDirection::Asc, SortDirection::Desc] {
                let filters = FilterDescriptor {
                    search: "anything".into(),
                    sort_by: key,
                    sort_direction: direction,
                    ..FilterDescriptor::default()
                };
                assert!(filter_and_sort(&[], &filters).is_empty());
            }
        }
    }

    #[test]
    fn empty_search_never_excludes() {
        let items = vec![
            item("1", "", "", (2023, 1, 1)),
            item("2", "Zeta", "last", (2023, 3, 1)),
            item("3", "Eta", "", (2023, 2, 1)),
        ];
        let view = filter_and_sort(&items, &FilterDescriptor::default());
        assert_eq!(view.len(), items.len());
    }

    #[test]
    fn desc_is_reverse_of_asc_for_distinct_keys() {
        let items = vec![
            item("1", "Gamma", "", (2023, 3, 1)),
            item("2", "Alpha", "", (2023, 1, 1)),
            item("3", "Beta", "", (2023, 2, 1)),
        ];
        for key in [SortKey::CreatedAt, SortKey::Title] {
            let asc = filter_and_sort(
                &items,
                &FilterDescriptor {
                    sort_by: key,
                    sort_direction: SortDirection::Asc,
                    ..FilterDescriptor::default()
                },
            );
            let mut desc = filter_and_sort(
                &asc,
                &FilterDescriptor {
                    sort_by: key,
                    sort_direction: SortDirection::Desc,
                    ..FilterDescriptor::default()
                },
            );
            desc.reverse();
            assert_eq!(asc, desc);
        }
    }

    #[test]
    fn ties_keep_fetched_order() {
        let items = vec![
            item("a", "Same", "", (2023, 1, 1)),
            item("b", "Same", "", (2023, 1, 1)),
        ];
        let ids = |v: Vec<Item>| v.into_iter().map(|i| i.id.to_string()).collect::<Vec<_>>();
        for direction in [SortDirection::Asc, SortDirection::Desc] {
            let filters = FilterDescriptor {
                sort_by: SortKey::Title,
                sort_direction: direction,
                ..FilterDescriptor::default()
            };
            assert_eq!(ids(filter_and_sort(&items, &filters)), vec!["a", "b"]);
        }
    }
}
