//! Helpers shared by the record lists: sorting, sort indicators and paging.

use std::cmp::Ordering;

/// Types that can be sorted by a named column
pub trait Sortable {
    fn compare_by_field(&self, other: &Self, field: &str) -> Ordering;
}

pub fn sort_list<T: Sortable>(items: &mut [T], field: &str, ascending: bool) {
    items.sort_by(|a, b| {
        let cmp = a.compare_by_field(b, field);
        if ascending {
            cmp
        } else {
            cmp.reverse()
        }
    });
}

/// Case-insensitive string comparison for sort implementations
pub fn cmp_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

/// Float comparison that treats NaN as equal
pub fn cmp_amount(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// Arrow shown next to a column header
pub fn get_sort_indicator(current_field: &str, field: &str, ascending: bool) -> &'static str {
    if current_field == field {
        if ascending {
            " ▲"
        } else {
            " ▼"
        }
    } else {
        " ⇅"
    }
}

pub fn get_sort_class(current_field: &str, field: &str) -> &'static str {
    if current_field == field {
        "table__sort-indicator table__sort-indicator--active"
    } else {
        "table__sort-indicator"
    }
}

/// Number of pages for `total` rows; an empty list still has one page
pub fn page_count(total: usize, page_size: usize) -> usize {
    if total == 0 || page_size == 0 {
        1
    } else {
        total.div_ceil(page_size)
    }
}

/// Clamp `page` into range and cut that page out of `data`.
///
/// Returns the rows and the (possibly corrected) page index.
pub fn page_slice<T: Clone>(data: &[T], page: usize, page_size: usize) -> (Vec<T>, usize) {
    let pages = page_count(data.len(), page_size);
    let page = page.min(pages - 1);
    let start = page * page_size;
    let end = (start + page_size).min(data.len());
    (data.get(start..end).unwrap_or(&[]).to_vec(), page)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Row {
        name: &'static str,
        amount: f64,
    }

    impl Sortable for Row {
        fn compare_by_field(&self, other: &Self, field: &str) -> Ordering {
            match field {
                "amount" => cmp_amount(self.amount, other.amount),
                _ => cmp_text(self.name, other.name),
            }
        }
    }

    #[test]
    fn sorts_both_directions() {
        let mut rows = vec![
            Row { name: "beta", amount: 2.0 },
            Row { name: "Alpha", amount: 3.0 },
            Row { name: "gamma", amount: 1.0 },
        ];
        sort_list(&mut rows, "name", true);
        assert_eq!(rows[0].name, "Alpha");
        sort_list(&mut rows, "amount", false);
        assert_eq!(rows[0].amount, 3.0);
        assert_eq!(rows[2].name, "gamma");
    }

    #[test]
    fn sort_indicators() {
        assert_eq!(get_sort_indicator("name", "name", true), " ▲");
        assert_eq!(get_sort_indicator("name", "name", false), " ▼");
        assert_eq!(get_sort_indicator("name", "amount", true), " ⇅");
        assert!(get_sort_class("name", "name").ends_with("--active"));
    }

    #[test]
    fn paging() {
        assert_eq!(page_count(0, 50), 1);
        assert_eq!(page_count(50, 50), 1);
        assert_eq!(page_count(51, 50), 2);

        let data: Vec<u32> = (1..=7).collect();
        assert_eq!(page_slice(&data, 1, 3), (vec![4, 5, 6], 1));
        assert_eq!(page_slice(&data, 2, 3), (vec![7], 2));
        // past the end snaps to the last page
        assert_eq!(page_slice(&data, 9, 3), (vec![7], 2));
        assert_eq!(page_slice::<u32>(&[], 4, 3), (vec![], 0));
    }
}
