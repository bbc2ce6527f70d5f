use std::cmp::Ordering;

/// Compares dot-separated version strings component by component.
///
/// The shorter version is padded with zero components. Components that do not
/// parse as integers count as `0`, so `"1.x"` compares equal to `"1.0"`.
/// Negative components keep their sign.
pub fn compare_versions(left: &str, right: &str) -> Ordering {
    let left_parts = left.split('.').collect::<Vec<_>>();
    let right_parts = right.split('.').collect::<Vec<_>>();
    let max_parts = left_parts.len().max(right_parts.len());

    for index in 0..max_parts {
        let left_value = left_parts.get(index).map_or(0, |part| component_value(part));
        let right_value = right_parts.get(index).map_or(0, |part| component_value(part));
        match left_value.cmp(&right_value) {
            Ordering::Equal => continue,
            decided => return decided,
        }
    }

    Ordering::Equal
}

fn component_value(part: &str) -> i64 {
    part.trim().parse().unwrap_or(0)
}
