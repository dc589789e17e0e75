use std::ops::RangeInclusive;
use std::str::FromStr;

use crate::error::HighlightError;

/// 1-based line numbers to mark as highlighted.
///
/// Kept as sorted, non-overlapping ranges so `"1-1000000"` costs one entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HighlightedLines(Vec<RangeInclusive<usize>>);

impl HighlightedLines {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, line: usize) -> bool {
        // Ranges are sorted and disjoint: find the last one starting at or before `line`
        let index = self.0.partition_point(|range| *range.start() <= line);
        index > 0 && self.0[index - 1].contains(&line)
    }

    pub fn insert(&mut self, line: usize) {
        self.insert_range(line..=line);
    }

    /// Add a range, merging it with any it overlaps or touches
    pub fn insert_range(&mut self, range: RangeInclusive<usize>) {
        if range.is_empty() {
            return;
        }
        self.0.push(range);
        self.0.sort_by_key(|range| *range.start());

        let mut merged: Vec<RangeInclusive<usize>> = Vec::with_capacity(self.0.len());
        for range in self.0.drain(..) {
            match merged.last_mut() {
                Some(last) if *range.start() <= last.end().saturating_add(1) => {
                    let end = (*last.end()).max(*range.end());
                    *last = *last.start()..=end;
                }
                _ => merged.push(range),
            }
        }
        self.0 = merged;
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn ranges(&self) -> &[RangeInclusive<usize>] {
        &self.0
    }

    /// Every line in ascending order
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().flat_map(|range| range.clone())
    }
}

impl FromIterator<usize> for HighlightedLines {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        let mut lines = Self::new();
        for line in iter {
            lines.insert(line);
        }
        lines
    }
}

/// Parses `"2,4-6"`; whitespace around items is ignored, an empty string is an empty set
impl FromStr for HighlightedLines {
    type Err = HighlightError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut lines = Self::new();

        for item in s.split(',').map(str::trim).filter(|item| !item.is_empty()) {
            let (start, end) = match item.split_once('-') {
                Some((start, end)) => (parse_line(start)?, parse_line(end)?),
                None => {
                    let line = parse_line(item)?;
                    (line, line)
                }
            };

            if start > end {
                return Err(HighlightError::InvalidLineSpec(format!(
                    "range {} runs backwards",
                    item
                )));
            }
            lines.insert_range(start..=end);
        }

        Ok(lines)
    }
}

fn parse_line(text: &str) -> Result<usize, HighlightError> {
    match text.trim().parse::<usize>() {
        Ok(0) => Err(HighlightError::InvalidLineSpec(
            "line numbers start at 1".to_string(),
        )),
        Ok(line) => Ok(line),
        Err(_) => Err(HighlightError::InvalidLineSpec(format!(
            "{:?} is not a line number",
            text
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_singles_and_ranges() {
        let lines: HighlightedLines = "1, 3-5,9".parse().unwrap();
        assert_eq!(lines.iter().collect::<Vec<_>>(), vec![1, 3, 4, 5, 9]);
    }

    #[test]
    fn empty_spec_is_empty_set() {
        assert!("".parse::<HighlightedLines>().unwrap().is_empty());
        assert!(" , ".parse::<HighlightedLines>().unwrap().is_empty());
    }

    #[test]
    fn rejects_zero_backwards_and_garbage() {
        assert!("0".parse::<HighlightedLines>().is_err());
        assert!("5-3".parse::<HighlightedLines>().is_err());
        assert!("two".parse::<HighlightedLines>().is_err());
        assert!("1-".parse::<HighlightedLines>().is_err());
    }

    #[test]
    fn huge_range_stays_one_entry() {
        let lines: HighlightedLines = format!("1-{}", usize::MAX).parse().unwrap();
        assert_eq!(lines.ranges(), [1..=usize::MAX]);
        assert!(lines.contains(1));
        assert!(lines.contains(20_000_000));
        assert!(lines.contains(usize::MAX));
        assert!(!lines.contains(0));
    }

    #[test]
    fn overlapping_and_adjacent_ranges_merge() {
        let lines: HighlightedLines = "10-20, 2, 15-30, 3-4, 31".parse().unwrap();
        assert_eq!(lines.ranges(), [2..=4, 10..=31]);
        assert!(!lines.contains(5));
        assert!(!lines.contains(9));
        assert!(lines.contains(31));
        assert!(!lines.contains(32));
        assert_eq!(lines, "2-4,10-31".parse::<HighlightedLines>().unwrap());
    }

    #[test]
    fn collects_from_iterator() {
        let lines: HighlightedLines = [2, 2, 7].into_iter().collect();
        assert_eq!(lines.ranges(), [2..=2, 7..=7]);
        assert!(lines.contains(7));
        assert!(!lines.contains(1));
    }
}
