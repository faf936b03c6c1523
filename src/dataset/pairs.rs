//! `pair.txt` view selection files.
//!
//! ```text
//! N
//! <ref id>
//! <k> <id> <score> <id> <score> ...
//! ... (N blocks)
//! ```
//! Candidates are listed best first; only the ids are used.
use crate::error::DatasetError;
use crate::views::ViewSet;
use std::fs;
use std::path::Path;

/// Read a pair file into a [`ViewSet`].
///
/// Each reference keeps its first `max_supporting` candidates (the reference
/// itself is never a candidate). With `include_reference` the reference is
/// placed first in its own list so its estimate takes part in the vote.
pub fn read_pair_file(
    path: &Path,
    max_supporting: usize,
    include_reference: bool,
) -> Result<ViewSet, DatasetError> {
    let text = fs::read_to_string(path).map_err(|e| DatasetError::io(path, e))?;
    parse_pairs(&text, max_supporting, include_reference)
        .map_err(|(line, message)| DatasetError::parse(path, line, message))
}

fn parse_pairs(
    text: &str,
    max_supporting: usize,
    include_reference: bool,
) -> Result<ViewSet, (usize, String)> {
    let lines: Vec<(usize, &str)> = text
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim()))
        .filter(|(_, l)| !l.is_empty())
        .collect();
    let mut lines = lines.into_iter();

    let (line, first) = lines.next().ok_or((0, "empty pair file".to_string()))?;
    let count: usize = first
        .parse()
        .map_err(|_| (line, format!("invalid view count {first:?}")))?;
    // Two lines per view.
    if count > lines.len() / 2 {
        return Err((
            line,
            format!("{count} views declared, file holds at most {}", lines.len() / 2),
        ));
    }

    let mut supporting: Vec<Option<Vec<usize>>> = vec![None; count];
    for _ in 0..count {
        let (line, text) = lines
            .next()
            .ok_or((0, "unexpected end of file".to_string()))?;
        let reference: usize = text
            .parse()
            .map_err(|_| (line, format!("invalid view id {text:?}")))?;
        if reference >= count {
            return Err((line, format!("view id {reference} out of range ({count} views)")));
        }
        if supporting[reference].is_some() {
            return Err((line, format!("view {reference} listed twice")));
        }

        let (line, text) = lines
            .next()
            .ok_or((0, "unexpected end of file".to_string()))?;
        let mut tokens = text.split_whitespace();
        let k: usize = tokens
            .next()
            .and_then(|t| t.parse().ok())
            .ok_or((line, "missing candidate count".to_string()))?;
        let mut candidates = Vec::with_capacity(k);
        for _ in 0..k {
            let id: usize = tokens
                .next()
                .and_then(|t| t.parse().ok())
                .ok_or((line, "invalid candidate id".to_string()))?;
            tokens
                .next()
                .and_then(|t| t.parse::<f64>().ok())
                .ok_or((line, "invalid candidate score".to_string()))?;
            if id >= count {
                return Err((line, format!("candidate {id} out of range ({count} views)")));
            }
            candidates.push(id);
        }

        let mut list = Vec::with_capacity(max_supporting + 1);
        if include_reference {
            list.push(reference);
        }
        list.extend(
            candidates
                .into_iter()
                .filter(|&id| id != reference)
                .take(max_supporting),
        );
        supporting[reference] = Some(list);
    }

    let supporting = supporting
        .into_iter()
        .enumerate()
        .map(|(view, list)| list.ok_or((0, format!("view {view} has no entry"))))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ViewSet::new(supporting))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAIRS: &str = "3
0
2 2 310.5 1 120.0
1
2 0 300.0 2 250.0

2
1 1 90.0
";

    #[test]
    fn keeps_file_order_and_limit() {
        let views = parse_pairs(PAIRS, 1, false).unwrap();
        assert_eq!(views.len(), 3);
        assert_eq!(views.supporting(0), Some(&[2][..]));
        assert_eq!(views.supporting(1), Some(&[0][..]));
    }

    #[test]
    fn reference_goes_first_when_requested() {
        let views = parse_pairs(PAIRS, 10, true).unwrap();
        assert_eq!(views.supporting(0), Some(&[0, 2, 1][..]));
        assert_eq!(views.supporting(2), Some(&[2, 1][..]));
    }

    #[test]
    fn out_of_range_candidate_is_an_error() {
        let err = parse_pairs("1\n0\n1 4 1.0\n", 4, false).unwrap_err();
        assert_eq!(err.0, 3);
        assert!(parse_pairs("2\n0\n0\n", 4, false).is_err());
    }

    #[test]
    fn view_count_beyond_file_length_is_rejected_up_front() {
        let err = parse_pairs("18446744073709551615\n0\n0\n", 4, false).unwrap_err();
        assert_eq!(err.0, 1);
        assert!(err.1.contains("at most 1"));
    }
}
