//! Fuzzy lookup of an existing area (location record) for a newly registered device.
//!
//! Zone names and area names are usually typed by the same person, so a weighted
//! edit distance is enough to pair them up. Deletions and substitutions are weighted
//! above insertions because zone names tend to be abbreviations of area names.

use serde::Serialize;

const INSERTION_WEIGHT: usize = 2;
const DELETION_WEIGHT: usize = 3;
const SUBSTITUTION_WEIGHT: usize = 3;

/// Largest distance still accepted as a match. Tuned against the weights above.
///
/// The bound is inclusive (`<=`, not `<`): a candidate at exactly 15 still matches.
pub const MAX_AREA_DISTANCE: usize = 15;

/// An area as held by the host's area registry. Read-only here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocationRecord {
    pub name: String,
    pub normalized_name: String,
    pub aliases: Vec<String>,
}

impl LocationRecord {
    pub fn new(name: impl Into<String>, aliases: Vec<String>) -> Self {
        let name = name.into();
        LocationRecord {
            normalized_name: normalize_name(&name),
            name,
            aliases,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AreaMatch<'a> {
    pub area: &'a LocationRecord,
    pub distance: usize,
}

/// Case folds and strips all whitespace.
///
/// Folding is lowercase plus the full fold of `ß` to `ss`, so "Straße" and
/// "STRASSE" normalise alike.
pub fn normalize_name(name: &str) -> String {
    let mut folded = String::with_capacity(name.len());
    for c in name.chars().filter(|c| !c.is_whitespace()).flat_map(char::to_lowercase) {
        match c {
            'ß' => folded.push_str("ss"),
            c => folded.push(c),
        }
    }
    folded
}

/// Weighted Levenshtein distance from `source` to `target`, using two matrix rows.
pub fn weighted_levenshtein(source: &str, target: &str) -> usize {
    let a: Vec<char> = source.chars().collect();
    let b: Vec<char> = target.chars().collect();

    // Row 0: build each prefix of `b` from the empty string.
    let mut prev: Vec<usize> = (0..=b.len()).map(|j| j * INSERTION_WEIGHT).collect();
    let mut cur: Vec<usize> = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        cur[0] = (i + 1) * DELETION_WEIGHT;
        for (j, cb) in b.iter().enumerate() {
            let deletion = prev[j + 1] + DELETION_WEIGHT;
            let insertion = cur[j] + INSERTION_WEIGHT;
            let substitution = if ca == cb { prev[j] } else { prev[j] + SUBSTITUTION_WEIGHT };
            cur[j + 1] = deletion.min(insertion).min(substitution);
        }
        std::mem::swap(&mut prev, &mut cur);
    }

    // After the final swap the last computed row lives in `prev`.
    prev[b.len()]
}

/// Finds the closest area by name or alias.
///
/// The first record reaching the best distance wins; scanning stops at an exact
/// match. Returns `None` when nothing is within [`MAX_AREA_DISTANCE`].
pub fn find_area<'a>(name: &str, areas: &'a [LocationRecord]) -> Option<AreaMatch<'a>> {
    let target = normalize_name(name);
    let mut best: Option<AreaMatch<'a>> = None;

    'areas: for area in areas {
        let candidates =
            std::iter::once(area.normalized_name.clone()).chain(area.aliases.iter().map(|a| normalize_name(a)));
        for candidate in candidates {
            let distance = weighted_levenshtein(&target, &candidate);
            if distance > MAX_AREA_DISTANCE {
                continue;
            }
            if best.is_none_or(|b| distance < b.distance) {
                best = Some(AreaMatch { area, distance });
                if distance == 0 {
                    break 'areas;
                }
            }
        }
    }

    best
}
