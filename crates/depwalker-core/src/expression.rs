use std::collections::HashSet;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlternativeMode {
    #[default]
    Grouped,
    Expand,
}

impl AlternativeMode {
    pub fn from_expand_flag(expand: bool) -> Self {
        if expand {
            Self::Expand
        } else {
            Self::Grouped
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "names", rename_all = "snake_case")]
pub enum DependencyTerm {
    Single(String),
    AlternativeGroup(Vec<String>),
}

pub fn is_qualified_name(name: &str) -> bool {
    name.contains(':')
}

pub fn parse_dependency_list(raw: &str, mode: AlternativeMode) -> Vec<DependencyTerm> {
    let mut terms = Vec::new();
    for piece in split_pieces(raw) {
        let piece = strip_version_constraints(piece);
        if !piece.contains('|') {
            terms.push(DependencyTerm::Single(piece.trim().to_string()));
            continue;
        }

        let alternatives = piece
            .split('|')
            .map(|name| name.trim().to_string())
            .collect::<Vec<_>>();
        match mode {
            AlternativeMode::Grouped => {
                terms.push(DependencyTerm::AlternativeGroup(alternatives));
            }
            AlternativeMode::Expand => {
                terms.extend(alternatives.into_iter().map(DependencyTerm::Single));
            }
        }
    }

    if mode == AlternativeMode::Expand {
        let mut seen = HashSet::new();
        terms.retain(|term| seen.insert(term.clone()));
    }
    terms
}

pub fn parse_provides_list(raw: &str) -> Vec<String> {
    parse_dependency_list(raw, AlternativeMode::Grouped)
        .into_iter()
        .flat_map(|term| match term {
            DependencyTerm::Single(name) => vec![name],
            DependencyTerm::AlternativeGroup(names) => names,
        })
        .collect()
}

pub fn strip_version_constraints(piece: &str) -> String {
    let mut stripped = String::with_capacity(piece.len());
    let mut rest = piece;
    while let Some(open) = rest.find('(') {
        let Some(close) = rest[open..].find(')') else {
            break;
        };
        stripped.push_str(&rest[..open]);
        rest = &rest[open + close + 1..];
    }
    stripped.push_str(rest);
    stripped.trim().to_string()
}

fn split_pieces(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',')
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
}
