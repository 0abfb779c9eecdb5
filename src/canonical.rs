use std::{
  cmp::Reverse,
  collections::{HashMap, HashSet, hash_map::Entry},
  sync::{Arc, LazyLock},
};

use ahash::RandomState;
use regex::Regex;

use crate::{model::InstitutionRecord, normalize};

/// "X (Y)", where Y names a campus or administrative unit of X.
static PARENTHESIZED_CAMPUS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(.*\S)\s*\(([^)]*)\)\s*$").expect("invalid parenthesized campus regex"));

/// Trailing qualifiers stripped when deriving a base name. Longer phrases
/// first, so "Main Campus" wins over "Campus".
const CAMPUS_QUALIFIERS: [&str; 9] = [
  "main campus",
  "system office",
  "graduate school",
  "medical center",
  "campus",
  "online",
  "extension",
  "center",
  "hospital",
];

/// Terms marking a variant as administrative rather than a campus students
/// actually attend.
const DISQUALIFYING_TERMS: [&str; 8] = ["system office", "online", "extension", "center", "hospital", "medical center", "graduate school only", "administrative"];

/// Ranking weights for variants within a canonical group. Tuned values, kept
/// as-is for compatibility with existing imports.
pub(crate) mod weights {
  pub const EXACT_BASE_NAME: i32 = 50;
  pub const MAIN_CAMPUS: i32 = 15;
  pub const DISQUALIFIER: i32 = -40;
  pub const CONCISE_NAME: i32 = 10;
  pub const CONCISE_MARGIN: usize = 20;
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Canonical {
  pub base_name: String,
  pub campus: Option<String>,
}

/// One spelling of a record, grouped under its base name.
#[derive(Clone, Debug)]
pub(crate) struct CanonicalVariant {
  pub base_name: String,
  pub campus: Option<String>,
  pub score: i32,
  pub record: Arc<InstitutionRecord>,
}

/// Splits a display name into its base name and campus descriptor, stripping
/// one trailing administrative qualifier.
pub(crate) fn canonicalize(name: &str) -> Canonical {
  let name = name.trim();

  let (mut base, campus) = match PARENTHESIZED_CAMPUS.captures(name) {
    Some(caps) => (caps[1].to_string(), Some(caps[2].trim().to_string()).filter(|campus| !campus.is_empty())),
    None => (name.to_string(), None),
  };

  for qualifier in CAMPUS_QUALIFIERS {
    if base.len() > qualifier.len() && base.is_char_boundary(base.len() - qualifier.len()) {
      let (head, tail) = base.split_at(base.len() - qualifier.len());

      if tail.eq_ignore_ascii_case(qualifier) && head.ends_with([' ', '-']) {
        let keep = head.trim_end_matches([' ', '-', ',']).len();

        base.truncate(keep);
        break;
      }
    }
  }

  Canonical { base_name: base.trim().to_string(), campus }
}

/// Ranks how well a record represents the base name it was grouped under.
/// Negative scores are fine; this is a relative ordering, not a probability.
pub(crate) fn score(record: &InstitutionRecord, base_name: &str, campus: Option<&str>) -> i32 {
  let name = record.name.to_lowercase();
  let base = base_name.to_lowercase();
  let campus = campus.map(str::to_lowercase).unwrap_or_default();

  let mut score = 0;

  if name == base {
    score += weights::EXACT_BASE_NAME;
  }

  if name.contains("main campus") || name == base {
    score += weights::MAIN_CAMPUS;
  }

  for term in DISQUALIFYING_TERMS {
    if name.contains(term) || campus.contains(term) {
      score += weights::DISQUALIFIER;
    }
  }

  if record.name.len() < base_name.len() + weights::CONCISE_MARGIN {
    score += weights::CONCISE_NAME;
  }

  score
}

/// Records grouped by lowercased base name, in first-seen order. Within a
/// group, variants are sorted by descending score, dataset order on ties.
pub(crate) struct CanonicalIndex {
  groups: HashMap<String, Vec<CanonicalVariant>, RandomState>,
  order: Vec<String>,
}

impl CanonicalIndex {
  pub fn build(records: &[Arc<InstitutionRecord>]) -> CanonicalIndex {
    let mut index = CanonicalIndex { groups: HashMap::default(), order: Vec::new() };

    for record in records {
      index.add(&record.name, record);

      if let Some(alias) = &record.alias {
        for alias in normalize::split_aliases(alias) {
          index.add(alias, record);
        }
      }
    }

    for variants in index.groups.values_mut() {
      variants.sort_by_key(|variant| Reverse(variant.score));
    }

    index
  }

  fn add(&mut self, spelling: &str, record: &Arc<InstitutionRecord>) {
    let Canonical { base_name, campus } = canonicalize(spelling);

    if base_name.is_empty() {
      return;
    }

    let score = score(record, &base_name, campus.as_deref());

    let variants = match self.groups.entry(base_name.to_lowercase()) {
      Entry::Occupied(entry) => entry.into_mut(),
      Entry::Vacant(entry) => {
        self.order.push(entry.key().clone());
        entry.insert(Vec::new())
      }
    };

    variants.push(CanonicalVariant { base_name, campus, score, record: record.clone() });
  }

  pub fn groups(&self) -> impl Iterator<Item = (&str, &[CanonicalVariant])> {
    self.order.iter().map(|key| (key.as_str(), self.groups[key].as_slice()))
  }

  pub fn len(&self) -> usize {
    self.order.len()
  }
}

/// Collapses a group to one variant per physical institution, keeping the
/// best-ranked spelling of each.
pub(crate) fn distinct_institutions(variants: &[CanonicalVariant]) -> Vec<&CanonicalVariant> {
  let mut seen: HashSet<u32, RandomState> = HashSet::default();

  variants.iter().filter(|variant| seen.insert(variant.record.id)).collect()
}
