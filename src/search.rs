use std::{
  cmp::Reverse,
  collections::{HashMap, HashSet},
};

use ahash::RandomState;
use serde::Deserialize;
use serde_inline_default::serde_inline_default;
use validator::Validate;

use crate::{
  canonical::{self, CanonicalVariant},
  error::CollegiumError,
  service::CollegeService,
};

pub const DEFAULT_SEARCH_LIMIT: usize = 50;

#[serde_inline_default]
#[derive(Clone, Debug, Deserialize, Validate)]
pub struct SearchParams {
  #[validate(length(min = 1, message = "query must not be empty"))]
  pub query: String,
  #[serde_inline_default(DEFAULT_SEARCH_LIMIT)]
  #[validate(range(min = 1, max = 200, message = "limit must be between 1 and 200"))]
  pub limit: usize,
}

impl CollegeService {
  /// Autocomplete over canonical institution groups: matching groups are
  /// collapsed to one entry per institution, ranked, truncated, and rendered
  /// as display labels that are guaranteed pairwise distinct.
  pub fn search(&self, query: &str, limit: usize) -> Vec<String> {
    let needle = query.trim().to_lowercase();

    if needle.is_empty() {
      return Vec::new();
    }

    let mut seen: HashSet<u32, RandomState> = HashSet::default();
    let mut candidates: Vec<&CanonicalVariant> = Vec::new();

    for (base, variants) in self.canonical().groups() {
      if !group_matches(base, variants, &needle) {
        continue;
      }

      for variant in canonical::distinct_institutions(variants) {
        if seen.insert(variant.record.id) {
          candidates.push(variant);
        }
      }
    }

    tracing::debug!(query, candidates = candidates.len(), "collected search candidates");

    candidates.sort_by_cached_key(|variant| ordering_key(variant, &needle));
    candidates.truncate(limit);

    disambiguated_labels(&candidates)
  }

  /// Validates and runs a search coming from the route layer.
  pub fn search_with(&self, params: &SearchParams) -> Result<Vec<String>, CollegiumError> {
    params.validate()?;

    Ok(self.search(&params.query, params.limit))
  }
}

fn group_matches(base: &str, variants: &[CanonicalVariant], needle: &str) -> bool {
  if text_matches(base, needle) {
    return true;
  }

  variants.iter().any(|variant| text_matches(&variant.record.name.to_lowercase(), needle))
}

fn text_matches(text: &str, needle: &str) -> bool {
  text.contains(needle) || text.split_whitespace().any(|word| word.starts_with(needle))
}

fn ordering_key(variant: &CanonicalVariant, needle: &str) -> (Reverse<bool>, Reverse<bool>, Reverse<i32>, String, String) {
  let base = variant.base_name.to_lowercase();
  let name = variant.record.name.to_lowercase();
  let prefixed = base.starts_with(needle) || name.starts_with(needle);
  let contained = base.contains(needle) || name.contains(needle);

  (
    Reverse(prefixed),
    Reverse(contained),
    Reverse(variant.score),
    base,
    format!("{}|{}", variant.record.state, variant.record.city),
  )
}

/// Renders labels, then resolves collisions in two passes: colliding base
/// labels are upgraded to the full record name, and any label still
/// duplicated after that gets the record id appended.
fn disambiguated_labels(candidates: &[&CanonicalVariant]) -> Vec<String> {
  let mut labels = candidates.iter().map(|variant| base_label(variant)).collect::<Vec<_>>();

  let counts = label_counts(&labels);

  for (label, variant) in labels.iter_mut().zip(candidates) {
    if counts[label.as_str()] > 1 {
      *label = upgraded_label(variant);
    }
  }

  let counts = label_counts(&labels);

  for (label, variant) in labels.iter_mut().zip(candidates) {
    if counts[label.as_str()] > 1 {
      *label = format!("{label} — {}", variant.record.id);
    }
  }

  labels
}

fn base_label(variant: &CanonicalVariant) -> String {
  match variant.record.has_location() {
    true => format!("{} — {}, {}", variant.base_name, variant.record.city, variant.record.state),
    false => variant.base_name.clone(),
  }
}

fn upgraded_label(variant: &CanonicalVariant) -> String {
  match variant.record.has_location() {
    true => format!("{} — {}, {}", variant.record.name, variant.record.city, variant.record.state),
    false => variant.record.name.clone(),
  }
}

fn label_counts(labels: &[String]) -> HashMap<String, usize, RandomState> {
  let mut counts: HashMap<String, usize, RandomState> = HashMap::default();

  for label in labels {
    *counts.entry(label.clone()).or_insert(0) += 1;
  }

  counts
}
