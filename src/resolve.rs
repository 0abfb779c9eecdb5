use std::{
  collections::HashMap,
  sync::{Arc, LazyLock},
};

use ahash::RandomState;
use serde::Deserialize;
use validator::Validate;

use crate::{
  error::CollegiumError,
  index::SearchTerm,
  model::{InstitutionRecord, MatchSource, Resolution},
  normalize,
  service::CollegeService,
};

/// Confidence assigned by the pipeline stage that produced a match. Tuned
/// values, kept as-is for compatibility with existing imports.
pub mod confidence {
  pub const EXACT: f64 = 1.0;
  pub const NORMALIZED: f64 = 0.9;
  pub const SUBSTRING: f64 = 0.8;
  pub const PREFIX: f64 = 0.9;
  pub const UNMATCHED: f64 = 0.0;
}

/// Ranking weights for the prefix stage.
mod ranking {
  pub const TRUE_PREFIX: f64 = 10.0;
  pub const LENGTH_AFFINITY: f64 = 5.0;
  pub const LENGTH_SCALE: f64 = 10.0;
  pub const WORD_COUNT_AFFINITY: f64 = 3.0;
  pub const VERBATIM_WORD: f64 = 5.0;
}

const MIN_PREFIX_LEN: usize = 3;

/// Names that show up verbatim in imported spreadsheets but are not
/// institutions any postsecondary dataset carries.
pub(crate) static SPECIAL_CASES: LazyLock<HashMap<String, &'static str, RandomState>> = LazyLock::new(|| {
  ["Army National Guard", "Air National Guard", "Marine Corps"]
    .into_iter()
    .map(|name| (normalize::exact_key(name), name))
    .collect()
});

#[derive(Clone, Debug, Deserialize, Validate)]
pub struct ResolveRequest {
  #[validate(length(min = 1, message = "at least one name must be given"))]
  pub names: Vec<String>,
}

impl CollegeService {
  /// Resolves a batch of free-text names, one resolution per input, in input
  /// order. A name that matches nothing yields an unmatched resolution, never
  /// an error, so one bad row cannot abort a bulk import.
  pub fn resolve<S: AsRef<str>>(&self, names: &[S]) -> Vec<Resolution> {
    names.iter().map(|name| self.resolve_one(name.as_ref())).collect()
  }

  /// Validates and resolves a request coming from the route layer.
  pub fn resolve_request(&self, request: &ResolveRequest) -> Result<Vec<Resolution>, CollegiumError> {
    request.validate()?;

    Ok(self.resolve(&request.names))
  }

  fn resolve_one(&self, name: &str) -> Resolution {
    if name.trim().is_empty() {
      return Resolution::unmatched(name);
    }

    let exact = normalize::exact_key(name);

    if let Some(standard) = SPECIAL_CASES.get(exact.as_str()) {
      let record = self.reference().get(&normalize::exact_key(standard));

      tracing::debug!(name, standard = %standard, "special-case match");

      return Resolution {
        original_name: name.to_string(),
        standard_name: Some(standard.to_string()),
        latitude: record.and_then(|record| record.latitude),
        longitude: record.and_then(|record| record.longitude),
        confidence: confidence::EXACT,
        source: MatchSource::Reference,
      };
    }

    if let Some(record) = self.reference().get(&exact) {
      tracing::debug!(name, standard = %record.name, "exact match");

      return Resolution::matched(name, record, confidence::EXACT);
    }

    let aggressive = normalize::aggressive_key(name);

    if !aggressive.is_empty()
      && let Some(record) = self.reference().get(&aggressive)
    {
      tracing::debug!(name, standard = %record.name, "normalized match");

      return Resolution::matched(name, record, confidence::NORMALIZED);
    }

    if let Some(record) = self.reference().find_containing(&exact) {
      tracing::debug!(name, standard = %record.name, "substring match");

      return Resolution::matched(name, record, confidence::SUBSTRING);
    }

    if aggressive.len() >= MIN_PREFIX_LEN
      && let Some(record) = self.best_prefix_match(&aggressive)
    {
      tracing::debug!(name, standard = %record.name, "prefix match");

      return Resolution::matched(name, record, confidence::PREFIX);
    }

    tracing::debug!(name, "no match found");

    Resolution::unmatched(name)
  }

  fn best_prefix_match(&self, input: &str) -> Option<&Arc<InstitutionRecord>> {
    let candidates = self.reference().terms().iter().filter(|term| term.key.starts_with(input)).collect::<Vec<_>>();

    match candidates.len() {
      0 => None,
      1 => Some(&candidates[0].record),
      _ => {
        let input_words = input.split_whitespace().count();
        let mut best: Option<(&SearchTerm, f64)> = None;

        for &term in &candidates {
          let score = prefix_score(term, input, input_words);

          tracing::debug!(input, term = %term.raw, score, "ranked prefix candidate");

          // Strictly-greater replacement: on a tie, the first term
          // encountered keeps the spot.
          if best.as_ref().is_none_or(|(_, top)| score > *top) {
            best = Some((term, score));
          }
        }

        best.map(|(term, _)| &term.record)
      }
    }
  }
}

fn prefix_score(term: &SearchTerm, input: &str, input_words: usize) -> f64 {
  let length_gap = (term.key.len() - input.len()) as f64;
  let word_gap = term.key.split_whitespace().count().abs_diff(input_words) as f64;

  // Every candidate got here by prefix, so the base weight always applies.
  let mut score = ranking::TRUE_PREFIX;

  score += (ranking::LENGTH_AFFINITY - length_gap / ranking::LENGTH_SCALE).max(0.0);
  score += (ranking::WORD_COUNT_AFFINITY - word_gap).max(0.0);

  if term.key.split_whitespace().any(|word| word == input) {
    score += ranking::VERBATIM_WORD;
  }

  score
}
