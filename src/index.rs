use std::{collections::HashMap, sync::Arc};

use ahash::RandomState;
use compact_str::CompactString;

use crate::{model::InstitutionRecord, normalize};

/// One original name or alias spelling from the dataset, kept alongside its
/// aggressive form for prefix matching.
pub(crate) struct SearchTerm {
  pub raw: String,
  pub key: CompactString,
  pub record: Arc<InstitutionRecord>,
}

/// Normalized-key lookup over the reference dataset. Keys are also remembered
/// in insertion order: on a collision the latest record wins the mapping, but
/// the key keeps its original scan position.
pub(crate) struct ReferenceIndex {
  entries: HashMap<CompactString, Arc<InstitutionRecord>, RandomState>,
  keys: Vec<CompactString>,
  terms: Vec<SearchTerm>,
}

impl ReferenceIndex {
  pub fn build(records: &[Arc<InstitutionRecord>]) -> ReferenceIndex {
    let mut index = ReferenceIndex { entries: HashMap::default(), keys: Vec::new(), terms: Vec::new() };

    for record in records {
      index.add_spelling(&record.name, record);

      if let Some(alias) = &record.alias {
        for alias in normalize::split_aliases(alias) {
          index.add_spelling(alias, record);
        }
      }
    }

    index
  }

  fn add_spelling(&mut self, spelling: &str, record: &Arc<InstitutionRecord>) {
    let exact = normalize::exact_key(spelling);
    let aggressive = normalize::aggressive_key(spelling);

    if !exact.is_empty() {
      self.insert(CompactString::from(exact.as_str()), record);
    }

    if !aggressive.is_empty() && aggressive != exact {
      self.insert(CompactString::from(aggressive.as_str()), record);
    }

    self.terms.push(SearchTerm { raw: spelling.to_string(), key: CompactString::from(aggressive), record: record.clone() });
  }

  fn insert(&mut self, key: CompactString, record: &Arc<InstitutionRecord>) {
    if self.entries.insert(key.clone(), record.clone()).is_none() {
      self.keys.push(key);
    }
  }

  pub fn get(&self, key: &str) -> Option<&Arc<InstitutionRecord>> {
    self.entries.get(key)
  }

  /// First key containing `needle`, scanning keys in insertion order.
  pub fn find_containing(&self, needle: &str) -> Option<&Arc<InstitutionRecord>> {
    self.keys.iter().find(|key| key.contains(needle)).and_then(|key| self.entries.get(key.as_str()))
  }

  pub fn terms(&self) -> &[SearchTerm] {
    &self.terms
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }
}
