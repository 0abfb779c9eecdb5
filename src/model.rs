use std::sync::Arc;

use bon::bon;
use serde::{Deserialize, Serialize};

use crate::resolve::confidence;

/// State code carried by entries that have no physical campus, like military
/// branches.
pub const NO_LOCATION_STATE: &str = "XX";

/// One row of the reference dataset. Identifiers are stable across dataset
/// versions and never reused; two records share a `name` only when they are
/// genuinely distinct institutions.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct InstitutionRecord {
  pub id: u32,
  pub name: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub alias: Option<String>,
  #[serde(default)]
  pub city: String,
  #[serde(default)]
  pub state: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub latitude: Option<f64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub longitude: Option<f64>,
}

impl InstitutionRecord {
  pub fn has_location(&self) -> bool {
    !self.city.is_empty() && !self.state.is_empty() && self.state != NO_LOCATION_STATE
  }
}

#[bon]
impl InstitutionRecord {
  #[builder]
  pub fn builder(
    #[builder(start_fn)] id: u32,
    name: &str,
    alias: Option<&str>,
    city: Option<&str>,
    state: Option<&str>,
    latitude: Option<f64>,
    longitude: Option<f64>,
  ) -> InstitutionRecord {
    InstitutionRecord {
      id,
      name: name.to_string(),
      alias: alias.map(ToOwned::to_owned),
      city: city.unwrap_or_default().to_string(),
      state: state.unwrap_or(NO_LOCATION_STATE).to_string(),
      latitude,
      longitude,
    }
  }
}

/// Which part of the pipeline produced a resolution.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchSource {
  Reference,
  Unmatched,
}

/// Per-name output of `resolve`. Created fresh on every call and never
/// persisted here; the import pipeline decides what to do with it.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Resolution {
  pub original_name: String,
  pub standard_name: Option<String>,
  pub latitude: Option<f64>,
  pub longitude: Option<f64>,
  pub confidence: f64,
  pub source: MatchSource,
}

impl Resolution {
  pub(crate) fn unmatched(original: &str) -> Resolution {
    Resolution {
      original_name: original.to_string(),
      standard_name: None,
      latitude: None,
      longitude: None,
      confidence: confidence::UNMATCHED,
      source: MatchSource::Unmatched,
    }
  }

  pub(crate) fn matched(original: &str, record: &Arc<InstitutionRecord>, confidence: f64) -> Resolution {
    Resolution {
      original_name: original.to_string(),
      standard_name: Some(record.name.clone()),
      latitude: record.latitude,
      longitude: record.longitude,
      confidence,
      source: MatchSource::Reference,
    }
  }
}
