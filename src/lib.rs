mod canonical;
mod dataset;
mod error;
mod index;
mod model;
mod normalize;
mod resolve;
mod search;
mod service;

#[cfg(test)]
mod tests;

/// Forces the embedded dictionaries and token tables, so the first request
/// does not pay for building them.
pub fn init() {
  let _ = *dataset::CUSTOM_RECORDS;
  let _ = *resolve::SPECIAL_CASES;
  let _ = *normalize::FILLER_TOKENS;
}

pub mod prelude {
  pub use crate::error::CollegiumError;
  pub use crate::model::{InstitutionRecord, MatchSource, NO_LOCATION_STATE, Resolution};
  pub use crate::resolve::{ResolveRequest, confidence};
  pub use crate::search::{DEFAULT_SEARCH_LIMIT, SearchParams};
  pub use crate::service::{CollegeService, LazyCollegeService};
}
