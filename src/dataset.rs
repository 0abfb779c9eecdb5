use std::{fs, path::Path, sync::LazyLock};

use rust_embed::Embed;
use serde::Deserialize;

use crate::{
  error::CollegiumError,
  model::{InstitutionRecord, NO_LOCATION_STATE},
};

#[derive(Embed)]
#[folder = "./assets"]
struct Assets;

#[derive(Deserialize)]
struct CustomEntryFile {
  institutions: Vec<CustomEntry>,
}

#[derive(Deserialize)]
struct CustomEntry {
  id: u32,
  name: String,
  #[serde(default)]
  aliases: Vec<String>,
}

/// Non-dataset entries merged in before indexing. None of these have a campus
/// or coordinates, so they carry the sentinel state code.
pub(crate) static CUSTOM_RECORDS: LazyLock<Vec<InstitutionRecord>> = LazyLock::new(|| {
  let file = Assets::get("custom.yml").expect("could not read custom institutions list");
  let entries = serde_yaml::from_slice::<CustomEntryFile>(&file.data).expect("could not unmarshal custom institutions list");

  entries
    .institutions
    .into_iter()
    .map(|entry| InstitutionRecord {
      id: entry.id,
      name: entry.name,
      alias: (!entry.aliases.is_empty()).then(|| entry.aliases.join("; ")),
      city: String::new(),
      state: NO_LOCATION_STATE.to_string(),
      latitude: None,
      longitude: None,
    })
    .collect()
});

/// Reads the reference dataset, a JSON array of institution records. Any read
/// or parse problem is fatal, as is an empty dataset: resolution over a
/// silently empty index would mark every import row unmatched.
pub(crate) fn load_records(path: &Path) -> Result<Vec<InstitutionRecord>, CollegiumError> {
  let raw = fs::read(path).map_err(|err| CollegiumError::DatasetError(format!("could not read dataset file {}: {err}", path.display())))?;
  let records = serde_json::from_slice::<Vec<InstitutionRecord>>(&raw).map_err(|err| CollegiumError::DatasetError(format!("could not parse dataset file {}: {err}", path.display())))?;

  if records.is_empty() {
    return Err(CollegiumError::DatasetError(format!("dataset file {} contains no records", path.display())));
  }

  tracing::info!(records = records.len(), "loaded reference dataset");

  Ok(records)
}

#[cfg(test)]
mod tests {
  use std::path::Path;

  use crate::error::CollegiumError;

  #[test]
  fn custom_records() {
    let records = &*super::CUSTOM_RECORDS;

    assert!(!records.is_empty());
    assert!(records.iter().all(|record| !record.has_location()));

    let marines = records.iter().find(|record| record.name == "Marine Corps").unwrap();

    assert!(marines.alias.as_deref().unwrap().contains("Marines"));
  }

  #[test]
  fn load_records() {
    let records = super::load_records(Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/src/tests/fixtures/colleges.json"))).unwrap();

    assert!(records.iter().any(|record| record.name == "SUNY Maritime College"));
  }

  #[test]
  fn load_records_missing_file() {
    let result = super::load_records(Path::new("/nonexistent/colleges.json"));

    assert!(matches!(result, Err(CollegiumError::DatasetError(_))));
  }

  #[test]
  fn load_records_malformed_file() {
    let result = super::load_records(Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/Cargo.toml")));

    assert!(matches!(result, Err(CollegiumError::DatasetError(_))));
  }

  #[test]
  fn load_records_empty_dataset() {
    let result = super::load_records(Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/src/tests/fixtures/empty.json")));

    assert!(matches!(result, Err(CollegiumError::DatasetError(_))));
  }
}
