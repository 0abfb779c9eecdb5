use std::path::Path;

use float_cmp::approx_eq;

use crate::{dataset, model::MatchSource, resolve::confidence, service::CollegeService};

const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/src/tests/fixtures/colleges.json");

fn service() -> CollegeService {
  CollegeService::from_path(FIXTURE).unwrap()
}

#[test]
fn every_dataset_name_resolves_exactly() {
  let service = service();
  let records = dataset::load_records(Path::new(FIXTURE)).unwrap();

  for record in records {
    let resolution = &service.resolve(&[record.name.as_str()])[0];

    assert_eq!(resolution.standard_name.as_deref(), Some(record.name.as_str()), "{}", record.name);
    assert!(approx_eq!(f64, resolution.confidence, confidence::EXACT));
  }
}

#[test]
fn suny_maritime_scenario() {
  let service = service();
  let resolution = &service.resolve(&["SUNY MARITIME"])[0];

  assert_eq!(resolution.standard_name.as_deref(), Some("SUNY Maritime College"));
  assert!(resolution.confidence >= confidence::SUBSTRING);
  assert_eq!(resolution.latitude, Some(40.8074));

  assert_eq!(service.search("suny mar", 50), vec!["SUNY Maritime College — Bronx, NY".to_string()]);
}

#[test]
fn aliases_resolve_to_canonical_names() {
  let service = service();

  let cases = [
    ("marines", "Marine Corps"),
    ("HARVARD", "Harvard University"),
    ("uiuc", "University of Illinois Urbana-Champaign"),
    ("Georgia Tech", "Georgia Institute of Technology-Main Campus"),
  ];

  for (input, expected) in cases {
    let resolution = &service.resolve(&[input])[0];

    assert_eq!(resolution.standard_name.as_deref(), Some(expected), "{input}");
    assert!(approx_eq!(f64, resolution.confidence, confidence::EXACT));
  }
}

#[test]
fn pipeline_confidences() {
  let service = service();

  let resolution = &service.resolve(&["Raritan Valley CO"])[0];

  assert_eq!(resolution.standard_name.as_deref(), Some("Raritan Valley Community College"));
  assert!(approx_eq!(f64, resolution.confidence, confidence::NORMALIZED));

  let resolution = &service.resolve(&["Columbia  University"])[0];

  assert_eq!(resolution.standard_name.as_deref(), Some("Columbia University in the City of New York"));
  assert!(approx_eq!(f64, resolution.confidence, confidence::NORMALIZED));

  let resolution = &service.resolve(&["TEXAS TECH"])[0];

  assert_eq!(resolution.standard_name.as_deref(), Some("Texas Tech University"));
  assert!(approx_eq!(f64, resolution.confidence, confidence::SUBSTRING));

  let resolution = &service.resolve(&["S.U.N.Y. Maritime"])[0];

  assert_eq!(resolution.standard_name.as_deref(), Some("SUNY Maritime College"));
  assert!(approx_eq!(f64, resolution.confidence, confidence::PREFIX));

  let resolution = &service.resolve(&["The Lyceum of Atlantis"])[0];

  assert_eq!(resolution.standard_name, None);
  assert!(approx_eq!(f64, resolution.confidence, confidence::UNMATCHED));
}

#[test]
fn blank_input() {
  let resolution = &service().resolve(&[""])[0];

  assert_eq!(resolution.standard_name, None);
  assert_eq!(resolution.confidence, 0.0);
  assert_eq!(resolution.source, MatchSource::Unmatched);
}

#[test]
fn search_ranks_prefixes_first() {
  let results = service().search("tech", 50);

  assert_eq!(results[0], "Technical College of the Lowcountry — Beaufort, SC");

  let texas = results.iter().position(|label| label.starts_with("Texas Tech")).unwrap();
  let georgia = results.iter().position(|label| label.starts_with("Georgia Institute")).unwrap();

  assert!(texas < georgia);
}

#[test]
fn search_disambiguates_campus_variants() {
  let results = service().search("ohio state", 50);

  assert_eq!(
    results,
    vec![
      "Ohio State University-Main Campus — Columbus, OH".to_string(),
      "Ohio State University System Office — Columbus, OH".to_string(),
    ]
  );
}

#[test]
fn search_is_deterministic_and_labels_unique() {
  let service = service();

  for query in ["university", "college", "tech", "ohio", "cal"] {
    let first = service.search(query, 50);
    let second = service.search(query, 50);

    assert_eq!(first, second);

    let mut deduped = first.clone();

    deduped.sort();
    deduped.dedup();

    assert_eq!(deduped.len(), first.len(), "duplicate labels for {query}");
  }
}

#[test]
fn search_limit() {
  assert_eq!(service().search("university", 3).len(), 3);
}

#[test]
fn resolve_is_pure() {
  crate::init();

  let service = service();
  let names = ["SUNY MARITIME", "harvard", "Raritan Valley CO", "", "The Lyceum of Atlantis"];

  assert_eq!(service.resolve(&names), service.resolve(&names));
}
