use std::sync::LazyLock;

use aho_corasick::{AhoCorasick, AhoCorasickBuilder, MatchKind};
use itertools::Itertools;
use regex::Regex;

/// Trailing parenthetical qualifier, as in "Excelsior University (Online)".
static TRAILING_PARENTHETICAL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*\([^)]*\)\s*$").expect("invalid trailing parenthetical regex"));

/// Tokens rewritten by `aggressive_key`, matched on word boundaries only so
/// the inside of longer words is never touched.
pub(crate) static FILLER_TOKENS: LazyLock<(AhoCorasick, Vec<&'static str>)> = LazyLock::new(|| {
  let patterns = ["of the", "and", "in", "at", "co"];
  let replacements = vec![" ", " ", " ", " ", " community college "];

  (
    AhoCorasickBuilder::new().match_kind(MatchKind::LeftmostLongest).ascii_case_insensitive(true).build(patterns).expect("could not build filler token automaton"),
    replacements,
  )
});

const ALIAS_PLACEHOLDERS: [&str; 4] = ["-", "n/a", "none", "null"];

/// Lookup key preserving the original spelling apart from case and outer
/// whitespace.
pub(crate) fn exact_key(name: &str) -> String {
  name.trim().to_lowercase()
}

/// Lookup key absorbing the common spelling variations seen in imported
/// spreadsheets: periods, "@", a trailing parenthetical qualifier, the
/// standalone words "in", "at", "of the" and "and", and the "CO" shorthand
/// for community colleges. Idempotent: "@" is rewritten before the token
/// pass so it collapses to a word break.
pub(crate) fn aggressive_key(name: &str) -> String {
  let key = exact_key(name).replace('.', "").replace('@', " at ");
  let key = TRAILING_PARENTHETICAL.replace(&key, "");
  let (automaton, replacements) = &*FILLER_TOKENS;
  let key = replace_tokens(automaton, replacements, &key);

  key.split_whitespace().join(" ")
}

/// Splits a raw alias field on its supported delimiters, dropping blank and
/// placeholder values.
pub(crate) fn split_aliases(field: &str) -> impl Iterator<Item = &str> {
  field
    .split([',', ';', '|'])
    .map(str::trim)
    .filter(|part| !part.is_empty() && !ALIAS_PLACEHOLDERS.contains(&part.to_lowercase().as_str()))
}

/// Replaces dictionary tokens when both match ends sit on a word boundary, so
/// "in" never fires inside "Flint".
fn replace_tokens(automaton: &AhoCorasick, replacements: &[&str], haystack: &str) -> String {
  let mut out = String::with_capacity(haystack.len());
  let mut cursor = 0;

  for mat in automaton.find_iter(haystack) {
    let start_is_boundary = mat.start() == 0 || !haystack[..mat.start()].chars().next_back().map(|c| c.is_alphanumeric()).unwrap_or_default();
    let end_is_boundary = mat.end() == haystack.len() || !haystack[mat.end()..].chars().next().map(|c| c.is_alphanumeric()).unwrap_or_default();

    if start_is_boundary && end_is_boundary {
      out.push_str(&haystack[cursor..mat.start()]);
      out.push_str(replacements[mat.pattern().as_usize()]);

      cursor = mat.end();
    }
  }

  out.push_str(&haystack[cursor..]);
  out
}

#[cfg(test)]
mod tests {
  #[test]
  fn exact_key() {
    assert_eq!(super::exact_key("  SUNY Maritime College  "), "suny maritime college");
    assert_eq!(super::exact_key("St. John's University"), "st. john's university");
  }

  #[test]
  fn aggressive_key() {
    assert_eq!(super::aggressive_key("St. John's University"), "st john's university");
    assert_eq!(super::aggressive_key("University of the Pacific"), "university pacific");
    assert_eq!(super::aggressive_key("Hobart and William Smith Colleges"), "hobart william smith colleges");
    assert_eq!(super::aggressive_key("SUNY @ Buffalo"), "suny buffalo");
    assert_eq!(super::aggressive_key("College at Brockport"), "college brockport");
    assert_eq!(super::aggressive_key("Excelsior University (Online)"), "excelsior university");
    assert_eq!(super::aggressive_key("Raritan Valley CO"), "raritan valley community college");
  }

  #[test]
  fn aggressive_key_keeps_longer_words_intact() {
    assert_eq!(super::aggressive_key("Flint Hills Technical College"), "flint hills technical college");
    assert_eq!(super::aggressive_key("Indiana State University"), "indiana state university");
    assert_eq!(super::aggressive_key("Coastal Carolina University"), "coastal carolina university");
  }

  #[test]
  fn keys_are_idempotent() {
    let inputs = [
      "St. John's University",
      "University of the Pacific",
      "SUNY @ Buffalo",
      "Raritan Valley CO",
      "Excelsior University (Online)",
      "Hobart and William Smith Colleges",
    ];

    for input in inputs {
      let exact = super::exact_key(input);
      let aggressive = super::aggressive_key(input);

      assert_eq!(super::exact_key(&exact), exact);
      assert_eq!(super::aggressive_key(&aggressive), aggressive);
    }
  }

  #[test]
  fn split_aliases() {
    let aliases = super::split_aliases("Marines, USMC; U.S. Marine Corps | The Corps").collect::<Vec<_>>();

    assert_eq!(aliases, vec!["Marines", "USMC", "U.S. Marine Corps", "The Corps"]);
  }

  #[test]
  fn split_aliases_drops_placeholders() {
    let aliases = super::split_aliases("n/a, -, , Real Name; NONE").collect::<Vec<_>>();

    assert_eq!(aliases, vec!["Real Name"]);
  }
}
