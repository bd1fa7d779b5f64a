//! Artifact Emitter: renders the cache as a generated Go source listing.
//!
//! Pure projection of the cache: ids ascending, names quoted verbatim, and a
//! trailing `// name` comment when the entity's display name is known.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::path::Path;

use tracing::info;

use crate::catalog::models::CuratedMap;
use crate::errors::CurateError;
use crate::store::write_atomic;

const PREAMBLE: &str = "package main\n\n\
    // Code generated by tools/curate_moves; DO NOT EDIT.\n\
    // CuratedMoves maps Pokemon ID to a list of iconic \"signature\" moves.\n\
    var CuratedMoves = map[int][]string{\n";
const CLOSING: &str = "}\n";

/// Renders the full artifact text.
pub fn render_artifact(curated: &CuratedMap, names: &HashMap<u32, String>) -> String {
    let mut out = String::from(PREAMBLE);

    for (id, moves) in curated {
        let quoted = moves
            .iter()
            .map(|m| go_quote(m))
            .collect::<Vec<_>>()
            .join(", ");
        let comment = names
            .get(id)
            .filter(|n| !n.is_empty())
            .map(|n| format!(" // {n}"))
            .unwrap_or_default();

        let _ = writeln!(out, "\t{id}: {{{quoted}}},{comment}");
    }

    out.push_str(CLOSING);
    out
}

/// Renders and writes the artifact, replacing any previous file.
pub fn write_artifact(
    path: &Path,
    curated: &CuratedMap,
    names: &HashMap<u32, String>,
) -> Result<(), CurateError> {
    let text = render_artifact(curated, names);
    write_atomic(path, text.as_bytes())?;
    info!("Wrote {} curated entries to {}", curated.len(), path.display());
    Ok(())
}

/// Quotes a string as a Go interpreted string literal.
fn go_quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{07}' => out.push_str("\\a"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0b}' => out.push_str("\\v"),
            '\u{0c}' => out.push_str("\\f"),
            c if c.is_control() => {
                let code = c as u32;
                let _ = if code < 0x80 {
                    write!(out, "\\x{code:02x}")
                } else if code <= 0xFFFF {
                    write!(out, "\\u{code:04x}")
                } else {
                    write!(out, "\\U{code:08x}")
                };
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn curated(entries: &[(u32, &[&str])]) -> CuratedMap {
        entries
            .iter()
            .map(|(id, moves)| (*id, moves.iter().map(|m| m.to_string()).collect()))
            .collect()
    }

    #[test]
    fn test_renders_sorted_with_names() {
        let map = curated(&[
            (25, &["thunderbolt", "quick-attack"]),
            (4, &["flamethrower"]),
            (132, &[]),
        ]);
        let names = HashMap::from([(4, "charmander".to_string()), (25, "pikachu".to_string())]);

        let text = render_artifact(&map, &names);
        let expected = "package main\n\n\
            // Code generated by tools/curate_moves; DO NOT EDIT.\n\
            // CuratedMoves maps Pokemon ID to a list of iconic \"signature\" moves.\n\
            var CuratedMoves = map[int][]string{\n\
            \t4: {\"flamethrower\"}, // charmander\n\
            \t25: {\"thunderbolt\", \"quick-attack\"}, // pikachu\n\
            \t132: {},\n\
            }\n";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_empty_cache_renders_frame_only() {
        let text = render_artifact(&CuratedMap::new(), &HashMap::new());
        assert!(text.starts_with("package main\n"));
        assert!(text.ends_with("map[int][]string{\n}\n"));
    }

    #[test]
    fn test_go_quote_escapes() {
        assert_eq!(go_quote("tackle"), "\"tackle\"");
        assert_eq!(go_quote("say \"hi\""), "\"say \\\"hi\\\"\"");
        assert_eq!(go_quote("a\\b"), "\"a\\\\b\"");
        assert_eq!(go_quote("tab\there"), "\"tab\\there\"");
        assert_eq!(go_quote("\u{1}"), "\"\\x01\"");
        assert_eq!(go_quote("flabébé"), "\"flabébé\"");
    }

    #[test]
    fn test_write_artifact_is_deterministic() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("curated_moves.go");
        let map = curated(&[(1, &["vine-whip"])]);
        let names = HashMap::from([(1, "bulbasaur".to_string())]);

        write_artifact(&path, &map, &names).unwrap();
        let first = std::fs::read(&path).unwrap();
        write_artifact(&path, &map, &names).unwrap();
        assert_eq!(first, std::fs::read(&path).unwrap());
    }
}
