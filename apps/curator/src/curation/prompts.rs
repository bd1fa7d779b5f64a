// Prompt constants for signature-move selection.
// Reuses the JSON-only fragment from llm_client::prompts for the extraction step.

/// System prompt for the reasoning call.
pub const SELECTION_SYSTEM: &str = "You are a Pokemon move curator for a Pokedex TUI. \
    You must follow constraints exactly.";

/// Selection prompt template.
/// Replace: {name}, {id}, {types}, {stats}, {n}, {candidates}
pub const SELECTION_PROMPT_TEMPLATE: &str = r#"Pokemon: {name} (id={id})
Types: {types}
Stats: {stats}

Choose signature moves.
Think it through briefly, then finish with a JSON object with a 'moves' key containing an array of {n} move names (strings) in kebab-case.
Constraints:
- Every chosen move MUST be from the candidate list below.
- Prefer the most iconic/recognizable moves associated with this Pokemon.
- Prefer STAB and high-impact moves, but include at most 1 purely-status move unless it is iconic.

Candidate moves:
{candidates}"#;
