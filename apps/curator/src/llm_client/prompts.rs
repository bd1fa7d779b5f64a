// Shared prompt fragments for the two oracle collaborators.
// Curation-specific prompts live in curation/prompts.rs.

/// System prompt that enforces JSON-only output for the extraction call.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Extraction prompt template. Replace `{n}` and `{raw_text}` before sending.
pub const EXTRACTION_PROMPT_TEMPLATE: &str = r#"Extract the final move recommendation from the text below.

Return a JSON object with this EXACT schema (no extra fields):
{"moves": ["move-one", "move-two"]}

Rules:
- "moves" MUST contain exactly {n} move names (strings).
- Copy each move name verbatim, in kebab-case, in the order the text recommends them.
- Do NOT add moves that the text does not recommend.

TEXT:
{raw_text}"#;
