/// Builds the instruction sent to the model for one piece of user text.
pub fn build_prompt(text: &str) -> String {
    format!(
        r#"You are a supportive writing assistant. Read the text between the markers and describe its emotional content.

Respond with ONLY a JSON object, no markdown and no extra commentary, using exactly these fields:
{{
  "sentiment": "one of: positive, negative, neutral, mixed",
  "themes": ["up to five short themes, one to three words each"],
  "tone": "a few words describing the overall tone",
  "summary": "one or two sentences summarizing what the writer seems to express",
  "disclaimer": "a short reminder that this is an automated reading, not professional advice"
}}

Style rules:
- Do not use diagnostic or clinical language and never name a condition.
- Use hedged phrasing such as "seems to", "may", "appears to".
- Describe the writing, not the person.

---BEGIN TEXT---
{text}
---END TEXT---"#
    )
}
