//! Artifact parsing: model output text -> ordered build steps
//!
//! The model wraps its file plan in a single `<forgeArtifact title="...">`
//! block containing repeated `<forgeAction type="file|shell">` elements.
//! Parsing is a plain delimiter scan, so malformed input degrades to
//! "fewer steps" instead of depending on regex engine behavior.

use forge_types::Step;

/// Outer wrapper element emitted by the model.
pub const ARTIFACT_TAG: &str = "forgeArtifact";
/// Per-action element inside the wrapper.
pub const ACTION_TAG: &str = "forgeAction";

const DEFAULT_TITLE: &str = "Project Files";

const CDATA_OPEN: &str = "<![CDATA[";
const CDATA_CLOSE: &str = "]]>";
const FENCE: &str = "```";

/// The five named entities the wire format uses, longest spelling first.
const ENTITIES: &[(&str, char)] = &[
    ("&quot;", '"'),
    ("&amp;", '&'),
    ("&#39;", '\''),
    ("&lt;", '<'),
    ("&gt;", '>'),
];

/// Parse raw model output into an ordered step sequence.
///
/// Returns an empty sequence when no artifact block is present - the model
/// simply produced no file plan, which is not an error. When a block is
/// found, the first step is always a `CreateFolder` bootstrap carrying the
/// decoded artifact title, followed by one step per recognized action in
/// document order. Ids count up from 1. The function is pure: identical
/// input yields byte-identical steps.
pub fn parse_artifact(raw: &str) -> Vec<Step> {
    let Some(block) = locate_block(raw) else {
        return Vec::new();
    };

    let mut steps = Vec::new();
    let mut next_id = 1u32;

    let title = attr_value(block.open_tag, "title")
        .map(|s| decode_entities(&s))
        .unwrap_or_else(|| DEFAULT_TITLE.to_string());
    steps.push(Step::create_folder(next_id, title));
    next_id += 1;

    let mut cursor = 0;
    while let Some(action) = next_action(block.inner, cursor) {
        cursor = action.end;

        let code = clean_body(action.body);
        match attr_value(action.open_tag, "type").as_deref() {
            Some("file") => {
                let path = attr_value(action.open_tag, "filePath").unwrap_or_default();
                steps.push(Step::create_file(next_id, path, code));
                next_id += 1;
            }
            Some("shell") => {
                steps.push(Step::run_script(next_id, code));
                next_id += 1;
            }
            // Unknown action types are a forward-compatible no-op.
            _ => {}
        }
    }

    steps
}

struct Block<'a> {
    /// Text of the opening tag, attributes included.
    open_tag: &'a str,
    /// Everything between the opening and closing tags.
    inner: &'a str,
}

fn locate_block(raw: &str) -> Option<Block<'_>> {
    let open = find_tag(raw, 0, ARTIFACT_TAG)?;
    let gt = open + raw[open..].find('>')?;
    let close_marker = format!("</{}>", ARTIFACT_TAG);
    let close = raw[gt + 1..].find(&close_marker)? + gt + 1;
    Some(Block {
        open_tag: &raw[open..=gt],
        inner: &raw[gt + 1..close],
    })
}

struct Action<'a> {
    open_tag: &'a str,
    body: &'a str,
    /// Byte offset just past the closing tag, for the next scan.
    end: usize,
}

fn next_action(inner: &str, from: usize) -> Option<Action<'_>> {
    let open = find_tag(inner, from, ACTION_TAG)?;
    let gt = open + inner[open..].find('>')?;
    let close_marker = format!("</{}>", ACTION_TAG);
    let close = inner[gt + 1..].find(&close_marker)? + gt + 1;
    Some(Action {
        open_tag: &inner[open..=gt],
        body: &inner[gt + 1..close],
        end: close + close_marker.len(),
    })
}

/// Find `<tag` at or after `from`, requiring the name to end at a word
/// boundary so `<forgeActionX>` is not mistaken for an action.
fn find_tag(text: &str, from: usize, tag: &str) -> Option<usize> {
    let needle = format!("<{}", tag);
    let mut cursor = from;
    while let Some(rel) = text[cursor..].find(&needle) {
        let at = cursor + rel;
        let after = text[at + needle.len()..].chars().next();
        match after {
            Some(c) if c.is_whitespace() || c == '>' || c == '/' => return Some(at),
            None => return None,
            _ => cursor = at + 1,
        }
    }
    None
}

/// Extract `name="value"` from a tag's text. Values never contain escaped
/// quotes on the wire (entities are used instead), so a plain scan to the
/// next quote is exact.
fn attr_value(tag: &str, name: &str) -> Option<String> {
    let needle = format!("{}=\"", name);
    let start = tag.find(&needle)? + needle.len();
    let end = tag[start..].find('"')? + start;
    Some(tag[start..end].to_string())
}

/// Body text -> decoded code: prefer a CDATA payload over surrounding
/// markup, drop code-fence markers, then decode entities.
fn clean_body(body: &str) -> String {
    let payload = extract_cdata(body);
    let unfenced = strip_code_fences(payload);
    decode_entities(unfenced.trim())
}

fn extract_cdata(body: &str) -> &str {
    if let Some(start) = body.find(CDATA_OPEN) {
        let payload_start = start + CDATA_OPEN.len();
        if let Some(rel_end) = body[payload_start..].find(CDATA_CLOSE) {
            return body[payload_start..payload_start + rel_end].trim();
        }
    }
    body.trim()
}

/// Remove every triple-backtick marker along with a directly attached
/// language tag (e.g. ```tsx).
fn strip_code_fences(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(at) = rest.find(FENCE) {
        out.push_str(&rest[..at]);
        rest = &rest[at + FENCE.len()..];
        let tag_len: usize = rest
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric() || *c == '_')
            .map(|c| c.len_utf8())
            .sum();
        rest = &rest[tag_len..];
    }
    out.push_str(rest);
    out
}

/// Decode the five named entities in a single pass. Unrecognized `&`
/// sequences pass through untouched.
pub fn decode_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(at) = rest.find('&') {
        out.push_str(&rest[..at]);
        rest = &rest[at..];
        match ENTITIES.iter().find(|(entity, _)| rest.starts_with(entity)) {
            Some((entity, ch)) => {
                out.push(*ch);
                rest = &rest[entity.len()..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Inverse of [`decode_entities`] for the five named entities. `&` is
/// encoded first so decoding is the exact inverse.
pub fn encode_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use forge_types::{StepAction, StepStatus};

    #[test]
    fn missing_wrapper_yields_no_steps() {
        assert!(parse_artifact("just prose, no plan").is_empty());
        assert!(parse_artifact("").is_empty());
    }

    #[test]
    fn unterminated_wrapper_yields_no_steps() {
        let raw = "<forgeArtifact title=\"x\"><forgeAction type=\"shell\">ls</forgeAction>";
        assert!(parse_artifact(raw).is_empty());
    }

    #[test]
    fn bootstrap_step_carries_decoded_title() {
        let raw = "<forgeArtifact title=\"Todo &amp; Notes\"></forgeArtifact>";
        let steps = parse_artifact(raw);
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].id, 1);
        assert_eq!(steps[0].title, "Todo & Notes");
        assert_eq!(steps[0].status, StepStatus::Pending);
        assert_eq!(steps[0].action, StepAction::CreateFolder);
    }

    #[test]
    fn bootstrap_title_defaults_when_absent() {
        let steps = parse_artifact("<forgeArtifact></forgeArtifact>");
        assert_eq!(steps[0].title, "Project Files");
    }

    #[test]
    fn file_action_becomes_create_file_step() {
        let raw = "<forgeArtifact title=\"App\">\
                   <forgeAction type=\"file\" filePath=\"src/App.tsx\">hello</forgeAction>\
                   </forgeArtifact>";
        let steps = parse_artifact(raw);
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[1].id, 2);
        assert_eq!(
            steps[1].action,
            StepAction::CreateFile {
                path: "src/App.tsx".to_string(),
                code: "hello".to_string(),
            }
        );
    }

    #[test]
    fn shell_action_becomes_run_script_step() {
        let raw = "<forgeArtifact title=\"App\">\
                   <forgeAction type=\"shell\">npm install</forgeAction>\
                   </forgeArtifact>";
        let steps = parse_artifact(raw);
        assert_eq!(steps.len(), 2);
        assert_eq!(
            steps[1].action,
            StepAction::RunScript {
                code: "npm install".to_string(),
            }
        );
        assert_eq!(steps[1].title, "Run command");
    }

    #[test]
    fn file_action_without_path_is_tolerated() {
        let raw = "<forgeArtifact title=\"App\">\
                   <forgeAction type=\"file\">orphan</forgeAction>\
                   </forgeArtifact>";
        let steps = parse_artifact(raw);
        assert_eq!(
            steps[1].action,
            StepAction::CreateFile {
                path: String::new(),
                code: "orphan".to_string(),
            }
        );
        assert_eq!(steps[1].title, "Create file");
    }

    #[test]
    fn unknown_action_types_are_skipped() {
        let raw = "<forgeArtifact title=\"App\">\
                   <forgeAction type=\"deploy\">later</forgeAction>\
                   <forgeAction type=\"shell\">ls</forgeAction>\
                   </forgeArtifact>";
        let steps = parse_artifact(raw);
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[1].id, 2);
        assert!(matches!(steps[1].action, StepAction::RunScript { .. }));
    }

    #[test]
    fn cdata_payload_wins_over_surrounding_markup() {
        let raw = "<forgeArtifact title=\"App\">\
                   <forgeAction type=\"file\" filePath=\"a.txt\">junk <![CDATA[ real body ]]> trailing</forgeAction>\
                   </forgeArtifact>";
        let steps = parse_artifact(raw);
        assert_eq!(
            steps[1].action,
            StepAction::CreateFile {
                path: "a.txt".to_string(),
                code: "real body".to_string(),
            }
        );
    }

    #[test]
    fn code_fences_are_stripped_before_decoding() {
        let raw = "<forgeArtifact title=\"App\">\
                   <forgeAction type=\"file\" filePath=\"a.ts\">```tsx\nlet x = 1 &lt; 2;\n```</forgeAction>\
                   </forgeArtifact>";
        let steps = parse_artifact(raw);
        assert_eq!(
            steps[1].action,
            StepAction::CreateFile {
                path: "a.ts".to_string(),
                code: "let x = 1 < 2;".to_string(),
            }
        );
    }

    #[test]
    fn parse_is_deterministic() {
        let raw = "<forgeArtifact title=\"A &quot;B&quot;\">\
                   <forgeAction type=\"file\" filePath=\"x/y.ts\">body</forgeAction>\
                   <forgeAction type=\"shell\">npm run dev</forgeAction>\
                   </forgeArtifact>";
        assert_eq!(parse_artifact(raw), parse_artifact(raw));
    }

    #[test]
    fn entity_codec_round_trips() {
        let original = "<div a=\"1\" b='2'>&amp;</div> & < > \" '";
        assert_eq!(decode_entities(&encode_entities(original)), original);
    }

    #[test]
    fn decode_leaves_unknown_sequences_alone() {
        assert_eq!(decode_entities("a &nbsp; b &"), "a &nbsp; b &");
    }
}
