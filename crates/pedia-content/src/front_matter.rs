//! YAML front matter extraction.

use std::collections::BTreeMap;

use crate::document::FrontMatter;
use crate::error::MalformedReason;

/// Source split into its metadata block and body.
#[derive(Debug)]
pub(crate) struct Split<'a> {
    pub front_matter: FrontMatter,
    pub body: &'a str,
    /// Number of source lines consumed before `body` starts.
    pub line_offset: usize,
}

/// Split a leading `---` block off `text` and parse it.
///
/// The block must be the very first line of the source and is closed by a
/// line holding only `---` or `...`.
pub(crate) fn split(text: &str) -> Result<Split<'_>, MalformedReason> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let Some(first_line) = text.lines().next() else {
        return Ok(Split {
            front_matter: FrontMatter::default(),
            body: text,
            line_offset: 0,
        });
    };
    if first_line.trim_end() != "---" {
        return Ok(Split {
            front_matter: FrontMatter::default(),
            body: text,
            line_offset: 0,
        });
    }

    let mut offset = first_line.len();
    offset += line_ending_len(&text[offset..]);
    let yaml_start = offset;
    let mut consumed = 1;

    for line in text[yaml_start..].split_inclusive('\n') {
        consumed += 1;
        let trimmed = line.trim_end();
        if trimmed == "---" || trimmed == "..." {
            let yaml = &text[yaml_start..offset];
            let body = &text[offset + line.len()..];
            return Ok(Split {
                front_matter: parse_yaml(yaml)?,
                body,
                line_offset: consumed,
            });
        }
        offset += line.len();
    }

    Err(MalformedReason::UnterminatedFrontMatter)
}

fn line_ending_len(rest: &str) -> usize {
    if rest.starts_with("\r\n") {
        2
    } else {
        usize::from(rest.starts_with('\n'))
    }
}

fn parse_yaml(yaml: &str) -> Result<FrontMatter, MalformedReason> {
    if yaml.trim().is_empty() {
        return Ok(FrontMatter::default());
    }

    let mut extra: BTreeMap<String, serde_json::Value> = serde_yaml::from_str(yaml)
        .map_err(|e| MalformedReason::InvalidFrontMatter(e.to_string()))?;

    let title = take_string(&mut extra, "title")?;
    let description = take_string(&mut extra, "description")?;

    Ok(FrontMatter {
        title,
        description,
        extra,
    })
}

fn take_string(
    map: &mut BTreeMap<String, serde_json::Value>,
    key: &str,
) -> Result<Option<String>, MalformedReason> {
    match map.remove(key) {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(value)) => Ok(Some(value)),
        Some(other) => Err(MalformedReason::InvalidFrontMatter(format!(
            "`{key}` must be a string, found {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_no_front_matter() {
        let split = split("# Title\n\nBody").unwrap();
        assert_eq!(split.front_matter, FrontMatter::default());
        assert_eq!(split.body, "# Title\n\nBody");
        assert_eq!(split.line_offset, 0);
    }

    #[test]
    fn test_front_matter_fields() {
        let text = "---\ntitle: HashMap\ndescription: Key-value store\norder: 2\ntags: [map]\n---\n# Body\n";
        let split = split(text).unwrap();
        assert_eq!(split.front_matter.title.as_deref(), Some("HashMap"));
        assert_eq!(
            split.front_matter.description.as_deref(),
            Some("Key-value store")
        );
        assert_eq!(split.front_matter.extra["order"], serde_json::json!(2));
        assert_eq!(split.front_matter.extra["tags"], serde_json::json!(["map"]));
        assert_eq!(split.body, "# Body\n");
        assert_eq!(split.line_offset, 6);
    }

    #[test]
    fn test_empty_front_matter() {
        let split = split("---\n---\nBody").unwrap();
        assert_eq!(split.front_matter, FrontMatter::default());
        assert_eq!(split.body, "Body");
        assert_eq!(split.line_offset, 2);
    }

    #[test]
    fn test_crlf_front_matter() {
        let split = split("---\r\ntitle: T\r\n---\r\nBody").unwrap();
        assert_eq!(split.front_matter.title.as_deref(), Some("T"));
        assert_eq!(split.body, "Body");
    }

    #[test]
    fn test_unterminated_front_matter() {
        let err = split("---\ntitle: T\n# Body\n").unwrap_err();
        assert_eq!(err, MalformedReason::UnterminatedFrontMatter);
    }

    #[test]
    fn test_front_matter_must_be_mapping() {
        let err = split("---\n- a\n- b\n---\n").unwrap_err();
        assert!(matches!(err, MalformedReason::InvalidFrontMatter(_)));
    }

    #[test]
    fn test_non_string_title_rejected() {
        let err = split("---\ntitle: [a]\n---\n").unwrap_err();
        assert!(matches!(err, MalformedReason::InvalidFrontMatter(msg) if msg.contains("title")));
    }

    #[test]
    fn test_dashes_later_in_document_are_not_front_matter() {
        let split = split("Intro\n---\n").unwrap();
        assert_eq!(split.line_offset, 0);
        assert_eq!(split.body, "Intro\n---\n");
    }
}
