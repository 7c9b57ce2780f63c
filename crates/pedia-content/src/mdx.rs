//! MDX preprocessing.
//!
//! MDX files open with ESM `import`/`export` statements that have no place
//! in the rendered page. They are blanked before Markdown parsing, keeping
//! every newline so line numbers stay aligned with the source.

/// Blank top-level `import`/`export` statements outside code fences.
///
/// Statements spanning several lines (`import {\n  A,\n} from "x"`) are
/// blanked until their braces balance.
pub(crate) fn strip_esm(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut fence: Option<(char, usize)> = None;
    let mut brace_depth: i32 = 0;
    let mut in_statement = false;

    for line in text.split_inclusive('\n') {
        let content = line.trim_end_matches(['\n', '\r']);
        let ending = &line[content.len()..];

        if let Some((ch, len)) = fence {
            if is_fence_of(content, ch, len) {
                fence = None;
            }
            out.push_str(line);
            continue;
        }

        if in_statement {
            brace_depth += brace_delta(content);
            if brace_depth <= 0 {
                in_statement = false;
            }
            out.push_str(ending);
            continue;
        }

        if is_esm_line(content) {
            brace_depth = brace_delta(content);
            in_statement = brace_depth > 0;
            out.push_str(ending);
            continue;
        }

        if let Some(opened) = fence_opening(content) {
            fence = Some(opened);
        }
        out.push_str(line);
    }

    out
}

fn is_esm_line(line: &str) -> bool {
    line.starts_with("import ")
        || line.starts_with("import{")
        || line.starts_with("export ")
        || line.starts_with("export{")
}

fn brace_delta(line: &str) -> i32 {
    line.chars().fold(0, |depth, c| match c {
        '{' => depth + 1,
        '}' => depth - 1,
        _ => depth,
    })
}

/// Fence character and length if `line` opens a fenced code block.
fn fence_opening(line: &str) -> Option<(char, usize)> {
    let trimmed = line.trim_start_matches(' ');
    if line.len() - trimmed.len() > 3 {
        return None;
    }
    let ch = trimmed.chars().next().filter(|c| *c == '`' || *c == '~')?;
    let len = trimmed.chars().take_while(|c| *c == ch).count();
    (len >= 3).then_some((ch, len))
}

fn is_fence_of(line: &str, ch: char, len: usize) -> bool {
    let trimmed = line.trim();
    !trimmed.is_empty() && trimmed.chars().all(|c| c == ch) && trimmed.chars().count() >= len
}
