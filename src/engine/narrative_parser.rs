/// Clean free-form narration from the LLM into one displayable paragraph.
/// Returns `None` when nothing usable is left.
pub fn parse_narrative(narrative: &str) -> Option<String> {
    let lines: Vec<String> = narrative
        .lines()
        .filter_map(clean_line)
        .collect();

    if lines.is_empty() {
        return None;
    }
    Some(lines.join(" "))
}

/// Battle commentary is a single sentence; keep only the first usable line.
pub fn parse_commentary(commentary: &str) -> Option<String> {
    commentary.lines().find_map(clean_line)
}

fn clean_line(line: &str) -> Option<String> {
    let mut line = line.trim();

    // ``` fences
    if line.starts_with("```") {
        return None;
    }

    // [NARRATOR] style speaker tags
    if line.starts_with('[') {
        if let Some((_, rest)) = line.split_once(']') {
            line = rest.trim();
        }
    }

    // NARRATIVE: section header
    if let Some(rest) = line.strip_prefix("NARRATIVE:") {
        line = rest.trim();
    }

    let line = line.trim_matches(|c| c == '"' || c == '“' || c == '”').trim();
    if line.is_empty() {
        return None;
    }
    Some(line.to_string())
}
