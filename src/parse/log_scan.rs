/// A log line that matched one of the failure keywords.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogHit {
    /// 1-based position within the scanned tail
    pub line_no: usize,
    pub keyword: String,
    pub line: String,
}

/// Scans `lines` in order and returns the first one containing any of
/// `keywords`, compared case-insensitively. Later lines are not inspected.
pub fn scan_for_failure<'a, I>(
    lines: I,
    keywords: &[String],
) -> Option<LogHit>
where
    I: IntoIterator<Item = &'a str>,
{
    let lowered: Vec<String> = keywords.iter().map(|k| k.to_lowercase()).collect();

    lines.into_iter().enumerate().find_map(|(idx, line)| {
        let haystack = line.to_lowercase();
        lowered
            .iter()
            .position(|k| haystack.contains(k.as_str()))
            .map(|k| LogHit {
                line_no: idx + 1,
                keyword: keywords[k].clone(),
                line: line.to_string(),
            })
    })
}

/// Last `n` lines of `text`.
pub fn tail_lines(
    text: &str,
    n: usize,
) -> Vec<&str> {
    let lines: Vec<&str> = text.lines().collect();
    let start = lines.len().saturating_sub(n);
    lines[start..].to_vec()
}
