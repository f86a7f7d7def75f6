
pub const COMMENT_MARKERS: &[&str] = &["//", ";"];

// Decimal only, with an optional sign. Leading zeros are fine ("005").
pub fn parse_int(s: &str) -> Option<i32> {
    s.parse().ok()
}

pub fn strip_comment(line: &str) -> &str {
    let end = COMMENT_MARKERS
        .iter()
        .filter_map(|marker| line.find(marker))
        .min()
        .unwrap_or(line.len());
    &line[..end]
}
