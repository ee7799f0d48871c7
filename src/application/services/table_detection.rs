const MIN_TABS: usize = 2;
const MIN_TOKENS: usize = 4;

/// Coarse table signal: more than 10% of lines carry at least two tabs or at
/// least four whitespace separated tokens. False positives are expected.
pub fn detect_table_patterns(text: &str) -> bool {
    let mut lines = 0usize;
    let mut table_like = 0usize;

    for line in text.split('\n') {
        lines += 1;
        if is_table_like(line) {
            table_like += 1;
        }
    }

    table_like * 10 > lines
}

fn is_table_like(line: &str) -> bool {
    line.matches('\t').count() >= MIN_TABS || line.split_whitespace().count() >= MIN_TOKENS
}
