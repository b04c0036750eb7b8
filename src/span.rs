/// A byte offset range in an input file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Span of the character at 1-based `line`/`column`, as reported by
    /// JSON parse errors. Clamped to the end of `source`.
    pub fn at_line_col(source: &str, line: usize, column: usize) -> Self {
        let mut offset = 0usize;
        for (i, l) in source.split_inclusive('\n').enumerate() {
            if i + 1 == line {
                offset += column.saturating_sub(1).min(l.len());
                break;
            }
            offset += l.len();
        }
        let offset = offset.min(source.len()) as u32;
        let end = (offset + 1).min(source.len() as u32).max(offset);
        Self::new(offset, end)
    }
}
