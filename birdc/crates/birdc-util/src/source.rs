//! Source buffer with diagnostic context rendering.

/// The program text, split by line.
///
/// Diagnostics are anchored by (line, column); the buffer renders the
/// offending line flanked by its neighbours with a caret under the
/// offending character.
pub struct SourceBuffer {
    text: String,
    lines: Vec<String>,
}

const FENCE_WIDTH: usize = 100;

impl SourceBuffer {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let lines = text.split('\n').map(str::to_string).collect();
        Self { text, lines }
    }

    /// The raw program text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of lines in the buffer.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Returns the given line (1-based), if present.
    pub fn line(&self, line: u32) -> Option<&str> {
        if line == 0 {
            return None;
        }
        self.lines.get(line as usize - 1).map(String::as_str)
    }

    /// Renders the context picture for a location: a fence, the previous
    /// line, the offending line with a caret under `column`, the next line,
    /// and a closing fence.
    pub fn render_context(&self, line: u32, column: u32) -> String {
        let mut out = String::new();
        let fence = "~".repeat(FENCE_WIDTH);

        out.push_str(&fence);
        out.push('\n');

        if line > 1 {
            if let Some(prev) = self.line(line - 1) {
                out.push_str(prev);
                out.push('\n');
            }
        }

        out.push_str(self.line(line).unwrap_or(""));
        out.push('\n');

        let caret_col = column.saturating_sub(1) as usize;
        out.push_str(&"-".repeat(caret_col));
        out.push_str("^\n");

        if let Some(next) = self.line(line + 1) {
            out.push_str(next);
            out.push('\n');
        }

        out.push_str(&fence);
        out.push('\n');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_lookup() {
        let buf = SourceBuffer::new("var x = 1;\nprint x;\n");
        assert_eq!(buf.line(1), Some("var x = 1;"));
        assert_eq!(buf.line(2), Some("print x;"));
        assert_eq!(buf.line(0), None);
    }

    #[test]
    fn test_context_caret_position() {
        let buf = SourceBuffer::new("var x = 1;\nprint y;");
        let rendered = buf.render_context(2, 7);
        assert!(rendered.contains("print y;"));
        assert!(rendered.contains("------^"));
        // first line appears as the preceding neighbour
        assert!(rendered.contains("var x = 1;"));
    }

    #[test]
    fn test_context_on_first_line() {
        let buf = SourceBuffer::new("print y;");
        let rendered = buf.render_context(1, 1);
        assert!(rendered.starts_with('~'));
        assert!(rendered.contains("^\n"));
    }
}
