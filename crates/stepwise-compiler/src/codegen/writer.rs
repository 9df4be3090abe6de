//! Line-based source writer with indentation

/// Writer for generated Rust text.
///
/// Tracks the indentation level and never indents empty lines, so the
/// output carries no trailing whitespace.
pub struct SourceWriter {
    out: String,
    indent: usize,
    indent_width: usize,
}

impl SourceWriter {
    pub fn new(indent_width: usize) -> Self {
        Self {
            out: String::new(),
            indent: 0,
            indent_width,
        }
    }

    /// Write a complete line at the current indentation
    pub fn line(&mut self, s: &str) {
        if !s.is_empty() {
            for _ in 0..self.indent * self.indent_width {
                self.out.push(' ');
            }
            self.out.push_str(s);
        }
        self.out.push('\n');
    }

    /// Write a formatted line.
    /// Convenience method to avoid `w.line(&format!(...))`.
    pub fn line_fmt(&mut self, args: std::fmt::Arguments<'_>) {
        self.line(&args.to_string());
    }

    /// Write an empty line, unless the previous line is already empty or
    /// opens a block
    pub fn blank(&mut self) {
        if self.out.is_empty() || self.out.ends_with("\n\n") || self.out.ends_with("{\n") {
            return;
        }
        self.out.push('\n');
    }

    /// Write `header` and indent the following lines
    pub fn open(&mut self, header: &str) {
        self.line(header);
        self.indent += 1;
    }

    /// Dedent and write `footer`, dropping a blank line right before it
    pub fn close(&mut self, footer: &str) {
        if self.out.ends_with("\n\n") {
            self.out.pop();
        }
        self.indent = self.indent.saturating_sub(1);
        self.line(footer);
    }

    pub fn indent(&mut self) {
        self.indent += 1;
    }

    pub fn dedent(&mut self) {
        self.indent = self.indent.saturating_sub(1);
    }

    /// Consume the writer and return the text
    pub fn finish(self) -> String {
        self.out
    }
}
