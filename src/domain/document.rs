use std::fmt;

/// A titled group of rendered changelog lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub heading: String,
    pub lines: Vec<String>,
}

impl Section {
    pub fn new(heading: impl Into<String>) -> Self {
        Section {
            heading: heading.into(),
            lines: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// The final artifact: a title followed by non-empty sections in display order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangelogDocument {
    pub title: String,
    pub sections: Vec<Section>,
}

impl ChangelogDocument {
    pub fn new(title: impl Into<String>) -> Self {
        ChangelogDocument {
            title: title.into(),
            sections: Vec::new(),
        }
    }

    /// Append a section; empty sections are dropped
    pub fn push_section(&mut self, section: Section) {
        if !section.is_empty() {
            self.sections.push(section);
        }
    }

    /// Write the document as markdown
    pub fn write_markdown<W: fmt::Write>(&self, out: &mut W) -> fmt::Result {
        writeln!(out, "## {}", self.title)?;

        for section in &self.sections {
            writeln!(out)?;
            writeln!(out, "### {}", section.heading)?;
            writeln!(out)?;
            for line in &section.lines {
                writeln!(out, "- {}", line)?;
            }
        }

        Ok(())
    }
}

impl fmt::Display for ChangelogDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_markdown(f)
    }
}
