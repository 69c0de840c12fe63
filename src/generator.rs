//! Document rendering - groups classified entries into a markdown changelog

use std::fmt::{self, Write};

use chrono::{DateTime, Utc};
use tracing::{debug, instrument};

use crate::config::Config;
use crate::domain::commit::short_hash;
use crate::domain::{ChangelogDocument, ClassifiedEntry, CommitKind, Range, Reference, Section};
use crate::error::{ChangelogError, Result};
use crate::git::Repository;

/// Builds changelog documents according to the rendering configuration
pub struct Generator<'a> {
    config: &'a Config,
}

impl<'a> Generator<'a> {
    pub fn new(config: &'a Config) -> Self {
        Generator { config }
    }

    /// Assemble the document: title, breaking changes, then one section per category
    pub fn build_document<R: Repository + ?Sized>(
        &self,
        entries: &[ClassifiedEntry],
        range: &Range,
        repo: &R,
    ) -> Result<ChangelogDocument> {
        let mut document = ChangelogDocument::new(self.title(&range.upper, entries, repo)?);

        let mut breaking = Section::new(self.config.sections.breaking_heading.as_str());
        for entry in entries.iter().filter(|e| e.is_breaking()) {
            let text = entry
                .breaking_description
                .as_deref()
                .filter(|d| !d.is_empty())
                .unwrap_or(entry.subject.as_str());
            breaking.lines.push(self.line(entry, text).map_err(formatter_error)?);
        }
        document.push_section(breaking);

        for kind in CommitKind::RENDER_ORDER {
            let mut section = Section::new(self.config.sections.heading(kind));
            for entry in entries.iter().filter(|e| e.kind == kind) {
                section
                    .lines
                    .push(self.line(entry, &entry.subject).map_err(formatter_error)?);
            }
            document.push_section(section);
        }

        Ok(document)
    }

    /// Render the document to bytes
    #[instrument(skip_all, fields(range = %range, entries = entries.len()))]
    pub fn render<R: Repository + ?Sized>(
        &self,
        entries: &[ClassifiedEntry],
        range: &Range,
        repo: &R,
    ) -> Result<Vec<u8>> {
        let document = self.build_document(entries, range, repo)?;

        let mut output = String::new();
        document
            .write_markdown(&mut output)
            .map_err(formatter_error)?;

        debug!(
            sections = document.sections.len(),
            bytes = output.len(),
            "rendered changelog"
        );
        Ok(output.into_bytes())
    }

    fn title<R: Repository + ?Sized>(
        &self,
        upper: &Reference,
        entries: &[ClassifiedEntry],
        repo: &R,
    ) -> Result<String> {
        let render = &self.config.render;

        let (label, date) = match upper {
            Reference::CurrentPosition { .. } => return Ok(render.unreleased_title.clone()),
            Reference::Tag { name, .. } => {
                let date = repo
                    .list_tags()?
                    .into_iter()
                    .find(|tag| &tag.name == name)
                    .map(|tag| tag.commit_timestamp);
                (name.clone(), date)
            }
            Reference::Commit { hash, .. } => {
                let date = entries
                    .iter()
                    .find(|entry| &entry.hash == hash)
                    .map(|entry| entry.timestamp);
                (short_hash(hash, render.short_hash_length).to_string(), date)
            }
        };

        match date {
            Some(date) => self.dated_title(&label, date),
            None => Ok(label),
        }
    }

    fn dated_title(&self, label: &str, date: DateTime<Utc>) -> Result<String> {
        let mut title = String::new();
        write!(
            title,
            "{} ({})",
            label,
            date.format(&self.config.render.date_format)
        )
        .map_err(|_| {
            ChangelogError::render(format!(
                "invalid date format '{}'",
                self.config.render.date_format
            ))
        })?;
        Ok(title)
    }

    fn line(&self, entry: &ClassifiedEntry, text: &str) -> std::result::Result<String, fmt::Error> {
        let render = &self.config.render;
        let mut line = String::new();

        if let Some(scope) = &entry.scope {
            write!(line, "({}) ", scope)?;
        }
        line.push_str(text);

        if render.include_hashes {
            let abbrev = entry.short_hash(render.short_hash_length);
            match &render.repo_url {
                Some(url) => write!(
                    line,
                    " ([{}]({}/commit/{}))",
                    abbrev,
                    url.trim_end_matches('/'),
                    entry.hash
                )?,
                None => write!(line, " ({})", abbrev)?,
            }
        }

        if render.include_authors {
            write!(line, " - {}", entry.author)?;
        }

        Ok(line)
    }
}

fn formatter_error(_: fmt::Error) -> ChangelogError {
    ChangelogError::render("formatter error while writing changelog")
}

/// Render with the default configuration
pub fn render<R: Repository + ?Sized>(
    entries: &[ClassifiedEntry],
    range: &Range,
    repo: &R,
) -> Result<Vec<u8>> {
    Generator::new(&Config::default()).render(entries, range, repo)
}
