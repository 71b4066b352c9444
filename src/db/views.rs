//! Read-only reports over the citation graph. Every view writes to the
//! supplied writer; the commands hand in stdout.

use std::io::{self, Write};

use super::CitationDb;
use crate::common::format_tags;

impl CitationDb {
    /// Each publication followed by the publications it cites
    pub fn view_citation_network<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for paper in self.publications() {
            if paper.cites_to.is_empty() {
                writeln!(out, "{} does not cite any other papers", paper.title())?;
            }
            for cited in &paper.cites_to {
                writeln!(out, "{}\n\t---> {}", paper.title(), self.title_of(cited))?;
            }
            writeln!(out)?;
        }
        Ok(())
    }

    /// Publications carrying `tag`, or else their citations carrying it.
    ///
    /// A publication that has the tag is printed on its own; its tagged
    /// citations are not listed. Only publications without the tag show the
    /// tagged publications they cite.
    pub fn view_citation_network_with_tag<W: Write>(&self, tag: &str, out: &mut W) -> io::Result<()> {
        writeln!(out, "Papers tagged with {}", tag)?;
        for paper in self.publications() {
            if paper.has_tag(tag) {
                writeln!(out, "{}\n\thas tags: {}", paper.title(), format_tags(&paper.tags))?;
                writeln!(out)?;
                continue;
            }

            let tagged: Vec<_> = paper
                .cites_to
                .iter()
                .filter_map(|id| self.get(id))
                .filter(|cited| cited.has_tag(tag))
                .collect();
            if tagged.is_empty() {
                continue;
            }
            for cited in tagged {
                writeln!(out, "\t--->{} has tags: {}", cited.title(), format_tags(&cited.tags))?;
            }
            writeln!(out)?;
        }
        Ok(())
    }

    pub fn view_untagged<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "Untagged Papers")?;
        for paper in self.untagged() {
            writeln!(out, "{}", paper.title())?;
        }
        Ok(())
    }

    pub fn view_all_citations<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for paper in self.publications() {
            writeln!(out, "{}", paper.title())?;
            if !paper.tags.is_empty() {
                writeln!(out, "\t{}", format_tags(&paper.tags))?;
            }
        }
        Ok(())
    }

    /// Tags, notes and read state of every publication with this title.
    /// Returns whether anything matched.
    pub fn view_single<W: Write>(&self, title: &str, out: &mut W) -> io::Result<bool> {
        let mut found = false;
        for paper in self.find_by_title(title) {
            found = true;
            writeln!(out, "{}", paper.title())?;
            writeln!(out, "TAGS: {}", format_tags(&paper.tags))?;
            writeln!(out, "Notes: {}", paper.notes.join("\n       "))?;
            writeln!(out, "Read: {}", if paper.read { "yes" } else { "no" })?;
        }
        if !found {
            writeln!(out, "{} NOT FOUND IN DB", title)?;
        }
        Ok(found)
    }
}
