//! Plain-text rendering of tagged articles.
//!
//! Each article becomes three lines: the title, its tags joined by `", "`,
//! and a blank separator line.

use crate::models::TaggedArticle;
use std::io::{self, Write};

/// Render one article in the text layout.
pub fn format_tagged(article: &TaggedArticle) -> String {
    format!("{}\n{}\n", article.title, article.tags.join(", "))
}

/// Write every article of a day to `out`.
pub fn write_tagged<W: Write>(out: &mut W, articles: &[TaggedArticle]) -> io::Result<()> {
    for article in articles {
        writeln!(out, "{}", format_tagged(article))?;
    }
    out.flush()
}
