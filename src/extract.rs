//! Word and keyword extraction.
//!
//! [`WordExtractor::extract_words`] turns free text into candidate nouns:
//! known entities are matched literally first, then the remainder goes
//! through a [`PosTagger`]. [`WordExtractor::extract_keywords`] weights an
//! article's title over its summary and keeps the nouns that repeat.

use crate::config::Config;
use crate::error::Result;
use crate::models::Article;
use crate::tagger::PosTagger;
use itertools::Itertools;
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::trace;

/// Replaces each matched known entity so overlapping entities can't re-match.
const PLACEHOLDER: &str = "X";

/// The static word lists and per-publisher rules used during extraction.
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    /// Known entities in scan order: longest first, then lexical.
    scan_order: Vec<String>,
    known: HashSet<String>,
    blacklist: HashSet<String>,
    summary_terminators: BTreeMap<String, String>,
}

impl Lexicon {
    pub fn new<I, J>(
        known_entities: I,
        blacklist: J,
        summary_terminators: BTreeMap<String, String>,
    ) -> Self
    where
        I: IntoIterator<Item = String>,
        J: IntoIterator<Item = String>,
    {
        let known: HashSet<String> = known_entities
            .into_iter()
            .filter(|e| !e.is_empty())
            .collect();
        let scan_order = known
            .iter()
            .cloned()
            .sorted_by(|a, b| {
                b.chars()
                    .count()
                    .cmp(&a.chars().count())
                    .then_with(|| a.cmp(b))
            })
            .collect();
        Self {
            scan_order,
            known,
            blacklist: blacklist.into_iter().collect(),
            summary_terminators,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.known_entities.iter().cloned(),
            config.blacklist.iter().cloned(),
            config.summary_terminators.clone(),
        )
    }

    pub fn is_known(&self, word: &str) -> bool {
        self.known.contains(word)
    }

    pub fn is_blacklisted(&self, word: &str) -> bool {
        self.blacklist.contains(word)
    }

    pub fn known_entities(&self) -> &HashSet<String> {
        &self.known
    }

    pub fn scan_order(&self) -> &[String] {
        &self.scan_order
    }

    /// The summary with any publisher-specific trailer cut off.
    pub fn trim_summary<'a>(&self, publisher: &str, summary: &'a str) -> &'a str {
        match self.summary_terminators.get(publisher) {
            Some(marker) => summary.split(marker.as_str()).next().unwrap_or(summary),
            None => summary,
        }
    }
}

/// Rank `words` by frequency, keeping at most `n`.
///
/// Ties keep the order in which words first appeared, so the result is a
/// pure function of the input sequence.
pub fn most_common<I, S>(words: I, n: usize) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut counts: Vec<(String, usize)> = Vec::new();
    for word in words {
        let word = word.as_ref();
        match index.get(word) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(word.to_string(), counts.len());
                counts.push((word.to_string(), 1));
            }
        }
    }
    // `sorted_by` is stable, which preserves first-appearance order on ties.
    counts
        .into_iter()
        .sorted_by(|a, b| b.1.cmp(&a.1))
        .take(n)
        .collect()
}

/// Extracts candidate nouns from text using a [`Lexicon`] and a tagger.
#[derive(Debug)]
pub struct WordExtractor<T> {
    tagger: T,
    lexicon: Lexicon,
    top_nouns: usize,
}

impl<T> WordExtractor<T>
where
    T: PosTagger,
{
    pub fn new(tagger: T, lexicon: Lexicon, top_nouns: usize) -> Self {
        Self {
            tagger,
            lexicon,
            top_nouns,
        }
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// Known entities found in `text` (each once, in scan order) followed by
    /// the tagged nouns of what remains.
    pub fn extract_words(&self, text: &str) -> Result<Vec<String>> {
        let mut remaining = text.to_string();
        let mut words = Vec::new();

        for known in self.lexicon.scan_order() {
            if remaining.contains(known.as_str()) {
                remaining = remaining.replace(known.as_str(), PLACEHOLDER);
                words.push(known.clone());
            }
        }

        for token in self.tagger.pos(&remaining)? {
            if token.is_noun()
                && token.text.chars().count() > 1
                && !self.lexicon.is_blacklisted(&token.text)
            {
                words.push(token.text);
            }
        }

        trace!(count = words.len(), "Extracted words");
        Ok(words)
    }

    /// The text keyword extraction runs over: the title twice, then the
    /// (possibly trimmed) summary.
    pub fn weighted_source(&self, article: &Article) -> String {
        let summary = self
            .lexicon
            .trim_summary(&article.source_name, &article.summary);
        [article.title.as_str(), article.title.as_str(), summary].join(". ")
    }

    /// Candidate keywords for one article, most frequent first.
    ///
    /// Of the `top_nouns` most frequent nouns, a noun survives if it is a
    /// known entity or appears more than once in the weighted source.
    ///
    /// # Arguments
    ///
    /// * `article` - The article whose title (counted twice) and trimmed
    ///   summary are analyzed
    ///
    /// # Returns
    ///
    /// At most `top_nouns` distinct words in frequency order, ties kept in
    /// order of first appearance.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// // title "세월호 구조 작업 난항", empty summary
    /// let keywords = extractor.extract_keywords(&article)?;
    /// assert_eq!(keywords, ["세월호", "구조", "작업", "난항"]);
    /// ```
    pub fn extract_keywords(&self, article: &Article) -> Result<Vec<String>> {
        let source = self.weighted_source(article);
        let nouns = self.extract_words(&source)?;
        Ok(most_common(&nouns, self.top_nouns)
            .into_iter()
            .filter(|(noun, n)| self.lexicon.is_known(noun) || *n > 1)
            .map(|(noun, _)| noun)
            .collect())
    }
}
