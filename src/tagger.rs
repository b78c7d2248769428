//! Part-of-speech tagging backends.
//!
//! Word extraction only needs "split this text into tokens and tell me which
//! ones are nouns", so the analyzer sits behind the [`PosTagger`] trait and
//! reports Sejong-style tags (`NNG`, `NNP`, `JKS`, ...).
//!
//! When the `ko-dic` feature is enabled, [`KoDicTagger`] runs lindera with
//! the embedded mecab ko-dic dictionary. Without it the crate falls back to
//! [`HeuristicTagger`], which needs no dictionary. [`default_tagger`] returns
//! whichever one the build was compiled with, so callers never need `#[cfg]`.
//!
//! Enable with: `cargo build --features ko-dic`

use crate::error::Result;

/// One token of analyzed text with its part-of-speech tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub tag: String,
}

impl Token {
    pub fn new(text: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tag: tag.into(),
        }
    }

    /// Noun categories all share the `NN` prefix (`NNG`, `NNP`, `NNB`, ...).
    pub fn is_noun(&self) -> bool {
        self.tag.starts_with("NN")
    }
}

/// Tokenizes text and assigns a part-of-speech tag to every token.
pub trait PosTagger {
    fn pos(&self, text: &str) -> Result<Vec<Token>>;
}

impl<T: PosTagger + ?Sized> PosTagger for &T {
    fn pos(&self, text: &str) -> Result<Vec<Token>> {
        (**self).pos(text)
    }
}

/// Particles stripped from the end of Hangul words, longest first.
const PARTICLES: &[&str] = &[
    "에서는", "에게서", "으로는", "으로서", "으로써", "이라는", "에서", "에게", "으로", "까지",
    "부터", "처럼", "보다", "라는", "이라", "한테", "에는", "은", "는", "이", "가", "을", "를",
    "의", "에", "도", "로", "와", "과", "만",
];

/// Dictionary-free tagger.
///
/// Text is split on anything that is not alphanumeric and again wherever the
/// script changes (Hangul, Latin, digits). Hangul runs lose one trailing
/// particle when the stem keeps at least two syllables and are tagged `NNG`;
/// digit runs are `SN`; everything else is foreign text, `SL`.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeuristicTagger;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Script {
    Hangul,
    Digit,
    Other,
}

fn script_of(c: char) -> Script {
    if ('\u{AC00}'..='\u{D7A3}').contains(&c) || ('\u{3131}'..='\u{318E}').contains(&c) {
        Script::Hangul
    } else if c.is_numeric() {
        Script::Digit
    } else {
        Script::Other
    }
}

impl HeuristicTagger {
    fn push_hangul(word: &str, out: &mut Vec<Token>) {
        let syllables = word.chars().count();
        for particle in PARTICLES {
            if let Some(stem) = word.strip_suffix(*particle) {
                if syllables - particle.chars().count() >= 2 {
                    out.push(Token::new(stem, "NNG"));
                    out.push(Token::new(*particle, "JX"));
                    return;
                }
            }
        }
        out.push(Token::new(word, "NNG"));
    }

    fn push_run(run: &str, script: Script, out: &mut Vec<Token>) {
        match script {
            Script::Hangul => Self::push_hangul(run, out),
            Script::Digit => out.push(Token::new(run, "SN")),
            Script::Other => out.push(Token::new(run, "SL")),
        }
    }
}

impl PosTagger for HeuristicTagger {
    fn pos(&self, text: &str) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        for word in text.split(|c: char| !c.is_alphanumeric()).filter(|w| !w.is_empty()) {
            let mut start = 0;
            let mut current: Option<Script> = None;
            for (idx, c) in word.char_indices() {
                let script = script_of(c);
                match current {
                    Some(prev) if prev != script => {
                        Self::push_run(&word[start..idx], prev, &mut tokens);
                        start = idx;
                        current = Some(script);
                    }
                    None => current = Some(script),
                    _ => {}
                }
            }
            if let Some(script) = current {
                Self::push_run(&word[start..], script, &mut tokens);
            }
        }
        Ok(tokens)
    }
}

#[cfg(feature = "ko-dic")]
mod ko_dic {
    use super::{PosTagger, Token};
    use crate::error::{Error, Result};
    use lindera::dictionary::{DictionaryConfig, DictionaryKind, load_dictionary_from_config};
    use lindera::mode::Mode;
    use lindera::tokenizer::Tokenizer;
    use tracing::info;

    /// lindera tokenizer backed by the embedded mecab ko-dic dictionary.
    pub struct KoDicTagger {
        tokenizer: Tokenizer,
    }

    impl KoDicTagger {
        pub fn new() -> Result<Self> {
            let config = DictionaryConfig {
                kind: Some(DictionaryKind::KoDic),
                path: None,
            };
            let dictionary =
                load_dictionary_from_config(config).map_err(|e| Error::Tagger(e.to_string()))?;
            info!("Loaded ko-dic dictionary");
            Ok(Self {
                tokenizer: Tokenizer::new(Mode::Normal, dictionary, None),
            })
        }
    }

    impl PosTagger for KoDicTagger {
        fn pos(&self, text: &str) -> Result<Vec<Token>> {
            let mut tokens = self
                .tokenizer
                .tokenize(text)
                .map_err(|e| Error::Tagger(e.to_string()))?;
            Ok(tokens
                .iter_mut()
                .map(|token| {
                    let tag = token
                        .details()
                        .first()
                        .map(|t| t.to_string())
                        .unwrap_or_default();
                    Token::new(token.text.to_string(), tag)
                })
                .collect())
        }
    }
}


#[cfg(feature = "ko-dic")]
pub use ko_dic::KoDicTagger;

#[cfg(feature = "ko-dic")]
pub type DefaultTagger = KoDicTagger;

#[cfg(not(feature = "ko-dic"))]
pub type DefaultTagger = HeuristicTagger;

/// Build the tagger this binary was compiled with.
#[cfg(feature = "ko-dic")]
pub fn default_tagger() -> Result<DefaultTagger> {
    KoDicTagger::new()
}

/// Build the tagger this binary was compiled with.
#[cfg(not(feature = "ko-dic"))]
pub fn default_tagger() -> Result<DefaultTagger> {
    Ok(HeuristicTagger)
}
