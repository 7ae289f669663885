// ============================================================
// Layer 4 — Grammatical Inflection Helper
// ============================================================
// Puts a personal name into a grammatical case, word by word,
// before it is written into a template:
//
//   "Иванов Иван Иванович"  --genitive-->  "Иванова Ивана Ивановича"
//
// For each word:
//   1. Split off leading/trailing punctuation ("Иванов," → "Иванов" + ",")
//   2. Hyphenated parts are handled separately ("Петрова-Водкина")
//   3. Ask the analyzer for readings of the lowercase word
//   4. Pick one reading (policy below) and produce the target case
//   5. Re-apply the word's capitalisation: UPPER, Title, lower, or
//      the original letter-by-letter pattern for mixed case
//
// Reading policy: prefer a reading in which the word is itself
// nominative (the name is assumed to arrive in dictionary form);
// among equals the higher score wins, then analyzer order. This
// is a deterministic choice, not a guarantee of linguistic
// correctness for every input.
//
// Nothing here fails: a word without a usable reading is kept
// exactly as it was.

use std::sync::Arc;

use crate::data::russian_names::RussianNameAnalyzer;
use crate::domain::grammar::{GrammaticalCase, Parse};
use crate::domain::traits::MorphAnalyzer;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Casing {
    Upper,
    Title,
    Lower,
    /// Anything else: which char positions were upper case
    Mixed(Vec<bool>),
}

impl Casing {
    fn of(word: &str) -> Self {
        let letters: Vec<char> = word.chars().filter(|c| c.is_alphabetic()).collect();
        let Some(first) = letters.first() else {
            return Casing::Lower;
        };

        if letters.len() > 1 && letters.iter().all(|c| c.is_uppercase()) {
            Casing::Upper
        } else if first.is_uppercase() && letters[1..].iter().all(|c| !c.is_uppercase()) {
            Casing::Title
        } else if letters.iter().all(|c| !c.is_uppercase()) {
            Casing::Lower
        } else {
            Casing::Mixed(word.chars().map(char::is_uppercase).collect())
        }
    }

    fn apply(&self, lower: &str) -> String {
        match self {
            Casing::Upper => lower.to_uppercase(),
            Casing::Title => {
                let mut chars = lower.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None        => String::new(),
                }
            }
            Casing::Lower => lower.to_string(),
            // Positions past the original word (new endings) stay lower case.
            Casing::Mixed(upper) => lower
                .chars()
                .enumerate()
                .map(|(i, c)| match upper.get(i) {
                    Some(true) => c.to_uppercase().collect::<String>(),
                    _          => c.to_string(),
                })
                .collect(),
        }
    }
}

/// Inflects names through a pluggable analyzer.
#[derive(Clone)]
pub struct Inflector {
    analyzer: Arc<dyn MorphAnalyzer>,
}

impl std::fmt::Debug for Inflector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Inflector").finish_non_exhaustive()
    }
}

impl Default for Inflector {
    fn default() -> Self {
        Self::russian()
    }
}

impl Inflector {
    pub fn new(analyzer: Arc<dyn MorphAnalyzer>) -> Self {
        Self { analyzer }
    }

    /// Inflector backed by the built-in Russian name rules.
    pub fn russian() -> Self {
        Self::new(Arc::new(RussianNameAnalyzer::new()))
    }

    /// Inflect every word of `name`, keeping all whitespace as is.
    pub fn inflect_name(&self, name: &str, case: GrammaticalCase) -> String {
        let mut out  = String::with_capacity(name.len() + 8);
        let mut word = String::new();

        for c in name.chars() {
            if c.is_whitespace() {
                if !word.is_empty() {
                    out.push_str(&self.inflect_token(&word, case));
                    word.clear();
                }
                out.push(c);
            } else {
                word.push(c);
            }
        }
        if !word.is_empty() {
            out.push_str(&self.inflect_token(&word, case));
        }

        out
    }

    /// One whitespace-free token: punctuation around it and hyphens
    /// inside it are kept in place.
    fn inflect_token(&self, token: &str, case: GrammaticalCase) -> String {
        let start = token
            .char_indices()
            .find(|(_, c)| c.is_alphabetic())
            .map(|(i, _)| i);
        let Some(start) = start else {
            return token.to_string();
        };
        let end = token
            .char_indices()
            .rev()
            .find(|(_, c)| c.is_alphabetic())
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(token.len());

        let core = &token[start..end];
        let inflected: Vec<String> = core
            .split('-')
            .map(|part| self.inflect_word(part, case))
            .collect();

        format!("{}{}{}", &token[..start], inflected.join("-"), &token[end..])
    }

    /// Inflect a single word, or return it unchanged.
    pub fn inflect_word(&self, word: &str, case: GrammaticalCase) -> String {
        let lower  = word.to_lowercase();
        let parses = self.analyzer.parse(&lower);

        match choose_reading(&parses) {
            Some(parse) => Casing::of(word).apply(&parse.inflect(case)),
            None => {
                tracing::debug!("No reading for '{}', keeping it unchanged", word);
                word.to_string()
            }
        }
    }
}

/// Nominative readings first, then by score, then analyzer order.
fn choose_reading(parses: &[Parse]) -> Option<&Parse> {
    fn best<'a>(candidates: impl Iterator<Item = &'a Parse>) -> Option<&'a Parse> {
        candidates.fold(None, |acc: Option<&Parse>, p| match acc {
            Some(kept) if kept.score >= p.score => Some(kept),
            _ => Some(p),
        })
    }

    best(parses.iter().filter(|p| p.case == GrammaticalCase::Nominative)).or_else(|| best(parses.iter()))
}
