// ============================================================
// Layer 4 — Run-Span Substitution Engine
// ============================================================
// Replaces placeholder tokens inside one paragraph without
// touching run formatting, even when a token is split across
// several runs (Word does this constantly: spell-check marks,
// revision ids and autocorrect all cut runs mid-word).
//
// Algorithm:
//   1. Concatenate the run texts and remember, for every char,
//      which run it came from.
//   2. Walk the text left to right. At each position try every
//      token, longest first, so "[POINT 5.1]" beats "[POINT 5".
//   3. Match → emit the value, every char owned by the run where
//      the token STARTED; skip past the token.
//   4. No match → emit the char with its original owner.
//   5. Split the emitted chars back into one buffer per run.
//   6. Each run gets its buffer (possibly empty). Runs are never
//      added or removed, styles are never touched.
//
// Example:
//   runs   ["[PO", "INT 7.1]"]   token "[POINT 7.1]" → "Director"
//   chars   [ P O I N T   7 . 1 ]
//   owner   0 0 0 1 1 1 1 1 1 1 1
//   result ["Director", ""]
//
// Matching only ever looks at template text. A value that
// happens to contain "[POINT 2]" is emitted as-is and never
// substituted a second time.
//
// Reference: Rust Book §8 (Strings — chars vs bytes)

use crate::domain::document::{Paragraph, Run};

// ─── Replacements ─────────────────────────────────────────────────────────────
#[derive(Debug, Clone)]
struct Entry {
    token: Vec<char>,
    value: String,
}

/// A set of literal token → value pairs, kept in match order
/// (longest token first, ties broken alphabetically).
#[derive(Debug, Clone, Default)]
pub struct Replacements {
    entries: Vec<Entry>,
}

impl Replacements {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a token. Empty tokens are ignored.
    pub fn insert(&mut self, token: impl Into<String>, value: impl Into<String>) {
        let token: String = token.into();
        if token.is_empty() {
            return;
        }
        let token: Vec<char> = token.chars().collect();
        let value            = value.into();

        match self.entries.iter_mut().find(|e| e.token == token) {
            Some(existing) => existing.value = value,
            None => {
                self.entries.push(Entry { token, value });
                self.entries
                    .sort_by(|a, b| b.token.len().cmp(&a.token.len()).then_with(|| a.token.cmp(&b.token)));
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The longest token that `text` starts with.
    fn longest_match(&self, text: &[char]) -> Option<&Entry> {
        let first = *text.first()?;
        self.entries
            .iter()
            .find(|e| e.token[0] == first && text.starts_with(&e.token))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Replacements {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut reps = Replacements::new();
        for (k, v) in iter {
            reps.insert(k, v);
        }
        reps
    }
}

// ─── Paragraph substitution ───────────────────────────────────────────────────
/// Replace every mapped token in `paragraph`, keeping run count,
/// run order and run styles.
pub fn substitute_paragraph<S: Clone>(paragraph: &Paragraph<S>, replacements: &Replacements) -> Paragraph<S> {
    substitute_paragraph_counted(paragraph, replacements).0
}

/// Same as `substitute_paragraph`, also returning how many tokens
/// were replaced.
pub fn substitute_paragraph_counted<S: Clone>(
    paragraph:    &Paragraph<S>,
    replacements: &Replacements,
) -> (Paragraph<S>, usize) {
    if paragraph.is_empty() || replacements.is_empty() {
        return (paragraph.clone(), 0);
    }

    // ── Step 1: logical text + owner index ────────────────────────────────────
    let mut chars:  Vec<char>  = Vec::new();
    let mut owners: Vec<usize> = Vec::new();
    for (idx, run) in paragraph.runs.iter().enumerate() {
        for c in run.text.chars() {
            chars.push(c);
            owners.push(idx);
        }
    }

    // ── Steps 2–4: scan, longest token first ──────────────────────────────────
    let mut emitted: Vec<(char, usize)> = Vec::with_capacity(chars.len());
    let mut pos      = 0usize;
    let mut replaced = 0usize;

    while pos < chars.len() {
        match replacements.longest_match(&chars[pos..]) {
            Some(entry) => {
                let owner = owners[pos];
                emitted.extend(entry.value.chars().map(|c| (c, owner)));
                pos      += entry.token.len();
                replaced += 1;
            }
            None => {
                emitted.push((chars[pos], owners[pos]));
                pos += 1;
            }
        }
    }

    if replaced == 0 {
        return (paragraph.clone(), 0);
    }

    // ── Step 5: back into one buffer per run ──────────────────────────────────
    let mut buffers = vec![String::new(); paragraph.runs.len()];
    for (c, owner) in emitted {
        // An owner outside the run list cannot come out of step 1;
        // if it ever did, run 0 takes the char.
        let slot = if owner < buffers.len() { owner } else { 0 };
        buffers[slot].push(c);
    }

    // ── Step 6: same runs, new texts ──────────────────────────────────────────
    let runs = paragraph
        .runs
        .iter()
        .zip(buffers)
        .map(|(run, text)| Run {
            text,
            style: run.style.clone(),
        })
        .collect();

    (Paragraph::new(runs), replaced)
}

/// Every bracketed token (`[label]`, label non-empty, no nested
/// brackets, no line breaks) in `text`, in order of appearance.
pub fn find_placeholders(text: &str) -> Vec<String> {
    let mut found = Vec::new();
    let mut open: Option<usize> = None;

    for (i, c) in text.char_indices() {
        match c {
            '[' => open = Some(i),
            ']' => {
                if let Some(start) = open.take() {
                    if i > start + 1 {
                        found.push(text[start..=i].to_string());
                    }
                }
            }
            '\n' | '\r' => open = None,
            _ => {}
        }
    }

    found
}
