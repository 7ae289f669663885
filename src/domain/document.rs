// ============================================================
// Layer 3 — Rich-Text Domain Types
// ============================================================
// The smallest model of a rich-text paragraph that placeholder
// substitution needs:
//
//   Paragraph
//     └── runs: Vec<Run<S>>
//           ├── text  (the characters of this span)
//           └── style (opaque — never inspected, only carried)
//
// `S` is whatever the container format uses to identify a run's
// formatting. The docx codec uses the run's position in the
// source paragraph; tests use plain labels like "bold".
//
// Reference: Rust Book §10 (Generic Data Types)

use serde::{Deserialize, Serialize};

/// One independently-styled span of text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Run<S> {
    pub text:  String,
    pub style: S,
}

impl<S> Run<S> {
    pub fn new(text: impl Into<String>, style: S) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }
}

/// An ordered sequence of runs. The concatenation of the run texts
/// is the paragraph's logical text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paragraph<S> {
    pub runs: Vec<Run<S>>,
}

impl<S> Paragraph<S> {
    pub fn new(runs: Vec<Run<S>>) -> Self {
        Self { runs }
    }

    /// The full text of the paragraph, run boundaries erased.
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    /// Just the run texts, in order.
    #[cfg(test)]
    pub fn run_texts(&self) -> Vec<&str> {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }
}

#[cfg(test)]
impl Paragraph<()> {
    /// Build an unstyled paragraph from run texts.
    pub fn plain<T: Into<String>>(texts: impl IntoIterator<Item = T>) -> Self {
        Self::new(texts.into_iter().map(|t| Run::new(t, ())).collect())
    }
}
