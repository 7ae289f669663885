// ============================================================
// Layer 3 — Grammatical Case Domain Types
// ============================================================
// What a morphological analyzer hands back for one word.
//
// A Parse is one possible reading of a word: "this word is the
// genitive singular of a masculine surname with stem 'иванов'".
// It carries the whole ending paradigm of that reading, so it
// can produce any other case without going back to the analyzer.
//
// Example:
//   word     "иванова"
//   parse 1  stem "иванов", paradigm [ "а", "ой", "ой", "у", "ой", "ой" ], case Nominative (feminine)
//   parse 2  stem "иванов", paradigm [ "", "а", "у", "а", "ым", "е" ],    case Genitive   (masculine)

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The six Russian grammatical cases, in paradigm order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrammaticalCase {
    Nominative,
    Genitive,
    Dative,
    Accusative,
    Instrumental,
    Prepositional,
}

impl GrammaticalCase {
    pub const ALL: [GrammaticalCase; 6] = [
        GrammaticalCase::Nominative,
        GrammaticalCase::Genitive,
        GrammaticalCase::Dative,
        GrammaticalCase::Accusative,
        GrammaticalCase::Instrumental,
        GrammaticalCase::Prepositional,
    ];

    /// Position of this case in a `Paradigm`.
    pub fn index(self) -> usize {
        match self {
            GrammaticalCase::Nominative    => 0,
            GrammaticalCase::Genitive      => 1,
            GrammaticalCase::Dative        => 2,
            GrammaticalCase::Accusative    => 3,
            GrammaticalCase::Instrumental  => 4,
            GrammaticalCase::Prepositional => 5,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GrammaticalCase::Nominative    => "nominative",
            GrammaticalCase::Genitive      => "genitive",
            GrammaticalCase::Dative        => "dative",
            GrammaticalCase::Accusative    => "accusative",
            GrammaticalCase::Instrumental  => "instrumental",
            GrammaticalCase::Prepositional => "prepositional",
        }
    }
}

impl fmt::Display for GrammaticalCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GrammaticalCase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GrammaticalCase::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("unknown grammatical case '{s}'"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Masculine,
    Feminine,
}

/// Case endings indexed by `GrammaticalCase::index`.
pub type Paradigm = [&'static str; 6];

/// One candidate reading of a word.
#[derive(Debug, Clone, PartialEq)]
pub struct Parse {
    /// Lowercase stem shared by every form of the paradigm
    pub stem:     String,
    pub paradigm: Paradigm,
    /// The case the analysed word itself is in
    pub case:     GrammaticalCase,
    pub gender:   Gender,
    /// Analyzer confidence; higher is better
    pub score:    f32,
}

impl Parse {
    /// The lowercase form of this reading in `target` case.
    pub fn inflect(&self, target: GrammaticalCase) -> String {
        format!("{}{}", self.stem, self.paradigm[target.index()])
    }
}
