// ============================================================
// Layer 4 — Rule-Based Russian Name Analyzer
// ============================================================
// A small MorphAnalyzer for Russian personal names. It knows the
// declension classes that cover most surnames, patronymics and
// first names; anything else is reported as unknown.
//
// Every rule is a class marker (how the stem must end) plus the
// six case endings of that class. A word is analysed by trying
// each rule in each case:
//
//   word "иванова", rule "-ов masc. surname" ["", "а", "у", "а", "ым", "е"]
//     genitive   : "иванов" + "а"  → stem ends in "ов"  ✓
//     accusative : "иванов" + "а"  → stem ends in "ов"  ✓
//   word "иванова", rule "-ова fem. surname" ["а", "ой", "ой", "у", "ой", "ой"]
//     nominative : "иванов" + "а"  ✓
//
// The analyzer does not decide between readings; it returns all
// of them, best score first, and lets the Inflector's policy pick.
// Fleeting vowels (Пётр → Петра) and indeclinable names are not
// modelled.

use crate::domain::grammar::{Gender, GrammaticalCase, Paradigm, Parse};
use crate::domain::traits::MorphAnalyzer;

/// How the stem of a declension class must end.
#[derive(Debug, Clone, Copy)]
enum Marker {
    /// Stem ends with one of these strings
    Suffix(&'static [&'static str]),
    /// Stem's last letter is one of these
    AnyOf(&'static str),
}

impl Marker {
    fn accepts(self, stem: &str) -> bool {
        match self {
            Marker::Suffix(tails) => tails.iter().any(|t| stem.ends_with(t)),
            Marker::AnyOf(letters) => stem.chars().last().is_some_and(|c| letters.contains(c)),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Rule {
    marker:   Marker,
    paradigm: Paradigm,
    gender:   Gender,
    score:    f32,
}

const SURNAME_TAILS:    &[&str] = &["ов", "ев", "ёв", "ин", "ын"];
const ADJ_TAILS:        &[&str] = &["ск", "цк"];
const PATRONYMIC_M:     &[&str] = &["ович", "евич"];
const PATRONYMIC_F:     &[&str] = &["овн", "евн"];
const HARD_CONSONANTS:  &str    = "бвгдзклмнпрстфх";
const HUSHING:          &str    = "жчшщц";
const VELARS:           &str    = "гкх";
const J_VOWELS:         &str    = "аеоуыэюя";

// Ordered roughly from most to least specific; scores settle ties.
const RULES: &[Rule] = &[
    // ── Surnames ──────────────────────────────────────────────────────────────
    Rule { marker: Marker::Suffix(SURNAME_TAILS), paradigm: ["", "а", "у", "а", "ым", "е"],           gender: Gender::Masculine, score: 1.0 },
    Rule { marker: Marker::Suffix(SURNAME_TAILS), paradigm: ["а", "ой", "ой", "у", "ой", "ой"],       gender: Gender::Feminine,  score: 1.0 },
    Rule { marker: Marker::Suffix(ADJ_TAILS),     paradigm: ["ий", "ого", "ому", "ого", "им", "ом"],  gender: Gender::Masculine, score: 1.0 },
    Rule { marker: Marker::Suffix(ADJ_TAILS),     paradigm: ["ая", "ой", "ой", "ую", "ой", "ой"],     gender: Gender::Feminine,  score: 1.0 },
    Rule { marker: Marker::AnyOf(HARD_CONSONANTS), paradigm: ["ой", "ого", "ому", "ого", "ым", "ом"], gender: Gender::Masculine, score: 0.7 },
    // ── Patronymics ───────────────────────────────────────────────────────────
    Rule { marker: Marker::Suffix(PATRONYMIC_M),  paradigm: ["", "а", "у", "а", "ем", "е"],           gender: Gender::Masculine, score: 1.0 },
    Rule { marker: Marker::Suffix(PATRONYMIC_F),  paradigm: ["а", "ы", "е", "у", "ой", "е"],          gender: Gender::Feminine,  score: 1.0 },
    // ── First names ───────────────────────────────────────────────────────────
    Rule { marker: Marker::AnyOf("и"),            paradigm: ["й", "я", "ю", "я", "ем", "и"],          gender: Gender::Masculine, score: 0.6 },
    Rule { marker: Marker::AnyOf("и"),            paradigm: ["я", "и", "и", "ю", "ей", "и"],          gender: Gender::Feminine,  score: 0.6 },
    Rule { marker: Marker::AnyOf(J_VOWELS),       paradigm: ["й", "я", "ю", "я", "ем", "е"],          gender: Gender::Masculine, score: 0.5 },
    Rule { marker: Marker::AnyOf("бвгдзклмнпрстфхжчшщль"), paradigm: ["я", "и", "е", "ю", "ей", "е"], gender: Gender::Feminine, score: 0.5 },
    Rule { marker: Marker::AnyOf("бвгдзклмнпрстфх"), paradigm: ["ь", "я", "ю", "я", "ем", "е"],       gender: Gender::Masculine, score: 0.5 },
    Rule { marker: Marker::AnyOf(VELARS),         paradigm: ["а", "и", "е", "у", "ой", "е"],          gender: Gender::Feminine,  score: 0.5 },
    Rule { marker: Marker::AnyOf("жчшщ"),         paradigm: ["а", "и", "е", "у", "ей", "е"],          gender: Gender::Feminine,  score: 0.5 },
    Rule { marker: Marker::AnyOf("ц"),            paradigm: ["а", "ы", "е", "у", "ей", "е"],          gender: Gender::Feminine,  score: 0.5 },
    Rule { marker: Marker::AnyOf("бвдзлмнпрстф"), paradigm: ["а", "ы", "е", "у", "ой", "е"],          gender: Gender::Feminine,  score: 0.5 },
    Rule { marker: Marker::AnyOf(HARD_CONSONANTS), paradigm: ["", "а", "у", "а", "ом", "е"],          gender: Gender::Masculine, score: 0.5 },
    Rule { marker: Marker::AnyOf(HUSHING),        paradigm: ["", "а", "у", "а", "ем", "е"],           gender: Gender::Masculine, score: 0.5 },
];

/// Shortest stem a rule may leave behind; keeps prepositions and
/// initials out of the analysis.
const MIN_STEM_CHARS: usize = 2;

#[derive(Debug, Clone, Copy, Default)]
pub struct RussianNameAnalyzer;

impl RussianNameAnalyzer {
    pub fn new() -> Self {
        Self
    }
}

fn is_russian_lowercase(c: char) -> bool {
    matches!(c, 'а'..='я' | 'ё')
}

impl MorphAnalyzer for RussianNameAnalyzer {
    fn parse(&self, word: &str) -> Vec<Parse> {
        if word.is_empty() || !word.chars().all(is_russian_lowercase) {
            return Vec::new();
        }

        let mut parses = Vec::new();
        for rule in RULES {
            for case in GrammaticalCase::ALL {
                let Some(stem) = word.strip_suffix(rule.paradigm[case.index()]) else {
                    continue;
                };
                if stem.chars().count() < MIN_STEM_CHARS || !rule.marker.accepts(stem) {
                    continue;
                }
                parses.push(Parse {
                    stem:     stem.to_string(),
                    paradigm: rule.paradigm,
                    case,
                    gender:   rule.gender,
                    score:    rule.score,
                });
            }
        }

        // Stable: equal scores keep rule order
        parses.sort_by(|a, b| b.score.total_cmp(&a.score));
        parses
    }
}
