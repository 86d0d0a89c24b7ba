//! Language-hint heuristic and repetition filter.
//!
//! Speech models occasionally mis-detect the language of regional music and
//! film audio. The hint table maps language codes to proper nouns, function
//! words, and genre terms strongly associated with that language; a high
//! keyword score in the title and first-pass transcript triggers a forced
//! re-transcription in that language.

use std::collections::HashSet;

/// Languages the hint table can suggest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageHint {
    Hindi,
    Tamil,
    Telugu,
    Bengali,
    Malayalam,
}

impl LanguageHint {
    /// ISO 639-1 code passed to the speech model.
    pub fn code(&self) -> &'static str {
        match self {
            LanguageHint::Hindi => "hi",
            LanguageHint::Tamil => "ta",
            LanguageHint::Telugu => "te",
            LanguageHint::Bengali => "bn",
            LanguageHint::Malayalam => "ml",
        }
    }
}

/// Keyword lists per candidate language.
const HINT_KEYWORDS: &[(LanguageHint, &[&str])] = &[
    (
        LanguageHint::Hindi,
        &[
            "kumar sanu", "bollywood", "naaraaz", "hindi", "sambhala", "mere", "hai", "tum",
            "dil", "pyaar", "asha bhosle", "lata", "arijit", "yeh", "tera", "sapna", "sapne",
            "zindagi", "mohabbat", "ishq", "shayari", "hero", "villain", "gaana", "film",
            "kahani", "ranbir", "deepika",
        ],
    ),
    (
        LanguageHint::Tamil,
        &[
            "kollywood", "tamil", "rajini", "vijay", "amma", "enna", "yen", "illa", "thalaiva",
            "padam", "sivakarthikeyan", "vijay sethupathi", "ajith", "kamal", "nayanthara",
            "thambi", "satham", "kadhal", "vettai", "vannakam", "ponniyin", "selvan", "basha",
            "veeram",
        ],
    ),
    (
        LanguageHint::Telugu,
        &[
            "tollywood", "telugu", "allu", "mahesh", "raasi", "nuvvu", "vaddu", "chiranjeevi",
            "pawan", "pushpa", "icon star", "srivalli", "kotha", "bava", "ammo", "veera",
            "nenu", "evaru", "chitti", "adavi", "megastar",
        ],
    ),
    (
        LanguageHint::Bengali,
        &[
            "bengali", "kolkata", "bangla", "rabindra", "ami", "tumi", "koro", "kotha",
            "chele", "meyera", "gaaner", "sokal", "ratri", "shonar", "bijoy", "pran",
            "anondo", "bhalobasha", "bhai", "rong", "misti", "rosogolla",
        ],
    ),
    (
        LanguageHint::Malayalam,
        &[
            "malayalam", "kerala", "mohanlal", "fahadh", "ente", "njan", "alle", "oru",
            "vannu", "chila", "manasil", "amma", "kutty", "mammootty", "nivin", "dileep",
            "kalyaanam", "pookal", "thaniye", "soorya", "thattathin", "marayathe", "kanne",
        ],
    ),
];

/// Score candidate languages against the title and transcript and return the
/// best hint if it meets the threshold.
///
/// Scoring is case-insensitive substring matching; ties keep the earlier
/// table entry so results are deterministic.
pub fn detect_language_hint(
    title: &str,
    transcript: &str,
    threshold: usize,
) -> Option<LanguageHint> {
    let text = format!("{} {}", title, transcript).to_lowercase();

    let mut best: Option<(LanguageHint, usize)> = None;
    for (hint, keywords) in HINT_KEYWORDS {
        let score = keywords.iter().filter(|word| text.contains(*word)).count();
        if best.map_or(score > 0, |(_, best_score)| score > best_score) {
            best = Some((*hint, score));
        }
    }

    best.filter(|(_, score)| *score >= threshold).map(|(h, _)| h)
}

/// Check whether a transcript is too repetitive to be usable.
///
/// Degenerate speech-model output loops a handful of words; fewer distinct
/// words than the threshold means the text carries no real content.
pub fn is_degenerate(text: &str, min_distinct_words: usize) -> bool {
    let distinct: HashSet<&str> = text.split_whitespace().collect();
    distinct.len() < min_distinct_words
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hint_detected_at_threshold() {
        let hint = detect_language_hint("Kumar Sanu Bollywood Hits", "", 2);
        assert_eq!(hint, Some(LanguageHint::Hindi));
    }

    #[test]
    fn test_hint_below_threshold() {
        let hint = detect_language_hint("bollywood compilation", "", 2);
        assert_eq!(hint, None);
    }

    #[test]
    fn test_hint_uses_transcript_too() {
        let hint = detect_language_hint("old songs", "enna thalaiva padam", 2);
        assert_eq!(hint, Some(LanguageHint::Tamil));
    }

    #[test]
    fn test_hint_no_keywords() {
        let hint = detect_language_hint("A lecture on thermodynamics", "entropy increases", 2);
        assert_eq!(hint, None);
    }

    #[test]
    fn test_hint_tie_is_deterministic() {
        // Two keywords for each of Hindi and Tamil; the earlier table entry wins.
        let hint = detect_language_hint("hindi film tamil padam", "", 2);
        assert_eq!(hint, Some(LanguageHint::Hindi));
    }

    #[test]
    fn test_degenerate_transcript() {
        assert!(is_degenerate("la la la la la la", 5));
        assert!(is_degenerate("", 5));
        assert!(!is_degenerate("the quick brown fox jumps", 5));
    }
}
