//! Heuristic part-of-speech tagging and POS-conditioned actor contexts.
//!
//! The tagger is rule-based: a closed-class function-word lexicon plus
//! suffix heuristics, enough to bucket context tokens into adjective, verb,
//! and noun rankings. It tokenizes document text itself rather than reusing
//! the whitespace-split stream used by the frequency and TF-IDF paths; POS
//! decisions belong to the raw-text world, frequency tables to the cleaned
//! token world.

use std::collections::HashSet;
use std::sync::OnceLock;

use crate::corpus::Documents;
use crate::frequency::Counter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PosTag {
    Adjective,
    Verb,
    Noun,
}

impl PosTag {
    pub const ALL: [PosTag; 3] = [PosTag::Adjective, PosTag::Verb, PosTag::Noun];

    pub fn as_str(self) -> &'static str {
        match self {
            PosTag::Adjective => "ADJ",
            PosTag::Verb => "VERB",
            PosTag::Noun => "NOUN",
        }
    }
}

/// Closed-class words carry no adjective/verb/noun signal.
const FUNCTION_WORDS: &[&str] = &[
    "a", "an", "the", "this", "that", "these", "those", "and", "or", "but", "nor", "so", "yet",
    "of", "in", "on", "at", "by", "for", "with", "from", "to", "into", "onto", "over", "under",
    "about", "after", "before", "between", "during", "through", "against", "amid", "among",
    "i", "you", "he", "she", "it", "we", "they", "them", "him", "her", "his", "its", "their",
    "our", "my", "your", "who", "whom", "whose", "which", "what", "where", "when", "why", "how",
    "not", "no", "as", "if", "than", "then", "there", "here", "while", "because", "since",
    "although", "though", "until", "unless", "also", "very", "too", "just", "only", "even",
    "will", "would", "shall", "should", "can", "could", "may", "might", "must",
];

const IRREGULAR_VERBS: &[&str] = &[
    "be", "is", "are", "was", "were", "been", "being", "am", "have", "has", "had", "do", "does",
    "did", "done", "say", "says", "said", "make", "makes", "made", "take", "takes", "took",
    "taken", "go", "goes", "went", "gone", "come", "comes", "came", "get", "gets", "got", "see",
    "sees", "saw", "seen", "know", "knows", "knew", "known", "tell", "tells", "told", "give",
    "gives", "gave", "given", "find", "finds", "found", "leave", "leaves", "left", "keep",
    "keeps", "kept", "hold", "holds", "held", "lose", "loses", "lost", "meet", "meets", "met",
    "send", "sends", "sent", "strike", "strikes", "struck", "fight", "fights", "fought", "flee",
    "flees", "fled", "speak", "speaks", "spoke", "spoken", "begin", "begins", "began", "begun",
];

const IRREGULAR_ADJECTIVES: &[&str] = &[
    "good", "bad", "big", "small", "new", "old", "young", "high", "low", "long", "short",
    "strong", "weak", "dead", "main", "major", "minor", "key", "top", "humanitarian", "civilian",
    "military", "foreign", "severe", "heavy", "large", "huge", "wide", "deep", "early", "late",
    "last", "first", "second", "third", "other", "own", "same", "full", "little", "great",
];

/// Common -ing/-ed lookalikes that stay nouns.
const NOUN_EXCEPTIONS: &[&str] = &[
    "thing", "things", "something", "nothing", "anything", "everything", "morning", "evening",
    "building", "buildings", "king", "wing", "ring", "spring", "ceiling", "wedding", "hundred",
];

fn lexicon(words: &'static [&'static str], cell: &'static OnceLock<HashSet<&'static str>>) -> &'static HashSet<&'static str> {
    cell.get_or_init(|| words.iter().copied().collect())
}

fn function_words() -> &'static HashSet<&'static str> {
    static CELL: OnceLock<HashSet<&'static str>> = OnceLock::new();
    lexicon(FUNCTION_WORDS, &CELL)
}

fn irregular_verbs() -> &'static HashSet<&'static str> {
    static CELL: OnceLock<HashSet<&'static str>> = OnceLock::new();
    lexicon(IRREGULAR_VERBS, &CELL)
}

fn irregular_adjectives() -> &'static HashSet<&'static str> {
    static CELL: OnceLock<HashSet<&'static str>> = OnceLock::new();
    lexicon(IRREGULAR_ADJECTIVES, &CELL)
}

fn noun_exceptions() -> &'static HashSet<&'static str> {
    static CELL: OnceLock<HashSet<&'static str>> = OnceLock::new();
    lexicon(NOUN_EXCEPTIONS, &CELL)
}

/// Classify a single lowercase token, or `None` for function words, adverbs,
/// and non-word tokens. Unknown content words default to noun, the largest
/// open class.
pub fn tag_token(token: &str) -> Option<PosTag> {
    if token.is_empty() || !token.chars().any(|c| c.is_alphabetic()) {
        return None;
    }
    if function_words().contains(token) {
        return None;
    }
    if irregular_verbs().contains(token) {
        return Some(PosTag::Verb);
    }
    if irregular_adjectives().contains(token) {
        return Some(PosTag::Adjective);
    }
    if noun_exceptions().contains(token) {
        return Some(PosTag::Noun);
    }
    if token.ends_with("ly") {
        // Adverbs fall outside the three tracked classes.
        return None;
    }
    if (token.ends_with("ing") && token.len() > 4)
        || (token.ends_with("ed") && token.len() > 3)
        || token.ends_with("ise")
        || token.ends_with("ize")
        || token.ends_with("ify")
    {
        return Some(PosTag::Verb);
    }
    if token.ends_with("ous")
        || token.ends_with("ful")
        || token.ends_with("ive")
        || token.ends_with("less")
        || token.ends_with("able")
        || token.ends_with("ible")
        || (token.ends_with("ish") && token.len() > 4)
        || (token.ends_with("ic") && token.len() > 3)
        || (token.ends_with("al") && token.len() > 4)
    {
        return Some(PosTag::Adjective);
    }
    Some(PosTag::Noun)
}

/// Tokenize raw document text for tagging: whitespace split, surrounding
/// punctuation trimmed, lowercased.
pub fn tag_tokens(text: &str) -> Vec<(String, Option<PosTag>)> {
    text.split_whitespace()
        .map(|raw| {
            let word: String = raw
                .trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase();
            let tag = tag_token(&word);
            (word, tag)
        })
        .filter(|(word, _)| !word.is_empty())
        .collect()
}

/// Per-actor POS context rankings: adjectives, verbs, and nouns found within
/// `window` tokens of any actor-lemma occurrence.
#[derive(Debug, Default)]
pub struct PosContexts {
    pub adjectives: Vec<(String, u64)>,
    pub verbs: Vec<(String, u64)>,
    pub nouns: Vec<(String, u64)>,
}

impl PosContexts {
    pub fn ranking(&self, tag: PosTag) -> &[(String, u64)] {
        match tag {
            PosTag::Adjective => &self.adjectives,
            PosTag::Verb => &self.verbs,
            PosTag::Noun => &self.nouns,
        }
    }
}

/// Tag each document fresh and count the ADJ/VERB/NOUN tokens surrounding
/// every actor-lemma occurrence. The actor token itself is not context.
pub fn actor_pos_contexts(
    docs: &Documents,
    actor_lemmas: &[String],
    window: usize,
    topk: usize,
) -> PosContexts {
    let mut adjectives: Counter = Counter::new();
    let mut verbs: Counter = Counter::new();
    let mut nouns: Counter = Counter::new();

    for text in docs.values() {
        let tagged = tag_tokens(text);
        let n = tagged.len();
        for i in 0..n {
            if !actor_lemmas.iter().any(|l| *l == tagged[i].0) {
                continue;
            }
            let start = i.saturating_sub(window);
            let end = (i + 1 + window).min(n);
            for (j, (word, tag)) in tagged[start..end].iter().enumerate() {
                if start + j == i {
                    continue;
                }
                match tag {
                    Some(PosTag::Adjective) => adjectives.bump(word.clone()),
                    Some(PosTag::Verb) => verbs.bump(word.clone()),
                    Some(PosTag::Noun) => nouns.bump(word.clone()),
                    None => {}
                }
            }
        }
    }

    PosContexts {
        adjectives: adjectives.most_common(Some(topk)),
        verbs: verbs.most_common(Some(topk)),
        nouns: nouns.most_common(Some(topk)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::Documents;

    #[test]
    fn tagger_buckets() {
        assert_eq!(tag_token("dangerous"), Some(PosTag::Adjective));
        assert_eq!(tag_token("massive"), Some(PosTag::Adjective));
        assert_eq!(tag_token("humanitarian"), Some(PosTag::Adjective));
        assert_eq!(tag_token("bombing"), Some(PosTag::Verb));
        assert_eq!(tag_token("attacked"), Some(PosTag::Verb));
        assert_eq!(tag_token("said"), Some(PosTag::Verb));
        assert_eq!(tag_token("soldier"), Some(PosTag::Noun));
        assert_eq!(tag_token("city"), Some(PosTag::Noun));
        assert_eq!(tag_token("building"), Some(PosTag::Noun));
        assert_eq!(tag_token("the"), None);
        assert_eq!(tag_token("quickly"), None);
        assert_eq!(tag_token("123"), None);
    }

    #[test]
    fn tag_tokens_trims_punctuation_and_lowercases() {
        let tagged = tag_tokens("The soldiers attacked, (Dangerous) streets.");
        let words: Vec<&str> = tagged.iter().map(|(w, _)| w.as_str()).collect();
        assert_eq!(words, vec!["the", "soldiers", "attacked", "dangerous", "streets"]);
        assert_eq!(tagged[2].1, Some(PosTag::Verb));
        assert_eq!(tagged[3].1, Some(PosTag::Adjective));
    }

    #[test]
    fn actor_pos_contexts_window_and_buckets() {
        let mut docs = Documents::new();
        docs.insert(
            "d1".to_string(),
            "dangerous hamas attacked city distantword1 distantword2 massive".to_string(),
        );
        let lemmas = vec!["hamas".to_string()];
        let ctx = actor_pos_contexts(&docs, &lemmas, 2, 10);

        assert_eq!(ctx.adjectives, vec![("dangerous".to_string(), 1)]);
        assert_eq!(ctx.verbs, vec![("attacked".to_string(), 1)]);
        assert_eq!(ctx.nouns, vec![("city".to_string(), 1)]);
        // "massive" sits outside the window.
        assert!(ctx.adjectives.iter().all(|(w, _)| w != "massive"));
    }

    #[test]
    fn actor_token_itself_is_not_context() {
        let mut docs = Documents::new();
        docs.insert("d1".to_string(), "hamas hamas city".to_string());
        let ctx = actor_pos_contexts(&docs, &["hamas".to_string()], 2, 10);
        // The occurrence being expanded is excluded from its own context,
        // but the neighboring occurrence still counts as a noun token.
        assert_eq!(ctx.nouns.iter().find(|(w, _)| w == "city").unwrap().1, 2);
        assert_eq!(ctx.nouns.iter().find(|(w, _)| w == "hamas").unwrap().1, 2);
    }
}
