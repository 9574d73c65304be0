use crate::keywords::Vocabulary;

/// Outcome of matching one entry against the vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Relevance {
    pub topic: bool,
    pub location: bool,
}

impl Relevance {
    pub fn is_match(&self) -> bool { self.topic && self.location }

    pub fn reason(&self) -> &'static str {
        match (self.topic, self.location) {
            (true, true) => "match",
            (true, false) => "no-location",
            (false, true) => "no-topic",
            (false, false) => "no-topic-no-location",
        }
    }
}

/// Substring test of `title + " " + summary` against both vocabularies.
///
/// Matching is plain `str::contains` on the lower-cased text, so a phrase
/// embedded in a longer word still counts ("moore" hits "Moorestown").
pub fn check(vocab: &Vocabulary, title: &str, summary: &str) -> Relevance {
    let text = format!("{title} {summary}").to_lowercase();
    Relevance {
        topic: vocab.topics().iter().any(|kw| text.contains(kw.as_str())),
        location: vocab.locations().iter().any(|loc| text.contains(loc.as_str())),
    }
}

/// `check` against the process vocabulary.
#[cfg(test)]
pub fn is_relevant(title: &str, summary: &str) -> bool {
    check(crate::keywords::active(), title, summary).is_match()
}
