use fnv::FnvHashSet;

use crate::clean::strip_parenthetical;

/// Separator inserted between the words of a merged multi word expression.
pub const MWE_SEPARATOR: &str = "_";

/// A growing set of multi word expressions that are treated as a single
/// token during normalization.
///
/// The vocabulary only ever grows: entries registered while one article is
/// processed stay in effect for every article processed afterwards. Merging
/// is longest match first, so overlapping entries like `Iron Man` and
/// `Iron Man Armor` resolve to the longer one where possible.
#[derive(Debug, Clone, Default)]
pub struct MweVocabulary {
    /// All registered word sequences.
    entries: FnvHashSet<Vec<String>>,
    /// Length of the longest registered sequence.
    max_len: usize,
}

impl MweVocabulary {
    pub fn new() -> Self {
        Default::default()
    }

    /// Number of registered expressions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Register a word sequence as a single semantic unit.
    ///
    /// Sequences shorter than two words are ignored, they need no merging.
    /// Registering an already known sequence is a no-op.
    pub fn register<I, S>(&mut self, words: I)
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        let words: Vec<String> = words.into_iter().map(|w| w.to_string()).collect();
        if words.len() < 2 {
            return;
        }
        self.max_len = self.max_len.max(words.len());
        self.entries.insert(words);
    }

    /// Register an anchor phrase, split on whitespace.
    pub fn register_phrase(&mut self, phrase: &str) {
        self.register(phrase.split_whitespace());
    }

    /// Seed the vocabulary from catalog titles, with parenthetical
    /// disambiguators like `(Earth-616)` removed first.
    pub fn seed_from_titles<'a, I>(&mut self, titles: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        for title in titles {
            self.register_phrase(&strip_parenthetical(title));
        }
    }

    /// Whether the exact word sequence is a known expression.
    pub fn contains(&self, words: &[String]) -> bool {
        self.entries.contains(words)
    }

    /// Re-combine every contiguous token subsequence that matches a known
    /// expression into one token, joined with [`MWE_SEPARATOR`].
    pub fn merge(&self, tokens: Vec<String>) -> Vec<String> {
        if self.entries.is_empty() {
            return tokens;
        }

        let mut merged = Vec::with_capacity(tokens.len());
        let mut i = 0;
        while i < tokens.len() {
            let longest = (2..=self.max_len.min(tokens.len() - i))
                .rev()
                .find(|len| self.contains(&tokens[i..i + len]));

            match longest {
                Some(len) => {
                    merged.push(tokens[i..i + len].join(MWE_SEPARATOR));
                    i += len;
                }
                None => {
                    merged.push(tokens[i].clone());
                    i += 1;
                }
            }
        }
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(s: &str) -> Vec<String> {
        s.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn register_is_idempotent() {
        let mut vocab = MweVocabulary::new();
        vocab.register_phrase("Iron Man");
        vocab.register_phrase("Iron Man");
        assert_eq!(vocab.len(), 1);
        assert_eq!(
            vocab.merge(tokens("Iron Man flew")),
            tokens("Iron_Man flew")
        );
    }

    #[test]
    fn single_words_not_registered() {
        let mut vocab = MweVocabulary::new();
        vocab.register_phrase("Hulk");
        assert!(vocab.is_empty());
    }

    #[test]
    fn longest_match_wins() {
        let mut vocab = MweVocabulary::new();
        vocab.register_phrase("Iron Man");
        vocab.register_phrase("Iron Man Armor");

        assert_eq!(
            vocab.merge(tokens("the Iron Man Armor was lost")),
            tokens("the Iron_Man_Armor was lost")
        );
        assert_eq!(
            vocab.merge(tokens("Iron Man was lost")),
            tokens("Iron_Man was lost")
        );
    }

    #[test]
    fn merged_spans_do_not_overlap() {
        let mut vocab = MweVocabulary::new();
        vocab.register_phrase("War Machine");
        vocab.register_phrase("Machine Man");

        // the left match consumes its tokens, the rest is scanned afresh
        assert_eq!(
            vocab.merge(tokens("War Machine Man")),
            tokens("War_Machine Man")
        );
    }

    #[test]
    fn seeding_strips_parentheticals() {
        let mut vocab = MweVocabulary::new();
        vocab.seed_from_titles(vec![
            "Anthony Stark (Earth-616)",
            "Hulk (Earth-616)",
            "Steve Rogers",
        ]);
        assert_eq!(vocab.len(), 2);
        assert!(vocab.contains(&tokens("Anthony Stark")));
        assert!(vocab.contains(&tokens("Steve Rogers")));
        assert!(!vocab.contains(&tokens("Hulk")));
    }
}
