use fnv::FnvHashSet;

use lazy_static::lazy_static;

use crate::clean;
use crate::extract::Paragraph;
use crate::vocab::MweVocabulary;

lazy_static! {

    /// Dotted acronyms and honorifics that never terminate a sentence.
    ///
    /// Stored lowercase and without the final period.
    static ref ABBREVIATIONS: FnvHashSet<&'static str> = [
        "s.h.i.e.l.d",
        "h.a.m.m.e.r",
        "a.i.m",
        "a.g.m",
        "n.y.p.d",
        "n.a.t.o",
        "u.s.s.r",
        "s.t.r.i.k.e",
        "u.l.t.i.m.a.t.u.m",
        "s.w.o.r.d",
        "dr",
        "mr",
        "ms",
        "mrs",
        "u.s",
        "u.s.a",
        "u.n",
        "u.k",
        "etc",
        "st",
        "col",
    ]
    .iter()
    .copied()
    .collect();

}

/// Whether the char is treated as a standalone punctuation token.
pub fn is_punctuation(c: char) -> bool {
    !c.is_alphanumeric() && !c.is_whitespace()
}

/// Transform extracted paragraphs into the normalized content block of an
/// article: cleaned, segmented into sentences, word tokenized with known
/// multi word expressions merged back together, one sentence per line.
///
/// Anchor phrases of each paragraph are registered in the vocabulary before
/// any sentence of the article is tokenized, so an entity linked anywhere in
/// the article is merged throughout it and in every article processed later.
pub fn normalize(paragraphs: &[Paragraph], vocabulary: &mut MweVocabulary) -> String {
    let mut content = String::new();
    for paragraph in paragraphs {
        let parts: Vec<&str> = paragraph.texts.iter().map(|part| part.trim()).collect();
        content.push_str(&parts.join(" "));
        content.push('\n');

        for anchor in &paragraph.anchors {
            vocabulary.register_phrase(anchor);
        }
    }

    let content = clean::strip_citations(&content);
    let content = clean::strip_url_lines(&content);

    let mut normalized = Vec::new();
    for sentence in segment_sentences(&content) {
        let tokens = tokenize(&sentence);
        // stray captions and other noise lines
        if tokens.len() <= 2 {
            continue;
        }
        normalized.push(vocabulary.merge(tokens).join(" "));
    }

    clean::repair_tokenization(&normalized.join("\n"))
}

/// Split content into sentences.
///
/// A line break always ends a sentence. `.`, `!` and `?` end one when
/// followed by whitespace or the end of the content, except that a period
/// after a token from the abbreviation exception set is non-terminal.
pub fn segment_sentences(content: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut start = 0;

    let mut chars = content.char_indices().peekable();
    while let Some((idx, c)) = chars.next() {
        match c {
            '\n' => {
                push_sentence(&content[start..idx], &mut sentences);
                start = idx + 1;
            }
            '.' | '!' | '?' => {
                let followed_by_space = chars.peek().map_or(true, |(_, next)| next.is_whitespace());
                if followed_by_space && !(c == '.' && ends_in_abbreviation(&content[..idx])) {
                    let end = idx + c.len_utf8();
                    push_sentence(&content[start..end], &mut sentences);
                    start = end;
                }
            }
            _ => {}
        }
    }
    push_sentence(&content[start..], &mut sentences);

    sentences
}

fn push_sentence(candidate: &str, sentences: &mut Vec<String>) {
    let candidate = candidate.trim();
    if !candidate.is_empty() {
        sentences.push(candidate.to_string());
    }
}

/// Whether the text in front of a period ends in a known abbreviation.
fn ends_in_abbreviation(preceding: &str) -> bool {
    let token = preceding
        .rsplit(char::is_whitespace)
        .next()
        .unwrap_or("")
        .trim_start_matches(|c: char| !c.is_alphanumeric())
        .trim_end_matches('.');

    !token.is_empty() && ABBREVIATIONS.contains(token.to_lowercase().as_str())
}

/// Split a sentence into word level tokens.
///
/// Punctuation becomes its own token. Apostrophes and hyphens between word
/// characters stay inside the word, as do the periods of dotted acronyms
/// (`S.H.I.E.L.D.` is one token, including its final period).
pub fn tokenize(sentence: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut word = String::new();

    let mut chars = sentence.chars().peekable();
    while let Some(c) = chars.next() {
        let next = chars.peek().copied();

        if c.is_alphanumeric() {
            word.push(c);
        } else if c.is_whitespace() {
            flush(&mut word, &mut tokens);
        } else if (c == '\'' || c == '-')
            && !word.is_empty()
            && next.map_or(false, char::is_alphanumeric)
        {
            word.push(c);
        } else if c == '.'
            && !word.is_empty()
            && (next.map_or(false, char::is_alphanumeric) || word.contains('.'))
        {
            word.push(c);
        } else {
            flush(&mut word, &mut tokens);
            tokens.push(c.to_string());
        }
    }
    flush(&mut word, &mut tokens);

    tokens
}

fn flush(word: &mut String, tokens: &mut Vec<String>) {
    if !word.is_empty() {
        tokens.push(std::mem::take(word));
    }
}
