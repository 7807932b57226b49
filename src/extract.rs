use select::document::Document;
use select::node::Node;
use select::predicate::{Attr, Name, Predicate};

/// Continuity suffix the wiki appends to article titles.
pub const TITLE_SUFFIX: &str = " (Earth-616)";

/// Id of the element holding the article body.
const ARTICLE_BODY_ID: &str = "WikiaArticle";

/// Class substring of the block holding the article header.
const TITLE_HEADER_CLASS: &str = "header-title";

/// Matches nodes whose `class` attribute contains the given substring, like
/// XPath's `contains(@class, ..)`.
#[derive(Debug, Clone, Copy)]
pub struct ClassContains<'a>(pub &'a str);

impl<'a> Predicate for ClassContains<'a> {
    fn matches(&self, node: &Node) -> bool {
        node.attr("class")
            .map_or(false, |class| class.contains(self.0))
    }
}

/// One article body paragraph: its descendant text nodes in document order,
/// and the text of its direct child anchors.
///
/// The anchor phrases feed the multi word vocabulary, the text parts feed
/// the normalizer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Paragraph {
    pub texts: Vec<String>,
    pub anchors: Vec<String>,
}

pub trait Extractor {
    /// Extract the article's display title.
    fn title(&self, doc: &Document) -> Option<String>;

    /// Extract the article body paragraphs in document order.
    fn paragraphs(&self, doc: &Document) -> Vec<Paragraph>;
}

/// Extractor for the wiki's stock article markup: the body lives in
/// `div#WikiaArticle`, paragraphs are `<p>` grandchildren of it, and the
/// title is the `<h1>` inside the `header-title` block, with the continuity
/// suffix removed.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultExtractor;

impl Extractor for DefaultExtractor {
    fn title(&self, doc: &Document) -> Option<String> {
        let header = doc
            .find(ClassContains(TITLE_HEADER_CLASS).descendant(Name("h1")))
            .next()?;
        let title = header.text();
        let title = title.trim();
        let title = title.strip_suffix(TITLE_SUFFIX).unwrap_or(title);

        if title.is_empty() {
            None
        } else {
            Some(title.to_string())
        }
    }

    fn paragraphs(&self, doc: &Document) -> Vec<Paragraph> {
        let body = match doc.find(Attr("id", ARTICLE_BODY_ID)).next() {
            Some(node) => node,
            None => return Vec::new(),
        };

        let mut paragraphs = Vec::new();
        for section in body.children() {
            for node in section.children().filter(|node| node.is(Name("p"))) {
                paragraphs.push(extract_paragraph(&node));
            }
        }
        paragraphs
    }
}

fn extract_paragraph(node: &Node) -> Paragraph {
    let mut texts = Vec::new();
    collect_text(node, &mut texts);

    let anchors = node
        .children()
        .filter(|child| child.is(Name("a")))
        .map(|anchor| anchor.text())
        .collect();

    Paragraph { texts, anchors }
}

/// Collect all descendant text nodes in document order.
fn collect_text(node: &Node, texts: &mut Vec<String>) {
    if let Some(text) = node.as_text() {
        texts.push(text.to_string());
    }
    for child in node.children() {
        collect_text(&child, texts);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
            <div class="page header-title"><h1>Anthony Stark (Earth-616)</h1></div>
            <div id="WikiaArticle">
                <div>
                    <p>Tony Stark is <a href="/wiki/Iron_Man">Iron Man</a>.</p>
                    <p>He leads the <b><a href="/wiki/Avengers">Avengers</a></b> team.</p>
                </div>
            </div>
        </body></html>"#;

    #[test]
    fn title_suffix_stripped() {
        let doc = Document::from(PAGE);
        assert_eq!(
            DefaultExtractor.title(&doc),
            Some("Anthony Stark".to_string())
        );
    }

    #[test]
    fn paragraphs_with_text_parts_and_anchors() {
        let doc = Document::from(PAGE);
        let paragraphs = DefaultExtractor.paragraphs(&doc);
        assert_eq!(paragraphs.len(), 2);

        assert_eq!(
            paragraphs[0].texts,
            vec!["Tony Stark is ", "Iron Man", "."]
        );
        assert_eq!(paragraphs[0].anchors, vec!["Iron Man"]);

        // the nested anchor is not a direct child, only its text survives
        assert_eq!(
            paragraphs[1].texts,
            vec!["He leads the ", "Avengers", " team."]
        );
        assert!(paragraphs[1].anchors.is_empty());
    }

    #[test]
    fn missing_body_yields_no_paragraphs() {
        let doc = Document::from("<html><body><p>stray</p></body></html>");
        assert!(DefaultExtractor.paragraphs(&doc).is_empty());
        assert_eq!(DefaultExtractor.title(&doc), None);
    }
}
