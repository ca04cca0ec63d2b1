mod selector;

use crate::document::selector::{Compound, Selector};
use crate::error::DocumentError;

/// The selectors a DOM tag cycles through, in order.
pub const DOM_SELECTORS: [&str; 6] = [
    r#"[data-node="story"]"#,
    r#"[data-node="product"]"#,
    r#"[data-node="cta"]"#,
    "article.highlight",
    ".content-block p",
    ".content-block ul li",
];

/// Read-only query access to a document.
///
/// DOM tags only ever ask how many elements match a selector. A selector that matches nothing
/// is a zero count, not an error.
pub trait DocumentQuery: Send + Sync {
    fn count_matches(&self, selector: &str) -> Result<usize, DocumentError>;
}

/// Shape of the synthetic markup seeded into a [SyntheticDocument].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentSeed {
    /// Number of `article` elements in the content block.
    pub articles: usize,
    /// Number of `li` call-to-action entries in each article's list.
    pub cta_per_article: usize,
}

impl Default for DocumentSeed {
    fn default() -> Self {
        Self {
            articles: 80,
            cta_per_article: 5,
        }
    }
}

impl DocumentSeed {
    pub fn articles(mut self, articles: usize) -> Self {
        self.articles = articles;
        self
    }

    pub fn cta_per_article(mut self, cta_per_article: usize) -> Self {
        self.cta_per_article = cta_per_article;
        self
    }
}

#[derive(Debug, Clone)]
struct Element {
    tag: &'static str,
    classes: Vec<&'static str>,
    attributes: Vec<(&'static str, String)>,
    parent: Option<usize>,
}

impl Element {
    fn matches(&self, compound: &Compound) -> bool {
        if let Some(tag) = &compound.tag {
            if tag != self.tag {
                return false;
            }
        }

        compound
            .classes
            .iter()
            .all(|class| self.classes.iter().any(|c| c == class))
            && compound.attributes.iter().all(|matcher| {
                self.attributes.iter().any(|(name, value)| {
                    *name == matcher.name
                        && matcher.value.as_ref().map_or(true, |expected| expected == value)
                })
            })
    }
}

/// An in-memory element tree standing in for a page, with a small selector engine.
///
/// Supports tag names, `.class`, `[attr]` and `[attr="value"]` parts joined by descendant
/// combinators. Queries walk every element on each call so that their cost scales with the
/// size of the seeded markup.
#[derive(Debug, Clone)]
pub struct SyntheticDocument {
    elements: Vec<Element>,
}

impl Default for SyntheticDocument {
    fn default() -> Self {
        Self::seed(DocumentSeed::default())
    }
}

impl SyntheticDocument {
    /// Build `html > body > section.content-block` holding the seeded articles.
    pub fn seed(seed: DocumentSeed) -> Self {
        let mut document = Self {
            elements: Vec::new(),
        };

        let html = document.push("html", vec![], vec![], None);
        let body = document.push("body", vec![], vec![], Some(html));
        let root = document.push(
            "section",
            vec!["content-block"],
            vec![("hidden", String::new())],
            Some(body),
        );

        for i in 0..seed.articles {
            let class = if i % 3 == 0 { "highlight" } else { "standard" };
            let node = if i % 2 == 0 { "story" } else { "product" };
            let article = document.push(
                "article",
                vec![class],
                vec![("data-node", node.to_string())],
                Some(root),
            );

            document.push("h3", vec![], vec![], Some(article));
            document.push("p", vec![], vec![], Some(article));
            let list = document.push("ul", vec!["cta-list"], vec![], Some(article));

            for j in 0..seed.cta_per_article {
                let node = if j % 2 == 0 { "cta" } else { "link" };
                document.push("li", vec![], vec![("data-node", node.to_string())], Some(list));
            }
        }

        log::debug!(
            "Seeded synthetic document with {} elements ({} articles, {} CTAs per article)",
            document.elements.len(),
            seed.articles,
            seed.cta_per_article
        );

        document
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    fn push(
        &mut self,
        tag: &'static str,
        classes: Vec<&'static str>,
        attributes: Vec<(&'static str, String)>,
        parent: Option<usize>,
    ) -> usize {
        self.elements.push(Element {
            tag,
            classes,
            attributes,
            parent,
        });
        self.elements.len() - 1
    }

    fn matches(&self, index: usize, selector: &Selector) -> bool {
        let Some((last, ancestors)) = selector.compounds.split_last() else {
            return false;
        };

        if !self.elements[index].matches(last) {
            return false;
        }

        // Right to left, each remaining compound must match some ancestor above the previous one.
        let mut current = self.elements[index].parent;
        for compound in ancestors.iter().rev() {
            loop {
                match current {
                    Some(i) if self.elements[i].matches(compound) => {
                        current = self.elements[i].parent;
                        break;
                    }
                    Some(i) => current = self.elements[i].parent,
                    None => return false,
                }
            }
        }

        true
    }
}

impl DocumentQuery for SyntheticDocument {
    fn count_matches(&self, selector: &str) -> Result<usize, DocumentError> {
        let selector = Selector::parse(selector)?;
        Ok((0..self.elements.len())
            .filter(|&index| self.matches(index, &selector))
            .count())
    }
}
