//! Inline formatting of source lines.
//!
//! Lines are run through an ordered list of rules before the block parser
//! sees them. Each rule is applied to the leftmost match over and over until
//! the line has no more matches for it, then the next rule takes over. Links
//! and footnotes go first and are substituted with their rendered markup
//! immediately, so the emphasis rules that follow can wrap text that already
//! holds markup. A delimiter sitting inside a tag (say, `_` or `*` in a URL)
//! never opens or closes emphasis.

use super::entity::{Entity, EntityKind};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static LINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[@,([^,\]]+)(?:,([^\]]*))?\]").expect("can compile link pattern")
});
static FOOTNOTE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[\+,([^\]]+)\]").expect("can compile footnote pattern"));
static EMPHASIS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"_([^_]+)_").expect("can compile emphasis pattern"));
static STRONG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*([^*]+)\*").expect("can compile strong pattern"));

/// A position is inside a tag when a tag opens before it and closes after it.
static TAG_OPENED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<[/A-Za-z][^<>]*$").expect("can compile tag opening pattern"));
static TAG_CLOSED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^<>]*>").expect("can compile tag closing pattern"));

#[derive(Debug, Clone, Copy)]
enum Action {
    /// Wrap capture group 1 in the given tag
    Wrap(&'static str),
    Link,
    Footnote,
}

struct Rule {
    pattern: &'static Lazy<Regex>,
    action: Action,
}

static RULES: [Rule; 4] = [
    Rule {
        pattern: &LINK,
        action: Action::Link,
    },
    Rule {
        pattern: &FOOTNOTE,
        action: Action::Footnote,
    },
    Rule {
        pattern: &EMPHASIS,
        action: Action::Wrap("em"),
    },
    Rule {
        pattern: &STRONG,
        action: Action::Wrap("strong"),
    },
];

/// A footnote collected while formatting a chapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Footnote {
    pub ordinal: usize,
    pub body: Entity,
}

impl Footnote {
    /// The id of the anchor the footnote reference links back to.
    pub fn anchor(&self) -> String {
        format!("fn-{}", self.ordinal)
    }
}

/// The footnotes of a single chapter, in allocation order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Footnotes {
    notes: Vec<Footnote>,
}

impl Footnotes {
    /// Allocate the next footnote for `text`.
    pub fn allocate(&mut self, text: &str) -> &Footnote {
        let ordinal = self.notes.len() + 1;

        let mut anchor = Entity::of(EntityKind::A);
        anchor.set_attribute("name", format!("fn-{ordinal}"));

        let mut body = Entity::of(EntityKind::P);
        body.append(anchor)
            .append(format!("{ordinal}. {}", text.trim()))
            .add_class("small");

        self.notes.push(Footnote { ordinal, body });
        &self.notes[ordinal - 1]
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn into_vec(self) -> Vec<Footnote> {
        self.notes
    }
}

/// Apply every inline rule to `line`, allocating footnotes as they're found.
pub fn format(line: &str, footnotes: &mut Footnotes) -> String {
    RULES
        .iter()
        .fold(line.to_string(), |line, rule| rule.apply(line, footnotes))
}

impl Rule {
    fn apply(&self, mut line: String, footnotes: &mut Footnotes) -> String {
        let mut from = 0;
        while let Some(caps) = self.pattern.captures_at(&line, from) {
            let Some(whole) = caps.get(0) else {
                break;
            };
            let mut range = whole.range();

            let replacement = match self.action {
                Action::Wrap(tag) => {
                    // delimiters are ASCII, so one byte past them is a char boundary
                    if inside_tag(&line, range.start) {
                        from = range.start + 1;
                        continue;
                    }
                    let Some(close) = closing_delimiter(&line, range.end - 1) else {
                        from = range.start + 1;
                        continue;
                    };
                    range.end = close + 1;
                    format!("<{tag}>{}</{tag}>", &line[range.start + 1..close])
                }
                Action::Link => link(&caps),
                Action::Footnote => {
                    let text = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
                    let note = footnotes.allocate(text);
                    format!(
                        "<sup><a href=\"#{}\">{}</a></sup>",
                        note.anchor(),
                        note.ordinal
                    )
                }
            };

            line.replace_range(range.clone(), &replacement);
            from = range.start + replacement.len();
        }
        line
    }
}

fn link(caps: &Captures<'_>) -> String {
    let target = caps.get(1).map(|m| m.as_str().trim()).unwrap_or_default();
    let label = caps
        .get(2)
        .map(|m| m.as_str().trim())
        .filter(|label| !label.is_empty())
        .unwrap_or(target);
    let mut anchor = Entity::with_text(EntityKind::A, label);
    anchor.set_attribute("href", target);
    anchor.render()
}

fn inside_tag(line: &str, at: usize) -> bool {
    TAG_OPENED.is_match(&line[..at]) && TAG_CLOSED.is_match(&line[at..])
}

/// The first delimiter at or after `candidate` that isn't inside a tag.
fn closing_delimiter(line: &str, mut candidate: usize) -> Option<usize> {
    let delimiter = line[candidate..].chars().next()?;
    while inside_tag(line, candidate) {
        let next = candidate + 1;
        candidate = next + line[next..].find(delimiter)?;
    }
    Some(candidate)
}
