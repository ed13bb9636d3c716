//! HTML table of contents page.
//!
//! Built from the same entity tree as the chapters, so it renders with the
//! same conventions: one list item per chapter, with a nested list linking
//! to each of the chapter's sections.

use crate::book::Book;
use crate::markup::{Entity, EntityKind};

/// Render the table of contents page for `book`.
pub fn render(book: &Book) -> String {
    let mut chapters = Entity::of(EntityKind::Ul);
    chapters.add_class("toc");

    for chapter in &book.chapters {
        let mut item = Entity::of(EntityKind::Li);
        item.append(link(&chapter.file, &chapter.title));

        if !chapter.sections.is_empty() {
            let mut sections = Entity::of(EntityKind::Ul);
            for section in &chapter.sections {
                let mut entry = Entity::of(EntityKind::Li);
                entry.append(link(
                    &format!("{}#{}", chapter.file, section.id),
                    &section.title,
                ));
                sections.append(entry);
            }
            item.append(sections);
        }
        chapters.append(item);
    }

    let heading = Entity::with_text(EntityKind::H1, "Table of Contents");

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.1//EN" "http://www.w3.org/TR/xhtml11/DTD/xhtml11.dtd">
<html xmlns="http://www.w3.org/1999/xhtml">
<head>
<title>Table of Contents - {title}</title>
<link rel="stylesheet" href="{stylesheet}" type="text/css" />
</head>
<body>

{heading}{chapters}
</body>
</html>
"#,
        title = html_escape::encode_text(&book.metadata.title),
        stylesheet = html_escape::encode_double_quoted_attribute(&book.stylesheet),
        heading = heading.render(),
        chapters = if book.chapters.is_empty() {
            String::new()
        } else {
            chapters.render()
        },
    )
}

fn link(href: &str, label: &str) -> Entity {
    let mut a = Entity::with_text(EntityKind::A, html_escape::encode_text(label));
    a.set_attribute("href", html_escape::encode_double_quoted_attribute(href));
    a
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::book::test::assemble;

    #[test]
    fn lists_chapters_with_nested_sections() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let book = assemble(dir.path());
        let html = render(&book);

        assert!(html.contains("<title>Table of Contents - Test Book</title>"));
        assert!(html.contains(
            "<li><a href=\"intro.html\">Introduction</a>\n<ul><li><a href=\"intro.html#1-1\">Getting Started</a></li>\n</ul>\n</li>\n"
        ));
        assert!(html.contains("<a href=\"ending.html#2-1\">First</a>"));
        assert!(html.contains("<a href=\"ending.html#2-2\">Second</a>"));

        let intro = html.find("intro.html\"").expect("has intro");
        let ending = html.find("ending.html\"").expect("has ending");
        assert!(intro < ending);
    }

    #[test]
    fn labels_are_escaped() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let mut book = assemble(dir.path());
        book.chapters[0].title = "Q & A".to_string();
        let html = render(&book);
        assert!(html.contains(">Q &amp; A</a>"));
    }
}
