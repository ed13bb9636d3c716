//! NCX navigation document.

use crate::book::navigation::NavPoint;
use crate::book::Book;
use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};

/// Render the NCX navigation document for `book`.
pub fn render(book: &Book) -> String {
    let points = book.navigation();
    let depth = if book.chapters.iter().any(|c| !c.sections.is_empty()) {
        2
    } else {
        1
    };

    let mut nav_map = String::new();
    for point in &points {
        render_point(point, 1, &mut nav_map);
    }

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE ncx PUBLIC "-//NISO//DTD ncx 2005-1//EN" "http://www.daisy.org/z3986/2005/ncx-2005-1.dtd">
<ncx xmlns="http://www.daisy.org/z3986/2005/ncx/" version="2005-1" xml:lang="{lang}">
<head>
<meta name="dtb:uid" content="{uid}"/>
<meta name="dtb:depth" content="{depth}"/>
<meta name="dtb:totalPageCount" content="0"/>
<meta name="dtb:maxPageNumber" content="0"/>
</head>
<docTitle><text>{title}</text></docTitle>
<docAuthor><text>{author}</text></docAuthor>
<navMap>
{nav_map}</navMap>
</ncx>
"#,
        lang = attr(&book.metadata.language),
        uid = attr(&book.metadata.identifier),
        title = text(&book.metadata.title),
        author = text(&book.metadata.creator),
    )
}

fn render_point(point: &NavPoint, level: usize, out: &mut String) {
    let indent = "  ".repeat(level);
    out.push_str(&format!(
        "{indent}<navPoint id=\"{}\" playOrder=\"{}\">\n",
        attr(&point.id),
        point.play_order
    ));
    out.push_str(&format!(
        "{indent}  <navLabel><text>{}</text></navLabel>\n",
        text(&point.label)
    ));
    out.push_str(&format!(
        "{indent}  <content src=\"{}\"/>\n",
        attr(&point.src)
    ));
    for child in &point.children {
        render_point(child, level + 1, out);
    }
    out.push_str(&format!("{indent}</navPoint>\n"));
}
