//! OPF package document: metadata, manifest, spine and guide.

use crate::book::navigation::TOC_FILE;
use crate::book::Book;
use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};

const NCX_ID: &str = "ncx";
const COVER_ID: &str = "cover";

/// Manifest id of the chapter at `index` (0-based).
pub fn chapter_id(index: usize) -> String {
    format!("item_{index}")
}

/// Render the OPF package document for `book`.
pub fn render(book: &Book) -> String {
    let meta = &book.metadata;
    let mut lines = vec![
        r#"<?xml version="1.0" encoding="utf-8"?>"#.to_string(),
        r#"<package xmlns="http://www.idpf.org/2007/opf" version="2.0" unique-identifier="BookId">"#
            .to_string(),
        r#"<metadata xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:opf="http://www.idpf.org/2007/opf">"#
            .to_string(),
        String::new(),
        format!("<dc:title>{}</dc:title>", text(&meta.title)),
        format!("<dc:language>{}</dc:language>", text(&meta.language)),
    ];
    if book.cover.is_some() {
        lines.push(format!(r#"<meta name="cover" content="{COVER_ID}" />"#));
    }
    lines.extend([
        format!(
            r#"<dc:identifier id="BookId" opf:scheme="ISBN">{}</dc:identifier>"#,
            text(&meta.identifier)
        ),
        format!("<dc:creator>{}</dc:creator>", text(&meta.creator)),
        format!("<dc:publisher>{}</dc:publisher>", text(&meta.publisher)),
        format!("<dc:subject>{}</dc:subject>", text(&meta.subject)),
        format!("<dc:date>{}</dc:date>", text(&meta.date)),
        format!("<dc:description>{}</dc:description>", text(&meta.description)),
        String::new(),
        "</metadata>".to_string(),
    ]);

    // manifest
    lines.push("<manifest>".to_string());
    for (i, chapter) in book.chapters.iter().enumerate() {
        lines.push(format!(
            r#"  <item id="{}" media-type="application/xhtml+xml" href="{}"></item>"#,
            chapter_id(i),
            attr(&chapter.file)
        ));
    }
    lines.push(String::new());
    for media in &book.media {
        lines.push(format!(
            r#"  <item id="{name}" media-type="{}" href="{name}" />"#,
            media.media_type,
            name = attr(&media.name)
        ));
    }
    lines.push(String::new());
    lines.push(format!(
        r#"  <item id="toc" media-type="application/xhtml+xml" href="{TOC_FILE}" />"#
    ));
    lines.push(format!(
        r#"  <item id="{NCX_ID}" media-type="application/x-dtbncx+xml" href="{}.ncx"/>"#,
        attr(&book.name)
    ));
    if let Some(cover) = &book.cover {
        lines.push(format!(
            r#"  <item id="{COVER_ID}" media-type="{}" href="{}"/>"#,
            cover.media_type,
            attr(&cover.name)
        ));
    }
    lines.push("</manifest>".to_string());

    // spine
    lines.push(format!(r#"<spine toc="{NCX_ID}">"#));
    for i in 0..book.chapters.len() {
        lines.push(format!(r#"  <itemref idref="{}" />"#, chapter_id(i)));
    }
    lines.push("</spine>".to_string());

    // guide
    lines.push("<guide>".to_string());
    lines.push(format!(
        r#"  <reference type="toc" title="Table of Contents" href="{TOC_FILE}"></reference>"#
    ));
    if let Some(first) = book.chapters.first() {
        lines.push(format!(
            r#"  <reference type="text" title="{}" href="{}"></reference>"#,
            attr(&first.title),
            attr(&first.file)
        ));
    }
    lines.push("</guide>".to_string());
    lines.push("</package>".to_string());

    let mut opf = lines.join("\n");
    opf.push('\n');
    opf
}
