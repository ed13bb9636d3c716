//! The navigation tree shared by the NCX document and the HTML table of contents.
//!
//! Play order is sequential over a depth-first walk: the table of contents
//! first, then each chapter immediately followed by its sections.

use crate::markup::Chapter;

/// File name of the generated HTML table of contents.
pub const TOC_FILE: &str = "toc.html";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavPoint {
    pub id: String,
    pub play_order: usize,
    pub label: String,
    /// Document (and optional fragment) the entry points at
    pub src: String,
    pub children: Vec<NavPoint>,
}

/// Build the navigation tree for the given chapters.
pub fn build(chapters: &[Chapter]) -> Vec<NavPoint> {
    let mut play_order = 0;
    let mut next = || {
        play_order += 1;
        play_order
    };

    let mut points = vec![NavPoint {
        id: "toc".to_string(),
        play_order: next(),
        label: "Table of Contents".to_string(),
        src: TOC_FILE.to_string(),
        children: Vec::new(),
    }];

    for chapter in chapters {
        let mut point = NavPoint {
            id: format!("chapter-{}", chapter.number),
            play_order: next(),
            label: chapter.title.clone(),
            src: chapter.file.clone(),
            children: Vec::new(),
        };
        for section in &chapter.sections {
            point.children.push(NavPoint {
                id: format!("section-{}", section.id),
                play_order: next(),
                label: section.title.clone(),
                src: format!("{}#{}", chapter.file, section.id),
                children: Vec::new(),
            });
        }
        points.push(point);
    }

    points
}

#[cfg(test)]
mod test {
    use super::*;

    fn flatten(points: &[NavPoint]) -> Vec<(String, usize)> {
        points
            .iter()
            .flat_map(|p| {
                std::iter::once((p.id.clone(), p.play_order)).chain(flatten(&p.children))
            })
            .collect()
    }

    #[test]
    fn play_order_is_depth_first() {
        let chapters = vec![
            Chapter::parse(1, "one", "# One\n= A\n").expect("can parse"),
            Chapter::parse(2, "two", "# Two\n= B\ntext\n= C\n").expect("can parse"),
        ];
        let points = build(&chapters);

        assert_eq!(
            flatten(&points),
            vec![
                ("toc".to_string(), 1),
                ("chapter-1".to_string(), 2),
                ("section-1-1".to_string(), 3),
                ("chapter-2".to_string(), 4),
                ("section-2-1".to_string(), 5),
                ("section-2-2".to_string(), 6),
            ]
        );
        assert_eq!(points[2].children[1].src, "two.html#2-2");
        assert_eq!(points[2].children[1].label, "C");
        assert_eq!(points[1].label, "One");
    }

    #[test]
    fn empty_book_only_has_toc() {
        let points = build(&[]);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].src, TOC_FILE);
    }
}
