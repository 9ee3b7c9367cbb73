//! Carousel markup for the in-memory document
//!
//! Generates the element structure the carousel expects, with inline
//! styles standing in for measured dimensions:
//!
//! ```text
//! div#id
//! ├── div.carousel            (width)
//! │   └── ul.carousel-list    (padding-right)
//! │       └── li.carousel-item × n   (width, margin-right)
//! └── div.carousel-nav
//!     └── ul.carousel-pagination
//!         ├── li > a[data-gotoslide=prev]
//!         ├── li.carousel-page > a[data-gotoslide=i]   (text i+1)
//!         └── li > a[data-gotoslide=next]
//! ```

use carousel_dom::{el, Document, ElementBuilder, NodeId};
use serde::{Deserialize, Serialize};

use crate::config::Markup;

/// Slide count and pixel geometry for generated markup
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlideLayout {
    pub slides: usize,
    pub slide_width: i64,
    pub slide_margin_right: i64,
    pub viewport_width: i64,
    pub list_padding_right: i64,
}

impl Default for SlideLayout {
    fn default() -> Self {
        Self {
            slides: 5,
            slide_width: 300,
            slide_margin_right: 0,
            viewport_width: 300,
            list_padding_right: 0,
        }
    }
}

fn px(value: i64) -> String {
    format!("{}px", value)
}

/// A single slide element, ready for `Document::create`
pub fn slide(markup: &Markup, layout: &SlideLayout, label: impl Into<String>) -> ElementBuilder {
    el("li")
        .class(&markup.item)
        .style("width", px(layout.slide_width))
        .style("margin-right", px(layout.slide_margin_right))
        .text(label)
}

fn control(markup: &Markup, marker: &str, label: &str) -> ElementBuilder {
    el("li").child(el("a").attr(&markup.marker, marker).text(label))
}

fn page(markup: &Markup, index: usize) -> ElementBuilder {
    el("li").class(&markup.page).child(
        el("a")
            .attr(&markup.marker, index.to_string())
            .text((index + 1).to_string()),
    )
}

/// Full carousel markup for `layout`, with the container carrying `id`
pub fn carousel(id: &str, layout: &SlideLayout, markup: &Markup) -> ElementBuilder {
    let slides = (0..layout.slides).map(|i| slide(markup, layout, format!("Slide {}", i + 1)));

    let pages = std::iter::once(control(markup, "prev", "‹"))
        .chain((0..layout.slides).map(|i| page(markup, i)))
        .chain(std::iter::once(control(markup, "next", "›")));

    el("div")
        .id(id)
        .child(
            el("div")
                .class(&markup.viewport)
                .style("width", px(layout.viewport_width))
                .child(
                    el("ul")
                        .class(&markup.list)
                        .style("padding-right", px(layout.list_padding_right))
                        .children(slides),
                ),
        )
        .child(
            el("div")
                .class(&markup.nav)
                .child(el("ul").class(&markup.pagination).children(pages)),
        )
}

/// Build carousel markup under the document root, returning the container
pub fn mount(doc: &mut Document, id: &str, layout: &SlideLayout, markup: &Markup) -> NodeId {
    let root = doc.root();
    doc.append(root, carousel(id, layout, markup))
}

#[cfg(test)]
mod tests {
    use super::*;
    use carousel_core::Dom;

    #[test]
    fn test_mount_structure() {
        let mut doc = Document::new();
        let markup = Markup::default();
        let container = mount(&mut doc, "gallery", &SlideLayout::default(), &markup);

        assert_eq!(doc.get_element_by_id("gallery"), Some(container));
        assert_eq!(doc.query_all(container, ".carousel-item").unwrap().len(), 5);
        assert_eq!(doc.query_all(container, ".carousel-page").unwrap().len(), 5);
        assert_eq!(
            doc.query_all(container, ".carousel-pagination [data-gotoslide]")
                .unwrap()
                .len(),
            7
        );

        let viewport = doc.query(container, ".carousel").unwrap().unwrap();
        assert_eq!(doc.computed_style(viewport, "width").as_deref(), Some("300px"));

        let third = doc
            .query(container, ".carousel-page > [data-gotoslide=\"2\"]")
            .unwrap()
            .unwrap();
        assert_eq!(doc.text_content(third), "3");
    }

    #[test]
    fn test_custom_markup_names() {
        let mut doc = Document::new();
        let markup = Markup {
            item: "slide".to_string(),
            marker: "data-target".to_string(),
            ..Markup::default()
        };
        let layout = SlideLayout {
            slides: 2,
            ..SlideLayout::default()
        };
        let container = mount(&mut doc, "c", &layout, &markup);

        assert_eq!(doc.query_all(container, ".slide").unwrap().len(), 2);
        assert!(doc.query(container, "[data-target=next]").unwrap().is_some());
    }
}
