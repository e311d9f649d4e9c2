//! Read-only document view over a parsed GPX XML tree
//!
//! All tag lookup and text access used by the rest of the crate goes through
//! this module, so the XML library shows up in exactly one place.

use crate::Result;

/// A parsed GPX document.
///
/// Thin wrapper around the XML tree that exposes tag-name lookup rooted at
/// the `<gpx>` element. Borrows the input text for its whole lifetime.
pub struct GpxDocument<'input> {
    doc: roxmltree::Document<'input>,
}

impl<'input> GpxDocument<'input> {
    /// Parse GPX XML text into a document view.
    pub fn parse(text: &'input str) -> Result<Self> {
        let doc = roxmltree::Document::parse(text)?;
        Ok(Self { doc })
    }

    /// The root `<gpx>` element.
    #[inline]
    pub fn root(&self) -> roxmltree::Node<'_, 'input> {
        self.doc.root_element()
    }

    /// All elements with the given tag name, in document order.
    pub fn find_by_tag<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = roxmltree::Node<'a, 'input>> + 'a {
        descendants_by_tag(self.root(), name)
    }
}

/// All descendant elements of `node` with the given tag name, in document order.
///
/// Matches on the local name so documents carrying the GPX namespace and
/// plain ones resolve identically.
pub fn descendants_by_tag<'a, 'input>(
    node: roxmltree::Node<'a, 'input>,
    name: &'a str,
) -> impl Iterator<Item = roxmltree::Node<'a, 'input>> + 'a {
    node.descendants()
        .filter(move |n| n.is_element() && n.tag_name().name() == name)
}

/// Concatenated text content of `node` and all its descendants.
pub fn text_content(node: roxmltree::Node) -> String {
    node.descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect()
}
