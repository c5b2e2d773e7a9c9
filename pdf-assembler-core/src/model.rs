//! Document state: uploaded files, their previews and the ordered page list
//!
//! Pages never own their previews. A [`PageRef`] points back into the file
//! list through an [`Origin`], a pair of plain indices that stays valid for
//! as long as the page exists because files are append-only.

use crate::geometry::{Dimensions, Position};
use crate::modifications::Modification;
use serde::{Deserialize, Serialize};

/// A rendered thumbnail of one PDF page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preview {
    /// Image reference, usually a data URI
    pub uri: String,
    /// Natural size of the rendered image
    pub dimensions: Dimensions,
}

impl Preview {
    pub fn new(uri: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            uri: uri.into(),
            dimensions: Dimensions::new(width, height),
        }
    }
}

/// One uploaded PDF with a preview per page
#[derive(Debug, Clone, PartialEq)]
pub struct SourceFile {
    /// Name the file was dropped with
    pub name: String,
    /// Base64 encoded file content
    pub pdf: String,
    /// Previews in page order
    pub previews: Vec<Preview>,
}

/// Where a page came from: file index and page index within that file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Origin {
    pub file: usize,
    pub page: usize,
}

impl Origin {
    pub fn new(file: usize, page: usize) -> Self {
        Self { file, page }
    }
}

impl std::fmt::Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.file, self.page)
    }
}

/// One page of the assembled document
#[derive(Debug, Clone, PartialEq)]
pub struct PageRef {
    /// Source file and page; also identifies the page
    pub origin: Origin,
    /// Current on-screen offset
    pub position: Position,
    /// Set while the page is hidden for an enter or exit animation
    pub disappeared: bool,
    /// Edits forwarded to the build service
    pub modifications: Vec<Modification>,
}

impl PageRef {
    /// A freshly uploaded page, mounted hidden so it can animate in
    pub fn hidden(origin: Origin) -> Self {
        Self {
            origin,
            position: Position::origin(),
            disappeared: true,
            modifications: Vec::new(),
        }
    }
}

/// Ordered list of pages; the order is the output order
///
/// Every mutation returns a new collection derived from `self`, so a
/// caller only ever swaps in a fully formed value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageCollection {
    pages: Vec<PageRef>,
}

impl PageCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pages(pages: Vec<PageRef>) -> Self {
        Self { pages }
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&PageRef> {
        self.pages.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PageRef> {
        self.pages.iter()
    }

    pub fn as_slice(&self) -> &[PageRef] {
        &self.pages
    }

    /// Index of the page created from `origin`
    pub fn position_of(&self, origin: Origin) -> Option<usize> {
        self.pages.iter().position(|p| p.origin == origin)
    }

    pub fn origins(&self) -> Vec<Origin> {
        self.pages.iter().map(|p| p.origin).collect()
    }

    /// New collection with `pages` added at the end
    pub fn with_appended(&self, pages: impl IntoIterator<Item = PageRef>) -> Self {
        let mut next = self.pages.clone();
        next.extend(pages);
        Self { pages: next }
    }

    /// New collection with the page at `from` taken out and reinserted at `to`
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn moved(&self, from: usize, to: usize) -> Self {
        let mut next = self.pages.clone();
        let page = next.remove(from);
        next.insert(to, page);
        Self { pages: next }
    }

    /// New collection without the page at `index`; later pages shift down
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn without(&self, index: usize) -> Self {
        let mut next = self.pages.clone();
        next.remove(index);
        Self { pages: next }
    }

    /// New collection with `update` applied to the page at `index`
    pub fn with_page(&self, index: usize, update: impl FnOnce(&mut PageRef)) -> Self {
        let mut next = self.pages.clone();
        if let Some(page) = next.get_mut(index) {
            update(page);
        }
        Self { pages: next }
    }

    /// New collection with `update` applied to every page
    pub fn with_each(&self, mut update: impl FnMut(usize, &mut PageRef)) -> Self {
        let mut next = self.pages.clone();
        for (index, page) in next.iter_mut().enumerate() {
            update(index, page);
        }
        Self { pages: next }
    }
}

impl<'a> IntoIterator for &'a PageCollection {
    type Item = &'a PageRef;
    type IntoIter = std::slice::Iter<'a, PageRef>;

    fn into_iter(self) -> Self::IntoIter {
        self.pages.iter()
    }
}

/// Everything the widget knows about the document being assembled
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildData {
    pub files: Vec<SourceFile>,
    pub pages: PageCollection,
}

impl BuildData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve an origin to its preview
    pub fn preview(&self, origin: Origin) -> Option<&Preview> {
        self.files
            .get(origin.file)
            .and_then(|file| file.previews.get(origin.page))
    }

    /// Natural dimensions of a page's preview; zero if the origin dangles
    pub fn dimensions_of(&self, page: &PageRef) -> Dimensions {
        self.preview(page.origin)
            .map(|preview| preview.dimensions)
            .unwrap_or_default()
    }
}
