//! Derived list views: category/tab filtering, incremental "see more"
//! pagination and the skills/tools mode selector. All pure.

use serde::Serialize;

use crate::content::Categorized;

pub const DEFAULT_PAGE_SIZE: usize = 6;
pub const PAGE_STEP: usize = 6;

/// Category or tab selection. `All` matches every item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl CategoryFilter {
    /// `None`, empty and the literal `"All"` select everything.
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None | Some("") | Some("All") | Some("all") => CategoryFilter::All,
            Some(v) => CategoryFilter::Only(v.to_string()),
        }
    }

    pub fn matches<T: Categorized>(&self, item: &T) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(c) => item.category() == Some(c.as_str()),
        }
    }
}

/// Order-preserving subsequence of `items` matching `filter`.
pub fn filter<'a, T: Categorized>(items: &'a [T], filter: &CategoryFilter) -> Vec<&'a T> {
    items.iter().filter(|i| filter.matches(*i)).collect()
}

/// The first `min(n, len)` items.
pub fn truncate<T>(items: &[T], n: usize) -> &[T] {
    &items[..n.min(items.len())]
}

/// "See more" counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    visible: usize,
    step: usize,
}

impl Default for Pager {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE, PAGE_STEP)
    }
}

impl Pager {
    pub fn new(initial: usize, step: usize) -> Self {
        Self {
            visible: initial,
            step,
        }
    }

    pub fn visible(&self) -> usize {
        self.visible
    }

    pub fn see_more(&mut self) {
        self.visible = self.visible.saturating_add(self.step);
    }

    pub fn has_more(&self, total: usize) -> bool {
        total > self.visible
    }
}

/// One rendered page of a filtered list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Size of the filtered list before truncation.
    pub total: usize,
    pub has_more: bool,
}

/// Filter then truncate. The shared core of [`GalleryView`] and the public
/// list endpoint.
pub fn paginate<T: Categorized + Clone>(items: &[T], f: &CategoryFilter, visible: usize) -> Page<T> {
    let matching = filter(items, f);
    let total = matching.len();
    Page {
        items: truncate(&matching, visible).iter().map(|i| (*i).clone()).collect(),
        total,
        has_more: total > visible,
    }
}

/// Gallery state: a category filter plus a pager. Changing the filter keeps
/// the visible count.
#[derive(Debug, Clone, Default)]
pub struct GalleryView {
    filter: CategoryFilter,
    pager: Pager,
}

impl GalleryView {
    pub fn filter(&self) -> &CategoryFilter {
        &self.filter
    }

    pub fn visible(&self) -> usize {
        self.pager.visible()
    }

    pub fn set_filter(&mut self, filter: CategoryFilter) {
        self.filter = filter;
    }

    pub fn see_more(&mut self) {
        self.pager.see_more();
    }

    pub fn page<T: Categorized + Clone>(&self, items: &[T]) -> Page<T> {
        paginate(items, &self.filter, self.pager.visible())
    }
}

/// Skills/tools dual-mode selector with a highlighted index.
#[derive(Debug, Clone)]
pub struct ModeSelector {
    mode: String,
    active: usize,
}

impl ModeSelector {
    pub fn new(mode: impl Into<String>) -> Self {
        Self {
            mode: mode.into(),
            active: 0,
        }
    }

    pub fn mode(&self) -> &str {
        &self.mode
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    /// Switching to a different mode resets the highlighted index.
    pub fn switch(&mut self, mode: impl Into<String>) {
        let mode = mode.into();
        if mode != self.mode {
            self.mode = mode;
            self.active = 0;
        }
    }

    pub fn select(&mut self, index: usize) {
        self.active = index;
    }

    /// Items of the current mode.
    pub fn items<'a, T: Categorized>(&self, all: &'a [T]) -> Vec<&'a T> {
        filter(all, &CategoryFilter::Only(self.mode.clone()))
    }

    /// The highlighted item, falling back to the first one when the index is
    /// past the end (the list shrank under a new snapshot).
    pub fn active<'a, T: Categorized>(&self, all: &'a [T]) -> Option<&'a T> {
        let items = self.items(all);
        items.get(self.active).or_else(|| items.first()).copied()
    }
}
