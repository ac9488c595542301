//! Popup menu with optional item icons, placeable at a pointer position.

use ratatui::layout::Rect;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub content: String,
    /// Icon glyph or image path; empty for none.
    pub icon: String,
}

impl MenuItem {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            icon: String::new(),
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    pub fn has_icon(&self) -> bool {
        !self.icon.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuEvent {
    Selected { index: usize, item: MenuItem },
    Hidden,
}

#[derive(Debug, Clone, Default)]
pub struct Menu {
    items: Vec<MenuItem>,
    highlighted: usize,
    visible: bool,
    area: Rect,
}

impl Menu {
    pub fn new(items: Vec<MenuItem>) -> Self {
        Self {
            items,
            ..Self::default()
        }
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn highlighted(&self) -> usize {
        self.highlighted
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Where the menu was last placed.
    pub fn area(&self) -> Rect {
        self.area
    }

    /// Columns and rows the menu needs, borders included.
    pub fn size(&self) -> (u16, u16) {
        let widest = self
            .items
            .iter()
            .map(|i| i.content.chars().count() + if i.has_icon() { 2 } else { 0 })
            .max()
            .unwrap_or(0);
        let width = (widest + 4).min(u16::MAX as usize) as u16;
        let height = (self.items.len() + 2).min(u16::MAX as usize) as u16;
        (width, height)
    }

    pub fn show(&mut self) {
        self.visible = !self.items.is_empty();
        self.highlighted = 0;
    }

    pub fn hide(&mut self) -> Option<MenuEvent> {
        if !self.visible {
            return None;
        }
        self.visible = false;
        Some(MenuEvent::Hidden)
    }

    /// Show anchored at a pointer position plus `offset`, moved back inside
    /// `viewport` when it would overflow the right or bottom edge.
    pub fn show_at(&mut self, x: u16, y: u16, offset: (i16, i16), viewport: Rect) {
        let (width, height) = self.size();
        let width = width.min(viewport.width);
        let height = height.min(viewport.height);

        let left = (x as i32 + offset.0 as i32)
            .min(viewport.right() as i32 - width as i32)
            .max(viewport.x as i32);
        let top = (y as i32 + offset.1 as i32)
            .min(viewport.bottom() as i32 - height as i32)
            .max(viewport.y as i32);

        self.area = Rect::new(left as u16, top as u16, width, height);
        self.show();
    }

    pub fn highlight_next(&mut self) {
        if !self.items.is_empty() {
            self.highlighted = (self.highlighted + 1) % self.items.len();
        }
    }

    pub fn highlight_prev(&mut self) {
        if !self.items.is_empty() {
            self.highlighted = self.highlighted.checked_sub(1).unwrap_or(self.items.len() - 1);
        }
    }

    /// Pick the highlighted item and close the menu.
    pub fn select(&mut self) -> Option<MenuEvent> {
        self.select_index(self.highlighted)
    }

    pub fn select_index(&mut self, index: usize) -> Option<MenuEvent> {
        if !self.visible {
            return None;
        }
        let item = self.items.get(index)?.clone();
        self.visible = false;
        Some(MenuEvent::Selected { index, item })
    }

    /// Row inside the placed menu hit by a click, if any.
    pub fn item_at(&self, x: u16, y: u16) -> Option<usize> {
        if !self.visible {
            return None;
        }
        let inner_top = self.area.y + 1;
        let inside_x = x > self.area.x && x + 1 < self.area.right();
        if !inside_x || y < inner_top {
            return None;
        }
        let idx = (y - inner_top) as usize;
        (idx < self.items.len()).then_some(idx)
    }
}
