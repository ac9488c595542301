//! Horizontal rule with an optional caption.

const BAR: char = '─';
const END_CAP: usize = 2;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Divider {
    pub content: String,
}

impl Divider {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }

    /// Render into exactly `width` columns: `── Caption ────`. An empty
    /// caption yields a plain bar; a long one is cut to fit.
    pub fn render(&self, width: usize) -> String {
        if self.content.is_empty() || width <= END_CAP + 2 {
            return BAR.to_string().repeat(width);
        }

        let room = width - END_CAP - 2;
        let caption: String = self.content.chars().take(room).collect();
        let used = END_CAP + 2 + caption.chars().count();

        let mut out = BAR.to_string().repeat(END_CAP);
        out.push(' ');
        out.push_str(&caption);
        out.push(' ');
        out.push_str(&BAR.to_string().repeat(width - used));
        out
    }
}
