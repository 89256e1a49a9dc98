/// Position of the line being rendered: nesting depth plus whether the node
/// is an element of a list and gets a `- ` marker.
///
/// Contexts are values. Descending derives a new one and never touches the
/// parent's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderContext {
    pub depth: usize,
    pub list_item: bool,
}

impl RenderContext {
    pub fn new() -> Self {
        Self {
            depth: 0,
            list_item: false,
        }
    }

    pub fn descend(&self, depth: usize) -> Self {
        Self {
            depth,
            list_item: false,
        }
    }

    /// A list item needs room for its marker, so depth 0 is bumped to 1.
    pub fn descend_as_list_item(&self, depth: usize) -> Self {
        Self {
            depth: depth.max(1),
            list_item: true,
        }
    }

    /// Keeps the current list-item flag.
    pub fn with_depth(&self, depth: usize) -> Self {
        Self {
            depth,
            list_item: self.list_item && depth > 0,
        }
    }

    pub fn indent(&self) -> String {
        if self.list_item {
            format!("{}- ", "  ".repeat(self.depth.saturating_sub(1)))
        } else {
            "  ".repeat(self.depth)
        }
    }
}

/// Rendering knobs that stay fixed for a whole pass.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Line printed between top-level declarations.
    pub separator: String,
    /// Expand an object's declaration site below the object line.
    pub follow_object_decls: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            separator: "--------".to_string(),
            follow_object_decls: true,
        }
    }
}

/// Anything that can be dumped as indented text.
pub trait Render {
    fn render(&self, context: &RenderContext) -> String;
}
