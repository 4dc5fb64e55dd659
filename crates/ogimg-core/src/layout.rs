//! Layout trees: nested boxes, text and bars with flex-box style attributes
//!
//! A tree is built fresh for each image and never changes afterwards. The
//! vector stage walks it to position boxes; tests walk it to check what a
//! template produced without rendering anything.

use crate::{Color, Fill};

/// A length along one axis
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Dimension {
    /// Sized by content (or stretched by the parent)
    #[default]
    Auto,
    Px(f32),
    /// Fraction of the parent's content box, `100.0` = all of it
    Percent(f32),
}

impl Dimension {
    /// Resolve against the parent's available length
    pub fn resolve(&self, available: f32) -> Option<f32> {
        match *self {
            Dimension::Auto => None,
            Dimension::Px(px) => Some(px),
            Dimension::Percent(pct) => Some(available * pct / 100.0),
        }
    }
}

/// Per-side spacing
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Edges {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Edges {
    pub const ZERO: Edges = Edges::all(0.0);

    pub const fn all(v: f32) -> Self {
        Self {
            top: v,
            right: v,
            bottom: v,
            left: v,
        }
    }

    /// CSS two-value shorthand: `padding: vertical horizontal`
    pub const fn symmetric(vertical: f32, horizontal: f32) -> Self {
        Self {
            top: vertical,
            right: horizontal,
            bottom: vertical,
            left: horizontal,
        }
    }

    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }
}

/// Main axis of a container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlexDirection {
    #[default]
    Row,
    Column,
}

/// Distribution along the main axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Justify {
    #[default]
    Start,
    Center,
    End,
    SpaceBetween,
}

/// Placement along the cross axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Stretch,
    Start,
    Center,
    End,
}

/// What happens to text wider than its box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextOverflow {
    /// Cut at the box edge
    #[default]
    Clip,
    /// Cut and mark the cut with `…`
    Ellipsis,
}

/// Solid stroke around a box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Border {
    pub width: f32,
    pub color: Color,
}

/// Visual and layout attributes of one node
///
/// Nothing is inherited: a text node carries its own color and size. The
/// defaults follow flex-box (`row`, `stretch`, `flex-start`).
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    pub width: Dimension,
    pub height: Dimension,
    pub padding: Edges,
    pub gap: f32,
    pub direction: FlexDirection,
    pub justify: Justify,
    pub align: Align,
    pub background: Option<Fill>,
    pub border: Option<Border>,
    pub radius: f32,
    pub color: Color,
    pub font_size: f32,
    /// Multiple of `font_size`
    pub line_height: f32,
    pub font_weight: u16,
    pub overflow: TextOverflow,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            width: Dimension::Auto,
            height: Dimension::Auto,
            padding: Edges::ZERO,
            gap: 0.0,
            direction: FlexDirection::Row,
            justify: Justify::Start,
            align: Align::Stretch,
            background: None,
            border: None,
            radius: 0.0,
            color: Color::black(),
            font_size: 16.0,
            line_height: 1.2,
            font_weight: 400,
            overflow: TextOverflow::Clip,
        }
    }
}

impl Style {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn width(mut self, width: Dimension) -> Self {
        self.width = width;
        self
    }

    pub fn height(mut self, height: Dimension) -> Self {
        self.height = height;
        self
    }

    /// Fixed pixel size on both axes
    pub fn size(self, width: f32, height: f32) -> Self {
        self.width(Dimension::Px(width)).height(Dimension::Px(height))
    }

    /// `width: 100%; height: 100%`
    pub fn fill_parent(self) -> Self {
        self.width(Dimension::Percent(100.0))
            .height(Dimension::Percent(100.0))
    }

    pub fn padding(mut self, padding: Edges) -> Self {
        self.padding = padding;
        self
    }

    pub fn gap(mut self, gap: f32) -> Self {
        self.gap = gap;
        self
    }

    pub fn column(mut self) -> Self {
        self.direction = FlexDirection::Column;
        self
    }

    pub fn row(mut self) -> Self {
        self.direction = FlexDirection::Row;
        self
    }

    pub fn justify(mut self, justify: Justify) -> Self {
        self.justify = justify;
        self
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn background(mut self, fill: impl Into<Fill>) -> Self {
        self.background = Some(fill.into());
        self
    }

    pub fn border(mut self, width: f32, color: Color) -> Self {
        self.border = Some(Border { width, color });
        self
    }

    pub fn radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn font_size(mut self, size: f32) -> Self {
        self.font_size = size;
        self
    }

    pub fn line_height(mut self, line_height: f32) -> Self {
        self.line_height = line_height;
        self
    }

    pub fn font_weight(mut self, weight: u16) -> Self {
        self.font_weight = weight;
        self
    }

    pub fn ellipsis(mut self) -> Self {
        self.overflow = TextOverflow::Ellipsis;
        self
    }
}

/// What a node holds
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Container(Vec<LayoutNode>),
    Text(String),
    /// A filled box with no content, used for accent lines
    Bar,
}

/// One node of a layout tree
///
/// The optional label names the node's role ("badge", "title") so tests and
/// the SVG output can point at it.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutNode {
    pub kind: NodeKind,
    pub style: Style,
    pub label: Option<&'static str>,
}

impl LayoutNode {
    pub fn container(style: Style, children: Vec<LayoutNode>) -> Self {
        Self {
            kind: NodeKind::Container(children),
            style,
            label: None,
        }
    }

    pub fn text(style: Style, text: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::Text(text.into()),
            style,
            label: None,
        }
    }

    pub fn bar(style: Style) -> Self {
        Self {
            kind: NodeKind::Bar,
            style,
            label: None,
        }
    }

    pub fn labeled(mut self, label: &'static str) -> Self {
        self.label = Some(label);
        self
    }

    pub fn children(&self) -> &[LayoutNode] {
        match &self.kind {
            NodeKind::Container(children) => children,
            _ => &[],
        }
    }

    /// Literal text for text nodes
    pub fn text_content(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Every node in depth-first, document order
    pub fn descendants(&self) -> Vec<&LayoutNode> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(node.children().iter().rev());
        }
        out
    }

    /// First node carrying this label
    pub fn find(&self, label: &str) -> Option<&LayoutNode> {
        self.descendants()
            .into_iter()
            .find(|node| node.label == Some(label))
    }

    /// All literal text in document order
    pub fn texts(&self) -> Vec<&str> {
        self.descendants()
            .into_iter()
            .filter_map(LayoutNode::text_content)
            .collect()
    }
}
