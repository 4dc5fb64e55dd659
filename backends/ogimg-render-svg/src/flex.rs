//! Flex-box placement through taffy
//!
//! The layout tree is mirrored into a [`TaffyTree`]: containers become flex
//! nodes, bars become plain leaves and text becomes a measured leaf whose
//! size comes from [`TextMeasure`]. After taffy solves the tree, positions
//! are made absolute and text gets its baseline and any ellipsis.
//!
//! Every node may shrink below its content (`min-width: 0`), so a title
//! wider than the card is cut at the card edge instead of pushing
//! siblings out.

use ogimg_core::{Align, Dimension, Edges, FlexDirection, Justify, LayoutNode, NodeKind, Style, TextOverflow};
use taffy::style_helpers::{auto, length, percent};
use taffy::{AlignItems, AvailableSpace, Display, JustifyContent, NodeId, TaffyError, TaffyTree};

use crate::measure::{truncate_with_ellipsis, TextMeasure};

/// Axis-aligned box in canvas pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Shrink by per-side amounts, never below zero size
    fn inset(&self, edges: Edges) -> Rect {
        Rect {
            x: self.x + edges.left,
            y: self.y + edges.top,
            width: (self.width - edges.horizontal()).max(0.0),
            height: (self.height - edges.vertical()).max(0.0),
        }
    }
}

/// A single line of text ready to draw
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedText {
    /// What is drawn, after any ellipsis truncation
    pub content: String,
    pub x: f32,
    pub baseline: f32,
    /// Advance of `content`
    pub width: f32,
    /// Content box; text is clipped to it when it overflows
    pub clip: Rect,
    pub overflows: bool,
}

/// A node with its border box resolved
#[derive(Debug, Clone)]
pub struct Placed<'a> {
    pub node: &'a LayoutNode,
    pub rect: Rect,
    pub text: Option<PlacedText>,
    pub children: Vec<Placed<'a>>,
}

impl<'a> Placed<'a> {
    /// Every placed node, depth-first
    pub fn walk(&self) -> Vec<&Placed<'a>> {
        let mut out = vec![self];
        for child in &self.children {
            out.extend(child.walk());
        }
        out
    }

    pub fn find(&self, label: &str) -> Option<&Placed<'a>> {
        self.walk()
            .into_iter()
            .find(|placed| placed.node.label == Some(label))
    }
}

/// What a measured leaf needs to report its size
struct TextLeaf<'a> {
    text: &'a str,
    style: &'a Style,
}

/// A layout node next to the taffy node standing in for it
struct Mirrored<'a> {
    id: NodeId,
    node: &'a LayoutNode,
    children: Vec<Mirrored<'a>>,
}

/// Lay out `root` in a canvas of the given size
///
/// An `auto` root takes the whole canvas.
pub fn layout<'a>(
    root: &'a LayoutNode,
    width: f32,
    height: f32,
    measure: &dyn TextMeasure,
) -> Result<Placed<'a>, TaffyError> {
    let mut tree: TaffyTree<TextLeaf<'a>> = TaffyTree::new();
    tree.disable_rounding();

    let mirrored = mirror(&mut tree, root)?;

    let mut root_style = tree.style(mirrored.id)?.clone();
    root_style.size = taffy::Size {
        width: length(root.style.width.resolve(width).unwrap_or(width)),
        height: length(root.style.height.resolve(height).unwrap_or(height)),
    };
    tree.set_style(mirrored.id, root_style)?;

    tree.compute_layout_with_measure(
        mirrored.id,
        taffy::Size {
            width: AvailableSpace::Definite(width),
            height: AvailableSpace::Definite(height),
        },
        |known, _available, _id, leaf, _style| {
            let natural = match leaf {
                Some(leaf) => taffy::Size {
                    width: measure.advance(leaf.text, leaf.style.font_size),
                    height: line_box(leaf.style),
                },
                None => taffy::Size::ZERO,
            };
            taffy::Size {
                width: known.width.unwrap_or(natural.width),
                height: known.height.unwrap_or(natural.height),
            }
        },
    )?;

    let placer = Placer { tree: &tree, measure };
    placer.place(&mirrored, 0.0, 0.0)
}

fn mirror<'a>(tree: &mut TaffyTree<TextLeaf<'a>>, node: &'a LayoutNode) -> Result<Mirrored<'a>, TaffyError> {
    let style = taffy_style(&node.style);
    match &node.kind {
        NodeKind::Container(children) => {
            let children = children
                .iter()
                .map(|child| mirror(tree, child))
                .collect::<Result<Vec<_>, _>>()?;
            let ids: Vec<NodeId> = children.iter().map(|child| child.id).collect();
            Ok(Mirrored {
                id: tree.new_with_children(style, &ids)?,
                node,
                children,
            })
        },
        NodeKind::Text(text) => Ok(Mirrored {
            id: tree.new_leaf_with_context(
                style,
                TextLeaf {
                    text,
                    style: &node.style,
                },
            )?,
            node,
            children: Vec::new(),
        }),
        NodeKind::Bar => Ok(Mirrored {
            id: tree.new_leaf(style)?,
            node,
            children: Vec::new(),
        }),
    }
}

fn taffy_style(style: &Style) -> taffy::Style {
    let border = style.border.map(|b| b.width).unwrap_or(0.0);

    taffy::Style {
        display: Display::Flex,
        flex_direction: match style.direction {
            FlexDirection::Row => taffy::FlexDirection::Row,
            FlexDirection::Column => taffy::FlexDirection::Column,
        },
        justify_content: Some(match style.justify {
            Justify::Start => JustifyContent::FlexStart,
            Justify::Center => JustifyContent::Center,
            Justify::End => JustifyContent::FlexEnd,
            Justify::SpaceBetween => JustifyContent::SpaceBetween,
        }),
        align_items: Some(match style.align {
            Align::Stretch => AlignItems::Stretch,
            Align::Start => AlignItems::FlexStart,
            Align::Center => AlignItems::Center,
            Align::End => AlignItems::FlexEnd,
        }),
        size: taffy::Size {
            width: dimension(style.width),
            height: dimension(style.height),
        },
        min_size: taffy::Size {
            width: length(0.0),
            height: length(0.0),
        },
        padding: edges(style.padding),
        border: edges(Edges::all(border)),
        gap: taffy::Size {
            width: length(style.gap),
            height: length(style.gap),
        },
        ..Default::default()
    }
}

fn dimension(dimension: Dimension) -> taffy::Dimension {
    match dimension {
        Dimension::Auto => auto(),
        Dimension::Px(px) => length(px),
        Dimension::Percent(pct) => percent(pct / 100.0),
    }
}

fn edges(edges: Edges) -> taffy::Rect<taffy::LengthPercentage> {
    taffy::Rect {
        left: length(edges.left),
        right: length(edges.right),
        top: length(edges.top),
        bottom: length(edges.bottom),
    }
}

fn line_box(style: &Style) -> f32 {
    style.font_size * style.line_height
}

/// Padding plus border on every side
fn frame(style: &Style) -> Edges {
    let border = style.border.map(|b| b.width).unwrap_or(0.0);
    let p = style.padding;
    Edges {
        top: p.top + border,
        right: p.right + border,
        bottom: p.bottom + border,
        left: p.left + border,
    }
}

/// Turns solved taffy boxes into absolute, drawable nodes
struct Placer<'t, 'a> {
    tree: &'t TaffyTree<TextLeaf<'a>>,
    measure: &'t dyn TextMeasure,
}

impl<'a> Placer<'_, 'a> {
    fn place(&self, mirrored: &Mirrored<'a>, parent_x: f32, parent_y: f32) -> Result<Placed<'a>, TaffyError> {
        let solved = self.tree.layout(mirrored.id)?;
        let rect = Rect::new(
            parent_x + solved.location.x,
            parent_y + solved.location.y,
            solved.size.width,
            solved.size.height,
        );

        let node = mirrored.node;
        let text = match &node.kind {
            NodeKind::Text(text) => Some(self.place_text(&node.style, text, rect.inset(frame(&node.style)))),
            _ => None,
        };

        let children = mirrored
            .children
            .iter()
            .map(|child| self.place(child, rect.x, rect.y))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Placed {
            node,
            rect,
            text,
            children,
        })
    }

    fn place_text(&self, style: &Style, text: &str, inner: Rect) -> PlacedText {
        let size = style.font_size;
        let natural = self.measure.advance(text, size);
        let overflows = natural > inner.width + 0.5;

        let content = if overflows && style.overflow == TextOverflow::Ellipsis {
            truncate_with_ellipsis(text, inner.width, size, self.measure)
        } else {
            text.to_string()
        };
        let width = if content == text {
            natural
        } else {
            self.measure.advance(&content, size)
        };

        // Half-leading above the em box, then the ascent down to the baseline
        let half_leading = (line_box(style) - size) / 2.0;
        let baseline = inner.y + half_leading + size * self.measure.ascent();

        PlacedText {
            content,
            x: inner.x,
            baseline,
            width,
            clip: inner,
            overflows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measure::EstimatedMetrics;
    use ogimg_core::{Color, Edges, Style};

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 0.01
    }

    fn solve(tree: &LayoutNode) -> Placed<'_> {
        layout(tree, 1200.0, 630.0, &EstimatedMetrics).unwrap()
    }

    #[test]
    fn test_space_between_pins_first_and_last() {
        let tree = LayoutNode::container(
            Style::new()
                .fill_parent()
                .column()
                .justify(Justify::SpaceBetween)
                .padding(Edges::symmetric(60.0, 80.0)),
            vec![
                LayoutNode::bar(Style::new().size(10.0, 40.0)).labeled("top"),
                LayoutNode::bar(Style::new().size(10.0, 100.0)).labeled("middle"),
                LayoutNode::bar(Style::new().size(10.0, 30.0)).labeled("bottom"),
            ],
        );

        let placed = solve(&tree);

        let top = placed.find("top").unwrap().rect;
        let middle = placed.find("middle").unwrap().rect;
        let bottom = placed.find("bottom").unwrap().rect;

        assert!(approx(top.y, 60.0));
        assert!(approx(bottom.y + bottom.height, 570.0));
        // 510 content height - 170 used = 340 free, split in two gaps
        assert!(approx(middle.y, 60.0 + 40.0 + 170.0));
        assert!(approx(top.x, 80.0));
    }

    #[test]
    fn test_auto_root_takes_the_canvas() {
        let tree = LayoutNode::container(Style::new(), vec![]);
        let placed = solve(&tree);
        assert_eq!(placed.rect, Rect::new(0.0, 0.0, 1200.0, 630.0));
    }

    #[test]
    fn test_column_children_stretch_across() {
        let tree = LayoutNode::container(
            Style::new().size(400.0, 200.0).column().padding(Edges::all(10.0)),
            vec![LayoutNode::text(Style::new().font_size(20.0), "hi").labeled("t")],
        );

        let placed = solve(&tree);
        let text = placed.find("t").unwrap();

        assert!(approx(text.rect.width, 380.0));
        assert!(approx(text.rect.height, 24.0));
    }

    #[test]
    fn test_row_centers_cross_axis_and_hugs_text() {
        let badge_style = Style::new()
            .font_size(20.0)
            .padding(Edges::symmetric(6.0, 16.0))
            .border(2.0, Color::white());
        let tree = LayoutNode::container(
            Style::new().size(600.0, 100.0).align(Align::Center),
            vec![LayoutNode::text(badge_style, "Rust").labeled("badge")],
        );

        let placed = solve(&tree);
        let badge = placed.find("badge").unwrap();

        let text_w = EstimatedMetrics.advance("Rust", 20.0);
        assert!(approx(badge.rect.width, text_w + 32.0 + 4.0));
        assert!(approx(badge.rect.height, 24.0 + 12.0 + 4.0));
        assert!(approx(badge.rect.y, (100.0 - 40.0) / 2.0));

        let text = badge.text.as_ref().unwrap();
        assert!(approx(text.x, 18.0));
        assert!(!text.overflows);
    }

    #[test]
    fn test_nested_positions_are_absolute() {
        let tree = LayoutNode::container(
            Style::new().size(300.0, 300.0).padding(Edges::all(20.0)),
            vec![LayoutNode::container(
                Style::new().padding(Edges::all(10.0)),
                vec![LayoutNode::bar(Style::new().size(5.0, 5.0)).labeled("dot")],
            )],
        );

        let dot = solve(&tree).find("dot").unwrap().rect;
        assert!(approx(dot.x, 30.0));
        assert!(approx(dot.y, 30.0));
    }

    #[test]
    fn test_overflowing_text_is_truncated_with_ellipsis() {
        let tree = LayoutNode::container(
            Style::new().size(200.0, 100.0).column(),
            vec![LayoutNode::text(
                Style::new().font_size(20.0).ellipsis(),
                "This headline runs far past the edge of its box",
            )
            .labeled("title")],
        );

        let placed = solve(&tree);
        let text = placed.find("title").unwrap().text.clone().unwrap();

        assert!(text.overflows);
        assert!(text.content.ends_with('…'));
        assert!(text.width <= 200.0);
    }

    #[test]
    fn test_long_text_in_a_row_shrinks_instead_of_overflowing() {
        let tree = LayoutNode::container(
            Style::new().size(300.0, 50.0).gap(10.0),
            vec![
                LayoutNode::bar(Style::new().size(40.0, 4.0)).labeled("mark"),
                LayoutNode::text(
                    Style::new().font_size(20.0).ellipsis(),
                    "A site name far too long for the footer row",
                )
                .labeled("name"),
            ],
        );

        let placed = solve(&tree);
        let name = placed.find("name").unwrap();

        assert!(name.rect.x + name.rect.width <= 300.0 + 0.01);
        assert!(name.text.as_ref().unwrap().content.ends_with('…'));
    }

    #[test]
    fn test_clip_overflow_keeps_full_text() {
        let tree = LayoutNode::container(
            Style::new().size(50.0, 100.0).column(),
            vec![LayoutNode::text(Style::new().font_size(20.0), "wide wide wide").labeled("t")],
        );

        let placed = solve(&tree);
        let text = placed.find("t").unwrap().text.clone().unwrap();

        assert!(text.overflows);
        assert_eq!(text.content, "wide wide wide");
    }

    #[test]
    fn test_row_overflow_shrinks_items() {
        let tree = LayoutNode::container(
            Style::new().size(100.0, 10.0),
            vec![
                LayoutNode::bar(Style::new().size(100.0, 10.0)).labeled("a"),
                LayoutNode::bar(Style::new().size(100.0, 10.0)).labeled("b"),
            ],
        );

        let placed = solve(&tree);
        assert!(approx(placed.find("a").unwrap().rect.width, 50.0));
        assert!(approx(placed.find("b").unwrap().rect.x, 50.0));
    }
}
