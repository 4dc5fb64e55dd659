//! SVG output of whole layout trees

use ogimg_core::{
    traits::VectorRenderer, Align, Canvas, Color, Edges, Fill, Justify, LayoutNode, Style,
};
use ogimg_render_svg::SvgLayoutRenderer;

fn card(title: &str) -> LayoutNode {
    LayoutNode::container(
        Style::new()
            .fill_parent()
            .column()
            .justify(Justify::SpaceBetween)
            .padding(Edges::symmetric(60.0, 80.0))
            .background(Fill::linear_gradient(
                135.0,
                &[(0.0, Color::hex(0x030712)), (1.0, Color::hex(0x0f172a))],
            )),
        vec![
            LayoutNode::container(
                Style::new().align(Align::Center),
                vec![LayoutNode::text(
                    Style::new()
                        .font_size(20.0)
                        .padding(Edges::symmetric(6.0, 16.0))
                        .border(2.0, Color::hex(0xa8a29e).with_opacity(0.3))
                        .radius(8.0),
                    "Rust",
                )
                .labeled("badge")],
            ),
            LayoutNode::text(
                Style::new().font_size(56.0).color(Color::hex(0xf3f4f6)).ellipsis(),
                title,
            )
            .labeled("title"),
            LayoutNode::bar(Style::new().size(80.0, 4.0).color(Color::hex(0xa8a29e)))
                .labeled("accent"),
        ],
    )
}

fn render(tree: &LayoutNode) -> String {
    SvgLayoutRenderer::new()
        .render(tree, Canvas::OG_IMAGE, None)
        .unwrap()
        .svg
}

#[test]
fn document_matches_canvas() {
    let image = SvgLayoutRenderer::new()
        .render(&card("Hello"), Canvas::OG_IMAGE, None)
        .unwrap();

    assert_eq!((image.width, image.height), (1200, 630));
    assert!(image.svg.starts_with(r#"<svg xmlns="http://www.w3.org/2000/svg" width="1200" height="630" viewBox="0 0 1200 630">"#));
    assert!(image.svg.trim_end().ends_with("</svg>"));
}

#[test]
fn labels_become_groups() {
    let svg = render(&card("Hello"));
    for label in ["badge", "title", "accent"] {
        assert!(svg.contains(&format!(r#"<g id="{}">"#, label)), "missing {label}");
    }
}

#[test]
fn gradient_background_is_defined_once() {
    let svg = render(&card("Hello"));
    assert_eq!(svg.matches("<linearGradient").count(), 1);
    assert!(svg.contains(r#"fill="url(#gradient0)""#));
    assert!(svg.contains(r##"stop-color="#030712""##));
}

#[test]
fn translucent_border_carries_opacity() {
    let svg = render(&card("Hello"));
    assert!(svg.contains(r##"stroke="#a8a29e" stroke-opacity="0.3""##));
}

#[test]
fn text_is_escaped() {
    let svg = render(&card("Tom & Jerry <3"));
    assert!(svg.contains("Tom &amp; Jerry &lt;3"));
    assert!(!svg.contains("Tom & Jerry"));
}

#[test]
fn long_title_is_clipped_and_ellipsized() {
    let title = "An extremely long headline that keeps going well beyond the width of any social card";
    let svg = render(&card(title));

    assert!(svg.contains("<clipPath"));
    assert!(svg.contains('…'));
    assert!(!svg.contains(title));
}

#[test]
fn rendering_is_deterministic() {
    let tree = card("개인 블로그에 오신 것을 환영합니다");
    assert_eq!(render(&tree), render(&tree));
}
