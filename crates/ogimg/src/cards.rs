//! The three images the site publishes, as layout trees
//!
//! Every card shares the same frame: a full-canvas column with its bands
//! pushed to the top, middle and bottom, over a dark diagonal gradient.
//! Labels on the interesting nodes let callers and tests find them again.

use ogimg_core::{Align, Edges, Fill, ImageRequest, Justify, LayoutNode, SiteIdentity, Style};

/// Titles longer than this many UTF-16 code units get the smaller size
pub const TITLE_LENGTH_THRESHOLD: usize = 30;
pub const TITLE_SIZE_LONG: f32 = 48.0;
pub const TITLE_SIZE_SHORT: f32 = 56.0;

/// The site icon, drawn on a 32×32 grid
pub const ICON_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 32 32"><circle cx="16" cy="16" r="16" fill="#0e7490"/><path d="M6 16 Q8.5 11 11 16 Q13.5 21 16 16 Q18.5 11 21 16 Q23.5 21 26 17" stroke="white" stroke-width="2.5" stroke-linecap="round" stroke-linejoin="round" fill="none"/></svg>"##;

/// Side length of the icon's own grid
pub const ICON_GRID: u32 = 32;

pub mod labels {
    pub const BADGE: &str = "badge";
    pub const BADGE_SLOT: &str = "badge-slot";
    pub const TITLE: &str = "title";
    pub const DESCRIPTION: &str = "description";
    pub const SITE: &str = "site";
    pub const ACCENT: &str = "accent";
    pub const WAVE: &str = "wave";
    pub const HEADLINE: &str = "headline";
    pub const TAGLINE: &str = "tagline";
    pub const SUBTITLE: &str = "subtitle";
}

mod palette {
    use ogimg_core::Color;

    pub const BACKGROUND_EDGE: Color = Color::hex(0x030712);
    pub const BACKGROUND_MID: Color = Color::hex(0x0f172a);
    pub const STONE: Color = Color::hex(0xa8a29e);
    pub const HEADING: Color = Color::hex(0xf3f4f6);
    pub const BODY: Color = Color::hex(0x9ca3af);
    pub const MUTED: Color = Color::hex(0x4b5563);
    pub const CYAN: Color = Color::hex(0x22d3ee);
    pub const TEAL: Color = Color::hex(0x0891b2);
}

/// Font size for a title
///
/// Length is counted in UTF-16 code units, as browsers count string length:
/// a Hangul syllable is one, an emoji outside the BMP is two.
pub fn title_font_size(title: &str) -> f32 {
    if title.encode_utf16().count() > TITLE_LENGTH_THRESHOLD {
        TITLE_SIZE_LONG
    } else {
        TITLE_SIZE_SHORT
    }
}

fn frame(children: Vec<LayoutNode>) -> LayoutNode {
    LayoutNode::container(
        Style::new()
            .fill_parent()
            .column()
            .justify(Justify::SpaceBetween)
            .padding(Edges::symmetric(60.0, 80.0))
            .background(Fill::linear_gradient(
                135.0,
                &[
                    (0.0, palette::BACKGROUND_EDGE),
                    (0.5, palette::BACKGROUND_MID),
                    (1.0, palette::BACKGROUND_EDGE),
                ],
            )),
        children,
    )
}

fn badge(category: &str) -> LayoutNode {
    LayoutNode::text(
        Style::new()
            .font_size(20.0)
            .color(palette::STONE)
            .border(2.0, palette::STONE.with_opacity(0.3))
            .radius(8.0)
            .padding(Edges::symmetric(6.0, 16.0))
            .background(palette::STONE.with_opacity(0.1)),
        category,
    )
    .labeled(labels::BADGE)
}

/// The per-post card
///
/// The badge only appears for a non-empty category; otherwise its band is
/// an empty container so the title stays centred between the same bands.
pub fn post_card(request: &ImageRequest, site: &SiteIdentity) -> LayoutNode {
    let top = LayoutNode::container(
        Style::new().align(Align::Center),
        request.category().map(badge).into_iter().collect(),
    )
    .labeled(labels::BADGE_SLOT);

    let middle = LayoutNode::container(
        Style::new().column().gap(20.0),
        vec![
            LayoutNode::text(
                Style::new()
                    .font_size(title_font_size(&request.title))
                    .color(palette::HEADING)
                    .line_height(1.3)
                    .font_weight(700)
                    .ellipsis(),
                request.title.as_str(),
            )
            .labeled(labels::TITLE),
            LayoutNode::text(
                Style::new()
                    .font_size(24.0)
                    .color(palette::BODY)
                    .line_height(1.5)
                    .ellipsis(),
                request.description.as_str(),
            )
            .labeled(labels::DESCRIPTION),
        ],
    );

    let bottom = LayoutNode::container(
        Style::new().justify(Justify::SpaceBetween).align(Align::Center),
        vec![
            LayoutNode::text(
                Style::new()
                    .font_size(24.0)
                    .color(palette::STONE)
                    .font_weight(700),
                site.name.as_str(),
            )
            .labeled(labels::SITE),
            LayoutNode::bar(Style::new().size(80.0, 4.0).color(palette::STONE).radius(2.0))
                .labeled(labels::ACCENT),
        ],
    );

    frame(vec![top, middle, bottom])
}

/// The content-independent card used when a page has no image of its own
pub fn default_card(site: &SiteIdentity) -> LayoutNode {
    let top = LayoutNode::container(
        Style::new().align(Align::Center).gap(12.0),
        vec![
            LayoutNode::text(Style::new().font_size(40.0).color(palette::CYAN), "〜")
                .labeled(labels::WAVE),
            LayoutNode::text(
                Style::new()
                    .font_size(28.0)
                    .color(palette::STONE)
                    .font_weight(700),
                site.name.as_str(),
            )
            .labeled(labels::SITE),
        ],
    );

    let middle = LayoutNode::container(
        Style::new().column().gap(16.0),
        vec![
            LayoutNode::text(
                Style::new()
                    .font_size(64.0)
                    .color(palette::HEADING)
                    .line_height(1.2)
                    .font_weight(700),
                site.name.as_str(),
            )
            .labeled(labels::HEADLINE),
            LayoutNode::text(
                Style::new()
                    .font_size(28.0)
                    .color(palette::BODY)
                    .line_height(1.5),
                site.tagline.as_str(),
            )
            .labeled(labels::TAGLINE),
        ],
    );

    let bottom = LayoutNode::container(
        Style::new().align(Align::Center).gap(20.0),
        vec![
            LayoutNode::bar(Style::new().size(120.0, 4.0).color(palette::TEAL).radius(2.0))
                .labeled(labels::ACCENT),
            LayoutNode::text(
                Style::new().font_size(18.0).color(palette::MUTED),
                site.subtitle.as_str(),
            )
            .labeled(labels::SUBTITLE),
        ],
    );

    frame(vec![top, middle, bottom])
}

#[cfg(test)]
mod tests {
    use super::*;
    use ogimg_core::NodeKind;

    fn site() -> SiteIdentity {
        SiteIdentity::default()
    }

    #[test]
    fn test_title_size_threshold() {
        assert_eq!(title_font_size(&"a".repeat(30)), 56.0);
        assert_eq!(title_font_size(&"a".repeat(31)), 48.0);
        // Thirty Hangul syllables are thirty code units
        assert_eq!(title_font_size(&"블".repeat(30)), 56.0);
        assert_eq!(title_font_size(""), 56.0);
    }

    #[test]
    fn test_astral_characters_count_twice() {
        // Sixteen emoji are 32 code units
        assert_eq!(title_font_size(&"😀".repeat(16)), 48.0);
        assert_eq!(title_font_size(&"😀".repeat(15)), 56.0);
        assert_eq!(title_font_size(&format!("{}a", "😀".repeat(15))), 48.0);
    }

    #[test]
    fn test_badge_only_with_category() {
        let with = post_card(&ImageRequest::new("t", "d").with_category("Rust"), &site());
        assert_eq!(with.find(labels::BADGE).and_then(|n| n.text_content()), Some("Rust"));

        for request in [
            ImageRequest::new("t", "d"),
            ImageRequest::new("t", "d").with_category(""),
        ] {
            let card = post_card(&request, &site());
            assert!(card.find(labels::BADGE).is_none());
            let slot = card.find(labels::BADGE_SLOT).unwrap();
            assert!(slot.children().is_empty());
        }
    }

    #[test]
    fn test_post_card_carries_text_and_site() {
        let card = post_card(&ImageRequest::new("Hello", "World"), &site());
        assert_eq!(card.texts(), vec!["Hello", "World", "nimwver.me"]);

        let title = card.find(labels::TITLE).unwrap();
        assert_eq!(title.style.font_size, 56.0);
        assert_eq!(title.style.line_height, 1.3);
    }

    #[test]
    fn test_default_card_contents() {
        let card = default_card(&site());
        assert_eq!(
            card.texts(),
            vec!["〜", "nimwver.me", "nimwver.me", "개인 블로그", "작은 블로그"]
        );
        let accent = card.find(labels::ACCENT).unwrap();
        assert!(matches!(accent.kind, NodeKind::Bar));
    }

    #[test]
    fn test_icon_is_a_32_grid() {
        assert!(ICON_SVG.contains(r#"viewBox="0 0 32 32""#));
        assert!(ICON_SVG.contains("#0e7490"));
    }
}
