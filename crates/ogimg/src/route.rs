//! The per-post image route: which slugs exist and what each one returns

use ogimg_core::{ImageRequest, Result};

use crate::OgRenderer;

/// Images never change once a post is published
pub const CACHE_CONTROL: &str = "public, max-age=31536000, immutable";

/// A rendered card plus the headers to serve it with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OgImageResponse {
    pub body: Vec<u8>,
    pub content_type: &'static str,
    pub cache_control: &'static str,
}

impl OgImageResponse {
    pub fn headers(&self) -> [(&'static str, &'static str); 2] {
        [
            ("Content-Type", self.content_type),
            ("Cache-Control", self.cache_control),
        ]
    }
}

/// Render the card for one post and wrap it for serving
///
/// Errors are returned as-is; the caller answers with a server error.
pub async fn og_image_response(
    renderer: &OgRenderer,
    request: &ImageRequest,
) -> Result<OgImageResponse> {
    let image = renderer.render_og_image(request).await?;
    Ok(OgImageResponse {
        body: image.into_bytes(),
        content_type: renderer.pipeline().mime_type(),
        cache_control: CACHE_CONTROL,
    })
}

/// What the route needs to know about a post
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostMeta {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub category: Option<String>,
}

/// One generated page: the `slug` route parameter and its card request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticPath {
    pub slug: String,
    pub request: ImageRequest,
}

pub fn static_paths(posts: &[PostMeta]) -> Vec<StaticPath> {
    posts
        .iter()
        .map(|post| {
            let mut request = ImageRequest::new(post.title.as_str(), post.description.as_str());
            if let Some(category) = &post.category {
                request = request.with_category(category.as_str());
            }
            StaticPath {
                slug: post.slug.clone(),
                request,
            }
        })
        .collect()
}
