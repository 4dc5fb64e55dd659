//! Post metadata from Markdown frontmatter
//!
//! A post is any `.md` or `.mdx` file under the content directory. Its slug
//! is the path relative to that directory without the extension, always
//! with `/` separators.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use ogimg::PostMeta;
use serde::Deserialize;
use walkdir::WalkDir;

const POST_EXTENSIONS: [&str; 2] = ["md", "mdx"];

/// The frontmatter fields a card needs; everything else is ignored
#[derive(Debug, Deserialize)]
struct Frontmatter {
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    category: Option<String>,
}

/// The YAML between the opening `---` line and the next `---` line
pub fn frontmatter_block(text: &str) -> Option<&str> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let rest = text
        .strip_prefix("---\n")
        .or_else(|| text.strip_prefix("---\r\n"))?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            return Some(&rest[..offset]);
        }
        offset += line.len();
    }
    None
}

fn slug_for(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?.with_extension("");
    let parts: Vec<_> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Some(parts.join("/"))
}

/// Parse one post file; `None` when it has no frontmatter
pub fn read_post(root: &Path, path: &Path) -> Result<Option<PostMeta>> {
    let text =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;

    let Some(block) = frontmatter_block(&text) else {
        log::warn!("{} has no frontmatter, skipping", path.display());
        return Ok(None);
    };

    let front: Frontmatter = serde_yaml_ng::from_str(block)
        .with_context(|| format!("Invalid frontmatter in {}", path.display()))?;

    let slug = slug_for(root, path)
        .with_context(|| format!("{} is outside {}", path.display(), root.display()))?;

    Ok(Some(PostMeta {
        slug,
        title: front.title,
        description: front.description,
        category: front.category,
    }))
}

/// Every post under `root`, ordered by path
pub fn load_posts(root: &Path) -> Result<Vec<PostMeta>> {
    let mut posts = Vec::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry =
            entry.with_context(|| format!("Failed to walk content directory {}", root.display()))?;
        let path = entry.path();

        let is_post = entry.file_type().is_file()
            && path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| POST_EXTENSIONS.contains(&e));
        if !is_post {
            continue;
        }

        if let Some(post) = read_post(root, path)? {
            posts.push(post);
        }
    }

    log::debug!("Found {} posts under {}", posts.len(), root.display());
    Ok(posts)
}
