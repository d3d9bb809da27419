//! URL helper functions

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use std::path::{Component, Path};

/// Characters escaped inside a single path segment
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Root-relative href for a file below the content root
///
/// # Examples
/// ```ignore
/// href_for(Path::new("/site/markdown"), Path::new("/site/markdown/posts/a b.md"))
/// // -> Some("/posts/a%20b.md")
/// ```
pub fn href_for(root: &Path, file: &Path) -> Option<String> {
    let relative = file.strip_prefix(root).ok()?;
    let mut href = String::new();

    for component in relative.components() {
        match component {
            Component::Normal(segment) => {
                href.push('/');
                href.push_str(&encode_segment(&segment.to_string_lossy()));
            }
            Component::CurDir => {}
            _ => return None,
        }
    }

    if href.is_empty() {
        None
    } else {
        Some(href)
    }
}

/// Percent-encode one path segment
pub fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, SEGMENT).to_string()
}

/// Join a root-relative path onto the site URL
///
/// # Examples
/// ```ignore
/// full_url_for("https://example.com/", "/posts/a.md") // -> "https://example.com/posts/a.md"
/// ```
pub fn full_url_for(base_url: &str, path: &str) -> String {
    let base = base_url.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    if path.is_empty() {
        format!("{}/", base)
    } else {
        format!("{}/{}", base, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_href_for() {
        let root = Path::new("/site/markdown");
        assert_eq!(
            href_for(root, Path::new("/site/markdown/posts/hello.md")).as_deref(),
            Some("/posts/hello.md")
        );
        assert_eq!(
            href_for(root, Path::new("/site/markdown/projects/my project.md")).as_deref(),
            Some("/projects/my%20project.md")
        );
    }

    #[test]
    fn test_href_outside_root() {
        let root = Path::new("/site/markdown");
        assert!(href_for(root, Path::new("/elsewhere/a.md")).is_none());
        assert!(href_for(root, root).is_none());
    }

    #[test]
    fn test_full_url_for() {
        assert_eq!(
            full_url_for("https://example.com/", "/posts/a.md"),
            "https://example.com/posts/a.md"
        );
        assert_eq!(full_url_for("https://example.com", ""), "https://example.com/");
    }
}
