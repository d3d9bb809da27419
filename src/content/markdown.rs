//! Markdown rendering with heading anchors and syntax highlighting

use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use serde::Serialize;
use std::collections::HashMap;
use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::{styled_line_to_highlighted_html, IncludeBackground};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

use crate::config::HighlightConfig;

/// A heading found while rendering
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Heading {
    pub level: u8,
    pub text: String,
    /// Anchor id written into the `<hN>` tag
    pub slug: String,
}

/// Rendered body of a document
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RenderedMarkdown {
    pub html: String,
    pub headings: Vec<Heading>,
}

/// Heading being collected until its end tag
struct OpenHeading<'a> {
    level: HeadingLevel,
    id: Option<CowStr<'a>>,
    classes: Vec<CowStr<'a>>,
    text: String,
    events: Vec<Event<'a>>,
}

/// Fenced or indented code block being collected
struct OpenCodeBlock {
    lang: Option<String>,
    code: String,
}

/// Markdown renderer with syntax highlighting
pub struct MarkdownRenderer {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    theme_name: String,
    line_numbers: bool,
}

impl MarkdownRenderer {
    pub fn new() -> Self {
        Self::with_options("base16-ocean.dark", true)
    }

    pub fn with_options(theme: &str, line_numbers: bool) -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            theme_name: theme.to_string(),
            line_numbers,
        }
    }

    pub fn from_config(config: &HighlightConfig) -> Self {
        Self::with_options(&config.theme, config.line_number)
    }

    /// Render a document body to HTML
    pub fn render(&self, markdown: &str) -> RenderedMarkdown {
        // Front-matter is stripped before this point, so no metadata blocks
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_SMART_PUNCTUATION
            | Options::ENABLE_HEADING_ATTRIBUTES;

        let mut events: Vec<Event> = Vec::new();
        let mut headings = Vec::new();
        let mut slugs: HashMap<String, usize> = HashMap::new();
        let mut heading: Option<OpenHeading> = None;
        let mut code_block: Option<OpenCodeBlock> = None;

        for event in Parser::new_ext(markdown, options) {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    let lang = match kind {
                        CodeBlockKind::Fenced(info) => fence_language(&info),
                        CodeBlockKind::Indented => None,
                    };
                    code_block = Some(OpenCodeBlock {
                        lang,
                        code: String::new(),
                    });
                }
                Event::End(TagEnd::CodeBlock) => {
                    if let Some(block) = code_block.take() {
                        let highlighted = self.highlight_code(&block.code, block.lang.as_deref());
                        events.push(Event::Html(highlighted.into()));
                    }
                }
                Event::Text(text) if code_block.is_some() => {
                    if let Some(block) = code_block.as_mut() {
                        block.code.push_str(&text);
                    }
                }
                Event::Start(Tag::Heading {
                    level, id, classes, ..
                }) => {
                    heading = Some(OpenHeading {
                        level,
                        id,
                        classes,
                        text: String::new(),
                        events: Vec::new(),
                    });
                }
                Event::End(TagEnd::Heading(_)) => {
                    if let Some(open) = heading.take() {
                        let slug = match &open.id {
                            Some(id) => id.to_string(),
                            None => unique_slug(&open.text, &mut slugs),
                        };
                        let level = open.level as u8;
                        let class_attr = if open.classes.is_empty() {
                            String::new()
                        } else {
                            let classes: Vec<&str> =
                                open.classes.iter().map(|c| c.as_ref()).collect();
                            format!(r#" class="{}""#, html_escape(&classes.join(" ")))
                        };

                        events.push(Event::Html(
                            format!(r#"<h{} id="{}"{}>"#, level, html_escape(&slug), class_attr)
                                .into(),
                        ));
                        events.extend(open.events);
                        events.push(Event::Html(format!("</h{}>\n", level).into()));

                        headings.push(Heading {
                            level,
                            text: open.text.trim().to_string(),
                            slug,
                        });
                    }
                }
                other => match heading.as_mut() {
                    Some(open) => {
                        if let Event::Text(text) | Event::Code(text) = &other {
                            open.text.push_str(text);
                        }
                        open.events.push(other);
                    }
                    None => events.push(other),
                },
            }
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());

        RenderedMarkdown {
            html: html_output,
            headings,
        }
    }

    fn theme(&self) -> Option<&Theme> {
        self.theme_set
            .themes
            .get(&self.theme_name)
            .or_else(|| self.theme_set.themes.values().next())
    }

    /// Highlight a code block
    fn highlight_code(&self, code: &str, lang: Option<&str>) -> String {
        let lang = lang.unwrap_or("text");

        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let Some(theme) = self.theme() else {
            return plain_code_block(code, lang);
        };

        let mut highlighter = HighlightLines::new(syntax, theme);
        let mut lines = Vec::new();
        for line in LinesWithEndings::from(code) {
            let highlighted = highlighter
                .highlight_line(line, &self.syntax_set)
                .and_then(|regions| {
                    styled_line_to_highlighted_html(&regions, IncludeBackground::No)
                });
            match highlighted {
                Ok(html) => lines.push(html),
                Err(e) => {
                    tracing::warn!("Failed to highlight {} block: {}", lang, e);
                    return plain_code_block(code, lang);
                }
            }
        }

        if self.line_numbers {
            with_line_numbers(&lines, lang)
        } else {
            format!(
                r#"<pre><code class="language-{}">{}</code></pre>"#,
                html_escape(lang),
                lines.concat()
            )
        }
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// First word of a fence info string, e.g. `rust` for ```` ```rust,ignore ````
fn fence_language(info: &str) -> Option<String> {
    info.split(|c: char| c == ',' || c.is_whitespace())
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

/// Slug for a heading, suffixed with `-N` when it was already used
fn unique_slug(text: &str, seen: &mut HashMap<String, usize>) -> String {
    let mut base = slug::slugify(text);
    if base.is_empty() {
        base = "section".to_string();
    }

    let count = seen.entry(base.clone()).or_insert(0);
    let slug = if *count == 0 {
        base
    } else {
        format!("{}-{}", base, count)
    };
    *count += 1;
    slug
}

fn with_line_numbers(lines: &[String], lang: &str) -> String {
    let gutter = (1..=lines.len())
        .map(|n| format!(r#"<span class="line-number">{}</span>"#, n))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"<figure class="highlight {}"><table><tr><td class="gutter"><pre>{}</pre></td><td class="code"><pre>{}</pre></td></tr></table></figure>"#,
        html_escape(lang),
        gutter,
        lines.concat().trim_end_matches('\n')
    )
}

fn plain_code_block(code: &str, lang: &str) -> String {
    format!(
        r#"<pre><code class="language-{}">{}</code></pre>"#,
        html_escape(lang),
        html_escape(code)
    )
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_basic_markdown() {
        let renderer = MarkdownRenderer::new();
        let out = renderer.render("# Hello World\n\nThis is a test.");
        assert!(out.html.contains(r#"<h1 id="hello-world">Hello World</h1>"#));
        assert!(out.html.contains("<p>This is a test.</p>"));
    }

    #[test]
    fn test_heading_slugs_are_unique() {
        let renderer = MarkdownRenderer::new();
        let out = renderer.render("# Intro\n\n## Intro\n\n### Intro\n");
        let slugs: Vec<_> = out.headings.iter().map(|h| h.slug.as_str()).collect();
        assert_eq!(slugs, vec!["intro", "intro-1", "intro-2"]);
        assert!(out.html.contains(r#"<h2 id="intro-1">Intro</h2>"#));
    }

    #[test]
    fn test_heading_text_and_explicit_id() {
        let renderer = MarkdownRenderer::new();
        let out = renderer.render("## Using `cargo` today {#setup}\n");
        assert_eq!(
            out.headings,
            vec![Heading {
                level: 2,
                text: "Using cargo today".to_string(),
                slug: "setup".to_string(),
            }]
        );
        assert!(out.html.contains(r#"<h2 id="setup">Using <code>cargo</code> today</h2>"#));
    }

    #[test]
    fn test_render_code_block() {
        let renderer = MarkdownRenderer::new();
        let out = renderer.render("```rust\nfn main() {}\n```");
        assert!(out.html.contains(r#"<figure class="highlight rust">"#));
        assert!(out.html.contains(r#"<span class="line-number">1</span>"#));
        assert!(out.html.contains("main"));
    }

    #[test]
    fn test_render_code_block_without_line_numbers() {
        let renderer = MarkdownRenderer::with_options("base16-ocean.dark", false);
        let out = renderer.render("```rust,ignore\nlet x = 1;\n```\n\n```\n<plain>\n```");
        assert!(out.html.contains(r#"<pre><code class="language-rust">"#));
        assert!(out.html.contains(r#"<pre><code class="language-text">"#));
        assert!(out.html.contains("&lt;plain&gt;"));
    }

    #[test]
    fn test_code_block_does_not_produce_headings() {
        let renderer = MarkdownRenderer::new();
        let out = renderer.render("```\n# not a heading\n```\n");
        assert!(out.headings.is_empty());
    }

    #[test]
    fn test_unique_slug_fallback() {
        let mut seen = HashMap::new();
        assert_eq!(unique_slug("!!!", &mut seen), "section");
        assert_eq!(unique_slug("???", &mut seen), "section-1");
    }
}
