//! Full HTML page template.
//!
//! Layout: site header, navigation sidebar, article with prev/next links,
//! table of contents, footer. Every URL is relative to the page so the
//! output can be mounted under any path.

use std::fmt::Write;

use pedia_config::SiteConfig;
use pedia_content::NavigationEntry;

use crate::body::RenderedBody;
use crate::toc::{TocNode, build_toc};
use crate::util::{asset_href, escape_html, page_href};

/// Output path of the bundled stylesheet.
pub const THEME_CSS_PATH: &str = "assets/theme.css";

/// All data needed to render one page.
#[derive(Clone, Debug)]
pub struct PageContext<'a> {
    pub site: &'a SiteConfig,
    pub slug: &'a str,
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub body: &'a RenderedBody,
    /// Every navigation entry, in position order.
    pub navigation: &'a [NavigationEntry],
    /// Index of this page in `navigation`, if it has a place there.
    pub current: Option<usize>,
    /// "Edit this page" link target.
    pub edit_url: Option<String>,
}

/// Edit link for a source path, when the site has an edit base URL.
///
/// ```
/// use pedia_config::SiteConfig;
/// use pedia_renderer::edit_url;
///
/// let site = SiteConfig {
///     edit_base_url: Some("https://github.com/acme/javapedia/blob/main/pages".to_owned()),
///     ..SiteConfig::default()
/// };
/// assert_eq!(
///     edit_url(&site, "collections/hash-map.md").as_deref(),
///     Some("https://github.com/acme/javapedia/blob/main/pages/collections/hash-map.md"),
/// );
/// ```
#[must_use]
pub fn edit_url(site: &SiteConfig, source_path: &str) -> Option<String> {
    let base = site.edit_base_url.as_deref()?;
    Some(format!("{base}/{}", source_path.trim_start_matches('/')))
}

/// Render a complete document page.
#[must_use]
pub fn render_page(page: &PageContext<'_>) -> String {
    let mut html = String::with_capacity(8192 + page.body.html.len());

    let full_title = if page.title == page.site.name {
        escape_html(page.title)
    } else {
        format!("{} | {}", escape_html(page.title), escape_html(&page.site.name))
    };
    render_head(&mut html, page.slug, &full_title, page.description);
    render_header(&mut html, page.site, page.slug);

    html.push_str("<div class=\"layout\">\n");
    render_sidebar(&mut html, page.slug, page.navigation, page.current);

    html.push_str("<main class=\"content\">\n<article class=\"prose\">\n");
    html.push_str(&page.body.html);
    html.push_str("</article>\n");
    if let Some(url) = &page.edit_url {
        let _ = writeln!(
            html,
            "<p class=\"edit-link\"><a href=\"{}\">Edit this page</a></p>",
            escape_html(url)
        );
    }
    if let Some(current) = page.current {
        render_pager(&mut html, page.slug, page.navigation, current);
    }
    html.push_str("</main>\n");

    render_toc(&mut html, &build_toc(&page.body.toc));
    html.push_str("</div>\n");

    render_footer(&mut html, page.site);
    html.push_str("</body>\n</html>\n");
    html
}

/// Render the index page used when no root document exists.
///
/// Lists every navigation entry in order.
#[must_use]
pub fn render_landing(site: &SiteConfig, navigation: &[NavigationEntry]) -> String {
    let mut html = String::with_capacity(4096);
    render_head(&mut html, "", &escape_html(&site.name), None);
    render_header(&mut html, site, "");

    html.push_str("<div class=\"layout\">\n<main class=\"content\">\n<article class=\"prose\">\n");
    let _ = writeln!(html, "<h1>{}</h1>", escape_html(&site.name));
    if !navigation.is_empty() {
        html.push_str("<ol class=\"landing-list\">\n");
        for entry in navigation {
            let _ = writeln!(
                html,
                "<li><a href=\"{}\">{}</a></li>",
                page_href("", &entry.slug),
                escape_html(&entry.title)
            );
        }
        html.push_str("</ol>\n");
    }
    html.push_str("</article>\n</main>\n</div>\n");

    render_footer(&mut html, site);
    html.push_str("</body>\n</html>\n");
    html
}

fn render_head(html: &mut String, slug: &str, title: &str, description: Option<&str>) {
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    let _ = writeln!(html, "<title>{title}</title>");
    if let Some(description) = description {
        let _ = writeln!(
            html,
            "<meta name=\"description\" content=\"{}\">",
            escape_html(description)
        );
    }
    let _ = writeln!(
        html,
        "<link rel=\"stylesheet\" href=\"{}\">",
        asset_href(slug, THEME_CSS_PATH)
    );
    html.push_str("</head>\n<body>\n");
}

fn render_header(html: &mut String, site: &SiteConfig, slug: &str) {
    html.push_str("<header class=\"site-header\">\n");
    let _ = writeln!(
        html,
        "<a class=\"site-logo\" href=\"{}\">{}</a>",
        page_href(slug, ""),
        escape_html(&site.logo)
    );
    if let Some(repository) = &site.repository {
        let _ = writeln!(
            html,
            "<a class=\"site-repository\" href=\"{}\">Repository</a>",
            escape_html(repository)
        );
    }
    html.push_str("</header>\n");
}

fn render_sidebar(
    html: &mut String,
    slug: &str,
    navigation: &[NavigationEntry],
    current: Option<usize>,
) {
    html.push_str("<nav class=\"sidebar\">\n<ol>\n");
    for (index, entry) in navigation.iter().enumerate() {
        let href = page_href(slug, &entry.slug);
        let title = escape_html(&entry.title);
        if current == Some(index) {
            let _ = writeln!(
                html,
                "<li class=\"active\"><a href=\"{href}\" aria-current=\"page\">{title}</a></li>"
            );
        } else {
            let _ = writeln!(html, "<li><a href=\"{href}\">{title}</a></li>");
        }
    }
    html.push_str("</ol>\n</nav>\n");
}

/// Previous/next links by navigation position.
fn render_pager(html: &mut String, slug: &str, navigation: &[NavigationEntry], current: usize) {
    let prev = current.checked_sub(1).and_then(|i| navigation.get(i));
    let next = navigation.get(current + 1);
    if prev.is_none() && next.is_none() {
        return;
    }

    html.push_str("<nav class=\"pager\">\n");
    if let Some(entry) = prev {
        let _ = writeln!(
            html,
            "<a class=\"pager-prev\" rel=\"prev\" href=\"{}\">{}</a>",
            page_href(slug, &entry.slug),
            escape_html(&entry.title)
        );
    }
    if let Some(entry) = next {
        let _ = writeln!(
            html,
            "<a class=\"pager-next\" rel=\"next\" href=\"{}\">{}</a>",
            page_href(slug, &entry.slug),
            escape_html(&entry.title)
        );
    }
    html.push_str("</nav>\n");
}

fn render_toc(html: &mut String, toc: &[TocNode]) {
    if toc.is_empty() {
        return;
    }
    html.push_str("<aside class=\"toc\">\n<h2>On this page</h2>\n");
    render_toc_nodes(html, toc);
    html.push_str("</aside>\n");
}

fn render_toc_nodes(html: &mut String, nodes: &[TocNode]) {
    html.push_str("<ul>\n");
    for node in nodes {
        let _ = write!(
            html,
            "<li><a href=\"#{}\">{}</a>",
            escape_html(&node.entry.id),
            escape_html(&node.entry.title)
        );
        if !node.children.is_empty() {
            html.push('\n');
            render_toc_nodes(html, &node.children);
        }
        html.push_str("</li>\n");
    }
    html.push_str("</ul>\n");
}

fn render_footer(html: &mut String, site: &SiteConfig) {
    if let Some(footer) = &site.footer {
        let _ = writeln!(
            html,
            "<footer class=\"site-footer\">{}</footer>",
            escape_html(footer)
        );
    }
}
