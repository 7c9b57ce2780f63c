//! Machine-readable site manifests.
//!
//! - `navigation.json`: site identity and the ordered navigation entries
//! - `search-index.json`: title and plain text of every built page

use serde::Serialize;

use pedia_config::SiteConfig;
use pedia_content::Document;
use pedia_renderer::page_href;

use crate::navigation::Navigation;
use crate::report::BuildError;

pub const NAVIGATION_MANIFEST: &str = "navigation.json";
pub const SEARCH_INDEX: &str = "search-index.json";

#[derive(Serialize)]
struct NavigationManifest<'a> {
    site: SiteInfo<'a>,
    entries: Vec<ManifestEntry<'a>>,
}

#[derive(Serialize)]
struct SiteInfo<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    repository: Option<&'a str>,
}

#[derive(Serialize)]
struct ManifestEntry<'a> {
    slug: &'a str,
    title: &'a str,
    position: usize,
    href: String,
}

#[derive(Serialize)]
struct SearchEntry<'a> {
    slug: &'a str,
    title: &'a str,
    href: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    text: String,
}

/// Serialize the navigation manifest. Hrefs are relative to the output root.
pub(crate) fn navigation_json(
    site: &SiteConfig,
    navigation: &Navigation,
) -> Result<String, BuildError> {
    let manifest = NavigationManifest {
        site: SiteInfo {
            name: &site.name,
            repository: site.repository.as_deref(),
        },
        entries: navigation
            .entries()
            .iter()
            .map(|entry| ManifestEntry {
                slug: &entry.slug,
                title: &entry.title,
                position: entry.position,
                href: page_href("", &entry.slug),
            })
            .collect(),
    };
    let mut json = serde_json::to_string_pretty(&manifest).map_err(|source| BuildError::Manifest {
        name: NAVIGATION_MANIFEST,
        source,
    })?;
    json.push('\n');
    Ok(json)
}

/// Serialize the search index for `documents`, in the given order.
pub(crate) fn search_index_json(documents: &[Document]) -> Result<String, BuildError> {
    let entries: Vec<SearchEntry<'_>> = documents
        .iter()
        .map(|doc| SearchEntry {
            slug: &doc.slug,
            title: &doc.title,
            href: page_href("", &doc.slug),
            description: doc.front_matter.description.as_deref(),
            text: doc.plain_text(),
        })
        .collect();
    serde_json::to_string(&entries).map_err(|source| BuildError::Manifest {
        name: SEARCH_INDEX,
        source,
    })
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use pedia_config::OrphanPolicy;
    use pedia_content::{ContentBlock, FrontMatter, Inline};
    use pretty_assertions::assert_eq;

    use super::*;

    fn doc(slug: &str, title: &str) -> Document {
        Document {
            slug: slug.to_owned(),
            title: title.to_owned(),
            front_matter: FrontMatter::default(),
            blocks: vec![ContentBlock::Paragraph(vec![Inline::Text(format!(
                "About {title}."
            ))])],
            source_path: PathBuf::from(format!("{slug}.md")),
        }
    }

    #[test]
    fn test_navigation_json() {
        let site = SiteConfig {
            name: "Javapedia".to_owned(),
            repository: Some("https://github.com/acme/javapedia".to_owned()),
            ..SiteConfig::default()
        };
        let docs = vec![doc("hash-map", "HashMap"), doc("array-list", "ArrayList")];
        let roadmap = vec!["array-list".to_owned(), "hash-map".to_owned()];
        let (navigation, _) = Navigation::from_roadmap(&docs, &roadmap, OrphanPolicy::Warn);

        let json: serde_json::Value =
            serde_json::from_str(&navigation_json(&site, &navigation).unwrap()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "site": {
                    "name": "Javapedia",
                    "repository": "https://github.com/acme/javapedia"
                },
                "entries": [
                    {"slug": "array-list", "title": "ArrayList", "position": 0, "href": "array-list/"},
                    {"slug": "hash-map", "title": "HashMap", "position": 1, "href": "hash-map/"}
                ]
            })
        );
    }

    #[test]
    fn test_navigation_json_without_repository() {
        let site = SiteConfig {
            name: "Javapedia".to_owned(),
            ..SiteConfig::default()
        };
        let json = navigation_json(&site, &Navigation::default()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["site"], serde_json::json!({"name": "Javapedia"}));
        assert_eq!(value["entries"], serde_json::json!([]));
    }

    #[test]
    fn test_search_index_json() {
        let mut with_description = doc("abstract", "abstract");
        with_description.front_matter.description = Some("Abstract classes".to_owned());
        let json = search_index_json(&[with_description, doc("", "Home")]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(
            value,
            serde_json::json!([
                {
                    "slug": "abstract",
                    "title": "abstract",
                    "href": "abstract/",
                    "description": "Abstract classes",
                    "text": "About abstract."
                },
                {"slug": "", "title": "Home", "href": "./", "text": "About Home."}
            ])
        );
    }
}
