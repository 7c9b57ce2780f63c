//! Roadmap-ordered site navigation.

use std::collections::{HashMap, HashSet};
use std::fmt;

use pedia_config::OrphanPolicy;
use pedia_content::{Document, NavigationEntry};

/// Ordered list of navigation entries.
///
/// Positions run `0..len` in display order, so no two entries share one.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Navigation {
    entries: Vec<NavigationEntry>,
    index: HashMap<String, usize>,
}

/// Inconsistency between the roadmap and the documents on disk.
///
/// Warnings never stop a build.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NavigationWarning {
    /// Roadmap lists a slug no document provides.
    MissingDocument { slug: String },
    /// Document exists but the roadmap does not list it.
    Orphan { slug: String },
}

impl fmt::Display for NavigationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingDocument { slug } => {
                write!(f, "roadmap entry `{slug}` has no matching document")
            }
            Self::Orphan { slug } => write!(f, "document `{slug}` is not listed in the roadmap"),
        }
    }
}

impl Navigation {
    /// Order documents by the roadmap.
    ///
    /// Roadmap slugs are matched after trimming surrounding slashes. Slugs
    /// without a document are skipped with a warning. Documents missing from
    /// the roadmap are handled by `orphans`; with [`OrphanPolicy::Append`]
    /// they follow the roadmap entries in slug order. The root document is
    /// the site home page and is only listed when the roadmap names it.
    #[must_use]
    pub fn from_roadmap(
        documents: &[Document],
        roadmap: &[String],
        orphans: OrphanPolicy,
    ) -> (Self, Vec<NavigationWarning>) {
        let by_slug: HashMap<&str, &Document> =
            documents.iter().map(|doc| (doc.slug.as_str(), doc)).collect();

        let mut navigation = Self::default();
        let mut warnings = Vec::new();

        for slug in roadmap {
            let slug = slug.trim().trim_matches('/');
            match by_slug.get(slug) {
                Some(doc) => navigation.push(doc),
                None => warnings.push(NavigationWarning::MissingDocument {
                    slug: slug.to_owned(),
                }),
            }
        }

        let listed: HashSet<String> = navigation.index.keys().cloned().collect();
        let mut unlisted: Vec<&Document> = documents
            .iter()
            .filter(|doc| !doc.slug.is_empty() && !listed.contains(&doc.slug))
            .collect();
        unlisted.sort_by(|a, b| a.slug.cmp(&b.slug));

        for doc in unlisted {
            match orphans {
                OrphanPolicy::Warn => warnings.push(NavigationWarning::Orphan {
                    slug: doc.slug.clone(),
                }),
                OrphanPolicy::Exclude => {}
                OrphanPolicy::Append => navigation.push(doc),
            }
        }

        (navigation, warnings)
    }

    fn push(&mut self, doc: &Document) {
        if self.index.contains_key(&doc.slug) {
            return;
        }
        let position = self.entries.len();
        self.index.insert(doc.slug.clone(), position);
        self.entries.push(NavigationEntry {
            slug: doc.slug.clone(),
            title: doc.title.clone(),
            position,
        });
    }

    /// Entries in position order.
    #[must_use]
    pub fn entries(&self) -> &[NavigationEntry] {
        &self.entries
    }

    /// Position of a slug, if it is listed.
    #[must_use]
    pub fn position_of(&self, slug: &str) -> Option<usize> {
        self.index.get(slug).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use pedia_content::FrontMatter;
    use pretty_assertions::assert_eq;

    use super::*;

    fn doc(slug: &str, title: &str) -> Document {
        Document {
            slug: slug.to_owned(),
            title: title.to_owned(),
            front_matter: FrontMatter::default(),
            blocks: Vec::new(),
            source_path: PathBuf::from(format!("{slug}.md")),
        }
    }

    fn roadmap(slugs: &[&str]) -> Vec<String> {
        slugs.iter().map(|s| (*s).to_owned()).collect()
    }

    fn slugs(navigation: &Navigation) -> Vec<&str> {
        navigation.entries().iter().map(|e| e.slug.as_str()).collect()
    }

    fn docs() -> Vec<Document> {
        vec![
            doc("abstract", "abstract"),
            doc("array-list", "ArrayList"),
            doc("hash-map", "HashMap"),
        ]
    }

    #[test]
    fn test_roadmap_order() {
        let (nav, warnings) = Navigation::from_roadmap(
            &docs(),
            &roadmap(&["array-list", "hash-map", "abstract"]),
            OrphanPolicy::Warn,
        );
        assert_eq!(
            nav.entries(),
            &[
                NavigationEntry {
                    slug: "array-list".to_owned(),
                    title: "ArrayList".to_owned(),
                    position: 0,
                },
                NavigationEntry {
                    slug: "hash-map".to_owned(),
                    title: "HashMap".to_owned(),
                    position: 1,
                },
                NavigationEntry {
                    slug: "abstract".to_owned(),
                    title: "abstract".to_owned(),
                    position: 2,
                },
            ]
        );
        assert!(warnings.is_empty());
        assert_eq!(nav.position_of("abstract"), Some(2));
        assert_eq!(nav.position_of("missing"), None);
    }

    #[test]
    fn test_missing_roadmap_slug_warns() {
        let (nav, warnings) = Navigation::from_roadmap(
            &docs(),
            &roadmap(&["/hash-map/", "linked-list", "array-list", "abstract"]),
            OrphanPolicy::Warn,
        );
        assert_eq!(slugs(&nav), vec!["hash-map", "array-list", "abstract"]);
        assert_eq!(
            warnings,
            vec![NavigationWarning::MissingDocument {
                slug: "linked-list".to_owned()
            }]
        );
        let positions: Vec<usize> = nav.entries().iter().map(|e| e.position).collect();
        assert_eq!(positions, vec![0, 1, 2]);
    }

    #[test]
    fn test_orphans_warn() {
        let (nav, warnings) =
            Navigation::from_roadmap(&docs(), &roadmap(&["hash-map"]), OrphanPolicy::Warn);
        assert_eq!(slugs(&nav), vec!["hash-map"]);
        assert_eq!(
            warnings,
            vec![
                NavigationWarning::Orphan {
                    slug: "abstract".to_owned()
                },
                NavigationWarning::Orphan {
                    slug: "array-list".to_owned()
                },
            ]
        );
    }

    #[test]
    fn test_orphans_exclude() {
        let (nav, warnings) =
            Navigation::from_roadmap(&docs(), &roadmap(&["hash-map"]), OrphanPolicy::Exclude);
        assert_eq!(slugs(&nav), vec!["hash-map"]);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_orphans_append_in_slug_order() {
        let (nav, warnings) =
            Navigation::from_roadmap(&docs(), &roadmap(&["hash-map"]), OrphanPolicy::Append);
        assert_eq!(slugs(&nav), vec!["hash-map", "abstract", "array-list"]);
        assert_eq!(nav.position_of("array-list"), Some(2));
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_root_document_is_not_an_orphan() {
        let mut documents = docs();
        documents.push(doc("", "Javapedia"));
        let (nav, warnings) =
            Navigation::from_roadmap(&documents, &roadmap(&[]), OrphanPolicy::Append);
        assert_eq!(slugs(&nav), vec!["abstract", "array-list", "hash-map"]);
        assert!(warnings.is_empty());

        let (nav, _) =
            Navigation::from_roadmap(&documents, &roadmap(&["/", "hash-map"]), OrphanPolicy::Exclude);
        assert_eq!(slugs(&nav), vec!["", "hash-map"]);
    }

    #[test]
    fn test_warning_display() {
        assert_eq!(
            NavigationWarning::MissingDocument {
                slug: "tree-map".to_owned()
            }
            .to_string(),
            "roadmap entry `tree-map` has no matching document"
        );
        assert_eq!(
            NavigationWarning::Orphan {
                slug: "abstract".to_owned()
            }
            .to_string(),
            "document `abstract` is not listed in the roadmap"
        );
    }
}
