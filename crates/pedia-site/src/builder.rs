//! Site assembly: scan, parse, order, render.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use pedia_config::{NavigationConfig, SiteConfig};
use pedia_content::{Document, MalformedContentError, parse_document};
use pedia_renderer::{
    LinkBase, PageContext, THEME_CSS, THEME_CSS_PATH, edit_url, page_output_path, render_body,
    render_landing, render_page,
};
use pedia_storage::{ContentStore, SourceEntry};
use rayon::prelude::*;

use crate::manifest::{NAVIGATION_MANIFEST, SEARCH_INDEX, navigation_json, search_index_json};
use crate::navigation::{Navigation, NavigationWarning};
use crate::report::{BuildError, BuildReport, FailureReason, PageFailure};

/// Builds a complete site from a content store.
///
/// The builder holds no per-build state; call [`assemble`](Self::assemble)
/// again to rebuild after sources change.
pub struct SiteBuilder {
    store: Arc<dyn ContentStore>,
    site: SiteConfig,
    navigation: NavigationConfig,
}

/// Every output file of one build, keyed by path relative to the output root.
#[derive(Debug, Default)]
pub struct Assembly {
    outputs: BTreeMap<String, String>,
    /// Static files copied from the store, keyed like `outputs`.
    assets: BTreeMap<String, Vec<u8>>,
    navigation: Navigation,
    report: BuildReport,
}

impl SiteBuilder {
    #[must_use]
    pub fn new(store: Arc<dyn ContentStore>, site: SiteConfig, navigation: NavigationConfig) -> Self {
        Self {
            store,
            site,
            navigation,
        }
    }

    /// Site settings used for every page.
    #[must_use]
    pub fn site(&self) -> &SiteConfig {
        &self.site
    }

    /// Run the pipeline into memory.
    ///
    /// Documents that cannot be read or parsed are recorded in the report
    /// and skipped; every other document is still rendered. Output is
    /// independent of thread scheduling.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Storage`] if the store cannot be scanned, or
    /// [`BuildError::Manifest`] if a manifest cannot be serialized.
    pub fn assemble(&self) -> Result<Assembly, BuildError> {
        let start = Instant::now();
        let entries = self.store.scan().map_err(BuildError::Storage)?;

        let mut report = BuildReport::default();
        let entries = claim_slugs(entries, &mut report.failures);

        let parsed: Vec<Result<Document, PageFailure>> =
            entries.par_iter().map(|entry| self.load(entry)).collect();
        let mut documents = Vec::with_capacity(parsed.len());
        for result in parsed {
            match result {
                Ok(document) => documents.push(document),
                Err(failure) => report.failures.push(failure),
            }
        }
        report.failures.sort_by(|a, b| a.source_path.cmp(&b.source_path));
        documents.sort_by(|a, b| a.slug.cmp(&b.slug));

        let roadmap = &self.navigation.roadmap;
        let (navigation, mut warnings) =
            Navigation::from_roadmap(&documents, roadmap, self.navigation.orphans);
        // A roadmap slug whose source failed is already in the failure list.
        let failed: HashSet<&str> = report.failures.iter().map(|f| f.slug.as_str()).collect();
        warnings.retain(|warning| {
            !matches!(
                warning,
                NavigationWarning::MissingDocument { slug } if failed.contains(slug.as_str())
            )
        });
        for warning in &warnings {
            tracing::warn!("{warning}");
        }
        report.warnings = warnings;

        let pages: Vec<(String, String)> = documents
            .par_iter()
            .map(|doc| (page_output_path(&doc.slug), self.render(doc, &navigation)))
            .collect();
        report.pages = pages.len();

        let mut outputs: BTreeMap<String, String> = pages.into_iter().collect();
        if !documents.iter().any(|doc| doc.slug.is_empty()) {
            outputs.insert(
                page_output_path(""),
                render_landing(&self.site, navigation.entries()),
            );
        }
        outputs.insert(
            NAVIGATION_MANIFEST.to_owned(),
            navigation_json(&self.site, &navigation)?,
        );
        outputs.insert(SEARCH_INDEX.to_owned(), search_index_json(&documents)?);
        outputs.insert(THEME_CSS_PATH.to_owned(), THEME_CSS.to_owned());
        let assets = self.load_assets(&outputs)?;

        for failure in &report.failures {
            tracing::warn!(source = %failure.source_path.display(), "{failure}");
        }
        tracing::info!(
            pages = report.pages,
            failures = report.failures.len(),
            warnings = report.warnings.len(),
            elapsed_ms = start.elapsed().as_millis(),
            "Site assembled"
        );

        Ok(Assembly {
            outputs,
            assets,
            navigation,
            report,
        })
    }

    fn load(&self, entry: &SourceEntry) -> Result<Document, PageFailure> {
        let failure = |reason| PageFailure {
            slug: entry.slug.clone(),
            source_path: entry.source_path.clone(),
            reason,
        };
        let text = self
            .store
            .read(&entry.source_path)
            .map_err(|e| failure(FailureReason::Read(e)))?;
        parse_document(&entry.slug, &entry.source_path, &text)
            .map_err(|e| failure(FailureReason::Malformed(e)))
    }

    /// Static files keyed by output path. Generated outputs win over a
    /// static file at the same path; unreadable files are skipped.
    fn load_assets(
        &self,
        outputs: &BTreeMap<String, String>,
    ) -> Result<BTreeMap<String, Vec<u8>>, BuildError> {
        let mut assets = BTreeMap::new();
        for path in self.store.scan_assets().map_err(BuildError::Storage)? {
            let key = url_path(&path);
            if outputs.contains_key(&key) {
                tracing::warn!(path = %key, "Static file shadowed by generated output");
                continue;
            }
            match self.store.read_asset(&path) {
                Ok(bytes) => {
                    assets.insert(key, bytes);
                }
                Err(e) => tracing::warn!(path = %key, error = %e, "Skipping unreadable static file"),
            }
        }
        Ok(assets)
    }

    fn render(&self, doc: &Document, navigation: &Navigation) -> String {
        let body = render_body(&doc.blocks, &LinkBase::for_document(doc));
        let page = PageContext {
            site: &self.site,
            slug: &doc.slug,
            title: &doc.title,
            description: doc.front_matter.description.as_deref(),
            body: &body,
            navigation: navigation.entries(),
            current: navigation.position_of(&doc.slug),
            edit_url: edit_url(&self.site, &url_path(&doc.source_path)),
        };
        tracing::debug!(slug = %doc.slug, toc = body.toc.len(), "Rendered page");
        render_page(&page)
    }
}

/// Keep the first source for each slug, in scan order.
///
/// `guide/index.md` sorts before `guide.md`, so the directory index wins
/// and the flat file is reported as the duplicate.
fn claim_slugs(entries: Vec<SourceEntry>, failures: &mut Vec<PageFailure>) -> Vec<SourceEntry> {
    let mut owners: HashMap<String, PathBuf> = HashMap::new();
    let mut claimed = Vec::with_capacity(entries.len());
    for entry in entries {
        if let Some(other) = owners.get(&entry.slug) {
            failures.push(PageFailure {
                reason: FailureReason::Malformed(MalformedContentError::duplicate_slug(
                    &entry.slug,
                    other,
                )),
                slug: entry.slug,
                source_path: entry.source_path,
            });
            continue;
        }
        owners.insert(entry.slug.clone(), entry.source_path.clone());
        claimed.push(entry);
    }
    claimed
}

/// Source path with `/` separators, for edit links.
fn url_path(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

impl Assembly {
    /// Output contents by relative path.
    #[must_use]
    pub fn outputs(&self) -> &BTreeMap<String, String> {
        &self.outputs
    }

    /// Content of one output, e.g. `hash-map/index.html`.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&str> {
        self.outputs.get(path).map(String::as_str)
    }

    /// Bytes of one static file, e.g. `img/buckets.png`.
    #[must_use]
    pub fn asset(&self, path: &str) -> Option<&[u8]> {
        self.assets.get(path).map(Vec::as_slice)
    }

    #[must_use]
    pub fn navigation(&self) -> &Navigation {
        &self.navigation
    }

    #[must_use]
    pub fn report(&self) -> &BuildReport {
        &self.report
    }

    /// Write every output under `output_dir`, creating directories as needed.
    ///
    /// Static files are written next to the pages. Existing files with the
    /// same path are overwritten; other files are left in place. Returns
    /// the number of files written.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Output`] on the first directory or file that
    /// cannot be written.
    pub fn write(&self, output_dir: &Path) -> Result<usize, BuildError> {
        let output_error = |path: &Path| {
            let path = path.to_path_buf();
            move |source| BuildError::Output { path, source }
        };

        fs::create_dir_all(output_dir).map_err(output_error(output_dir))?;
        let pages = self.outputs.iter().map(|(p, c)| (p, c.as_bytes()));
        let assets = self.assets.iter().map(|(p, b)| (p, b.as_slice()));
        let mut written = 0;
        for (rel_path, content) in pages.chain(assets) {
            let path = output_dir.join(rel_path);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).map_err(output_error(parent))?;
            }
            fs::write(&path, content).map_err(output_error(&path))?;
            written += 1;
        }
        tracing::debug!(
            output_dir = %output_dir.display(),
            files = written,
            "Wrote site"
        );
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use pedia_config::OrphanPolicy;
    use pedia_content::MalformedReason;
    use pedia_storage::MockStore;
    use pretty_assertions::assert_eq;

    use super::*;

    fn site() -> SiteConfig {
        SiteConfig {
            name: "Javapedia".to_owned(),
            logo: "Javapedia".to_owned(),
            ..SiteConfig::default()
        }
    }

    fn nav_config(roadmap: &[&str], orphans: OrphanPolicy) -> NavigationConfig {
        NavigationConfig {
            roadmap: roadmap.iter().map(|s| (*s).to_owned()).collect(),
            orphans,
        }
    }

    fn collections_store() -> MockStore {
        MockStore::new()
            .with_file("hash-map.md", "# HashMap\n\nBuckets of entries.\n")
            .with_file(
                "array-list.md",
                "# ArrayList\n\n```java filename=\"Main.java\"\nList<String> xs = new ArrayList<>();\n```\n",
            )
            .with_file("abstract.md", "Abstract classes cannot be instantiated.\n")
    }

    fn assemble(store: MockStore, roadmap: &[&str], orphans: OrphanPolicy) -> Assembly {
        SiteBuilder::new(Arc::new(store), site(), nav_config(roadmap, orphans))
            .assemble()
            .unwrap()
    }

    #[test]
    fn test_roadmap_orders_pages_and_next_links() {
        let assembly = assemble(
            collections_store(),
            &["array-list", "hash-map", "abstract"],
            OrphanPolicy::Warn,
        );

        let slugs: Vec<&str> = assembly
            .navigation()
            .entries()
            .iter()
            .map(|e| e.slug.as_str())
            .collect();
        assert_eq!(slugs, vec!["array-list", "hash-map", "abstract"]);

        let manifest: serde_json::Value =
            serde_json::from_str(assembly.get("navigation.json").unwrap()).unwrap();
        let manifest_slugs: Vec<&str> = manifest["entries"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["slug"].as_str().unwrap())
            .collect();
        assert_eq!(manifest_slugs, vec!["array-list", "hash-map", "abstract"]);

        let array_list = assembly.get("array-list/index.html").unwrap();
        assert!(array_list.contains("rel=\"next\" href=\"../hash-map/\""));
        let hash_map = assembly.get("hash-map/index.html").unwrap();
        assert!(hash_map.contains("rel=\"next\" href=\"../abstract/\""));
        assert!(hash_map.contains("rel=\"prev\" href=\"../array-list/\""));
        let last = assembly.get("abstract/index.html").unwrap();
        assert!(!last.contains("rel=\"next\""));

        assert!(assembly.report().is_success());
        assert_eq!(assembly.report().pages, 3);
    }

    #[test]
    fn test_code_text_is_preserved() {
        let assembly = assemble(collections_store(), &["array-list"], OrphanPolicy::Exclude);
        let html = assembly.get("array-list/index.html").unwrap();
        assert!(html.contains("<figcaption>Main.java</figcaption>"));
        assert!(html.contains("List&lt;String&gt; xs = new ArrayList&lt;&gt;();\n"));
    }

    #[test]
    fn test_unterminated_fence_does_not_block_other_pages() {
        let store = collections_store().with_file(
            "broken.md",
            "# Broken\n\nIntro.\n\n```java\nint x = 1;\n",
        );
        let assembly = assemble(
            store,
            &["array-list", "hash-map", "abstract", "broken", "linked-list"],
            OrphanPolicy::Warn,
        );
        let report = assembly.report();

        assert!(!report.is_success());
        assert_eq!(report.failures.len(), 1);
        let failure = &report.failures[0];
        assert_eq!(failure.slug, "broken");
        match &failure.reason {
            FailureReason::Malformed(err) => {
                assert_eq!(err.slug, "broken");
                assert_eq!(err.line, 5);
                assert!(matches!(err.reason, MalformedReason::UnterminatedFence { .. }));
            }
            FailureReason::Read(err) => panic!("unexpected read failure: {err}"),
        }

        assert_eq!(report.pages, 3);
        assert!(assembly.get("broken/index.html").is_none());
        assert!(assembly.get("hash-map/index.html").is_some());
        assert_eq!(
            report.warnings,
            vec![NavigationWarning::MissingDocument {
                slug: "linked-list".to_owned()
            }]
        );
    }

    #[test]
    fn test_unreadable_source_is_a_page_failure() {
        let store = collections_store().with_unreadable("secret.md");
        let assembly = assemble(store, &["hash-map"], OrphanPolicy::Exclude);
        let report = assembly.report();
        assert_eq!(report.failures.len(), 1);
        assert!(matches!(report.failures[0].reason, FailureReason::Read(_)));
        assert_eq!(report.pages, 3);
    }

    #[test]
    fn test_duplicate_slug_keeps_directory_index() {
        let store = MockStore::new()
            .with_file("guide.md", "# Flat\n")
            .with_file("guide/index.md", "# Guide\n");
        let assembly = assemble(store, &["guide"], OrphanPolicy::Warn);
        let report = assembly.report();

        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].source_path, PathBuf::from("guide.md"));
        assert!(
            assembly
                .get("guide/index.html")
                .unwrap()
                .contains("<h1 id=\"guide\">Guide</h1>")
        );
    }

    #[test]
    fn test_scan_failure_is_fatal() {
        let builder = SiteBuilder::new(
            Arc::new(MockStore::new().with_scan_error()),
            site(),
            NavigationConfig::default(),
        );
        assert!(matches!(builder.assemble(), Err(BuildError::Storage(_))));
    }

    #[test]
    fn test_landing_page_without_root_document() {
        let assembly = assemble(collections_store(), &["hash-map"], OrphanPolicy::Exclude);
        let index = assembly.get("index.html").unwrap();
        assert!(index.contains("<li><a href=\"hash-map/\">HashMap</a></li>"));
        assert!(assembly.get("assets/theme.css").is_some());
        assert!(assembly.get("search-index.json").is_some());
    }

    #[test]
    fn test_root_document_replaces_landing() {
        let store = collections_store().with_file("index.md", "# Welcome\n");
        let assembly = assemble(store, &["hash-map"], OrphanPolicy::Exclude);
        let index = assembly.get("index.html").unwrap();
        assert!(index.contains("<h1 id=\"welcome\">Welcome</h1>"));
        assert!(index.contains("<link rel=\"stylesheet\" href=\"assets/theme.css\">"));
    }

    #[test]
    fn test_edit_links() {
        let mut site = site();
        site.edit_base_url = Some("https://github.com/acme/javapedia/edit/main/pages".to_owned());
        let store = MockStore::new().with_file("collections/hash-map.md", "# HashMap\n");
        let assembly = SiteBuilder::new(
            Arc::new(store),
            site,
            nav_config(&["collections/hash-map"], OrphanPolicy::Warn),
        )
        .assemble()
        .unwrap();
        let html = assembly.get("collections/hash-map/index.html").unwrap();
        assert!(html.contains(
            "href=\"https://github.com/acme/javapedia/edit/main/pages/collections/hash-map.md\""
        ));
    }

    #[test]
    fn test_assemble_is_deterministic() {
        let roadmap = ["array-list", "hash-map", "abstract"];
        let first = assemble(collections_store(), &roadmap, OrphanPolicy::Warn);
        let second = assemble(collections_store(), &roadmap, OrphanPolicy::Warn);
        assert_eq!(first.outputs(), second.outputs());
    }

    #[test]
    fn test_write() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("dist");
        let assembly = assemble(collections_store(), &["hash-map"], OrphanPolicy::Exclude);

        let written = assembly.write(&out).unwrap();
        assert_eq!(written, assembly.outputs().len());
        assert!(out.join("hash-map/index.html").is_file());
        assert!(out.join("index.html").is_file());
        assert_eq!(
            fs::read_to_string(out.join("assets/theme.css")).unwrap(),
            THEME_CSS
        );
    }

    #[test]
    fn test_static_files_are_published_and_linked() {
        let store = collections_store()
            .with_file(
                "collections/tree-map.md",
                "# TreeMap\n\n![tree](img/tree.svg)\n",
            )
            .with_asset("collections/img/tree.svg", b"<svg/>".to_vec())
            .with_asset("assets/theme.css", b"shadowed".to_vec());
        let assembly = assemble(store, &[], OrphanPolicy::Exclude);

        let html = assembly.get("collections/tree-map/index.html").unwrap();
        assert!(html.contains(r#"<img src="../../collections/img/tree.svg" alt="tree">"#));
        assert_eq!(assembly.asset("collections/img/tree.svg"), Some(&b"<svg/>"[..]));
        assert_eq!(assembly.asset("assets/theme.css"), None);
        assert_eq!(assembly.get("assets/theme.css"), Some(THEME_CSS));

        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("dist");
        let written = assembly.write(&out).unwrap();
        assert_eq!(written, assembly.outputs().len() + 1);
        assert_eq!(fs::read(out.join("collections/img/tree.svg")).unwrap(), b"<svg/>");
    }

    #[test]
    fn test_write_into_file_is_output_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("dist");
        fs::write(&blocker, "not a directory").unwrap();
        let assembly = assemble(collections_store(), &[], OrphanPolicy::Exclude);
        assert!(matches!(
            assembly.write(&blocker),
            Err(BuildError::Output { .. })
        ));
    }
}
