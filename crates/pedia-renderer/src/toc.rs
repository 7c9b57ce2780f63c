//! Table of contents.

/// Flat table of contents entry, in document order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TocEntry {
    /// Heading level (1-6).
    pub level: u8,
    /// Heading text.
    pub title: String,
    /// Anchor ID for linking.
    pub id: String,
}

/// Table of contents entry with nested subsections.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TocNode {
    pub entry: TocEntry,
    pub children: Vec<TocNode>,
}

/// Nest flat entries by heading level.
///
/// An entry becomes a child of the closest preceding entry with a lower
/// level. Skipped levels (`h2` then `h4`) nest directly.
#[must_use]
pub fn build_toc(flat: &[TocEntry]) -> Vec<TocNode> {
    let mut roots: Vec<TocNode> = Vec::new();
    // Path of indices from `roots` down to the most recent node.
    let mut path: Vec<usize> = Vec::new();

    for entry in flat {
        while let Some(parent) = node_at(&roots, &path) {
            if parent.entry.level < entry.level {
                break;
            }
            path.pop();
        }

        let node = TocNode {
            entry: entry.clone(),
            children: Vec::new(),
        };
        if let Some(parent) = node_at_mut(&mut roots, &path) {
            parent.children.push(node);
            let index = parent.children.len() - 1;
            path.push(index);
        } else {
            roots.push(node);
            path.push(roots.len() - 1);
        }
    }

    roots
}

fn node_at<'a>(roots: &'a [TocNode], path: &[usize]) -> Option<&'a TocNode> {
    let (first, rest) = path.split_first()?;
    let mut node = roots.get(*first)?;
    for index in rest {
        node = node.children.get(*index)?;
    }
    Some(node)
}

fn node_at_mut<'a>(roots: &'a mut [TocNode], path: &[usize]) -> Option<&'a mut TocNode> {
    let (first, rest) = path.split_first()?;
    let mut node = roots.get_mut(*first)?;
    for index in rest {
        node = node.children.get_mut(*index)?;
    }
    Some(node)
}
