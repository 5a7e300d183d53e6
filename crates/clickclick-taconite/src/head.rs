//! Deduplicating, order-preserving head-resource collection.

use std::collections::HashSet;

use crate::resource::{HeadResource, ResourceKey};

/// Insertion-ordered set of [`HeadResource`]s.
///
/// Imports are unique by URL. Inline blocks are unique by id when they have
/// one and are always kept when they do not.
#[derive(Debug, Clone, Default)]
pub struct HeadResourceSet {
    resources: Vec<HeadResource>,
    seen: HashSet<ResourceKey>,
}

/// Head resources split into the group emitted before a batch's DOM
/// mutations and the inline scripts emitted after them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeadSplit {
    /// Styles (imports and inline) followed by script imports.
    pub leading: Vec<HeadResource>,
    /// Inline scripts.
    pub trailing: Vec<HeadResource>,
}

impl HeadResourceSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a resource, returning `false` when an equivalent one is present.
    pub fn insert(&mut self, resource: HeadResource) -> bool {
        if let Some(key) = resource.key() {
            if !self.seen.insert(key) {
                return false;
            }
        }
        self.resources.push(resource);
        true
    }

    /// Iterates resources in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, HeadResource> {
        self.resources.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Splits the set for delivery inside a partial response.
    ///
    /// Relative order within each category is preserved.
    #[must_use]
    pub fn split_for_batch(self) -> HeadSplit {
        let mut styles = Vec::new();
        let mut imports = Vec::new();
        let mut trailing = Vec::new();
        for resource in self.resources {
            match resource {
                HeadResource::InlineScript(_) => trailing.push(resource),
                HeadResource::ScriptImport(_) => imports.push(resource),
                HeadResource::StyleImport(_) | HeadResource::InlineStyle(_) => {
                    styles.push(resource);
                }
            }
        }
        styles.extend(imports);
        HeadSplit {
            leading: styles,
            trailing,
        }
    }
}

impl Extend<HeadResource> for HeadResourceSet {
    fn extend<T: IntoIterator<Item = HeadResource>>(&mut self, iter: T) {
        for resource in iter {
            self.insert(resource);
        }
    }
}

impl FromIterator<HeadResource> for HeadResourceSet {
    fn from_iter<T: IntoIterator<Item = HeadResource>>(iter: T) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<'a> IntoIterator for &'a HeadResourceSet {
    type Item = &'a HeadResource;
    type IntoIter = std::slice::Iter<'a, HeadResource>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::{InlineScript, InlineStyle};

    #[test]
    fn duplicate_imports_are_rejected() {
        let mut set = HeadResourceSet::new();
        assert!(set.insert(HeadResource::script_import("/a.js")));
        assert!(!set.insert(HeadResource::script_import("/a.js")));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn same_url_for_script_and_style_is_not_a_duplicate() {
        let set: HeadResourceSet = [
            HeadResource::script_import("/shared"),
            HeadResource::style_import("/shared"),
        ]
        .into_iter()
        .collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn anonymous_inline_blocks_are_always_kept() {
        let resources: [HeadResource; 4] = [
            InlineScript::new("a();").into(),
            InlineScript::new("a();").into(),
            InlineScript::new("b();").with_id("b").into(),
            InlineScript::new("other();").with_id("b").into(),
        ];
        let set: HeadResourceSet = resources.into_iter().collect();
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn split_orders_styles_before_script_imports() {
        let set: HeadResourceSet = [
            HeadResource::script_import("/a.js"),
            InlineScript::new("run();").into(),
            HeadResource::style_import("/a.css"),
            InlineStyle::new("p {}").into(),
            HeadResource::script_import("/b.js"),
        ]
        .into_iter()
        .collect();

        let split = set.split_for_batch();

        assert_eq!(
            split.leading,
            vec![
                HeadResource::style_import("/a.css"),
                InlineStyle::new("p {}").into(),
                HeadResource::script_import("/a.js"),
                HeadResource::script_import("/b.js"),
            ]
        );
        assert_eq!(split.trailing, vec![InlineScript::new("run();").into()]);
    }
}
