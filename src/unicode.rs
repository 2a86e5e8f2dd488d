//! Unicode property classes for \p{...} escapes.
//!
//! The conventional engine's \p namespace covers general categories
//! (one- and two-letter forms like \pL or \p{Lu}) and script names like
//! \p{Greek}; both are resolved through icu_properties.

use icu_properties::{maps, GeneralCategoryGroup, Script};

#[derive(Debug, Clone)]
pub(crate) struct PropertyClass {
    name: Box<str>,
    kind: PropertyKind,
}

#[derive(Debug, Copy, Clone)]
enum PropertyKind {
    GeneralCategory(GeneralCategoryGroup),
    Script(Script),
}

impl PropertyClass {
    /// Resolve a property name. General categories take priority over
    /// script names, matching the conventional engine's lookup order.
    pub(crate) fn from_name(name: &str) -> Option<Self> {
        let kind = if let Some(gc) = GeneralCategoryGroup::name_to_enum_mapper().get_strict(name) {
            PropertyKind::GeneralCategory(gc)
        } else {
            PropertyKind::Script(Script::name_to_enum_mapper().get_strict(name)?)
        };
        Some(PropertyClass {
            name: name.into(),
            kind,
        })
    }

    /// The name as written in the pattern.
    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn contains(&self, c: char) -> bool {
        match self.kind {
            PropertyKind::GeneralCategory(group) => group.contains(maps::general_category().get(c)),
            PropertyKind::Script(script) => maps::script().get(c) == script,
        }
    }
}
