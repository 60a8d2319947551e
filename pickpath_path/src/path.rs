// Copyright 2025 the Pickpath Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Path and segment types.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::num::NonZeroUsize;

use crate::selector::write_ident;

/// How a segment tells its node apart from other children with the same tag.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Discriminator {
    /// Tag alone.
    None,
    /// The element's `id`.
    Id(String),
    /// The element's class list, in order.
    Classes(Vec<String>),
}

/// One step of a [`Path`]: a tag name plus whatever is needed to single out
/// one child among its siblings.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PathSegment {
    /// Lowercased tag name.
    pub tag: String,
    /// Id or class discriminator.
    pub discriminator: Discriminator,
    /// 1-based position among same-tag siblings; present only when the
    /// tag and discriminator alone would be ambiguous.
    pub nth_of_type: Option<NonZeroUsize>,
}

impl PathSegment {
    /// A tag-only segment.
    pub fn tag(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            discriminator: Discriminator::None,
            nth_of_type: None,
        }
    }

    /// Builder-style id discriminator.
    #[must_use]
    pub fn with_id(mut self, id: &str) -> Self {
        self.discriminator = Discriminator::Id(id.into());
        self
    }

    /// Builder-style class discriminator.
    #[must_use]
    pub fn with_classes<'a>(mut self, classes: impl IntoIterator<Item = &'a str>) -> Self {
        self.discriminator = Discriminator::Classes(classes.into_iter().map(String::from).collect());
        self
    }

    /// Builder-style sibling index. Zero clears the index.
    #[must_use]
    pub fn with_nth_of_type(mut self, n: usize) -> Self {
        self.nth_of_type = NonZeroUsize::new(n);
        self
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_ident(f, &self.tag)?;
        match &self.discriminator {
            Discriminator::None => {}
            Discriminator::Id(id) => {
                f.write_str("#")?;
                write_ident(f, id)?;
            }
            Discriminator::Classes(classes) => {
                for class in classes {
                    f.write_str(".")?;
                    write_ident(f, class)?;
                }
            }
        }
        if let Some(n) = self.nth_of_type {
            write!(f, ":nth-of-type({n})")?;
        }
        Ok(())
    }
}

/// An ordered, outermost-first description of how to reach one element from a root.
///
/// A `Path` is a request to look a node up again, never a handle to the node
/// itself. Its [`Display`](fmt::Display) form is selector text such as
/// `div > button#cta`, which parses back with [`str::parse`].
///
/// ```rust
/// use pickpath_path::{Path, PathSegment};
///
/// let path = Path::new(vec![
///     PathSegment::tag("div").with_nth_of_type(3),
///     PathSegment::tag("button").with_id("cta"),
/// ]);
/// let text = path.to_string();
/// assert_eq!(text, "div:nth-of-type(3) > button#cta");
/// assert_eq!(text.parse::<Path>().unwrap(), path);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Path {
    segments: Vec<PathSegment>,
}

impl Path {
    /// Build a path from outermost-first segments.
    pub fn new(segments: Vec<PathSegment>) -> Self {
        Self { segments }
    }

    /// The segments, outermost first.
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns true if the path has no segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// The innermost segment (the one describing the target node).
    pub fn last(&self) -> Option<&PathSegment> {
        self.segments.last()
    }

    /// Returns true if any segment carries a sibling index.
    pub fn has_sibling_indices(&self) -> bool {
        self.segments.iter().any(|s| s.nth_of_type.is_some())
    }

    /// A copy of this path with every sibling index removed.
    #[must_use]
    pub fn without_sibling_indices(&self) -> Self {
        Self {
            segments: self
                .segments
                .iter()
                .map(|s| PathSegment {
                    nth_of_type: None,
                    ..s.clone()
                })
                .collect(),
        }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(" > ")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use alloc::vec;

    #[test]
    fn display_joins_with_child_combinator() {
        let path = Path::new(vec![
            PathSegment::tag("DIV"),
            PathSegment::tag("ul").with_classes(["menu", "dark"]),
            PathSegment::tag("li").with_nth_of_type(2),
        ]);
        assert_eq!(path.to_string(), "div > ul.menu.dark > li:nth-of-type(2)");
    }

    #[test]
    fn stripping_indices_keeps_discriminators() {
        let path = Path::new(vec![
            PathSegment::tag("div").with_classes(["card"]).with_nth_of_type(2),
            PathSegment::tag("p").with_nth_of_type(1),
        ]);
        assert!(path.has_sibling_indices());
        let stripped = path.without_sibling_indices();
        assert!(!stripped.has_sibling_indices());
        assert_eq!(stripped.to_string(), "div.card > p");
    }

    #[test]
    fn zero_index_means_none() {
        assert_eq!(PathSegment::tag("p").with_nth_of_type(0).nth_of_type, None);
    }
}
