//! Canonical keys for caller sets.
//!
//! GATK `CombineVariants` records which input callsets produced a variant in
//! the `set=` INFO key, as caller names joined by `-` in arbitrary order
//! (`varscan-gatk`), or as the literal `Intersection` when every input
//! agreed. [`CallerSetKey`] turns these labels into order-independent keys.
//!
//! `Intersection` is a separate variant rather than a string: it means
//! "called by every caller", which is not the same statement as "called by
//! exactly these names", and no list of names can ever compare equal to it.

use std::fmt;

/// Literal GATK label for a variant called by every input
pub const INTERSECTION_LABEL: &str = "Intersection";

/// Separator between caller names in a raw `set=` label
pub const CALLER_SEPARATOR: char = '-';

/// Separator between caller names when a key is rendered
pub const KEY_SEPARATOR: &str = "|";

/// Order-independent identity of a set of callers
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CallerSetKey {
    /// Called by all callers (the reserved `Intersection` label)
    FullIntersection,
    /// Called by exactly these callers, sorted and without duplicates
    Explicit(Vec<String>),
}

impl CallerSetKey {
    /// Canonicalize a raw `set=` label
    ///
    /// ```
    /// use vcf_callset::core::callerset::CallerSetKey;
    ///
    /// assert_eq!(
    ///     CallerSetKey::canonicalize("varscan-gatk"),
    ///     CallerSetKey::canonicalize("gatk-varscan"),
    /// );
    /// assert_eq!(
    ///     CallerSetKey::canonicalize("Intersection"),
    ///     CallerSetKey::FullIntersection,
    /// );
    /// ```
    ///
    /// A label made only of the reserved literal (`Intersection-Intersection`)
    /// is the full intersection as well.
    #[must_use]
    pub fn canonicalize(label: &str) -> Self {
        if label
            .split(CALLER_SEPARATOR)
            .all(|name| name == INTERSECTION_LABEL)
        {
            return Self::FullIntersection;
        }
        Self::from_names(label.split(CALLER_SEPARATOR))
    }

    /// Build an explicit key from caller names in any order
    #[must_use]
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut names: Vec<String> = names.into_iter().map(Into::into).collect();
        names.sort_unstable();
        names.dedup();
        Self::Explicit(names)
    }

    /// Caller names, or `None` for the full intersection
    pub fn names(&self) -> Option<&[String]> {
        match self {
            Self::FullIntersection => None,
            Self::Explicit(names) => Some(names.as_slice()),
        }
    }

    /// Number of callers, or `None` for the full intersection
    pub fn caller_count(&self) -> Option<usize> {
        self.names().map(<[String]>::len)
    }

    /// The single caller name if this key names exactly one caller
    pub fn single_caller(&self) -> Option<&str> {
        match self.names() {
            Some([name]) => Some(name.as_str()),
            _ => None,
        }
    }

    pub fn is_full_intersection(&self) -> bool {
        matches!(self, Self::FullIntersection)
    }

    /// Rendered form: names joined by `|`, or `Intersection`
    pub fn label(&self) -> String {
        match self {
            Self::FullIntersection => INTERSECTION_LABEL.to_string(),
            Self::Explicit(names) => names.join(KEY_SEPARATOR),
        }
    }
}

impl fmt::Display for CallerSetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
