//! Anchor-then-fallback text matcher.
//!
//! This is the only place content is searched. It never guesses: a stale anchor is
//! rescued only when the target text is unique in the file.

/// Outcome of [`locate_and_replace`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Replacement {
    /// Anchored target found; first occurrence replaced.
    Anchored(String),
    /// Anchored target absent; the single occurrence of the target replaced.
    Direct(String),
    /// Neither the anchored target nor the target occurs.
    NotFound,
    /// Anchored target absent and the target occurs more than once.
    Ambiguous {
        /// Occurrences seen (counting stops at 2).
        occurrences: usize,
    },
    /// Anchored target absent and the target is empty, so there is nothing to fall back on.
    EmptyTarget,
}

impl Replacement {
    /// New content, if the replacement happened.
    #[must_use]
    pub fn into_content(self) -> Option<String> {
        match self {
            Self::Anchored(content) | Self::Direct(content) => Some(content),
            Self::NotFound | Self::Ambiguous { .. } | Self::EmptyTarget => None,
        }
    }
}

/// Replace `target` in `content`, using `before` / `after` to pick the occurrence.
///
/// 1. If `before + target + after` occurs, its first occurrence becomes
///    `before + replacement + after`.
/// 2. Otherwise, if a non-empty `target` occurs exactly once, that occurrence becomes
///    `replacement`.
/// 3. Otherwise nothing is replaced.
///
/// An entirely empty anchored target never matches.
#[must_use]
pub fn locate_and_replace(
    content: &str,
    before: &str,
    target: &str,
    after: &str,
    replacement: &str,
) -> Replacement {
    let anchored_target = format!("{before}{target}{after}");
    if !anchored_target.is_empty() && content.contains(&anchored_target) {
        let anchored_replacement = format!("{before}{replacement}{after}");
        return Replacement::Anchored(content.replacen(
            &anchored_target,
            &anchored_replacement,
            1,
        ));
    }

    if target.is_empty() {
        return Replacement::EmptyTarget;
    }

    match occurrences_up_to_two(content, target) {
        0 => Replacement::NotFound,
        1 => Replacement::Direct(content.replacen(target, replacement, 1)),
        occurrences => Replacement::Ambiguous { occurrences },
    }
}

/// Count occurrences of a non-empty `needle`, stopping at 2.
///
/// Overlapping hits count: `"aa"` occurs twice in `"aaa"`.
fn occurrences_up_to_two(haystack: &str, needle: &str) -> usize {
    let Some(first) = haystack.find(needle) else {
        return 0;
    };
    let step = haystack[first..].chars().next().map_or(1, char::len_utf8);
    if haystack[first + step..].contains(needle) {
        2
    } else {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_occurrences_overlap() {
        assert_eq!(occurrences_up_to_two("aaa", "aa"), 2);
        assert_eq!(occurrences_up_to_two("aXa", "a"), 2);
        assert_eq!(occurrences_up_to_two("éa", "a"), 1);
        assert_eq!(occurrences_up_to_two("b", "a"), 0);
    }

    #[test]
    fn test_into_content() {
        assert_eq!(
            Replacement::Direct("x".to_string()).into_content(),
            Some("x".to_string())
        );
        assert_eq!(Replacement::NotFound.into_content(), None);
    }
}
