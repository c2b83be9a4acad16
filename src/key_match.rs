//! Key matching policies, used by searches to decide whether a node's id is the one being looked for.
//!
//! The policy is a type parameter of [`Forest`], so a tree variant with a different notion of key equality is declared by naming a different policy rather than by writing a different tree. Only whole-tree searches ([`search_down`] and [`find`], as well as the collision check performed when attaching children) go through the policy: direct child lookup with [`get_child`] indexes the child map and is therefore always exact.
//!
//! # Example
//! ```rust
//! use birch::key_match::{KeyMatch, ExactMatch, CaseInsensitive};
//!
//! assert!(ExactMatch::keys_match(&"Foo", &"Foo"));
//! assert!(!ExactMatch::keys_match(&"Foo", &"foo"));
//! assert!(CaseInsensitive::keys_match(&"Foo", &"fOO"));
//! ```
//!
//! [`Forest`]: ../forest/struct.Forest.html " "
//! [`search_down`]: ../forest/struct.NodeRef.html#method.search_down " "
//! [`find`]: ../forest/struct.NodeRef.html#method.find " "
//! [`get_child`]: ../forest/struct.NodeRef.html#method.get_child " "

/// A policy deciding whether a stored node id matches the id being searched for.
///
/// Implementations must be reflexive, i.e. `keys_match(x, x)` is `true` for every `x`, otherwise a node could not be found by its own id.
pub trait KeyMatch<I: ?Sized> {
    /// Returns `true` if the node stored under `stored` should be reported by a search for `sought`.
    fn keys_match(stored: &I, sought: &I) -> bool;
}

/// The default policy: ids match only if they are equal according to `PartialEq`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ExactMatch;
impl<I> KeyMatch<I> for ExactMatch
where
    I: PartialEq + ?Sized,
{
    #[inline(always)]
    fn keys_match(stored: &I, sought: &I) -> bool {
        stored == sought
    }
}

/// Compares string ids ignoring letter case.
///
/// Every character of both sides is mapped to uppercase and the result back to lowercase before comparing, without allocating. This folds the differences an invariant-culture comparison ignores which a plain lowercase mapping does not: the final and non-final forms of sigma compare equal, and so do `ß` and `ss`. The comparison does not depend on the current locale.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct CaseInsensitive;
impl<I> KeyMatch<I> for CaseInsensitive
where
    I: AsRef<str> + ?Sized,
{
    #[inline]
    fn keys_match(stored: &I, sought: &I) -> bool {
        let (stored, sought) = (stored.as_ref(), sought.as_ref());
        if stored.is_ascii() && sought.is_ascii() {
            return stored.eq_ignore_ascii_case(sought);
        }
        fn fold(c: char) -> impl Iterator<Item = char> {
            c.to_uppercase().flat_map(char::to_lowercase)
        }
        stored.chars().flat_map(fold).eq(sought.chars().flat_map(fold))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::String;

    #[test]
    fn exact_is_case_sensitive() {
        assert!(ExactMatch::keys_match(&1_u32, &1));
        assert!(!ExactMatch::keys_match(&1_u32, &2));
        assert!(!ExactMatch::keys_match("Foo", "foo"));
    }

    #[test]
    fn case_insensitive_ascii_and_unicode() {
        assert!(CaseInsensitive::keys_match("Foo", "foo"));
        assert!(CaseInsensitive::keys_match(&String::from("BAR"), &String::from("bar")));
        assert!(CaseInsensitive::keys_match("ÄRGER", "ärger"));
        assert!(!CaseInsensitive::keys_match("Foo", "Food"));
        assert!(!CaseInsensitive::keys_match("ärger", "arger"));
    }

    #[test]
    fn case_insensitive_folds_context_dependent_forms() {
        assert!(CaseInsensitive::keys_match("ΟΔΟΣ", "οδος"));
        assert!(CaseInsensitive::keys_match("οδοσ", "οδος"));
        assert!(CaseInsensitive::keys_match("straße", "STRASSE"));
        assert!(CaseInsensitive::keys_match("\u{212A}elvin", "kelvin"));
        assert!(!CaseInsensitive::keys_match("straße", "strase"));
    }
}
