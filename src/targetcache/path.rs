//! Endpoint path matching.
//!
//! Resolving an HTTP path to an endpoint is delegated to a [`PathMatcher`] so the routing
//! facade can be paired with a dedicated routing structure. [`SegmentMatcher`] is the
//! built-in linear matcher.

use std::collections::BTreeMap;

/// Path parameters captured by a match, by name.
pub type Params = BTreeMap<String, String>;

/// Ranks competing matches: more static segments first, then patterns without a wildcard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Specificity {
    pub static_segments: usize,
    pub exact: bool,
}

pub trait PathMatcher: Send + Sync {
    /// Match `path` against an endpoint `pattern`, returning the captured parameters.
    fn match_path(&self, pattern: &str, path: &str) -> Option<Params>;

    fn specificity(&self, pattern: &str) -> Specificity {
        let mut static_segments = 0;
        let mut exact = true;
        for segment in segments(pattern) {
            if segment.starts_with('*') {
                exact = false;
            } else if !segment.starts_with(':') {
                static_segments += 1;
            }
        }
        Specificity {
            static_segments,
            exact,
        }
    }
}

/// Matches `/`-separated segments.
///
/// - `name` matches itself,
/// - `:name` captures exactly one segment,
/// - `*name` captures the remainder of the path and must be the final segment.
///
/// Empty segments are ignored, so trailing and doubled slashes do not matter.
#[derive(Debug, Clone, Copy, Default)]
pub struct SegmentMatcher;

impl PathMatcher for SegmentMatcher {
    fn match_path(&self, pattern: &str, path: &str) -> Option<Params> {
        let mut params = Params::new();
        let mut actual = segments(path);
        let mut expected = segments(pattern).peekable();

        while let Some(segment) = expected.next() {
            if let Some(name) = segment.strip_prefix('*') {
                if expected.peek().is_some() {
                    return None;
                }
                let rest: Vec<&str> = actual.by_ref().collect();
                params.insert(name.to_string(), rest.join("/"));
                return Some(params);
            }

            let value = actual.next()?;
            match segment.strip_prefix(':') {
                Some(name) => {
                    params.insert(name.to_string(), value.to_string());
                }
                None if segment == value => {}
                None => return None,
            }
        }

        actual.next().is_none().then_some(params)
    }
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|segment| !segment.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matches(pattern: &str, path: &str) -> Option<Vec<(String, String)>> {
        SegmentMatcher
            .match_path(pattern, path)
            .map(|params| params.into_iter().collect())
    }

    #[test]
    fn static_paths_match_exactly() {
        assert_eq!(matches("/users", "/users"), Some(vec![]));
        assert_eq!(matches("/users/", "users"), Some(vec![]));
        assert_eq!(matches("/users", "/users/1"), None);
        assert_eq!(matches("/users/1", "/users"), None);
        assert_eq!(matches("/", "/"), Some(vec![]));
    }

    #[test]
    fn parameters_capture_one_segment() {
        assert_eq!(
            matches("/users/:id/posts/:post", "/users/7/posts/42"),
            Some(vec![
                ("id".to_string(), "7".to_string()),
                ("post".to_string(), "42".to_string()),
            ])
        );
        assert_eq!(matches("/users/:id", "/users/7/extra"), None);
    }

    #[test]
    fn wildcard_captures_the_rest() {
        assert_eq!(
            matches("/static/*file", "/static/css/site.css"),
            Some(vec![("file".to_string(), "css/site.css".to_string())])
        );
        assert_eq!(matches("/static/*file/more", "/static/a/more"), None);
    }

    #[test]
    fn specificity_prefers_static_then_exact() {
        let matcher = SegmentMatcher;
        let static_path = matcher.specificity("/users/me");
        let param_path = matcher.specificity("/users/:id");
        let wildcard = matcher.specificity("/users/*rest");

        assert!(static_path > param_path);
        assert!(param_path > wildcard);
    }
}
