//! Path and method matching.
//!
//! Patterns and bases are compiled once, at registration time, into
//! [`matchit`] matchers. Each optional segment or wildcard expands into
//! separate single-route matchers, so expansions never conflict with each
//! other.
//!
//! # Pattern Grammar
//!
//! | Segment   | Matches                                              |
//! |-----------|------------------------------------------------------|
//! | `users`   | the literal segment, byte for byte                   |
//! | `:id`     | one non-empty segment, captured as `id`              |
//! | `:id?`    | one segment or nothing, captured as `id` if present  |
//! | `*`       | the rest of the path (maybe empty), as `wild`        |
//! | `*rest`   | the rest of the path (maybe empty), as `rest`        |
//!
//! Nothing is normalized: case and trailing slashes are significant.
//!
//! When several expansions fit a path, captures on earlier segments win:
//! `/a/:x?/*` binds `/a/foo/bar` as `x = foo, wild = bar`. A wildcard needs
//! its leading `/`, so `/a/foo` binds `wild = foo` and leaves `x` unset.

use matchit::Router as InnerRouter;
use std::{collections::HashSet, fmt};
use switchyard_core::{BuildError, Method, Params};

/// Catch-all name used internally by mount points.
const REMAINDER: &str = "__remainder";

/// The default capture name of an anonymous wildcard.
const WILDCARD: &str = "wild";

/// Whether a layer restricted to `filter` (`None` meaning any method) applies
/// to a request sent with `method`.
pub fn method_matches(filter: Option<Method>, method: &str) -> bool {
    filter.is_none_or(|m| m.accepts(method))
}

/// The data a successful match produces.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathMatch {
    /// Named parameters captured by the match.
    pub params: Params,
    /// The unmatched suffix handed to a mounted router. Always rooted.
    pub remainder: Option<String>,
}

/// One expanded, single-route matcher.
struct Variant {
    route: String,
    matcher: InnerRouter<()>,
    defaults: Params,
}

impl Variant {
    fn compile(route: String, defaults: Params) -> Result<Self, String> {
        let mut matcher = InnerRouter::new();
        matcher.insert(route.clone(), ()).map_err(|e| e.to_string())?;
        Ok(Self {
            route,
            matcher,
            defaults,
        })
    }
}

enum Segment<'p> {
    Literal(&'p str),
    Param { name: &'p str, optional: bool },
    Wildcard(&'p str),
}

impl<'p> Segment<'p> {
    fn parse(raw: &'p str) -> Self {
        if let Some(name) = raw.strip_prefix('*') {
            Segment::Wildcard(if name.is_empty() { WILDCARD } else { name })
        } else if let Some(name) = raw.strip_prefix(':') {
            match name.strip_suffix('?') {
                Some(name) => Segment::Param {
                    name,
                    optional: true,
                },
                None => Segment::Param {
                    name,
                    optional: false,
                },
            }
        } else {
            Segment::Literal(raw)
        }
    }
}

fn check_name<'p>(name: &'p str, seen: &mut HashSet<&'p str>) -> Result<(), String> {
    if name.is_empty() {
        return Err("parameter name must not be empty".into());
    }
    if name.starts_with("__") {
        return Err(format!("parameter name `{name}` is reserved"));
    }
    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(format!(
            "parameter name `{name}` may only contain ASCII letters, digits and `_`"
        ));
    }
    if !seen.insert(name) {
        return Err(format!("parameter `{name}` appears more than once"));
    }
    Ok(())
}

/// Append a literal segment, escaping matchit's parameter braces.
fn push_literal(route: &mut String, literal: &str) {
    route.push('/');
    for c in literal.chars() {
        match c {
            '{' => route.push_str("{{"),
            '}' => route.push_str("}}"),
            c => route.push(c),
        }
    }
}

fn rooted(route: String) -> String {
    if route.is_empty() { "/".to_owned() } else { route }
}

/// A compiled method-route pattern such as `/users/:userId/posts/:postId`.
///
/// Matches only when the whole path conforms to the pattern.
pub struct PathPattern {
    source: String,
    variants: Vec<Variant>,
    wildcard: Option<String>,
}

impl PathPattern {
    /// Compile a pattern.
    pub fn parse(pattern: &str) -> Result<Self, BuildError> {
        Self::expand(pattern).map_err(|reason| BuildError::pattern(pattern, reason))
    }

    fn expand(pattern: &str) -> Result<Self, String> {
        let body = pattern
            .strip_prefix('/')
            .ok_or_else(|| "pattern must start with `/`".to_owned())?;
        let segments: Vec<&str> = body.split('/').collect();
        let last = segments.len() - 1;

        let mut seen = HashSet::new();
        let mut wildcard = None;
        let mut routes = vec![(String::new(), Params::new())];

        for (index, raw) in segments.iter().enumerate() {
            match Segment::parse(raw) {
                Segment::Literal(literal) => {
                    for (route, _) in &mut routes {
                        push_literal(route, literal);
                    }
                }
                Segment::Param { name, optional } => {
                    check_name(name, &mut seen)?;
                    routes = routes
                        .into_iter()
                        .flat_map(|(route, defaults)| {
                            let captured = (format!("{route}/{{{name}}}"), defaults.clone());
                            // The capturing expansion is tried first.
                            let skipped = optional.then_some((route, defaults));
                            std::iter::once(captured).chain(skipped)
                        })
                        .collect();
                }
                Segment::Wildcard(name) => {
                    if index != last {
                        return Err("a wildcard must be the last segment".into());
                    }
                    check_name(name, &mut seen)?;
                    wildcard = Some(name.to_owned());
                    routes = routes
                        .into_iter()
                        .flat_map(|(route, defaults)| {
                            let mut empty = defaults.clone();
                            empty.insert(name, "");
                            [
                                (format!("{route}/{{*{name}}}"), defaults),
                                (format!("{route}/"), empty),
                            ]
                        })
                        .collect();
                }
            }
        }

        let variants = routes
            .into_iter()
            .map(|(route, defaults)| Variant::compile(rooted(route), defaults))
            .collect::<Result<_, _>>()?;

        Ok(Self {
            source: pattern.to_owned(),
            variants,
            wildcard,
        })
    }

    /// The pattern as registered.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// The capture name of the trailing wildcard, if the pattern has one.
    pub fn wildcard(&self) -> Option<&str> {
        self.wildcard.as_deref()
    }

    /// Match a whole path, returning the captured parameters.
    pub fn matches(&self, path: &str) -> Option<Params> {
        self.variants.iter().find_map(|variant| {
            let matched = variant.matcher.at(path).ok()?;
            let mut params = variant.defaults.clone();
            for (name, value) in matched.params.iter() {
                params.insert(name, value);
            }
            Some(params)
        })
    }
}

impl fmt::Debug for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PathPattern")
            .field("source", &self.source)
            .field(
                "routes",
                &self.variants.iter().map(|v| &v.route).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// A compiled mount base such as `/api` or `/tenants/:tenant`.
///
/// Matches when the path starts with the base at a segment boundary, and
/// yields the rest of the path as a rooted remainder.
pub struct MountPoint {
    source: String,
    variants: Vec<Variant>,
}

impl MountPoint {
    /// Compile a base. A trailing `/` is ignored; `/` mounts at the root.
    pub fn parse(base: &str) -> Result<Self, BuildError> {
        Self::expand(base).map_err(|reason| BuildError::base(base, reason))
    }

    fn expand(base: &str) -> Result<Self, String> {
        if !base.starts_with('/') {
            return Err("base must start with `/`".into());
        }
        let trimmed = base.trim_end_matches('/');
        let mut mount = Self {
            source: base.to_owned(),
            variants: Vec::new(),
        };
        if trimmed.is_empty() {
            return Ok(mount);
        }

        let mut seen = HashSet::new();
        let mut prefix = String::new();
        for raw in trimmed[1..].split('/') {
            match Segment::parse(raw) {
                Segment::Literal(literal) => push_literal(&mut prefix, literal),
                Segment::Param {
                    name,
                    optional: false,
                } => {
                    check_name(name, &mut seen)?;
                    prefix.push_str(&format!("/{{{name}}}"));
                }
                Segment::Param { optional: true, .. } | Segment::Wildcard(_) => {
                    return Err("optional and wildcard segments are not allowed in a base".into());
                }
            }
        }

        for route in [
            prefix.clone(),
            format!("{prefix}/"),
            format!("{prefix}/{{*{REMAINDER}}}"),
        ] {
            mount.variants.push(Variant::compile(route, Params::new())?);
        }
        Ok(mount)
    }

    /// The base as registered.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Whether this base mounts at the root and therefore matches every path.
    pub fn is_root(&self) -> bool {
        self.variants.is_empty()
    }

    /// Match the start of `path`.
    pub fn matches(&self, path: &str) -> Option<PathMatch> {
        if self.is_root() {
            let remainder = if path.is_empty() { "/" } else { path };
            return Some(PathMatch {
                params: Params::new(),
                remainder: Some(remainder.to_owned()),
            });
        }

        self.variants.iter().find_map(|variant| {
            let matched = variant.matcher.at(path).ok()?;
            let mut params = Params::new();
            let mut remainder = String::from("/");
            for (name, value) in matched.params.iter() {
                if name == REMAINDER {
                    remainder.push_str(value);
                } else {
                    params.insert(name, value);
                }
            }
            Some(PathMatch {
                params,
                remainder: Some(remainder),
            })
        })
    }
}

impl fmt::Debug for MountPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MountPoint")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for MountPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Where on the path a layer applies.
#[derive(Debug)]
pub(crate) enum PathScope {
    /// Every path. A nested router sees the path unchanged.
    Any,
    /// Paths under a base (`using_at`, `mount`).
    Base(MountPoint),
    /// Paths conforming to a pattern (method registrations, `all`).
    Pattern(PathPattern),
}

impl PathScope {
    pub(crate) fn matches(&self, path: &str) -> Option<PathMatch> {
        match self {
            PathScope::Any => Some(PathMatch::default()),
            PathScope::Base(mount) => mount.matches(path),
            PathScope::Pattern(pattern) => pattern.matches(path).map(|params| {
                let rest = pattern
                    .wildcard()
                    .and_then(|name| params.get(name))
                    .unwrap_or_default();
                PathMatch {
                    remainder: Some(format!("/{rest}")),
                    params,
                }
            }),
        }
    }
}

impl fmt::Display for PathScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathScope::Any => f.write_str("*"),
            PathScope::Base(mount) => write!(f, "{mount}"),
            PathScope::Pattern(pattern) => write!(f, "{pattern}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> Params {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_named_segments() {
        let pattern = PathPattern::parse("/users/:userId/posts/:postId").unwrap();

        assert_eq!(
            pattern.matches("/users/12/posts/23"),
            Some(params(&[("userId", "12"), ("postId", "23")]))
        );
        assert_eq!(pattern.matches("/users/12/posts"), None);
        assert_eq!(pattern.matches("/users/12/posts/23/comments"), None);
        assert_eq!(pattern.matches("/users//posts/23"), None);
    }

    #[test]
    fn test_literals_are_exact() {
        let pattern = PathPattern::parse("/about").unwrap();

        assert_eq!(pattern.matches("/about"), Some(Params::new()));
        assert_eq!(pattern.matches("/About"), None);
        assert_eq!(pattern.matches("/about/"), None);
        assert_eq!(pattern.matches("/aboutus"), None);
    }

    #[test]
    fn test_root_pattern() {
        let pattern = PathPattern::parse("/").unwrap();
        assert!(pattern.matches("/").is_some());
        assert!(pattern.matches("/x").is_none());
    }

    #[test]
    fn test_optional_segment() {
        let pattern = PathPattern::parse("/books/:genre?").unwrap();

        assert_eq!(pattern.matches("/books"), Some(Params::new()));
        assert_eq!(
            pattern.matches("/books/horror"),
            Some(params(&[("genre", "horror")]))
        );
        assert_eq!(pattern.matches("/books/horror/new"), None);
    }

    #[test]
    fn test_wildcard_captures_rest() {
        let pattern = PathPattern::parse("/files/*").unwrap();

        assert_eq!(
            pattern.matches("/files/a/b.txt"),
            Some(params(&[("wild", "a/b.txt")]))
        );
        assert_eq!(pattern.matches("/files/"), Some(params(&[("wild", "")])));
        assert_eq!(pattern.matches("/files"), None);

        let named = PathPattern::parse("/static/*path").unwrap();
        assert_eq!(
            named.matches("/static/css/site.css"),
            Some(params(&[("path", "css/site.css")]))
        );
    }

    #[test]
    fn test_earlier_captures_take_precedence() {
        let pattern = PathPattern::parse("/a/:x?/*").unwrap();

        assert_eq!(
            pattern.matches("/a/foo/bar"),
            Some(params(&[("x", "foo"), ("wild", "bar")]))
        );
        assert_eq!(
            pattern.matches("/a/foo/"),
            Some(params(&[("x", "foo"), ("wild", "")]))
        );
        assert_eq!(pattern.matches("/a/foo"), Some(params(&[("wild", "foo")])));

        let two = PathPattern::parse("/a/:x?/:y?").unwrap();
        assert_eq!(two.matches("/a/foo"), Some(params(&[("x", "foo")])));
        assert_eq!(
            two.matches("/a/foo/bar"),
            Some(params(&[("x", "foo"), ("y", "bar")]))
        );
        assert_eq!(two.matches("/a"), Some(Params::new()));
    }

    #[test]
    fn test_pattern_scope_remainder_is_wildcard() {
        let scope = PathScope::Pattern(PathPattern::parse("/reports/*").unwrap());
        assert_eq!(
            scope.matches("/reports/2024/q1").unwrap().remainder.as_deref(),
            Some("/2024/q1")
        );
        assert_eq!(
            scope.matches("/reports/").unwrap().remainder.as_deref(),
            Some("/")
        );

        let exact = PathScope::Pattern(PathPattern::parse("/status").unwrap());
        assert_eq!(exact.matches("/status").unwrap().remainder.as_deref(), Some("/"));
    }

    #[test]
    fn test_literal_braces_are_escaped() {
        let pattern = PathPattern::parse("/{weird}").unwrap();
        assert!(pattern.matches("/{weird}").is_some());
        assert!(pattern.matches("/other").is_none());
    }

    #[test]
    fn test_invalid_patterns() {
        for bad in ["users", "/users/:", "/a/*/b", "/a/:id/b/:id", "/a/:__x", "/a/:na-me"] {
            assert!(
                matches!(PathPattern::parse(bad), Err(BuildError::InvalidPattern { .. })),
                "`{bad}` should be rejected"
            );
        }
    }

    #[test]
    fn test_mount_point_segment_boundary() {
        let mount = MountPoint::parse("/api").unwrap();

        let matched = mount.matches("/api/users").unwrap();
        assert_eq!(matched.remainder.as_deref(), Some("/users"));
        assert_eq!(mount.matches("/api").unwrap().remainder.as_deref(), Some("/"));
        assert_eq!(mount.matches("/api/").unwrap().remainder.as_deref(), Some("/"));
        assert!(mount.matches("/apix").is_none());
        assert!(mount.matches("/v1/api").is_none());
    }

    #[test]
    fn test_mount_point_trailing_slash_ignored() {
        let mount = MountPoint::parse("/api/").unwrap();
        assert_eq!(
            mount.matches("/api/a/b").unwrap().remainder.as_deref(),
            Some("/a/b")
        );
    }

    #[test]
    fn test_root_mount_point() {
        let mount = MountPoint::parse("/").unwrap();
        assert!(mount.is_root());
        assert_eq!(
            mount.matches("/anything/at/all").unwrap().remainder.as_deref(),
            Some("/anything/at/all")
        );
    }

    #[test]
    fn test_mount_point_params() {
        let mount = MountPoint::parse("/tenants/:tenant").unwrap();
        let matched = mount.matches("/tenants/acme/users/7").unwrap();

        assert_eq!(matched.params, params(&[("tenant", "acme")]));
        assert_eq!(matched.remainder.as_deref(), Some("/users/7"));
    }

    #[test]
    fn test_invalid_bases() {
        for bad in ["api", "/files/*", "/books/:genre?"] {
            assert!(
                matches!(MountPoint::parse(bad), Err(BuildError::InvalidBase { .. })),
                "`{bad}` should be rejected"
            );
        }
    }

    #[test]
    fn test_method_matches() {
        assert!(method_matches(None, "CONNECT"));
        assert!(method_matches(Some(Method::Get), "GET"));
        assert!(method_matches(Some(Method::Get), "HEAD"));
        assert!(!method_matches(Some(Method::Post), "GET"));
        assert!(!method_matches(Some(Method::Post), "post"));
    }
}
