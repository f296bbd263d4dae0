//! Route pattern validation.
//!
//! Accepted grammar, per `/`-separated segment:
//! - a literal (`users`)
//! - a capture spanning the whole segment (`{id}`)
//! - a catch-all capture, final segment only (`{*path}`)

use serve_core::RouteError;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment<'a> {
    Static(&'a str),
    Capture(&'a str),
    CatchAll(&'a str),
}

/// A validated pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Pattern<'a> {
    raw: &'a str,
    segments: Vec<Segment<'a>>,
}

impl<'a> Pattern<'a> {
    pub(crate) fn parse(raw: &'a str) -> Result<Self, RouteError> {
        if raw.is_empty() {
            return Err(RouteError::Empty);
        }
        let Some(rest) = raw.strip_prefix('/') else {
            return Err(RouteError::MissingLeadingSlash(raw.to_string()));
        };

        let malformed = |reason| RouteError::Malformed {
            pattern: raw.to_string(),
            reason,
        };

        let parts: Vec<&str> = rest.split('/').collect();
        let last = parts.len() - 1;
        let mut segments = Vec::with_capacity(parts.len());
        let mut names: Vec<&str> = Vec::new();

        for (index, part) in parts.into_iter().enumerate() {
            // A trailing slash leaves an empty final segment, which is fine
            if part.is_empty() && index != last {
                return Err(malformed("empty path segment"));
            }
            if part.starts_with(':') || part.starts_with('*') {
                return Err(malformed("use {name} or {*name} for captures"));
            }

            let segment = parse_segment(part).map_err(malformed)?;
            match segment {
                Segment::CatchAll(_) if index != last => {
                    return Err(malformed("catch-all capture must be the last segment"));
                }
                Segment::Capture(name) | Segment::CatchAll(name) => {
                    if names.contains(&name) {
                        return Err(malformed("duplicate capture name"));
                    }
                    names.push(name);
                }
                Segment::Static(_) => {}
            }
            segments.push(segment);
        }

        Ok(Self { raw, segments })
    }

    pub(crate) fn as_str(&self) -> &'a str {
        self.raw
    }

    /// Whether both patterns could not be registered on the same router.
    ///
    /// Literal segments take priority over captures, so `/users/new` and
    /// `/users/{id}` coexist. Captures at the same position must agree on
    /// kind and name.
    pub(crate) fn conflicts_with(&self, other: &Pattern<'_>) -> bool {
        if self.raw == other.raw {
            return false;
        }

        for (ours, theirs) in self.segments.iter().zip(&other.segments) {
            match (ours, theirs) {
                (Segment::Static(a), Segment::Static(b)) if a == b => continue,
                (Segment::Static(_), _) | (_, Segment::Static(_)) => return false,
                (Segment::Capture(a), Segment::Capture(b)) if a == b => continue,
                (Segment::CatchAll(a), Segment::CatchAll(b)) if a == b => continue,
                _ => return true,
            }
        }

        false
    }
}

fn parse_segment(part: &str) -> Result<Segment<'_>, &'static str> {
    let opens = part.matches('{').count();
    let closes = part.matches('}').count();
    if opens != closes {
        return Err("unbalanced braces");
    }
    if opens == 0 {
        return Ok(Segment::Static(part));
    }
    if opens > 1 || !part.starts_with('{') || !part.ends_with('}') {
        return Err("captures must span a whole segment");
    }

    let inner = &part[1..part.len() - 1];
    let (name, catch_all) = match inner.strip_prefix('*') {
        Some(name) => (name, true),
        None => (inner, false),
    };
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err("capture name must be a non-empty identifier");
    }

    Ok(if catch_all {
        Segment::CatchAll(name)
    } else {
        Segment::Capture(name)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reason(raw: &str) -> &'static str {
        match Pattern::parse(raw) {
            Err(RouteError::Malformed { reason, .. }) => reason,
            other => panic!("expected malformed pattern for {raw:?}, got {other:?}"),
        }
    }

    #[test]
    fn test_valid_patterns() {
        for raw in [
            "/",
            "/health",
            "/users/",
            "/users/{id}",
            "/users/{id}/posts/{post_id}",
            "/static/{*path}",
        ] {
            assert!(Pattern::parse(raw).is_ok(), "{raw} should parse");
        }
    }

    #[test]
    fn test_empty_and_relative_patterns() {
        assert_eq!(Pattern::parse(""), Err(RouteError::Empty));
        assert_eq!(
            Pattern::parse("users"),
            Err(RouteError::MissingLeadingSlash("users".to_string()))
        );
    }

    #[test]
    fn test_malformed_patterns() {
        assert_eq!(reason("/users/:id"), "use {name} or {*name} for captures");
        assert_eq!(reason("/files/*rest"), "use {name} or {*name} for captures");
        assert_eq!(reason("/users/{id"), "unbalanced braces");
        assert_eq!(reason("/users/id-{id}"), "captures must span a whole segment");
        assert_eq!(reason("/users/{}"), "capture name must be a non-empty identifier");
        assert_eq!(reason("/users/{my-id}"), "capture name must be a non-empty identifier");
        assert_eq!(reason("/{*path}/edit"), "catch-all capture must be the last segment");
        assert_eq!(reason("/a//b"), "empty path segment");
        assert_eq!(reason("/{id}/{id}"), "duplicate capture name");
    }

    #[test]
    fn test_conflicts() {
        let by_id = Pattern::parse("/users/{id}").unwrap();
        let by_name = Pattern::parse("/users/{name}").unwrap();
        let literal = Pattern::parse("/users/new").unwrap();
        let rest = Pattern::parse("/users/{*rest}").unwrap();
        let nested = Pattern::parse("/users/{user}/posts").unwrap();

        assert!(by_id.conflicts_with(&by_name));
        assert!(by_id.conflicts_with(&rest));
        assert!(by_id.conflicts_with(&nested));
        assert!(!by_id.conflicts_with(&literal));
        assert!(!by_id.conflicts_with(&by_id.clone()));
    }
}
