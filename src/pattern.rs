//! Route template compilation.
//!
//! A template is a `/`-separated path whose segments are either literals or
//! named parameters marked with a leading `:`:
//!
//! ```text
//! Template: /user/:id/hello
//!
//!  /user/14/hello        match, id = "14"
//!  /user/14/hello/       no match (extra empty segment)
//!  /user//hello          no match (parameters are never empty)
//!  /user/14              no match
//! ```
//!
//! Templates without parameters skip tokenization entirely and match by plain
//! string equality.

use std::collections::HashMap;

use crate::error::Error;

/// Path parameters captured by a successful match, keyed by parameter name.
pub type Params = HashMap<String, String>;

const PARAM_MARKER: char = ':';

#[derive(Clone, Debug, Eq, PartialEq)]
enum Segment {
    Literal(String),
    Param,
}

#[derive(Clone, Debug)]
enum Matcher {
    Exact,
    Segments(Vec<Segment>),
}

/// A compiled route template.
///
/// Immutable once built. Compile once at registration, match per request.
#[derive(Clone, Debug)]
pub struct Pattern {
    template: String,
    names: Vec<String>,
    matcher: Matcher,
}

impl Pattern {
    /// Compiles `template` into a matcher and its ordered parameter names.
    ///
    /// Fails on an empty template, a template not rooted at `/`, a parameter
    /// segment without a name, or a parameter name used twice.
    pub fn compile(template: &str) -> Result<Self, Error> {
        let invalid = |reason| Error::InvalidPattern { template: template.to_owned(), reason };

        if template.is_empty() {
            return Err(invalid("template is empty"));
        }
        if !template.starts_with('/') {
            return Err(invalid("template must start with `/`"));
        }

        let mut names: Vec<String> = Vec::new();
        let mut segments = Vec::new();

        for part in template.split('/') {
            match part.strip_prefix(PARAM_MARKER) {
                Some("") => return Err(invalid("parameter name is empty")),
                Some(name) => {
                    if names.iter().any(|n| n == name) {
                        return Err(Error::DuplicateParam {
                            template: template.to_owned(),
                            name: name.to_owned(),
                        });
                    }
                    names.push(name.to_owned());
                    segments.push(Segment::Param);
                }
                None => segments.push(Segment::Literal(part.to_owned())),
            }
        }

        let matcher = if names.is_empty() { Matcher::Exact } else { Matcher::Segments(segments) };

        Ok(Self { template: template.to_owned(), names, matcher })
    }

    /// The template this pattern was compiled from.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Parameter names in left-to-right template order.
    pub fn param_names(&self) -> &[String] {
        &self.names
    }

    /// Tests `path` against the pattern.
    ///
    /// Returns the captured parameters on a match (empty for literal-only
    /// templates), `None` otherwise.
    pub fn matches(&self, path: &str) -> Option<Params> {
        let segments = match &self.matcher {
            Matcher::Exact => return (path == self.template).then(Params::new),
            Matcher::Segments(segments) => segments,
        };

        let mut params = Params::with_capacity(self.names.len());
        let mut names = self.names.iter();
        let mut parts = path.split('/');

        for segment in segments {
            let part = parts.next()?;
            match segment {
                Segment::Literal(literal) if part != literal => return None,
                Segment::Literal(_) => {}
                Segment::Param => {
                    if part.is_empty() {
                        return None;
                    }
                    let name = names.next()?;
                    params.insert(name.clone(), part.to_owned());
                }
            }
        }

        // Same segment count: anything left over means the path is longer.
        if parts.next().is_some() {
            return None;
        }

        Some(params)
    }
}
