//! Ordered pattern-matcher chains
//!
//! Each extractor owns a slice of [`Matcher`] strategies tried in priority
//! order. An [`ExtractorChain`] runs them over a page, keys every candidate
//! through a caller-supplied closure, drops repeated keys, enforces a result
//! cap, and either keeps going through every matcher
//! ([`MatchMode::Accumulate`]) or stops after the first matcher that
//! contributed a result ([`MatchMode::FirstHit`]).

use regex::Regex;
use std::collections::HashSet;
use std::hash::Hash;

/// Capture groups of one match, in group order (group 1 is index 0)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate<'h> {
    groups: Vec<&'h str>,
}

impl<'h> Candidate<'h> {
    pub fn new(groups: Vec<&'h str>) -> Self {
        Self { groups }
    }

    /// Captured text at `index`, empty when the group did not participate
    pub fn group(&self, index: usize) -> &'h str {
        self.groups.get(index).copied().unwrap_or("")
    }
}

/// One extraction strategy over raw markup
pub trait Matcher: Send + Sync {
    fn name(&self) -> &str;

    /// All candidates in document order
    fn extract<'h>(&self, markup: &'h str) -> Vec<Candidate<'h>>;

    /// Leftmost candidate only
    fn first<'h>(&self, markup: &'h str) -> Option<Candidate<'h>> {
        self.extract(markup).into_iter().next()
    }
}

/// Regular-expression matcher; every capture group becomes a candidate field
pub struct RegexMatcher {
    name: &'static str,
    pattern: Regex,
}

impl RegexMatcher {
    pub fn new(name: &'static str, pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            name,
            pattern: Regex::new(pattern)?,
        })
    }

    fn candidate<'h>(caps: regex::Captures<'h>) -> Candidate<'h> {
        Candidate::new(
            caps.iter()
                .skip(1)
                .map(|m| m.map_or("", |m| m.as_str()))
                .collect(),
        )
    }
}

impl Matcher for RegexMatcher {
    fn name(&self) -> &str {
        self.name
    }

    fn extract<'h>(&self, markup: &'h str) -> Vec<Candidate<'h>> {
        self.pattern.captures_iter(markup).map(Self::candidate).collect()
    }

    fn first<'h>(&self, markup: &'h str) -> Option<Candidate<'h>> {
        self.pattern.captures(markup).map(Self::candidate)
    }
}

/// How a chain treats matchers after one has produced results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// Run every matcher, merging results
    Accumulate,
    /// Stop after the first matcher that contributed at least one result
    FirstHit,
}

pub struct ExtractorChain<'m> {
    source: &'static str,
    matchers: &'m [Box<dyn Matcher>],
    mode: MatchMode,
    limit: Option<usize>,
}

impl<'m> ExtractorChain<'m> {
    pub fn new(source: &'static str, matchers: &'m [Box<dyn Matcher>], mode: MatchMode) -> Self {
        Self {
            source,
            matchers,
            mode,
            limit: None,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Run the chain over `markup`.
    ///
    /// `keyed` turns a candidate into `(identity, item)` or rejects it with
    /// `None`. The first item seen for an identity wins.
    pub fn collect<'h, K, T, F>(&self, markup: &'h str, mut keyed: F) -> Vec<T>
    where
        K: Eq + Hash,
        F: FnMut(&Candidate<'h>) -> Option<(K, T)>,
    {
        let limit = self.limit.unwrap_or(usize::MAX);
        let mut seen: HashSet<K> = HashSet::new();
        let mut out = Vec::new();

        for matcher in self.matchers {
            if out.len() >= limit {
                break;
            }
            let mut added = 0;
            for candidate in matcher.extract(markup) {
                if out.len() >= limit {
                    break;
                }
                let Some((key, item)) = keyed(&candidate) else {
                    continue;
                };
                if !seen.insert(key) {
                    continue;
                }
                out.push(item);
                added += 1;
            }
            log::debug!("{}: matcher '{}' added {} result(s)", self.source, matcher.name(), added);

            if self.mode == MatchMode::FirstHit && added > 0 {
                break;
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matchers(patterns: &[(&'static str, &str)]) -> Vec<Box<dyn Matcher>> {
        patterns
            .iter()
            .map(|&(name, p)| Box::new(RegexMatcher::new(name, p).unwrap()) as Box<dyn Matcher>)
            .collect()
    }

    const MARKUP: &str = "<i>a1</i><i>b2</i><b>c3</b><i>a1</i><b>d4</b>";

    #[test]
    fn test_candidate_missing_group_is_empty() {
        let m = RegexMatcher::new("opt", r"<i>(\w)(\d)?").unwrap();
        let first = m.first("<i>x</i>").unwrap();
        assert_eq!(first.group(0), "x");
        assert_eq!(first.group(1), "");
        assert_eq!(first.group(7), "");
    }

    #[test]
    fn test_accumulate_merges_and_dedups() {
        let ms = matchers(&[("italic", r"<i>(\w+)</i>"), ("bold", r"<b>(\w+)</b>")]);
        let chain = ExtractorChain::new("test", &ms, MatchMode::Accumulate);
        let out = chain.collect(MARKUP, |c| Some((c.group(0).to_string(), c.group(0).to_string())));
        assert_eq!(out, vec!["a1", "b2", "c3", "d4"]);
    }

    #[test]
    fn test_first_hit_stops_after_productive_matcher() {
        let ms = matchers(&[("none", r"<u>(\w+)</u>"), ("bold", r"<b>(\w+)</b>"), ("italic", r"<i>(\w+)</i>")]);
        let chain = ExtractorChain::new("test", &ms, MatchMode::FirstHit);
        let out = chain.collect(MARKUP, |c| Some((c.group(0), c.group(0))));
        assert_eq!(out, vec!["c3", "d4"]);
    }

    #[test]
    fn test_first_hit_skips_matcher_whose_candidates_are_all_rejected() {
        let ms = matchers(&[("italic", r"<i>(\w+)</i>"), ("bold", r"<b>(\w+)</b>")]);
        let chain = ExtractorChain::new("test", &ms, MatchMode::FirstHit);
        let out = chain.collect(MARKUP, |c| {
            let v = c.group(0);
            (!v.starts_with('a') && !v.starts_with('b')).then_some((v, v))
        });
        assert_eq!(out, vec!["c3", "d4"]);
    }

    #[test]
    fn test_limit_caps_across_matchers() {
        let ms = matchers(&[("italic", r"<i>(\w+)</i>"), ("bold", r"<b>(\w+)</b>")]);
        let chain = ExtractorChain::new("test", &ms, MatchMode::Accumulate).with_limit(3);
        let out = chain.collect(MARKUP, |c| Some((c.group(0), c.group(0))));
        assert_eq!(out, vec!["a1", "b2", "c3"]);
    }
}
