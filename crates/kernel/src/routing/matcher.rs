//! Matching URLs against the route tree.

use tracing::debug;

use super::node::{PathSegment, RouteNode, RouteParams};

/// One matched level of the route chain.
#[derive(Debug, Clone)]
pub struct ActivatedRoute<'a> {
    pub node: &'a RouteNode,
    /// Decoded URL segments consumed by this node.
    pub segments: Vec<String>,
    /// Parameters bound by this node and its ancestors.
    pub params: RouteParams,
}

/// The immutable route tree plus matching.
#[derive(Debug, Clone)]
pub struct RouteTable {
    root: RouteNode,
}

impl RouteTable {
    pub fn new(root: RouteNode) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &RouteNode {
        &self.root
    }

    /// Match a URL to the chain of activated routes, root first.
    ///
    /// Query strings and fragments are ignored. Returns `None` if no route
    /// consumes the whole path.
    pub fn match_url(&self, url: &str) -> Option<Vec<ActivatedRoute<'_>>> {
        let segments = split_url(url);
        let chain = match_node(&self.root, &segments, &RouteParams::new());
        if chain.is_none() {
            debug!(url = %url, "no route matched");
        }
        chain
    }

    /// Depth-first listing of every node with its depth.
    pub fn walk(&self) -> Vec<(usize, &RouteNode)> {
        let mut out = Vec::new();
        walk_into(&self.root, 0, &mut out);
        out
    }
}

fn walk_into<'a>(node: &'a RouteNode, depth: usize, out: &mut Vec<(usize, &'a RouteNode)>) {
    out.push((depth, node));
    for child in node.child_nodes() {
        walk_into(child, depth + 1, out);
    }
}

/// Split a URL path into percent-decoded, non-empty segments.
pub fn split_url(url: &str) -> Vec<String> {
    let path = url.split(['?', '#']).next().unwrap_or_default();

    path.split('/')
        .filter(|s| !s.is_empty())
        .map(|s| match urlencoding::decode(s) {
            Ok(decoded) => decoded.into_owned(),
            Err(_) => s.to_string(),
        })
        .collect()
}

fn match_node<'a>(
    node: &'a RouteNode,
    remaining: &[String],
    inherited: &RouteParams,
) -> Option<Vec<ActivatedRoute<'a>>> {
    let mut params = inherited.clone();

    let consumed = if node.is_wildcard() {
        remaining.len()
    } else {
        let pattern = node.segments();
        if pattern.len() > remaining.len() {
            return None;
        }
        for (segment, actual) in pattern.iter().zip(remaining) {
            match segment {
                PathSegment::Static(expected) if expected == actual => {}
                PathSegment::Static(_) => return None,
                PathSegment::Param(name) => {
                    params.insert(name.clone(), actual.clone());
                }
                PathSegment::Wildcard => {}
            }
        }
        pattern.len()
    };

    let rest = &remaining[consumed..];
    let activated = ActivatedRoute {
        node,
        segments: remaining[..consumed].to_vec(),
        params,
    };

    for child in node.child_nodes() {
        if let Some(tail) = match_node(child, rest, &activated.params) {
            let mut chain = Vec::with_capacity(tail.len() + 1);
            chain.push(activated);
            chain.extend(tail);
            return Some(chain);
        }
    }

    rest.is_empty().then(|| vec![activated])
}
