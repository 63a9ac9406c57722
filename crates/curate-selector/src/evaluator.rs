//! Selector evaluation against JSON-like values

use crate::parser::{Segment, Selector};
use serde_json::Value;

impl Selector {
    /// Apply the selector to `root` and return every matched value, in order
    ///
    /// A field step keeps mapping candidates that contain the field; a
    /// wildcard step expands sequence candidates into their elements. Any
    /// other candidate is dropped, so missing or mistyped data yields an
    /// empty result rather than an error.
    pub fn evaluate<'v>(&self, root: &'v Value) -> Vec<&'v Value> {
        let mut current = vec![root];

        for segment in self.segments() {
            let mut next = Vec::with_capacity(current.len());
            for value in current {
                match segment {
                    Segment::Field(name) => {
                        if let Some(found) = value.as_object().and_then(|map| map.get(name)) {
                            next.push(found);
                        }
                    }
                    Segment::Wildcard => {
                        if let Some(elements) = value.as_array() {
                            next.extend(elements.iter());
                        }
                    }
                }
            }
            if next.is_empty() {
                return next;
            }
            current = next;
        }

        current
    }
}
