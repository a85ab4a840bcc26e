//! Declarative hook patterns
//!
//! A pattern is a hook name with two kinds of brace groups:
//!
//! - `{role:interface}`: an endpoint placeholder, replaced by the name of
//!   every relation bound to that role and interface
//! - `{a,b,c}`: an alternation
//!
//! ```text
//! {requires:ovsdb-manager}-relation-{joined,changed,departed}
//!         │ bind("ovsdb")
//!         ▼
//! ovsdb-relation-{joined,changed,departed}
//!         │ expand
//!         ▼
//! ovsdb-relation-joined, ovsdb-relation-changed, ovsdb-relation-departed
//! ```

use std::fmt;

use crate::config::EndpointRole;
use crate::error::{Error, Result};

/// A relation endpoint known to the dispatcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointBinding {
    /// Relation name
    pub relation_name: String,
    /// Role of this side
    pub role: EndpointRole,
    /// Interface spoken over the relation
    pub interface: String,
}

/// Binding table from `(role, interface)` to relation names
#[derive(Debug, Clone, Default)]
pub struct Endpoints {
    bindings: Vec<EndpointBinding>,
}

impl Endpoints {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a relation name to a role and interface
    ///
    /// Binding the same relation name twice is a configuration error.
    pub fn bind(
        &mut self,
        relation_name: impl Into<String>,
        role: EndpointRole,
        interface: impl Into<String>,
    ) -> Result<()> {
        let relation_name = relation_name.into();
        if self.lookup(&relation_name).is_some() {
            return Err(Error::config(format!(
                "Relation '{}' is already bound",
                relation_name
            )));
        }

        self.bindings.push(EndpointBinding {
            relation_name,
            role,
            interface: interface.into(),
        });
        Ok(())
    }

    /// Binding for a relation name
    pub fn lookup(&self, relation_name: &str) -> Option<&EndpointBinding> {
        self.bindings
            .iter()
            .find(|b| b.relation_name == relation_name)
    }

    /// Relation names bound to `role` and `interface`, in binding order
    pub fn relations(&self, role: EndpointRole, interface: &str) -> Vec<&str> {
        self.bindings
            .iter()
            .filter(|b| b.role == role && b.interface == interface)
            .map(|b| b.relation_name.as_str())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Endpoint {
        role: EndpointRole,
        interface: String,
    },
    Alternatives(Vec<String>),
}

/// A parsed hook pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookPattern {
    raw: String,
    segments: Vec<Segment>,
}

impl HookPattern {
    /// Parse a pattern
    ///
    /// Nested or unbalanced braces, empty groups and empty alternatives are
    /// rejected.
    pub fn parse(raw: &str) -> Result<Self> {
        let mut segments = Vec::new();
        let mut rest = raw;

        while !rest.is_empty() {
            let open = rest.find('{');
            let close = rest.find('}');

            match (open, close) {
                (None, None) => {
                    segments.push(Segment::Literal(rest.to_string()));
                    break;
                }
                (Some(o), Some(c)) if o < c => {
                    if o > 0 {
                        segments.push(Segment::Literal(rest[..o].to_string()));
                    }
                    let body = &rest[o + 1..c];
                    if body.contains('{') {
                        return Err(Error::invalid_pattern(format!(
                            "nested braces in '{}'",
                            raw
                        )));
                    }
                    segments.push(Self::parse_group(body, raw)?);
                    rest = &rest[c + 1..];
                }
                _ => {
                    return Err(Error::invalid_pattern(format!(
                        "unbalanced braces in '{}'",
                        raw
                    )));
                }
            }
        }

        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    fn parse_group(body: &str, raw: &str) -> Result<Segment> {
        if body.is_empty() {
            return Err(Error::invalid_pattern(format!("empty group in '{}'", raw)));
        }

        if let Some((role, interface)) = body.split_once(':') {
            if interface.is_empty() {
                return Err(Error::invalid_pattern(format!(
                    "endpoint without interface in '{}'",
                    raw
                )));
            }
            return Ok(Segment::Endpoint {
                role: role.parse().map_err(|_| {
                    Error::invalid_pattern(format!("unknown role '{}' in '{}'", role, raw))
                })?,
                interface: interface.to_string(),
            });
        }

        let alternatives: Vec<String> = body.split(',').map(str::to_string).collect();
        if alternatives.iter().any(String::is_empty) {
            return Err(Error::invalid_pattern(format!(
                "empty alternative in '{}'",
                raw
            )));
        }
        Ok(Segment::Alternatives(alternatives))
    }

    /// The pattern as declared
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Endpoint placeholders referenced by this pattern
    pub fn endpoints(&self) -> impl Iterator<Item = (EndpointRole, &str)> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Endpoint { role, interface } => Some((*role, interface.as_str())),
            _ => None,
        })
    }

    /// Whether every placeholder in the pattern accepts `binding`
    pub fn applies_to(&self, binding: &EndpointBinding) -> bool {
        self.endpoints()
            .all(|(role, interface)| role == binding.role && interface == binding.interface)
    }

    /// Pattern string with endpoint placeholders replaced by `relation_name`
    pub fn bind(&self, relation_name: &str) -> String {
        self.segments
            .iter()
            .map(|s| match s {
                Segment::Literal(text) => text.clone(),
                Segment::Endpoint { .. } => relation_name.to_string(),
                Segment::Alternatives(alts) => format!("{{{}}}", alts.join(",")),
            })
            .collect()
    }

    /// Concrete hook names for one relation, in declaration order
    pub fn expand_for(&self, relation_name: &str) -> Vec<String> {
        self.segments.iter().fold(vec![String::new()], |acc, s| {
            let choices: Vec<&str> = match s {
                Segment::Literal(text) => vec![text.as_str()],
                Segment::Endpoint { .. } => vec![relation_name],
                Segment::Alternatives(alts) => alts.iter().map(String::as_str).collect(),
            };
            acc.iter()
                .flat_map(|prefix| choices.iter().map(move |c| format!("{prefix}{c}")))
                .collect()
        })
    }

    /// Concrete hook names across every applicable relation in `endpoints`
    pub fn expand(&self, endpoints: &Endpoints) -> Vec<String> {
        let mut placeholders = self.endpoints();
        let Some((role, interface)) = placeholders.next() else {
            return self.expand_for("");
        };

        endpoints
            .relations(role, interface)
            .into_iter()
            .filter(|name| endpoints.lookup(name).is_some_and(|b| self.applies_to(b)))
            .flat_map(|name| self.expand_for(name))
            .collect()
    }

    /// Whether `hook_name` is produced by this pattern for `binding`
    pub fn matches(&self, hook_name: &str, binding: &EndpointBinding) -> bool {
        self.applies_to(binding)
            && self
                .expand_for(&binding.relation_name)
                .iter()
                .any(|h| h == hook_name)
    }
}

impl fmt::Display for HookPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
