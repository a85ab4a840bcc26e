//! Relation lifecycle events and concrete hook names

use std::fmt;
use std::str::FromStr;

/// Separator between the relation name and the event in a hook name
const RELATION_HOOK_INFIX: &str = "-relation-";

/// Lifecycle event of a relation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleEvent {
    Joined,
    Changed,
    Departed,
    Broken,
}

impl LifecycleEvent {
    /// Event name as used in hook names
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleEvent::Joined => "joined",
            LifecycleEvent::Changed => "changed",
            LifecycleEvent::Departed => "departed",
            LifecycleEvent::Broken => "broken",
        }
    }
}

impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LifecycleEvent {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "joined" => Ok(LifecycleEvent::Joined),
            "changed" => Ok(LifecycleEvent::Changed),
            "departed" => Ok(LifecycleEvent::Departed),
            "broken" => Ok(LifecycleEvent::Broken),
            other => Err(crate::Error::Other(format!(
                "Unknown relation lifecycle event '{}'",
                other
            ))),
        }
    }
}

/// A concrete relation hook such as `ovsdb-relation-changed`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HookEvent {
    /// Relation the hook fired for
    pub relation_name: String,
    /// Lifecycle event
    pub event: LifecycleEvent,
}

impl HookEvent {
    /// Create a hook event
    pub fn new(relation_name: impl Into<String>, event: LifecycleEvent) -> Self {
        Self {
            relation_name: relation_name.into(),
            event,
        }
    }

    /// Parse a hook name; `None` when it is not a relation hook
    ///
    /// The last `-relation-` separates the relation name from the event, so
    /// relation names may themselves contain `-relation-`.
    pub fn parse(hook_name: &str) -> Option<Self> {
        let (relation_name, event) = hook_name.rsplit_once(RELATION_HOOK_INFIX)?;
        if relation_name.is_empty() {
            return None;
        }
        let event = event.parse().ok()?;
        Some(Self::new(relation_name, event))
    }

    /// Hook name for this event
    pub fn hook_name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for HookEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.relation_name, RELATION_HOOK_INFIX, self.event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_relation_hooks() {
        assert_eq!(
            HookEvent::parse("ovsdb-relation-changed"),
            Some(HookEvent::new("ovsdb", LifecycleEvent::Changed))
        );
        assert_eq!(
            HookEvent::parse("ovsdb-manager-relation-broken"),
            Some(HookEvent::new("ovsdb-manager", LifecycleEvent::Broken))
        );
        assert_eq!(
            HookEvent::parse("some-relation-relation-joined"),
            Some(HookEvent::new("some-relation", LifecycleEvent::Joined))
        );
    }

    #[test]
    fn test_parse_rejects_other_hooks() {
        assert_eq!(HookEvent::parse("config-changed"), None);
        assert_eq!(HookEvent::parse("ovsdb-relation-created"), None);
        assert_eq!(HookEvent::parse("-relation-joined"), None);
    }

    #[test]
    fn test_hook_name_round_trip() {
        let event = HookEvent::new("ovsdb", LifecycleEvent::Departed);
        assert_eq!(event.hook_name(), "ovsdb-relation-departed");
    }
}
