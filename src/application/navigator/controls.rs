//! # Navigation Controls
//!
//! Builds the previous/next control pair attached to a navigator message.
//! Every render gets fresh identifiers so a control from an older render can
//! never be confused with the one currently on screen.

use serde::Deserialize;
use std::fmt;
use uuid::Uuid;

pub const DEFAULT_PREV_LABEL: &str = "Previous";
pub const DEFAULT_NEXT_LABEL: &str = "Next";
pub const DEFAULT_PREV_GLYPH: &str = "◀️";
pub const DEFAULT_NEXT_GLYPH: &str = "▶️";

/// Identifies one navigator session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Previous,
    Next,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Previous => "prev",
            Direction::Next => "next",
        }
    }
}

/// Unique identity of a rendered control: session, render generation, direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ControlId {
    pub session: SessionId,
    pub generation: u64,
    pub direction: Direction,
}

impl fmt::Display for ControlId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.session,
            self.generation,
            self.direction.as_str()
        )
    }
}

/// Visual weight of a control. Hosts without styled buttons may ignore it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlStyle {
    Primary,
    #[default]
    Secondary,
    Success,
    Danger,
}

/// Caller-facing appearance options for the control pair.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NavigatorStyle {
    pub control_style: ControlStyle,
    pub prev_label: String,
    pub next_label: String,
    pub prev_glyph: Option<String>,
    pub next_glyph: Option<String>,
}

impl Default for NavigatorStyle {
    fn default() -> Self {
        Self {
            control_style: ControlStyle::default(),
            prev_label: DEFAULT_PREV_LABEL.to_string(),
            next_label: DEFAULT_NEXT_LABEL.to_string(),
            prev_glyph: Some(DEFAULT_PREV_GLYPH.to_string()),
            next_glyph: Some(DEFAULT_NEXT_GLYPH.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Control {
    pub id: ControlId,
    pub disabled: bool,
    pub style: ControlStyle,
    pub label: Option<String>,
    pub glyph: Option<String>,
}

impl Control {
    /// Human readable caption: glyph and label, whichever are present.
    pub fn caption(&self) -> String {
        match (&self.glyph, &self.label) {
            (Some(glyph), Some(label)) => format!("{glyph} {label}"),
            (Some(glyph), None) => glyph.clone(),
            (None, Some(label)) => label.clone(),
            (None, None) => self.id.direction.as_str().to_string(),
        }
    }

    /// Short token a user can send back to trigger this control (e.g. a reaction key).
    pub fn trigger_key(&self) -> &str {
        self.glyph
            .as_deref()
            .or(self.label.as_deref())
            .unwrap_or(self.id.direction.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlPair {
    pub previous: Control,
    pub next: Control,
}

impl ControlPair {
    #[cfg(test)]
    pub fn get(&self, direction: Direction) -> &Control {
        match direction {
            Direction::Previous => &self.previous,
            Direction::Next => &self.next,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Control> {
        [&self.previous, &self.next].into_iter()
    }

    pub fn all_disabled(&self) -> bool {
        self.previous.disabled && self.next.disabled
    }

    /// Same pair with both controls disabled.
    pub fn disabled(mut self) -> Self {
        self.previous.disabled = true;
        self.next.disabled = true;
        self
    }
}

/// Builds the control pair for `position` within a sequence of `len` items.
pub fn render(
    session: SessionId,
    generation: u64,
    position: usize,
    len: usize,
    style: &NavigatorStyle,
) -> ControlPair {
    let last = len.saturating_sub(1);
    let control = |direction, disabled, label: &str, default: &str, glyph: &Option<String>| {
        let (label, glyph) = describe(label, default, glyph);
        Control {
            id: ControlId {
                session,
                generation,
                direction,
            },
            disabled,
            style: style.control_style,
            label,
            glyph,
        }
    };

    ControlPair {
        previous: control(
            Direction::Previous,
            position == 0,
            &style.prev_label,
            DEFAULT_PREV_LABEL,
            &style.prev_glyph,
        ),
        next: control(
            Direction::Next,
            position >= last,
            &style.next_label,
            DEFAULT_NEXT_LABEL,
            &style.next_glyph,
        ),
    }
}

/// A glyph hides the label, unless the caller replaced the default label.
fn describe(
    label: &str,
    default_label: &str,
    glyph: &Option<String>,
) -> (Option<String>, Option<String>) {
    let glyph = glyph.as_ref().filter(|g| !g.is_empty()).cloned();
    let label = (!label.is_empty()).then(|| label.to_string());
    match glyph {
        Some(glyph) if label.as_deref().is_none_or(|l| l == default_label) => (None, Some(glyph)),
        glyph => (label, glyph),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain_style() -> NavigatorStyle {
        NavigatorStyle {
            prev_glyph: None,
            next_glyph: None,
            ..NavigatorStyle::default()
        }
    }

    #[test]
    fn test_boundaries_disable_controls() {
        let session = SessionId::new();
        let style = NavigatorStyle::default();

        let first = render(session, 0, 0, 3, &style);
        assert!(first.previous.disabled);
        assert!(!first.next.disabled);

        let middle = render(session, 1, 1, 3, &style);
        assert!(!middle.previous.disabled);
        assert!(!middle.next.disabled);

        let last = render(session, 2, 2, 3, &style);
        assert!(!last.previous.disabled);
        assert!(last.next.disabled);
    }

    #[test]
    fn test_single_item_disables_both() {
        let pair = render(SessionId::new(), 0, 0, 1, &NavigatorStyle::default());
        assert!(pair.all_disabled());
    }

    #[test]
    fn test_glyph_hides_default_label() {
        let pair = render(SessionId::new(), 0, 0, 2, &NavigatorStyle::default());
        assert_eq!(pair.previous.label, None);
        assert_eq!(pair.previous.glyph.as_deref(), Some(DEFAULT_PREV_GLYPH));
        assert_eq!(pair.next.caption(), DEFAULT_NEXT_GLYPH);
    }

    #[test]
    fn test_custom_label_shown_with_glyph() {
        let style = NavigatorStyle {
            next_label: "More".to_string(),
            ..NavigatorStyle::default()
        };
        let pair = render(SessionId::new(), 0, 0, 2, &style);
        assert_eq!(pair.next.label.as_deref(), Some("More"));
        assert_eq!(pair.next.glyph.as_deref(), Some(DEFAULT_NEXT_GLYPH));
        assert_eq!(pair.next.caption(), format!("{DEFAULT_NEXT_GLYPH} More"));
        // previous kept its default label, so the glyph alone is shown
        assert_eq!(pair.previous.label, None);
    }

    #[test]
    fn test_label_without_glyph() {
        let pair = render(SessionId::new(), 0, 0, 2, &plain_style());
        assert_eq!(pair.previous.label.as_deref(), Some(DEFAULT_PREV_LABEL));
        assert_eq!(pair.previous.glyph, None);
        assert_eq!(pair.previous.trigger_key(), DEFAULT_PREV_LABEL);
    }

    #[test]
    fn test_empty_glyph_is_ignored() {
        let style = NavigatorStyle {
            prev_glyph: Some(String::new()),
            ..NavigatorStyle::default()
        };
        let pair = render(SessionId::new(), 0, 0, 2, &style);
        assert_eq!(pair.previous.glyph, None);
        assert_eq!(pair.previous.label.as_deref(), Some(DEFAULT_PREV_LABEL));
    }

    #[test]
    fn test_ids_unique_across_renders_and_sessions() {
        let style = NavigatorStyle::default();
        let a = SessionId::new();
        let b = SessionId::new();

        let first = render(a, 0, 0, 3, &style);
        let second = render(a, 1, 0, 3, &style);
        let other = render(b, 0, 0, 3, &style);

        assert_ne!(first.next.id, second.next.id);
        assert_ne!(first.next.id, other.next.id);
        assert_ne!(first.previous.id, first.next.id);
        assert_ne!(first.next.id.to_string(), second.next.id.to_string());
    }

    #[test]
    fn test_disabled_pair_keeps_ids() {
        let pair = render(SessionId::new(), 4, 1, 3, &NavigatorStyle::default());
        let ids = (pair.previous.id, pair.next.id);
        let sealed = pair.disabled();
        assert!(sealed.all_disabled());
        assert_eq!((sealed.previous.id, sealed.next.id), ids);
    }

    #[test]
    fn test_style_deserializes_with_defaults() {
        let style: NavigatorStyle =
            serde_yaml::from_str("control_style: primary\nnext_label: Forward\n").unwrap();
        assert_eq!(style.control_style, ControlStyle::Primary);
        assert_eq!(style.next_label, "Forward");
        assert_eq!(style.prev_label, DEFAULT_PREV_LABEL);
        assert_eq!(style.prev_glyph.as_deref(), Some(DEFAULT_PREV_GLYPH));
    }
}
