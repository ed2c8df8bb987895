//! View models produced from records.
//!
//! Everything here is plain data: a [`Card`] per record, a [`ListView`] for
//! a module's container and [`StatTile`]s for its stats strip. Turning them
//! into HTML is [`crate::markup`]'s job.

use crate::record::Record;
use healthcard_types::RecordId;
use serde::Serialize;
use std::fmt;

/// Colour treatment of a badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    /// An explicit background colour (`#rrggbb` or `#rgb`).
    Hex(&'static str),
    Success,
    Secondary,
    Warning,
    Danger,
    Primary,
    Info,
}

impl Tone {
    /// The hex colour, if this is an explicit one.
    pub fn hex(&self) -> Option<&'static str> {
        match self {
            Self::Hex(c) => Some(c),
            _ => None,
        }
    }

    /// Bootstrap contextual class suffix for named tones.
    pub fn class(&self) -> Option<&'static str> {
        match self {
            Self::Hex(_) => None,
            Self::Success => Some("success"),
            Self::Secondary => Some("secondary"),
            Self::Warning => Some("warning"),
            Self::Danger => Some("danger"),
            Self::Primary => Some("primary"),
            Self::Info => Some("info"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Badge {
    pub text: String,
    pub tone: Tone,
}

impl Badge {
    pub fn new(text: impl Into<String>, tone: Tone) -> Self {
        Self {
            text: text.into(),
            tone,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    Normal,
    Muted,
    Warning,
    Highlight,
}

/// One line of a card body, optionally led by a bold label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardLine {
    pub label: Option<String>,
    pub value: String,
    pub style: LineStyle,
}

impl CardLine {
    /// `Label: value`
    pub fn labeled(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            value: value.into(),
            style: LineStyle::Normal,
        }
    }

    /// Unlabelled small grey text.
    pub fn muted(value: impl Into<String>) -> Self {
        Self {
            label: None,
            value: value.into(),
            style: LineStyle::Muted,
        }
    }

    pub fn styled(mut self, style: LineStyle) -> Self {
        self.style = style;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub label: String,
    pub href: String,
}

/// A user action a card exposes. Bound to the card's record id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    View,
    Edit,
    Delete,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Edit => "edit",
            Self::Delete => "delete",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "view" => Some(Self::View),
            "edit" => Some(Self::Edit),
            "delete" => Some(Self::Delete),
            _ => None,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The view of a single record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Card {
    pub id: RecordId,
    pub title: String,
    pub subtitle: Option<String>,
    pub badge: Option<Badge>,
    /// Secondary badges shown next to the title.
    pub tags: Vec<Badge>,
    pub lines: Vec<CardLine>,
    pub chips: Vec<String>,
    /// Summary for chips beyond those shown, e.g. `+2 more`.
    pub chip_overflow: Option<String>,
    /// Text shown in the chip area when there are no chips.
    pub chips_placeholder: Option<String>,
    pub links: Vec<Link>,
    pub actions: Vec<Action>,
}

impl Card {
    /// A card with just a title and the edit/delete actions.
    pub fn new(id: RecordId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            subtitle: None,
            badge: None,
            tags: Vec::new(),
            lines: Vec::new(),
            chips: Vec::new(),
            chip_overflow: None,
            chips_placeholder: None,
            links: Vec::new(),
            actions: vec![Action::Edit, Action::Delete],
        }
    }

    pub fn subtitle(mut self, subtitle: Option<String>) -> Self {
        self.subtitle = subtitle.filter(|s| !s.is_empty());
        self
    }

    pub fn badge(mut self, badge: Badge) -> Self {
        self.badge = Some(badge);
        self
    }

    pub fn line(mut self, line: CardLine) -> Self {
        self.lines.push(line);
        self
    }

    /// Adds `label: value` only when `value` is present.
    pub fn line_if(self, label: &str, value: Option<&str>) -> Self {
        match value {
            Some(v) if !v.is_empty() => self.line(CardLine::labeled(label, v)),
            _ => self,
        }
    }

    pub fn actions(mut self, actions: &[Action]) -> Self {
        self.actions = actions.to_vec();
        self
    }

    /// The explicit `(action, id)` pairs this card binds.
    pub fn bindings(&self) -> impl Iterator<Item = (Action, RecordId)> + '_ {
        self.actions.iter().map(|a| (*a, self.id))
    }
}

/// The rendered state of a module's list container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListView {
    pub module: &'static str,
    pub cards: Vec<Card>,
    pub empty_state_visible: bool,
}

impl ListView {
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Every `(action, id)` binding in card order.
    pub fn bindings(&self) -> Vec<(Action, RecordId)> {
        self.cards.iter().flat_map(Card::bindings).collect()
    }
}

/// Maps records to cards, one per record, in input order.
pub fn render_list<R: Record>(records: &[R]) -> ListView {
    ListView {
        module: R::schema().name,
        cards: records.iter().map(Record::card).collect(),
        empty_state_visible: records.is_empty(),
    }
}

/// One number in a module's stats strip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatTile {
    pub label: &'static str,
    pub value: String,
}

impl StatTile {
    pub fn new(label: &'static str, value: impl ToString) -> Self {
        Self {
            label,
            value: value.to_string(),
        }
    }
}

/// Stats that can be shown as tiles.
pub trait StatsView {
    fn tiles(&self) -> Vec<StatTile>;
}

impl StatsView for () {
    fn tiles(&self) -> Vec<StatTile> {
        Vec::new()
    }
}
