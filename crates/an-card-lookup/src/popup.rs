//! Card detail popup: state machine, placement and content.

use an_api_types::CardRecord;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PopupState {
    Hidden,
    Shown { card: String, shown_at_ms: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PopupTransition {
    Opened(String),
    /// A different card replaced the open one without passing through hidden.
    Switched { from: String, to: String },
    Closed(String),
    Ignored,
}

#[derive(Debug, Clone)]
pub struct Popup {
    state: PopupState,
    hide_guard_ms: u64,
}

impl Popup {
    pub fn new(hide_guard_ms: u64) -> Self {
        Self {
            state: PopupState::Hidden,
            hide_guard_ms,
        }
    }

    pub fn state(&self) -> &PopupState {
        &self.state
    }

    pub fn current(&self) -> Option<&str> {
        match &self.state {
            PopupState::Shown { card, .. } => Some(card),
            PopupState::Hidden => None,
        }
    }

    pub fn set_hide_guard(&mut self, ms: u64) {
        self.hide_guard_ms = ms;
    }

    /// Click on a card container. Clicking the open card closes it, subject
    /// to the same guard window as [`Popup::dismiss`].
    pub fn toggle(&mut self, card: &str, now_ms: u64) -> PopupTransition {
        if self.current() == Some(card) {
            return self.dismiss(now_ms);
        }
        let previous = std::mem::replace(
            &mut self.state,
            PopupState::Shown {
                card: card.to_owned(),
                shown_at_ms: now_ms,
            },
        );
        match previous {
            PopupState::Shown { card: open, .. } => PopupTransition::Switched {
                from: open,
                to: card.to_owned(),
            },
            PopupState::Hidden => PopupTransition::Opened(card.to_owned()),
        }
    }

    /// Click anywhere outside a card container. Ignored within the guard
    /// window after a show so the opening click cannot close the popup.
    pub fn dismiss(&mut self, now_ms: u64) -> PopupTransition {
        match &self.state {
            PopupState::Shown { shown_at_ms, .. }
                if now_ms.saturating_sub(*shown_at_ms) < self.hide_guard_ms =>
            {
                PopupTransition::Ignored
            }
            PopupState::Shown { card, .. } => {
                let card = card.clone();
                self.state = PopupState::Hidden;
                PopupTransition::Closed(card)
            }
            PopupState::Hidden => PopupTransition::Ignored,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub left: f64,
    pub top: f64,
}

/// Places the popup beside the pointer, flipping to the other side when it
/// would overflow and clamping into the viewport. Narrow viewports get a
/// horizontally centered popup pinned near the top.
pub fn place_popup(
    pointer_x: f64,
    pointer_y: f64,
    popup: Size,
    viewport: Size,
    cushion: f64,
    narrow_breakpoint: f64,
) -> Placement {
    let max_left = (viewport.width - popup.width).max(0.0);
    let max_top = (viewport.height - popup.height).max(0.0);

    if viewport.width < narrow_breakpoint {
        return Placement {
            left: ((viewport.width - popup.width) / 2.0).clamp(0.0, max_left),
            top: cushion.min(max_top),
        };
    }

    let mut left = pointer_x + cushion;
    if left + popup.width > viewport.width {
        left = pointer_x - popup.width - cushion;
    }
    let mut top = pointer_y + cushion;
    if top + popup.height > viewport.height {
        top = pointer_y - popup.height - cushion;
    }

    Placement {
        left: left.clamp(0.0, max_left),
        top: top.clamp(0.0, max_top),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopupContent {
    pub title: String,
    pub type_line: String,
    pub description: Vec<String>,
    pub stats: Option<String>,
}

impl PopupContent {
    pub fn for_card(card: &CardRecord) -> Self {
        Self {
            title: card.name.clone(),
            type_line: type_line(card),
            description: card.desc.lines().map(str::to_owned).collect(),
            stats: stat_line(card),
        }
    }
}

/// `[Race / Type]` for monsters, `[Race Card]` for spells and traps.
pub fn type_line(card: &CardRecord) -> String {
    if card.is_monster() {
        format!("[{} / {}]", card.race, card.card_type.replace(" Monster", ""))
    } else {
        format!("[{} Card]", card.race)
    }
}

pub fn stat_line(card: &CardRecord) -> Option<String> {
    let mut parts = Vec::new();
    if let Some(atk) = card.atk {
        parts.push(format!("ATK/{atk}"));
    }
    if let Some(def) = card.def {
        parts.push(format!("DEF/{def}"));
    }
    if let Some(link) = card.linkval.filter(|l| *l > 0) {
        parts.push(format!("LINK-{link}"));
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(name: &str, card_type: &str, race: &str) -> CardRecord {
        CardRecord {
            name: name.to_owned(),
            id: 1,
            card_type: card_type.to_owned(),
            race: race.to_owned(),
            atk: None,
            def: None,
            linkval: None,
            desc: "Line one.\r\nLine two.".to_owned(),
            image_url: String::new(),
        }
    }

    #[test]
    fn showing_the_same_card_twice_hides_it() {
        let mut popup = Popup::new(100);
        assert_eq!(popup.toggle("A", 0), PopupTransition::Opened("A".into()));
        assert_eq!(popup.toggle("A", 150), PopupTransition::Closed("A".into()));
        assert_eq!(popup.state(), &PopupState::Hidden);
    }

    #[test]
    fn quick_second_click_on_the_open_card_is_absorbed() {
        let mut popup = Popup::new(100);
        popup.toggle("A", 1_000);
        assert_eq!(popup.toggle("A", 1_040), PopupTransition::Ignored);
        assert_eq!(popup.current(), Some("A"));
        assert_eq!(popup.toggle("A", 1_100), PopupTransition::Closed("A".into()));
    }

    #[test]
    fn showing_another_card_switches_directly() {
        let mut popup = Popup::new(100);
        popup.toggle("A", 0);
        assert_eq!(
            popup.toggle("B", 500),
            PopupTransition::Switched {
                from: "A".into(),
                to: "B".into()
            }
        );
        assert_eq!(popup.current(), Some("B"));
    }

    #[test]
    fn outside_click_respects_hide_guard() {
        let mut popup = Popup::new(100);
        popup.toggle("A", 1_000);
        assert_eq!(popup.dismiss(1_050), PopupTransition::Ignored);
        assert_eq!(popup.current(), Some("A"));
        assert_eq!(popup.dismiss(1_100), PopupTransition::Closed("A".into()));
        assert_eq!(popup.dismiss(5_000), PopupTransition::Ignored);
    }

    #[test]
    fn placement_flips_and_clamps() {
        let viewport = Size {
            width: 1280.0,
            height: 800.0,
        };
        let popup = Size {
            width: 300.0,
            height: 200.0,
        };

        let beside = place_popup(100.0, 100.0, popup, viewport, 20.0, 640.0);
        assert_eq!(beside, Placement { left: 120.0, top: 120.0 });

        let flipped = place_popup(1200.0, 700.0, popup, viewport, 20.0, 640.0);
        assert_eq!(flipped, Placement { left: 880.0, top: 480.0 });

        let cramped = place_popup(150.0, 150.0, Size { width: 300.0, height: 700.0 }, viewport, 20.0, 640.0);
        assert_eq!(cramped.top, 0.0);
    }

    #[test]
    fn narrow_viewport_centers_at_top() {
        let placed = place_popup(
            300.0,
            500.0,
            Size {
                width: 280.0,
                height: 300.0,
            },
            Size {
                width: 400.0,
                height: 700.0,
            },
            20.0,
            640.0,
        );
        assert_eq!(placed, Placement { left: 60.0, top: 20.0 });
    }

    #[test]
    fn content_lines_follow_card_kind() {
        let mut monster = card("Decode Talker", "Link Monster", "Cyberse");
        monster.atk = Some(2300);
        monster.linkval = Some(3);
        let content = PopupContent::for_card(&monster);
        assert_eq!(content.type_line, "[Cyberse / Link]");
        assert_eq!(content.stats.as_deref(), Some("ATK/2300 LINK-3"));
        assert_eq!(content.description, vec!["Line one.", "Line two."]);

        let spell = card("Pot of Greed", "Spell Card", "Normal");
        assert_eq!(type_line(&spell), "[Normal Card]");
        assert_eq!(stat_line(&spell), None);
    }
}
