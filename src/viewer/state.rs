//! Viewer element model
//!
//! Plain data mirroring the viewer page: image slots, the drafted list,
//! the drafted counter, the spectator link and the mana chart.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::chart::ManaChart;

/// Image elements the real-time channel can update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ImageSlot {
    CardZero,
    CardOne,
    CardTwo,
    Hero,
}

/// Card slots in display order
pub const CARD_SLOTS: [ImageSlot; 3] = [ImageSlot::CardZero, ImageSlot::CardOne, ImageSlot::CardTwo];

impl ImageSlot {
    /// Element id on the viewer page
    pub fn element_id(&self) -> &'static str {
        match self {
            ImageSlot::CardZero => "card_zero",
            ImageSlot::CardOne => "card_one",
            ImageSlot::CardTwo => "card_two",
            ImageSlot::Hero => "hero",
        }
    }
}

/// An `<img>` element
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageElement {
    pub id: &'static str,
    pub src: String,
}

impl ImageElement {
    fn empty(slot: ImageSlot) -> Self {
        Self {
            id: slot.element_id(),
            src: String::new(),
        }
    }
}

/// One `<li>` of the drafted list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DraftedItem {
    /// Tooltip markup shown on hover: the full card image
    pub tooltip: String,
    pub tooltip_placement: &'static str,
    /// Image sources in order: mana, card bar, multiplicity
    pub images: [String; 3],
}

/// Everything the viewer displays
#[derive(Debug, Clone, Serialize)]
pub struct ViewerState {
    pub cards: [ImageElement; 3],
    pub hero: ImageElement,
    pub drafted: Vec<DraftedItem>,
    pub num_drafted: Option<String>,
    pub viewer_link: Option<String>,
    pub chart: Option<ManaChart>,
    pub finished: bool,
    pub revision: u64,
    pub last_updated: Option<DateTime<Utc>>,
}

impl Default for ViewerState {
    fn default() -> Self {
        Self {
            cards: CARD_SLOTS.map(ImageElement::empty),
            hero: ImageElement::empty(ImageSlot::Hero),
            drafted: Vec::new(),
            num_drafted: None,
            viewer_link: None,
            chart: None,
            finished: false,
            revision: 0,
            last_updated: None,
        }
    }
}

impl ViewerState {
    pub fn image(&self, slot: ImageSlot) -> &ImageElement {
        match slot {
            ImageSlot::CardZero => &self.cards[0],
            ImageSlot::CardOne => &self.cards[1],
            ImageSlot::CardTwo => &self.cards[2],
            ImageSlot::Hero => &self.hero,
        }
    }

    pub fn image_mut(&mut self, slot: ImageSlot) -> &mut ImageElement {
        match slot {
            ImageSlot::CardZero => &mut self.cards[0],
            ImageSlot::CardOne => &mut self.cards[1],
            ImageSlot::CardTwo => &mut self.cards[2],
            ImageSlot::Hero => &mut self.hero,
        }
    }

    /// Text of the drafted counter element
    pub fn drafted_label(count: usize) -> String {
        format!("Number Drafted: {}", count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_slots() {
        let state = ViewerState::default();
        assert_eq!(state.image(ImageSlot::CardOne).id, "card_one");
        assert_eq!(state.image(ImageSlot::Hero).id, "hero");
        assert!(state.chart.is_none());
        assert!(!state.finished);
    }

    #[test]
    fn test_image_mut() {
        let mut state = ViewerState::default();
        state.image_mut(ImageSlot::CardTwo).src = "x.png".to_string();
        assert_eq!(state.cards[2].src, "x.png");
    }

    #[test]
    fn test_drafted_label() {
        assert_eq!(ViewerState::drafted_label(12), "Number Drafted: 12");
    }
}
