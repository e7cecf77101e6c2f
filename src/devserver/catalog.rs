//! Card catalog and asset URLs
//!
//! The catalog maps card ids to mana cost and name. It is loaded from the
//! collectible card JSON dump (`[{id, cost, name, ...}]`); entries without a
//! cost (heroes, hero powers) are skipped.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use super::error::{DevServerError, DevServerResult};

/// Heroes the backend accepts
pub const VALID_HERO_IDS: [&str; 10] = [
    "no_hero", "druid", "hunter", "mage", "priest", "shaman", "thief", "paladin", "warlock",
    "warrior",
];

/// Highest mana cost of any card
const MAX_MANA: u32 = 25;

pub fn is_valid_hero(hero: &str) -> bool {
    VALID_HERO_IDS.contains(&hero)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardInfo {
    pub mana: u32,
    pub name: String,
}

#[derive(Debug, Deserialize)]
struct RawCard {
    id: String,
    cost: Option<u32>,
    #[serde(default)]
    name: Option<String>,
}

/// Card id to mana/name lookup
#[derive(Debug, Clone, Default)]
pub struct CardCatalog {
    cards: HashMap<String, CardInfo>,
}

impl CardCatalog {
    pub fn from_json_str(json: &str) -> DevServerResult<Self> {
        let raw: Vec<RawCard> = serde_json::from_str(json)
            .map_err(|e| DevServerError::Internal(format!("Invalid card database: {}", e)))?;

        let cards = raw
            .into_iter()
            .filter_map(|card| {
                let mana = card.cost?;
                let name = card.name.unwrap_or_else(|| card.id.clone());
                Some((card.id, CardInfo { mana, name }))
            })
            .collect();

        Ok(Self { cards })
    }

    pub fn load(path: &Path) -> DevServerResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Mana cost of a card; unknown cards cost 0
    pub fn mana(&self, card_id: &str) -> u32 {
        self.cards.get(card_id).map(|c| c.mana).unwrap_or(0)
    }

    /// Display name of a card; unknown cards use their id
    pub fn name<'a>(&'a self, card_id: &'a str) -> &'a str {
        self.cards
            .get(card_id)
            .map(|c| c.name.as_str())
            .unwrap_or(card_id)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Collapse duplicates and order by mana, then case-insensitive name
    pub fn sort_cards(&self, cards: &[String]) -> Vec<SortedCard> {
        let mut multiplicity: HashMap<&str, u32> = HashMap::new();
        for card in cards {
            *multiplicity.entry(card.as_str()).or_insert(0) += 1;
        }

        let mut sorted: Vec<SortedCard> = multiplicity
            .into_iter()
            .map(|(card, count)| SortedCard {
                mana: self.mana(card),
                card: card.to_string(),
                multiplicity: count,
            })
            .filter(|c| c.mana <= MAX_MANA)
            .collect();

        sorted.sort_by(|a, b| {
            a.mana.cmp(&b.mana).then_with(|| {
                self.name(&a.card)
                    .to_lowercase()
                    .cmp(&self.name(&b.card).to_lowercase())
            })
        });
        sorted
    }
}

/// A distinct drafted card with its count
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortedCard {
    pub mana: u32,
    pub card: String,
    pub multiplicity: u32,
}

/// Builds image URLs under one asset root
#[derive(Debug, Clone)]
pub struct AssetUrls {
    base: String,
}

impl Default for AssetUrls {
    fn default() -> Self {
        Self::new("https://s3.amazonaws.com/draftwithme")
    }
}

impl AssetUrls {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn full_card(&self, card_id: &str) -> String {
        if card_id.is_empty() {
            format!("{}/full_cards/blank_card.png", self.base)
        } else {
            format!("{}/full_cards/{}.png", self.base, card_id)
        }
    }

    pub fn hero(&self, hero_id: &str) -> String {
        let hero_id = if is_valid_hero(hero_id) {
            hero_id
        } else {
            "no_hero"
        };
        format!("{}/heroes/{}.png", self.base, hero_id)
    }

    pub fn card_bar(&self, card_id: &str) -> String {
        format!("{}/bar_cards/{}.png", self.base, card_id)
    }

    pub fn mana(&self, mana: u32) -> String {
        if mana <= 10 || mana == 12 || mana == 25 {
            format!("{}/mana/{}.png", self.base, mana)
        } else {
            format!("{}/mana/blank_mana.png", self.base)
        }
    }

    pub fn multiplicity(&self, multiplicity: u32) -> String {
        if multiplicity <= 5 {
            format!("{}/multiplicity/{}.png", self.base, multiplicity)
        } else {
            format!("{}/multiplicity/blank_mult.png", self.base)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CARDS: &str = r#"[
        {"id": "CS2_029", "cost": 4, "name": "Fireball"},
        {"id": "CS2_032", "cost": 7, "name": "Flamestrike"},
        {"id": "EX1_277", "cost": 1, "name": "Arcane Missiles"},
        {"id": "CS2_025", "cost": 2, "name": "arcane Explosion"},
        {"id": "CS2_023", "cost": 2, "name": "Arcane Intellect"},
        {"id": "HERO_08", "name": "Jaina Proudmoore"}
    ]"#;

    fn catalog() -> CardCatalog {
        CardCatalog::from_json_str(CARDS).unwrap()
    }

    #[test]
    fn test_load_skips_cards_without_cost() {
        let catalog = catalog();
        assert_eq!(catalog.len(), 5);
        assert_eq!(catalog.mana("CS2_029"), 4);
        assert_eq!(catalog.mana("HERO_08"), 0);
        assert_eq!(catalog.name("UNKNOWN"), "UNKNOWN");
    }

    #[test]
    fn test_invalid_json() {
        assert!(CardCatalog::from_json_str("{").is_err());
    }

    #[test]
    fn test_sort_cards_by_mana_then_name() {
        let catalog = catalog();
        let drafted: Vec<String> = ["CS2_032", "CS2_023", "CS2_029", "CS2_025", "CS2_029", "EX1_277"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let sorted = catalog.sort_cards(&drafted);
        let order: Vec<&str> = sorted.iter().map(|c| c.card.as_str()).collect();
        assert_eq!(order, vec!["EX1_277", "CS2_025", "CS2_023", "CS2_029", "CS2_032"]);

        let fireball = sorted.iter().find(|c| c.card == "CS2_029").unwrap();
        assert_eq!(fireball.multiplicity, 2);
        assert_eq!(fireball.mana, 4);
    }

    #[test]
    fn test_asset_urls() {
        let urls = AssetUrls::new("https://cdn.test/");
        assert_eq!(urls.full_card("CS2_029"), "https://cdn.test/full_cards/CS2_029.png");
        assert_eq!(urls.full_card(""), "https://cdn.test/full_cards/blank_card.png");
        assert_eq!(urls.hero("mage"), "https://cdn.test/heroes/mage.png");
        assert_eq!(urls.hero("lich"), "https://cdn.test/heroes/no_hero.png");
        assert_eq!(urls.card_bar("CS2_029"), "https://cdn.test/bar_cards/CS2_029.png");
        assert_eq!(urls.mana(10), "https://cdn.test/mana/10.png");
        assert_eq!(urls.mana(12), "https://cdn.test/mana/12.png");
        assert_eq!(urls.mana(11), "https://cdn.test/mana/blank_mana.png");
        assert_eq!(urls.multiplicity(5), "https://cdn.test/multiplicity/5.png");
        assert_eq!(urls.multiplicity(6), "https://cdn.test/multiplicity/blank_mult.png");
    }

    #[test]
    fn test_valid_heroes() {
        assert!(is_valid_hero("warlock"));
        assert!(!is_valid_hero("Warlock"));
        assert!(!is_valid_hero("deathknight"));
    }
}
