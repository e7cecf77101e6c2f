//! Viewer
//!
//! In-memory model of the viewer page plus the operations that patch it.
//! Every change bumps a revision counter published on a `watch` channel so a
//! renderer can redraw.

mod chart;
mod render;
mod state;

pub use chart::{bucket_manas, ChartOptions, DataPoint, ManaChart, BUCKET_COUNT, BUCKET_LABELS};
pub use render::render_text;
pub use state::{DraftedItem, ImageElement, ImageSlot, ViewerState, CARD_SLOTS};

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, RwLock};

use crate::realtime::{CardsUpdated, DraftedEntry, DraftedUpdated, HeroUpdated, ServerEvent};
use crate::session::ViewerPage;

/// Viewer behaviour settings
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    /// Shown in an image slot while the new image is on its way
    pub placeholder_image: String,
    /// How long the placeholder stays before the new image is swapped in
    pub image_swap_delay: Duration,
    pub chart: ChartOptions,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            placeholder_image: "/static/img/animate.svg".to_string(),
            image_swap_delay: Duration::from_millis(1250),
            chart: ChartOptions::default(),
        }
    }
}

/// Shared handle to the viewer model
#[derive(Clone)]
pub struct Viewer {
    state: Arc<RwLock<ViewerState>>,
    config: Arc<ViewerConfig>,
    revision_tx: Arc<watch::Sender<u64>>,
}

impl Viewer {
    pub fn new(config: ViewerConfig) -> Self {
        let (revision_tx, _) = watch::channel(0);
        Self {
            state: Arc::new(RwLock::new(ViewerState::default())),
            config: Arc::new(config),
            revision_tx: Arc::new(revision_tx),
        }
    }

    /// Receiver that fires on every change
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision_tx.subscribe()
    }

    /// Copy of the current model
    pub async fn snapshot(&self) -> ViewerState {
        self.state.read().await.clone()
    }

    pub async fn render(&self) -> String {
        render_text(&*self.state.read().await)
    }

    async fn mutate<F>(&self, f: F)
    where
        F: FnOnce(&mut ViewerState),
    {
        let revision = {
            let mut state = self.state.write().await;
            f(&mut state);
            state.revision += 1;
            state.last_updated = Some(chrono::Utc::now());
            state.revision
        };
        self.revision_tx.send_replace(revision);
    }

    pub async fn set_viewer_link(&self, url: String) {
        self.mutate(|state| state.viewer_link = Some(url)).await;
    }

    /// Put a fresh, all-zero chart in place
    pub async fn init_chart(&self) {
        let options = self.config.chart.clone();
        self.mutate(|state| state.chart = Some(ManaChart::new(options)))
            .await;
    }

    /// Show the placeholder now and swap in `url` after the configured delay
    pub async fn update_image(&self, slot: ImageSlot, url: String) {
        let placeholder = self.config.placeholder_image.clone();
        self.mutate(|state| state.image_mut(slot).src = placeholder)
            .await;

        let viewer = self.clone();
        let delay = self.config.image_swap_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            viewer
                .mutate(|state| state.image_mut(slot).src = url)
                .await;
        });
    }

    /// Recompute the chart and drafted counter from a list of mana costs
    pub async fn update_chart(&self, manas: &[u32]) {
        let options = self.config.chart.clone();
        self.mutate(|state| {
            state
                .chart
                .get_or_insert_with(|| ManaChart::new(options))
                .update(manas);
            state.num_drafted = Some(ViewerState::drafted_label(manas.len()));
        })
        .await;
    }

    /// Fill the model from a viewer page in one step.
    ///
    /// Images are set directly, without the placeholder swap.
    pub async fn load_page(&self, page: &ViewerPage) {
        let options = self.config.chart.clone();
        self.mutate(|state| {
            for (slot, url) in CARD_SLOTS.iter().zip(&page.cards) {
                state.image_mut(*slot).src = url.clone();
            }
            state.hero.src = page.hero.clone();
            state.drafted = drafted_items(&page.drafted);

            let mut chart = ManaChart::new(options);
            chart.update(&page.manas);
            state.chart = Some(chart);
            state.num_drafted = Some(ViewerState::drafted_label(page.manas.len()));
            state.finished = page.finished;
        })
        .await;
    }

    /// Apply a real-time event. Returns false when the event was ignored.
    pub async fn apply(&self, event: &ServerEvent) -> bool {
        match event {
            ServerEvent::CardsUpdated(CardsUpdated { cards: Some(cards) }) if cards.len() == 3 => {
                for (slot, url) in CARD_SLOTS.iter().zip(cards) {
                    self.update_image(*slot, url.clone()).await;
                }
                true
            }
            ServerEvent::HeroUpdated(HeroUpdated { hero: Some(hero) }) => {
                self.update_image(ImageSlot::Hero, hero.clone()).await;
                true
            }
            ServerEvent::DraftedUpdated(DraftedUpdated {
                drafted: Some(drafted),
                manas,
            }) => {
                let items = drafted_items(drafted);
                self.mutate(|state| state.drafted = items).await;

                if let Some(manas) = manas {
                    self.update_chart(manas).await;
                }
                true
            }
            ServerEvent::DraftFinished => {
                self.mutate(|state| state.finished = true).await;
                true
            }
            other => {
                tracing::debug!(event = %other.name(), "Ignoring event");
                false
            }
        }
    }
}

fn drafted_items(entries: &[DraftedEntry]) -> Vec<DraftedItem> {
    entries
        .iter()
        .map(|entry| DraftedItem {
            tooltip: format!("<img src='{}'>", entry.full),
            tooltip_placement: "left",
            images: [
                entry.mana.clone(),
                entry.card.clone(),
                entry.multiplicity.clone(),
            ],
        })
        .collect()
}

impl Default for Viewer {
    fn default() -> Self {
        Self::new(ViewerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::realtime::DraftedEntry;

    fn fast_viewer() -> Viewer {
        Viewer::new(ViewerConfig {
            image_swap_delay: Duration::from_millis(10),
            ..Default::default()
        })
    }

    fn cards_event(count: usize) -> ServerEvent {
        ServerEvent::CardsUpdated(CardsUpdated {
            cards: Some((0..count).map(|i| format!("card{}.png", i)).collect()),
        })
    }

    #[tokio::test]
    async fn test_update_image_shows_placeholder_then_url() {
        let viewer = fast_viewer();
        viewer
            .update_image(ImageSlot::Hero, "mage.png".to_string())
            .await;

        let state = viewer.snapshot().await;
        assert_eq!(state.hero.src, "/static/img/animate.svg");

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(viewer.snapshot().await.hero.src, "mage.png");
    }

    #[tokio::test]
    async fn test_cards_updated_requires_three() {
        let viewer = fast_viewer();
        assert!(!viewer.apply(&cards_event(2)).await);
        assert!(!viewer
            .apply(&ServerEvent::CardsUpdated(CardsUpdated { cards: None }))
            .await);
        assert!(viewer.apply(&cards_event(3)).await);

        tokio::time::sleep(Duration::from_millis(100)).await;
        let state = viewer.snapshot().await;
        assert_eq!(state.cards[0].src, "card0.png");
        assert_eq!(state.cards[2].src, "card2.png");
    }

    #[tokio::test]
    async fn test_hero_updated_requires_hero() {
        let viewer = fast_viewer();
        assert!(!viewer
            .apply(&ServerEvent::HeroUpdated(HeroUpdated { hero: None }))
            .await);
        assert_eq!(viewer.snapshot().await.revision, 0);
    }

    #[tokio::test]
    async fn test_drafted_updated_rebuilds_list_and_chart() {
        let viewer = fast_viewer();
        let entry = DraftedEntry {
            mana: "m2.png".to_string(),
            card: "bar.png".to_string(),
            multiplicity: "x1.png".to_string(),
            full: "full.png".to_string(),
        };

        let event = ServerEvent::DraftedUpdated(DraftedUpdated {
            drafted: Some(vec![entry.clone(), entry]),
            manas: Some(vec![2, 2, 9]),
        });
        assert!(viewer.apply(&event).await);

        let state = viewer.snapshot().await;
        assert_eq!(state.drafted.len(), 2);
        assert_eq!(state.drafted[0].tooltip, "<img src='full.png'>");
        assert_eq!(state.drafted[0].images[1], "bar.png");
        assert_eq!(state.num_drafted.as_deref(), Some("Number Drafted: 3"));

        let chart = state.chart.unwrap();
        assert_eq!(chart.points()[2].y, 2);
        assert_eq!(chart.points()[7].y, 1);
    }

    #[tokio::test]
    async fn test_drafted_updated_without_manas_keeps_counter() {
        let viewer = fast_viewer();
        viewer.update_chart(&[1, 2]).await;

        let event = ServerEvent::DraftedUpdated(DraftedUpdated {
            drafted: Some(vec![]),
            manas: None,
        });
        assert!(viewer.apply(&event).await);

        let state = viewer.snapshot().await;
        assert!(state.drafted.is_empty());
        assert_eq!(state.num_drafted.as_deref(), Some("Number Drafted: 2"));
    }

    #[tokio::test]
    async fn test_draft_finished_and_unknown() {
        let viewer = fast_viewer();
        assert!(!viewer.apply(&ServerEvent::Unknown("chat".into())).await);
        assert!(viewer.apply(&ServerEvent::DraftFinished).await);
        assert!(viewer.snapshot().await.finished);
    }

    #[tokio::test]
    async fn test_load_page_fills_everything_at_once() {
        let viewer = fast_viewer();
        let page = ViewerPage {
            session_id: "s".to_string(),
            hero: "mage.png".to_string(),
            cards: vec!["a.png".into(), "b.png".into(), "c.png".into()],
            drafted: vec![DraftedEntry {
                mana: "m4.png".to_string(),
                card: "bar.png".to_string(),
                multiplicity: "x2.png".to_string(),
                full: "full.png".to_string(),
            }],
            manas: vec![4, 4],
            finished: false,
        };

        viewer.load_page(&page).await;

        let state = viewer.snapshot().await;
        assert_eq!(state.revision, 1);
        assert_eq!(state.hero.src, "mage.png");
        assert_eq!(state.cards[1].src, "b.png");
        assert_eq!(state.drafted[0].images[0], "m4.png");
        assert_eq!(state.num_drafted.as_deref(), Some("Number Drafted: 2"));
        assert_eq!(state.chart.unwrap().points()[4].y, 2);
        assert!(!state.finished);
    }

    #[tokio::test]
    async fn test_revision_notifications() {
        let viewer = fast_viewer();
        let mut rx = viewer.subscribe();

        viewer.init_chart().await;
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), 1);

        viewer
            .set_viewer_link("http://localhost/viewer/x".to_string())
            .await;
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), 2);
    }
}
