//! Home screen state: restaurant list, carousel and banner.

use serde_json::Value;
use tracing::{info, warn};

use super::commands::Command;
use crate::domain::{
    normalize_listings, Banner, Carousel, RestaurantListing, FALLBACK_IMAGES,
};
use crate::infrastructure::api::ApiError;

/// Number of listings shown in the carousel.
pub const CAROUSEL_SLIDES: usize = 5;

pub const FETCH_FAILED: &str = "Failed to fetch restaurants.";

/// Banner images are the back half of the placeholder pool.
pub fn banner_images() -> &'static [&'static str] {
    &FALLBACK_IMAGES[5..10]
}

/// Display price for the `index`th popular restaurant.
pub fn display_price(index: usize) -> String {
    format!("₹{}", 100 + 20 * index)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Loaded,
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct HomeScreen {
    pub listings: Vec<RestaurantListing>,
    pub load: LoadState,
    pub carousel: Carousel,
    pub banner: Banner,
    /// Highlighted row in the popular list.
    pub selected: usize,
    /// Listing whose detail pane is open.
    pub detail: Option<usize>,
    token: Option<String>,
}

impl HomeScreen {
    /// Creates the screen and the fetch for its data.
    pub fn mount(token: Option<String>) -> (Self, Vec<Command>) {
        let screen = Self {
            listings: Vec::new(),
            load: LoadState::Loading,
            carousel: Carousel::new(CAROUSEL_SLIDES),
            banner: Banner::new(banner_images().len()),
            selected: 0,
            detail: None,
            token,
        };
        let fetch = screen.fetch_command();
        (screen, vec![fetch])
    }

    fn fetch_command(&self) -> Command {
        Command::FetchRestaurants {
            token: self.token.clone(),
        }
    }

    /// Re-fetches on explicit request. Ignored while a fetch is running.
    pub fn refresh(&mut self) -> Vec<Command> {
        if self.load == LoadState::Loading {
            return Vec::new();
        }
        self.load = LoadState::Loading;
        vec![self.fetch_command()]
    }

    pub fn on_restaurants(&mut self, result: Result<Vec<Value>, ApiError>) {
        match result {
            Ok(records) => {
                self.listings = normalize_listings(&records);
                self.load = LoadState::Loaded;
                info!(count = self.listings.len(), "restaurants loaded");
            }
            Err(e) => {
                warn!(error = %e, "failed to fetch restaurants");
                self.load = LoadState::Failed(FETCH_FAILED.to_string());
            }
        }

        self.carousel.set_len(self.slides().len());
        if self.selected >= self.listings.len() {
            self.selected = 0;
        }
        self.detail = None;
    }

    /// Carousel slides: the first few listings, or suggestions when there
    /// are none.
    pub fn slides(&self) -> Vec<RestaurantListing> {
        if self.listings.is_empty() {
            (0..CAROUSEL_SLIDES).map(RestaurantListing::suggested).collect()
        } else {
            self.listings.iter().take(CAROUSEL_SLIDES).cloned().collect()
        }
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.listings.len() {
            self.selected += 1;
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn open_selected(&mut self) {
        if self.selected < self.listings.len() {
            self.detail = Some(self.selected);
        }
    }

    /// Opens the listing behind the current carousel slide, if it is real.
    pub fn open_slide(&mut self) {
        let index = self.carousel.index();
        if index < self.listings.len() {
            self.selected = index;
            self.detail = Some(index);
        }
    }

    pub fn close_detail(&mut self) {
        self.detail = None;
    }

    pub fn detail_listing(&self) -> Option<&RestaurantListing> {
        self.detail.and_then(|i| self.listings.get(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn loaded(count: usize) -> HomeScreen {
        let (mut home, _) = HomeScreen::mount(None);
        let records: Vec<Value> = (0..count)
            .map(|i| json!({"restaurant_id": format!("id{}", i), "restaurant_name": format!("R{}", i)}))
            .collect();
        home.on_restaurants(Ok(records));
        home
    }

    #[test]
    fn test_mount_requests_listing_with_token() {
        let (home, commands) = HomeScreen::mount(Some("tok".to_string()));
        assert_eq!(home.load, LoadState::Loading);
        assert_eq!(
            commands,
            vec![Command::FetchRestaurants {
                token: Some("tok".to_string())
            }]
        );
    }

    #[test]
    fn test_loaded_listing_feeds_carousel() {
        let home = loaded(8);
        assert_eq!(home.load, LoadState::Loaded);
        assert_eq!(home.listings.len(), 8);
        let slides = home.slides();
        assert_eq!(slides.len(), CAROUSEL_SLIDES);
        assert_eq!(slides[0].name, "R0");
        assert_eq!(home.carousel.len(), CAROUSEL_SLIDES);
    }

    #[test]
    fn test_short_listing_shrinks_carousel() {
        let (mut home, _) = HomeScreen::mount(None);
        home.carousel.select(4);
        home.on_restaurants(Ok(vec![json!({}), json!({})]));
        assert_eq!(home.carousel.len(), 2);
        assert_eq!(home.carousel.index(), 0);
    }

    #[test]
    fn test_empty_listing_uses_suggestions() {
        let home = loaded(0);
        let slides = home.slides();
        assert_eq!(slides.len(), CAROUSEL_SLIDES);
        assert_eq!(slides[2].id, "fallback-2");
        assert_eq!(slides[2].image_url, FALLBACK_IMAGES[2]);
        assert_eq!(slides[2].address, "Connaught Place");
    }

    #[test]
    fn test_fetch_failure_sets_message() {
        let (mut home, _) = HomeScreen::mount(None);
        home.on_restaurants(Err(ApiError::Transport("timed out".to_string())));
        assert_eq!(home.load, LoadState::Failed(FETCH_FAILED.to_string()));
        assert!(home.listings.is_empty());
    }

    #[test]
    fn test_refresh_only_when_idle() {
        let (mut home, _) = HomeScreen::mount(None);
        assert!(home.refresh().is_empty());

        home.on_restaurants(Err(ApiError::Transport("x".to_string())));
        assert_eq!(home.refresh().len(), 1);
        assert_eq!(home.load, LoadState::Loading);
    }

    #[test]
    fn test_selection_and_detail() {
        let mut home = loaded(3);
        home.select_previous();
        assert_eq!(home.selected, 0);
        home.select_next();
        home.select_next();
        home.select_next();
        assert_eq!(home.selected, 2);

        home.open_selected();
        assert_eq!(home.detail_listing().map(|l| l.id.as_str()), Some("id2"));
        home.close_detail();
        assert!(home.detail_listing().is_none());
    }

    #[test]
    fn test_open_slide_ignores_suggestions() {
        let mut home = loaded(0);
        home.open_slide();
        assert!(home.detail.is_none());

        let mut home = loaded(3);
        home.carousel.next();
        home.open_slide();
        assert_eq!(home.detail, Some(1));
        assert_eq!(home.selected, 1);
    }

    #[test]
    fn test_banner_and_prices() {
        assert_eq!(banner_images(), &FALLBACK_IMAGES[5..10]);
        assert_eq!(display_price(0), "₹100");
        assert_eq!(display_price(3), "₹160");
    }
}
