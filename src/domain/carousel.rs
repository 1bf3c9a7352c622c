//! Ephemeral slide state for the home screen carousel and banner.

/// Horizontal drag distance, in pixels, that counts as a swipe.
pub const SWIPE_THRESHOLD_PX: i32 = 50;

/// Banner autoplay interval in milliseconds.
pub const BANNER_INTERVAL_MS: u64 = 3500;

/// Swipeable carousel. The index is clamped to the slide list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Carousel {
    index: usize,
    len: usize,
    drag_start: Option<i32>,
    drag_delta: i32,
}

impl Carousel {
    pub fn new(len: usize) -> Self {
        Self {
            len,
            ..Self::default()
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Called when the backing list changes. The index goes back to zero if
    /// it no longer points at a slide.
    pub fn set_len(&mut self, len: usize) {
        self.len = len;
        if self.index >= len {
            self.index = 0;
        }
    }

    /// Applies a completed gesture. Past the threshold the index moves by
    /// exactly one: a leftward drag (negative delta) goes forward.
    pub fn swipe(&mut self, delta: i32) {
        if self.len == 0 {
            return;
        }
        if delta > SWIPE_THRESHOLD_PX {
            self.index = self.index.saturating_sub(1);
        } else if delta < -SWIPE_THRESHOLD_PX {
            self.index = (self.index + 1).min(self.len - 1);
        }
    }

    pub fn next(&mut self) {
        self.swipe(-(SWIPE_THRESHOLD_PX + 1));
    }

    pub fn previous(&mut self) {
        self.swipe(SWIPE_THRESHOLD_PX + 1);
    }

    /// Jumps straight to a slide, as the dot indicators do.
    pub fn select(&mut self, index: usize) {
        if index < self.len {
            self.index = index;
        }
    }

    pub fn drag_start(&mut self, x: i32) {
        self.drag_start = Some(x);
        self.drag_delta = 0;
    }

    pub fn drag_move(&mut self, x: i32) {
        if let Some(start) = self.drag_start {
            self.drag_delta = x - start;
        }
    }

    pub fn drag_end(&mut self) {
        if self.drag_start.take().is_some() {
            self.swipe(self.drag_delta);
        }
        self.drag_delta = 0;
    }
}

/// Autoplaying banner. The index wraps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Banner {
    index: usize,
    len: usize,
}

impl Banner {
    pub fn new(len: usize) -> Self {
        Self { index: 0, len }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether a timer should be running at all.
    pub fn should_autoplay(&self) -> bool {
        !self.is_empty()
    }

    pub fn tick(&mut self) {
        if self.len > 0 {
            self.index = (self.index + 1) % self.len;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swipe_left_advances_and_clamps() {
        let mut carousel = Carousel::new(5);
        carousel.swipe(-51);
        assert_eq!(carousel.index(), 1);

        carousel.select(4);
        carousel.swipe(-51);
        assert_eq!(carousel.index(), 4);
    }

    #[test]
    fn test_swipe_right_goes_back_and_clamps() {
        let mut carousel = Carousel::new(5);
        carousel.swipe(120);
        assert_eq!(carousel.index(), 0);

        carousel.select(2);
        carousel.swipe(51);
        assert_eq!(carousel.index(), 1);
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let mut carousel = Carousel::new(5);
        carousel.swipe(-50);
        assert_eq!(carousel.index(), 0);
        carousel.swipe(50);
        assert_eq!(carousel.index(), 0);
    }

    #[test]
    fn test_large_swipe_moves_one() {
        let mut carousel = Carousel::new(5);
        carousel.swipe(-500);
        assert_eq!(carousel.index(), 1);
    }

    #[test]
    fn test_drag_gesture() {
        let mut carousel = Carousel::new(3);
        carousel.drag_start(200);
        carousel.drag_move(180);
        carousel.drag_move(120);
        carousel.drag_end();
        assert_eq!(carousel.index(), 1);

        // a release without a press is ignored
        carousel.drag_move(0);
        carousel.drag_end();
        assert_eq!(carousel.index(), 1);
    }

    #[test]
    fn test_shrinking_list_resets_index() {
        let mut carousel = Carousel::new(5);
        carousel.select(4);
        carousel.set_len(3);
        assert_eq!(carousel.index(), 0);

        carousel.select(2);
        carousel.set_len(4);
        assert_eq!(carousel.index(), 2);
    }

    #[test]
    fn test_empty_carousel_is_inert() {
        let mut carousel = Carousel::new(0);
        carousel.swipe(-100);
        carousel.select(0);
        assert_eq!(carousel.index(), 0);
        assert!(carousel.is_empty());
    }

    #[test]
    fn test_banner_wraps() {
        let mut banner = Banner::new(3);
        assert_eq!(banner.len(), 3);
        assert!(banner.should_autoplay());
        banner.tick();
        banner.tick();
        assert_eq!(banner.index(), 2);
        banner.tick();
        assert_eq!(banner.index(), 0);
    }

    #[test]
    fn test_empty_banner_does_not_autoplay() {
        let mut banner = Banner::new(0);
        assert!(!banner.should_autoplay());
        banner.tick();
        assert_eq!(banner.index(), 0);
    }
}
