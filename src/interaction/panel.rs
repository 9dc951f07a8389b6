//! Info panel and loading screen text, typed out character by character.

use web_time::{Duration, Instant};

/// Reveals a string one character per interval.
#[derive(Debug, Clone)]
pub struct TypingAnimation {
    text: String,
    shown: usize,
    total: usize,
    interval: Duration,
    next_at: Instant,
}

impl TypingAnimation {
    /// Start typing `text` at `now`; the first character appears
    /// immediately.
    #[must_use]
    pub fn start(text: impl Into<String>, interval: Duration, now: Instant) -> Self {
        let mut animation = Self::scheduled(text, interval, now);
        let _ = animation.advance(now);
        animation
    }

    /// Typing that reveals its first character at `at`.
    #[must_use]
    pub fn scheduled(text: impl Into<String>, interval: Duration, at: Instant) -> Self {
        let text = text.into();
        let total = text.chars().count();
        Self {
            text,
            shown: 0,
            total,
            interval,
            next_at: at,
        }
    }

    /// Reveal every character due by `now`. Returns whether any appeared.
    pub fn advance(&mut self, now: Instant) -> bool {
        let before = self.shown;
        while self.shown < self.total && now >= self.next_at {
            self.shown += 1;
            self.next_at += self.interval;
        }
        self.shown != before
    }

    /// Reveal the whole text.
    pub fn complete(&mut self) {
        self.shown = self.total;
    }

    /// Whether every character is shown.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.shown >= self.total
    }

    /// When the last character appeared (or will appear).
    #[must_use]
    pub fn finished_at(&self) -> Instant {
        self.next_at
    }

    /// When the next character appears, or `None` once everything shows.
    #[must_use]
    pub fn next_at(&self) -> Option<Instant> {
        (!self.is_done()).then_some(self.next_at)
    }

    /// Text revealed so far.
    #[must_use]
    pub fn visible(&self) -> &str {
        let end = self
            .text
            .char_indices()
            .nth(self.shown)
            .map_or(self.text.len(), |(i, _)| i);
        &self.text[..end]
    }

    /// Full text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

#[derive(Debug, Clone)]
enum Typing {
    Title(TypingAnimation),
    Body(TypingAnimation),
    Done,
}

/// Contents of an open info panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelContent {
    /// Point label.
    pub title: String,
    /// Point description.
    pub body: String,
    /// Architectural style of the scene's building.
    pub style: String,
    /// Construction period of the scene's building.
    pub period: String,
    /// Which point the panel describes.
    pub point_index: usize,
}

/// Per-scene info panel. Title types first, then the body.
#[derive(Debug, Clone)]
pub struct InfoPanel {
    content: Option<PanelContent>,
    typing: Typing,
    title_interval: Duration,
    body_interval: Duration,
}

impl InfoPanel {
    /// Closed panel with the given typing speeds.
    #[must_use]
    pub fn new(title_interval: Duration, body_interval: Duration) -> Self {
        Self {
            content: None,
            typing: Typing::Done,
            title_interval,
            body_interval,
        }
    }

    /// Show `content`, restarting the typing animation. Any animation in
    /// progress is dropped.
    pub fn open(&mut self, content: PanelContent, now: Instant) {
        self.typing = Typing::Title(TypingAnimation::start(
            content.title.clone(),
            self.title_interval,
            now,
        ));
        self.content = Some(content);
    }

    /// Hide the panel and cancel typing.
    pub fn close(&mut self) {
        self.content = None;
        self.typing = Typing::Done;
    }

    /// Whether the panel is showing.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.content.is_some()
    }

    /// Open panel contents.
    #[must_use]
    pub fn content(&self) -> Option<&PanelContent> {
        self.content.as_ref()
    }

    /// Advance typing to `now`. Returns whether visible text changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        match &mut self.typing {
            Typing::Done => false,
            Typing::Body(body) => body.advance(now),
            Typing::Title(title) => {
                let changed = title.advance(now);
                if !title.is_done() {
                    return changed;
                }
                // Body starts one title interval after the last title
                // character.
                let start = title.finished_at();
                let body = self.content.as_ref().map(|c| c.body.clone()).unwrap_or_default();
                let mut animation =
                    TypingAnimation::scheduled(body, self.body_interval, start);
                let _ = animation.advance(now);
                self.typing = Typing::Body(animation);
                true
            }
        }
    }

    /// Show all text at once.
    pub fn complete_typing(&mut self) {
        if self.content.is_some() {
            self.typing = Typing::Done;
        }
    }

    /// Whether text is still being typed.
    #[must_use]
    pub fn is_typing(&self) -> bool {
        match &self.typing {
            Typing::Done => false,
            Typing::Title(_) => true,
            Typing::Body(body) => !body.is_done(),
        }
    }

    /// When typing next changes the visible text.
    #[must_use]
    pub fn next_at(&self) -> Option<Instant> {
        match &self.typing {
            Typing::Done => None,
            // A finished title still owes the switch to the body.
            Typing::Title(title) => Some(title.finished_at()),
            Typing::Body(body) => body.next_at(),
        }
    }

    /// Title as currently shown.
    #[must_use]
    pub fn visible_title(&self) -> &str {
        match (&self.typing, &self.content) {
            (Typing::Title(title), _) => title.visible(),
            (_, Some(content)) => &content.title,
            (_, None) => "",
        }
    }

    /// Body as currently shown.
    #[must_use]
    pub fn visible_body(&self) -> &str {
        match (&self.typing, &self.content) {
            (Typing::Title(_), _) | (_, None) => "",
            (Typing::Body(body), _) => body.visible(),
            (Typing::Done, Some(content)) => &content.body,
        }
    }
}

/// Loading indicator with a typed historical fact.
#[derive(Debug, Clone)]
pub struct LoadingScreen {
    visible: bool,
    fact: Option<TypingAnimation>,
    interval: Duration,
}

impl LoadingScreen {
    /// Hidden screen typing facts at `interval` per character.
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            visible: false,
            fact: None,
            interval,
        }
    }

    /// Show the screen, typing `fact` if given.
    pub fn show(&mut self, fact: Option<&str>, now: Instant) {
        self.visible = true;
        self.fact = fact.map(|f| TypingAnimation::start(f, self.interval, now));
    }

    /// Hide the screen and stop typing.
    pub fn hide(&mut self) {
        self.visible = false;
        self.fact = None;
    }

    /// Whether the screen is showing.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Advance typing. Returns whether visible text changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.fact.as_mut().is_some_and(|f| f.advance(now))
    }

    /// When the next fact character appears.
    #[must_use]
    pub fn next_at(&self) -> Option<Instant> {
        self.fact.as_ref().and_then(TypingAnimation::next_at)
    }

    /// Fact text as currently shown.
    #[must_use]
    pub fn text(&self) -> &str {
        self.fact.as_ref().map_or("", TypingAnimation::visible)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    fn content() -> PanelContent {
        PanelContent {
            title: "Apse".into(),
            body: "Semicircular".into(),
            style: "Romanesque".into(),
            period: "1100".into(),
            point_index: 0,
        }
    }

    #[test]
    fn typing_reveals_one_char_per_interval() {
        let now = Instant::now();
        let mut typing = TypingAnimation::start("héllo", MS * 10, now);
        assert_eq!(typing.visible(), "h");
        assert!(typing.advance(now + MS * 10));
        assert_eq!(typing.visible(), "hé");
        assert!(!typing.advance(now + MS * 15));
        let _ = typing.advance(now + MS * 1000);
        assert_eq!(typing.visible(), "héllo");
        assert!(typing.is_done());
    }

    #[test]
    fn panel_types_title_then_body() {
        let now = Instant::now();
        let mut panel = InfoPanel::new(MS * 40, MS * 20);
        panel.open(content(), now);
        assert!(panel.is_open());
        assert_eq!(panel.visible_title(), "A");
        assert_eq!(panel.visible_body(), "");
        assert_eq!(panel.next_at(), Some(now + MS * 40));

        let _ = panel.tick(now + MS * 120);
        assert_eq!(panel.visible_title(), "Apse");
        assert_eq!(panel.visible_body(), "");

        let _ = panel.tick(now + MS * 160);
        assert_eq!(panel.visible_title(), "Apse");
        assert_eq!(panel.visible_body(), "S");

        let _ = panel.tick(now + MS * 10_000);
        assert_eq!(panel.visible_body(), "Semicircular");
        assert!(!panel.is_typing());
        assert_eq!(panel.next_at(), None);
    }

    #[test]
    fn complete_typing_shows_everything() {
        let now = Instant::now();
        let mut panel = InfoPanel::new(MS * 40, MS * 20);
        panel.open(content(), now);
        panel.complete_typing();
        assert_eq!(panel.visible_title(), "Apse");
        assert_eq!(panel.visible_body(), "Semicircular");
        assert!(!panel.tick(now + MS * 1000));
    }

    #[test]
    fn close_cancels_typing() {
        let now = Instant::now();
        let mut panel = InfoPanel::new(MS * 40, MS * 20);
        panel.open(content(), now);
        panel.close();
        assert!(!panel.is_open());
        assert!(!panel.is_typing());
        assert_eq!(panel.visible_title(), "");
    }

    #[test]
    fn loading_screen_types_fact() {
        let now = Instant::now();
        let mut loading = LoadingScreen::new(MS * 30);
        loading.show(Some("Stone"), now);
        assert!(loading.is_visible());
        assert_eq!(loading.text(), "S");
        let _ = loading.tick(now + MS * 200);
        assert_eq!(loading.text(), "Stone");
        assert_eq!(loading.next_at(), None);
        loading.hide();
        assert!(!loading.is_visible());
        assert_eq!(loading.text(), "");
    }
}
