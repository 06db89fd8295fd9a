//! Lightbox over one image sequence at a time.
//!
//! Navigation wraps in both directions, but the previous/next controls are
//! hidden on the first/last image. Both behaviours are observable and kept.

use std::sync::Arc;

use crate::gallery::ImageEntry;

#[derive(Debug, Clone, Default, PartialEq)]
pub enum LightboxState {
    #[default]
    Closed,
    Open {
        sequence: Arc<[ImageEntry]>,
        index: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    ArrowLeft,
    ArrowRight,
    Other,
}

/// Inputs the overlay reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightboxEvent {
    PrevClicked,
    NextClicked,
    CloseClicked,
    /// Click on the overlay outside the image.
    BackdropClicked,
    KeyPressed(Key),
}

/// What the overlay shows for the current state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LightboxView {
    pub src: String,
    pub alt: String,
    pub caption: String,
    pub show_prev: bool,
    pub show_next: bool,
}

#[derive(Debug, Default)]
pub struct Lightbox {
    state: LightboxState,
}

impl Lightbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, LightboxState::Open { .. })
    }

    /// Show `sequence` at `index`, replacing whatever was open before.
    /// An index past the end lands on the last image.
    pub fn open(&mut self, sequence: Arc<[ImageEntry]>, index: usize) {
        let index = index.min(sequence.len().saturating_sub(1));
        self.state = LightboxState::Open { sequence, index };
    }

    pub fn close(&mut self) {
        self.state = LightboxState::Closed;
    }

    pub fn next(&mut self) {
        self.step(1);
    }

    pub fn prev(&mut self) {
        self.step(-1);
    }

    fn step(&mut self, direction: isize) {
        if let LightboxState::Open { sequence, index } = &mut self.state {
            let len = sequence.len();
            if len == 0 {
                return;
            }
            *index = (*index as isize + direction).rem_euclid(len as isize) as usize;
        }
    }

    pub fn handle(&mut self, event: LightboxEvent) {
        match event {
            LightboxEvent::PrevClicked => self.prev(),
            LightboxEvent::NextClicked => self.next(),
            LightboxEvent::CloseClicked | LightboxEvent::BackdropClicked => self.close(),
            LightboxEvent::KeyPressed(key) => {
                if !self.is_open() {
                    return;
                }
                match key {
                    Key::Escape => self.close(),
                    Key::ArrowLeft => self.prev(),
                    Key::ArrowRight => self.next(),
                    Key::Other => {}
                }
            }
        }
    }

    /// `None` while closed or when the open sequence is empty.
    pub fn view(&self) -> Option<LightboxView> {
        let LightboxState::Open { sequence, index } = &self.state else {
            return None;
        };
        let entry = sequence.get(*index)?;
        let len = sequence.len();
        Some(LightboxView {
            src: entry.path.clone(),
            alt: format!("Image {} of {len}", index + 1),
            caption: format!("{} / {len}", index + 1),
            show_prev: *index > 0,
            show_next: *index + 1 < len,
        })
    }
}
