//! Window input translated into effect actions.
//!
//! [`Input`] turns raw winit events into the handful of things the effect
//! cares about: where the pointer is, whether contact ended, and the text
//! typed straight into the window. Positions are reported in logical pixels,
//! the same space the particles live in.

use glam::Vec2;
use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, KeyEvent, TouchPhase, WindowEvent};
use winit::keyboard::{Key, NamedKey};

/// Longest draft accepted from the keyboard.
pub(crate) const MAX_DRAFT_LEN: usize = 64;

/// Something the simulation should react to.
#[derive(Debug, Clone, PartialEq)]
pub enum InputAction {
    /// Pointer or touch contact at a logical position.
    PointerMoved(Vec2),
    /// Contact ended or the cursor left the window.
    PointerReleased,
    /// Enter pressed with a non-empty draft.
    Submit(String),
    /// The draft changed.
    DraftChanged,
    /// Escape pressed.
    TogglePause,
}

/// Pointer, touch and keyboard state of the window.
#[derive(Debug)]
pub struct Input {
    scale_factor: f64,
    touch_enabled: bool,
    // Only the first finger down steers the pointer.
    active_touch: Option<u64>,
    draft: String,
}

impl Input {
    pub fn new(touch_enabled: bool) -> Self {
        Self {
            scale_factor: 1.0,
            touch_enabled,
            active_touch: None,
            draft: String::new(),
        }
    }

    pub fn set_scale_factor(&mut self, scale_factor: f64) {
        if scale_factor > 0.0 {
            self.scale_factor = scale_factor;
        }
    }

    /// Text typed so far.
    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, text: &str) {
        self.draft.clear();
        self.type_text(text);
    }

    /// Process a winit window event.
    pub fn handle_event(&mut self, event: &WindowEvent) -> Option<InputAction> {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                Some(InputAction::PointerMoved(self.to_logical(*position)))
            }
            WindowEvent::CursorLeft { .. } => Some(InputAction::PointerReleased),
            WindowEvent::Touch(touch) => self.touch(touch.id, touch.phase, touch.location),
            WindowEvent::KeyboardInput { event, .. } => self.key(event),
            _ => None,
        }
    }

    fn to_logical(&self, position: PhysicalPosition<f64>) -> Vec2 {
        let logical = position.to_logical::<f64>(self.scale_factor);
        Vec2::new(logical.x as f32, logical.y as f32)
    }

    fn touch(&mut self, id: u64, phase: TouchPhase, location: PhysicalPosition<f64>) -> Option<InputAction> {
        if !self.touch_enabled {
            return None;
        }
        match phase {
            TouchPhase::Started => {
                if self.active_touch.is_some() {
                    return None;
                }
                self.active_touch = Some(id);
                Some(InputAction::PointerMoved(self.to_logical(location)))
            }
            TouchPhase::Moved if self.active_touch == Some(id) => {
                Some(InputAction::PointerMoved(self.to_logical(location)))
            }
            TouchPhase::Ended | TouchPhase::Cancelled if self.active_touch == Some(id) => {
                self.active_touch = None;
                Some(InputAction::PointerReleased)
            }
            _ => None,
        }
    }

    fn key(&mut self, event: &KeyEvent) -> Option<InputAction> {
        if event.state != ElementState::Pressed {
            return None;
        }
        match &event.logical_key {
            Key::Named(NamedKey::Enter) => self.submit(),
            Key::Named(NamedKey::Backspace) => self.backspace(),
            Key::Named(NamedKey::Escape) if !event.repeat => Some(InputAction::TogglePause),
            _ => {
                let text = event.text.as_ref()?;
                self.type_text(text)
            }
        }
    }

    pub(crate) fn type_text(&mut self, text: &str) -> Option<InputAction> {
        let before = self.draft.chars().count();
        let room = MAX_DRAFT_LEN.saturating_sub(before);
        self.draft
            .extend(text.chars().filter(|c| !c.is_control()).take(room));
        (self.draft.chars().count() != before).then_some(InputAction::DraftChanged)
    }

    fn backspace(&mut self) -> Option<InputAction> {
        self.draft.pop().map(|_| InputAction::DraftChanged)
    }

    fn submit(&mut self) -> Option<InputAction> {
        if self.draft.is_empty() {
            return None;
        }
        Some(InputAction::Submit(self.draft.clone()))
    }
}

impl Default for Input {
    fn default() -> Self {
        Self::new(true)
    }
}
