use crate::application::{App, Command, Screen, Step};
use crossterm::event::{KeyCode, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

/// Terminal columns are converted to pixels at this width so drag gestures
/// share the swipe threshold.
pub const PIXELS_PER_COLUMN: i32 = 8;

pub struct InputHandler;

impl InputHandler {
    /// Applies a key press and returns the commands it produced.
    pub fn handle_key_event(app: &mut App, key: KeyCode, modifiers: KeyModifiers) -> Vec<Command> {
        if modifiers.contains(KeyModifiers::CONTROL) && key == KeyCode::Char('c') {
            app.quit();
            return Vec::new();
        }

        if app.help_visible {
            Self::handle_help_mode(app, key);
            return Vec::new();
        }
        if key == KeyCode::F(1) {
            app.toggle_help();
            return Vec::new();
        }

        match app.screen {
            Screen::Register => match app.flow.step {
                Step::EnteringPhone => Self::handle_phone_step(app, key),
                Step::EnteringOtp => Self::handle_otp_step(app, key),
            },
            Screen::Home => Self::handle_home(app, key, modifiers),
        }
    }

    pub fn handle_paste(app: &mut App, text: &str) {
        if app.screen == Screen::Register && app.flow.step == Step::EnteringPhone {
            app.flow.paste_phone(text);
        } else if app.screen == Screen::Register {
            for c in text.chars().filter(char::is_ascii_digit) {
                app.flow.input_otp_digit(c);
            }
        }
    }

    /// Mouse drags on the home screen drive the carousel.
    pub fn handle_mouse_event(app: &mut App, event: MouseEvent) {
        let Some(home) = app.home.as_mut() else {
            return;
        };
        let x = i32::from(event.column) * PIXELS_PER_COLUMN;
        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => home.carousel.drag_start(x),
            MouseEventKind::Drag(MouseButton::Left) => home.carousel.drag_move(x),
            MouseEventKind::Up(MouseButton::Left) => home.carousel.drag_end(),
            _ => {}
        }
    }

    fn handle_help_mode(app: &mut App, key: KeyCode) {
        if matches!(
            key,
            KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('?') | KeyCode::Char('q')
        ) {
            app.toggle_help();
        }
    }

    fn handle_phone_step(app: &mut App, key: KeyCode) -> Vec<Command> {
        match key {
            KeyCode::Enter => app.flow.submit_phone(),
            KeyCode::Backspace => {
                app.flow.backspace_phone();
                Vec::new()
            }
            KeyCode::Esc | KeyCode::Char('q') => {
                app.quit();
                Vec::new()
            }
            KeyCode::Char('?') => {
                app.toggle_help();
                Vec::new()
            }
            KeyCode::Char(c) => {
                app.flow.input_phone_char(c);
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    // `r` resends with or without Ctrl.
    fn handle_otp_step(app: &mut App, key: KeyCode) -> Vec<Command> {
        match key {
            KeyCode::Enter => app.flow.submit_otp(),
            KeyCode::Char('r') => app.flow.resend(),
            KeyCode::Esc => {
                app.flow.back();
                Vec::new()
            }
            KeyCode::Backspace => {
                app.flow.otp_backspace();
                Vec::new()
            }
            KeyCode::Left => {
                app.flow.otp.focus_left();
                Vec::new()
            }
            KeyCode::Right => {
                app.flow.otp.focus_right();
                Vec::new()
            }
            KeyCode::Home => {
                app.flow.otp.focus_slot(0);
                Vec::new()
            }
            KeyCode::Char('?') => {
                app.toggle_help();
                Vec::new()
            }
            KeyCode::Char(c) => {
                app.flow.input_otp_digit(c);
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    fn handle_home(app: &mut App, key: KeyCode, modifiers: KeyModifiers) -> Vec<Command> {
        if key == KeyCode::Char('l') && modifiers.contains(KeyModifiers::CONTROL)
            || key == KeyCode::Char('L')
        {
            return app.logout();
        }

        match key {
            KeyCode::Char('q') => {
                app.quit();
                return Vec::new();
            }
            KeyCode::Char('?') => {
                app.toggle_help();
                return Vec::new();
            }
            KeyCode::Char('r') => return app.refresh_home(),
            _ => {}
        }

        let Some(home) = app.home.as_mut() else {
            return Vec::new();
        };

        match key {
            KeyCode::Left | KeyCode::Char('h') => home.carousel.previous(),
            KeyCode::Right | KeyCode::Char('l') => home.carousel.next(),
            KeyCode::Up | KeyCode::Char('k') => home.select_previous(),
            KeyCode::Down | KeyCode::Char('j') => home.select_next(),
            KeyCode::Char(c @ '1'..='9') => {
                let index = c as usize - '1' as usize;
                home.carousel.select(index);
            }
            KeyCode::Char('o') => home.open_slide(),
            KeyCode::Enter => {
                if home.detail.is_some() {
                    home.close_detail();
                } else {
                    home.open_selected();
                }
            }
            KeyCode::Esc => home.close_detail(),
            _ => {}
        }
        Vec::new()
    }
}
