use gilrs::{Button, EventType, GamepadId, Gilrs};
use locomotion_core::host::{ControllerButton, SharedInput};

/// Feeds the first connected game controller into controller slot 0.
pub struct Gamepads {
    gilrs: Gilrs,
    active: Option<GamepadId>,
}

impl Gamepads {
    /// `None` when the platform has no controller backend.
    pub fn new(input: &SharedInput) -> Option<Self> {
        let gilrs = match Gilrs::new() {
            Ok(g) => g,
            Err(e) => {
                log::warn!("controller support unavailable: {e}");
                return None;
            }
        };

        let active = gilrs
            .gamepads()
            .find(|(_, pad)| pad.is_connected())
            .map(|(id, pad)| {
                log::info!("controller connected: {}", pad.name());
                id
            });
        input.with(|s| s.set_controller_connected(active.is_some()));

        Some(Self { gilrs, active })
    }

    pub fn poll(&mut self, input: &SharedInput) {
        while let Some(gilrs::Event { id, event, .. }) = self.gilrs.next_event() {
            match event {
                EventType::Connected if self.active.is_none() => {
                    self.active = Some(id);
                    log::info!("controller connected: {}", self.gilrs.gamepad(id).name());
                    input.with(|s| s.set_controller_connected(true));
                }
                EventType::Disconnected if self.active == Some(id) => {
                    self.active = None;
                    log::info!("controller disconnected");
                    input.with(|s| s.set_controller_connected(false));
                }
                EventType::ButtonPressed(button, _) if self.active == Some(id) => {
                    if let Some(b) = map_button(button) {
                        input.with(|s| s.apply_controller_button(b, true));
                    }
                }
                EventType::ButtonReleased(button, _) if self.active == Some(id) => {
                    if let Some(b) = map_button(button) {
                        input.with(|s| s.apply_controller_button(b, false));
                    }
                }
                _ => {}
            }
        }
    }
}

fn map_button(button: Button) -> Option<ControllerButton> {
    Some(match button {
        Button::South => ControllerButton::A,
        Button::East => ControllerButton::B,
        Button::West => ControllerButton::X,
        Button::North => ControllerButton::Y,
        Button::Select => ControllerButton::Back,
        Button::Start => ControllerButton::Start,
        _ => return None,
    })
}
