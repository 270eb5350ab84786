//! Per-tick input snapshot
//!
//! The host polls its devices once per tick and hands the simulation plain
//! data. Nothing in here talks to an OS or browser API.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::PlayerId;
use super::player::{Intent, Player};
use crate::angle_to;
use crate::consts::MAX_GAMEPADS;
use crate::settings::InputDevice;

/// Mouse/touch pointer, already converted to arena coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerState {
    pub target: Vec2,
    pub pressed: bool,
}

/// One connected gamepad
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GamepadState {
    /// Left stick, each axis in [-1, 1]
    pub stick: Vec2,
    /// South and east face buttons (A/B)
    pub buttons: [bool; 2],
}

impl GamepadState {
    pub fn fire_pressed(&self) -> bool {
        self.buttons.iter().any(|&b| b)
    }

    /// Stick angle, or `None` while the stick rests inside the deadzone
    pub fn aim(&self, deadzone: f32) -> Option<f32> {
        if self.stick.x.abs() > deadzone || self.stick.y.abs() > deadzone {
            Some(self.stick.y.atan2(self.stick.x))
        } else {
            None
        }
    }
}

/// Device state sampled at the start of a tick
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickInput {
    pub pointer: Option<PointerState>,
    pub gamepads: [Option<GamepadState>; MAX_GAMEPADS],
}

impl TickInput {
    /// Which gamepad slot drives `player`.
    ///
    /// A gamepad-using player 1 takes pad 0 and pushes player 2 to pad 1;
    /// otherwise player 2 gets pad 0.
    pub fn gamepad_slot(player: PlayerId, p1_input: InputDevice) -> Option<usize> {
        let p1_pad = p1_input == InputDevice::Gamepad;
        match player {
            1 if p1_pad => Some(0),
            2 if p1_pad => Some(1),
            2 => Some(0),
            _ => None,
        }
    }

    pub fn gamepad_for(&self, player: PlayerId, p1_input: InputDevice) -> Option<&GamepadState> {
        Self::gamepad_slot(player, p1_input).and_then(|slot| self.gamepads.get(slot)?.as_ref())
    }

    /// Presence query used for hot-join and hot-leave
    pub fn is_controller_connected(&self, player: PlayerId, p1_input: InputDevice) -> bool {
        self.gamepad_for(player, p1_input).is_some()
    }

    /// Aim and trigger for a human-controlled player.
    ///
    /// A missing device, or a stick resting in its deadzone, yields an idle
    /// intent so the player keeps its last facing and does not fire.
    pub fn human_intent(
        &self,
        player: &Player,
        device: InputDevice,
        p1_input: InputDevice,
        deadzone: f32,
    ) -> Intent {
        match device {
            InputDevice::Pointer => match self.pointer {
                Some(pointer) => Intent {
                    facing: Some(angle_to(player.body.pos, pointer.target)),
                    trigger: pointer.pressed,
                },
                None => Intent::idle(),
            },
            InputDevice::Gamepad => {
                let Some(pad) = self.gamepad_for(player.id, p1_input) else {
                    return Intent::idle();
                };
                match pad.aim(deadzone) {
                    Some(angle) => Intent {
                        facing: Some(angle),
                        trigger: pad.fire_pressed(),
                    },
                    None => Intent::idle(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::player::ControlSource;
    use crate::tuning::Tuning;
    use std::f32::consts::FRAC_PI_2;

    fn pad(stick: Vec2, fire: bool) -> Option<GamepadState> {
        Some(GamepadState {
            stick,
            buttons: [fire, false],
        })
    }

    #[test]
    fn test_slot_assignment() {
        assert_eq!(TickInput::gamepad_slot(1, InputDevice::Pointer), None);
        assert_eq!(TickInput::gamepad_slot(2, InputDevice::Pointer), Some(0));
        assert_eq!(TickInput::gamepad_slot(1, InputDevice::Gamepad), Some(0));
        assert_eq!(TickInput::gamepad_slot(2, InputDevice::Gamepad), Some(1));
    }

    #[test]
    fn test_presence_follows_slot() {
        let mut input = TickInput::default();
        input.gamepads[0] = pad(Vec2::ZERO, false);
        assert!(input.is_controller_connected(2, InputDevice::Pointer));
        assert!(!input.is_controller_connected(2, InputDevice::Gamepad));
        input.gamepads[1] = pad(Vec2::ZERO, false);
        assert!(input.is_controller_connected(2, InputDevice::Gamepad));
    }

    #[test]
    fn test_pointer_aims_at_target() {
        let tuning = Tuning::default();
        let player = Player::new(
            1,
            Vec2::new(10.0, 10.0),
            ControlSource::Human(InputDevice::Pointer),
            &tuning,
        );
        let input = TickInput {
            pointer: Some(PointerState {
                target: Vec2::new(10.0, 50.0),
                pressed: true,
            }),
            ..Default::default()
        };
        let intent = input.human_intent(&player, InputDevice::Pointer, InputDevice::Pointer, 0.2);
        assert!((intent.facing.unwrap() - FRAC_PI_2).abs() < 1e-6);
        assert!(intent.trigger);
    }

    #[test]
    fn test_deadzone_swallows_fire() {
        let tuning = Tuning::default();
        let player = Player::new(2, Vec2::ZERO, ControlSource::Human(InputDevice::Gamepad), &tuning);
        let mut input = TickInput::default();

        input.gamepads[0] = pad(Vec2::new(0.1, -0.15), true);
        let intent = input.human_intent(&player, InputDevice::Gamepad, InputDevice::Pointer, 0.2);
        assert_eq!(intent, Intent::idle());

        input.gamepads[0] = pad(Vec2::new(0.0, 0.9), true);
        let intent = input.human_intent(&player, InputDevice::Gamepad, InputDevice::Pointer, 0.2);
        assert!((intent.facing.unwrap() - FRAC_PI_2).abs() < 1e-6);
        assert!(intent.trigger);
    }

    #[test]
    fn test_missing_device_is_idle() {
        let tuning = Tuning::default();
        let player = Player::new(1, Vec2::ZERO, ControlSource::Human(InputDevice::Pointer), &tuning);
        let input = TickInput::default();
        assert_eq!(
            input.human_intent(&player, InputDevice::Pointer, InputDevice::Pointer, 0.2),
            Intent::idle()
        );
        assert_eq!(
            input.human_intent(&player, InputDevice::Gamepad, InputDevice::Gamepad, 0.2),
            Intent::idle()
        );
    }
}
