use std::{borrow::Cow, fmt};

use thiserror::Error;
use tracing::debug;

use crate::traits::command::Command;

pub const MAX_BRIGHTNESS: u8 = 100;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum LightError {
    #[error("brightness {0}% is above 100%")]
    BrightnessOutOfRange(u8),
    #[error("`{0}` was undone before it was executed")]
    NotApplied(&'static str),
}

/// A dimmable light. Starts switched off at half brightness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Light {
    pub is_on: bool,
    pub brightness: u8,
}

impl Light {
    /// Sets the brightness and switches the light on.
    ///
    /// # Errors
    ///
    /// [`LightError::BrightnessOutOfRange`] above [`MAX_BRIGHTNESS`]; the light is left unchanged.
    pub fn set_brightness(&mut self, brightness: u8) -> Result<(), LightError> {
        if brightness > MAX_BRIGHTNESS {
            return Err(LightError::BrightnessOutOfRange(brightness));
        }
        self.brightness = brightness;
        self.is_on = true;
        debug!(brightness, "brightness set");
        Ok(())
    }
}

impl Default for Light {
    fn default() -> Self {
        Self {
            is_on: false,
            brightness: 50,
        }
    }
}

impl fmt::Display for Light {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_on {
            write!(f, "Light is ON (brightness: {}%)", self.brightness)
        } else {
            write!(f, "Light is OFF")
        }
    }
}

/// Switches the light on or off, remembering the previous switch position.
#[derive(Debug, Clone, Copy)]
struct Switch {
    target: bool,
    was_on: Option<bool>,
}

impl Switch {
    fn flip(&mut self, light: &mut Light) {
        self.was_on = Some(light.is_on);
        light.is_on = self.target;
    }

    fn restore(&self, light: &mut Light, label: &'static str) -> Result<(), LightError> {
        light.is_on = self.was_on.ok_or(LightError::NotApplied(label))?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TurnOn(Switch);

impl TurnOn {
    #[must_use]
    pub fn new() -> Self {
        Self(Switch {
            target: true,
            was_on: None,
        })
    }
}

impl Default for TurnOn {
    fn default() -> Self {
        Self::new()
    }
}

impl Command for TurnOn {
    type Context = Light;
    type Error = LightError;

    fn execute(&mut self, ctx: &mut Light) -> Result<(), LightError> {
        self.0.flip(ctx);
        Ok(())
    }

    fn undo(&mut self, ctx: &mut Light) -> Result<(), LightError> {
        self.0.restore(ctx, "Turn On")
    }

    fn description(&self) -> Cow<'_, str> {
        Cow::Borrowed("Turn On")
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TurnOff(Switch);

impl TurnOff {
    #[must_use]
    pub fn new() -> Self {
        Self(Switch {
            target: false,
            was_on: None,
        })
    }
}

impl Default for TurnOff {
    fn default() -> Self {
        Self::new()
    }
}

impl Command for TurnOff {
    type Context = Light;
    type Error = LightError;

    fn execute(&mut self, ctx: &mut Light) -> Result<(), LightError> {
        self.0.flip(ctx);
        Ok(())
    }

    fn undo(&mut self, ctx: &mut Light) -> Result<(), LightError> {
        self.0.restore(ctx, "Turn Off")
    }

    fn description(&self) -> Cow<'_, str> {
        Cow::Borrowed("Turn Off")
    }
}

/// Changes the brightness, which also switches the light on. Undo restores both.
#[derive(Debug, Clone, Copy)]
pub struct SetBrightness {
    brightness: u8,
    previous: Option<Light>,
}

impl SetBrightness {
    #[must_use]
    pub fn new(brightness: u8) -> Self {
        Self {
            brightness,
            previous: None,
        }
    }
}

impl Command for SetBrightness {
    type Context = Light;
    type Error = LightError;

    fn execute(&mut self, ctx: &mut Light) -> Result<(), LightError> {
        let previous = *ctx;
        ctx.set_brightness(self.brightness)?;
        self.previous = Some(previous);
        Ok(())
    }

    fn undo(&mut self, ctx: &mut Light) -> Result<(), LightError> {
        *ctx = self
            .previous
            .ok_or(LightError::NotApplied("Set Brightness"))?;
        Ok(())
    }

    fn description(&self) -> Cow<'_, str> {
        Cow::Owned(format!("Set Brightness {}%", self.brightness))
    }
}
