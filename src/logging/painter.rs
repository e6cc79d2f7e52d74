//! Renders messages through the color policy

use std::borrow::Cow;

use crossterm::style::Stylize;

use super::color::ColorAssociation;
use super::level::LogLevel;

/// Applies a level's configured color to a message
#[derive(Debug, Clone, Default)]
pub struct Painter {
    colors: ColorAssociation,
}

impl Painter {
    pub fn new(colors: ColorAssociation) -> Self {
        Self { colors }
    }

    pub fn colors(&self) -> &ColorAssociation {
        &self.colors
    }

    /// Paint `message` for `level`; borrows it unchanged when there is no color
    pub fn paint<'a>(&self, level: LogLevel, message: &'a str) -> Cow<'a, str> {
        match self.colors.color_for(level) {
            Some(color) => Cow::Owned(message.with(color.to_crossterm()).to_string()),
            None => Cow::Borrowed(message),
        }
    }
}
