//! Presence type codes.
//!
//! The configuration describes the bot activity with Discord's numeric
//! activity type. [`PresenceKind`] validates the code and builds the matching
//! serenity [`ActivityData`].

use log::warn;
use serenity::all::ActivityData;

/// Activity types the bot can display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenceKind {
    Playing,
    Streaming,
    Listening,
    Watching,
    Custom,
    Competing,
}

impl PresenceKind {
    /// Maps a Discord activity type code to a kind.
    ///
    /// # Examples
    ///
    /// ```
    /// # use herald::discord::PresenceKind;
    /// assert_eq!(PresenceKind::from_code(3), Some(PresenceKind::Watching));
    /// assert_eq!(PresenceKind::from_code(9), None);
    /// ```
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(PresenceKind::Playing),
            1 => Some(PresenceKind::Streaming),
            2 => Some(PresenceKind::Listening),
            3 => Some(PresenceKind::Watching),
            4 => Some(PresenceKind::Custom),
            5 => Some(PresenceKind::Competing),
            _ => None,
        }
    }

    /// Builds the activity shown next to the bot name.
    ///
    /// Streaming needs a valid stream `url`; without one the activity falls
    /// back to playing.
    pub fn to_activity(self, text: &str, url: Option<&str>) -> ActivityData {
        match self {
            PresenceKind::Playing => ActivityData::playing(text),
            PresenceKind::Listening => ActivityData::listening(text),
            PresenceKind::Watching => ActivityData::watching(text),
            PresenceKind::Custom => ActivityData::custom(text),
            PresenceKind::Competing => ActivityData::competing(text),
            PresenceKind::Streaming => match url.map(|url| ActivityData::streaming(text, url)) {
                Some(Ok(activity)) => activity,
                Some(Err(e)) => {
                    warn!("invalid stream url, falling back to playing: {}", e);
                    ActivityData::playing(text)
                }
                None => {
                    warn!("streaming presence without url, falling back to playing");
                    ActivityData::playing(text)
                }
            },
        }
    }
}
