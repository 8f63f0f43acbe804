use crate::foundation::classes::SpriteClass;

/// Position of a capture within its animation group.
///
/// The capture tool writes the literal token `x` for the trailing full-frame
/// layer; any non-numeric token is treated the same way and ordered after
/// every numbered capture.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Sequence {
    /// Numbered frame within the animation.
    Index(u32),
    /// Terminal full-frame sentinel, sorts last.
    Terminal,
}

impl Sequence {
    /// Parse a sequence token; anything but an unsigned decimal number is
    /// the terminal sentinel.
    pub fn parse(token: &str) -> Self {
        if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
            return Self::Terminal;
        }
        let Ok(n) = token.parse::<u32>() else {
            return Self::Terminal;
        };
        Self::Index(n)
    }

    /// Whether this is the terminal sentinel.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Terminal)
    }
}

/// Parsed `<animation>-<sequence>-<class>.<ext>` capture filename.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CaptureName {
    /// Animation group id (first hyphen field).
    pub animation: String,
    /// Frame position within the group (second hyphen field).
    pub sequence: Sequence,
    /// Structured class parsed from the final field, extension removed.
    pub class: SpriteClass,
}

impl CaptureName {
    /// Parse a capture filename.
    ///
    /// Returns `None` unless the name has exactly three hyphen-delimited
    /// fields; everything else about the fields is accepted as-is.
    pub fn parse(file_name: &str) -> Option<Self> {
        let mut fields = file_name.split('-');
        let (Some(animation), Some(seq), Some(rest), None) =
            (fields.next(), fields.next(), fields.next(), fields.next())
        else {
            return None;
        };

        let class_token = rest.split_once('.').map_or(rest, |(token, _)| token);
        Some(Self {
            animation: animation.to_string(),
            sequence: Sequence::parse(seq),
            class: SpriteClass::parse(class_token),
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/capture.rs"]
mod tests;
