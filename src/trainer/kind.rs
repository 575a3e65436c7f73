use std::{fmt, str::FromStr};

use machine_learning::config::InputType;
use serde::{Deserialize, Serialize};

use crate::TrainerErr;

/// Identifies which kind of trainer built a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrainerKind {
    Mfcc,
    Spectrogram,
}

impl TrainerKind {
    pub const ALL: [TrainerKind; 2] = [TrainerKind::Mfcc, TrainerKind::Spectrogram];

    pub fn as_str(&self) -> &'static str {
        match self {
            TrainerKind::Mfcc => "MFCC",
            TrainerKind::Spectrogram => "SPECTROGRAM",
        }
    }

    /// Whether a model fed with `input` samples has this kind's topology.
    pub fn accepts(&self, input: &InputType) -> bool {
        match self {
            TrainerKind::Mfcc => matches!(input, InputType::FeedForward { .. }),
            TrainerKind::Spectrogram => input.is_convolutional(),
        }
    }
}

impl fmt::Display for TrainerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrainerKind {
    type Err = TrainerErr;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TrainerKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| TrainerErr::InvalidConfig(format!("unknown trainer kind {s:?}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for kind in TrainerKind::ALL {
            assert_eq!(kind.to_string().parse::<TrainerKind>().unwrap(), kind);
        }

        assert_eq!("mfcc".parse::<TrainerKind>().unwrap(), TrainerKind::Mfcc);
        assert!("WAVEFORM".parse::<TrainerKind>().is_err());
    }

    #[test]
    fn serde_uses_the_display_names() {
        let json = serde_json::to_string(&TrainerKind::Spectrogram).unwrap();
        assert_eq!(json, "\"SPECTROGRAM\"");
    }

    #[test]
    fn each_kind_accepts_its_own_input() {
        let flat = InputType::FeedForward { size: 13 };
        let image = InputType::Convolutional {
            height: 8,
            width: 8,
            channels: 1,
        };

        assert!(TrainerKind::Mfcc.accepts(&flat));
        assert!(!TrainerKind::Mfcc.accepts(&image));
        assert!(TrainerKind::Spectrogram.accepts(&image));
        assert!(!TrainerKind::Spectrogram.accepts(&flat));
    }
}
