//! Declarative screen descriptions handed to the presentation layer.
//!
//! The core never draws anything itself. Each wait point builds one of these
//! values from its own state and the presentation adapter decides how to show
//! it.
use serde::{Deserialize, Serialize};

use crate::balloon::BalloonType;
use crate::config::KeyBindings;
use crate::constants;
use crate::ports::Signal;

/// Outcome banner shown after a trial ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feedback {
    Exploded,
    Collected,
}

impl Feedback {
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Exploded => constants::FEEDBACK_EXPLODED,
            Self::Collected => constants::FEEDBACK_COLLECTED,
        }
    }
}

/// Balloon as it should currently appear.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalloonView {
    pub balloon_index: u32,
    pub balloon_count: u32,
    /// Balloon type when the colour cue is enabled, `None` for a neutral balloon.
    pub cue: Option<BalloonType>,
    pub radius: f32,
    pub points_this_run: u32,
    pub hint: String,
}

/// Everything a presentation adapter may be asked to show.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "scene", rename_all = "snake_case")]
pub enum Scene {
    Instructions { title: String, body: String },
    Balloon(BalloonView),
    Feedback { feedback: Feedback },
    Blank,
    Finished { total_points: u32, prompt: String },
}

pub(crate) const TITLE: &str = "BART (Balloon Analogue Risk Task)";

impl Scene {
    /// Instruction screen text, naming the keys actually bound.
    #[must_use]
    pub fn instructions(keys: &KeyBindings, show_type_cue: bool) -> Self {
        let pump = key_label(keys, Signal::Pump);
        let collect = key_label(keys, Signal::Collect);
        let advance = key_label(keys, Signal::Advance);
        let quit = key_label(keys, Signal::Quit);

        let mut body = String::from("Instructions\n\n");
        body.push_str("In this task, you will see a balloon on the screen.\n");
        body.push_str(&format!(
            "Press {pump} to pump the balloon. Each pump increases the points for the current balloon.\n"
        ));
        body.push_str(&format!(
            "Press {collect} to COLLECT the current balloon points into your final score.\n\n"
        ));
        body.push_str("The balloon can explode at an unknown time.\n");
        body.push_str("If it explodes before you collect, you lose ALL points for that balloon.\n\n");
        if show_type_cue {
            body.push_str("Balloon types:\n");
            body.push_str(
                "- GREEN balloons are safer (less likely to explode) but points grow more slowly.\n",
            );
            body.push_str(
                "- RED balloons are riskier (more likely to explode) but points grow faster.\n\n",
            );
        }
        body.push_str("Try to earn as many points as possible!\n\n");
        body.push_str(&format!("Press {advance} to start.\n"));
        body.push_str(&format!("Press {quit} to quit anytime."));

        Self::Instructions {
            title: TITLE.to_string(),
            body,
        }
    }

    /// End-of-session screen.
    #[must_use]
    pub fn finished(keys: &KeyBindings, total_points: u32) -> Self {
        let advance = key_label(keys, Signal::Advance);
        Self::Finished {
            total_points,
            prompt: format!("Done!\n\nYou earned {total_points} points!\n\nPress {advance} to exit."),
        }
    }
}

/// Hint line shown under the balloon.
#[must_use]
pub fn trial_hint(keys: &KeyBindings) -> String {
    format!(
        "{} = pump   |   {} = collect",
        key_label(keys, Signal::Pump),
        key_label(keys, Signal::Collect)
    )
}

fn key_label(keys: &KeyBindings, signal: Signal) -> String {
    keys.keys_for(signal)
        .first()
        .map_or_else(|| format!("{signal:?}"), |key| key.to_ascii_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instructions_name_bound_keys() {
        let keys = KeyBindings::default();
        let Scene::Instructions { title, body } = Scene::instructions(&keys, true) else {
            panic!("expected instructions");
        };
        assert_eq!(title, TITLE);
        assert!(body.contains("Press SPACE to pump"));
        assert!(body.contains("Press RETURN to COLLECT"));
        assert!(body.contains("Press ESCAPE to quit anytime."));
        assert!(body.contains("GREEN balloons"));
    }

    #[test]
    fn instructions_hide_type_legend_without_cue() {
        let Scene::Instructions { body, .. } = Scene::instructions(&KeyBindings::default(), false)
        else {
            panic!("expected instructions");
        };
        assert!(!body.contains("GREEN"));
    }

    #[test]
    fn finished_reports_total() {
        let scene = Scene::finished(&KeyBindings::default(), 42);
        let Scene::Finished { total_points, prompt } = scene else {
            panic!("expected finished screen");
        };
        assert_eq!(total_points, 42);
        assert!(prompt.contains("You earned 42 points!"));
    }

    #[test]
    fn feedback_messages() {
        assert_eq!(Feedback::Exploded.message(), "BOOM!");
        assert_eq!(Feedback::Collected.message(), "Collected!");
    }
}
