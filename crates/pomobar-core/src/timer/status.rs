//! Bar-facing status payloads.
//!
//! The bar host renders a `{"text", "class"}` pair per status query and maps
//! `class` onto a pre-generated set of styles. Text is padded to a fixed
//! width so the module never resizes while the interval runs.

use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::timer::engine::{Phase, TimerState};

/// Rendered width of every status text.
pub const STATUS_WIDTH: usize = 35;

pub const IDLE_TEXT: &str = "Click to start timer";
pub const SERVER_DOWN_TEXT: &str = "Timer server not started";
pub const UNREACHABLE_TEXT: &str = "Timer server unreachable";

/// Style bucket selecting the bar's visual style.
///
/// Serializes as a JSON integer for progress percentages and as a string for
/// the fixed classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleClass {
    /// Work progress percentage. Capped at 99 so the bucket can never
    /// collide with a terminal class.
    Percent(u8),
    /// Break phase, whatever the break progress.
    Alert,
    /// Cycle complete.
    Done,
}

impl Serialize for StyleClass {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            StyleClass::Percent(pct) => serializer.serialize_u8(*pct),
            StyleClass::Alert => serializer.serialize_str("alert"),
            StyleClass::Done => serializer.serialize_str("done"),
        }
    }
}

impl<'de> Deserialize<'de> for StyleClass {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ClassVisitor;

        impl Visitor<'_> for ClassVisitor {
            type Value = StyleClass;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an integer 0-99, \"alert\" or \"done\"")
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<StyleClass, E> {
                if value > 99 {
                    return Err(E::custom(format!(
                        "percentage bucket {} out of range",
                        value
                    )));
                }
                Ok(StyleClass::Percent(value as u8))
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<StyleClass, E> {
                u64::try_from(value)
                    .map_err(|_| E::custom(format!("percentage bucket {} out of range", value)))
                    .and_then(|v| self.visit_u64(v))
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<StyleClass, E> {
                match value {
                    "alert" => Ok(StyleClass::Alert),
                    "done" => Ok(StyleClass::Done),
                    other => Err(E::custom(format!("unknown style class '{}'", other))),
                }
            }
        }

        deserializer.deserialize_any(ClassVisitor)
    }
}

/// One status payload for the bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Status {
    /// Human-readable, fixed-width centered text.
    pub text: String,
    /// Style bucket; omitted entirely for the idle case.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<StyleClass>,
}

impl Status {
    pub fn idle() -> Self {
        Self {
            text: center(IDLE_TEXT),
            class: None,
        }
    }

    /// Fixed status reported when no server answered the presence check.
    pub fn server_down() -> Self {
        Self {
            text: center(SERVER_DOWN_TEXT),
            class: None,
        }
    }

    /// Fixed status reported when a present server stopped replying.
    pub fn unreachable() -> Self {
        Self {
            text: center(UNREACHABLE_TEXT),
            class: None,
        }
    }
}

/// Render the derived phase as a bar status.
pub fn render(state: &TimerState, phase: Phase, now: u64) -> Status {
    match phase {
        Phase::Idle => Status::idle(),
        Phase::Working { elapsed } => progress("", elapsed, state.work_length()),
        Phase::OnBreak { elapsed } => {
            let mut status = progress("Break: ", elapsed, state.break_length());
            status.class = Some(StyleClass::Alert);
            status
        }
        Phase::BreakOver { ended_at } => Status {
            text: center(&format!(
                "Break ended {}min ago",
                now.saturating_sub(ended_at) / 60
            )),
            class: Some(StyleClass::Done),
        },
    }
}

fn progress(title: &str, elapsed: u64, total: u64) -> Status {
    let pct = if total == 0 {
        99
    } else {
        (elapsed * 100 / total).min(99) as u8
    };
    Status {
        text: center(&format!(
            "{}{}/{}",
            title,
            format_secs(elapsed),
            format_secs(total)
        )),
        class: Some(StyleClass::Percent(pct)),
    }
}

fn format_secs(secs: u64) -> String {
    format!("{}min {}s", secs / 60, secs % 60)
}

/// Center `text` in [`STATUS_WIDTH`] columns, extra padding on the right.
fn center(text: &str) -> String {
    let len = text.chars().count();
    if len >= STATUS_WIDTH {
        return text.to_string();
    }
    let pad = STATUS_WIDTH - len;
    let left = pad / 2;
    format!("{}{}{}", " ".repeat(left), text, " ".repeat(pad - left))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> TimerState {
        TimerState::new(1500, 300)
    }

    #[test]
    fn idle_status_has_no_class() {
        let status = render(&state(), Phase::Idle, 0);
        assert_eq!(status.text.trim(), IDLE_TEXT);
        assert_eq!(status.class, None);
    }

    #[test]
    fn working_status_at_midpoint() {
        // work=1500, start at t=0, tick at t=750
        let status = render(&state(), Phase::Working { elapsed: 750 }, 750);
        assert_eq!(status.text.trim(), "12min 30s/25min 0s");
        assert_eq!(status.class, Some(StyleClass::Percent(50)));
    }

    #[test]
    fn break_status_is_always_alert() {
        // tick at t=1600 is 100s into the break
        let status = render(&state(), Phase::OnBreak { elapsed: 100 }, 1600);
        assert_eq!(status.text.trim(), "Break: 1min 40s/5min 0s");
        assert_eq!(status.class, Some(StyleClass::Alert));
    }

    #[test]
    fn break_over_reports_minutes_since_latch() {
        let status = render(&state(), Phase::BreakOver { ended_at: 1801 }, 1900);
        assert_eq!(status.text.trim(), "Break ended 1min ago");
        assert_eq!(status.class, Some(StyleClass::Done));

        let later = render(&state(), Phase::BreakOver { ended_at: 1801 }, 1990);
        assert_eq!(later.text.trim(), "Break ended 3min ago");
        assert_eq!(later.class, Some(StyleClass::Done));
    }

    #[test]
    fn percentage_is_capped_at_99() {
        let status = render(&state(), Phase::Working { elapsed: 1500 }, 1500);
        assert_eq!(status.class, Some(StyleClass::Percent(99)));
    }

    #[test]
    fn percentage_is_monotonic() {
        let timer = state();
        let mut last = 0;
        for elapsed in 0..=1500 {
            let status = render(&timer, Phase::Working { elapsed }, elapsed);
            let Some(StyleClass::Percent(pct)) = status.class else {
                panic!("working phase must have a percentage class");
            };
            assert!(pct >= last, "bucket decreased at elapsed={}", elapsed);
            assert!(pct <= 99);
            last = pct;
        }
    }

    #[test]
    fn texts_are_fixed_width() {
        let timer = state();
        for status in [
            Status::idle(),
            Status::server_down(),
            Status::unreachable(),
            render(&timer, Phase::Working { elapsed: 750 }, 750),
            render(&timer, Phase::OnBreak { elapsed: 100 }, 1600),
            render(&timer, Phase::BreakOver { ended_at: 1801 }, 1900),
        ] {
            assert_eq!(status.text.chars().count(), STATUS_WIDTH, "{:?}", status);
        }
    }

    #[test]
    fn center_splits_padding_left_biased() {
        let centered = center("abcd");
        assert_eq!(centered.len(), STATUS_WIDTH);
        // 31 columns of padding: 15 left, 16 right
        assert!(centered.starts_with(&" ".repeat(15)));
        assert!(centered.ends_with(&" ".repeat(16)));
        assert_eq!(centered.trim(), "abcd");
    }

    #[test]
    fn center_leaves_wide_text_alone() {
        let wide = "x".repeat(STATUS_WIDTH + 3);
        assert_eq!(center(&wide), wide);
    }

    // -- serialization --

    #[test]
    fn percent_class_serializes_as_integer() {
        let status = Status {
            text: "t".to_string(),
            class: Some(StyleClass::Percent(50)),
        };
        let json = serde_json::to_string(&status).unwrap();
        assert_eq!(json, r#"{"text":"t","class":50}"#);
    }

    #[test]
    fn named_classes_serialize_as_strings() {
        let alert = Status {
            text: "t".to_string(),
            class: Some(StyleClass::Alert),
        };
        assert_eq!(
            serde_json::to_string(&alert).unwrap(),
            r#"{"text":"t","class":"alert"}"#
        );

        let done = Status {
            text: "t".to_string(),
            class: Some(StyleClass::Done),
        };
        assert_eq!(
            serde_json::to_string(&done).unwrap(),
            r#"{"text":"t","class":"done"}"#
        );
    }

    #[test]
    fn idle_class_is_omitted() {
        let json = serde_json::to_string(&Status::idle()).unwrap();
        assert!(!json.contains("class"));
    }

    #[test]
    fn status_roundtrip() {
        for class in [
            None,
            Some(StyleClass::Percent(0)),
            Some(StyleClass::Percent(99)),
            Some(StyleClass::Alert),
            Some(StyleClass::Done),
        ] {
            let status = Status {
                text: "text".to_string(),
                class,
            };
            let json = serde_json::to_string(&status).unwrap();
            let parsed: Status = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn out_of_range_bucket_is_rejected() {
        let result: Result<Status, _> = serde_json::from_str(r#"{"text":"t","class":100}"#);
        assert!(result.is_err());

        let result: Result<Status, _> = serde_json::from_str(r#"{"text":"t","class":"busy"}"#);
        assert!(result.is_err());
    }
}
