//! Label formatting, whole-frame snapping and time text entry.

use std::fmt;
use thiserror::Error;

/// How times are written on the ruler and in time fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeFormat {
    /// Plain decimal seconds.
    None,
    /// `seconds:frames`.
    #[default]
    TimeFrame,
    /// Whole frame count.
    Frame,
}

impl TimeFormat {
    pub const ALL: [TimeFormat; 3] = [TimeFormat::TimeFrame, TimeFormat::Frame, TimeFormat::None];
}

impl fmt::Display for TimeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeFormat::None => write!(f, "Seconds"),
            TimeFormat::TimeFrame => write!(f, "Time:Frame"),
            TimeFormat::Frame => write!(f, "Frames"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseTimeError {
    #[error("time text is empty")]
    Empty,
    #[error("unexpected character {0:?} in time text")]
    InvalidCharacter(char),
    #[error("{0:?} is not a number")]
    InvalidNumber(String),
    #[error("frame based entry needs a positive frame rate")]
    MissingFrameRate,
}

/// Number of decimals needed to tell apart two values `min_difference` apart.
pub fn decimals_for_minimum_difference(min_difference: f32) -> usize {
    let difference = min_difference.abs();
    if difference == 0.0 || !difference.is_finite() {
        return 15;
    }
    // f32 powers of ten sit a hair below the exact value; count them as exact.
    let magnitude = (difference.log10() + 1e-5).floor();
    (-magnitude).clamp(0.0, 15.0) as usize
}

/// Rounds `time` to the closest whole frame. A zero frame rate leaves it as is.
pub fn snap_time_to_whole_fps(time: f32, frame_rate: f32) -> f32 {
    if frame_rate == 0.0 {
        time
    } else {
        (time * frame_rate).round() / frame_rate
    }
}

fn frame_of(time: f32, frame_rate: f32) -> i64 {
    (time * frame_rate).round() as i64
}

/// Formats `time` for a label or a time field.
///
/// `value_per_pixel` picks the decimal count of [`TimeFormat::None`] when
/// there is no frame rate, so zoomed-in views show more decimals.
pub fn format_time(time: f32, frame_rate: f32, format: TimeFormat, value_per_pixel: f32) -> String {
    if frame_rate <= 0.0 && format != TimeFormat::None {
        return format_time(time, frame_rate, TimeFormat::None, value_per_pixel);
    }

    match format {
        TimeFormat::None => {
            let decimals = if frame_rate != 0.0 {
                decimals_for_minimum_difference(1.0 / frame_rate)
            } else {
                decimals_for_minimum_difference(value_per_pixel)
            };
            format!("{time:.decimals$}")
        }
        TimeFormat::Frame => frame_of(time, frame_rate).to_string(),
        TimeFormat::TimeFrame => {
            let fps = (frame_rate as i64).max(1);
            let digits = (fps - 1).to_string().len();
            let frame = frame_of(time, frame_rate);
            let sign = if frame < 0 { "-" } else { "" };
            let frame = frame.abs();
            format!("{sign}{}:{:0digits$}", frame / fps, frame % fps)
        }
    }
}

/// Formats a vertical-axis value with as many decimals as one pixel needs.
pub fn format_value(value: f32, value_per_pixel: f32) -> String {
    let decimals = decimals_for_minimum_difference(value_per_pixel);
    format!("{value:.decimals$}")
}

/// Parses time field text written in `format`.
///
/// A `,` is accepted as decimal separator. `S:FF` text is read as seconds
/// plus frames whatever the format; plain numbers are snapped to frames.
pub fn parse_time(text: &str, frame_rate: f32, format: TimeFormat) -> Result<f32, ParseTimeError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ParseTimeError::Empty);
    }
    if let Some(c) = text
        .chars()
        .find(|c| !(c.is_ascii_digit() || matches!(c, '.' | ',' | ':' | '-')))
    {
        return Err(ParseTimeError::InvalidCharacter(c));
    }
    let text = text.replace(',', ".");
    let invalid = || ParseTimeError::InvalidNumber(text.clone());

    if let Some((seconds, frames)) = text.split_once(':') {
        if frame_rate <= 0.0 {
            return Err(ParseTimeError::MissingFrameRate);
        }
        // The sign applies to the whole `S:FF` value, as written by `format_time`.
        let (negative, seconds) = match seconds.strip_prefix('-') {
            Some(magnitude) => (true, magnitude),
            None => (false, seconds),
        };
        let seconds: u32 = seconds.parse().map_err(|_| invalid())?;
        let frames: u32 = frames.parse().map_err(|_| invalid())?;
        let time = seconds as f32 + frames as f32 / frame_rate;
        return Ok(if negative { -time } else { time });
    }

    match format {
        TimeFormat::Frame => {
            if frame_rate <= 0.0 {
                return Err(ParseTimeError::MissingFrameRate);
            }
            let frame: i64 = text.parse().map_err(|_| invalid())?;
            Ok(frame as f32 / frame_rate)
        }
        TimeFormat::None | TimeFormat::TimeFrame => {
            let time: f32 = text.parse().map_err(|_| invalid())?;
            if !time.is_finite() {
                return Err(invalid());
            }
            Ok(snap_time_to_whole_fps(time, frame_rate))
        }
    }
}

/// Applies edited time text, keeping `previous` when the text is rejected.
pub fn commit_time_text(text: &str, previous: f32, frame_rate: f32, format: TimeFormat) -> f32 {
    match parse_time(text, frame_rate, format) {
        Ok(time) => time,
        Err(err) => {
            log::debug!("ignoring time entry {text:?}: {err}");
            previous
        }
    }
}
