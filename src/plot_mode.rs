// src/plot_mode.rs

//! Decoding of the short plot-mode strings.
//!
//! A sweep mode such as `"fX"`, `"rfn"` or `"ygy"` picks one channel per axis from
//! `f`/`x`/`y`/`r`. A `g` anywhere selects the gain-corrected variant and an `n`
//! anywhere selects the normalized variant. Matching is case insensitive and only the
//! first two axis characters are used. NMR modes pick two of `t/d/f/r/i/m/p`.

use std::fmt;

use crate::error::{RenderError, RenderResult};

const ALL_MODE: &str = "all";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepAxis {
    Frequency,
    X,
    Y,
    R,
}

impl SweepAxis {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'f' => Some(SweepAxis::Frequency),
            'x' => Some(SweepAxis::X),
            'y' => Some(SweepAxis::Y),
            'r' => Some(SweepAxis::R),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            SweepAxis::Frequency => 'f',
            SweepAxis::X => 'x',
            SweepAxis::Y => 'y',
            SweepAxis::R => 'r',
        }
    }
}

/// Gain-correction / normalization modifiers carried by a mode string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChannelVariant {
    pub gain_corrected: bool,
    pub normalized: bool,
}

impl ChannelVariant {
    pub fn from_mode(mode: &str) -> Self {
        let lower = mode.to_lowercase();
        ChannelVariant {
            gain_corrected: lower.contains('g'),
            normalized: lower.contains('n'),
        }
    }

    /// Channels a fit was made on: a lowercase `g` anywhere in `fitmode` selects the
    /// gain-corrected channels. Fits are never normalized.
    pub fn from_fitmode(fitmode: &str) -> Self {
        ChannelVariant {
            gain_corrected: fitmode.contains('g'),
            normalized: false,
        }
    }

    /// The `g`/`n` prefix in canonical order, e.g. `"gn"`.
    pub fn prefix(self) -> String {
        let mut prefix = String::new();
        if self.gain_corrected {
            prefix.push('g');
        }
        if self.normalized {
            prefix.push('n');
        }
        prefix
    }
}

/// One plottable sweep channel. Frequency ignores the variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepChannel {
    pub axis: SweepAxis,
    pub variant: ChannelVariant,
}

impl SweepChannel {
    pub fn new(axis: SweepAxis, variant: ChannelVariant) -> Self {
        let variant = if axis == SweepAxis::Frequency {
            ChannelVariant::default()
        } else {
            variant
        };
        SweepChannel { axis, variant }
    }
}

impl fmt::Display for SweepChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.variant.prefix(), self.axis.as_char())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepPlotMode {
    pub x_axis: SweepAxis,
    pub y_axis: SweepAxis,
    pub variant: ChannelVariant,
}

impl SweepPlotMode {
    pub fn parse(mode: &str) -> RenderResult<Self> {
        let lower = mode.to_lowercase();
        let variant = ChannelVariant::from_mode(&lower);
        let axes: Vec<char> = lower.chars().filter(|&c| c != 'g' && c != 'n').collect();
        if axes.len() < 2 {
            return Err(RenderError::ModeTooShort {
                mode: mode.to_string(),
                found: axes.len(),
            });
        }
        let decode = |c: char| {
            SweepAxis::from_char(c).ok_or_else(|| RenderError::UnrecognizedMode {
                mode: mode.to_string(),
            })
        };
        Ok(SweepPlotMode {
            x_axis: decode(axes[0])?,
            y_axis: decode(axes[1])?,
            variant,
        })
    }

    pub fn x_channel(&self) -> SweepChannel {
        SweepChannel::new(self.x_axis, self.variant)
    }

    pub fn y_channel(&self) -> SweepChannel {
        SweepChannel::new(self.y_axis, self.variant)
    }
}

/// Mode list for multi-panel sweep figures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SweepLayout {
    /// The `fx` + `fy` + `fr` + `xy` quartet with shared modifiers.
    All(ChannelVariant),
    Modes(Vec<SweepPlotMode>),
}

impl SweepLayout {
    pub fn parse<S: AsRef<str>>(modes: &[S]) -> RenderResult<Self> {
        if let [single] = modes {
            let single = single.as_ref();
            if single.to_lowercase().contains(ALL_MODE) {
                return Ok(SweepLayout::All(ChannelVariant::from_mode(single)));
            }
        }
        let parsed = modes
            .iter()
            .map(|m| SweepPlotMode::parse(m.as_ref()))
            .collect::<RenderResult<Vec<_>>>()?;
        if parsed.is_empty() {
            return Err(RenderError::ModeTooShort {
                mode: String::new(),
                found: 0,
            });
        }
        Ok(SweepLayout::Modes(parsed))
    }

    /// Expands to the concrete per-panel modes.
    pub fn modes(&self) -> Vec<SweepPlotMode> {
        match self {
            SweepLayout::All(variant) => all_quartet(*variant).to_vec(),
            SweepLayout::Modes(modes) => modes.clone(),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, SweepLayout::All(_))
    }
}

pub fn all_quartet(variant: ChannelVariant) -> [SweepPlotMode; 4] {
    use SweepAxis::*;
    let mode = |x_axis, y_axis| SweepPlotMode {
        x_axis,
        y_axis,
        variant,
    };
    [
        mode(Frequency, X),
        mode(Frequency, Y),
        mode(Frequency, R),
        mode(X, Y),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NmrAxis {
    Time,
    Fid,
    Frequency,
    FftReal,
    FftImag,
    FftMagnitude,
    FftPhase,
}

impl NmrAxis {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            't' => Some(NmrAxis::Time),
            'd' => Some(NmrAxis::Fid),
            'f' => Some(NmrAxis::Frequency),
            'r' => Some(NmrAxis::FftReal),
            'i' => Some(NmrAxis::FftImag),
            'm' => Some(NmrAxis::FftMagnitude),
            'p' => Some(NmrAxis::FftPhase),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            NmrAxis::Time => 't',
            NmrAxis::Fid => 'd',
            NmrAxis::Frequency => 'f',
            NmrAxis::FftReal => 'r',
            NmrAxis::FftImag => 'i',
            NmrAxis::FftMagnitude => 'm',
            NmrAxis::FftPhase => 'p',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NmrPlotMode {
    pub x_axis: NmrAxis,
    pub y_axis: NmrAxis,
}

impl NmrPlotMode {
    pub fn parse(mode: &str) -> RenderResult<Self> {
        let lower = mode.to_lowercase();
        let chars: Vec<char> = lower.chars().collect();
        if chars.len() < 2 {
            return Err(RenderError::ModeTooShort {
                mode: mode.to_string(),
                found: chars.len(),
            });
        }
        let decode = |c: char| {
            NmrAxis::from_char(c).ok_or_else(|| RenderError::UnrecognizedMode {
                mode: mode.to_string(),
            })
        };
        Ok(NmrPlotMode {
            x_axis: decode(chars[0])?,
            y_axis: decode(chars[1])?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NmrLayout {
    /// `td` + `fr` + `fi` side by side.
    All,
    Single(NmrPlotMode),
}

impl NmrLayout {
    pub fn parse(mode: &str) -> RenderResult<Self> {
        if mode.to_lowercase().contains(ALL_MODE) {
            Ok(NmrLayout::All)
        } else {
            NmrPlotMode::parse(mode).map(NmrLayout::Single)
        }
    }
}

pub fn nmr_all_trio() -> [NmrPlotMode; 3] {
    use NmrAxis::*;
    [
        NmrPlotMode {
            x_axis: Time,
            y_axis: Fid,
        },
        NmrPlotMode {
            x_axis: Frequency,
            y_axis: FftReal,
        },
        NmrPlotMode {
            x_axis: Frequency,
            y_axis: FftImag,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sweep_mode_is_case_insensitive() {
        let mode = SweepPlotMode::parse("fX").unwrap();
        assert_eq!(mode.x_axis, SweepAxis::Frequency);
        assert_eq!(mode.y_axis, SweepAxis::X);
        assert_eq!(mode.variant, ChannelVariant::default());
    }

    #[test]
    fn test_sweep_mode_modifiers_anywhere() {
        let mode = SweepPlotMode::parse("rfn").unwrap();
        assert_eq!(mode.x_channel().to_string(), "nr");
        assert_eq!(mode.y_channel().to_string(), "f");

        let mode = SweepPlotMode::parse("ygy").unwrap();
        assert_eq!(mode.x_channel().to_string(), "gy");
        assert_eq!(mode.y_channel().to_string(), "gy");

        let mode = SweepPlotMode::parse("NxGy").unwrap();
        assert_eq!(mode.x_channel().to_string(), "gnx");
    }

    #[test]
    fn test_sweep_mode_errors() {
        assert!(matches!(
            SweepPlotMode::parse("gn"),
            Err(RenderError::ModeTooShort { found: 0, .. })
        ));
        assert!(matches!(
            SweepPlotMode::parse("fz"),
            Err(RenderError::UnrecognizedMode { .. })
        ));
    }

    #[test]
    fn test_layout_all_carries_modifiers() {
        let layout = SweepLayout::parse(&["gAll"]).unwrap();
        assert!(layout.is_all());
        let modes = layout.modes();
        assert_eq!(modes.len(), 4);
        assert_eq!(modes[3].x_channel().to_string(), "gx");
        assert_eq!(modes[3].y_channel().to_string(), "gy");
        assert_eq!(modes[0].x_channel().to_string(), "f");
    }

    #[test]
    fn test_layout_list() {
        let layout = SweepLayout::parse(&["fx", "xy"]).unwrap();
        assert!(!layout.is_all());
        assert_eq!(layout.modes().len(), 2);
        assert!(SweepLayout::parse::<&str>(&[]).is_err());
    }

    #[test]
    fn test_nmr_mode() {
        let mode = NmrPlotMode::parse("TD").unwrap();
        assert_eq!(mode.x_axis, NmrAxis::Time);
        assert_eq!(mode.y_axis, NmrAxis::Fid);
        assert!(matches!(
            NmrPlotMode::parse("tx"),
            Err(RenderError::UnrecognizedMode { .. })
        ));
        assert_eq!(NmrLayout::parse("ALL").unwrap(), NmrLayout::All);
    }
}

// src/plot_mode.rs
