// src/data_input/sweep_data.rs

use ndarray::{Array1, Zip};
use std::error::Error;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::{debug, info, warn};

use crate::constants::DEFAULT_NORM_PARAM;
use crate::data_analysis::gain_correction::{FirstOrderRolloff, GainCorrection};
use crate::data_input::file_naming::file_stem_label;
use crate::data_input::sweep_log::{lookup_sweep_log, SweepLogEntry};
use crate::data_input::table::Table;
use crate::error::{RenderError, RenderResult};
use crate::plot_mode::{SweepAxis, SweepChannel};

/// One frequency sweep: raw lock-in channels plus their gain-corrected variants.
#[derive(Debug, Clone)]
pub struct SweepData {
    pub filename: String,
    pub f: Array1<f64>,
    pub x: Array1<f64>,
    pub y: Array1<f64>,
    pub r: Array1<f64>,
    pub gx: Array1<f64>,
    pub gy: Array1<f64>,
    pub gr: Array1<f64>,
    pub temperature_mk: Option<f64>,
    pub norm_value: Option<f64>,
}

impl SweepData {
    /// Builds a sweep from raw channels. `r` defaults to `sqrt(x² + y²)`.
    /// Every channel must have one value per frequency.
    pub fn new(
        filename: &str,
        f: Array1<f64>,
        x: Array1<f64>,
        y: Array1<f64>,
        r: Option<Array1<f64>>,
        correction: &dyn GainCorrection,
    ) -> RenderResult<Self> {
        let expected = f.len();
        let check = |channel: &'static str, values: &Array1<f64>| {
            if values.len() == expected {
                Ok(())
            } else {
                Err(RenderError::ChannelLength {
                    filename: filename.to_string(),
                    channel,
                    expected,
                    got: values.len(),
                })
            }
        };
        check("x", &x)?;
        check("y", &y)?;
        if let Some(r) = &r {
            check("r", r)?;
        }

        let r = r.unwrap_or_else(|| magnitude(&x, &y));
        let mut gx = Array1::<f64>::zeros(expected);
        let mut gy = Array1::<f64>::zeros(expected);
        Zip::from(&mut gx)
            .and(&mut gy)
            .and(&f)
            .and(&x)
            .and(&y)
            .for_each(|gx, gy, &f, &x, &y| {
                let (cx, cy) = correction.correct(f, x, y);
                *gx = cx;
                *gy = cy;
            });
        let gr = magnitude(&gx, &gy);
        Ok(SweepData {
            filename: filename.to_string(),
            f,
            x,
            y,
            r,
            gx,
            gy,
            gr,
            temperature_mk: None,
            norm_value: None,
        })
    }

    pub fn with_log_entry(mut self, entry: SweepLogEntry) -> Self {
        self.temperature_mk = entry.temperature_mk;
        self.norm_value = entry.norm_value;
        self
    }

    pub fn len(&self) -> usize {
        self.f.len()
    }

    pub fn is_empty(&self) -> bool {
        self.f.is_empty()
    }

    /// Values of a (possibly gain-corrected and/or normalized) channel.
    pub fn channel(&self, channel: SweepChannel) -> RenderResult<Array1<f64>> {
        let variant = channel.variant;
        let base = match (channel.axis, variant.gain_corrected) {
            (SweepAxis::Frequency, _) => return Ok(self.f.clone()),
            (SweepAxis::X, false) => &self.x,
            (SweepAxis::Y, false) => &self.y,
            (SweepAxis::R, false) => &self.r,
            (SweepAxis::X, true) => &self.gx,
            (SweepAxis::Y, true) => &self.gy,
            (SweepAxis::R, true) => &self.gr,
        };
        if !variant.normalized {
            return Ok(base.clone());
        }
        match self.norm_value {
            Some(norm) if norm != 0.0 && norm.is_finite() => Ok(base / norm),
            _ => Err(RenderError::NormalizationUnavailable {
                filename: self.filename.clone(),
            }),
        }
    }

    /// Legend label: file stem, with the temperature when known.
    pub fn legend_label(&self) -> String {
        let stem = file_stem_label(&self.filename);
        match self.temperature_mk {
            Some(t) => format!("{stem}, {t:.2}mK"),
            None => stem,
        }
    }
}

fn magnitude(x: &Array1<f64>, y: &Array1<f64>) -> Array1<f64> {
    x.iter()
        .zip(y.iter())
        .map(|(a, b)| a.hypot(*b))
        .collect()
}

/// Multiplicative factors applied to the raw columns on load.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelScale {
    pub ftimes: f64,
    pub xtimes: f64,
    pub ytimes: f64,
    pub rtimes: f64,
}

impl Default for ChannelScale {
    fn default() -> Self {
        ChannelScale {
            ftimes: 1.0,
            xtimes: 1.0,
            ytimes: 1.0,
            rtimes: 1.0,
        }
    }
}

impl ChannelScale {
    /// Divides every signal channel by `fold`; frequency is untouched.
    pub fn from_fold(fold: f64) -> RenderResult<Self> {
        if fold == 0.0 || !fold.is_finite() {
            return Err(RenderError::InvalidFold { value: fold });
        }
        Ok(ChannelScale {
            ftimes: 1.0,
            xtimes: 1.0 / fold,
            ytimes: 1.0 / fold,
            rtimes: 1.0 / fold,
        })
    }
}

#[derive(Debug, Clone)]
pub struct SweepLoadOptions {
    pub scale: ChannelScale,
    pub log_path: Option<PathBuf>,
    pub norm_param: String,
    pub correction: Rc<dyn GainCorrection>,
}

impl Default for SweepLoadOptions {
    fn default() -> Self {
        SweepLoadOptions {
            scale: ChannelScale::default(),
            log_path: None,
            norm_param: DEFAULT_NORM_PARAM.to_string(),
            correction: Rc::new(FirstOrderRolloff::default()),
        }
    }
}

/// Reads a sweep file with `f`, `x`, `y` and optional `r` columns.
pub fn load_sweep(path: &Path, options: &SweepLoadOptions) -> Result<SweepData, Box<dyn Error>> {
    let table = Table::read(path)?;
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| table.source.clone());
    if table.records.is_empty() {
        return Err(RenderError::EmptyData { filename }.into());
    }

    let scaled = |col: usize, factor: f64| -> Array1<f64> {
        Array1::from(table.numeric_column(col)).mapv(|v| v * factor)
    };
    let scale = options.scale;
    let f = scaled(table.require_column("f")?, scale.ftimes);
    let x = scaled(table.require_column("x")?, scale.xtimes);
    let y = scaled(table.require_column("y")?, scale.ytimes);
    let r = table.column_index("r").map(|c| scaled(c, scale.rtimes));
    debug!(
        "Read {} points from '{}' (r column {})",
        f.len(),
        filename,
        if r.is_some() { "found" } else { "computed" }
    );

    let mut data = SweepData::new(&filename, f, x, y, r, options.correction.as_ref())?;
    match &options.log_path {
        Some(log_path) => {
            let entry = lookup_sweep_log(log_path, &filename, &options.norm_param)?;
            if entry.norm_value.is_none() {
                warn!(
                    "No '{}' value for '{}' in '{}'; normalized channels unavailable",
                    options.norm_param,
                    filename,
                    log_path.display()
                );
            }
            data = data.with_log_entry(entry);
        }
        None => info!("No sweep log given for '{}'", filename),
    }
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_analysis::gain_correction::Uncorrected;
    use crate::plot_mode::{ChannelVariant, SweepPlotMode};
    use ndarray::array;
    use std::io::Write;

    fn sample() -> SweepData {
        SweepData::new(
            "h1m_001.dat",
            array![1.0, 2.0],
            array![3.0, 0.0],
            array![4.0, 1.0],
            None,
            &Uncorrected,
        )
        .unwrap()
    }

    #[test]
    fn test_r_computed_from_x_y() {
        assert_eq!(sample().r, array![5.0, 1.0]);
    }

    #[test]
    fn test_mismatched_channel_lengths() {
        let err = SweepData::new(
            "a.dat",
            array![1.0, 2.0, 3.0],
            array![1.0],
            array![1.0, 2.0, 3.0],
            None,
            &Uncorrected,
        )
        .unwrap_err();
        assert_eq!(
            err,
            RenderError::ChannelLength {
                filename: "a.dat".to_string(),
                channel: "x",
                expected: 3,
                got: 1,
            }
        );
        assert!(matches!(
            SweepData::new(
                "a.dat",
                array![1.0, 2.0],
                array![1.0, 2.0],
                array![1.0, 2.0],
                Some(array![1.0, 2.0, 3.0]),
                &Uncorrected,
            ),
            Err(RenderError::ChannelLength { channel: "r", .. })
        ));
    }

    #[test]
    fn test_normalized_channel_requires_norm_value() {
        let data = sample();
        let mode = SweepPlotMode::parse("fxn").unwrap();
        assert!(matches!(
            data.channel(mode.y_channel()),
            Err(RenderError::NormalizationUnavailable { .. })
        ));
        // Frequency ignores modifiers.
        assert_eq!(data.channel(mode.x_channel()).unwrap(), array![1.0, 2.0]);

        let data = data.with_log_entry(SweepLogEntry {
            temperature_mk: Some(10.0),
            norm_value: Some(2.0),
        });
        assert_eq!(data.channel(mode.y_channel()).unwrap(), array![1.5, 0.0]);
    }

    #[test]
    fn test_gain_corrected_channel() {
        let data = SweepData::new(
            "s.dat",
            array![100.0],
            array![0.5],
            array![-0.5],
            None,
            &FirstOrderRolloff { corner_hz: 100.0 },
        )
        .unwrap();
        let gr = data
            .channel(SweepChannel::new(
                SweepAxis::R,
                ChannelVariant {
                    gain_corrected: true,
                    normalized: false,
                },
            ))
            .unwrap();
        assert!((gr[0] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_legend_label() {
        let data = sample();
        assert_eq!(data.legend_label(), "h1m_001");
        let data = data.with_log_entry(SweepLogEntry {
            temperature_mk: Some(12.345),
            norm_value: None,
        });
        assert_eq!(data.legend_label(), "h1m_001, 12.35mK");
    }

    #[test]
    fn test_load_sweep_with_fold_and_log() {
        let dir = tempfile::tempdir().unwrap();
        let data_path = dir.path().join("h1m_004.dat");
        let mut file = std::fs::File::create(&data_path).unwrap();
        writeln!(file, "f,x,y").unwrap();
        writeln!(file, "10,2,4").unwrap();
        writeln!(file, "20,6,8").unwrap();
        let log_path = dir.path().join("log.csv");
        std::fs::write(&log_path, "Filename,Tmm,VLowVpp\nh1m_004,9.5,0.5\n").unwrap();

        let options = SweepLoadOptions {
            scale: ChannelScale::from_fold(2.0).unwrap(),
            log_path: Some(log_path),
            correction: Rc::new(Uncorrected),
            ..Default::default()
        };
        let data = load_sweep(&data_path, &options).unwrap();
        assert_eq!(data.f, array![10.0, 20.0]);
        assert_eq!(data.x, array![1.0, 3.0]);
        assert_eq!(data.y, array![2.0, 4.0]);
        assert!((data.r[0] - 5.0f64.sqrt()).abs() < 1e-12);
        assert!((data.r[1] - 5.0).abs() < 1e-12);
        assert_eq!(data.temperature_mk, Some(9.5));
        assert_eq!(data.norm_value, Some(0.5));
    }

    #[test]
    fn test_invalid_fold() {
        assert!(ChannelScale::from_fold(0.0).is_err());
        assert!(ChannelScale::from_fold(f64::NAN).is_err());
    }
}

// src/data_input/sweep_data.rs
