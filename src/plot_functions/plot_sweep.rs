// src/plot_functions/plot_sweep.rs

use tracing::debug;

use crate::axis_names::sweep_axis_label;
use crate::data_input::sweep_data::SweepData;
use crate::error::RenderResult;
use crate::plot_framework::{require_panels, Panel, SeriesHandle};
use crate::plot_functions::PlotStyle;
use crate::plot_mode::{all_quartet, ChannelVariant, SweepPlotMode};

fn add_sweep_curve(
    panel: &mut Panel,
    data: &SweepData,
    mode: &SweepPlotMode,
    style: &PlotStyle,
) -> RenderResult<SeriesHandle> {
    let x_values = data.channel(mode.x_channel())?;
    let y_values = data.channel(mode.y_channel())?;
    debug!(
        "{}: {} vs {} ({} points)",
        data.filename,
        mode.y_channel(),
        mode.x_channel(),
        x_values.len()
    );

    let series = style.cycled_series(&x_values, &y_values, data.legend_label());
    let handle = panel.add_series(series);
    panel.set_labels(sweep_axis_label(mode.x_axis), sweep_axis_label(mode.y_axis));
    if let Some(legend) = style.legend {
        panel.legend = Some(legend);
    }
    panel.grid = true;
    Ok(handle)
}

/// Plots one sweep on one panel according to a mode string such as `"fx"` or `"gnxy"`.
pub fn sweep_single(
    panel: &mut Panel,
    data: &SweepData,
    mode: &str,
    style: &PlotStyle,
) -> RenderResult<SeriesHandle> {
    let mode = SweepPlotMode::parse(mode)?;
    add_sweep_curve(panel, data, &mode, style)
}

/// Plots `fx`, `fy`, `fr` and `xy` onto four panels (row-major 2x2).
/// The mode only contributes its gain-correction / normalization modifiers.
pub fn sweep_all(
    panels: &mut [Panel],
    data: &SweepData,
    mode: &str,
    style: &PlotStyle,
) -> RenderResult<[SeriesHandle; 4]> {
    require_panels(panels, 4)?;
    let quiet = style.without_legend();
    let mut handles = [0; 4];
    for (i, sub_mode) in all_quartet(ChannelVariant::from_mode(mode)).iter().enumerate() {
        let panel_style = if i == 0 { style } else { &quiet };
        handles[i] = add_sweep_curve(&mut panels[i], data, sub_mode, panel_style)?;
    }
    Ok(handles)
}

/// Plots mode `i` onto panel `i`. The legend, when enabled, goes on the first panel only.
pub fn sweep_multiple<S: AsRef<str>>(
    panels: &mut [Panel],
    data: &SweepData,
    modes: &[S],
    style: &PlotStyle,
) -> RenderResult<Vec<SeriesHandle>> {
    let parsed = modes
        .iter()
        .map(|m| SweepPlotMode::parse(m.as_ref()))
        .collect::<RenderResult<Vec<_>>>()?;
    require_panels(panels, parsed.len())?;
    let quiet = style.without_legend();
    parsed
        .iter()
        .zip(panels.iter_mut())
        .enumerate()
        .map(|(i, (mode, panel))| {
            let panel_style = if i == 0 { style } else { &quiet };
            add_sweep_curve(panel, data, mode, panel_style)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::axis_names::{LABEL_FREQUENCY, LABEL_R_CHANNEL, LABEL_X_CHANNEL, LABEL_Y_CHANNEL};
    use crate::data_analysis::gain_correction::Uncorrected;
    use crate::data_input::sweep_log::SweepLogEntry;
    use crate::error::RenderError;
    use crate::style_cycle::StyleIndex;
    use ndarray::array;

    fn sample() -> SweepData {
        SweepData::new(
            "h1m_001.dat",
            array![100.0, 200.0, 300.0],
            array![1.0, 2.0, 3.0],
            array![0.5, 0.0, -0.5],
            None,
            &Uncorrected,
        )
        .unwrap()
        .with_log_entry(SweepLogEntry {
            temperature_mk: Some(15.0),
            norm_value: Some(2.0),
        })
    }

    #[test]
    fn test_sweep_single_adds_curve_and_labels() {
        let mut panel = Panel::new();
        let handle = sweep_single(&mut panel, &sample(), "fX", &PlotStyle::default()).unwrap();
        assert_eq!(handle, 0);
        let series = &panel.series[0];
        assert_eq!(series.data, vec![(100.0, 1.0), (200.0, 2.0), (300.0, 3.0)]);
        assert_eq!(series.label, "h1m_001, 15.00mK");
        assert_eq!(panel.x_label, LABEL_FREQUENCY);
        assert_eq!(panel.y_label, LABEL_X_CHANNEL);
        assert!(panel.grid);
        assert!(panel.legend.is_some());
    }

    #[test]
    fn test_sweep_single_normalized_and_swapped() {
        let mut panel = Panel::new();
        sweep_single(&mut panel, &sample(), "xfn", &PlotStyle::default()).unwrap();
        assert_eq!(panel.series[0].data[1], (1.0, 200.0));
        assert_eq!(panel.x_label, LABEL_X_CHANNEL);
    }

    #[test]
    fn test_sweep_single_without_legend() {
        let mut panel = Panel::new();
        let style = PlotStyle::default().without_legend();
        sweep_single(&mut panel, &sample(), "fy", &style).unwrap();
        assert!(panel.legend.is_none());
    }

    #[test]
    fn test_sweep_single_bad_mode() {
        let mut panel = Panel::new();
        assert!(matches!(
            sweep_single(&mut panel, &sample(), "fq", &PlotStyle::default()),
            Err(RenderError::UnrecognizedMode { .. })
        ));
        assert!(panel.series.is_empty());
    }

    #[test]
    fn test_sweep_all_quartet() {
        let mut panels = vec![Panel::new(); 4];
        let handles = sweep_all(&mut panels, &sample(), "all", &PlotStyle::default()).unwrap();
        assert_eq!(handles, [0, 0, 0, 0]);
        assert_eq!(panels[2].y_label, LABEL_R_CHANNEL);
        assert_eq!(panels[3].x_label, LABEL_X_CHANNEL);
        assert_eq!(panels[3].y_label, LABEL_Y_CHANNEL);
        assert!(panels[0].legend.is_some());
        assert!(panels[1..].iter().all(|p| p.legend.is_none()));
    }

    #[test]
    fn test_sweep_all_needs_four_panels() {
        let mut panels = vec![Panel::new(); 3];
        assert!(matches!(
            sweep_all(&mut panels, &sample(), "all", &PlotStyle::default()),
            Err(RenderError::PanelCount { expected: 4, got: 3 })
        ));
    }

    #[test]
    fn test_sweep_multiple_shares_style() {
        let mut panels = vec![Panel::new(); 2];
        let style = PlotStyle {
            index: StyleIndex::uniform(2),
            ..PlotStyle::default()
        };
        let handles = sweep_multiple(&mut panels, &sample(), &["fr", "xny"], &style).unwrap();
        assert_eq!(handles.len(), 2);
        assert_eq!(panels[0].series[0].color, panels[1].series[0].color);
        assert!(panels[0].legend.is_some());
        assert!(panels[1].legend.is_none());
        // "ny" is a single axis character after stripping the modifier.
        assert!(sweep_multiple(&mut panels, &sample(), &["ny"], &style).is_err());
    }
}

// src/plot_functions/plot_sweep.rs
