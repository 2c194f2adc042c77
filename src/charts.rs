//! Renders chart specs to inline SVG with plotters. The overview embeds the
//! returned markup directly, so no image files or extra routes are needed.

use super::metrics::{BarSpec, PieSpec};
use anyhow::{anyhow, Result};
use plotters::prelude::*;

const CHART_SIZE: (u32, u32) = (460, 320);

/// Cycled over pie slices and bar statuses.
const PALETTE: [RGBColor; 6] = [
    RGBColor(92, 176, 255),
    RGBColor(63, 182, 139),
    RGBColor(240, 99, 92),
    RGBColor(247, 200, 67),
    RGBColor(155, 128, 222),
    RGBColor(127, 139, 160),
];

pub fn render_pie(spec: &PieSpec) -> Result<String> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, CHART_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(|e| anyhow!("pie chart: {e}"))?;
        let root = root
            .titled(&spec.title, ("sans-serif", 18).into_font())
            .map_err(|e| anyhow!("pie chart: {e}"))?;

        let (width, height) = root.dim_in_pixel();
        let center = (width as i32 / 2, height as i32 / 2);
        let radius = f64::from(width.min(height)) * 0.35;
        let sizes: Vec<f64> = spec.slices.iter().map(|(_, count)| *count as f64).collect();
        let colors: Vec<RGBColor> = (0..spec.slices.len())
            .map(|i| PALETTE[i % PALETTE.len()])
            .collect();
        let labels: Vec<String> = spec
            .slices
            .iter()
            .map(|(status, count)| format!("{status} ({count})"))
            .collect();

        let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
        pie.label_style(("sans-serif", 14).into_font().color(&BLACK));
        root.draw(&pie).map_err(|e| anyhow!("pie chart: {e}"))?;
        root.present().map_err(|e| anyhow!("pie chart: {e}"))?;
    }
    Ok(svg)
}

pub fn render_bar(spec: &BarSpec) -> Result<String> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, CHART_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(|e| anyhow!("bar chart: {e}"))?;

        let max_amount = spec.bars.iter().map(|b| b.amount).fold(0.0_f64, f64::max);
        let y_top = if max_amount > 0.0 { max_amount * 1.1 } else { 1.0 };
        let bar_count = spec.bars.len() as i32;

        let mut chart = ChartBuilder::on(&root)
            .caption(&spec.title, ("sans-serif", 18))
            .margin(10)
            .x_label_area_size(28)
            .y_label_area_size(48)
            .build_cartesian_2d((0..bar_count).into_segmented(), 0.0..y_top)
            .map_err(|e| anyhow!("bar chart: {e}"))?;

        let dates: Vec<&str> = spec.bars.iter().map(|b| b.date.as_str()).collect();
        let x_label = |segment: &SegmentValue<i32>| match segment {
            SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => dates
                .get(*i as usize)
                .map(|d| d.to_string())
                .unwrap_or_default(),
            SegmentValue::Last => String::new(),
        };
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(spec.bars.len().min(8))
            .x_label_formatter(&x_label)
            .draw()
            .map_err(|e| anyhow!("bar chart: {e}"))?;

        // one series per status so the legend maps color to status
        let mut statuses: Vec<&str> = Vec::new();
        for bar in &spec.bars {
            if !statuses.contains(&bar.status.as_str()) {
                statuses.push(&bar.status);
            }
        }
        for (index, status) in statuses.iter().enumerate() {
            let color = PALETTE[index % PALETTE.len()];
            chart
                .draw_series(
                    spec.bars
                        .iter()
                        .enumerate()
                        .filter(|(_, bar)| bar.status == *status)
                        .map(|(i, bar)| {
                            let i = i as i32;
                            Rectangle::new(
                                [
                                    (SegmentValue::Exact(i), 0.0),
                                    (SegmentValue::Exact(i + 1), bar.amount),
                                ],
                                color.filled(),
                            )
                        }),
                )
                .map_err(|e| anyhow!("bar chart: {e}"))?
                .label(*status)
                .legend(move |(x, y)| {
                    Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled())
                });
        }
        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()
            .map_err(|e| anyhow!("bar chart: {e}"))?;
        root.present().map_err(|e| anyhow!("bar chart: {e}"))?;
    }
    Ok(svg)
}
