//! Boxplot and jitter summaries of the aggregated CPUE table.

use crate::{region_color, IMAGE_SIZE};
use anyhow::ensure;
use fsc_core::{AggregatedCpue, Region, WaterYearType};
use log::info;
use plotters::prelude::*;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::collections::BTreeMap;
use std::path::Path;

/// Per-water-year boxplots of mean CPUE, one box per region, side by side.
pub fn cpue_boxplot(out_path: &Path, rows: &[AggregatedCpue]) -> anyhow::Result<()> {
    ensure!(!rows.is_empty(), "nothing to plot");

    let mut by_year_region: BTreeMap<(i32, Region), Vec<f64>> = BTreeMap::new();
    for row in rows {
        by_year_region
            .entry((row.water_year, row.region))
            .or_default()
            .push(row.mean_cpue);
    }
    let min_year = rows.iter().map(|r| r.water_year).min().unwrap_or(0);
    let max_year = rows.iter().map(|r| r.water_year).max().unwrap_or(0);
    let y_max = rows
        .iter()
        .map(|r| r.mean_cpue)
        .fold(f64::NEG_INFINITY, f64::max)
        * 1.15;

    let root = BitMapBackend::new(out_path, IMAGE_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption("Mean CPUE by water year and region", ("sans-serif", 28))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(
            (min_year..max_year + 1).into_segmented(),
            0.0f32..y_max as f32,
        )?;
    chart
        .configure_mesh()
        .x_desc("Water year")
        .y_desc("Mean CPUE")
        .draw()?;

    for region in Region::all() {
        let color = region_color(region);
        let offset = match region {
            Region::AboveLisbon => -10,
            Region::BelowLisbon => 10,
        };
        chart
            .draw_series(by_year_region.iter().filter_map(|(&(year, r), values)| {
                if r != region {
                    return None;
                }
                let quartiles = Quartiles::new(values);
                Some(
                    Boxplot::new_vertical(SegmentValue::CenterOf(year), &quartiles)
                        .width(14)
                        .whisker_width(0.6)
                        .style(color.stroke_width(2))
                        .offset(offset),
                )
            }))?
            .label(region.code())
            .legend(move |(x, y)| Circle::new((x, y), 5, color.filled()));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;
    root.present()?;
    info!("wrote {}", out_path.display());
    Ok(())
}

/// Jittered mean-CPUE points by water-year type, colored by region.
pub fn cpue_jitter(out_path: &Path, rows: &[AggregatedCpue], seed: u64) -> anyhow::Result<()> {
    ensure!(!rows.is_empty(), "nothing to plot");

    let categories = WaterYearType::all();
    let position_of = |wyt: WaterYearType| {
        categories
            .iter()
            .position(|&c| c == wyt)
            .unwrap_or(0) as f64
    };
    let y_max = rows
        .iter()
        .map(|r| r.mean_cpue)
        .fold(f64::NEG_INFINITY, f64::max)
        * 1.15;

    let root = BitMapBackend::new(out_path, IMAGE_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption("Mean CPUE by water-year type", ("sans-serif", 28))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(-0.5f64..(categories.len() as f64 - 0.5), 0.0..y_max)?;
    chart
        .configure_mesh()
        .x_labels(categories.len())
        .x_label_formatter(&|x| {
            let index = x.round();
            if (x - index).abs() > 1e-9 || index < 0.0 || index >= categories.len() as f64 {
                return String::new();
            }
            categories[index as usize].name().to_string()
        })
        .x_desc("Water-year type")
        .y_desc("Mean CPUE")
        .draw()?;

    let mut rng = StdRng::seed_from_u64(seed);
    for region in Region::all() {
        let color = region_color(region);
        let points: Vec<(f64, f64)> = rows
            .iter()
            .filter(|r| r.region == region)
            .map(|r| {
                let jitter = rng.gen_range(-0.18..0.18);
                (position_of(r.water_year_type) + jitter, r.mean_cpue)
            })
            .collect();
        if points.is_empty() {
            continue;
        }
        chart
            .draw_series(
                points
                    .iter()
                    .map(|&(x, y)| Circle::new((x, y), 4, color.mix(0.8).filled())),
            )?
            .label(region.code())
            .legend(move |(x, y)| Circle::new((x, y), 4, color.filled()));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;
    root.present()?;
    info!("wrote {}", out_path.display());
    Ok(())
}
