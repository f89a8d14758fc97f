//! NMDS ordination scatter plot with per-region confidence ellipses.

use crate::{region_color, IMAGE_SIZE};
use anyhow::ensure;
use fsc_core::{Region, SiteKey};
use log::info;
use plotters::prelude::*;
use std::path::Path;

/// 95% quantile of the chi-squared distribution with 2 degrees of freedom,
/// the scaling for a bivariate-normal confidence ellipse.
const CHI2_95_2DF: f64 = 5.991;

/// Draw the NMDS scatter: axis 1 vs axis 2, one point per site unit,
/// colored by region, with a 95% confidence ellipse per region and the
/// stress value in the caption. Sites and coordinates are matched by index
/// against the same keyed site vector the pivot produced.
pub fn nmds_scatter(
    out_path: &Path,
    sites: &[SiteKey],
    coordinates: &[[f64; 2]],
    stress: f64,
) -> anyhow::Result<()> {
    ensure!(
        sites.len() == coordinates.len(),
        "{} sites but {} coordinate rows",
        sites.len(),
        coordinates.len()
    );
    ensure!(!sites.is_empty(), "nothing to plot");

    let (x_range, y_range) = padded_ranges(coordinates);

    let root = BitMapBackend::new(out_path, IMAGE_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("NMDS of fish community composition (stress = {stress:.3})"),
            ("sans-serif", 28),
        )
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range, y_range)?;
    chart
        .configure_mesh()
        .x_desc("NMDS1")
        .y_desc("NMDS2")
        .draw()?;

    for region in Region::all() {
        let color = region_color(region);
        let points: Vec<(f64, f64)> = sites
            .iter()
            .zip(coordinates.iter())
            .filter(|(site, _)| site.region == region)
            .map(|(_, xy)| (xy[0], xy[1]))
            .collect();
        if points.is_empty() {
            continue;
        }

        if let Some(ellipse) = confidence_ellipse(&points) {
            chart.draw_series(std::iter::once(PathElement::new(
                ellipse,
                color.mix(0.6).stroke_width(2),
            )))?;
        }

        chart
            .draw_series(
                points
                    .iter()
                    .map(|&(x, y)| Circle::new((x, y), 5, color.filled())),
            )?
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

fn padded_ranges(coordinates: &[[f64; 2]]) -> (std::ops::Range<f64>, std::ops::Range<f64>) {
    let mut x_min = f64::INFINITY;
    let mut x_max = f64::NEG_INFINITY;
    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;
    for &[x, y] in coordinates {
        x_min = x_min.min(x);
        x_max = x_max.max(x);
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }
    // leave room for the ellipses to overshoot the points
    let x_pad = ((x_max - x_min) * 0.35).max(0.05);
    let y_pad = ((y_max - y_min) * 0.35).max(0.05);
    ((x_min - x_pad)..(x_max + x_pad), (y_min - y_pad)..(y_max + y_pad))
}

/// Polygon approximating the 95% bivariate-normal confidence ellipse of a
/// point cloud. Needs at least three points for a covariance estimate.
fn confidence_ellipse(points: &[(f64, f64)]) -> Option<Vec<(f64, f64)>> {
    if points.len() < 3 {
        return None;
    }
    let n = points.len() as f64;
    let mean_x = points.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = points.iter().map(|p| p.1).sum::<f64>() / n;
    let mut sxx = 0.0;
    let mut sxy = 0.0;
    let mut syy = 0.0;
    for &(x, y) in points {
        sxx += (x - mean_x) * (x - mean_x);
        sxy += (x - mean_x) * (y - mean_y);
        syy += (y - mean_y) * (y - mean_y);
    }
    sxx /= n - 1.0;
    sxy /= n - 1.0;
    syy /= n - 1.0;

    // closed-form eigen-decomposition of the 2x2 covariance
    let trace_half = (sxx + syy) / 2.0;
    let discriminant = (((sxx - syy) / 2.0).powi(2) + sxy * sxy).sqrt();
    let lambda_major = (trace_half + discriminant).max(0.0);
    let lambda_minor = (trace_half - discriminant).max(0.0);
    let angle = if sxy.abs() < 1e-15 && sxx >= syy {
        0.0
    } else if sxy.abs() < 1e-15 {
        std::f64::consts::FRAC_PI_2
    } else {
        (lambda_major - sxx).atan2(sxy)
    };

    let semi_major = (CHI2_95_2DF * lambda_major).sqrt();
    let semi_minor = (CHI2_95_2DF * lambda_minor).sqrt();
    let (sin, cos) = angle.sin_cos();

    let segments = 120;
    let mut polygon = Vec::with_capacity(segments + 1);
    for step in 0..=segments {
        let t = step as f64 / segments as f64 * std::f64::consts::TAU;
        let u = semi_major * t.cos();
        let v = semi_minor * t.sin();
        polygon.push((mean_x + u * cos - v * sin, mean_y + u * sin + v * cos));
    }
    Some(polygon)
}

#[cfg(test)]
mod tests {
    use super::confidence_ellipse;

    #[test]
    fn test_ellipse_needs_three_points() {
        assert!(confidence_ellipse(&[(0.0, 0.0), (1.0, 1.0)]).is_none());
    }

    #[test]
    fn test_ellipse_surrounds_centroid() {
        let points = [(0.0, 0.0), (1.0, 0.2), (0.5, 1.0), (0.2, 0.6), (0.9, 0.9)];
        let polygon = confidence_ellipse(&points).unwrap();
        assert_eq!(polygon.len(), 121);
        // closed path
        let first = polygon.first().unwrap();
        let last = polygon.last().unwrap();
        assert!((first.0 - last.0).abs() < 1e-9 && (first.1 - last.1).abs() < 1e-9);
        // centroid falls inside the bounding box of the polygon
        let cx = points.iter().map(|p| p.0).sum::<f64>() / points.len() as f64;
        let cy = points.iter().map(|p| p.1).sum::<f64>() / points.len() as f64;
        let x_min = polygon.iter().map(|p| p.0).fold(f64::INFINITY, f64::min);
        let x_max = polygon.iter().map(|p| p.0).fold(f64::NEG_INFINITY, f64::max);
        let y_min = polygon.iter().map(|p| p.1).fold(f64::INFINITY, f64::min);
        let y_max = polygon.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);
        assert!(x_min < cx && cx < x_max);
        assert!(y_min < cy && cy < y_max);
    }
}
