//! PNG rendering for the community analysis: NMDS ordination scatter with
//! group ellipses, and CPUE boxplot/jitter summaries.

pub mod cpue;
pub mod scatter;

use fsc_core::Region;
use plotters::style::RGBColor;

/// Fixed pixel size for every output image.
pub const IMAGE_SIZE: (u32, u32) = (1200, 900);

/// Group colors for the two regions, kept consistent across all plots.
pub fn region_color(region: Region) -> RGBColor {
    match region {
        // ColorBrewer Set1 blue / red
        Region::AboveLisbon => RGBColor(55, 126, 184),
        Region::BelowLisbon => RGBColor(228, 26, 28),
    }
}
