pub mod dates;
pub mod error;
pub mod region;
pub mod sample;
pub mod water_year;

pub use error::CoreError;
pub use region::Region;
pub use sample::{AggregatedCpue, SeineSample, SiteKey};
pub use water_year::WaterYearType;
