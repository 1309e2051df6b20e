//! # qmbc-io
//!
//! The boundary around the correction core: read gridded series from
//! NetCDF, bring them onto a common calendar, period and grid, check their
//! alignment, and write the corrected series back out.

mod error;
mod netcdf_read;
mod netcdf_write;
mod preprocess;
mod reader;
mod validate;

pub use error::IoError;
pub use netcdf_write::{NetcdfSink, WriterConfig, write_netcdf};
pub use preprocess::{add_offset, drop_leap_days, regrid_bilinear, slice_period, subset_window};
pub use reader::{ReaderConfig, read_netcdf};
pub use validate::{COORD_TOLERANCE, validate_alignment};
