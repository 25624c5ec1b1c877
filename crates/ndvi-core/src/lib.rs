pub mod bands;
pub mod classify;
pub mod consts;
pub mod encode;
pub mod error;
pub mod filters;
pub mod io;
pub mod ndvi;
pub mod pipeline;
pub mod raster;
