pub mod npy;
pub mod raster_io;
