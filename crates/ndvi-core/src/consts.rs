/// Position of the visible-red band in the sensor's band order.
pub const RED_BAND_INDEX: usize = 2;

/// Position of the near-infrared band in the sensor's band order.
pub const NIR_BAND_INDEX: usize = 3;

/// Denominator stabiliser used by the single-shot label generator.
pub const LABELS_EPSILON: f32 = 1e-10;

/// Denominator stabiliser used by the smoothed NDVI utilities.
pub const UTILS_EPSILON: f32 = 1e-6;

/// Default Gaussian sigma for the smoothed profile.
pub const DEFAULT_BLUR_SIGMA: f32 = 5.0;

/// Gaussian kernel radius in units of sigma.
pub const GAUSSIAN_TRUNCATE: f32 = 4.0;

/// Largest blur sigma a pipeline config may request.
pub const MAX_BLUR_SIGMA: f32 = 1000.0;

/// Upper bound on the Gaussian kernel half-width, in pixels.
pub const MAX_KERNEL_RADIUS: usize = 4096;

/// Label assigned to pixels no threshold rule matches.
pub const DEFAULT_LABEL: u8 = 0;

/// Number of channels in a display-ready RGB export.
pub const RGB_CHANNEL_COUNT: usize = 3;

/// Scale factor mapping labels 0..=3 onto the full 8-bit range.
pub const LABEL_SCALE_U8: u16 = 85;

/// Scale factor mapping a full 8-bit value onto the full 16-bit range.
pub const LABEL_SCALE_U16: u16 = 257;

/// File extension used for raw array dumps.
pub const RAW_ARRAY_EXTENSION: &str = "npy";
