//! Default values shared by configuration loaders
//!
//! Most moored buoys log every 10 or 15 minutes; 15 is the default applied
//! when a dataset document omits its interval.

/// Default sampling interval in minutes
pub const DEFAULT_SAMPLING_INTERVAL_MINUTES: i64 = 15;

/// Largest sampling interval accepted from configuration (one day)
pub const MAX_SAMPLING_INTERVAL_MINUTES: i64 = 24 * 60;

/// Rate-of-change limit meaning "never flag by rate"
pub const UNLIMITED_RATE_OF_CHANGE: f32 = f32::INFINITY;
