//! Global constants used throughout the admap codebase.
//!
//! This module contains default data file names, well-known GeoJSON property
//! keys, timeouts, and environment variable names that are used across
//! multiple modules. Defining them centrally keeps the magic strings of the
//! source datasets discoverable in one place.

/// Default file name of the district layer inside the data location.
pub const DEFAULT_DISTRICT_FILE: &str = "districts.geojson";

/// Default file name of the sub-unit (SS) layer inside the data location.
pub const DEFAULT_SUBUNIT_FILE: &str = "ss.geojson";

/// Default file name of the village layer inside the data location.
pub const DEFAULT_VILLAGE_FILE: &str = "villages.geojson";

/// Default data location, relative to the working directory.
pub const DEFAULT_DATA_LOCATION: &str = "data";

/// Default timeout for loading a single layer document (30 seconds).
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

/// Property holding the normalized village label written by `admap clean`.
pub const CLEAN_NAME_KEY: &str = "village_clean";

/// Secondary property some datasets use for the district name on child layers.
pub const DISTRICT_FALLBACK_KEY: &str = "district_name";

/// Secondary property some datasets use for the sub-unit name.
pub const SUBUNIT_FALLBACK_KEY: &str = "subdistric_name";

/// Village area in square kilometres, when the dataset provides it.
pub const AREA_KEY: &str = "area_km2";

/// Label used for villages whose raw name is missing or blank.
pub const UNKNOWN_VILLAGE: &str = "Unknown Village";

/// Set to any value to disable spinners.
pub const NO_PROGRESS_ENV: &str = "ADMAP_NO_PROGRESS";

/// Overrides the configuration file location.
pub const CONFIG_ENV: &str = "ADMAP_CONFIG";
