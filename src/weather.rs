use serde::{Deserialize, Serialize};

/// Below this visibility the tower operates one clearance per minute.
pub const REDUCED_VISIBILITY_KM: u32 = 6;

/// Latest visibility observation, taken from the newest METAR line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherReading {
    pub visibility_km: u32,
}

impl WeatherReading {
    pub fn reduced_visibility(self) -> bool {
        self.visibility_km < REDUCED_VISIBILITY_KM
    }

    /// Extracts the `VIS <n>KM` group from a METAR line. A report without a
    /// readable visibility yields `None`, which callers treat as
    /// unrestricted.
    pub fn parse_metar(line: &str) -> Option<WeatherReading> {
        let frag = line.split_once("VIS")?.1.trim_start();
        let km = frag.split_once("KM")?.0.trim();
        km.parse().ok().map(|v| WeatherReading { visibility_km: v })
    }
}
