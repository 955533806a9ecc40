//! Discrete labels for rounded sensor readings.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelBand {
    pub label: &'static str,
    pub min: i64,
    pub max: i64,
}

const fn band(label: &'static str, min: i64, max: i64) -> LevelBand {
    LevelBand { label, min, max }
}

/// Noise in dB, each band named after something equally loud.
pub const NOISE_LEVELS: &[LevelBand] = &[
    band("Maus", 0, 30),
    band("Sprechen", 31, 60),
    band("Staubsauger", 61, 80),
    band("Motorrad", 81, 100),
    band("Presslufthammer", 101, 120),
    band("Flugzeug", 121, 200),
];

/// Air-quality score (mean VOC, ppb).
pub const AIR_QUALITY_LEVELS: &[LevelBand] = &[
    band("gut", 0, 50),
    band("mäßig", 51, 100),
    band("schlecht", 101, i64::MAX),
];

/// First band containing `value`, bounds inclusive. `None` means the raw
/// number is shown on its own.
pub fn classify(table: &[LevelBand], value: i64) -> Option<&'static str> {
    table
        .iter()
        .find(|band| band.min <= value && value <= band.max)
        .map(|band| band.label)
}

pub fn noise_level(db: i64) -> Option<&'static str> {
    classify(NOISE_LEVELS, db)
}

pub fn air_quality(score: i64) -> Option<&'static str> {
    classify(AIR_QUALITY_LEVELS, score)
}
