/// Shouted when the star escapes a grab or the jar.
pub const STAR: &[&str] = &[
    "NOPE.",
    "NOT TIRED!",
    "TRY HARDER!",
    "TOO SLOW!",
    "YOU CAN'T!",
    "NEVER!",
    "I AM SPEED!",
    "ACCESS DENIED",
    "NICE TRY",
    "BUTTERFINGERS!",
    "I REFUSE!",
    "NO BEDTIME!",
    "CATCH ME!",
    "SYSTEM ERROR",
    "HAHAHA!",
    "LET GO!",
    "UNHAND ME!",
    "I'M BUSY!",
];

/// Held too long.
pub const HOLD: &[&str] = &[
    "SEPARATION ANXIETY?",
    "JUST THROW IT!",
    "LET ME GO!",
    "WHY ARE WE HERE?",
    "CLINGY MUCH?",
    "I'M NOT YOURS",
    "TIMING OUT...",
];
