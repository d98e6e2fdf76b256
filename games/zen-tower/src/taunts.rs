/// Shown when a tall tower comes down.
pub const ZEN: &[&str] = &[
    "Everything falls eventually.",
    "Gravity is patient. You are not.",
    "Breathe in. Watch it fall.",
    "Let go of the tower. It already let go of you.",
    "Balance is an illusion.",
    "Even mountains crumble.",
    "The stack was never yours to keep.",
    "Impermanence, in block form.",
    "Inner peace not found.",
    "The wind sends its regards.",
];

/// Shown when the tower dies young.
pub const EARLY_FAILURE: &[&str] = &[
    "That was fast.",
    "Did you even look?",
    "The intro blocks did all the work.",
    "Zen requires at least trying.",
    "Four blocks. Truly enlightened.",
    "The pedestal is right there.",
    "Speedrun to failure?",
    "Maybe meditate first.",
];
