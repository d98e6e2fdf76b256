pub const TROLL: &[&str] = &[
    "Oops!",
    "Too shaky!",
    "Skill issue detected",
    "Try again butterfingers",
    "Not even close",
    "Are you even trying?",
    "My grandma has steadier hands",
    "Slippery!",
    "Nice try",
    "Nope.",
    "Glitch in the matrix?",
    "Lag?",
    "User error",
    "Access Denied",
    "Error 404: Win not found",
    "Buffering...",
    "Recalculating...",
    "Do not pass go",
    "Slippery when wet",
    "Hand sweat detected",
    "Physics engine crashed",
    "Keyboard not found",
    "Mouse disconnected",
    "Nice hustle though",
    "Almost... psych!",
    "Precise movement required",
    "Too fast!",
    "Too slow!",
    "Just give up",
    "Why are you doing this?",
    "Go touch grass",
    "Get better hands",
    "Is your mouse broken?",
    "Hardware limitation: YOU",
    "Embarrassing...",
    "Pathetic attempt",
    "You lack the hardware",
    "Emotional damage?",
    "Have you tried winning?",
    "Stop shaking",
];

/// Used above 90% and by the hard stop.
pub const INTENSE: &[&str] = &[
    "NO.",
    "ABSOLUTELY NOT",
    "SYSTEM FAILURE",
    "CRITICAL ERROR",
    "STOP IT",
    "IMPOSSIBLE",
    "DONT YOU DARE",
    "SECURITY ALERT",
    "UNAUTHORIZED",
    "VIOLATION DETECTED",
    "NOPE NOPE NOPE",
    "GET AWAY",
    "I SAID NO",
];

pub const VICTORY: &[&str] = &[
    "YOU ACTUALLY DID IT!?",
    "IMPOSSIBLE!",
    "HACKER DETECTED!",
    "GODLIKE PATIENCE!",
    "FINALLY!",
];

pub const REVERSED: &str = "Controls Reversed!";
pub const SNAP: &str = "NOPE";
pub const REGRESSION: &str = "Whoops!";
pub const JUMP_START: &str = "Jump start!";
pub const BUTTERFINGERS: &str = "Butterfingers!";
