pub const UPLOAD: &[&str] = &[
    "Wifi disconnected?",
    "My grandma clicks faster",
    "Packet loss detected (Skill issue)",
    "Buffering... forever",
    "Why did you let go?",
    "So close! (Not really)",
    "Upload failed: PEBKAC error",
    "Server is busy ignoring you",
    "Have you tried turning it off?",
    "File too large for your patience",
    "Connection reset by peer",
    "User ran out of willpower",
    "Bitrate dropped to 0",
    "You are not worthy",
    "Go scratch your head",
    "You must construct additional pylons",
    "Critical failure detected in user",
    "Try harder",
    "Weak signal (in your brain)",
];
