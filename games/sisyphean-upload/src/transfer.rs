//! Transfer rate curve and the status line shown above the progress bar.

use std::fmt;

/// Progress gained per tick at `progress`. Each band is far slower than the last.
pub fn upload_rate(progress: f32) -> f32 {
    if progress < 50.0 {
        0.4
    } else if progress < 80.0 {
        0.2
    } else if progress < 90.0 {
        0.05
    } else if progress < 95.0 {
        0.02
    } else if progress < 98.0 {
        0.005
    } else {
        0.001
    }
}

/// Status line. The code travels in STATUS events; the text goes to the HUD.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    WaitingForInput,
    Uploading,
    PacketLoss,
    Overheat,
    Cooled,
    RolledBack,
    /// Fake completion banner.
    Complete,
    Error(&'static str),
}

impl Status {
    pub fn code(self) -> u8 {
        match self {
            Status::WaitingForInput => 0,
            Status::Uploading => 1,
            Status::PacketLoss => 2,
            Status::Overheat => 3,
            Status::Cooled => 4,
            Status::RolledBack => 5,
            Status::Complete => 6,
            Status::Error(_) => 7,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::WaitingForInput => f.write_str("WAITING_FOR_INPUT"),
            Status::Uploading => f.write_str("UPLOADING..."),
            Status::PacketLoss => f.write_str("PACKET LOSS DETECTED"),
            Status::Overheat => f.write_str("SYSTEM OVERHEAT! COOLDOWN REQUIRED"),
            Status::Cooled => f.write_str("SYSTEM COOLED. RESUME UPLOAD."),
            Status::RolledBack => f.write_str("PREMATURE DISCONNECTION. ROLLED BACK."),
            Status::Complete => f.write_str("UPLOAD COMPLETE! YOU CAN LET GO NOW."),
            Status::Error(msg) => write!(f, "ERROR: {}", msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_bands() {
        assert_eq!(upload_rate(0.0), 0.4);
        assert_eq!(upload_rate(49.9), 0.4);
        assert_eq!(upload_rate(50.0), 0.2);
        assert_eq!(upload_rate(85.0), 0.05);
        assert_eq!(upload_rate(92.0), 0.02);
        assert_eq!(upload_rate(97.0), 0.005);
        assert_eq!(upload_rate(99.0), 0.001);
    }

    #[test]
    fn status_text() {
        assert_eq!(Status::Error("Try harder").to_string(), "ERROR: Try harder");
        assert_eq!(Status::Overheat.to_string(), "SYSTEM OVERHEAT! COOLDOWN REQUIRED");
        assert_ne!(Status::Error("a").code(), Status::Cooled.code());
    }
}
