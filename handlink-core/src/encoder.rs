//! Angle vector to wire frame encoding

use handlink_protocol::{Command, FrameError, WireFrame};

use crate::channel::AngleVector;

/// Converts commanded angles into wire frames
#[derive(Debug, Clone, Copy, Default)]
pub struct CommandEncoder;

impl CommandEncoder {
    /// Integer command for an angle vector
    ///
    /// Rounds half to even, clamps into `0..=65535`, and maps NaN to 0.
    pub fn to_command(angles: &AngleVector) -> Command {
        // Float-to-int `as` saturates and sends NaN to 0
        Command::new(angles.0.map(|a| a.round_ties_even() as u16))
    }

    /// Encode an angle vector into a ready-to-send frame
    pub fn encode(angles: &AngleVector) -> Result<WireFrame, FrameError> {
        Self::to_command(angles).encode()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_canonical() {
        let frame = CommandEncoder::encode(&AngleVector::new([180.0, 0.0, 180.0, 0.0, 180.0])).unwrap();
        assert_eq!(frame.as_bytes(), b"180,0,180,0,180\n");
    }

    #[test]
    fn test_rounds_to_nearest() {
        let cmd = CommandEncoder::to_command(&AngleVector::new([89.4, 89.6, 0.49, 179.51, 12.0]));
        assert_eq!(cmd.angles, [89, 90, 0, 180, 12]);
    }

    #[test]
    fn test_ties_round_to_even() {
        let cmd = CommandEncoder::to_command(&AngleVector::new([0.5, 1.5, 2.5, 90.5, 91.5]));
        assert_eq!(cmd.angles, [0, 2, 2, 90, 92]);
    }

    #[test]
    fn test_out_of_range_saturates() {
        let cmd = CommandEncoder::to_command(&AngleVector::new([-3.0, 70000.0, f32::NAN, -0.4, f32::INFINITY]));
        assert_eq!(cmd.angles, [0, u16::MAX, 0, 0, u16::MAX]);
    }
}
