use rebound_core::{AudioSink, ServiceError, Sound, Volume};
use std::io::Write;

const BELL: &[u8] = b"\x07";

/// Sound through the terminal bell
///
/// The bell has no loudness, so volume zero is the only level that silences it.
pub struct BellAudio<W: Write> {
    out: W,
    volume: Volume,
}

impl<W: Write> BellAudio<W> {
    pub fn new(out: W, muted: bool) -> Self {
        Self {
            out,
            volume: Volume::new(muted),
        }
    }

    pub fn volume(&self) -> Volume {
        self.volume
    }
}

impl<W: Write> AudioSink for BellAudio<W> {
    fn play(&mut self, sound: Sound) -> Result<(), ServiceError> {
        if !self.volume.is_audible() {
            return Ok(());
        }

        // Paddle and wall hits are too frequent for a bell
        if sound == Sound::Bounce {
            return Ok(());
        }

        self.out.write_all(BELL)?;
        self.out.flush()?;
        Ok(())
    }

    fn toggle_mute(&mut self) -> bool {
        self.volume.toggle_mute()
    }

    fn volume_up(&mut self) -> u8 {
        self.volume.up()
    }

    fn volume_down(&mut self) -> u8 {
        self.volume.down()
    }
}
