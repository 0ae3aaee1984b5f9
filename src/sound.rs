use std::io::{self, Write};

/// A short clip that can be retriggered from the start at any time.
pub(crate) trait SoundEffect {
    /// Rewind to the start and play. Overlapping triggers each start from zero.
    fn restart_and_play(&mut self) -> io::Result<()>;
}

/// Rings the terminal bell. A bell has no playback position, so every trigger
/// is already a fresh start.
pub(crate) struct TerminalBell<W: Write> {
    out: W,
}

impl TerminalBell<io::Stdout> {
    pub(crate) fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write> TerminalBell<W> {
    #[cfg(test)]
    pub(crate) fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> SoundEffect for TerminalBell<W> {
    fn restart_and_play(&mut self) -> io::Result<()> {
        self.out.write_all(b"\x07")?;
        self.out.flush()
    }
}

/// Used when sound is muted.
pub(crate) struct Silent;

impl SoundEffect for Silent {
    fn restart_and_play(&mut self) -> io::Result<()> {
        Ok(())
    }
}
