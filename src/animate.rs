//! Animation driver - redraw loop plus a background keypress watcher.
//!
//! The watcher thread owns the terminal's raw mode and flips a shared
//! [`CancelToken`] on the first keypress. The render loop only reads the
//! token, once per frame.

use crate::frame::{self, Frame, Overlay};
use crate::palette::BucketPalette;
use crate::terminal::RawModeGuard;
use crate::{GlyphgateError, Result};
use crossterm::event::{self, Event, KeyEventKind};
use image::GrayImage;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

pub const FRAME_DELAY: Duration = Duration::from_millis(100);
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

pub const GREEN: &str = "\x1b[32m";
pub const RESET: &str = "\x1b[0m";
// raw mode turns off output post-processing, so newlines carry their own CR
const NEWLINE: &str = "\r\n";

/// Stop flag shared by one animation session.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Something that can report whether a key was pressed.
pub trait KeySource {
    /// Wait up to `timeout` for a keypress. `Ok(true)` once one arrives.
    fn wait_for_key(&mut self, timeout: Duration) -> io::Result<bool>;
}

/// Keys read from the controlling terminal, held in raw mode.
pub struct TerminalKeys {
    _raw: RawModeGuard,
}

impl TerminalKeys {
    pub fn acquire() -> io::Result<Self> {
        Ok(Self { _raw: RawModeGuard::enter()? })
    }
}

impl KeySource for TerminalKeys {
    fn wait_for_key(&mut self, timeout: Duration) -> io::Result<bool> {
        if !event::poll(timeout)? {
            return Ok(false);
        }
        // Windows reports releases too
        Ok(matches!(event::read()?, Event::Key(key) if key.kind != KeyEventKind::Release))
    }
}

/// Poll `source` until a key arrives or someone else cancels `token`.
pub fn watch_keys<K: KeySource>(
    source: &mut K,
    token: &CancelToken,
    interval: Duration,
) -> io::Result<()> {
    while !token.is_cancelled() {
        if source.wait_for_key(interval)? {
            log::debug!("key pressed, stopping animation");
            token.cancel();
        }
    }
    Ok(())
}

/// Background thread running [`watch_keys`].
pub struct KeyWatcher {
    handle: JoinHandle<io::Result<()>>,
}

impl KeyWatcher {
    /// Watch the terminal. Raw mode is held by the thread and restored when it ends.
    pub fn spawn(token: CancelToken) -> Result<Self> {
        Self::spawn_with(TerminalKeys::acquire, token)
    }

    /// Watch a custom key source, built on the watcher thread by `make`.
    pub fn spawn_with<F, K>(make: F, token: CancelToken) -> Result<Self>
    where
        F: FnOnce() -> io::Result<K> + Send + 'static,
        K: KeySource,
    {
        let handle = thread::Builder::new().name("key-watcher".into()).spawn(move || {
            // the source, and any terminal state it holds, drops on every exit path
            let mut source = make()?;
            watch_keys(&mut source, &token, POLL_INTERVAL)
        })?;
        Ok(Self { handle })
    }

    /// Wait for the thread to finish.
    pub fn join(self) -> Result<()> {
        self.handle
            .join()
            .map_err(|_| GlyphgateError::Terminal("key watcher panicked".into()))?
            .map_err(|e| GlyphgateError::Terminal(e.to_string()))
    }
}

/// Redraws a flickering, captioned frame from one preloaded image.
pub struct Animator<R = StdRng> {
    image: GrayImage,
    palette: BucketPalette,
    overlay: Overlay,
    delay: Duration,
    rng: R,
}

impl Animator<StdRng> {
    pub fn new(image: GrayImage) -> Self {
        Self {
            image,
            palette: BucketPalette::default(),
            overlay: Overlay::default(),
            delay: FRAME_DELAY,
            rng: StdRng::from_entropy(),
        }
    }
}

impl<R: Rng> Animator<R> {
    pub fn with_rng<S: Rng>(self, rng: S) -> Animator<S> {
        Animator {
            image: self.image,
            palette: self.palette,
            overlay: self.overlay,
            delay: self.delay,
            rng,
        }
    }

    pub fn with_palette(mut self, palette: BucketPalette) -> Self {
        self.palette = palette;
        self
    }

    pub fn with_overlay(mut self, overlay: Overlay) -> Self {
        self.overlay = overlay;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Render a fresh frame. No decoding, only palette draws.
    pub fn render(&mut self) -> Frame {
        frame::render_overlaid(&self.image, &self.palette, &self.overlay, &mut self.rng)
    }

    /// Draw frames until `token` is cancelled. Returns the number drawn.
    pub fn run<W: Write>(&mut self, out: &mut W, token: &CancelToken) -> Result<u64> {
        let mut frames = 0;
        while !token.is_cancelled() {
            let frame = self.render();
            write_frame(out, &frame)?;
            frames += 1;
            thread::sleep(self.delay);
        }
        log::debug!("animation stopped after {frames} frames");
        Ok(frames)
    }

    /// [`run`](Self::run) on stdout. The stdout lock is released on return,
    /// before the caller joins the watcher, so a panicking watcher can still print.
    pub fn run_to_stdout(&mut self, token: &CancelToken) -> Result<u64> {
        let mut stdout = io::stdout().lock();
        self.run(&mut stdout, token)
    }
}

/// Push the previous frame off screen, then print `frame` in green.
pub fn write_frame<W: Write>(out: &mut W, frame: &Frame) -> io::Result<()> {
    out.write_all(NEWLINE.repeat(frame.height()).as_bytes())?;
    out.write_all(GREEN.as_bytes())?;
    out.write_all(frame.lines().join(NEWLINE).as_bytes())?;
    out.write_all(RESET.as_bytes())?;
    out.write_all(NEWLINE.as_bytes())?;
    out.flush()
}
