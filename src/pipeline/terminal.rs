//! Terminal backend: size queries and raw mode.
//!
//! The pipeline talks to the terminal through the [`Terminal`] trait so a
//! frame can be rendered into memory in tests. [`StdTerminal`] is the real
//! thing: stdout for output, libc termios/ioctl for mode and size.
//!
//! Raw mode is released on every exit path we can reach:
//! - explicitly through [`Terminal::restore_mode`]
//! - on `Drop` (normal return and panics that unwind)
//! - from SIGINT/SIGTERM/SIGHUP, via a handler that restores the saved
//!   termios, shows the cursor and re-raises the signal to whatever handler
//!   the application had installed before. Restoring the mode normally also
//!   puts those handlers back.

use std::io::{self, Write};

/// What the render pipeline needs from a terminal.
pub trait Terminal: Write {
    /// Current size as (columns, rows).
    fn size(&self) -> io::Result<(u16, u16)>;

    /// Switch to non-canonical, non-echoing input.
    fn enter_raw_mode(&mut self) -> io::Result<()>;

    /// Put back whatever mode was active before [`enter_raw_mode`](Self::enter_raw_mode).
    /// A no-op if raw mode was never entered.
    fn restore_mode(&mut self) -> io::Result<()>;
}

// =============================================================================
// StdTerminal
// =============================================================================

/// The process's controlling terminal.
pub struct StdTerminal {
    stdout: io::Stdout,
    #[cfg(unix)]
    original: Option<libc::termios>,
}

impl StdTerminal {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            #[cfg(unix)]
            original: None,
        }
    }

    /// Whether raw mode is currently active.
    pub fn is_raw(&self) -> bool {
        #[cfg(unix)]
        {
            self.original.is_some()
        }
        #[cfg(not(unix))]
        {
            false
        }
    }
}

impl Default for StdTerminal {
    fn default() -> Self {
        Self::new()
    }
}

impl Write for StdTerminal {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.stdout.write(buf)
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        self.stdout.lock().write_all(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.stdout.flush()
    }
}

#[cfg(unix)]
impl Terminal for StdTerminal {
    fn size(&self) -> io::Result<(u16, u16)> {
        // SAFETY: winsize is plain data; ioctl only writes into it.
        let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
        if unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &mut ws) } == -1 {
            return Err(io::Error::last_os_error());
        }
        Ok((ws.ws_col, ws.ws_row))
    }

    fn enter_raw_mode(&mut self) -> io::Result<()> {
        if self.original.is_some() {
            return Ok(());
        }
        let fd = libc::STDIN_FILENO;

        // Not a TTY (piped input, CI): nothing to switch, keep rendering.
        if unsafe { libc::isatty(fd) } == 0 {
            tracing::debug!("stdin is not a tty, skipping raw mode");
            return Ok(());
        }

        // SAFETY: termios is plain data filled in by tcgetattr.
        let mut termios: libc::termios = unsafe { std::mem::zeroed() };
        if unsafe { libc::tcgetattr(fd, &mut termios) } != 0 {
            return Err(io::Error::last_os_error());
        }
        let original = termios;

        termios.c_lflag &= !(libc::ICANON | libc::ECHO);
        termios.c_cc[libc::VMIN] = 0;
        termios.c_cc[libc::VTIME] = 0;

        signals::arm(original);
        if unsafe { libc::tcsetattr(fd, libc::TCSAFLUSH, &termios) } != 0 {
            signals::disarm();
            return Err(io::Error::last_os_error());
        }
        self.original = Some(original);
        Ok(())
    }

    fn restore_mode(&mut self) -> io::Result<()> {
        let Some(original) = self.original.take() else {
            return Ok(());
        };
        signals::disarm();
        if unsafe { libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, &original) } != 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }
}

#[cfg(not(unix))]
impl Terminal for StdTerminal {
    fn size(&self) -> io::Result<(u16, u16)> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "terminal size query needs a unix tty",
        ))
    }

    fn enter_raw_mode(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn restore_mode(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for StdTerminal {
    fn drop(&mut self) {
        if let Err(e) = self.restore_mode() {
            tracing::warn!(error = %e, "failed to restore terminal mode");
        }
    }
}

// =============================================================================
// Signal-path restore
// =============================================================================

#[cfg(unix)]
mod signals {
    use std::cell::UnsafeCell;
    use std::sync::OnceLock;
    use std::sync::atomic::{AtomicBool, Ordering};

    const SIGNALS: [libc::c_int; 3] = [libc::SIGINT, libc::SIGTERM, libc::SIGHUP];

    /// Termios to restore from a signal handler. First raw-mode entry wins;
    /// every later entry starts from the same cooked state.
    static ORIGINAL: OnceLock<libc::termios> = OnceLock::new();
    /// Set while our handlers are installed in place of the saved ones.
    static ARMED: AtomicBool = AtomicBool::new(false);
    static PREVIOUS: SavedActions = SavedActions(UnsafeCell::new(unsafe { std::mem::zeroed() }));

    /// Dispositions that were in place before [`arm`], one per entry of
    /// `SIGNALS`.
    struct SavedActions(UnsafeCell<[libc::sigaction; 3]>);

    // SAFETY: written only by `arm` while our handlers are not installed;
    // read by `disarm` and by the handler while they are.
    unsafe impl Sync for SavedActions {}

    const SHOW_CURSOR: &[u8] = b"\x1b[0m\x1b[?25h";

    pub(super) fn arm(original: libc::termios) {
        ORIGINAL.get_or_init(|| original);
        if ARMED.load(Ordering::SeqCst) {
            return;
        }

        let handler = restore_and_reraise as extern "C" fn(libc::c_int);
        let previous = PREVIOUS.0.get();
        for (i, sig) in SIGNALS.into_iter().enumerate() {
            // SAFETY: the handler only calls async-signal-safe functions
            // (tcsetattr, write, sigaction, raise). `previous` is not read
            // until ARMED is set below.
            unsafe {
                let mut action: libc::sigaction = std::mem::zeroed();
                action.sa_sigaction = handler as libc::sighandler_t;
                // Block the others while one is handled so none slips past
                // before the saved handlers are back.
                libc::sigemptyset(&mut action.sa_mask);
                for other in SIGNALS {
                    libc::sigaddset(&mut action.sa_mask, other);
                }
                let slot = &mut (*previous)[i];
                if libc::sigaction(sig, &action, slot) != 0 {
                    tracing::warn!(sig, "could not install terminal restore handler");
                    // Keep whatever is there; restoring it later is a no-op.
                    libc::sigaction(sig, std::ptr::null(), slot);
                }
            }
        }
        ARMED.store(true, Ordering::SeqCst);
    }

    /// Put back the handlers that were installed before [`arm`].
    pub(super) fn disarm() {
        if !ARMED.swap(false, Ordering::SeqCst) {
            return;
        }
        let previous = PREVIOUS.0.get();
        for (i, sig) in SIGNALS.into_iter().enumerate() {
            // SAFETY: the slot was filled by `arm`.
            unsafe {
                libc::sigaction(sig, &(*previous)[i], std::ptr::null_mut());
            }
        }
    }

    extern "C" fn restore_and_reraise(sig: libc::c_int) {
        if ARMED.swap(false, Ordering::SeqCst) {
            if let Some(original) = ORIGINAL.get() {
                unsafe {
                    libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, original);
                }
            }
            unsafe {
                libc::write(
                    libc::STDOUT_FILENO,
                    SHOW_CURSOR.as_ptr().cast(),
                    SHOW_CURSOR.len(),
                );
            }
        }
        let previous = PREVIOUS.0.get();
        // Hand every signal back to its prior owner, then let that owner see
        // this one. It stays blocked until we return.
        unsafe {
            for (i, s) in SIGNALS.into_iter().enumerate() {
                libc::sigaction(s, &(*previous)[i], std::ptr::null_mut());
            }
            libc::raise(sig);
        }
    }

}

// =============================================================================
// Tests
// =============================================================================
