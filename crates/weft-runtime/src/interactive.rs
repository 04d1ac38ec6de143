#![forbid(unsafe_code)]

//! The interactive loop: owns the terminal, the screen, the input
//! thread, and the dispatch cycle.

use std::io::{self, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use weft_core::{Event, Rect};
use weft_dom::render_at;
use weft_render::{Presenter, Screen, autojoin::join_glyphs};

use crate::component::Component;
#[cfg(unix)]
use crate::input::InputSource;
use crate::queue::EventQueue;

/// A cheap handle into a running loop, passed to every event handler.
///
/// Holds only shared flags and the queue; cloning or keeping one never
/// extends the loop's lifetime.
#[derive(Debug, Clone)]
pub struct LoopContext {
    queue: Arc<EventQueue>,
    quit: Arc<AtomicBool>,
    mouse_tracking: bool,
}

impl LoopContext {
    fn new(queue: Arc<EventQueue>, quit: Arc<AtomicBool>, mouse_tracking: bool) -> Self {
        Self {
            queue,
            quit,
            mouse_tracking,
        }
    }

    /// A context attached to nothing: its own queue, its own quit flag.
    ///
    /// For component unit tests.
    #[must_use]
    pub fn detached() -> Self {
        Self::new(
            Arc::new(EventQueue::new()),
            Arc::new(AtomicBool::new(false)),
            false,
        )
    }

    /// Ask the loop to stop after the current batch.
    ///
    /// Safe to call from inside an event handler or from another thread.
    pub fn exit(&self) {
        self.quit.store(true, Ordering::SeqCst);
        self.queue.notify();
    }

    /// Inject an event into the loop's queue.
    ///
    /// The usual payload is [`Event::Custom`], posted from worker
    /// threads to trigger a re-render.
    pub fn post(&self, event: Event) {
        self.queue.push(event);
    }

    /// Whether the loop enabled mouse tracking at startup.
    #[must_use]
    pub fn mouse_tracking_enabled(&self) -> bool {
        self.mouse_tracking
    }

    pub(crate) fn should_exit(&self) -> bool {
        self.quit.load(Ordering::SeqCst)
    }
}

/// Lifecycle of an [`InteractiveLoop`]. No state is ever re-entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Constructed, not yet run.
    Idle,
    /// Inside `run`.
    Running,
    /// Tearing down: joining the input thread, restoring the terminal.
    Closing,
    /// Finished. `run` cannot be called again.
    Stopped,
}

/// Runs a component tree against the terminal until asked to exit.
///
/// ```no_run
/// use weft_runtime::{Component, InteractiveLoop, renderer};
/// use weft_dom::text;
///
/// let mut root = renderer(|| text("press ctrl-c to quit"));
/// let mut event_loop = InteractiveLoop::new();
/// event_loop.run(&mut root).expect("terminal session");
/// ```
pub struct InteractiveLoop {
    state: LoopState,
    queue: Arc<EventQueue>,
    quit: Arc<AtomicBool>,
    alt_screen: bool,
    mouse: bool,
    bracketed_paste: bool,
}

impl Default for InteractiveLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl InteractiveLoop {
    /// A fullscreen loop: alternate screen, mouse tracking, and
    /// bracketed paste all enabled.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: LoopState::Idle,
            queue: Arc::new(EventQueue::new()),
            quit: Arc::new(AtomicBool::new(false)),
            alt_screen: true,
            mouse: true,
            bracketed_paste: true,
        }
    }

    /// Toggle the alternate screen.
    #[must_use]
    pub fn with_alt_screen(mut self, enabled: bool) -> Self {
        self.alt_screen = enabled;
        self
    }

    /// Toggle SGR mouse tracking.
    #[must_use]
    pub fn with_mouse(mut self, enabled: bool) -> Self {
        self.mouse = enabled;
        self
    }

    /// Toggle bracketed paste.
    #[must_use]
    pub fn with_bracketed_paste(mut self, enabled: bool) -> Self {
        self.bracketed_paste = enabled;
        self
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> LoopState {
        self.state
    }

    /// A handle for handlers and worker threads.
    #[must_use]
    pub fn context(&self) -> LoopContext {
        LoopContext::new(Arc::clone(&self.queue), Arc::clone(&self.quit), self.mouse)
    }

    /// Take over the terminal and run `root` until an handler calls
    /// [`LoopContext::exit`] or input fails.
    ///
    /// Raw-mode acquisition failure is returned before any thread
    /// spawns or any byte is written. Whatever happens mid-run, the
    /// terminal is restored on the way out. A loop runs once; calling
    /// `run` again returns an error.
    #[cfg(unix)]
    pub fn run(&mut self, root: &mut dyn Component) -> io::Result<()> {
        use weft_core::terminal;

        if self.state != LoopState::Idle {
            return Err(io::Error::other("interactive loop already ran"));
        }

        let guard = terminal::RawModeGuard::enter()?;
        let tty = guard.tty_reader()?;
        let resize = terminal::ResizeWatch::new()?;

        // While the guard is still owned here, an early `?` drops it and
        // restores termios.
        let mut stdout = io::stdout();
        if self.alt_screen {
            stdout.write_all(terminal::ALT_SCREEN_ENTER)?;
        }
        if self.mouse {
            stdout.write_all(terminal::MOUSE_ENABLE)?;
        }
        if self.bracketed_paste {
            stdout.write_all(terminal::BRACKETED_PASTE_ENABLE)?;
        }
        stdout.write_all(terminal::CURSOR_HIDE)?;
        stdout.flush()?;

        let guard = Arc::new(std::sync::Mutex::new(Some(guard)));
        terminal::install_panic_hook(Arc::clone(&guard));

        let (width, height) = terminal::terminal_size();
        let mut screen = Screen::new(width, height);
        let mut presenter = Presenter::new(io::stdout());

        let stop = Arc::new(AtomicBool::new(false));
        let input_thread = self.spawn_input_thread(
            crate::input::TtyInput::new(tty),
            resize,
            Arc::clone(&stop),
        );

        self.state = LoopState::Running;
        tracing::debug!(width, height, "interactive loop running");

        let result = self.run_loop(root, &mut presenter, &mut screen);

        self.state = LoopState::Closing;
        stop.store(true, Ordering::SeqCst);
        self.queue.close();
        if input_thread.join().is_err() {
            tracing::warn!("input thread panicked during teardown");
        }

        // Features off in reverse order of enabling.
        let teardown = (|| {
            presenter.flush()?;
            if self.bracketed_paste {
                stdout.write_all(terminal::BRACKETED_PASTE_DISABLE)?;
            }
            if self.mouse {
                stdout.write_all(terminal::MOUSE_DISABLE)?;
            }
            stdout.write_all(terminal::CURSOR_SHOW)?;
            if self.alt_screen {
                stdout.write_all(terminal::ALT_SCREEN_LEAVE)?;
            }
            stdout.flush()
        })();

        if let Ok(mut slot) = guard.lock() {
            // Dropping the guard restores termios.
            slot.take();
        }
        self.state = LoopState::Stopped;
        tracing::debug!("interactive loop stopped");

        result.and(teardown)
    }

    /// The input thread: poll the source, enqueue decoded events, and
    /// fold resize notifications into the same queue.
    #[cfg(unix)]
    fn spawn_input_thread(
        &self,
        mut source: impl InputSource + 'static,
        resize: weft_core::terminal::ResizeWatch,
        stop: Arc<AtomicBool>,
    ) -> std::thread::JoinHandle<()> {
        let queue = Arc::clone(&self.queue);
        let quit = Arc::clone(&self.quit);
        std::thread::spawn(move || {
            while !stop.load(Ordering::SeqCst) {
                if let Some((width, height)) = resize.poll() {
                    queue.push(Event::Resize { width, height });
                }
                match source.poll_events() {
                    Ok(events) => queue.extend(events),
                    Err(error) => {
                        // Lost the terminal mid-run: request an orderly exit.
                        tracing::debug!(%error, "input source failed");
                        quit.store(true, Ordering::SeqCst);
                        queue.notify();
                        break;
                    }
                }
            }
        })
    }

    /// The dispatch cycle, independent of any real terminal.
    ///
    /// Renders, blocks for a batch, applies it, repeats. However many
    /// events a batch carries, it triggers exactly one re-render.
    fn run_loop<W: Write>(
        &mut self,
        root: &mut dyn Component,
        presenter: &mut Presenter<W>,
        screen: &mut Screen,
    ) -> io::Result<()> {
        let ctx = self.context();
        loop {
            screen.clear();
            let mut document = root.render();
            let area = Rect::from_size(screen.width(), screen.height());
            render_at(screen, area, &mut document);
            join_glyphs(screen);
            presenter.present(screen)?;

            if ctx.should_exit() {
                return Ok(());
            }
            let batch = self.queue.wait_drain();
            if batch.is_empty() && (self.queue.is_closed() || ctx.should_exit()) {
                return Ok(());
            }

            let span = tracing::trace_span!("batch", events = batch.len());
            let _enter = span.enter();
            for event in batch {
                match event {
                    Event::Resize { width, height } => {
                        tracing::debug!(width, height, "resize");
                        screen.resize(width, height);
                    }
                    other => {
                        root.on_event(&other, &ctx);
                    }
                }
            }
            if ctx.should_exit() {
                return Ok(());
            }
        }
    }
}
