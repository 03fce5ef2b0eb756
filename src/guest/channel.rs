//! Host input/output channels
//!
//! A guest call sees one input string and emits one output string through
//! [`input_string`] and [`output_string`]. The binding behind those two
//! functions defaults to stdin/stdout and can be swapped for the duration of
//! a single call with a [`ChannelScope`].
//!
//! Bindings are thread-local. A WebAssembly guest runs on one thread, so this
//! is process-wide there; natively it keeps concurrent callers (and tests)
//! from seeing each other's channels.

use std::cell::RefCell;
use std::io::{self, Read, Write};
use std::rc::Rc;
use std::sync::OnceLock;

/// One input/output channel pair
pub trait HostChannel {
    /// The current call's input
    fn input_string(&self) -> io::Result<String>;

    /// Emit the current call's output; a later write replaces an earlier one
    fn output_string(&self, output: &str) -> io::Result<()>;
}

thread_local! {
    static BINDING: RefCell<Option<Rc<dyn HostChannel>>> = const { RefCell::new(None) };
}

/// Read the current call's input from whatever channel is bound
pub fn input_string() -> io::Result<String> {
    current().input_string()
}

/// Write the current call's output to whatever channel is bound
pub fn output_string(output: &str) -> io::Result<()> {
    current().output_string(output)
}

fn current() -> Rc<dyn HostChannel> {
    BINDING
        .with(|binding| binding.borrow().clone())
        .unwrap_or_else(|| Rc::new(StdioChannel))
}

fn rebind(channel: Option<Rc<dyn HostChannel>>) -> Option<Rc<dyn HostChannel>> {
    BINDING.with(|binding| binding.replace(channel))
}

/// Default binding: the whole of stdin (read once) in, stdout out
struct StdioChannel;

impl HostChannel for StdioChannel {
    fn input_string(&self) -> io::Result<String> {
        static INPUT: OnceLock<String> = OnceLock::new();

        if let Some(input) = INPUT.get() {
            return Ok(input.clone());
        }

        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        Ok(INPUT.get_or_init(|| buf).clone())
    }

    fn output_string(&self, output: &str) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        stdout.write_all(output.as_bytes())?;
        stdout.flush()
    }
}

/// Call-scoped binding: fixed input, captured output
struct CapturedChannel {
    input: String,
    output: RefCell<Option<String>>,
}

impl HostChannel for CapturedChannel {
    fn input_string(&self) -> io::Result<String> {
        Ok(self.input.clone())
    }

    fn output_string(&self, output: &str) -> io::Result<()> {
        *self.output.borrow_mut() = Some(output.to_string());
        Ok(())
    }
}

/// Guard that installs a call-scoped binding and restores the previous one
/// when dropped, on every exit path including unwinding.
pub struct ChannelScope {
    captured: Rc<CapturedChannel>,
    previous: Option<Rc<dyn HostChannel>>,
}

impl ChannelScope {
    /// Bind `input` as the current input and start capturing output
    pub fn install(input: impl Into<String>) -> Self {
        let captured = Rc::new(CapturedChannel {
            input: input.into(),
            output: RefCell::new(None),
        });
        let previous = rebind(Some(captured.clone() as Rc<dyn HostChannel>));

        Self { captured, previous }
    }

    /// Text written to the output channel so far, if any
    pub fn captured_output(&self) -> Option<String> {
        self.captured.output.borrow().clone()
    }
}

impl Drop for ChannelScope {
    fn drop(&mut self) {
        rebind(self.previous.take());
    }
}
