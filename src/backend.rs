//! The seam between [`Strip`](crate::Strip) and whatever actually pushes
//! bits down the wire.
//!
//! The real implementation lives in [`native`](crate::native) and needs
//! `libws2811` plus root on a Pi. [`SimulatedBackend`](crate::sim::SimulatedBackend)
//! stands in everywhere else, including the test suite.

use crate::config::StripConfig;
use crate::error::Ws281xError;
use crate::strip::Channel;

/// The native call sequence: `init` once, `render`/`wait` any number of
/// times, `fini` once.
///
/// # Rust concept: traits as seams
/// `Strip<B: Backend>` is generic over this trait, so the same pixel logic
/// drives real hardware or an in-memory recorder with no runtime cost.
pub trait Backend {
    /// Allocate buffers and program the hardware for `config`.
    fn init(&mut self, config: &StripConfig) -> Result<(), Ws281xError>;

    /// Send the current contents of every channel.
    fn render(&mut self, channels: &[Channel]) -> Result<(), Ws281xError>;

    /// Block until the previous render has finished transmitting.
    fn wait(&mut self) -> Result<(), Ws281xError>;

    /// Release everything `init` acquired. Called at most once per `init`.
    fn fini(&mut self);
}
