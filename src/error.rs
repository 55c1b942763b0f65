//! Error type for the binding.
//!
//! The native library reports failures as negative integers. We decode the
//! ones it documents and keep the raw value for anything else.

use std::fmt;

/// Which native entry point produced a status code.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NativeOp {
    Init,
    Render,
    Wait,
}

impl fmt::Display for NativeOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NativeOp::Init => "ws2811_init",
            NativeOp::Render => "ws2811_render",
            NativeOp::Wait => "ws2811_wait",
        };
        f.write_str(name)
    }
}

/// Decoded `ws2811_*` return value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NativeCode {
    HwDetect,
    DeviceMalloc,
    MailboxOpen,
    MailboxAlloc,
    MailboxLock,
    MapMem,
    LedsMalloc,
    MapRegisters,
    GpioInit,
    SetupPwm,
    /// `ws2811_wait` saw the DMA error bit (render returns this too).
    Dma,
    Other(i32),
}

const ERR_BASE: i32 = -28110;

impl NativeCode {
    pub fn from_raw(code: i32) -> Self {
        match code {
            -1 => NativeCode::Dma,
            c if c <= ERR_BASE && c > ERR_BASE - 10 => match ERR_BASE - c {
                0 => NativeCode::HwDetect,
                1 => NativeCode::DeviceMalloc,
                2 => NativeCode::MailboxOpen,
                3 => NativeCode::MailboxAlloc,
                4 => NativeCode::MailboxLock,
                5 => NativeCode::MapMem,
                6 => NativeCode::LedsMalloc,
                7 => NativeCode::MapRegisters,
                8 => NativeCode::GpioInit,
                _ => NativeCode::SetupPwm,
            },
            other => NativeCode::Other(other),
        }
    }

    pub fn raw(self) -> i32 {
        match self {
            NativeCode::HwDetect => ERR_BASE,
            NativeCode::DeviceMalloc => ERR_BASE - 1,
            NativeCode::MailboxOpen => ERR_BASE - 2,
            NativeCode::MailboxAlloc => ERR_BASE - 3,
            NativeCode::MailboxLock => ERR_BASE - 4,
            NativeCode::MapMem => ERR_BASE - 5,
            NativeCode::LedsMalloc => ERR_BASE - 6,
            NativeCode::MapRegisters => ERR_BASE - 7,
            NativeCode::GpioInit => ERR_BASE - 8,
            NativeCode::SetupPwm => ERR_BASE - 9,
            NativeCode::Dma => -1,
            NativeCode::Other(c) => c,
        }
    }

    fn message(self) -> &'static str {
        match self {
            NativeCode::HwDetect => "hardware revision is not supported",
            NativeCode::DeviceMalloc => "out of memory allocating device state",
            NativeCode::MailboxOpen => "failed to open the VideoCore mailbox",
            NativeCode::MailboxAlloc => "mailbox memory allocation failed",
            NativeCode::MailboxLock => "mailbox memory lock failed",
            NativeCode::MapMem => "mmap() of DMA memory failed",
            NativeCode::LedsMalloc => "out of memory allocating LED buffers",
            NativeCode::MapRegisters => "unable to map peripheral registers into userspace",
            NativeCode::GpioInit => "unable to initialize GPIO",
            NativeCode::SetupPwm => "unable to initialize PWM",
            NativeCode::Dma => "DMA error",
            NativeCode::Other(_) => "unknown error",
        }
    }
}

impl fmt::Display for NativeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code {})", self.message(), self.raw())
    }
}

#[derive(Debug)]
pub enum Ws281xError {
    /// A native call returned non-zero.
    Native { op: NativeOp, code: NativeCode },
    InvalidGpio { channel: usize, pin: u8 },
    InvalidFrequency(u32),
    InvalidDma(u8),
    InvalidChannel(usize),
    /// More LEDs than the driver can address on one channel.
    InvalidCount { channel: usize, count: usize },
    /// Every channel has a zero LED count.
    NoChannels,
    /// Rotation needs a square matrix.
    MatrixNotSquare { width: usize, height: usize },
    Config(ConfigError),
}

/// Failure loading a configuration file.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl fmt::Display for Ws281xError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ws281xError::Native { op, code } => write!(f, "{op} failed: {code}"),
            Ws281xError::InvalidGpio { channel, pin } => {
                write!(f, "GPIO {pin} cannot drive PWM channel {channel}")
            }
            Ws281xError::InvalidFrequency(freq) => {
                write!(f, "signal frequency {freq} Hz is outside 400000-800000")
            }
            Ws281xError::InvalidDma(dma) => write!(f, "DMA channel {dma} is outside 0-14"),
            Ws281xError::InvalidChannel(idx) => write!(f, "no PWM channel {idx}"),
            Ws281xError::InvalidCount { channel, count } => {
                write!(f, "{count} LEDs is too many for channel {channel}")
            }
            Ws281xError::NoChannels => f.write_str("no channel has any LEDs configured"),
            Ws281xError::MatrixNotSquare { width, height } => {
                write!(f, "cannot rotate a {width}x{height} matrix; it must be square")
            }
            Ws281xError::Config(ConfigError::Io(e)) => write!(f, "reading config: {e}"),
            Ws281xError::Config(ConfigError::Json(e)) => write!(f, "parsing config: {e}"),
        }
    }
}

impl std::error::Error for Ws281xError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Ws281xError::Config(ConfigError::Io(e)) => Some(e),
            Ws281xError::Config(ConfigError::Json(e)) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Ws281xError {
    fn from(e: std::io::Error) -> Self {
        Ws281xError::Config(ConfigError::Io(e))
    }
}

impl From<serde_json::Error> for Ws281xError {
    fn from(e: serde_json::Error) -> Self {
        Ws281xError::Config(ConfigError::Json(e))
    }
}

/// Turn a native status into a `Result`.
pub fn check(op: NativeOp, code: i32) -> Result<(), Ws281xError> {
    if code == 0 {
        Ok(())
    } else {
        Err(Ws281xError::Native {
            op,
            code: NativeCode::from_raw(code),
        })
    }
}
