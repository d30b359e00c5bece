//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter        | Implements     | Connects to                    |
//! |----------------|----------------|--------------------------------|
//! | `console`      | LineTransport  | host stdin/stdout              |
//! | `serial`       | LineTransport  | any byte channel (UART, CDC)   |
//! | `hardware`     | PwmSink        | `embedded-hal` PWM channels    |
//! | `rangefinder`  | DistancePort   | fixed readings / none fitted   |
//! | `time`         | Clock          | `embassy-time` driver          |
//! | `log_sink`     | EventSink      | `log` facade                   |
//! | `config_file`  | ConfigPort     | JSON file (host only)          |

#[cfg(feature = "host")]
pub mod config_file;
#[cfg(feature = "host")]
pub mod console;
pub mod hardware;
pub mod log_sink;
pub mod rangefinder;
pub mod serial;
pub mod time;
