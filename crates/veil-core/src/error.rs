use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TimerError {
    #[error("timers are driven by the system clock; stepping time needs a manual clock")]
    NotManual,
}
