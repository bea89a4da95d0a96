use std::fmt::Display;

/// Consumes the error of a fire-and-forget operation by logging it with warn!().
pub trait WarnOnErr {
    fn warn_on_err(self, message: &str);
}

impl<T, E: Display> WarnOnErr for Result<T, E> {
    fn warn_on_err(self, message: &str) {
        if let Err(error) = self {
            log::warn!("{} {}", message, error);
        }
    }
}
