//! Status sink for the codec driver.

/// Receives human-readable status and error messages.
///
/// The codec never branches on what a reporter does; it only informs.
pub trait Reporter {
    /// A progress or status line.
    fn update(&mut self, msg: &str);

    /// An error the user should see.
    fn show_error(&mut self, msg: &str);
}

/// Forwards messages to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn update(&mut self, msg: &str) {
        log::info!("{msg}");
    }

    fn show_error(&mut self, msg: &str) {
        log::error!("{msg}");
    }
}

impl<P: Reporter + ?Sized> Reporter for &mut P {
    fn update(&mut self, msg: &str) {
        (**self).update(msg);
    }

    fn show_error(&mut self, msg: &str) {
        (**self).show_error(msg);
    }
}
