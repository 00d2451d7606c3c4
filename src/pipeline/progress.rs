use std::path::PathBuf;

/// Callback invoked after each processed frame with `(current, total)`
///
/// `current` is 1-based and strictly increasing; `total` stays constant for
/// the whole batch. The pipeline calls it inline and never waits on the
/// observer, so implementations should hand the pair off (e.g. into a
/// channel) rather than doing slow work in the callback.
pub type ProgressFn = Box<dyn FnMut(usize, usize) + Send>;

/// Pipeline state transition, as delivered to an observing shell
///
/// A shell typically bridges [`ProgressFn`] calls into `Progress` events on
/// a channel and appends one final `Done` or `Error` when the run ends.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    /// A frame finished processing
    Progress { current: usize, total: usize },

    /// The whole pipeline finished; the output video is in place
    Done { output: PathBuf },

    /// The pipeline failed; `message` is the error's display text
    Error { message: String },
}

impl ProgressEvent {
    /// Completion percentage for `Progress` events
    pub fn percent(&self) -> Option<f64> {
        match self {
            Self::Progress { current, total } if *total > 0 => {
                Some((*current as f64 / *total as f64) * 100.0)
            }
            _ => None,
        }
    }
}
