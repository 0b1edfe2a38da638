use std::io::IsTerminal;

use indicatif::{ProgressBar, ProgressStyle};

/// Advisory progress bar for file processing.
///
/// Hidden in quiet mode or when stderr is not a TTY. Purely a side channel:
/// it never affects scan order or results.
pub struct FileProgress {
    progress_bar: ProgressBar,
}

impl FileProgress {
    /// Creates a progress bar over `total` files, outputting to stderr to
    /// avoid interfering with stdout output.
    ///
    /// # Panics
    ///
    /// Panics if the progress bar template is invalid. The template is a
    /// compile-time constant, so this should never happen.
    #[must_use]
    pub fn new(total: u64, quiet: bool) -> Self {
        let progress_bar = if quiet || !std::io::stderr().is_terminal() {
            ProgressBar::hidden()
        } else {
            let pb = ProgressBar::new(total);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template(
                        "{spinner:.green} Processing [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%, {elapsed})",
                    )
                    .expect("valid template")
                    .progress_chars("█▓░"),
            );
            pb
        };
        Self { progress_bar }
    }

    pub fn inc(&self) {
        self.progress_bar.inc(1);
    }

    pub fn finish(&self) {
        self.progress_bar.finish_and_clear();
    }
}

#[cfg(test)]
#[path = "progress_tests.rs"]
mod tests;
