use super::{ExpectationRecorder, ExpectationResult};

use colored::{ColoredString, Colorize};


/// Detail lines printed under a failure, so a failure never takes more than three lines.
const MAX_DETAIL_LINES: usize = 2;


/// Renders captured results: one line per success (when enabled), a short block per failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Reporter {
    print_on_success: bool,
}

impl Default for Reporter {
    fn default() -> Self {
        Reporter { print_on_success: true }
    }
}

impl Reporter {
    pub fn new(print_on_success: bool) -> Self {
        Reporter { print_on_success }
    }

    /// Plain lines for one result. Line breaks in the name are flattened to spaces.
    pub fn render_one(&self, name: &str, result: &ExpectationResult) -> Vec<String> {
        let name = name.replace(['\r', '\n'], " ");

        if result.success {
            return if self.print_on_success {
                vec![format!("SUCCESS: {name}")]
            } else {
                Vec::new()
            };
        }

        std::iter::once(format!("FAIL: {name}"))
            .chain(result.detail.lines().take(MAX_DETAIL_LINES).map(|line| format!("    {line}")))
            .collect()
    }

    pub fn render(&self, recorder: &ExpectationRecorder) -> Vec<String> {
        recorder
            .iter()
            .flat_map(|(name, result)| self.render_one(name, result))
            .collect()
    }

    /// Print every rendered line to stdout, with the status word colored.
    /// Whether colors are emitted is decided by `colored::control`.
    pub fn report_all(&self, recorder: &ExpectationRecorder) {
        for (name, result) in recorder.iter() {
            let mut lines = self.render_one(name, result).into_iter();
            if let Some(header) = lines.next() {
                println!("{}", styled_header(&header, result.success));
            }
            for line in lines {
                println!("{line}");
            }
        }
    }
}


/// Green `SUCCESS:` or red `FAIL:` followed by the plain name.
fn styled_header(header: &str, success: bool) -> String {
    let (status, rest) = header.split_once(' ').unwrap_or((header, ""));
    let status: ColoredString = if success { status.green().bold() } else { status.red().bold() };
    format!("{status} {rest}")
}
