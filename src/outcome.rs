//! Reconciling each tool's raw result into one pass/fail signal.
//!
//! The wrapped tools disagree about what their exit codes mean: cppcheck only
//! fails when told to, clang-format always exits 0 in check mode,
//! clang-tidy exits 0 under `--fix-errors`, include-what-you-use returns
//! codes unrelated to its findings, and oclint uses sentinel codes. Each
//! [`OutcomePolicy`] variant absorbs one of these behaviours so that the final
//! result is 0 exactly when the combined output is empty.

use crate::diff::FileDiff;
use crate::exit_codes;
use crate::invocation::Mode;
use crate::runner::CapturedOutput;
use regex::bytes::Regex;
use std::sync::LazyLock;

/// clang-tidy's stderr noise, reported even when every warning is suppressed.
static WARNINGS_GENERATED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[\d,]+ warnings? generated\.\r?\n?").unwrap());

static IWYU_CORRECT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"has correct #includes/fwd-decls").unwrap());

/// Per-tool rule mapping a finished run onto its final result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomePolicy {
    /// The raw exit code is authoritative.
    ExitCode,
    /// Exit code is authoritative except under `--fix-errors`, where any
    /// stderr left after dropping "N warnings generated." means failure.
    ClangTidy,
    /// Success is recognised from the output text, not the exit code.
    IncludeWhatYouUse,
    /// Tool-specific nonzero codes are passed through unchanged; the summary
    /// printed on a clean run is dropped.
    Sentinel,
    /// A non-empty diff means failure, whatever the tool returned.
    Formatter,
}

/// Final exit code and combined output for one file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outcome {
    pub exit_code: i32,
    pub output: Vec<u8>,
}

impl Outcome {
    fn pass() -> Self {
        Self::default()
    }

    fn fail(exit_code: i32, output: Vec<u8>) -> Self {
        Self { exit_code, output }
    }

    /// Nonzero codes keep the tool's output; a clean run reports nothing.
    fn from_code(exit_code: i32, output: Vec<u8>) -> Self {
        if exit_code == exit_codes::SUCCESS {
            Self::pass()
        } else {
            Self::fail(exit_code, output)
        }
    }
}

impl OutcomePolicy {
    /// Resolve one run. `diff` is the formatter's diff in check mode and is
    /// ignored by the other policies.
    pub fn resolve(self, mode: Mode, captured: CapturedOutput, diff: Option<&FileDiff<'_>>) -> Outcome {
        match self {
            Self::ExitCode | Self::Sentinel => Outcome::from_code(captured.exit_code, captured.combined()),
            Self::ClangTidy => resolve_clang_tidy(mode, captured),
            Self::IncludeWhatYouUse => resolve_iwyu(captured),
            Self::Formatter => resolve_formatter(mode, captured, diff),
        }
    }
}

/// True when a formatter run itself went wrong, as opposed to finding work.
pub fn formatter_failed(captured: &CapturedOutput) -> bool {
    captured.exit_code != exit_codes::SUCCESS || !captured.stderr.is_empty()
}

fn resolve_clang_tidy(mode: Mode, captured: CapturedOutput) -> Outcome {
    let CapturedOutput {
        mut stdout,
        stderr,
        exit_code,
    } = captured;

    let stderr = WARNINGS_GENERATED.replace_all(&stderr, &b""[..]);
    let exit_code = if mode.fix_errors && !stderr.is_empty() {
        exit_codes::VIOLATIONS_FOUND
    } else {
        exit_code
    };

    stdout.extend_from_slice(&stderr);
    Outcome::from_code(exit_code, stdout)
}

fn resolve_iwyu(captured: CapturedOutput) -> Outcome {
    if IWYU_CORRECT.is_match(&captured.stderr) || IWYU_CORRECT.is_match(&captured.stdout) {
        return Outcome::pass();
    }
    let exit_code = match captured.exit_code {
        exit_codes::SUCCESS => exit_codes::VIOLATIONS_FOUND,
        code => code,
    };
    Outcome::fail(exit_code, captured.combined())
}

fn resolve_formatter(mode: Mode, captured: CapturedOutput, diff: Option<&FileDiff<'_>>) -> Outcome {
    if formatter_failed(&captured) {
        let exit_code = match captured.exit_code {
            exit_codes::SUCCESS => exit_codes::VIOLATIONS_FOUND,
            code => code,
        };
        return Outcome::fail(exit_code, captured.combined());
    }

    // In fix mode the file already holds the formatted result; chatter on
    // stdout is logged, never reported.
    if mode.in_place {
        if !captured.stdout.is_empty() {
            log::debug!(
                "[hookwrap] Discarding {} bytes of formatter stdout in fix mode",
                captured.stdout.len()
            );
        }
        return Outcome::pass();
    }

    match diff {
        Some(diff) if !diff.is_empty() => {
            let output = if mode.no_diff { Vec::new() } else { diff.render() };
            Outcome::fail(exit_codes::VIOLATIONS_FOUND, output)
        }
        _ => Outcome::pass(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::Path;

    fn captured(stdout: &str, stderr: &str, exit_code: i32) -> CapturedOutput {
        CapturedOutput {
            stdout: stdout.as_bytes().to_vec(),
            stderr: stderr.as_bytes().to_vec(),
            exit_code,
        }
    }

    #[test]
    fn test_exit_code_policy() {
        let out = OutcomePolicy::ExitCode.resolve(Mode::default(), captured("a\n", "b\n", 1), None);
        assert_eq!(out, Outcome::fail(1, b"a\nb\n".to_vec()));

        // Progress chatter on a clean run is not reported
        let out = OutcomePolicy::ExitCode.resolve(Mode::default(), captured("Checking ok.c ...\n", "", 0), None);
        assert_eq!(out, Outcome::pass());
    }

    #[test]
    fn test_sentinel_codes_pass_through() {
        let report = "\nOCLint Report\n\nSummary: TotalFiles=0 FilesWithViolations=0 P1=0 P2=0 P3=0 \n";
        let out = OutcomePolicy::Sentinel.resolve(Mode::default(), captured(report, "", 6), None);
        assert_eq!(out.exit_code, 6);
        assert_eq!(out.output, report.as_bytes());

        let out = OutcomePolicy::Sentinel.resolve(Mode::default(), captured(report, "", 0), None);
        assert_eq!(out, Outcome::pass());
    }

    #[test]
    fn test_clang_tidy_strips_warning_count() {
        let stdout = "/r/err.c:2:18: error: non-void function 'main' should return a value [clang-diagnostic-return-type]\n";
        let stderr = "3 warnings generated.\n1 error generated.\nError while processing /r/err.c.\n";
        let out = OutcomePolicy::ClangTidy.resolve(Mode::default(), captured(stdout, stderr, 1), None);
        assert_eq!(out.exit_code, 1);
        assert_eq!(
            String::from_utf8(out.output).unwrap(),
            format!("{stdout}1 error generated.\nError while processing /r/err.c.\n")
        );
    }

    #[test]
    fn test_clang_tidy_only_warning_count_is_clean() {
        let out = OutcomePolicy::ClangTidy.resolve(
            Mode {
                fix_errors: true,
                ..Mode::default()
            },
            captured("", "1 warning generated.\n", 0),
            None,
        );
        assert_eq!(out, Outcome::pass());
    }

    #[test]
    fn test_clang_tidy_fix_errors_recomputes_exit_code() {
        let mode = Mode {
            fix_errors: true,
            ..Mode::default()
        };
        let out = OutcomePolicy::ClangTidy.resolve(mode, captured("diag\n", "1 error generated.\n", 0), None);
        assert_eq!(out.exit_code, 1);
        assert_eq!(out.output, b"diag\n1 error generated.\n");

        // Without --fix-errors the raw code is trusted
        let out = OutcomePolicy::ClangTidy.resolve(Mode::default(), captured("", "1 error generated.\n", 0), None);
        assert_eq!(out, Outcome::pass());
    }

    #[test]
    fn test_iwyu_correct_includes() {
        let out = OutcomePolicy::IncludeWhatYouUse.resolve(
            Mode::default(),
            captured("", "\n(/r/ok.c has correct #includes/fwd-decls)\n", 2),
            None,
        );
        assert_eq!(out, Outcome::pass());
    }

    #[test]
    fn test_iwyu_verdict_found_on_stdout() {
        let out = OutcomePolicy::IncludeWhatYouUse.resolve(
            Mode::default(),
            captured("(ok.c has correct #includes/fwd-decls)\n", "", 1),
            None,
        );
        assert_eq!(out, Outcome::pass());

        // An empty report is not a verdict
        let out = OutcomePolicy::IncludeWhatYouUse.resolve(Mode::default(), captured("", "", 0), None);
        assert_eq!(out, Outcome::fail(1, Vec::new()));
    }

    #[test]
    fn test_iwyu_suggestions_fail() {
        let stderr = "/r/err.c should remove these lines:\n- #include <stdio.h>  // lines 1-1\n";
        let out = OutcomePolicy::IncludeWhatYouUse.resolve(Mode::default(), captured("", stderr, 3), None);
        assert_eq!(out, Outcome::fail(3, stderr.as_bytes().to_vec()));

        let out = OutcomePolicy::IncludeWhatYouUse.resolve(Mode::default(), captured("", stderr, 0), None);
        assert_eq!(out.exit_code, 1);
    }

    #[test]
    fn test_formatter_check_mode_uses_diff() {
        let path = Path::new("err.c");
        let diff = FileDiff::compute(path, b"int main(){}", b"int main() {}");
        let formatted = captured("int main() {}", "", 0);

        let out = OutcomePolicy::Formatter.resolve(Mode::default(), formatted.clone(), Some(&diff));
        assert_eq!(out.exit_code, 1);
        assert_eq!(out.output, diff.render());

        let no_diff = Mode {
            no_diff: true,
            ..Mode::default()
        };
        let out = OutcomePolicy::Formatter.resolve(no_diff, formatted, Some(&diff));
        assert_eq!(out, Outcome::fail(1, Vec::new()));
    }

    #[test]
    fn test_formatter_clean_file() {
        let path = Path::new("ok.c");
        let diff = FileDiff::compute(path, b"int x;\n", b"int x;\n");
        let out = OutcomePolicy::Formatter.resolve(Mode::default(), captured("int x;\n", "", 0), Some(&diff));
        assert_eq!(out, Outcome::pass());
    }

    #[test]
    fn test_formatter_fix_mode_passes() {
        let mode = Mode {
            in_place: true,
            ..Mode::default()
        };
        let out = OutcomePolicy::Formatter.resolve(mode, captured("", "", 0), None);
        assert_eq!(out, Outcome::pass());

        // Informational stdout does not turn a successful rewrite into a report
        let out = OutcomePolicy::Formatter.resolve(mode, captured("Formatting err.c\n", "", 0), None);
        assert_eq!(out, Outcome::pass());
    }

    #[test]
    fn test_formatter_own_failure_is_reported() {
        let stderr = "Invalid value for -style\n";
        let out = OutcomePolicy::Formatter.resolve(Mode::default(), captured("", stderr, 1), None);
        assert_eq!(out, Outcome::fail(1, stderr.as_bytes().to_vec()));

        // stderr output alone is a failure even with exit code 0
        let out = OutcomePolicy::Formatter.resolve(Mode::default(), captured("", "warning\n", 0), None);
        assert_eq!(out.exit_code, 1);
    }

    #[test]
    fn test_no_diff_never_changes_analyzer_result() {
        let no_diff = Mode {
            no_diff: true,
            ..Mode::default()
        };
        for policy in [
            OutcomePolicy::ExitCode,
            OutcomePolicy::ClangTidy,
            OutcomePolicy::IncludeWhatYouUse,
            OutcomePolicy::Sentinel,
        ] {
            let run = captured("finding\n", "", 1);
            assert_eq!(
                policy.resolve(no_diff, run.clone(), None),
                policy.resolve(Mode::default(), run, None),
                "{policy:?}"
            );
        }
    }
}
