//! Built-in behaviour records for every wrapped tool.

use super::{ArgOrder, DefaultFlag, FlagEffect, FlagRule, ReportStream, Tool, ToolKind, ToolSpec};
use crate::outcome::OutcomePolicy;

const CLANG_FORMAT: ToolSpec = ToolSpec {
    tool: Tool::ClangFormat,
    kind: ToolKind::Formatter { file_flag: None },
    arg_order: ArgOrder::FlagsThenFiles,
    flags: &[FlagRule {
        literal: "-i",
        effect: FlagEffect::InPlace,
    }],
    value_flags: &[],
    default_flags: &[],
    version_prefix: "clang-format version ",
    accepts_compilation_database: false,
    policy: OutcomePolicy::Formatter,
    report_stream: ReportStream::Stdout,
};

const UNCRUSTIFY: ToolSpec = ToolSpec {
    tool: Tool::Uncrustify,
    kind: ToolKind::Formatter { file_flag: Some("-f") },
    arg_order: ArgOrder::FlagsThenFiles,
    flags: &[FlagRule {
        literal: "--replace",
        effect: FlagEffect::InPlace,
    }],
    value_flags: &["-c", "-l", "--set"],
    // Quiet mode, otherwise uncrustify reports its progress on stderr
    default_flags: &[DefaultFlag { flag: "-q", key: "-q" }],
    version_prefix: "[uU]ncrustify[- ]",
    accepts_compilation_database: false,
    policy: OutcomePolicy::Formatter,
    report_stream: ReportStream::Stdout,
};

const CLANG_TIDY: ToolSpec = ToolSpec {
    tool: Tool::ClangTidy,
    kind: ToolKind::Analyzer,
    arg_order: ArgOrder::FilesThenFlags,
    flags: &[
        FlagRule {
            literal: "-fix",
            effect: FlagEffect::InPlace,
        },
        FlagRule {
            literal: "--fix",
            effect: FlagEffect::InPlace,
        },
        FlagRule {
            literal: "-fix-errors",
            effect: FlagEffect::FixErrors,
        },
        FlagRule {
            literal: "--fix-errors",
            effect: FlagEffect::FixErrors,
        },
    ],
    value_flags: &["-p"],
    default_flags: &[],
    version_prefix: "LLVM version ",
    accepts_compilation_database: true,
    policy: OutcomePolicy::ClangTidy,
    report_stream: ReportStream::Stderr,
};

const CPPCHECK: ToolSpec = ToolSpec {
    tool: Tool::Cppcheck,
    kind: ToolKind::Analyzer,
    arg_order: ArgOrder::FlagsThenFiles,
    flags: &[],
    value_flags: &[],
    // cppcheck exits 0 on findings and skips most checks unless told otherwise
    default_flags: &[
        DefaultFlag { flag: "-q", key: "-q" },
        DefaultFlag {
            flag: "--error-exitcode=1",
            key: "--error-exitcode",
        },
        DefaultFlag {
            flag: "--enable=all",
            key: "--enable",
        },
        DefaultFlag {
            flag: "--suppress=unmatchedSuppression",
            key: "--suppress=unmatchedSuppression",
        },
        DefaultFlag {
            flag: "--suppress=missingIncludeSystem",
            key: "--suppress=missingIncludeSystem",
        },
        DefaultFlag {
            flag: "--suppress=unusedFunction",
            key: "--suppress=unusedFunction",
        },
    ],
    version_prefix: "Cppcheck ",
    accepts_compilation_database: false,
    policy: OutcomePolicy::ExitCode,
    report_stream: ReportStream::Stderr,
};

const CPPLINT: ToolSpec = ToolSpec {
    tool: Tool::Cpplint,
    kind: ToolKind::Analyzer,
    arg_order: ArgOrder::FlagsThenFiles,
    flags: &[],
    value_flags: &[],
    default_flags: &[DefaultFlag {
        flag: "--verbose=0",
        key: "--verbose",
    }],
    version_prefix: "cpplint ",
    accepts_compilation_database: false,
    policy: OutcomePolicy::ExitCode,
    report_stream: ReportStream::Stderr,
};

const INCLUDE_WHAT_YOU_USE: ToolSpec = ToolSpec {
    tool: Tool::IncludeWhatYouUse,
    kind: ToolKind::Analyzer,
    arg_order: ArgOrder::FilesThenFlags,
    flags: &[],
    value_flags: &["-Xiwyu"],
    default_flags: &[],
    version_prefix: "include-what-you-use ",
    accepts_compilation_database: false,
    policy: OutcomePolicy::IncludeWhatYouUse,
    report_stream: ReportStream::Stderr,
};

const OCLINT: ToolSpec = ToolSpec {
    tool: Tool::Oclint,
    kind: ToolKind::Analyzer,
    arg_order: ArgOrder::FilesThenFlags,
    flags: &[],
    value_flags: &["-p", "-o", "-rc", "-report-type"],
    default_flags: &[],
    version_prefix: "OCLint version ",
    accepts_compilation_database: true,
    policy: OutcomePolicy::Sentinel,
    report_stream: ReportStream::Stderr,
};

pub(super) fn spec_for(tool: Tool) -> &'static ToolSpec {
    match tool {
        Tool::ClangFormat => &CLANG_FORMAT,
        Tool::ClangTidy => &CLANG_TIDY,
        Tool::Cppcheck => &CPPCHECK,
        Tool::Cpplint => &CPPLINT,
        Tool::IncludeWhatYouUse => &INCLUDE_WHAT_YOU_USE,
        Tool::Oclint => &OCLINT,
        Tool::Uncrustify => &UNCRUSTIFY,
    }
}
