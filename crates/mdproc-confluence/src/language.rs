//! Code macro languages recognized by Confluence.
//!
//! Fence info strings are mapped onto the fixed set of languages the
//! `{code}` macro highlights. Anything else renders as a plain code block.

/// Languages supported by the Confluence `{code}` macro.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeLanguage {
    ActionScript,
    AppleScript,
    Bash,
    CSharp,
    ColdFusion,
    Cpp,
    Css,
    Delphi,
    Diff,
    Erlang,
    Groovy,
    Java,
    JavaFx,
    JavaScript,
    Perl,
    Php,
    PowerShell,
    Python,
    Ruby,
    Sass,
    Scala,
    Sql,
    VisualBasic,
    Xml,
    Yaml,
}

impl CodeLanguage {
    /// Parse a language from a fence info string.
    ///
    /// Only the first word is considered and matching is case-insensitive,
    /// so `Rust title="x"` and `PYTHON` are handled. Common aliases are
    /// normalized (`sh` → `bash`, `js` → `javascript`, `html` → `xml`).
    ///
    /// Returns None if the macro has no highlighter for the language.
    #[must_use]
    pub fn parse(info: &str) -> Option<Self> {
        let word = info.split_whitespace().next()?;
        // `{.python}` attribute syntax
        let word = word.trim_start_matches('{').trim_start_matches('.');
        let word = word.trim_end_matches('}').to_ascii_lowercase();

        match word.as_str() {
            "actionscript" | "actionscript3" | "as3" => Some(Self::ActionScript),
            "applescript" => Some(Self::AppleScript),
            "bash" | "sh" | "shell" | "zsh" | "console" => Some(Self::Bash),
            "c#" | "cs" | "csharp" => Some(Self::CSharp),
            "coldfusion" | "cfm" => Some(Self::ColdFusion),
            "cpp" | "c++" | "c" | "h" | "hpp" => Some(Self::Cpp),
            "css" => Some(Self::Css),
            "delphi" | "pascal" => Some(Self::Delphi),
            "diff" | "patch" => Some(Self::Diff),
            "erlang" | "erl" => Some(Self::Erlang),
            "groovy" | "gradle" => Some(Self::Groovy),
            "java" => Some(Self::Java),
            "javafx" => Some(Self::JavaFx),
            "javascript" | "js" | "json" | "jsx" => Some(Self::JavaScript),
            "perl" | "pl" => Some(Self::Perl),
            "php" => Some(Self::Php),
            "powershell" | "ps1" | "pwsh" => Some(Self::PowerShell),
            "python" | "py" | "python3" => Some(Self::Python),
            "ruby" | "rb" => Some(Self::Ruby),
            "sass" | "scss" => Some(Self::Sass),
            "scala" => Some(Self::Scala),
            "sql" | "mysql" | "postgresql" | "plsql" => Some(Self::Sql),
            "vb" | "vbnet" | "visualbasic" => Some(Self::VisualBasic),
            "xml" | "html" | "xhtml" | "svg" => Some(Self::Xml),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }

    /// Language name as written in the macro parameter.
    #[must_use]
    pub fn macro_name(self) -> &'static str {
        match self {
            Self::ActionScript => "actionscript3",
            Self::AppleScript => "applescript",
            Self::Bash => "bash",
            Self::CSharp => "c#",
            Self::ColdFusion => "coldfusion",
            Self::Cpp => "cpp",
            Self::Css => "css",
            Self::Delphi => "delphi",
            Self::Diff => "diff",
            Self::Erlang => "erlang",
            Self::Groovy => "groovy",
            Self::Java => "java",
            Self::JavaFx => "javafx",
            Self::JavaScript => "javascript",
            Self::Perl => "perl",
            Self::Php => "php",
            Self::PowerShell => "powershell",
            Self::Python => "python",
            Self::Ruby => "ruby",
            Self::Sass => "sass",
            Self::Scala => "scala",
            Self::Sql => "sql",
            Self::VisualBasic => "vb",
            Self::Xml => "xml",
            Self::Yaml => "yaml",
        }
    }
}

/// Opening `{code}` macro line for a fence info string.
pub(crate) fn code_macro_open(info: &str) -> String {
    match CodeLanguage::parse(info) {
        Some(lang) => format!("{{code:language={}}}", lang.macro_name()),
        None => CODE_MACRO.to_owned(),
    }
}

/// Plain code macro, used for closing fences and unknown languages.
pub(crate) const CODE_MACRO: &str = "{code}";
