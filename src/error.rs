use std::cmp::max;
use std::fmt;
use std::io;
use std::sync::Arc;

use unicode_width::UnicodeWidthStr;

use crate::types::span::Span;

/// A convenient type alias for results in this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// An error that can occur during rendering.
///
/// Mistakes in the template itself never produce an error, they are logged
/// and left in the output. Errors come from the host: a computed value or
/// collection that failed, a writer that failed, data that could not be
/// serialized, or a render that recursed too deeply.
#[derive(Clone)]
pub struct Error {
    kind: ErrorKind,
    msg: String,
    span: Option<(String, Span)>,
}

#[derive(Clone)]
enum ErrorKind {
    /// A message from a host function or serializer.
    Custom,
    /// The configured render depth was exceeded.
    MaxDepth,
    /// A serialized template could not be loaded.
    Deserialize,
    /// The writer failed.
    Io(Arc<io::Error>),
    /// A formatting error.
    Fmt,
}

impl Error {
    fn new(kind: ErrorKind, msg: impl Into<String>) -> Self {
        Self {
            kind,
            msg: msg.into(),
            span: None,
        }
    }

    /// Constructs a new error with a custom message.
    pub fn custom(msg: impl fmt::Display) -> Self {
        Self::new(ErrorKind::Custom, msg.to_string())
    }

    pub(crate) fn max_depth(max: usize) -> Self {
        Self::new(
            ErrorKind::MaxDepth,
            format!("reached maximum render depth ({})", max),
        )
    }

    pub(crate) fn deserialize(msg: impl fmt::Display) -> Self {
        Self::new(
            ErrorKind::Deserialize,
            format!("failed to load template: {}", msg),
        )
    }

    /// Attaches the location in the template that caused this error, unless
    /// the error already points somewhere more specific.
    pub(crate) fn enrich(mut self, source: &str, span: Span) -> Self {
        if self.span.is_none() && !source.is_empty() {
            self.span = Some((source.to_owned(), span));
        }
        self
    }

    /// Returns true if this error was caused by exceeding the maximum render
    /// depth.
    pub fn is_max_depth(&self) -> bool {
        matches!(self.kind, ErrorKind::MaxDepth)
    }

    /// The error message without any location information.
    pub fn message(&self) -> &str {
        &self.msg
    }
}

#[cfg(feature = "serde")]
impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::deserialize(err)
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Self::new(ErrorKind::Io(Arc::new(err)), "io error")
    }
}

impl From<fmt::Error> for Error {
    fn from(_: fmt::Error) -> Self {
        Self::new(ErrorKind::Fmt, "format error")
    }
}

impl From<String> for Error {
    fn from(msg: String) -> Self {
        Self::new(ErrorKind::Custom, msg)
    }
}

impl From<&str> for Error {
    fn from(msg: &str) -> Self {
        Self::new(ErrorKind::Custom, msg)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.kind {
            ErrorKind::Io(err) => Some(&**err),
            _ => None,
        }
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.span {
            Some((source, span)) => fmt_pretty(&self.msg, source, *span, f),
            None => write!(f, "{}", self.msg),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.span {
            Some((source, span)) => {
                if f.alternate() {
                    fmt_pretty(&self.msg, source, *span, f)
                } else {
                    write!(f, "{} between bytes {} and {}", self.msg, span.m, span.n)
                }
            }
            None => match &self.kind {
                ErrorKind::Io(err) => write!(f, "{}: {}", self.msg, err),
                _ => write!(f, "{}", self.msg),
            },
        }
    }
}

fn fmt_pretty(msg: &str, source: &str, span: Span, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let lines: Vec<_> = source.split_terminator('\n').collect();
    let (line, col) = to_line_col(&lines, span.m);
    let width = max(1, source.get(span.m..span.n).map_or(0, |s| s.width()));
    let code = lines
        .get(line)
        .or_else(|| lines.last())
        .copied()
        .unwrap_or_default();

    let num = (line + 1).to_string();
    let pad = num.width();
    let pipe = "|";
    let underline = "^".repeat(width);

    write!(
        f,
        "\n \
        {0:pad$} {pipe}\n \
        {num:>} {pipe} {code}\n \
        {0:pad$} {pipe} {underline:>width$} {msg}\n",
        "",
        pad = pad,
        pipe = pipe,
        num = num,
        code = code,
        underline = underline,
        width = col + width,
        msg = msg
    )
}

fn to_line_col(lines: &[&str], offset: usize) -> (usize, usize) {
    let mut n = 0;
    for (i, line) in lines.iter().enumerate() {
        let len = line.len() + 1;
        if n + len > offset {
            return (i, line.get(..offset - n).map_or(0, |s| s.width()));
        }
        n += len;
    }
    (lines.len(), lines.last().map(|l| l.width()).unwrap_or(0))
}
