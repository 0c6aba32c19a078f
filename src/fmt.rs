//! Output buffers, value stringification and HTML escaping.

use std::borrow::Cow;
use std::fmt;
use std::fmt::Write;
use std::io;

use crate::Value;

/// A [`std::fmt::Write`] façade over the render output.
pub(crate) struct Formatter<'a> {
    buf: &'a mut (dyn fmt::Write + 'a),
}

pub(crate) struct Writer<W> {
    writer: W,
    err: Option<io::Error>,
}

impl<'a> Formatter<'a> {
    pub(crate) fn with_string(buf: &'a mut String) -> Self {
        Self { buf }
    }

    pub(crate) fn with_writer<W>(buf: &'a mut Writer<W>) -> Self
    where
        W: io::Write,
    {
        Self { buf }
    }
}

impl fmt::Write for Formatter<'_> {
    #[inline]
    fn write_str(&mut self, s: &str) -> fmt::Result {
        fmt::Write::write_str(self.buf, s)
    }

    #[inline]
    fn write_char(&mut self, c: char) -> fmt::Result {
        fmt::Write::write_char(self.buf, c)
    }

    #[inline]
    fn write_fmt(&mut self, args: fmt::Arguments<'_>) -> fmt::Result {
        fmt::Write::write_fmt(self.buf, args)
    }
}

impl<W> Writer<W>
where
    W: io::Write,
{
    pub fn new(writer: W) -> Self {
        Self { writer, err: None }
    }

    pub fn take_err(&mut self) -> Option<io::Error> {
        self.err.take()
    }
}

impl<W> fmt::Write for Writer<W>
where
    W: io::Write,
{
    #[inline]
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.writer.write_all(s.as_bytes()).map_err(|e| {
            self.err = Some(e);
            fmt::Error
        })
    }

    #[inline]
    fn write_char(&mut self, c: char) -> fmt::Result {
        self.writer
            .write_all(c.encode_utf8(&mut [0; 4]).as_bytes())
            .map_err(|e| {
                self.err = Some(e);
                fmt::Error
            })
    }
}

/// Converts a value to the text that a placeholder emits.
///
/// - Strings are emitted as is.
/// - Lists join their members with a comma.
/// - Maps, host collections and functions emit a marker like `[map]`.
pub fn to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        value => {
            let mut s = String::new();
            // Writing to a `String` cannot fail.
            let _ = write_value(&mut s, value);
            s
        }
    }
}

fn write_value(f: &mut String, value: &Value) -> fmt::Result {
    match value {
        Value::None => Ok(()),
        Value::Bool(b) => write!(f, "{}", b),
        Value::Integer(n) => write!(f, "{}", n),
        Value::Float(n) => write!(f, "{}", n),
        Value::String(s) => f.write_str(s),
        Value::List(list) => {
            for (i, item) in list.iter().enumerate() {
                if i > 0 {
                    f.write_char(',')?;
                }
                write_value(f, item)?;
            }
            Ok(())
        }
        Value::Map(_) | Value::Fn(_) | Value::Collection(_) => {
            write!(f, "[{}]", value.human())
        }
    }
}

/// Escapes `&`, `<`, `>` and `"` for safe inclusion in HTML.
///
/// Returns the input unchanged if there is nothing to escape.
///
/// # Examples
///
/// ```
/// assert_eq!(stash::escape_html("\"x > y & z\""), "&quot;x &gt; y &amp; z&quot;");
/// ```
pub fn escape_html(s: &str) -> Cow<'_, str> {
    let mut out = String::new();
    let mut last = 0;
    for (i, byte) in s.bytes().enumerate() {
        let esc = match byte {
            b'&' => "&amp;",
            b'<' => "&lt;",
            b'>' => "&gt;",
            b'"' => "&quot;",
            _ => continue,
        };
        out.push_str(&s[last..i]);
        out.push_str(esc);
        last = i + 1;
    }
    if last == 0 {
        return Cow::Borrowed(s);
    }
    out.push_str(&s[last..]);
    Cow::Owned(out)
}
