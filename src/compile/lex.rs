use crate::types::span::Span;

/// A lexer that chunks the template source into raw text and tags so that the
/// parser doesn't have to operate on raw text.
///
/// The lexer never fails. A tag whose opening and closing brace runs differ in
/// length, e.g. `{{{ name }}`, is logged and left in the surrounding raw text.
#[cfg_attr(test, derive(Debug))]
pub struct Lexer<'source> {
    /// The original template source.
    pub source: &'source str,

    /// The start of the raw text that has not been emitted yet.
    cursor: usize,

    /// Where to continue searching for the next tag.
    scan: usize,

    /// A buffer to store the next token.
    next: Option<Token<'source>>,
}

/// The unit yielded by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'source> {
    /// Raw template.
    Raw(Span),
    /// A balanced tag, e.g. `{{ if cond }}` or `{{{ name }}}`.
    Tag(Tag<'source>),
}

/// A tag with its whitespace separated words.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tag<'source> {
    /// The number of braces on either side, either 2 or 3.
    pub braces: usize,
    /// The keyword or placeholder name, possibly empty.
    pub first: &'source str,
    /// The name or recursion flag, possibly empty.
    pub second: &'source str,
    /// The recursion flag, possibly empty.
    pub third: &'source str,
    /// The span of the entire tag including braces.
    pub span: Span,
}

/// A candidate tag found in the source.
struct Match<'source> {
    open: usize,
    close: usize,
    words: [&'source str; 3],
    span: Span,
}

impl<'source> Lexer<'source> {
    /// Construct a new lexer.
    pub fn new(source: &'source str) -> Self {
        Self {
            source,
            cursor: 0,
            scan: 0,
            next: None,
        }
    }

    fn lex(&mut self) -> Option<Token<'source>> {
        if let Some(next) = self.next.take() {
            return Some(next);
        }

        // We are within raw template, find the next balanced tag from
        // `scan`. Any unbalanced tags are skipped over but stay part of the
        // raw text that starts at `cursor`.
        //
        // xxxxxxx{{{xxxx}}xxxxx{{xxxx}}xxx
        //    ^      ^            ^
        //  cursor  scan          j
        loop {
            match self.find_at(self.scan) {
                Some(m) if m.open == m.close => {
                    let i = self.cursor;
                    let j = m.span.m;
                    let [first, second, third] = m.words;
                    let tag = Token::Tag(Tag {
                        braces: m.open,
                        first,
                        second,
                        third,
                        span: m.span,
                    });
                    self.cursor = m.span.n;
                    self.scan = m.span.n;
                    if i == j {
                        // The current cursor is exactly at the tag.
                        return Some(tag);
                    }
                    // We must first emit the raw token, so we store the tag
                    // in the `next` buffer.
                    self.next = Some(tag);
                    return Some(Token::Raw(Span::from(i..j)));
                }
                Some(m) => {
                    log::warn!(
                        "unbalanced brackets encountered: {}",
                        &self.source[m.span]
                    );
                    self.scan = m.span.n;
                }
                None => {
                    let i = self.cursor;
                    let j = self.source.len();
                    self.cursor = j;
                    self.scan = j;
                    return (i < j).then(|| Token::Raw(Span::from(i..j)));
                }
            }
        }
    }

    /// Finds the next candidate tag starting at or after `i`.
    fn find_at(&self, mut i: usize) -> Option<Match<'source>> {
        while let Some(d) = self.source[i..].find("{{") {
            let j = i + d;
            let run = self.source[j..].bytes().take_while(|&b| b == b'{').count();
            // Prefer the longest opening run, just like a greedy `\{{2,3}`.
            for open in [3, 2] {
                if open <= run {
                    if let Some(m) = self.match_at(j, open) {
                        return Some(m);
                    }
                }
            }
            i = j + 1;
        }
        None
    }

    /// Tries to match a tag that starts at `j` with `open` braces.
    fn match_at(&self, j: usize, open: usize) -> Option<Match<'source>> {
        let mut k = j + open;
        let mut words = [""; 3];
        for word in &mut words {
            k = self.skip_whitespace(k);
            let end = self.source[k..]
                .char_indices()
                .find(|&(_, c)| c == '}' || c.is_whitespace())
                .map_or(self.source.len(), |(d, _)| k + d);
            *word = &self.source[k..end];
            k = end;
        }
        k = self.skip_whitespace(k);
        let close = self.source[k..]
            .bytes()
            .take_while(|&b| b == b'}')
            .take(3)
            .count();
        if close < 2 {
            return None;
        }
        Some(Match {
            open,
            close,
            words,
            span: Span::from(j..k + close),
        })
    }

    fn skip_whitespace(&self, k: usize) -> usize {
        let s = &self.source[k..];
        k + (s.len() - s.trim_start().len())
    }
}

impl<'source> Iterator for Lexer<'source> {
    type Item = Token<'source>;

    fn next(&mut self) -> Option<Self::Item> {
        self.lex()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(source: &str) -> Vec<String> {
        Lexer::new(source)
            .map(|tk| match tk {
                Token::Raw(span) => format!("Raw({:?})", &source[span]),
                Token::Tag(tag) => format!(
                    "Tag{}({:?}, {:?}, {:?})",
                    tag.braces, tag.first, tag.second, tag.third
                ),
            })
            .collect()
    }

    #[test]
    fn lex_empty() {
        assert!(lex("").is_empty());
    }

    #[test]
    fn lex_raw_only() {
        assert_eq!(lex("lorem ipsum"), ["Raw(\"lorem ipsum\")"]);
    }

    #[test]
    fn lex_placeholder() {
        assert_eq!(
            lex("lorem {{ipsum}} dolor"),
            [
                "Raw(\"lorem \")",
                "Tag2(\"ipsum\", \"\", \"\")",
                "Raw(\" dolor\")"
            ]
        );
    }

    #[test]
    fn lex_triple_braces() {
        assert_eq!(lex("{{{ipsum /r}}}"), ["Tag3(\"ipsum\", \"/r\", \"\")"]);
    }

    #[test]
    fn lex_three_words_and_whitespace() {
        assert_eq!(
            lex("{{  if   dolor /r }}"),
            ["Tag2(\"if\", \"dolor\", \"/r\")"]
        );
    }

    #[test]
    fn lex_unbalanced_is_raw() {
        assert_eq!(
            lex("a{{{ipsum}}b{{dolor}}"),
            ["Raw(\"a{{{ipsum}}b\")", "Tag2(\"dolor\", \"\", \"\")"]
        );
    }

    #[test]
    fn lex_unbalanced_closing() {
        assert_eq!(lex("{{ipsum}}}"), ["Raw(\"{{ipsum}}}\")"]);
    }

    #[test]
    fn lex_too_many_words_is_raw() {
        assert_eq!(lex("{{a b c d}}"), ["Raw(\"{{a b c d}}\")"]);
    }

    #[test]
    fn lex_unclosed() {
        assert_eq!(lex("lorem {{ ipsum"), ["Raw(\"lorem {{ ipsum\")"]);
    }

    #[test]
    fn lex_single_closing_brace() {
        assert_eq!(lex("{{ipsum} x"), ["Raw(\"{{ipsum} x\")"]);
    }

    #[test]
    fn lex_unicode() {
        assert_eq!(
            lex("ñ{{ñame}}ñ"),
            ["Raw(\"ñ\")", "Tag2(\"ñame\", \"\", \"\")", "Raw(\"ñ\")"]
        );
    }
}
