/// Scanner for Yezu source text
///
/// Splits source into raw lexemes, each tagged with the position of its
/// first character. Classification happens later, in the lexer.

use std::fmt;
use std::rc::Rc;

/// A location in a source file
///
/// Lines are 1-based, columns are 0-based.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Position {
    pub path: Rc<str>,
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(path: Rc<str>, line: usize, column: usize) -> Self {
        Position { path, line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.path, self.line, self.column)
    }
}

fn is_quote(c: char) -> bool {
    c == '"' || c == '\''
}

/// Characters that end an unquoted run inside a lexeme
fn ends_run(c: char) -> bool {
    c.is_whitespace() || is_quote(c) || c == ';'
}

/// Lazy cursor over the raw lexemes of a source string
pub struct Scanner<'src> {
    source: &'src str,
    path: Rc<str>,
    index: usize,
    line: usize,
    column: usize,
}

impl<'src> Scanner<'src> {
    pub fn new(source: &'src str, path: impl Into<Rc<str>>) -> Self {
        Scanner {
            source,
            path: path.into(),
            index: 0,
            line: 1,
            column: 0,
        }
    }

    /// Position of the character under the cursor
    pub fn here(&self) -> Position {
        Position::new(Rc::clone(&self.path), self.line, self.column)
    }

    fn current(&self) -> Option<char> {
        self.source[self.index..].chars().next()
    }

    fn increment(&mut self) {
        if let Some(c) = self.current() {
            self.index += c.len_utf8();
            if c == '\n' {
                self.line += 1;
                self.column = 0;
            } else {
                self.column += 1;
            }
        }
    }

    fn skip_while(&mut self, cond: impl Fn(char) -> bool) {
        while let Some(c) = self.current() {
            if !cond(c) {
                break;
            }
            self.increment();
        }
    }

    /// Advance up to (not past) the next `stop` character or end of input
    fn until(&mut self, stop: char) {
        self.skip_while(|c| c != stop);
    }
}

impl Iterator for Scanner<'_> {
    type Item = (Position, String);

    fn next(&mut self) -> Option<Self::Item> {
        self.skip_while(char::is_whitespace);

        let first = self.current()?;
        let start = self.index;
        let pos = self.here();

        if first == ';' {
            self.until('\n');
            return Some((pos, self.source[start..self.index].to_string()));
        }

        self.skip_while(|c| !ends_run(c));
        while let Some(c) = self.current() {
            if !is_quote(c) {
                break;
            }
            // Quoted span: opening quote, content, closing quote
            self.increment();
            self.until(c);
            self.increment();
            self.skip_while(|c| !ends_run(c));
        }

        Some((pos, self.source[start..self.index].to_string()))
    }
}
