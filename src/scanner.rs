use crate::error::ParseError;

/// A token of the path data mini-language.
///
/// Arc flags are not a token kind of their own: when scanned through the
/// generic [`Iterator`](struct.Scanner.html#impl-Iterator) interface they
/// surface as ordinary numbers. The interpreter reads them through
/// [`Scanner::flag`] instead, which consumes exactly one digit so that two
/// flags and a coordinate may be packed without separators.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Token {
    Command(char),
    Number(f64),
}

pub(crate) fn is_command_letter(c: char) -> bool {
    matches!(
        c,
        'M' | 'm'
            | 'L'
            | 'l'
            | 'H'
            | 'h'
            | 'V'
            | 'v'
            | 'C'
            | 'c'
            | 'S'
            | 's'
            | 'Q'
            | 'q'
            | 'T'
            | 't'
            | 'A'
            | 'a'
            | 'Z'
            | 'z'
    )
}

fn starts_number(c: char) -> bool {
    c.is_ascii_digit() || c == '+' || c == '-' || c == '.'
}

/// A buffered scanner over the path text, keeping track of line and column.
///
/// Produces command letters and numbers in left-to-right order. Whitespace
/// and commas separate tokens but are never required where the grammar is
/// unambiguous (a command letter, a sign or a decimal point all terminate
/// the preceding number).
pub struct Scanner<Iter> {
    src: Iter,
    current: char,
    line: i32,
    col: i32,
    finished: bool,
    buffer: String,
}

impl<Iter: Iterator<Item = char>> Scanner<Iter> {
    pub fn new<IntoIter>(src: IntoIter) -> Self
    where
        IntoIter: IntoIterator<IntoIter = Iter>,
    {
        Self::with_position(0, 0, src)
    }

    /// A scanner reporting positions relative to the given starting point,
    /// for path data embedded in a larger document.
    pub fn with_position<IntoIter>(line: i32, column: i32, src: IntoIter) -> Self
    where
        IntoIter: IntoIterator<IntoIter = Iter>,
    {
        let mut src = src.into_iter();

        let (current, finished) = match src.next() {
            Some(c) => (c, false),
            None => (' ', true),
        };

        let (line, column) = if current == '\n' {
            (line + 1, -1)
        } else {
            (line, column)
        };

        Scanner {
            src,
            current,
            line,
            col: column,
            finished,
            buffer: String::new(),
        }
    }

    /// The position of the character about to be scanned.
    pub fn position(&self) -> (i32, i32) {
        (self.line, self.col)
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn skip_separators(&mut self) {
        while !self.finished && (self.current.is_whitespace() || self.current == ',') {
            self.advance_one();
        }
    }

    /// Consumes the current character if it is a recognized command letter.
    pub fn command(&mut self) -> Option<char> {
        if !self.finished && is_command_letter(self.current) {
            let cmd = self.current;
            self.advance_one();
            return Some(cmd);
        }

        None
    }

    pub(crate) fn at_command_letter(&self) -> bool {
        !self.finished && is_command_letter(self.current)
    }

    pub(crate) fn at_number(&self) -> bool {
        !self.finished && starts_number(self.current)
    }

    pub(crate) fn unexpected(&self) -> ParseError {
        ParseError::Syntax {
            found: self.current,
            line: self.line,
            column: self.col,
        }
    }

    /// Scans a number: `[+-]? digits? (.digits)? ([eE][+-]? digits)?`, with
    /// at least one digit in the mantissa.
    pub fn number(&mut self) -> Result<f64, ParseError> {
        self.skip_separators();
        self.buffer.clear();

        let line = self.line;
        let column = self.col;

        if self.current == '-' || self.current == '+' {
            self.buffer.push(self.current);
            self.advance_one();
        }

        let mut has_digits = false;

        while self.current.is_ascii_digit() {
            self.buffer.push(self.current);
            self.advance_one();
            has_digits = true;
        }

        if self.current == '.' {
            self.buffer.push('.');
            self.advance_one();

            while self.current.is_ascii_digit() {
                self.buffer.push(self.current);
                self.advance_one();
                has_digits = true;
            }
        }

        if !has_digits {
            return Err(self.unexpected());
        }

        if self.current == 'e' || self.current == 'E' {
            self.buffer.push(self.current);
            self.advance_one();

            if self.current == '-' || self.current == '+' {
                self.buffer.push(self.current);
                self.advance_one();
            }

            let mut has_exponent_digits = false;

            while self.current.is_ascii_digit() {
                self.buffer.push(self.current);
                self.advance_one();
                has_exponent_digits = true;
            }

            if !has_exponent_digits {
                return Err(self.unexpected());
            }
        }

        match self.buffer.parse::<f64>() {
            Ok(value) => Ok(value),
            Err(_) => Err(ParseError::Syntax {
                found: self.current,
                line,
                column,
            }),
        }
    }

    /// Scans an arc flag: a single `0` or `1`, possibly directly adjacent to
    /// the surrounding tokens.
    pub fn flag(&mut self) -> Result<bool, ParseError> {
        self.skip_separators();
        match self.current {
            '1' => {
                self.advance_one();
                Ok(true)
            }
            '0' => {
                self.advance_one();
                Ok(false)
            }
            _ => Err(self.unexpected()),
        }
    }

    fn advance_one(&mut self) {
        if self.finished {
            return;
        }
        match self.src.next() {
            Some('\n') => {
                self.current = '\n';
                self.line += 1;
                self.col = -1;
            }
            Some(c) => {
                self.current = c;
                self.col += 1;
            }
            None => {
                self.current = '~';
                self.finished = true;
            }
        }
    }
}

impl<Iter: Iterator<Item = char>> Iterator for Scanner<Iter> {
    type Item = Result<Token, ParseError>;

    fn next(&mut self) -> Option<Result<Token, ParseError>> {
        self.skip_separators();

        if self.finished {
            return None;
        }

        if is_command_letter(self.current) {
            let cmd = self.current;
            self.advance_one();
            return Some(Ok(Token::Command(cmd)));
        }

        if starts_number(self.current) {
            return Some(self.number().map(Token::Number));
        }

        Some(Err(self.unexpected()))
    }
}

#[cfg(test)]
fn tokens(src: &str) -> Vec<Token> {
    Scanner::new(src.chars())
        .collect::<Result<Vec<_>, _>>()
        .unwrap()
}

#[test]
fn no_separators_needed() {
    assert_eq!(
        tokens("M100 100L200-200"),
        vec![
            Token::Command('M'),
            Token::Number(100.0),
            Token::Number(100.0),
            Token::Command('L'),
            Token::Number(200.0),
            Token::Number(-200.0),
        ]
    );
}

#[test]
fn decimal_point_terminates_number() {
    // Per the SVG grammar "0.6.5" reads as 0.6 followed by 0.5.
    assert_eq!(
        tokens("0.6.5"),
        vec![Token::Number(0.6), Token::Number(0.5)]
    );
}

#[test]
fn signs_and_exponents() {
    assert_eq!(
        tokens("1e-2+3 -4E+5.25"),
        vec![
            Token::Number(1e-2),
            Token::Number(3.0),
            Token::Number(-4e5),
            Token::Number(0.25),
        ]
    );
}

#[test]
fn extreme_magnitudes() {
    assert_eq!(
        tokens("-3.4e38 3.4E+38-3.4E-38,3.4e-38"),
        vec![
            Token::Number(-3.4e38),
            Token::Number(3.4e38),
            Token::Number(-3.4e-38),
            Token::Number(3.4e-38),
        ]
    );
}

#[test]
fn bad_numbers() {
    let bad = &mut |src: &str| {
        let result: Result<Vec<_>, _> = Scanner::new(src.chars()).collect();
        matches!(result, Err(ParseError::Syntax { .. }))
    };

    assert!(bad("--1"));
    assert!(bad("1ee2"));
    assert!(bad("1e--1"));
    assert!(bad("*2"));
    assert!(bad("1e"));
    assert!(bad("."));
}

#[test]
fn packed_flags() {
    // Flag reads are fixed-width, so "1 0 30" may be written "1030".
    let mut scanner = Scanner::new("1030".chars());
    assert_eq!(scanner.flag(), Ok(true));
    assert_eq!(scanner.flag(), Ok(false));
    assert_eq!(scanner.number(), Ok(30.0));
    assert!(scanner.is_finished());
}

#[test]
fn positions() {
    let mut scanner = Scanner::new("M 0 \n  *".chars());
    assert_eq!(scanner.next(), Some(Ok(Token::Command('M'))));
    assert_eq!(scanner.next(), Some(Ok(Token::Number(0.0))));
    assert_eq!(
        scanner.next(),
        Some(Err(ParseError::Syntax {
            found: '*',
            line: 1,
            column: 2,
        }))
    );
}
