use token::*;
pub mod stream;
pub mod token;

pub use stream::{Matcher, TokenStream};

pub struct Lexer<'a> {
    buf: &'a str,
    chars: Vec<(usize, char)>,
    len: usize,
    pos: usize,
}

pub struct LexResult<'a> {
    pub tokens: Vec<LocatableToken>,
    pub buf: &'a str,
}

impl<'a> LexResult<'a> {
    /// Hand the significant tokens to a cursor for parsing.
    pub fn into_stream(self) -> TokenStream<'a> {
        TokenStream::new(self.tokens, self.buf)
    }
}

impl<'a> Lexer<'a> {
    pub fn new(buf: &'a str) -> Lexer<'a> {
        let chars: Vec<(usize, char)> = buf.char_indices().collect();
        let len = chars.len();
        Lexer {
            buf,
            chars,
            len,
            pos: 0,
        }
    }

    pub fn lex(mut self) -> LexResult<'a> {
        let mut tokens = Vec::new();

        loop {
            if self.pos >= self.len {
                tokens.push(LocatableToken::at_position(Token::EOF, self.buf.len()));
                break;
            }

            let (curr_offset, curr_ch) = self.chars[self.pos];

            let token = match curr_ch {
                // Single-quote String
                '\'' => match self.scan_quoted('\'', true) {
                    Some(slice) => Token::Value(Value::SingleQuoted(slice)),
                    None => Token::Unknown(Slice::new(curr_offset, self.buf.len())),
                },
                // Quoted identifiers
                '"' | '`' | '[' => {
                    let close = match curr_ch {
                        '[' => ']',
                        c => c,
                    };

                    match self.scan_quoted(close, true) {
                        Some(slice) => Token::Identifier(Ident::quoted(slice, close)),
                        None => Token::Unknown(Slice::new(curr_offset, self.buf.len())),
                    }
                }
                // Space
                ' ' | '\t' => {
                    self.pos += 1;
                    Token::Space
                }
                // NewLine
                '\n' | '\r' => {
                    self.pos += 1;
                    Token::NewLine
                }
                '.' => {
                    self.pos += 1;
                    Token::Dot
                }
                ',' => {
                    self.pos += 1;
                    Token::Comma
                }
                '(' => {
                    self.pos += 1;
                    Token::ParenOpen
                }
                ')' => {
                    self.pos += 1;
                    Token::ParenClose
                }
                ';' => {
                    self.pos += 1;
                    Token::Semicolon
                }
                // Line comment
                '-' if self.peek_char(1) == Some('-') => {
                    let end = self.scan_until(self.pos, |c| c == '\n' || c == '\r');
                    self.pos = end;

                    Token::Comment(Slice::new(curr_offset + 2, self.offset_at(end)))
                }
                // Arithmetic
                '*' => {
                    self.pos += 1;
                    Token::Arithmetic(Arithmetic::Multiply)
                }
                '/' => {
                    self.pos += 1;
                    Token::Arithmetic(Arithmetic::Divide)
                }
                '%' => {
                    self.pos += 1;
                    Token::Arithmetic(Arithmetic::Modulo)
                }
                '+' => {
                    self.pos += 1;
                    Token::Arithmetic(Arithmetic::Plus)
                }
                '-' => {
                    self.pos += 1;
                    Token::Arithmetic(Arithmetic::Minus)
                }
                // Comparison, bitwise and concatenation
                '=' => match self.peek_char(1) {
                    Some('=') => self.symbol(2, Token::Comparison(Comparison::Equal2)),
                    _ => self.symbol(1, Token::Comparison(Comparison::Equal)),
                },
                '!' => match self.peek_char(1) {
                    Some('=') => self.symbol(2, Token::Comparison(Comparison::NotEqual2)),
                    _ => self.symbol(1, Token::Unknown(Slice::new(curr_offset, curr_offset + 1))),
                },
                '<' => match self.peek_char(1) {
                    Some('=') => self.symbol(2, Token::Comparison(Comparison::LessThanOrEqual)),
                    Some('>') => self.symbol(2, Token::Comparison(Comparison::NotEqual)),
                    Some('<') => self.symbol(2, Token::Bitwise(Bitwise::LeftShift)),
                    _ => self.symbol(1, Token::Comparison(Comparison::LessThan)),
                },
                '>' => match self.peek_char(1) {
                    Some('=') => self.symbol(2, Token::Comparison(Comparison::GreaterThanOrEqual)),
                    Some('>') => self.symbol(2, Token::Bitwise(Bitwise::RightShift)),
                    _ => self.symbol(1, Token::Comparison(Comparison::GreaterThan)),
                },
                '&' => self.symbol(1, Token::Bitwise(Bitwise::And)),
                '|' => match self.peek_char(1) {
                    Some('|') => self.symbol(2, Token::Concat),
                    _ => self.symbol(1, Token::Bitwise(Bitwise::Or)),
                },
                // Alphabetical
                c if c.is_alphabetic() || c == '_' => {
                    let end = self.scan_until(self.pos, |c| !(c.is_alphanumeric() || c == '_'));
                    let end_offset = self.offset_at(end);
                    self.pos = end;

                    match Keyword::lookup(&self.buf[curr_offset..end_offset]) {
                        Some(keyword) => Token::Keyword(keyword),
                        None => Token::Identifier(Ident::new(Slice::new(curr_offset, end_offset))),
                    }
                }
                c if c.is_ascii_digit() => {
                    let end = self.scan_until(self.pos, |c| !c.is_ascii_digit());
                    self.pos = end;

                    Token::Numeric(Slice::new(curr_offset, self.offset_at(end)))
                }
                c => {
                    self.pos += 1;
                    Token::Unknown(Slice::new(curr_offset, curr_offset + c.len_utf8()))
                }
            };

            tokens.push(LocatableToken::at_position(token, curr_offset));
        }

        LexResult {
            buf: self.buf,
            tokens,
        }
    }

    /// Consume a fixed-width symbol of `width` chars.
    fn symbol(&mut self, width: usize, token: Token) -> Token {
        self.pos += width;
        token
    }

    fn peek_char(&self, ahead: usize) -> Option<char> {
        self.chars.get(self.pos + ahead).map(|(_, ch)| *ch)
    }

    /// Byte offset of the char at index `pos`, or the buffer length past the end.
    fn offset_at(&self, pos: usize) -> usize {
        match self.chars.get(pos) {
            Some((offset, _)) => *offset,
            None => self.buf.len(),
        }
    }

    /// Scan a delimited run starting at the opening char under the cursor.
    /// Returns the slice between the delimiters and moves past the closing one,
    /// or `None` (cursor at end of input) if the run is never closed.
    /// With `escapable`, a doubled closing char is part of the content.
    fn scan_quoted(&mut self, close: char, escapable: bool) -> Option<Slice> {
        let start_offset = self.offset_at(self.pos + 1);
        let mut cursor = self.pos + 1;

        loop {
            cursor = self.scan_to(cursor, close);

            if cursor >= self.len {
                self.pos = self.len;
                return None;
            }

            if escapable && self.chars.get(cursor + 1).map(|(_, ch)| *ch) == Some(close) {
                cursor += 2;
                continue;
            }

            self.pos = cursor + 1;
            return Some(Slice::new(start_offset, self.chars[cursor].0));
        }
    }

    /// Given a start point and a char to find, scan until the char is found
    /// and return the index of that char.
    /// Only really works when we expect to end the current token by one and one
    /// character only. For more complex scenarios, use scan_until.
    fn scan_to(&self, start: usize, char: char) -> usize {
        self.scan_until(start, |c| c == char)
    }

    /// Given the function end_func, scan the input until the func returns true,
    /// returning the index at that point.
    fn scan_until<F>(&self, start: usize, end_func: F) -> usize
    where
        F: Fn(char) -> bool,
    {
        let mut cursor = start;

        loop {
            if cursor >= self.len {
                break;
            }

            let (_, ch) = self.chars[cursor];

            if end_func(ch) {
                break;
            }

            cursor += 1;
        }

        cursor
    }
}
