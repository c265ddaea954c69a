use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Keyword {
    Action,
    And,
    Cascade,
    Check,
    Collate,
    Create,
    Default,
    Deferrable,
    Deferred,
    Delete,
    Exists,
    Foreign,
    Glob,
    If,
    Immediate,
    In,
    Initially,
    Is,
    Key,
    Like,
    Match,
    No,
    Not,
    Null,
    On,
    Or,
    Primary,
    References,
    Regexp,
    Restrict,
    Select,
    Set,
    Table,
    Temp,
    Temporary,
    Update,
    Without,
}

impl Keyword {
    /// Case-insensitive keyword lookup. Returns `None` for any word that
    /// should be lexed as an identifier.
    pub fn lookup(word: &str) -> Option<Keyword> {
        let keyword = match word.to_ascii_uppercase().as_str() {
            "ACTION" => Keyword::Action,
            "AND" => Keyword::And,
            "CASCADE" => Keyword::Cascade,
            "CHECK" => Keyword::Check,
            "COLLATE" => Keyword::Collate,
            "CREATE" => Keyword::Create,
            "DEFAULT" => Keyword::Default,
            "DEFERRABLE" => Keyword::Deferrable,
            "DEFERRED" => Keyword::Deferred,
            "DELETE" => Keyword::Delete,
            "EXISTS" => Keyword::Exists,
            "FOREIGN" => Keyword::Foreign,
            "GLOB" => Keyword::Glob,
            "IF" => Keyword::If,
            "IMMEDIATE" => Keyword::Immediate,
            "IN" => Keyword::In,
            "INITIALLY" => Keyword::Initially,
            "IS" => Keyword::Is,
            "KEY" => Keyword::Key,
            "LIKE" => Keyword::Like,
            "MATCH" => Keyword::Match,
            "NO" => Keyword::No,
            "NOT" => Keyword::Not,
            "NULL" => Keyword::Null,
            "ON" => Keyword::On,
            "OR" => Keyword::Or,
            "PRIMARY" => Keyword::Primary,
            "REFERENCES" => Keyword::References,
            "REGEXP" => Keyword::Regexp,
            "RESTRICT" => Keyword::Restrict,
            "SELECT" => Keyword::Select,
            "SET" => Keyword::Set,
            "TABLE" => Keyword::Table,
            "TEMP" => Keyword::Temp,
            "TEMPORARY" => Keyword::Temporary,
            "UPDATE" => Keyword::Update,
            "WITHOUT" => Keyword::Without,
            _ => return None,
        };

        Some(keyword)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Keyword::Action => "ACTION",
            Keyword::And => "AND",
            Keyword::Cascade => "CASCADE",
            Keyword::Check => "CHECK",
            Keyword::Collate => "COLLATE",
            Keyword::Create => "CREATE",
            Keyword::Default => "DEFAULT",
            Keyword::Deferrable => "DEFERRABLE",
            Keyword::Deferred => "DEFERRED",
            Keyword::Delete => "DELETE",
            Keyword::Exists => "EXISTS",
            Keyword::Foreign => "FOREIGN",
            Keyword::Glob => "GLOB",
            Keyword::If => "IF",
            Keyword::Immediate => "IMMEDIATE",
            Keyword::In => "IN",
            Keyword::Initially => "INITIALLY",
            Keyword::Is => "IS",
            Keyword::Key => "KEY",
            Keyword::Like => "LIKE",
            Keyword::Match => "MATCH",
            Keyword::No => "NO",
            Keyword::Not => "NOT",
            Keyword::Null => "NULL",
            Keyword::On => "ON",
            Keyword::Or => "OR",
            Keyword::Primary => "PRIMARY",
            Keyword::References => "REFERENCES",
            Keyword::Regexp => "REGEXP",
            Keyword::Restrict => "RESTRICT",
            Keyword::Select => "SELECT",
            Keyword::Set => "SET",
            Keyword::Table => "TABLE",
            Keyword::Temp => "TEMP",
            Keyword::Temporary => "TEMPORARY",
            Keyword::Update => "UPDATE",
            Keyword::Without => "WITHOUT",
        }
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ident {
    /// Slice excludes any surrounding quotes.
    pub value: Slice,
    /// Closing delimiter of a quoted identifier. A doubled delimiter inside
    /// the slice stands for one.
    pub quote: Option<char>,
}

impl Ident {
    pub fn new(value: Slice) -> Self {
        Ident { value, quote: None }
    }

    pub fn quoted(value: Slice, close: char) -> Self {
        Ident {
            value,
            quote: Some(close),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Value {
    /// Slice excludes the surrounding quotes. Doubled quotes inside are
    /// still present.
    SingleQuoted(Slice),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Arithmetic {
    Multiply,
    Divide,
    Modulo,
    Plus,
    Minus,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Comparison {
    Equal,              // =
    Equal2,             // ==
    GreaterThanOrEqual, // >=
    LessThanOrEqual,    // <=
    NotEqual,           // <>
    NotEqual2,          // !=
    GreaterThan,        // >
    LessThan,           // <
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bitwise {
    LeftShift,  // <<
    RightShift, // >>
    And,        // &
    Or,         // |
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Slice {
    pub start: usize,
    pub end: usize,
}

impl Slice {
    pub fn new(start: usize, end: usize) -> Slice {
        Slice { start, end }
    }
}

/// The coarse category of a token, used by matchers that accept any token
/// of a given shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenKind {
    Keyword,
    Identifier,
    String,
    Integer,
    Dot,
    Comma,
    LeftParen,
    RightParen,
    Semicolon,
    Operator,
    Trivia,
    Unknown,
    EOF,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Keyword => "keyword",
            TokenKind::Identifier => "identifier",
            TokenKind::String => "string literal",
            TokenKind::Integer => "integer literal",
            TokenKind::Dot => "'.'",
            TokenKind::Comma => "','",
            TokenKind::LeftParen => "'('",
            TokenKind::RightParen => "')'",
            TokenKind::Semicolon => "';'",
            TokenKind::Operator => "operator",
            TokenKind::Trivia => "whitespace",
            TokenKind::Unknown => "unrecognised input",
            TokenKind::EOF => "end of input",
        };

        f.write_str(name)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Token {
    Space,
    NewLine,
    Dot,
    Comma,
    ParenOpen,
    ParenClose,
    Semicolon,
    Keyword(Keyword),
    Arithmetic(Arithmetic),
    Comparison(Comparison),
    Bitwise(Bitwise),
    Concat,
    Numeric(Slice),
    Identifier(Ident),
    Comment(Slice),
    Value(Value),
    EOF,
    Unknown(Slice),
}

impl Token {
    pub fn kind(&self) -> TokenKind {
        match self {
            Token::Space | Token::NewLine | Token::Comment(_) => TokenKind::Trivia,
            Token::Dot => TokenKind::Dot,
            Token::Comma => TokenKind::Comma,
            Token::ParenOpen => TokenKind::LeftParen,
            Token::ParenClose => TokenKind::RightParen,
            Token::Semicolon => TokenKind::Semicolon,
            Token::Keyword(_) => TokenKind::Keyword,
            Token::Arithmetic(_) | Token::Comparison(_) | Token::Bitwise(_) | Token::Concat => {
                TokenKind::Operator
            }
            Token::Numeric(_) => TokenKind::Integer,
            Token::Identifier(_) => TokenKind::Identifier,
            Token::Value(_) => TokenKind::String,
            Token::EOF => TokenKind::EOF,
            Token::Unknown(_) => TokenKind::Unknown,
        }
    }

    /// Whitespace, comments and the end marker carry no grammar.
    pub fn is_significant(&self) -> bool {
        !matches!(self.kind(), TokenKind::Trivia | TokenKind::EOF)
    }

    /// Fixed source spelling of punctuation and operator tokens.
    pub fn symbol(&self) -> Option<&'static str> {
        let symbol = match self {
            Token::Dot => ".",
            Token::Comma => ",",
            Token::ParenOpen => "(",
            Token::ParenClose => ")",
            Token::Semicolon => ";",
            Token::Arithmetic(Arithmetic::Multiply) => "*",
            Token::Arithmetic(Arithmetic::Divide) => "/",
            Token::Arithmetic(Arithmetic::Modulo) => "%",
            Token::Arithmetic(Arithmetic::Plus) => "+",
            Token::Arithmetic(Arithmetic::Minus) => "-",
            Token::Comparison(Comparison::Equal) => "=",
            Token::Comparison(Comparison::Equal2) => "==",
            Token::Comparison(Comparison::GreaterThanOrEqual) => ">=",
            Token::Comparison(Comparison::LessThanOrEqual) => "<=",
            Token::Comparison(Comparison::NotEqual) => "<>",
            Token::Comparison(Comparison::NotEqual2) => "!=",
            Token::Comparison(Comparison::GreaterThan) => ">",
            Token::Comparison(Comparison::LessThan) => "<",
            Token::Bitwise(Bitwise::LeftShift) => "<<",
            Token::Bitwise(Bitwise::RightShift) => ">>",
            Token::Bitwise(Bitwise::And) => "&",
            Token::Bitwise(Bitwise::Or) => "|",
            Token::Concat => "||",
            _ => return None,
        };

        Some(symbol)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LocatableToken {
    pub token: Token,
    pub position: usize,
}

impl LocatableToken {
    pub fn at_position(token: Token, position: usize) -> Self {
        LocatableToken { token, position }
    }
}
