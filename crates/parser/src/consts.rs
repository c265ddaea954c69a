use lexer::token::{Keyword, TokenKind};
use lexer::Matcher;

pub const EXPECT_STMT: &str = "CREATE or SELECT";

pub const IDENTIFIER: &[Matcher] = &[Matcher::Kind(TokenKind::Identifier)];

pub const LEFT_PAREN: &[Matcher] = &[Matcher::Kind(TokenKind::LeftParen)];

pub const RIGHT_PAREN: &[Matcher] = &[Matcher::Kind(TokenKind::RightParen)];

pub const SEMICOLON: &[Matcher] = &[Matcher::Kind(TokenKind::Semicolon)];

pub const LIST_SEPARATOR: &[Matcher] = &[
    Matcher::Kind(TokenKind::Comma),
    Matcher::Kind(TokenKind::RightParen),
];

pub const TABLE_OR_TEMPORARY: &[Matcher] = &[
    Matcher::Keyword(Keyword::Table),
    Matcher::Keyword(Keyword::Temp),
    Matcher::Keyword(Keyword::Temporary),
];

pub const COLUMN_OR_TABLE_CONSTRAINT: &[Matcher] = &[
    Matcher::Kind(TokenKind::Identifier),
    Matcher::Keyword(Keyword::Foreign),
];

/// Once a table constraint has been seen only further constraints may follow.
pub const TABLE_CONSTRAINT: &[Matcher] = &[Matcher::Keyword(Keyword::Foreign)];

pub const ON_TARGET: &[Matcher] = &[
    Matcher::Keyword(Keyword::Delete),
    Matcher::Keyword(Keyword::Update),
];

pub const FOREIGN_KEY_ACTION: &[Matcher] = &[
    Matcher::Keyword(Keyword::Set),
    Matcher::Keyword(Keyword::Cascade),
    Matcher::Keyword(Keyword::Restrict),
    Matcher::Keyword(Keyword::No),
];

pub const SET_ACTION: &[Matcher] = &[
    Matcher::Keyword(Keyword::Null),
    Matcher::Keyword(Keyword::Default),
];

pub const INITIALLY: &[Matcher] = &[
    Matcher::Keyword(Keyword::Deferred),
    Matcher::Keyword(Keyword::Immediate),
];

pub const EXPRESSION_START: &[Matcher] = &[
    Matcher::Kind(TokenKind::Identifier),
    Matcher::Kind(TokenKind::LeftParen),
    Matcher::Kind(TokenKind::String),
    Matcher::Kind(TokenKind::Integer),
];
