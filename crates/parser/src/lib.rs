//! Recursive descent parser for a SQLite subset: `CREATE TABLE` with column
//! and foreign key constraints, and single-expression `SELECT`.
//!
//! ```
//! let statements = parser::parse("CREATE TABLE t (id INTEGER PRIMARY KEY); SELECT 1 + 2").unwrap();
//! assert_eq!(statements.len(), 2);
//! ```

use cli_common::{ParseError, ParseErrorKind};
use lexer::token::{Keyword, LocatableToken, Token, TokenKind};
use lexer::{Lexer, Matcher, TokenStream};

use ast::{CreateTableBody, Identifier, SelectBody, Statement, TableName};
use constraint::TableElement;
use expr::LOWEST_PRECEDENCE;
use recursion::{RecursionGuard, DEFAULT_RECURSION_LIMIT};

pub mod ast;
mod constraint;
mod consts;
pub mod expr;
mod recursion;

/// Lex and parse `source` into its statements. Stops at the first error.
pub fn parse(source: &str) -> Result<Vec<Statement>, ParseError> {
    let lex_result = Lexer::new(source).lex();
    Parser::new(lex_result.tokens, source).parse()
}

pub struct Parser<'a> {
    stream: TokenStream<'a>,
    recursion: RecursionGuard,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: Vec<LocatableToken>, source: &'a str) -> Parser<'a> {
        Parser {
            stream: TokenStream::new(tokens, source),
            recursion: RecursionGuard::new(DEFAULT_RECURSION_LIMIT),
        }
    }

    /// Bound how deeply expressions may nest before parsing fails.
    pub fn with_recursion_limit(mut self, limit: usize) -> Self {
        self.recursion = RecursionGuard::new(limit);
        self
    }

    /// Parse every `;` separated statement. A trailing `;` is optional and
    /// empty input yields no statements.
    pub fn parse(&mut self) -> Result<Vec<Statement>, ParseError> {
        let mut statements = vec![];

        loop {
            if self.stream.done() {
                break;
            }

            let statement = self.match_statement()?;
            log::debug!("Parsed statement: {statement}");
            statements.push(statement);

            if !self.stream.done() {
                self.stream.advance_expecting(consts::SEMICOLON)?;
            }
        }

        Ok(statements)
    }

    fn match_statement(&mut self) -> Result<Statement, ParseError> {
        let token = *self.stream.current()?;

        match token.token {
            Token::Keyword(Keyword::Create) => Ok(Statement::CreateTable(self.match_create_table()?)),
            Token::Keyword(Keyword::Select) => Ok(Statement::Select(self.match_select()?)),
            other => Err(ParseError::new(
                ParseErrorKind::UnexpectedStatement(format!(
                    "{}, expected {}",
                    self.stream.describe(&other),
                    consts::EXPECT_STMT
                )),
                token.position,
            )),
        }
    }

    fn match_create_table(&mut self) -> Result<CreateTableBody, ParseError> {
        self.match_keyword(Keyword::Create)?;

        let token = self.stream.advance_expecting(consts::TABLE_OR_TEMPORARY)?;
        let temporary = match token.token {
            Token::Keyword(Keyword::Temp | Keyword::Temporary) => {
                self.match_keyword(Keyword::Table)?;
                true
            }
            _ => false,
        };

        let if_not_exists = self.stream.next_is(Matcher::Keyword(Keyword::If));
        if if_not_exists {
            self.match_keyword(Keyword::If)?;
            self.match_keyword(Keyword::Not)?;
            self.match_keyword(Keyword::Exists)?;
        }

        let name = self.match_table_name()?;
        log::trace!("CREATE TABLE {name}");

        self.stream.advance_expecting(consts::LEFT_PAREN)?;

        let mut columns = vec![];
        let mut constraints = vec![];
        loop {
            match self.match_column_or_constraint(constraints.is_empty())? {
                TableElement::Column(column) => columns.push(column),
                TableElement::Constraint(constraint) => constraints.push(constraint),
            }

            let token = self.stream.advance_expecting(consts::LIST_SEPARATOR)?;
            if token.token == Token::ParenClose {
                break;
            }
        }

        let without_rowid = self.stream.next_is(Matcher::Keyword(Keyword::Without));
        if without_rowid {
            self.match_keyword(Keyword::Without)?;
            self.stream.advance_expecting(&[Matcher::Word("ROWID")])?;
        }

        Ok(CreateTableBody {
            name,
            columns,
            constraints,
            temporary,
            without_rowid,
            if_not_exists,
        })
    }

    /// `table` or `schema.table`
    fn match_table_name(&mut self) -> Result<TableName, ParseError> {
        let first = self.match_identifier()?;

        if !self.stream.next_is(Matcher::Kind(TokenKind::Dot)) {
            return Ok(TableName::Plain(first));
        }

        self.stream.advance()?;
        let table = self.match_identifier()?;

        Ok(TableName::Qualified {
            schema: first,
            table,
        })
    }

    // Only a single result column. No FROM, WHERE or aliases.
    fn match_select(&mut self) -> Result<SelectBody, ParseError> {
        self.match_keyword(Keyword::Select)?;
        let expr = self.match_expression(LOWEST_PRECEDENCE)?;

        Ok(SelectBody {
            columns: vec![expr],
        })
    }

    fn match_keyword(&mut self, keyword: Keyword) -> Result<LocatableToken, ParseError> {
        self.stream.advance_expecting(&[Matcher::Keyword(keyword)])
    }

    fn match_identifier(&mut self) -> Result<Identifier, ParseError> {
        let token = self.stream.advance_expecting(consts::IDENTIFIER)?;

        match token.token {
            Token::Identifier(ident) => Ok(Identifier::from(self.stream.identifier(ident))),
            other => Err(ParseError::internal(
                format!("identifier matcher admitted {other:?}"),
                token.position,
            )),
        }
    }
}
