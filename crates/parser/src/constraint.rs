//! Column definitions and the constraints attached to columns and tables.

use cli_common::ParseError;
use lexer::token::{Keyword, Token, TokenKind};
use lexer::Matcher;

use crate::ast::{
    CollatingSequence, ColumnConstraint, ColumnDefinition, Constraint, ForeignKeyAction,
    ForeignKeyConstraint, Identifier, MatchKind, TableConstraint,
};
use crate::expr::LOWEST_PRECEDENCE;
use crate::{consts, Parser};

// Collation names are taken as written.
const COLLATING_SEQUENCES: &[(Matcher, CollatingSequence)] = &[
    (Matcher::Exact("BINARY"), CollatingSequence::Binary),
    (Matcher::Exact("NOCASE"), CollatingSequence::NoCase),
    (Matcher::Exact("RTRIM"), CollatingSequence::RTrim),
];

const MATCH_KINDS: &[(Matcher, MatchKind)] = &[
    (Matcher::Word("SIMPLE"), MatchKind::Simple),
    (Matcher::Word("FULL"), MatchKind::Full),
    (Matcher::Word("PARTIAL"), MatchKind::Partial),
];

/// One element of the parenthesised body of `CREATE TABLE`.
#[derive(Debug)]
pub(crate) enum TableElement {
    Column(ColumnDefinition),
    Constraint(TableConstraint),
}

/// The leading keyword of a foreign key qualifier.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Qualifier {
    On,
    Match,
    Deferrability,
}

/// Qualifiers seen so far in one foreign key clause.
#[derive(Default, Debug)]
struct ForeignKeyQualifiers {
    on_delete: Option<ForeignKeyAction>,
    on_update: Option<ForeignKeyAction>,
    match_kind: Option<MatchKind>,
    deferrable: Option<bool>,
    initially_deferred: Option<bool>,
}

/// Store `value` in `slot`. A repeated qualifier replaces the earlier one.
fn record<T: std::fmt::Debug>(slot: &mut Option<T>, value: T, qualifier: &str) {
    if let Some(previous) = slot.replace(value) {
        log::debug!("{qualifier} given more than once, replacing {previous:?}");
    }
}

impl<'a> Parser<'a> {
    /// Dispatch one table element. With `allow_columns` unset only table
    /// constraints are accepted, since columns must precede them.
    pub(crate) fn match_column_or_constraint(
        &mut self,
        allow_columns: bool,
    ) -> Result<TableElement, ParseError> {
        let expecting = match allow_columns {
            true => consts::COLUMN_OR_TABLE_CONSTRAINT,
            false => consts::TABLE_CONSTRAINT,
        };
        let token = *self.stream.check(expecting)?;

        match token.token {
            Token::Keyword(Keyword::Foreign) => {
                Ok(TableElement::Constraint(self.match_table_foreign_key()?))
            }
            Token::Identifier(_) => Ok(TableElement::Column(self.match_column_definition()?)),
            other => Err(ParseError::internal(
                format!("table element dispatch admitted {other:?}"),
                token.position,
            )),
        }
    }

    pub(crate) fn match_column_definition(&mut self) -> Result<ColumnDefinition, ParseError> {
        let name = self.match_identifier()?;
        let declared_type = self.match_identifier()?.value;

        let constraints = match self.match_column_constraint()? {
            Some(constraint) => vec![constraint],
            None => vec![],
        };

        Ok(ColumnDefinition {
            name,
            declared_type,
            constraints,
        })
    }

    /// At most one constraint follows a column's type.
    fn match_column_constraint(&mut self) -> Result<Option<ColumnConstraint>, ParseError> {
        let constraint = match self.stream.peek_token() {
            Some(Token::Keyword(Keyword::Primary)) => self.match_primary_key()?,
            Some(Token::Keyword(Keyword::Not)) => self.match_not_null()?,
            Some(Token::Keyword(Keyword::Check)) => self.match_check()?,
            Some(Token::Keyword(Keyword::Collate)) => self.match_collate()?,
            Some(Token::Keyword(Keyword::References)) => {
                Constraint::ForeignKey(self.match_foreign_key_clause(vec![])?)
            }
            _ => return Ok(None),
        };

        Ok(Some(constraint))
    }

    fn match_primary_key(&mut self) -> Result<ColumnConstraint, ParseError> {
        self.match_keyword(Keyword::Primary)?;
        self.match_keyword(Keyword::Key)?;

        Ok(Constraint::PrimaryKey)
    }

    fn match_not_null(&mut self) -> Result<ColumnConstraint, ParseError> {
        self.match_keyword(Keyword::Not)?;
        self.match_keyword(Keyword::Null)?;

        Ok(Constraint::NotNull)
    }

    fn match_check(&mut self) -> Result<ColumnConstraint, ParseError> {
        self.match_keyword(Keyword::Check)?;
        self.stream.advance_expecting(consts::LEFT_PAREN)?;
        let expr = self.match_expression(LOWEST_PRECEDENCE)?;
        self.stream.advance_expecting(consts::RIGHT_PAREN)?;

        Ok(Constraint::Check(expr))
    }

    fn match_collate(&mut self) -> Result<ColumnConstraint, ParseError> {
        self.match_keyword(Keyword::Collate)?;
        let sequence = self.match_word(COLLATING_SEQUENCES)?;

        Ok(Constraint::Collate(sequence))
    }

    /// `FOREIGN KEY ( column, ... ) REFERENCES ...`
    fn match_table_foreign_key(&mut self) -> Result<TableConstraint, ParseError> {
        self.match_keyword(Keyword::Foreign)?;
        self.match_keyword(Keyword::Key)?;
        let columns = self.match_identifier_list()?;

        Ok(Constraint::ForeignKey(self.match_foreign_key_clause(columns)?))
    }

    /// `REFERENCES table [ ( column, ... ) ]` followed by any number of `ON`
    /// and `MATCH` qualifiers in any order, optionally closed by a single
    /// deferrability qualifier.
    fn match_foreign_key_clause(
        &mut self,
        columns: Vec<Identifier>,
    ) -> Result<ForeignKeyConstraint, ParseError> {
        self.match_keyword(Keyword::References)?;
        let foreign_table = self.match_identifier()?;

        let foreign_columns = match self.stream.next_is(Matcher::Kind(TokenKind::LeftParen)) {
            true => self.match_identifier_list()?,
            false => vec![],
        };

        let mut qualifiers = ForeignKeyQualifiers::default();

        while let Some(qualifier) = self.next_qualifier()? {
            match qualifier {
                Qualifier::On => self.match_on_clause(&mut qualifiers)?,
                Qualifier::Match => {
                    self.match_keyword(Keyword::Match)?;
                    let kind = self.match_word(MATCH_KINDS)?;
                    record(&mut qualifiers.match_kind, kind, "MATCH");
                }
                Qualifier::Deferrability => {
                    self.match_deferrability(&mut qualifiers)?;
                    break;
                }
            }
        }

        Ok(ForeignKeyConstraint {
            columns,
            foreign_table,
            foreign_columns,
            on_delete: qualifiers.on_delete,
            on_update: qualifiers.on_update,
            match_kind: qualifiers.match_kind,
            deferrable: qualifiers.deferrable,
            initially_deferred: qualifiers.initially_deferred,
        })
    }

    /// Which qualifier starts at the cursor, if any. `NOT` only starts one
    /// when `DEFERRABLE` follows it.
    fn next_qualifier(&mut self) -> Result<Option<Qualifier>, ParseError> {
        match self.stream.peek_token() {
            Some(Token::Keyword(Keyword::On)) => Ok(Some(Qualifier::On)),
            Some(Token::Keyword(Keyword::Match)) => Ok(Some(Qualifier::Match)),
            Some(Token::Keyword(Keyword::Deferrable)) => Ok(Some(Qualifier::Deferrability)),
            Some(Token::Keyword(Keyword::Not)) => {
                let not = self.stream.advance()?;
                let deferrable = self.stream.next_is(Matcher::Keyword(Keyword::Deferrable));
                self.stream.push(not)?;

                Ok(deferrable.then_some(Qualifier::Deferrability))
            }
            _ => Ok(None),
        }
    }

    /// `ON DELETE|UPDATE action`
    fn match_on_clause(&mut self, qualifiers: &mut ForeignKeyQualifiers) -> Result<(), ParseError> {
        self.match_keyword(Keyword::On)?;
        let target = self.stream.advance_expecting(consts::ON_TARGET)?;
        let action = self.match_foreign_key_action()?;

        match target.token {
            Token::Keyword(Keyword::Delete) => record(&mut qualifiers.on_delete, action, "ON DELETE"),
            Token::Keyword(Keyword::Update) => record(&mut qualifiers.on_update, action, "ON UPDATE"),
            other => {
                return Err(ParseError::internal(
                    format!("ON clause target {other:?} is neither DELETE nor UPDATE"),
                    target.position,
                ))
            }
        }

        Ok(())
    }

    fn match_foreign_key_action(&mut self) -> Result<ForeignKeyAction, ParseError> {
        let token = self.stream.advance_expecting(consts::FOREIGN_KEY_ACTION)?;

        match token.token {
            Token::Keyword(Keyword::Set) => {
                let token = self.stream.advance_expecting(consts::SET_ACTION)?;
                match token.token {
                    Token::Keyword(Keyword::Null) => Ok(ForeignKeyAction::SetNull),
                    Token::Keyword(Keyword::Default) => Ok(ForeignKeyAction::SetDefault),
                    other => Err(ParseError::internal(
                        format!("SET action admitted {other:?}"),
                        token.position,
                    )),
                }
            }
            Token::Keyword(Keyword::Cascade) => Ok(ForeignKeyAction::Cascade),
            Token::Keyword(Keyword::Restrict) => Ok(ForeignKeyAction::Restrict),
            Token::Keyword(Keyword::No) => {
                self.match_keyword(Keyword::Action)?;
                Ok(ForeignKeyAction::NoAction)
            }
            other => Err(ParseError::internal(
                format!("foreign key action admitted {other:?}"),
                token.position,
            )),
        }
    }

    /// `[NOT] DEFERRABLE [INITIALLY DEFERRED|IMMEDIATE]`
    fn match_deferrability(&mut self, qualifiers: &mut ForeignKeyQualifiers) -> Result<(), ParseError> {
        let deferrable = match self.stream.next_is(Matcher::Keyword(Keyword::Not)) {
            true => {
                self.stream.advance()?;
                false
            }
            false => true,
        };
        self.match_keyword(Keyword::Deferrable)?;
        qualifiers.deferrable = Some(deferrable);

        if self.stream.next_is(Matcher::Keyword(Keyword::Initially)) {
            self.stream.advance()?;
            let token = self.stream.advance_expecting(consts::INITIALLY)?;
            qualifiers.initially_deferred =
                Some(token.token == Token::Keyword(Keyword::Deferred));
        }

        Ok(())
    }

    /// `( identifier, ... )` with at least one identifier.
    fn match_identifier_list(&mut self) -> Result<Vec<Identifier>, ParseError> {
        self.stream.advance_expecting(consts::LEFT_PAREN)?;

        let mut identifiers = vec![];
        loop {
            identifiers.push(self.match_identifier()?);

            let token = self.stream.advance_expecting(consts::LIST_SEPARATOR)?;
            if token.token == Token::ParenClose {
                break;
            }
        }

        Ok(identifiers)
    }

    /// An identifier accepted by one of the `choices` matchers.
    fn match_word<T: Copy>(&mut self, choices: &[(Matcher, T)]) -> Result<T, ParseError> {
        let expecting: Vec<Matcher> = choices.iter().map(|(matcher, _)| *matcher).collect();
        let token = self.stream.advance_expecting(&expecting)?;

        let source = self.stream.source();
        choices
            .iter()
            .find(|(matcher, _)| matcher.matches(&token.token, source))
            .map(|(_, value)| *value)
            .ok_or_else(|| {
                ParseError::internal(format!("word choice admitted {:?}", token.token), token.position)
            })
    }
}

#[cfg(test)]
mod tests {
    use cli_common::ParseErrorKind;
    use pretty_assertions::assert_eq;

    use crate::ast::*;
    use crate::parse;

    fn parse_table(sql: &str) -> CreateTableBody {
        let statements =
            parse(sql).unwrap_or_else(|e| panic!("Failed to parse: {sql}\nError: {e:?}"));

        match statements.as_slice() {
            [Statement::CreateTable(body)] => body.clone(),
            other => panic!("Expected a single CREATE TABLE, got {other:?}"),
        }
    }

    fn parse_constraints(sql: &str) -> Vec<TableConstraint> {
        parse_table(sql).constraints
    }

    fn foreign_key(constraint: &Constraint) -> &ForeignKeyConstraint {
        match constraint {
            Constraint::ForeignKey(fk) => fk,
            other => panic!("Expected a foreign key, got {other:?}"),
        }
    }

    #[test]
    fn test_column_constraints() {
        let body = parse_table(
            "CREATE TABLE people(
              id INTEGER PRIMARY KEY,
              name TEXT NOT NULL,
              nick TEXT CHECK(nick != ''),
              tag TEXT COLLATE NOCASE,
              age INTEGER
            );",
        );

        assert_eq!(
            body.columns,
            vec![
                ColumnDefinition::new("id", "INTEGER").with_constraint(Constraint::PrimaryKey),
                ColumnDefinition::new("name", "TEXT").with_constraint(Constraint::NotNull),
                ColumnDefinition::new("nick", "TEXT").with_constraint(Constraint::Check(
                    Expr::infix(
                        BinaryOperator::NotEqual2,
                        Expr::identifier("nick"),
                        Expr::String(String::new()),
                    )
                )),
                ColumnDefinition::new("tag", "TEXT")
                    .with_constraint(Constraint::Collate(CollatingSequence::NoCase)),
                ColumnDefinition::new("age", "INTEGER"),
            ]
        );
        assert!(body.constraints.is_empty());
    }

    #[test]
    fn test_unknown_collating_sequence() {
        let err = parse("CREATE TABLE t (name TEXT COLLATE german)").unwrap_err();

        assert_eq!(
            err.kind,
            ParseErrorKind::UnexpectedToken {
                found: String::from("identifier \"german\""),
                expected: String::from("BINARY, NOCASE or RTRIM"),
            }
        );
    }

    #[test]
    fn test_collating_sequence_case_is_exact() {
        let err = parse("CREATE TABLE t (name TEXT COLLATE nocase)").unwrap_err();

        assert_eq!(
            err.kind,
            ParseErrorKind::UnexpectedToken {
                found: String::from("identifier \"nocase\""),
                expected: String::from("BINARY, NOCASE or RTRIM"),
            }
        );
        assert_eq!(err.position, 34);
    }

    #[test]
    fn test_inline_foreign_key() {
        let body = parse_table(
            "CREATE TABLE people(
              job_id INTEGER REFERENCES jobs(id) ON DELETE CASCADE
            );",
        );

        let mut expected = ForeignKeyConstraint::references("jobs");
        expected.foreign_columns = vec![Identifier::from("id")];
        expected.on_delete = Some(ForeignKeyAction::Cascade);

        assert_eq!(
            body.columns,
            vec![ColumnDefinition::new("job_id", "INTEGER")
                .with_constraint(Constraint::ForeignKey(expected))]
        );
        assert!(body.constraints.is_empty());
    }

    #[test]
    fn test_table_foreign_keys() {
        let constraints = parse_constraints(
            "CREATE TABLE people(
                team_id INTEGER,
                job_id INTEGER,
                FOREIGN KEY (team_id) REFERENCES teams,
                FOREIGN KEY (job_id) REFERENCES jobs(id)
                  ON DELETE SET NULL
                  MATCH FULL
                  ON UPDATE CASCADE
                  DEFERRABLE INITIALLY DEFERRED
            );",
        );

        let mut teams = ForeignKeyConstraint::references("teams");
        teams.columns = vec![Identifier::from("team_id")];

        let jobs = ForeignKeyConstraint {
            columns: vec![Identifier::from("job_id")],
            foreign_table: Identifier::from("jobs"),
            foreign_columns: vec![Identifier::from("id")],
            on_delete: Some(ForeignKeyAction::SetNull),
            on_update: Some(ForeignKeyAction::Cascade),
            match_kind: Some(MatchKind::Full),
            deferrable: Some(true),
            initially_deferred: Some(true),
        };

        assert_eq!(
            constraints,
            vec![Constraint::ForeignKey(teams), Constraint::ForeignKey(jobs)]
        );
    }

    #[test]
    fn test_multi_column_foreign_key() {
        let constraints = parse_constraints(
            "CREATE TABLE t (a INTEGER, b INTEGER, FOREIGN KEY (a, b) REFERENCES u (x, y))",
        );

        let fk = foreign_key(&constraints[0]);
        assert_eq!(fk.columns, vec![Identifier::from("a"), Identifier::from("b")]);
        assert_eq!(fk.foreign_columns, vec![Identifier::from("x"), Identifier::from("y")]);
    }

    #[test]
    fn test_every_action() {
        let constraints = parse_constraints(
            "CREATE TABLE t (
                a INTEGER,
                FOREIGN KEY (a) REFERENCES u ON DELETE SET NULL ON UPDATE SET DEFAULT,
                FOREIGN KEY (a) REFERENCES u ON DELETE CASCADE ON UPDATE RESTRICT,
                FOREIGN KEY (a) REFERENCES u ON DELETE NO ACTION
            )",
        );

        let actions: Vec<(Option<ForeignKeyAction>, Option<ForeignKeyAction>)> = constraints
            .iter()
            .map(|c| {
                let fk = foreign_key(c);
                (fk.on_delete, fk.on_update)
            })
            .collect();

        assert_eq!(
            actions,
            vec![
                (Some(ForeignKeyAction::SetNull), Some(ForeignKeyAction::SetDefault)),
                (Some(ForeignKeyAction::Cascade), Some(ForeignKeyAction::Restrict)),
                (Some(ForeignKeyAction::NoAction), None),
            ]
        );
    }

    #[test]
    fn test_qualifier_order_does_not_matter() {
        let first = parse_constraints(
            "CREATE TABLE t (a INTEGER, FOREIGN KEY (a) REFERENCES u MATCH FULL ON DELETE CASCADE)",
        );
        let second = parse_constraints(
            "CREATE TABLE t (a INTEGER, FOREIGN KEY (a) REFERENCES u ON DELETE CASCADE MATCH FULL)",
        );

        assert_eq!(first, second);
        assert_eq!(foreign_key(&first[0]).match_kind, Some(MatchKind::Full));
        assert_eq!(foreign_key(&first[0]).on_delete, Some(ForeignKeyAction::Cascade));
    }

    #[test]
    fn test_repeated_qualifier_keeps_last() {
        let constraints = parse_constraints(
            "CREATE TABLE people(
                job_id INTEGER,
                FOREIGN KEY (job_id) REFERENCES jobs
                  ON DELETE SET NULL
                  ON DELETE NO ACTION
            );",
        );

        assert_eq!(
            foreign_key(&constraints[0]).on_delete,
            Some(ForeignKeyAction::NoAction)
        );
    }

    #[test]
    fn test_deferrable_constraints() {
        let constraints = parse_constraints(
            "CREATE TABLE people(
                id1 INTEGER,
                id2 INTEGER,
                id3 INTEGER,
                FOREIGN KEY (id1) REFERENCES table1 NOT DEFERRABLE,
                FOREIGN KEY (id2) REFERENCES table2 DEFERRABLE,
                FOREIGN KEY (id3) REFERENCES table3 DEFERRABLE INITIALLY IMMEDIATE
            );",
        );

        let timing: Vec<(Option<bool>, Option<bool>)> = constraints
            .iter()
            .map(|c| {
                let fk = foreign_key(c);
                (fk.deferrable, fk.initially_deferred)
            })
            .collect();

        assert_eq!(
            timing,
            vec![(Some(false), None), (Some(true), None), (Some(true), Some(false))]
        );
    }

    #[test]
    fn test_deferrability_ends_qualifiers() {
        let err = parse(
            "CREATE TABLE t (a INTEGER, FOREIGN KEY (a) REFERENCES u DEFERRABLE ON DELETE CASCADE)",
        )
        .unwrap_err();

        assert_eq!(
            err.kind,
            ParseErrorKind::UnexpectedToken {
                found: String::from("keyword ON"),
                expected: String::from("',' or ')'"),
            }
        );
    }

    #[test]
    fn test_not_without_deferrable_is_left_for_caller() {
        let err = parse("CREATE TABLE t (a INTEGER REFERENCES u NOT NULL)").unwrap_err();

        assert!(err.is_syntax_error());
        assert_eq!(
            err.kind,
            ParseErrorKind::UnexpectedToken {
                found: String::from("keyword NOT"),
                expected: String::from("',' or ')'"),
            }
        );
        assert_eq!(err.position, 39);
    }

    #[test]
    fn test_match_kinds() {
        let constraints = parse_constraints(
            "CREATE TABLE t (
                a INTEGER,
                FOREIGN KEY (a) REFERENCES u MATCH simple,
                FOREIGN KEY (a) REFERENCES u MATCH PARTIAL
            )",
        );

        assert_eq!(foreign_key(&constraints[0]).match_kind, Some(MatchKind::Simple));
        assert_eq!(foreign_key(&constraints[1]).match_kind, Some(MatchKind::Partial));
    }

    #[test]
    fn test_column_after_table_constraint_is_rejected() {
        let err = parse(
            "CREATE TABLE t (a INTEGER, FOREIGN KEY (a) REFERENCES u, b INTEGER)",
        )
        .unwrap_err();

        assert!(err.is_syntax_error());
        assert_eq!(
            err.kind,
            ParseErrorKind::UnexpectedToken {
                found: String::from("identifier \"b\""),
                expected: String::from("FOREIGN"),
            }
        );
        assert_eq!(err.position, 57);
    }

    #[test]
    fn test_empty_foreign_key_column_list_is_rejected() {
        let err = parse("CREATE TABLE t (a INTEGER, FOREIGN KEY () REFERENCES u)").unwrap_err();

        assert!(err.is_syntax_error());
    }

    #[test]
    fn test_bad_action() {
        let err = parse("CREATE TABLE t (a INTEGER REFERENCES u ON DELETE NOTHING)").unwrap_err();

        assert_eq!(
            err.kind,
            ParseErrorKind::UnexpectedToken {
                found: String::from("identifier \"NOTHING\""),
                expected: String::from("SET, CASCADE, RESTRICT or NO"),
            }
        );
    }
}
