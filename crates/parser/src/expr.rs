//! Precedence-climbing expression parser.

use cli_common::{ParseError, ParseErrorKind};
use lexer::token::{Arithmetic, Bitwise, Comparison, Keyword, Token, Value};

use crate::ast::{BinaryOperator, Expr, Identifier};
use crate::{consts, Parser};

/// Floor below every operator, so a top-level call matches a whole expression.
pub const LOWEST_PRECEDENCE: i8 = -1;

/// The binary operator a token spells, if any.
pub const fn binary_operator(token: &Token) -> Option<BinaryOperator> {
    let op = match token {
        Token::Keyword(Keyword::Or) => BinaryOperator::Or,
        Token::Keyword(Keyword::And) => BinaryOperator::And,
        Token::Keyword(Keyword::Is) => BinaryOperator::Is,
        Token::Keyword(Keyword::In) => BinaryOperator::In,
        Token::Keyword(Keyword::Like) => BinaryOperator::Like,
        Token::Keyword(Keyword::Glob) => BinaryOperator::Glob,
        Token::Keyword(Keyword::Match) => BinaryOperator::Match,
        Token::Keyword(Keyword::Regexp) => BinaryOperator::Regexp,
        Token::Comparison(Comparison::Equal) => BinaryOperator::Equal,
        Token::Comparison(Comparison::Equal2) => BinaryOperator::Equal2,
        Token::Comparison(Comparison::NotEqual) => BinaryOperator::NotEqual,
        Token::Comparison(Comparison::NotEqual2) => BinaryOperator::NotEqual2,
        Token::Comparison(Comparison::LessThan) => BinaryOperator::LessThan,
        Token::Comparison(Comparison::LessThanOrEqual) => BinaryOperator::LessThanOrEqual,
        Token::Comparison(Comparison::GreaterThan) => BinaryOperator::GreaterThan,
        Token::Comparison(Comparison::GreaterThanOrEqual) => BinaryOperator::GreaterThanOrEqual,
        Token::Bitwise(Bitwise::LeftShift) => BinaryOperator::LeftShift,
        Token::Bitwise(Bitwise::RightShift) => BinaryOperator::RightShift,
        Token::Bitwise(Bitwise::And) => BinaryOperator::BitwiseAnd,
        Token::Bitwise(Bitwise::Or) => BinaryOperator::BitwiseOr,
        Token::Arithmetic(Arithmetic::Plus) => BinaryOperator::Plus,
        Token::Arithmetic(Arithmetic::Minus) => BinaryOperator::Minus,
        Token::Arithmetic(Arithmetic::Multiply) => BinaryOperator::Multiply,
        Token::Arithmetic(Arithmetic::Divide) => BinaryOperator::Divide,
        Token::Arithmetic(Arithmetic::Modulo) => BinaryOperator::Modulo,
        Token::Concat => BinaryOperator::Concat,
        _ => return None,
    };

    Some(op)
}

/// Binding strength of a binary operator, higher binds tighter. Operators
/// sharing a tier are left-associative.
///
/// From https://sqlite.org/lang_expr.html
pub const fn precedence(op: BinaryOperator) -> i8 {
    match op {
        BinaryOperator::Or => 0,
        BinaryOperator::And => 1,
        BinaryOperator::Equal
        | BinaryOperator::Equal2
        | BinaryOperator::NotEqual
        | BinaryOperator::NotEqual2
        | BinaryOperator::Is
        | BinaryOperator::In
        | BinaryOperator::Like
        | BinaryOperator::Glob
        | BinaryOperator::Match
        | BinaryOperator::Regexp => 2,
        BinaryOperator::LessThan
        | BinaryOperator::LessThanOrEqual
        | BinaryOperator::GreaterThan
        | BinaryOperator::GreaterThanOrEqual => 3,
        BinaryOperator::LeftShift
        | BinaryOperator::RightShift
        | BinaryOperator::BitwiseAnd
        | BinaryOperator::BitwiseOr => 4,
        BinaryOperator::Plus | BinaryOperator::Minus => 5,
        BinaryOperator::Multiply | BinaryOperator::Divide | BinaryOperator::Modulo => 6,
        BinaryOperator::Concat => 7,
    }
}

impl<'a> Parser<'a> {
    /// Match an expression whose operators all bind tighter than
    /// `min_precedence`. Stops, without consuming, at the first token that is
    /// not such an operator.
    pub(crate) fn match_expression(&mut self, min_precedence: i8) -> Result<Expr, ParseError> {
        let mut left = self.match_prefix()?;
        // Every operator folded into `left` deepens the tree by one level,
        // including those chained on the left at this tier.
        let mut depth = vec![];

        loop {
            let Some(token) = self.stream.peek().copied() else {
                break;
            };

            let Some(op) = binary_operator(&token.token) else {
                break;
            };

            if precedence(op) <= min_precedence {
                break;
            }

            depth.push(self.recursion.dec(token.position)?);
            self.stream.advance()?;
            left = self.match_infix(left, op)?;
        }

        Ok(left)
    }

    // The operator's own precedence is the new floor, so an operator of the
    // same tier ends the right operand and chains on the left instead.
    fn match_infix(&mut self, left: Expr, op: BinaryOperator) -> Result<Expr, ParseError> {
        let right = self.match_expression(precedence(op))?;

        Ok(Expr::infix(op, left, right))
    }

    fn match_prefix(&mut self) -> Result<Expr, ParseError> {
        let token = self.stream.advance_expecting(consts::EXPRESSION_START)?;

        match token.token {
            Token::Identifier(ident) => Ok(Expr::Identifier(Identifier::from(
                self.stream.identifier(ident),
            ))),
            Token::ParenOpen => {
                let _depth = self.recursion.dec(token.position)?;
                let expr = self.match_expression(LOWEST_PRECEDENCE)?;
                self.stream.advance_expecting(consts::RIGHT_PAREN)?;

                Ok(expr)
            }
            Token::Value(Value::SingleQuoted(slice)) => {
                Ok(Expr::String(self.stream.text(slice).replace("''", "'")))
            }
            Token::Numeric(slice) => {
                let text = self.stream.text(slice);
                text.parse::<i64>().map(Expr::Integer).map_err(|_| {
                    ParseError::new(
                        ParseErrorKind::InvalidInteger(String::from(text)),
                        token.position,
                    )
                })
            }
            other => Err(ParseError::internal(
                format!("expression prefix admitted {other:?}"),
                token.position,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::ast::{BinaryOperator, Expr, SelectBody, Statement};
    use crate::expr::*;
    use crate::parse;

    fn parse_expr(sql: &str) -> Expr {
        let statements = parse(&format!("SELECT {sql}"))
            .unwrap_or_else(|e| panic!("Failed to parse: {sql}\nError: {e:?}"));

        match statements.as_slice() {
            [Statement::Select(SelectBody { columns })] if columns.len() == 1 => columns[0].clone(),
            other => panic!("Expected a single SELECT, got {other:?}"),
        }
    }

    fn int(value: i64) -> Expr {
        Expr::Integer(value)
    }

    #[test]
    fn test_precedence_ordering() {
        assert!(precedence(BinaryOperator::Multiply) > precedence(BinaryOperator::Plus));
        assert!(precedence(BinaryOperator::And) > precedence(BinaryOperator::Or));
        assert!(precedence(BinaryOperator::Equal) > precedence(BinaryOperator::And));
        assert!(precedence(BinaryOperator::LessThan) > precedence(BinaryOperator::Equal));
        assert!(precedence(BinaryOperator::Concat) > precedence(BinaryOperator::Multiply));
        assert!(precedence(BinaryOperator::Or) > LOWEST_PRECEDENCE);
    }

    #[test]
    fn test_binary_operator() {
        use lexer::token::{Arithmetic, Keyword, Token};

        assert_eq!(
            binary_operator(&Token::Arithmetic(Arithmetic::Plus)),
            Some(BinaryOperator::Plus)
        );
        assert_eq!(
            binary_operator(&Token::Keyword(Keyword::Regexp)),
            Some(BinaryOperator::Regexp)
        );
        assert_eq!(binary_operator(&Token::ParenOpen), None);
        assert_eq!(binary_operator(&Token::Keyword(Keyword::Not)), None);
    }

    #[test]
    fn test_multiplication_binds_tighter() {
        assert_eq!(
            parse_expr("1 + 2 * 3"),
            Expr::infix(
                BinaryOperator::Plus,
                int(1),
                Expr::infix(BinaryOperator::Multiply, int(2), int(3)),
            )
        );
    }

    #[test]
    fn test_left_associativity() {
        assert_eq!(
            parse_expr("1 - 2 - 3"),
            Expr::infix(
                BinaryOperator::Minus,
                Expr::infix(BinaryOperator::Minus, int(1), int(2)),
                int(3),
            )
        );
    }

    #[test]
    fn test_parentheses_override_precedence() {
        assert_eq!(
            parse_expr("(1 + 2) * 3"),
            Expr::infix(
                BinaryOperator::Multiply,
                Expr::infix(BinaryOperator::Plus, int(1), int(2)),
                int(3),
            )
        );
    }

    #[test]
    fn test_mixed_tiers() {
        // a = 1 OR b < 2 AND c || 'x' LIKE 'y'
        assert_eq!(
            parse_expr("a = 1 OR b < 2 AND c || 'x' LIKE 'y'"),
            Expr::infix(
                BinaryOperator::Or,
                Expr::infix(BinaryOperator::Equal, Expr::identifier("a"), int(1)),
                Expr::infix(
                    BinaryOperator::And,
                    Expr::infix(BinaryOperator::LessThan, Expr::identifier("b"), int(2)),
                    Expr::infix(
                        BinaryOperator::Like,
                        Expr::infix(
                            BinaryOperator::Concat,
                            Expr::identifier("c"),
                            Expr::String(String::from("x")),
                        ),
                        Expr::String(String::from("y")),
                    ),
                ),
            )
        );
    }

    #[test]
    fn test_bitwise_tier_sits_between_comparison_and_addition() {
        assert_eq!(
            parse_expr("1 + 2 << 3 < 4"),
            Expr::infix(
                BinaryOperator::LessThan,
                Expr::infix(
                    BinaryOperator::LeftShift,
                    Expr::infix(BinaryOperator::Plus, int(1), int(2)),
                    int(3),
                ),
                int(4),
            )
        );
    }

    #[test]
    fn test_bitwise_operators_chain_left() {
        assert_eq!(
            parse_expr("a & b | c >> 1"),
            Expr::infix(
                BinaryOperator::RightShift,
                Expr::infix(
                    BinaryOperator::BitwiseOr,
                    Expr::infix(
                        BinaryOperator::BitwiseAnd,
                        Expr::identifier("a"),
                        Expr::identifier("b"),
                    ),
                    Expr::identifier("c"),
                ),
                int(1),
            )
        );
    }

    #[test]
    fn test_keyword_operators_share_equality_tier() {
        assert_eq!(
            parse_expr("x GLOB 'a*' IS y REGEXP 'z' IN w"),
            Expr::infix(
                BinaryOperator::In,
                Expr::infix(
                    BinaryOperator::Regexp,
                    Expr::infix(
                        BinaryOperator::Is,
                        Expr::infix(
                            BinaryOperator::Glob,
                            Expr::identifier("x"),
                            Expr::String(String::from("a*")),
                        ),
                        Expr::identifier("y"),
                    ),
                    Expr::String(String::from("z")),
                ),
                Expr::identifier("w"),
            )
        );
    }

    #[test]
    fn test_comparison_binds_tighter_than_is() {
        assert_eq!(
            parse_expr("a IS b < c"),
            Expr::infix(
                BinaryOperator::Is,
                Expr::identifier("a"),
                Expr::infix(
                    BinaryOperator::LessThan,
                    Expr::identifier("b"),
                    Expr::identifier("c"),
                ),
            )
        );
    }

    #[test]
    fn test_division_and_modulo_chain_left() {
        assert_eq!(
            parse_expr("8 / 4 % 3 * 2"),
            Expr::infix(
                BinaryOperator::Multiply,
                Expr::infix(
                    BinaryOperator::Modulo,
                    Expr::infix(BinaryOperator::Divide, int(8), int(4)),
                    int(3),
                ),
                int(2),
            )
        );
    }

    #[test]
    fn test_string_literal_is_unquoted() {
        assert_eq!(parse_expr("'it''s'"), Expr::String(String::from("it's")));
        assert_eq!(parse_expr("''"), Expr::String(String::new()));
    }

    #[test]
    fn test_nested_parentheses() {
        assert_eq!(parse_expr("((((x))))"), Expr::identifier("x"));
    }

    #[test]
    fn test_integer_out_of_range() {
        let err = parse("SELECT 99999999999999999999").unwrap_err();

        assert_eq!(
            err.kind,
            cli_common::ParseErrorKind::InvalidInteger(String::from("99999999999999999999"))
        );
        assert_eq!(err.position, 7);
    }

    #[test]
    fn test_bad_prefix_names_token() {
        let err = parse("SELECT 1 + ;").unwrap_err();

        assert!(err.is_syntax_error());
        assert_eq!(
            err.kind,
            cli_common::ParseErrorKind::UnexpectedToken {
                found: String::from("';'"),
                expected: String::from(
                    "identifier, '(', string literal or integer literal"
                ),
            }
        );
    }

    #[test]
    fn test_unclosed_paren() {
        let err = parse("SELECT (1 + 2").unwrap_err();

        assert!(err.is_syntax_error());
        assert_eq!(err.position, 13);
    }

    #[test]
    fn test_recursion_limit() {
        use crate::Parser;
        use lexer::Lexer;

        let sql = format!("SELECT {}1{}", "(".repeat(10), ")".repeat(10));
        let tokens = Lexer::new(&sql).lex().tokens;
        let err = Parser::new(tokens, &sql)
            .with_recursion_limit(5)
            .parse()
            .unwrap_err();

        assert_eq!(err.kind, cli_common::ParseErrorKind::MaximumRecursionDepthReached);
    }

    #[test]
    fn test_operator_chain_counts_against_recursion_limit() {
        use crate::Parser;
        use lexer::Lexer;

        let parse_limited = |sql: &str| {
            let tokens = Lexer::new(sql).lex().tokens;
            Parser::new(tokens, sql).with_recursion_limit(3).parse()
        };

        assert!(parse_limited("SELECT 1+1+1+1").is_ok());

        let err = parse_limited("SELECT 1+1+1+1+1").unwrap_err();
        assert_eq!(err.kind, cli_common::ParseErrorKind::MaximumRecursionDepthReached);
        assert_eq!(err.position, 14);
    }

    #[test]
    fn test_long_operator_chain_is_rejected() {
        let sql = format!("SELECT 1{}", "+1".repeat(200_000));

        let err = parse(&sql).unwrap_err();

        assert_eq!(err.kind, cli_common::ParseErrorKind::MaximumRecursionDepthReached);
    }
}
