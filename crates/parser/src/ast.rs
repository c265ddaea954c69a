use std::fmt;

use lexer::token::Keyword;

#[derive(PartialEq, Debug, Clone)]
pub enum Statement {
    CreateTable(CreateTableBody),
    Select(SelectBody),
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::CreateTable(body) => write!(f, "{body}"),
            Statement::Select(body) => write!(f, "{body}"),
        }
    }
}

#[derive(PartialEq, Debug, Clone)]
pub struct CreateTableBody {
    pub name: TableName,
    pub columns: Vec<ColumnDefinition>,
    pub constraints: Vec<TableConstraint>,
    pub temporary: bool,
    pub without_rowid: bool,
    pub if_not_exists: bool,
}

impl CreateTableBody {
    /// A plain `CREATE TABLE name (...)` with every flag off.
    pub fn new(name: TableName, columns: Vec<ColumnDefinition>) -> Self {
        CreateTableBody {
            name,
            columns,
            constraints: vec![],
            temporary: false,
            without_rowid: false,
            if_not_exists: false,
        }
    }
}

impl fmt::Display for CreateTableBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CREATE ")?;
        if self.temporary {
            f.write_str("TEMPORARY ")?;
        }
        f.write_str("TABLE ")?;
        if self.if_not_exists {
            f.write_str("IF NOT EXISTS ")?;
        }
        write!(f, "{} (", self.name)?;

        let elements = self
            .columns
            .iter()
            .map(|c| c.to_string())
            .chain(self.constraints.iter().map(|c| c.to_string()))
            .collect::<Vec<String>>()
            .join(", ");
        write!(f, "{elements})")?;

        if self.without_rowid {
            f.write_str(" WITHOUT ROWID")?;
        }

        Ok(())
    }
}

#[derive(PartialEq, Debug, Clone)]
pub struct SelectBody {
    pub columns: Vec<Expr>,
}

impl fmt::Display for SelectBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let columns = self
            .columns
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<String>>()
            .join(", ");

        write!(f, "SELECT {columns}")
    }
}

#[derive(PartialEq, Debug, Clone)]
pub enum TableName {
    Plain(Identifier),
    Qualified { schema: Identifier, table: Identifier },
}

impl TableName {
    pub fn plain(name: &str) -> Self {
        TableName::Plain(Identifier::from(name))
    }

    pub fn qualified(schema: &str, table: &str) -> Self {
        TableName::Qualified {
            schema: Identifier::from(schema),
            table: Identifier::from(table),
        }
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableName::Plain(name) => write!(f, "{name}"),
            TableName::Qualified { schema, table } => write!(f, "{schema}.{table}"),
        }
    }
}

#[derive(PartialEq, Debug, Clone)]
pub struct ColumnDefinition {
    pub name: Identifier,
    /// Taken verbatim from the source, no type grammar applied.
    pub declared_type: String,
    pub constraints: Vec<ColumnConstraint>,
}

impl ColumnDefinition {
    pub fn new(name: &str, declared_type: &str) -> Self {
        ColumnDefinition {
            name: Identifier::from(name),
            declared_type: String::from(declared_type),
            constraints: vec![],
        }
    }

    pub fn with_constraint(mut self, constraint: ColumnConstraint) -> Self {
        self.constraints.push(constraint);
        self
    }
}

impl fmt::Display for ColumnDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ", self.name)?;
        write_name(f, &self.declared_type)?;

        for constraint in &self.constraints {
            write!(f, " {constraint}")?;
        }

        Ok(())
    }
}

/// Constraint variants shared by column and table definitions. Which variants
/// are legal where is decided by the parser, not encoded here.
#[derive(PartialEq, Debug, Clone)]
pub enum Constraint {
    PrimaryKey,
    NotNull,
    Check(Expr),
    Collate(CollatingSequence),
    ForeignKey(ForeignKeyConstraint),
}

pub type ColumnConstraint = Constraint;
pub type TableConstraint = Constraint;

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::PrimaryKey => f.write_str("PRIMARY KEY"),
            Constraint::NotNull => f.write_str("NOT NULL"),
            Constraint::Check(expr) => write!(f, "CHECK ({expr})"),
            Constraint::Collate(sequence) => write!(f, "COLLATE {sequence}"),
            Constraint::ForeignKey(fk) => write!(f, "{fk}"),
        }
    }
}

#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum CollatingSequence {
    Binary,
    NoCase,
    RTrim,
}

impl fmt::Display for CollatingSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollatingSequence::Binary => f.write_str("BINARY"),
            CollatingSequence::NoCase => f.write_str("NOCASE"),
            CollatingSequence::RTrim => f.write_str("RTRIM"),
        }
    }
}

#[derive(PartialEq, Debug, Clone)]
pub struct ForeignKeyConstraint {
    /// Empty when declared inline on a column.
    pub columns: Vec<Identifier>,
    pub foreign_table: Identifier,
    pub foreign_columns: Vec<Identifier>,
    pub on_delete: Option<ForeignKeyAction>,
    pub on_update: Option<ForeignKeyAction>,
    pub match_kind: Option<MatchKind>,
    pub deferrable: Option<bool>,
    pub initially_deferred: Option<bool>,
}

impl ForeignKeyConstraint {
    /// A bare reference to `foreign_table` with no qualifiers.
    pub fn references(foreign_table: &str) -> Self {
        ForeignKeyConstraint {
            columns: vec![],
            foreign_table: Identifier::from(foreign_table),
            foreign_columns: vec![],
            on_delete: None,
            on_update: None,
            match_kind: None,
            deferrable: None,
            initially_deferred: None,
        }
    }
}

fn join_identifiers(identifiers: &[Identifier]) -> String {
    identifiers
        .iter()
        .map(|i| i.value.as_str())
        .collect::<Vec<&str>>()
        .join(", ")
}

impl fmt::Display for ForeignKeyConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.columns.is_empty() {
            write!(f, "FOREIGN KEY ({}) ", join_identifiers(&self.columns))?;
        }

        write!(f, "REFERENCES {}", self.foreign_table)?;
        if !self.foreign_columns.is_empty() {
            write!(f, " ({})", join_identifiers(&self.foreign_columns))?;
        }

        if let Some(action) = self.on_delete {
            write!(f, " ON DELETE {action}")?;
        }
        if let Some(action) = self.on_update {
            write!(f, " ON UPDATE {action}")?;
        }
        if let Some(kind) = self.match_kind {
            write!(f, " MATCH {kind}")?;
        }

        match self.deferrable {
            Some(true) => f.write_str(" DEFERRABLE")?,
            Some(false) => f.write_str(" NOT DEFERRABLE")?,
            None => {}
        }
        match self.initially_deferred {
            Some(true) => f.write_str(" INITIALLY DEFERRED")?,
            Some(false) => f.write_str(" INITIALLY IMMEDIATE")?,
            None => {}
        }

        Ok(())
    }
}

#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum ForeignKeyAction {
    SetNull,
    SetDefault,
    Cascade,
    Restrict,
    NoAction,
}

impl fmt::Display for ForeignKeyAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ForeignKeyAction::SetNull => f.write_str("SET NULL"),
            ForeignKeyAction::SetDefault => f.write_str("SET DEFAULT"),
            ForeignKeyAction::Cascade => f.write_str("CASCADE"),
            ForeignKeyAction::Restrict => f.write_str("RESTRICT"),
            ForeignKeyAction::NoAction => f.write_str("NO ACTION"),
        }
    }
}

#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum MatchKind {
    Simple,
    Full,
    Partial,
}

impl fmt::Display for MatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchKind::Simple => f.write_str("SIMPLE"),
            MatchKind::Full => f.write_str("FULL"),
            MatchKind::Partial => f.write_str("PARTIAL"),
        }
    }
}

#[derive(PartialEq, Debug, Clone)]
pub enum Expr {
    Identifier(Identifier),
    String(String),
    Integer(i64),
    Infix {
        op: BinaryOperator,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

impl Expr {
    pub fn identifier(name: &str) -> Self {
        Expr::Identifier(Identifier::from(name))
    }

    pub fn infix(op: BinaryOperator, left: Expr, right: Expr) -> Self {
        Expr::Infix {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Identifier(i) => write!(f, "{i}"),
            Expr::String(s) => write!(f, "'{}'", s.replace('\'', "''")),
            Expr::Integer(n) => write!(f, "{n}"),
            Expr::Infix { op, left, right } => write!(f, "({left} {op} {right})"),
        }
    }
}

#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum BinaryOperator {
    Or,
    And,
    Equal,
    Equal2,
    NotEqual,
    NotEqual2,
    Is,
    In,
    Like,
    Glob,
    Match,
    Regexp,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    LeftShift,
    RightShift,
    BitwiseAnd,
    BitwiseOr,
    Plus,
    Minus,
    Multiply,
    Divide,
    Modulo,
    Concat,
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BinaryOperator::Or => f.write_str("OR"),
            BinaryOperator::And => f.write_str("AND"),
            BinaryOperator::Equal => f.write_str("="),
            BinaryOperator::Equal2 => f.write_str("=="),
            BinaryOperator::NotEqual => f.write_str("<>"),
            BinaryOperator::NotEqual2 => f.write_str("!="),
            BinaryOperator::Is => f.write_str("IS"),
            BinaryOperator::In => f.write_str("IN"),
            BinaryOperator::Like => f.write_str("LIKE"),
            BinaryOperator::Glob => f.write_str("GLOB"),
            BinaryOperator::Match => f.write_str("MATCH"),
            BinaryOperator::Regexp => f.write_str("REGEXP"),
            BinaryOperator::LessThan => f.write_str("<"),
            BinaryOperator::LessThanOrEqual => f.write_str("<="),
            BinaryOperator::GreaterThan => f.write_str(">"),
            BinaryOperator::GreaterThanOrEqual => f.write_str(">="),
            BinaryOperator::LeftShift => f.write_str("<<"),
            BinaryOperator::RightShift => f.write_str(">>"),
            BinaryOperator::BitwiseAnd => f.write_str("&"),
            BinaryOperator::BitwiseOr => f.write_str("|"),
            BinaryOperator::Plus => f.write_str("+"),
            BinaryOperator::Minus => f.write_str("-"),
            BinaryOperator::Multiply => f.write_str("*"),
            BinaryOperator::Divide => f.write_str("/"),
            BinaryOperator::Modulo => f.write_str("%"),
            BinaryOperator::Concat => f.write_str("||"),
        }
    }
}

#[derive(PartialEq, Eq, Debug, Clone)]
pub struct Identifier {
    pub value: String,
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_name(f, &self.value)
    }
}

/// Write `name` bare when it lexes back as a plain identifier, otherwise in
/// double quotes.
fn write_name(f: &mut fmt::Formatter<'_>, name: &str) -> fmt::Result {
    let mut chars = name.chars();
    let bare = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        && Keyword::lookup(name).is_none();

    if bare {
        f.write_str(name)
    } else {
        write!(f, "\"{}\"", name.replace('"', "\"\""))
    }
}

impl From<&str> for Identifier {
    fn from(value: &str) -> Self {
        Identifier {
            value: String::from(value),
        }
    }
}

impl From<String> for Identifier {
    fn from(value: String) -> Self {
        Identifier { value }
    }
}
