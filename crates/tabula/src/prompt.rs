//! Prompt construction from a schema snapshot and a task.

use tabula_core::{Message, SchemaInfo, SqlDialect};

/// Fixed instruction sent as the system message.
pub const SYSTEM_INSTRUCTION: &str = "You are an AI skilled in SQL. Generate a query based on the given schema and user request; \
the query must only reference tables and columns present in the schema. \
Always wrap the query in a fenced ```sql code block.";

/// The two messages sent to the completion service.
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters)]
pub struct Prompt {
    /// System instruction
    system: String,
    /// Schema text followed by the task
    user: String,
}

impl Prompt {
    /// System message then user message.
    pub fn to_messages(&self) -> Vec<Message> {
        vec![Message::system(&self.system), Message::user(&self.user)]
    }
}

/// Builds prompts for one database dialect.
///
/// # Examples
///
/// ```
/// use tabula::PromptBuilder;
/// use tabula_core::{ColumnInfo, SchemaInfo, SqlDialect};
///
/// let schema = SchemaInfo::from_tables([(
///     "users",
///     vec![ColumnInfo::new("id"), ColumnInfo::new("email")],
/// )]);
/// let prompt = PromptBuilder::new()
///     .with_dialect(SqlDialect::Sqlite)
///     .build(&schema, "list all user emails");
///
/// assert!(prompt.system().contains("```sql"));
/// assert!(prompt.system().contains("SQLite"));
/// assert!(prompt.user().ends_with("list all user emails"));
/// assert!(!prompt.user().contains('{'));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PromptBuilder {
    dialect: Option<SqlDialect>,
}

impl PromptBuilder {
    /// A builder with no dialect hint.
    pub fn new() -> Self {
        Self::default()
    }

    /// Name the SQL dialect in the system instruction.
    pub fn with_dialect(mut self, dialect: SqlDialect) -> Self {
        self.dialect = Some(dialect);
        self
    }

    /// Render `schema` and `task` into a prompt.
    pub fn build(&self, schema: &SchemaInfo, task: &str) -> Prompt {
        let system = match self.dialect {
            Some(dialect) => format!(
                "{SYSTEM_INSTRUCTION} The database is {dialect}; use its SQL dialect."
            ),
            None => SYSTEM_INSTRUCTION.to_string(),
        };
        let schema_text = sanitize_schema(&schema.to_string());
        let user = format!(
            "Given the database schema:\n\n{schema_text}\n\nGenerate a SQL query for:\n\n{task}"
        );
        Prompt { system, user }
    }
}

/// Remove `[`, `]`, `{` and `}` from serialized schema text.
pub fn sanitize_schema(text: &str) -> String {
    text.chars()
        .filter(|c| !matches!(c, '[' | ']' | '{' | '}'))
        .collect()
}
