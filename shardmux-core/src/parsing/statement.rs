use crate::parsing::{ColumnContext, ConditionContext, Limit, Table};

/// Kind of statement a parse produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementType {
    Select,
    Insert,
}

/// Parsed statement: routing conditions plus pagination metadata
#[derive(Debug, Clone, PartialEq)]
pub struct SqlStatement {
    statement_type: StatementType,
    tables: Vec<Table>,
    condition_context: ConditionContext,
    limit: Option<Limit>,
    /// Columns assigned by an INSERT, in statement order
    insert_columns: Vec<ColumnContext>,
    /// Auto-increment columns the INSERT left for key generation
    generated_key_columns: Vec<String>,
    /// Parameters consumed while parsing
    parameters_index: usize,
}

impl SqlStatement {
    pub fn new(statement_type: StatementType) -> Self {
        Self {
            statement_type,
            tables: Vec::new(),
            condition_context: ConditionContext::new(),
            limit: None,
            insert_columns: Vec::new(),
            generated_key_columns: Vec::new(),
            parameters_index: 0,
        }
    }

    pub fn select() -> Self {
        Self::new(StatementType::Select)
    }

    pub fn insert() -> Self {
        Self::new(StatementType::Insert)
    }

    pub fn statement_type(&self) -> StatementType {
        self.statement_type
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    pub fn add_table(&mut self, table: Table) {
        self.tables.push(table);
    }

    /// Name of the first table, the INSERT target
    pub fn table_name(&self) -> Option<&str> {
        self.tables.first().map(|t| t.name.as_str())
    }

    pub fn condition_context(&self) -> &ConditionContext {
        &self.condition_context
    }

    pub fn set_condition_context(&mut self, condition_context: ConditionContext) {
        self.condition_context = condition_context;
    }

    pub fn limit(&self) -> Option<&Limit> {
        self.limit.as_ref()
    }

    pub fn set_limit(&mut self, limit: Limit) {
        self.limit = Some(limit);
    }

    pub fn with_limit(mut self, limit: Limit) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn insert_columns(&self) -> &[ColumnContext] {
        &self.insert_columns
    }

    pub fn set_insert_columns(&mut self, columns: Vec<ColumnContext>) {
        self.insert_columns = columns;
    }

    pub fn generated_key_columns(&self) -> &[String] {
        &self.generated_key_columns
    }

    pub fn set_generated_key_columns(&mut self, columns: Vec<String>) {
        self.generated_key_columns = columns;
    }

    pub fn parameters_index(&self) -> usize {
        self.parameters_index
    }

    pub fn set_parameters_index(&mut self, index: usize) {
        self.parameters_index = index;
    }
}
