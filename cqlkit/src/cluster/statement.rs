use crate::errors::ClientError;

/// CQL reserved words that may not be used as identifiers.
const RESERVED: &[&str] = &[
    "add", "allow", "alter", "and", "apply", "asc", "authorize", "batch", "begin", "by",
    "columnfamily", "create", "delete", "desc", "describe", "drop", "entries", "execute", "from",
    "full", "grant", "if", "in", "index", "infinity", "insert", "into", "keyspace", "limit",
    "modify", "nan", "norecursive", "not", "null", "of", "on", "or", "order", "primary", "rename",
    "replace", "revoke", "schema", "select", "set", "table", "to", "token", "truncate", "unlogged",
    "update", "use", "using", "values", "view", "where", "with",
];

const MAX_IDENTIFIER_LEN: usize = 48;

/// Accepts only unquoted CQL identifiers: leading letter, then letters,
/// digits, underscores, capped at the server's identifier length limit and
/// excluding reserved words. Everything that touches statement text goes
/// through this check; there is no raw interpolation path.
pub(crate) fn validate_identifier(identifier: &str) -> Result<(), String> {
    if identifier.is_empty() {
        return Err("identifier is empty".to_string());
    }
    if identifier.len() > MAX_IDENTIFIER_LEN {
        return Err(format!(
            "identifier '{}' exceeds {} characters",
            identifier, MAX_IDENTIFIER_LEN
        ));
    }
    let mut chars = identifier.chars();
    let first = chars.next().unwrap();
    if !first.is_ascii_alphabetic() {
        return Err(format!(
            "identifier '{}' must start with a letter",
            identifier
        ));
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(format!(
            "identifier '{}' contains characters outside [A-Za-z0-9_]",
            identifier
        ));
    }
    if RESERVED.contains(&identifier.to_ascii_lowercase().as_str()) {
        return Err(format!("identifier '{}' is a reserved word", identifier));
    }
    Ok(())
}

/// Builds parameterized DML. Identifiers are validated, values always travel
/// as bind markers.
pub struct StatementBuilder;

impl StatementBuilder {
    /// `INSERT INTO ks.tbl (c1, c2) VALUES (?, ?)`. The column list and the
    /// bound value count must agree and be non-empty before any text is
    /// assembled.
    pub fn insert(
        keyspace: &str,
        table: &str,
        columns: &[&str],
        value_count: usize,
    ) -> Result<String, ClientError> {
        if columns.is_empty() {
            return Err(ClientError::Write(
                "insert requires at least one column".to_string(),
            ));
        }
        if columns.len() != value_count {
            return Err(ClientError::Write(format!(
                "column/value arity mismatch: {} columns, {} values",
                columns.len(),
                value_count
            )));
        }
        validate_identifier(keyspace).map_err(ClientError::Write)?;
        validate_identifier(table).map_err(ClientError::Write)?;
        for (index, column) in columns.iter().enumerate() {
            validate_identifier(column).map_err(ClientError::Write)?;
            if columns[..index].contains(column) {
                return Err(ClientError::Write(format!(
                    "duplicate column '{}' in insert",
                    column
                )));
            }
        }

        let markers = vec!["?"; columns.len()].join(", ");
        Ok(format!(
            "INSERT INTO {}.{} ({}) VALUES ({})",
            keyspace,
            table,
            columns.join(", "),
            markers
        ))
    }

    /// `SELECT * FROM ks.tbl`.
    pub fn select(keyspace: &str, table: &str) -> Result<String, ClientError> {
        validate_identifier(keyspace).map_err(ClientError::Read)?;
        validate_identifier(table).map_err(ClientError::Read)?;
        Ok(format!("SELECT * FROM {}.{}", keyspace, table))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_parameterized_insert() {
        let cql = StatementBuilder::insert("demo", "names", &["id", "name"], 2).unwrap();
        assert_eq!(cql, "INSERT INTO demo.names (id, name) VALUES (?, ?)");
    }

    #[test]
    fn insert_with_zero_columns_is_a_write_error() {
        let err = StatementBuilder::insert("demo", "names", &[], 0).unwrap_err();
        assert!(matches!(err, ClientError::Write(_)));
    }

    #[test]
    fn insert_with_mismatched_arity_is_a_write_error() {
        let err = StatementBuilder::insert("demo", "names", &["id", "name"], 1).unwrap_err();
        assert!(matches!(err, ClientError::Write(_)));
        assert!(err.to_string().contains("arity"));
    }

    #[test]
    fn insert_rejects_duplicate_columns() {
        let err = StatementBuilder::insert("demo", "names", &["id", "id"], 2).unwrap_err();
        assert!(matches!(err, ClientError::Write(_)));
    }

    #[test]
    fn insert_rejects_malicious_identifiers() {
        let err =
            StatementBuilder::insert("demo", "names; DROP TABLE demo.names", &["id"], 1)
                .unwrap_err();
        assert!(matches!(err, ClientError::Write(_)));
    }

    #[test]
    fn builds_select() {
        let cql = StatementBuilder::select("demo", "names").unwrap();
        assert_eq!(cql, "SELECT * FROM demo.names");
    }

    #[test]
    fn select_rejects_invalid_table_as_read_error() {
        let err = StatementBuilder::select("demo", "").unwrap_err();
        assert!(matches!(err, ClientError::Read(_)));
    }

    #[test]
    fn identifier_rules() {
        assert!(validate_identifier("names").is_ok());
        assert!(validate_identifier("a1_b2").is_ok());
        assert!(validate_identifier("").is_err());
        assert!(validate_identifier("1abc").is_err());
        assert!(validate_identifier("with space").is_err());
        assert!(validate_identifier("select").is_err());
        assert!(validate_identifier("SELECT").is_err());
        assert!(validate_identifier(&"x".repeat(49)).is_err());
    }
}
