//! Backend-neutral query results.

/// A single SQL value as returned by any backend
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl SqlValue {
    /// Borrow the value as text, if it is text
    pub fn as_text(&self) -> Option<&str> {
        match self {
            SqlValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Read the value as an integer, if it is one
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            SqlValue::Integer(n) => Some(*n),
            _ => None,
        }
    }
}

/// Column names plus every row of a result set
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rows {
    /// Column names in select order
    pub columns: Vec<String>,
    /// Row values, one inner vector per row
    pub rows: Vec<Vec<SqlValue>>,
}

impl Rows {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate over the values of one column by position.
    ///
    /// Rows shorter than `idx` yield [`SqlValue::Null`].
    pub fn column(&self, idx: usize) -> impl Iterator<Item = &SqlValue> {
        const NULL: &SqlValue = &SqlValue::Null;
        self.rows.iter().map(move |r| r.get(idx).unwrap_or(NULL))
    }

    /// First column of the first row, for scalar queries such as `COUNT(*)`
    pub fn scalar(&self) -> Option<&SqlValue> {
        self.rows.first().and_then(|r| r.first())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Rows {
        Rows {
            columns: vec!["name".to_string(), "n".to_string()],
            rows: vec![
                vec![SqlValue::Text("a".to_string()), SqlValue::Integer(1)],
                vec![SqlValue::Text("b".to_string())],
            ],
        }
    }

    #[test]
    fn test_column_pads_short_rows() {
        let rows = sample();
        let values: Vec<&SqlValue> = rows.column(1).collect();
        assert_eq!(values, vec![&SqlValue::Integer(1), &SqlValue::Null]);
    }

    #[test]
    fn test_scalar() {
        assert_eq!(sample().scalar().and_then(SqlValue::as_text), Some("a"));
        assert!(Rows::default().scalar().is_none());
    }

    #[test]
    fn test_accessors() {
        assert_eq!(SqlValue::Integer(7).as_i64(), Some(7));
        assert_eq!(SqlValue::Text("7".to_string()).as_i64(), None);
        assert_eq!(SqlValue::Real(1.5).as_text(), None);
    }
}
