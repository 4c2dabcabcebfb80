//! SQL Parameter Binder
//!
//! Rewrites `:name` placeholders into positional `?` markers and collects the
//! matching argument values in placeholder order. Values are never spliced
//! into the query text; the executor binds them as parameters.

use serde_json::{Map, Value};

use crate::error::ToolError;

/// A positional query and its arguments in marker order
#[derive(Debug, Clone, PartialEq)]
pub struct BoundQuery {
    pub sql: String,
    pub args: Vec<Value>,
}

fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn resolve(name: &str, args: &Map<String, Value>, bound: &mut BoundQuery) -> Result<(), ToolError> {
    let value = args
        .get(name)
        .ok_or_else(|| ToolError::MissingNamedArgument(name.to_string()))?;
    bound.sql.push('?');
    bound.args.push(value.clone());
    Ok(())
}

/// Bind the named placeholders of `template` against `args`.
///
/// The character that ends a placeholder is kept in the output. A placeholder
/// whose name is absent from `args` fails the whole bind.
pub fn bind_named(template: &str, args: &Map<String, Value>) -> Result<BoundQuery, ToolError> {
    let mut bound = BoundQuery {
        sql: String::with_capacity(template.len()),
        args: Vec::new(),
    };
    let mut placeholder: Option<String> = None;

    for c in template.chars() {
        if let Some(name) = placeholder.as_mut() {
            if is_identifier_char(c) {
                name.push(c);
                continue;
            }
            resolve(name, args, &mut bound)?;
            placeholder = None;
            // The terminator is copied as-is, even when it is another ':'
            bound.sql.push(c);
            continue;
        }

        if c == ':' {
            placeholder = Some(String::new());
        } else {
            bound.sql.push(c);
        }
    }

    if let Some(name) = placeholder {
        resolve(&name, args, &mut bound)?;
    }

    Ok(bound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("test arguments must be an object"),
        }
    }

    #[test]
    fn test_repeated_placeholder_binds_in_order() {
        let bound = bind_named(
            "select * from t where x = :a and y = :b or z = :a",
            &args(json!({"a": 1, "b": "two"})),
        )
        .unwrap();

        assert_eq!(bound.sql, "select * from t where x = ? and y = ? or z = ?");
        assert_eq!(bound.sql.matches('?').count(), 3);
        assert_eq!(bound.args, vec![json!(1), json!("two"), json!(1)]);
    }

    #[test]
    fn test_missing_argument_fails() {
        let err = bind_named("select * from t where x = :a and y = :missing", &args(json!({"a": 1}))).unwrap_err();
        assert!(matches!(err, ToolError::MissingNamedArgument(ref name) if name == "missing"));
    }

    #[test]
    fn test_terminator_is_preserved() {
        let bound = bind_named("select * from t where id in (:first,:second)", &args(json!({"first": 1, "second": 2})))
            .unwrap();

        assert_eq!(bound.sql, "select * from t where id in (?,?)");
        assert_eq!(bound.args, vec![json!(1), json!(2)]);
    }

    #[test]
    fn test_colon_after_placeholder_is_literal() {
        let bound = bind_named("select x from t where y = :a:b", &args(json!({"a": 1, "b": 2}))).unwrap();

        assert_eq!(bound.sql, "select x from t where y = ?:b");
        assert_eq!(bound.args, vec![json!(1)]);
    }

    #[test]
    fn test_placeholder_at_end_of_template() {
        let bound = bind_named("select * from t where term = :term", &args(json!({"term": "fall"}))).unwrap();
        assert_eq!(bound.sql, "select * from t where term = ?");
        assert_eq!(bound.args, vec![json!("fall")]);

        let err = bind_named("select * from t where term = :term", &Map::new()).unwrap_err();
        assert!(matches!(err, ToolError::MissingNamedArgument(ref name) if name == "term"));
    }

    #[test]
    fn test_template_without_placeholders() {
        let bound = bind_named("select 1 from t", &Map::new()).unwrap();
        assert_eq!(bound.sql, "select 1 from t");
        assert!(bound.args.is_empty());
    }

    #[test]
    fn test_student_scores_template() {
        let bound = bind_named(
            "select subject, score from student_scores where student_id = :student_id and term = :term",
            &args(json!({"student_id": 42, "term": "fall", "unused": true})),
        )
        .unwrap();

        assert_eq!(
            bound.sql,
            "select subject, score from student_scores where student_id = ? and term = ?"
        );
        assert_eq!(bound.args, vec![json!(42), json!("fall")]);
    }
}
