/*
This tool is part of the nogo_hotspots geoprocessing library.
Created: 19/10/2026
Last Modified: 19/10/2026
License: MIT
*/

use crate::error::{Error, Result};
use crate::layer::Layer;
use crate::tools::GeoprocessingTool;
use crate::vector::FieldData;
use crate::workspace::Workspace;
use evalexpr::*;
use tracing::debug;

/// This tool copies the features of a layer that satisfy a boolean expression into a new
/// layer. Attribute fields are referred to by name, e.g. `CLUSTER_ID > 0`. The identifiers
/// `null` and `NULL` stand for a missing value, so `CLUSTER_ID != null` keeps features with a
/// non-null cluster id. `FID` holds the feature index unless the layer already has a field of
/// that name.
///
/// Expressions use the syntax of the `evalexpr` crate:
///
/// | Operator | Description |
/// |-|-|
/// | `==`, `!=` | Equal, not equal |
/// | `<`, `<=`, `>`, `>=` | Ordering comparisons |
/// | `&&`, `\|\|`, `!` | Logical and, or, not |
/// | `+`, `-`, `*`, `/`, `%` | Arithmetic |
///
/// Features whose expression cannot be evaluated (for example, an ordering comparison
/// against a null value) are not selected. SQL-style where clauses can be converted with
/// `where_clause_to_expression`.
pub struct SelectLayerByAttribute {
    name: String,
    description: String,
    toolbox: String,
    pub input: String,
    pub output: String,
    pub expression: String,
}

impl SelectLayerByAttribute {
    pub fn new(input: &str, output: &str, expression: &str) -> SelectLayerByAttribute {
        SelectLayerByAttribute {
            name: "SelectLayerByAttribute".to_string(),
            description: "Selects the features of a layer that satisfy an attribute expression."
                .to_string(),
            toolbox: "Data Tools".to_string(),
            input: input.to_string(),
            output: output.to_string(),
            expression: expression.to_string(),
        }
    }
}

impl GeoprocessingTool for SelectLayerByAttribute {
    fn get_tool_name(&self) -> String {
        self.name.clone()
    }

    fn get_tool_description(&self) -> String {
        self.description.clone()
    }

    fn get_toolbox(&self) -> String {
        self.toolbox.clone()
    }

    fn run(&self, workspace: &mut Workspace) -> Result<()> {
        let output = select_by_attribute(workspace.get(&self.input)?, &self.output, &self.expression)?;
        workspace.insert(output)
    }
}

pub fn select_by_attribute(input: &Layer, output_name: &str, expression: &str) -> Result<Layer> {
    let precompiled = build_operator_tree(expression).map_err(|e| Error::InvalidExpression {
        expression: expression.to_string(),
        msg: e.to_string(),
    })?;
    let bind_fid = input.get_field_num("FID").is_none();

    let mut output = input.empty_like(output_name, input.shape_type, true);
    let mut num_errors = 0usize;
    for (fid, feature) in input.features.iter().enumerate() {
        let mut context = HashMapContext::new();
        _ = context.set_value("null".into(), Value::Empty);
        _ = context.set_value("NULL".into(), Value::Empty);
        if bind_fid {
            _ = context.set_value("FID".into(), Value::Int(fid as i64));
        }
        for (field, value) in input.fields.iter().zip(&feature.attributes) {
            _ = context.set_value(field.name.clone(), to_value(value));
        }

        match precompiled.eval_boolean_with_context(&context) {
            Ok(true) => output.add_feature(feature.geometry.clone(), feature.attributes.clone()),
            Ok(false) => {}
            Err(e) => {
                if num_errors == 0 {
                    debug!("FID {}: '{}' not evaluated: {}", fid, expression, e);
                }
                num_errors += 1;
            }
        }
    }

    debug!(
        "selected {} of {} features with '{}' ({} not evaluable)",
        output.num_features(),
        input.num_features(),
        expression,
        num_errors
    );
    Ok(output)
}

fn to_value(value: &FieldData) -> Value {
    match value {
        FieldData::Int(v) => Value::Int(*v),
        FieldData::Real(v) => Value::Float(*v),
        FieldData::Text(v) => Value::String(v.clone()),
        FieldData::Date(v) => Value::String(v.to_string()),
        FieldData::Bool(v) => Value::Boolean(*v),
        FieldData::Null => Value::Empty,
    }
}

enum Token {
    Word(String),
    Quoted(String),
}

/// Rewrites an SQL-style where clause into expression syntax, e.g.
/// `"CLUSTER_ID" IS NOT NULL And "CLUSTER_ID" > 0` becomes
/// `CLUSTER_ID != null && CLUSTER_ID > 0`. Double-quoted names become bare identifiers
/// and single-quoted literals become strings. Keywords are case-insensitive.
pub fn where_clause_to_expression(clause: &str) -> String {
    let mut tokens: Vec<Token> = vec![];
    let mut word = String::new();
    let mut chars = clause.chars();
    while let Some(c) = chars.next() {
        match c {
            '"' | '\'' => {
                if !word.is_empty() {
                    tokens.push(Token::Word(std::mem::take(&mut word)));
                }
                let quoted: String = chars.by_ref().take_while(|q| *q != c).collect();
                tokens.push(if c == '"' {
                    Token::Quoted(quoted)
                } else {
                    Token::Quoted(format!("\"{}\"", quoted))
                });
            }
            c if c.is_whitespace() => {
                if !word.is_empty() {
                    tokens.push(Token::Word(std::mem::take(&mut word)));
                }
            }
            _ => word.push(c),
        }
    }
    if !word.is_empty() {
        tokens.push(Token::Word(word));
    }

    let keyword = |i: usize| match tokens.get(i) {
        Some(Token::Word(w)) => w.to_ascii_uppercase(),
        _ => String::new(),
    };
    let mut out: Vec<String> = vec![];
    let mut i = 0;
    while i < tokens.len() {
        let (s, used) = match (&tokens[i], keyword(i).as_str()) {
            (Token::Quoted(q), _) => (q.clone(), 1),
            (_, "IS") if keyword(i + 1) == "NOT" && keyword(i + 2) == "NULL" => ("!= null".to_string(), 3),
            (_, "IS") if keyword(i + 1) == "NULL" => ("== null".to_string(), 2),
            (_, "AND") => ("&&".to_string(), 1),
            (_, "OR") => ("||".to_string(), 1),
            (_, "NOT") => ("!".to_string(), 1),
            (_, "NULL") => ("null".to_string(), 1),
            (_, "TRUE") => ("true".to_string(), 1),
            (_, "FALSE") => ("false".to_string(), 1),
            (_, "=") => ("==".to_string(), 1),
            (_, "<>") => ("!=".to_string(), 1),
            (Token::Word(w), _) => (w.clone(), 1),
        };
        out.push(s);
        i += used;
    }
    out.join(" ")
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::tools::test_data::point_layer;
    use crate::vector::{AttributeField, FieldDataType};

    fn clustered_points() -> Layer {
        let mut layer = point_layer("pts", &[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0)]);
        layer.add_field(AttributeField::new("CLUSTER_ID", FieldDataType::Int, 6u8, 0u8));
        layer.features[0].attributes[1] = FieldData::Int(1);
        layer.features[1].attributes[1] = FieldData::Int(-1);
        layer.features[2].attributes[1] = FieldData::Int(2);
        // feature 3 keeps a null cluster id
        layer
    }

    #[test]
    fn selects_positive_cluster_ids() {
        let out = select_by_attribute(&clustered_points(), "sel", "CLUSTER_ID > 0").unwrap();
        assert_eq!(out.num_features(), 2);
        assert_eq!(out.get_value(0, "ID"), FieldData::Int(0));
        assert_eq!(out.get_value(1, "ID"), FieldData::Int(2));
        assert_eq!(out.fields.len(), 2);
    }

    #[test]
    fn null_test_excludes_missing_values() {
        let layer = clustered_points();
        let out = select_by_attribute(&layer, "sel", "CLUSTER_ID != null").unwrap();
        assert_eq!(out.num_features(), 3);
        let out = select_by_attribute(&layer, "sel", "CLUSTER_ID == NULL").unwrap();
        assert_eq!(out.num_features(), 1);
        assert_eq!(out.get_value(0, "ID"), FieldData::Int(3));
        let out =
            select_by_attribute(&layer, "sel", "CLUSTER_ID != null && CLUSTER_ID > 0").unwrap();
        assert_eq!(out.num_features(), 2);
    }

    #[test]
    fn fid_is_available() {
        let out = select_by_attribute(&clustered_points(), "sel", "FID >= 2").unwrap();
        assert_eq!(out.num_features(), 2);
    }

    #[test]
    fn invalid_expression_is_an_error() {
        let result = select_by_attribute(&clustered_points(), "sel", "CLUSTER_ID > (");
        assert!(matches!(result, Err(Error::InvalidExpression { .. })));
    }

    #[test]
    fn unknown_field_selects_nothing() {
        let out = select_by_attribute(&clustered_points(), "sel", "SENSFEAT == \"x\"").unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn converts_where_clauses() {
        assert_eq!(where_clause_to_expression("\"CLUSTER_ID\" > 0"), "CLUSTER_ID > 0");
        assert_eq!(
            where_clause_to_expression("\"CLUSTER_ID\" IS NOT NULL And \"CLUSTER_ID\" > 0"),
            "CLUSTER_ID != null && CLUSTER_ID > 0"
        );
        assert_eq!(
            where_clause_to_expression("SENSFEAT = 'Aloe ferox' or SENSFEAT is null"),
            "SENSFEAT == \"Aloe ferox\" || SENSFEAT == null"
        );
    }
}
