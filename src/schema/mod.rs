//! JSON Schema for the IR, as consumed by structured-output generators.
//!
//! [`query_schema`] describes every entity exactly as serde reads and writes
//! it: tagged unions carry their discriminator as a `const` property, and
//! objects are closed with `additionalProperties: false`. The shape graph has
//! no cycles, so [`entity_schema`] can always hand out a fully inlined copy
//! for tools that do not follow `$ref`.

pub mod inline;

pub use self::inline::inline_refs;

use serde::Serialize;
use serde_json::{Map, Value, json};

use crate::ast::*;
use crate::error::SchemaError;

pub const DRAFT: &str = "https://json-schema.org/draft/2020-12/schema";

fn reference(name: &str) -> Value {
    json!({ "$ref": format!("#/$defs/{}", name) })
}

fn array_of(name: &str) -> Value {
    json!({ "type": "array", "items": reference(name) })
}

fn non_empty_array_of(name: &str) -> Value {
    json!({ "type": "array", "items": reference(name), "minItems": 1 })
}

fn identifier() -> Value {
    json!({ "type": "string", "pattern": "^[A-Za-z_][A-Za-z0-9_]*$", "maxLength": 63 })
}

/// String enum built from each variant's serde name.
fn string_enum<T: Serialize>(variants: &[T]) -> Value {
    let names: Vec<Value> = variants
        .iter()
        .filter_map(|v| serde_json::to_value(v).ok())
        .collect();
    json!({ "type": "string", "enum": names })
}

/// Closed object with the given properties; `required` lists the non-optional ones.
fn object(properties: Value, required: &[&str]) -> Value {
    json!({
        "type": "object",
        "properties": properties,
        "required": required,
        "additionalProperties": false,
    })
}

/// Add a discriminator `tag: value` to an object schema, as serde's internal tagging does.
fn tagged(tag: &str, value: &str, mut body: Value) -> Value {
    if let Value::Object(map) = &mut body {
        if let Some(Value::Object(props)) = map.get_mut("properties") {
            let mut with_tag = Map::with_capacity(props.len() + 1);
            with_tag.insert(tag.to_string(), json!({ "const": value }));
            with_tag.extend(std::mem::take(props));
            *props = with_tag;
        }
        if let Some(Value::Array(required)) = map.get_mut("required") {
            required.insert(0, Value::String(tag.to_string()));
        }
    }
    body
}

fn qualified_column() -> Value {
    object(
        json!({ "table_alias": identifier(), "column": reference("Column") }),
        &["column"],
    )
}

fn column_expr() -> Value {
    object(
        json!({
            "table_alias": identifier(),
            "column": reference("Column"),
            "alias": identifier(),
        }),
        &["column"],
    )
}

fn binary_arithmetic() -> Value {
    object(
        json!({
            "left": reference("Operand"),
            "op": reference("ArithmeticOp"),
            "right": reference("Operand"),
            "alias": identifier(),
        }),
        &["left", "op", "right", "alias"],
    )
}

fn compound_arithmetic() -> Value {
    object(
        json!({
            "inner_left": reference("Operand"),
            "inner_op": reference("ArithmeticOp"),
            "inner_right": reference("Operand"),
            "outer_op": reference("ArithmeticOp"),
            "outer": reference("Operand"),
            "alias": identifier(),
        }),
        &["inner_left", "inner_op", "inner_right", "outer_op", "outer", "alias"],
    )
}

fn arithmetic_input() -> Value {
    object(
        json!({
            "left": reference("Operand"),
            "op": reference("ArithmeticOp"),
            "right": reference("Operand"),
        }),
        &["left", "op", "right"],
    )
}

fn aggregate_expr() -> Value {
    object(
        json!({
            "function": reference("AggregateFunc"),
            "input": reference("AggregateInput"),
            "distinct": { "type": "boolean" },
            "percentile": { "type": "number", "minimum": 0, "maximum": 1 },
            "alias": identifier(),
        }),
        &["function", "alias"],
    )
}

fn window_expr() -> Value {
    object(
        json!({
            "function": reference("WindowFunc"),
            "column": reference("QualifiedColumn"),
            "partition_by": array_of("QualifiedColumn"),
            "order_by": array_of("OrderByItem"),
            "offset": { "type": "integer", "minimum": 0 },
            "default": reference("Literal"),
            "alias": identifier(),
        }),
        &["function", "alias"],
    )
}

fn case_expr() -> Value {
    object(
        json!({
            "branches": non_empty_array_of("CaseWhen"),
            "else_result": reference("CaseResult"),
            "alias": identifier(),
        }),
        &["branches", "alias"],
    )
}

fn simple_condition() -> Value {
    object(
        json!({
            "column": reference("QualifiedColumn"),
            "operator": reference("ComparisonOp"),
            "value": reference("ConditionValue"),
        }),
        &["column", "operator"],
    )
}

fn column_comparison() -> Value {
    object(
        json!({
            "left": reference("QualifiedColumn"),
            "operator": reference("ComparisonOp"),
            "right": reference("QualifiedColumn"),
        }),
        &["left", "operator", "right"],
    )
}

fn between_condition() -> Value {
    object(
        json!({
            "column": reference("QualifiedColumn"),
            "low": reference("Literal"),
            "high": reference("Literal"),
        }),
        &["column", "low", "high"],
    )
}

fn definitions() -> Map<String, Value> {
    let mut defs = Map::new();
    let mut def = |name: &str, schema: Value| {
        defs.insert(name.to_string(), schema);
    };

    // Closed vocabularies
    def("Table", string_enum(Table::ALL));
    def("Column", string_enum(Column::ALL));
    def("ArithmeticOp", string_enum(ArithmeticOp::ALL));
    def("ComparisonOp", string_enum(ComparisonOp::ALL));
    def("AggregateFunc", string_enum(AggregateFunc::ALL));
    def("WindowFunc", string_enum(WindowFunc::ALL));
    def("JoinType", string_enum(JoinType::ALL));
    def("LogicOp", string_enum(LogicOp::ALL));
    def("Direction", string_enum(Direction::ALL));
    def("NullsOrder", string_enum(NullsOrder::ALL));

    // Values
    def("Number", json!({ "type": "number" }));
    def("Literal", json!({ "type": ["boolean", "number", "string"] }));
    def(
        "ConditionValue",
        json!({ "anyOf": [reference("Literal"), non_empty_array_of("Literal")] }),
    );

    // Columns and operands
    def("QualifiedColumn", qualified_column());
    def(
        "Operand",
        json!({ "oneOf": [
            tagged("kind", "column", qualified_column()),
            object(json!({ "kind": { "const": "number" }, "value": reference("Number") }), &["kind", "value"]),
        ]}),
    );
    def(
        "SortKey",
        json!({ "oneOf": [
            tagged("kind", "column", qualified_column()),
            object(json!({ "kind": { "const": "alias" }, "name": identifier() }), &["kind", "name"]),
        ]}),
    );
    def(
        "OrderByItem",
        object(
            json!({
                "column": reference("SortKey"),
                "direction": reference("Direction"),
                "nulls": reference("NullsOrder"),
            }),
            &["column"],
        ),
    );

    // Select expressions
    def("ColumnExpr", column_expr());
    def("BinaryArithmetic", binary_arithmetic());
    def("CompoundArithmetic", compound_arithmetic());
    def("ArithmeticInput", arithmetic_input());
    def(
        "AggregateInput",
        json!({ "oneOf": [
            tagged("kind", "column", qualified_column()),
            tagged("kind", "arithmetic", arithmetic_input()),
        ]}),
    );
    def("AggregateExpr", aggregate_expr());
    def("WindowExpr", window_expr());
    def(
        "CaseResult",
        json!({ "oneOf": [
            tagged("kind", "column", qualified_column()),
            object(json!({ "kind": { "const": "literal" }, "value": reference("Literal") }), &["kind", "value"]),
        ]}),
    );
    def(
        "CaseWhen",
        object(
            json!({ "condition": reference("SimpleCondition"), "result": reference("CaseResult") }),
            &["condition", "result"],
        ),
    );
    def("CaseExpr", case_expr());
    def(
        "SelectExpr",
        json!({ "oneOf": [
            tagged("type", "column", column_expr()),
            tagged("type", "binary_arithmetic", binary_arithmetic()),
            tagged("type", "compound_arithmetic", compound_arithmetic()),
            tagged("type", "aggregate", aggregate_expr()),
            tagged("type", "window", window_expr()),
            tagged("type", "case", case_expr()),
        ]}),
    );

    // Conditions
    def("SimpleCondition", simple_condition());
    def("ColumnComparison", column_comparison());
    def("BetweenCondition", between_condition());
    def(
        "Condition",
        json!({ "oneOf": [
            tagged("type", "simple", simple_condition()),
            tagged("type", "column_comparison", column_comparison()),
            tagged("type", "between", between_condition()),
        ]}),
    );
    def(
        "ConditionGroup",
        object(
            json!({ "conditions": non_empty_array_of("Condition"), "logic": reference("LogicOp") }),
            &["conditions"],
        ),
    );
    def(
        "WhereL0",
        object(
            json!({
                "groups": array_of("ConditionGroup"),
                "between": array_of("BetweenCondition"),
                "group_logic": reference("LogicOp"),
            }),
            &[],
        ),
    );
    def(
        "ScalarSubquery",
        object(
            json!({
                "table": reference("Table"),
                "table_alias": identifier(),
                "aggregate": reference("AggregateExpr"),
                "where": reference("WhereL0"),
                "group_by": array_of("Column"),
            }),
            &["table", "aggregate"],
        ),
    );
    def(
        "SubqueryCondition",
        object(
            json!({
                "column": reference("QualifiedColumn"),
                "operator": reference("ComparisonOp"),
                "subquery": reference("ScalarSubquery"),
            }),
            &["column", "operator", "subquery"],
        ),
    );
    def(
        "WhereL1",
        object(
            json!({
                "groups": array_of("ConditionGroup"),
                "between": array_of("BetweenCondition"),
                "subqueries": array_of("SubqueryCondition"),
                "group_logic": reference("LogicOp"),
            }),
            &[],
        ),
    );

    // Clauses
    def(
        "JoinSpec",
        object(
            json!({
                "join_type": reference("JoinType"),
                "table": reference("Table"),
                "table_alias": identifier(),
                "on_conditions": non_empty_array_of("ConditionGroup"),
            }),
            &["join_type", "table", "on_conditions"],
        ),
    );
    def(
        "DerivedTable",
        object(
            json!({
                "select": non_empty_array_of("SelectExpr"),
                "from_table": reference("Table"),
                "alias": identifier(),
                "where": reference("WhereL0"),
                "group_by": array_of("Column"),
            }),
            &["select", "from_table", "alias"],
        ),
    );
    def(
        "FromClause",
        json!({
            "type": "object",
            "properties": {
                "table": reference("Table"),
                "table_alias": identifier(),
                "joins": array_of("JoinSpec"),
                "derived": reference("DerivedTable"),
            },
            "oneOf": [
                { "required": ["table"], "not": { "required": ["derived"] } },
                { "required": ["derived"], "not": { "anyOf": [{ "required": ["table"] }, { "required": ["table_alias"] }] } },
            ],
            "additionalProperties": false,
        }),
    );
    def(
        "GroupByClause",
        object(json!({ "columns": non_empty_array_of("Column") }), &["columns"]),
    );
    def(
        "HavingCondition",
        object(
            json!({
                "function": reference("AggregateFunc"),
                "column": reference("QualifiedColumn"),
                "operator": reference("ComparisonOp"),
                "value": reference("Literal"),
            }),
            &["function", "operator", "value"],
        ),
    );
    def(
        "HavingClause",
        object(
            json!({ "conditions": non_empty_array_of("HavingCondition"), "logic": reference("LogicOp") }),
            &["conditions"],
        ),
    );
    def(
        "OrderByClause",
        object(json!({ "items": non_empty_array_of("OrderByItem") }), &["items"]),
    );
    def(
        "LimitClause",
        object(
            json!({
                "limit": { "type": "integer", "minimum": 0 },
                "offset": { "type": "integer", "minimum": 0 },
            }),
            &["limit"],
        ),
    );
    def(
        "Query",
        object(
            json!({
                "select": non_empty_array_of("SelectExpr"),
                "from": reference("FromClause"),
                "where": reference("WhereL1"),
                "group_by": reference("GroupByClause"),
                "having": reference("HavingClause"),
                "order_by": reference("OrderByClause"),
                "limit": reference("LimitClause"),
            }),
            &["select", "from"],
        ),
    );

    defs
}

/// The whole IR, rooted at `Query`, with shared entities under `$defs`.
pub fn query_schema() -> Value {
    json!({
        "$schema": DRAFT,
        "title": "Query",
        "$ref": "#/$defs/Query",
        "$defs": definitions(),
    })
}

/// Names of every entity [`entity_schema`] accepts.
pub fn entity_names() -> Vec<String> {
    definitions().keys().cloned().collect()
}

/// One entity with every reference inlined.
pub fn entity_schema(name: &str) -> Result<Value, SchemaError> {
    let defs = definitions();
    if !defs.contains_key(name) {
        return Err(SchemaError::UnknownDefinition(name.to_string()));
    }
    inline_refs(&json!({
        "title": name,
        "$ref": format!("#/$defs/{}", name),
        "$defs": defs,
    }))
}
