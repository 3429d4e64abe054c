use handlebars::{no_escape, Handlebars};
use serde_json::{json, Value};

use super::errors::{quote_identifier, validate_clickhouse_identifier, ClickhouseError};
use super::model::{ClickHouseColumn, ClickHouseTable};

static CREATE_TABLE_TEMPLATE: &str = r#"CREATE TABLE {{#if if_not_exists}}IF NOT EXISTS {{/if}}{{table_name}}
(
{{#each fields}}    {{field_name}} {{field_type}}{{#if field_default}} DEFAULT {{field_default}}{{/if}}{{#unless @last}},{{/unless}}
{{/each}}
)
ENGINE = {{engine}}
ORDER BY {{order_by}}"#;

/// Renders the `CREATE TABLE` statement for `table`, without a trailing `;`.
pub fn create_table_query(table: &ClickHouseTable) -> Result<String, ClickhouseError> {
    let mut reg = Handlebars::new();
    reg.register_escape_fn(no_escape);

    validate_clickhouse_identifier(&table.name, "table name")?;
    if let Some(database) = &table.database {
        validate_clickhouse_identifier(database, "database name")?;
    }
    if table.columns.is_empty() {
        return Err(ClickhouseError::InvalidParameters {
            message: format!("table {} has no columns", table.name),
        });
    }

    let template_context = json!({
        "if_not_exists": table.if_not_exists,
        "table_name": table.qualified_name(),
        "fields": builds_field_context(&table.columns)?,
        "engine": table.engine.to_string(),
        "order_by": table.order_by.to_expr(),
    });

    Ok(reg.render_template(CREATE_TABLE_TEMPLATE, &template_context)?)
}

fn builds_field_context(columns: &[ClickHouseColumn]) -> Result<Vec<Value>, ClickhouseError> {
    columns
        .iter()
        .map(|column| {
            validate_clickhouse_identifier(&column.name, "column name")?;
            Ok(json!({
                "field_name": quote_identifier(&column.name),
                "field_type": column.column_type.to_string(),
                "field_default": column.default,
            }))
        })
        .collect::<Result<Vec<Value>, ClickhouseError>>()
}
