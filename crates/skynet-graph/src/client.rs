use std::collections::HashMap;

use neo4rs::{BoltType, Graph, Query};
use serde_json::Value;
use tracing::{debug, warn};

use skynet_core::config::GraphConfig;

use crate::error::{GraphError, Result};
use crate::types::{normalize_properties, PropertyMap, Row};

/// Thin Cypher client over `neo4rs` (§4.4 Graph Service storage primitive).
/// Domain-level upserts/queries (person, project, reminder, ...) live in
/// `skynet-knowledge`, which composes these primitives.
pub struct GraphClient {
    graph: Graph,
}

impl GraphClient {
    pub async fn connect(config: &GraphConfig) -> Result<Self> {
        let graph = Graph::new(&config.uri, &config.user, &config.password)
            .await
            .map_err(GraphError::Connect)?;
        Ok(Self { graph })
    }

    /// Run a write-only statement; discards any returned rows.
    pub async fn execute(&self, cypher: &str, params: PropertyMap) -> Result<()> {
        let query = bind_params(Query::new(cypher.to_string()), &params);
        let mut stream = self.graph.execute(query).await.map_err(GraphError::Query)?;
        while stream.next().await.map_err(GraphError::Row)?.is_some() {}
        Ok(())
    }

    /// Run a read statement, returning each row as a loosely-typed map. The
    /// caller supplies the expected `RETURN` column names since neo4rs rows
    /// are column-indexed, not self-describing.
    pub async fn query_rows(&self, cypher: &str, params: PropertyMap, columns: &[&str]) -> Result<Vec<Row>> {
        let query = bind_params(Query::new(cypher.to_string()), &params);
        let mut stream = self.graph.execute(query).await.map_err(GraphError::Query)?;
        let mut rows = Vec::new();
        while let Some(row) = stream.next().await.map_err(GraphError::Row)? {
            let mut out: Row = HashMap::new();
            for col in columns {
                if let Ok(v) = row.get::<BoltValueJson>(col) {
                    out.insert((*col).to_string(), v.0);
                } else {
                    debug!(column = col, "column missing or unconvertible on row");
                }
            }
            rows.push(out);
        }
        Ok(rows)
    }

    /// MERGE a node by `(label, key_field)`, applying the storage rule
    /// (nested structures JSON-stringified) before binding properties.
    /// Inline creation syntax for the key, `SET n += $props` for the rest —
    /// per §4.4, `n.k = $v` is only valid in update clauses.
    pub async fn merge_node(&self, label: &str, key_field: &str, key_value: &str, props: &PropertyMap) -> Result<()> {
        let normalized = normalize_properties(props);
        let cypher = format!(
            "MERGE (n:{label} {{ {key_field}: $key }}) \
             ON CREATE SET n.created_at = datetime() \
             SET n += $props, n.updated_at = datetime()"
        );
        let mut params: PropertyMap = HashMap::new();
        params.insert("key".to_string(), Value::String(key_value.to_string()));
        params.insert("props".to_string(), Value::Object(normalized.into_iter().collect()));
        self.execute(&cypher, params).await
    }

    /// Case-insensitive lookup by a single property (§4.4: "all case-insensitive
    /// matches go through lowercasing in the query").
    pub async fn find_by_property_ci(&self, label: &str, field: &str, value: &str) -> Result<Option<Row>> {
        let cypher = format!(
            "MATCH (n:{label}) WHERE toLower(n.{field}) = toLower($value) RETURN n LIMIT 1"
        );
        let mut params: PropertyMap = HashMap::new();
        params.insert("value".to_string(), Value::String(value.to_string()));
        let rows = self.query_rows(&cypher, params, &["n"]).await?;
        Ok(rows.into_iter().next())
    }

    pub async fn delete_node(&self, label: &str, key_field: &str, key_value: &str, detach: bool) -> Result<()> {
        let verb = if detach { "DETACH DELETE" } else { "DELETE" };
        let cypher = format!("MATCH (n:{label} {{ {key_field}: $key }}) {verb} n");
        let mut params: PropertyMap = HashMap::new();
        params.insert("key".to_string(), Value::String(key_value.to_string()));
        self.execute(&cypher, params).await
    }
}

fn bind_params(mut query: Query, params: &PropertyMap) -> Query {
    for (key, value) in params {
        query = query.param(key, json_to_bolt(value));
    }
    query
}

fn json_to_bolt(value: &Value) -> BoltType {
    match value {
        Value::Null => BoltType::Null(neo4rs::BoltNull),
        Value::Bool(b) => BoltType::Boolean(neo4rs::BoltBoolean::new(*b)),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                BoltType::Integer(neo4rs::BoltInteger::new(i))
            } else {
                BoltType::Float(neo4rs::BoltFloat::new(n.as_f64().unwrap_or_default()))
            }
        }
        Value::String(s) => BoltType::String(neo4rs::BoltString::new(s)),
        Value::Array(items) => {
            let list: Vec<BoltType> = items.iter().map(json_to_bolt).collect();
            BoltType::List(neo4rs::BoltList::from(list))
        }
        Value::Object(map) => {
            let mut bolt_map = neo4rs::BoltMap::new();
            for (k, v) in map {
                bolt_map.put(neo4rs::BoltString::new(k), json_to_bolt(v));
            }
            BoltType::Map(bolt_map)
        }
    }
}

/// `row.get::<BoltValueJson>(col)` yields the column's value converted back
/// to `serde_json::Value`, used only by the loosely-typed `query_rows` path.
struct BoltValueJson(Value);

impl std::convert::TryFrom<BoltType> for BoltValueJson {
    type Error = neo4rs::Error;

    fn try_from(bt: BoltType) -> std::result::Result<Self, Self::Error> {
        Ok(BoltValueJson(bolt_to_json(&bt)))
    }
}

fn bolt_to_json(bt: &BoltType) -> Value {
    match bt {
        BoltType::Null(_) => Value::Null,
        BoltType::Boolean(b) => Value::Bool(b.value),
        BoltType::Integer(i) => Value::Number(i.value.into()),
        BoltType::Float(f) => serde_json::Number::from_f64(f.value)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        BoltType::String(s) => Value::String(s.value.clone()),
        BoltType::List(l) => Value::Array(l.value.iter().map(bolt_to_json).collect()),
        BoltType::Map(m) => {
            let obj = m
                .value
                .iter()
                .map(|(k, v)| (k.value.clone(), bolt_to_json(v)))
                .collect();
            Value::Object(obj)
        }
        BoltType::Node(n) => {
            let obj = n
                .properties
                .value
                .iter()
                .map(|(k, v)| (k.value.clone(), bolt_to_json(v)))
                .collect();
            Value::Object(obj)
        }
        BoltType::Relation(r) => {
            let obj = r
                .properties
                .value
                .iter()
                .map(|(k, v)| (k.value.clone(), bolt_to_json(v)))
                .collect();
            Value::Object(obj)
        }
        other => {
            warn!(?other, "unsupported bolt type for json conversion; coercing to null");
            Value::Null
        }
    }
}
