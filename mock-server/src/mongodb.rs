//! In-memory stand-in for the remote MongoDB service.
//!
//! Filters match on top-level field equality only. Updates accept `$set`.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::{json, Map, Value};
use uuid::Uuid;

/// Documents keyed by `"database.collection"`.
pub type Collections = HashMap<String, Vec<Map<String, Value>>>;

#[derive(Deserialize)]
pub struct FindArgs {
    pub database: String,
    pub collection: String,
    #[serde(default)]
    pub query: Map<String, Value>,
    pub limit: Option<usize>,
}

#[derive(Deserialize)]
pub struct InsertOneArgs {
    pub database: String,
    pub collection: String,
    pub document: Map<String, Value>,
}

#[derive(Deserialize)]
pub struct UpdateOneArgs {
    pub database: String,
    pub collection: String,
    #[serde(default)]
    pub query: Map<String, Value>,
    pub update: Map<String, Value>,
    #[serde(default)]
    pub upsert: bool,
}

#[derive(Deserialize)]
pub struct DeleteOneArgs {
    pub database: String,
    pub collection: String,
    #[serde(default)]
    pub query: Map<String, Value>,
}

fn namespace(database: &str, collection: &str) -> String {
    format!("{database}.{collection}")
}

fn matches(doc: &Map<String, Value>, query: &Map<String, Value>) -> bool {
    query.iter().all(|(k, v)| doc.get(k) == Some(v))
}

pub fn find(collections: &Collections, args: FindArgs) -> Value {
    let docs = collections
        .get(&namespace(&args.database, &args.collection))
        .map(|docs| docs.as_slice())
        .unwrap_or_default();
    let found: Vec<Value> = docs
        .iter()
        .filter(|doc| matches(doc, &args.query))
        .take(args.limit.unwrap_or(usize::MAX))
        .map(|doc| Value::Object(doc.clone()))
        .collect();
    Value::Array(found)
}

pub fn insert_one(collections: &mut Collections, args: InsertOneArgs) -> Value {
    let mut document = args.document;
    let id = document
        .entry("_id")
        .or_insert_with(|| Value::String(Uuid::new_v4().to_string()))
        .clone();
    collections
        .entry(namespace(&args.database, &args.collection))
        .or_default()
        .push(document);
    json!({ "insertedId": id })
}

/// Apply one `updateOne`. Errors name the unsupported operator.
pub fn update_one(collections: &mut Collections, args: UpdateOneArgs) -> Result<Value, String> {
    let set = match args.update.iter().next() {
        Some((op, Value::Object(fields))) if op == "$set" && args.update.len() == 1 => fields,
        Some((op, _)) => return Err(format!("unsupported update operator: {op}")),
        None => return Err("update document is empty".to_string()),
    };

    let docs = collections
        .entry(namespace(&args.database, &args.collection))
        .or_default();

    if let Some(doc) = docs.iter_mut().find(|doc| matches(doc, &args.query)) {
        let before = doc.clone();
        for (k, v) in set {
            doc.insert(k.clone(), v.clone());
        }
        let modified = u64::from(*doc != before);
        return Ok(json!({ "matchedCount": 1, "modifiedCount": modified }));
    }

    if !args.upsert {
        return Ok(json!({ "matchedCount": 0, "modifiedCount": 0 }));
    }
    let mut doc = args.query.clone();
    for (k, v) in set {
        doc.insert(k.clone(), v.clone());
    }
    let id = doc
        .entry("_id")
        .or_insert_with(|| Value::String(Uuid::new_v4().to_string()))
        .clone();
    docs.push(doc);
    Ok(json!({ "matchedCount": 0, "modifiedCount": 0, "upsertedId": id }))
}

pub fn delete_one(collections: &mut Collections, args: DeleteOneArgs) -> Value {
    let deleted = collections
        .get_mut(&namespace(&args.database, &args.collection))
        .and_then(|docs| {
            let pos = docs.iter().position(|doc| matches(doc, &args.query))?;
            docs.remove(pos);
            Some(1)
        })
        .unwrap_or(0);
    json!({ "deletedCount": deleted })
}
