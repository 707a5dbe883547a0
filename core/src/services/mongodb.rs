//! Document access through the remote MongoDB service.
//!
//! Every operation is one function call; the backend owns the data. There is
//! no local cache and no offline queue.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ServiceError;
use crate::invocation::encode_arg;
use crate::services::{require_present, NamedService, ServiceClient};

pub const FIND_FUNCTION: &str = "find";
pub const INSERT_ONE_FUNCTION: &str = "insertOne";
pub const UPDATE_ONE_FUNCTION: &str = "updateOne";
pub const DELETE_ONE_FUNCTION: &str = "deleteOne";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertOneResult {
    pub inserted_id: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResult {
    pub matched_count: u64,
    pub modified_count: u64,
    /// Set only when an upsert created a new document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upserted_id: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResult {
    pub deleted_count: u64,
}

#[derive(Serialize)]
struct FindArgs<'a> {
    database: &'a str,
    collection: &'a str,
    query: &'a Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    limit: Option<u64>,
}

#[derive(Serialize)]
struct InsertOneArgs<'a> {
    database: &'a str,
    collection: &'a str,
    document: &'a Value,
}

#[derive(Serialize)]
struct UpdateOneArgs<'a> {
    database: &'a str,
    collection: &'a str,
    query: &'a Value,
    update: &'a Value,
    upsert: bool,
}

#[derive(Serialize)]
struct DeleteOneArgs<'a> {
    database: &'a str,
    collection: &'a str,
    query: &'a Value,
}

fn require_document(name: &str, value: &Value) -> Result<(), ServiceError> {
    if !value.is_object() {
        return Err(ServiceError::InvalidArgument {
            name: name.to_string(),
            reason: "must be a JSON object".to_string(),
        });
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct RemoteMongoServiceClient {
    client: ServiceClient,
}

impl RemoteMongoServiceClient {
    pub fn new(client: ServiceClient) -> Self {
        Self { client }
    }

    pub fn service_name(&self) -> &str {
        self.client.name()
    }

    /// Handle on one collection. Names are checked when an operation runs.
    pub fn collection(&self, database: &str, collection: &str) -> RemoteMongoCollection {
        RemoteMongoCollection {
            client: self.client.clone(),
            database: database.to_string(),
            collection: collection.to_string(),
        }
    }
}

impl NamedService for RemoteMongoServiceClient {
    const DEFAULT_NAME: &'static str = "mongodb-atlas";

    fn from_service_client(client: ServiceClient) -> Self {
        Self::new(client)
    }
}

#[derive(Debug, Clone)]
pub struct RemoteMongoCollection {
    client: ServiceClient,
    database: String,
    collection: String,
}

impl RemoteMongoCollection {
    pub fn database(&self) -> &str {
        &self.database
    }

    pub fn name(&self) -> &str {
        &self.collection
    }

    fn require_namespace(&self) -> Result<(), ServiceError> {
        require_present("database", &self.database)?;
        require_present("collection", &self.collection)
    }

    /// Documents matching `filter`, at most `limit` of them.
    pub fn find<T: DeserializeOwned>(
        &self,
        filter: &Value,
        limit: Option<u64>,
    ) -> Result<Vec<T>, ServiceError> {
        self.require_namespace()?;
        require_document("filter", filter)?;
        let args = FindArgs {
            database: &self.database,
            collection: &self.collection,
            query: filter,
            limit,
        };
        self.client.call_function(FIND_FUNCTION, vec![encode_arg(&args)?])
    }

    pub fn insert_one<D: Serialize>(&self, document: &D) -> Result<InsertOneResult, ServiceError> {
        self.require_namespace()?;
        let document = encode_arg(document)?;
        require_document("document", &document)?;
        let args = InsertOneArgs {
            database: &self.database,
            collection: &self.collection,
            document: &document,
        };
        self.client
            .call_function(INSERT_ONE_FUNCTION, vec![encode_arg(&args)?])
    }

    pub fn update_one(
        &self,
        filter: &Value,
        update: &Value,
        upsert: bool,
    ) -> Result<UpdateResult, ServiceError> {
        self.require_namespace()?;
        require_document("filter", filter)?;
        require_document("update", update)?;
        let args = UpdateOneArgs {
            database: &self.database,
            collection: &self.collection,
            query: filter,
            update,
            upsert,
        };
        self.client
            .call_function(UPDATE_ONE_FUNCTION, vec![encode_arg(&args)?])
    }

    pub fn delete_one(&self, filter: &Value) -> Result<DeleteResult, ServiceError> {
        self.require_namespace()?;
        require_document("filter", filter)?;
        let args = DeleteOneArgs {
            database: &self.database,
            collection: &self.collection,
            query: filter,
        };
        self.client
            .call_function(DELETE_ONE_FUNCTION, vec![encode_arg(&args)?])
    }
}
